use tracing::{debug, info, warn};

use crate::assistant::AssistantError;
use crate::capabilities::{Capabilities, Coordinates, LocationResult, TimerId, TimerOutput};
use crate::countdown::{
    DispatchNotice, SessionId, Started, TickOutcome, TickRequest, LOCATION_UNAVAILABLE_NOTICE,
};
use crate::error::{LocationUnavailable, ValidationError};
use crate::event::Event;
use crate::model::{Model, ToastKind};
use crate::view::ViewModel;
use crate::{get_current_time_ms, ASSISTANT_REPLY_DELAY_MS};

#[derive(Default)]
pub struct App;

impl App {
    fn schedule_tick(tick: TickRequest, caps: &Capabilities) {
        caps.timer.start(tick.id, tick.millis, |output| match output {
            TimerOutput::Fired { id } => Event::CountdownTick { timer: id },
            TimerOutput::Cancelled { .. } => Event::Noop,
        });
    }

    fn request_location(session: SessionId, caps: &Capabilities) {
        caps.location.get_current_position(true, move |result| Event::LocationResolved {
            session,
            result: Box::new(result),
        });
    }

    fn start_emergency(model: &mut Model, caps: &Capabilities) {
        let session = SessionId::new();
        let share_location = model.settings.privacy.share_location;

        match model.countdown.begin(session, share_location) {
            Ok(Started::AwaitingLocation) => {
                info!(%session, "emergency session started, resolving location");
                Self::request_location(session, caps);
            }
            Ok(Started::Ticking(tick)) => {
                info!(%session, "emergency session started without location");
                Self::schedule_tick(tick, caps);
            }
            Err(e) => {
                warn!(error = %e, "emergency request ignored");
            }
        }
    }

    fn resolve_location(
        model: &mut Model,
        session: SessionId,
        result: LocationResult,
        caps: &Capabilities,
    ) {
        let location = result
            .map_err(LocationUnavailable::from)
            .and_then(|fix| Coordinates::try_from(fix).map_err(LocationUnavailable::from));

        let failure = location.as_ref().err().cloned();

        match model.countdown.location_resolved(session, location) {
            Ok(tick) => {
                if let Some(reason) = failure {
                    warn!(%session, error = %reason, "continuing countdown without location");
                    model.show_toast(LOCATION_UNAVAILABLE_NOTICE, ToastKind::Warning);
                }
                Self::schedule_tick(tick, caps);
            }
            Err(e) => {
                debug!(%session, error = %e, "dropping late location answer");
            }
        }
    }

    fn handle_tick(model: &mut Model, timer: TimerId, caps: &Capabilities) {
        match model.countdown.tick(timer) {
            TickOutcome::Stale => {
                debug!(%timer, "stale countdown tick");
            }
            TickOutcome::Continue(next) => {
                debug!(remaining = model.countdown.remaining_seconds(), "countdown tick");
                Self::schedule_tick(next, caps);
            }
            TickOutcome::Expired(dispatch) => {
                info!(
                    session = %dispatch.session,
                    ticks = dispatch.ticks_elapsed,
                    simulated = DispatchNotice::SIMULATED,
                    "countdown expired, dispatch notice shown"
                );
                model.show_toast(dispatch.notice(), ToastKind::Error);
            }
        }
    }

    fn submit_message(model: &mut Model, text: &str, caps: &Capabilities) {
        match model.assistant.submit(text, get_current_time_ms()) {
            Ok(timer) => {
                caps.timer.start(timer, ASSISTANT_REPLY_DELAY_MS, |output| match output {
                    TimerOutput::Fired { id } => Event::AssistantReplyDue { timer: id },
                    TimerOutput::Cancelled { .. } => Event::Noop,
                });
            }
            Err(AssistantError::Blank) => {}
            Err(e @ AssistantError::ReplyPending) => {
                debug!(error = %e, "message ignored");
            }
            Err(AssistantError::TooLong { len, max }) => {
                model.set_error(
                    ValidationError::TooLong {
                        field: "message",
                        len,
                        max,
                    }
                    .into(),
                );
            }
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        let event_name = event.name();
        debug!(event = event_name, user = event.is_user_initiated(), "update");

        match event {
            Event::Noop => return,

            Event::EmergencyRequested => Self::start_emergency(model, caps),

            Event::LocationResolved { session, result } => {
                Self::resolve_location(model, session, *result, caps);
            }

            Event::CountdownTick { timer } => Self::handle_tick(model, timer, caps),

            Event::CallNowRequested => match model.countdown.call_now() {
                Ok(()) => info!("call now requested, expiring on next tick"),
                Err(e) => warn!(error = %e, "call now ignored"),
            },

            Event::CancelEmergencyRequested => match model.countdown.cancel() {
                Ok(cancellation) => {
                    if let Some(timer) = cancellation.pending_tick {
                        caps.timer.cancel(timer);
                    }
                    info!(
                        session = %cancellation.session,
                        remaining = cancellation.remaining_seconds,
                        "emergency cancelled"
                    );
                    model.show_toast(cancellation.notice(), ToastKind::Info);
                }
                Err(e) => warn!(error = %e, "cancel ignored"),
            },

            Event::AssistantMessageSubmitted { text } => Self::submit_message(model, &text, caps),

            Event::AssistantReplyDue { timer } => {
                if let Some(reply) = model.assistant.deliver(timer, get_current_time_ms()) {
                    debug!(urgency = ?reply.urgency, "assistant replied");
                }
            }

            Event::ContactAdded(draft) => match model.contacts.add(&draft) {
                Ok(id) => debug!(%id, "contact added"),
                Err(e) => model.set_error(e.into()),
            },

            Event::ContactUpdated { id, draft } => {
                if let Err(e) = model.contacts.update(id, &draft) {
                    model.set_error(e.into());
                }
            }

            Event::ContactRemoved { id } => {
                if let Err(e) = model.contacts.remove(id) {
                    model.set_error(e.into());
                }
            }

            Event::ProfileEditStarted => model.profile_editing = true,

            Event::ProfileSaved(profile) => {
                model.profile = (*profile).normalized();
                model.profile_editing = false;
            }

            Event::ProfileEditDiscarded => model.profile_editing = false,

            Event::SettingChanged(change) => {
                model.settings.apply(change);
                if change.affects_countdown() {
                    model.countdown.configure(model.settings.countdown_config());
                }
            }

            Event::DismissToast => model.clear_toast(),

            Event::DismissError => model.clear_error(),

            Event::TimerTick => {
                let expired = model
                    .active_toast
                    .as_ref()
                    .is_some_and(|t| t.is_expired(get_current_time_ms()));
                if !expired {
                    return;
                }
                model.clear_toast();
            }
        }

        caps.render.render();
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel::from(model)
    }
}
