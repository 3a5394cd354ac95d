//! Emergency countdown.
//!
//! ```text
//!   Idle ──begin──▶ Locating ──location answer──▶ Running ──tick──▶ Running
//!    ▲                 │                            │  │
//!    │                 │ cancel                     │  └─ remaining == 0 ─▶ Expired ─┐
//!    │                 ▼                            ▼                                │
//!    └──────────── Cancelled ◀──────── cancel ──────┘                                │
//!    └───────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Expired` and `Cancelled` are terminal for a session and fall straight back
//! to `Idle` with the remaining time reset to the configured start value. The
//! last terminal outcome is kept in [`Countdown::last_outcome`].
//!
//! The machine is pure: it hands back [`TickRequest`]s and notices, and the
//! app turns those into timer effects and toasts. Each tick names the timer
//! that produced it; a tick whose timer is not the pending one is stale and
//! has no effect. That check happens when the tick is handled, so a timer the
//! shell fires after a cancel can never decrement a new session.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::capabilities::{Coordinates, TimerId, TimerScope};
use crate::error::LocationUnavailable;
use crate::{DEFAULT_COUNTDOWN_SECONDS, TICK_INTERVAL_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownConfig {
    pub start_seconds: u32,
    pub tick_interval_ms: u64,
}

impl CountdownConfig {
    pub fn new(start_seconds: u32) -> Result<Self, CountdownError> {
        if start_seconds == 0 {
            return Err(CountdownError::InvalidStart);
        }
        Ok(Self {
            start_seconds,
            tick_interval_ms: TICK_INTERVAL_MS,
        })
    }
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            start_seconds: DEFAULT_COUNTDOWN_SECONDS,
            tick_interval_ms: TICK_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CountdownPhase {
    #[default]
    Idle,
    Locating,
    Running,
}

impl CountdownPhase {
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Locating | Self::Running)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    Expired,
    Cancelled,
}

/// Title and body of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub description: &'static str,
}

pub const DISPATCH_NOTICE: Notice = Notice {
    title: "Emergency Services Contacted",
    description: "Help is on the way. Stay calm and follow first aid guidance.",
};

pub const CANCEL_NOTICE: Notice = Notice {
    title: "Emergency Cancelled",
    description: "Emergency call has been cancelled.",
};

pub const LOCATION_UNAVAILABLE_NOTICE: Notice = Notice {
    title: "Location Error",
    description: "Could not get your location. Emergency services will still be contacted.",
};

/// Produced once per expired session.
///
/// Dispatch is simulated: no emergency service is contacted by this crate or
/// by any shell built on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchNotice {
    pub session: SessionId,
    pub ticks_elapsed: u32,
    pub location_text: Option<String>,
}

impl DispatchNotice {
    pub const SIMULATED: bool = true;

    #[must_use]
    pub const fn notice(&self) -> Notice {
        DISPATCH_NOTICE
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cancellation {
    pub session: SessionId,
    /// Timer the shell must drop, if one was scheduled.
    pub pending_tick: Option<TimerId>,
    pub remaining_seconds: u32,
}

impl Cancellation {
    #[must_use]
    pub const fn notice(&self) -> Notice {
        CANCEL_NOTICE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickRequest {
    pub id: TimerId,
    pub millis: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Started {
    AwaitingLocation,
    Ticking(TickRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Stale,
    Continue(TickRequest),
    Expired(DispatchNotice),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CountdownError {
    #[error("an emergency session is already active")]
    AlreadyActive,
    #[error("no emergency session is active")]
    NotActive,
    #[error("the countdown is not running")]
    NotRunning,
    #[error("session {0} is not waiting for a location")]
    StaleSession(SessionId),
    #[error("countdown must start above zero seconds")]
    InvalidStart,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    config: CountdownConfig,
    phase: CountdownPhase,
    session: Option<SessionId>,
    remaining_seconds: u32,
    location_text: Option<String>,
    pending_tick: Option<TimerId>,
    next_tick_seq: u64,
    ticks_elapsed: u32,
    dispatched_session: Option<SessionId>,
    last_outcome: Option<SessionOutcome>,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(CountdownConfig::default())
    }
}

impl Countdown {
    #[must_use]
    pub fn new(config: CountdownConfig) -> Self {
        Self {
            config,
            phase: CountdownPhase::Idle,
            session: None,
            remaining_seconds: config.start_seconds,
            location_text: None,
            pending_tick: None,
            next_tick_seq: 0,
            ticks_elapsed: 0,
            dispatched_session: None,
            last_outcome: None,
        }
    }

    /// Takes effect immediately when idle, otherwise from the next session.
    pub fn configure(&mut self, config: CountdownConfig) {
        self.config = config;
        if !self.phase.is_active() {
            self.remaining_seconds = config.start_seconds;
        }
    }

    #[must_use]
    pub const fn config(&self) -> CountdownConfig {
        self.config
    }

    #[must_use]
    pub const fn phase(&self) -> CountdownPhase {
        self.phase
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    #[must_use]
    pub const fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    #[must_use]
    pub fn location_text(&self) -> Option<&str> {
        self.location_text.as_deref()
    }

    #[must_use]
    pub const fn session(&self) -> Option<SessionId> {
        self.session
    }

    #[must_use]
    pub const fn pending_tick(&self) -> Option<TimerId> {
        self.pending_tick
    }

    #[must_use]
    pub const fn ticks_elapsed(&self) -> u32 {
        self.ticks_elapsed
    }

    #[must_use]
    pub const fn last_outcome(&self) -> Option<SessionOutcome> {
        self.last_outcome
    }

    /// Opens a session. Re-entry while a session is active is rejected and
    /// leaves the running session untouched.
    pub fn begin(
        &mut self,
        session: SessionId,
        resolve_location: bool,
    ) -> Result<Started, CountdownError> {
        if self.phase.is_active() {
            return Err(CountdownError::AlreadyActive);
        }

        self.session = Some(session);
        self.remaining_seconds = self.config.start_seconds;
        self.location_text = None;
        self.ticks_elapsed = 0;
        self.last_outcome = None;

        if resolve_location {
            self.phase = CountdownPhase::Locating;
            Ok(Started::AwaitingLocation)
        } else {
            self.phase = CountdownPhase::Running;
            Ok(Started::Ticking(self.schedule_tick()))
        }
    }

    /// Starts ticking whatever the location answer was.
    pub fn location_resolved(
        &mut self,
        session: SessionId,
        location: Result<Coordinates, LocationUnavailable>,
    ) -> Result<TickRequest, CountdownError> {
        if self.phase != CountdownPhase::Locating || self.session != Some(session) {
            return Err(CountdownError::StaleSession(session));
        }

        self.location_text = location.ok().map(Coordinates::display_text);
        self.phase = CountdownPhase::Running;
        Ok(self.schedule_tick())
    }

    pub fn tick(&mut self, timer: TimerId) -> TickOutcome {
        if self.phase != CountdownPhase::Running || self.pending_tick != Some(timer) {
            return TickOutcome::Stale;
        }

        self.pending_tick = None;
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.ticks_elapsed += 1;

        if self.remaining_seconds == 0 {
            return match self.expire() {
                Some(notice) => TickOutcome::Expired(notice),
                None => TickOutcome::Stale,
            };
        }

        TickOutcome::Continue(self.schedule_tick())
    }

    /// "Call Now". Forces the remaining time to one second so the pending
    /// tick expires the session; it does not dispatch synchronously.
    pub fn call_now(&mut self) -> Result<(), CountdownError> {
        if self.phase != CountdownPhase::Running {
            return Err(CountdownError::NotRunning);
        }
        self.remaining_seconds = self.remaining_seconds.min(1);
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<Cancellation, CountdownError> {
        let session = match self.session {
            Some(session) if self.phase.is_active() => session,
            _ => return Err(CountdownError::NotActive),
        };

        let cancellation = Cancellation {
            session,
            pending_tick: self.pending_tick.take(),
            remaining_seconds: self.remaining_seconds,
        };
        self.reset(SessionOutcome::Cancelled);
        Ok(cancellation)
    }

    fn schedule_tick(&mut self) -> TickRequest {
        self.next_tick_seq += 1;
        let id = TimerId::new(TimerScope::Countdown, self.next_tick_seq);
        self.pending_tick = Some(id);
        TickRequest {
            id,
            millis: self.config.tick_interval_ms,
        }
    }

    fn expire(&mut self) -> Option<DispatchNotice> {
        let session = self.session?;
        if self.dispatched_session == Some(session) {
            return None;
        }
        self.dispatched_session = Some(session);

        let notice = DispatchNotice {
            session,
            ticks_elapsed: self.ticks_elapsed,
            location_text: self.location_text.take(),
        };
        self.reset(SessionOutcome::Expired);
        Some(notice)
    }

    fn reset(&mut self, outcome: SessionOutcome) {
        self.phase = CountdownPhase::Idle;
        self.session = None;
        self.remaining_seconds = self.config.start_seconds;
        self.location_text = None;
        self.pending_tick = None;
        self.ticks_elapsed = 0;
        self.last_outcome = Some(outcome);
    }
}
