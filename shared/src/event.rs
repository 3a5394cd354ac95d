use serde::{Deserialize, Serialize};

use crate::capabilities::{LocationResult, TimerId};
use crate::contacts::{ContactDraft, ContactId};
use crate::countdown::SessionId;
use crate::profile::MedicalProfile;
use crate::settings::SettingChange;

// Large payloads are boxed to keep the enum small.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum Event {
    #[default]
    Noop,

    // Emergency flow
    EmergencyRequested,
    LocationResolved {
        session: SessionId,
        result: Box<LocationResult>,
    },
    CountdownTick {
        timer: TimerId,
    },
    CallNowRequested,
    CancelEmergencyRequested,

    // Assistant
    AssistantMessageSubmitted {
        text: String,
    },
    AssistantReplyDue {
        timer: TimerId,
    },

    // Contacts
    ContactAdded(Box<ContactDraft>),
    ContactUpdated {
        id: ContactId,
        draft: Box<ContactDraft>,
    },
    ContactRemoved {
        id: ContactId,
    },

    // Medical profile
    ProfileEditStarted,
    ProfileSaved(Box<MedicalProfile>),
    ProfileEditDiscarded,

    SettingChanged(SettingChange),

    DismissToast,
    DismissError,
    TimerTick,
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::EmergencyRequested => "emergency_requested",
            Self::LocationResolved { .. } => "location_resolved",
            Self::CountdownTick { .. } => "countdown_tick",
            Self::CallNowRequested => "call_now_requested",
            Self::CancelEmergencyRequested => "cancel_emergency_requested",
            Self::AssistantMessageSubmitted { .. } => "assistant_message_submitted",
            Self::AssistantReplyDue { .. } => "assistant_reply_due",
            Self::ContactAdded(_) => "contact_added",
            Self::ContactUpdated { .. } => "contact_updated",
            Self::ContactRemoved { .. } => "contact_removed",
            Self::ProfileEditStarted => "profile_edit_started",
            Self::ProfileSaved(_) => "profile_saved",
            Self::ProfileEditDiscarded => "profile_edit_discarded",
            Self::SettingChanged(_) => "setting_changed",
            Self::DismissToast => "dismiss_toast",
            Self::DismissError => "dismiss_error",
            Self::TimerTick => "timer_tick",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::EmergencyRequested
                | Self::CallNowRequested
                | Self::CancelEmergencyRequested
                | Self::AssistantMessageSubmitted { .. }
                | Self::ContactAdded(_)
                | Self::ContactUpdated { .. }
                | Self::ContactRemoved { .. }
                | Self::ProfileEditStarted
                | Self::ProfileSaved(_)
                | Self::ProfileEditDiscarded
                | Self::SettingChanged(_)
                | Self::DismissToast
                | Self::DismissError
        )
    }
}
