use serde::{Deserialize, Serialize};

use crate::assistant::{ChatMessage, Conversation};
use crate::contacts::{Contact, ContactCategory, ContactId, EmergencyService, EMERGENCY_SERVICES};
use crate::countdown::{Countdown, CountdownPhase, DispatchNotice};
use crate::error::AppError;
use crate::model::{Model, ToastKind, ToastMessage};
use crate::profile::MedicalProfile;
use crate::settings::Settings;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmergencyView {
    pub phase: CountdownPhase,
    pub is_active: bool,
    pub remaining_seconds: u32,
    pub countdown_message: Option<String>,
    pub location_text: Option<String>,
    pub can_call_now: bool,
    pub can_cancel: bool,
    /// Always true: dispatch is a simulation.
    pub dispatch_simulated: bool,
}

impl From<&Countdown> for EmergencyView {
    fn from(countdown: &Countdown) -> Self {
        let phase = countdown.phase();
        let remaining = countdown.remaining_seconds();
        let countdown_message = match phase {
            CountdownPhase::Idle => None,
            CountdownPhase::Locating => Some("Getting your location...".to_string()),
            CountdownPhase::Running => Some(format!(
                "Emergency services will be contacted in {remaining} seconds"
            )),
        };

        Self {
            phase,
            is_active: countdown.is_active(),
            remaining_seconds: remaining,
            countdown_message,
            location_text: countdown.location_text().map(str::to_string),
            can_call_now: phase == CountdownPhase::Running,
            can_cancel: phase.is_active(),
            dispatch_simulated: DispatchNotice::SIMULATED,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssistantView {
    pub messages: Vec<ChatMessage>,
    pub is_typing: bool,
    pub can_send: bool,
}

impl From<&Conversation> for AssistantView {
    fn from(c: &Conversation) -> Self {
        Self {
            messages: c.messages().to_vec(),
            is_typing: c.is_typing(),
            can_send: !c.is_typing(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactView {
    pub id: ContactId,
    pub name: String,
    pub phone: String,
    pub relationship: String,
    pub category: ContactCategory,
    pub address: Option<String>,
    pub dial_uri: String,
}

impl From<&Contact> for ContactView {
    fn from(c: &Contact) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            phone: c.phone.clone(),
            relationship: c.relationship.clone(),
            category: c.category,
            address: c.address.clone(),
            dial_uri: c.dial_uri(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceView {
    pub name: String,
    pub number: String,
    pub description: String,
}

impl From<&EmergencyService> for ServiceView {
    fn from(s: &EmergencyService) -> Self {
        Self {
            name: s.name.to_string(),
            number: s.number.to_string(),
            description: s.description.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileView {
    pub profile: MedicalProfile,
    pub is_editing: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserFacingError {
    pub message: String,
    pub error_code: String,
}

impl From<&AppError> for UserFacingError {
    fn from(e: &AppError) -> Self {
        Self {
            message: e.user_facing_message(),
            error_code: e.code().to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToastView {
    pub title: String,
    pub description: String,
    pub kind: ToastKind,
    pub duration_ms: u64,
}

impl From<&ToastMessage> for ToastView {
    fn from(t: &ToastMessage) -> Self {
        Self {
            title: t.title.clone(),
            description: t.description.clone(),
            kind: t.kind,
            duration_ms: t.duration_ms,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewModel {
    pub emergency: EmergencyView,
    pub assistant: AssistantView,
    pub contacts: Vec<ContactView>,
    pub emergency_services: Vec<ServiceView>,
    pub profile: ProfileView,
    pub settings: Settings,
    pub toast: Option<ToastView>,
    pub error: Option<UserFacingError>,
}

impl From<&Model> for ViewModel {
    fn from(model: &Model) -> Self {
        Self {
            emergency: EmergencyView::from(&model.countdown),
            assistant: AssistantView::from(&model.assistant),
            contacts: model.contacts.iter().map(ContactView::from).collect(),
            emergency_services: EMERGENCY_SERVICES.iter().map(ServiceView::from).collect(),
            profile: ProfileView {
                profile: model.profile.clone(),
                is_editing: model.profile_editing,
            },
            settings: model.settings.clone(),
            toast: model.active_toast.as_ref().map(ToastView::from),
            error: model.active_error.as_ref().map(UserFacingError::from),
        }
    }
}
