use serde::{Deserialize, Serialize};

use crate::assistant::Conversation;
use crate::contacts::ContactBook;
use crate::countdown::{Countdown, Notice};
use crate::error::AppError;
use crate::get_current_time_ms;
use crate::profile::MedicalProfile;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    #[must_use]
    pub const fn default_duration_ms(self) -> u64 {
        match self {
            Self::Info => 3000,
            Self::Success => 2000,
            Self::Warning => 4000,
            Self::Error => 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToastMessage {
    pub title: String,
    pub description: String,
    pub kind: ToastKind,
    pub created_at_ms: u64,
    pub duration_ms: u64,
}

impl ToastMessage {
    #[must_use]
    pub fn new(notice: Notice, kind: ToastKind) -> Self {
        Self {
            title: notice.title.to_string(),
            description: notice.description.to_string(),
            kind,
            created_at_ms: get_current_time_ms(),
            duration_ms: kind.default_duration_ms(),
        }
    }

    #[must_use]
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.created_at_ms) > self.duration_ms
    }
}

/// In-memory app state. Nothing here outlives the process.
pub struct Model {
    pub countdown: Countdown,
    pub assistant: Conversation,
    pub contacts: ContactBook,
    pub profile: MedicalProfile,
    pub profile_editing: bool,
    pub settings: Settings,
    pub active_toast: Option<ToastMessage>,
    pub active_error: Option<AppError>,
}

impl Default for Model {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            countdown: Countdown::new(settings.countdown_config()),
            assistant: Conversation::default(),
            contacts: ContactBook::with_defaults(),
            profile: MedicalProfile::with_defaults(),
            profile_editing: false,
            settings,
            active_toast: None,
            active_error: None,
        }
    }
}

impl Model {
    pub fn set_error(&mut self, error: AppError) {
        self.active_error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.active_error = None;
    }

    pub fn show_toast(&mut self, notice: Notice, kind: ToastKind) {
        self.active_toast = Some(ToastMessage::new(notice, kind));
    }

    pub fn clear_toast(&mut self) {
        self.active_toast = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countdown::CANCEL_NOTICE;

    #[test]
    fn toast_expires_after_duration() {
        let toast = ToastMessage {
            title: "t".into(),
            description: "d".into(),
            kind: ToastKind::Info,
            created_at_ms: 1_000,
            duration_ms: 3_000,
        };
        assert!(!toast.is_expired(4_000));
        assert!(toast.is_expired(4_001));
    }

    #[test]
    fn show_toast_copies_notice() {
        let mut model = Model::default();
        model.show_toast(CANCEL_NOTICE, ToastKind::Info);
        let toast = model.active_toast.as_ref().unwrap();
        assert_eq!(toast.title, "Emergency Cancelled");
        assert_eq!(toast.duration_ms, 3000);

        model.clear_toast();
        assert!(model.active_toast.is_none());
    }

    #[test]
    fn default_model_uses_settings_countdown() {
        let model = Model::default();
        assert_eq!(model.countdown.remaining_seconds(), 10);
        assert_eq!(model.assistant.messages().len(), 1);
        assert_eq!(model.contacts.len(), 3);
        assert_eq!(model.profile.personal.full_name, "Alex Johnson");
    }
}
