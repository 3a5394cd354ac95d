use serde::{Deserialize, Serialize};

use crate::countdown::CountdownConfig;
use crate::error::ValidationError;

/// Countdown lengths offered on the settings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CountdownDuration {
    Five,
    #[default]
    Ten,
    Fifteen,
    Thirty,
}

impl CountdownDuration {
    pub const ALL: [Self; 4] = [Self::Five, Self::Ten, Self::Fifteen, Self::Thirty];

    #[must_use]
    pub const fn seconds(self) -> u32 {
        match self {
            Self::Five => 5,
            Self::Ten => 10,
            Self::Fifteen => 15,
            Self::Thirty => 30,
        }
    }
}

impl TryFrom<u32> for CountdownDuration {
    type Error = ValidationError;

    fn try_from(seconds: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|d| d.seconds() == seconds)
            .ok_or(ValidationError::Unsupported {
                field: "emergency countdown",
                value: seconds.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    English,
    Spanish,
    French,
    German,
}

impl Language {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Spanish => "es",
            Self::French => "fr",
            Self::German => "de",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub emergency_alerts: bool,
    pub course_reminders: bool,
    pub health_tips: bool,
    pub system_updates: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            emergency_alerts: true,
            course_reminders: true,
            health_tips: false,
            system_updates: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacySettings {
    /// When off, emergency sessions skip the location request entirely.
    pub share_location: bool,
    pub auto_call_911: bool,
    pub anonymous_data: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            share_location: true,
            auto_call_911: false,
            anonymous_data: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Preferences {
    pub language: Language,
    pub theme: Theme,
    pub emergency_countdown: CountdownDuration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    pub notifications: NotificationSettings,
    pub privacy: PrivacySettings,
    pub preferences: Preferences,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "setting", content = "value", rename_all = "snake_case")]
pub enum SettingChange {
    EmergencyAlerts(bool),
    CourseReminders(bool),
    HealthTips(bool),
    SystemUpdates(bool),
    ShareLocation(bool),
    AutoCall911(bool),
    AnonymousData(bool),
    Language(Language),
    Theme(Theme),
    EmergencyCountdown(CountdownDuration),
}

impl SettingChange {
    #[must_use]
    pub const fn affects_countdown(self) -> bool {
        matches!(self, Self::EmergencyCountdown(_))
    }
}

impl Settings {
    pub fn apply(&mut self, change: SettingChange) {
        match change {
            SettingChange::EmergencyAlerts(on) => self.notifications.emergency_alerts = on,
            SettingChange::CourseReminders(on) => self.notifications.course_reminders = on,
            SettingChange::HealthTips(on) => self.notifications.health_tips = on,
            SettingChange::SystemUpdates(on) => self.notifications.system_updates = on,
            SettingChange::ShareLocation(on) => self.privacy.share_location = on,
            SettingChange::AutoCall911(on) => self.privacy.auto_call_911 = on,
            SettingChange::AnonymousData(on) => self.privacy.anonymous_data = on,
            SettingChange::Language(language) => self.preferences.language = language,
            SettingChange::Theme(theme) => self.preferences.theme = theme,
            SettingChange::EmergencyCountdown(duration) => {
                self.preferences.emergency_countdown = duration;
            }
        }
    }

    #[must_use]
    pub fn countdown_config(&self) -> CountdownConfig {
        CountdownConfig {
            start_seconds: self.preferences.emergency_countdown.seconds(),
            ..CountdownConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_launch() {
        let s = Settings::default();
        assert!(s.notifications.emergency_alerts);
        assert!(!s.notifications.health_tips);
        assert!(s.privacy.share_location);
        assert!(!s.privacy.auto_call_911);
        assert_eq!(s.preferences.language.code(), "en");
        assert_eq!(s.preferences.theme, Theme::System);
        assert_eq!(s.countdown_config().start_seconds, 10);
    }

    #[test]
    fn apply_changes_single_field() {
        let mut s = Settings::default();
        s.apply(SettingChange::ShareLocation(false));
        assert!(!s.privacy.share_location);
        assert_eq!(s.notifications, NotificationSettings::default());

        s.apply(SettingChange::EmergencyCountdown(CountdownDuration::Thirty));
        assert_eq!(s.countdown_config().start_seconds, 30);
        assert_eq!(s.countdown_config().tick_interval_ms, 1000);
    }

    #[test]
    fn duration_from_seconds() {
        assert_eq!(CountdownDuration::try_from(15), Ok(CountdownDuration::Fifteen));
        assert!(matches!(
            CountdownDuration::try_from(12),
            Err(ValidationError::Unsupported { .. })
        ));
    }

    #[test]
    fn setting_change_wire_format() {
        let json = serde_json::to_string(&SettingChange::Theme(Theme::Dark)).unwrap();
        assert_eq!(json, r#"{"setting":"theme","value":"dark"}"#);
    }
}
