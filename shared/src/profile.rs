use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BloodType {
    APositive,
    ANegative,
    BPositive,
    BNegative,
    AbPositive,
    AbNegative,
    OPositive,
    ONegative,
    #[default]
    Unknown,
}

impl BloodType {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::AbPositive => "AB+",
            Self::AbNegative => "AB-",
            Self::OPositive => "O+",
            Self::ONegative => "O-",
            Self::Unknown => "Unknown",
        }
    }
}

impl FromStr for BloodType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let blood_type = match s.trim().to_ascii_uppercase().as_str() {
            "A+" => Self::APositive,
            "A-" => Self::ANegative,
            "B+" => Self::BPositive,
            "B-" => Self::BNegative,
            "AB+" => Self::AbPositive,
            "AB-" => Self::AbNegative,
            "O+" => Self::OPositive,
            "O-" => Self::ONegative,
            "" | "UNKNOWN" => Self::Unknown,
            other => {
                return Err(ValidationError::Unsupported {
                    field: "blood type",
                    value: other.to_string(),
                })
            }
        };
        Ok(blood_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub date_of_birth: Option<String>,
    pub blood_type: BloodType,
    pub height: String,
    pub weight: String,
    pub address: String,
    pub emergency_contact: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MedicalInfo {
    pub allergies: Vec<String>,
    pub medications: Vec<Medication>,
    pub conditions: Vec<String>,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CarePreferences {
    pub language: String,
    pub religion: String,
    pub organ_donor: bool,
    pub advance_directive: bool,
}

/// What a first responder should know. Flat record, edited as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MedicalProfile {
    pub personal: PersonalInfo,
    pub medical: MedicalInfo,
    pub preferences: CarePreferences,
}

fn tidy_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl MedicalProfile {
    /// The profile a fresh install starts with, until the user edits it.
    #[must_use]
    pub fn with_defaults() -> Self {
        let medication = |name: &str, dosage: &str, reason: &str| Medication {
            name: name.into(),
            dosage: dosage.into(),
            reason: reason.into(),
        };
        Self {
            personal: PersonalInfo {
                full_name: "Alex Johnson".into(),
                date_of_birth: Some("1990-03-15".into()),
                blood_type: BloodType::OPositive,
                height: "5'8\"".into(),
                weight: "160 lbs".into(),
                address: "123 Main St, City, State 12345".into(),
                emergency_contact: "Jane Johnson - (555) 123-4567".into(),
            },
            medical: MedicalInfo {
                allergies: vec!["Penicillin".into(), "Shellfish".into(), "Latex".into()],
                medications: vec![
                    medication("Lisinopril", "10mg daily", "Blood pressure"),
                    medication("Metformin", "500mg twice daily", "Diabetes"),
                ],
                conditions: vec!["Type 2 Diabetes".into(), "Hypertension".into()],
                notes: "Prefers generic medications when available. No known drug interactions."
                    .into(),
            },
            preferences: CarePreferences {
                language: "English".into(),
                religion: "None specified".into(),
                organ_donor: true,
                advance_directive: true,
            },
        }
    }

    /// Trims text and drops empty list rows left behind by the edit form.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.personal.full_name = self.personal.full_name.trim().to_string();
        self.personal.date_of_birth = self
            .personal
            .date_of_birth
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self.medical.allergies = tidy_list(self.medical.allergies);
        self.medical.conditions = tidy_list(self.medical.conditions);
        self.medical.medications.retain(|m| !m.name.trim().is_empty());
        for m in &mut self.medical.medications {
            m.name = m.name.trim().to_string();
        }
        self.medical.notes = self.medical.notes.trim().to_string();
        self
    }

    #[must_use]
    pub fn has_allergies(&self) -> bool {
        !self.medical.allergies.is_empty()
    }
}
