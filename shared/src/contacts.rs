use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::MAX_FIELD_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContactId(pub u64);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContactCategory {
    Medical,
    #[default]
    Family,
    Work,
    Other,
}

/// Form input for adding or editing a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ContactDraft {
    pub name: String,
    pub phone: String,
    pub relationship: String,
    pub category: ContactCategory,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub phone: String,
    pub relationship: String,
    pub category: ContactCategory,
    pub address: Option<String>,
}

impl Contact {
    /// `tel:` URI for the shell's dialer. Keeps only dialable characters.
    #[must_use]
    pub fn dial_uri(&self) -> String {
        dial_uri(&self.phone)
    }
}

#[must_use]
pub fn dial_uri(phone: &str) -> String {
    let digits: String = phone
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '*' | '#'))
        .collect();
    format!("tel:{digits}")
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = optional(field, value)?;
    value.ok_or(ValidationError::Blank { field })
}

fn optional(field: &'static str, value: &str) -> Result<Option<String>, ValidationError> {
    let trimmed = value.trim();
    if trimmed.len() > MAX_FIELD_LEN {
        return Err(ValidationError::TooLong {
            field,
            len: trimmed.len(),
            max: MAX_FIELD_LEN,
        });
    }
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

impl ContactDraft {
    fn validate(&self, id: ContactId) -> Result<Contact, ValidationError> {
        Ok(Contact {
            id,
            name: required("name", &self.name)?,
            phone: required("phone", &self.phone)?,
            relationship: optional("relationship", &self.relationship)?.unwrap_or_default(),
            category: self.category,
            address: match &self.address {
                Some(address) => optional("address", address)?,
                None => None,
            },
        })
    }
}

const DEFAULT_CONTACTS: [(&str, &str, &str, ContactCategory, &str); 3] = [
    (
        "Dr. Sarah Johnson",
        "(555) 123-4567",
        "Primary Doctor",
        ContactCategory::Medical,
        "123 Medical Center Dr",
    ),
    (
        "John Smith",
        "(555) 987-6543",
        "Emergency Contact",
        ContactCategory::Family,
        "456 Main St",
    ),
    (
        "City Hospital ER",
        "(555) 456-7890",
        "Nearest Hospital",
        ContactCategory::Medical,
        "789 Hospital Blvd",
    ),
];

/// Personal contacts held in memory for the lifetime of the app.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContactBook {
    contacts: Vec<Contact>,
    next_id: u64,
}

impl ContactBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The book a fresh install starts with.
    #[must_use]
    pub fn with_defaults() -> Self {
        let contacts: Vec<Contact> = DEFAULT_CONTACTS
            .iter()
            .zip(1..)
            .map(|(&(name, phone, relationship, category, address), id)| Contact {
                id: ContactId(id),
                name: name.to_string(),
                phone: phone.to_string(),
                relationship: relationship.to_string(),
                category,
                address: Some(address.to_string()),
            })
            .collect();
        let next_id = contacts.last().map_or(0, |c| c.id.0);
        Self { contacts, next_id }
    }

    pub fn add(&mut self, draft: &ContactDraft) -> Result<ContactId, ValidationError> {
        let id = ContactId(self.next_id + 1);
        let contact = draft.validate(id)?;
        self.next_id += 1;
        self.contacts.push(contact);
        Ok(id)
    }

    pub fn update(&mut self, id: ContactId, draft: &ContactDraft) -> Result<(), ValidationError> {
        let slot = self
            .contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found(id))?;
        *slot = draft.validate(id)?;
        Ok(())
    }

    pub fn remove(&mut self, id: ContactId) -> Result<Contact, ValidationError> {
        let index = self
            .contacts
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| not_found(id))?;
        Ok(self.contacts.remove(index))
    }

    #[must_use]
    pub fn get(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

fn not_found(id: ContactId) -> ValidationError {
    ValidationError::NotFound {
        what: "contact",
        id: id.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmergencyService {
    pub name: &'static str,
    pub number: &'static str,
    pub description: &'static str,
}

pub const EMERGENCY_SERVICES: [EmergencyService; 4] = [
    EmergencyService {
        name: "Emergency Services",
        number: "911",
        description: "Police, Fire, Medical Emergency",
    },
    EmergencyService {
        name: "Poison Control",
        number: "1-800-222-1222",
        description: "24/7 Poison Emergency Hotline",
    },
    EmergencyService {
        name: "Crisis Text Line",
        number: "Text HOME to 741741",
        description: "Mental Health Crisis Support",
    },
    EmergencyService {
        name: "Suicide Prevention",
        number: "988",
        description: "24/7 Suicide & Crisis Lifeline",
    },
];
