use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::capabilities::{CoordinateError, LocationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Validation,
    NotFound,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    pub context: HashMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Validation => self.message.clone(),
            ErrorKind::NotFound => "The requested item could not be found.".into(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)
    }
}

impl std::error::Error for AppError {}

/// Field-level problems with user-entered records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Blank { field: &'static str },
    #[error("{field} is too long ({len} > {max})")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
    #[error("unsupported {field}: {value}")]
    Unsupported { field: &'static str, value: String },
    #[error("no {what} with id {id}")]
    NotFound { what: &'static str, id: String },
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        let message = e.to_string();
        match e {
            ValidationError::NotFound { what, id } => {
                AppError::new(ErrorKind::NotFound, message).with_context(what, id)
            }
            ValidationError::Blank { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::Unsupported { field, .. } => {
                AppError::new(ErrorKind::Validation, message).with_context("field", field)
            }
        }
    }
}

/// The device could not supply a usable position. Recovered locally: the
/// countdown always proceeds without location text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationUnavailable {
    #[error("location request failed: {0}")]
    Request(#[from] LocationError),
    #[error("device reported an invalid position: {0}")]
    InvalidFix(#[from] CoordinateError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_kinds() {
        let e: AppError = ValidationError::Blank { field: "name" }.into();
        assert_eq!(e.kind, ErrorKind::Validation);
        assert_eq!(e.user_facing_message(), "name is required");
        assert_eq!(e.context.get("field").map(String::as_str), Some("name"));

        let e: AppError = ValidationError::NotFound {
            what: "contact",
            id: "4".into(),
        }
        .into();
        assert_eq!(e.kind, ErrorKind::NotFound);
        assert_eq!(e.code(), "NOT_FOUND");
        assert_eq!(e.context.get("contact").map(String::as_str), Some("4"));
    }

    #[test]
    fn display_includes_code() {
        let e: AppError = ValidationError::TooLong {
            field: "message",
            len: 3000,
            max: 2000,
        }
        .into();
        assert_eq!(
            e.to_string(),
            "[VALIDATION_ERROR] message is too long (3000 > 2000)"
        );
    }

    #[test]
    fn location_causes_are_kept() {
        let e = LocationUnavailable::from(LocationError::Timeout);
        assert_eq!(e.to_string(), "location request failed: location request timed out");

        let e = LocationUnavailable::from(CoordinateError::NonFinite);
        assert!(matches!(e, LocationUnavailable::InvalidFix(CoordinateError::NonFinite)));
    }
}
