//! Field validation for request bodies.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .expect("email regex is valid");
}

/// A request field that failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: value is not a valid email address")]
    InvalidEmail { field: &'static str },

    #[error("{field}: field must not be empty")]
    Empty { field: &'static str },

    #[error("{field}: ensure this value has at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

pub fn email(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    max_len(field, value, max)?;
    if !is_valid_email(value) {
        return Err(ValidationError::InvalidEmail { field });
    }
    Ok(())
}

pub fn required(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    max_len(field, value, max)
}

pub fn max_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}
