//! Request-body validation helpers.
//!
//! DTOs implement [`Validate`] and handlers call it before touching any
//! service, so services only ever see well-formed input.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 8;

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

pub trait Validate {
    fn validate(&self) -> Result<(), Vec<FieldError>>;

    /// Same as [`Validate::validate`], mapped into the HTTP error type.
    fn validated(&self) -> Result<(), AppError> {
        self.validate().map_err(AppError::Validation)
    }
}

/// Collects field errors while a DTO is checked.
#[derive(Debug, Default)]
pub struct Errors(Vec<FieldError>);

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn check(&mut self, ok: bool, field: &'static str, message: &str) {
        if !ok {
            self.push(field, message);
        }
    }

    pub fn email(&mut self, field: &'static str, value: &str) {
        self.check(is_valid_email(value), field, "must be a valid email address");
    }

    pub fn not_blank(&mut self, field: &'static str, value: &str) {
        self.check(!value.trim().is_empty(), field, "must not be empty");
    }

    pub fn non_negative(&mut self, field: &'static str, value: f64) {
        self.check(value.is_finite() && value >= 0.0, field, "must be a non-negative number");
    }

    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self.0)
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Trim and lower-case an email so lookups and the unique index agree.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
