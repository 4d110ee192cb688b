use serde::{Deserialize, Serialize};

use crate::validation::{normalize_email, Errors, FieldError, Validate, MIN_PASSWORD_LEN};

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn normalize(&mut self) {
        self.email = normalize_email(&self.email);
    }
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errs = Errors::new();
        errs.email("email", &self.email);
        errs.check(!self.password.is_empty(), "password", "must not be empty");
        errs.finish()
    }
}

/// Request body for signup and `/users/register`.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl SignupRequest {
    pub fn normalize(&mut self) {
        self.email = normalize_email(&self.email);
        self.name = self.name.trim().to_string();
    }
}

impl Validate for SignupRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errs = Errors::new();
        errs.email("email", &self.email);
        errs.not_blank("name", &self.name);
        errs.check(
            self.password.chars().count() >= MIN_PASSWORD_LEN,
            "password",
            "must be at least 8 characters",
        );
        errs.finish()
    }
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_collects_every_field_error() {
        let req = SignupRequest {
            email: "nope".into(),
            name: " ".into(),
            password: "short".into(),
        };
        let errs = req.validate().unwrap_err();
        let fields: Vec<_> = errs.iter().map(|e| e.field).collect();
        assert_eq!(fields, ["email", "name", "password"]);
    }

    #[test]
    fn signup_normalizes_before_validation() {
        let mut req = SignupRequest {
            email: "  A@X.COM ".into(),
            name: " A ".into(),
            password: "pw123456".into(),
        };
        req.normalize();
        assert_eq!(req.email, "a@x.com");
        assert_eq!(req.name, "A");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn login_requires_password() {
        let req = LoginRequest {
            email: "a@x.com".into(),
            password: String::new(),
        };
        assert_eq!(req.validate().unwrap_err()[0].field, "password");
    }

    #[test]
    fn token_response_uses_snake_case_key() {
        let json = serde_json::to_value(TokenResponse {
            access_token: "t".into(),
        })
        .unwrap();
        assert_eq!(json["access_token"], "t");
    }
}
