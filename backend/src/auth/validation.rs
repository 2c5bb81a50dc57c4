//! Form validation for the auth endpoints.

use std::fmt;

use serde::Serialize;

use super::models::{ResetPasswordForm, SignInForm, SignUpForm, UpdatePasswordForm};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    fn check(&mut self, field: &'static str, result: Result<(), String>) {
        if let Err(message) = result {
            self.0.push(FieldError { field, message });
        }
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<_> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", fields.join("; "))
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

pub fn email(value: &str) -> Result<(), String> {
    let invalid = || Err("Please enter a valid email address".to_string());

    if value.chars().any(char::is_whitespace) {
        return invalid();
    }

    let Some((local, domain)) = value.split_once('@') else {
        return invalid();
    };

    if local.is_empty() || domain.contains('@') {
        return invalid();
    }

    let labels: Vec<_> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return invalid();
    }

    Ok(())
}

pub fn password(value: &str) -> Result<(), String> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    Ok(())
}

pub fn full_name(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("Full name is required".to_string());
    }
    Ok(())
}

impl Validate for SignUpForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.check("email", email(&self.email));
        errors.check("password", password(&self.password));
        errors.check("full_name", full_name(&self.full_name));
        errors.into_result()
    }
}

impl Validate for SignInForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.check("email", email(&self.email));
        if self.password.is_empty() {
            errors.check("password", Err("Password is required".to_string()));
        }
        errors.into_result()
    }
}

impl Validate for ResetPasswordForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.check("email", email(&self.email));
        errors.into_result()
    }
}

impl Validate for UpdatePasswordForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.check("password", password(&self.password));
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_addresses() {
        for value in ["user@example.com", "first.last+tag@sub.example.co.uk"] {
            assert!(email(value).is_ok(), "{value}");
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        for value in ["", "user", "@example.com", "user@", "user@example", "user@@example.com", "us er@example.com", "user@example..com"] {
            assert!(email(value).is_err(), "{value}");
        }
    }

    #[test]
    fn password_length_counts_characters() {
        assert!(password("12345").is_err());
        assert!(password("123456").is_ok());
        assert!(password("ééééé").is_err());
    }

    #[test]
    fn sign_up_reports_every_bad_field() {
        let form = SignUpForm {
            email: "nope".into(),
            password: "123".into(),
            full_name: "   ".into(),
        };

        let errors = form.validate().unwrap_err();
        let fields: Vec<_> = errors.0.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["email", "password", "full_name"]);
    }

    #[test]
    fn valid_sign_up_passes() {
        let form = SignUpForm {
            email: "user@example.com".into(),
            password: "correct horse".into(),
            full_name: "Ada Lovelace".into(),
        };
        assert!(form.validate().is_ok());
    }
}
