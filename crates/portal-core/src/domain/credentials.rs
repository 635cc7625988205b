//! Signup and login input validation

use std::borrow::Cow;

use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::DomainError;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignupInput {
    #[serde(default)]
    #[validate(
        length(max = 15, message = "Name must be at most 15 characters."),
        custom(function = "validate_alphanumeric")
    )]
    pub name: String,

    #[serde(default)]
    #[validate(
        email(message = "Email must be a valid email address."),
        custom(function = "validate_email_domain"),
        length(max = 20, message = "Email must be at most 20 characters.")
    )]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 30, message = "Password must be at most 30 characters."))]
    pub password: String,
}

impl SignupInput {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Presence first, then shape. Reports the first problem found.
    pub fn check(&self) -> Result<(), DomainError> {
        require("Name", &self.name)?;
        require("Email", &self.email)?;
        require("Password", &self.password)?;
        self.validate()
            .map_err(|errors| DomainError::ValidationError(first_message(&errors, &["name", "email", "password"])))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginInput {
    #[serde(default)]
    #[validate(length(max = 20, message = "Email must be at most 20 characters."))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 20, message = "Password must be at most 20 characters."))]
    pub password: String,
}

impl LoginInput {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn check(&self) -> Result<(), DomainError> {
        require("Email", &self.email)?;
        require("Password", &self.password)?;
        self.validate()
            .map_err(|errors| DomainError::ValidationError(first_message(&errors, &["email", "password"])))
    }
}

fn require(label: &str, value: &str) -> Result<(), DomainError> {
    if value.is_empty() {
        return Err(DomainError::ValidationError(format!("{} is required.", label)));
    }
    Ok(())
}

fn validate_alphanumeric(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::new("alphanumeric")
            .with_message(Cow::Borrowed("Name must only contain letters and numbers.")))
    }
}

/// `validator`'s email rule accepts bare hosts such as `a@localhost`;
/// signup wants `user@domain.tld`.
fn validate_email_domain(value: &str) -> Result<(), ValidationError> {
    let dotted = match value.rsplit_once('@') {
        Some((_, domain)) => {
            domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
        }
        None => false,
    };
    if dotted {
        Ok(())
    } else {
        Err(ValidationError::new("email_domain")
            .with_message(Cow::Borrowed("Email must be a valid email address.")))
    }
}

// Field order decides which message wins when several fields fail.
fn first_message(errors: &ValidationErrors, fields: &[&str]) -> String {
    let field_errors = errors.field_errors();
    fields
        .iter()
        .filter_map(|field| field_errors.get(*field))
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid input.".to_string())
}
