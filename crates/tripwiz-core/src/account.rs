//! Accounts, preferences, and the login / registration form rules.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::validation::FieldErrors;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("valid name regex"));

const PASSWORD_SYMBOLS: &str = "@$!%*#?&";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A travel preference tag that users and trips can reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    #[serde(rename = "ID")]
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AccountField {
    Name,
    Email,
    Password,
    ConfirmPassword,
    Role,
}

impl fmt::Display for AccountField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AccountField::Name => "name",
            AccountField::Email => "email",
            AccountField::Password => "password",
            AccountField::ConfirmPassword => "confirm_password",
            AccountField::Role => "role",
        })
    }
}

impl LoginRequest {
    /// Validates the login form.
    #[must_use]
    pub fn validate(&self) -> FieldErrors<AccountField> {
        let mut errors = FieldErrors::new();
        if self.email.is_empty() {
            errors.insert(AccountField::Email, "Email is required");
        } else if !EMAIL_RE.is_match(&self.email) {
            errors.insert(AccountField::Email, "Email is invalid");
        }
        if self.password.is_empty() {
            errors.insert(AccountField::Password, "Password is required");
        } else if self.password.chars().count() < 6 {
            errors.insert(
                AccountField::Password,
                "Password must be at least 6 characters",
            );
        }
        errors
    }
}

/// Steps of the registration form, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStep {
    Identity,
    Password,
    Role,
}

impl RegistrationStep {
    pub const ALL: [RegistrationStep; 3] = [
        RegistrationStep::Identity,
        RegistrationStep::Password,
        RegistrationStep::Role,
    ];

    #[must_use]
    pub fn fields(self) -> &'static [AccountField] {
        match self {
            RegistrationStep::Identity => &[AccountField::Name, AccountField::Email],
            RegistrationStep::Password => &[AccountField::Password, AccountField::ConfirmPassword],
            RegistrationStep::Role => &[AccountField::Role],
        }
    }
}

/// Registration form contents, including the confirmation field that never
/// leaves the client.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: String,
}

impl RegistrationForm {
    /// Validates only the fields owned by `step`.
    #[must_use]
    pub fn validate_step(&self, step: RegistrationStep) -> FieldErrors<AccountField> {
        let mut errors = FieldErrors::new();
        for &field in step.fields() {
            if let Err(message) = self.check(field) {
                errors.insert(field, message);
            }
        }
        errors
    }

    /// Validates every step; used right before submitting.
    #[must_use]
    pub fn validate(&self) -> FieldErrors<AccountField> {
        let mut errors = FieldErrors::new();
        for step in RegistrationStep::ALL {
            errors.merge(self.validate_step(step));
        }
        errors
    }

    fn check(&self, field: AccountField) -> Result<(), &'static str> {
        match field {
            AccountField::Name => {
                if self.name.is_empty() {
                    Err("Name is required")
                } else if self.name.chars().count() < 2 {
                    Err("Name must be at least 2 characters")
                } else if !NAME_RE.is_match(&self.name) {
                    Err("Name can only contain letters and spaces")
                } else {
                    Ok(())
                }
            }
            AccountField::Email => {
                if self.email.is_empty() {
                    Err("Email is required")
                } else if !EMAIL_RE.is_match(&self.email) {
                    Err("Please enter a valid email address")
                } else {
                    Ok(())
                }
            }
            AccountField::Password => check_new_password(&self.password),
            AccountField::ConfirmPassword => {
                if self.confirm_password.is_empty() {
                    Err("Please confirm your password")
                } else if self.confirm_password != self.password {
                    Err("Passwords do not match")
                } else {
                    Ok(())
                }
            }
            AccountField::Role => {
                if self.role.trim().is_empty() {
                    Err("Please select a role")
                } else {
                    Ok(())
                }
            }
        }
    }

    #[must_use]
    pub fn into_request(self) -> RegisterRequest {
        RegisterRequest {
            name: self.name,
            email: self.email,
            password: self.password,
            role: self.role,
        }
    }
}

fn check_new_password(password: &str) -> Result<(), &'static str> {
    if password.is_empty() {
        return Err("Password is required");
    }
    if password.chars().count() < 6 {
        return Err("Password must be at least 6 characters");
    }
    let allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SYMBOLS.contains(c));
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(allowed && has_letter && has_digit) {
        return Err("Password must contain at least one letter and one number");
    }
    Ok(())
}

/// Rough password strength on a 0..=4 scale, by length.
#[must_use]
pub fn password_strength(password: &str) -> u8 {
    match password.chars().count() {
        0..=1 => 0,
        2..=3 => 1,
        4..=7 => 2,
        8..=11 => 3,
        _ => 4,
    }
}
