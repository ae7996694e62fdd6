//! Field-level validation rules for trip drafts.
//!
//! Every [`TripField`] maps to one [`Rule`]. The wizard validates the fields a
//! step owns with [`validate_fields`]; a coerced [`TripPayload`] is checked
//! against the same table with [`validate_payload`] before submission.

use std::collections::BTreeMap;
use std::fmt;

use crate::trip::{parse_number, TripDraft, TripField, TripPayload};

/// Ordered mapping of field to user-visible error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors<F = TripField>(BTreeMap<F, String>);

impl<F: Ord + Copy> FieldErrors<F> {
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, field: F, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: F) -> Option<String> {
        self.0.remove(&field)
    }

    #[must_use]
    pub fn get(&self, field: F) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: F) -> bool {
        self.0.contains_key(&field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> + '_ {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    #[must_use]
    pub fn fields(&self) -> Vec<F> {
        self.0.keys().copied().collect()
    }

    /// Replaces the entries for `fields` with the entries in `fresh`; entries
    /// for other fields are left untouched.
    pub fn replace_fields(&mut self, fields: &[F], fresh: FieldErrors<F>) {
        for f in fields {
            self.0.remove(f);
        }
        self.0.extend(fresh.0);
    }

    pub fn merge(&mut self, other: FieldErrors<F>) {
        self.0.extend(other.0);
    }
}

impl<F: Ord + Copy> Default for FieldErrors<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Ord + Copy + fmt::Display> fmt::Display for FieldErrors<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Constraint attached to a single field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    Text {
        required: &'static str,
        min_len: usize,
        min_msg: &'static str,
        max_len: usize,
        max_msg: &'static str,
    },
    Number {
        required: &'static str,
        not_number: &'static str,
        whole: Option<&'static str>,
        min: f64,
        min_msg: &'static str,
        max: f64,
        max_msg: &'static str,
    },
    Optional,
}

pub const MAX_PRICE: f64 = 100_000_000.0;
pub const MIN_DURATION_DAYS: f64 = 1.0;
pub const MAX_DURATION_DAYS: f64 = 365.0;

const LATITUDE_RANGE: &str = "Latitude must be between -90 and 90";
const LONGITUDE_RANGE: &str = "Longitude must be between -180 and 180";

const fn latitude(required: &'static str) -> Rule {
    Rule::Number {
        required,
        not_number: "Latitude must be a number",
        whole: None,
        min: -90.0,
        min_msg: LATITUDE_RANGE,
        max: 90.0,
        max_msg: LATITUDE_RANGE,
    }
}

const fn longitude(required: &'static str) -> Rule {
    Rule::Number {
        required,
        not_number: "Longitude must be a number",
        whole: None,
        min: -180.0,
        min_msg: LONGITUDE_RANGE,
        max: 180.0,
        max_msg: LONGITUDE_RANGE,
    }
}

/// The rule governing `field`.
#[must_use]
pub fn rule_for(field: TripField) -> Rule {
    match field {
        TripField::Name => Rule::Text {
            required: "Trip name is required",
            min_len: 3,
            min_msg: "Trip name must be at least 3 characters long",
            max_len: 100,
            max_msg: "Trip name must not exceed 100 characters",
        },
        TripField::Description => Rule::Text {
            required: "Description is required",
            min_len: 10,
            min_msg: "Description must be at least 10 characters long",
            max_len: 1000,
            max_msg: "Description must not exceed 1000 characters",
        },
        TripField::CoverImage => Rule::Optional,
        TripField::Price => Rule::Number {
            required: "Price is required",
            not_number: "Price must be a number",
            whole: None,
            min: 0.0,
            min_msg: "Price must be greater than or equal to 0",
            max: MAX_PRICE,
            max_msg: "Price must not exceed 100,000,000 IDR",
        },
        TripField::Duration => Rule::Number {
            required: "Duration is required",
            not_number: "Duration must be a number",
            whole: Some("Duration must be a whole number of days"),
            min: MIN_DURATION_DAYS,
            min_msg: "Duration must be at least 1 day",
            max: MAX_DURATION_DAYS,
            max_msg: "Duration must not exceed 365 days",
        },
        TripField::StartLatitude => latitude("Start latitude is required"),
        TripField::StartLongitude => longitude("Start longitude is required"),
        TripField::EndLatitude => latitude("End latitude is required"),
        TripField::EndLongitude => longitude("End longitude is required"),
    }
}

impl Rule {
    /// Checks raw input text against this rule.
    ///
    /// # Errors
    ///
    /// Returns the message of the first violated constraint.
    pub fn check(&self, raw: &str) -> Result<(), &'static str> {
        match *self {
            Rule::Optional => Ok(()),
            Rule::Text {
                required,
                min_len,
                min_msg,
                max_len,
                max_msg,
            } => {
                if raw.is_empty() {
                    return Err(required);
                }
                let len = raw.chars().count();
                if len < min_len {
                    return Err(min_msg);
                }
                if len > max_len {
                    return Err(max_msg);
                }
                Ok(())
            }
            Rule::Number {
                required,
                not_number,
                ..
            } => {
                if raw.trim().is_empty() {
                    return Err(required);
                }
                let value = parse_number(raw).ok_or(not_number)?;
                self.check_number(value)
            }
        }
    }

    /// Checks an already numeric value against this rule's bounds.
    ///
    /// # Errors
    ///
    /// Returns the message of the first violated constraint.
    pub fn check_number(&self, value: f64) -> Result<(), &'static str> {
        let Rule::Number {
            not_number,
            whole,
            min,
            min_msg,
            max,
            max_msg,
            ..
        } = *self
        else {
            return Ok(());
        };
        if !value.is_finite() {
            return Err(not_number);
        }
        if let Some(whole_msg) = whole {
            if value.fract() != 0.0 {
                return Err(whole_msg);
            }
        }
        if value < min {
            return Err(min_msg);
        }
        if value > max {
            return Err(max_msg);
        }
        Ok(())
    }
}

/// Validates `fields` of `draft`, returning an entry for every failing field.
#[must_use]
pub fn validate_fields(draft: &TripDraft, fields: &[TripField]) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for &field in fields {
        if let Err(message) = rule_for(field).check(draft.get(field)) {
            errors.insert(field, message);
        }
    }
    errors
}

/// Validates every field of a coerced payload.
#[must_use]
pub fn validate_payload(payload: &TripPayload) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let mut text = |field: TripField, value: &str| {
        if let Err(message) = rule_for(field).check(value) {
            errors.insert(field, message);
        }
    };
    text(TripField::Name, &payload.name);
    text(TripField::Description, &payload.description);

    let numbers = [
        (TripField::Price, payload.price),
        (TripField::Duration, f64::from(payload.duration)),
        (TripField::StartLatitude, payload.start_latitude),
        (TripField::StartLongitude, payload.start_longitude),
        (TripField::EndLatitude, payload.end_latitude),
        (TripField::EndLongitude, payload.end_longitude),
    ];
    for (field, value) in numbers {
        if let Err(message) = rule_for(field).check_number(value) {
            errors.insert(field, message);
        }
    }
    errors
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;
