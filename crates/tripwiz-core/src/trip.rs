use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::User;
use crate::geo::{Coordinate, LocationTarget};
use crate::validation::FieldErrors;

/// A trip as persisted by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: u64,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub cover_image: String,
    pub price: f64,
    pub duration: u32,
    pub start_latitude: f64,
    pub start_longitude: f64,
    pub end_latitude: f64,
    pub end_longitude: f64,
    #[serde(default)]
    pub user_id: u64,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub images: Vec<TripImage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripImage {
    pub id: u64,
    pub trip_id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Every editable field of a trip draft, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripField {
    Name,
    Description,
    CoverImage,
    Price,
    Duration,
    StartLatitude,
    StartLongitude,
    EndLatitude,
    EndLongitude,
}

impl TripField {
    pub const ALL: [TripField; 9] = [
        TripField::Name,
        TripField::Description,
        TripField::CoverImage,
        TripField::Price,
        TripField::Duration,
        TripField::StartLatitude,
        TripField::StartLongitude,
        TripField::EndLatitude,
        TripField::EndLongitude,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TripField::Name => "name",
            TripField::Description => "description",
            TripField::CoverImage => "cover_image",
            TripField::Price => "price",
            TripField::Duration => "duration",
            TripField::StartLatitude => "start_latitude",
            TripField::StartLongitude => "start_longitude",
            TripField::EndLatitude => "end_latitude",
            TripField::EndLongitude => "end_longitude",
        }
    }

    /// Human label shown next to the field.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TripField::Name => "Trip Name",
            TripField::Description => "Description",
            TripField::CoverImage => "Cover Image",
            TripField::Price => "Price (IDR)",
            TripField::Duration => "Duration (days)",
            TripField::StartLatitude => "Start Latitude",
            TripField::StartLongitude => "Start Longitude",
            TripField::EndLatitude => "End Latitude",
            TripField::EndLongitude => "End Longitude",
        }
    }

    /// The `(latitude, longitude)` field pair written for a location target.
    #[must_use]
    pub fn location_pair(target: LocationTarget) -> (TripField, TripField) {
        match target {
            LocationTarget::Start => (TripField::StartLatitude, TripField::StartLongitude),
            LocationTarget::End => (TripField::EndLatitude, TripField::EndLongitude),
        }
    }
}

impl fmt::Display for TripField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TripField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TripField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("unknown trip field '{s}'"))
    }
}

/// The in-progress trip record edited across wizard steps.
///
/// Numeric fields keep the raw input text so malformed values can exist while
/// the user is still editing. [`TripDraft::coerce`] turns the draft into a
/// typed [`TripPayload`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TripDraft {
    pub name: String,
    pub description: String,
    pub cover_image: String,
    pub price: String,
    pub duration: String,
    pub start_latitude: String,
    pub start_longitude: String,
    pub end_latitude: String,
    pub end_longitude: String,
    pub preferences: BTreeSet<u64>,
}

impl TripDraft {
    /// A blank create-mode draft with both locations placed at `origin`.
    #[must_use]
    pub fn new(origin: Coordinate) -> Self {
        let mut draft = Self {
            price: "0".to_string(),
            duration: "1".to_string(),
            ..Self::default()
        };
        draft.set_location(LocationTarget::Start, origin);
        draft.set_location(LocationTarget::End, origin);
        draft
    }

    /// An edit-mode draft pre-populated from an existing trip.
    #[must_use]
    pub fn from_trip(trip: &Trip) -> Self {
        Self {
            name: trip.name.clone(),
            description: trip.description.clone(),
            cover_image: trip.cover_image.clone(),
            price: format_number(trip.price),
            duration: trip.duration.to_string(),
            start_latitude: format_number(trip.start_latitude),
            start_longitude: format_number(trip.start_longitude),
            end_latitude: format_number(trip.end_latitude),
            end_longitude: format_number(trip.end_longitude),
            preferences: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn get(&self, field: TripField) -> &str {
        match field {
            TripField::Name => &self.name,
            TripField::Description => &self.description,
            TripField::CoverImage => &self.cover_image,
            TripField::Price => &self.price,
            TripField::Duration => &self.duration,
            TripField::StartLatitude => &self.start_latitude,
            TripField::StartLongitude => &self.start_longitude,
            TripField::EndLatitude => &self.end_latitude,
            TripField::EndLongitude => &self.end_longitude,
        }
    }

    pub fn set(&mut self, field: TripField, value: impl Into<String>) {
        let value = value.into();
        match field {
            TripField::Name => self.name = value,
            TripField::Description => self.description = value,
            TripField::CoverImage => self.cover_image = value,
            TripField::Price => self.price = value,
            TripField::Duration => self.duration = value,
            TripField::StartLatitude => self.start_latitude = value,
            TripField::StartLongitude => self.start_longitude = value,
            TripField::EndLatitude => self.end_latitude = value,
            TripField::EndLongitude => self.end_longitude = value,
        }
    }

    pub fn set_location(&mut self, target: LocationTarget, coordinate: Coordinate) {
        let (lat, lng) = TripField::location_pair(target);
        self.set(lat, format_number(coordinate.latitude()));
        self.set(lng, format_number(coordinate.longitude()));
    }

    /// The coordinate currently held for `target`, if both components parse
    /// and are in range.
    #[must_use]
    pub fn location(&self, target: LocationTarget) -> Option<Coordinate> {
        let (lat, lng) = TripField::location_pair(target);
        let lat = parse_number(self.get(lat))?;
        let lng = parse_number(self.get(lng))?;
        Coordinate::new(lat, lng).ok()
    }

    /// Converts the draft into a typed payload.
    ///
    /// A malformed or zero duration becomes `1` and a malformed price becomes
    /// `0`. Coordinates have no default, so unparseable coordinates are
    /// reported as field errors. Range checks are left to
    /// [`crate::validation::validate_payload`].
    ///
    /// # Errors
    ///
    /// Returns the fields whose text cannot be represented in the payload.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn coerce(&self) -> Result<TripPayload, FieldErrors<TripField>> {
        let mut errors = FieldErrors::new();

        let price = parse_number(&self.price).unwrap_or(0.0);

        let duration = match parse_number(&self.duration) {
            None => 1,
            Some(d) if d == 0.0 => 1,
            Some(d) if d < 1.0 => {
                errors.insert(TripField::Duration, "Duration must be at least 1 day");
                1
            }
            Some(d) if d.fract() != 0.0 || d > f64::from(u32::MAX) => {
                errors.insert(
                    TripField::Duration,
                    "Duration must be a whole number of days",
                );
                1
            }
            Some(d) => d as u32,
        };

        let mut coordinate = |field: TripField, message: &str| -> f64 {
            parse_number(self.get(field)).unwrap_or_else(|| {
                errors.insert(field, message);
                0.0
            })
        };
        let start_latitude = coordinate(TripField::StartLatitude, "Latitude must be a number");
        let start_longitude = coordinate(TripField::StartLongitude, "Longitude must be a number");
        let end_latitude = coordinate(TripField::EndLatitude, "Latitude must be a number");
        let end_longitude = coordinate(TripField::EndLongitude, "Longitude must be a number");

        if !errors.is_empty() {
            return Err(errors);
        }

        let cover_image = self.cover_image.trim();
        Ok(TripPayload {
            name: self.name.clone(),
            description: self.description.clone(),
            cover_image: (!cover_image.is_empty()).then(|| cover_image.to_string()),
            price,
            duration,
            start_latitude,
            start_longitude,
            end_latitude,
            end_longitude,
            preferences: self.preferences.iter().copied().collect(),
        })
    }
}

/// Request body for creating a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPayload {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub price: f64,
    pub duration: u32,
    pub start_latitude: f64,
    pub start_longitude: f64,
    pub end_latitude: f64,
    pub end_longitude: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferences: Vec<u64>,
}

/// Request body for updating a trip; absent fields are left unchanged.
///
/// Built from a payload, every field is present: an empty `cover_image`
/// removes the cover and an empty `preferences` list clears them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TripUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Vec<u64>>,
}

impl From<&TripPayload> for TripUpdate {
    fn from(p: &TripPayload) -> Self {
        Self {
            name: Some(p.name.clone()),
            description: Some(p.description.clone()),
            cover_image: Some(p.cover_image.clone().unwrap_or_default()),
            price: Some(p.price),
            duration: Some(p.duration),
            start_latitude: Some(p.start_latitude),
            start_longitude: Some(p.start_longitude),
            end_latitude: Some(p.end_latitude),
            end_longitude: Some(p.end_longitude),
            preferences: Some(p.preferences.clone()),
        }
    }
}

/// Parses user-entered numeric text. Empty, non-numeric and non-finite input
/// yields `None`.
#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Shortest text that parses back to the same `f64`.
#[must_use]
pub fn format_number(value: f64) -> String {
    value.to_string()
}

/// Formats an amount as Indonesian Rupiah, e.g. `Rp 5.000.000`.
#[must_use]
pub fn format_idr(amount: f64) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-Rp {grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

#[cfg(test)]
#[path = "trip_test.rs"]
mod tests;
