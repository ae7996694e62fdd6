//! The fixed four-step registry and the per-step view model.

use std::fmt;

use tripwiz_core::trip::{format_idr, parse_number};
use tripwiz_core::{FieldErrors, LocationTarget, TripDraft, TripField};

use crate::location::LocationPicker;

/// Wizard steps in order. Identifiers are 1..=4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    TripDetails,
    StartLocation,
    EndLocation,
    Review,
}

impl Step {
    pub const ALL: [Step; 4] = [
        Step::TripDetails,
        Step::StartLocation,
        Step::EndLocation,
        Step::Review,
    ];

    pub const FIRST: Step = Step::TripDetails;
    pub const LAST: Step = Step::Review;

    #[must_use]
    pub fn id(self) -> u8 {
        match self {
            Step::TripDetails => 1,
            Step::StartLocation => 2,
            Step::EndLocation => 3,
            Step::Review => 4,
        }
    }

    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Step::TripDetails => "Trip Details",
            Step::StartLocation => "Start Location",
            Step::EndLocation => "End Location",
            Step::Review => "Review",
        }
    }

    /// Intro line shown under the step heading.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Step::TripDetails => "Provide basic information about your trip.",
            Step::StartLocation => {
                "Select where your trip will begin. Click on the map to set the starting point."
            }
            Step::EndLocation => {
                "Select where your trip will end. Click on the map to set the destination."
            }
            Step::Review => "Please review all the information before creating/updating your trip.",
        }
    }

    /// Fields whose rules must pass before leaving this step forward.
    #[must_use]
    pub fn owned_fields(self) -> &'static [TripField] {
        match self {
            Step::TripDetails => &[
                TripField::Name,
                TripField::Description,
                TripField::Price,
                TripField::Duration,
            ],
            Step::StartLocation => &[TripField::StartLatitude, TripField::StartLongitude],
            Step::EndLocation => &[TripField::EndLatitude, TripField::EndLongitude],
            Step::Review => &[],
        }
    }

    /// Fields rendered as inputs on this step. The cover image is shown on the
    /// details step but carries no rule.
    #[must_use]
    pub fn input_fields(self) -> &'static [TripField] {
        match self {
            Step::TripDetails => &[
                TripField::Name,
                TripField::Description,
                TripField::Price,
                TripField::Duration,
                TripField::CoverImage,
            ],
            other => other.owned_fields(),
        }
    }

    #[must_use]
    pub fn location_target(self) -> Option<LocationTarget> {
        match self {
            Step::StartLocation => Some(LocationTarget::Start),
            Step::EndLocation => Some(LocationTarget::End),
            Step::TripDetails | Step::Review => None,
        }
    }

    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::from_id(self.id() + 1)
    }

    #[must_use]
    pub fn previous(self) -> Option<Self> {
        self.id().checked_sub(1).and_then(Self::from_id)
    }

    #[must_use]
    pub fn is_first(self) -> bool {
        self == Self::FIRST
    }

    #[must_use]
    pub fn is_last(self) -> bool {
        self == Self::LAST
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.id(), self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerState {
    Completed,
    Current,
    Upcoming,
}

/// One entry of the progress indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressMarker {
    pub id: u8,
    pub title: &'static str,
    pub state: MarkerState,
}

/// A labelled value with its inline error, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    pub field: Option<TripField>,
    pub label: &'static str,
    pub value: String,
    pub error: Option<String>,
}

/// Map state for the location steps.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationPanel {
    pub target: LocationTarget,
    pub readout: String,
    pub zoom: u8,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Previous,
    Next,
    Submit,
    Cancel,
}

/// Everything a front-end needs to draw the current step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepView {
    pub step: Step,
    pub heading: &'static str,
    pub description: &'static str,
    pub progress: Vec<ProgressMarker>,
    pub rows: Vec<FieldRow>,
    pub location: Option<LocationPanel>,
    pub actions: Vec<Action>,
    pub submit_label: &'static str,
}

impl Step {
    /// Builds the view for this step. `picker` is only consulted on the
    /// location steps.
    #[must_use]
    pub fn render(
        self,
        draft: &TripDraft,
        errors: &FieldErrors,
        picker: Option<&LocationPicker>,
        editing: bool,
    ) -> StepView {
        let progress = Self::ALL
            .into_iter()
            .map(|s| ProgressMarker {
                id: s.id(),
                title: s.title(),
                state: match s.cmp(&self) {
                    std::cmp::Ordering::Less => MarkerState::Completed,
                    std::cmp::Ordering::Equal => MarkerState::Current,
                    std::cmp::Ordering::Greater => MarkerState::Upcoming,
                },
            })
            .collect();

        let rows = if self == Step::Review {
            review_rows(draft)
        } else {
            self.input_fields()
                .iter()
                .map(|&field| FieldRow {
                    field: Some(field),
                    label: field.label(),
                    value: draft.get(field).to_string(),
                    error: errors.get(field).map(str::to_string),
                })
                .collect()
        };

        let location = self.location_target().zip(picker).map(|(target, p)| LocationPanel {
            target,
            readout: p.readout(),
            zoom: p.zoom(),
            error: p.error().map(|e| e.to_string()),
        });

        let mut actions = Vec::with_capacity(3);
        if !self.is_first() {
            actions.push(Action::Previous);
        }
        actions.push(if self.is_last() {
            Action::Submit
        } else {
            Action::Next
        });
        actions.push(Action::Cancel);

        StepView {
            step: self,
            heading: self.title(),
            description: self.description(),
            progress,
            rows,
            location,
            actions,
            submit_label: if editing { "Update Trip" } else { "Create Trip" },
        }
    }
}

fn review_rows(draft: &TripDraft) -> Vec<FieldRow> {
    let row = |label: &'static str, value: String| FieldRow {
        field: None,
        label,
        value,
        error: None,
    };
    let or_not_set = |raw: &str| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            "Not set".to_string()
        } else {
            trimmed.to_string()
        }
    };
    let location = |target: LocationTarget| {
        let (lat, lng) = TripField::location_pair(target);
        let coord = |raw: &str| {
            parse_number(raw).map_or_else(|| "Not set".to_string(), |v| format!("{v:.6}"))
        };
        format!("{}, {}", coord(draft.get(lat)), coord(draft.get(lng)))
    };

    let duration = parse_number(&draft.duration).unwrap_or(1.0);
    let unit = if (duration - 1.0).abs() < f64::EPSILON { "day" } else { "days" };

    vec![
        row("Trip Name", or_not_set(&draft.name)),
        row("Duration", format!("{duration} {unit}")),
        row("Price", format_idr(parse_number(&draft.price).unwrap_or(0.0))),
        row("Description", or_not_set(&draft.description)),
        row("Start Location", location(LocationTarget::Start)),
        row("End Location", location(LocationTarget::End)),
        row("Cover Image", or_not_set(&draft.cover_image)),
    ]
}
