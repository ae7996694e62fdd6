//! Services the wizard consumes but does not implement.
//!
//! Terminal, GUI, or test front-ends provide these; the controller only
//! depends on the contracts.

use tripwiz_core::Coordinate;

use crate::error::GeolocationError;

/// The confirmation dialogs a front-end must be able to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmKind {
    CreateTrip,
    UpdateTrip,
    CancelChanges,
    DeleteItem { name: String },
}

impl ConfirmKind {
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            ConfirmKind::CreateTrip => "Create Trip?",
            ConfirmKind::UpdateTrip => "Update Trip?",
            ConfirmKind::CancelChanges => "Cancel Changes?",
            ConfirmKind::DeleteItem { .. } => "Delete Item?",
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        match self {
            ConfirmKind::CreateTrip => "Are you sure you want to create this trip?".to_string(),
            ConfirmKind::UpdateTrip => "Are you sure you want to update this trip?".to_string(),
            ConfirmKind::CancelChanges => {
                "Are you sure you want to cancel? All changes will be lost.".to_string()
            }
            ConfirmKind::DeleteItem { name } => format!(
                "Are you sure you want to delete \"{name}\"? This action cannot be undone."
            ),
        }
    }

    #[must_use]
    pub fn confirm_label(&self) -> &'static str {
        match self {
            ConfirmKind::CreateTrip => "Yes, create it!",
            ConfirmKind::UpdateTrip => "Yes, update it!",
            ConfirmKind::CancelChanges => "Yes, cancel",
            ConfirmKind::DeleteItem { .. } => "Yes, delete it!",
        }
    }

    #[must_use]
    pub fn decline_label(&self) -> &'static str {
        match self {
            ConfirmKind::CancelChanges => "Continue editing",
            _ => "Cancel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl Confirmation {
    #[must_use]
    pub fn is_confirmed(self) -> bool {
        self == Confirmation::Confirmed
    }
}

/// Asks the user to acknowledge a submission or destructive action.
#[allow(async_fn_in_trait)]
pub trait Confirmer {
    async fn confirm(&self, kind: &ConfirmKind) -> Confirmation;
}

/// Fire-and-forget user notifications.
pub trait Notifier {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// The platform's current-location service.
#[allow(async_fn_in_trait)]
pub trait GeolocationProvider {
    /// Resolves the device position.
    ///
    /// # Errors
    ///
    /// Returns the [`GeolocationError`] cause reported by the platform.
    async fn current_position(&self) -> Result<Coordinate, GeolocationError>;
}

/// Receives the request to leave the wizard after it finishes.
pub trait Navigator {
    fn leave(&self);
}
