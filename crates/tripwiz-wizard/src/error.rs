use thiserror::Error;
use tripwiz_core::{FieldErrors, StoreError};

use crate::steps::Step;

/// Errors returned by [`crate::WizardController`] operations.
///
/// None of these end the wizard: the draft and current step are left intact
/// so the user can correct the input or retry.
#[derive(Debug, Error)]
pub enum WizardError {
    /// One or more fields failed their rule; `errors` holds the failures.
    #[error("{step} has invalid fields: {errors}")]
    Validation { step: Step, errors: FieldErrors },

    /// The requested action is not available on the current step.
    #[error("{action} is not available on {step}")]
    NotOffered { step: Step, action: &'static str },

    #[error("trip submission failed: {0}")]
    Submission(#[from] StoreError),

    #[error("{0}")]
    Geolocation(#[from] GeolocationError),

    /// The wizard was already submitted or cancelled.
    #[error("the wizard has already finished")]
    Finished,
}

/// Why the current position could not be determined. The `Display` text is
/// shown to the user as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Location access denied by user.")]
    PermissionDenied,

    #[error("Location information is unavailable.")]
    PositionUnavailable,

    #[error("Location request timed out.")]
    Timeout,

    #[error("Geolocation is not supported on this platform.")]
    Unsupported,
}
