//! The multi-step trip wizard: step registry, draft state machine, map
//! picker, and the collaborator contracts a front-end implements.

pub mod collaborators;
mod controller;
mod error;
pub mod location;
pub mod steps;

#[cfg(test)]
mod test_support;

pub use collaborators::{
    ConfirmKind, Confirmation, Confirmer, GeolocationProvider, Navigator, Notifier,
};
pub use controller::{
    CancelOutcome, SubmitOutcome, WizardController, WizardMode, WizardState,
    DEFAULT_NAVIGATION_DELAY, INVALID_FIELDS_MESSAGE,
};
pub use error::{GeolocationError, WizardError};
pub use location::LocationPicker;
pub use steps::{Action, Step, StepView};
