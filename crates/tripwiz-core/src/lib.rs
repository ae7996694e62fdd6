pub mod account;
mod app_config;
pub mod catalog;
mod config;
pub mod geo;
pub mod images;
pub mod store;
pub mod trip;
pub mod validation;

pub use account::{
    AccountField, AuthResponse, LoginRequest, Preference, ProfileUpdate, RegisterRequest,
    RegistrationForm, RegistrationStep, User,
};
pub use app_config::{AppConfig, Environment};
pub use catalog::{SortKey, SortOrder, SortSpec, TripQuery};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{Coordinate, CoordinateError, LocationTarget, DEFAULT_COORDINATE};
pub use images::{ImageError, ImageKind, UploadedImage};
pub use store::{StoreError, TripStore};
pub use trip::{Trip, TripDraft, TripField, TripImage, TripPayload, TripUpdate};
pub use validation::{FieldErrors, Rule};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
