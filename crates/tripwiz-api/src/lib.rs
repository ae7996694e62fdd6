//! Client for the trip planner REST API (`/api/v1`).

pub mod client;
pub mod error;
pub(crate) mod retry;
pub(crate) mod types;

pub use client::TripApiClient;
pub use error::ApiError;
