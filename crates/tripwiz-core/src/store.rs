//! The persistence seam the wizard submits through.

use thiserror::Error;

use crate::trip::{Trip, TripPayload, TripUpdate};

/// Failure reported by a [`TripStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The service refused the request and said why.
    #[error("{0}")]
    Rejected(String),

    /// The request never produced a usable answer.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl StoreError {
    /// The server-provided message when there is one, otherwise `fallback`.
    #[must_use]
    pub fn user_message<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            StoreError::Rejected(message) if !message.trim().is_empty() => message,
            _ => fallback,
        }
    }
}

/// Trip persistence service.
#[allow(async_fn_in_trait)]
pub trait TripStore {
    /// Persists a new trip.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the service rejects or cannot be reached.
    async fn create_trip(&self, payload: &TripPayload) -> Result<Trip, StoreError>;

    /// Applies `update` to the trip with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the service rejects or cannot be reached.
    async fn update_trip(&self, id: u64, update: &TripUpdate) -> Result<Trip, StoreError>;
}
