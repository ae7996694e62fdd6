//! Click-to-coordinate map widget state.

use tripwiz_core::{Coordinate, DEFAULT_COORDINATE};

use crate::collaborators::GeolocationProvider;
use crate::error::GeolocationError;

pub const DEFAULT_ZOOM: u8 = 13;

/// Zoom applied after re-centring on the device position.
pub const LOCATED_ZOOM: u8 = 15;

/// Map picker seeded at a coordinate. The marker follows clicks; the
/// viewport only moves when the current location is requested.
///
/// Both interactions take `&mut self`, so a second location request cannot
/// start while one is pending.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationPicker {
    marker: Coordinate,
    center: Coordinate,
    zoom: u8,
    error: Option<GeolocationError>,
}

impl LocationPicker {
    /// Seeds the picker at `initial`, or at [`DEFAULT_COORDINATE`] when absent.
    #[must_use]
    pub fn new(initial: Option<Coordinate>) -> Self {
        Self::with_fallback(initial, DEFAULT_COORDINATE)
    }

    #[must_use]
    pub fn with_fallback(initial: Option<Coordinate>, fallback: Coordinate) -> Self {
        let start = initial.unwrap_or(fallback);
        Self {
            marker: start,
            center: start,
            zoom: DEFAULT_ZOOM,
            error: None,
        }
    }

    /// A click on the map surface: moves the marker and reports the point.
    pub fn click(&mut self, at: Coordinate, on_change: impl FnOnce(Coordinate)) {
        self.marker = at;
        on_change(at);
    }

    /// Moves the marker without reporting, for coordinates typed elsewhere.
    pub fn move_marker(&mut self, at: Coordinate) {
        self.marker = at;
    }

    /// Requests the device position. On success the marker moves, the map
    /// re-centres, and `on_change` receives the point; on failure the cause is
    /// kept for display and the marker is left where it was.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`GeolocationError`].
    pub async fn locate<G: GeolocationProvider>(
        &mut self,
        provider: &G,
        on_change: impl FnOnce(Coordinate),
    ) -> Result<Coordinate, GeolocationError> {
        self.error = None;
        match provider.current_position().await {
            Ok(at) => {
                self.marker = at;
                self.center = at;
                self.zoom = LOCATED_ZOOM;
                on_change(at);
                Ok(at)
            }
            Err(err) => {
                tracing::debug!(error = %err, "current location unavailable");
                self.error = Some(err);
                Err(err)
            }
        }
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    #[must_use]
    pub fn marker(&self) -> Coordinate {
        self.marker
    }

    #[must_use]
    pub fn center(&self) -> Coordinate {
        self.center
    }

    #[must_use]
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    #[must_use]
    pub fn error(&self) -> Option<GeolocationError> {
        self.error
    }

    /// The "Selected Location" readout.
    #[must_use]
    pub fn readout(&self) -> String {
        format!(
            "Latitude: {:.6}\nLongitude: {:.6}",
            self.marker.latitude(),
            self.marker.longitude()
        )
    }
}
