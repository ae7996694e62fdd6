use std::time::Duration;

use tripwiz_core::validation::{validate_fields, validate_payload};
use tripwiz_core::{
    Coordinate, FieldErrors, Trip, TripDraft, TripField, TripStore, TripUpdate,
    DEFAULT_COORDINATE,
};

use crate::collaborators::{ConfirmKind, Confirmer, GeolocationProvider, Navigator, Notifier};
use crate::error::WizardError;
use crate::location::LocationPicker;
use crate::steps::{Step, StepView};

/// Notification shown when a step or the final submission fails validation.
pub const INVALID_FIELDS_MESSAGE: &str = "Please fill in all required fields correctly.";

/// Delay between the success notification and leaving the wizard.
pub const DEFAULT_NAVIGATION_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardMode {
    Create,
    Edit { trip_id: u64 },
}

impl WizardMode {
    #[must_use]
    pub fn is_editing(self) -> bool {
        matches!(self, WizardMode::Edit { .. })
    }

    fn confirm_kind(self) -> ConfirmKind {
        match self {
            WizardMode::Create => ConfirmKind::CreateTrip,
            WizardMode::Edit { .. } => ConfirmKind::UpdateTrip,
        }
    }

    fn success_message(self) -> &'static str {
        match self {
            WizardMode::Create => "Trip created successfully!",
            WizardMode::Edit { .. } => "Trip updated successfully!",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            WizardMode::Create => "Failed to create trip. Please try again.",
            WizardMode::Edit { .. } => "Failed to update trip. Please try again.",
        }
    }
}

/// The draft, its inline errors, and the step being shown.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    pub current: Step,
    pub draft: TripDraft,
    pub errors: FieldErrors,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The store accepted the draft and the wizard has finished.
    Submitted(Trip),
    /// The user declined the confirmation; nothing was sent.
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Discarded,
    Kept,
}

/// Drives a trip through the four wizard steps and submits it.
///
/// Every operation takes `&mut self`, so nothing else can touch the wizard
/// while a submission or location request is awaiting.
#[derive(Debug)]
pub struct WizardController {
    mode: WizardMode,
    state: WizardState,
    picker: Option<LocationPicker>,
    fallback_location: Coordinate,
    navigation_delay: Duration,
    finished: bool,
}

impl WizardController {
    /// A create-mode wizard with both locations seeded at `origin`.
    #[must_use]
    pub fn create(origin: Coordinate) -> Self {
        Self::start(WizardMode::Create, TripDraft::new(origin))
            .with_fallback_location(origin)
    }

    /// An edit-mode wizard pre-populated from `trip`. Editing always starts
    /// on the first step.
    #[must_use]
    pub fn edit(trip: &Trip) -> Self {
        Self::start(WizardMode::Edit { trip_id: trip.id }, TripDraft::from_trip(trip))
    }

    fn start(mode: WizardMode, draft: TripDraft) -> Self {
        Self {
            mode,
            state: WizardState {
                current: Step::FIRST,
                draft,
                errors: FieldErrors::new(),
            },
            picker: None,
            fallback_location: DEFAULT_COORDINATE,
            navigation_delay: DEFAULT_NAVIGATION_DELAY,
            finished: false,
        }
    }

    /// Where the map is seeded when the draft has no usable coordinate.
    #[must_use]
    pub fn with_fallback_location(mut self, location: Coordinate) -> Self {
        self.fallback_location = location;
        self
    }

    #[must_use]
    pub fn with_navigation_delay(mut self, delay: Duration) -> Self {
        self.navigation_delay = delay;
        self
    }

    #[must_use]
    pub fn mode(&self) -> WizardMode {
        self.mode
    }

    #[must_use]
    pub fn state(&self) -> &WizardState {
        &self.state
    }

    #[must_use]
    pub fn current_step(&self) -> Step {
        self.state.current
    }

    #[must_use]
    pub fn draft(&self) -> &TripDraft {
        &self.state.draft
    }

    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.state.errors
    }

    #[must_use]
    pub fn picker(&self) -> Option<&LocationPicker> {
        self.picker.as_ref()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn render(&self) -> StepView {
        self.state.current.render(
            &self.state.draft,
            &self.state.errors,
            self.picker.as_ref(),
            self.mode.is_editing(),
        )
    }

    /// Writes `value` into the draft and re-checks that field.
    ///
    /// On a location step, a typed coordinate that parses and is in range
    /// also moves the picker marker.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Finished`] once the wizard has ended.
    pub fn edit_field(
        &mut self,
        field: TripField,
        value: impl Into<String>,
    ) -> Result<(), WizardError> {
        self.ensure_active()?;
        self.state.draft.set(field, value);
        self.revalidate(&[field]);
        self.sync_picker(field);
        Ok(())
    }

    /// Replaces the preference identifiers attached to the draft.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Finished`] once the wizard has ended.
    pub fn set_preferences(
        &mut self,
        ids: impl IntoIterator<Item = u64>,
    ) -> Result<(), WizardError> {
        self.ensure_active()?;
        self.state.draft.preferences = ids.into_iter().collect();
        Ok(())
    }

    /// Validates the current step's fields and moves forward when they pass.
    ///
    /// # Errors
    ///
    /// - [`WizardError::Validation`] when any owned field fails; the step does
    ///   not change and `notifier` receives [`INVALID_FIELDS_MESSAGE`].
    /// - [`WizardError::NotOffered`] on the last step.
    /// - [`WizardError::Finished`] once the wizard has ended.
    pub fn advance<N: Notifier>(&mut self, notifier: &N) -> Result<Step, WizardError> {
        self.ensure_active()?;
        let step = self.state.current;
        let Some(next) = step.next() else {
            return Err(WizardError::NotOffered { step, action: "next" });
        };

        let failures = self.revalidate(step.owned_fields());
        if !failures.is_empty() {
            tracing::debug!(%step, errors = %failures, "step validation failed");
            notifier.error(INVALID_FIELDS_MESSAGE);
            return Err(WizardError::Validation { step, errors: failures });
        }

        tracing::debug!(from = %step, to = %next, "step advanced");
        self.enter(next);
        Ok(next)
    }

    /// Moves back one step without validating. A no-op on the first step.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Finished`] once the wizard has ended.
    pub fn retreat(&mut self) -> Result<Step, WizardError> {
        self.ensure_active()?;
        let step = self.state.current;
        if let Some(previous) = step.previous() {
            tracing::debug!(from = %step, to = %previous, "step retreated");
            self.enter(previous);
        }
        Ok(self.state.current)
    }

    /// Places the current step's location at `at`.
    ///
    /// # Errors
    ///
    /// [`WizardError::NotOffered`] outside the location steps, and
    /// [`WizardError::Finished`] once the wizard has ended.
    pub fn click_map(&mut self, at: Coordinate) -> Result<(), WizardError> {
        self.ensure_active()?;
        let step = self.state.current;
        let (Some(target), Some(picker)) = (step.location_target(), self.picker.as_mut()) else {
            return Err(WizardError::NotOffered { step, action: "map selection" });
        };
        let draft = &mut self.state.draft;
        picker.click(at, |c| draft.set_location(target, c));
        self.revalidate(step.owned_fields());
        Ok(())
    }

    /// Asks `provider` for the current position and places the current step's
    /// location there.
    ///
    /// # Errors
    ///
    /// [`WizardError::Geolocation`] when the provider fails (the picker keeps
    /// the message for display), [`WizardError::NotOffered`] outside the
    /// location steps, and [`WizardError::Finished`] once the wizard has ended.
    pub async fn locate<G: GeolocationProvider>(
        &mut self,
        provider: &G,
    ) -> Result<Coordinate, WizardError> {
        self.ensure_active()?;
        let step = self.state.current;
        let (Some(target), Some(picker)) = (step.location_target(), self.picker.as_mut()) else {
            return Err(WizardError::NotOffered { step, action: "current location" });
        };
        let draft = &mut self.state.draft;
        let at = picker
            .locate(provider, |c| draft.set_location(target, c))
            .await?;
        self.revalidate(step.owned_fields());
        Ok(at)
    }

    /// Clears the picker's geolocation message, if any.
    pub fn dismiss_location_error(&mut self) {
        if let Some(picker) = self.picker.as_mut() {
            picker.dismiss_error();
        }
    }

    /// Confirms and submits the draft from the review step.
    ///
    /// The draft is coerced and fully validated first. After confirmation the
    /// coerced snapshot is sent to `store` (create or update, by mode). On
    /// success the wizard shows the success notification, waits for the
    /// navigation delay, asks `navigator` to leave, and finishes.
    ///
    /// # Errors
    ///
    /// - [`WizardError::Validation`] when coercion or any rule fails.
    /// - [`WizardError::Submission`] when the store rejects the request; the
    ///   error has already been shown through `notifier` and the wizard stays
    ///   on the review step so the user can retry.
    /// - [`WizardError::NotOffered`] before the review step.
    /// - [`WizardError::Finished`] once the wizard has ended.
    pub async fn submit_final<C, S, N, V>(
        &mut self,
        confirmer: &C,
        store: &S,
        notifier: &N,
        navigator: &V,
    ) -> Result<SubmitOutcome, WizardError>
    where
        C: Confirmer,
        S: TripStore,
        N: Notifier,
        V: Navigator,
    {
        self.ensure_active()?;
        let step = self.state.current;
        if !step.is_last() {
            return Err(WizardError::NotOffered { step, action: "submit" });
        }

        let checked = self
            .state
            .draft
            .coerce()
            .and_then(|payload| {
                let errors = validate_payload(&payload);
                if errors.is_empty() {
                    Ok(payload)
                } else {
                    Err(errors)
                }
            });
        let payload = match checked {
            Ok(payload) => payload,
            Err(errors) => {
                tracing::debug!(errors = %errors, "draft rejected before submission");
                self.state.errors.merge(errors.clone());
                notifier.error(INVALID_FIELDS_MESSAGE);
                return Err(WizardError::Validation { step, errors });
            }
        };

        if !confirmer.confirm(&self.mode.confirm_kind()).await.is_confirmed() {
            tracing::debug!("submission declined");
            return Ok(SubmitOutcome::Declined);
        }

        let result = match self.mode {
            WizardMode::Create => store.create_trip(&payload).await,
            WizardMode::Edit { trip_id } => {
                store.update_trip(trip_id, &TripUpdate::from(&payload)).await
            }
        };

        match result {
            Ok(trip) => {
                tracing::info!(trip_id = trip.id, mode = ?self.mode, "trip saved");
                notifier.success(self.mode.success_message());
                self.finished = true;
                tokio::time::sleep(self.navigation_delay).await;
                navigator.leave();
                Ok(SubmitOutcome::Submitted(trip))
            }
            Err(err) => {
                tracing::warn!(error = %err, mode = ?self.mode, "trip submission failed");
                notifier.error(err.user_message(self.mode.failure_message()));
                Err(WizardError::Submission(err))
            }
        }
    }

    /// Asks for confirmation and, if given, discards the draft and leaves.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::Finished`] once the wizard has ended.
    pub async fn cancel<C: Confirmer, V: Navigator>(
        &mut self,
        confirmer: &C,
        navigator: &V,
    ) -> Result<CancelOutcome, WizardError> {
        self.ensure_active()?;
        if !confirmer.confirm(&ConfirmKind::CancelChanges).await.is_confirmed() {
            return Ok(CancelOutcome::Kept);
        }
        tracing::debug!(mode = ?self.mode, "wizard cancelled");
        self.finished = true;
        self.state.draft = TripDraft::default();
        self.state.errors = FieldErrors::new();
        self.picker = None;
        navigator.leave();
        Ok(CancelOutcome::Discarded)
    }

    fn ensure_active(&self) -> Result<(), WizardError> {
        if self.finished {
            Err(WizardError::Finished)
        } else {
            Ok(())
        }
    }

    fn enter(&mut self, step: Step) {
        self.state.current = step;
        self.picker = step.location_target().map(|target| {
            LocationPicker::with_fallback(
                self.state.draft.location(target),
                self.fallback_location,
            )
        });
    }

    fn sync_picker(&mut self, field: TripField) {
        let Some(target) = self.state.current.location_target() else {
            return;
        };
        let (lat, lng) = TripField::location_pair(target);
        if field != lat && field != lng {
            return;
        }
        if let (Some(picker), Some(at)) =
            (self.picker.as_mut(), self.state.draft.location(target))
        {
            picker.move_marker(at);
        }
    }

    /// Re-checks `fields`, replacing their entries in the error map, and
    /// returns just the failures among them.
    fn revalidate(&mut self, fields: &[TripField]) -> FieldErrors {
        let fresh = validate_fields(&self.state.draft, fields);
        self.state.errors.replace_fields(fields, fresh.clone());
        fresh
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
