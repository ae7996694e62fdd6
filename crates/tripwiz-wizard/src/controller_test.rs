use std::time::Duration;

use chrono::{TimeZone, Utc};
use tripwiz_core::{Coordinate, LocationTarget, StoreError, Trip, TripField, TripUpdate};

use super::*;
use crate::collaborators::Confirmation;
use crate::error::GeolocationError;
use crate::test_support::{
    CountingNavigator, Notice, RecordingNotifier, RecordingStore, ScriptedConfirmer,
    ScriptedGeolocation, StoreCall,
};

fn coord(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng).unwrap()
}

fn wizard() -> WizardController {
    WizardController::create(DEFAULT_COORDINATE).with_navigation_delay(Duration::ZERO)
}

fn fill_details(w: &mut WizardController) {
    w.edit_field(TripField::Name, "Bali Getaway").unwrap();
    w.edit_field(TripField::Description, "Seven days across Ubud and Uluwatu")
        .unwrap();
    w.edit_field(TripField::Price, "5000000").unwrap();
    w.edit_field(TripField::Duration, "7").unwrap();
}

fn to_review(w: &mut WizardController) {
    let notifier = RecordingNotifier::default();
    fill_details(w);
    w.advance(&notifier).unwrap();
    w.click_map(coord(-8.65, 115.2167)).unwrap();
    w.advance(&notifier).unwrap();
    w.click_map(coord(-8.8291, 115.0849)).unwrap();
    w.advance(&notifier).unwrap();
    assert_eq!(w.current_step(), Step::Review);
}

fn existing_trip() -> Trip {
    let at = Utc.with_ymd_and_hms(2026, 1, 10, 8, 0, 0).unwrap();
    Trip {
        id: 7,
        name: "Lombok Loop".to_string(),
        description: "Beaches and waterfalls of Lombok".to_string(),
        cover_image: "/uploads/lombok.jpg".to_string(),
        price: 2_500_000.0,
        duration: 4,
        start_latitude: -8.5833,
        start_longitude: 116.1167,
        end_latitude: -8.35,
        end_longitude: 116.05,
        user_id: 3,
        user: None,
        images: Vec::new(),
        created_at: at,
        updated_at: at,
    }
}

#[test]
fn create_starts_on_first_step_with_defaults() {
    let w = wizard();
    assert_eq!(w.current_step(), Step::TripDetails);
    assert_eq!(w.mode(), WizardMode::Create);
    assert_eq!(w.draft().price, "0");
    assert_eq!(w.draft().duration, "1");
    assert!(w.errors().is_empty());
    assert!(w.picker().is_none());
}

#[test]
fn advance_with_empty_details_stays_and_notifies() {
    let mut w = wizard();
    let notifier = RecordingNotifier::default();

    let err = w.advance(&notifier).unwrap_err();
    let WizardError::Validation { step, errors } = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(step, Step::TripDetails);
    assert_eq!(errors.get(TripField::Name), Some("Trip name is required"));
    assert_eq!(errors.get(TripField::Description), Some("Description is required"));
    assert!(!errors.contains(TripField::Price));
    assert_eq!(w.current_step(), Step::TripDetails);
    assert_eq!(w.errors().get(TripField::Name), Some("Trip name is required"));
    assert_eq!(
        notifier.notices(),
        [Notice::Error(INVALID_FIELDS_MESSAGE.to_string())]
    );
}

#[test]
fn edit_revalidates_the_touched_field() {
    let mut w = wizard();
    w.edit_field(TripField::Name, "ab").unwrap();
    assert_eq!(
        w.errors().get(TripField::Name),
        Some("Trip name must be at least 3 characters long")
    );
    w.edit_field(TripField::Name, "abc").unwrap();
    assert!(w.errors().get(TripField::Name).is_none());
}

#[test]
fn valid_details_advance_and_seed_the_picker() {
    let mut w = wizard();
    fill_details(&mut w);
    let next = w.advance(&RecordingNotifier::default()).unwrap();
    assert_eq!(next, Step::StartLocation);
    let picker = w.picker().unwrap();
    assert_eq!(picker.marker(), DEFAULT_COORDINATE);
}

#[test]
fn map_click_writes_the_step_location() {
    let mut w = wizard();
    fill_details(&mut w);
    w.advance(&RecordingNotifier::default()).unwrap();
    w.click_map(coord(-8.65, 115.2167)).unwrap();
    assert_eq!(w.draft().start_latitude, "-8.65");
    assert_eq!(w.draft().start_longitude, "115.2167");
    assert_eq!(w.draft().end_latitude, DEFAULT_COORDINATE.latitude().to_string());
}

#[test]
fn map_click_is_not_offered_on_details() {
    let mut w = wizard();
    let err = w.click_map(coord(0.0, 0.0)).unwrap_err();
    assert!(matches!(
        err,
        WizardError::NotOffered { step: Step::TripDetails, .. }
    ));
}

#[test]
fn invalid_coordinate_blocks_location_step() {
    let mut w = wizard();
    fill_details(&mut w);
    let notifier = RecordingNotifier::default();
    w.advance(&notifier).unwrap();
    w.edit_field(TripField::StartLatitude, "95").unwrap();

    let err = w.advance(&notifier).unwrap_err();
    assert!(matches!(err, WizardError::Validation { step: Step::StartLocation, .. }));
    assert_eq!(w.current_step(), Step::StartLocation);
    assert_eq!(
        w.errors().get(TripField::StartLatitude),
        Some("Latitude must be between -90 and 90")
    );
}

#[test]
fn typed_coordinates_move_the_picker_marker() {
    let mut w = wizard();
    fill_details(&mut w);
    w.advance(&RecordingNotifier::default()).unwrap();

    w.edit_field(TripField::StartLatitude, "10").unwrap();
    w.edit_field(TripField::StartLongitude, "20").unwrap();

    let picker = w.picker().unwrap();
    assert_eq!(w.draft().location(LocationTarget::Start), Some(coord(10.0, 20.0)));
    assert_eq!(picker.marker(), coord(10.0, 20.0));
    assert_eq!(picker.readout(), "Latitude: 10.000000\nLongitude: 20.000000");
}

#[test]
fn unparseable_typed_coordinate_leaves_the_marker() {
    let mut w = wizard();
    fill_details(&mut w);
    w.advance(&RecordingNotifier::default()).unwrap();

    w.edit_field(TripField::StartLatitude, "95").unwrap();
    w.edit_field(TripField::StartLongitude, "abc").unwrap();
    assert_eq!(w.picker().unwrap().marker(), DEFAULT_COORDINATE);
}

#[test]
fn retreat_keeps_draft_and_errors() {
    let mut w = wizard();
    fill_details(&mut w);
    let notifier = RecordingNotifier::default();
    w.advance(&notifier).unwrap();
    w.edit_field(TripField::StartLongitude, "abc").unwrap();
    let errors_before = w.errors().clone();
    let draft_before = w.draft().clone();

    assert_eq!(w.retreat().unwrap(), Step::TripDetails);
    assert_eq!(w.errors(), &errors_before);
    assert_eq!(w.draft(), &draft_before);
    assert!(w.picker().is_none());
}

#[test]
fn retreat_on_first_step_is_a_no_op() {
    let mut w = wizard();
    w.edit_field(TripField::Name, "x").unwrap();
    let before = w.state().clone();
    assert_eq!(w.retreat().unwrap(), Step::TripDetails);
    assert_eq!(w.state(), &before);
}

#[test]
fn reentering_a_location_step_seeds_from_the_draft() {
    let mut w = wizard();
    to_review(&mut w);
    w.retreat().unwrap();
    w.retreat().unwrap();
    assert_eq!(w.current_step(), Step::StartLocation);
    assert_eq!(w.picker().unwrap().marker(), coord(-8.65, 115.2167));
}

#[test]
fn next_is_not_offered_on_review() {
    let mut w = wizard();
    to_review(&mut w);
    let err = w.advance(&RecordingNotifier::default()).unwrap_err();
    assert!(matches!(err, WizardError::NotOffered { step: Step::Review, action: "next" }));
}

#[tokio::test]
async fn locate_writes_the_device_position() {
    let mut w = wizard();
    fill_details(&mut w);
    w.advance(&RecordingNotifier::default()).unwrap();
    let here = coord(-7.25, 112.75);
    let provider = ScriptedGeolocation::new(vec![Ok(here)]);

    assert_eq!(w.locate(&provider).await.unwrap(), here);
    assert_eq!(w.draft().location(tripwiz_core::LocationTarget::Start), Some(here));
    assert_eq!(w.picker().unwrap().zoom(), crate::location::LOCATED_ZOOM);
}

#[tokio::test]
async fn locate_failure_leaves_draft_and_shows_message() {
    let mut w = wizard();
    fill_details(&mut w);
    w.advance(&RecordingNotifier::default()).unwrap();
    let before = w.draft().clone();
    let provider = ScriptedGeolocation::new(vec![Err(GeolocationError::Timeout)]);

    let err = w.locate(&provider).await.unwrap_err();
    assert!(matches!(err, WizardError::Geolocation(GeolocationError::Timeout)));
    assert_eq!(w.draft(), &before);
    let view = w.render();
    assert_eq!(
        view.location.unwrap().error.as_deref(),
        Some("Location request timed out.")
    );

    w.dismiss_location_error();
    assert!(w.picker().unwrap().error().is_none());
}

#[tokio::test]
async fn submit_before_review_is_not_offered() {
    let mut w = wizard();
    let store = RecordingStore::default();
    let err = w
        .submit_final(
            &ScriptedConfirmer::default(),
            &store,
            &RecordingNotifier::default(),
            &CountingNavigator::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, WizardError::NotOffered { action: "submit", .. }));
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn create_submission_happy_path() {
    let mut w = wizard();
    to_review(&mut w);
    let confirmer = ScriptedConfirmer::default();
    let store = RecordingStore::default();
    let notifier = RecordingNotifier::default();
    let navigator = CountingNavigator::default();

    let outcome = w
        .submit_final(&confirmer, &store, &notifier, &navigator)
        .await
        .unwrap();

    let SubmitOutcome::Submitted(trip) = outcome else {
        panic!("expected submission");
    };
    assert_eq!(trip.id, 42);
    assert_eq!(confirmer.asked(), [ConfirmKind::CreateTrip]);
    let calls = store.calls();
    let [StoreCall::Create(payload)] = calls.as_slice() else {
        panic!("expected one create call, got {calls:?}");
    };
    assert_eq!(payload.name, "Bali Getaway");
    assert!((payload.price - 5_000_000.0).abs() < f64::EPSILON);
    assert_eq!(payload.duration, 7);
    assert!((payload.end_latitude - -8.8291).abs() < 1e-9);
    assert!(payload.cover_image.is_none());
    assert_eq!(
        notifier.notices(),
        [Notice::Success("Trip created successfully!".to_string())]
    );
    assert_eq!(navigator.leaves(), 1);
    assert!(w.is_finished());
    assert!(matches!(w.retreat(), Err(WizardError::Finished)));
}

#[tokio::test]
async fn empty_price_is_submitted_as_zero() {
    let mut w = wizard();
    to_review(&mut w);
    w.edit_field(TripField::Price, "").unwrap();
    let store = RecordingStore::default();

    w.submit_final(
        &ScriptedConfirmer::default(),
        &store,
        &RecordingNotifier::default(),
        &CountingNavigator::default(),
    )
    .await
    .unwrap();

    let calls = store.calls();
    let [StoreCall::Create(payload)] = calls.as_slice() else {
        panic!("expected one create call");
    };
    assert!(payload.price.abs() < f64::EPSILON);
}

#[tokio::test]
async fn declined_confirmation_sends_nothing() {
    let mut w = wizard();
    to_review(&mut w);
    let store = RecordingStore::default();
    let navigator = CountingNavigator::default();

    let outcome = w
        .submit_final(
            &ScriptedConfirmer::new([Confirmation::Declined]),
            &store,
            &RecordingNotifier::default(),
            &navigator,
        )
        .await
        .unwrap();

    assert_eq!(outcome, SubmitOutcome::Declined);
    assert!(store.calls().is_empty());
    assert_eq!(navigator.leaves(), 0);
    assert!(!w.is_finished());
    assert_eq!(w.current_step(), Step::Review);
}

#[tokio::test]
async fn invalid_draft_is_rejected_before_confirmation() {
    let mut w = wizard();
    to_review(&mut w);
    w.edit_field(TripField::Description, "short").unwrap();
    let confirmer = ScriptedConfirmer::default();
    let store = RecordingStore::default();
    let notifier = RecordingNotifier::default();

    let err = w
        .submit_final(&confirmer, &store, &notifier, &CountingNavigator::default())
        .await
        .unwrap_err();

    let WizardError::Validation { step, errors } = err else {
        panic!("expected validation error");
    };
    assert_eq!(step, Step::Review);
    assert!(errors.contains(TripField::Description));
    assert!(confirmer.asked().is_empty());
    assert!(store.calls().is_empty());
    assert_eq!(
        notifier.notices(),
        [Notice::Error(INVALID_FIELDS_MESSAGE.to_string())]
    );
}

#[tokio::test]
async fn store_rejection_shows_server_message_and_allows_retry() {
    let mut w = wizard();
    to_review(&mut w);
    let store = RecordingStore::failing([StoreError::Rejected(
        "Trip name already exists".to_string(),
    )]);
    let notifier = RecordingNotifier::default();
    let navigator = CountingNavigator::default();
    let confirmer = ScriptedConfirmer::default();
    let draft_before = w.draft().clone();

    let err = w
        .submit_final(&confirmer, &store, &notifier, &navigator)
        .await
        .unwrap_err();
    assert!(matches!(err, WizardError::Submission(StoreError::Rejected(_))));
    assert_eq!(
        notifier.notices(),
        [Notice::Error("Trip name already exists".to_string())]
    );
    assert_eq!(w.current_step(), Step::Review);
    assert_eq!(w.draft(), &draft_before);
    assert!(!w.is_finished());
    assert_eq!(navigator.leaves(), 0);

    let outcome = w
        .submit_final(&confirmer, &store, &notifier, &navigator)
        .await
        .unwrap();
    assert!(matches!(outcome, SubmitOutcome::Submitted(_)));
    assert_eq!(store.calls().len(), 2);
    assert_eq!(navigator.leaves(), 1);
}

#[tokio::test]
async fn transport_failure_uses_fallback_message() {
    let mut w = wizard();
    to_review(&mut w);
    let store = RecordingStore::failing([StoreError::Transport("connection refused".to_string())]);
    let notifier = RecordingNotifier::default();

    let _ = w
        .submit_final(
            &ScriptedConfirmer::default(),
            &store,
            &notifier,
            &CountingNavigator::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(
        notifier.notices(),
        [Notice::Error("Failed to create trip. Please try again.".to_string())]
    );
}

#[test]
fn edit_starts_on_first_step_prefilled() {
    let w = WizardController::edit(&existing_trip());
    assert_eq!(w.mode(), WizardMode::Edit { trip_id: 7 });
    assert_eq!(w.current_step(), Step::TripDetails);
    assert_eq!(w.draft().name, "Lombok Loop");
    assert_eq!(w.draft().price, "2500000");
    assert_eq!(w.draft().duration, "4");
    assert_eq!(w.render().submit_label, "Update Trip");
}

#[tokio::test]
async fn edit_submission_sends_every_field() {
    let mut w = WizardController::edit(&existing_trip()).with_navigation_delay(Duration::ZERO);
    let notifier = RecordingNotifier::default();
    w.edit_field(TripField::Price, "3000000").unwrap();
    for _ in 0..3 {
        w.advance(&notifier).unwrap();
    }
    let confirmer = ScriptedConfirmer::default();
    let store = RecordingStore::default();
    let navigator = CountingNavigator::default();

    let outcome = w
        .submit_final(&confirmer, &store, &notifier, &navigator)
        .await
        .unwrap();

    assert!(matches!(outcome, SubmitOutcome::Submitted(ref t) if t.id == 7));
    assert_eq!(confirmer.asked(), [ConfirmKind::UpdateTrip]);
    let expected = TripUpdate {
        name: Some("Lombok Loop".to_string()),
        description: Some("Beaches and waterfalls of Lombok".to_string()),
        cover_image: Some("/uploads/lombok.jpg".to_string()),
        price: Some(3_000_000.0),
        duration: Some(4),
        start_latitude: Some(-8.5833),
        start_longitude: Some(116.1167),
        end_latitude: Some(-8.35),
        end_longitude: Some(116.05),
        preferences: Some(Vec::new()),
    };
    assert_eq!(store.calls(), [StoreCall::Update(7, expected)]);
    assert_eq!(
        notifier.notices(),
        [Notice::Success("Trip updated successfully!".to_string())]
    );
    assert_eq!(navigator.leaves(), 1);
}

#[tokio::test]
async fn edit_submission_carries_preferences_and_cleared_cover() {
    let mut w = WizardController::edit(&existing_trip()).with_navigation_delay(Duration::ZERO);
    let notifier = RecordingNotifier::default();
    w.set_preferences([4, 1]).unwrap();
    w.edit_field(TripField::CoverImage, "").unwrap();
    for _ in 0..3 {
        w.advance(&notifier).unwrap();
    }
    let store = RecordingStore::default();

    w.submit_final(
        &ScriptedConfirmer::default(),
        &store,
        &notifier,
        &CountingNavigator::default(),
    )
    .await
    .unwrap();

    let calls = store.calls();
    let [StoreCall::Update(7, update)] = calls.as_slice() else {
        panic!("expected one update call, got {calls:?}");
    };
    assert_eq!(update.preferences, Some(vec![1, 4]));
    assert_eq!(update.cover_image.as_deref(), Some(""));
}

#[tokio::test]
async fn update_failure_uses_update_fallback() {
    let mut w = WizardController::edit(&existing_trip()).with_navigation_delay(Duration::ZERO);
    let notifier = RecordingNotifier::default();
    for _ in 0..3 {
        w.advance(&notifier).unwrap();
    }
    let store = RecordingStore::failing([StoreError::Rejected(String::new())]);

    let _ = w
        .submit_final(
            &ScriptedConfirmer::default(),
            &store,
            &notifier,
            &CountingNavigator::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(
        notifier.notices(),
        [Notice::Error("Failed to update trip. Please try again.".to_string())]
    );
}

#[tokio::test]
async fn cancel_declined_keeps_everything() {
    let mut w = wizard();
    fill_details(&mut w);
    let before = w.state().clone();
    let navigator = CountingNavigator::default();
    let confirmer = ScriptedConfirmer::new([Confirmation::Declined]);

    let outcome = w.cancel(&confirmer, &navigator).await.unwrap();

    assert_eq!(outcome, CancelOutcome::Kept);
    assert_eq!(confirmer.asked(), [ConfirmKind::CancelChanges]);
    assert_eq!(w.state(), &before);
    assert_eq!(navigator.leaves(), 0);
}

#[tokio::test]
async fn cancel_confirmed_discards_and_leaves() {
    let mut w = wizard();
    fill_details(&mut w);
    let navigator = CountingNavigator::default();

    let outcome = w
        .cancel(&ScriptedConfirmer::default(), &navigator)
        .await
        .unwrap();

    assert_eq!(outcome, CancelOutcome::Discarded);
    assert_eq!(navigator.leaves(), 1);
    assert!(w.is_finished());
    assert!(w.draft().name.is_empty());
    assert!(matches!(
        w.edit_field(TripField::Name, "again"),
        Err(WizardError::Finished)
    ));
}

#[test]
fn preferences_are_carried_in_the_payload() {
    let mut w = wizard();
    w.set_preferences([3, 1, 3]).unwrap();
    fill_details(&mut w);
    let payload = w.draft().coerce().unwrap();
    assert_eq!(payload.preferences, [1, 3]);
}
