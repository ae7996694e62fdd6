use super::*;
use crate::geo::DEFAULT_COORDINATE;

fn sample_trip() -> Trip {
    serde_json::from_value(serde_json::json!({
        "id": 42,
        "name": "Bali Trip",
        "description": "A wonderful week in Bali",
        "cover_image": "/uploads/covers/bali.jpg",
        "price": 5_000_000.0,
        "duration": 7,
        "start_latitude": -8.409518,
        "start_longitude": 115.188919,
        "end_latitude": -8.3405,
        "end_longitude": 115.092,
        "user_id": 3,
        "created_at": "2025-03-01T10:00:00Z",
        "updated_at": "2025-03-02T10:00:00Z"
    }))
    .expect("fixture should deserialize")
}

#[test]
fn new_draft_uses_origin_and_defaults() {
    let d = TripDraft::new(DEFAULT_COORDINATE);
    assert_eq!(d.price, "0");
    assert_eq!(d.duration, "1");
    assert_eq!(d.start_latitude, "-6.2");
    assert_eq!(d.end_longitude, "106.816666");
    assert!(d.name.is_empty());
}

#[test]
fn prefill_round_trips_through_coercion() {
    let trip = sample_trip();
    let payload = TripDraft::from_trip(&trip).coerce().expect("prefill is valid");
    assert_eq!(payload.name, trip.name);
    assert_eq!(payload.description, trip.description);
    assert_eq!(payload.cover_image.as_deref(), Some("/uploads/covers/bali.jpg"));
    assert_eq!(payload.price, trip.price);
    assert_eq!(payload.duration, trip.duration);
    assert_eq!(payload.start_latitude, trip.start_latitude);
    assert_eq!(payload.start_longitude, trip.start_longitude);
    assert_eq!(payload.end_latitude, trip.end_latitude);
    assert_eq!(payload.end_longitude, trip.end_longitude);
}

#[test]
fn empty_price_coerces_to_zero() {
    let mut d = TripDraft::new(DEFAULT_COORDINATE);
    d.price = String::new();
    assert_eq!(d.coerce().unwrap().price, 0.0);
}

#[test]
fn malformed_duration_coerces_to_one() {
    let mut d = TripDraft::new(DEFAULT_COORDINATE);
    d.duration = "a week".to_string();
    assert_eq!(d.coerce().unwrap().duration, 1);
    d.duration = "0".to_string();
    assert_eq!(d.coerce().unwrap().duration, 1);
}

#[test]
fn fractional_duration_is_a_coercion_error() {
    let mut d = TripDraft::new(DEFAULT_COORDINATE);
    d.duration = "2.5".to_string();
    let errors = d.coerce().unwrap_err();
    assert_eq!(
        errors.get(TripField::Duration),
        Some("Duration must be a whole number of days")
    );
}

#[test]
fn malformed_coordinate_is_a_coercion_error() {
    let mut d = TripDraft::new(DEFAULT_COORDINATE);
    d.end_longitude = "east".to_string();
    let errors = d.coerce().unwrap_err();
    assert_eq!(errors.fields(), vec![TripField::EndLongitude]);
}

#[test]
fn blank_cover_image_is_omitted() {
    let d = TripDraft::new(DEFAULT_COORDINATE);
    let payload = d.coerce().unwrap();
    assert!(payload.cover_image.is_none());
    let json = serde_json::to_value(&payload).unwrap();
    assert!(json.get("cover_image").is_none());
    assert!(json.get("preferences").is_none());
}

#[test]
fn set_location_writes_both_fields() {
    let mut d = TripDraft::new(DEFAULT_COORDINATE);
    let bandung = Coordinate::new(-6.9175, 107.6191).unwrap();
    d.set_location(LocationTarget::End, bandung);
    assert_eq!(d.end_latitude, "-6.9175");
    assert_eq!(d.end_longitude, "107.6191");
    assert_eq!(d.location(LocationTarget::End), Some(bandung));
    assert_eq!(d.location(LocationTarget::Start), Some(DEFAULT_COORDINATE));
}

#[test]
fn field_names_parse() {
    assert_eq!("start_latitude".parse::<TripField>(), Ok(TripField::StartLatitude));
    assert!("latitude".parse::<TripField>().is_err());
}

#[test]
fn update_from_payload_sets_every_field() {
    let payload = TripDraft::from_trip(&sample_trip()).coerce().unwrap();
    let update = TripUpdate::from(&payload);
    assert_eq!(update.name.as_deref(), Some("Bali Trip"));
    assert_eq!(update.duration, Some(7));
    assert_eq!(update.end_latitude, Some(-8.3405));
    assert_eq!(update.preferences, Some(Vec::new()));
}

#[test]
fn update_sends_cleared_cover_and_preferences() {
    let mut d = TripDraft::from_trip(&sample_trip());
    d.cover_image.clear();
    d.preferences = [4, 1].into_iter().collect();
    let update = TripUpdate::from(&d.coerce().unwrap());
    let json = serde_json::to_value(&update).unwrap();
    assert_eq!(json["cover_image"], "");
    assert_eq!(json["preferences"], serde_json::json!([1, 4]));
}

#[test]
fn formats_rupiah() {
    assert_eq!(format_idr(5_000_000.0), "Rp 5.000.000");
    assert_eq!(format_idr(0.0), "Rp 0");
    assert_eq!(format_idr(999.6), "Rp 1.000");
    assert_eq!(format_idr(-1500.0), "-Rp 1.500");
}
