//! Scripted collaborators for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use tripwiz_core::{Coordinate, StoreError, Trip, TripPayload, TripStore, TripUpdate};

use crate::collaborators::{
    ConfirmKind, Confirmation, Confirmer, GeolocationProvider, Navigator, Notifier,
};
use crate::error::GeolocationError;

/// Answers confirmations from a script, then confirms everything.
#[derive(Default)]
pub struct ScriptedConfirmer {
    answers: Mutex<VecDeque<Confirmation>>,
    asked: Mutex<Vec<ConfirmKind>>,
}

impl ScriptedConfirmer {
    pub fn new(answers: impl IntoIterator<Item = Confirmation>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<ConfirmKind> {
        self.asked.lock().unwrap().clone()
    }
}

impl Confirmer for ScriptedConfirmer {
    async fn confirm(&self, kind: &ConfirmKind) -> Confirmation {
        self.asked.lock().unwrap().push(kind.clone());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Confirmation::Confirmed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push(Notice::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push(Notice::Error(message.to_string()));
    }
}

#[derive(Default)]
pub struct CountingNavigator {
    leaves: AtomicUsize,
}

impl CountingNavigator {
    pub fn leaves(&self) -> usize {
        self.leaves.load(Ordering::SeqCst)
    }
}

impl Navigator for CountingNavigator {
    fn leave(&self) {
        self.leaves.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct ScriptedGeolocation {
    results: Mutex<VecDeque<Result<Coordinate, GeolocationError>>>,
}

impl ScriptedGeolocation {
    pub fn new(results: Vec<Result<Coordinate, GeolocationError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
        }
    }
}

impl GeolocationProvider for ScriptedGeolocation {
    async fn current_position(&self) -> Result<Coordinate, GeolocationError> {
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GeolocationError::Unsupported))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Create(TripPayload),
    Update(u64, TripUpdate),
}

/// Records calls and replays scripted failures before succeeding.
#[derive(Default)]
pub struct RecordingStore {
    failures: Mutex<VecDeque<StoreError>>,
    calls: Mutex<Vec<StoreCall>>,
}

impl RecordingStore {
    pub fn failing(failures: impl IntoIterator<Item = StoreError>) -> Self {
        Self {
            failures: Mutex::new(failures.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    fn next_failure(&self) -> Option<StoreError> {
        self.failures.lock().unwrap().pop_front()
    }
}

pub fn trip_from(id: u64, payload: &TripPayload) -> Trip {
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    Trip {
        id,
        name: payload.name.clone(),
        description: payload.description.clone(),
        cover_image: payload.cover_image.clone().unwrap_or_default(),
        price: payload.price,
        duration: payload.duration,
        start_latitude: payload.start_latitude,
        start_longitude: payload.start_longitude,
        end_latitude: payload.end_latitude,
        end_longitude: payload.end_longitude,
        user_id: 1,
        user: None,
        images: Vec::new(),
        created_at: at,
        updated_at: at,
    }
}

impl TripStore for RecordingStore {
    async fn create_trip(&self, payload: &TripPayload) -> Result<Trip, StoreError> {
        self.calls
            .lock()
            .unwrap()
            .push(StoreCall::Create(payload.clone()));
        match self.next_failure() {
            Some(err) => Err(err),
            None => Ok(trip_from(42, payload)),
        }
    }

    async fn update_trip(&self, id: u64, update: &TripUpdate) -> Result<Trip, StoreError> {
        self.calls
            .lock()
            .unwrap()
            .push(StoreCall::Update(id, update.clone()));
        if let Some(err) = self.next_failure() {
            return Err(err);
        }
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        Ok(Trip {
            id,
            name: update.name.clone().unwrap_or_default(),
            description: update.description.clone().unwrap_or_default(),
            cover_image: update.cover_image.clone().unwrap_or_default(),
            price: update.price.unwrap_or_default(),
            duration: update.duration.unwrap_or(1),
            start_latitude: update.start_latitude.unwrap_or_default(),
            start_longitude: update.start_longitude.unwrap_or_default(),
            end_latitude: update.end_latitude.unwrap_or_default(),
            end_longitude: update.end_longitude.unwrap_or_default(),
            user_id: 1,
            user: None,
            images: Vec::new(),
            created_at: at,
            updated_at: at,
        })
    }
}
