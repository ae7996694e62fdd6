//! HTTP client for the trip planner REST API.
//!
//! Wraps `reqwest` with bearer-token handling, the `{ "data": ... }` envelope,
//! server error-message extraction, and back-off retries for idempotent calls.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tripwiz_core::images::{mime_for_path, validate_image};
use tripwiz_core::{
    AppConfig, AuthResponse, ImageError, LoginRequest, Preference, ProfileUpdate,
    RegisterRequest, StoreError, Trip, TripPayload, TripStore, TripUpdate, UploadedImage, User,
};

use crate::error::ApiError;
use crate::retry::retry_with_backoff;
use crate::types::{ApiResponse, ErrorBody, ImageResponse, ImagesResponse};

const DEFAULT_USER_AGENT: &str = "tripwiz/0.1 (trip-planner)";

/// Client for the trip planner REST API.
///
/// Use [`TripApiClient::from_config`] in the binary or
/// [`TripApiClient::with_base_url`] to point at a mock server in tests.
pub struct TripApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl TripApiClient {
    /// Builds a client from the loaded application config.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the `reqwest::Client` cannot be built or
    /// [`ApiError::InvalidBaseUrl`] if the configured base URL does not parse.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        let mut client = Self::build(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?
        .with_retry(config.max_retries, config.retry_backoff_base_ms);
        client.token.clone_from(&config.api_token);
        Ok(client)
    }

    /// Creates a client with a custom base URL and no token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the `reqwest::Client` cannot be built or
    /// [`ApiError::InvalidBaseUrl`] if `base_url` is not a valid URL.
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        Self::build(base_url, timeout_secs, DEFAULT_USER_AGENT)
    }

    fn build(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `Url::join` appends endpoint paths
        // instead of replacing the last segment (`/api/v1`).
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: parsed,
            token: None,
            max_retries: 0,
            backoff_base_ms: 1_000,
        })
    }

    /// Attaches a bearer token to every subsequent request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Api`] when the credentials are rejected, or any
    /// transport / decoding error.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.post_json("auth/login", credentials).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Api`] when the server refuses the registration, or
    /// any transport / decoding error.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.post_json("auth/register", request).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status, or decoding failure.
    pub async fn profile(&self) -> Result<User, ApiError> {
        self.get_json("auth/profile").await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status, or decoding failure.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.put_json("auth/profile", update).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status, or decoding failure.
    pub async fn list_trips(&self) -> Result<Vec<Trip>, ApiError> {
        self.get_json("trips").await
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Api`] with status 404 for unknown trips, or any
    /// transport / decoding error.
    pub async fn get_trip(&self, id: u64) -> Result<Trip, ApiError> {
        self.get_json(&format!("trips/{id}")).await
    }

    /// Creates a trip. Never retried.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status, or decoding failure.
    pub async fn create_trip(&self, payload: &TripPayload) -> Result<Trip, ApiError> {
        self.post_json("trips", payload).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status, or decoding failure.
    pub async fn update_trip(&self, id: u64, update: &TripUpdate) -> Result<Trip, ApiError> {
        self.put_json(&format!("trips/{id}"), update).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport or status failure.
    pub async fn delete_trip(&self, id: u64) -> Result<(), ApiError> {
        self.delete(&format!("trips/{id}")).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status, or decoding failure.
    pub async fn list_preferences(&self) -> Result<Vec<Preference>, ApiError> {
        self.get_json("preferences").await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status, or decoding failure.
    pub async fn get_preference(&self, id: u64) -> Result<Preference, ApiError> {
        self.get_json(&format!("preferences/{id}")).await
    }

    /// Assigns preferences to the signed-in user and returns the resulting set.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status, or decoding failure.
    pub async fn assign_preferences(
        &self,
        preferences: &[Preference],
    ) -> Result<Vec<Preference>, ApiError> {
        self.post_json("preferences/assign", preferences).await
    }

    /// Uploads gallery images, optionally attached to a trip.
    ///
    /// Every file is checked locally before anything is sent.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidImage`] for unsupported or oversized files.
    /// - [`ApiError::Io`] when a file cannot be read.
    /// - [`ApiError`] on transport, status, or decoding failure.
    pub async fn upload_images(
        &self,
        paths: &[PathBuf],
        trip_id: Option<u64>,
    ) -> Result<Vec<UploadedImage>, ApiError> {
        let mut form = Form::new();
        for path in paths {
            form = form.part("images", image_part(path).await?);
        }
        if let Some(id) = trip_id {
            form = form.text("trip_id", id.to_string());
        }
        let body = self
            .send(self.request(Method::POST, "images/upload")?.multipart(form))
            .await?;
        let wrapper: ImagesResponse = decode(body, "images/upload")?;
        tracing::info!(count = wrapper.images.len(), ?trip_id, "images uploaded");
        Ok(wrapper.images)
    }

    /// Uploads a trip cover image.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidImage`] for unsupported or oversized files.
    /// - [`ApiError::Io`] when the file cannot be read.
    /// - [`ApiError`] on transport, status, or decoding failure.
    pub async fn upload_cover(&self, path: &Path) -> Result<UploadedImage, ApiError> {
        let form = Form::new().part("cover_image", image_part(path).await?);
        let body = self
            .send(self.request(Method::POST, "images/upload-cover")?.multipart(form))
            .await?;
        let wrapper: ImageResponse = decode(body, "images/upload-cover")?;
        Ok(wrapper.image)
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status, or decoding failure.
    pub async fn trip_images(&self, trip_id: u64) -> Result<Vec<UploadedImage>, ApiError> {
        let path = format!("images/trip/{trip_id}");
        let body = self.send_idempotent(Method::GET, &path, None).await?;
        Ok(decode::<ImagesResponse>(body, &path)?.images)
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status, or decoding failure.
    pub async fn my_images(&self) -> Result<Vec<UploadedImage>, ApiError> {
        let body = self
            .send_idempotent(Method::GET, "images/my-images", None)
            .await?;
        Ok(decode::<ImagesResponse>(body, "images/my-images")?.images)
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport or status failure.
    pub async fn delete_image(&self, id: u64) -> Result<(), ApiError> {
        self.delete(&format!("images/{id}")).await
    }

    /// Resolves `path` against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidBaseUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let builder = self.client.request(method, self.endpoint(path)?);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.send_idempotent(Method::GET, path, None).await?;
        unwrap_data(body, path)
    }

    async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &B,
    ) -> Result<T, ApiError> {
        let json = serde_json::to_value(payload).map_err(|e| ApiError::Deserialize {
            context: format!("encoding PUT {path}"),
            source: e,
        })?;
        let body = self.send_idempotent(Method::PUT, path, Some(&json)).await?;
        unwrap_data(body, path)
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &B,
    ) -> Result<T, ApiError> {
        let body = self
            .send(self.request(Method::POST, path)?.json(payload))
            .await?;
        unwrap_data(body, path)
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send_idempotent(Method::DELETE, path, None).await?;
        Ok(())
    }

    /// Sends a GET / PUT / DELETE, retrying transient failures.
    async fn send_idempotent(
        &self,
        method: Method,
        path: &str,
        json: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, ApiError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let method = method.clone();
            async move {
                let mut builder = self.request(method, path)?;
                if let Some(json) = json {
                    builder = builder.json(json);
                }
                self.send(builder).await
            }
        })
        .await
    }

    /// Sends the request and returns the parsed JSON body (`Null` when empty).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] for non-2xx statuses, carrying the body's
    /// `message` or `error` field when present.
    async fn send(&self, builder: RequestBuilder) -> Result<serde_json::Value, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let url = response.url().to_string();
        let body = response.text().await?;

        if !status.is_success() {
            let message = ErrorBody::message_from(&body);
            tracing::debug!(%url, status = status.as_u16(), ?message, "API request failed");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Deserialize {
            context: url,
            source: e,
        })
    }
}

impl TripStore for TripApiClient {
    async fn create_trip(&self, payload: &TripPayload) -> Result<Trip, StoreError> {
        TripApiClient::create_trip(self, payload)
            .await
            .map_err(StoreError::from)
    }

    async fn update_trip(&self, id: u64, update: &TripUpdate) -> Result<Trip, StoreError> {
        TripApiClient::update_trip(self, id, update)
            .await
            .map_err(StoreError::from)
    }
}

fn decode<T: DeserializeOwned>(body: serde_json::Value, context: &str) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| ApiError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}

fn unwrap_data<T: DeserializeOwned>(body: serde_json::Value, context: &str) -> Result<T, ApiError> {
    let envelope: ApiResponse<T> = decode(body, context)?;
    if let Some(message) = &envelope.message {
        tracing::debug!(endpoint = context, %message, "API response");
    }
    Ok(envelope.data)
}

/// Reads and checks an image file, producing a multipart part.
async fn image_part(path: &Path) -> Result<Part, ApiError> {
    let mime = mime_for_path(path).ok_or_else(|| {
        ImageError::UnsupportedType(
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default()
                .to_string(),
        )
    })?;
    let bytes = tokio::fs::read(path).await.map_err(|e| ApiError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate_image(mime, bytes.len() as u64)?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();
    Ok(Part::bytes(bytes).file_name(file_name).mime_str(mime)?)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
