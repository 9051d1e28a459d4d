use std::sync::{Arc, RwLock};

use anyhow::{anyhow, Result};
use http::header;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use api::path;
use api::request::{
    AssignAlert, CreateAlert, Login, NewIncidentUpdate, UpdateCameraStatus, UpdateIncident,
};
use api::response::{
    Alert, ApiResponse, AssignResponse, Camera, CameraStatus, Health, Incident, IncidentStatus,
    IncidentUpdate, LoginResponse, Premise, StreamResponse, User,
};

pub mod store;

/// Typed client for the guardpost gateway. All calls go through the
/// `/api` proxy path. The session token minted by `login` is held as an
/// explicit session context and replayed as the session cookie on every
/// call; the gateway's cookie remains the sole persistence boundary.
#[derive(Clone)]
pub struct Client {
    url: String,
    http: reqwest::Client,
    session: Arc<RwLock<Option<String>>>,
}

impl Client {
    /// `url` is the gateway origin, e.g. `http://127.0.0.1:7777`.
    pub fn new(url: String) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            http,
            session: Arc::new(RwLock::new(None)),
        })
    }

    pub fn session_token(&self) -> Option<String> {
        self.session.read().unwrap().clone()
    }

    /// Single request path for every call. Network, HTTP, and decode
    /// failures all fold into the same error shape; callers never need
    /// to distinguish the cause.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse<T>> {
        let mut outbound = self.http.request(method, format!("{}{}", self.url, path));
        if let Some(token) = self.session_token() {
            outbound = outbound.header(
                header::COOKIE,
                format!("{}={}", api::SESSION_COOKIE, token),
            );
        }
        if let Some(body) = body {
            outbound = outbound.json(&body);
        }
        let response = outbound
            .send()
            .await
            .map_err(|err| anyhow!("network error: {err}"))?;
        let status = response.status();
        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|err| anyhow!("invalid response: {err}"))?;
        if !status.is_success() {
            return Err(anyhow!(envelope
                .error
                .unwrap_or_else(|| "an error occurred".to_string())));
        }
        Ok(envelope)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T> {
        self.request(method, path, body)
            .await?
            .data
            .ok_or_else(|| anyhow!("empty response"))
    }

    // Authentication

    /// Exchanges credentials through the gateway and captures the
    /// session cookie it mints on success.
    pub async fn login(&self, credentials: &Login) -> Result<LoginResponse> {
        let response = self
            .http
            .post(format!("{}{}", self.url, path::LOGIN))
            .json(credentials)
            .send()
            .await
            .map_err(|err| anyhow!("network error: {err}"))?;
        let status = response.status();
        let token = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|value| {
                value
                    .strip_prefix(api::SESSION_COOKIE)?
                    .strip_prefix('=')?
                    .split(';')
                    .next()
                    .map(str::to_string)
            });
        let envelope: ApiResponse<LoginResponse> = response
            .json()
            .await
            .map_err(|err| anyhow!("invalid response: {err}"))?;
        if !status.is_success() {
            return Err(anyhow!(envelope
                .error
                .unwrap_or_else(|| "an error occurred".to_string())));
        }
        if let Some(token) = token {
            *self.session.write().unwrap() = Some(token);
        }
        envelope.data.ok_or_else(|| anyhow!("empty response"))
    }

    /// The session context ends locally whatever the gateway answers.
    pub async fn logout(&self) -> Result<()> {
        let result = self
            .request::<Value>(Method::POST, path::LOGOUT, None)
            .await
            .map(|_| ());
        *self.session.write().unwrap() = None;
        result
    }

    pub async fn current_user(&self) -> Result<User> {
        self.fetch(Method::GET, path::ME, None).await
    }

    // Premises

    pub async fn premises(&self) -> Result<Vec<Premise>> {
        self.fetch(Method::GET, path::PREMISES, None).await
    }

    pub async fn premise(&self, id: &str) -> Result<Premise> {
        self.fetch(Method::GET, &path::premise(id), None).await
    }

    pub async fn premise_cameras(&self, id: &str) -> Result<Vec<Camera>> {
        self.fetch(Method::GET, &path::premise_cameras(id), None)
            .await
    }

    // Cameras

    pub async fn cameras(&self) -> Result<Vec<Camera>> {
        self.fetch(Method::GET, path::CAMERAS, None).await
    }

    pub async fn camera(&self, id: &str) -> Result<Camera> {
        self.fetch(Method::GET, &path::camera(id), None).await
    }

    pub async fn camera_stream(&self, id: &str) -> Result<StreamResponse> {
        self.fetch(Method::GET, &path::camera_stream(id), None).await
    }

    pub async fn update_camera_status(&self, id: &str, status: CameraStatus) -> Result<Camera> {
        self.fetch(
            Method::PUT,
            &path::camera_status(id),
            Some(serde_json::to_value(UpdateCameraStatus { status })?),
        )
        .await
    }

    // Alerts

    pub async fn alerts(&self) -> Result<Vec<Alert>> {
        self.fetch(Method::GET, path::ALERTS, None).await
    }

    pub async fn alert(&self, id: &str) -> Result<Alert> {
        self.fetch(Method::GET, &path::alert(id), None).await
    }

    pub async fn create_alert(&self, alert: &CreateAlert) -> Result<Alert> {
        self.fetch(
            Method::POST,
            path::ALERTS,
            Some(serde_json::to_value(alert)?),
        )
        .await
    }

    pub async fn acknowledge_alert(&self, id: &str) -> Result<Alert> {
        self.fetch(Method::POST, &path::alert_acknowledge(id), None)
            .await
    }

    pub async fn assign_alert(&self, id: &str, guard_id: &str) -> Result<AssignResponse> {
        self.fetch(
            Method::POST,
            &path::alert_assign(id),
            Some(serde_json::to_value(AssignAlert {
                guard_id: guard_id.to_string(),
            })?),
        )
        .await
    }

    // Incidents

    pub async fn incidents(&self) -> Result<Vec<Incident>> {
        self.fetch(Method::GET, path::INCIDENTS, None).await
    }

    pub async fn incident(&self, id: &str) -> Result<Incident> {
        self.fetch(Method::GET, &path::incident(id), None).await
    }

    pub async fn update_incident(&self, id: &str, status: IncidentStatus) -> Result<Incident> {
        self.fetch(
            Method::PUT,
            &path::incident(id),
            Some(serde_json::to_value(UpdateIncident { status })?),
        )
        .await
    }

    pub async fn add_incident_update(
        &self,
        id: &str,
        update: &NewIncidentUpdate,
    ) -> Result<IncidentUpdate> {
        self.fetch(
            Method::POST,
            &path::incident_updates(id),
            Some(serde_json::to_value(update)?),
        )
        .await
    }

    // Guards

    pub async fn guards(&self) -> Result<Vec<User>> {
        self.fetch(Method::GET, path::GUARDS, None).await
    }

    pub async fn health(&self) -> Result<Health> {
        self.fetch(Method::GET, path::HEALTH, None).await
    }
}
