use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use tracing::error;

use api::request::Login;
use api::response::{ApiResponse, LoginResponse};

use crate::session;
use crate::{error::AppError, result::Result, AppState};

/// Login exchange. Forwards the submitted credentials upstream and, on
/// success, mints the HTTP-only session cookie from the returned token
/// while relaying the upstream envelope unchanged.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<Login>,
) -> Result<Response> {
    let upstream = state
        .client
        .post(format!("{}/auth/login", state.config.upstream.base()))
        .json(&payload)
        .send()
        .await
        .map_err(|err| {
            error!("login exchange failed: {err}");
            AppError::UpstreamUnreachable
        })?;

    let status = upstream.status();
    let body: ApiResponse<LoginResponse> = upstream.json().await.map_err(|err| {
        error!("login response decode failed: {err}");
        AppError::UpstreamContract("invalid upstream login response".to_string())
    })?;

    if !status.is_success() {
        let message = body.error.unwrap_or_else(|| "login failed".to_string());
        return Ok((status, Json(json!({ "error": message }))).into_response());
    }

    let token = match body.data.as_ref() {
        Some(login) => login.token.clone(),
        None => {
            return Err(AppError::UpstreamContract(
                "login response missing token".to_string(),
            ))
        }
    };

    let jar = session::set(jar, &token);
    Ok((jar, Json(body)).into_response())
}

/// Ends the session: the cookie is cleared no matter what the upstream
/// answers, the upstream response is relayed when one arrives.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Result<Response> {
    let mut outbound = state
        .client
        .post(format!("{}/auth/logout", state.config.upstream.base()));
    if let Some(token) = session::get(&jar) {
        outbound = outbound.bearer_auth(token);
    }

    let jar = session::clear(jar);
    match outbound.send().await {
        Ok(upstream) => {
            let status = upstream.status();
            let bytes = upstream.bytes().await.unwrap_or_default();
            Ok((status, jar, bytes).into_response())
        }
        Err(err) => {
            error!("logout forward failed: {err}");
            Ok((jar, Json(json!({ "status": "success" }))).into_response())
        }
    }
}
