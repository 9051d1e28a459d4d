use axum::body::Body;
use axum::extract::{Request, State};
use axum::response::Response;
use axum::routing::any;
use axum::Router;
use axum_extra::extract::cookie::CookieJar;
use http::{header, Method};
use tracing::{debug, Span};

use crate::session;
use crate::{error::AppError, result::Result, AppState};

pub fn route() -> Router<AppState> {
    Router::new().route("/api/*path", any(forward))
}

/// Rewrites the request onto the upstream base URL (prefix stripped,
/// query preserved) and relays the upstream answer byte-for-byte. No
/// caching, no retries; every call is one independent upstream hop.
async fn forward(
    State(state): State<AppState>,
    jar: CookieJar,
    req: Request,
) -> Result<Response> {
    let path_query = req
        .uri()
        .path_and_query()
        .map(|v| v.as_str())
        .unwrap_or(req.uri().path())
        .to_string();
    let rest = path_query
        .strip_prefix(api::path::PREFIX)
        .unwrap_or(&path_query);
    let target = format!("{}{}", state.config.upstream.base(), rest);
    Span::current().record("target_addr", target.as_str());

    let (parts, body) = req.into_parts();

    let mut headers = parts.headers.clone();
    // Keep the local virtual host out of the upstream request.
    headers.insert(header::HOST, state.upstream_host.parse()?);
    headers.remove(header::AUTHORIZATION);
    if let Some(token) = session::get(&jar) {
        headers.insert(header::AUTHORIZATION, format!("Bearer {}", token).parse()?);
    } else {
        // The upstream answers 401 on its own; the forwarder never rejects.
        debug!("forwarding without session token");
    }

    let mut outbound = state
        .client
        .request(parts.method.clone(), &target)
        .headers(headers);
    if parts.method != Method::GET && parts.method != Method::HEAD {
        let bytes = axum::body::to_bytes(body, usize::MAX).await?;
        outbound = outbound.body(bytes);
    }

    let upstream = outbound
        .send()
        .await
        .map_err(|_| AppError::UpstreamUnreachable)?;

    let mut response = Response::builder().status(upstream.status());
    if let Some(relayed) = response.headers_mut() {
        let mut headers = upstream.headers().clone();
        // The body is re-framed locally; hop-by-hop headers must not
        // travel past this hop.
        for name in [
            header::CONNECTION,
            header::TRANSFER_ENCODING,
            header::TE,
            header::TRAILER,
            header::UPGRADE,
            header::PROXY_AUTHENTICATE,
            header::HeaderName::from_static("keep-alive"),
        ] {
            headers.remove(name);
        }
        relayed.extend(headers);
    }
    let bytes = upstream
        .bytes()
        .await
        .map_err(|_| AppError::UpstreamUnreachable)?;
    Ok(response.body(Body::from(bytes))?)
}
