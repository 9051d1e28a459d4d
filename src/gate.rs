use axum::body::Body;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use http::{header, StatusCode};

use crate::session;

/// Paths reachable without an established session. Matching is exact on
/// the request path; trailing slashes are not normalized and query
/// strings never take part in the comparison.
pub const PUBLIC_PATHS: [&str; 2] = ["/login", api::path::LOGIN];

/// Runs before every handler. A present session cookie passes
/// unconditionally; the token itself is validated upstream on each
/// proxied call.
pub async fn session_gate(jar: CookieJar, request: Request, next: Next) -> Response {
    if session::get(&jar).is_some() || PUBLIC_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, "/login")
        .body(Body::empty())
        .unwrap()
}
