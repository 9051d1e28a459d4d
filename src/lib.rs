use std::future::Future;

use axum::extract::Request;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{middleware, Router};
use http::{header, StatusCode, Uri};
#[cfg(feature = "webui")]
use rust_embed::RustEmbed;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, info_span};
use url::Url;

use crate::config::Config;

pub mod config;
mod error;
mod gate;
mod result;
mod route;
mod session;

pub use gate::PUBLIC_PATHS;
pub use session::{COOKIE_NAME, MAX_AGE_SECONDS};

#[cfg(feature = "webui")]
#[derive(RustEmbed)]
#[folder = "assets/"]
struct Assets;

pub async fn serve<F>(cfg: Config, listener: TcpListener, signal: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("Server listening on {}", listener.local_addr().unwrap());

    // Validated in Config::parse; parsed once so the forwarder can
    // override the Host header without re-parsing per request.
    let upstream = Url::parse(&cfg.upstream.url).expect("invalid upstream url");
    let upstream_host = match upstream.port() {
        Some(port) => format!("{}:{}", upstream.host_str().unwrap_or_default(), port),
        None => upstream.host_str().unwrap_or_default().to_string(),
    };

    let app_state = AppState {
        config: cfg.clone(),
        client: reqwest::Client::new(),
        upstream_host,
    };

    let app = Router::new()
        .merge(route::proxy::route())
        .route(api::path::LOGIN, post(route::auth::login))
        .route(api::path::LOGOUT, post(route::auth::logout))
        .fallback(static_handler)
        .layer(middleware::from_fn(gate::session_gate))
        .layer(if cfg.http.cors {
            CorsLayer::permissive()
        } else {
            CorsLayer::new()
        })
        .with_state(app_state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let span = info_span!(
                    "http_request",
                    uri = ?request.uri(),
                    method = ?request.method(),
                    span_id = tracing::field::Empty,
                    target_addr = tracing::field::Empty,
                );
                span.record(
                    "span_id",
                    span.id().unwrap_or(tracing::Id::from_u64(42)).into_u64(),
                );
                span
            }),
        );

    axum::serve(listener, app)
        .with_graceful_shutdown(signal)
        .await
        .unwrap_or_else(|e| error!("Application error: {e}"));
}

#[cfg(feature = "webui")]
async fn static_handler(uri: Uri) -> impl IntoResponse {
    let mut path = uri.path().trim_start_matches('/');
    if path.is_empty() {
        path = "index";
    }
    let file = if path.contains('.') {
        path.to_string()
    } else {
        format!("{}.html", path)
    };
    match Assets::get(&file) {
        Some(content) => {
            let mime = mime_guess::from_path(&file).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], content.data).into_response()
        }
        None => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

#[cfg(not(feature = "webui"))]
async fn static_handler(_uri: Uri) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "not found")
}

#[derive(Clone)]
struct AppState {
    config: Config,
    client: reqwest::Client,
    upstream_host: String,
}
