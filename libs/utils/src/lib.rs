use std::env;
use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber. `RUST_LOG` wins over the
/// filter passed in.
pub fn set_log(env_filter: String) {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", env_filter);
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .compact()
        .with_target(true)
        .init();
}
