use serde::{Deserialize, Serialize};
use std::{env, fs, net::SocketAddr, str::FromStr};
use url::Url;

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub http: Http,
    #[serde(default)]
    pub upstream: Upstream,
    #[serde(default)]
    pub log: Log,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Http {
    #[serde(default = "default_http_listen")]
    pub listen: SocketAddr,
    #[serde(default)]
    pub cors: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Upstream {
    #[serde(default = "default_upstream_url")]
    pub url: String,
}

impl Upstream {
    /// Base URL without a trailing slash, ready for path concatenation.
    pub fn base(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Log {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_http_listen() -> SocketAddr {
    SocketAddr::from_str(&format!(
        "0.0.0.0:{}",
        env::var("PORT").unwrap_or(String::from("7777"))
    ))
    .expect("invalid listen address")
}

fn default_upstream_url() -> String {
    env::var("UPSTREAM_API_URL").unwrap_or(String::from("http://127.0.0.1:8080/api"))
}

fn default_log_level() -> String {
    env::var("LOG_LEVEL").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug".to_string()
        } else {
            "info".to_string()
        }
    })
}

impl Default for Http {
    fn default() -> Self {
        Self {
            listen: default_http_listen(),
            cors: Default::default(),
        }
    }
}

impl Default for Upstream {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
        }
    }
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    pub fn parse(path: Option<String>) -> Self {
        let result = fs::read_to_string(path.unwrap_or(String::from("guardpost.toml")))
            .or(fs::read_to_string("/etc/guardpost/guardpost.toml"))
            .unwrap_or("".to_string());
        let cfg: Self = toml::from_str(result.as_str()).expect("config parse error");
        match cfg.validate() {
            Ok(_) => cfg,
            Err(err) => panic!("config validate [{}]", err),
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        let url = Url::parse(&self.upstream.url)?;
        if url.host_str().is_none() {
            return Err(anyhow::anyhow!("upstream url must carry a host"));
        }
        Ok(())
    }
}
