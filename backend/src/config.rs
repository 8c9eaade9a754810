use std::env;

use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Host settings, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub port: u16,
    pub upstream: Url,
    pub frontend_dir: String,
}

const DEFAULT_PORT: u16 = 8081;
const DEFAULT_UPSTREAM: &str = "http://127.0.0.1:5000";

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::Invalid {
                key: "PORT",
                reason: format!("{}", e),
            })?,
            None => DEFAULT_PORT,
        };

        let upstream_raw = lookup("UPSTREAM_API_BASE").unwrap_or_else(|| DEFAULT_UPSTREAM.to_string());
        let upstream = Url::parse(upstream_raw.trim()).map_err(|e| ConfigError::Invalid {
            key: "UPSTREAM_API_BASE",
            reason: e.to_string(),
        })?;
        if !matches!(upstream.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                key: "UPSTREAM_API_BASE",
                reason: format!("unsupported scheme {}", upstream.scheme()),
            });
        }

        let frontend_dir = lookup("FRONTEND_DIR").unwrap_or_else(|| {
            match lookup("CARGO_MANIFEST_DIR") {
                Some(manifest_dir) => format!("{}/../frontend/dist", manifest_dir),
                None => "/usr/src/app/frontend/dist".to_string(),
            }
        });

        Ok(Self {
            port,
            upstream,
            frontend_dir,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
