//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::jobs::RetryPolicy;
use crate::workers::WorkerConfig;

const DEV_JWT_SECRET: &str = "dev-secret";
/// Upper bound for `SYSTEM_CREDENTIAL_TTL_HOURS` (100 years).
const MAX_CREDENTIAL_TTL_HOURS: u64 = 100 * 365 * 24;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Reply queue wiring: where the collaborators live and how the worker behaves.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    pub inference_base_url: String,
    pub content_base_url: String,
    pub worker: WorkerConfig,
}

impl QueueConfig {
    pub fn new(inference_base_url: impl Into<String>, content_base_url: impl Into<String>) -> Self {
        Self {
            inference_base_url: inference_base_url.into(),
            content_base_url: content_base_url.into(),
            worker: WorkerConfig::default(),
        }
    }

    pub fn with_worker(mut self, worker: WorkerConfig) -> Self {
        self.worker = worker;
        self
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    /// HS256 secret shared with the content API.
    pub jwt_secret: String,
    /// Lifetime of the system credential minted at startup.
    pub credential_ttl: Duration,
    pub queue: QueueConfig,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup` (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };

        let listen_addr = env.parse("LISTEN_ADDR", "0.0.0.0:8080".parse::<SocketAddr>().ok())?;
        let jwt_secret = env.get("JWT_SECRET").unwrap_or_else(|| {
            warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let inference_host = env.get("INFERENCE_HOST").unwrap_or_else(|| "localhost".to_string());
        let inference_port: u16 = env.parse("INFERENCE_PORT", Some(5000))?;
        let content_host = env.get("CONTENT_API_HOST").unwrap_or_else(|| "localhost".to_string());
        let content_port: u16 = env.parse("CONTENT_API_PORT", Some(8080))?;

        let timeout_secs: u64 = env.parse("REPLY_CALL_TIMEOUT_SECS", Some(30))?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "REPLY_CALL_TIMEOUT_SECS",
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        let max_retries: u32 = env.parse("REPLY_MAX_RETRIES", Some(0))?;
        let retry_base_ms: u64 = env.parse("REPLY_RETRY_BASE_MS", Some(500))?;
        let strict_content_status = env.flag("REPLY_STRICT_CONTENT_STATUS", false)?;
        let drain_on_shutdown = env.flag("REPLY_DRAIN_ON_SHUTDOWN", true)?;
        let ttl_hours: u64 = env.parse("SYSTEM_CREDENTIAL_TTL_HOURS", Some(365 * 24))?;
        if ttl_hours == 0 || ttl_hours > MAX_CREDENTIAL_TTL_HOURS {
            return Err(ConfigError::Invalid {
                key: "SYSTEM_CREDENTIAL_TTL_HOURS",
                value: ttl_hours.to_string(),
                reason: format!("must be between 1 and {MAX_CREDENTIAL_TTL_HOURS}"),
            });
        }

        let retry = if max_retries == 0 {
            RetryPolicy::no_retry()
        } else {
            RetryPolicy::exponential(
                max_retries,
                Duration::from_millis(retry_base_ms),
                Duration::from_secs(30),
            )
        };

        let worker = WorkerConfig::default()
            .with_call_timeout(Duration::from_secs(timeout_secs))
            .with_retry(retry)
            .with_strict_content_status(strict_content_status)
            .with_drain_on_shutdown(drain_on_shutdown);

        let queue = QueueConfig::new(
            format!("http://{inference_host}:{inference_port}"),
            format!("http://{content_host}:{content_port}"),
        )
        .with_worker(worker);

        Ok(Self {
            listen_addr,
            jwt_secret,
            credential_ttl: Duration::from_secs(ttl_hours * 3600),
            queue,
        })
    }
}

struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse<T>(&self, key: &'static str, default: Option<T>) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match (self.get(key), default) {
            (Some(raw), _) => raw.parse::<T>().map_err(|e| ConfigError::Invalid {
                key,
                value: raw.clone(),
                reason: e.to_string(),
            }),
            (None, Some(default)) => Ok(default),
            (None, None) => Err(ConfigError::Invalid {
                key,
                value: String::new(),
                reason: "required".to_string(),
            }),
        }
    }

    fn flag(&self, key: &'static str, default: bool) -> Result<bool, ConfigError> {
        match self.get(key).map(|v| v.to_ascii_lowercase()) {
            None => Ok(default),
            Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
            Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
            Some(v) => Err(ConfigError::Invalid {
                key,
                value: v,
                reason: "expected a boolean".to_string(),
            }),
        }
    }
}
