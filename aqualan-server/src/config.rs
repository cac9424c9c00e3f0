//! Server settings read from the environment at startup.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{info, warn};

use aqualan_core::service::DEFAULT_STAFF_EMAIL;
use aqualan_mailer::DEFAULT_FROM;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Storefront build served for non-API paths.
    pub static_dir: Option<PathBuf>,
    /// Route sheet location, a file path or an http(s) URL.
    pub route_sheet: Option<String>,
    /// Email API endpoint; emails are only logged when unset.
    pub mail_api_url: Option<String>,
    /// Bearer token for the email API.
    pub mail_api_key: Option<String>,
    /// Sender address.
    pub mail_from: String,
    /// Recipient of order and offer alerts.
    pub staff_email: String,
}

impl Config {
    /// Read the process environment.
    #[must_use]
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, falling back to defaults for missing
    /// or unparsable values.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: try_load(&lookup, "HOST", "0.0.0.0".to_owned()),
            port: try_load(&lookup, "PORT", 8001),
            static_dir: optional(&lookup, "STATIC_DIR").map(PathBuf::from),
            route_sheet: optional(&lookup, "ROUTE_SHEET"),
            mail_api_url: optional(&lookup, "MAIL_API_URL"),
            mail_api_key: optional(&lookup, "MAIL_API_KEY"),
            mail_from: try_load(&lookup, "MAIL_FROM", DEFAULT_FROM.to_owned()),
            staff_email: try_load(&lookup, "STAFF_EMAIL", DEFAULT_STAFF_EMAIL.to_owned()),
        }
    }

    /// `host:port` for the listener.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty());
    if value.is_none() {
        info!("{key} not set");
    }
    value
}

fn try_load<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = lookup(key).filter(|value| !value.trim().is_empty()) else {
        info!("{key} not set, using default: {default}");
        return default;
    };
    raw.trim().parse().unwrap_or_else(|err| {
        warn!("Invalid {key} value {raw:?}: {err}, using default: {default}");
        default
    })
}
