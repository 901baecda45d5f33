use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub store_url: String,
    pub store_server_command: String,
    pub store_server_args: Vec<String>,
    pub store_startup_grace: Duration,
    pub store_autostart: bool,
    pub service_port: u16,
    pub service_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Every setting has a default, so an empty source yields the stock
    /// local setup: Redis on localhost:6379, started with `redis-server`
    /// if it is not already up, and the HTTP service on port 8080.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_url = lookup("STORE_URL")
            .unwrap_or_else(|| "redis://localhost:6379/0".to_string());
        redis::Client::open(store_url.as_str())
            .context("STORE_URL must be a valid redis:// URL")?;

        let store_server_command = lookup("STORE_SERVER_COMMAND")
            .unwrap_or_else(|| "redis-server".to_string());
        if store_server_command.trim().is_empty() {
            anyhow::bail!("STORE_SERVER_COMMAND must not be empty");
        }

        let store_server_args = lookup("STORE_SERVER_ARGS")
            .map(|args| args.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        let grace_ms = lookup("STORE_STARTUP_GRACE_MS")
            .unwrap_or_else(|| "2000".to_string())
            .parse::<u64>()
            .context("STORE_STARTUP_GRACE_MS must be a whole number of milliseconds")?;

        let store_autostart = match lookup("STORE_AUTOSTART") {
            None => true,
            Some(raw) => parse_flag(&raw)
                .with_context(|| format!("STORE_AUTOSTART must be true or false, got '{}'", raw))?,
        };

        let service_port = lookup("SERVICE_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = lookup("SERVICE_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        Ok(Config {
            store_url,
            store_server_command,
            store_server_args,
            store_startup_grace: Duration::from_millis(grace_ms),
            store_autostart,
            service_port,
            service_host,
        })
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Store URL: {}", self.store_url);
        if self.store_autostart {
            tracing::info!(
                "  Store autostart: enabled ({} {}, grace {}ms)",
                self.store_server_command,
                self.store_server_args.join(" "),
                self.store_startup_grace.as_millis()
            );
        } else {
            tracing::info!("  Store autostart: disabled");
        }
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
