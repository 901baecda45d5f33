use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::config::Config;

/// What the bootstrap did to make the store available
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The probe succeeded; nothing was spawned
    AlreadyRunning,
    /// A server process was launched and the grace period has elapsed
    Started { pid: Option<u32> },
}

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("failed to start store server `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// One-shot startup routine that launches the store if it is not running
///
/// The supervisor probes once, spawns at most one server process, sleeps
/// for the grace period and returns. The spawned process is detached: it is
/// not awaited, restarted, or health-checked afterwards, and it keeps
/// running after this program exits.
#[derive(Debug, Clone)]
pub struct StoreSupervisor {
    store_url: String,
    server_command: String,
    server_args: Vec<String>,
    grace_period: Duration,
}

impl StoreSupervisor {
    pub fn new(
        store_url: impl Into<String>,
        server_command: impl Into<String>,
        server_args: Vec<String>,
        grace_period: Duration,
    ) -> Self {
        Self {
            store_url: store_url.into(),
            server_command: server_command.into(),
            server_args,
            grace_period,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.store_url.clone(),
            config.store_server_command.clone(),
            config.store_server_args.clone(),
            config.store_startup_grace,
        )
    }

    /// Make sure the store is running, starting it if the probe fails
    ///
    /// There is no confirmation probe after the grace period; the caller's
    /// own connection attempt is the readiness check.
    ///
    /// # Errors
    /// Returns `BootstrapError::Spawn` if the server executable cannot be
    /// launched. A failed probe is not an error.
    pub async fn ensure_store_running(&self) -> Result<BootstrapOutcome, BootstrapError> {
        if self.probe().await {
            tracing::info!("Store is already running at {}", self.store_url);
            return Ok(BootstrapOutcome::AlreadyRunning);
        }

        tracing::info!(
            "Store is not running at {}. Attempting to start it with `{}`...",
            self.store_url,
            self.server_command
        );

        let pid = self.spawn_server()?;

        tracing::info!(
            "Store server started (pid {}). Waiting {}ms for it to be ready...",
            pid.map(|p| p.to_string()).unwrap_or_else(|| "unknown".to_string()),
            self.grace_period.as_millis()
        );
        tokio::time::sleep(self.grace_period).await;

        Ok(BootstrapOutcome::Started { pid })
    }

    /// PING the store over a throwaway connection
    async fn probe(&self) -> bool {
        let client = match redis::Client::open(self.store_url.as_str()) {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!("Store URL rejected by client: {}", e);
                return false;
            }
        };

        let mut connection = match client.get_multiplexed_async_connection().await {
            Ok(connection) => connection,
            Err(e) => {
                tracing::debug!("Store probe could not connect: {}", e);
                return false;
            }
        };

        let reply: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut connection).await;
        match reply {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("Store probe PING failed: {}", e);
                false
            }
        }
    }

    /// Launch the server with inherited stdout/stderr and return its pid
    ///
    /// The child handle is dropped right away. tokio does not kill a child
    /// on drop unless asked to, so the server keeps running.
    fn spawn_server(&self) -> Result<Option<u32>, BootstrapError> {
        let child = Command::new(&self.server_command)
            .args(&self.server_args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| BootstrapError::Spawn {
                command: self.server_command.clone(),
                source,
            })?;

        Ok(child.id())
    }
}
