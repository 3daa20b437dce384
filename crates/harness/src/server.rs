//! Server lifecycle management.
//!
//! The [`ServerLifecycle`] trait is the seam between scenarios and the
//! process that runs Graylog. Production code uses [`ComposeServer`], which
//! drives `docker compose` inside the configured working directory; tests can
//! plug in a fake.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐
//! │ Harness  │
//! └────┬─────┘
//!      ▼
//! ┌─────────────────┐
//! │ ServerLifecycle │ (trait)
//! └─────────────────┘
//!      │        │
//!      ▼        ▼
//! ┌────────┐ ┌──────┐
//! │Compose │ │ Fake │
//! └───┬────┘ └──────┘
//!     ▼
//! docker compose (graylog, mongodb, opensearch)
//! ```

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use tokio::process::Command;
use tokio::runtime::RuntimeFlavor;
use tracing::{debug, info, warn};

use alertcheck_core::config::ServerConfig;

use crate::error::HarnessError;

/// Start/stop control over the external log-aggregation server.
///
/// `start` only launches the process; readiness is checked separately by
/// [`crate::readiness::wait_until_ready`].
pub trait ServerLifecycle: Send {
    /// Launches the server.
    fn start(&mut self) -> impl Future<Output = Result<(), HarnessError>> + Send;

    /// Stops the server and releases its resources.
    fn stop(&mut self) -> impl Future<Output = Result<(), HarnessError>> + Send;

    /// Waits `wait`, then returns the server's log output collected so far.
    ///
    /// Scenarios use this to assert that no server-side exception was logged
    /// during an evaluation window.
    fn extract_logs(
        &self,
        wait: Duration,
    ) -> impl Future<Output = Result<String, HarnessError>> + Send;
}

/// `docker compose` backed server.
#[derive(Debug)]
pub struct ComposeServer {
    working_dir: PathBuf,
    program: String,
    prefix_args: Vec<String>,
    running: bool,
}

impl ComposeServer {
    pub fn new(config: &ServerConfig) -> Result<Self, HarnessError> {
        let (program, prefix_args) = config
            .compose_command
            .split_first()
            .ok_or_else(|| HarnessError::Server("compose command is empty".to_owned()))?;

        Ok(Self {
            working_dir: PathBuf::from(&config.working_dir),
            program: program.clone(),
            prefix_args: prefix_args.to_vec(),
            running: false,
        })
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    async fn compose(&self, args: &[&str]) -> Result<Output, HarnessError> {
        debug!(
            program = %self.program,
            prefix = ?self.prefix_args,
            ?args,
            dir = %self.working_dir.display(),
            "running compose command"
        );

        let output = Command::new(&self.program)
            .args(&self.prefix_args)
            .args(args)
            .current_dir(&self.working_dir)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                HarnessError::Server(format!("failed to run {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            return Err(HarnessError::Server(format!(
                "{} {} exited with {}: {}",
                self.program,
                args.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(output)
    }
}

impl ServerLifecycle for ComposeServer {
    async fn start(&mut self) -> Result<(), HarnessError> {
        info!(dir = %self.working_dir.display(), "starting server");
        self.compose(&["up", "--detach"]).await?;
        self.running = true;
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), HarnessError> {
        if !self.running {
            return Ok(());
        }
        info!(dir = %self.working_dir.display(), "stopping server");
        self.compose(&["down"]).await?;
        self.running = false;
        Ok(())
    }

    async fn extract_logs(&self, wait: Duration) -> Result<String, HarnessError> {
        debug!(?wait, "waiting before collecting server logs");
        tokio::time::sleep(wait).await;

        let output = self.compose(&["logs", "--no-color"]).await?;
        let mut logs = String::from_utf8_lossy(&output.stdout).into_owned();
        logs.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(logs)
    }
}

/// Runs `compose down` synchronously if the server is still running.
///
/// This blocks the dropping thread until `down` exits, which can take several
/// seconds. On a multi-threaded tokio runtime the call goes through
/// [`tokio::task::block_in_place`] so other tasks move off the worker; on a
/// current-thread runtime or outside tokio it blocks in place.
impl Drop for ComposeServer {
    fn drop(&mut self) {
        if !self.running {
            return;
        }
        // async stop()을 거치지 않은 경우 (assertion panic 등) 동기적으로 정리
        warn!(
            dir = %self.working_dir.display(),
            "server dropped while running, stopping synchronously"
        );
        let down = || {
            std::process::Command::new(&self.program)
                .args(&self.prefix_args)
                .arg("down")
                .current_dir(&self.working_dir)
                .status()
        };
        let result = match tokio::runtime::Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(down)
            }
            _ => down(),
        };
        match result {
            Ok(status) if status.success() => {}
            Ok(status) => warn!(%status, "compose down failed during drop"),
            Err(e) => warn!(error = %e, "failed to run compose down during drop"),
        }
    }
}
