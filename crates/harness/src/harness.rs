//! Scenario fixture.
//!
//! [`Harness`] bundles one server lifecycle with one API client for the
//! duration of a scenario: start the server, block until it is ready, hand
//! out the client, stop the server at the end.

use std::time::Duration;

use tracing::{info, warn};

use alertcheck_core::config::HarnessConfig;

use crate::api::GraylogApi;
use crate::error::HarnessError;
use crate::readiness::wait_until_ready;
use crate::server::{ComposeServer, ServerLifecycle};

/// One server + one client, serialized by the enclosing test.
#[derive(Debug)]
pub struct Harness<S: ServerLifecycle = ComposeServer> {
    api: GraylogApi,
    server: S,
}

impl Harness<ComposeServer> {
    /// Starts a `docker compose` server from `config.server` and waits until it is ready.
    pub async fn start(config: &HarnessConfig) -> Result<Self, HarnessError> {
        let server = ComposeServer::new(&config.server)?;
        Self::start_with(config, server).await
    }
}

impl<S: ServerLifecycle> Harness<S> {
    /// Starts the given server and waits until the API reports readiness.
    ///
    /// If readiness never arrives the server is stopped before the readiness
    /// error is returned. A failing stop is logged and does not replace that error.
    pub async fn start_with(config: &HarnessConfig, mut server: S) -> Result<Self, HarnessError> {
        let api = GraylogApi::new(config)?;
        server.start().await?;

        if let Err(e) = wait_until_ready(&api).await {
            if let Err(stop_err) = server.stop().await {
                warn!(error = %stop_err, "failed to stop server after readiness failure");
            }
            return Err(e);
        }

        info!(base_url = %api.base_url(), "harness ready");
        Ok(Self { api, server })
    }

    pub fn api(&self) -> &GraylogApi {
        &self.api
    }

    pub fn server(&self) -> &S {
        &self.server
    }

    /// Shorthand for `server().extract_logs(wait)`.
    pub async fn server_logs(&self, wait: Duration) -> Result<String, HarnessError> {
        self.server.extract_logs(wait).await
    }

    /// Stops the server. Consumes the harness so it cannot be reused.
    pub async fn stop(mut self) -> Result<(), HarnessError> {
        self.server.stop().await
    }
}
