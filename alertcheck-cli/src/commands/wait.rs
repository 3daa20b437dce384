//! `alertcheck wait` command handler

use std::io::Write;

use serde::Serialize;
use tokio::time::Instant;
use tracing::info;

use alertcheck_core::config::HarnessConfig;
use alertcheck_harness::{GraylogApi, wait_until_ready};

use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `wait` command.
///
/// Polls the deflector endpoint until it reports `is_up`, giving up after
/// `polling.max_wait_secs`.
pub async fn execute(config: &HarnessConfig, writer: &OutputWriter) -> Result<(), CliError> {
    let api = GraylogApi::new(config)?;
    info!(base_url = %api.base_url(), "waiting for server readiness");

    let started = Instant::now();
    wait_until_ready(&api).await?;

    let report = ReadyReport {
        base_url: api.base_url().to_string(),
        waited_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    };
    writer.render(&report)?;

    Ok(())
}

/// Readiness result.
#[derive(Serialize)]
pub struct ReadyReport {
    pub base_url: String,
    pub waited_ms: u64,
}

impl Render for ReadyReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Server {} at {} (waited {} ms)",
            "READY".green().bold(),
            self.base_url,
            self.waited_ms
        )
    }
}
