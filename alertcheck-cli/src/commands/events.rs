//! `alertcheck events` command handler

use std::io::Write;

use serde::Serialize;

use alertcheck_core::config::HarnessConfig;
use alertcheck_harness::GraylogApi;

use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `events` command.
pub async fn execute(config: &HarnessConfig, writer: &OutputWriter) -> Result<(), CliError> {
    let api = GraylogApi::new(config)?;
    let total_events = api.count_events().await?;

    writer.render(&EventsReport { total_events })?;
    Ok(())
}

#[derive(Serialize)]
pub struct EventsReport {
    pub total_events: u64,
}

impl Render for EventsReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "Total events: {}", self.total_events)
    }
}
