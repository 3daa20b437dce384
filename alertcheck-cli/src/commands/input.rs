//! `alertcheck input` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use alertcheck_core::config::HarnessConfig;
use alertcheck_harness::GraylogApi;

use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `input` command.
///
/// Creates the GELF TCP input, waits for it to run and checks that the intake
/// accepts a connection. The connection is closed before returning; the
/// input itself stays on the server.
pub async fn execute(config: &HarnessConfig, writer: &OutputWriter) -> Result<(), CliError> {
    let api = GraylogApi::new(config)?;
    let input = api.create_gelf_input().await?;

    let report = InputReport {
        id: input.id().to_owned(),
        intake: input.sender().addr().to_owned(),
    };
    input.close().await?;
    info!(id = %report.id, intake = %report.intake, "gelf input ready");

    writer.render(&report)?;
    Ok(())
}

/// Created input.
#[derive(Serialize)]
pub struct InputReport {
    pub id: String,
    pub intake: String,
}

impl Render for InputReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "Input {} running", self.id)?;
        writeln!(w, "  GELF intake: {}", self.intake)?;
        Ok(())
    }
}
