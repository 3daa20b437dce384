//! `alertcheck send` command handler

use std::io::Write;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use alertcheck_core::config::HarnessConfig;
use alertcheck_harness::{GelfMessage, GelfSender};

use crate::cli::SendArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `send` command.
///
/// Connects to `intake.address`, writes one NUL-terminated GELF frame and
/// closes the connection.
pub async fn execute(
    args: SendArgs,
    config: &HarnessConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let message = build_message(args)?;

    let mut sender = GelfSender::connect(&config.intake.address).await?;
    sender.send_message(&message).await?;
    let report = SendReport {
        intake: sender.addr().to_owned(),
        message: message.fields().clone(),
    };
    sender.close().await?;
    info!(intake = %report.intake, "event sent");

    writer.render(&report)?;
    Ok(())
}

fn build_message(args: SendArgs) -> Result<GelfMessage, CliError> {
    let fields: Map<String, Value> = args.fields.into_iter().collect();
    Ok(GelfMessage::from_fields(Value::Object(fields))?)
}

/// The event as written to the socket.
#[derive(Serialize)]
pub struct SendReport {
    pub intake: String,
    pub message: Map<String, Value>,
}

impl Render for SendReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "Sent 1 event to {}", self.intake)?;
        for (key, value) in &self.message {
            writeln!(w, "  {}: {}", key, value)?;
        }
        Ok(())
    }
}
