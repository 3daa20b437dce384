//! Command handlers -- one module per subcommand

pub mod config;
pub mod events;
pub mod input;
pub mod rule;
pub mod send;
pub mod wait;

use std::path::Path;

use alertcheck_core::config::HarnessConfig;
use alertcheck_core::error::{AlertcheckError, ConfigError};

use crate::cli::Commands;
use crate::error::CliError;
use crate::output::OutputWriter;

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "alertcheck.toml";

/// Dispatch a parsed command.
pub async fn execute(
    command: Commands,
    config_path: &Path,
    config: &HarnessConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match command {
        Commands::Wait => wait::execute(config, writer).await,
        Commands::Input => input::execute(config, writer).await,
        Commands::Rule(args) => rule::execute(args, config, writer).await,
        Commands::Send(args) => send::execute(args, config, writer).await,
        Commands::Events => events::execute(config, writer).await,
        Commands::Config(args) => config::execute(args, config_path, writer).await,
    }
}

/// Load the effective configuration: defaults, file, env overrides, `--log-level`.
///
/// A missing file is only tolerated at the default location, in which case
/// the defaults plus env overrides are used.
pub async fn load_config(
    config_path: &Path,
    log_level: Option<&str>,
) -> Result<HarnessConfig, CliError> {
    let mut config = match HarnessConfig::load(config_path).await {
        Ok(config) => config,
        Err(AlertcheckError::Config(ConfigError::FileNotFound { .. }))
            if config_path == Path::new(DEFAULT_CONFIG_PATH) =>
        {
            let mut config = HarnessConfig::default();
            config.apply_env_overrides();
            config
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(level) = log_level {
        config.general.log_level = level.to_owned();
    }
    config.validate()?;

    Ok(config)
}
