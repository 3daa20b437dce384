//! alertcheck CLI -- Graylog 알림 하니스 단계별 실행 도구
//!
//! 서버 준비 대기, GELF 입력 생성, aggregation-count 규칙 생성, 이벤트 전송,
//! 이벤트 수 조회를 개별 명령으로 제공합니다.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;

use alertcheck_core::config::GeneralConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);

    match cli.command {
        // 설정 파일 문제는 명령 자체가 보고하므로 기본 로깅으로 시작
        Commands::Config(args) => {
            let mut general = GeneralConfig::default();
            if let Some(level) = cli.log_level {
                general.log_level = level;
            }
            init_logging(&general)?;
            commands::config::execute(args, &cli.config, &writer).await
        }
        command => {
            let config = commands::load_config(&cli.config, cli.log_level.as_deref()).await?;
            init_logging(&config.general)?;
            commands::execute(command, &cli.config, &config, &writer).await
        }
    }
}

fn init_logging(general: &GeneralConfig) -> Result<(), CliError> {
    logging::init_tracing(general).map_err(|e| CliError::Config(e.to_string()))
}
