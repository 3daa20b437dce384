//! Shared E2E helpers.

use std::time::Duration;

use alertcheck_core::config::HarnessConfig;
use alertcheck_harness::Harness;

/// 규칙 평가 주기 (초)
pub const PERIOD_SECS: u64 = 5;

/// 로그에 나타나면 안 되는 서버 측 예외
pub const ILLEGAL_STATE: &str = "java.lang.IllegalStateException";
pub const NULL_POINTER: &str = "java.lang.NullPointerException";

pub fn period() -> Duration {
    Duration::from_secs(PERIOD_SECS)
}

/// `ALERTCHECK_CONFIG`가 가리키는 파일, 없으면 기본값 + 환경변수 오버라이드
pub async fn scenario_config() -> HarnessConfig {
    match std::env::var("ALERTCHECK_CONFIG") {
        Ok(path) => HarnessConfig::load(&path)
            .await
            .unwrap_or_else(|e| panic!("failed to load {}: {}", path, e)),
        Err(_) => {
            let mut config = HarnessConfig::default();
            config.apply_env_overrides();
            config.validate().expect("default config should be valid");
            config
        }
    }
}

/// 서버를 기동하고 준비될 때까지 기다립니다.
///
/// 반환된 하니스가 drop되면 (assertion 실패 포함) 서버가 정지됩니다.
pub async fn start_harness() -> Harness {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();

    let config = scenario_config().await;
    Harness::start(&config)
        .await
        .expect("server should start and become ready")
}
