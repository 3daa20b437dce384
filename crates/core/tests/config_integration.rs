//! alertcheck.toml 통합 설정 테스트
//!
//! - alertcheck.toml.example 파싱 테스트
//! - 파일 로딩 + 환경변수 우선순위 테스트
//! - 잘못된 형식 에러 테스트

use std::fs;
use std::time::Duration;

use serial_test::serial;
use tempfile::TempDir;

use alertcheck_core::config::HarnessConfig;
use alertcheck_core::error::{AlertcheckError, ConfigError};

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../alertcheck.toml.example");
    let config = HarnessConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "pretty");
    assert_eq!(config.server.working_dir, "../runtime");
    assert_eq!(config.api.base_url, "http://127.0.0.1:9000/api/");
    assert_eq!(config.intake.address, "127.0.0.1:12201");
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../alertcheck.toml.example");
    let config = HarnessConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_matches_defaults() {
    let content = include_str!("../../../alertcheck.toml.example");
    let parsed = HarnessConfig::parse(content).expect("should parse");
    let defaults = HarnessConfig::default();

    assert_eq!(parsed.api.username, defaults.api.username);
    assert_eq!(parsed.api.requested_by, defaults.api.requested_by);
    assert_eq!(
        parsed.polling.input_interval_ms,
        defaults.polling.input_interval_ms
    );
    assert_eq!(parsed.polling.max_wait(), defaults.polling.max_wait());
}

#[tokio::test]
#[serial]
async fn load_applies_env_overrides_over_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("alertcheck.toml");
    fs::write(
        &config_path,
        r#"
[api]
base_url = "http://from-file:9000/api/"

[polling]
readiness_interval_ms = 250
"#,
    )
    .expect("should write config");

    // SAFETY: #[serial]로 환경변수를 조작하는 테스트 간 동시 실행을 막습니다.
    unsafe { std::env::set_var("ALERTCHECK_API_BASE_URL", "http://from-env:9000/api/") };
    let result = HarnessConfig::load(&config_path).await;
    unsafe { std::env::remove_var("ALERTCHECK_API_BASE_URL") };

    let config = result.expect("config should load");
    assert_eq!(config.api.base_url, "http://from-env:9000/api/");
    assert_eq!(
        config.polling.readiness_interval(),
        Duration::from_millis(250)
    );
}

#[tokio::test]
#[serial]
async fn load_rejects_invalid_env_override() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("alertcheck.toml");
    fs::write(&config_path, "").expect("should write config");

    // SAFETY: #[serial]로 환경변수를 조작하는 테스트 간 동시 실행을 막습니다.
    unsafe { std::env::set_var("ALERTCHECK_INTAKE_ADDRESS", "no-port-here") };
    let result = HarnessConfig::load(&config_path).await;
    unsafe { std::env::remove_var("ALERTCHECK_INTAKE_ADDRESS") };

    let err = result.expect_err("address without port should be rejected");
    assert!(matches!(
        err,
        AlertcheckError::Config(ConfigError::InvalidValue { .. })
    ));
}

#[tokio::test]
async fn load_malformed_toml_fails() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("bad.toml");
    fs::write(&config_path, "[api\nbase_url = 1").expect("should write config");

    let err = HarnessConfig::load(&config_path)
        .await
        .expect_err("malformed TOML should fail to load");
    assert!(matches!(
        err,
        AlertcheckError::Config(ConfigError::ParseFailed { .. })
    ));
}
