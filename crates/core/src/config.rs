//! 설정 관리 — alertcheck.toml 파싱 및 런타임 설정
//!
//! [`HarnessConfig`]는 하니스의 모든 컴포넌트 설정을 담는 최상위 구조체입니다.
//! 서버 주소, 인증 정보, 요청 헤더, 폴링 주기를 전역 상수 대신 이 구조체로
//! 명시적으로 전달합니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`ALERTCHECK_API_BASE_URL=http://graylog:9000/api/` 형식)
//! 3. 설정 파일 (`alertcheck.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), alertcheck_core::error::AlertcheckError> {
//! use alertcheck_core::config::HarnessConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = HarnessConfig::load("alertcheck.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = HarnessConfig::parse("[polling]\nmax_wait_secs = 60")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AlertcheckError, ConfigError};

/// alertcheck 통합 설정
///
/// `alertcheck.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// 일반 설정 (로깅)
    #[serde(default)]
    pub general: GeneralConfig,
    /// 서버 프로세스 제어 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 관리 REST API 설정
    #[serde(default)]
    pub api: ApiConfig,
    /// GELF TCP 수신 주소 설정
    #[serde(default)]
    pub intake: IntakeConfig,
    /// 폴링 주기 및 최대 대기 시간
    #[serde(default)]
    pub polling: PollingConfig,
}

impl HarnessConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, AlertcheckError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, AlertcheckError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AlertcheckError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                AlertcheckError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, AlertcheckError> {
        toml::from_str(toml_str).map_err(|e| {
            AlertcheckError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `ALERTCHECK_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "ALERTCHECK_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "ALERTCHECK_GENERAL_LOG_FORMAT");

        // Server
        override_string(&mut self.server.working_dir, "ALERTCHECK_SERVER_WORKING_DIR");
        override_words(
            &mut self.server.compose_command,
            "ALERTCHECK_SERVER_COMPOSE_COMMAND",
        );

        // API
        override_string(&mut self.api.base_url, "ALERTCHECK_API_BASE_URL");
        override_string(&mut self.api.username, "ALERTCHECK_API_USERNAME");
        override_string(&mut self.api.password, "ALERTCHECK_API_PASSWORD");
        override_string(&mut self.api.requested_by, "ALERTCHECK_API_REQUESTED_BY");
        override_u64(
            &mut self.api.request_timeout_secs,
            "ALERTCHECK_API_REQUEST_TIMEOUT_SECS",
        );

        // Intake
        override_string(&mut self.intake.address, "ALERTCHECK_INTAKE_ADDRESS");

        // Polling
        override_u64(
            &mut self.polling.input_interval_ms,
            "ALERTCHECK_POLLING_INPUT_INTERVAL_MS",
        );
        override_u64(
            &mut self.polling.readiness_interval_ms,
            "ALERTCHECK_POLLING_READINESS_INTERVAL_MS",
        );
        override_u64(
            &mut self.polling.max_wait_secs,
            "ALERTCHECK_POLLING_MAX_WAIT_SECS",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), AlertcheckError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(invalid(
                "general.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(invalid(
                "general.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        if self.server.compose_command.is_empty() {
            return Err(invalid(
                "server.compose_command",
                "must contain at least the program name".to_owned(),
            ));
        }

        let base_url = self.api.base_url.as_str();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(invalid(
                "api.base_url",
                "must start with http:// or https://".to_owned(),
            ));
        }
        // 상대 경로 join 시 마지막 세그먼트가 사라지지 않도록 '/'로 끝나야 함
        if !base_url.ends_with('/') {
            return Err(invalid("api.base_url", "must end with '/'".to_owned()));
        }

        if self.api.requested_by.is_empty() {
            return Err(invalid(
                "api.requested_by",
                "X-Requested-By header value must not be empty".to_owned(),
            ));
        }

        if self.api.request_timeout_secs == 0 {
            return Err(invalid(
                "api.request_timeout_secs",
                "must be greater than 0".to_owned(),
            ));
        }

        parse_port(&self.intake.address)?;

        if self.polling.input_interval_ms == 0 {
            return Err(invalid(
                "polling.input_interval_ms",
                "must be greater than 0".to_owned(),
            ));
        }
        if self.polling.readiness_interval_ms == 0 {
            return Err(invalid(
                "polling.readiness_interval_ms",
                "must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 서버 프로세스 제어 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// compose 파일이 있는 작업 디렉토리
    pub working_dir: String,
    /// compose 명령 접두사 (예: `["docker", "compose"]`)
    pub compose_command: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            working_dir: "../runtime".to_owned(),
            compose_command: vec!["docker".to_owned(), "compose".to_owned()],
        }
    }
}

/// 관리 REST API 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API 기본 URL ('/'로 끝나야 함)
    pub base_url: String,
    /// Basic 인증 사용자명
    pub username: String,
    /// Basic 인증 비밀번호
    pub password: String,
    /// `X-Requested-By` 헤더 값 (Graylog CSRF 보호)
    pub requested_by: String,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9000/api/".to_owned(),
            username: "admin".to_owned(),
            password: "admin".to_owned(),
            requested_by: "test-program".to_owned(),
            request_timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// 요청 타임아웃을 `Duration`으로 반환합니다.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// GELF TCP 수신 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// 서버의 GELF TCP 수신 주소 (`host:port`)
    pub address: String,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:12201".to_owned(),
        }
    }
}

impl IntakeConfig {
    /// 주소의 포트 부분을 반환합니다. 입력 생성 payload의 `port` 필드에 사용됩니다.
    pub fn port(&self) -> Result<u16, ConfigError> {
        parse_port(&self.address)
    }
}

/// 폴링 설정
///
/// 모든 대기 루프(입력 상태, 서버 준비 상태)는 이 값으로 주기와 상한을 결정합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// 입력 상태 폴링 주기 (밀리초)
    pub input_interval_ms: u64,
    /// 서버 준비 상태 폴링 주기 (밀리초)
    pub readiness_interval_ms: u64,
    /// 최대 대기 시간 (초). 0이면 무제한
    pub max_wait_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            input_interval_ms: 100,
            readiness_interval_ms: 1000,
            max_wait_secs: 300,
        }
    }
}

impl PollingConfig {
    pub fn input_interval(&self) -> Duration {
        Duration::from_millis(self.input_interval_ms)
    }

    pub fn readiness_interval(&self) -> Duration {
        Duration::from_millis(self.readiness_interval_ms)
    }

    /// 최대 대기 시간. `None`이면 무제한 대기합니다.
    pub fn max_wait(&self) -> Option<Duration> {
        (self.max_wait_secs > 0).then(|| Duration::from_secs(self.max_wait_secs))
    }
}

fn invalid(field: &str, reason: String) -> AlertcheckError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason,
    }
    .into()
}

fn parse_port(address: &str) -> Result<u16, ConfigError> {
    let invalid_address = |reason: &str| ConfigError::InvalidValue {
        field: "intake.address".to_owned(),
        reason: format!("'{}': {}", address, reason),
    };

    let (host, port) = address
        .rsplit_once(':')
        .ok_or_else(|| invalid_address("expected host:port"))?;
    if host.is_empty() {
        return Err(invalid_address("host must not be empty"));
    }
    port.parse::<u16>()
        .map_err(|_| invalid_address("port must be a number between 0 and 65535"))
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_words(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val.split_whitespace().map(str::to_owned).collect();
    }
}
