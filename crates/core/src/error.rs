//! 에러 타입 — 도메인별 에러 정의

/// alertcheck 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum AlertcheckError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 하니스 동작 중 발생한 에러 (서버 통신, 폴링, 프로세스 제어)
    #[error("harness error: {0}")]
    Harness(String),

    /// 대기 시간 초과
    #[error("timed out waiting for {what} after {waited_ms} ms")]
    Timeout { what: String, waited_ms: u128 },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
