//! alertcheck 공통 크레이트
//!
//! 하니스 전체가 공유하는 설정 구조체와 최상위 에러 타입을 제공합니다.
//!
//! # 모듈 구성
//!
//! - [`config`]: `alertcheck.toml` 파싱, 환경변수 오버라이드, 유효성 검증
//! - [`error`]: 최상위 에러 타입 및 설정 에러

pub mod config;
pub mod error;

// --- 주요 타입 re-export ---

// 에러
pub use error::{AlertcheckError, ConfigError};

// 설정
pub use config::{
    ApiConfig, GeneralConfig, HarnessConfig, IntakeConfig, PollingConfig, ServerConfig,
};
