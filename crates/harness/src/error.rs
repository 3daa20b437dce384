//! 하니스 에러 타입
//!
//! [`HarnessError`]는 서버 통신, GELF 전송, 폴링, 프로세스 제어에서 발생하는
//! 모든 에러를 표현합니다. `From<HarnessError> for AlertcheckError` 변환이
//! 구현되어 있어 상위 레이어에서 `?` 연산자로 전파할 수 있습니다.

use std::time::Duration;

use alertcheck_core::error::{AlertcheckError, ConfigError};

/// 하니스 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// GELF 수신 포트 연결 실패 (재시도하지 않음)
    #[error("failed to connect to {addr}: {source}")]
    Connection {
        /// 연결 대상 주소
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// 전송할 이벤트가 JSON 객체가 아님
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    /// HTTP 전송 계층 에러
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// API가 성공 이외의 상태 코드를 반환
    #[error("{method} {url} returned {status}: {body}")]
    Api {
        method: &'static str,
        url: String,
        status: u16,
        /// 응답 본문 (진단용)
        body: String,
    },

    /// 응답에 기대한 키가 없거나 형식이 다름
    #[error("malformed response from {path}: {reason}")]
    MalformedResponse {
        /// 요청 경로
        path: String,
        reason: String,
    },

    /// 폴링 최대 대기 시간 초과
    #[error("timed out waiting for {what} after {waited:?}")]
    Timeout {
        /// 기다리던 조건
        what: String,
        /// 실제 대기한 시간
        waited: Duration,
    },

    /// 서버 프로세스 제어 실패
    #[error("server lifecycle error: {0}")]
    Server(String),

    /// 설정 에러
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// JSON 직렬화 에러
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    /// 서버가 아직 리스닝하지 않아 연결이 거부된 경우인지 확인합니다.
    ///
    /// DNS 실패나 연결 타임아웃은 거부로 보지 않습니다.
    pub fn is_connection_refused(&self) -> bool {
        match self {
            Self::Connection { source, .. } => {
                source.kind() == std::io::ErrorKind::ConnectionRefused
            }
            Self::Http(e) => e.is_connect() && refused_in_chain(e),
            _ => false,
        }
    }
}

/// 에러 체인을 따라 내려가 `ConnectionRefused` I/O 에러가 있는지 찾습니다.
fn refused_in_chain(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionRefused {
                return true;
            }
        }
        current = e.source();
    }
    false
}

impl From<HarnessError> for AlertcheckError {
    fn from(err: HarnessError) -> Self {
        match err {
            HarnessError::Config(e) => AlertcheckError::Config(e),
            HarnessError::Io(e) => AlertcheckError::Io(e),
            HarnessError::Timeout { what, waited } => AlertcheckError::Timeout {
                what,
                waited_ms: waited.as_millis(),
            },
            other => AlertcheckError::Harness(other.to_string()),
        }
    }
}
