//! 서버 준비 상태 대기
//!
//! `system/deflector`가 `is_up: true`를 보고할 때까지 폴링합니다.
//!
//! # 상태 전이
//!
//! ```text
//! WAITING --(connection refused)--> WAITING
//! WAITING --(non-2xx / is_up=false)--> WAITING
//! WAITING --(is_up=true)--> READY
//! ```
//!
//! 서버 프로세스가 아직 리스닝하지 않는 동안의 연결 거부만 삼키고,
//! 그 외 전송 에러와 형식이 잘못된 2xx 응답은 즉시 전파합니다.

use serde::Deserialize;
use tracing::{debug, info};

use crate::api::{GraylogApi, read_json};
use crate::error::HarnessError;
use crate::poll::poll_until;

/// 준비 상태 엔드포인트
pub const DEFLECTOR_PATH: &str = "system/deflector";

#[derive(Debug, Deserialize)]
struct DeflectorStatus {
    is_up: bool,
}

/// 준비 상태를 한 번 확인합니다. 캐시하지 않습니다.
///
/// 연결 거부와 성공 이외의 상태 코드는 "아직 준비되지 않음"(`false`)으로 봅니다.
pub async fn check_ready(api: &GraylogApi) -> Result<bool, HarnessError> {
    let response = match api.get(DEFLECTOR_PATH).await {
        Ok(response) => response,
        Err(e) if e.is_connection_refused() => {
            debug!(error = %e, "server not listening yet");
            return Ok(false);
        }
        Err(e) => return Err(e),
    };

    if !response.status().is_success() {
        debug!(status = %response.status(), "deflector not available yet");
        return Ok(false);
    }

    let status: DeflectorStatus = read_json("GET", DEFLECTOR_PATH, response).await?;
    debug!(is_up = status.is_up, "deflector status");
    Ok(status.is_up)
}

/// 서버가 준비될 때까지 `polling.readiness_interval_ms` 간격으로 대기합니다.
///
/// 이미 준비된 상태면 요청 한 번으로 반환합니다.
/// `polling.max_wait_secs`를 넘기면 [`HarnessError::Timeout`]을 반환합니다.
pub async fn wait_until_ready(api: &GraylogApi) -> Result<(), HarnessError> {
    let polling = api.polling();
    let attempts = poll_until(
        "server deflector to be up",
        polling.readiness_interval(),
        polling.max_wait(),
        || check_ready(api),
    )
    .await?;
    info!(attempts, "server is ready");
    Ok(())
}
