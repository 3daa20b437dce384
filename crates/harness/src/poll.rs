//! 폴링 루프
//!
//! 서버 측 상태 전이(입력 RUNNING, deflector 준비)는 비동기로 일어나므로
//! 하니스는 "확인 → 대기 → 재시도"를 반복합니다. 모든 대기 루프가
//! [`poll_until`] 하나를 공유하여 주기와 최대 대기 시간 처리가 동일합니다.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::HarnessError;

/// `check`가 `true`를 반환할 때까지 `interval` 간격으로 반복 호출합니다.
///
/// - `check`가 에러를 반환하면 즉시 전파합니다 (재시도 여부는 호출자가 결정).
/// - `max_wait`이 `None`이면 무제한 대기합니다.
/// - 대기 시간이 `max_wait`을 넘으면 [`HarnessError::Timeout`]을 반환합니다.
///
/// 조건이 처음부터 참이면 `check`는 정확히 한 번만 호출됩니다.
pub async fn poll_until<F, Fut>(
    what: &str,
    interval: Duration,
    max_wait: Option<Duration>,
    mut check: F,
) -> Result<u32, HarnessError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, HarnessError>>,
{
    let started = Instant::now();
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        if check().await? {
            debug!(what, attempts, elapsed = ?started.elapsed(), "condition reached");
            return Ok(attempts);
        }

        let waited = started.elapsed();
        if let Some(max) = max_wait {
            if waited >= max {
                warn!(what, attempts, ?waited, "gave up waiting");
                return Err(HarnessError::Timeout {
                    what: what.to_owned(),
                    waited,
                });
            }
        }

        tokio::time::sleep(interval).await;
    }
}
