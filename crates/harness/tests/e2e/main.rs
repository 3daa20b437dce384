//! Graylog 서버 대상 E2E 시나리오
//!
//! 실제 서버(docker compose)가 필요하므로 모든 시나리오는 `#[ignore]`입니다.
//!
//! # Test Structure
//!
//! - `helpers/` -- 설정 로딩, 하니스 기동, 공통 상수
//! - `scenarios/` -- aggregation-count 규칙 시나리오
//!
//! # Running
//!
//! ```bash
//! ALERTCHECK_CONFIG=alertcheck.toml \
//!     cargo test -p alertcheck-harness --test e2e -- --ignored --test-threads=1
//! ```

mod helpers;
mod scenarios;
