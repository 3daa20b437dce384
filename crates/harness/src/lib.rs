//! Graylog aggregation-count 알림 통합 테스트 하니스
//!
//! 외부 Graylog 서버를 기동/정지하고, GELF TCP로 로그 이벤트를 주입하고,
//! REST API로 입력과 aggregation-count 규칙을 구성한 뒤 서버가 기록한
//! 이벤트 상태를 검증합니다.
//!
//! # 모듈 구성
//!
//! - [`gelf`]: NUL 구분 GELF TCP 전송기
//! - [`api`]: 관리 REST API 클라이언트 (입력 생성, 규칙 생성, 이벤트 조회)
//! - [`readiness`]: deflector 준비 상태 대기
//! - [`poll`]: 공통 폴링 루프 (주기 + 최대 대기 시간)
//! - [`server`]: 서버 프로세스 수명 관리 (`docker compose`)
//! - [`harness`]: 시나리오 단위 fixture
//! - [`error`]: 도메인 에러 타입
//!
//! # 흐름
//!
//! ```text
//! Harness::start -> wait_until_ready -> create_gelf_input -> create_aggregation_rule
//!     -> GelfInput::send ... -> sleep(period) -> count_events / server_logs -> assert
//! ```

pub mod api;
pub mod error;
pub mod gelf;
pub mod harness;
pub mod poll;
pub mod readiness;
pub mod server;

// --- 주요 타입 re-export ---

pub use api::{AggregationRule, GelfInput, GraylogApi, InputState, ThresholdType};
pub use error::HarnessError;
pub use gelf::{GelfMessage, GelfSender};
pub use harness::Harness;
pub use readiness::{check_ready, wait_until_ready};
pub use server::{ComposeServer, ServerLifecycle};
