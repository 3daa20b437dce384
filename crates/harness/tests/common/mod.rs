//! 통합 테스트 공용 헬퍼

#![allow(dead_code)]

use std::time::Duration;

use serde_json::{Map, Value};
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;

use alertcheck_core::config::HarnessConfig;

/// 빠른 폴링 주기와 짧은 최대 대기 시간을 가진 테스트 설정
pub fn test_config(api_uri: &str, intake_addr: &str) -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.api.base_url = format!("{}/api/", api_uri.trim_end_matches('/'));
    config.api.request_timeout_secs = 5;
    config.intake.address = intake_addr.to_owned();
    config.polling.input_interval_ms = 10;
    config.polling.readiness_interval_ms = 20;
    config.polling.max_wait_secs = 2;
    config
}

/// 임의 포트에 GELF 수신용 리스너를 엽니다.
pub async fn intake_listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("should bind intake listener");
    let addr = listener.local_addr().expect("should have addr").to_string();
    (listener, addr)
}

/// 아무도 리스닝하지 않는 로컬 주소를 얻습니다.
pub fn unused_local_addr() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("should bind");
    let addr = listener.local_addr().expect("should have addr").to_string();
    drop(listener);
    addr
}

/// 연결 하나를 수락해 EOF까지 읽고 NUL 기준으로 나눈 JSON 객체 목록을 반환합니다.
pub async fn receive_frames(listener: &TcpListener) -> Vec<Map<String, Value>> {
    let (mut stream, _) = tokio::time::timeout(Duration::from_secs(5), listener.accept())
        .await
        .expect("sender should connect in time")
        .expect("accept should succeed");

    let mut buf = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut buf))
        .await
        .expect("sender should close in time")
        .expect("read should succeed");

    assert_eq!(buf.last(), Some(&0), "stream must end with a NUL delimiter");
    buf[..buf.len() - 1]
        .split(|b| *b == 0)
        .map(|frame| serde_json::from_slice(frame).expect("frame should be a JSON object"))
        .collect()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("alertcheck_harness=debug")
        .with_test_writer()
        .try_init();
}
