//! 관리 REST API 클라이언트 통합 테스트
//!
//! wiremock으로 Graylog API를 흉내 내어 요청 형식(인증, 헤더, payload)과
//! 입력 상태 폴링, 응답 처리 에러를 검증합니다.

mod common;

use serde_json::json;
use wiremock::matchers::{basic_auth, body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use alertcheck_harness::{AggregationRule, GraylogApi, HarnessError, ThresholdType};
use common::*;

async fn api_for(server: &MockServer, intake_addr: &str) -> GraylogApi {
    GraylogApi::new(&test_config(&server.uri(), intake_addr)).expect("api should build")
}

#[tokio::test]
async fn requests_carry_basic_auth_and_requested_by_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/system/inputstates/"))
        .and(basic_auth("admin", "admin"))
        .and(header("X-Requested-By", "test-program"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"states": []})))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, "127.0.0.1:12201").await;
    let states = api.input_states().await.unwrap();
    assert!(states.is_empty());
}

#[tokio::test]
async fn input_is_running_only_for_matching_running_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/system/inputstates/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "states": [
                {"id": "a", "state": "RUNNING"},
                {"id": "b", "state": "STARTING"}
            ]
        })))
        .mount(&server)
        .await;

    let api = api_for(&server, "127.0.0.1:12201").await;
    assert!(api.input_is_running("a").await.unwrap());
    assert!(!api.input_is_running("b").await.unwrap());
    assert!(!api.input_is_running("missing").await.unwrap());
}

#[tokio::test]
async fn create_gelf_input_waits_for_running_then_connects() {
    init_tracing();
    let server = MockServer::start().await;
    let (listener, intake_addr) = intake_listener().await;
    let port: u16 = intake_addr.rsplit_once(':').unwrap().1.parse().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/system/inputs"))
        .and(body_partial_json(json!({
            "type": "org.graylog2.inputs.gelf.tcp.GELFTCPInput",
            "global": true,
            "configuration": {"port": port, "use_null_delimiter": true, "tls_enable": false}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "input-1"})))
        .expect(1)
        .mount(&server)
        .await;

    // 처음 두 번은 목록에 없거나 STARTING, 이후 RUNNING
    Mock::given(method("GET"))
        .and(path("/api/system/inputstates/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"states": []})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/system/inputstates/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "states": [{"id": "input-1", "state": "STARTING"}]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/system/inputstates/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "states": [{"id": "input-1", "state": "RUNNING"}]
        })))
        .mount(&server)
        .await;

    let api = api_for(&server, &intake_addr).await;
    let mut input = api.create_gelf_input().await.expect("input should start");
    assert_eq!(input.id(), "input-1");

    input.send(json!({"_port": 80})).await.unwrap();
    input.close().await.unwrap();

    let frames = receive_frames(&listener).await;
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0]["_port"], 80);

    let state_polls = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/api/system/inputstates/")
        .count();
    assert_eq!(state_polls, 3);
}

#[tokio::test]
async fn create_gelf_input_times_out_when_id_never_appears() {
    let server = MockServer::start().await;
    let (_listener, intake_addr) = intake_listener().await;

    Mock::given(method("POST"))
        .and(path("/api/system/inputs"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "ghost"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/system/inputstates/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"states": []})))
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri(), &intake_addr);
    config.polling.max_wait_secs = 1;
    let api = GraylogApi::new(&config).unwrap();

    let err = api.create_gelf_input().await.unwrap_err();
    match err {
        HarnessError::Timeout { what, .. } => assert!(what.contains("ghost")),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn create_gelf_input_fails_on_missing_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/system/inputs"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"title": "Inputs"})))
        .mount(&server)
        .await;

    let api = api_for(&server, "127.0.0.1:12201").await;
    let err = api.create_gelf_input().await.unwrap_err();
    assert!(matches!(err, HarnessError::MalformedResponse { .. }));
}

#[tokio::test]
async fn create_gelf_input_surfaces_api_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/system/inputs"))
        .respond_with(ResponseTemplate::new(400).set_body_string("port already in use"))
        .mount(&server)
        .await;

    let api = api_for(&server, "127.0.0.1:12201").await;
    match api.create_gelf_input().await.unwrap_err() {
        HarnessError::Api { status, body, .. } => {
            assert_eq!(status, 400);
            assert_eq!(body, "port already in use");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn aggregation_rule_payload_matches_wire_format() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/events/definitions"))
        .and(body_json(json!({
            "alert": false,
            "config": {
                "comment": "",
                "distinction_fields": ["port"],
                "execute_every_ms": 5000,
                "grouping_fields": [],
                "search_query": "*",
                "search_within_ms": 5000,
                "stream": "000000000000000000000001",
                "threshold": 2,
                "threshold_type": "MORE",
                "type": "aggregation-count"
            },
            "description": "",
            "field_spec": {},
            "key_spec": [],
            "notification_settings": {"backlog_size": null, "grace_period_ms": 0},
            "notifications": [],
            "priority": 2,
            "title": "AAA"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "def-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, "127.0.0.1:12201").await;
    let rule = AggregationRule::builder("AAA", ThresholdType::More, 2)
        .distinct(["port"])
        .period_secs(5)
        .build();
    api.create_aggregation_rule(&rule).await.unwrap();
}

#[tokio::test]
async fn aggregation_rule_rejection_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/events/definitions"))
        .respond_with(ResponseTemplate::new(422).set_body_string("invalid config"))
        .mount(&server)
        .await;

    let api = api_for(&server, "127.0.0.1:12201").await;
    let rule = AggregationRule::builder("bad", ThresholdType::Less, 1).build();
    let err = api.create_aggregation_rule(&rule).await.unwrap_err();
    assert!(matches!(err, HarnessError::Api { status: 422, .. }));
}

#[tokio::test]
async fn count_events_posts_empty_search() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/events/search"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "events": [],
            "total_events": 1,
            "duration": 4
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, "127.0.0.1:12201").await;
    assert_eq!(api.count_events().await.unwrap(), 1);
}

#[tokio::test]
async fn count_events_without_total_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/events/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"events": []})))
        .mount(&server)
        .await;

    let api = api_for(&server, "127.0.0.1:12201").await;
    let err = api.count_events().await.unwrap_err();
    assert!(matches!(err, HarnessError::MalformedResponse { .. }));
}

#[tokio::test]
async fn raw_put_sends_json_payload() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/system/inputs/input-1"))
        .and(body_json(json!({"title": "renamed"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server, "127.0.0.1:12201").await;
    let response = api
        .put("system/inputs/input-1", &json!({"title": "renamed"}))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);
}
