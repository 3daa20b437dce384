//! Distinct field scenarios.
//!
//! A rule with `distinction_fields = ["port"]` only counts distinct `port`
//! values toward its threshold.

use serde_json::json;

use alertcheck_harness::{AggregationRule, ThresholdType};

use crate::helpers::*;

/// One event under a distinct-field rule must not make the server throw.
#[tokio::test]
#[ignore = "requires docker compose and a Graylog runtime directory"]
async fn send_alert_should_not_raise_exception_when_there_is_a_distinct_field() {
    let harness = start_harness().await;
    let api = harness.api();

    let mut input = api.create_gelf_input().await.expect("input should start");
    let rule = AggregationRule::builder("AAA", ThresholdType::More, 2)
        .distinct(["port"])
        .period_secs(PERIOD_SECS)
        .build();
    api.create_aggregation_rule(&rule)
        .await
        .expect("rule should be created");

    input.send(json!({"_port": 80})).await.expect("send");

    let logs = harness
        .server_logs(2 * period())
        .await
        .expect("logs should be readable");
    assert!(
        !logs.contains(ILLEGAL_STATE),
        "server logged {} while evaluating distinct fields",
        ILLEGAL_STATE
    );

    input.close().await.expect("close");
    harness.stop().await.expect("stop");
}

/// Two distinct ports within one period exceed `MORE 1` exactly once.
#[tokio::test]
#[ignore = "requires docker compose and a Graylog runtime directory"]
async fn distinct_values_over_threshold_raise_exactly_one_event() {
    let harness = start_harness().await;
    let api = harness.api();

    let mut input = api.create_gelf_input().await.expect("input should start");
    let rule = AggregationRule::builder("distinct ports", ThresholdType::More, 1)
        .distinct(["port"])
        .period_secs(PERIOD_SECS)
        .build();
    api.create_aggregation_rule(&rule)
        .await
        .expect("rule should be created");

    input.send(json!({"_port": 80})).await.expect("send");
    input.send(json!({"_port": 81})).await.expect("send");

    tokio::time::sleep(period()).await;
    input.send(json!({"_port": 80})).await.expect("send");
    tokio::time::sleep(period()).await;

    let total = api.count_events().await.expect("event search");
    assert_eq!(total, 1, "expected exactly one aggregation event");

    input.close().await.expect("close");
    harness.stop().await.expect("stop");
}
