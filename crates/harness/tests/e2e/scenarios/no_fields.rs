//! Rules without grouping or distinct fields.

use serde_json::json;

use alertcheck_harness::{AggregationRule, ThresholdType};

use crate::helpers::*;

/// `MORE 0` with no fields and an empty event must not hit a null dereference server-side.
#[tokio::test]
#[ignore = "requires docker compose and a Graylog runtime directory"]
async fn empty_event_without_fields_should_not_raise_null_pointer() {
    let harness = start_harness().await;
    let api = harness.api();

    let mut input = api.create_gelf_input().await.expect("input should start");
    let rule = AggregationRule::builder("no fields", ThresholdType::More, 0)
        .period_secs(PERIOD_SECS)
        .build();
    api.create_aggregation_rule(&rule)
        .await
        .expect("rule should be created");

    input.send(json!({})).await.expect("send");

    let logs = harness
        .server_logs(2 * period())
        .await
        .expect("logs should be readable");
    assert!(
        !logs.contains(NULL_POINTER),
        "server logged {} for a rule without fields",
        NULL_POINTER
    );

    input.close().await.expect("close");
    harness.stop().await.expect("stop");
}
