//! aggregation-count 이벤트 정의
//!
//! [`AggregationRule`]은 평가 주기 동안 (선택적으로 그룹화/중복 제거된)
//! 메시지 수를 세어 임계값 조건을 만족하면 이벤트를 기록하는 서버 측 규칙입니다.
//!
//! # 와이어 매핑
//!
//! | 필드 | payload 키 |
//! |------|-----------|
//! | `threshold` (비교자, 값) | `config.threshold_type`, `config.threshold` |
//! | `period` (초) | `config.execute_every_ms`, `config.search_within_ms` (둘 다 동일) |
//! | `grouping_fields` | `config.grouping_fields` |
//! | `distinction_fields` | `config.distinction_fields` |
//!
//! 그룹/구분 필드가 비어 있어도 키는 생략하지 않고 빈 배열로 보냅니다.
//! 알림(notification)은 비활성화하며 규칙은 이벤트로만 기록됩니다.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use super::{GraylogApi, ensure_success};
use crate::error::HarnessError;

/// "All messages" 스트림 ID
pub const STREAM_ALL_MESSAGES: &str = "000000000000000000000001";
/// 이벤트 정의 생성 경로
pub const EVENT_DEFINITIONS_PATH: &str = "events/definitions";
/// 플러그인 이벤트 프로세서 타입
pub const AGGREGATION_COUNT_TYPE: &str = "aggregation-count";
/// 이벤트 정의 우선순위 (normal)
pub const DEFAULT_PRIORITY: u8 = 2;
/// 기본 평가 주기 (초)
pub const DEFAULT_PERIOD_SECS: u64 = 5;

/// 임계값 비교자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThresholdType {
    /// 개수 > 임계값
    More,
    /// 개수 < 임계값
    Less,
}

impl ThresholdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::More => "MORE",
            Self::Less => "LESS",
        }
    }
}

impl fmt::Display for ThresholdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ThresholdType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MORE" => Ok(Self::More),
            "LESS" => Ok(Self::Less),
            other => Err(format!(
                "unknown threshold type '{}', expected MORE or LESS",
                other
            )),
        }
    }
}

/// aggregation-count 규칙
///
/// 생성 후 변경하지 않습니다. [`AggregationRule::builder`]로 만듭니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationRule {
    title: String,
    threshold_type: ThresholdType,
    threshold: i64,
    period: Duration,
    grouping_fields: Vec<String>,
    distinction_fields: Vec<String>,
}

impl AggregationRule {
    pub fn builder(
        title: impl Into<String>,
        threshold_type: ThresholdType,
        threshold: i64,
    ) -> AggregationRuleBuilder {
        AggregationRuleBuilder {
            rule: AggregationRule {
                title: title.into(),
                threshold_type,
                threshold,
                period: Duration::from_secs(DEFAULT_PERIOD_SECS),
                grouping_fields: Vec::new(),
                distinction_fields: Vec::new(),
            },
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn threshold(&self) -> (ThresholdType, i64) {
        (self.threshold_type, self.threshold)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn grouping_fields(&self) -> &[String] {
        &self.grouping_fields
    }

    pub fn distinction_fields(&self) -> &[String] {
        &self.distinction_fields
    }

    /// 평가 주기 = 검색 범위 (밀리초)
    pub fn period_ms(&self) -> u64 {
        u64::try_from(self.period.as_millis()).unwrap_or(u64::MAX)
    }

    /// `events/definitions` 요청 payload
    pub fn to_payload(&self) -> Value {
        let period_ms = self.period_ms();
        json!({
            "alert": false,
            "config": {
                "comment": "",
                "distinction_fields": self.distinction_fields,
                "execute_every_ms": period_ms,
                "grouping_fields": self.grouping_fields,
                "search_query": "*",
                "search_within_ms": period_ms,
                "stream": STREAM_ALL_MESSAGES,
                "threshold": self.threshold,
                "threshold_type": self.threshold_type,
                "type": AGGREGATION_COUNT_TYPE
            },
            "description": "",
            "field_spec": {},
            "key_spec": [],
            "notification_settings": {
                "backlog_size": null,
                "grace_period_ms": 0
            },
            "notifications": [],
            "priority": DEFAULT_PRIORITY,
            "title": self.title
        })
    }

    /// 서버 플러그인이 결과 설명에 쓰는 것과 같은 형식의 조건 문장
    pub fn describe(&self) -> String {
        let mut description = format!(
            "Stream had {{0}} messages in the last {} milliseconds with trigger condition {} than {} messages",
            self.period_ms(),
            self.threshold_type.as_str().to_ascii_lowercase(),
            self.threshold
        );

        if !self.grouping_fields.is_empty() {
            description.push_str(" with the same value of the fields ");
            description.push_str(&self.grouping_fields.join(", "));
        }
        if !self.grouping_fields.is_empty() && !self.distinction_fields.is_empty() {
            description.push_str(", and");
        }
        if !self.distinction_fields.is_empty() {
            description.push_str(" with distinct values of the fields ");
            description.push_str(&self.distinction_fields.join(", "));
        }

        description.push_str(&format!(
            ". (Executes every: {} milliseconds)",
            self.period_ms()
        ));
        description
    }
}

/// [`AggregationRule`] 빌더
#[derive(Debug, Clone)]
pub struct AggregationRuleBuilder {
    rule: AggregationRule,
}

impl AggregationRuleBuilder {
    /// 평가 주기 (초). 검색 범위도 같은 값이 됩니다.
    pub fn period_secs(mut self, secs: u64) -> Self {
        self.rule.period = Duration::from_secs(secs);
        self
    }

    pub fn group_by<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule.grouping_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn distinct<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule.distinction_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> AggregationRule {
        self.rule
    }
}

impl GraylogApi {
    /// aggregation-count 이벤트 정의를 생성합니다.
    ///
    /// 규칙을 트리거할 이벤트보다 먼저 호출해야 합니다.
    pub async fn create_aggregation_rule(&self, rule: &AggregationRule) -> Result<(), HarnessError> {
        let payload = rule.to_payload();
        let response = self.post(EVENT_DEFINITIONS_PATH, &payload).await?;
        ensure_success("POST", response).await?;
        info!(title = %rule.title(), condition = %rule.describe(), "aggregation rule created");
        Ok(())
    }
}
