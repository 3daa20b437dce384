//! Graylog 관리 REST API 클라이언트
//!
//! [`GraylogApi`]는 고정 기본 URL, Basic 인증, `X-Requested-By` 헤더를 붙인
//! `get`/`put`/`post` 호출을 제공하고, 그 위에 복합 연산을 구성합니다.
//!
//! - [`input`]: GELF TCP 입력 생성 및 RUNNING 대기
//! - [`rule`]: aggregation-count 이벤트 정의 생성
//!
//! 모든 요청은 전송 전에 메서드, URL, payload를 로그로 남깁니다.

pub mod input;
pub mod rule;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info};

use alertcheck_core::config::{ApiConfig, HarnessConfig, IntakeConfig, PollingConfig};
use alertcheck_core::error::ConfigError;

use crate::error::HarnessError;

pub use input::{GelfInput, InputState};
pub use rule::{AggregationRule, AggregationRuleBuilder, ThresholdType};

/// Graylog 관리 API 클라이언트
#[derive(Debug, Clone)]
pub struct GraylogApi {
    client: Client,
    base_url: Url,
    username: String,
    password: String,
    intake: IntakeConfig,
    polling: PollingConfig,
}

impl GraylogApi {
    /// 설정으로부터 클라이언트를 생성합니다.
    ///
    /// `X-Requested-By` 헤더와 요청 타임아웃은 클라이언트 기본값으로 설정되고,
    /// Basic 인증은 요청마다 붙습니다.
    pub fn new(config: &HarnessConfig) -> Result<Self, HarnessError> {
        let ApiConfig {
            base_url,
            username,
            password,
            requested_by,
            ..
        } = &config.api;

        let base_url = Url::parse(base_url).map_err(|e| ConfigError::InvalidValue {
            field: "api.base_url".to_owned(),
            reason: e.to_string(),
        })?;

        let mut headers = HeaderMap::new();
        let requested_by =
            HeaderValue::from_str(requested_by).map_err(|e| ConfigError::InvalidValue {
                field: "api.requested_by".to_owned(),
                reason: e.to_string(),
            })?;
        headers.insert("X-Requested-By", requested_by);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.api.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url,
            username: username.clone(),
            password: password.clone(),
            intake: config.intake.clone(),
            polling: config.polling.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn polling(&self) -> &PollingConfig {
        &self.polling
    }

    pub fn intake(&self) -> &IntakeConfig {
        &self.intake
    }

    /// 기본 URL 기준으로 상대 경로를 해석합니다 (`urljoin` 규칙).
    pub fn build_url(&self, path: &str) -> Result<Url, HarnessError> {
        self.base_url.join(path).map_err(|e| {
            HarnessError::Config(ConfigError::InvalidValue {
                field: "api path".to_owned(),
                reason: format!("cannot join '{}' onto {}: {}", path, self.base_url, e),
            })
        })
    }

    pub async fn get(&self, path: &str) -> Result<Response, HarnessError> {
        let url = self.build_url(path)?;
        info!(method = "GET", %url, "api request");
        let response = self
            .client
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;
        Ok(response)
    }

    pub async fn put(&self, path: &str, payload: &Value) -> Result<Response, HarnessError> {
        let url = self.build_url(path)?;
        info!(method = "PUT", %url, %payload, "api request");
        let response = self
            .client
            .put(url)
            .basic_auth(&self.username, Some(&self.password))
            .json(payload)
            .send()
            .await?;
        Ok(response)
    }

    pub async fn post(&self, path: &str, payload: &Value) -> Result<Response, HarnessError> {
        let url = self.build_url(path)?;
        info!(method = "POST", %url, %payload, "api request");
        let response = self
            .client
            .post(url)
            .basic_auth(&self.username, Some(&self.password))
            .json(payload)
            .send()
            .await?;
        Ok(response)
    }

    /// 지금까지 기록된 이벤트 총 개수를 조회합니다 (`POST events/search`).
    pub async fn count_events(&self) -> Result<u64, HarnessError> {
        let path = "events/search";
        let response = self.post(path, &json!({})).await?;
        let body: EventSearchResponse = read_json("POST", path, response).await?;
        debug!(total_events = body.total_events, "event search");
        Ok(body.total_events)
    }
}

#[derive(Debug, Deserialize)]
struct EventSearchResponse {
    total_events: u64,
}

/// 응답 상태를 확인하고 본문을 `T`로 역직렬화합니다.
///
/// - 성공 이외의 상태 코드 → [`HarnessError::Api`]
/// - JSON이 아니거나 필수 키 누락 → [`HarnessError::MalformedResponse`]
pub(crate) async fn read_json<T: DeserializeOwned>(
    method: &'static str,
    path: &str,
    response: Response,
) -> Result<T, HarnessError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(HarnessError::Api {
            method,
            url,
            status: status.as_u16(),
            body: text,
        });
    }

    serde_json::from_str(&text).map_err(|e| HarnessError::MalformedResponse {
        path: path.to_owned(),
        reason: e.to_string(),
    })
}

/// 본문이 필요 없는 요청의 상태 코드만 확인합니다.
pub(crate) async fn ensure_success(
    method: &'static str,
    response: Response,
) -> Result<(), HarnessError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    Err(HarnessError::Api {
        method,
        url,
        status: status.as_u16(),
        body,
    })
}
