//! GELF TCP 입력 생성
//!
//! 입력 생성 요청 후 서버가 해당 입력을 `RUNNING`으로 보고할 때까지
//! `system/inputstates/`를 폴링하고, 준비되면 수신 주소로 연결된
//! [`GelfInput`]을 돌려줍니다.

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use super::{GraylogApi, read_json};
use crate::error::HarnessError;
use crate::gelf::{GelfMessage, GelfSender};
use crate::poll::poll_until;

/// Graylog GELF TCP 입력 타입 식별자
pub const GELF_TCP_INPUT_TYPE: &str = "org.graylog2.inputs.gelf.tcp.GELFTCPInput";
/// 입력 상태 목록 경로
pub const INPUT_STATES_PATH: &str = "system/inputstates/";
/// 입력 생성 경로
pub const INPUTS_PATH: &str = "system/inputs";
/// 입력이 메시지를 받을 수 있는 상태
pub const RUNNING: &str = "RUNNING";

/// 서버가 보고하는 입력 하나의 상태
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputState {
    pub id: String,
    pub state: String,
}

#[derive(Debug, Deserialize)]
struct InputStatesResponse {
    states: Vec<InputState>,
}

#[derive(Debug, Deserialize)]
struct CreatedInput {
    id: String,
}

/// GELF TCP 입력 생성 payload
///
/// 워커/버퍼 튜닝 값은 고정이며 TLS는 비활성화합니다.
/// TLS 키 필드는 비활성 상태에서도 `admin`으로 채워 보냅니다.
pub fn gelf_tcp_input_payload(port: u16) -> Value {
    json!({
        "configuration": {
            "bind_address": "0.0.0.0",
            "decompress_size_limit": 8_388_608,
            "max_message_size": 2_097_152,
            "number_worker_threads": 8,
            "override_source": null,
            "port": port,
            "recv_buffer_size": 1_048_576,
            "tcp_keepalive": false,
            "tls_cert_file": "",
            "tls_client_auth": "disabled",
            "tls_client_auth_cert_file": "",
            "tls_enable": false,
            "tls_key_file": "admin",
            "tls_key_password": "admin",
            "use_null_delimiter": true
        },
        "global": true,
        "title": "Inputs",
        "type": GELF_TCP_INPUT_TYPE
    })
}

/// 생성된 입력과, 그 입력의 수신 포트에 연결된 전송기
///
/// 시나리오 본문 동안 스코프로 보유합니다. drop 시 연결이 해제됩니다.
#[derive(Debug)]
pub struct GelfInput {
    id: String,
    sender: GelfSender,
}

impl GelfInput {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sender(&self) -> &GelfSender {
        &self.sender
    }

    pub async fn send(&mut self, fields: Value) -> Result<(), HarnessError> {
        self.sender.send(fields).await
    }

    pub async fn send_message(&mut self, message: &GelfMessage) -> Result<(), HarnessError> {
        self.sender.send_message(message).await
    }

    pub async fn close(self) -> Result<(), HarnessError> {
        self.sender.close().await
    }
}

impl GraylogApi {
    /// 서버가 보고하는 모든 입력 상태를 조회합니다.
    pub async fn input_states(&self) -> Result<Vec<InputState>, HarnessError> {
        let response = self.get(INPUT_STATES_PATH).await?;
        let body: InputStatesResponse = read_json("GET", INPUT_STATES_PATH, response).await?;
        Ok(body.states)
    }

    /// `identifier` 입력이 `RUNNING` 상태인지 확인합니다.
    ///
    /// 목록에 없으면 `false`입니다.
    pub async fn input_is_running(&self, identifier: &str) -> Result<bool, HarnessError> {
        let states = self.input_states().await?;
        Ok(states
            .iter()
            .find(|s| s.id == identifier)
            .is_some_and(|s| s.state == RUNNING))
    }

    /// GELF TCP 입력을 만들고 `RUNNING`이 될 때까지 기다린 뒤
    /// 수신 주소에 연결된 [`GelfInput`]을 반환합니다.
    ///
    /// 입력 ID가 상태 목록에 끝내 나타나지 않으면 `polling.max_wait_secs` 후
    /// [`HarnessError::Timeout`]을 반환합니다 (0이면 무제한 대기).
    pub async fn create_gelf_input(&self) -> Result<GelfInput, HarnessError> {
        let payload = gelf_tcp_input_payload(self.intake().port()?);
        let response = self.post(INPUTS_PATH, &payload).await?;
        let created: CreatedInput = read_json("POST", INPUTS_PATH, response).await?;
        let id = created.id;
        info!(input_id = %id, "input created, waiting for RUNNING");

        let identifier = id.as_str();
        let attempts = poll_until(
            &format!("input {} to be {}", identifier, RUNNING),
            self.polling().input_interval(),
            self.polling().max_wait(),
            || self.input_is_running(identifier),
        )
        .await?;
        info!(input_id = %id, attempts, "input is running");

        let sender = GelfSender::connect(&self.intake().address).await?;
        Ok(GelfInput { id, sender })
    }
}
