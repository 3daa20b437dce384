//! GELF TCP 전송기
//!
//! Graylog GELF TCP 입력으로 로그 이벤트를 전송합니다.
//! 각 메시지는 JSON 문서 하나와 NUL 바이트(`\0`) 하나로 구성되며,
//! NUL 바이트가 메시지 경계(framing)입니다.
//!
//! # 기본 봉투(envelope)
//!
//! 모든 메시지는 `version`, `host`, `short_message` 필드를 기본으로 가지며,
//! 호출자가 넘긴 필드가 같은 키를 덮어쓰거나 새 필드를 추가합니다.
//!
//! # 자원 관리
//!
//! [`GelfSender`]는 TCP 연결 하나를 단독 소유합니다. `close()`는 `self`를
//! 소비하므로 닫힌 연결을 다시 쓸 수 없고, 명시적으로 닫지 않아도
//! drop 시점에 소켓이 해제됩니다 (시나리오 중간에 assertion이 실패해도 동일).

use serde_json::{Map, Value};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::error::HarnessError;

/// GELF 프로토콜 버전
pub const GELF_VERSION: &str = "1.1";
/// 기본 `host` 필드 값
pub const DEFAULT_HOST: &str = "test.org";
/// 기본 `short_message` 필드 값
pub const DEFAULT_SHORT_MESSAGE: &str = "test message";
/// 메시지 구분자
pub const FRAME_DELIMITER: u8 = b'\0';

/// 전송 단위 GELF 메시지
///
/// 필드 순서는 삽입 순서를 따릅니다 (기본 봉투가 먼저).
#[derive(Debug, Clone, PartialEq)]
pub struct GelfMessage {
    fields: Map<String, Value>,
}

impl Default for GelfMessage {
    fn default() -> Self {
        let mut fields = Map::new();
        fields.insert("version".to_owned(), Value::from(GELF_VERSION));
        fields.insert("host".to_owned(), Value::from(DEFAULT_HOST));
        fields.insert(
            "short_message".to_owned(),
            Value::from(DEFAULT_SHORT_MESSAGE),
        );
        Self { fields }
    }
}

impl GelfMessage {
    /// 기본 봉투만 가진 메시지를 만듭니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 기본 봉투 위에 `fields`를 병합합니다.
    ///
    /// `fields`는 JSON 객체여야 합니다. `null`은 빈 객체로 취급합니다.
    pub fn from_fields(fields: Value) -> Result<Self, HarnessError> {
        let mut message = Self::default();
        match fields {
            Value::Object(map) => message.fields.extend(map),
            Value::Null => {}
            other => {
                return Err(HarnessError::InvalidEvent(format!(
                    "event fields must be a JSON object, got {}",
                    other
                )));
            }
        }
        Ok(message)
    }

    /// 필드 하나를 추가하거나 덮어씁니다.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// 와이어 형식으로 인코딩합니다: JSON 텍스트 + `\0`.
    pub fn encode(&self) -> Result<Vec<u8>, HarnessError> {
        let mut buf = serde_json::to_vec(&self.fields)?;
        buf.push(FRAME_DELIMITER);
        Ok(buf)
    }
}

/// GELF TCP 전송기
///
/// 서버의 GELF TCP 입력에 대한 지속 연결 하나를 소유합니다.
#[derive(Debug)]
pub struct GelfSender {
    addr: String,
    stream: TcpStream,
    sent: u64,
}

impl GelfSender {
    /// `addr`(`host:port`)로 TCP 연결을 엽니다.
    ///
    /// 연결할 수 없으면 [`HarnessError::Connection`]을 반환합니다. 재시도하지 않습니다.
    pub async fn connect(addr: &str) -> Result<Self, HarnessError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| HarnessError::Connection {
                addr: addr.to_owned(),
                source,
            })?;
        info!(addr, "connected to GELF intake");
        Ok(Self {
            addr: addr.to_owned(),
            stream,
            sent: 0,
        })
    }

    /// 호출자 필드를 기본 봉투에 병합하여 메시지 하나를 전송합니다.
    pub async fn send(&mut self, fields: Value) -> Result<(), HarnessError> {
        let message = GelfMessage::from_fields(fields)?;
        self.send_message(&message).await
    }

    /// 이미 구성된 메시지를 전송합니다.
    pub async fn send_message(&mut self, message: &GelfMessage) -> Result<(), HarnessError> {
        let frame = message.encode()?;
        debug!(
            addr = %self.addr,
            bytes = frame.len(),
            fields = ?message.fields(),
            "sending GELF message"
        );
        self.stream.write_all(&frame).await?;
        self.sent += 1;
        Ok(())
    }

    /// 지금까지 전송한 메시지 수
    pub fn sent(&self) -> u64 {
        self.sent
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// 쓰기 방향을 종료하고 연결을 해제합니다.
    pub async fn close(mut self) -> Result<(), HarnessError> {
        self.stream.flush().await?;
        self.stream.shutdown().await?;
        info!(addr = %self.addr, sent = self.sent, "closed GELF connection");
        Ok(())
    }
}
