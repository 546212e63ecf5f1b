//! 제어 채널 와이어 프로토콜.
//!
//! 개행으로 구분된 UTF-8 행, 행마다 독립된 JSON 객체.
//!
//! - 인바운드: `{"command":"start","zone":[x,y,w,h]}` | `{"command":"stop"}`
//! - 아웃바운드: `{"log":"<문자열>"}`
//!
//! 알 수 없는 `command` 값이나 깨진 JSON은 파싱 에러가 되고,
//! 세션 핸들러는 해당 행을 조용히 버린다 (세션은 유지).

use serde::{Deserialize, Serialize};

/// 클라이언트 → 서버 명령
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum Command {
    /// 감시 시작 — `zone`은 `[x, y, w, h]` 정수 4개
    Start {
        /// 감시 영역 배열
        zone: [i64; 4],
    },
    /// 감시 중지
    Stop,
}

impl Command {
    /// 한 행(개행 제외)을 명령으로 파싱
    pub fn parse_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// 서버 → 클라이언트 로그 행
///
/// 심각도 구분 없음 — 모든 행은 정보성이며 발생 순서대로 전달된다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    /// 로그 본문
    pub log: String,
}

impl LogLine {
    /// 새 로그 행 생성
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            log: message.into(),
        }
    }

    /// 개행이 붙은 와이어 표현으로 직렬화
    pub fn to_wire(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut bytes = serde_json::to_vec(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}
