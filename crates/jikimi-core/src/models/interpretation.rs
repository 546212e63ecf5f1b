//! 비전 백엔드 해석 결과.
//!
//! 성공/실패를 내부적으로는 태그로 구분하되, 알림 경로에서는 둘 다
//! 동일한 상태 텍스트로 흘러간다. 실패가 정상 상태 메시지와 같은
//! 채널로 운영자에게 보이게 하는 것이 원 시스템의 의도적 동작이다.

use serde::{Deserialize, Serialize};

/// 해석 결과 — 성공한 상태 텍스트 또는 에러 요약
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpretation {
    /// 백엔드가 돌려준 자유 텍스트 상태 (내용은 불투명, 그대로 전달)
    Status(String),
    /// 백엔드/설정 실패 요약
    Failure(String),
}

impl Interpretation {
    /// 에러를 실패 결과로 변환
    pub fn from_error(err: impl std::fmt::Display) -> Self {
        Self::Failure(err.to_string())
    }

    /// 실패 여부
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// 알림에 실을 상태 텍스트로 변환.
    ///
    /// 실패는 에러 모양 JSON(`{"state":"error","summary":...}`)으로
    /// 렌더링된다 — 원 시스템이 백엔드 실패를 그대로 채팅 채널에
    /// 내보내던 것과 동일한 표면.
    pub fn status_text(&self) -> String {
        match self {
            Self::Status(text) => text.clone(),
            Self::Failure(summary) => {
                serde_json::json!({"state": "error", "summary": summary}).to_string()
            }
        }
    }
}
