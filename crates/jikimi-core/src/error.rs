//! JIKIMI 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 외부 실패를 이 타입으로 변환한다.
//! 감시 루프 안에서는 백엔드/알림 에러가 프로세스를 죽이지 않고
//! 에러 모양 결과(`Interpretation::Failure`)나 로그 라인으로 흡수된다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 설정, 캡처, 네트워크, 프로토콜 등 도메인 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류 (빈 프롬프트, 누락된 webhook URL 등)
    #[error("설정 에러: {0}")]
    Config(String),

    /// 화면 캡처 실패
    #[error("캡처 에러: {0}")]
    Capture(String),

    /// 네트워크 에러 (연결 실패, 타임아웃, HTTP 오류)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 알림 전달 실패 (2xx 이외 응답 포함)
    #[error("알림 전달 에러: {0}")]
    Notify(String),

    /// 제어 채널 프로토콜 위반 (행 길이 초과 등)
    #[error("프로토콜 에러: {0}")]
    Protocol(String),

    /// 감시 영역 유효성 검증 실패
    #[error("영역 검증 실패 — {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}
