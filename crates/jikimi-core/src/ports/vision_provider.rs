//! 비전 해석 백엔드 포트.
//!
//! 구현: `jikimi-network` crate (Ollama generate API)

use async_trait::async_trait;

use crate::error::CoreError;

/// 비전 해석 인터페이스 — 이미지와 프롬프트를 받아 자유 텍스트를 반환
///
/// 결과 텍스트는 코어에서 해석하지 않고 알림으로 그대로 전달된다.
/// 호출은 구현체의 타임아웃(기본 300초)으로 바운드된다.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// PNG 이미지를 프롬프트와 함께 해석
    async fn interpret(&self, image_png: &[u8], prompt: &str) -> Result<String, CoreError>;

    /// 백엔드 식별자 (로그용)
    fn provider_name(&self) -> &str;
}
