//! 상태 알림 포트.
//!
//! 구현: `jikimi-network` crate (Teams incoming webhook)

use async_trait::async_trait;

use crate::error::CoreError;

/// 상태 알림 인터페이스
///
/// 전달 실패는 호출자에게 에러로 보고되어 세션 로그가 될 뿐,
/// 감시 루프를 중단시키지 않는다. 재시도 없음.
#[async_trait]
pub trait StatusNotifier: Send + Sync {
    /// 발신자 라벨과 상태 텍스트를 webhook으로 전달
    async fn notify(&self, sender: &str, status: &str) -> Result<(), CoreError>;
}
