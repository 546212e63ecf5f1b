//! 화면 캡처 포트.
//!
//! 구현: `jikimi-vision` crate (xcap + image)

use crate::error::CoreError;
use crate::models::region::Region;

/// 화면 캡처 인터페이스 — 영역을 받아 PNG 바이트를 반환
///
/// 불투명한 동기 호출. 실패는 감시 루프에 즉시 종료 사유가 된다
/// (재시도 없음).
pub trait FrameSource: Send + Sync {
    /// 주어진 영역을 캡처해 PNG 인코딩 바이트로 반환
    fn capture_region(&self, region: Region) -> Result<Vec<u8>, CoreError>;
}
