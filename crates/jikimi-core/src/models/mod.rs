//! JIKIMI 도메인 모델.
//!
//! 제어 채널 프로토콜, 감시 영역, 해석 결과 구조체를 정의한다.
//! 와이어에 실리는 모델은 모두 `serde` Serialize/Deserialize를 구현한다.

pub mod interpretation;
pub mod protocol;
pub mod region;
