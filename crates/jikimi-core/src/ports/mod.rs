//! 포트 인터페이스 (trait).
//!
//! 각 어댑터 crate가 이 trait들을 구현하며,
//! `jikimi-app`에서 `Arc<dyn T>`로 와이어링한다.
//!
//! 비동기 trait은 `async_trait` 매크로로 object safety를 보장한다.
//! 캡처는 원 시스템과 동일하게 동기 호출로 취급한다
//! (감시 루프에서 `spawn_blocking`으로 감싼다).

pub mod frame_source;
pub mod notifier;
pub mod vision_provider;
