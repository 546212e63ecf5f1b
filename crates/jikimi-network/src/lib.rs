//! # jikimi-network
//!
//! 외부 HTTP 협력자 어댑터.
//!
//! - [`ollama_client`] — Ollama generate API 비전 해석 클라이언트
//! - [`teams_notifier`] — Teams incoming webhook 알림 (adaptive card)

pub mod ollama_client;
pub mod teams_notifier;

pub use ollama_client::OllamaVisionProvider;
pub use teams_notifier::TeamsNotifier;
