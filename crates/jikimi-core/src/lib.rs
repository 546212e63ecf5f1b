//! # jikimi-core
//!
//! JIKIMI 도메인 모델, 포트(trait) 정의, 에러 타입, 설정.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`] — 프로토콜/영역/해석 결과 구조체 (serde)
//! - [`ports`] — 어댑터 포트 인터페이스 (async_trait)
//! - [`error`] — 핵심 에러 타입 (thiserror)
//! - [`config`] — 애플리케이션 설정 구조체
//! - [`config_manager`] — 설정 파일 관리 (로드/생성)
//! - [`prompt`] — 프롬프트 파일 로딩

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;
pub mod prompt;
