//! # jikimi-control
//!
//! 제어 서버 코어. TCP 리스너가 연결을 수락하고, 연결마다 독립된
//! 세션 태스크를 띄우며, 세션은 start/stop 명령에 따라 감시 루프를
//! 기동/취소한다.
//!
//! ## 동시성 모델
//!
//! 클라이언트당 최대 두 개의 태스크 — 세션 핸들러 하나, 활성 감시 루프
//! 하나. 세션 수 제한 없음. 세션 간 공유 상태는 읽기 전용
//! [`context::WatcherContext`]뿐이며, 취소 신호와 태스크 핸들은 세션이
//! 단독 소유한다. watch 채널 송신단이 사라지면 수신측 루프는 이를
//! 종료/취소와 동일하게 취급한다.
//!
//! ## 구조
//!
//! - [`server`] — TCP 수락 루프 ([`server::ControlServer`])
//! - [`session`] — 연결별 프로토콜 처리 + 감시 루프 수명 관리
//! - [`watch_loop`] — 취소 가능한 캡처→해석→알림 주기
//! - [`line_reader`] — 길이 제한 행 리더 (프레이밍)
//! - [`context`] — 세션들이 공유하는 읽기 전용 컨텍스트

pub mod context;
pub mod line_reader;
pub mod server;
pub mod session;
pub mod watch_loop;

pub use context::WatcherContext;
pub use server::ControlServer;
