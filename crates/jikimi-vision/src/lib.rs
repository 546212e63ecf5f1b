//! # jikimi-vision
//!
//! 화면 캡처 어댑터. xcap으로 주 모니터를 캡처하고 감시 영역으로
//! 잘라낸 뒤 PNG로 인코딩한다.

pub mod capture;

pub use capture::RegionCapture;
