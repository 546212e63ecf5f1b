//! 세션 공유 컨텍스트.
//!
//! 기동 시 한 번 구성되어 `Arc`로 모든 세션에 전달되는 읽기 전용 값.
//! 전역 가변 상태 없음 — 설정은 명시적으로 생성자에 주입된다.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use jikimi_core::config::AppConfig;
use jikimi_core::ports::frame_source::FrameSource;
use jikimi_core::ports::notifier::StatusNotifier;
use jikimi_core::ports::vision_provider::VisionProvider;

/// 세션/감시 루프가 공유하는 읽기 전용 컨텍스트
pub struct WatcherContext {
    /// 알림에 표시되는 장비 라벨
    pub instrument: String,
    /// 감시 주기
    pub interval: Duration,
    /// 프롬프트 파일 경로 (매 사이클 다시 읽음)
    pub prompt_file: PathBuf,
    /// 화면 캡처 어댑터
    pub frames: Arc<dyn FrameSource>,
    /// 비전 해석 어댑터
    pub vision: Arc<dyn VisionProvider>,
    /// 상태 알림 어댑터
    pub notifier: Arc<dyn StatusNotifier>,
}

impl WatcherContext {
    /// 설정과 어댑터로 컨텍스트 구성
    pub fn new(
        config: &AppConfig,
        frames: Arc<dyn FrameSource>,
        vision: Arc<dyn VisionProvider>,
        notifier: Arc<dyn StatusNotifier>,
    ) -> Self {
        Self {
            instrument: config.watcher.instrument.clone(),
            interval: config.watcher.interval(),
            prompt_file: PathBuf::from(&config.ollama.prompt_file),
            frames,
            vision,
            notifier,
        }
    }
}
