//! 감시 루프.
//!
//! 취소 가능한 주기 작업: 캡처 → 해석 → 알림 → 대기.
//! 취소는 협조적이며 루프 진입 시점과 대기 지점에서만 관찰된다 —
//! 진행 중인 캡처/해석/알림 호출은 중단하지 않는다. 따라서 `stop`은
//! 최대 한 사이클(해석 타임아웃이 상한)까지 블록될 수 있다.

use std::sync::Arc;

use jikimi_core::models::interpretation::Interpretation;
use jikimi_core::models::region::Region;
use jikimi_core::prompt;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::context::WatcherContext;

/// 세션 로그 송신 — 수신자가 사라졌으면 조용히 버린다 (연결 끊김)
fn emit(log_tx: &mpsc::UnboundedSender<String>, message: impl Into<String>) {
    let _ = log_tx.send(message.into());
}

/// 감시 루프 실행.
///
/// `cancel_rx`가 true가 될 때까지 주기적으로 사이클을 돈다.
/// 캡처 실패만 루프를 즉시 끝내고, 해석/알림 실패는 로그로 남긴 뒤
/// 다음 사이클로 계속한다. 종료 시 항상 "Watcher stopped."를 남긴다.
pub async fn run(
    ctx: Arc<WatcherContext>,
    region: Region,
    mut cancel_rx: watch::Receiver<bool>,
    log_tx: mpsc::UnboundedSender<String>,
) {
    emit(
        &log_tx,
        format!(
            "=== Watcher started every ~{} min ===",
            ctx.interval.as_secs_f64() / 60.0
        ),
    );

    loop {
        if *cancel_rx.borrow() {
            break;
        }

        if !cycle(&ctx, region, &log_tx).await {
            break;
        }

        // 주기 대기 또는 취소 — 먼저 오는 쪽이 이긴다
        tokio::select! {
            _ = tokio::time::sleep(ctx.interval) => {}
            changed = cancel_rx.changed() => {
                // 송신단이 사라진 채널도 취소로 취급한다
                if changed.is_err() || *cancel_rx.borrow() {
                    break;
                }
            }
        }
    }

    emit(&log_tx, "Watcher stopped.");
    debug!("감시 루프 종료");
}

/// 한 사이클 실행. `false`면 루프 종료 (캡처 실패).
async fn cycle(
    ctx: &Arc<WatcherContext>,
    region: Region,
    log_tx: &mpsc::UnboundedSender<String>,
) -> bool {
    // 1. 캡처 — 불투명한 동기 호출, 실패는 즉시 종료 (재시도 없음)
    let frames = ctx.frames.clone();
    let captured = tokio::task::spawn_blocking(move || frames.capture_region(region)).await;
    let image = match captured {
        Ok(Ok(png)) => png,
        Ok(Err(e)) => {
            warn!("캡처 실패, 감시 루프 종료: {e}");
            emit(log_tx, format!("Capture error : {e}"));
            return false;
        }
        Err(e) => {
            warn!("캡처 태스크 중단: {e}");
            emit(log_tx, format!("Capture error : {e}"));
            return false;
        }
    };

    // 2. 해석 — 실패는 에러 모양 결과로 알림 경로에 흘러간다
    let outcome = interpret(ctx, &image, log_tx).await;

    // 3. 알림 — 실패는 로그만 남기고 사이클은 계속된다
    let status = outcome.status_text();
    match ctx.notifier.notify(&ctx.instrument, &status).await {
        Ok(()) => emit(log_tx, "Notification sent!"),
        Err(e) => emit(log_tx, format!("Teams notification error : {e}")),
    }

    true
}

/// 프롬프트 로드 + 비전 백엔드 호출.
///
/// 빈 프롬프트는 네트워크 호출 전에 설정 실패로 감지된다.
/// 어떤 실패도 여기서 밖으로 던져지지 않는다 — 모두
/// [`Interpretation::Failure`]로 태깅되어 상태 텍스트가 된다.
async fn interpret(
    ctx: &Arc<WatcherContext>,
    image_png: &[u8],
    log_tx: &mpsc::UnboundedSender<String>,
) -> Interpretation {
    let prompt = match prompt::load_prompt(&ctx.prompt_file) {
        Ok(p) => p,
        Err(e) => {
            warn!("프롬프트 로드 실패: {e}");
            return Interpretation::from_error(e);
        }
    };

    emit(log_tx, "Sending screenshot to Ollama...");
    match ctx.vision.interpret(image_png, &prompt).await {
        Ok(text) => {
            emit(log_tx, "Got an answer!");
            Interpretation::Status(text)
        }
        Err(e) => {
            warn!(provider = ctx.vision.provider_name(), "해석 실패: {e}");
            Interpretation::from_error(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use jikimi_core::error::CoreError;
    use jikimi_core::ports::frame_source::FrameSource;
    use jikimi_core::ports::notifier::StatusNotifier;
    use jikimi_core::ports::vision_provider::VisionProvider;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    struct MockFrames {
        fail: bool,
        calls: AtomicUsize,
    }

    impl FrameSource for MockFrames {
        fn capture_region(&self, _region: Region) -> Result<Vec<u8>, CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(CoreError::Capture("no display".to_string()))
            } else {
                Ok(vec![0x89, b'P', b'N', b'G'])
            }
        }
    }

    struct MockVision {
        result: Result<String, String>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl VisionProvider for MockVision {
        async fn interpret(&self, _image: &[u8], _prompt: &str) -> Result<String, CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.result {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(CoreError::Network(e.clone())),
            }
        }

        fn provider_name(&self) -> &str {
            "mock-vision"
        }
    }

    struct MockNotifier {
        fail: bool,
        received: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl StatusNotifier for MockNotifier {
        async fn notify(&self, sender: &str, status: &str) -> Result<(), CoreError> {
            self.received
                .lock()
                .unwrap()
                .push((sender.to_string(), status.to_string()));
            if self.fail {
                Err(CoreError::Notify("500 - channel gone".to_string()))
            } else {
                Ok(())
            }
        }
    }

    struct TestHarness {
        ctx: Arc<WatcherContext>,
        frames: Arc<MockFrames>,
        vision: Arc<MockVision>,
        notifier: Arc<MockNotifier>,
        _prompt_file: tempfile::NamedTempFile,
    }

    fn harness(
        interval: Duration,
        capture_fail: bool,
        vision_result: Result<String, String>,
        notify_fail: bool,
    ) -> TestHarness {
        let mut prompt_file = tempfile::NamedTempFile::new().unwrap();
        writeln!(prompt_file, "Describe the instrument screen.").unwrap();

        let frames = Arc::new(MockFrames {
            fail: capture_fail,
            calls: AtomicUsize::new(0),
        });
        let vision = Arc::new(MockVision {
            result: vision_result,
            calls: AtomicUsize::new(0),
        });
        let notifier = Arc::new(MockNotifier {
            fail: notify_fail,
            received: Mutex::new(Vec::new()),
        });

        let ctx = Arc::new(WatcherContext {
            instrument: "HPLC-01".to_string(),
            interval,
            prompt_file: prompt_file.path().to_path_buf(),
            frames: frames.clone(),
            vision: vision.clone(),
            notifier: notifier.clone(),
        });

        TestHarness {
            ctx,
            frames,
            vision,
            notifier,
            _prompt_file: prompt_file,
        }
    }

    fn test_region() -> Region {
        Region::new(0, 0, 100, 50).unwrap()
    }

    /// 조건이 참이 될 때까지 폴링 (최대 2초)
    async fn wait_until(mut predicate: impl FnMut() -> bool) {
        for _ in 0..200 {
            if predicate() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("조건이 시간 내에 충족되지 않음");
    }

    #[tokio::test]
    async fn startup_and_stopped_lines_emitted() {
        let h = harness(Duration::from_secs(600), false, Ok("idle".to_string()), false);
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (log_tx, mut log_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run(h.ctx.clone(), test_region(), cancel_rx, log_tx));

        let first = log_rx.recv().await.unwrap();
        assert!(first.contains("Watcher started"));

        // 첫 사이클 완료 대기 후 취소
        wait_until(|| h.notifier.received.lock().unwrap().len() == 1).await;
        cancel_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();

        let mut lines = Vec::new();
        while let Ok(line) = log_rx.try_recv() {
            lines.push(line);
        }
        assert_eq!(lines.last().unwrap(), "Watcher stopped.");
    }

    #[tokio::test]
    async fn cancel_during_sleep_skips_next_cycle() {
        let h = harness(Duration::from_secs(600), false, Ok("idle".to_string()), false);
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (log_tx, _log_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run(h.ctx.clone(), test_region(), cancel_rx, log_tx));

        wait_until(|| h.vision.calls.load(Ordering::SeqCst) == 1).await;
        cancel_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();

        // 대기 중 취소 — 두 번째 사이클은 시작되지 않는다
        assert_eq!(h.vision.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.frames.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dropped_cancel_sender_stops_loop() {
        let h = harness(Duration::from_secs(600), false, Ok("idle".to_string()), false);
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (log_tx, _log_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run(h.ctx.clone(), test_region(), cancel_rx, log_tx));

        // 취소 신호 없이 송신단만 사라져도 대기 중이던 루프가 끝난다
        wait_until(|| h.vision.calls.load(Ordering::SeqCst) == 1).await;
        drop(cancel_tx);
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(h.vision.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancel_before_first_cycle() {
        let h = harness(Duration::from_secs(600), false, Ok("idle".to_string()), false);
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (log_tx, mut log_rx) = mpsc::unbounded_channel();

        cancel_tx.send(true).unwrap();
        run(h.ctx.clone(), test_region(), cancel_rx, log_tx).await;

        // 시작 직후 취소 상태면 사이클 없이 종료
        assert_eq!(h.frames.calls.load(Ordering::SeqCst), 0);
        let lines: Vec<String> = std::iter::from_fn(|| log_rx.try_recv().ok()).collect();
        assert!(lines.iter().any(|l| l.contains("Watcher started")));
        assert_eq!(lines.last().unwrap(), "Watcher stopped.");
    }

    #[tokio::test]
    async fn capture_failure_is_terminal() {
        let h = harness(Duration::from_millis(10), true, Ok("idle".to_string()), false);
        let (_cancel_tx, cancel_rx) = watch::channel(false);
        let (log_tx, mut log_rx) = mpsc::unbounded_channel();

        // 취소 없이도 캡처 실패로 스스로 끝난다
        tokio::time::timeout(
            Duration::from_secs(2),
            run(h.ctx.clone(), test_region(), cancel_rx, log_tx),
        )
        .await
        .unwrap();

        assert_eq!(h.frames.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.vision.calls.load(Ordering::SeqCst), 0);
        let lines: Vec<String> = std::iter::from_fn(|| log_rx.try_recv().ok()).collect();
        assert!(lines.iter().any(|l| l.contains("Capture error")));
        assert_eq!(lines.last().unwrap(), "Watcher stopped.");
    }

    #[tokio::test]
    async fn backend_failure_still_notified_as_error_shape() {
        let h = harness(
            Duration::from_secs(600),
            false,
            Err("connection refused".to_string()),
            false,
        );
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (log_tx, mut log_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run(h.ctx.clone(), test_region(), cancel_rx, log_tx));
        wait_until(|| h.notifier.received.lock().unwrap().len() == 1).await;
        cancel_tx.send(true).unwrap();
        task.await.unwrap();

        // 해석 실패가 에러 모양 상태 텍스트로 알림에 도달
        let received = h.notifier.received.lock().unwrap();
        let (sender, status) = &received[0];
        assert_eq!(sender, "HPLC-01");
        let value: serde_json::Value = serde_json::from_str(status).unwrap();
        assert_eq!(value["state"], "error");
        assert!(value["summary"].as_str().unwrap().contains("connection refused"));
        drop(received);

        // 전달 성공 로그는 그대로 찍힌다
        let lines: Vec<String> = std::iter::from_fn(|| log_rx.try_recv().ok()).collect();
        assert!(lines.iter().any(|l| l == "Notification sent!"));
    }

    #[tokio::test]
    async fn notify_failure_logged_and_cycle_continues() {
        let h = harness(Duration::from_millis(10), false, Ok("idle".to_string()), true);
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (log_tx, mut log_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run(h.ctx.clone(), test_region(), cancel_rx, log_tx));

        // 전달 실패에도 다음 사이클이 진행된다
        wait_until(|| h.notifier.received.lock().unwrap().len() >= 2).await;
        cancel_tx.send(true).unwrap();
        task.await.unwrap();

        let lines: Vec<String> = std::iter::from_fn(|| log_rx.try_recv().ok()).collect();
        let error_line = lines
            .iter()
            .find(|l| l.starts_with("Teams notification error :"))
            .unwrap();
        assert!(error_line.contains("500"));
    }

    #[tokio::test]
    async fn empty_prompt_short_circuits_to_failure_status() {
        let h = harness(Duration::from_secs(600), false, Ok("idle".to_string()), false);
        // 프롬프트 파일을 비워서 설정 에러 유도
        std::fs::write(&h.ctx.prompt_file, "").unwrap();

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (log_tx, _log_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run(h.ctx.clone(), test_region(), cancel_rx, log_tx));
        wait_until(|| h.notifier.received.lock().unwrap().len() == 1).await;
        cancel_tx.send(true).unwrap();
        task.await.unwrap();

        // 네트워크 호출 없이 실패 결과가 알림으로 흐른다
        assert_eq!(h.vision.calls.load(Ordering::SeqCst), 0);
        let received = h.notifier.received.lock().unwrap();
        assert!(received[0].1.contains("LLM prompt is empty"));
    }
}
