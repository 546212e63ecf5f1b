//! 연결별 세션 핸들러.
//!
//! 개행 구분 JSON 명령 스트림을 읽어 감시 루프를 기동/취소하고,
//! 루프가 만드는 로그 행을 같은 연결로 돌려보낸다.
//!
//! 상태 기계: Idle —start→ Running ("Watching!"); Running —start→
//! "Already running" (무시); —stop→ 취소 + 대기 + "Stop requested" → Idle.
//! EOF/수신 오류/행 한도 초과는 세션 종료 — 활성 루프를 취소하고
//! 끝날 때까지 기다린 뒤 연결을 닫는다.
//!
//! 소켓 쓰기는 세션 태스크 단독 — 감시 루프 로그는 mpsc 큐를 거쳐
//! 발생 순서대로 기록되므로 두 태스크가 소켓에 섞여 쓰는 일이 없다.

use std::sync::Arc;

use jikimi_core::models::protocol::{Command, LogLine};
use jikimi_core::models::region::Region;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::context::WatcherContext;
use crate::line_reader::BoundedLineReader;
use crate::watch_loop;

/// 활성 감시 루프 핸들 — 세션이 단독 소유
struct ActiveWatch {
    cancel_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// 한 연결의 세션 상태
struct Session {
    ctx: Arc<WatcherContext>,
    writer: OwnedWriteHalf,
    log_tx: mpsc::UnboundedSender<String>,
    active: Option<ActiveWatch>,
}

/// 세션 실행 — 연결이 닫히거나 수신 오류가 날 때까지 돈다.
///
/// 한 세션의 실패는 이 태스크 안에서 끝난다. 다른 세션이나
/// 수락 루프에는 영향을 주지 않는다.
pub async fn run(ctx: Arc<WatcherContext>, stream: TcpStream, max_line_bytes: usize) {
    let peer = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let (read_half, write_half) = stream.into_split();
    let mut reader: BoundedLineReader<OwnedReadHalf> =
        BoundedLineReader::new(read_half, max_line_bytes);
    let (log_tx, mut log_rx) = mpsc::unbounded_channel::<String>();

    let mut session = Session {
        ctx,
        writer: write_half,
        log_tx,
        active: None,
    };

    loop {
        tokio::select! {
            next = reader.next_line() => {
                match next {
                    Ok(Some(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        match Command::parse_line(&line) {
                            Ok(command) => {
                                if session.handle_command(command, &mut log_rx).await.is_err() {
                                    break;
                                }
                            }
                            // 잘못된 행은 조용히 버린다 — 세션은 유지
                            Err(e) => debug!(peer = %peer, "명령 행 무시: {e}"),
                        }
                    }
                    Ok(None) => {
                        debug!(peer = %peer, "연결 종료 (EOF)");
                        break;
                    }
                    Err(e) => {
                        warn!(peer = %peer, "수신 오류, 세션 종료: {e}");
                        break;
                    }
                }
            }
            Some(line) = log_rx.recv() => {
                if session.write_log(&line).await.is_err() {
                    break;
                }
            }
        }
    }

    // 종료 경로: 활성 루프가 있으면 취소하고 끝날 때까지 기다린다
    if let Some(active) = session.active.take() {
        let _ = active.cancel_tx.send(true);
        let _ = active.task.await;
    }
    info!(peer = %peer, "세션 종료");
}

impl Session {
    /// 명령 처리. `Err`는 소켓 쓰기 실패 (세션 종료 사유).
    async fn handle_command(
        &mut self,
        command: Command,
        log_rx: &mut mpsc::UnboundedReceiver<String>,
    ) -> std::io::Result<()> {
        match command {
            Command::Start { zone } => self.handle_start(zone).await,
            Command::Stop => self.handle_stop(log_rx).await,
        }
    }

    /// `start` — 활성 루프가 없을 때만 새 루프를 띄운다.
    async fn handle_start(&mut self, zone: [i64; 4]) -> std::io::Result<()> {
        let running = self
            .active
            .as_ref()
            .map(|watch| !watch.task.is_finished())
            .unwrap_or(false);
        if running {
            // 멱등 거부 — 두 번째 루프는 절대 만들지 않는다
            return self.write_log("Already running").await;
        }

        let region = match Region::from_zone(zone) {
            Ok(region) => region,
            Err(e) => {
                // 검증 실패도 잘못된 행과 같은 취급 — 조용히 버림
                debug!("zone 검증 실패, 명령 무시: {e}");
                return Ok(());
            }
        };

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let task = tokio::spawn(watch_loop::run(
            self.ctx.clone(),
            region,
            cancel_rx,
            self.log_tx.clone(),
        ));
        self.active = Some(ActiveWatch { cancel_tx, task });

        self.write_log("Watching!").await
    }

    /// `stop` — 취소 신호 후 루프가 끝날 때까지 블록.
    ///
    /// Idle 상태에서도 안전한 no-op이며 동일하게 응답한다.
    async fn handle_stop(
        &mut self,
        log_rx: &mut mpsc::UnboundedReceiver<String>,
    ) -> std::io::Result<()> {
        if let Some(active) = self.active.take() {
            let _ = active.cancel_tx.send(true);
            // 타임아웃 없는 대기 — 진행 중인 사이클이 끝나야 돌아온다
            // (해석 호출의 300초 타임아웃이 유일한 상한)
            let _ = active.task.await;

            // 루프가 마지막으로 남긴 로그("Watcher stopped." 등)를
            // 순서대로 먼저 내보낸다
            while let Ok(line) = log_rx.try_recv() {
                self.write_log(&line).await?;
            }
        }

        self.write_log("Stop requested").await
    }

    /// 로그 행을 와이어 형식으로 기록
    async fn write_log(&mut self, message: &str) -> std::io::Result<()> {
        let wire = LogLine::new(message)
            .to_wire()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        self.writer.write_all(&wire).await
    }
}
