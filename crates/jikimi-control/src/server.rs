//! 제어 서버 — TCP 수락 루프.
//!
//! 고정 주소에 바인드하고 연결마다 독립 세션 태스크를 띄운다.
//! TLS/인증 없음 — 신뢰된 로컬 네트워크 가정 (명시적 설계 제약).
//! 종료 신호를 받으면 수락만 멈춘다. 진행 중인 세션의 드레인 절차는
//! 없다 (프로세스 종료와 함께 끊긴다).

use std::net::SocketAddr;
use std::sync::Arc;

use jikimi_core::config::ServerConfig;
use jikimi_core::error::CoreError;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::context::WatcherContext;
use crate::session;

/// 제어 서버
pub struct ControlServer {
    listener: TcpListener,
    ctx: Arc<WatcherContext>,
    max_line_bytes: usize,
}

impl ControlServer {
    /// 설정된 주소에 바인드.
    ///
    /// 주소가 이미 사용 중이거나 유효하지 않으면 에러.
    pub async fn bind(config: &ServerConfig, ctx: Arc<WatcherContext>) -> Result<Self, CoreError> {
        let addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| CoreError::Network(format!("바인드 실패: {addr}: {e}")))?;

        info!("제어 서버 시작: {}", addr);

        Ok(Self {
            listener,
            ctx,
            max_line_bytes: config.max_line_bytes,
        })
    }

    /// 실제 바인드된 주소 (포트 0 바인드 시 할당 포트 확인용)
    pub fn local_addr(&self) -> Result<SocketAddr, CoreError> {
        Ok(self.listener.local_addr()?)
    }

    /// 수락 루프 실행 — 종료 신호까지 연결을 받는다.
    ///
    /// 세션은 `tokio::spawn`으로 분리되므로 어떤 세션도 수락을
    /// 막지 못하고, 세션 실패가 다른 세션에 전파되지 않는다.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, addr)) => {
                            info!("클라이언트 연결: {addr}");
                            let ctx = self.ctx.clone();
                            let max_line_bytes = self.max_line_bytes;
                            tokio::spawn(session::run(ctx, stream, max_line_bytes));
                        }
                        Err(e) => {
                            // 개별 수락 실패는 루프를 멈추지 않는다
                            warn!("연결 수락 실패: {e}");
                        }
                    }
                }
                changed = shutdown_rx.changed() => {
                    // 송신단이 사라진 채널도 종료로 취급한다
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("제어 서버 종료 신호 수신");
                        break;
                    }
                }
            }
        }
    }
}
