//! # jikimi-app
//!
//! JIKIMI 서버 바이너리 진입점.
//! 설정 로드, 어댑터 DI 와이어링, 제어 서버 기동, 종료 시그널 처리.
//!
//! 종료는 의도적으로 단순하다: SIGINT/SIGTERM이 오면 수락 루프만
//! 멈추고 프로세스가 끝난다. 진행 중인 세션의 드레인 절차는 없다 —
//! 클라이언트는 EOF를 보고, 활성 감시 루프는 프로세스와 함께 끊긴다.

use anyhow::{Context, Result};
use clap::Parser;
use jikimi_control::{ControlServer, WatcherContext};
use jikimi_core::config_manager::ConfigManager;
use jikimi_core::ports::frame_source::FrameSource;
use jikimi_core::ports::notifier::StatusNotifier;
use jikimi_core::ports::vision_provider::VisionProvider;
use jikimi_network::ollama_client::OllamaVisionProvider;
use jikimi_network::teams_notifier::TeamsNotifier;
use jikimi_vision::capture::RegionCapture;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// JIKIMI 장비 화면 감시 서버
///
/// 장비 화면 영역을 주기적으로 캡처해 비전 LLM으로 해석하고
/// Teams 채널로 상태를 알린다. 제어는 TCP 행 프로토콜로 받는다.
#[derive(Parser, Debug)]
#[command(name = "jikimi")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼별 설정 디렉토리의 config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 수신 주소 오버라이드 (기본: 설정 파일 값)
    #[arg(long)]
    host: Option<String>,

    /// 수신 포트 오버라이드 (기본: 설정 파일 값)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,
}

/// OS 종료 시그널 대기 (SIGINT, SIGTERM)
///
/// 수신자는 수락 루프 하나뿐이라 별도 관리 구조 없이 main이
/// watch 채널 송신단을 직접 소유한다.
async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigint = signal(SignalKind::interrupt()).expect("SIGINT 핸들러 등록 실패");
        let mut sigterm = signal(SignalKind::terminate()).expect("SIGTERM 핸들러 등록 실패");

        tokio::select! {
            _ = sigint.recv() => info!("SIGINT 수신"),
            _ = sigterm.recv() => info!("SIGTERM 수신"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Ctrl+C 핸들러 등록 실패");
        info!("Ctrl+C 수신");
    }
}

/// 배너 출력
fn print_banner() {
    println!();
    println!("  ┌──────────────────────────────────────┐");
    println!("  │  JIKIMI — 장비 화면 감시 서버          │");
    println!("  │  capture → vision LLM → Teams alert  │");
    println!("  └──────────────────────────────────────┘");
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // tracing 초기화
    let log_filter = format!(
        "jikimi={0},jikimi_app={0},jikimi_core={0},jikimi_vision={0},jikimi_network={0},jikimi_control={0}",
        args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    print_banner();
    info!("JIKIMI 서버 시작");

    // 설정 로드 (파일이 없으면 기본 설정 생성)
    let config_manager = match args.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    }
    .context("설정 로드 실패")?;
    info!("설정 파일: {:?}", config_manager.config_path());

    let mut config = config_manager.get();
    if config_manager.created_default() {
        warn!("기본 설정으로 실행 중 — webhook URL이 비어 있으면 알림이 전송되지 않습니다");
    }

    // CLI 인자로 설정 오버라이드
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    // ── 어댑터 생성 (DI 와이어링) ──

    // 1. 화면 캡처
    let frames: Arc<dyn FrameSource> = Arc::new(RegionCapture::new());

    // 2. Ollama 비전 해석
    let vision: Arc<dyn VisionProvider> =
        Arc::new(OllamaVisionProvider::new(&config.ollama).context("Ollama 클라이언트 생성 실패")?);
    info!(
        "비전 백엔드: {} (model={})",
        config.ollama.url, config.ollama.model
    );

    // 3. Teams webhook 알림
    let notifier: Arc<dyn StatusNotifier> =
        Arc::new(TeamsNotifier::new(&config.webhook).context("Teams 알림 어댑터 생성 실패")?);

    // ── 제어 서버 기동 ──

    let ctx = Arc::new(WatcherContext::new(&config, frames, vision, notifier));
    info!(
        instrument = %ctx.instrument,
        interval_min = config.watcher.wait_interval,
        "감시 컨텍스트 구성 완료"
    );

    let server = ControlServer::bind(&config.server, ctx)
        .await
        .context("제어 서버 바인드 실패")?;
    info!("제어 서버 수신 대기: {}", server.local_addr()?);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let server_handle = tokio::spawn(async move {
        server.run(shutdown_rx).await;
    });

    // OS 시그널 대기 후 수락 루프에 종료 전파
    wait_for_signal().await;
    let _ = shutdown_tx.send(true);

    // accept 루프만 정리하고 즉시 종료 — 세션 드레인 없음
    let _ = server_handle.await;
    info!("JIKIMI 서버 종료");
    Ok(())
}
