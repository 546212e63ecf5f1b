//! 애플리케이션 설정 구조체.
//!
//! 제어 서버 주소, 감시 주기, Ollama 엔드포인트, Teams webhook 등
//! 런타임 설정을 정의한다. 파일이 없으면 기본값으로 생성된다
//! ([`crate::config_manager::ConfigManager`] 참조).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 제어 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 감시 루프 설정
    #[serde(default)]
    pub watcher: WatcherConfig,
    /// Ollama 비전 백엔드 설정
    #[serde(default)]
    pub ollama: OllamaConfig,
    /// Teams webhook 설정
    #[serde(default)]
    pub webhook: WebhookConfig,
}

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self::default()
    }
}

// ============================================================
// 제어 서버 설정
// ============================================================

/// 제어 서버 설정 — TCP 리스너 주소와 프레이밍 한도
///
/// 인증/TLS 없음 — 제어 채널은 신뢰된 로컬 네트워크 전용이다.
/// 같은 호스트의 어떤 프로세스든 연결해 명령을 보낼 수 있다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 리스닝 호스트
    #[serde(default = "default_host")]
    pub host: String,
    /// 리스닝 포트
    #[serde(default = "default_port")]
    pub port: u16,
    /// 명령 행 최대 길이 (bytes) — 초과 시 해당 세션 종료
    #[serde(default = "default_max_line_bytes")]
    pub max_line_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_line_bytes: default_max_line_bytes(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    12345
}

fn default_max_line_bytes() -> usize {
    64 * 1024
}

// ============================================================
// 감시 루프 설정
// ============================================================

/// 감시 루프 설정 — 주기와 알림에 붙는 장비 라벨
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// 감시 주기 (분)
    #[serde(default = "default_wait_interval")]
    pub wait_interval: u64,
    /// 알림에 표시되는 장비(데이터 소스) 라벨
    #[serde(default = "default_instrument")]
    pub instrument: String,
    /// 키워드 필터 — 설정 파일 호환용 예약 필드 (코어 미사용)
    #[serde(default = "default_keyword")]
    pub keyword: String,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            wait_interval: default_wait_interval(),
            instrument: default_instrument(),
            keyword: default_keyword(),
        }
    }
}

impl WatcherConfig {
    /// 감시 주기를 Duration으로 변환
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.wait_interval * 60)
    }
}

fn default_wait_interval() -> u64 {
    30
}

fn default_instrument() -> String {
    "UNKNOWN INSTRUMENT".to_string()
}

fn default_keyword() -> String {
    "Error".to_string()
}

// ============================================================
// Ollama 비전 백엔드 설정
// ============================================================

/// Ollama 비전 백엔드 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// generate API 엔드포인트 URL
    #[serde(default = "default_ollama_url")]
    pub url: String,
    /// 비전 모델 이름
    #[serde(default = "default_model")]
    pub model: String,
    /// 프롬프트 파일 경로 — 매 사이클 다시 읽는다
    #[serde(default = "default_prompt_file")]
    pub prompt_file: String,
    /// 해석 호출 타임아웃 (초)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: default_ollama_url(),
            model: default_model(),
            prompt_file: default_prompt_file(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_ollama_url() -> String {
    "http://127.0.0.1:11434/api/generate".to_string()
}

fn default_model() -> String {
    "qwen2.5vl:7b".to_string()
}

fn default_prompt_file() -> String {
    "PROMPT_FILE.txt".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

// ============================================================
// Teams webhook 설정
// ============================================================

/// Teams webhook 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// incoming webhook URL — 비어 있으면 전달이 실패 로그로 나타난다
    #[serde(default)]
    pub teams_webhook_url: String,
    /// Status 값 최대 길이 (문자) — 초과분은 잘라서 전송
    #[serde(default = "default_max_status_chars")]
    pub max_status_chars: usize,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            teams_webhook_url: String::new(),
            max_status_chars: default_max_status_chars(),
        }
    }
}

fn default_max_status_chars() -> usize {
    1000
}
