//! Ollama 비전 해석 클라이언트.
//!
//! 캡처된 PNG를 base64로 실어 Ollama generate API에 보내고
//! `response` 필드의 자유 텍스트를 돌려준다. 결과 텍스트는 코어에서
//! 해석하지 않는다 — 알림으로 그대로 흘러가는 불투명한 상태 문자열이다.

use async_trait::async_trait;
use tracing::{debug, warn};

use jikimi_core::config::OllamaConfig;
use jikimi_core::error::CoreError;
use jikimi_core::ports::vision_provider::VisionProvider;

// ============================================================
// OllamaVisionProvider — Ollama generate API 클라이언트
// ============================================================

/// Ollama 비전 해석 클라이언트
///
/// 요청 형식: `POST {url}`
/// `{"model": ..., "prompt": ..., "images": [<base64>], "stream": false}`
///
/// 해석 호출은 클라이언트 타임아웃(기본 300초)으로 바운드된다 —
/// 이 한도가 `stop` 명령이 블록될 수 있는 시간의 상한이기도 하다.
#[derive(Debug)]
pub struct OllamaVisionProvider {
    /// HTTP 클라이언트
    http_client: reqwest::Client,
    /// generate API 엔드포인트 URL
    endpoint: String,
    /// 비전 모델 이름
    model: String,
}

impl OllamaVisionProvider {
    /// 새 OllamaVisionProvider 생성
    pub fn new(config: &OllamaConfig) -> Result<Self, CoreError> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        debug!(
            endpoint = %config.url,
            model = %config.model,
            timeout = config.timeout_secs,
            "OllamaVisionProvider 초기화"
        );

        Ok(Self {
            http_client,
            endpoint: config.url.clone(),
            model: config.model.clone(),
        })
    }

    /// generate API 응답에서 상태 텍스트 추출
    fn parse_generate_response(body: &str) -> Result<String, CoreError> {
        let response: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| CoreError::Network(format!("Ollama 응답 JSON 파싱 실패: {}", e)))?;

        let text = response
            .get("response")
            .and_then(|r| r.as_str())
            .ok_or_else(|| {
                CoreError::Network("Ollama 응답에 response 필드가 없음".to_string())
            })?;

        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl VisionProvider for OllamaVisionProvider {
    async fn interpret(&self, image_png: &[u8], prompt: &str) -> Result<String, CoreError> {
        use base64::Engine;

        let encoded = base64::engine::general_purpose::STANDARD.encode(image_png);

        let request_body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "images": [encoded],
            "stream": false
        });

        debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            image_size = image_png.len(),
            "Ollama 해석 호출"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("Ollama 호출 실패: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CoreError::Network(format!("Ollama 응답 읽기 실패: {}", e)))?;

        if !status.is_success() {
            warn!(status = %status, "Ollama 오류 응답");
            return Err(CoreError::Network(format!(
                "Ollama 오류 ({}): {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let text = Self::parse_generate_response(&body)?;
        debug!(chars = text.len(), "Ollama 해석 결과 수신");
        Ok(text)
    }

    fn provider_name(&self) -> &str {
        &self.model
    }
}

// ============================================================
// 테스트
// ============================================================
