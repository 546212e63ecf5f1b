//! Teams webhook 알림 어댑터.
//!
//! 상태 텍스트를 adaptive card로 감싸 incoming webhook에 POST한다.
//! 상태 내용은 구분하지 않는다 — 백엔드 에러 텍스트도 정상 상태와
//! 같은 카드로 전달된다 (운영자가 같은 채널에서 에러를 보게 하는
//! 원 시스템의 의도적 동작).

use async_trait::async_trait;
use tracing::{debug, warn};

use jikimi_core::config::WebhookConfig;
use jikimi_core::error::CoreError;
use jikimi_core::ports::notifier::StatusNotifier;

/// 전달 판정에 성공으로 치는 HTTP 상태 코드 — 200 또는 202
fn is_delivered(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::OK || status == reqwest::StatusCode::ACCEPTED
}

// ============================================================
// TeamsNotifier — incoming webhook 클라이언트
// ============================================================

/// Teams webhook 알림 — [`StatusNotifier`] 구현
///
/// 전달 실패(2xx 이외, 전송 예외)는 에러로 보고될 뿐 재시도하지 않으며,
/// 호출한 감시 루프를 중단시키지 않는다.
#[derive(Debug)]
pub struct TeamsNotifier {
    /// HTTP 클라이언트
    http_client: reqwest::Client,
    /// incoming webhook URL
    webhook_url: String,
    /// Status 값 최대 길이 (문자)
    max_status_chars: usize,
}

impl TeamsNotifier {
    /// 새 TeamsNotifier 생성
    ///
    /// 빈 webhook URL도 생성은 허용된다 — 전달 시점에 실패가
    /// 세션 로그로 나타난다.
    pub fn new(config: &WebhookConfig) -> Result<Self, CoreError> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        if config.teams_webhook_url.is_empty() {
            warn!("webhook URL 미설정 — 알림 전달은 실패 로그로 나타납니다");
        }

        Ok(Self {
            http_client,
            webhook_url: config.teams_webhook_url.clone(),
            max_status_chars: config.max_status_chars,
        })
    }

    /// 상태 텍스트를 한도 내로 자른다 (문자 단위)
    fn truncate_status(&self, status: &str) -> String {
        if status.chars().count() <= self.max_status_chars {
            return status.to_string();
        }
        status.chars().take(self.max_status_chars).collect()
    }

    /// adaptive card payload 구성 — 원 시스템과 동일한 고정 스키마
    ///
    /// attention 컨테이너에 발신자 라벨, FactSet에 타임스탬프
    /// (`Horodatage:`)와 `Status` 값.
    fn build_payload(sender: &str, status: &str, timestamp: &str) -> serde_json::Value {
        serde_json::json!({
            "attachments": [
                {
                    "contentType": "application/vnd.microsoft.card.adaptive",
                    "content": {
                        "$schema": "http://adaptivecards.io/schemas/adaptive-card.json",
                        "type": "AdaptiveCard",
                        "version": "1.4",
                        "body": [
                            {
                                "type": "Container",
                                "style": "attention",
                                "items": [
                                    {
                                        "type": "TextBlock",
                                        "text": sender,
                                        "weight": "bolder",
                                        "size": "large",
                                        "color": "attention"
                                    }
                                ]
                            },
                            {
                                "type": "FactSet",
                                "facts": [
                                    {
                                        "title": "Horodatage:",
                                        "value": timestamp
                                    },
                                    {
                                        "title": "Status",
                                        "value": status
                                    }
                                ]
                            }
                        ]
                    }
                }
            ]
        })
    }
}

#[async_trait]
impl StatusNotifier for TeamsNotifier {
    async fn notify(&self, sender: &str, status: &str) -> Result<(), CoreError> {
        let truncated = self.truncate_status(status);
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let payload = Self::build_payload(sender, &truncated, &timestamp);

        debug!(sender = %sender, chars = truncated.len(), "Teams 알림 전송");

        let response = self
            .http_client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| CoreError::Notify(e.to_string()))?;

        let http_status = response.status();
        if is_delivered(http_status) {
            debug!("Teams 알림 전달 완료");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = %http_status, "Teams 알림 오류 응답");
        Err(CoreError::Notify(format!(
            "{} - {}",
            http_status.as_u16(),
            body
        )))
    }
}

// ============================================================
// 테스트
// ============================================================
