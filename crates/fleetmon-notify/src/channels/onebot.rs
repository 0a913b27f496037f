use crate::MessageChannel;
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// HTTP push channel for an OneBot-compatible bot endpoint.
///
/// Actions are plain `POST {endpoint}/{action}` calls with a JSON body;
/// the optional access token travels as a bearer header.
pub struct OneBotChannel {
    endpoint: String,
    access_token: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct OneBotResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    retcode: i64,
}

impl OneBotChannel {
    pub fn new(endpoint: &str, access_token: Option<&str>) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            access_token: access_token.map(str::to_string),
            client: reqwest::Client::new(),
        }
    }

    async fn post_action(&self, action: &str, payload: &Value) -> Result<()> {
        let url = format!("{}/{}", self.endpoint, action);
        let mut last_err = None;

        for attempt in 0..3u32 {
            let mut request = self.client.post(&url).json(payload);
            if let Some(token) = &self.access_token {
                request = request.bearer_auth(token);
            }

            match request.send().await {
                Ok(resp) if resp.status().is_success() => {
                    match resp.json::<OneBotResponse>().await {
                        // retcode 1 is the async-accepted reply
                        Ok(body) if body.retcode == 0 || body.retcode == 1 => return Ok(()),
                        Ok(body) => {
                            tracing::warn!(
                                attempt = attempt + 1,
                                action,
                                status = %body.status,
                                retcode = body.retcode,
                                "Bot API returned error, retrying"
                            );
                            last_err = Some(anyhow::anyhow!(
                                "bot API error: status={}, retcode={}",
                                body.status,
                                body.retcode
                            ));
                        }
                        Err(e) => {
                            tracing::warn!(
                                attempt = attempt + 1,
                                action,
                                error = %e,
                                "Failed to parse bot API response, retrying"
                            );
                            last_err = Some(e.into());
                        }
                    }
                }
                Ok(resp) => {
                    let status = resp.status();
                    tracing::warn!(
                        attempt = attempt + 1,
                        action,
                        status = %status,
                        "Bot endpoint returned HTTP error, retrying"
                    );
                    last_err = Some(anyhow::anyhow!("HTTP {status}"));
                }
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        action,
                        error = %e,
                        "Bot endpoint request failed, retrying"
                    );
                    last_err = Some(e.into());
                }
            }
            if attempt < 2 {
                tokio::time::sleep(std::time::Duration::from_millis(100 * 2u64.pow(attempt))).await;
            }
        }

        let err = last_err.unwrap_or_else(|| anyhow::anyhow!("bot API send failed"));
        tracing::error!(action, error = %err, "Bot notification failed after 3 attempts");
        Err(err)
    }
}

#[async_trait]
impl MessageChannel for OneBotChannel {
    async fn send_private(&self, user_id: i64, text: &str) -> Result<()> {
        let payload = serde_json::json!({
            "user_id": user_id,
            "message": text,
        });
        self.post_action("send_private_msg", &payload).await
    }

    async fn send_group(&self, group_id: i64, text: &str) -> Result<()> {
        let payload = serde_json::json!({
            "group_id": group_id,
            "message": text,
        });
        self.post_action("send_group_msg", &payload).await
    }

    fn channel_type(&self) -> &str {
        "onebot"
    }
}
