use crate::error::{ClientError, Result};
use crate::models::{ApiResponse, NodeDetail, NodeSummary};
use reqwest::header::AUTHORIZATION;
use std::time::Duration;

/// HTTP client for the dashboard metrics API.
///
/// Stateless between calls; the scheduler builds a fresh instance each cycle
/// from the just-reloaded configuration.
pub struct DashboardClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl DashboardClient {
    pub fn new(endpoint: &str, token: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base_url: endpoint.trim_end_matches('/').to_string(),
            token: token.to_string(),
            client,
        })
    }

    /// Lists the fleet, optionally restricted to one tag.
    pub async fn list_nodes(&self, tag: Option<&str>) -> Result<Vec<NodeSummary>> {
        let mut request = self
            .client
            .get(format!("{}/api/v1/server/list", self.base_url))
            .header(AUTHORIZATION, &self.token);
        if let Some(tag) = tag {
            request = request.query(&[("tag", tag)]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Http {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        let envelope: ApiResponse<Vec<NodeSummary>> = response.json().await?;
        envelope.into_result()
    }

    /// Fetches raw detail records for the given node ids (comma-joined, the
    /// way the dashboard expects them).
    pub async fn node_details(&self, ids: &[i64]) -> Result<Vec<NodeDetail>> {
        let joined = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        tracing::debug!(ids = %joined, "Fetching node details");

        let response = self
            .client
            .get(format!("{}/api/v1/server/details", self.base_url))
            .header(AUTHORIZATION, &self.token)
            .query(&[("id", joined.as_str())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ClientError::Http {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        let envelope: ApiResponse<Vec<NodeDetail>> = response.json().await?;
        envelope.into_result()
    }
}
