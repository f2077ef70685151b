//! HTTP transport for Railway GraphQL calls

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let char_count = body.chars().count();
    let truncated = if char_count > MAX_LOG_BODY_LENGTH {
        let head: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// GraphQL response envelope
#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// HTTP client wrapper for GraphQL calls
#[derive(Clone)]
pub struct RailwayHttpClient {
    client: Client,
    endpoint: Url,
}

impl RailwayHttpClient {
    /// Create a new HTTP client for the given GraphQL endpoint
    pub fn new(endpoint: Url) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("terraform-provider-railway/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POST a GraphQL request body and return the `data` member of the response
    pub async fn post_graphql(&self, operation: &str, token: &str, body: &Value) -> Result<Value> {
        tracing::debug!("POST {} ({})", self.endpoint, operation);

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            // Only the sanitized/truncated body is logged
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&response_body));
            return Err(anyhow::anyhow!("{} request failed: {}", operation, status));
        }

        let envelope: GraphQlResponse =
            serde_json::from_str(&response_body).context("Failed to parse response JSON")?;

        if !envelope.errors.is_empty() {
            let messages = envelope
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            tracing::error!("GraphQL error in {}: {}", operation, sanitize_for_log(&messages));
            return Err(anyhow::anyhow!("{}: {}", operation, messages));
        }

        envelope
            .data
            .with_context(|| format!("{} returned no data", operation))
    }
}
