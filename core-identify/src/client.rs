//! HTTP client for the Mantle identify endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Default base URL of the Mantle app API.
pub const DEFAULT_API_URL: &str = "https://appapi.heymantle.com/v1";

/// Client configuration. `app_id` and `api_key` come from the Mantle app
/// dashboard; without both the client cannot be constructed.
#[derive(Debug, Clone)]
pub struct MantleConfig {
    pub app_id: String,
    pub api_key: String,
    /// Overrides [`DEFAULT_API_URL`] when set.
    pub api_url: Option<String>,
}

impl MantleConfig {
    pub fn new(app_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            api_key: api_key.into(),
            api_url: None,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }
}

/// Customer identity forwarded to the identify endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyParams {
    /// Commerce platform the customer comes from.
    pub platform: String,
    /// The customer's id on that platform.
    pub platform_id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<serde_json::Map<String, Value>>,
}

/// Normalized result of an identify attempt. Never an `Err`: failures are
/// data, with the upstream message preserved in `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyOutcome {
    pub customer_api_token: Option<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IdentifyOutcome {
    pub(crate) fn granted(token: impl Into<String>) -> Self {
        Self {
            customer_api_token: Some(token.into()),
            success: true,
            error: None,
        }
    }

    pub(crate) fn failed(error: impl Into<String>) -> Self {
        Self {
            customer_api_token: None,
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Client for the Mantle app API.
pub struct MantleClient {
    http: reqwest::Client,
    app_id: String,
    api_key: String,
    api_url: String,
}

impl MantleClient {
    /// Build a client, or `None` when `app_id` or `api_key` is missing. A
    /// half-configured client would only ever produce confusing 401s, so it
    /// is never constructed.
    pub fn new(config: MantleConfig) -> Option<Self> {
        if config.app_id.is_empty() || config.api_key.is_empty() {
            return None;
        }
        Some(Self {
            http: reqwest::Client::new(),
            app_id: config.app_id,
            api_key: config.api_key,
            api_url: config
                .api_url
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Identify a customer and obtain a customer API token.
    pub async fn identify(&self, params: &IdentifyParams) -> IdentifyOutcome {
        let url = format!("{}/identify", self.api_url);
        debug!(platform_id = %params.platform_id, "identifying customer");

        let response = self
            .http
            .post(&url)
            .header("X-Mantle-App-Id", &self.app_id)
            .header("X-Mantle-App-Api-Key", &self.api_key)
            .json(params)
            .send()
            .await;

        let body = match response {
            Ok(response) => match response.json::<Value>().await {
                Ok(body) => body,
                Err(err) => {
                    warn!(error = %err, "identify response was not JSON");
                    return IdentifyOutcome::failed(err.to_string());
                }
            },
            Err(err) => {
                warn!(error = %err, "identify request failed");
                return IdentifyOutcome::failed(err.to_string());
            }
        };

        outcome_from_body(&body)
    }
}

impl std::fmt::Debug for MantleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // api_key deliberately omitted.
        f.debug_struct("MantleClient")
            .field("app_id", &self.app_id)
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// A token-bearing body means success; anything else is rendered as the
/// error string, keeping whatever the API said intact.
fn outcome_from_body(body: &Value) -> IdentifyOutcome {
    match body.get("apiToken").and_then(Value::as_str) {
        Some(token) => IdentifyOutcome::granted(token),
        None => match body.as_str() {
            Some(message) => IdentifyOutcome::failed(message),
            None => IdentifyOutcome::failed(body.to_string()),
        },
    }
}
