//! Never-failing HTTP client for the coaching API.
//!
//! One request, one attempt, no retry — retry policy deliberately lives
//! nowhere, matching the backend contract: a timeout or connection error
//! surfaces immediately as a soft failure. All transport- and parse-level
//! problems are folded into the returned [`ApiResponse`], so calling code
//! branches on status and payload, never on `Err`.

use std::time::Duration;

use reqwest::{Client as HttpClient, Method};
use serde_json::Value;

use super::config::BackendConfig;
use super::errors::BackendError;
use super::types::{ApiResponse, StructuredInput};

// ─── BackendClient ───────────────────────────────────────────────────────────

/// Client for the coaching API.
///
/// Built once from [`BackendConfig`] and reused for every call. Does NOT
/// check connectivity on construction — the first call finds out.
pub struct BackendClient {
    http: HttpClient,
    base_url: String,
}

impl BackendClient {
    /// Build the client. The only fallible backend operation: everything
    /// after construction degrades instead of erroring.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let http = HttpClient::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| BackendError::ClientBuild {
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The configured base address (trailing slash trimmed).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform one call against the backend.
    ///
    /// `query` pairs are URL-encoded by reqwest; `body`, when present, is
    /// sent as JSON. Never fails: connection errors and timeouts come back
    /// as status 0, non-JSON bodies as `{"text": <raw>}`.
    pub async fn call(
        &self,
        path: &str,
        method: Method,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> ApiResponse {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.http.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %url, method = %method, error = %e, "backend call failed");
                return ApiResponse::transport_failure();
            }
        };

        let status = response.status().as_u16();
        let raw = response.text().await.unwrap_or_default();
        let payload = serde_json::from_str(&raw)
            .unwrap_or_else(|_| serde_json::json!({ "text": raw }));

        tracing::debug!(url = %url, method = %method, status, "backend call completed");
        ApiResponse { status, payload }
    }

    // ─── Endpoint wrappers ───────────────────────────────────────────────

    /// GET `/health` — service status mapping.
    pub async fn health(&self) -> ApiResponse {
        self.call("/health", Method::GET, &[], None).await
    }

    /// GET `/endpoints` — capability listing.
    pub async fn endpoints(&self) -> ApiResponse {
        self.call("/endpoints", Method::GET, &[], None).await
    }

    /// POST `/extract` — free text to structured profile fields.
    pub async fn extract(&self, text: &str) -> ApiResponse {
        let body = serde_json::json!({ "text": text });
        self.call("/extract", Method::POST, &[], Some(&body)).await
    }

    /// POST `/predict` — risk score and drivers for a profile.
    pub async fn predict(&self, input: &StructuredInput) -> ApiResponse {
        let body = serde_json::to_value(input).unwrap_or(Value::Null);
        self.call("/predict", Method::POST, &[], Some(&body)).await
    }

    /// GET `/kb/search?q=&k=` — knowledge-base search.
    pub async fn kb_search(&self, query: &str, k: usize) -> ApiResponse {
        let k = k.to_string();
        self.call("/kb/search", Method::GET, &[("q", query), ("k", &k)], None)
            .await
    }

    /// POST `/coach_llm?goal=` — coaching plan conditioned on the goal,
    /// with the profile as request body.
    pub async fn coach(&self, goal: &str, input: &StructuredInput) -> ApiResponse {
        let body = serde_json::to_value(input).unwrap_or(Value::Null);
        self.call("/coach_llm", Method::POST, &[("goal", goal)], Some(&body))
            .await
    }

    /// POST `/report/pdf` — render the plan as a downloadable PDF.
    pub async fn report_pdf(&self, plan: &[String], header: &str, footer: &str) -> ApiResponse {
        let body = serde_json::json!({ "plan": plan, "header": header, "footer": footer });
        self.call("/report/pdf", Method::POST, &[], Some(&body)).await
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
