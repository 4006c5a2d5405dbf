//! Analysis API client
//!
//! Performs the two remote calls this crate knows about:
//! - `GET {base}/api/wallet/{address}?network={network}` for wallet analysis
//! - `POST {base}/api/assistant/query` for assistant queries
//!
//! Every outcome is normalized into the three-way [`AnalysisError`] taxonomy;
//! nothing here panics or leaks a raw reqwest error to callers. Decoding is
//! split into pure functions so the status/body mapping is testable without
//! a live server.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info};

use crate::models::{AnalysisError, ApiResult, ClientConfig, Network, WalletAnalysisResult};

/// Characters escaped when the submitted address is embedded as a URL path
/// segment. The address is passed through as submitted (no format checks),
/// so it may contain anything the user typed.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

/// Path and query for one analysis request
fn wallet_path(address: &str, network: Network) -> String {
    format!(
        "/api/wallet/{}?network={}",
        utf8_percent_encode(address, PATH_SEGMENT),
        network
    )
}

/// Fallback when the remote service reports failure without a detail message
pub const GENERIC_ANALYSIS_ERROR: &str = "Analysis failed";

/// Fallback when a 2xx assistant reply carries no `response` field
pub const NO_ASSISTANT_RESPONSE: &str = "No response from assistant.";

/// The request surface the orchestrator and assistant session depend on.
/// Production uses [`AnalysisClient`]; tests script their own implementations.
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    async fn fetch_analysis(
        &self,
        address: &str,
        network: Network,
    ) -> ApiResult<WalletAnalysisResult>;

    async fn fetch_assistant_reply(&self, query: &str) -> ApiResult<String>;
}

/// Wire envelope of the analysis endpoint
#[derive(Debug, Deserialize)]
struct AnalysisEnvelope {
    #[serde(default)]
    success: bool,
    data: Option<WalletAnalysisResult>,
    error: Option<String>,
}

/// Wire envelope of the assistant endpoint
#[derive(Debug, Deserialize)]
struct AssistantEnvelope {
    response: Option<String>,
    error: Option<String>,
}

/// Map an analysis response (status + raw body) to a typed outcome.
///
/// - undecodable body, any status -> Transport
/// - decodable and (non-2xx or success:false) -> Api with the remote detail
/// - success:true without data -> Transport
fn decode_analysis_body(status: StatusCode, body: &str) -> ApiResult<WalletAnalysisResult> {
    let envelope: AnalysisEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(err) => {
            return Err(if status.is_success() {
                AnalysisError::transport(format!("Malformed analysis response: {}", err))
            } else {
                AnalysisError::transport(format!(
                    "HTTP {} with undecodable body",
                    status.as_u16()
                ))
            })
        }
    };

    if !status.is_success() || !envelope.success {
        return Err(AnalysisError::api(
            envelope
                .error
                .unwrap_or_else(|| GENERIC_ANALYSIS_ERROR.to_string()),
        ));
    }

    envelope
        .data
        .ok_or_else(|| AnalysisError::transport("Analysis response missing data"))
}

/// Map an assistant response (status + raw body) to the reply text
fn decode_assistant_body(status: StatusCode, body: &str) -> ApiResult<String> {
    let envelope: AssistantEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(err) => {
            return Err(if status.is_success() {
                AnalysisError::transport(format!("Malformed assistant response: {}", err))
            } else {
                AnalysisError::transport(format!(
                    "HTTP {} with undecodable body",
                    status.as_u16()
                ))
            })
        }
    };

    if !status.is_success() {
        return Err(AnalysisError::api(
            envelope
                .error
                .unwrap_or_else(|| "Assistant query failed".to_string()),
        ));
    }

    Ok(envelope
        .response
        .unwrap_or_else(|| NO_ASSISTANT_RESPONSE.to_string()))
}

/// reqwest-backed analysis API client
pub struct AnalysisClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl AnalysisClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Fetch one wallet analysis and normalize the outcome
    async fn analysis_request(
        &self,
        address: &str,
        network: Network,
    ) -> ApiResult<WalletAnalysisResult> {
        let url = self.config.endpoint(&wallet_path(address, network));

        info!("🔍 Fetching analysis for {} on {}", address, network);

        let response = self
            .http
            .get(&url)
            .timeout(self.config.request_timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        debug!("Analysis response: HTTP {} ({} bytes)", status.as_u16(), body.len());

        decode_analysis_body(status, &body)
    }

    /// Send one assistant query and normalize the outcome
    async fn assistant_request(&self, query: &str) -> ApiResult<String> {
        let url = self.config.endpoint("/api/assistant/query");

        info!("💬 Sending assistant query ({} chars)", query.len());

        let response = self
            .http
            .post(&url)
            .timeout(self.config.request_timeout)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        decode_assistant_body(status, &body)
    }
}

#[async_trait]
impl AnalysisApi for AnalysisClient {
    async fn fetch_analysis(
        &self,
        address: &str,
        network: Network,
    ) -> ApiResult<WalletAnalysisResult> {
        self.analysis_request(address, network).await
    }

    async fn fetch_assistant_reply(&self, query: &str) -> ApiResult<String> {
        self.assistant_request(query).await
    }
}
