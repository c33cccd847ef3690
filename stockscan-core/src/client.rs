//! HTTP client for a remote scan server.
//!
//! [`ScanApiClient`] speaks the `/api/v1` JSON protocol and implements
//! [`BatchSource`], so a [`ScanSession`](crate::ScanSession) can run against
//! a server exactly as it runs against a local controller. Requests are not
//! retried; a failed slice surfaces to the session, which keeps its offset.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::asset::AssetRecord;
use crate::error::{Result, ScanError};
use crate::protocol::{
    FlagRequest, FlagResponse, ProviderSummary, ProvidersResponse, SafeListResponse, ScanRequest,
    ScanResponse,
};
use crate::session::BatchSource;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error body returned by the server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    code: String,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root, e.g. `http://localhost:3000`
    pub base_url: String,
    /// Bearer token carrying the administrative capability
    pub token: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// Client for the scan server REST API.
#[derive(Debug, Clone)]
pub struct ScanApiClient {
    client: Client,
    config: ClientConfig,
}

impl ScanApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ScanError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Host part of the server URL, used to label exports.
    pub fn host_label(&self) -> String {
        host_label(&self.config.base_url)
    }

    pub async fn scan(&self, offset: u64) -> Result<ScanResponse> {
        let offset = i64::try_from(offset)
            .map_err(|_| ScanError::invalid_input(format!("Offset {offset} is out of range")))?;
        let request = self.post("/api/v1/scan").json(&ScanRequest { offset });
        self.send(request).await
    }

    pub async fn flag(&self, ids: &[i64]) -> Result<FlagResponse> {
        let body = FlagRequest { ids: ids.to_vec() };
        self.send(self.post("/api/v1/flags").json(&body)).await
    }

    pub async fn safe_list(&self) -> Result<Vec<AssetRecord>> {
        let response: SafeListResponse = self.send(self.get("/api/v1/safe")).await?;
        Ok(response.results)
    }

    pub async fn providers(&self) -> Result<Vec<ProviderSummary>> {
        let response: ProvidersResponse = self.send(self.get("/api/v1/providers")).await?;
        Ok(response.providers)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.get(self.url(path)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.post(self.url(path)))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let start = Instant::now();

        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "Request to scan server failed");
            ScanError::Transport(format!("Request failed: {e}"))
        })?;

        let status = response.status();
        let latency_ms = start.elapsed().as_millis() as u64;
        debug!(status = %status, latency_ms, "Received scan server response");

        if !status.is_success() {
            let body = response.json::<ErrorBody>().await.ok();
            return Err(error_from_status(status, body));
        }

        response
            .json()
            .await
            .map_err(|e| ScanError::Transport(format!("Failed to parse server response: {e}")))
    }
}

#[async_trait]
impl BatchSource for ScanApiClient {
    async fn fetch_batch(&self, offset: u64) -> Result<ScanResponse> {
        self.scan(offset).await
    }
}

fn error_from_status(status: StatusCode, body: Option<ErrorBody>) -> ScanError {
    let message = body
        .as_ref()
        .map(|b| b.error.clone())
        .unwrap_or_else(|| format!("Server returned status {status}"));
    let code = body.as_ref().map(|b| b.code.as_str()).unwrap_or_default();

    match (status, code) {
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _) | (_, "UNAUTHORIZED") => {
            ScanError::Unauthorized(message)
        }
        (_, "INVALID_INPUT") | (StatusCode::BAD_REQUEST, _) => ScanError::InvalidInput(message),
        (_, "STORE_UNAVAILABLE") | (StatusCode::SERVICE_UNAVAILABLE, _) => {
            ScanError::StoreUnavailable(message)
        }
        _ => ScanError::Transport(message),
    }
}

fn host_label(base_url: &str) -> String {
    let without_scheme = base_url
        .split_once("://")
        .map_or(base_url, |(_, rest)| rest);
    without_scheme
        .split(['/', ':'])
        .next()
        .filter(|host| !host.is_empty())
        .unwrap_or("local")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(error: &str, code: &str) -> Option<ErrorBody> {
        Some(ErrorBody {
            error: error.to_string(),
            code: code.to_string(),
        })
    }

    #[test]
    fn test_error_mapping() {
        assert!(matches!(
            error_from_status(StatusCode::UNAUTHORIZED, body("Unauthorized user", "UNAUTHORIZED")),
            ScanError::Unauthorized(m) if m == "Unauthorized user"
        ));
        assert!(matches!(
            error_from_status(StatusCode::BAD_REQUEST, body("No images selected.", "INVALID_INPUT")),
            ScanError::InvalidInput(m) if m == "No images selected."
        ));
        assert!(matches!(
            error_from_status(StatusCode::SERVICE_UNAVAILABLE, None),
            ScanError::StoreUnavailable(_)
        ));
        assert!(matches!(
            error_from_status(StatusCode::INTERNAL_SERVER_ERROR, body("boom", "INTERNAL_ERROR")),
            ScanError::Transport(_)
        ));
    }

    #[test]
    fn test_url_join() {
        let client =
            ScanApiClient::new(ClientConfig::new("http://localhost:3000/").with_token("t")).unwrap();
        assert_eq!(client.url("/api/v1/scan"), "http://localhost:3000/api/v1/scan");
    }

    #[test]
    fn test_host_label() {
        assert_eq!(host_label("https://media.example.com/wp"), "media.example.com");
        assert_eq!(host_label("http://localhost:3000"), "localhost");
        assert_eq!(host_label(""), "local");
    }
}
