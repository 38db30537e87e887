//! HTTP transport for the voting backend.
//!
//! `VoteApi` is the seam the controller talks through; `HttpClient` is the
//! `reqwest` implementation. Every failure is normalised into `ApiError` and no
//! request is ever retried here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::types::{HealthStatus, VoteOption, VoteReceipt, VoteTally};
use crate::config::ApiConfig;

// ─── Errors ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Rejected locally, nothing was sent.
    #[error("validation failed: {0}")]
    Validation(String),
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),
    /// The backend answered with a non-2xx status.
    #[error("HTTP error {status}")]
    Http { status: u16 },
    /// The health probe failed.
    #[error("backend unreachable: {0}")]
    Connectivity(String),
    /// A 2xx response whose body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    /// Text shown to the user. Presentation only, never used for control flow.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Validation(_) => "Invalid option. Must be \"cats\" or \"dogs\".".into(),
            ApiError::Network(_) => {
                "Connection error. Check that the server is running.".into()
            }
            ApiError::Http { status: 400 } => {
                "Invalid request. Check the data you sent.".into()
            }
            ApiError::Http { status: 404 } => "The requested resource was not found.".into(),
            ApiError::Http { status: 500 } => {
                "Internal server error. Try again later.".into()
            }
            ApiError::Http { status } => format!("Server error ({status}). Try again later."),
            ApiError::Connectivity(_) => "Cannot connect to the server.".into(),
            ApiError::Decode(_) => "An unexpected error occurred. Try again later.".into(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ApiError::Http {
                status: status.as_u16(),
            }
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

// ─── Transport seam ─────────────────────────────────────────────────────────

#[async_trait]
pub trait VoteApi: Send + Sync {
    async fn fetch_health(&self) -> Result<HealthStatus, ApiError>;

    async fn fetch_results(&self) -> Result<VoteTally, ApiError>;

    async fn submit_vote(&self, option: VoteOption) -> Result<VoteReceipt, ApiError>;

    /// Submit by raw option name. Unknown names fail before any request.
    #[allow(dead_code)]
    async fn submit_vote_named(&self, name: &str) -> Result<VoteReceipt, ApiError> {
        let option: VoteOption = name.parse()?;
        self.submit_vote(option).await
    }
}

// ─── reqwest implementation ─────────────────────────────────────────────────

/// Wire shape of the vote response body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VoteBody {
    ok: bool,
    voted: Option<VoteOption>,
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    health_path: String,
    http: reqwest::Client,
}

impl HttpClient {
    pub fn new(cfg: &ApiConfig) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()?;
        Ok(Self::with_http(cfg, http))
    }

    pub fn with_http(cfg: &ApiConfig, http: reqwest::Client) -> Self {
        Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            health_path: cfg.health_path.clone(),
            http,
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Send a request and turn non-2xx answers into `ApiError::Http`.
    async fn send(&self, method: Method, path: &str) -> Result<Response, ApiError> {
        let url = self.url(path);
        let response = self
            .http
            .request(method.clone(), &url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        debug!("{method} {url} -> {}", status.as_u16());
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl VoteApi for HttpClient {
    async fn fetch_health(&self) -> Result<HealthStatus, ApiError> {
        let health: HealthStatus = self
            .get_json(&self.health_path)
            .await
            .map_err(|e| ApiError::Connectivity(e.to_string()))?;
        if !health.is_ok() {
            return Err(ApiError::Connectivity(format!(
                "server reported status \"{}\"",
                health.status
            )));
        }
        Ok(health)
    }

    async fn fetch_results(&self) -> Result<VoteTally, ApiError> {
        self.get_json("/results").await
    }

    async fn submit_vote(&self, option: VoteOption) -> Result<VoteReceipt, ApiError> {
        let response = self
            .send(Method::POST, &format!("/vote/{}", option.as_str()))
            .await?;
        let status = response.status();
        if status != StatusCode::CREATED {
            debug!("vote accepted with {} instead of 201", status.as_u16());
        }
        let body: VoteBody = response.json().await?;
        Ok(VoteReceipt {
            ok: body.ok,
            voted: body.voted,
            status: status.as_u16(),
        })
    }
}
