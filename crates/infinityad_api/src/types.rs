use infinityad_core::{ApiFailure, JobId, JobStatus, JobStatusReport, Product, YouTubeAnalysis};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("http status {status}")]
    HttpStatus { status: u16, detail: Option<String> },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Human-readable detail reported by the backend, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::HttpStatus { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn to_failure(&self) -> ApiFailure {
        ApiFailure {
            status: self.status(),
            detail: self.detail().map(str::to_owned),
        }
    }
}

/// Bodies arrive either as `{"data": T}` or as a bare `T`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } | Envelope::Bare(data) => data,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ScrapeRequest<'a> {
    pub url: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchScrapeRequest<'a> {
    pub urls: &'a [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalyzeRequest<'a> {
    pub youtube_url: &'a str,
    pub force_reanalysis: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateAdRequest {
    pub product_url: String,
    pub youtube_url: Option<String>,
    pub style: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedJob {
    pub job_id: JobId,
    #[serde(default)]
    pub status: Option<JobStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiEvent {
    ProductScraped(Result<Product, ApiError>),
    CacheCleared {
        marketplace: String,
        result: Result<(), ApiError>,
    },
    VideoAnalyzed(Result<YouTubeAnalysis, ApiError>),
    AdCreated(Result<CreatedJob, ApiError>),
    JobStatus {
        job_id: JobId,
        result: Result<JobStatusReport, ApiError>,
    },
    PollingExhausted {
        job_id: JobId,
        attempts: u32,
    },
    HealthChecked(Result<HealthReport, ApiError>),
}

/// Pulls a readable message out of an error body.
///
/// Understands `{"detail": "text"}` and the `{"detail": [{"msg": ...}]}` shape of
/// request validation errors.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|msg| msg.as_str()))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
