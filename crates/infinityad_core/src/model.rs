//! Backend payloads as the client consumes them.
//!
//! Fields the client never reads are still decoded when the backend sends them,
//! but nothing here validates or normalizes values.

use std::fmt;

use serde::{Deserialize, Serialize};

pub type JobId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
}

fn default_currency() -> String {
    "BRL".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: u64,
    #[serde(default)]
    pub marketplace: String,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_name: Option<String>,
}

impl Product {
    /// First image in gallery order, if any.
    pub fn cover_image(&self) -> Option<&ProductImage> {
        self.images.first()
    }
}

/// Opinion polarity reported by the analysis backend.
///
/// Any value outside the four known ones is kept verbatim in `Unknown` so
/// rendering stays total.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Mixed,
    Unknown(String),
}

impl Sentiment {
    pub fn as_str(&self) -> &str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Mixed => "mixed",
            Sentiment::Unknown(raw) => raw,
        }
    }
}

impl From<String> for Sentiment {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "positive" => Sentiment::Positive,
            "negative" => Sentiment::Negative,
            "neutral" => Sentiment::Neutral,
            "mixed" => Sentiment::Mixed,
            _ => Sentiment::Unknown(raw),
        }
    }
}

impl From<&str> for Sentiment {
    fn from(raw: &str) -> Self {
        Sentiment::from(raw.to_string())
    }
}

impl From<Sentiment> for String {
    fn from(sentiment: Sentiment) -> Self {
        sentiment.as_str().to_string()
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    #[serde(alias = "topic")]
    pub name: String,
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YouTubeAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    pub overall_sentiment: Sentiment,
    pub sentiment_score: f64,
    pub confidence: f64,
    #[serde(default)]
    pub positive_aspects: Vec<String>,
    #[serde(default)]
    pub negative_aspects: Vec<String>,
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub brands_mentioned: Vec<String>,
    #[serde(default)]
    pub products_mentioned: Vec<String>,
    #[serde(default)]
    pub from_cache: bool,
}

/// Lifecycle of a backend ad-generation job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Queued,
    Processing,
    Done,
    Failed,
    Other(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Done => "done",
            JobStatus::Failed => "failed",
            JobStatus::Other(raw) => raw,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Failed)
    }
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "queued" => JobStatus::Queued,
            "processing" => JobStatus::Processing,
            "done" => JobStatus::Done,
            "failed" => JobStatus::Failed,
            _ => JobStatus::Other(raw),
        }
    }
}

impl From<&str> for JobStatus {
    fn from(raw: &str) -> Self {
        JobStatus::from(raw.to_string())
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer to a job status poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatusReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

/// Transport or HTTP failure as the state machine sees it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiFailure {
    pub status: Option<u16>,
    pub detail: Option<String>,
}

impl ApiFailure {
    pub fn with_detail(detail: impl Into<String>) -> Self {
        Self {
            status: None,
            detail: Some(detail.into()),
        }
    }

    /// Backend-provided detail, or `fallback` when there is none.
    pub fn message_or(&self, fallback: &str) -> String {
        match self.detail.as_deref().map(str::trim) {
            Some(detail) if !detail.is_empty() => detail.to_string(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sentiment_is_preserved() {
        let topic: Topic =
            serde_json::from_str(r#"{"topic":"Preço","sentiment":"ecstatic"}"#).unwrap();
        assert_eq!(topic.name, "Preço");
        assert_eq!(topic.sentiment, Sentiment::Unknown("ecstatic".into()));
        assert_eq!(topic.sentiment.to_string(), "ecstatic");
    }

    #[test]
    fn product_decodes_with_defaults() {
        let product: Product =
            serde_json::from_str(r#"{"name":"Widget","price":{"amount":10.0}}"#).unwrap();
        assert_eq!(product.price.currency, "BRL");
        assert_eq!(product.rating, None);
        assert_eq!(product.review_count, 0);
        assert!(product.cover_image().is_none());
    }

    #[test]
    fn job_status_terminality() {
        assert!(JobStatus::from("done").is_terminal());
        assert!(JobStatus::from("failed").is_terminal());
        assert!(!JobStatus::from("processing").is_terminal());
        assert!(!JobStatus::from("rendering").is_terminal());
    }

    #[test]
    fn failure_message_falls_back_on_blank_detail() {
        assert_eq!(ApiFailure::default().message_or("fallback"), "fallback");
        assert_eq!(ApiFailure::with_detail("  ").message_or("fallback"), "fallback");
        assert_eq!(ApiFailure::with_detail("boom").message_or("fallback"), "boom");
    }
}
