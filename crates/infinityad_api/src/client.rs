use infinityad_core::{JobStatusReport, Product, YouTubeAnalysis};
use infinityad_logging::{infinityad_debug, infinityad_warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;

use crate::types::{
    extract_detail, AnalyzeRequest, BatchScrapeRequest, Envelope, ScrapeRequest,
};
use crate::{ApiError, ApiSettings, CreateAdRequest, CreatedJob, HealthReport};

/// One call per backend operation. Nothing here retries.
#[async_trait::async_trait]
pub trait BackendApi: Send + Sync {
    async fn scrape_product(&self, url: &str, bypass_cache: bool) -> Result<Product, ApiError>;

    async fn batch_scrape(
        &self,
        urls: &[String],
        bypass_cache: bool,
    ) -> Result<serde_json::Value, ApiError>;

    async fn clear_cache(&self, marketplace: &str) -> Result<(), ApiError>;

    async fn analyze_youtube(
        &self,
        youtube_url: &str,
        force_reanalysis: bool,
    ) -> Result<YouTubeAnalysis, ApiError>;

    async fn get_youtube_analysis(&self, video_id: &str) -> Result<serde_json::Value, ApiError>;

    async fn create_ad(&self, request: &CreateAdRequest) -> Result<CreatedJob, ApiError>;

    async fn get_ad_status(&self, job_id: &str) -> Result<JobStatusReport, ApiError>;

    async fn health_check(&self) -> Result<HealthReport, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(settings.base_url.trim())
            .map_err(|err| ApiError::Config(format!("base url {}: {err}", settings.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!(
                "base url {} cannot carry paths",
                settings.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = settings.auth_token.as_deref() {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|err| ApiError::Config(format!("auth token: {err}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| ApiError::Config(err.to_string()))?;

        Ok(Self { base_url, client })
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn with_bypass_cache(mut url: Url, bypass_cache: bool) -> Url {
        url.query_pairs_mut()
            .append_pair("bypass_cache", if bypass_cache { "true" } else { "false" });
        url
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.text().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            let detail = extract_detail(&body);
            infinityad_warn!("{} failed with {}: {:?}", url.path(), status, detail);
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.send(request).await?;
        serde_json::from_str::<Envelope<T>>(&body)
            .map(Envelope::into_inner)
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        infinityad_debug!("{} {}", method, url);
        self.client.request(method, url)
    }
}

#[async_trait::async_trait]
impl BackendApi for ReqwestBackend {
    async fn scrape_product(&self, url: &str, bypass_cache: bool) -> Result<Product, ApiError> {
        let endpoint = Self::with_bypass_cache(self.endpoint(&["products", "scrape"]), bypass_cache);
        let request = self
            .request(Method::POST, endpoint)
            .json(&ScrapeRequest { url });
        self.send_json(request).await
    }

    async fn batch_scrape(
        &self,
        urls: &[String],
        bypass_cache: bool,
    ) -> Result<serde_json::Value, ApiError> {
        let endpoint = Self::with_bypass_cache(self.endpoint(&["products", "batch"]), bypass_cache);
        let request = self
            .request(Method::POST, endpoint)
            .json(&BatchScrapeRequest { urls });
        self.send_json(request).await
    }

    async fn clear_cache(&self, marketplace: &str) -> Result<(), ApiError> {
        let endpoint = self.endpoint(&["cache", marketplace]);
        self.send(self.request(Method::DELETE, endpoint)).await?;
        Ok(())
    }

    async fn analyze_youtube(
        &self,
        youtube_url: &str,
        force_reanalysis: bool,
    ) -> Result<YouTubeAnalysis, ApiError> {
        let request = self
            .request(Method::POST, self.endpoint(&["youtube", "analyze"]))
            .json(&AnalyzeRequest {
                youtube_url,
                force_reanalysis,
            });
        self.send_json(request).await
    }

    async fn get_youtube_analysis(&self, video_id: &str) -> Result<serde_json::Value, ApiError> {
        let endpoint = self.endpoint(&["youtube", "analysis", video_id]);
        self.send_json(self.request(Method::GET, endpoint)).await
    }

    async fn create_ad(&self, request: &CreateAdRequest) -> Result<CreatedJob, ApiError> {
        let builder = self
            .request(Method::POST, self.endpoint(&["ads", "create"]))
            .json(request);
        self.send_json(builder).await
    }

    async fn get_ad_status(&self, job_id: &str) -> Result<JobStatusReport, ApiError> {
        let endpoint = self.endpoint(&["ads", "status", job_id]);
        self.send_json(self.request(Method::GET, endpoint)).await
    }

    async fn health_check(&self) -> Result<HealthReport, ApiError> {
        self.send_json(self.request(Method::GET, self.endpoint(&["health"])))
            .await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout(err.to_string());
    }
    if err.is_decode() {
        return ApiError::Decode(err.to_string());
    }
    ApiError::Network(err.to_string())
}
