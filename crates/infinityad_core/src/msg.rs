use crate::model::{ApiFailure, JobId, JobStatusReport, Product, YouTubeAnalysis};
use crate::Panel;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The client came up; probes backend health.
    Started,
    /// User edited the product URL field.
    ProductUrlChanged(String),
    /// User toggled "ignore cache".
    BypassCacheToggled(bool),
    /// User pressed the scrape button.
    ScrapeSubmitted,
    /// User asked the backend to drop cached scrapes for a marketplace.
    ClearCacheRequested { marketplace: String },
    /// User edited the video URL field.
    YoutubeUrlChanged(String),
    /// User toggled "force reanalysis".
    ForceReanalysisToggled(bool),
    /// User pressed the analyze button.
    AnalyzeSubmitted,
    AdProductUrlChanged(String),
    AdYoutubeUrlChanged(String),
    AdStyleChanged(String),
    /// User pressed the generate-ad button.
    AdSubmitted,
    ProductScraped {
        result: Result<Product, ApiFailure>,
        completed_utc: String,
    },
    CacheCleared {
        marketplace: String,
        result: Result<(), ApiFailure>,
    },
    AnalysisCompleted {
        result: Result<YouTubeAnalysis, ApiFailure>,
        completed_utc: String,
    },
    AdCreated {
        result: Result<JobId, ApiFailure>,
    },
    /// One status poll came back for `job_id`.
    JobStatusReceived {
        job_id: JobId,
        result: Result<JobStatusReport, ApiFailure>,
        completed_utc: String,
    },
    /// The poller gave up after `attempts` requests without a terminal status.
    JobPollingExhausted { job_id: JobId, attempts: u32 },
    HealthChecked { result: Result<(), ApiFailure> },
    /// User dismissed every visible message.
    DismissMessages,
    /// A message auto-expiry timer fired.
    MessageExpired { panel: Panel, generation: u64 },
    /// The view is going away; release timers.
    Teardown,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
