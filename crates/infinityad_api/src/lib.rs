//! InfinityAd API: HTTP client for the backend and background execution of calls.
mod client;
mod handle;
mod poller;
mod settings;
mod types;

pub use client::{BackendApi, ReqwestBackend};
pub use handle::ApiHandle;
pub use poller::{poll_job, ChannelEventSink, EventSink, PollOutcome, PollSettings};
pub use settings::{ApiSettings, DEFAULT_BASE_URL};
pub use types::{ApiError, ApiEvent, CreateAdRequest, CreatedJob, HealthReport};
