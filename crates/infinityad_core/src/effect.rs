use std::time::Duration;

use crate::{JobId, Panel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CheckHealth,
    ScrapeProduct {
        url: String,
        bypass_cache: bool,
    },
    ClearCache {
        marketplace: String,
    },
    AnalyzeVideo {
        url: String,
        force_reanalysis: bool,
    },
    CreateAd {
        product_url: String,
        youtube_url: Option<String>,
        style: String,
    },
    StartPolling {
        job_id: JobId,
        interval: Duration,
        max_attempts: u32,
    },
    StopPolling {
        job_id: JobId,
    },
    ScheduleMessageExpiry {
        panel: Panel,
        generation: u64,
        after: Duration,
    },
}
