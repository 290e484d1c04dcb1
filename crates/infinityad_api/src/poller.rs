use std::sync::mpsc;
use std::time::Duration;

use infinityad_core::JobStatus;
use infinityad_logging::{infinityad_debug, infinityad_info, infinityad_warn};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{ApiEvent, BackendApi};

pub trait EventSink: Send + Sync {
    fn emit(&self, event: ApiEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<ApiEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<ApiEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: ApiEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    /// Zero means no cap.
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_attempts: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Terminal(JobStatus),
    Exhausted { attempts: u32 },
    Cancelled,
}

/// Polls the status of `job_id` on a fixed interval until a terminal status,
/// the attempt cap, or cancellation.
///
/// The first request goes out one interval after the call. Every answer,
/// including transport failures, is forwarded to `sink`.
pub async fn poll_job(
    api: &dyn BackendApi,
    job_id: &str,
    settings: PollSettings,
    cancel: CancellationToken,
    sink: &dyn EventSink,
) -> PollOutcome {
    let mut ticker = interval_at(Instant::now() + settings.interval, settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut attempts = 0u32;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return PollOutcome::Cancelled,
            _ = ticker.tick() => {}
        }

        attempts += 1;
        let result = tokio::select! {
            _ = cancel.cancelled() => return PollOutcome::Cancelled,
            result = api.get_ad_status(job_id) => result,
        };

        let terminal = match &result {
            Ok(report) => {
                infinityad_debug!("job {} poll {} status={}", job_id, attempts, report.status);
                report.status.is_terminal().then(|| report.status.clone())
            }
            Err(err) => {
                infinityad_warn!("job {} poll {} failed: {}", job_id, attempts, err);
                None
            }
        };
        sink.emit(ApiEvent::JobStatus {
            job_id: job_id.to_string(),
            result,
        });

        if let Some(status) = terminal {
            infinityad_info!("job {} finished with {}", job_id, status);
            return PollOutcome::Terminal(status);
        }
        if settings.max_attempts > 0 && attempts >= settings.max_attempts {
            infinityad_warn!("job {} still pending after {} polls", job_id, attempts);
            sink.emit(ApiEvent::PollingExhausted {
                job_id: job_id.to_string(),
                attempts,
            });
            return PollOutcome::Exhausted { attempts };
        }
    }
}
