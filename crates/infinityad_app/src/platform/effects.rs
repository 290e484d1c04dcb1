use std::sync::{mpsc, Arc};
use std::thread;

use chrono::Utc;
use infinityad_api::{
    ApiEvent, ApiHandle, ApiSettings, BackendApi, ChannelEventSink, CreateAdRequest,
    PollSettings, ReqwestBackend,
};
use infinityad_core::{Effect, Msg};
use infinityad_logging::{infinityad_debug, infinityad_info, infinityad_warn};

/// Turns effects into backend calls and timers; results come back as `Msg`s.
pub struct EffectRunner {
    api: ApiHandle,
    msg_tx: mpsc::Sender<Msg>,
}

impl EffectRunner {
    pub fn new(settings: &ApiSettings, msg_tx: mpsc::Sender<Msg>) -> anyhow::Result<Self> {
        let backend: Arc<dyn BackendApi> = Arc::new(ReqwestBackend::new(settings)?);
        Self::with_backend(backend, msg_tx)
    }

    pub fn with_backend(
        backend: Arc<dyn BackendApi>,
        msg_tx: mpsc::Sender<Msg>,
    ) -> anyhow::Result<Self> {
        let (event_tx, event_rx) = mpsc::channel();
        let api = ApiHandle::new(backend, Arc::new(ChannelEventSink::new(event_tx)))?;
        spawn_event_loop(event_rx, msg_tx.clone())?;
        Ok(Self { api, msg_tx })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::CheckHealth => self.api.check_health(),
                Effect::ScrapeProduct { url, bypass_cache } => {
                    infinityad_info!("ScrapeProduct url={} bypass_cache={}", url, bypass_cache);
                    self.api.scrape_product(url, bypass_cache);
                }
                Effect::ClearCache { marketplace } => {
                    infinityad_info!("ClearCache marketplace={}", marketplace);
                    self.api.clear_cache(marketplace);
                }
                Effect::AnalyzeVideo {
                    url,
                    force_reanalysis,
                } => {
                    infinityad_info!("AnalyzeVideo url={} force={}", url, force_reanalysis);
                    self.api.analyze_youtube(url, force_reanalysis);
                }
                Effect::CreateAd {
                    product_url,
                    youtube_url,
                    style,
                } => {
                    infinityad_info!("CreateAd product_url={} style={}", product_url, style);
                    self.api.create_ad(CreateAdRequest {
                        product_url,
                        youtube_url,
                        style,
                    });
                }
                Effect::StartPolling {
                    job_id,
                    interval,
                    max_attempts,
                } => {
                    infinityad_info!("StartPolling job_id={} every {:?}", job_id, interval);
                    self.api.start_polling(
                        job_id,
                        PollSettings {
                            interval,
                            max_attempts,
                        },
                    );
                }
                Effect::StopPolling { job_id } => {
                    infinityad_debug!("StopPolling job_id={}", job_id);
                    self.api.stop_polling(job_id);
                }
                Effect::ScheduleMessageExpiry {
                    panel,
                    generation,
                    after,
                } => {
                    let msg_tx = self.msg_tx.clone();
                    thread::spawn(move || {
                        thread::sleep(after);
                        let _ = msg_tx.send(Msg::MessageExpired { panel, generation });
                    });
                }
            }
        }
    }
}

fn spawn_event_loop(
    event_rx: mpsc::Receiver<ApiEvent>,
    msg_tx: mpsc::Sender<Msg>,
) -> std::io::Result<()> {
    thread::Builder::new()
        .name("infinityad-events".into())
        .spawn(move || {
            while let Ok(event) = event_rx.recv() {
                if msg_tx.send(map_event(event, now_utc)).is_err() {
                    break;
                }
            }
        })?;
    Ok(())
}

fn now_utc() -> String {
    Utc::now().to_rfc3339()
}

pub(crate) fn map_event(event: ApiEvent, now_utc: fn() -> String) -> Msg {
    match event {
        ApiEvent::ProductScraped(result) => Msg::ProductScraped {
            result: result.map_err(|err| err.to_failure()),
            completed_utc: now_utc(),
        },
        ApiEvent::CacheCleared {
            marketplace,
            result,
        } => Msg::CacheCleared {
            marketplace,
            result: result.map_err(|err| err.to_failure()),
        },
        ApiEvent::VideoAnalyzed(result) => Msg::AnalysisCompleted {
            result: result.map_err(|err| err.to_failure()),
            completed_utc: now_utc(),
        },
        ApiEvent::AdCreated(result) => Msg::AdCreated {
            result: result
                .map(|created| created.job_id)
                .map_err(|err| err.to_failure()),
        },
        ApiEvent::JobStatus { job_id, result } => {
            if let Err(err) = &result {
                infinityad_warn!("Status poll for job {} failed: {}", job_id, err);
            }
            Msg::JobStatusReceived {
                job_id,
                result: result.map_err(|err| err.to_failure()),
                completed_utc: now_utc(),
            }
        }
        ApiEvent::PollingExhausted { job_id, attempts } => {
            Msg::JobPollingExhausted { job_id, attempts }
        }
        ApiEvent::HealthChecked(result) => Msg::HealthChecked {
            result: match result {
                Ok(report) => {
                    infinityad_debug!("Backend health: {}", report.status);
                    Ok(())
                }
                Err(err) => {
                    infinityad_warn!("Backend health check failed: {}", err);
                    Err(err.to_failure())
                }
            },
        },
    }
}
