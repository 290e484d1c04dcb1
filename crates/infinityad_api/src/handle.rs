use std::collections::HashMap;
use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use infinityad_core::JobId;
use infinityad_logging::{infinityad_debug, infinityad_warn};
use tokio_util::sync::CancellationToken;

use crate::poller::{poll_job, EventSink, PollSettings};
use crate::{ApiEvent, BackendApi, CreateAdRequest};

enum ApiCommand {
    Call(ApiCall),
    StartPolling { job_id: JobId, settings: PollSettings },
    StopPolling { job_id: JobId },
}

/// One-shot requests whose answer becomes a single event.
enum ApiCall {
    Scrape { url: String, bypass_cache: bool },
    ClearCache { marketplace: String },
    Analyze { url: String, force_reanalysis: bool },
    CreateAd(CreateAdRequest),
    CheckHealth,
}

/// Runs backend calls on a dedicated tokio runtime and reports results to a sink.
///
/// At most one job is polled at a time: starting a poll cancels any other.
/// Dropping the handle cancels every active poll.
pub struct ApiHandle {
    cmd_tx: mpsc::Sender<ApiCommand>,
    shutdown: CancellationToken,
}

impl ApiHandle {
    pub fn new(api: Arc<dyn BackendApi>, sink: Arc<dyn EventSink>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let shutdown = CancellationToken::new();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("infinityad-api")
            .build()?;

        let root = shutdown.clone();
        thread::Builder::new()
            .name("infinityad-api-dispatch".into())
            .spawn(move || {
                let mut polls: HashMap<JobId, CancellationToken> = HashMap::new();
                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        ApiCommand::StartPolling { job_id, settings } => {
                            for (previous, token) in polls.drain() {
                                infinityad_warn!("superseding poll for job {}", previous);
                                token.cancel();
                            }
                            let token = root.child_token();
                            polls.insert(job_id.clone(), token.clone());
                            let api = api.clone();
                            let sink = sink.clone();
                            runtime.spawn(async move {
                                let outcome =
                                    poll_job(api.as_ref(), &job_id, settings, token, sink.as_ref())
                                        .await;
                                infinityad_debug!("poll for job {} ended: {:?}", job_id, outcome);
                            });
                        }
                        ApiCommand::StopPolling { job_id } => {
                            if let Some(token) = polls.remove(&job_id) {
                                token.cancel();
                            }
                        }
                        ApiCommand::Call(call) => {
                            let api = api.clone();
                            let sink = sink.clone();
                            runtime.spawn(async move {
                                let event = run_call(api.as_ref(), call).await;
                                sink.emit(event);
                            });
                        }
                    }
                }
                root.cancel();
            })?;

        Ok(Self { cmd_tx, shutdown })
    }

    pub fn scrape_product(&self, url: impl Into<String>, bypass_cache: bool) {
        self.send(ApiCommand::Call(ApiCall::Scrape {
            url: url.into(),
            bypass_cache,
        }));
    }

    pub fn clear_cache(&self, marketplace: impl Into<String>) {
        self.send(ApiCommand::Call(ApiCall::ClearCache {
            marketplace: marketplace.into(),
        }));
    }

    pub fn analyze_youtube(&self, url: impl Into<String>, force_reanalysis: bool) {
        self.send(ApiCommand::Call(ApiCall::Analyze {
            url: url.into(),
            force_reanalysis,
        }));
    }

    pub fn create_ad(&self, request: CreateAdRequest) {
        self.send(ApiCommand::Call(ApiCall::CreateAd(request)));
    }

    pub fn start_polling(&self, job_id: impl Into<JobId>, settings: PollSettings) {
        self.send(ApiCommand::StartPolling {
            job_id: job_id.into(),
            settings,
        });
    }

    pub fn stop_polling(&self, job_id: impl Into<JobId>) {
        self.send(ApiCommand::StopPolling {
            job_id: job_id.into(),
        });
    }

    pub fn check_health(&self) {
        self.send(ApiCommand::Call(ApiCall::CheckHealth));
    }

    fn send(&self, command: ApiCommand) {
        if self.cmd_tx.send(command).is_err() {
            infinityad_warn!("api dispatcher is gone; command dropped");
        }
    }
}

impl Drop for ApiHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn run_call(api: &dyn BackendApi, call: ApiCall) -> ApiEvent {
    match call {
        ApiCall::Scrape { url, bypass_cache } => {
            ApiEvent::ProductScraped(api.scrape_product(&url, bypass_cache).await)
        }
        ApiCall::ClearCache { marketplace } => {
            let result = api.clear_cache(&marketplace).await;
            ApiEvent::CacheCleared {
                marketplace,
                result,
            }
        }
        ApiCall::Analyze {
            url,
            force_reanalysis,
        } => ApiEvent::VideoAnalyzed(api.analyze_youtube(&url, force_reanalysis).await),
        ApiCall::CreateAd(request) => ApiEvent::AdCreated(api.create_ad(&request).await),
        ApiCall::CheckHealth => ApiEvent::HealthChecked(api.health_check().await),
    }
}
