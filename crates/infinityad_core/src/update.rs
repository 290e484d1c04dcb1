use crate::model::{ApiFailure, JobStatus};
use crate::state::{AdFlow, HistoryItem, HistoryKind};
use crate::view_model::{price_line, sentiment_badge};
use crate::{text, AppState, Effect, Msg, Panel};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => vec![Effect::CheckHealth],
        // Forms stay frozen while their panel has a request in flight.
        Msg::ProductUrlChanged(_) | Msg::BypassCacheToggled(_)
            if busy(&state, Panel::Product) =>
        {
            Vec::new()
        }
        Msg::YoutubeUrlChanged(_) | Msg::ForceReanalysisToggled(_)
            if busy(&state, Panel::YouTube) =>
        {
            Vec::new()
        }
        Msg::AdProductUrlChanged(_) | Msg::AdYoutubeUrlChanged(_) | Msg::AdStyleChanged(_)
            if busy(&state, Panel::Ad) =>
        {
            Vec::new()
        }
        Msg::ProductUrlChanged(url) => {
            state.forms_mut().product.url = url;
            Vec::new()
        }
        Msg::BypassCacheToggled(on) => {
            state.forms_mut().product.bypass_cache = on;
            Vec::new()
        }
        Msg::YoutubeUrlChanged(url) => {
            state.forms_mut().youtube.url = url;
            Vec::new()
        }
        Msg::ForceReanalysisToggled(on) => {
            state.forms_mut().youtube.force_reanalysis = on;
            Vec::new()
        }
        Msg::AdProductUrlChanged(url) => {
            state.forms_mut().ad.product_url = url;
            Vec::new()
        }
        Msg::AdYoutubeUrlChanged(url) => {
            state.forms_mut().ad.youtube_url = url;
            Vec::new()
        }
        Msg::AdStyleChanged(style) => {
            state.forms_mut().ad.style = style;
            Vec::new()
        }
        Msg::ScrapeSubmitted => {
            if state.is_loading(Panel::Product) {
                let effect = error(&mut state, Panel::Product, text::REQUEST_IN_PROGRESS);
                return (state, vec![effect]);
            }
            let form = state.forms().product.clone();
            let url = form.url.trim();
            if url.is_empty() {
                let effect = error(&mut state, Panel::Product, text::PRODUCT_URL_REQUIRED);
                return (state, vec![effect]);
            }
            let url = url.to_string();
            state.begin_request(Panel::Product, url.clone());
            vec![Effect::ScrapeProduct {
                url,
                bypass_cache: form.bypass_cache,
            }]
        }
        Msg::ClearCacheRequested { marketplace } => {
            if state.is_loading(Panel::Product) {
                return (state, Vec::new());
            }
            let marketplace = match marketplace.trim() {
                "" => text::DEFAULT_CACHE_MARKETPLACE.to_string(),
                name => name.to_string(),
            };
            state.begin_request(Panel::Product, marketplace.clone());
            vec![Effect::ClearCache { marketplace }]
        }
        Msg::AnalyzeSubmitted => {
            if state.is_loading(Panel::YouTube) {
                let effect = error(&mut state, Panel::YouTube, text::REQUEST_IN_PROGRESS);
                return (state, vec![effect]);
            }
            let form = state.forms().youtube.clone();
            let url = form.url.trim();
            if url.is_empty() {
                let effect = error(&mut state, Panel::YouTube, text::YOUTUBE_URL_REQUIRED);
                return (state, vec![effect]);
            }
            let url = url.to_string();
            state.begin_request(Panel::YouTube, url.clone());
            vec![Effect::AnalyzeVideo {
                url,
                force_reanalysis: form.force_reanalysis,
            }]
        }
        Msg::AdSubmitted => submit_ad(&mut state),
        Msg::ProductScraped {
            result,
            completed_utc,
        } => {
            let source_url = state.finish_request(Panel::Product).unwrap_or_default();
            match result {
                Ok(product) => {
                    state.add_to_history(HistoryItem {
                        kind: HistoryKind::Product,
                        source_url,
                        summary: format!("{} ({})", product.name, price_line(&product.price)),
                        recorded_utc: completed_utc,
                    });
                    state.set_product(product);
                    vec![success(&mut state, Panel::Product, text::PRODUCT_SCRAPED)]
                }
                Err(failure) => vec![failed(
                    &mut state,
                    Panel::Product,
                    &failure,
                    text::PRODUCT_SCRAPE_FAILED,
                )],
            }
        }
        Msg::CacheCleared {
            marketplace,
            result,
        } => {
            state.finish_request(Panel::Product);
            match result {
                Ok(()) => {
                    let message = format!("{}: {marketplace}", text::CACHE_CLEARED);
                    vec![success(&mut state, Panel::Product, &message)]
                }
                Err(failure) => vec![failed(
                    &mut state,
                    Panel::Product,
                    &failure,
                    text::CACHE_CLEAR_FAILED,
                )],
            }
        }
        Msg::AnalysisCompleted {
            result,
            completed_utc,
        } => {
            let source_url = state.finish_request(Panel::YouTube).unwrap_or_default();
            match result {
                Ok(analysis) => {
                    let badge = sentiment_badge(&analysis.overall_sentiment);
                    state.add_to_history(HistoryItem {
                        kind: HistoryKind::Analysis,
                        source_url,
                        summary: format!("{} ({:.2})", badge.label, analysis.sentiment_score),
                        recorded_utc: completed_utc,
                    });
                    state.set_youtube_analysis(analysis);
                    vec![success(&mut state, Panel::YouTube, text::VIDEO_ANALYZED)]
                }
                Err(failure) => vec![failed(
                    &mut state,
                    Panel::YouTube,
                    &failure,
                    text::VIDEO_ANALYZE_FAILED,
                )],
            }
        }
        Msg::AdCreated { result } => {
            if *state.ad_flow() != AdFlow::Submitting {
                return (state, Vec::new());
            }
            state.set_loading(Panel::Ad, false);
            match result {
                Ok(job_id) => {
                    state.set_current_job_id(job_id.clone());
                    state.set_ad_flow(AdFlow::Polling {
                        job_id: job_id.clone(),
                        attempts: 0,
                    });
                    let settings = state.settings();
                    vec![Effect::StartPolling {
                        job_id,
                        interval: settings.poll_interval,
                        max_attempts: settings.max_poll_attempts,
                    }]
                }
                Err(failure) => {
                    state.finish_request(Panel::Ad);
                    state.set_ad_flow(AdFlow::Idle);
                    vec![failed(&mut state, Panel::Ad, &failure, text::AD_CREATE_FAILED)]
                }
            }
        }
        Msg::JobStatusReceived {
            job_id,
            result,
            completed_utc,
        } => {
            let attempts = match state.ad_flow() {
                AdFlow::Polling {
                    job_id: active,
                    attempts,
                } if *active == job_id => Some(attempts + 1),
                _ => None,
            };
            let Some(attempts) = attempts else {
                // Stale poll for a job no longer tracked.
                return (state, Vec::new());
            };
            let report = match result {
                Ok(report) => report,
                Err(_) => {
                    state.set_ad_flow(AdFlow::Polling { job_id, attempts });
                    return (state, Vec::new());
                }
            };
            state.set_job_status(report.status.clone());
            if !report.status.is_terminal() {
                state.set_ad_flow(AdFlow::Polling { job_id, attempts });
                return (state, Vec::new());
            }
            state.set_job_result(report.result);
            let source_url = state.finish_request(Panel::Ad).unwrap_or_default();
            state.add_to_history(HistoryItem {
                kind: HistoryKind::Ad,
                source_url,
                summary: format!("job {job_id}: {}", report.status),
                recorded_utc: completed_utc,
            });
            state.set_ad_flow(AdFlow::Finished {
                job_id: job_id.clone(),
            });
            vec![Effect::StopPolling { job_id }]
        }
        Msg::JobPollingExhausted { job_id, .. } => {
            if !matches!(state.ad_flow(), AdFlow::Polling { job_id: active, .. } if *active == job_id)
            {
                return (state, Vec::new());
            }
            state.finish_request(Panel::Ad);
            state.set_ad_flow(AdFlow::Idle);
            vec![
                Effect::StopPolling { job_id },
                error(&mut state, Panel::Ad, text::AD_POLL_EXHAUSTED),
            ]
        }
        Msg::HealthChecked { result } => {
            state.set_backend_healthy(result.is_ok());
            Vec::new()
        }
        Msg::DismissMessages => {
            for panel in Panel::ALL {
                state.clear_messages(panel);
            }
            Vec::new()
        }
        Msg::MessageExpired { panel, generation } => {
            state.expire_message(panel, generation);
            Vec::new()
        }
        Msg::Teardown => match state.ad_flow().clone() {
            AdFlow::Polling { job_id, .. } => {
                state.finish_request(Panel::Ad);
                state.set_ad_flow(AdFlow::Idle);
                vec![Effect::StopPolling { job_id }]
            }
            _ => Vec::new(),
        },
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn busy(state: &AppState, panel: Panel) -> bool {
    state.is_loading(panel) || (panel == Panel::Ad && state.ad_flow().is_active())
}

fn submit_ad(state: &mut AppState) -> Vec<Effect> {
    if state.ad_flow().is_active() {
        return vec![error(state, Panel::Ad, text::AD_ALREADY_RUNNING)];
    }
    let form = state.forms().ad.clone();
    let product_url = form.product_url.trim();
    if product_url.is_empty() {
        return vec![error(state, Panel::Ad, text::PRODUCT_URL_REQUIRED)];
    }
    let youtube_url = Some(form.youtube_url.trim())
        .filter(|url| !url.is_empty())
        .map(ToOwned::to_owned);
    let style = match form.style.trim() {
        "" => text::DEFAULT_AD_STYLE.to_string(),
        style => style.to_string(),
    };

    let product_url = product_url.to_string();
    state.begin_request(Panel::Ad, product_url.clone());
    state.set_job_status(JobStatus::Queued);
    state.set_ad_flow(AdFlow::Submitting);
    vec![Effect::CreateAd {
        product_url,
        youtube_url,
        style,
    }]
}

fn error(state: &mut AppState, panel: Panel, text: &str) -> Effect {
    let generation = state.set_error(panel, text);
    expiry(state, panel, generation)
}

fn success(state: &mut AppState, panel: Panel, text: &str) -> Effect {
    let generation = state.set_success(panel, text);
    expiry(state, panel, generation)
}

fn failed(state: &mut AppState, panel: Panel, failure: &ApiFailure, fallback: &str) -> Effect {
    let generation = state.set_error(panel, failure.message_or(fallback));
    expiry(state, panel, generation)
}

fn expiry(state: &AppState, panel: Panel, generation: u64) -> Effect {
    Effect::ScheduleMessageExpiry {
        panel,
        generation,
        after: state.settings().message_ttl,
    }
}
