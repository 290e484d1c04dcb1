use std::time::Duration;

use infinityad_core::{
    update, AdFlow, ApiFailure, AppState, CoreSettings, Effect, HistoryKind, JobStatus,
    JobStatusReport, Msg, Panel,
};
use pretty_assertions::assert_eq;

fn submit_ad(state: AppState, product_url: &str, youtube_url: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::AdProductUrlChanged(product_url.to_string()));
    let (state, _) = update(state, Msg::AdYoutubeUrlChanged(youtube_url.to_string()));
    update(state, Msg::AdSubmitted)
}

fn created(state: AppState, job_id: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::AdCreated {
            result: Ok(job_id.to_string()),
        },
    )
}

fn status(state: AppState, job_id: &str, status: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::JobStatusReceived {
            job_id: job_id.to_string(),
            result: Ok(JobStatusReport {
                job_id: Some(job_id.to_string()),
                status: JobStatus::from(status),
                result: Some(serde_json::json!({"video_url": "https://cdn/ad.mp4"})),
            }),
            completed_utc: "2026-01-01T00:00:00Z".into(),
        },
    )
}

#[test]
fn submission_creates_ad_with_default_style() {
    let (state, effects) = submit_ad(AppState::new(), "https://shopee.com.br/x", "  ");
    assert_eq!(
        effects,
        vec![Effect::CreateAd {
            product_url: "https://shopee.com.br/x".into(),
            youtube_url: None,
            style: "charismatic_fomo".into(),
        }]
    );
    assert_eq!(*state.ad_flow(), AdFlow::Submitting);
    assert_eq!(state.job_status(), Some(&JobStatus::Queued));
}

#[test]
fn created_job_starts_polling_as_processing() {
    let settings = CoreSettings {
        poll_interval: Duration::from_millis(10),
        max_poll_attempts: 4,
        ..CoreSettings::default()
    };
    let (state, _) = submit_ad(
        AppState::with_settings(settings),
        "https://shopee.com.br/x",
        "https://youtu.be/abc",
    );
    let (state, effects) = created(state, "J1");

    assert_eq!(
        effects,
        vec![Effect::StartPolling {
            job_id: "J1".into(),
            interval: Duration::from_millis(10),
            max_attempts: 4,
        }]
    );
    assert_eq!(state.current_job_id(), Some("J1"));
    assert_eq!(state.job_status(), Some(&JobStatus::Processing));
    assert!(!state.is_loading(Panel::Ad));
}

#[test]
fn polling_stops_exactly_at_terminal_status() {
    for terminal in ["done", "failed"] {
        let (state, _) = submit_ad(AppState::new(), "https://shopee.com.br/x", "");
        let (state, _) = created(state, "J1");

        let (state, effects) = status(state, "J1", "processing");
        assert!(effects.is_empty());
        let (state, effects) = status(state, "J1", "queued");
        assert!(effects.is_empty());
        assert_eq!(
            *state.ad_flow(),
            AdFlow::Polling {
                job_id: "J1".into(),
                attempts: 2
            }
        );

        let (state, effects) = status(state, "J1", terminal);
        assert_eq!(
            effects,
            vec![Effect::StopPolling {
                job_id: "J1".into()
            }]
        );
        assert_eq!(
            *state.ad_flow(),
            AdFlow::Finished {
                job_id: "J1".into()
            }
        );
        assert_eq!(state.job_status(), Some(&JobStatus::from(terminal)));

        let view = state.view().ad_panel;
        assert!(!view.polling);
        assert!(view.result_json.unwrap().contains("ad.mp4"));
        // Failed jobs render like finished ones; no dedicated message.
        assert!(state.message(Panel::Ad).is_none());
        assert_eq!(state.history().iter().next().unwrap().kind, HistoryKind::Ad);

        let (_state, effects) = status(state, "J1", "processing");
        assert!(effects.is_empty());
    }
}

#[test]
fn second_submission_while_active_is_rejected() {
    let (state, _) = submit_ad(AppState::new(), "https://shopee.com.br/x", "");
    let (state, _) = created(state, "J1");
    let (state, effects) = submit_ad(state, "https://shopee.com.br/y", "");

    assert!(effects
        .iter()
        .all(|effect| !matches!(effect, Effect::CreateAd { .. })));
    assert_eq!(state.error(Panel::Ad), Some("Já existe um anúncio em processamento"));
    assert_eq!(state.current_job_id(), Some("J1"));
    assert_eq!(state.forms().ad.product_url, "https://shopee.com.br/x");

    let (state, _) = update(state, Msg::AdStyleChanged("funny".into()));
    assert_eq!(state.forms().ad.style, "charismatic_fomo");
}

#[test]
fn submission_allowed_again_after_terminal_status() {
    let (state, _) = submit_ad(AppState::new(), "https://shopee.com.br/x", "");
    let (state, _) = created(state, "J1");
    let (state, _) = status(state, "J1", "done");
    let (_state, effects) = submit_ad(state, "https://shopee.com.br/y", "");
    assert!(matches!(effects.as_slice(), [Effect::CreateAd { .. }]));
}

#[test]
fn empty_product_url_is_rejected() {
    let (state, effects) = submit_ad(AppState::new(), " ", "https://youtu.be/abc");
    assert!(matches!(
        effects.as_slice(),
        [Effect::ScheduleMessageExpiry { panel: Panel::Ad, .. }]
    ));
    assert_eq!(*state.ad_flow(), AdFlow::Idle);
}

#[test]
fn create_failure_returns_to_idle_with_error() {
    let (state, _) = submit_ad(AppState::new(), "https://shopee.com.br/x", "");
    let (state, _) = update(
        state,
        Msg::AdCreated {
            result: Err(ApiFailure {
                status: Some(401),
                detail: None,
            }),
        },
    );
    assert_eq!(*state.ad_flow(), AdFlow::Idle);
    assert_eq!(state.error(Panel::Ad), Some("Erro ao criar anúncio"));
}

#[test]
fn transport_error_during_poll_keeps_polling() {
    let (state, _) = submit_ad(AppState::new(), "https://shopee.com.br/x", "");
    let (state, _) = created(state, "J1");
    let (state, effects) = update(
        state,
        Msg::JobStatusReceived {
            job_id: "J1".into(),
            result: Err(ApiFailure::with_detail("bad gateway")),
            completed_utc: String::new(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(
        *state.ad_flow(),
        AdFlow::Polling {
            job_id: "J1".into(),
            attempts: 1
        }
    );
    assert!(state.message(Panel::Ad).is_none());
}

#[test]
fn exhausted_polling_stops_with_error() {
    let (state, _) = submit_ad(AppState::new(), "https://shopee.com.br/x", "");
    let (state, _) = created(state, "J1");
    let (state, effects) = update(
        state,
        Msg::JobPollingExhausted {
            job_id: "J1".into(),
            attempts: 200,
        },
    );
    assert_eq!(
        effects[0],
        Effect::StopPolling {
            job_id: "J1".into()
        }
    );
    assert_eq!(*state.ad_flow(), AdFlow::Idle);
    assert_eq!(state.error(Panel::Ad), Some("Tempo esgotado aguardando o anúncio"));
}

#[test]
fn teardown_releases_active_poll() {
    let (state, _) = submit_ad(AppState::new(), "https://shopee.com.br/x", "");
    let (state, _) = created(state, "J1");
    let (state, effects) = update(state, Msg::Teardown);
    assert_eq!(
        effects,
        vec![Effect::StopPolling {
            job_id: "J1".into()
        }]
    );

    let (_state, effects) = update(state, Msg::Teardown);
    assert!(effects.is_empty());
}

#[test]
fn stale_status_for_other_job_is_ignored() {
    let (state, _) = submit_ad(AppState::new(), "https://shopee.com.br/x", "");
    let (state, _) = created(state, "J2");
    let before = state.clone();
    let (state, effects) = status(state, "J1", "done");
    assert!(effects.is_empty());
    assert_eq!(state, before);
}
