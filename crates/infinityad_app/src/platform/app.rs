use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::{anyhow, bail};
use infinityad_api::ApiSettings;
use infinityad_core::{update, AdFlow, AppState, CoreSettings, JobStatus, Msg, Panel};
use infinityad_logging::{infinityad_debug, infinityad_info, parse_level};

use super::commands::{self, Command as LineCommand};
use super::direct::{self, DirectCall};
use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::ui::{self, Palette};
use crate::cli::{Cli, Command};

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    logging::initialize(
        LogDestination::from_option(cli.log_file.as_deref()),
        parse_level(&cli.log_level),
    );

    let stdout_is_tty = io::stdout().is_terminal();
    let palette = Palette::new(!cli.no_color && stdout_is_tty);
    let api = cli.api_settings();
    let core = cli.core_settings();
    infinityad_info!("Backend at {}", api.base_url);

    match cli.command.clone().unwrap_or(Command::Interactive) {
        Command::Interactive => {
            let session = Session::new(core, &api)?;
            interactive(session, palette, stdout_is_tty)
        }
        Command::Scrape { url, bypass_cache } => one_shot(
            Session::new(core, &api)?,
            palette,
            Panel::Product,
            vec![
                Msg::ProductUrlChanged(url),
                Msg::BypassCacheToggled(bypass_cache),
                Msg::ScrapeSubmitted,
            ],
        ),
        Command::ClearCache { marketplace } => one_shot(
            Session::new(core, &api)?,
            palette,
            Panel::Product,
            vec![Msg::ClearCacheRequested { marketplace }],
        ),
        Command::Analyze { url, force } => one_shot(
            Session::new(core, &api)?,
            palette,
            Panel::YouTube,
            vec![
                Msg::YoutubeUrlChanged(url),
                Msg::ForceReanalysisToggled(force),
                Msg::AnalyzeSubmitted,
            ],
        ),
        Command::Ad {
            product_url,
            youtube_url,
            style,
        } => one_shot(
            Session::new(core, &api)?,
            palette,
            Panel::Ad,
            vec![
                Msg::AdProductUrlChanged(product_url),
                Msg::AdYoutubeUrlChanged(youtube_url.unwrap_or_default()),
                Msg::AdStyleChanged(style),
                Msg::AdSubmitted,
            ],
        ),
        Command::Batch { urls, bypass_cache } => {
            direct::run(&api, DirectCall::Batch { urls, bypass_cache })
        }
        Command::Analysis { video_id } => direct::run(&api, DirectCall::Analysis { video_id }),
        Command::Health => direct::run(&api, DirectCall::Health),
    }
}

/// State plus the machinery that feeds it messages.
struct Session {
    state: AppState,
    runner: EffectRunner,
    msg_tx: mpsc::Sender<Msg>,
    msg_rx: mpsc::Receiver<Msg>,
}

impl Session {
    fn new(core: CoreSettings, api: &ApiSettings) -> anyhow::Result<Self> {
        let (msg_tx, msg_rx) = mpsc::channel();
        let runner = EffectRunner::new(api, msg_tx.clone())?;
        Ok(Self::assemble(core, runner, msg_tx, msg_rx))
    }

    #[cfg(test)]
    fn with_backend(
        core: CoreSettings,
        backend: std::sync::Arc<dyn infinityad_api::BackendApi>,
    ) -> anyhow::Result<Self> {
        let (msg_tx, msg_rx) = mpsc::channel();
        let runner = EffectRunner::with_backend(backend, msg_tx.clone())?;
        Ok(Self::assemble(core, runner, msg_tx, msg_rx))
    }

    fn assemble(
        core: CoreSettings,
        runner: EffectRunner,
        msg_tx: mpsc::Sender<Msg>,
        msg_rx: mpsc::Receiver<Msg>,
    ) -> Self {
        Self {
            state: AppState::with_settings(core),
            runner,
            msg_tx,
            msg_rx,
        }
    }

    /// Applies one message, runs its effects and reports whether the view changed.
    fn dispatch(&mut self, msg: Msg) -> bool {
        infinityad_debug!("dispatch {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.enqueue(effects);
        let was_dirty = state.consume_dirty();
        self.state = state;
        was_dirty
    }

    fn is_idle(&self) -> bool {
        Panel::ALL
            .iter()
            .all(|panel| !self.state.is_loading(*panel))
            && !self.state.ad_flow().is_active()
    }
}

fn interactive(mut session: Session, palette: Palette, clear_screen: bool) -> anyhow::Result<()> {
    spawn_stdin_reader(session.msg_tx.clone())?;
    session.dispatch(Msg::Started);
    draw(&session, &palette, clear_screen)?;
    println!("{}", commands::HELP);
    prompt()?;

    loop {
        let Ok(first) = session.msg_rx.recv() else {
            break;
        };
        let mut quit = matches!(first, Msg::Teardown);
        let mut dirty = session.dispatch(first);
        while !quit {
            let Ok(next) = session.msg_rx.try_recv() else {
                break;
            };
            quit = matches!(next, Msg::Teardown);
            dirty |= session.dispatch(next);
        }
        if quit {
            infinityad_info!("Session closed");
            break;
        }
        if dirty {
            draw(&session, &palette, clear_screen)?;
            prompt()?;
        }
    }
    Ok(())
}

fn spawn_stdin_reader(msg_tx: mpsc::Sender<Msg>) -> io::Result<()> {
    thread::Builder::new()
        .name("infinityad-stdin".into())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                match commands::parse_line(&line) {
                    LineCommand::Dispatch(msgs) => {
                        for msg in msgs {
                            if msg_tx.send(msg).is_err() {
                                return;
                            }
                        }
                    }
                    LineCommand::Help => println!("{}", commands::HELP),
                    LineCommand::Unknown(verb) => {
                        println!("Comando desconhecido: {verb} (digite help)")
                    }
                    LineCommand::Empty => {}
                    LineCommand::Quit => break,
                }
            }
            let _ = msg_tx.send(Msg::Teardown);
        })?;
    Ok(())
}

fn draw(session: &Session, palette: &Palette, clear_screen: bool) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if clear_screen {
        write!(out, "\x1b[2J\x1b[H")?;
    }
    writeln!(out, "{}", ui::render::render(&session.state.view(), palette))?;
    out.flush()
}

fn prompt() -> io::Result<()> {
    let mut out = io::stdout().lock();
    write!(out, "> ")?;
    out.flush()
}

/// Submits `msgs`, waits until every request settles, prints `panel` and fails
/// when it ends with an error.
fn one_shot(
    mut session: Session,
    palette: Palette,
    panel: Panel,
    msgs: Vec<Msg>,
) -> anyhow::Result<()> {
    for msg in msgs {
        session.dispatch(msg);
    }

    let mut last_progress = None;
    while !session.is_idle() {
        let msg = session
            .msg_rx
            .recv()
            .map_err(|_| anyhow!("backend worker stopped unexpectedly"))?;
        session.dispatch(msg);
        if let AdFlow::Polling { attempts, .. } = session.state.ad_flow() {
            let progress = (session.state.job_status().cloned(), *attempts);
            if last_progress.as_ref() != Some(&progress) {
                if let Some(status) = &progress.0 {
                    eprintln!("Status: {status} ({} consultas)", progress.1);
                }
                last_progress = Some(progress);
            }
        }
    }

    println!(
        "{}",
        ui::render::render_panel(&session.state.view(), panel, &palette)
    );

    if let Some(error) = session.state.error(panel) {
        bail!("{error}");
    }
    if panel == Panel::Ad && session.state.job_status() == Some(&JobStatus::Failed) {
        bail!(
            "job {} failed",
            session.state.current_job_id().unwrap_or_default()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use infinityad_api::{ApiError, BackendApi, CreateAdRequest, CreatedJob, HealthReport};
    use infinityad_core::{HistoryKind, JobStatusReport, Price, Product, YouTubeAnalysis};

    /// Answers every call locally; the ad job finishes on the second poll,
    /// as `failed` when the product url contains "broken".
    #[derive(Default)]
    struct StubBackend {
        polls: AtomicU32,
    }

    #[async_trait::async_trait]
    impl BackendApi for StubBackend {
        async fn scrape_product(&self, url: &str, _bypass: bool) -> Result<Product, ApiError> {
            if url.contains("broken") {
                return Err(ApiError::HttpStatus {
                    status: 422,
                    detail: Some("Marketplace não suportado".into()),
                });
            }
            Ok(Product {
                id: None,
                name: "Widget".into(),
                price: Price {
                    amount: 19.9,
                    currency: "BRL".into(),
                    original_amount: None,
                    discount_percentage: None,
                },
                rating: None,
                review_count: 0,
                marketplace: "shopee".into(),
                images: Vec::new(),
                source_url: Some(url.into()),
                seller_name: None,
            })
        }

        async fn batch_scrape(
            &self,
            _urls: &[String],
            _bypass: bool,
        ) -> Result<serde_json::Value, ApiError> {
            Ok(serde_json::Value::Null)
        }

        async fn clear_cache(&self, _marketplace: &str) -> Result<(), ApiError> {
            Ok(())
        }

        async fn analyze_youtube(
            &self,
            _url: &str,
            _force: bool,
        ) -> Result<YouTubeAnalysis, ApiError> {
            Err(ApiError::Network("offline".into()))
        }

        async fn get_youtube_analysis(&self, _id: &str) -> Result<serde_json::Value, ApiError> {
            Ok(serde_json::Value::Null)
        }

        async fn create_ad(&self, request: &CreateAdRequest) -> Result<CreatedJob, ApiError> {
            let job_id = if request.product_url.contains("broken") {
                "J-broken"
            } else {
                "J1"
            };
            Ok(CreatedJob {
                job_id: job_id.into(),
                status: Some(JobStatus::Queued),
            })
        }

        async fn get_ad_status(&self, job_id: &str) -> Result<JobStatusReport, ApiError> {
            let n = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
            let status = if n >= 2 && job_id.ends_with("broken") {
                JobStatus::Failed
            } else if n >= 2 {
                JobStatus::Done
            } else {
                JobStatus::Processing
            };
            Ok(JobStatusReport {
                job_id: Some(job_id.into()),
                status,
                result: (n >= 2).then(|| serde_json::json!({"script": "Compre já!"})),
            })
        }

        async fn health_check(&self) -> Result<HealthReport, ApiError> {
            Ok(HealthReport {
                status: "healthy".into(),
            })
        }
    }

    fn session() -> Session {
        let core = CoreSettings {
            message_ttl: Duration::from_secs(60),
            poll_interval: Duration::from_millis(10),
            max_poll_attempts: 50,
        };
        Session::with_backend(core, Arc::new(StubBackend::default())).unwrap()
    }

    fn settle(session: &mut Session) {
        while !session.is_idle() {
            let msg = session
                .msg_rx
                .recv_timeout(Duration::from_secs(5))
                .unwrap();
            session.dispatch(msg);
        }
    }

    #[test]
    fn scrape_round_trip_fills_product_and_history() {
        let mut session = session();
        session.dispatch(Msg::ProductUrlChanged("https://shopee.com.br/x".into()));
        assert!(session.dispatch(Msg::ScrapeSubmitted));
        assert!(!session.is_idle());
        settle(&mut session);

        assert_eq!(session.state.product().map(|p| p.name.as_str()), Some("Widget"));
        assert_eq!(session.state.history().len(), 1);
        assert_eq!(
            session.state.history().iter().next().map(|item| item.kind),
            Some(HistoryKind::Product)
        );
    }

    #[test]
    fn backend_detail_becomes_panel_error() {
        let mut session = session();
        session.dispatch(Msg::ProductUrlChanged("https://shopee.com.br/broken".into()));
        session.dispatch(Msg::ScrapeSubmitted);
        settle(&mut session);
        assert_eq!(
            session.state.error(Panel::Product),
            Some("Marketplace não suportado")
        );
    }

    #[test]
    fn transport_failure_uses_fallback_text() {
        let mut session = session();
        session.dispatch(Msg::YoutubeUrlChanged("https://youtu.be/abc".into()));
        session.dispatch(Msg::AnalyzeSubmitted);
        settle(&mut session);
        assert_eq!(
            session.state.error(Panel::YouTube),
            Some(infinityad_core::text::VIDEO_ANALYZE_FAILED)
        );
    }

    #[test]
    fn ad_flow_polls_until_done() {
        let mut session = session();
        session.dispatch(Msg::AdProductUrlChanged("https://shopee.com.br/x".into()));
        session.dispatch(Msg::AdSubmitted);
        settle(&mut session);

        assert_eq!(session.state.job_status(), Some(&JobStatus::Done));
        assert_eq!(
            session.state.job_result(),
            Some(&serde_json::json!({"script": "Compre já!"}))
        );
        assert!(matches!(session.state.ad_flow(), AdFlow::Finished { .. }));
    }

    #[test]
    fn one_shot_fails_when_the_ad_job_fails() {
        let result = one_shot(
            session(),
            Palette::plain(),
            Panel::Ad,
            vec![
                Msg::AdProductUrlChanged("https://shopee.com.br/broken".into()),
                Msg::AdSubmitted,
            ],
        );
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "job J-broken failed");
    }

    #[test]
    fn one_shot_succeeds_when_the_ad_job_is_done() {
        let result = one_shot(
            session(),
            Palette::plain(),
            Panel::Ad,
            vec![
                Msg::AdProductUrlChanged("https://shopee.com.br/x".into()),
                Msg::AdSubmitted,
            ],
        );
        assert!(result.is_ok());
    }
}
