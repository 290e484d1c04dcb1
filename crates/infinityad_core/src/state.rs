use std::collections::VecDeque;
use std::time::Duration;

use crate::model::{JobId, JobStatus, Product, YouTubeAnalysis};
use crate::text;
use crate::view_model::AppViewModel;

/// Maximum number of entries kept in the analysis history.
pub const HISTORY_CAPACITY: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Product,
    YouTube,
    Ad,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Product, Panel::YouTube, Panel::Ad];

    fn index(self) -> usize {
        match self {
            Panel::Product => 0,
            Panel::YouTube => 1,
            Panel::Ad => 2,
        }
    }
}

/// Timing knobs for the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreSettings {
    pub message_ttl: Duration,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            message_ttl: Duration::from_secs(5),
            poll_interval: Duration::from_secs(3),
            max_poll_attempts: 200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiMessage {
    pub kind: MessageKind,
    pub text: String,
}

/// Loading flag and message slot owned by one panel.
///
/// The single `message` slot makes error and success mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct PanelStatus {
    pub(crate) loading: bool,
    pub(crate) message: Option<UiMessage>,
    pub(crate) generation: u64,
    pub(crate) submitted_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AdFlow {
    #[default]
    Idle,
    Submitting,
    Polling {
        job_id: JobId,
        attempts: u32,
    },
    Finished {
        job_id: JobId,
    },
}

impl AdFlow {
    pub fn is_active(&self) -> bool {
        matches!(self, AdFlow::Submitting | AdFlow::Polling { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryKind {
    Product,
    Analysis,
    Ad,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryItem {
    pub kind: HistoryKind,
    pub source_url: String,
    pub summary: String,
    pub recorded_utc: String,
}

impl HistoryItem {
    /// Host part of the source URL, or the raw text when it does not parse.
    pub fn source_host(&self) -> String {
        url::Url::parse(self.source_url.trim())
            .ok()
            .and_then(|parsed| parsed.host_str().map(str::to_owned))
            .unwrap_or_else(|| self.source_url.clone())
    }
}

/// Most-recent-first list capped at [`HISTORY_CAPACITY`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct History {
    items: VecDeque<HistoryItem>,
}

impl History {
    pub fn push(&mut self, item: HistoryItem) {
        self.items.push_front(item);
        self.items.truncate(HISTORY_CAPACITY);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryItem> {
        self.items.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductForm {
    pub url: String,
    pub bypass_cache: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct YouTubeForm {
    pub url: String,
    pub force_reanalysis: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdForm {
    pub product_url: String,
    pub youtube_url: String,
    pub style: String,
}

impl Default for AdForm {
    fn default() -> Self {
        Self {
            product_url: String::new(),
            youtube_url: String::new(),
            style: text::DEFAULT_AD_STYLE.to_string(),
        }
    }
}

/// Ephemeral form input; never holds backend data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Forms {
    pub product: ProductForm,
    pub youtube: YouTubeForm,
    pub ad: AdForm,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    settings: CoreSettings,
    panels: [PanelStatus; 3],
    forms: Forms,
    product: Option<Product>,
    youtube_analysis: Option<YouTubeAnalysis>,
    current_job_id: Option<JobId>,
    job_status: Option<JobStatus>,
    job_result: Option<serde_json::Value>,
    ad_flow: AdFlow,
    history: History,
    backend_healthy: Option<bool>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: CoreSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> CoreSettings {
        self.settings
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::build(self)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn panel(&self, panel: Panel) -> &PanelStatus {
        &self.panels[panel.index()]
    }

    fn panel_mut(&mut self, panel: Panel) -> &mut PanelStatus {
        &mut self.panels[panel.index()]
    }

    pub fn is_loading(&self, panel: Panel) -> bool {
        self.panel(panel).loading
    }

    pub fn message(&self, panel: Panel) -> Option<&UiMessage> {
        self.panel(panel).message.as_ref()
    }

    pub fn error(&self, panel: Panel) -> Option<&str> {
        self.message(panel)
            .filter(|message| message.kind == MessageKind::Error)
            .map(|message| message.text.as_str())
    }

    pub fn success(&self, panel: Panel) -> Option<&str> {
        self.message(panel)
            .filter(|message| message.kind == MessageKind::Success)
            .map(|message| message.text.as_str())
    }

    pub fn set_loading(&mut self, panel: Panel, loading: bool) {
        self.panel_mut(panel).loading = loading;
        self.mark_dirty();
    }

    /// Replaces the panel message with an error; returns the message generation.
    pub fn set_error(&mut self, panel: Panel, text: impl Into<String>) -> u64 {
        self.replace_message(panel, MessageKind::Error, text.into())
    }

    /// Replaces the panel message with a success; returns the message generation.
    pub fn set_success(&mut self, panel: Panel, text: impl Into<String>) -> u64 {
        self.replace_message(panel, MessageKind::Success, text.into())
    }

    pub fn clear_messages(&mut self, panel: Panel) {
        let status = self.panel_mut(panel);
        status.message = None;
        status.generation += 1;
        self.mark_dirty();
    }

    /// Clears the message only if it is still the one issued as `generation`.
    pub(crate) fn expire_message(&mut self, panel: Panel, generation: u64) -> bool {
        let status = self.panel_mut(panel);
        if status.generation != generation || status.message.is_none() {
            return false;
        }
        status.message = None;
        self.mark_dirty();
        true
    }

    fn replace_message(&mut self, panel: Panel, kind: MessageKind, text: String) -> u64 {
        let status = self.panel_mut(panel);
        status.generation += 1;
        status.message = Some(UiMessage { kind, text });
        let generation = status.generation;
        self.mark_dirty();
        generation
    }

    pub(crate) fn begin_request(&mut self, panel: Panel, url: String) {
        let status = self.panel_mut(panel);
        status.loading = true;
        status.submitted_url = Some(url);
        self.mark_dirty();
    }

    pub(crate) fn finish_request(&mut self, panel: Panel) -> Option<String> {
        let status = self.panel_mut(panel);
        status.loading = false;
        let url = status.submitted_url.take();
        self.mark_dirty();
        url
    }

    pub fn forms(&self) -> &Forms {
        &self.forms
    }

    pub(crate) fn forms_mut(&mut self) -> &mut Forms {
        self.mark_dirty();
        &mut self.forms
    }

    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    pub fn set_product(&mut self, product: Product) {
        self.product = Some(product);
        self.mark_dirty();
    }

    pub fn youtube_analysis(&self) -> Option<&YouTubeAnalysis> {
        self.youtube_analysis.as_ref()
    }

    pub fn set_youtube_analysis(&mut self, analysis: YouTubeAnalysis) {
        self.youtube_analysis = Some(analysis);
        self.mark_dirty();
    }

    pub fn current_job_id(&self) -> Option<&str> {
        self.current_job_id.as_deref()
    }

    /// Tracks a new job; its status starts as `processing`.
    pub fn set_current_job_id(&mut self, job_id: JobId) {
        self.current_job_id = Some(job_id);
        self.job_status = Some(JobStatus::Processing);
        self.job_result = None;
        self.mark_dirty();
    }

    pub fn job_status(&self) -> Option<&JobStatus> {
        self.job_status.as_ref()
    }

    pub fn set_job_status(&mut self, status: JobStatus) {
        self.job_status = Some(status);
        self.mark_dirty();
    }

    pub fn job_result(&self) -> Option<&serde_json::Value> {
        self.job_result.as_ref()
    }

    pub(crate) fn set_job_result(&mut self, result: Option<serde_json::Value>) {
        self.job_result = result;
        self.mark_dirty();
    }

    pub fn ad_flow(&self) -> &AdFlow {
        &self.ad_flow
    }

    pub(crate) fn set_ad_flow(&mut self, flow: AdFlow) {
        self.ad_flow = flow;
        self.mark_dirty();
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn add_to_history(&mut self, item: HistoryItem) {
        self.history.push(item);
        self.mark_dirty();
    }

    pub fn backend_healthy(&self) -> Option<bool> {
        self.backend_healthy
    }

    pub(crate) fn set_backend_healthy(&mut self, healthy: bool) {
        self.backend_healthy = Some(healthy);
        self.mark_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(n: usize) -> HistoryItem {
        HistoryItem {
            kind: HistoryKind::Product,
            source_url: format!("https://shop.example/{n}"),
            summary: format!("item {n}"),
            recorded_utc: String::new(),
        }
    }

    #[test]
    fn history_is_capped_and_most_recent_first() {
        let mut state = AppState::new();
        for n in 0..(HISTORY_CAPACITY + 7) {
            state.add_to_history(item(n));
            assert!(state.history().len() <= HISTORY_CAPACITY);
            assert_eq!(state.history().iter().next(), Some(&item(n)));
        }
        let last = state.history().iter().last().unwrap();
        assert_eq!(last.summary, "item 7");
    }

    #[test]
    fn error_and_success_exclude_each_other() {
        let mut state = AppState::new();
        state.set_success(Panel::Product, "ok");
        state.set_error(Panel::Product, "bad");
        assert_eq!(state.error(Panel::Product), Some("bad"));
        assert_eq!(state.success(Panel::Product), None);

        state.set_success(Panel::Product, "ok again");
        assert_eq!(state.error(Panel::Product), None);
        assert_eq!(state.success(Panel::Product), Some("ok again"));

        state.clear_messages(Panel::Product);
        assert!(state.message(Panel::Product).is_none());
    }

    #[test]
    fn panels_do_not_share_flags() {
        let mut state = AppState::new();
        state.set_loading(Panel::Product, true);
        state.set_error(Panel::YouTube, "bad");
        assert!(state.is_loading(Panel::Product));
        assert!(!state.is_loading(Panel::YouTube));
        assert!(state.message(Panel::Product).is_none());
    }

    #[test]
    fn current_job_forces_processing() {
        let mut state = AppState::new();
        state.set_job_status(JobStatus::Done);
        state.set_current_job_id("J1".into());
        assert_eq!(state.job_status(), Some(&JobStatus::Processing));
        assert_eq!(state.current_job_id(), Some("J1"));
    }

    #[test]
    fn source_host_falls_back_to_raw_text() {
        let mut entry = item(1);
        assert_eq!(entry.source_host(), "shop.example");
        entry.source_url = "not a url".into();
        assert_eq!(entry.source_host(), "not a url");
    }
}
