//! InfinityAd core: domain model, pure state machine and view-model helpers.
mod effect;
pub mod model;
mod msg;
mod state;
pub mod text;
mod update;
mod view_model;

pub use effect::Effect;
pub use model::{
    ApiFailure, JobId, JobStatus, JobStatusReport, Price, Product, ProductImage, Sentiment, Topic,
    YouTubeAnalysis,
};
pub use msg::Msg;
pub use state::{
    AdFlow, AdForm, AppState, CoreSettings, Forms, History, HistoryItem, HistoryKind, MessageKind,
    Panel, ProductForm, UiMessage, YouTubeForm, HISTORY_CAPACITY,
};
pub use update::update;
pub use view_model::{
    price_line, rating_line, score_line, sentiment_badge, AdPanelView, AnalysisSection,
    AnalysisView, AppViewModel, HistoryRowView, PanelChrome, ProductPanelView, ProductView,
    SectionItem, SentimentBadge, Tone, YouTubePanelView,
};
