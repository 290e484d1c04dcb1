use crate::model::{Price, Product, Sentiment, YouTubeAnalysis};
use crate::state::{AdFlow, HistoryKind, Panel, UiMessage};
use crate::{text, AppState};

/// Display color family for badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Green,
    Red,
    Gray,
    Yellow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentimentBadge {
    pub label: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelChrome {
    pub loading: bool,
    pub message: Option<UiMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductView {
    pub name: String,
    pub price_line: String,
    pub rating_line: String,
    pub marketplace: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductPanelView {
    pub chrome: PanelChrome,
    pub url: String,
    pub bypass_cache: bool,
    pub product: Option<ProductView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionItem {
    pub text: String,
    pub badge: Option<SentimentBadge>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisSection {
    pub title: String,
    pub items: Vec<SectionItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisView {
    pub badge: SentimentBadge,
    pub score_line: String,
    /// Only sections with at least one item.
    pub sections: Vec<AnalysisSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct YouTubePanelView {
    pub chrome: PanelChrome,
    pub url: String,
    pub force_reanalysis: bool,
    pub analysis: Option<AnalysisView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdPanelView {
    pub chrome: PanelChrome,
    pub product_url: String,
    pub youtube_url: String,
    pub style: String,
    pub job_id: Option<String>,
    pub status: Option<String>,
    pub polling: bool,
    pub attempts: u32,
    pub result_json: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRowView {
    pub kind: HistoryKind,
    pub source: String,
    pub summary: String,
    pub recorded_utc: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub backend_healthy: Option<bool>,
    pub product_panel: ProductPanelView,
    pub youtube_panel: YouTubePanelView,
    pub ad_panel: AdPanelView,
    pub history: Vec<HistoryRowView>,
    pub dirty: bool,
}

impl AppViewModel {
    pub(crate) fn build(state: &AppState) -> Self {
        let forms = state.forms();
        let (polling, attempts) = match state.ad_flow() {
            AdFlow::Polling { attempts, .. } => (true, *attempts),
            _ => (false, 0),
        };

        Self {
            backend_healthy: state.backend_healthy(),
            product_panel: ProductPanelView {
                chrome: chrome(state, Panel::Product),
                url: forms.product.url.clone(),
                bypass_cache: forms.product.bypass_cache,
                product: state.product().map(product_view),
            },
            youtube_panel: YouTubePanelView {
                chrome: chrome(state, Panel::YouTube),
                url: forms.youtube.url.clone(),
                force_reanalysis: forms.youtube.force_reanalysis,
                analysis: state.youtube_analysis().map(analysis_view),
            },
            ad_panel: AdPanelView {
                chrome: chrome(state, Panel::Ad),
                product_url: forms.ad.product_url.clone(),
                youtube_url: forms.ad.youtube_url.clone(),
                style: forms.ad.style.clone(),
                job_id: state.current_job_id().map(str::to_owned),
                status: state.job_status().map(ToString::to_string),
                polling,
                attempts,
                result_json: state
                    .job_result()
                    .and_then(|result| serde_json::to_string_pretty(result).ok()),
            },
            history: state
                .history()
                .iter()
                .map(|item| HistoryRowView {
                    kind: item.kind,
                    source: item.source_host(),
                    summary: item.summary.clone(),
                    recorded_utc: item.recorded_utc.clone(),
                })
                .collect(),
            dirty: state.is_dirty(),
        }
    }
}

fn chrome(state: &AppState, panel: Panel) -> PanelChrome {
    PanelChrome {
        loading: state.is_loading(panel),
        message: state.message(panel).cloned(),
    }
}

fn product_view(product: &Product) -> ProductView {
    ProductView {
        name: product.name.clone(),
        price_line: price_line(&product.price),
        rating_line: rating_line(product.rating, product.review_count),
        marketplace: product.marketplace.clone(),
        image_url: product.cover_image().map(|image| image.url.clone()),
    }
}

fn analysis_view(analysis: &YouTubeAnalysis) -> AnalysisView {
    let plain = |items: &[String]| -> Vec<SectionItem> {
        items
            .iter()
            .map(|text| SectionItem {
                text: text.clone(),
                badge: None,
            })
            .collect()
    };
    let topics = analysis
        .topics
        .iter()
        .map(|topic| SectionItem {
            text: topic.name.clone(),
            badge: Some(sentiment_badge(&topic.sentiment)),
        })
        .collect();

    let sections = [
        (text::SECTION_POSITIVE, plain(&analysis.positive_aspects)),
        (text::SECTION_NEGATIVE, plain(&analysis.negative_aspects)),
        (text::SECTION_TOPICS, topics),
        (text::SECTION_BRANDS, plain(&analysis.brands_mentioned)),
    ]
    .into_iter()
    .filter(|(_, items)| !items.is_empty())
    .map(|(title, items)| AnalysisSection {
        title: title.to_string(),
        items,
    })
    .collect();

    AnalysisView {
        badge: sentiment_badge(&analysis.overall_sentiment),
        score_line: score_line(analysis),
        sections,
    }
}

/// `"{currency} {amount}"`, e.g. `BRL 19.9`.
pub fn price_line(price: &Price) -> String {
    format!("{} {}", price.currency, price.amount)
}

/// `"4.5/5 (10 reviews)"`, or the no-rating text when the rating is absent or zero.
pub fn rating_line(rating: Option<f64>, review_count: u64) -> String {
    match rating {
        Some(rating) if rating != 0.0 => format!("{rating}/5 ({review_count} reviews)"),
        _ => text::NO_RATING.to_string(),
    }
}

/// `"0.10 | Confiança: 60%"`. Exact halves round away from zero.
pub fn score_line(analysis: &YouTubeAnalysis) -> String {
    format!(
        "{:.2} | {}: {:.0}%",
        round_to(analysis.sentiment_score, 2),
        text::CONFIDENCE,
        round_to(analysis.confidence * 100.0, 0)
    )
}

/// Rounds to `decimals` places, halves away from zero.
fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

pub fn sentiment_badge(sentiment: &Sentiment) -> SentimentBadge {
    let tone = match sentiment {
        Sentiment::Positive => Tone::Green,
        Sentiment::Negative => Tone::Red,
        Sentiment::Neutral => Tone::Gray,
        Sentiment::Mixed => Tone::Yellow,
        Sentiment::Unknown(_) => Tone::Gray,
    };
    SentimentBadge {
        label: capitalize(sentiment.as_str()),
        tone,
    }
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_prices_print_without_decimals() {
        let price = Price {
            amount: 20.0,
            currency: "USD".into(),
            original_amount: None,
            discount_percentage: None,
        };
        assert_eq!(price_line(&price), "USD 20");
    }

    #[test]
    fn zero_rating_reads_as_unrated() {
        assert_eq!(rating_line(Some(0.0), 3), text::NO_RATING);
        assert_eq!(rating_line(None, 0), text::NO_RATING);
        assert_eq!(rating_line(Some(4.0), 2), "4/5 (2 reviews)");
    }

    #[test]
    fn score_line_rounds_ties_up() {
        let analysis = YouTubeAnalysis {
            video_id: None,
            overall_sentiment: Sentiment::Neutral,
            sentiment_score: 0.125,
            confidence: 0.625,
            positive_aspects: Vec::new(),
            negative_aspects: Vec::new(),
            topics: Vec::new(),
            brands_mentioned: Vec::new(),
            products_mentioned: Vec::new(),
            from_cache: false,
        };
        assert_eq!(score_line(&analysis), "0.13 | Confiança: 63%");

        let negative = YouTubeAnalysis {
            sentiment_score: -0.5,
            confidence: 0.6,
            ..analysis
        };
        assert_eq!(score_line(&negative), "-0.50 | Confiança: 60%");
    }

    #[test]
    fn badge_mapping_is_total() {
        assert_eq!(
            sentiment_badge(&Sentiment::Positive),
            SentimentBadge {
                label: "Positive".into(),
                tone: Tone::Green
            }
        );
        assert_eq!(sentiment_badge(&Sentiment::Negative).tone, Tone::Red);
        assert_eq!(sentiment_badge(&Sentiment::Neutral).tone, Tone::Gray);
        assert_eq!(sentiment_badge(&Sentiment::Mixed).label, "Mixed");
        let unknown = sentiment_badge(&Sentiment::Unknown("ecstatic".into()));
        assert_eq!(unknown.label, "Ecstatic");
        assert_eq!(unknown.tone, Tone::Gray);
        assert_eq!(sentiment_badge(&Sentiment::Unknown(String::new())).label, "");
    }
}
