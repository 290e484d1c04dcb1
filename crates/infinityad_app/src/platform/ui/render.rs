use infinityad_core::{
    AdPanelView, AnalysisView, AppViewModel, HistoryKind, HistoryRowView, MessageKind, Panel,
    PanelChrome, ProductPanelView, ProductView, YouTubePanelView,
};
use owo_colors::AnsiColors;

use super::constants::*;
use super::widgets::{Button, ButtonSize, ButtonVariant, Card, Input, Palette};

/// Full screen: header, the three panels and the history.
pub fn render(view: &AppViewModel, palette: &Palette) -> String {
    [
        render_header(view, palette),
        render_product_panel(&view.product_panel, palette),
        render_youtube_panel(&view.youtube_panel, palette),
        render_ad_panel(&view.ad_panel, palette),
        render_history(&view.history, palette),
    ]
    .join("\n\n")
}

/// A single panel, used when one subcommand runs without the interactive session.
pub fn render_panel(view: &AppViewModel, panel: Panel, palette: &Palette) -> String {
    match panel {
        Panel::Product => render_product_panel(&view.product_panel, palette),
        Panel::YouTube => render_youtube_panel(&view.youtube_panel, palette),
        Panel::Ad => render_ad_panel(&view.ad_panel, palette),
    }
}

fn render_header(view: &AppViewModel, palette: &Palette) -> String {
    let health = match view.backend_healthy {
        Some(true) => palette.paint(BACKEND_ONLINE, AnsiColors::Green),
        Some(false) => palette.paint(BACKEND_OFFLINE, AnsiColors::Red),
        None => palette.dim(BACKEND_UNKNOWN),
    };
    Card::new()
        .boxed(false)
        .title(APP_TITLE)
        .subtitle(APP_SUBTITLE)
        .line(health)
        .render(palette)
}

fn render_product_panel(panel: &ProductPanelView, palette: &Palette) -> String {
    let mut card = Card::new()
        .title(PRODUCT_TITLE)
        .subtitle(PRODUCT_SUBTITLE)
        .lines(
            Input::new(panel.url.as_str())
                .label(PRODUCT_URL_LABEL)
                .placeholder(PRODUCT_URL_PLACEHOLDER)
                .required(true)
                .disabled(panel.chrome.loading)
                .error(missing_url(&panel.chrome, &panel.url))
                .render(palette),
        )
        .line(checkbox(panel.bypass_cache, BYPASS_CACHE_LABEL))
        .line(format!(
            "{} {}",
            Button::new(SCRAPE_BUTTON)
                .size(ButtonSize::Lg)
                .loading(panel.chrome.loading)
                .render(palette),
            Button::new(CLEAR_CACHE_BUTTON)
                .variant(ButtonVariant::Outline)
                .size(ButtonSize::Sm)
                .disabled(panel.chrome.loading)
                .render(palette),
        ));
    if let Some(product) = &panel.product {
        card = card.lines(product_lines(product, palette));
    }
    with_message(card, &panel.chrome, palette).render(palette)
}

fn product_lines(product: &ProductView, palette: &Palette) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        palette.bold(PRODUCT_INFO_TITLE),
        format!("Nome: {}", product.name),
        format!("Preço: {}", product.price_line),
        format!("Avaliação: {}", product.rating_line),
        format!("Marketplace: {}", product.marketplace),
    ];
    if let Some(url) = &product.image_url {
        lines.push(format!("Imagem: {}", palette.dim(url)));
    }
    lines
}

fn render_youtube_panel(panel: &YouTubePanelView, palette: &Palette) -> String {
    let mut card = Card::new()
        .title(YOUTUBE_TITLE)
        .subtitle(YOUTUBE_SUBTITLE)
        .lines(
            Input::new(panel.url.as_str())
                .label(YOUTUBE_URL_LABEL)
                .placeholder(YOUTUBE_URL_PLACEHOLDER)
                .required(true)
                .disabled(panel.chrome.loading)
                .error(missing_url(&panel.chrome, &panel.url))
                .render(palette),
        )
        .line(checkbox(panel.force_reanalysis, FORCE_REANALYSIS_LABEL))
        .line(
            Button::new(ANALYZE_BUTTON)
                .size(ButtonSize::Lg)
                .loading(panel.chrome.loading)
                .render(palette),
        );
    if let Some(analysis) = &panel.analysis {
        card = card.lines(analysis_lines(analysis, palette));
    }
    with_message(card, &panel.chrome, palette).render(palette)
}

fn analysis_lines(analysis: &AnalysisView, palette: &Palette) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        palette.bold(OVERALL_SENTIMENT_TITLE),
        format!(
            "{}  Score: {}",
            palette.tone(&format!("[{}]", analysis.badge.label), analysis.badge.tone),
            analysis.score_line
        ),
    ];
    for section in &analysis.sections {
        lines.push(String::new());
        lines.push(palette.bold(&section.title));
        for item in &section.items {
            let line = match &item.badge {
                Some(badge) => format!(
                    "  • {} {}",
                    item.text,
                    palette.tone(&format!("({})", badge.label), badge.tone)
                ),
                None => format!("  • {}", item.text),
            };
            lines.push(line);
        }
    }
    lines
}

fn render_ad_panel(panel: &AdPanelView, palette: &Palette) -> String {
    let busy = panel.chrome.loading || panel.polling;
    let mut card = Card::new()
        .title(AD_TITLE)
        .subtitle(AD_SUBTITLE)
        .lines(
            Input::new(panel.product_url.as_str())
                .label(AD_PRODUCT_LABEL)
                .required(true)
                .disabled(busy)
                .render(palette),
        )
        .lines(
            Input::new(panel.youtube_url.as_str())
                .label(AD_YOUTUBE_LABEL)
                .helper(AD_YOUTUBE_HELPER)
                .disabled(busy)
                .render(palette),
        )
        .lines(
            Input::new(panel.style.as_str())
                .label(AD_STYLE_LABEL)
                .disabled(busy)
                .render(palette),
        )
        .line(
            Button::new(AD_BUTTON)
                .disabled(panel.product_url.trim().is_empty())
                .loading(busy)
                .render(palette),
        );

    if let Some(job_id) = &panel.job_id {
        let status = panel.status.as_deref().unwrap_or("-");
        let mut line = format!("Job: {job_id} | Status: {status}");
        if panel.polling {
            line.push_str(&format!(" | Tentativas: {}", panel.attempts));
        }
        card = card.line(String::new()).line(line);
    }
    if let Some(result) = &panel.result_json {
        card = card.lines(result.lines().map(|line| palette.dim(line)));
    }
    with_message(card, &panel.chrome, palette).render(palette)
}

fn render_history(rows: &[HistoryRowView], palette: &Palette) -> String {
    let card = Card::new().boxed(false).title(HISTORY_TITLE);
    if rows.is_empty() {
        return card.line(palette.dim(HISTORY_EMPTY)).render(palette);
    }
    card.lines(rows.iter().map(|row| {
        format!(
            "{} {} | {} {}",
            palette.paint(history_tag(row.kind), AnsiColors::Cyan),
            row.source,
            row.summary,
            palette.dim(&row.recorded_utc)
        )
    }))
    .render(palette)
}

fn history_tag(kind: HistoryKind) -> &'static str {
    match kind {
        HistoryKind::Product => "[produto]",
        HistoryKind::Analysis => "[vídeo]",
        HistoryKind::Ad => "[anúncio]",
    }
}

/// Marks a required field red while its panel shows an error and the field is blank.
fn missing_url(chrome: &PanelChrome, value: &str) -> Option<String> {
    match &chrome.message {
        Some(message) if message.kind == MessageKind::Error && value.trim().is_empty() => {
            Some(message.text.clone())
        }
        _ => None,
    }
}

fn checkbox(checked: bool, label: &str) -> String {
    let mark = if checked { "[x]" } else { "[ ]" };
    format!("{mark} {label}")
}

fn with_message(card: Card, chrome: &PanelChrome, palette: &Palette) -> Card {
    match &chrome.message {
        Some(message) => match message.kind {
            MessageKind::Error => {
                card.footer(palette.paint(&format!("✗ {}", message.text), AnsiColors::Red))
            }
            MessageKind::Success => {
                card.footer(palette.paint(&format!("✓ {}", message.text), AnsiColors::Green))
            }
        },
        None => card,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infinityad_core::{
        update, AppState, Msg, Price, Product, Sentiment, Topic, YouTubeAnalysis,
    };

    fn product() -> Product {
        Product {
            id: None,
            name: "Widget".into(),
            price: Price {
                amount: 19.9,
                currency: "BRL".into(),
                original_amount: None,
                discount_percentage: None,
            },
            rating: Some(4.5),
            review_count: 10,
            marketplace: "shopee".into(),
            images: Vec::new(),
            source_url: None,
            seller_name: None,
        }
    }

    fn analysis() -> YouTubeAnalysis {
        YouTubeAnalysis {
            video_id: Some("abc".into()),
            overall_sentiment: Sentiment::Mixed,
            sentiment_score: 0.1,
            confidence: 0.6,
            positive_aspects: vec!["bateria".into()],
            negative_aspects: Vec::new(),
            topics: vec![Topic {
                name: "preço".into(),
                sentiment: Sentiment::Negative,
            }],
            brands_mentioned: Vec::new(),
            products_mentioned: Vec::new(),
            from_cache: false,
        }
    }

    fn state_with_results() -> AppState {
        let state = AppState::new();
        let (state, _) = update(state, Msg::ProductUrlChanged("https://shopee.com.br/x".into()));
        let (state, _) = update(state, Msg::ScrapeSubmitted);
        let (state, _) = update(
            state,
            Msg::ProductScraped {
                result: Ok(product()),
                completed_utc: "2026-01-01T00:00:00Z".into(),
            },
        );
        let (state, _) = update(state, Msg::YoutubeUrlChanged("https://youtu.be/abc".into()));
        let (state, _) = update(state, Msg::AnalyzeSubmitted);
        let (state, _) = update(
            state,
            Msg::AnalysisCompleted {
                result: Ok(analysis()),
                completed_utc: "2026-01-01T00:00:01Z".into(),
            },
        );
        state
    }

    #[test]
    fn product_panel_shows_formatted_fields() {
        let out = render_panel(
            &state_with_results().view(),
            Panel::Product,
            &Palette::plain(),
        );
        assert!(out.contains("Preço: BRL 19.9"));
        assert!(out.contains("Avaliação: 4.5/5 (10 reviews)"));
        assert!(out.contains("✓ Produto scrapado com sucesso!"));
    }

    #[test]
    fn analysis_panel_omits_empty_sections() {
        let out = render_panel(
            &state_with_results().view(),
            Panel::YouTube,
            &Palette::plain(),
        );
        assert!(out.contains("[Mixed]  Score: 0.10 | Confiança: 60%"));
        assert!(out.contains("✓ Aspectos Positivos"));
        assert!(out.contains("  • preço (Negative)"));
        assert!(!out.contains("✗ Aspectos Negativos"));
        assert!(!out.contains("Marcas Mencionadas"));
    }

    #[test]
    fn full_screen_lists_history_newest_first() {
        let out = render(&state_with_results().view(), &Palette::plain());
        assert!(out.starts_with("InfinityAd AI\nGerador de anúncios (MVP)"));
        let video = out.find("[vídeo] youtu.be").unwrap();
        let product = out.find("[produto] shopee.com.br").unwrap();
        assert!(video < product);
    }

    #[test]
    fn ad_panel_reports_polling_progress() {
        let state = AppState::new();
        let (state, _) = update(state, Msg::AdProductUrlChanged("https://p".into()));
        let (state, _) = update(state, Msg::AdSubmitted);
        let (state, _) = update(
            state,
            Msg::AdCreated {
                result: Ok("J1".into()),
            },
        );
        let out = render_panel(&state.view(), Panel::Ad, &Palette::plain());
        assert!(out.contains("Job: J1 | Status: processing | Tentativas: 0"));
        assert!(out.contains("[  ⟳ Gerar anúncio  ]"));
    }

    #[test]
    fn blank_submission_flags_the_input() {
        let (state, _) = update(AppState::new(), Msg::ScrapeSubmitted);
        let out = render_panel(&state.view(), Panel::Product, &Palette::plain());
        assert_eq!(out.matches("URL do produto é obrigatória").count(), 2);
        assert!(out.contains("✗ URL do produto é obrigatória"));
    }

    #[test]
    fn empty_history_has_placeholder() {
        let out = render(&AppState::new().view(), &Palette::plain());
        assert!(out.contains(HISTORY_EMPTY));
        assert!(out.contains(BACKEND_UNKNOWN));
    }
}
