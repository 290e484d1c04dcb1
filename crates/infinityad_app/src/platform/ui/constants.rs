pub const APP_TITLE: &str = "InfinityAd AI";
pub const APP_SUBTITLE: &str = "Gerador de anúncios (MVP)";

pub const BACKEND_ONLINE: &str = "● backend online";
pub const BACKEND_OFFLINE: &str = "● backend offline";
pub const BACKEND_UNKNOWN: &str = "○ verificando backend";

pub const PRODUCT_TITLE: &str = "Scrapear Produto";
pub const PRODUCT_SUBTITLE: &str = "Insira a URL do produto para extrair informações";
pub const PRODUCT_URL_LABEL: &str = "URL do Produto";
pub const PRODUCT_URL_PLACEHOLDER: &str = "https://shopee.com.br/product/...";
pub const BYPASS_CACHE_LABEL: &str = "Ignorar cache";
pub const SCRAPE_BUTTON: &str = "Scrapear Produto";
pub const CLEAR_CACHE_BUTTON: &str = "Limpar cache";
pub const PRODUCT_INFO_TITLE: &str = "Informações do Produto";

pub const YOUTUBE_TITLE: &str = "Analisar Vídeo YouTube";
pub const YOUTUBE_SUBTITLE: &str = "Extraia insights com NLP avançado";
pub const YOUTUBE_URL_LABEL: &str = "URL do Vídeo";
pub const YOUTUBE_URL_PLACEHOLDER: &str = "https://youtube.com/watch?v=...";
pub const FORCE_REANALYSIS_LABEL: &str = "Forçar nova análise";
pub const ANALYZE_BUTTON: &str = "Analisar Vídeo";
pub const OVERALL_SENTIMENT_TITLE: &str = "Sentimento Geral";

pub const AD_TITLE: &str = "Gerar Anúncio";
pub const AD_SUBTITLE: &str = "Combine produto e vídeo em um roteiro";
pub const AD_PRODUCT_LABEL: &str = "Product URL";
pub const AD_YOUTUBE_LABEL: &str = "YouTube URL (optional)";
pub const AD_YOUTUBE_HELPER: &str = "Opcional: comentários do vídeo enriquecem o roteiro";
pub const AD_STYLE_LABEL: &str = "Estilo";
pub const AD_BUTTON: &str = "Gerar anúncio";

pub const HISTORY_TITLE: &str = "Histórico";
pub const HISTORY_EMPTY: &str = "Nenhuma análise ainda";

/// Width of boxed cards, in columns.
pub const CARD_WIDTH: usize = 72;
