//! User-facing strings (pt-BR).

pub const PRODUCT_URL_REQUIRED: &str = "URL do produto é obrigatória";
pub const PRODUCT_SCRAPED: &str = "Produto scrapado com sucesso!";
pub const PRODUCT_SCRAPE_FAILED: &str = "Erro ao scrapear produto";
pub const CACHE_CLEARED: &str = "Cache limpo";
pub const CACHE_CLEAR_FAILED: &str = "Erro ao limpar cache";

pub const YOUTUBE_URL_REQUIRED: &str = "URL do YouTube é obrigatória";
pub const VIDEO_ANALYZED: &str = "Vídeo analisado com sucesso!";
pub const VIDEO_ANALYZE_FAILED: &str = "Erro ao analisar vídeo";

pub const REQUEST_IN_PROGRESS: &str = "Aguarde a requisição em andamento";

pub const AD_CREATE_FAILED: &str = "Erro ao criar anúncio";
pub const AD_ALREADY_RUNNING: &str = "Já existe um anúncio em processamento";
pub const AD_POLL_EXHAUSTED: &str = "Tempo esgotado aguardando o anúncio";

pub const NO_RATING: &str = "Sem avaliações";
pub const CONFIDENCE: &str = "Confiança";

pub const SECTION_POSITIVE: &str = "✓ Aspectos Positivos";
pub const SECTION_NEGATIVE: &str = "✗ Aspectos Negativos";
pub const SECTION_TOPICS: &str = "Tópicos Identificados";
pub const SECTION_BRANDS: &str = "Marcas Mencionadas";

pub const DEFAULT_AD_STYLE: &str = "charismatic_fomo";
pub const DEFAULT_CACHE_MARKETPLACE: &str = "all";
