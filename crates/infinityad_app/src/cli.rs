use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use infinityad_api::{ApiSettings, DEFAULT_BASE_URL};
use infinityad_core::text::{DEFAULT_AD_STYLE, DEFAULT_CACHE_MARKETPLACE};
use infinityad_core::CoreSettings;

#[derive(Debug, Parser)]
#[command(
    name = "infinityad",
    version,
    about = "Terminal client for the InfinityAd product scraper, video analyzer and ad generator"
)]
pub struct Cli {
    /// Backend base URL.
    #[arg(long, global = true, env = "INFINITYAD_BACKEND_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Bearer token sent with every request.
    #[arg(long, global = true, env = "INFINITYAD_AUTH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout: u64,

    /// Connect timeout in seconds.
    #[arg(long, global = true, default_value_t = 10)]
    pub connect_timeout: u64,

    /// Seconds between ad status polls.
    #[arg(long, global = true, default_value_t = 3)]
    pub poll_interval: u64,

    /// Status polls before giving up on an ad job (0 = never give up).
    #[arg(long, global = true, default_value_t = 200)]
    pub max_polls: u32,

    /// Seconds before error/success messages disappear.
    #[arg(long, global = true, default_value_t = 5)]
    pub message_ttl: u64,

    /// Disable ANSI colors.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// off, error, warn, info, debug or trace.
    #[arg(long, global = true, env = "INFINITYAD_LOG", default_value = "warn")]
    pub log_level: String,

    /// Write logs to this file instead of the terminal.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Interactive session (the default).
    Interactive,
    /// Scrape one product page.
    Scrape {
        url: String,
        #[arg(long)]
        bypass_cache: bool,
    },
    /// Scrape several product pages and print the raw response.
    Batch {
        #[arg(required = true)]
        urls: Vec<String>,
        #[arg(long)]
        bypass_cache: bool,
    },
    /// Analyze a YouTube video.
    Analyze {
        url: String,
        #[arg(long)]
        force: bool,
    },
    /// Print a stored analysis by video id.
    Analysis { video_id: String },
    /// Generate an ad and wait for the job to finish.
    Ad {
        product_url: String,
        youtube_url: Option<String>,
        #[arg(long, default_value = DEFAULT_AD_STYLE)]
        style: String,
    },
    /// Drop cached scrapes for a marketplace.
    ClearCache {
        #[arg(default_value = DEFAULT_CACHE_MARKETPLACE)]
        marketplace: String,
    },
    /// Check that the backend answers.
    Health,
}

impl Cli {
    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.api_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout),
            request_timeout: Duration::from_secs(self.timeout),
            auth_token: self.token.clone().filter(|token| !token.trim().is_empty()),
        }
    }

    pub fn core_settings(&self) -> CoreSettings {
        CoreSettings {
            message_ttl: Duration::from_secs(self.message_ttl),
            poll_interval: Duration::from_secs(self.poll_interval.max(1)),
            max_poll_attempts: self.max_polls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_backend_contract() {
        let cli = Cli::try_parse_from(["infinityad", "--api-url", DEFAULT_BASE_URL]).unwrap();
        assert_eq!(cli.command, None);

        let api = cli.api_settings();
        assert_eq!(api.base_url, "http://localhost:8000/api/v1");
        assert_eq!(api.request_timeout, Duration::from_secs(30));

        let core = cli.core_settings();
        assert_eq!(core.poll_interval, Duration::from_secs(3));
        assert_eq!(core.message_ttl, Duration::from_secs(5));
        assert_eq!(core.max_poll_attempts, 200);
    }

    #[test]
    fn ad_subcommand_takes_optional_video_and_style() {
        let cli = Cli::try_parse_from([
            "infinityad",
            "ad",
            "https://shopee.com.br/x",
            "--style",
            "funny",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Ad {
                product_url: "https://shopee.com.br/x".into(),
                youtube_url: None,
                style: "funny".into(),
            })
        );
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "infinityad",
            "scrape",
            "https://shopee.com.br/x",
            "--bypass-cache",
            "--token",
            "  ",
            "--poll-interval",
            "0",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Scrape {
                url: "https://shopee.com.br/x".into(),
                bypass_cache: true,
            })
        );
        assert_eq!(cli.api_settings().auth_token, None);
        assert_eq!(cli.core_settings().poll_interval, Duration::from_secs(1));
    }

    #[test]
    fn batch_requires_urls() {
        assert!(Cli::try_parse_from(["infinityad", "batch"]).is_err());
    }
}
