//! Subcommands that print a backend response as-is instead of driving the panels.

use anyhow::Context;
use infinityad_api::{ApiSettings, BackendApi, ReqwestBackend};
use infinityad_logging::infinityad_info;

pub enum DirectCall {
    Batch { urls: Vec<String>, bypass_cache: bool },
    Analysis { video_id: String },
    Health,
}

pub fn run(settings: &ApiSettings, call: DirectCall) -> anyhow::Result<()> {
    let backend = ReqwestBackend::new(settings)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let value = runtime.block_on(execute(&backend, call))?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

async fn execute(api: &dyn BackendApi, call: DirectCall) -> anyhow::Result<serde_json::Value> {
    let value = match call {
        DirectCall::Batch { urls, bypass_cache } => {
            infinityad_info!("batch scrape of {} urls", urls.len());
            api.batch_scrape(&urls, bypass_cache)
                .await
                .context("batch scrape failed")?
        }
        DirectCall::Analysis { video_id } => api
            .get_youtube_analysis(&video_id)
            .await
            .with_context(|| format!("no analysis for video {video_id}"))?,
        DirectCall::Health => {
            let report = api.health_check().await.context("backend unreachable")?;
            serde_json::json!({ "status": report.status })
        }
    };
    Ok(value)
}
