mod cli;
mod platform;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();
    let cli = cli::Cli::parse();
    platform::run_app(cli)
}
