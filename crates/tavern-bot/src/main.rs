use clap::Parser;
use std::path::PathBuf;
use tavern_bot::config::BotConfig;
use tavern_bot::sandbox;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tavern",
    about = "Self-service group management for a shared chat workspace",
    version
)]
struct Cli {
    /// Config file (YAML)
    #[arg(long, env = "TAVERN_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `tavern_core=debug`
    #[arg(long, env = "TAVERN_LOG", default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log)?)
        .init();

    let config = BotConfig::load(cli.config.as_deref())?;
    sandbox::run(config).await
}
