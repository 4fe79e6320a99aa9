// clearance-sigil - main.rs
// Bootstrap: logging, configuration, then the requested subcommand

use clap::Parser;

use clearance_sigil::cli::{dispatch, Cli};
use clearance_sigil::config::load_unchecked;
use clearance_sigil::log_sink::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = load_unchecked(cli.config.as_deref())
        .map(|cfg| cfg.log_level)
        .unwrap_or_else(|_| "info".to_string());
    init_tracing(&level);

    if let Err(e) = dispatch(cli).await {
        tracing::error!(error = %e, fatal = e.is_fatal(), "command failed");
        return Err(e.into());
    }

    Ok(())
}
