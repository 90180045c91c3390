use clap::Parser;

use promptdeck::config::Config;
use promptdeck::error::{PromptDeckError, Result};
use promptdeck::logging::init_tracing;
use promptdeck::ui::{launch_ui, UiLaunchConfig};

#[derive(Parser, Debug)]
#[command(name = "promptdeck", about = "PromptDeck desktop dashboard")]
struct Args {
    /// Base URL of the promptdeckd daemon
    #[arg(long, default_value = "http://127.0.0.1:7878")]
    daemon: String,

    /// Shared token presented to the daemon
    #[arg(long, env = "PROMPTDECK_TOKEN", default_value = "")]
    token: String,

    /// Path to a config file (defaults to convention paths)
    #[arg(long)]
    config: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing("promptdeck");

    let config = Config::load(args.config.as_deref())?;

    launch_ui(UiLaunchConfig {
        daemon_url: args.daemon,
        token: args.token,
        config,
    })
    .map_err(|e| PromptDeckError::Runtime(e.to_string()))
}
