use clap::Parser;

use promptdeck::config::Config;
use promptdeck::daemon;
use promptdeck::error::Result;
use promptdeck::logging::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "promptdeckd", about = "PromptDeck proxy daemon")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 7878)]
    port: u16,

    /// Path to a config file (defaults to convention paths)
    #[arg(long)]
    config: Option<String>,

    /// Shared token clients must present
    #[arg(long, env = "PROMPTDECK_TOKEN", default_value = "")]
    token: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing("promptdeckd");

    let config = Config::load(args.config.as_deref())?;

    daemon::run(&args.host, args.port, config, &args.token).await
}
