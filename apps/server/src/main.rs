use anyhow::Context;
use clap::Parser;
use roster_domain::config::ApiConfig;
use roster_kernel::config::load_config;
use roster_logger::{Logger, parse_level};
use roster_server::Server;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about = "Capacity-limited registration server")]
struct Args {
    /// Configuration file, extension optional
    #[arg(short, long, default_value = "server")]
    config: PathBuf,
}

#[roster_runtime::main(server)]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let cfg: ApiConfig =
        load_config(Some(&args.config)).context("Critical: Configuration is malformed")?;

    let logging = &cfg.logging;
    let level = parse_level(&logging.level).context("Critical: Logging level is invalid")?;
    let builder = Logger::builder().name(env!("CARGO_PKG_NAME")).level(level);
    let _log = match &logging.directory {
        Some(directory) => builder.path(directory).json(logging.json).init()?,
        None => builder.init()?,
    };

    Server::builder().config(cfg).build().await?.run().await
}
