mod catalog;
mod cli;
mod config;
mod dataset;
mod query;
mod render;
mod session;

pub const USER_AGENT: &str = concat!("wayfind/", env!("CARGO_PKG_VERSION"));

use clap::Parser;
use cli::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wayfind=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = cli::run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
    Ok(())
}
