mod shell;

use std::error::Error;
use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::{self, Overrides, Settings};
use crate::dataset::{self, Source};
use crate::query::EmptyQueryPolicy;
use crate::render::{self, Format};
use crate::session::Session;

#[derive(Parser, Debug)]
#[command(
    name = "wayfind",
    version,
    about = "Search a travel-destination dataset of cities, temples, and beaches"
)]
pub struct Cli {
    /// Dataset location: an http(s) URL, a file:// URL, or a local path
    /// [env: WAYFIND_SOURCE] [default: travel_recommendation_api.json]
    #[arg(long, global = true)]
    pub source: Option<String>,

    /// Config file (default: wayfind.toml in the current or a parent directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// What an empty query shows
    #[arg(long, value_enum, global = true)]
    pub empty_query: Option<EmptyQueryPolicy>,

    /// Treat beach/temple/country keywords as plain text
    #[arg(long, global = true)]
    pub no_aliases: bool,

    /// Output format
    #[arg(long, value_enum, global = true, default_value_t = Format::Text)]
    pub format: Format,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search by name, description, or country; `beach`, `temple`, and
    /// `country` list a whole category.
    Search {
        /// Query words, joined with spaces
        query: Vec<String>,
    },
    /// Show the reset view (every destination, or a prompt under show-none).
    List,
    /// Interactive session: each line is a search, `:reset` resets, `:quit` exits.
    Shell,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            source: self.source.clone(),
            empty_query: self.empty_query,
            no_aliases: self.no_aliases,
        }
    }
}

pub async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let file = config::load_file_config(cli.config.as_deref())?;
    let settings = Settings::resolve(file.as_ref(), config::env_source(), &cli.overrides())?;

    let source = Source::resolve(&settings.source, dataset::http_client()?)?;
    info!(source = %source, "loading dataset");

    let mut session = Session::new(settings.engine);
    let mut renderer = render::renderer(cli.format, io::stdout());

    match cli.command {
        Command::Search { query } => {
            session.load(&source).await?;
            let view = session.search(&query.join(" "))?;
            renderer.render(&view)?;
        }
        Command::List => {
            session.load(&source).await?;
            let view = session.reset()?;
            renderer.render(&view)?;
        }
        Command::Shell => {
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            let mut console = io::stderr();
            shell::run(&mut session, &source, input, &mut *renderer, &mut console).await?;
        }
    }
    Ok(())
}
