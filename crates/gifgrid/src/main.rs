//! Command-line consumer of the gifgrid search stack
//!
//! A thin stand-in for the mobile picker screens: one-shot trending and
//! search listings, plus an interactive session that drives the debounced
//! search orchestrator from stdin.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::AsyncBufReadExt;

use gifgrid_config::{ApplicationConfig, ConfigurationLoader, EnvironmentSource, TomlFileSource};
use gifgrid_giphy::{Gif, GifProvider, GiphyClient, PageRequest};
use gifgrid_search::{SearchSession, SessionOptions, SessionState};

/// Giphy-powered GIF picker demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Optional configuration file path (TOML format)
    #[arg(long, short = 'c')]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List trending gifs
    Trending {
        /// Maximum results to return
        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// Starting position in the result set
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },

    /// Search gifs by free text
    Search {
        /// The search query
        query: String,

        /// Maximum results to return
        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// Starting position in the result set
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },

    /// Interactive session: type to search, /more to paginate, /quit to exit
    Live,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut loader = ConfigurationLoader::new().add_source(Box::new(EnvironmentSource));
    if let Some(path) = &args.config_file {
        loader = loader.add_source(Box::new(TomlFileSource::new(path)));
    }
    let config = loader.load().context("invalid configuration")?;
    tracing::debug!(
        api_key_present = config.giphy.has_api_key(),
        page_size = config.search.page_size,
        "configuration loaded"
    );

    match args.command {
        Command::Trending { limit, offset } => {
            let page = one_shot_client(&config)?
                .trending(&page_request(&config, limit, offset))
                .await?;
            print_gifs(&page.data);
        }
        Command::Search {
            query,
            limit,
            offset,
        } => {
            let page = one_shot_client(&config)?
                .search(&query, &page_request(&config, limit, offset))
                .await?;
            print_gifs(&page.data);
        }
        Command::Live => run_live(&config).await?,
    }

    Ok(())
}

fn one_shot_client(config: &ApplicationConfig) -> anyhow::Result<GiphyClient> {
    anyhow::ensure!(
        config.giphy.has_api_key(),
        "Giphy API key not configured. Set GIFGRID_GIPHY_API_KEY or giphy.api_key"
    );
    Ok(GiphyClient::new(&config.giphy)?)
}

fn page_request(config: &ApplicationConfig, limit: usize, offset: usize) -> PageRequest {
    PageRequest {
        limit,
        offset,
        rating: config.giphy.rating.clone(),
    }
}

fn print_gifs(gifs: &[Gif]) {
    for gif in gifs {
        let url = gif
            .thumbnail()
            .map_or("<no rendition>", |rendition| rendition.url.as_str());
        println!("{}  {}  {}", gif.id, url, gif.title.as_deref().unwrap_or(""));
    }
}

fn print_state(state: &SessionState) {
    if let Some(error) = &state.error {
        println!("! {error}");
        return;
    }
    if state.is_loading {
        println!("... loading");
        return;
    }
    let more = if state.has_more { " (/more)" } else { "" };
    println!("-- {:?}: {} gifs{more}", state.mode, state.gifs.len());
    for gif in state.gifs.iter().rev().take(3).rev() {
        println!("   {}  {}", gif.id, gif.title.as_deref().unwrap_or(""));
    }
    if state.is_loading_more {
        println!("   ... loading more");
    }
}

/// Drive a [`SearchSession`] from stdin, printing each published snapshot
async fn run_live(config: &ApplicationConfig) -> anyhow::Result<()> {
    let client = Arc::new(GiphyClient::new(&config.giphy)?);
    let session = SearchSession::spawn(client, SessionOptions::from_config(config));
    let mut rx = session.subscribe();

    let printer = tokio::spawn(async move {
        loop {
            print_state(&rx.borrow_and_update().clone());
            if rx.changed().await.is_err() {
                break;
            }
        }
    });

    println!("type to search, empty line for trending, /more, /quit");
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/quit" | "/q" => break,
            "/more" => session.load_more(),
            text => session.set_query(text),
        }
    }

    printer.abort();
    Ok(())
}
