use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use eir::reload::{load_index, Reloader};
use eir::server::{self, AppState};
use eir::ScoredPart;
use eir_core::config::{Config, SourceKind};
use eir_core::{FacetFilter, FacetKind, IndexHandle, SearchIndex};
use eir_feeds::{CatalogWatcher, ConfiguredSource};

#[derive(Parser)]
#[command(name = "eir", about = "Eir: spare-parts catalog search")]
struct Cli {
    /// Extra config file layered over ~/.config/eir/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Where to read the catalog from (file, http, stdin).
    #[arg(long, global = true)]
    source: Option<SourceKind>,
    /// Catalog JSON file. Implies `--source file` unless one is given.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// Catalog endpoint. Implies `--source http` unless one is given.
    #[arg(long, global = true)]
    url: Option<String>,
    /// Log at debug level (RUST_LOG still wins when set).
    #[arg(long, global = true)]
    debug: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fuzzy search the catalog. No query lists everything.
    Search {
        query: Option<String>,
        #[arg(long)]
        provider: Option<String>,
        #[arg(long)]
        machine: Option<String>,
        #[arg(long)]
        service: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
        /// Print hits as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List facet values, or suggest the ones containing `--term`.
    Facets {
        #[arg(long)]
        kind: Option<FacetKind>,
        #[arg(long)]
        term: Option<String>,
    },
    /// Ingest the catalog and print what was skipped or repaired.
    Check,
    /// Serve the HTTP query API.
    Serve {
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let mut config = Config::load_from(cli.config.as_deref()).context("loading configuration")?;
    apply_source_flags(&mut config, &cli);

    let source = ConfiguredSource::from_config(&config.catalog)?;

    match cli.command {
        Command::Search { query, provider, machine, service, limit, json } => {
            let (index, _) = load_index(&source, &config.search).await?;
            let filter = FacetFilter { provider, machine, service };
            print_search(&index, query.as_deref().unwrap_or(""), &filter, limit, json)
        }
        Command::Facets { kind, term } => {
            let (index, _) = load_index(&source, &config.search).await?;
            print_facets(&index, kind, term.as_deref().unwrap_or(""));
            Ok(())
        }
        Command::Check => {
            let (index, report) = load_index(&source, &config.search).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            for kind in FacetKind::ALL {
                println!("{kind}: {} distinct", index.facets().len(kind));
            }
            Ok(())
        }
        Command::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let watch_path = source.watch_path().map(PathBuf::from);

            let reloader = Arc::new(Reloader::new(
                source,
                Arc::new(IndexHandle::new()),
                config.search.clone(),
            ));
            // Start serving even when the first load fails; POST /api/reload retries.
            if reloader.reload().await.is_err() {
                tracing::warn!("initial catalog load failed; serving an empty index");
            }

            if let (true, Some(path)) = (config.catalog.watch, watch_path) {
                let debounce = Duration::from_millis(config.catalog.debounce_ms);
                let watcher = CatalogWatcher::new(&path, debounce)?;
                tokio::spawn(Arc::clone(&reloader).watch(watcher));
            }

            server::serve(AppState::new(reloader), &bind).await
        }
    }
}

fn apply_source_flags(config: &mut Config, cli: &Cli) {
    let catalog = &mut config.catalog;
    if let Some(path) = &cli.catalog {
        catalog.path = path.clone();
    }
    if let Some(url) = &cli.url {
        catalog.url = url.clone();
    }
    catalog.source = match (cli.source, &cli.catalog, &cli.url) {
        (Some(kind), _, _) => kind,
        (None, Some(_), _) => SourceKind::File,
        (None, None, Some(_)) => SourceKind::Http,
        (None, None, None) => catalog.source,
    };
}

fn print_search(
    index: &SearchIndex,
    query: &str,
    filter: &FacetFilter,
    limit: usize,
    json: bool,
) -> anyhow::Result<()> {
    let hits: Vec<ScoredPart> = index
        .search_filtered(query, filter)
        .into_iter()
        .take(limit)
        .map(ScoredPart::from)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }
    if hits.is_empty() {
        println!("no matches");
        return Ok(());
    }
    for hit in &hits {
        let part = &hit.part;
        println!(
            "{:.3}  {:<10} {}  [{} / {}]  {}",
            hit.score,
            part.id,
            part.name,
            part.provider,
            part.machine,
            part.services.join(", ")
        );
    }
    Ok(())
}

fn print_facets(index: &SearchIndex, kind: Option<FacetKind>, term: &str) {
    let kinds: Vec<FacetKind> = match kind {
        Some(kind) => vec![kind],
        None => FacetKind::ALL.to_vec(),
    };
    for kind in kinds {
        println!("{kind}:");
        for value in index.facets().suggest(kind, term) {
            println!("  {value}");
        }
    }
}
