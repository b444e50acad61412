pub mod backend;
pub mod categories;
pub mod config;
pub mod debounce;
pub mod orchestrator;
pub mod reveal;
pub mod scroll;
pub mod status;

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use backend::IndexerBackend;
use backend::remote::{RemoteBackend, RemoteConfig};
use categories::CATEGORIES;
use config::ClientConfig;
use orchestrator::SearchOrchestrator;
use status::{IndexStatus, StatusPoller};

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "deskseek",
    version,
    about = "Search a local content index from the command line"
)]
pub struct Cli {
    /// Path to the indexing service socket (defaults to the per-user path)
    #[arg(long)]
    pub socket: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search directories, files, and content concurrently
    Search {
        query: String,

        /// Page size per category
        #[arg(long)]
        limit: Option<usize>,

        /// Emit results as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show indexing status
    Status {
        /// Keep polling and print every change
        #[arg(long, default_value_t = false)]
        watch: bool,

        /// Emit status as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Manage indexed directory roots
    Paths {
        #[command(subcommand)]
        action: PathsAction,
    },
    /// Reveal a path in the OS file manager
    Reveal { path: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum PathsAction {
    /// List indexed roots
    List,
    /// Add a root to the index
    Add {
        path: PathBuf,

        /// Mutate even while the backend is busy indexing
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Remove a root from the index
    Del {
        path: PathBuf,

        /// Mutate even while the backend is busy indexing
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

/// Entry point for the binary. Expects to run inside a `LocalSet` on a
/// current-thread runtime.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut remote_cfg = RemoteConfig::from_env();
    if let Some(socket) = cli.socket {
        remote_cfg.socket_path = socket;
    }
    let backend = Rc::new(RemoteBackend::new(remote_cfg));
    let client_cfg = ClientConfig::from_env();

    match cli.command {
        Commands::Search { query, limit, json } => {
            let limit = limit.unwrap_or(client_cfg.page_limit);
            run_search(backend, &query, limit, json).await
        }
        Commands::Status { watch, json } => run_status(backend, &client_cfg, watch, json).await,
        Commands::Paths { action } => run_paths(backend, action).await,
        Commands::Reveal { path } => {
            if let Err(e) = reveal::reveal_in_file_manager(&path) {
                eprintln!(
                    "{} could not open file manager for {}: {}",
                    "warning:".yellow().bold(),
                    path.display(),
                    e
                );
            }
            Ok(())
        }
    }
}

async fn run_search(
    backend: Rc<RemoteBackend>,
    query: &str,
    limit: usize,
    json: bool,
) -> Result<()> {
    let search = SearchOrchestrator::new(backend, limit);
    search.submit(query);
    search.wait_idle().await;

    if json {
        let mut results = serde_json::Map::new();
        for descriptor in CATEGORIES {
            let state = search.state(descriptor.kind);
            results.insert(
                descriptor.kind.to_string(),
                serde_json::to_value(&state.results)?,
            );
        }
        let doc = serde_json::json!({ "query": search.query(), "results": results });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    for descriptor in CATEGORIES {
        let state = search.state(descriptor.kind);
        println!("{} ({})", descriptor.title.bold(), state.results.len());
        for item in &state.results {
            match &item.detail {
                Some(detail) => println!(
                    "  {}  {}\n      {}",
                    item.name,
                    item.path.dimmed(),
                    detail
                ),
                None => println!("  {}  {}", item.name, item.path.dimmed()),
            }
        }
        println!();
    }
    Ok(())
}

fn print_status(status: &IndexStatus, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(status)?);
        return Ok(());
    }
    let state = if status.busy {
        "indexing".yellow().bold()
    } else {
        "idle".green().bold()
    };
    println!(
        "{}  pending {} | running {} | failed {}",
        state, status.pending, status.running, status.failed
    );
    for task in &status.running_tasks {
        println!("  running: {}", task);
    }
    println!(
        "index: {} directories, {} files, {} items",
        status.directories, status.files, status.items
    );
    Ok(())
}

async fn run_status(
    backend: Rc<RemoteBackend>,
    cfg: &ClientConfig,
    watch: bool,
    json: bool,
) -> Result<()> {
    if !watch {
        let snap = backend.get_status().await.context("status query failed")?;
        return print_status(&IndexStatus::from(snap), json);
    }

    let poller = StatusPoller::spawn(backend, cfg.poll_interval);
    let mut rx = poller.subscribe();
    while rx.changed().await.is_ok() {
        let status = rx.borrow().clone();
        print_status(&status, json)?;
    }
    Ok(())
}

async fn run_paths(backend: Rc<RemoteBackend>, action: PathsAction) -> Result<()> {
    match action {
        PathsAction::List => {
            let paths = backend
                .get_index_dir_paths()
                .await
                .context("could not list index paths")?;
            if paths.is_empty() {
                println!("no indexed roots");
            }
            for path in paths {
                println!("{}", path);
            }
            Ok(())
        }
        PathsAction::Add { path, force } => {
            if !force && indexing_busy(backend.as_ref()).await? {
                eprintln!(
                    "{} backend is busy indexing; retry when idle or pass --force",
                    "refusing:".yellow().bold()
                );
                return Ok(());
            }
            let path = path.to_string_lossy();
            backend
                .add_index_path(&path)
                .await
                .with_context(|| format!("could not add index path {}", path))?;
            println!("added {}", path);
            Ok(())
        }
        PathsAction::Del { path, force } => {
            if !force && indexing_busy(backend.as_ref()).await? {
                eprintln!(
                    "{} backend is busy indexing; retry when idle or pass --force",
                    "refusing:".yellow().bold()
                );
                return Ok(());
            }
            let path = path.to_string_lossy();
            backend
                .del_index_path(&path)
                .await
                .with_context(|| format!("could not remove index path {}", path))?;
            println!("removed {}", path);
            Ok(())
        }
    }
}

/// One-shot busy probe used to gate configuration mutation.
async fn indexing_busy<B: IndexerBackend>(backend: &B) -> Result<bool> {
    let snap = backend.get_status().await.context("status query failed")?;
    Ok(IndexStatus::from(snap).busy)
}
