use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use serde_json::Value;
use vocal_traits::{analyze_voice, AnalysisConfig, AnalysisOutcome};

#[derive(Parser, Debug)]
#[command(
    name = "vocal-traits",
    version,
    about = "Score confidence, energy, calmness, warmth, pace, expressiveness and charm from speech recordings"
)]
struct Cli {
    /// JSON analysis configuration (missing fields use defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze audio files and print one JSON record per file
    Analyze {
        /// Audio files to analyze
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Parallel workers (default: CPU-1)
        #[arg(long)]
        jobs: Option<usize>,
        /// Pretty-print each record
        #[arg(long)]
        pretty: bool,
    },
    /// Serve the upload endpoint over HTTP
    Serve {
        /// Bind address (default: 0.0.0.0:$PORT, or port 5000)
        #[arg(long)]
        addr: Option<SocketAddr>,
        /// Directory for in-flight uploads
        #[arg(long, default_value = "uploads")]
        upload_dir: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli
        .config
        .map(AnalysisConfig::load_from_file)
        .unwrap_or_default();

    match cli.command {
        Commands::Analyze {
            files,
            jobs,
            pretty,
        } => run_analyze(&files, jobs, pretty, &config),
        Commands::Serve { addr, upload_dir } => run_serve(addr, upload_dir, config),
    }
}

fn default_jobs() -> usize {
    let n = std::thread::available_parallelism()
        .map(|v| v.get())
        .unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}

fn run_analyze(
    files: &[PathBuf],
    jobs: Option<usize>,
    pretty: bool,
    config: &AnalysisConfig,
) -> Result<ExitCode> {
    let jobs = jobs.map(|j| j.max(1)).unwrap_or_else(default_jobs);
    log::info!("Analyzing {} files with {} workers", files.len(), jobs);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("building rayon thread pool")?;

    let outcomes: Vec<AnalysisOutcome> =
        pool.install(|| files.par_iter().map(|path| analyze_voice(path, config)).collect());

    let mut failures = 0usize;
    for (path, outcome) in files.iter().zip(&outcomes) {
        if !outcome.is_success() {
            failures += 1;
        }

        let mut record = serde_json::to_value(outcome).context("serializing outcome")?;
        if let Value::Object(map) = &mut record {
            map.insert("file".to_string(), Value::String(path.display().to_string()));
        }

        let line = if pretty {
            serde_json::to_string_pretty(&record)?
        } else {
            serde_json::to_string(&record)?
        };
        println!("{line}");
    }

    if failures > 0 {
        log::warn!("{} of {} files failed", failures, files.len());
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

#[cfg(feature = "server")]
fn run_serve(
    addr: Option<SocketAddr>,
    upload_dir: PathBuf,
    config: AnalysisConfig,
) -> Result<ExitCode> {
    use vocal_traits::server::{resolve_bind_addr, run_server, ServerState};
    use vocal_traits::upload::UploadStore;

    let addr = resolve_bind_addr(addr)?;
    let uploads = UploadStore::new(&upload_dir)
        .with_context(|| format!("creating upload directory {}", upload_dir.display()))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    runtime.block_on(run_server(ServerState::new(uploads, config), addr))?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(not(feature = "server"))]
fn run_serve(
    _addr: Option<SocketAddr>,
    _upload_dir: PathBuf,
    _config: AnalysisConfig,
) -> Result<ExitCode> {
    anyhow::bail!("this build has no HTTP server; rebuild with `--features server`")
}
