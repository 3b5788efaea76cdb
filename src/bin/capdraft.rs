use std::{
    io::Write as _,
    path::{Path, PathBuf},
    process::ExitCode,
    time::Duration,
};

use anyhow::Context as _;
use clap::{ArgGroup, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Archives can be large; uploads get more time than single downloads.
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Parser, Debug)]
#[command(name = "capdraft", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build one draft per request file and print one locator per line.
    Build(BuildArgs),
}

#[derive(Parser, Debug)]
#[command(group(
    ArgGroup::new("destination")
        .required(true)
        .args(["out_dir", "upload_url"])
))]
struct BuildArgs {
    /// Request JSON; repeat for a batch.
    #[arg(long = "request", required = true, num_args = 1..)]
    requests: Vec<PathBuf>,

    /// Engine config JSON (absent keys keep defaults).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Template directory with `draft_content.json` and `draft_meta_info.json`.
    #[arg(long)]
    template: Option<PathBuf>,

    /// Copy finished archives into this directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Upload finished archives with `PUT <url>/<archive name>`.
    #[arg(long)]
    upload_url: Option<String>,

    /// Override the number of download workers.
    #[arg(long)]
    workers: Option<usize>,

    /// Override the directory holding per-job working directories.
    #[arg(long)]
    temp_root: Option<PathBuf>,

    /// Accept local paths and `file://` URLs in requests.
    #[arg(long)]
    allow_local_files: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Build(args) => cmd_build(args),
    }
}

fn load_config(args: &BuildArgs) -> anyhow::Result<capdraft::BuildConfig> {
    let mut cfg = match &args.config {
        Some(path) => capdraft::BuildConfig::from_path(path)?,
        None => capdraft::BuildConfig::default(),
    };
    if let Some(workers) = args.workers {
        cfg.fetch.workers = workers;
    }
    if let Some(temp_root) = &args.temp_root {
        cfg.temp_root = temp_root.clone();
    }
    if args.allow_local_files {
        cfg.allow_local_files = true;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn make_sink(args: &BuildArgs) -> anyhow::Result<Box<dyn capdraft::UploadSink>> {
    if let Some(dir) = &args.out_dir {
        return Ok(Box::new(capdraft::DirectorySink::new(dir)));
    }
    let url = args
        .upload_url
        .as_deref()
        .context("either --out-dir or --upload-url is required")?;
    let sink = capdraft::HttpPutSink::new(url, UPLOAD_TIMEOUT)?;
    Ok(Box::new(sink))
}

fn read_request(path: &Path) -> Option<capdraft::DraftRequest> {
    match capdraft::DraftRequest::from_path(path) {
        Ok(req) => Some(req),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "invalid request");
            None
        }
    }
}

fn cmd_build(args: BuildArgs) -> anyhow::Result<ExitCode> {
    let cfg = load_config(&args)?;
    let template = match &args.template {
        Some(dir) => capdraft::DraftTemplate::load(dir)?,
        None => capdraft::DraftTemplate::builtin()?,
    };
    let sink = make_sink(&args)?;
    let engine = capdraft::DraftEngine::new(cfg, template, sink)?;

    let mut stdout = std::io::stdout().lock();
    let mut failed = 0usize;
    for path in &args.requests {
        let outcome = match read_request(path) {
            Some(req) => engine.run(&req),
            None => capdraft::JobOutcome::Failed,
        };
        if !outcome.is_uploaded() {
            failed += 1;
        }
        writeln!(stdout, "{}", outcome.locator().unwrap_or_default())?;
    }
    stdout.flush()?;

    if failed > 0 {
        tracing::warn!(failed, total = args.requests.len(), "some drafts failed");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
