//! reel-post - Republish manifest videos as reels

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use libreelcast::logging::{LogFormat, LoggingConfig};
use libreelcast::media::{FfmpegThumbnailer, HttpMediaSource};
use libreelcast::platforms::http::HttpPlatform;
use libreelcast::platforms::Platform;
use libreelcast::service::{UploadOptions, UploadService};
use libreelcast::{
    restore_or_authenticate, Config, Credentials, DeviceIdentity, HistoryLedger, Manifest,
    ReelcastError, SessionOrigin, SessionStore,
};

#[derive(Parser, Debug)]
#[command(name = "reel-post")]
#[command(version, about = "Upload the videos listed in a manifest, once each")]
#[command(long_about = r#"Upload the videos listed in a manifest, once each.

Every manifest entry with media is downloaded, given a cover frame, published
with its caption and recorded in the history file. Entries already in the
history are skipped, so the command is safe to re-run. At most --cap videos
are published per run.

Credentials are read from the environment:
    REELCAST_USERNAME     account name (required)
    REELCAST_PASSWORD     account password (required)
    REELCAST_DEVICE_SEED  seed for the device identity (default: username)

EXAMPLES:
    # Process the configured manifest
    reel-post

    # Use another manifest and publish at most 3 videos
    reel-post --manifest ./scraped.json --cap 3

    # Skip cover extraction (no ffmpeg available)
    reel-post --no-thumbnail

    # Machine-readable logs
    reel-post --log-format json 2> run.log

EXIT CODES:
    0 - Run completed (including runs that uploaded nothing)
    1 - Error (history unwritable, invalid config, etc.)
    2 - Authentication failed
    3 - Startup error (manifest missing, credentials missing)
"#)]
struct Cli {
    /// Configuration file (default: ~/.config/reelcast/config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Manifest of posts to upload
    #[arg(short, long, value_name = "FILE")]
    manifest: Option<PathBuf>,

    /// History file recording uploaded posts
    #[arg(long, value_name = "FILE")]
    history: Option<PathBuf>,

    /// Session file
    #[arg(long, value_name = "FILE")]
    session: Option<PathBuf>,

    /// Directory for temporary video and cover files
    #[arg(long, value_name = "DIR")]
    scratch_dir: Option<PathBuf>,

    /// Maximum number of uploads in this run
    #[arg(long, value_name = "N")]
    cap: Option<usize>,

    /// Publish without a cover image
    #[arg(long)]
    no_thumbnail: bool,

    /// Platform API base URL (overrides platform.base_url)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Log format: text, json or pretty
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<LogFormat>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    LoggingConfig::from_env(cli.log_format, cli.verbose).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<ReelcastError>()
        .map(ReelcastError::exit_code)
        .unwrap_or(1)
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    if let Some(cap) = cli.cap {
        config.upload.cap = cap;
    }
    if cli.no_thumbnail {
        config.upload.thumbnail = false;
    }
    if let Some(url) = &cli.api_url {
        config.platform.base_url = Some(url.clone());
        config.validate()?;
    }

    Ok(config)
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    let manifest_path = cli
        .manifest
        .clone()
        .unwrap_or_else(|| config.paths.manifest_path());
    let manifest = Manifest::load(&manifest_path).await?;
    tracing::debug!(
        "Loaded {} entries from {}",
        manifest.len(),
        manifest_path.display()
    );

    let credentials = Credentials::from_env()?;
    let device = DeviceIdentity::from_seed(credentials.device_seed());

    let mut platform: Box<dyn Platform> = Box::new(HttpPlatform::new(config.base_url()?)?);
    let store = SessionStore::new(
        cli.session
            .clone()
            .unwrap_or_else(|| config.paths.session_path()),
    );
    match restore_or_authenticate(&store, platform.as_mut(), &device, &credentials).await? {
        SessionOrigin::Restored => tracing::info!("Using stored session"),
        SessionOrigin::LoggedIn => tracing::info!("Logged in as {}", credentials.username),
    }

    let history_path = cli
        .history
        .clone()
        .unwrap_or_else(|| config.paths.history_path());
    let ledger = HistoryLedger::load(&history_path).await?;

    let mut options = UploadOptions::from_config(&config);
    if let Some(dir) = &cli.scratch_dir {
        options.scratch_dir = dir.clone();
    }

    let mut service = UploadService::new(
        platform,
        Box::new(HttpMediaSource::default()),
        ledger,
        options,
    );
    if config.upload.thumbnail {
        service =
            service.with_frame_extractor(Box::new(FfmpegThumbnailer::new(&config.upload.ffmpeg)));
    }

    let summary = service.run(&manifest).await?;
    println!("Uploaded {} video(s)", summary.published);

    Ok(())
}
