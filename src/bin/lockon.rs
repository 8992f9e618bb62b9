use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use lockon::integration::{HighguiUi, OpenCvSource, OpenCvTracker, SourceSpec, TrackerKind};
use lockon::session::{SessionConfig, TrackingSession};
use lockon::telemetry::{TelemetrySender, TrackRecorder};

#[derive(Parser, Debug)]
#[command(name = "lockon")]
#[command(about = "Interactive single-target tracking over a camera or stream")]
struct Args {
    /// Video source: device index, /dev/videoN, file path, or stream URL
    source: String,
    /// Send per-frame region geometry to this UDP endpoint
    #[arg(long, value_name = "ADDR")]
    telemetry: Option<SocketAddr>,
    /// Tracking model to run
    #[arg(long, value_enum, default_value_t = TrackerChoice::Kcf)]
    tracker: TrackerChoice,
    /// Append per-frame track records to this JSONL file
    #[arg(long, value_name = "PATH")]
    track_log: Option<PathBuf>,
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TrackerChoice {
    Kcf,
    Csrt,
}

impl From<TrackerChoice> for TrackerKind {
    fn from(choice: TrackerChoice) -> Self {
        match choice {
            TrackerChoice::Kcf => TrackerKind::Kcf,
            TrackerChoice::Csrt => TrackerKind::Csrt,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let spec = SourceSpec::parse(&args.source);
    let source = OpenCvSource::open(&spec)
        .with_context(|| format!("failed to open video source {spec}"))?;
    info!(source = %spec, "video source opened");

    let mut session = TrackingSession::new(
        source,
        OpenCvTracker::new(args.tracker.into()),
        HighguiUi::new(),
        SessionConfig::default(),
    );

    if let Some(endpoint) = args.telemetry {
        let sender = TelemetrySender::new(endpoint).context("failed to set up telemetry")?;
        info!(%endpoint, "telemetry enabled");
        session = session.with_telemetry(sender);
    }

    if let Some(path) = &args.track_log {
        let mut recorder = TrackRecorder::create(path)
            .with_context(|| format!("failed to create track log {}", path.display()))?;
        recorder.record_start(&args.source)?;
        session = session.with_recorder(recorder);
    }

    let report = session.run().context("tracking session failed")?;
    info!(
        reason = report.exit.as_str(),
        frames_tracked = report.frames_tracked,
        telemetry_sent = report.telemetry_sent,
        telemetry_failures = report.telemetry_failures,
        "done"
    );
    Ok(())
}
