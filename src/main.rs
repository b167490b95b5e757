//! gesture-replay - run a recorded contact trace through the recognizer
//!
//! Prints every recognized gesture as one JSON object per line.

use std::path::PathBuf;

use anyhow::{Context, Result};
use backstreet_gestures::{driver, trace, GestureConfig, GestureRecognizer};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "gesture-replay")]
#[command(about = "Replay a touch trace and print recognized gestures", long_about = None)]
struct Args {
    /// JSON-lines trace of start/move/end records
    trace: PathBuf,

    /// TOML file with gesture thresholds
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Replay at the trace's own pace instead of as fast as possible
    #[arg(short, long)]
    realtime: bool,

    /// Also write logs to a daily rotating file in this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Log panics before crashing
    let crash_dir = args.log_dir.clone();
    std::panic::set_hook(Box::new(move |panic_info| {
        eprintln!("PANIC: {}", panic_info);
        if let Some(dir) = &crash_dir {
            if let Ok(mut f) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join("crash.log"))
            {
                use std::io::Write;
                let _ = writeln!(f, "[{}] PANIC: {}", chrono::Local::now(), panic_info);
            }
        }
    }));

    // Quiet by default, verbose with --debug
    let default_filter = if args.debug {
        "debug,backstreet_gestures=trace"
    } else {
        "warn,backstreet_gestures=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let (file_layer, _guard) = match &args.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
            let file_appender = tracing_appender::rolling::daily(dir, "gesture-replay.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer().with_writer(non_blocking).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    let config = match &args.config {
        Some(path) => GestureConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GestureConfig::default(),
    };

    let records = trace::load(&args.trace)
        .with_context(|| format!("reading trace {}", args.trace.display()))?;
    info!(path = %args.trace.display(), records = records.len(), "Loaded trace");

    let mut recognizer: GestureRecognizer<trace::TraceTarget> =
        GestureRecognizer::new(config).context("invalid gesture config")?;
    recognizer.on_gesture(|gesture| match serde_json::to_string(gesture) {
        Ok(line) => println!("{}", line),
        Err(e) => warn!("Failed to serialize gesture: {}", e),
    });

    if args.realtime {
        driver::replay_realtime(recognizer, records)?;
    } else {
        trace::replay(&mut recognizer, &records);
    }

    Ok(())
}
