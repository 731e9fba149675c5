//! RFID card tracker front end.
//!
//! Loads the tag registry, starts the tracker actor and one reader task per
//! channel, then hands the terminal to the TUI (or stdin/stdout in headless
//! mode).

use anyhow::{Context, Result};
use card_tracker::{
    history::FileHandLog,
    reader::{ChannelId, StreamReader},
    registry::TagDatabase,
    table::TrackerActor,
};
use ct_client::{
    config::{ConfigOverrides, TrackerConfig},
    controller::Controller,
    headless::{self, OutputFormat},
    logging,
    tui_app::TuiApp,
};
use pico_args::Arguments;
use std::{path::PathBuf, sync::Arc};
use tokio::{io::BufReader, sync::mpsc};

const HELP: &str = "\
Track RFID-tagged cards on a two-seat poker table

USAGE:
  ct_client [OPTIONS]

OPTIONS:
  --channels   LIST        Comma-separated reader devices  [default: env TRACKER_CHANNELS or /dev/ttyACM0,/dev/ttyACM1]
  --registry   PATH        Tag registry JSON file          [default: env TRACKER_REGISTRY or tags.json]
  --log-dir    DIR         Hand log directory              [default: env TRACKER_LOG_DIR or log]
  --diagnostics PATH       Diagnostics log file            [default: env TRACKER_DIAGNOSTICS_LOG or card_tracker.log]

FLAGS:
  --headless               Read commands from stdin and print the table to stdout
  --json                   With --headless, print snapshots as JSON lines
  -h, --help               Print help information

ENVIRONMENT:
  TRACKER_INBOX_CAPACITY   Tracker inbox size [default: 100]
  RUST_LOG                 Diagnostics filter [default: info]
";

/// Notifications buffered for the front end before the oldest are dropped.
const NOTIFICATION_CAPACITY: usize = 256;

struct Args {
    overrides: ConfigOverrides,
    headless: bool,
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        overrides: ConfigOverrides {
            channels: pargs.opt_value_from_str("--channels")?,
            registry_path: pargs.opt_value_from_str::<_, PathBuf>("--registry")?,
            log_dir: pargs.opt_value_from_str::<_, PathBuf>("--log-dir")?,
            diagnostics_log: pargs.opt_value_from_str::<_, PathBuf>("--diagnostics")?,
        },
        headless: pargs.contains("--headless"),
        json: pargs.contains("--json"),
    };

    run(args).await
}

async fn run(args: Args) -> Result<()> {
    let config = TrackerConfig::from_env(args.overrides)?;
    config.validate()?;

    logging::init(&config.diagnostics_log).with_context(|| {
        format!(
            "Failed to open diagnostics log {}",
            config.diagnostics_log.display()
        )
    })?;

    let registry = TagDatabase::from_json_file(&config.registry_path)
        .context("Failed to load tag registry")?;
    let recorder = FileHandLog::new(&config.log_dir);
    log::info!(
        "Recording hands under {} with {} tags registered",
        config.log_dir.display(),
        registry.len()
    );

    let tracker = TrackerActor::spawn(
        Arc::new(registry),
        Arc::new(recorder),
        config.inbox_capacity,
    );
    let notifications = tracker.subscribe(NOTIFICATION_CAPACITY).await?;

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let mut channel_ids = Vec::with_capacity(config.channels.len());
    for path in &config.channels {
        let channel = ChannelId::new(path.display().to_string());
        channel_ids.push(channel.clone());

        let reader = StreamReader::new(channel, tracker.clone(), events_tx.clone());
        let path = path.clone();
        tokio::spawn(async move {
            let exit = reader.run_device(path).await;
            log::debug!("Reader exited: {:?}", exit);
        });
    }
    drop(events_tx);

    let controller = Controller::new(tracker.clone());

    if args.headless {
        let format = if args.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        headless::run(
            controller,
            notifications,
            events_rx,
            stdin,
            &mut stdout,
            format,
        )
        .await?;
    } else {
        let snapshot = tracker.get_snapshot().await?;
        let terminal = ratatui::init();
        let result = TuiApp::new(controller, channel_ids, snapshot)
            .run(terminal, notifications, events_rx)
            .await;
        ratatui::restore();
        result?;
    }

    log::info!("Front end closed");
    Ok(())
}
