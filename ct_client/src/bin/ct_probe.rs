//! Print every tag seen on one reader, with the card it is registered as.

use anyhow::{Context, Result};
use card_tracker::{
    reader::{LineRead, ReaderError, read_line},
    registry::{TagDatabase, TagRegistry},
};
use chrono::Local;
use ct_client::{
    config::{ConfigOverrides, TrackerConfig},
    probe::format_probe_line,
};
use pico_args::Arguments;
use std::path::PathBuf;
use tokio::{fs::File, io::BufReader};

const HELP: &str = "\
Print the tags read on one channel and the cards they are registered as

USAGE:
  ct_probe [OPTIONS]

OPTIONS:
  --channel    PATH        Reader device   [default: first of TRACKER_CHANNELS]
  --registry   PATH        Tag registry    [default: env TRACKER_REGISTRY or tags.json]

FLAGS:
  -h, --help               Print help information
";

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let channel: Option<PathBuf> = pargs.opt_value_from_str("--channel")?;
    let config = TrackerConfig::from_env(ConfigOverrides {
        registry_path: pargs.opt_value_from_str("--registry")?,
        ..Default::default()
    })?;

    env_logger::builder().format_target(false).init();

    let channel = channel
        .or_else(|| config.channels.first().cloned())
        .context("No channel configured")?;
    let registry = TagDatabase::from_json_file(&config.registry_path)
        .context("Failed to load tag registry")?;

    let file = File::open(&channel)
        .await
        .with_context(|| format!("Failed to open {}", channel.display()))?;
    let mut source = BufReader::new(file);
    let mut buf = Vec::new();

    println!("Reading tags from {}", channel.display());
    loop {
        match read_line(&mut source, &mut buf).await {
            Ok(LineRead::Tag(tag)) => {
                let card = registry.lookup(&tag);
                println!("{}", format_probe_line(Local::now(), &tag, card));
            }
            Ok(LineRead::Blank) => {}
            Ok(LineRead::Eof) => break,
            Err(ReaderError::Decode(e)) => log::warn!("Skipping undecodable line: {}", e),
            Err(e) => return Err(e).context("Failed to read tag"),
        }
    }

    Ok(())
}
