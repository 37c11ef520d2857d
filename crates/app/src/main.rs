mod console;
mod repl;

use std::fmt;
use std::sync::Arc;

use services::{AppServices, Clock, ReadingAidService};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wonder_core::model::{VoiceSettings, VoiceSettingsDraft};

use crate::console::{ConsoleSpeech, PlainTextPages, UnavailableOcr};
use crate::repl::Console;

const DEFAULT_DB_URL: &str = "sqlite://wonder.sqlite3";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  word-wonder [--db <sqlite_url>] [--no-delay]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  WONDER_DB_URL, WONDER_VOICE_API_KEY, WONDER_VOICE_ID, WONDER_VOICE_BASE_URL");
    eprintln!("  RUST_LOG (default: info)");
}

#[derive(Debug)]
struct Args {
    db_url: String,
    feedback_delays: bool,
}

enum Parsed {
    Run(Args),
    Help,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Parsed, ArgsError> {
        let mut db_url = std::env::var("WONDER_DB_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut feedback_delays = true;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--no-delay" => feedback_delays = false,
                "--help" | "-h" => return Ok(Parsed::Help),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Parsed::Run(Self {
            db_url,
            feedback_delays,
        }))
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}

/// Premium voice settings from the environment. Blank values count as unset.
fn voice_settings_from_env() -> VoiceSettings {
    let draft = VoiceSettingsDraft {
        api_key: std::env::var("WONDER_VOICE_API_KEY").ok(),
        voice_id: std::env::var("WONDER_VOICE_ID").ok(),
        api_base_url: std::env::var("WONDER_VOICE_BASE_URL").ok(),
    };
    draft.validate().unwrap_or_else(|err| {
        warn!(error = %err, "ignoring premium voice settings");
        VoiceSettings::default()
    })
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = match Args::parse(&mut argv) {
        Ok(Parsed::Run(args)) => args,
        Ok(Parsed::Help) => {
            print_usage();
            return Ok(());
        }
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            return Err(err.into());
        }
    };

    // Open + migrate SQLite at startup; services never touch the filesystem.
    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url, Clock::system())
        .await?
        .with_voice_settings(voice_settings_from_env());
    info!(db = %parsed.db_url, "storage ready");

    if services.voice_settings().is_enabled() {
        // No network synthesizer is bundled with the console build.
        warn!(
            voice_id = services.voice_settings().voice_id().unwrap_or("default"),
            "premium voice configured but unavailable here; using the built-in voice"
        );
    }

    let nav = services.navigation(services.launcher()).await?;
    let reader = ReadingAidService::new(
        Arc::new(UnavailableOcr),
        Arc::new(PlainTextPages),
        Arc::new(ConsoleSpeech),
    );

    Console::new(nav, reader, parsed.feedback_delays).run().await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    init_logging();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Parsed, ArgsError> {
        let mut iter = args.iter().map(|s| (*s).to_string());
        Args::parse(&mut iter)
    }

    #[test]
    fn no_delay_flag_disables_feedback_pause() {
        let Ok(Parsed::Run(args)) = parse(&["--no-delay", "--db", "sqlite::memory:"]) else {
            panic!("expected run args");
        };
        assert!(!args.feedback_delays);
        assert_eq!(args.db_url, "sqlite::memory:");
    }

    #[test]
    fn db_flag_requires_a_value() {
        assert!(matches!(
            parse(&["--db"]),
            Err(ArgsError::MissingValue { flag: "--db" })
        ));
        assert!(matches!(
            parse(&["--db", "  "]),
            Err(ArgsError::InvalidDbUrl { .. })
        ));
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(matches!(parse(&["--fast"]), Err(ArgsError::UnknownArg(_))));
        assert!(matches!(parse(&["-h"]), Ok(Parsed::Help)));
    }

    #[test]
    fn relative_paths_become_absolute_urls() {
        let url = normalize_sqlite_url("data/wonder.sqlite3".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/wonder.sqlite3"));
    }
}
