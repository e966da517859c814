mod screen;

use std::fmt;
use std::sync::Arc;

use quiz_core::model::{QuestionKind, QuizSettingsDraft, SettingsError};
use services::{Clock, OpenTdbClient, QuizLoopService, QuizRuntime, SessionView};
use storage::{SnapshotGateway, Storage};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tracing_subscriber::EnvFilter;

use crate::screen::{Input, read_input, render};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidNumber { var: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNumber { var, raw } => write!(f, "invalid {var} value: {raw}"),
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
    eprintln!("  cargo run -p app -- [--db <sqlite_url>] [--in-memory]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:quiz.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_API_BASE_URL, QUIZ_TIME_LIMIT_SECS, QUIZ_QUESTION_COUNT");
    eprintln!("  QUIZ_QUESTION_KIND (multiple | boolean)");
    eprintln!("  RUST_LOG (default: info,services=debug)");
}

enum Backend {
    Sqlite(String),
    InMemory,
}

struct Args {
    backend: Backend,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .unwrap_or_else(|| "sqlite:quiz.sqlite3".into());
        let mut backend = Backend::Sqlite(normalize_sqlite_url(db_url));

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    backend = Backend::Sqlite(normalize_sqlite_url(value));
                }
                "--in-memory" => backend = Backend::InMemory,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { backend })
    }
}

fn env_number(var: &'static str) -> Result<Option<u32>, ArgsError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ArgsError::InvalidNumber { var, raw }),
        Err(_) => Ok(None),
    }
}

/// `multiple` or `boolean`; unset keeps the default kind.
fn question_kind(raw: Option<String>) -> Result<Option<QuestionKind>, SettingsError> {
    raw.map(|raw| raw.parse()).transpose()
}

fn settings_from_env() -> Result<QuizSettingsDraft, Box<dyn std::error::Error>> {
    Ok(QuizSettingsDraft {
        question_count: env_number("QUIZ_QUESTION_COUNT")?,
        question_kind: question_kind(std::env::var("QUIZ_QUESTION_KIND").ok())?,
        time_limit_secs: env_number("QUIZ_TIME_LIMIT_SECS")?,
        source_url: std::env::var("QUIZ_API_BASE_URL").ok(),
        ..QuizSettingsDraft::default()
    })
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

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,services=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    let settings = settings_from_env()?.validate()?;

    init_tracing();

    let storage = match &args.backend {
        Backend::Sqlite(db_url) => {
            prepare_sqlite_file(db_url)?;
            let storage = Storage::sqlite(db_url).await?;
            tracing::info!(db = %db_url, "sqlite storage ready");
            storage
        }
        Backend::InMemory => Storage::in_memory(),
    };

    let snapshots = SnapshotGateway::new(Arc::clone(&storage.slots), settings.storage_key());
    let source = Arc::new(OpenTdbClient::from_settings(&settings));
    let service = QuizLoopService::new(Clock::system(), settings, source, snapshots);
    let runtime = QuizRuntime::start(service).await?;

    let (intent_tx, intent_rx) = mpsc::channel(16);
    let (view_tx, view_rx) = watch::channel(runtime.view());
    let actor = tokio::spawn(runtime.run(intent_rx, view_tx));

    let printer_rx = view_rx.clone();
    let printer = tokio::spawn(print_screens(printer_rx));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let view = view_rx.borrow().clone();
        match read_input(&view, &line) {
            Input::Intent(intent) => {
                if intent_tx.send(intent).await.is_err() {
                    break;
                }
            }
            Input::Quit => break,
            Input::Ignored => {}
        }
    }

    drop(intent_tx);
    actor.await?;
    printer.abort();
    Ok(())
}

async fn print_screens(mut views: watch::Receiver<SessionView>) {
    let mut previous: Option<SessionView> = None;
    loop {
        let next = views.borrow_and_update().clone();
        if let Some(text) = render(previous.as_ref(), &next) {
            println!("{text}");
        }
        previous = Some(next);
        if views.changed().await.is_err() {
            break;
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
