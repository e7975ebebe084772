mod config;
mod logging;
mod screen;
mod vm;

use std::fmt;
use std::sync::Arc;

use quiz_core::model::{IdError, QuizId, QuizResult, ResultId, ResultRoute, SessionId, UserId};
use services::{
    AttemptController, BackendConfig, CatalogService, Clock, HttpQuizBackend, QuizBackend,
    ResultService, RunOutcome, SessionService,
};
use storage::repository::Storage;
use storage::session_keys::save_auth_token;
use tracing::info;

use crate::config::ClientConfig;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingFlag { command: &'static str, flag: &'static str },
    MissingUser,
    UnknownArg(String),
    InvalidId { flag: &'static str, source: IdError },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingFlag { command, flag } => write!(f, "{command} requires {flag}"),
            ArgsError::MissingUser => write!(f, "no user id: pass --uid or set QUIZ_USER_ID"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidId { flag, source } => write!(f, "invalid {flag} value: {source}"),
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
    eprintln!("  quiz-client quizzes");
    eprintln!("  quiz-client start   --quiz-id <id>");
    eprintln!("  quiz-client attempt --quiz-id <id>");
    eprintln!("  quiz-client result  --session-id <id>");
    eprintln!("  quiz-client history");
    eprintln!("  quiz-client email   --result-id <id>");
    eprintln!("  quiz-client delete  --result-id <id>");
    eprintln!("  quiz-client signout");
    eprintln!();
    eprintln!("Common flags:");
    eprintln!("  --api <base_url>  --uid <user_id>  --db <sqlite_url>");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_API_BASE_URL, QUIZ_USER_ID, QUIZ_AUTH_TOKEN, QUIZ_DB_URL, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Quizzes,
    Start,
    Attempt,
    Result,
    History,
    Email,
    Delete,
    SignOut,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "quizzes" => Some(Self::Quizzes),
            "start" => Some(Self::Start),
            "attempt" => Some(Self::Attempt),
            "result" => Some(Self::Result),
            "history" => Some(Self::History),
            "email" => Some(Self::Email),
            "delete" => Some(Self::Delete),
            "signout" => Some(Self::SignOut),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Quizzes => "quizzes",
            Self::Start => "start",
            Self::Attempt => "attempt",
            Self::Result => "result",
            Self::History => "history",
            Self::Email => "email",
            Self::Delete => "delete",
            Self::SignOut => "signout",
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    api: Option<String>,
    uid: Option<String>,
    db: Option<String>,
    quiz_id: Option<String>,
    session_id: Option<String>,
    result_id: Option<String>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => parsed.api = Some(require_value(args, "--api")?),
                "--uid" => parsed.uid = Some(require_value(args, "--uid")?),
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    parsed.db = Some(value);
                }
                "--quiz-id" => parsed.quiz_id = Some(require_value(args, "--quiz-id")?),
                "--session-id" => parsed.session_id = Some(require_value(args, "--session-id")?),
                "--result-id" => parsed.result_id = Some(require_value(args, "--result-id")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(parsed)
    }
}

fn required<T>(
    value: Option<&String>,
    command: Command,
    flag: &'static str,
    make: impl FnOnce(String) -> Result<T, IdError>,
) -> Result<T, ArgsError> {
    let raw = value.ok_or(ArgsError::MissingFlag {
        command: command.name(),
        flag,
    })?;
    make(raw.clone()).map_err(|source| ArgsError::InvalidId { flag, source })
}

fn user_id(args: &Args, config: &ClientConfig) -> Result<UserId, ArgsError> {
    let raw = args
        .uid
        .clone()
        .or_else(|| config.user_id.clone())
        .ok_or(ArgsError::MissingUser)?;
    UserId::new(raw).map_err(|source| ArgsError::InvalidId {
        flag: "--uid",
        source,
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

fn print_result(result: &QuizResult) {
    let vm = vm::map_result(result);
    println!("{}", vm.heading);
    println!("{}", vm.score_line);
    if vm.celebrate {
        println!("Well done!");
    }
    for line in vm.lines {
        println!("{line}");
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env();
    logging::init(&config.rust_log);

    let mut argv = std::env::args().skip(1);
    let cmd = match argv.next() {
        None => {
            print_usage();
            return Ok(());
        }
        Some(first) if first == "--help" || first == "-h" => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(&first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Local storage lives in the binary glue; services only see `LocalStore`.
    let db_url = normalize_sqlite_url(args.db.clone().unwrap_or_else(|| config.db_url.clone()));
    prepare_sqlite_file(&db_url)?;
    let storage = Storage::sqlite(&db_url).await?;
    if let Some(token) = &config.auth_token {
        save_auth_token(storage.local.as_ref(), token).await?;
    }

    let api = args.api.as_deref().unwrap_or(&config.api_base_url);
    let backend: Arc<dyn QuizBackend> = Arc::new(HttpQuizBackend::new(
        BackendConfig::new(api)?,
        Arc::clone(&storage.local),
    )?);
    info!(command = cmd.name(), api, "quiz client ready");

    let sessions = SessionService::new(Arc::clone(&backend), Arc::clone(&storage.local));
    let results = ResultService::new(Arc::clone(&backend));

    match cmd {
        Command::Quizzes => {
            let clock = Clock::default_clock();
            let catalog = CatalogService::new(clock, backend).list().await?;
            for line in vm::map_catalog(&catalog, clock.now()) {
                println!("{line}");
            }
        }
        Command::Start => {
            let quiz_id = required(args.quiz_id.as_ref(), cmd, "--quiz-id", QuizId::new)?;
            let uid = user_id(&args, &config)?;
            let session_id = sessions.start(&quiz_id, &uid).await?;
            println!("Started session {session_id}.");
            println!("Run `quiz-client attempt --quiz-id {quiz_id}` to begin.");
        }
        Command::Attempt => {
            let quiz_id = required(args.quiz_id.as_ref(), cmd, "--quiz-id", QuizId::new)?;
            let uid = user_id(&args, &config)?;
            let controller = AttemptController::new(
                quiz_id.clone(),
                uid,
                Arc::clone(&backend),
                Arc::clone(&storage.local),
            );
            match screen::run_attempt_screen(controller).await? {
                RunOutcome::Submitted(route) => {
                    println!("Result: {}", route.path());
                    print_result(&results.fetch(&route).await?);
                }
                RunOutcome::Blocked => {
                    eprintln!("Run `quiz-client start --quiz-id {quiz_id}` first.");
                    return Err(std::io::Error::other("quiz session not started").into());
                }
                RunOutcome::Abandoned => println!("Attempt left without submitting."),
            }
        }
        Command::Result => {
            let session_id =
                required(args.session_id.as_ref(), cmd, "--session-id", SessionId::new)?;
            let uid = user_id(&args, &config)?;
            print_result(&results.fetch(&ResultRoute::new(session_id, uid)).await?);
        }
        Command::History => {
            let uid = user_id(&args, &config)?;
            for line in vm::map_history(&results.history(&uid).await?) {
                println!("{line}");
            }
        }
        Command::Email => {
            let result_id = required(args.result_id.as_ref(), cmd, "--result-id", ResultId::new)?;
            results.send_email(&result_id).await?;
            println!("Result {result_id} will be e-mailed.");
        }
        Command::Delete => {
            let result_id = required(args.result_id.as_ref(), cmd, "--result-id", ResultId::new)?;
            let uid = user_id(&args, &config)?;
            let history = results.history(&uid).await?;
            let remaining = results.delete(&result_id, history).await?;
            println!("Deleted result {result_id}.");
            for line in vm::map_history(&remaining) {
                println!("{line}");
            }
        }
        Command::SignOut => {
            sessions.sign_out().await?;
            println!("Signed out.");
        }
    }

    Ok(())
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

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
