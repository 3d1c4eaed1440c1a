// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, error};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use cipherpad::app_config::{self, Config};
use cipherpad::services::clipboard::SystemClipboard;
use cipherpad::services::history::JsonHistory;
use cipherpad::services::http::HttpCipherClient;
use cipherpad::services::{HistoryStore, Notifier, ShareListener};
use cipherpad::session::{
    Direction, Notice, Services, SessionCommand, SessionCoordinator, SessionSettings, ShareSnapshot,
};
use cipherpad::Session;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for cipherpad
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// cipherpad - encode and decode text as you type
#[derive(Parser, Debug)]
#[command(name = "cipherpad")]
#[command(version = "1.0.0")]
#[command(about = "Interactive encode/decode session backed by a cipher service")]
#[command(long_about = "cipherpad keeps an original text and its encoded or decoded counterpart in sync.

Type a line to replace the original text. Commands:
    :swap           Swap direction (and buffers when both are filled)
    :encode         Switch to encode direction
    :decode         Switch to decode direction
    :clear          Clear the original text
    :copy           Copy the transformed text
    :link           Copy a share link
    :history        List saved sessions
    :restore N      Restore history entry N
    :open ID|URL    Open a share id or share link
    :quit           Exit")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Cipher service base URL
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Quiet period before a request is sent, in milliseconds
    #[arg(short, long)]
    debounce_ms: Option<u64>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Share id or share link to open on start
    #[arg(short, long)]
    share: Option<String>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code and label for level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, label) = Self::style_for_level(record.level());
            let _ = writeln!(std::io::stderr(), "\x1B[{}m{} {} {}\x1B[0m", color, now, label, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

// @struct: Prints notices for the user
#[derive(Debug)]
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Info(message) => println!("  {}", message),
            Notice::Error(message) => println!("  ! {}", message),
        }
    }
}

// @struct: Logs share state changes
#[derive(Debug)]
struct LoggingShareListener;

impl ShareListener for LoggingShareListener {
    fn share_updated(&self, snapshot: Option<ShareSnapshot>) {
        match snapshot {
            Some(snapshot) => debug!("Shareable: {} ({})", snapshot.original_text, snapshot.direction),
            None => debug!("Nothing to share"),
        }
    }
}

/// A parsed line of user input
#[derive(Debug, PartialEq)]
enum Input {
    Command(SessionCommand),
    History,
    RestoreIndex(usize),
    Open(String),
    Quit,
}

// @param line: Raw input line
// @returns: Parsed input
fn parse_input(line: &str) -> Result<Input> {
    let Some(command) = line.strip_prefix(':') else {
        return Ok(Input::Command(SessionCommand::Edit(line.to_string())));
    };

    let mut parts = command.trim().splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let argument = parts.next().map(str::trim).unwrap_or_default();

    match name {
        "swap" => Ok(Input::Command(SessionCommand::Swap)),
        "encode" => Ok(Input::Command(SessionCommand::SetDirection(Direction::Encode))),
        "decode" => Ok(Input::Command(SessionCommand::SetDirection(Direction::Decode))),
        "clear" => Ok(Input::Command(SessionCommand::Clear)),
        "copy" => Ok(Input::Command(SessionCommand::CopyTranslated)),
        "link" => Ok(Input::Command(SessionCommand::CopyShareLink)),
        "history" => Ok(Input::History),
        "restore" => argument
            .parse()
            .map(Input::RestoreIndex)
            .map_err(|_| anyhow!("Usage: :restore N")),
        "open" if !argument.is_empty() => Ok(Input::Open(argument.to_string())),
        "open" => Err(anyhow!("Usage: :open ID|URL")),
        "quit" | "q" => Ok(Input::Quit),
        other => Err(anyhow!("Unknown command: :{}", other)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "cipherpad", &mut std::io::stdout());
        return Ok(());
    }

    if let Err(e) = run_session(cli).await {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}

async fn run_session(options: CommandLineOptions) -> Result<()> {
    let mut config = Config::load_or_create(&options.config_path)?;

    // Override config with CLI options if provided
    if let Some(endpoint) = options.endpoint {
        config.service.endpoint = endpoint;
    }
    if let Some(debounce_ms) = options.debounce_ms {
        config.session.debounce_ms = debounce_ms;
    }
    if let Some(level) = options.log_level {
        config.log_level = level.into();
    }
    log::set_max_level(config.log_level.to_level_filter());
    config.validate().context("Invalid configuration")?;

    let client = Arc::new(HttpCipherClient::new(
        config.service.endpoint.clone(),
        Duration::from_secs(config.service.timeout_secs),
    ));
    let history: Arc<dyn HistoryStore> = Arc::new(JsonHistory::new(
        config.history.resolved_path(),
        config.history.max_entries,
    ));
    let services = Services {
        transformer: client.clone(),
        share_resolver: client,
        history: Arc::clone(&history),
        notifier: Arc::new(ConsoleNotifier),
        clipboard: Arc::new(SystemClipboard::new()),
        share_listener: Arc::new(LoggingShareListener),
    };

    let mut session = SessionCoordinator::new(Session::default(), services, SessionSettings::from_config(&config));
    if let Some(share) = options.share {
        open(&mut session, &share).await;
    }

    interactive_loop(&mut session, history.as_ref()).await
}

async fn open(session: &mut SessionCoordinator, target: &str) {
    if target.starts_with("http://") || target.starts_with("https://") {
        session.open_share_link(target);
    } else {
        session.open_share(target).await;
    }
}

async fn interactive_loop(session: &mut SessionCoordinator, history: &dyn HistoryStore) -> Result<()> {
    enum Next {
        Line(Option<String>),
        Event,
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown = session.session();
    print_state(session);

    loop {
        let next = tokio::select! {
            line = lines.next_line() => Next::Line(line.context("Failed to read input")?),
            _ = session.step() => Next::Event,
        };

        if let Next::Line(line) = next {
            let Some(line) = line else { break };
            match parse_input(&line) {
                Ok(Input::Quit) => break,
                Ok(Input::Command(SessionCommand::CopyShareLink)) => {
                    if let Some(link) = session.copy_share_link() {
                        println!("  {}", link);
                    }
                }
                Ok(Input::Command(command)) => session.handle_command(command).await,
                Ok(Input::History) => print_history(history),
                Ok(Input::RestoreIndex(index)) => match history.entries() {
                    Ok(entries) => match entries.into_iter().nth(index) {
                        Some(entry) => session.restore(entry),
                        None => println!("  ! No history entry {}", index),
                    },
                    Err(e) => println!("  ! {}", e),
                },
                Ok(Input::Open(target)) => open(session, &target).await,
                Err(e) => println!("  ! {}", e),
            }
        }

        let current = session.session();
        if current != shown {
            print_state(session);
            shown = current;
        }
    }

    Ok(())
}

fn print_state(session: &SessionCoordinator) {
    let (source, target) = session.placeholders();
    let original = if session.original().is_empty() { source } else { session.original() };
    let translated = if session.translated().is_empty() { target } else { session.translated() };
    println!("[{}] {} => {}", session.direction(), original, translated);
}

fn print_history(history: &dyn HistoryStore) {
    match history.entries() {
        Ok(entries) if entries.is_empty() => println!("  (history is empty)"),
        Ok(entries) => {
            for (index, entry) in entries.iter().enumerate() {
                println!(
                    "  {:>2}. [{}] {} => {}",
                    index, entry.direction, entry.original_text, entry.translated_text
                );
            }
        }
        Err(e) => println!("  ! {}", e),
    }
}
