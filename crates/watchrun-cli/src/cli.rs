use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::filter::LevelFilter;
use watchrun_watch::WatchConfig;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages (default)
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "watchrun")]
#[command(about = "Watch directories and run a command when matching files change")]
#[command(
    long_about = "Watch directories and run a command when matching files change.\n\n\
The command is a template. These placeholders are replaced with data from the\n\
triggering event:\n  \
{{.Path}}      full path of the file\n  \
{{.Name}}      file name\n  \
{{.Event}}     event label (CREATE, WRITE, REMOVE, RENAME, CHMOD, ...)\n  \
{{.Ext}}       extension including the dot\n  \
{{.Dir}}       directory containing the file\n  \
{{.BaseName}}  file name without extension"
)]
#[command(version)]
pub struct Cli {
    /// Directories to watch
    #[arg(short = 'w', long = "watch", value_delimiter = ',', default_value = ".")]
    pub watch: Vec<PathBuf>,

    /// Directories to skip in recursive mode
    #[arg(short = 'x', long = "exclude", value_delimiter = ',')]
    pub exclude: Vec<PathBuf>,

    /// Glob patterns matched against file names
    #[arg(short = 'p', long = "pattern", value_delimiter = ',', default_value = "*.*")]
    pub pattern: Vec<String>,

    /// Event types to react to (create, write, remove, rename, chmod, open,
    /// read, closewrite, closeread, all)
    #[arg(short = 'e', long = "event", value_delimiter = ',', default_value = "all")]
    pub event: Vec<String>,

    /// Command template to execute
    #[arg(short = 'c', long = "command")]
    pub command: String,

    /// Watch directories recursively
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// Quiet period before a burst of events runs the command (e.g. 300ms, 2s)
    #[arg(short = 'd', long, value_parser = parse_duration, default_value = "0")]
    pub debounce: Duration,

    /// Clear the terminal before each run
    #[arg(long)]
    pub clear: bool,

    /// Run the command once at startup with empty placeholders
    #[arg(long)]
    pub run_on_start: bool,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(short = 'l', long, value_enum, env = "WATCHRUN_LOG")]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Effective log level: explicit level wins, then `--verbose`, then info.
    pub fn level_filter(&self) -> LevelFilter {
        match (self.log_level, self.verbose) {
            (Some(level), _) => level.into(),
            (None, true) => LevelFilter::DEBUG,
            (None, false) => LevelFilter::INFO,
        }
    }

    pub fn into_config(self) -> WatchConfig {
        WatchConfig::new(self.command)
            .with_watch_dirs(self.watch)
            .with_exclude_dirs(self.exclude)
            .with_patterns(self.pattern)
            .with_event_types(self.event)
            .with_recursive(self.recursive)
            .with_debounce(self.debounce)
            .with_clear_terminal(self.clear)
            .with_run_on_start(self.run_on_start)
    }
}

/// Parse `300ms`, `2s`, `1m` or a bare number of milliseconds.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (digits, unit) = input.split_at(split);
    if digits.is_empty() {
        return Err(format!("invalid duration '{}': expected a number", input));
    }
    let value: u64 = digits
        .parse()
        .map_err(|e| format!("invalid duration '{}': {}", input, e))?;

    match unit.trim() {
        "" | "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value.saturating_mul(60))),
        other => Err(format!(
            "invalid duration unit '{}' (use ms, s or m)",
            other
        )),
    }
}
