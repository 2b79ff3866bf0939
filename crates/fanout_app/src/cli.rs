use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use fanout_engine::{CompletionSettings, RunConfig, DEBUG_ITEM_CAP};
use log::LevelFilter;

/// Send every numbered line of a text file to a chat-completion endpoint and
/// append each answer to an output file.
#[derive(Debug, Parser)]
#[command(name = "prompt-fanout", version)]
pub struct Cli {
    /// Text file with one numbered prompt per line (`1. ...`).
    #[arg(long, env = "FANOUT_INPUT", default_value = "input.txt")]
    pub input: PathBuf,

    /// File the records are appended to. Never truncated.
    #[arg(long, env = "FANOUT_OUTPUT", default_value = "output.txt")]
    pub output: PathBuf,

    /// Root of the OpenAI-compatible API.
    #[arg(long, env = "FANOUT_BASE_URL", default_value = "https://openrouter.ai/api/v1")]
    pub base_url: String,

    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[arg(long, env = "FANOUT_MODEL")]
    pub model: String,

    /// Text placed in front of every prompt.
    #[arg(long, env = "FANOUT_PREFIX", default_value = "")]
    pub prefix: String,

    /// Seconds to wait between consecutive requests.
    #[arg(long = "delay-secs", env = "FANOUT_DELAY_SECS", default_value = "1", value_parser = parse_delay)]
    pub delay: Duration,

    /// Stop after this many requests.
    #[arg(long)]
    pub max_items: Option<usize>,

    /// Shorthand for `--max-items 3` when no explicit cap is given.
    #[arg(long)]
    pub debug: bool,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Also write log lines to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl Cli {
    pub fn item_cap(&self) -> Option<usize> {
        self.max_items
            .or_else(|| self.debug.then_some(DEBUG_ITEM_CAP))
    }

    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            prompt_prefix: self.prefix.clone(),
            pacing_delay: self.delay,
            item_cap: self.item_cap(),
        }
    }

    pub fn completion_settings(&self) -> CompletionSettings {
        CompletionSettings::new(&self.base_url, &self.api_key, &self.model)
    }
}

fn parse_delay(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|err| format!("invalid number of seconds: {err}"))?;
    Duration::try_from_secs_f64(secs).map_err(|_| format!("delay must be non-negative, got {raw}"))
}
