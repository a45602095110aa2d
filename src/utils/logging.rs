use std::collections::VecDeque;
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::config::CONFIG;
use crate::utils::timing::TIMING_TARGET;

pub const LOGS_DIR: &str = "logs";

/// The two streams written under [`LOGS_DIR`], each as plain text and JSONL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStream {
    Studio,
    Timing,
}

impl LogStream {
    fn file_name(self, json: bool) -> &'static str {
        match (self, json) {
            (LogStream::Studio, false) => "studio.log",
            (LogStream::Studio, true) => "studio.jsonl",
            (LogStream::Timing, false) => "timing.log",
            (LogStream::Timing, true) => "timing.jsonl",
        }
    }
}

/// Keeps the background writers alive; drop flushes them.
pub struct LoggingGuards {
    _guards: Vec<WorkerGuard>,
}

#[derive(Debug, Clone)]
pub struct LogTail {
    pub path: PathBuf,
    pub lines: Vec<String>,
}

fn parse_log_level(value: &str) -> LevelFilter {
    match value.trim().to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "warn" | "warning" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

fn daily_writer(
    logs_dir: &Path,
    stream: LogStream,
    json: bool,
    guards: &mut Vec<WorkerGuard>,
) -> NonBlocking {
    let appender = tracing_appender::rolling::daily(logs_dir, stream.file_name(json));
    let (writer, guard) = tracing_appender::non_blocking(appender);
    guards.push(guard);
    writer
}

pub fn init_logging() -> LoggingGuards {
    let logs_dir = Path::new(LOGS_DIR);
    if let Err(err) = fs::create_dir_all(logs_dir) {
        eprintln!("Failed to create logs directory: {err}");
    }

    let studio_filter = Targets::new()
        .with_default(parse_log_level(&CONFIG.log_level))
        .with_target(TIMING_TARGET, LevelFilter::OFF)
        .with_target("hyper", LevelFilter::WARN)
        .with_target("hyper_util", LevelFilter::WARN)
        .with_target("reqwest", LevelFilter::WARN);
    let timing_filter = Targets::new()
        .with_default(LevelFilter::OFF)
        .with_target(TIMING_TARGET, LevelFilter::INFO);

    let mut guards = Vec::with_capacity(4);
    let studio_text = daily_writer(logs_dir, LogStream::Studio, false, &mut guards);
    let studio_json = daily_writer(logs_dir, LogStream::Studio, true, &mut guards);
    let timing_text = daily_writer(logs_dir, LogStream::Timing, false, &mut guards);
    let timing_json = daily_writer(logs_dir, LogStream::Timing, true, &mut guards);

    // stdout belongs to the interactive session.
    let console = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(studio_filter.clone());

    tracing_subscriber::registry()
        .with(console)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(studio_text)
                .with_ansi(false)
                .with_filter(studio_filter.clone()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(studio_json)
                .with_filter(studio_filter),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(timing_text)
                .with_ansi(false)
                .with_filter(timing_filter.clone()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(timing_json)
                .with_filter(timing_filter),
        )
        .init();

    LoggingGuards { _guards: guards }
}

/// Last `max_lines` lines of the newest plain-text file of `stream`.
pub fn read_recent_log_lines(stream: LogStream, max_lines: usize) -> io::Result<Option<LogTail>> {
    read_recent_log_lines_in(Path::new(LOGS_DIR), stream, max_lines)
}

fn read_recent_log_lines_in(
    logs_dir: &Path,
    stream: LogStream,
    max_lines: usize,
) -> io::Result<Option<LogTail>> {
    if max_lines == 0 || !logs_dir.exists() {
        return Ok(None);
    }
    let Some(path) = newest_file(logs_dir, stream.file_name(false))? else {
        return Ok(None);
    };

    let mut lines = VecDeque::with_capacity(max_lines);
    for line in BufReader::new(fs::File::open(&path)?).lines() {
        if lines.len() == max_lines {
            lines.pop_front();
        }
        lines.push_back(line?);
    }
    Ok(Some(LogTail {
        path,
        lines: lines.into(),
    }))
}

/// Rolled files are named `<prefix>.<date>`; the newest by mtime wins.
fn newest_file(logs_dir: &Path, prefix: &str) -> io::Result<Option<PathBuf>> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(logs_dir)? {
        let entry = entry?;
        let is_match = entry.file_name().to_string_lossy().starts_with(prefix);
        if !is_match || !entry.path().is_file() {
            continue;
        }
        let modified = entry
            .metadata()
            .and_then(|meta| meta.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        candidates.push((modified, entry.path()));
    }
    Ok(candidates
        .into_iter()
        .max_by_key(|(modified, _)| *modified)
        .map(|(_, path)| path))
}
