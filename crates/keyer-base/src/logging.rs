use log::{LevelFilter, Log, Metadata, Record};
use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

/// Environment variable read by [`init_logger_from_env`].
pub const LOG_ENV: &str = "KEYER_LOG";

/// A logger that writes to stderr, leaving stdout free for program output.
///
/// Lines carry the time elapsed since the logger was created, the level,
/// the target and the source location.
pub struct StderrLogger {
    level: LevelFilter,
    start: Instant,
}

impl StderrLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            start: Instant::now(),
        }
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Render a record the way it is written to stderr.
    pub fn format(&self, record: &Record) -> String {
        let elapsed = self.start.elapsed();
        format!(
            "[{:>4}.{:03}s] {:<5} {} {}:{} - {}",
            elapsed.as_secs(),
            elapsed.subsec_millis(),
            record.level(),
            record.target(),
            record.file().unwrap_or("unknown"),
            record.line().unwrap_or(0),
            record.args()
        )
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.format(record);
        let mut stderr = std::io::stderr().lock();
        writeln!(stderr, "{line}").ok();
    }

    fn flush(&self) {
        std::io::stderr().flush().ok();
    }
}

/// Default level: Debug in debug builds, Info in release builds.
pub fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Parse a level name such as `"warn"` or `"TRACE"`.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    name.trim().parse().ok()
}

/// Install a [`StderrLogger`] as the global logger.
///
/// Only the first call per process installs a logger; later calls are
/// ignored.
pub fn init_logger(level: LevelFilter) {
    static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

    let logger = LOGGER.get_or_init(|| StderrLogger::new(level));
    if log::set_logger(logger).is_ok() {
        log::set_max_level(logger.level());
    }
}

/// Install the global logger with the level named by `KEYER_LOG`, falling
/// back to [`default_level`] when the variable is unset or unparsable.
pub fn init_logger_from_env() {
    let level = std::env::var(LOG_ENV)
        .ok()
        .and_then(|value| parse_level(&value))
        .unwrap_or_else(default_level);
    init_logger(level);
}
