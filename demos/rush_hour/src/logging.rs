//! Minimal `log` backend: `[LEVEL] [target] message` on stderr.

use log::{LevelFilter, Log, Metadata, Record};

pub struct LogAdapter;

static LOG_ADAPTER: LogAdapter = LogAdapter;

impl Log for LogAdapter {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", format_log_record(record));
        }
    }

    fn flush(&self) {}
}

pub fn format_log_record(record: &Record) -> String {
    format!("[{}] [{}] {}", record.level(), record.target(), record.args())
}

/// Install the adapter.  `verbosity` counts `-v` flags.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // A logger may already be installed (tests); keep it.
    if log::set_logger(&LOG_ADAPTER).is_ok() {
        log::set_max_level(level);
    }
}
