//! `log` backend that writes to the browser console.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;
use web_sys::console;

static LOGGER: ConsoleLogger = ConsoleLogger;

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => console::error_1(&line),
            Level::Warn => console::warn_1(&line),
            Level::Info => console::info_1(&line),
            Level::Debug | Level::Trace => console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Parse a log level string. Empty or absent means `info`.
pub fn parse_log_level(level: Option<&str>) -> Option<LevelFilter> {
    match level.map(str::trim) {
        Some("off") => Some(LevelFilter::Off),
        Some("error") => Some(LevelFilter::Error),
        Some("warn") => Some(LevelFilter::Warn),
        Some("info") | Some("") | None => Some(LevelFilter::Info),
        Some("debug") => Some(LevelFilter::Debug),
        Some("trace") => Some(LevelFilter::Trace),
        Some(_) => None,
    }
}

/// Install the console logger. Calling it again only changes the level.
pub fn init(level: LevelFilter) {
    // set_logger fails once a logger is installed; the level still applies
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
