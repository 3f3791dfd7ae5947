use crate::domain::logging::{LogEntry, LogLevel, Logger, TimeProvider};
use js_sys::Date;
use wasm_bindgen::JsValue;

/// Logger that writes to the browser console and mirrors entries into the
/// debug log signal.
pub struct ConsoleLogger {
    min_level: LogLevel,
    mirror_to_ui: bool,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level, mirror_to_ui: true }
    }

    pub fn new_development() -> Self {
        Self::new(LogLevel::Debug)
    }

    pub fn new_production() -> Self {
        Self::new(LogLevel::Warn)
    }

    pub fn without_ui_mirror(mut self) -> Self {
        self.mirror_to_ui = false;
        self
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }
        let line = entry.format_line();
        let value = JsValue::from_str(&line);
        match entry.level {
            LogLevel::Trace | LogLevel::Debug => web_sys::console::debug_1(&value),
            LogLevel::Info => web_sys::console::info_1(&value),
            LogLevel::Warn => web_sys::console::warn_1(&value),
            LogLevel::Error => web_sys::console::error_1(&value),
        }
        if self.mirror_to_ui {
            crate::global_state::push_log(line);
        }
    }
}

/// Wall clock from `Date.now()`.
#[derive(Default)]
pub struct BrowserTimeProvider;

impl BrowserTimeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TimeProvider for BrowserTimeProvider {
    fn current_timestamp(&self) -> u64 {
        Date::now() as u64
    }

    fn format_timestamp(&self, timestamp: u64) -> String {
        let date = Date::new(&JsValue::from_f64(timestamp as f64));
        format!(
            "{:02}:{:02}:{:02}.{:03}",
            date.get_hours(),
            date.get_minutes(),
            date.get_seconds(),
            date.get_milliseconds()
        )
    }
}
