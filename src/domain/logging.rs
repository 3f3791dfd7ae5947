use derive_more::Display;
use std::sync::{Mutex, OnceLock};
use strum::EnumString;

/// Log levels, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum LogLevel {
    #[display(fmt = "TRACE")]
    Trace = 0,
    #[display(fmt = "DEBUG")]
    Debug = 1,
    #[display(fmt = " INFO")]
    Info = 2,
    #[display(fmt = " WARN")]
    Warn = 3,
    #[display(fmt = "ERROR")]
    Error = 4,
}

/// Layer + unit that produced an entry
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum LogComponent {
    #[display(fmt = "DOM:{}", _0)]
    Domain(&'static str),
    #[display(fmt = "APP:{}", _0)]
    Application(&'static str),
    #[display(fmt = "INF:{}", _0)]
    Infrastructure(&'static str),
    #[display(fmt = "PRE:{}", _0)]
    Presentation(&'static str),
}

/// Structured log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: u64,
    pub level: LogLevel,
    pub component: LogComponent,
    pub message: String,
    pub metadata: Option<String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, component: LogComponent, message: &str) -> Self {
        Self {
            timestamp: get_time_provider().current_timestamp(),
            level,
            component,
            message: message.to_string(),
            metadata: None,
        }
    }

    pub fn new_with_metadata(
        level: LogLevel,
        component: LogComponent,
        message: &str,
        metadata: &str,
    ) -> Self {
        Self { metadata: Some(metadata.to_string()), ..Self::new(level, component, message) }
    }

    /// Single-line rendering shared by every sink.
    pub fn format_line(&self) -> String {
        let timestamp = get_time_provider().format_timestamp(self.timestamp);
        match &self.metadata {
            Some(metadata) => format!(
                "[{}] {} {} | {} | {}",
                timestamp, self.level, self.component, self.message, metadata
            ),
            None => format!("[{}] {} {} | {}", timestamp, self.level, self.component, self.message),
        }
    }
}

/// Source of wall-clock time for log entries
pub trait TimeProvider: Send + Sync {
    fn current_timestamp(&self) -> u64;
    fn format_timestamp(&self, timestamp: u64) -> String;
}

/// Sink for structured log entries
pub trait Logger: Send + Sync {
    fn log(&self, entry: LogEntry);

    fn trace(&self, component: LogComponent, message: &str) {
        self.log(LogEntry::new(LogLevel::Trace, component, message));
    }

    fn debug(&self, component: LogComponent, message: &str) {
        self.log(LogEntry::new(LogLevel::Debug, component, message));
    }

    fn info(&self, component: LogComponent, message: &str) {
        self.log(LogEntry::new(LogLevel::Info, component, message));
    }

    fn warn(&self, component: LogComponent, message: &str) {
        self.log(LogEntry::new(LogLevel::Warn, component, message));
    }

    fn error(&self, component: LogComponent, message: &str) {
        self.log(LogEntry::new(LogLevel::Error, component, message));
    }

    fn log_with_metadata(
        &self,
        level: LogLevel,
        component: LogComponent,
        message: &str,
        metadata: &str,
    ) {
        self.log(LogEntry::new_with_metadata(level, component, message, metadata));
    }
}

static GLOBAL_LOGGER: OnceLock<Box<dyn Logger + Sync + Send>> = OnceLock::new();
static GLOBAL_TIME_PROVIDER: OnceLock<Box<dyn TimeProvider + Sync + Send>> = OnceLock::new();

/// Install the process-wide logger. Only the first call wins.
pub fn init_logger(logger: Box<dyn Logger + Sync + Send>) {
    let _ = GLOBAL_LOGGER.set(logger);
}

/// Install the process-wide time provider. Only the first call wins.
pub fn init_time_provider(time_provider: Box<dyn TimeProvider + Sync + Send>) {
    let _ = GLOBAL_TIME_PROVIDER.set(time_provider);
}

pub fn get_logger() -> &'static dyn Logger {
    GLOBAL_LOGGER.get().map(|logger| logger.as_ref()).unwrap_or(&NoOpLogger)
}

pub fn get_time_provider() -> &'static dyn TimeProvider {
    GLOBAL_TIME_PROVIDER.get().map(|provider| provider.as_ref()).unwrap_or(&BasicTimeProvider)
}

struct NoOpLogger;
impl Logger for NoOpLogger {
    fn log(&self, _entry: LogEntry) {}
}

/// Monotonic counter; used natively and before the browser clock is installed.
struct BasicTimeProvider;
impl TimeProvider for BasicTimeProvider {
    fn current_timestamp(&self) -> u64 {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        COUNTER.fetch_add(1, Ordering::SeqCst)
    }

    fn format_timestamp(&self, timestamp: u64) -> String {
        format!("{:06}", timestamp)
    }
}

/// Keeps entries in memory, bounded to the most recent `capacity`.
pub struct MemoryLogger {
    min_level: LogLevel,
    capacity: usize,
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogger {
    pub fn new(min_level: LogLevel, capacity: usize) -> Self {
        Self { min_level, capacity, entries: Mutex::new(Vec::new()) }
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().map(|entries| entries.clone()).unwrap_or_default()
    }

    pub fn count_at(&self, level: LogLevel) -> usize {
        self.entries().iter().filter(|entry| entry.level == level).count()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
            let overflow = entries.len().saturating_sub(self.capacity);
            if overflow > 0 {
                entries.drain(..overflow);
            }
        }
    }
}

#[macro_export]
macro_rules! log_trace {
    ($component:expr, $($arg:tt)*) => {
        #[cfg(debug_assertions)]
        {
            $crate::domain::logging::get_logger().trace($component, &format!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! log_debug {
    ($component:expr, $($arg:tt)*) => {
        #[cfg(debug_assertions)]
        {
            $crate::domain::logging::get_logger().debug($component, &format!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($component:expr, $($arg:tt)*) => {
        #[cfg(debug_assertions)]
        {
            $crate::domain::logging::get_logger().info($component, &format!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($component:expr, $($arg:tt)*) => {
        $crate::domain::logging::get_logger().warn($component, &format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_error {
    ($component:expr, $($arg:tt)*) => {
        $crate::domain::logging::get_logger().error($component, &format!($($arg)*));
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn memory_logger_filters_and_bounds() {
        let logger = MemoryLogger::new(LogLevel::Info, 2);
        logger.debug(LogComponent::Domain("Test"), "dropped");
        logger.info(LogComponent::Domain("Test"), "first");
        logger.warn(LogComponent::Domain("Test"), "second");
        logger.error(LogComponent::Domain("Test"), "third");

        let messages: Vec<String> = logger.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["second".to_string(), "third".to_string()]);
    }

    #[test]
    fn level_parses_case_insensitively() {
        assert_eq!(LogLevel::from_str("warn").ok(), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_str("Debug").ok(), Some(LogLevel::Debug));
    }

    #[test]
    fn component_display_carries_layer_prefix() {
        assert_eq!(LogComponent::Application("Session").to_string(), "APP:Session");
    }
}
