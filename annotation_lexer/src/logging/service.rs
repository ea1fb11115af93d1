//! Logging service and sinks

use super::codes::Code;
use super::config;
use super::events::{LogEvent, LogLevel};
use crate::config::compile_time::logging::LOG_BUFFER_SIZE;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Applies the minimum level before handing events to a sink
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Json,
}

/// Writes one line per event to stderr
pub struct ConsoleLogger {
    format: OutputFormat,
}

impl ConsoleLogger {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    fn render(&self, event: &LogEvent) -> String {
        match self.format {
            OutputFormat::Plain => event.format(),
            OutputFormat::Json => event.format_json().unwrap_or_else(|_| event.format()),
        }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        eprintln!("{}", self.render(event));
    }
}

/// Keeps the most recent `LOG_BUFFER_SIZE` events for inspection
#[derive(Default)]
pub struct MemoryLogger {
    events: Mutex<VecDeque<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEvent>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn events_with_code(&self, code: Code) -> Vec<LogEvent> {
        self.lock()
            .iter()
            .filter(|e| e.code == code)
            .cloned()
            .collect()
    }

    pub fn has_error_with_code(&self, code: Code) -> bool {
        self.lock().iter().any(|e| e.is_error() && e.code == code)
    }

    pub fn has_success_with_code(&self, code: Code) -> bool {
        self.lock().iter().any(|e| e.is_success() && e.code == code)
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        let mut events = self.lock();
        if events.len() >= LOG_BUFFER_SIZE {
            events.pop_front();
        }
        events.push_back(event.clone());
    }
}

/// Service built from the runtime logging preferences. Events go to stderr
/// when console logging is enabled and are buffered in memory otherwise.
pub fn create_configured_service() -> LoggingService {
    let min_level = config::get_min_log_level();
    let logger: Arc<dyn Logger> = if !config::use_console_logging() {
        Arc::new(MemoryLogger::new())
    } else if config::use_structured_logging() {
        Arc::new(ConsoleLogger::new(OutputFormat::Json))
    } else {
        Arc::new(ConsoleLogger::new(OutputFormat::Plain))
    };
    LoggingService::new(logger, min_level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_memory_logger() {
        let logger = MemoryLogger::new();
        assert!(logger.is_empty());

        logger.log(&LogEvent::debug("scanning"));
        logger.log(&LogEvent::error(codes::lexical::UNALIGNED_POSITION, "Bad rewind"));

        assert_eq!(logger.len(), 2);
        assert!(logger.has_error_with_code(codes::lexical::UNALIGNED_POSITION));
        assert!(!logger.has_success_with_code(codes::lexical::UNALIGNED_POSITION));

        logger.clear();
        assert!(logger.is_empty());
    }

    #[test]
    fn test_memory_logger_drops_oldest_when_full() {
        let logger = MemoryLogger::new();
        for i in 0..=LOG_BUFFER_SIZE {
            logger.log(&LogEvent::debug(&i.to_string()));
        }

        let events = logger.events();
        assert_eq!(events.len(), LOG_BUFFER_SIZE);
        assert_eq!(events[0].message, "1");
    }

    #[test]
    fn test_service_filters_by_level() {
        let memory = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(memory.clone(), LogLevel::Info);

        service.log_event(LogEvent::debug("dropped"));
        service.log_event(LogEvent::success(codes::success::TOKENIZATION_COMPLETE, "kept"));
        service.log_event(LogEvent::error(codes::system::INTERNAL_ERROR, "kept"));

        assert_eq!(memory.len(), 2);
        assert_eq!(
            memory
                .events_with_code(codes::success::TOKENIZATION_COMPLETE)
                .len(),
            1
        );
        assert!(!service.should_log(LogLevel::Debug));
    }

    #[test]
    fn test_console_rendering() {
        let event = LogEvent::error(codes::tokenizer::INVALID_PATTERN, "bad pattern");

        let plain = ConsoleLogger::new(OutputFormat::Plain).render(&event);
        assert_eq!(plain, "[ERROR] E021 - bad pattern");

        let json = ConsoleLogger::new(OutputFormat::Json).render(&event);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["code"], "E021");
    }
}
