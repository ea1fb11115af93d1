//! Global logging for the annotation lexer
//!
//! A process-wide [`LoggingService`] plus a per-thread source label naming the
//! docblock being lexed. Until [`init_global_logging`] (or
//! [`init_global_logging_with_service`]) runs, every macro is a no-op.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, OutputFormat};

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static SOURCE_CONTEXT: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Install the service described by the runtime logging preferences
pub fn init_global_logging() -> Result<(), String> {
    if let Err(e) = config::validate_config() {
        safe_log_critical(codes::system::INITIALIZATION_FAILURE, &e);
        return Err(format!("Configuration validation failed: {}", e));
    }

    let logging_service = Arc::new(service::create_configured_service());
    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized")?;

    logging_service.log_event(
        LogEvent::success(
            codes::success::SYSTEM_INITIALIZATION_COMPLETED,
            "Global logging system initialized",
        )
        .with_context("limits", &crate::config::build_info::source_info()),
    );
    Ok(())
}

pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// Run `f` with `label` (e.g. `App\Entity\User::$email`) attached as
/// `source` to every event it logs on this thread
pub fn with_source_context<F, R>(label: impl Into<String>, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = SOURCE_CONTEXT.with(|ctx| ctx.replace(Some(label.into())));
    let result = f();
    SOURCE_CONTEXT.with(|ctx| ctx.replace(previous));
    result
}

pub fn current_source_context() -> Option<String> {
    SOURCE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// Attach context pairs and the source label, then log. Used by the macros.
pub fn emit(event: LogEvent, context: &[(&str, String)]) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };
    if !logger.should_log(event.level) {
        return;
    }

    let mut event = context
        .iter()
        .fold(event, |event, (key, value)| event.with_context(key, value));
    if let Some(source) = current_source_context() {
        event = event.with_context("source", &source);
    }
    logger.log_event(event);
}

/// Log to the global service if present; always echo to stderr
pub fn safe_log_critical(code: Code, message: &str) {
    emit(LogEvent::error(code, message), &[]);
    eprintln!("CRITICAL ERROR [{}]: {}", code, message);
}
