//! Logging macros taking `"key" => value` context pairs
//!
//! Values may be any `Display` type. They are only formatted when the global
//! logger accepts the event's level.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_with_level {
    ($level:expr, $event:expr $(, $key:expr => $value:expr)*) => {
        if $crate::logging::try_get_global_logger()
            .is_some_and(|logger| logger.should_log($level))
        {
            $crate::logging::emit($event, &[$(($key, format!("{}", $value))),*]);
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__log_with_level!(
            $crate::logging::LogLevel::Error,
            $crate::logging::LogEvent::error($code, $message)
            $(, $key => $value)*
        )
    };
}

/// Info-level event with a success code
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__log_with_level!(
            $crate::logging::LogLevel::Info,
            $crate::logging::LogEvent::success($code, $message)
            $(, $key => $value)*
        )
    };
}

#[macro_export]
macro_rules! log_debug {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__log_with_level!(
            $crate::logging::LogLevel::Debug,
            $crate::logging::LogEvent::debug($message)
            $(, $key => $value)*
        )
    };
}
