//! Diagnostic codes for the annotation lexer
//!
//! Every error code the crate can emit is listed in [`REGISTRY`] together with
//! its category and severity. Success codes are not registered.

use std::fmt;

/// Code attached to every log event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Registry entry, if this is a registered error code
    pub fn info(&self) -> Option<&'static CodeInfo> {
        REGISTRY.iter().find(|info| info.code == *self)
    }

    /// Registered category, or one derived from the code prefix
    pub fn category(&self) -> &'static str {
        if let Some(info) = self.info() {
            return info.category;
        }
        match self.0.as_bytes().first() {
            Some(b'I') => "Success",
            Some(b'W') => "Warning",
            Some(b'D') => "Debug",
            _ => "Unknown",
        }
    }

    /// Unregistered codes are treated as recoverable
    pub fn is_recoverable(&self) -> bool {
        self.info().map_or(true, |info| info.recoverable)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical,
    High,
    Medium,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
        }
    }
}

#[derive(Debug)]
pub struct CodeInfo {
    pub code: Code,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
}

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

pub mod config {
    use super::Code;

    pub const INVALID_RUNTIME_CONFIG: Code = Code::new("E010");
}

/// Lexer session errors
pub mod lexical {
    use super::Code;

    pub const UNALIGNED_POSITION: Code = Code::new("E020");
}

/// Tokenizer construction errors
pub mod tokenizer {
    use super::Code;

    pub const INVALID_PATTERN: Code = Code::new("E021");
    pub const EMPTY_PATTERN_TABLE: Code = Code::new("E022");
}

pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const TOKENIZER_COMPILED: Code = Code::new("I021");
}

pub static REGISTRY: &[CodeInfo] = &[
    CodeInfo {
        code: system::INTERNAL_ERROR,
        category: "System",
        severity: Severity::Critical,
        recoverable: false,
        description: "The built-in annotation grammar failed to compile",
    },
    CodeInfo {
        code: system::INITIALIZATION_FAILURE,
        category: "System",
        severity: Severity::High,
        recoverable: false,
        description: "Logging initialization failed",
    },
    CodeInfo {
        code: config::INVALID_RUNTIME_CONFIG,
        category: "Configuration",
        severity: Severity::Medium,
        recoverable: true,
        description: "Runtime configuration file could not be read or parsed",
    },
    CodeInfo {
        code: lexical::UNALIGNED_POSITION,
        category: "Lexical",
        severity: Severity::Medium,
        recoverable: true,
        description: "Rewind offset is not the start of a scanned token",
    },
    CodeInfo {
        code: tokenizer::INVALID_PATTERN,
        category: "Tokenizer",
        severity: Severity::High,
        recoverable: true,
        description: "A tokenizer pattern is not valid regex syntax",
    },
    CodeInfo {
        code: tokenizer::EMPTY_PATTERN_TABLE,
        category: "Tokenizer",
        severity: Severity::High,
        recoverable: true,
        description: "A tokenizer needs at least one catchable pattern",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_registered_once() {
        let errors = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            config::INVALID_RUNTIME_CONFIG,
            lexical::UNALIGNED_POSITION,
            tokenizer::INVALID_PATTERN,
            tokenizer::EMPTY_PATTERN_TABLE,
        ];

        for code in errors {
            let count = REGISTRY.iter().filter(|info| info.code == code).count();
            assert_eq!(count, 1, "{} registered {} times", code, count);
        }
        assert_eq!(REGISTRY.len(), errors.len());
    }

    #[test]
    fn test_classification() {
        let info = system::INTERNAL_ERROR.info().unwrap();
        assert_eq!(info.severity, Severity::Critical);
        assert!(!system::INTERNAL_ERROR.is_recoverable());
        assert!(lexical::UNALIGNED_POSITION.is_recoverable());
        assert_eq!(tokenizer::INVALID_PATTERN.category(), "Tokenizer");
    }

    #[test]
    fn test_unregistered_codes_fall_back_by_prefix() {
        assert!(success::TOKENIZATION_COMPLETE.info().is_none());
        assert_eq!(success::TOKENIZATION_COMPLETE.category(), "Success");
        assert_eq!(Code::new("D000").category(), "Debug");
        assert_eq!(Code::new("X999").category(), "Unknown");
    }
}
