//! Common error infrastructure for datatable-core.
//!
//! This module provides the shared classification used across every error type
//! in the crate. Component-specific errors (e.g. `SchemaError`, `EncodeError`,
//! `DecodeError`) are defined next to the component that raises them.
//!
//! # Design Principles
//!
//! - **Structured, not logged**: the core never logs; every failure comes back as
//!   a value carrying the table/column identity and the offending raw text
//! - **Severity Classification**: callers decide whether a build can continue
//!   from [`ErrorSeverity`], not from the variant name
//! - **Stable codes**: every variant maps to a static `error_code()` string

/// Severity level of an error.
///
/// - **Recoverable**: the encoder may substitute a configured default and continue
/// - **Validation**: the input (or a lookup against it) is wrong; the caller should
///   fix the data, nothing was produced
/// - **Fatal**: the table build or load is aborted; any partial output is invalid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// A cell failed to parse but a default value may stand in for it.
    Recoverable,

    /// Invalid input or lookup; nothing was produced.
    Validation,

    /// The whole table build or load is aborted.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error aborts the table.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Common trait for all datatable-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Carry enough context (row, column name, type keyword, raw text) for the
///   caller to produce an actionable log line
pub trait TableError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_helpers() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Recoverable.is_fatal());
        assert!(ErrorSeverity::Fatal.is_fatal());
        assert_eq!(ErrorSeverity::Validation.as_str(), "validation");
    }
}
