//!
//! ****************************************************************************************
//! ** ERROR RULES FOR THE TRANSITION CORE (`err_msg!`)                                  **
//! ****************************************************************************************
//!
//! # Overview
//!
//! Every failure the transition core can report is a variant of [`ParserError`]. The enum is
//! `miette`-based so a driver can render it as a diagnostic, and `thiserror`-based so it
//! composes with `?` everywhere else.
//!
//! # What is and is not an error
//!
//! - **Illegal transitions are not errors.** A constraint violation or a shape mismatch is an
//!   ordinary `is_legal == false` outcome. Drivers see those constantly.
//! - **Empty-structure access is a bug.** It only happens when `apply` was called without
//!   checking `is_legal` first. It is fatal for that derivation, never for the process.
//! - **Resource bounds are signals.** `UnaryChainTooLong` and `ResourceExhausted` tell the
//!   driver to abandon a hypothesis or a sentence.
//!
//! # Constructing errors
//!
//! - Use `err_msg!` for the message-only variants (`InvalidArgument`, `Config`, `Internal`).
//!   - `err_msg!(Internal, "stack lost {} trees", n)`
//! - Construct the structured variants directly; their fields are the diagnostic.
//!
//! ****************************************************************************************

use miette::Diagnostic;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Type-safe classification of [`ParserError`] variants, for drivers that only need to
/// decide whether to drop a hypothesis or give up on the sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// The derivation is corrupt and must be dropped.
    Derivation,
    /// A resource bound was hit; the driver should stop expanding.
    Resource,
    /// Caller-supplied input (strings, patterns, config) was malformed.
    Input,
    /// Internal invariant broken.
    Internal,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Derivation => "Derivation",
            ErrorType::Resource => "Resource",
            ErrorType::Input => "Input",
            ErrorType::Internal => "Internal",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unified error type for the transition core.
#[derive(Debug, Error, Diagnostic)]
pub enum ParserError {
    #[error("cannot {operation} an empty stack")]
    #[diagnostic(
        code(shiftreduce::stack::empty),
        help("`apply` must only be called after `is_legal` returned true")
    )]
    EmptyStructure { operation: &'static str },

    #[error("invalid argument: {message}")]
    #[diagnostic(code(shiftreduce::argument))]
    InvalidArgument { message: String },

    #[error("cannot parse transition from '{input}'")]
    #[diagnostic(
        code(shiftreduce::transition::syntax),
        help("expected Shift, Finalize, or e.g. LeftUnary(NP), RightBinary*(S), LeftBinaryRemoveUnary(S)")
    )]
    InvalidTransition { input: String },

    #[error("invalid label pattern '{pattern}'")]
    #[diagnostic(code(shiftreduce::constraint::pattern))]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("transition {transition} is not legal at step {step}")]
    #[diagnostic(code(shiftreduce::derivation::illegal))]
    IllegalTransition { transition: String, step: usize },

    #[error("unary chain longer than {limit} links")]
    #[diagnostic(
        code(shiftreduce::resource::unary_chain),
        help("raise `max_unary_chain` or check the tree for cycles")
    )]
    UnaryChainTooLong { limit: usize },

    #[error("derivation reached the transition budget of {limit}")]
    #[diagnostic(code(shiftreduce::resource::budget))]
    ResourceExhausted { limit: usize },

    #[error("configuration error: {message}")]
    #[diagnostic(code(shiftreduce::config))]
    Config { message: String },

    #[error("internal error: {message}")]
    #[diagnostic(code(shiftreduce::internal))]
    Internal { message: String },
}

impl ParserError {
    /// Returns the classification for this error.
    pub fn error_type(&self) -> ErrorType {
        match self {
            ParserError::EmptyStructure { .. } | ParserError::IllegalTransition { .. } => {
                ErrorType::Derivation
            }
            ParserError::UnaryChainTooLong { .. } | ParserError::ResourceExhausted { .. } => {
                ErrorType::Resource
            }
            ParserError::InvalidArgument { .. }
            | ParserError::InvalidTransition { .. }
            | ParserError::InvalidPattern { .. }
            | ParserError::Config { .. } => ErrorType::Input,
            ParserError::Internal { .. } => ErrorType::Internal,
        }
    }
}

/// Constructs a message-only `ParserError` variant with a formatted message.
#[macro_export]
macro_rules! err_msg {
    ($variant:ident, $msg:expr, $($arg:expr),+ $(,)?) => {
        $crate::ParserError::$variant {
            message: format!($msg, $($arg),+),
        }
    };
    ($variant:ident, $msg:expr) => {
        $crate::ParserError::$variant {
            message: format!("{}", $msg),
        }
    };
}

#[cfg(test)]
mod diagnostics_tests {
    use miette::Report;

    use super::*;

    #[test]
    fn test_err_msg_formats_arguments() {
        let err = crate::err_msg!(Internal, "lost {} of {} trees", 2, 5);
        assert_eq!(err.to_string(), "internal error: lost 2 of 5 trees");
        assert_eq!(err.error_type(), ErrorType::Internal);
    }

    #[test]
    fn test_report_includes_help() {
        let err = ParserError::EmptyStructure { operation: "pop" };
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("cannot pop an empty stack"));
        assert!(output.contains("is_legal"));
    }

    #[test]
    fn test_error_classification() {
        assert_eq!(
            ParserError::ResourceExhausted { limit: 4 }.error_type(),
            ErrorType::Resource
        );
        assert_eq!(
            ParserError::InvalidTransition { input: "Jump".into() }.error_type(),
            ErrorType::Input
        );
        assert_eq!(ErrorType::Derivation.to_string(), "Derivation");
    }
}
