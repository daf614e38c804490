//! Runtime failures.
//!
//! A runtime failure ends the run. It carries the text and position of the
//! token it happened at and converts into a runtime diagnostic.

use std::io;

use slang_ast::token::Token;
use slang_core::text::{LinePosition, TextSpan};
use slang_diagnostics::{messages, Diagnostic, DiagnosticMessage, SourceInfo};
use thiserror::Error;

/// The token a runtime failure is reported at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// The token's sanitized text.
    pub text: String,
    pub position: LinePosition,
    pub span: TextSpan,
}

impl Location {
    pub fn of(token: &Token<'_>) -> Self {
        Self {
            text: token.sanitized_text().into_owned(),
            position: token.position,
            span: token.span,
        }
    }
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Cannot convert '{value}' to '{target}'.")]
    InvalidConversion {
        value: String,
        target: &'static str,
        at: Location,
    },

    #[error("Division by zero.")]
    DivisionByZero { at: Location },

    #[error("Integer overflow.")]
    IntegerOverflow { at: Location },

    #[error("Function '{function}' ended without returning a value.")]
    MissingReturn { function: String, at: Location },

    #[error("Call depth exceeded the limit of {limit}.")]
    StackOverflow { limit: usize, at: Location },

    #[error("Variable '{name}' is used before its declaration runs.")]
    UninitializedVariable { name: String, at: Location },

    #[error("I/O failure: {source}.")]
    Io {
        #[source]
        source: io::Error,
        at: Location,
    },

    #[error("Operator '{operator}' received a value of type '{found}'.")]
    OperandMismatch {
        operator: String,
        found: &'static str,
        at: Location,
    },
}

impl RuntimeError {
    pub fn location(&self) -> &Location {
        match self {
            RuntimeError::InvalidConversion { at, .. }
            | RuntimeError::DivisionByZero { at }
            | RuntimeError::IntegerOverflow { at }
            | RuntimeError::MissingReturn { at, .. }
            | RuntimeError::StackOverflow { at, .. }
            | RuntimeError::UninitializedVariable { at, .. }
            | RuntimeError::Io { at, .. }
            | RuntimeError::OperandMismatch { at, .. } => at,
        }
    }

    fn message(&self) -> &'static DiagnosticMessage {
        match self {
            RuntimeError::InvalidConversion { .. } => &messages::INVALID_CONVERSION,
            RuntimeError::DivisionByZero { .. } => &messages::DIVISION_BY_ZERO,
            RuntimeError::IntegerOverflow { .. } => &messages::INTEGER_OVERFLOW,
            RuntimeError::MissingReturn { .. } => &messages::MISSING_RETURN,
            RuntimeError::StackOverflow { .. } => &messages::STACK_OVERFLOW,
            RuntimeError::UninitializedVariable { .. } => &messages::UNINITIALIZED_VARIABLE,
            RuntimeError::Io { .. } => &messages::IO_FAILURE,
            RuntimeError::OperandMismatch { .. } => &messages::OPERAND_MISMATCH,
        }
    }

    /// The runtime diagnostic for this failure, located in `file_name`.
    pub fn to_diagnostic(&self, file_name: &str) -> Diagnostic {
        let message = self.message();
        let at = self.location();
        Diagnostic {
            code: message.code,
            severity: message.severity,
            message: self.to_string(),
            source: Some(SourceInfo {
                file_name: file_name.to_string(),
                position: at.position,
                span: at.span,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slang_ast::syntax_kind::SyntaxKind;

    #[test]
    fn test_diagnostic_carries_code_and_position() {
        let token = Token::new(
            SyntaxKind::SlashToken,
            "/",
            TextSpan::new(6, 1),
            LinePosition::new(2, 6),
        );
        let error = RuntimeError::DivisionByZero {
            at: Location::of(&token),
        };
        let diagnostic = error.to_diagnostic("main.sl");
        assert_eq!(diagnostic.code.to_string(), "R0002");
        assert_eq!(diagnostic.message, "Division by zero.");
        let info = diagnostic.source.expect("located");
        assert_eq!(info.position, LinePosition::new(2, 6));
        assert_eq!(info.file_name, "main.sl");
        assert_eq!(error.location().text, "/");
    }

    #[test]
    fn test_message_matches_catalog_template() {
        let error = RuntimeError::InvalidConversion {
            value: "abc".to_string(),
            target: "int",
            at: Location {
                text: "abc".to_string(),
                position: LinePosition::default(),
                span: TextSpan::new(0, 3),
            },
        };
        let expected =
            slang_diagnostics::format_message(messages::INVALID_CONVERSION.message, &["abc", "int"]);
        assert_eq!(error.to_string(), expected);
    }
}
