//! slang_diagnostics: Diagnostic messages and the diagnostic sink.
//!
//! Every stage of the pipeline reports problems as [`Diagnostic`] values
//! into a [`DiagnosticCollection`] that the caller threads through by
//! `&mut`. Diagnostics are append-only: once reported they are never edited.

use slang_core::text::{LinePosition, SourceText, TextSpan};
use std::fmt;

/// How bad a diagnostic is. Only `Error` blocks execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Information,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Information => write!(f, "info"),
        }
    }
}

/// The pipeline stage a diagnostic code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Lexer,
    Parser,
    Binder,
    Runtime,
}

impl Stage {
    fn prefix(self) -> char {
        match self {
            Stage::Lexer => 'L',
            Stage::Parser => 'P',
            Stage::Binder => 'B',
            Stage::Runtime => 'R',
        }
    }
}

/// A stable diagnostic code such as `L0001` or `B0006`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiagnosticCode {
    pub stage: Stage,
    pub number: u16,
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:04}", self.stage.prefix(), self.number)
    }
}

/// A diagnostic template: a code, a severity and a message that may contain
/// `{0}`, `{1}`, ... placeholders.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticMessage {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: &'static str,
}

/// Where in the source a diagnostic points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    pub file_name: String,
    pub position: LinePosition,
    pub span: TextSpan,
}

/// A realized diagnostic with its message text resolved.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
    pub source: Option<SourceInfo>,
}

impl Diagnostic {
    /// A diagnostic that is not attached to any source location.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            code: message.code,
            severity: message.severity,
            message: format_message(message.message, args),
            source: None,
        }
    }

    /// A diagnostic pointing at `span` within `source`.
    pub fn with_source(
        source: &SourceText,
        span: TextSpan,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> Self {
        Self::with_info(
            SourceInfo {
                file_name: source.name().to_string(),
                position: source.line_position(span.start),
                span,
            },
            message,
            args,
        )
    }

    /// A diagnostic with an already computed location.
    pub fn with_info(info: SourceInfo, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            code: message.code,
            severity: message.severity,
            message: format_message(message.message, args),
            source: Some(info),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn span(&self) -> Option<TextSpan> {
        self.source.as_ref().map(|info| info.span)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref info) = self.source {
            write!(f, "{}:{}: ", info.file_name, info.position)?;
        }
        write!(f, "{} {}: {}", self.severity, self.code, self.message)
    }
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// The diagnostic sink of one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Sort by file and then by position. Stable, so diagnostics reported at
    /// the same offset keep the order in which the stages produced them.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            let a_key = a.source.as_ref().map(|i| (&i.file_name, i.span.start));
            let b_key = b.source.as_ref().map(|i| (&i.file_name, i.span.start));
            a_key.cmp(&b_key)
        });
    }
}

impl<'a> IntoIterator for &'a DiagnosticCollection {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($stage:ident $number:expr, $severity:ident, $msg:expr) => {
            DiagnosticMessage {
                code: DiagnosticCode { stage: Stage::$stage, number: $number },
                severity: Severity::$severity,
                message: $msg,
            }
        };
    }

    // ========================================================================
    // Lexer (L)
    // ========================================================================
    pub const INVALID_CHARACTER: DiagnosticMessage = diag!(Lexer 1, Error, "Encountered invalid character: '{0}'.");
    pub const INVALID_INTEGER: DiagnosticMessage = diag!(Lexer 2, Error, "'{0}' is not a valid integer.");
    pub const INVALID_DOUBLE: DiagnosticMessage = diag!(Lexer 3, Error, "'{0}' is not a valid floating-point number.");
    pub const UNTERMINATED_STRING: DiagnosticMessage = diag!(Lexer 4, Error, "Unterminated string; probably missing an end quote.");
    pub const UNTERMINATED_COMMENT: DiagnosticMessage = diag!(Lexer 5, Error, "Unterminated comment; probably missing '*/'.");
    pub const UNEXPECTED_END_OF_COMMENT: DiagnosticMessage = diag!(Lexer 6, Error, "Unexpected end of comment: nested comments are not supported.");

    // ========================================================================
    // Parser (P)
    // ========================================================================
    pub const UNEXPECTED_TOKEN: DiagnosticMessage = diag!(Parser 1, Error, "Unexpected token '{0}' ({1}); expected {2}.");
    pub const NESTED_TOO_DEEPLY: DiagnosticMessage = diag!(Parser 2, Error, "Expression or statement nested too deeply.");

    // ========================================================================
    // Binder (B)
    // ========================================================================
    pub const UNDEFINED_VARIABLE: DiagnosticMessage = diag!(Binder 1, Error, "Undefined variable '{0}'.");
    pub const NO_APPLICABLE_BINARY_OPERATOR: DiagnosticMessage = diag!(Binder 2, Error, "Operator '{0}' cannot be applied to operands of type '{1}' and '{2}'.");
    pub const NO_APPLICABLE_UNARY_OPERATOR: DiagnosticMessage = diag!(Binder 3, Error, "Operator '{0}' cannot be applied to an operand of type '{1}'.");
    pub const ALREADY_DECLARED: DiagnosticMessage = diag!(Binder 4, Error, "{0} '{1}' is already declared in this scope.");
    pub const UNDEFINED_TYPE: DiagnosticMessage = diag!(Binder 5, Error, "Undefined type '{0}'.");
    pub const DUPLICATE_OVERLOAD: DiagnosticMessage = diag!(Binder 6, Error, "Function '{0}' is already declared with the signature ({1}).");
    pub const NO_MATCHING_OVERLOAD: DiagnosticMessage = diag!(Binder 7, Error, "No overload of '{0}' accepts arguments ({1}).");
    pub const UNDEFINED_FUNCTION: DiagnosticMessage = diag!(Binder 8, Error, "Undefined function '{0}'.");
    pub const CANNOT_CONVERT: DiagnosticMessage = diag!(Binder 9, Error, "Cannot convert type '{0}' to '{1}'.");
    pub const EXPLICIT_CONVERSION_REQUIRED: DiagnosticMessage = diag!(Binder 10, Error, "Cannot implicitly convert type '{0}' to '{1}'; an explicit conversion exists.");
    pub const PARAMETER_ALREADY_DECLARED: DiagnosticMessage = diag!(Binder 11, Error, "Parameter '{0}' is already declared.");
    pub const CANNOT_ASSIGN_READ_ONLY: DiagnosticMessage = diag!(Binder 12, Error, "Cannot assign to read-only variable '{0}'.");
    pub const CONSTANT_REQUIRES_INITIALIZER: DiagnosticMessage = diag!(Binder 13, Error, "Constant '{0}' must be initialized.");
    pub const VARIABLE_REQUIRES_TYPE: DiagnosticMessage = diag!(Binder 14, Error, "Variable '{0}' needs a type annotation or an initializer.");
    pub const VOID_VARIABLE: DiagnosticMessage = diag!(Binder 15, Error, "'{0}' cannot be of type 'void'.");
    pub const RETURN_OUTSIDE_FUNCTION: DiagnosticMessage = diag!(Binder 16, Error, "'return' is only valid inside a function.");
    pub const RETURN_VALUE_EXPECTED: DiagnosticMessage = diag!(Binder 17, Error, "Function '{0}' must return a value of type '{1}'.");
    pub const RETURN_VALUE_UNEXPECTED: DiagnosticMessage = diag!(Binder 18, Error, "Function '{0}' does not return a value.");
    pub const EXPRESSION_MUST_HAVE_VALUE: DiagnosticMessage = diag!(Binder 19, Error, "Expression must have a value.");
    pub const UNDEFINED_LABEL: DiagnosticMessage = diag!(Binder 20, Error, "Undefined label '{0}'.");
    pub const CONVERSION_TAKES_ONE_ARGUMENT: DiagnosticMessage = diag!(Binder 21, Error, "Conversion to '{0}' takes exactly one argument.");
    pub const UNUSED_EXPRESSION_VALUE: DiagnosticMessage = diag!(Binder 22, Warning, "The value of this expression is never used.");

    // ========================================================================
    // Runtime (R)
    // ========================================================================
    pub const INVALID_CONVERSION: DiagnosticMessage = diag!(Runtime 1, Error, "Cannot convert '{0}' to '{1}'.");
    pub const DIVISION_BY_ZERO: DiagnosticMessage = diag!(Runtime 2, Error, "Division by zero.");
    pub const INTEGER_OVERFLOW: DiagnosticMessage = diag!(Runtime 3, Error, "Integer overflow.");
    pub const MISSING_RETURN: DiagnosticMessage = diag!(Runtime 4, Error, "Function '{0}' ended without returning a value.");
    pub const STACK_OVERFLOW: DiagnosticMessage = diag!(Runtime 5, Error, "Call depth exceeded the limit of {0}.");
    pub const UNINITIALIZED_VARIABLE: DiagnosticMessage = diag!(Runtime 6, Error, "Variable '{0}' is used before its declaration runs.");
    pub const IO_FAILURE: DiagnosticMessage = diag!(Runtime 7, Error, "I/O failure: {0}.");
    pub const OPERAND_MISMATCH: DiagnosticMessage = diag!(Runtime 8, Error, "Operator '{0}' received a value of type '{1}'.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        let result = format_message("Cannot convert type '{0}' to '{1}'.", &["string", "int"]);
        assert_eq!(result, "Cannot convert type 'string' to 'int'.");
    }

    #[test]
    fn test_code_display() {
        assert_eq!(messages::INVALID_CHARACTER.code.to_string(), "L0001");
        assert_eq!(messages::UNEXPECTED_TOKEN.code.to_string(), "P0001");
        assert_eq!(messages::NO_MATCHING_OVERLOAD.code.to_string(), "B0007");
        assert_eq!(messages::DIVISION_BY_ZERO.code.to_string(), "R0002");
    }

    #[test]
    fn test_with_source_computes_position() {
        let source = SourceText::new("main.sl", "var x = 1;\n@");
        let diagnostic = Diagnostic::with_source(
            &source,
            TextSpan::new(11, 1),
            &messages::INVALID_CHARACTER,
            &["@"],
        );
        let info = diagnostic.source.as_ref().expect("source info");
        assert_eq!(info.position, LinePosition::new(1, 0));
        assert_eq!(
            diagnostic.to_string(),
            "main.sl:2:1: error L0001: Encountered invalid character: '@'."
        );
    }

    #[test]
    fn test_warnings_do_not_count_as_errors() {
        let mut collection = DiagnosticCollection::new();
        collection.add(Diagnostic::new(&messages::UNUSED_EXPRESSION_VALUE, &[]));
        assert!(!collection.has_errors());
        collection.add(Diagnostic::new(&messages::DIVISION_BY_ZERO, &[]));
        assert!(collection.has_errors());
        assert_eq!(collection.error_count(), 1);
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_diagnostic_collection_sort() {
        let source = SourceText::new("a.sl", "0123456789abc");
        let mut collection = DiagnosticCollection::new();
        collection.add(Diagnostic::with_source(&source, TextSpan::new(10, 1), &messages::UNDEFINED_VARIABLE, &["y"]));
        collection.add(Diagnostic::with_source(&source, TextSpan::new(2, 1), &messages::INVALID_CHARACTER, &["2"]));
        collection.add(Diagnostic::new(&messages::IO_FAILURE, &["closed"]));
        collection.sort();
        let codes: Vec<String> = collection.iter().map(|d| d.code.to_string()).collect();
        assert_eq!(codes, vec!["R0007", "L0001", "B0001"]);
    }
}
