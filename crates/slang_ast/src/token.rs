use std::borrow::Cow;
use std::fmt;

use slang_core::text::{LinePosition, TextSpan};

use crate::syntax_kind::SyntaxKind;

/// The decoded value of a literal token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralValue<'src> {
    Int(i64),
    Double(f64),
    Bool(bool),
    /// String content with its escape sequences kept verbatim.
    Str(&'src str),
}

/// A token borrowed from the source text.
///
/// Tokens are created only by the lexer, except for the zero-width tokens the
/// parser synthesizes when an expected token is missing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'src> {
    pub kind: SyntaxKind,
    /// The raw source slice.
    pub text: &'src str,
    pub value: Option<LiteralValue<'src>>,
    pub span: TextSpan,
    pub position: LinePosition,
}

impl<'src> Token<'src> {
    pub fn new(kind: SyntaxKind, text: &'src str, span: TextSpan, position: LinePosition) -> Self {
        Self {
            kind,
            text,
            value: None,
            span,
            position,
        }
    }

    pub fn with_value(mut self, value: LiteralValue<'src>) -> Self {
        self.value = Some(value);
        self
    }

    /// A zero-width token standing in for one the parser expected but did not find.
    pub fn missing(kind: SyntaxKind, at: TextSpan, position: LinePosition) -> Self {
        Self::new(kind, "", TextSpan::empty(at.start), position)
    }

    /// Whether the parser synthesized this token.
    pub fn is_missing(&self) -> bool {
        self.span.is_empty()
            && !matches!(
                self.kind,
                SyntaxKind::EndOfFileToken | SyntaxKind::StringLiteral
            )
    }

    /// The raw text with control characters made visible, for messages.
    pub fn sanitized_text(&self) -> Cow<'src, str> {
        sanitize(self.text)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @{}: '{}'", self.kind, self.span.start, self.sanitized_text())
    }
}

/// Replace TAB, CR, LF and NUL with their escaped spelling.
pub fn sanitize(text: &str) -> Cow<'_, str> {
    if !text.contains(['\t', '\r', '\n', '\0']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 4);
    for c in text.chars() {
        match c {
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\0' => out.push_str("\\0"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
