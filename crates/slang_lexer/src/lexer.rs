//! The slang lexer.
//!
//! `Lexer` is a lazy iterator over the tokens of a [`SourceText`]. It borrows
//! the source, so every token's text is a slice of the original input.

use std::collections::VecDeque;

use slang_ast::syntax_kind::SyntaxKind;
use slang_ast::token::{sanitize, LiteralValue, Token};
use slang_core::text::{SourceText, TextPos, TextSpan};
use slang_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use tracing::{debug, trace};

use crate::char_codes::*;

/// Lex a whole source, reporting into `diagnostics`.
pub fn lex<'a>(source: &'a SourceText, diagnostics: &mut DiagnosticCollection) -> Vec<Token<'a>> {
    let mut lexer = Lexer::new(source);
    let tokens: Vec<Token<'a>> = lexer.by_ref().collect();
    debug!(count = tokens.len(), file = source.name(), "lexed");
    diagnostics.extend(lexer.take_diagnostics());
    tokens
}

pub struct Lexer<'a> {
    source: &'a SourceText,
    text: &'a str,
    /// Byte offset of the next character.
    pos: usize,
    /// Start of the token being scanned.
    token_start: usize,
    /// Tokens already scanned but not yet handed out (string literal parts).
    pending: VecDeque<Token<'a>>,
    finished: bool,
    diagnostics: DiagnosticCollection,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a SourceText) -> Self {
        let text = source.text();
        let pos = if text.starts_with(BYTE_ORDER_MARK) {
            BYTE_ORDER_MARK.len_utf8()
        } else {
            0
        };
        Self {
            source,
            text,
            pos,
            token_start: pos,
            pending: VecDeque::new(),
            finished: false,
            diagnostics: DiagnosticCollection::new(),
        }
    }

    /// Take the accumulated diagnostics, leaving an empty collection.
    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    // ========================================================================
    // Character access
    // ========================================================================

    #[inline]
    fn current_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    /// The character after the current one.
    #[inline]
    fn peek_char(&self) -> Option<char> {
        let mut chars = self.text[self.pos..].chars();
        chars.next();
        chars.next()
    }

    #[inline]
    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.pos += ch.len_utf8();
        }
    }

    #[inline]
    fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn current_span(&self) -> TextSpan {
        TextSpan::from_bounds(self.token_start as TextPos, self.pos as TextPos)
    }

    fn make_token(&self, kind: SyntaxKind) -> Token<'a> {
        let span = self.current_span();
        Token::new(
            kind,
            &self.text[self.token_start..self.pos],
            span,
            self.source.line_position(span.start),
        )
    }

    fn error(&mut self, span: TextSpan, message: &DiagnosticMessage, args: &[&str]) {
        self.diagnostics
            .add(Diagnostic::with_source(self.source, span, message, args));
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    /// Skip whitespace, line breaks and comments.
    fn skip_trivia(&mut self) {
        while let Some(ch) = self.current_char() {
            match ch {
                '/' if self.peek_char() == Some('/') => {
                    let rest = &self.text[self.pos..];
                    self.pos += rest.find(is_line_break).unwrap_or(rest.len());
                }
                '/' if self.peek_char() == Some('*') => self.skip_block_comment(),
                '*' if self.peek_char() == Some('/') => {
                    let span = TextSpan::new(self.pos as TextPos, 2);
                    self.error(span, &messages::UNEXPECTED_END_OF_COMMENT, &[]);
                    self.pos += 2;
                }
                c if is_line_break(c) || is_white_space_single_line(c) => self.advance(),
                _ => return,
            }
        }
    }

    fn skip_block_comment(&mut self) {
        let start = self.pos;
        let body = &self.text.as_bytes()[start + 2..];
        match memchr::memmem::find(body, b"*/") {
            Some(offset) => self.pos = start + 2 + offset + 2,
            None => {
                self.pos = self.text.len();
                let span = TextSpan::from_bounds(start as TextPos, self.pos as TextPos);
                self.error(span, &messages::UNTERMINATED_COMMENT, &[]);
            }
        }
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    fn scan(&mut self) -> Token<'a> {
        self.skip_trivia();
        self.token_start = self.pos;

        let Some(ch) = self.current_char() else {
            return self.make_token(SyntaxKind::EndOfFileToken);
        };

        let kind = match ch {
            '(' => self.single(SyntaxKind::OpenParenToken),
            ')' => self.single(SyntaxKind::CloseParenToken),
            '{' => self.single(SyntaxKind::OpenBraceToken),
            '}' => self.single(SyntaxKind::CloseBraceToken),
            ',' => self.single(SyntaxKind::CommaToken),
            ':' => self.single(SyntaxKind::ColonToken),
            ';' => self.single(SyntaxKind::SemicolonToken),
            '+' => self.single(SyntaxKind::PlusToken),
            '-' => self.single(SyntaxKind::MinusToken),
            '*' => self.single(SyntaxKind::AsteriskToken),
            '/' => self.single(SyntaxKind::SlashToken),
            '=' => self.with_equals(SyntaxKind::EqualsToken, SyntaxKind::EqualsEqualsToken),
            '!' => self.with_equals(SyntaxKind::ExclamationToken, SyntaxKind::ExclamationEqualsToken),
            '<' => self.with_equals(SyntaxKind::LessThanToken, SyntaxKind::LessThanEqualsToken),
            '>' => self.with_equals(SyntaxKind::GreaterThanToken, SyntaxKind::GreaterThanEqualsToken),
            '&' if self.peek_char() == Some('&') => {
                self.pos += 2;
                SyntaxKind::AmpersandAmpersandToken
            }
            '|' if self.peek_char() == Some('|') => {
                self.pos += 2;
                SyntaxKind::BarBarToken
            }
            '"' => return self.scan_string_literal(),
            '0'..='9' => return self.scan_number(),
            _ if is_identifier_start(ch) => return self.scan_identifier(),
            _ => {
                self.advance();
                let span = self.current_span();
                let text = ch.to_string();
                self.error(span, &messages::INVALID_CHARACTER, &[&sanitize(&text)]);
                SyntaxKind::InvalidToken
            }
        };

        self.make_token(kind)
    }

    #[inline]
    fn single(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.pos += 1;
        kind
    }

    /// `op` or `op=`.
    fn with_equals(&mut self, plain: SyntaxKind, with_equals: SyntaxKind) -> SyntaxKind {
        if self.peek_char() == Some('=') {
            self.pos += 2;
            with_equals
        } else {
            self.pos += 1;
            plain
        }
    }

    // ========================================================================
    // String literals
    // ========================================================================

    /// Produces the opening quote, the content and (if present) the closing
    /// quote as three tokens. Escapes are kept verbatim in the content.
    fn scan_string_literal(&mut self) -> Token<'a> {
        let quote_start = self.pos;
        self.pos += 1;
        let open_quote = self.make_token(SyntaxKind::DoubleQuoteToken);

        self.token_start = self.pos;
        let mut terminated = false;
        while let Some(ch) = self.current_char() {
            if is_line_break(ch) {
                break;
            }
            if ch == '"' {
                terminated = true;
                break;
            }
            self.advance();
            if ch == '\\' {
                match self.current_char() {
                    Some(next) if !is_line_break(next) => self.advance(),
                    _ => {}
                }
            }
        }

        let content = self.make_token(SyntaxKind::StringLiteral);
        self.pending
            .push_back(content.with_value(LiteralValue::Str(content.text)));

        if terminated {
            self.token_start = self.pos;
            self.pos += 1;
            let close_quote = self.make_token(SyntaxKind::DoubleQuoteToken);
            self.pending.push_back(close_quote);
        } else {
            let span = TextSpan::from_bounds(quote_start as TextPos, self.pos as TextPos);
            self.error(span, &messages::UNTERMINATED_STRING, &[]);
        }

        open_quote
    }

    // ========================================================================
    // Numbers
    // ========================================================================

    fn scan_number(&mut self) -> Token<'a> {
        if self.current_char() == Some('0') {
            let radix = match self.peek_char() {
                Some('x') | Some('X') => Some(16),
                Some('b') | Some('B') => Some(2),
                Some('o') | Some('O') => Some(8),
                _ => None,
            };
            if let Some(radix) = radix {
                return self.scan_prefixed_integer(radix);
            }
        }

        self.scan_digits(is_digit);
        let mut is_double = false;

        // A digit after the dot makes it a fraction; otherwise the dot is
        // left for the next token.
        if self.current_char() == Some('.') && self.peek_char().map_or(false, is_digit) {
            self.pos += 1;
            self.scan_digits(is_digit);
            is_double = true;
        }

        if let Some('e') | Some('E') = self.current_char() {
            let rest = &self.text[self.pos + 1..];
            let mut chars = rest.chars();
            let exponent_len = match chars.next() {
                Some(c) if is_digit(c) => Some(1),
                Some('+') | Some('-') if chars.next().map_or(false, is_digit) => Some(2),
                _ => None,
            };
            if let Some(len) = exponent_len {
                self.pos += len;
                self.scan_digits(is_digit);
                is_double = true;
            }
        }

        let text = self.text;
        let token_text = &text[self.token_start..self.pos];
        let digits: String = token_text.chars().filter(|&c| c != '_').collect();
        if is_double {
            let token = self.make_token(SyntaxKind::DoubleLiteral);
            let value = match digits.parse::<f64>() {
                Ok(value) if value.is_finite() => value,
                _ => {
                    self.error(token.span, &messages::INVALID_DOUBLE, &[token_text]);
                    0.0
                }
            };
            token.with_value(LiteralValue::Double(value))
        } else {
            self.finish_integer(&digits, 10)
        }
    }

    fn scan_prefixed_integer(&mut self, radix: u32) -> Token<'a> {
        self.pos += 2; // skip 0x, 0b or 0o
        let digits_start = self.pos;
        match radix {
            16 => self.scan_digits(is_hex_digit),
            8 => self.scan_digits(is_octal_digit),
            _ => self.scan_digits(is_binary_digit),
        }
        let digits: String = self.text[digits_start..self.pos]
            .chars()
            .filter(|&c| c != '_')
            .collect();
        self.finish_integer(&digits, radix)
    }

    /// A digit followed by any mix of digits and `_` separators.
    fn scan_digits(&mut self, is_valid: fn(char) -> bool) {
        if !self.current_char().map_or(false, is_valid) {
            return;
        }
        while let Some(ch) = self.current_char() {
            if ch == '_' || is_valid(ch) {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn finish_integer(&mut self, digits: &str, radix: u32) -> Token<'a> {
        let token = self.make_token(SyntaxKind::IntLiteral);
        let value = match i64::from_str_radix(digits, radix) {
            Ok(value) => value,
            Err(_) => {
                self.error(token.span, &messages::INVALID_INTEGER, &[token.text]);
                0
            }
        };
        token.with_value(LiteralValue::Int(value))
    }

    // ========================================================================
    // Identifiers and keywords
    // ========================================================================

    fn scan_identifier(&mut self) -> Token<'a> {
        self.advance();
        while let Some(ch) = self.current_char() {
            if !is_identifier_part(ch) {
                break;
            }
            self.advance();
        }
        let text = &self.text[self.token_start..self.pos];
        match SyntaxKind::from_keyword(text) {
            Some(SyntaxKind::TrueKeyword) => {
                self.make_token(SyntaxKind::TrueKeyword).with_value(LiteralValue::Bool(true))
            }
            Some(SyntaxKind::FalseKeyword) => {
                self.make_token(SyntaxKind::FalseKeyword).with_value(LiteralValue::Bool(false))
            }
            Some(keyword) => self.make_token(keyword),
            None => self.make_token(SyntaxKind::Identifier),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if let Some(token) = self.pending.pop_front() {
            return Some(token);
        }
        if self.finished {
            return None;
        }
        let token = self.scan();
        if token.kind == SyntaxKind::EndOfFileToken {
            self.finished = true;
        }
        trace!(kind = ?token.kind, text = %token.sanitized_text(), "token");
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<SyntaxKind> {
        let source = SourceText::new("test.sl", text);
        Lexer::new(&source).map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_source_is_just_eof() {
        assert_eq!(kinds(""), vec![SyntaxKind::EndOfFileToken]);
        assert_eq!(kinds("  \r\n\t // nothing"), vec![SyntaxKind::EndOfFileToken]);
    }

    #[test]
    fn test_iterator_is_fused_after_eof() {
        let source = SourceText::new("test.sl", "x");
        let mut lexer = Lexer::new(&source);
        assert_eq!(lexer.next().map(|t| t.kind), Some(SyntaxKind::Identifier));
        assert_eq!(lexer.next().map(|t| t.kind), Some(SyntaxKind::EndOfFileToken));
        assert!(lexer.next().is_none());
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        let source = SourceText::new("test.sl", "\u{FEFF}x");
        let tokens: Vec<_> = Lexer::new(&source).collect();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "x");
        assert_eq!(tokens[0].span.start, 3);
    }

    #[test]
    fn test_dot_without_fraction_is_separate() {
        assert_eq!(
            kinds("12.x"),
            vec![
                SyntaxKind::IntLiteral,
                SyntaxKind::InvalidToken,
                SyntaxKind::Identifier,
                SyntaxKind::EndOfFileToken
            ]
        );
    }
}
