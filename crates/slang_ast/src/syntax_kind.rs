//! SyntaxKind enum - every token and node kind of the slang syntax tree.

/// The kind of a token or syntax node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    // ========================================================================
    // Tokens
    // ========================================================================
    InvalidToken,
    EndOfFileToken,

    // String delimiter, emitted on its own around every string literal
    DoubleQuoteToken,

    // Literals
    IntLiteral,
    DoubleLiteral,
    StringLiteral,
    Identifier,

    // Punctuation
    OpenParenToken,
    CloseParenToken,
    OpenBraceToken,
    CloseBraceToken,
    CommaToken,
    ColonToken,
    SemicolonToken,
    PlusToken,
    MinusToken,
    AsteriskToken,
    SlashToken,
    EqualsToken,
    EqualsEqualsToken,
    ExclamationToken,
    ExclamationEqualsToken,
    LessThanToken,
    LessThanEqualsToken,
    GreaterThanToken,
    GreaterThanEqualsToken,
    AmpersandAmpersandToken,
    BarBarToken,

    // Keywords
    FunKeyword,
    VarKeyword,
    ConstKeyword,
    IfKeyword,
    ElseKeyword,
    ReturnKeyword,
    GotoKeyword,
    TrueKeyword,
    FalseKeyword,

    // ========================================================================
    // Nodes
    // ========================================================================
    CompilationUnit,
    FunctionDeclaration,
    Parameter,
    TypeClause,
    GlobalStatement,

    // Statements
    Block,
    IfStatement,
    ElseClause,
    ExpressionStatement,
    EmptyStatement,
    VariableDeclaration,
    ReturnStatement,
    GotoStatement,
    LabelStatement,
    InvalidStatement,

    // Expressions
    LiteralExpression,
    NameExpression,
    UnaryExpression,
    BinaryExpression,
    AssignmentExpression,
    CallExpression,
    ParenthesizedExpression,
    InvalidExpression,
}

impl SyntaxKind {
    /// Whether this kind represents a keyword.
    #[inline]
    pub fn is_keyword(self) -> bool {
        let v = self as u16;
        v >= SyntaxKind::FunKeyword as u16 && v <= SyntaxKind::FalseKeyword as u16
    }

    /// Whether this kind represents a punctuation or operator token.
    #[inline]
    pub fn is_punctuation(self) -> bool {
        let v = self as u16;
        v >= SyntaxKind::OpenParenToken as u16 && v <= SyntaxKind::BarBarToken as u16
    }

    #[inline]
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            SyntaxKind::IntLiteral | SyntaxKind::DoubleLiteral | SyntaxKind::StringLiteral
        )
    }

    /// Tokens the parser skips. Comments and whitespace never become tokens.
    #[inline]
    pub fn is_trivia(self) -> bool {
        self == SyntaxKind::DoubleQuoteToken
    }

    /// Whether this kind is a token rather than a tree node.
    #[inline]
    pub fn is_token(self) -> bool {
        (self as u16) < SyntaxKind::CompilationUnit as u16
    }

    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        match text {
            "fun" => Some(SyntaxKind::FunKeyword),
            "var" => Some(SyntaxKind::VarKeyword),
            "const" => Some(SyntaxKind::ConstKeyword),
            "if" => Some(SyntaxKind::IfKeyword),
            "else" => Some(SyntaxKind::ElseKeyword),
            "return" => Some(SyntaxKind::ReturnKeyword),
            "goto" => Some(SyntaxKind::GotoKeyword),
            "true" => Some(SyntaxKind::TrueKeyword),
            "false" => Some(SyntaxKind::FalseKeyword),
            _ => None,
        }
    }

    /// The fixed spelling of keywords and punctuation.
    pub fn text(self) -> Option<&'static str> {
        let text = match self {
            SyntaxKind::DoubleQuoteToken => "\"",
            SyntaxKind::OpenParenToken => "(",
            SyntaxKind::CloseParenToken => ")",
            SyntaxKind::OpenBraceToken => "{",
            SyntaxKind::CloseBraceToken => "}",
            SyntaxKind::CommaToken => ",",
            SyntaxKind::ColonToken => ":",
            SyntaxKind::SemicolonToken => ";",
            SyntaxKind::PlusToken => "+",
            SyntaxKind::MinusToken => "-",
            SyntaxKind::AsteriskToken => "*",
            SyntaxKind::SlashToken => "/",
            SyntaxKind::EqualsToken => "=",
            SyntaxKind::EqualsEqualsToken => "==",
            SyntaxKind::ExclamationToken => "!",
            SyntaxKind::ExclamationEqualsToken => "!=",
            SyntaxKind::LessThanToken => "<",
            SyntaxKind::LessThanEqualsToken => "<=",
            SyntaxKind::GreaterThanToken => ">",
            SyntaxKind::GreaterThanEqualsToken => ">=",
            SyntaxKind::AmpersandAmpersandToken => "&&",
            SyntaxKind::BarBarToken => "||",
            SyntaxKind::FunKeyword => "fun",
            SyntaxKind::VarKeyword => "var",
            SyntaxKind::ConstKeyword => "const",
            SyntaxKind::IfKeyword => "if",
            SyntaxKind::ElseKeyword => "else",
            SyntaxKind::ReturnKeyword => "return",
            SyntaxKind::GotoKeyword => "goto",
            SyntaxKind::TrueKeyword => "true",
            SyntaxKind::FalseKeyword => "false",
            _ => return None,
        };
        Some(text)
    }

    /// How the kind is described in "expected ..." messages.
    pub fn describe(self) -> String {
        match self.text() {
            Some(text) => format!("'{}'", text),
            None => match self {
                SyntaxKind::Identifier => "identifier".to_string(),
                SyntaxKind::EndOfFileToken => "end of file".to_string(),
                _ => format!("{:?}", self),
            },
        }
    }
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_round_trip() {
        for text in ["fun", "var", "const", "if", "else", "return", "goto", "true", "false"] {
            let kind = SyntaxKind::from_keyword(text).expect("keyword");
            assert!(kind.is_keyword());
            assert_eq!(kind.text(), Some(text));
        }
        assert_eq!(SyntaxKind::from_keyword("print"), None);
        assert_eq!(SyntaxKind::from_keyword("int"), None);
    }

    #[test]
    fn test_classification() {
        assert!(SyntaxKind::BarBarToken.is_punctuation());
        assert!(!SyntaxKind::FunKeyword.is_punctuation());
        assert!(SyntaxKind::DoubleQuoteToken.is_trivia());
        assert!(SyntaxKind::FalseKeyword.is_token());
        assert!(!SyntaxKind::CompilationUnit.is_token());
    }

    #[test]
    fn test_describe() {
        assert_eq!(SyntaxKind::SemicolonToken.describe(), "';'");
        assert_eq!(SyntaxKind::Identifier.describe(), "identifier");
    }
}
