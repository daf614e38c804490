//! Character classes used by the lexer.

use unicode_xid::UnicodeXID;

pub use slang_core::text::is_line_break;

pub const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Whitespace that does not end a line: the ASCII blanks, NBSP and the
/// Unicode space separators.
#[inline]
pub fn is_white_space_single_line(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t'
            | '\u{000B}' // vertical tab
            | '\u{000C}' // form feed
            | '\u{00A0}' // no-break space
            | '\u{1680}' // ogham space mark
            | '\u{2000}'..='\u{200A}' // various spaces
            | '\u{202F}' // narrow no-break space
            | '\u{205F}' // medium mathematical space
            | '\u{3000}' // ideographic space
    )
}

#[inline]
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

#[inline]
pub fn is_binary_digit(ch: char) -> bool {
    matches!(ch, '0' | '1')
}

#[inline]
pub fn is_octal_digit(ch: char) -> bool {
    matches!(ch, '0'..='7')
}

#[inline]
pub fn is_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

#[inline]
pub fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch.is_xid_start()
}

#[inline]
pub fn is_identifier_part(ch: char) -> bool {
    ch == '_' || ch.is_xid_continue()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_space() {
        for ch in [' ', '\t', '\u{000B}', '\u{000C}', '\u{00A0}', '\u{2003}', '\u{3000}'] {
            assert!(is_white_space_single_line(ch), "{:?}", ch);
        }
        assert!(!is_white_space_single_line('\n'));
        assert!(!is_white_space_single_line(BYTE_ORDER_MARK));
    }

    #[test]
    fn test_identifier_chars() {
        assert!(is_identifier_start('_'));
        assert!(is_identifier_start('é'));
        assert!(is_identifier_start('λ'));
        assert!(!is_identifier_start('1'));
        assert!(is_identifier_part('1'));
        assert!(!is_identifier_part('-'));
    }

    #[test]
    fn test_digit_classes() {
        assert!(is_binary_digit('1') && !is_binary_digit('2'));
        assert!(is_octal_digit('7') && !is_octal_digit('8'));
        assert!(is_hex_digit('f') && is_hex_digit('A') && !is_hex_digit('g'));
    }
}
