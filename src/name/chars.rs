//! Character classes of the DN string representation.
//!
//! These are the building blocks of the parsers in the [`rdn`] and [`dn`]
//! modules. They are public so that code validating individual tokens
//! outside of a full parse, such as an attribute type name typed into a
//! search filter, applies exactly the same rules.
//!
//! All classes are strictly ASCII. In particular, [`is_alpha`] does not
//! consider non-ASCII letters to be alphabetic.
//!
//! [`rdn`]: super::rdn
//! [`dn`]: super::dn

/// Returns whether `ch` is an ASCII letter (`A`-`Z` or `a`-`z`).
pub fn is_alpha(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

/// Returns whether `ch` is a decimal digit (`0`-`9`).
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// Returns whether `ch` is a hex digit (`0`-`9`, `A`-`F`, or `a`-`f`).
pub fn is_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

/// Returns whether `ch` is one of the DN special characters.
///
/// These are `,`, `=`, `+`, `<`, `>`, `#`, `;`, `\`, and `"`. They need to
/// be escaped or quoted when they appear in an attribute value. Note that
/// the space character is not a special character even though leading and
/// trailing spaces of a value need escaping, too.
pub fn is_special_char(ch: char) -> bool {
    matches!(ch, ',' | '=' | '+' | '<' | '>' | '#' | ';' | '\\' | '"')
}

/// Returns whether `ch` separates two RDNs in a DN.
pub(super) fn is_separator(ch: char) -> bool {
    ch == ',' || ch == ';'
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn alpha() {
        assert!(is_alpha('a'));
        assert!(is_alpha('Z'));
        assert!(!is_alpha('0'));
        assert!(!is_alpha('-'));
        assert!(!is_alpha('é'));
    }

    #[test]
    fn digits() {
        for ch in '0'..='9' {
            assert!(is_digit(ch));
            assert!(is_hex_digit(ch));
        }
        assert!(!is_digit('a'));
        assert!(is_hex_digit('a'));
        assert!(is_hex_digit('F'));
        assert!(!is_hex_digit('g'));
        assert!(!is_hex_digit('G'));
    }

    #[test]
    fn special() {
        for ch in ",=+<>#;\\\"".chars() {
            assert!(is_special_char(ch), "'{}'", ch);
        }
        assert!(!is_special_char(' '));
        assert!(!is_special_char('a'));
        assert!(!is_special_char('.'));
        assert!(is_separator(','));
        assert!(is_separator(';'));
        assert!(!is_separator('+'));
    }
}
