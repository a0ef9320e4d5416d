//! Escaping of attribute values.
//!
//! When a DN is turned back into its string representation, characters in
//! attribute values that have a meaning in the DN grammar need to be
//! protected by a preceding backslash. Other characters, control
//! characters or non-ASCII characters, may be written as backslash hex
//! escapes to keep the result printable or pure ASCII. Which of these
//! categories are escaped is selected through [`EscapeChars`].

use super::chars::is_special_char;
use alloc::string::String;
use core::fmt::Write;
use core::str::FromStr;
use core::sync::atomic::{AtomicU8, Ordering};
use core::{fmt, ops};

//------------ EscapeChars ---------------------------------------------------

/// The categories of characters to escape when rendering a value.
///
/// This is a set of independent flags that can be combined via the bit-or
/// operator:
///
/// ```
/// use ldap_dn::EscapeChars;
///
/// let flags = EscapeChars::SPECIAL | EscapeChars::MULTIBYTE;
/// assert!(flags.contains(EscapeChars::SPECIAL));
/// assert!(!flags.contains(EscapeChars::CONTROL));
/// ```
///
/// # The process-wide default
///
/// Whenever a value is rendered without explicitly given flags, the
/// process-wide default is used. It starts out as [`EscapeChars::DEFAULT`]
/// and can be changed via [`set_default_escape`][Self::set_default_escape].
/// This is a single global value without any synchronization beyond the
/// atomicity of a single byte: concurrent updates are last-writer-wins and
/// a concurrent rendering may see either value. If you need deterministic
/// output, set the default once during startup or pass flags explicitly
/// using the various `fmt_with` methods.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct EscapeChars(u8);

/// The value the process-wide default escape flags start out with.
static DEFAULT_ESCAPE: AtomicU8 = AtomicU8::new(EscapeChars::DEFAULT.0);

impl EscapeChars {
    /// No characters are escaped.
    pub const NONE: Self = EscapeChars(0);

    /// Control characters, i.e., those below code point 32.
    ///
    /// These are written as a backslash followed by two hex digits.
    pub const CONTROL: Self = EscapeChars(1);

    /// The DN special characters and leading or trailing spaces.
    ///
    /// These are written as a backslash followed by the character itself.
    pub const SPECIAL: Self = EscapeChars(2);

    /// All characters at or above code point 128.
    ///
    /// Each octet of the UTF-8 encoding of such a character is written as
    /// a backslash followed by two hex digits.
    pub const MULTIBYTE: Self = EscapeChars(4);

    /// The initial value of the process-wide default.
    pub const DEFAULT: Self = EscapeChars(Self::CONTROL.0 | Self::SPECIAL.0);

    const ALL: u8 = Self::CONTROL.0 | Self::SPECIAL.0 | Self::MULTIBYTE.0;

    /// Creates flags from their raw bits, dropping unknown bits.
    #[must_use]
    pub const fn from_bits_truncate(bits: u8) -> Self {
        EscapeChars(bits & Self::ALL)
    }

    /// Returns the raw bits of the flags.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns whether all flags set in `other` are also set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns whether no flag is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the current process-wide default flags.
    pub fn default_escape() -> Self {
        EscapeChars(DEFAULT_ESCAPE.load(Ordering::Relaxed))
    }

    /// Replaces the process-wide default flags.
    ///
    /// See the [type-level documentation][Self] for the caveats.
    pub fn set_default_escape(escape: Self) {
        DEFAULT_ESCAPE.store(escape.0, Ordering::Relaxed)
    }
}

//--- Default

impl Default for EscapeChars {
    /// Returns the current process-wide default.
    fn default() -> Self {
        Self::default_escape()
    }
}

//--- BitOr, BitAnd

impl ops::BitOr for EscapeChars {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        EscapeChars(self.0 | rhs.0)
    }
}

impl ops::BitOrAssign for EscapeChars {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

impl ops::BitAnd for EscapeChars {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        EscapeChars(self.0 & rhs.0)
    }
}

impl ops::BitAndAssign for EscapeChars {
    fn bitand_assign(&mut self, rhs: Self) {
        *self = *self & rhs;
    }
}

//--- Display, Debug, and FromStr

impl fmt::Display for EscapeChars {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut sep = "";
        if self.contains(Self::CONTROL) {
            write!(f, "control")?;
            sep = " ";
        }
        if self.contains(Self::SPECIAL) {
            write!(f, "{}special", sep)?;
            sep = " ";
        }
        if self.contains(Self::MULTIBYTE) {
            write!(f, "{}multibyte", sep)?;
        }
        Ok(())
    }
}

impl fmt::Debug for EscapeChars {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EscapeChars({})", self)
    }
}

impl FromStr for EscapeChars {
    type Err = EscapeCharsFromStrError;

    /// Parses a space separated list of category names.
    ///
    /// The names are `control`, `special`, and `multibyte`, compared
    /// ignoring ASCII case. The name `none` is accepted and adds nothing,
    /// as does an empty string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut res = Self::NONE;
        for token in s.split(' ') {
            if token.is_empty() || token.eq_ignore_ascii_case("none") {
                continue;
            }
            if token.eq_ignore_ascii_case("control") {
                res |= Self::CONTROL;
            } else if token.eq_ignore_ascii_case("special") {
                res |= Self::SPECIAL;
            } else if token.eq_ignore_ascii_case("multibyte") {
                res |= Self::MULTIBYTE;
            } else {
                return Err(EscapeCharsFromStrError);
            }
        }
        Ok(res)
    }
}

//--- Serialize and Deserialize

#[cfg(feature = "serde")]
impl serde::Serialize for EscapeChars {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            serializer.serialize_u8(self.0)
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for EscapeChars {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        struct Visitor;

        impl<'de> serde::de::Visitor<'de> for Visitor {
            type Value = EscapeChars;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("escape character categories")
            }

            fn visit_str<E: serde::de::Error>(
                self,
                v: &str,
            ) -> Result<Self::Value, E> {
                EscapeChars::from_str(v).map_err(E::custom)
            }

            fn visit_u64<E: serde::de::Error>(
                self,
                v: u64,
            ) -> Result<Self::Value, E> {
                u8::try_from(v)
                    .ok()
                    .filter(|bits| bits & !EscapeChars::ALL == 0)
                    .map(EscapeChars)
                    .ok_or_else(|| E::custom("illegal escape flags"))
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_str(Visitor)
        } else {
            deserializer.deserialize_u8(Visitor)
        }
    }
}

//------------ EscapedValue --------------------------------------------------

/// An attribute value displayed with escaping applied.
///
/// This type is returned by [`escape`] and performs the escaping lazily
/// while formatting.
#[derive(Clone, Copy, Debug)]
pub struct EscapedValue<'a> {
    value: &'a str,
    escape: EscapeChars,
}

impl fmt::Display for EscapedValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let last = self.value.chars().count().saturating_sub(1);
        for (i, ch) in self.value.chars().enumerate() {
            if is_special_char(ch) || (ch == ' ' && (i == 0 || i == last)) {
                // Special characters are never hex escaped, whatever the
                // other flags say.
                if self.escape.contains(EscapeChars::SPECIAL) {
                    f.write_char('\\')?;
                }
                f.write_char(ch)?;
            } else if u32::from(ch) < 32
                && self.escape.contains(EscapeChars::CONTROL)
            {
                write!(f, "\\{:02X}", u32::from(ch))?;
            } else if u32::from(ch) >= 128
                && self.escape.contains(EscapeChars::MULTIBYTE)
            {
                let mut buf = [0u8; 4];
                for octet in ch.encode_utf8(&mut buf).as_bytes() {
                    write!(f, "\\{:02X}", octet)?;
                }
            } else {
                f.write_char(ch)?;
            }
        }
        Ok(())
    }
}

/// Returns a value that displays `value` with the given escaping.
pub fn escape(value: &str, escape: EscapeChars) -> EscapedValue<'_> {
    EscapedValue { value, escape }
}

/// Escapes the given categories of characters in `value`.
pub fn escape_value(value: &str, escape: EscapeChars) -> String {
    let mut res = String::with_capacity(value.len());
    // Writing into a string never fails.
    let _ = write!(res, "{}", self::escape(value, escape));
    res
}

//============ Error Types ===================================================

//------------ EscapeCharsFromStrError ---------------------------------------

/// An unknown category name was found when parsing escape flags.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EscapeCharsFromStrError;

impl fmt::Display for EscapeCharsFromStrError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("unknown escape character category")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EscapeCharsFromStrError {}

//============ Testing =======================================================
