//! Errors happening when dealing with distinguished names.
//!
//! Since most of them are produced by more than one module, we collect
//! them all here.

use alloc::string::String;
use core::fmt;

//------------ SyntaxError ---------------------------------------------------

/// The string representation of a DN violated the grammar.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum SyntaxError {
    /// An RDN consisted of spaces only.
    BlankRdn,

    /// An attribute type started with neither a letter nor a digit.
    IllegalTypeChar(char),

    /// An attribute name did not start with a letter.
    IllegalNameStart,

    /// An attribute name wasn’t followed by an equals sign.
    UnterminatedName,

    /// A dotted OID did not start with a digit.
    IllegalOidStart,

    /// A dotted OID wasn’t followed by an equals sign.
    UnterminatedOid,

    /// A dotted OID ended with a period.
    OidTrailingPeriod,

    /// A dotted OID contained two periods in a row.
    OidDoublePeriod,

    /// A number in a dotted OID had a leading zero.
    OidLeadingZero,

    /// A hex value did not start with `#`.
    MissingHexPrefix,

    /// A quoted value did not start with a quote.
    MissingQuote,

    /// A backslash was followed by neither two hex digits, a special
    /// character, nor a space.
    IllegalEscape,

    /// A special character appeared unescaped in an unquoted value.
    UnquotedSpecialChar(char),

    /// The input ended inside a quoted value.
    UnterminatedQuotedValue,

    /// There were characters after the end of a value.
    TrailingData,

    /// The DN ended with a backslash.
    TrailingEscape,

    /// The DN ended inside a quoted string.
    UnterminatedQuotedString,

    /// An RDN ended before an attribute value was started.
    ///
    /// This happens for an empty RDN or a dangling plus sign.
    IncompleteRdn,
}

//--- Display and Error

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SyntaxError::BlankRdn => f.write_str("RDN is entirely blank"),
            SyntaxError::IllegalTypeChar(ch) => {
                write!(f, "illegal character '{}' in attribute type", ch)
            }
            SyntaxError::IllegalNameStart => {
                f.write_str("attribute name must start with a letter")
            }
            SyntaxError::UnterminatedName => {
                f.write_str("unterminated attribute name")
            }
            SyntaxError::IllegalOidStart => {
                f.write_str("attribute OID must start with a digit")
            }
            SyntaxError::UnterminatedOid => {
                f.write_str("unterminated attribute OID")
            }
            SyntaxError::OidTrailingPeriod => {
                f.write_str("OID cannot end with a period")
            }
            SyntaxError::OidDoublePeriod => {
                f.write_str("OID cannot have two periods in a row")
            }
            SyntaxError::OidLeadingZero => {
                f.write_str("OID cannot have a leading zero")
            }
            SyntaxError::MissingHexPrefix => {
                f.write_str("hex value must start with '#'")
            }
            SyntaxError::MissingQuote => {
                f.write_str("quoted value must start with '\"'")
            }
            SyntaxError::IllegalEscape => {
                f.write_str("invalid escape sequence")
            }
            SyntaxError::UnquotedSpecialChar(ch) => {
                write!(f, "unquoted special character '{}'", ch)
            }
            SyntaxError::UnterminatedQuotedValue => {
                f.write_str("unterminated quoted value")
            }
            SyntaxError::TrailingData => {
                f.write_str("invalid characters at end of value")
            }
            SyntaxError::TrailingEscape => {
                f.write_str("DN ends with escape character")
            }
            SyntaxError::UnterminatedQuotedString => {
                f.write_str("unterminated quoted string")
            }
            SyntaxError::IncompleteRdn => f.write_str("invalid RDN"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SyntaxError {}

//------------ FromStrError --------------------------------------------------

/// A string could not be parsed into a DN.
///
/// The error contains the kind of grammar violation and the raw string in
/// which it was found. For problems with the overall DN structure, that is
/// the complete DN string. For problems within an RDN, it is the raw
/// string of that RDN only.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FromStrError {
    error: SyntaxError,
    input: String,
}

impl FromStrError {
    pub(crate) fn new(error: SyntaxError, input: &str) -> Self {
        FromStrError {
            error,
            input: input.into(),
        }
    }

    /// Returns the grammar violation.
    pub fn error(&self) -> SyntaxError {
        self.error
    }

    /// Returns the offending raw string.
    pub fn input(&self) -> &str {
        &self.input
    }
}

//--- Display and Error

impl fmt::Display for FromStrError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} in '{}'", self.error, self.input)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FromStrError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

//------------ MissingInputError ---------------------------------------------

/// No string was given to construct a DN from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MissingInputError;

impl fmt::Display for MissingInputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("missing DN string")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MissingInputError {}

//------------ EmptyDnError --------------------------------------------------

/// An operation requiring at least one RDN was applied to an empty DN.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EmptyDnError;

impl fmt::Display for EmptyDnError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("can’t get the parent of an empty DN")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EmptyDnError {}

//------------ Error ---------------------------------------------------------

/// Any error happening when dealing with distinguished names.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// The input string was absent.
    InvalidArgument(MissingInputError),

    /// The input string violated the grammar.
    MalformedInput(FromStrError),

    /// The operation isn’t possible on this value.
    InvalidOperation(EmptyDnError),
}

//--- From

impl From<MissingInputError> for Error {
    fn from(err: MissingInputError) -> Self {
        Error::InvalidArgument(err)
    }
}

impl From<FromStrError> for Error {
    fn from(err: FromStrError) -> Self {
        Error::MalformedInput(err)
    }
}

impl From<EmptyDnError> for Error {
    fn from(err: EmptyDnError) -> Self {
        Error::InvalidOperation(err)
    }
}

//--- Display and Error

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidArgument(ref err) => fmt::Display::fmt(err, f),
            Error::MalformedInput(ref err) => fmt::Display::fmt(err, f),
            Error::InvalidOperation(ref err) => fmt::Display::fmt(err, f),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::InvalidArgument(ref err) => Some(err),
            Error::MalformedInput(ref err) => Some(err),
            Error::InvalidOperation(ref err) => Some(err),
        }
    }
}

//============ Testing =======================================================
