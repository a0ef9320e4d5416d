//! Distinguished names.
//!
//! This module provides the types for working with LDAP distinguished names
//! in their string representation.
//!
//! Main types: [`Dn`], [`Rdn`], [`RdnComponent`].<br/>
//! Configuration: [`EscapeChars`].
//!
//! A distinguished name, or DN, identifies an object in a directory and its
//! position in the directory tree. It is a sequence of *relative
//! distinguished names*, or RDNs, separated by commas or semicolons. The
//! first RDN names the object itself, each following RDN names the
//! container of the previous one. For instance,
//! `CN=Pete,OU=People,DC=example,DC=com` names the object `CN=Pete` in the
//! container `OU=People,DC=example,DC=com`.
//!
//! Each RDN in turn consists of one or more components, each an attribute
//! type and a value joined by an equals sign. The attribute type is either a
//! name or a dotted OID, optionally prefixed by `OID.`. A value can be given
//! in three ways: as an ordinary string in which special characters are
//! escaped with a backslash, as a string in double quotes, or as a hex
//! string starting with `#`.
//!
//! Parsing happens in two passes. The DN is first split into the raw
//! strings of its RDNs and then each of those is parsed on its own. Errors
//! are reported via [`FromStrError`] which contains the offending raw string.
//!
//! All three types compare and hash ignoring the case of attribute types and
//! values while keeping the original case for display. The hash codes are
//! calculated once when a value is created.
//!
//! When displaying, attribute values are escaped according to an
//! [`EscapeChars`] value. A [`Dn`] carries its own while [`Rdn`] and
//! [`RdnComponent`] use a process-wide default, available via
//! [`EscapeChars::default_escape`]. All types also provide a `fmt_with`
//! method to pick the escaping explicitly.

pub use self::component::{RdnComponent, ValueKind};
pub use self::dn::Dn;
pub use self::error::{
    EmptyDnError, Error, FromStrError, MissingInputError, SyntaxError,
};
pub use self::escape::{
    escape, escape_value, EscapeChars, EscapeCharsFromStrError, EscapedValue,
};
pub use self::rdn::Rdn;

pub mod chars;
mod component;
mod dn;
mod error;
mod escape;
mod rdn;
mod scan;
