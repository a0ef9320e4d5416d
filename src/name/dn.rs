//! Distinguished names.
//!
//! This is a private module. Its public types are re-exported by the parent.

use super::chars::is_separator;
use super::escape::EscapeChars;
use super::error::{
    EmptyDnError, Error, FromStrError, MissingInputError, SyntaxError,
};
use super::rdn::Rdn;
use super::scan::Scanner;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::str::FromStr;
use core::{fmt, hash, slice};

//------------ Dn ------------------------------------------------------------

/// An LDAP distinguished name.
///
/// A DN identifies an object in a directory together with its location in
/// the tree. It is a sequence of [relative distinguished names][Rdn],
/// starting with the RDN of the object itself and followed by those of
/// each of its containers up to the root. For instance, in
/// `CN=Pete,OU=People,DC=example,DC=com` the first RDN is `CN=Pete` and the
/// parent object is `OU=People,DC=example,DC=com`.
///
/// The empty string is a valid DN without any RDNs.
///
/// Two DNs are equal if they have equal RDNs in the same order. Attribute
/// types and values are compared ignoring case, so `CN=Pete,DC=com` equals
/// `cn=PETE,dc=COM`. The case given in the input is kept for display.
///
/// Each DN also carries an [`EscapeChars`] value that selects how values
/// are escaped when it is displayed. It is a mere rendering preference and
/// has no bearing on equality or the hash code.
///
/// # Example
///
/// ```
/// use ldap_dn::Dn;
///
/// let base = Dn::new("OU=People,DC=example,DC=com").unwrap();
/// let pete = base.child("CN=Pete").unwrap();
/// assert!(base.contains(&pete));
/// assert_eq!(pete.parent().unwrap(), base);
/// assert_eq!(pete.to_string(), "CN=Pete,OU=People,DC=example,DC=com");
/// ```
#[derive(Clone)]
pub struct Dn {
    /// The RDNs, most specific first.
    rdns: Vec<Rdn>,

    /// How to escape values when displaying the DN.
    escape: EscapeChars,

    /// The hash code, derived from the RDNs.
    hash: u32,
}

/// # Creation
///
impl Dn {
    /// The seed of the hash code.
    const HASH_SEED: u32 = 0x28f5_27b4;

    /// Parses a DN using the process-wide default escaping for display.
    pub fn new(s: &str) -> Result<Self, FromStrError> {
        Self::with_escape_chars(s, EscapeChars::default_escape())
    }

    /// Parses a DN that uses the given escaping for display.
    pub fn with_escape_chars(
        s: &str,
        escape: EscapeChars,
    ) -> Result<Self, FromStrError> {
        match parse_rdns(s) {
            Ok(rdns) => {
                #[cfg(feature = "tracing")]
                tracing::trace!("Parsed DN '{}' with {} RDNs", s, rdns.len());
                Ok(Self::from_rdns(rdns, escape))
            }
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Rejected DN '{}': {}", s, err);
                Err(err)
            }
        }
    }

    /// Parses a DN from an optional string.
    ///
    /// This is for input that may be absent altogether, such as an optional
    /// field of a request. An absent string is an error, which is different
    /// from an empty string which results in an empty DN.
    pub fn from_opt_str(s: Option<&str>) -> Result<Self, Error> {
        let s = s.ok_or(MissingInputError)?;
        Self::new(s).map_err(Into::into)
    }

    /// Returns the empty DN.
    pub fn empty() -> Self {
        Self::from_rdns(Vec::new(), EscapeChars::default_escape())
    }

    /// Creates a DN from its RDNs.
    fn from_rdns(rdns: Vec<Rdn>, escape: EscapeChars) -> Self {
        let hash = rdns
            .iter()
            .fold(Self::HASH_SEED, |hash, rdn| hash ^ rdn.hash_code());
        Dn { rdns, escape, hash }
    }
}

/// # Access to the RDNs
///
impl Dn {
    /// Returns the RDNs, most specific first.
    pub fn rdns(&self) -> &[Rdn] {
        &self.rdns
    }

    /// Returns the number of RDNs.
    pub fn len(&self) -> usize {
        self.rdns.len()
    }

    /// Returns whether this is the empty DN.
    pub fn is_empty(&self) -> bool {
        self.rdns.is_empty()
    }

    /// Returns the RDN of the object itself.
    pub fn first(&self) -> Option<&Rdn> {
        self.rdns.first()
    }

    /// Returns an iterator over the RDNs, most specific first.
    pub fn iter(&self) -> slice::Iter<'_, Rdn> {
        self.rdns.iter()
    }

    /// Returns how values are escaped when displaying the DN.
    pub fn escape_chars(&self) -> EscapeChars {
        self.escape
    }

    /// Changes how values are escaped when displaying the DN.
    pub fn set_escape_chars(&mut self, escape: EscapeChars) {
        self.escape = escape
    }

    /// Returns the hash code of the DN.
    pub fn hash_code(&self) -> u32 {
        self.hash
    }
}

/// # Navigating the Tree
///
impl Dn {
    /// Returns the DN of the object containing this one.
    ///
    /// This is the DN without its first RDN. The parent of a DN with a
    /// single RDN is the empty DN. The empty DN has no parent.
    pub fn parent(&self) -> Result<Self, EmptyDnError> {
        match self.rdns.split_first() {
            Some((_, tail)) => Ok(Self::from_rdns(tail.into(), self.escape)),
            None => Err(EmptyDnError),
        }
    }

    /// Returns the DN of an object below this one.
    ///
    /// The string `relative` holds the RDNs of the child relative to this
    /// DN, e.g., `CN=Pete,OU=People` to go two levels down. If it is empty,
    /// the result equals this DN.
    pub fn child(&self, relative: &str) -> Result<Self, FromStrError> {
        let relative = Self::new(relative)?;
        if relative.is_empty() {
            return Ok(self.clone());
        }
        let mut rdns = relative.rdns;
        rdns.extend_from_slice(&self.rdns);
        Ok(Self::from_rdns(rdns, self.escape))
    }

    /// Returns whether `other` lies below this DN in the tree.
    ///
    /// A DN does not contain itself.
    pub fn contains(&self, other: &Dn) -> bool {
        other.len() > self.len() && other.rdns.ends_with(&self.rdns)
    }

    /// Returns whether this DN lies below `other` in the tree.
    pub fn is_descendant_of(&self, other: &Dn) -> bool {
        other.contains(self)
    }
}

/// # Display
///
impl Dn {
    /// Returns an object that displays the DN with the given escaping.
    pub fn fmt_with(&self, escape: EscapeChars) -> impl fmt::Display + '_ {
        DnFmt { dn: self, escape }
    }

    /// Returns the string representation with the given escaping.
    pub fn to_string_with(&self, escape: EscapeChars) -> String {
        self.fmt_with(escape).to_string()
    }
}

//--- FromStr and TryFrom

impl FromStr for Dn {
    type Err = FromStrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Dn {
    type Error = FromStrError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

//--- Default

impl Default for Dn {
    fn default() -> Self {
        Self::empty()
    }
}

//--- PartialEq, Eq, and Hash

impl PartialEq for Dn {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.rdns == other.rdns
    }
}

impl Eq for Dn {}

impl hash::Hash for Dn {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash)
    }
}

//--- IntoIterator

impl<'a> IntoIterator for &'a Dn {
    type Item = &'a Rdn;
    type IntoIter = slice::Iter<'a, Rdn>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//--- Display and Debug

impl fmt::Display for Dn {
    /// Formats the DN using its own escaping.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.fmt_with(self.escape))
    }
}

impl fmt::Debug for Dn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Dn").field(&self.to_string()).finish()
    }
}

//--- Serialize and Deserialize

#[cfg(feature = "serde")]
impl serde::Serialize for Dn {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        // Without escaping special characters the string may not parse.
        let display = self.fmt_with(self.escape | EscapeChars::SPECIAL);
        serializer.serialize_newtype_struct("Dn", &format_args!("{}", display))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Dn {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        use serde::de::Error;

        struct InnerVisitor;

        impl<'de> serde::de::Visitor<'de> for InnerVisitor {
            type Value = Dn;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an LDAP distinguished name")
            }

            fn visit_str<E: Error>(self, v: &str) -> Result<Self::Value, E> {
                Dn::new(v).map_err(E::custom)
            }
        }

        struct NewtypeVisitor;

        impl<'de> serde::de::Visitor<'de> for NewtypeVisitor {
            type Value = Dn;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an LDAP distinguished name")
            }

            fn visit_newtype_struct<D: serde::Deserializer<'de>>(
                self,
                deserializer: D,
            ) -> Result<Self::Value, D::Error> {
                deserializer.deserialize_str(InnerVisitor)
            }

            fn visit_str<E: Error>(self, v: &str) -> Result<Self::Value, E> {
                Dn::new(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_newtype_struct("Dn", NewtypeVisitor)
    }
}

//------------ DnFmt ---------------------------------------------------------

struct DnFmt<'a> {
    dn: &'a Dn,
    escape: EscapeChars,
}

impl fmt::Display for DnFmt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut rdns = self.dn.iter();
        if let Some(rdn) = rdns.next() {
            write!(f, "{}", rdn.fmt_with(self.escape))?;
        }
        for rdn in rdns {
            f.write_str(",")?;
            write!(f, "{}", rdn.fmt_with(self.escape))?;
        }
        Ok(())
    }
}

//------------ SplitState ----------------------------------------------------

/// The states of the DN splitter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum SplitState {
    /// Outside of quotes where a separator ends the current RDN.
    LookingForSeparator,

    /// Inside quotes where separators are part of the value.
    InQuotedString,
}

impl SplitState {
    /// Consumes the next character or escape sequence.
    ///
    /// Returns the new state and whether the consumed character was a
    /// separator ending the current segment.
    fn step(self, scanner: &mut Scanner) -> Result<(Self, bool), SyntaxError> {
        let ch = match scanner.next_char() {
            Some(ch) => ch,
            None => return Ok((self, false)),
        };
        match (self, ch) {
            // The escaped character is left to the RDN parser.
            (_, '\\') => {
                scanner.next_char().ok_or(SyntaxError::TrailingEscape)?;
                Ok((self, false))
            }
            (SplitState::LookingForSeparator, ch) if is_separator(ch) => {
                Ok((self, true))
            }
            (SplitState::LookingForSeparator, '"') => {
                Ok((SplitState::InQuotedString, false))
            }
            (SplitState::InQuotedString, '"') => {
                Ok((SplitState::LookingForSeparator, false))
            }
            _ => Ok((self, false)),
        }
    }
}

//------------ Helper Functions ----------------------------------------------

/// Splits a DN into the raw strings of its RDNs.
///
/// Separators inside quotes or escaped with a backslash don’t count. The
/// last segment is always included, even if it is empty.
fn split_rdns(s: &str) -> Result<Vec<&str>, SyntaxError> {
    let mut res = Vec::new();
    let mut scanner = Scanner::new(s);
    let mut state = SplitState::LookingForSeparator;
    let mut start = 0;
    while !scanner.is_empty() {
        let (next, separator) = state.step(&mut scanner)?;
        state = next;
        if separator {
            // Leave out the separator itself. It is a single byte.
            res.push(&s[start..scanner.pos() - 1]);
            start = scanner.pos();
        }
    }
    if state == SplitState::InQuotedString {
        return Err(SyntaxError::UnterminatedQuotedString);
    }
    res.push(scanner.since(start));
    Ok(res)
}

/// Parses the RDNs of a DN.
fn parse_rdns(s: &str) -> Result<Vec<Rdn>, FromStrError> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    split_rdns(s)
        .map_err(|err| FromStrError::new(err, s))?
        .into_iter()
        .map(|segment| {
            if segment.trim_matches(' ').is_empty() {
                Err(FromStrError::new(SyntaxError::IncompleteRdn, s))
            } else {
                Rdn::parse(segment)
            }
        })
        .collect()
}

//============ Testing =======================================================

#[cfg(test)]
#[cfg(feature = "std")]
mod test {
    use super::*;
    use std::collections::HashSet;

    fn dn(s: &str) -> Dn {
        Dn::new(s).unwrap()
    }

    #[test]
    fn split_step() {
        let mut scanner = Scanner::new(",a");
        assert_eq!(
            SplitState::LookingForSeparator.step(&mut scanner),
            Ok((SplitState::LookingForSeparator, true))
        );
        let mut scanner = Scanner::new(",a");
        assert_eq!(
            SplitState::InQuotedString.step(&mut scanner),
            Ok((SplitState::InQuotedString, false))
        );
        let mut scanner = Scanner::new("\\,a");
        assert_eq!(
            SplitState::LookingForSeparator.step(&mut scanner),
            Ok((SplitState::LookingForSeparator, false))
        );
        assert_eq!(scanner.rest(), "a");
        let mut scanner = Scanner::new("\"");
        assert_eq!(
            SplitState::LookingForSeparator.step(&mut scanner),
            Ok((SplitState::InQuotedString, false))
        );
        let mut scanner = Scanner::new("\\");
        assert_eq!(
            SplitState::InQuotedString.step(&mut scanner),
            Err(SyntaxError::TrailingEscape)
        );
    }

    #[test]
    fn split() {
        assert_eq!(split_rdns("a,b;c"), Ok(vec!["a", "b", "c"]));
        assert_eq!(split_rdns("a\\,b,c"), Ok(vec!["a\\,b", "c"]));
        assert_eq!(split_rdns("a=\"b,c\";d"), Ok(vec!["a=\"b,c\"", "d"]));
        assert_eq!(split_rdns("a=\"\\\",\""), Ok(vec!["a=\"\\\",\""]));
        assert_eq!(split_rdns("a,"), Ok(vec!["a", ""]));
        assert_eq!(split_rdns(""), Ok(vec![""]));
        assert_eq!(split_rdns("♫=♪,b"), Ok(vec!["♫=♪", "b"]));
        assert_eq!(split_rdns("a\\"), Err(SyntaxError::TrailingEscape));
        assert_eq!(
            split_rdns("a=\"b,c"),
            Err(SyntaxError::UnterminatedQuotedString)
        );
    }

    #[test]
    fn empty() {
        let empty = dn("");
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);
        assert_eq!(empty.to_string(), "");
        assert_eq!(empty, Dn::empty());
        assert_eq!(empty, Dn::default());
        assert_eq!(empty.first(), None);
        assert_eq!(empty.parent(), Err(EmptyDnError));
    }

    #[test]
    fn empty_segments() {
        for s in [",", "CN=a,", ",CN=a", "CN=a,,DC=b", "CN=a, ,DC=b"] {
            assert!(Dn::new(s).is_err(), "{}", s);
        }
    }

    #[test]
    fn error_input() {
        let err = Dn::new("CN=Pete,People,DC=com").unwrap_err();
        assert_eq!(err.error(), SyntaxError::UnterminatedName);
        assert_eq!(err.input(), "People");

        let err = Dn::new("CN=\"Pete,DC=com").unwrap_err();
        assert_eq!(err.error(), SyntaxError::UnterminatedQuotedString);
        assert_eq!(err.input(), "CN=\"Pete,DC=com");

        // Empty segments are reported against the whole DN.
        let err = Dn::new("CN=x;;").unwrap_err();
        assert_eq!(err.error(), SyntaxError::IncompleteRdn);
        assert_eq!(err.input(), "CN=x;;");
        let err = Dn::new("CN=a, ,DC=b").unwrap_err();
        assert_eq!(err.error(), SyntaxError::IncompleteRdn);
        assert_eq!(err.input(), "CN=a, ,DC=b");
    }

    #[test]
    fn from_opt_str() {
        assert_eq!(
            Dn::from_opt_str(None),
            Err(Error::InvalidArgument(MissingInputError))
        );
        assert_eq!(Dn::from_opt_str(Some("")), Ok(Dn::empty()));
        assert!(matches!(
            Dn::from_opt_str(Some("CN")),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn parent() {
        let pete = dn("CN=Pete,OU=People,DC=example,DC=com");
        let people = pete.parent().unwrap();
        assert_eq!(people, dn("OU=People,DC=example,DC=com"));
        assert_eq!(people.parent().unwrap().len(), 2);
        assert_eq!(dn("DC=com").parent().unwrap(), Dn::empty());
        assert_eq!(
            dn("CN=Pete").parent().unwrap().parent(),
            Err(EmptyDnError)
        );
    }

    #[test]
    fn child() {
        let base = dn("DC=example,DC=com");
        assert_eq!(
            base.child("CN=pete,OU=people").unwrap(),
            dn("CN=pete,OU=people,DC=example,DC=com")
        );
        assert_eq!(base.child("").unwrap(), base);
        assert!(base.child("CN").is_err());

        let mut base = base;
        base.set_escape_chars(EscapeChars::NONE);
        assert_eq!(
            base.child("CN=a").unwrap().escape_chars(),
            EscapeChars::NONE
        );
    }

    #[test]
    fn contains() {
        let people = dn("OU=People,DC=example,DC=com");
        let pete = dn("CN=Pete,OU=People,DC=example,DC=com");
        assert!(people.contains(&pete));
        assert!(pete.is_descendant_of(&people));
        assert!(!pete.contains(&people));
        assert!(!people.contains(&people));
        assert!(!people.contains(&dn("CN=Pete,OU=Admins,DC=example,DC=com")));
        assert!(Dn::empty().contains(&people));
        assert!(!Dn::empty().contains(&Dn::empty()));
        assert!(dn("ou=PEOPLE,dc=Example,dc=COM").contains(&pete));
    }

    #[test]
    fn eq_and_hash() {
        let mut set = HashSet::new();
        set.insert(dn("CN=Pete,OU=People"));
        assert!(set.contains(&dn("cn=pete;ou=people")));
        assert!(!set.contains(&dn("OU=People,CN=Pete")));

        let mut a = dn("CN=Pete");
        a.set_escape_chars(EscapeChars::NONE);
        assert_eq!(a, dn("CN=Pete"));
        assert_eq!(a.hash_code(), dn("CN=Pete").hash_code());
    }

    #[test]
    fn display() {
        let mut pete = Dn::with_escape_chars(
            "CN=Pete\\, Jr.,DC=com",
            EscapeChars::SPECIAL,
        )
        .unwrap();
        assert_eq!(pete.to_string(), "CN=Pete\\, Jr.,DC=com");
        assert_eq!(
            pete.to_string_with(EscapeChars::NONE),
            "CN=Pete, Jr.,DC=com"
        );
        pete.set_escape_chars(EscapeChars::NONE);
        assert_eq!(pete.to_string(), "CN=Pete, Jr.,DC=com");
        assert_eq!(format!("{:?}", pete), "Dn(\"CN=Pete, Jr.,DC=com\")");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn ser_de() {
        use serde_test::{assert_tokens, Configure, Token};

        let dn = Dn::with_escape_chars("CN=a\\,b,DC=com", EscapeChars::NONE)
            .unwrap();
        assert_tokens(
            &dn.clone().readable(),
            &[
                Token::NewtypeStruct { name: "Dn" },
                Token::Str("CN=a\\,b,DC=com"),
            ],
        );
        assert_tokens(
            &dn.compact(),
            &[
                Token::NewtypeStruct { name: "Dn" },
                Token::Str("CN=a\\,b,DC=com"),
            ],
        );
    }
}
