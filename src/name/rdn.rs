//! Relative distinguished names.
//!
//! This is a private module. Its public types are re-exported by the parent.

use super::chars::{is_alpha, is_digit, is_hex_digit, is_special_char};
use super::component::{RdnComponent, ValueKind};
use super::escape::EscapeChars;
use super::error::{FromStrError, SyntaxError};
use super::scan::{push_char, unescape, Scanner};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::{fmt, hash, slice};
use smallvec::SmallVec;

//------------ Rdn -----------------------------------------------------------

/// A relative distinguished name.
///
/// An RDN is one element of a [`Dn`][super::Dn]. It consists of one or more
/// [components][RdnComponent], each an attribute type and value pair. An RDN
/// with more than one component is called multivalued. Its components are
/// separated by plus signs in the string representation, e.g.,
/// `CN=Pete+SN=Everett`.
///
/// The components are kept in the order they were given. Two RDNs are equal
/// if they have the same components in the same order.
///
/// RDNs are only created by parsing a DN.
#[derive(Clone)]
pub struct Rdn {
    /// The components. There is always at least one.
    components: SmallVec<[RdnComponent; 1]>,

    /// The hash code, derived from the components.
    hash: u32,
}

impl Rdn {
    /// The seed of the hash code.
    const HASH_SEED: u32 = 0x74f8_149a;

    /// Creates an RDN from the components collected by the parser.
    fn from_components(components: SmallVec<[RdnComponent; 1]>) -> Self {
        let hash = components
            .iter()
            .fold(Self::HASH_SEED, |hash, item| hash ^ item.hash_code());
        Rdn { components, hash }
    }

    /// Parses a single RDN from its raw string.
    ///
    /// The string is one segment of a DN as split by the DN parser. Errors
    /// carry the segment as their input.
    pub(super) fn parse(segment: &str) -> Result<Self, FromStrError> {
        Parser::new(segment)
            .run()
            .map(Self::from_components)
            .map_err(|err| FromStrError::new(err, segment))
    }

    /// Returns the components of the RDN.
    pub fn components(&self) -> &[RdnComponent] {
        &self.components
    }

    /// Returns the number of components.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns whether the RDN has more than one component.
    pub fn is_multivalued(&self) -> bool {
        self.components.len() > 1
    }

    /// Returns the first component.
    pub fn first(&self) -> &RdnComponent {
        // The parser never produces an RDN without components.
        &self.components[0]
    }

    /// Returns an iterator over the components.
    pub fn iter(&self) -> slice::Iter<'_, RdnComponent> {
        self.components.iter()
    }

    /// Returns the hash code of the RDN.
    pub fn hash_code(&self) -> u32 {
        self.hash
    }

    /// Returns an object that displays the RDN with the given escaping.
    pub fn fmt_with(&self, escape: EscapeChars) -> impl fmt::Display + '_ {
        RdnFmt { rdn: self, escape }
    }

    /// Returns the string representation with the given escaping.
    pub fn to_string_with(&self, escape: EscapeChars) -> String {
        self.fmt_with(escape).to_string()
    }
}

//--- PartialEq, Eq, and Hash

impl PartialEq for Rdn {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.components == other.components
    }
}

impl Eq for Rdn {}

impl hash::Hash for Rdn {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash)
    }
}

//--- IntoIterator

impl<'a> IntoIterator for &'a Rdn {
    type Item = &'a RdnComponent;
    type IntoIter = slice::Iter<'a, RdnComponent>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//--- Display and Debug

impl fmt::Display for Rdn {
    /// Formats the RDN using the process-wide default escaping.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.fmt_with(EscapeChars::default_escape()))
    }
}

impl fmt::Debug for Rdn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Rdn").field(&self.to_string()).finish()
    }
}

//------------ RdnFmt --------------------------------------------------------

struct RdnFmt<'a> {
    rdn: &'a Rdn,
    escape: EscapeChars,
}

impl fmt::Display for RdnFmt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut components = self.rdn.iter();
        if let Some(component) = components.next() {
            write!(f, "{}", component.fmt_with(self.escape))?;
        }
        for component in components {
            f.write_str("+")?;
            write!(f, "{}", component.fmt_with(self.escape))?;
        }
        Ok(())
    }
}

//------------ State ---------------------------------------------------------

/// The states of the RDN parser.
///
/// Each state has a step function in [`Parser`] which consumes input and
/// returns the next state. A step that completes a component pushes it to
/// the parser’s list before returning.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    /// Find out whether the attribute type is a name or an OID.
    DetermineAttributeType,

    /// Read a dotted OID up to and including the equals sign.
    GetTypeByOid,

    /// Read an attribute name up to and including the equals sign.
    GetTypeByName,

    /// Find out how the value is encoded.
    DetermineValueType,

    /// Read a value in double quotes.
    GetQuotedValue,

    /// Read an ordinary value.
    GetUnquotedValue,

    /// Read a hex value.
    GetHexValue,
}

//------------ Parser --------------------------------------------------------

/// The state shared between steps of the RDN parser.
struct Parser<'a> {
    /// The remaining input.
    scanner: Scanner<'a>,

    /// The attribute type of the component currently being parsed.
    attr_type: &'a str,

    /// The components completed so far.
    components: SmallVec<[RdnComponent; 1]>,
}

impl<'a> Parser<'a> {
    fn new(segment: &'a str) -> Self {
        Parser {
            scanner: Scanner::new(segment),
            attr_type: "",
            components: SmallVec::new(),
        }
    }

    /// Runs the state machine over the complete input.
    fn run(mut self) -> Result<SmallVec<[RdnComponent; 1]>, SyntaxError> {
        let mut state = State::DetermineAttributeType;
        while !self.scanner.is_empty() {
            state = self.step(state)?;
        }
        match state {
            // The input ended right after the equals sign or some spaces.
            State::DetermineValueType => {
                self.push_component(String::new(), ValueKind::String);
            }
            State::GetQuotedValue
            | State::GetUnquotedValue
            | State::GetHexValue => {}
            State::DetermineAttributeType
            | State::GetTypeByOid
            | State::GetTypeByName => return Err(SyntaxError::IncompleteRdn),
        }
        Ok(self.components)
    }

    /// Performs the step for `state`.
    fn step(&mut self, state: State) -> Result<State, SyntaxError> {
        match state {
            State::DetermineAttributeType => self.determine_attr_type(),
            State::GetTypeByOid => self.get_type_by_oid(),
            State::GetTypeByName => self.get_type_by_name(),
            State::DetermineValueType => self.determine_value_type(),
            State::GetQuotedValue => self.get_quoted_value(),
            State::GetUnquotedValue => self.get_unquoted_value(),
            State::GetHexValue => self.get_hex_value(),
        }
    }

    fn determine_attr_type(&mut self) -> Result<State, SyntaxError> {
        self.scanner.skip_spaces();
        match self.scanner.peek() {
            None => Err(SyntaxError::BlankRdn),
            Some(ch) if is_alpha(ch) => {
                // The prefix is case sensitive.
                let rest = self.scanner.rest();
                if rest.starts_with("OID.") || rest.starts_with("oid.") {
                    self.scanner.advance(4);
                    Ok(State::GetTypeByOid)
                } else {
                    Ok(State::GetTypeByName)
                }
            }
            Some(ch) if is_digit(ch) => Ok(State::GetTypeByOid),
            Some(ch) => Err(SyntaxError::IllegalTypeChar(ch)),
        }
    }

    fn get_type_by_name(&mut self) -> Result<State, SyntaxError> {
        let start = self.scanner.pos();
        if self.scanner.eat_if(is_alpha).is_none() {
            return Err(SyntaxError::IllegalNameStart);
        }
        self.scanner
            .skip_while(|ch| is_alpha(ch) || is_digit(ch) || ch == '-');
        let name = self.scanner.since(start);
        self.scanner.skip_spaces();
        if !self.scanner.eat('=') {
            return Err(SyntaxError::UnterminatedName);
        }
        self.attr_type = name;
        Ok(State::DetermineValueType)
    }

    fn get_type_by_oid(&mut self) -> Result<State, SyntaxError> {
        let start = self.scanner.pos();
        if self.scanner.eat_if(is_digit).is_none() {
            return Err(SyntaxError::IllegalOidStart);
        }
        self.scanner.skip_while(|ch| is_digit(ch) || ch == '.');
        let oid = self.scanner.since(start);
        self.scanner.skip_spaces();
        if !self.scanner.eat('=') {
            return Err(SyntaxError::UnterminatedOid);
        }
        check_oid(oid)?;
        self.attr_type = oid;
        Ok(State::DetermineValueType)
    }

    fn determine_value_type(&mut self) -> Result<State, SyntaxError> {
        self.scanner.skip_spaces();
        Ok(match self.scanner.peek() {
            // Stay put. `run` turns this into an empty value.
            None => State::DetermineValueType,
            Some('"') => State::GetQuotedValue,
            Some('#') => State::GetHexValue,
            Some(_) => State::GetUnquotedValue,
        })
    }

    fn get_hex_value(&mut self) -> Result<State, SyntaxError> {
        let start = self.scanner.pos();
        if !self.scanner.eat('#') {
            return Err(SyntaxError::MissingHexPrefix);
        }
        while let (Some(high), Some(low)) =
            (self.scanner.peek(), self.scanner.peek_second())
        {
            if !is_hex_digit(high) || !is_hex_digit(low) {
                break;
            }
            self.scanner.advance(2);
        }
        let value = self.scanner.since(start);
        self.scanner.skip_spaces();
        self.end_of_value(value.into(), ValueKind::Hex, State::GetHexValue)
    }

    fn get_quoted_value(&mut self) -> Result<State, SyntaxError> {
        if !self.scanner.eat('"') {
            return Err(SyntaxError::MissingQuote);
        }
        let mut value = Vec::new();
        loop {
            match self.scanner.next_char() {
                None => return Err(SyntaxError::UnterminatedQuotedValue),
                Some('"') => break,
                Some('\\') => unescape(&mut self.scanner, &mut value)?,
                Some(ch) => push_char(&mut value, ch),
            }
        }
        self.scanner.skip_spaces();
        self.end_of_value(
            decode(value),
            ValueKind::String,
            State::GetQuotedValue,
        )
    }

    fn get_unquoted_value(&mut self) -> Result<State, SyntaxError> {
        let mut value = Vec::new();

        // Only unescaped spaces at the very end are dropped.
        let mut trailing = 0;
        while let Some(ch) = self.scanner.peek() {
            if ch == '+' {
                break;
            }
            self.scanner.advance(ch.len_utf8());
            if ch == ' ' {
                trailing += 1;
                value.push(b' ');
                continue;
            }
            trailing = 0;
            if ch == '\\' {
                unescape(&mut self.scanner, &mut value)?;
            } else if is_special_char(ch) {
                return Err(SyntaxError::UnquotedSpecialChar(ch));
            } else {
                push_char(&mut value, ch);
            }
        }
        value.truncate(value.len() - trailing);
        self.end_of_value(
            decode(value),
            ValueKind::String,
            State::GetUnquotedValue,
        )
    }

    /// Completes a value once its content and trailing spaces are consumed.
    ///
    /// The value must be followed by either the end of input, in which case
    /// the parser stays in `state`, or a plus sign, which starts the next
    /// component.
    fn end_of_value(
        &mut self,
        value: String,
        kind: ValueKind,
        state: State,
    ) -> Result<State, SyntaxError> {
        if self.scanner.is_empty() {
            self.push_component(value, kind);
            Ok(state)
        } else if self.scanner.eat('+') {
            self.push_component(value, kind);
            Ok(State::DetermineAttributeType)
        } else {
            Err(SyntaxError::TrailingData)
        }
    }

    fn push_component(&mut self, value: String, kind: ValueKind) {
        self.components.push(RdnComponent::new(
            self.attr_type.into(),
            value,
            kind,
        ));
    }
}

//------------ Helper Functions ----------------------------------------------

/// Checks that a dotted OID is well-formed.
///
/// The OID only contains digits and periods and starts with a digit.
fn check_oid(oid: &str) -> Result<(), SyntaxError> {
    if oid.ends_with('.') {
        return Err(SyntaxError::OidTrailingPeriod);
    }
    if oid.contains("..") {
        return Err(SyntaxError::OidDoublePeriod);
    }
    if oid
        .split('.')
        .any(|item| item.len() > 1 && item.starts_with('0'))
    {
        return Err(SyntaxError::OidLeadingZero);
    }
    Ok(())
}

/// Converts a decoded value into a string.
///
/// Hex escapes can produce octet sequences that aren’t valid UTF-8. These
/// are replaced rather than rejected.
fn decode(value: Vec<u8>) -> String {
    match String::from_utf8(value) {
        Ok(value) => value,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}

//============ Testing =======================================================

#[cfg(test)]
#[cfg(feature = "std")]
mod test {
    use super::*;

    fn parse(s: &str) -> Rdn {
        Rdn::parse(s).unwrap()
    }

    fn err(s: &str) -> SyntaxError {
        Rdn::parse(s).unwrap_err().error()
    }

    fn steps(s: &str, state: State) -> (Result<State, SyntaxError>, &str) {
        let mut parser = Parser::new(s);
        let res = parser.step(state);
        (res, parser.scanner.rest())
    }

    #[test]
    fn determine_attr_type_step() {
        assert_eq!(
            steps("  CN=x", State::DetermineAttributeType),
            (Ok(State::GetTypeByName), "CN=x")
        );
        assert_eq!(
            steps("OID.1.2=x", State::DetermineAttributeType),
            (Ok(State::GetTypeByOid), "1.2=x")
        );
        assert_eq!(
            steps("oId.1.2=x", State::DetermineAttributeType),
            (Ok(State::GetTypeByName), "oId.1.2=x")
        );
        assert_eq!(
            steps("1.2=x", State::DetermineAttributeType),
            (Ok(State::GetTypeByOid), "1.2=x")
        );
        assert_eq!(
            steps("   ", State::DetermineAttributeType).0,
            Err(SyntaxError::BlankRdn)
        );
        assert_eq!(
            steps("-a=x", State::DetermineAttributeType).0,
            Err(SyntaxError::IllegalTypeChar('-'))
        );
    }

    #[test]
    fn type_steps() {
        let mut parser = Parser::new("ou-2 = x");
        assert_eq!(
            parser.step(State::GetTypeByName),
            Ok(State::DetermineValueType)
        );
        assert_eq!(parser.attr_type, "ou-2");
        assert_eq!(parser.scanner.rest(), " x");

        let mut parser = Parser::new("2.5.4.3=x");
        assert_eq!(
            parser.step(State::GetTypeByOid),
            Ok(State::DetermineValueType)
        );
        assert_eq!(parser.attr_type, "2.5.4.3");

        assert_eq!(
            steps("CN x", State::GetTypeByName).0,
            Err(SyntaxError::UnterminatedName)
        );
        assert_eq!(
            steps("1.2 x", State::GetTypeByOid).0,
            Err(SyntaxError::UnterminatedOid)
        );
        assert_eq!(
            steps("=x", State::GetTypeByOid).0,
            Err(SyntaxError::IllegalOidStart)
        );
    }

    #[test]
    fn value_steps() {
        assert_eq!(
            steps("  \"x\"", State::DetermineValueType),
            (Ok(State::GetQuotedValue), "\"x\"")
        );
        assert_eq!(
            steps("#00", State::DetermineValueType),
            (Ok(State::GetHexValue), "#00")
        );
        assert_eq!(
            steps("x", State::DetermineValueType),
            (Ok(State::GetUnquotedValue), "x")
        );
        assert_eq!(
            steps("#0a1B + CN=x", State::GetHexValue),
            (Ok(State::DetermineAttributeType), " CN=x")
        );
        assert_eq!(
            steps("\"a,b\" +x", State::GetQuotedValue),
            (Ok(State::DetermineAttributeType), "x")
        );
        assert_eq!(
            steps("a b  ", State::GetUnquotedValue),
            (Ok(State::GetUnquotedValue), "")
        );
    }

    #[test]
    fn first_char_steps() {
        assert_eq!(
            steps("1a=x", State::GetTypeByName),
            (Err(SyntaxError::IllegalNameStart), "1a=x")
        );
        assert_eq!(
            steps("00", State::GetHexValue),
            (Err(SyntaxError::MissingHexPrefix), "00")
        );
        assert_eq!(
            steps("x\"", State::GetQuotedValue),
            (Err(SyntaxError::MissingQuote), "x\"")
        );
    }

    #[test]
    fn check_oids() {
        assert_eq!(check_oid("0"), Ok(()));
        assert_eq!(check_oid("12.3.0.2"), Ok(()));
        assert_eq!(check_oid("12.3.04.2"), Err(SyntaxError::OidLeadingZero));
        assert_eq!(check_oid("00"), Err(SyntaxError::OidLeadingZero));
        assert_eq!(check_oid("1..2"), Err(SyntaxError::OidDoublePeriod));
        assert_eq!(check_oid("1.2."), Err(SyntaxError::OidTrailingPeriod));
    }

    #[test]
    fn single() {
        let rdn = parse("CN=Pete");
        assert_eq!(rdn.len(), 1);
        assert!(!rdn.is_multivalued());
        assert_eq!(rdn.first().attr_type(), "CN");
        assert_eq!(rdn.first().value(), "Pete");
        assert_eq!(rdn.first().value_kind(), ValueKind::String);
        assert_eq!(format!("{:?}", rdn), "Rdn(\"CN=Pete\")");
    }

    #[test]
    fn multivalued() {
        let rdn = parse("CN=Pete + SN=Everett+2.5.4.3=#0102");
        assert!(rdn.is_multivalued());
        let items: Vec<_> = rdn
            .iter()
            .map(|item| (item.attr_type(), item.value(), item.value_kind()))
            .collect();
        assert_eq!(
            items,
            [
                ("CN", "Pete", ValueKind::String),
                ("SN", "Everett", ValueKind::String),
                ("2.5.4.3", "#0102", ValueKind::Hex),
            ]
        );
        assert_eq!(
            rdn.to_string_with(EscapeChars::DEFAULT),
            "CN=Pete+SN=Everett+2.5.4.3=#0102"
        );
    }

    #[test]
    fn quoted_then_plus() {
        let rdn = parse("CN=\"Pete\"+SN=Everett");
        assert_eq!(rdn.len(), 2);
        assert_eq!(rdn.components()[1].value(), "Everett");
    }

    #[test]
    fn empty_values() {
        assert_eq!(parse("CN=").first().value(), "");
        assert_eq!(parse("CN=   ").first().value(), "");
        assert_eq!(parse("1.2=").first().value(), "");
        assert_eq!(parse("CN=+SN=x").first().value(), "");
    }

    #[test]
    fn unquoted_values() {
        assert_eq!(parse("CN=a  b  ").first().value(), "a  b");
        assert_eq!(parse("CN=a\\ ").first().value(), "a ");
        assert_eq!(parse("CN=a\\20 ").first().value(), "a ");
        assert_eq!(parse("CN=\\ a").first().value(), " a");
        assert_eq!(parse("CN=\\#a").first().value(), "#a");
        assert_eq!(parse("CN=a\\2Cb").first().value(), "a,b");
        assert_eq!(parse("CN=\\E2\\99\\AB").first().value(), "♫");
        assert_eq!(parse("CN=\\ff").first().value(), "\u{fffd}");
    }

    #[test]
    fn errors() {
        assert_eq!(err(""), SyntaxError::IncompleteRdn);
        assert_eq!(err("CN"), SyntaxError::UnterminatedName);
        assert_eq!(err("OID."), SyntaxError::IncompleteRdn);
        assert_eq!(err("oid.  "), SyntaxError::IllegalOidStart);
        assert_eq!(err("CN=a+"), SyntaxError::IncompleteRdn);
        assert_eq!(err("CN=a+ "), SyntaxError::BlankRdn);
        assert_eq!(err("3N=Pete"), SyntaxError::UnterminatedOid);
        assert_eq!(err("C_N=Pete"), SyntaxError::UnterminatedName);
        assert_eq!(err("CN=a=b"), SyntaxError::UnquotedSpecialChar('='));
        assert_eq!(err("CN=a\\q"), SyntaxError::IllegalEscape);
        assert_eq!(err("CN=\"a"), SyntaxError::UnterminatedQuotedValue);
        assert_eq!(err("CN=\"a\" b"), SyntaxError::TrailingData);
        assert_eq!(err("CN=#123"), SyntaxError::TrailingData);
        assert_eq!(err("CN=#12zz"), SyntaxError::TrailingData);
        assert_eq!(Rdn::parse("CN=a\\q").unwrap_err().input(), "CN=a\\q");
    }

    #[test]
    fn eq_and_hash() {
        assert_eq!(
            parse("CN=Pete+SN=Everett"),
            parse("cn=pete + sn=EVERETT")
        );
        assert_eq!(
            parse("CN=Pete").hash_code(),
            parse("cn=PETE").hash_code()
        );
        assert_ne!(parse("CN=Pete+SN=Everett"), parse("CN=Pete"));
        assert_ne!(parse("CN=\\#12"), parse("CN=#12"));
    }
}
