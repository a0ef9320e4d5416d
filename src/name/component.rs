//! A single attribute type and value pair.
//!
//! This is a private module. Its public types are re-exported by the parent.

use super::chars::is_digit;
use super::escape::{escape, EscapeChars};
use alloc::string::String;
use core::hash::Hasher;
use core::{fmt, hash};
use siphasher::sip::SipHasher13;

//------------ ValueKind -----------------------------------------------------

/// The encoding of an attribute value.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ValueKind {
    /// An ordinary text value.
    String,

    /// A binary value given as `#` followed by pairs of hex digits.
    ///
    /// The value is kept in its textual form, including the leading `#`,
    /// and is never decoded.
    Hex,
}

impl ValueKind {
    /// Returns the contribution of the kind to a component’s hash code.
    fn hash_code(self) -> u32 {
        match self {
            ValueKind::String => 0,
            ValueKind::Hex => 1,
        }
    }
}

//------------ RdnComponent --------------------------------------------------

/// One `type=value` pair of an RDN.
///
/// Most RDNs consist of a single component. A multivalued RDN has several,
/// separated by plus signs in the string representation.
///
/// Components are only ever created by parsing a DN. They are compared
/// ignoring case in both the attribute type and the value, but the kind of
/// value has to match exactly. The original case is kept for display.
#[derive(Clone)]
pub struct RdnComponent {
    /// The attribute type as given, either a name or a dotted OID.
    attr_type: String,

    /// The decoded value.
    value: String,

    /// How the value was encoded.
    kind: ValueKind,

    /// The hash code, derived from the three fields above.
    hash: u32,
}

impl RdnComponent {
    /// The seed of the hash code.
    const HASH_SEED: u32 = 0x4801_2e7a;

    /// Creates a new component from its parts.
    pub(super) fn new(
        attr_type: String,
        value: String,
        kind: ValueKind,
    ) -> Self {
        let hash = Self::HASH_SEED
            ^ kind.hash_code()
            ^ folded_hash(&attr_type)
            ^ folded_hash(&value);
        RdnComponent {
            attr_type,
            value,
            kind,
            hash,
        }
    }

    /// Returns the attribute type, such as `CN`, `OU`, or `DC`.
    ///
    /// If the type was given as a dotted OID, this is the OID without the
    /// optional `OID.` prefix.
    pub fn attr_type(&self) -> &str {
        &self.attr_type
    }

    /// Returns whether the attribute type is a dotted OID.
    pub fn is_oid(&self) -> bool {
        self.attr_type.starts_with(is_digit)
    }

    /// Returns the value.
    ///
    /// For string values, this is the value with all escape sequences and
    /// quoting removed. For hex values, it is the `#` followed by the hex
    /// digits exactly as they appeared in the input.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns how the value was encoded.
    pub fn value_kind(&self) -> ValueKind {
        self.kind
    }

    /// Returns the hash code of the component.
    ///
    /// This value is independent of the case of type and value.
    pub fn hash_code(&self) -> u32 {
        self.hash
    }

    /// Returns an object that displays the component with the given escaping.
    pub fn fmt_with(&self, escape: EscapeChars) -> impl fmt::Display + '_ {
        ComponentFmt {
            component: self,
            escape,
        }
    }
}

//--- PartialEq, Eq, and Hash

impl PartialEq for RdnComponent {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.kind == other.kind
            && folded_eq(&self.attr_type, &other.attr_type)
            && folded_eq(&self.value, &other.value)
    }
}

impl Eq for RdnComponent {}

impl hash::Hash for RdnComponent {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash)
    }
}

//--- Display and Debug

impl fmt::Display for RdnComponent {
    /// Formats the component using the process-wide default escaping.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.fmt_with(EscapeChars::default_escape()))
    }
}

impl fmt::Debug for RdnComponent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RdnComponent")
            .field("attr_type", &self.attr_type)
            .field("value", &self.value)
            .field("kind", &self.kind)
            .finish()
    }
}

//------------ ComponentFmt --------------------------------------------------

/// Displays a component with explicit escaping.
struct ComponentFmt<'a> {
    component: &'a RdnComponent,
    escape: EscapeChars,
}

impl fmt::Display for ComponentFmt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let component = self.component;
        match component.kind {
            // Hex values contain only safe characters.
            ValueKind::Hex => {
                write!(f, "{}={}", component.attr_type, component.value)
            }
            ValueKind::String => write!(
                f,
                "{}={}",
                component.attr_type,
                escape(&component.value, self.escape)
            ),
        }
    }
}

//------------ Helper Functions ----------------------------------------------

/// Returns whether two strings are equal when both are lower-cased.
fn folded_eq(left: &str, right: &str) -> bool {
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}

/// Returns a 32 bit hash of the lower-cased string.
fn folded_hash(s: &str) -> u32 {
    let mut hasher = SipHasher13::new();
    let mut buf = [0u8; 4];
    for ch in s.chars().flat_map(char::to_lowercase) {
        hasher.write(ch.encode_utf8(&mut buf).as_bytes());
    }
    let res = hasher.finish();
    (res ^ (res >> 32)) as u32
}

//============ Testing =======================================================
