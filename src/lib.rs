//! LDAP distinguished names for Rust.
//!
//! This crate parses, compares, and prints LDAP distinguished names in
//! their string representation, e.g., `CN=Pete,OU=People,DC=example,DC=com`.
//! It is meant as a building block for directory clients that need DNs as
//! values: for navigating the directory tree or when constructing protocol
//! messages.
//!
//! All types live in the [name] module and are re-exported here. Start with
//! [`Dn`].
//!
//! ```
//! use ldap_dn::{Dn, EscapeChars};
//!
//! let dn: Dn = "CN=Pete + SN=Everett ; OU=People,DC=example,DC=com"
//!     .parse()
//!     .unwrap();
//! assert_eq!(dn.len(), 4);
//! assert!(dn.first().unwrap().is_multivalued());
//! assert_eq!(
//!     dn.to_string_with(EscapeChars::DEFAULT),
//!     "CN=Pete+SN=Everett,OU=People,DC=example,DC=com"
//! );
//! assert_eq!(
//!     dn,
//!     "cn=pete+sn=everett,ou=people,dc=example,dc=com"
//!         .parse::<Dn>()
//!         .unwrap()
//! );
//! ```
//!
//! # Reference of Feature Flags
//!
//! The following is the complete list of the feature flags available.
//!
//! * `serde`: Enables serialization and deserialization of [`Dn`] and
//!   [`EscapeChars`] via [serde](https://serde.rs/).
//! * `std`: support for the Rust std library. This feature is enabled by
//!   default.
//! * `tracing`: Emits [tracing](https://github.com/tokio-rs/tracing)
//!   events when parsing DNs. This feature also enables `std`.

#![no_std]
#![allow(renamed_and_removed_lints)]
#![allow(clippy::unknown_clippy_lints)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "std")]
#[allow(unused_imports)] // Import macros even if unused.
#[macro_use]
extern crate std;

extern crate alloc;

pub mod name;

pub use self::name::{
    Dn, EscapeChars, Error, FromStrError, Rdn, RdnComponent, ValueKind,
};
