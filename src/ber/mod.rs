//! BER (Basic Encoding Rules) codec primitives for LDAP.
//!
//! This module provides the length-field codec and tag handling used to
//! frame LDAP messages. The length encoding follows X.690 except that long
//! form always uses 4 octets, matching the peers this crate interoperates
//! with (see [`length`]).

mod encode;
pub mod length;
pub mod tag;

pub use encode::*;
pub use length::*;
pub use tag::Tag;
