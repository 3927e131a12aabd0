//! BER tag definitions for LDAP.
//!
//! Tag encoding follows X.690 Section 8.1.2:
//! - Bits 7-6: Class (00=Universal, 01=Application, 10=Context-specific, 11=Private)
//! - Bit 5: Primitive (0) or Constructed (1)
//! - Bits 4-0: Tag number (0-30)
//!
//! LDAP fits every tag it uses in a single byte, so the multi-byte tag form
//! is not modeled.

/// Tag class bits (bits 7-6)
pub mod class {
    pub const UNIVERSAL: u8 = 0x00;
    pub const APPLICATION: u8 = 0x40;
    pub const CONTEXT_SPECIFIC: u8 = 0x80;
    pub const PRIVATE: u8 = 0xC0;
}

/// Constructed bit (bit 5)
pub const CONSTRUCTED: u8 = 0x20;

/// Universal tags (class bits 00)
pub mod universal {
    pub const BOOLEAN: u8 = 0x01;
    pub const INTEGER: u8 = 0x02;
    pub const OCTET_STRING: u8 = 0x04;
    pub const ENUMERATED: u8 = 0x0A;
    pub const SEQUENCE: u8 = 0x30; // Constructed
    pub const SET: u8 = 0x31; // Constructed
}

/// LDAP operation tags (application class, RFC 4511 Section 4.1.1)
pub mod operation {
    use super::CONSTRUCTED;
    use super::class::APPLICATION;

    pub const BIND_REQUEST: u8 = APPLICATION | CONSTRUCTED; // 0x60
    pub const BIND_RESPONSE: u8 = APPLICATION | CONSTRUCTED | 0x01; // 0x61
    pub const UNBIND_REQUEST: u8 = APPLICATION | 0x02; // 0x42
    pub const SEARCH_REQUEST: u8 = APPLICATION | CONSTRUCTED | 0x03; // 0x63
    pub const SEARCH_RESULT_ENTRY: u8 = APPLICATION | CONSTRUCTED | 0x04; // 0x64
    pub const SEARCH_RESULT_DONE: u8 = APPLICATION | CONSTRUCTED | 0x05; // 0x65
    pub const MODIFY_REQUEST: u8 = APPLICATION | CONSTRUCTED | 0x06; // 0x66
    pub const MODIFY_RESPONSE: u8 = APPLICATION | CONSTRUCTED | 0x07; // 0x67
    pub const ADD_REQUEST: u8 = APPLICATION | CONSTRUCTED | 0x08; // 0x68
    pub const ADD_RESPONSE: u8 = APPLICATION | CONSTRUCTED | 0x09; // 0x69
    pub const DEL_REQUEST: u8 = APPLICATION | 0x0A; // 0x4A
    pub const DEL_RESPONSE: u8 = APPLICATION | CONSTRUCTED | 0x0B; // 0x6B
    pub const MODIFY_DN_REQUEST: u8 = APPLICATION | CONSTRUCTED | 0x0C; // 0x6C
    pub const MODIFY_DN_RESPONSE: u8 = APPLICATION | CONSTRUCTED | 0x0D; // 0x6D
    pub const COMPARE_REQUEST: u8 = APPLICATION | CONSTRUCTED | 0x0E; // 0x6E
    pub const COMPARE_RESPONSE: u8 = APPLICATION | CONSTRUCTED | 0x0F; // 0x6F
    pub const ABANDON_REQUEST: u8 = APPLICATION | 0x10; // 0x50
    pub const SEARCH_RESULT_REFERENCE: u8 = APPLICATION | CONSTRUCTED | 0x13; // 0x73
    pub const EXTENDED_REQUEST: u8 = APPLICATION | CONSTRUCTED | 0x17; // 0x77
    pub const EXTENDED_RESPONSE: u8 = APPLICATION | CONSTRUCTED | 0x18; // 0x78
}

/// A single-byte BER tag.
///
/// Parsing is infallible: every byte value is a valid tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(u8);

impl Tag {
    /// Universal SEQUENCE, the tag every LDAP message envelope carries.
    pub const SEQUENCE: Tag = Tag(universal::SEQUENCE);
    /// Universal INTEGER.
    pub const INTEGER: Tag = Tag(universal::INTEGER);
    /// Universal BOOLEAN.
    pub const BOOLEAN: Tag = Tag(universal::BOOLEAN);
    /// Universal OCTET STRING.
    pub const OCTET_STRING: Tag = Tag(universal::OCTET_STRING);
    /// Universal ENUMERATED.
    pub const ENUMERATED: Tag = Tag(universal::ENUMERATED);

    /// Parse a tag from its wire byte.
    #[inline]
    pub const fn parse(byte: u8) -> Self {
        Self(byte)
    }

    /// Build an application-class tag (LDAP operations).
    #[inline]
    pub const fn application(number: u8, constructed: bool) -> Self {
        Self(class::APPLICATION | if constructed { CONSTRUCTED } else { 0 } | (number & 0x1F))
    }

    /// Build a context-specific tag (choice discriminators inside operations).
    #[inline]
    pub const fn context(number: u8, constructed: bool) -> Self {
        Self(class::CONTEXT_SPECIFIC | if constructed { CONSTRUCTED } else { 0 } | (number & 0x1F))
    }

    /// The wire byte for this tag.
    #[inline]
    pub const fn to_byte(self) -> u8 {
        self.0
    }

    /// The class bits (see [`class`]).
    #[inline]
    pub const fn class(self) -> u8 {
        self.0 & 0xC0
    }

    /// Whether the constructed bit is set.
    #[inline]
    pub const fn is_constructed(self) -> bool {
        self.0 & CONSTRUCTED != 0
    }

    /// The tag number (bits 4-0).
    #[inline]
    pub const fn number(self) -> u8 {
        self.0 & 0x1F
    }
}

impl From<u8> for Tag {
    fn from(byte: u8) -> Self {
        Self::parse(byte)
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let class = match self.class() {
            class::UNIVERSAL => "universal",
            class::APPLICATION => "application",
            class::CONTEXT_SPECIFIC => "context",
            _ => "private",
        };
        write!(
            f,
            "{} {} {}",
            class,
            if self.is_constructed() {
                "constructed"
            } else {
                "primitive"
            },
            self.number()
        )
    }
}
