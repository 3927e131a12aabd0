//! LDAP attribute tree.
//!
//! An attribute is one TLV node of a BER-encoded LDAP message: a tag, and
//! either a primitive value or a list of child attributes when the tag is
//! constructed. The packet framer hands a content window to
//! [`parse_attributes`], which walks it recursively; the parser never reads
//! outside the window it is given.

use bytes::Bytes;

use crate::ber::length::decode_length;
use crate::ber::tag::{Tag, universal};
use crate::ber::{EncodeBuf, encode_integer_stack};
use crate::error::{Error, ParseErrorKind, Result, ValueErrorKind};

/// One node of a parsed LDAP message.
///
/// Primitive attributes own their value bytes (cheap slices of the packet
/// content); constructed attributes own their children. The tree is built
/// once at parse time and not mutated afterwards, except by the builder
/// methods used to assemble outgoing messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    tag: Tag,
    value: Bytes,
    children: Vec<Attribute>,
}

impl Attribute {
    /// Create a primitive attribute with raw value bytes.
    pub fn primitive(tag: Tag, value: impl Into<Bytes>) -> Self {
        Self {
            tag,
            value: value.into(),
            children: Vec::new(),
        }
    }

    /// Create a constructed attribute from child attributes.
    pub fn constructed(tag: Tag, children: Vec<Attribute>) -> Self {
        Self {
            tag,
            value: Bytes::new(),
            children,
        }
    }

    /// Create an INTEGER attribute.
    pub fn integer(value: i32) -> Self {
        Self::integer_tagged(Tag::INTEGER, value)
    }

    /// Create an ENUMERATED attribute.
    pub fn enumerated(value: i32) -> Self {
        Self::integer_tagged(Tag::ENUMERATED, value)
    }

    /// Create a two's-complement integer attribute with an explicit tag.
    pub fn integer_tagged(tag: Tag, value: i32) -> Self {
        let (arr, len) = encode_integer_stack(value);
        Self::primitive(tag, Bytes::copy_from_slice(&arr[4 - len..]))
    }

    /// Create a BOOLEAN attribute.
    pub fn boolean(value: bool) -> Self {
        Self::primitive(
            Tag::BOOLEAN,
            Bytes::from_static(if value { &[0xFF] } else { &[0x00] }),
        )
    }

    /// Create an OCTET STRING attribute from a string.
    pub fn string(value: &str) -> Self {
        Self::primitive(Tag::OCTET_STRING, Bytes::copy_from_slice(value.as_bytes()))
    }

    /// Create an empty SEQUENCE attribute.
    pub fn sequence() -> Self {
        Self::constructed(Tag::SEQUENCE, Vec::new())
    }

    /// The attribute's tag.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Raw value bytes. Empty for constructed attributes.
    pub fn value(&self) -> &Bytes {
        &self.value
    }

    /// Child attributes. Empty for primitive attributes.
    pub fn children(&self) -> &[Attribute] {
        &self.children
    }

    /// Child at `index`, or a `MissingChild` error.
    pub fn child(&self, index: usize) -> Result<&Attribute> {
        self.children
            .get(index)
            .ok_or_else(|| Error::value(ValueErrorKind::MissingChild { index }))
    }

    /// Append a child attribute (for building outgoing messages).
    pub fn push_child(&mut self, child: Attribute) {
        self.children.push(child);
    }

    /// Interpret the value as a big-endian two's-complement integer.
    pub fn as_i32(&self) -> Result<i32> {
        let bytes = self.primitive_value()?;
        match bytes.len() {
            0 => Err(Error::value(ValueErrorKind::ZeroLengthInteger)),
            1..=4 => {
                let mut acc: i32 = if bytes[0] & 0x80 != 0 { -1 } else { 0 };
                for &b in bytes.iter() {
                    acc = (acc << 8) | i32::from(b);
                }
                Ok(acc)
            }
            length => Err(Error::value(ValueErrorKind::IntegerTooLong { length })),
        }
    }

    /// Interpret the value as a BOOLEAN (any nonzero byte is true).
    pub fn as_bool(&self) -> Result<bool> {
        let bytes = self.primitive_value()?;
        if bytes.len() != 1 {
            return Err(Error::value(ValueErrorKind::InvalidBooleanLength {
                length: bytes.len(),
            }));
        }
        Ok(bytes[0] != 0)
    }

    /// Interpret the value as a UTF-8 string.
    pub fn as_str(&self) -> Result<&str> {
        let bytes = self.primitive_value()?;
        std::str::from_utf8(bytes).map_err(|_| Error::value(ValueErrorKind::InvalidUtf8))
    }

    fn primitive_value(&self) -> Result<&Bytes> {
        if self.tag.is_constructed() {
            return Err(Error::value(ValueErrorKind::NotPrimitive));
        }
        Ok(&self.value)
    }

    /// Encode into a reverse buffer.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        if self.tag.is_constructed() {
            buf.push_constructed(self.tag.to_byte(), |buf| {
                // Reverse buffer: children go in reverse order
                for child in self.children.iter().rev() {
                    child.encode(buf);
                }
            });
        } else {
            buf.push_bytes(&self.value);
            buf.push_length(self.value.len());
            buf.push_tag(self.tag.to_byte());
        }
    }

    /// Serialize this attribute (and its subtree) to wire bytes.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = EncodeBuf::new();
        self.encode(&mut buf);
        buf.finish()
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.tag.is_constructed() {
            write!(f, "{} ({} children)", self.tag, self.children.len())
        } else if self.tag.to_byte() == universal::INTEGER
            || self.tag.to_byte() == universal::ENUMERATED
        {
            match self.as_i32() {
                Ok(v) => write!(f, "{} = {}", self.tag, v),
                Err(_) => write!(f, "{} ({} bytes)", self.tag, self.value.len()),
            }
        } else {
            match self.as_str() {
                Ok(s) => write!(f, "{} = {:?}", self.tag, s),
                Err(_) => write!(f, "{} ({} bytes)", self.tag, self.value.len()),
            }
        }
    }
}

/// Maximum nesting depth of constructed attributes.
///
/// Parsing is recursive, so the depth of the tree is bounded to keep a
/// hostile packet of deeply nested sequences from overflowing the stack.
/// Real LDAP messages nest a handful of levels; 64 is far beyond anything
/// a conforming peer produces.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Parse the attributes living in `bytes[start..start + count)`.
///
/// Each attribute is `[tag][BER length][content]`; constructed tags recurse
/// into their content, primitive tags capture it as value bytes. The window
/// must be exactly consumed by well-formed TLVs; an attribute extending past
/// the window fails with `TlvOverflow`, a length field running off the
/// window fails as truncated, and nesting past [`MAX_NESTING_DEPTH`] fails
/// with `NestingTooDeep`.
pub fn parse_attributes(bytes: &Bytes, start: usize, count: usize) -> Result<Vec<Attribute>> {
    parse_attributes_at(bytes, start, count, 0)
}

fn parse_attributes_at(
    bytes: &Bytes,
    start: usize,
    count: usize,
    depth: usize,
) -> Result<Vec<Attribute>> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(Error::parse(
            start,
            ParseErrorKind::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
            },
        ));
    }
    let end = start
        .checked_add(count)
        .ok_or_else(|| Error::parse(start, ParseErrorKind::RangeOverflow))?;
    if end > bytes.len() {
        return Err(Error::truncated(
            count,
            bytes.len().saturating_sub(start),
        ));
    }

    let mut attributes = Vec::new();
    let mut pos = start;
    while pos < end {
        let tag = Tag::parse(bytes[pos]);
        let (content_len, ber_len) = decode_length(&bytes[..end], pos + 1)?;

        let content_start = pos + 1 + ber_len;
        let content_end = content_start
            .checked_add(content_len as usize)
            .ok_or_else(|| Error::parse(pos, ParseErrorKind::RangeOverflow))?;
        if content_end > end {
            return Err(Error::parse(pos, ParseErrorKind::TlvOverflow));
        }

        let attribute = if tag.is_constructed() {
            Attribute::constructed(
                tag,
                parse_attributes_at(bytes, content_start, content_len as usize, depth + 1)?,
            )
        } else {
            Attribute::primitive(tag, bytes.slice(content_start..content_end))
        };
        attributes.push(attribute);
        pos = content_end;
    }

    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_roundtrip() {
        for value in [0, 1, 127, 128, 255, 256, -1, -128, i32::MAX, i32::MIN] {
            let attr = Attribute::integer(value);
            assert_eq!(attr.as_i32().unwrap(), value);
        }
    }

    #[test]
    fn test_boolean_roundtrip() {
        assert!(Attribute::boolean(true).as_bool().unwrap());
        assert!(!Attribute::boolean(false).as_bool().unwrap());
    }

    #[test]
    fn test_string_roundtrip() {
        let attr = Attribute::string("cn=admin,dc=example,dc=com");
        assert_eq!(attr.as_str().unwrap(), "cn=admin,dc=example,dc=com");
    }

    #[test]
    fn test_accessor_on_constructed_fails() {
        let attr = Attribute::sequence();
        assert!(matches!(
            attr.as_i32(),
            Err(Error::Value {
                kind: ValueErrorKind::NotPrimitive
            })
        ));
    }

    #[test]
    fn test_integer_too_long() {
        let attr = Attribute::primitive(Tag::INTEGER, Bytes::from_static(&[1, 2, 3, 4, 5]));
        assert!(matches!(
            attr.as_i32(),
            Err(Error::Value {
                kind: ValueErrorKind::IntegerTooLong { length: 5 }
            })
        ));
    }

    #[test]
    fn test_zero_length_integer() {
        let attr = Attribute::primitive(Tag::INTEGER, Bytes::new());
        assert!(matches!(
            attr.as_i32(),
            Err(Error::Value {
                kind: ValueErrorKind::ZeroLengthInteger
            })
        ));
    }

    #[test]
    fn test_parse_flat_attributes() {
        // INTEGER 1, OCTET STRING "ab"
        let bytes = Bytes::from_static(&[0x02, 0x01, 0x01, 0x04, 0x02, b'a', b'b']);
        let attrs = parse_attributes(&bytes, 0, bytes.len()).unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].as_i32().unwrap(), 1);
        assert_eq!(attrs[1].as_str().unwrap(), "ab");
    }

    #[test]
    fn test_parse_nested_sequence() {
        // SEQUENCE { INTEGER 7 }
        let bytes = Bytes::from_static(&[0x30, 0x03, 0x02, 0x01, 0x07]);
        let attrs = parse_attributes(&bytes, 0, bytes.len()).unwrap();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].children().len(), 1);
        assert_eq!(attrs[0].child(0).unwrap().as_i32().unwrap(), 7);
    }

    #[test]
    fn test_parse_respects_window() {
        // Window covers only the first TLV; the second must not be touched.
        let bytes = Bytes::from_static(&[0x02, 0x01, 0x01, 0x02, 0x01, 0x02]);
        let attrs = parse_attributes(&bytes, 0, 3).unwrap();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].as_i32().unwrap(), 1);
    }

    #[test]
    fn test_parse_tlv_overflow() {
        // Declared content length 5, only 1 byte in the window
        let bytes = Bytes::from_static(&[0x02, 0x05, 0x01]);
        let err = parse_attributes(&bytes, 0, bytes.len()).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse {
                offset: 0,
                kind: ParseErrorKind::TlvOverflow
            }
        ));
    }

    #[test]
    fn test_parse_window_past_buffer() {
        let bytes = Bytes::from_static(&[0x02, 0x01]);
        assert!(parse_attributes(&bytes, 0, 10).unwrap_err().is_truncated());
    }

    /// `depth` sequences wrapped around an empty innermost one.
    fn nested_sequences(depth: usize) -> Bytes {
        use crate::ber::length::encode_length;

        let mut bytes = vec![0x30, 0x00];
        for _ in 1..depth {
            let mut wrapped = vec![0x30];
            wrapped.extend_from_slice(&encode_length(bytes.len() as u32));
            wrapped.append(&mut bytes);
            bytes = wrapped;
        }
        Bytes::from(bytes)
    }

    #[test]
    fn test_parse_nesting_within_limit() {
        let bytes = nested_sequences(MAX_NESTING_DEPTH - 1);
        let attrs = parse_attributes(&bytes, 0, bytes.len()).unwrap();
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_parse_nesting_too_deep_fails_instead_of_recursing() {
        let bytes = nested_sequences(MAX_NESTING_DEPTH * 20);
        let err = parse_attributes(&bytes, 0, bytes.len()).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse {
                kind: ParseErrorKind::NestingTooDeep {
                    limit: MAX_NESTING_DEPTH
                },
                ..
            }
        ));
    }

    #[test]
    fn test_encode_parse_roundtrip() {
        let mut seq = Attribute::sequence();
        seq.push_child(Attribute::integer(1));
        seq.push_child(Attribute::string("uid=jdoe"));
        seq.push_child(Attribute::boolean(true));

        let wire = seq.to_bytes();
        let parsed = parse_attributes(&wire, 0, wire.len()).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0], seq);
    }
}
