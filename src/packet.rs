//! LDAP packet type.
//!
//! A packet is the root of a parsed message: a tagged container (SEQUENCE on
//! the wire) whose first child attribute is always an INTEGER holding the
//! message id.

use bytes::Bytes;

use crate::attribute::{Attribute, parse_attributes};
use crate::ber::length::decode_length;
use crate::ber::{EncodeBuf, Tag};
use crate::error::{Error, Result};

/// The root object of a parse: tag plus ordered child attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    tag: Tag,
    children: Vec<Attribute>,
}

impl Packet {
    /// Create an outgoing packet with the given message id as child 0.
    pub fn new(message_id: i32) -> Self {
        Self {
            tag: Tag::SEQUENCE,
            children: vec![Attribute::integer(message_id)],
        }
    }

    /// Assemble a packet from a tag byte and its already-framed content.
    pub(crate) fn from_parts(tag: Tag, content: Bytes) -> Result<Self> {
        let len = content.len();
        Ok(Self {
            tag,
            children: parse_attributes(&content, 0, len)?,
        })
    }

    /// Parse one complete packet from a buffer starting at index 0.
    ///
    /// This is the non-defensive entry point: the caller guarantees the
    /// buffer holds at least one complete packet (e.g. it came from a
    /// length-prefixed store, or a test vector), and malformed input fails
    /// loudly with an `Err` instead of the framer's catch-and-report
    /// outcome. Use [`read_packet`](crate::framing::read_packet) to frame
    /// packets off a stream.
    pub fn parse(bytes: impl Into<Bytes>) -> Result<Self> {
        let bytes = bytes.into();
        let tag = Tag::parse(*bytes.first().ok_or_else(|| Error::truncated(1, 0))?);
        let (content_len, ber_len) = decode_length(&bytes, 1)?;
        let children = parse_attributes(&bytes, 1 + ber_len, content_len as usize)?;
        Ok(Self { tag, children })
    }

    /// The packet's tag.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Ordered child attributes.
    pub fn children(&self) -> &[Attribute] {
        &self.children
    }

    /// Child at `index`, or a `MissingChild` error.
    pub fn child(&self, index: usize) -> Result<&Attribute> {
        self.children
            .get(index)
            .ok_or_else(|| Error::value(crate::error::ValueErrorKind::MissingChild { index }))
    }

    /// Append a child attribute (protocol op, controls) to an outgoing packet.
    pub fn push_child(&mut self, child: Attribute) {
        self.children.push(child);
    }

    /// The message id: child attribute 0 read as an integer.
    pub fn message_id(&self) -> Result<i32> {
        self.child(0)?.as_i32()
    }

    /// Serialize to wire bytes: `[tag][BER length][children]`.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = EncodeBuf::new();
        buf.push_constructed(self.tag.to_byte(), |buf| {
            for child in self.children.iter().rev() {
                child.encode(buf);
            }
        });
        buf.finish()
    }
}
