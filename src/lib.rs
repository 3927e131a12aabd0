//! Async-first LDAP BER packet framing.
//!
//! This crate frames LDAP protocol messages on byte streams: it encodes and
//! decodes the BER length field, and pulls one complete, self-delimited
//! packet (`[tag][length][content]`) off a stream or buffer without knowing
//! the packet's structure in advance. Parsed packets expose their attribute
//! tree and message id.
//!
//! Three access patterns cover the same framing algorithm:
//! - buffer: [`Packet::parse`] over a complete in-memory packet, loud errors
//! - blocking stream: [`framing::read_packet`] over any [`std::io::Read`]
//! - suspendable stream: [`framing::read_packet_async`] over a
//!   [`tokio::io::AsyncRead`], with cooperative cancellation, plus
//!   [`framing::PacketStream`] for read loops
//!
//! # Wire compatibility
//!
//! Long-form lengths are always encoded as exactly 4 big-endian octets
//! (header byte `0x84`), not the minimal count BER would permit, for
//! compatibility with peers that expect 4-byte lengths. See
//! [`ber::length`].
//!
//! # Example
//!
//! ```rust,no_run
//! use ldap_frame::prelude::*;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example(stream: &mut tokio::net::TcpStream) {
//! let cancel = CancellationToken::new();
//! loop {
//!     match read_packet_async(stream, &cancel).await {
//!         FrameOutcome::Packet(packet) => {
//!             println!("message id {:?}", packet.message_id());
//!         }
//!         FrameOutcome::EndOfStream => break,
//!         FrameOutcome::Failed(error) => {
//!             eprintln!("connection unusable: {error}");
//!             break;
//!         }
//!     }
//! }
//! # }
//! ```

pub mod attribute;
pub mod ber;
pub mod error;
pub mod framing;
pub mod packet;
pub mod prelude;

pub(crate) mod util;

pub use attribute::Attribute;
pub use ber::Tag;
pub use error::{Error, Result};
pub use framing::{FrameOutcome, PacketStream, read_packet, read_packet_async};
pub use packet::Packet;
