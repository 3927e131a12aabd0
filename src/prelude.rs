//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust,no_run
//! use ldap_frame::prelude::*;
//! ```
//!
//! This imports:
//! - Core types: [`Packet`], [`Attribute`], [`Tag`]
//! - Framing: [`FrameOutcome`], [`PacketStream`], [`read_packet`], [`read_packet_async`]
//! - Error handling: [`Error`], [`Result`]

pub use crate::attribute::Attribute;
pub use crate::ber::Tag;
pub use crate::error::{Error, Result};
pub use crate::framing::{FrameOutcome, PacketStream, read_packet, read_packet_async};
pub use crate::packet::Packet;
