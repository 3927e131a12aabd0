//! Packet framing.
//!
//! Pulls exactly one complete packet (`[tag][BER length][content]`) off a
//! byte stream without knowing the packet's structure in advance. Each call
//! is self-contained: no framing state persists between packets, and on
//! success exactly `1 + length-field + content` bytes have been consumed.
//!
//! The stream entry points never return a raw `Err`: every failure is folded
//! into [`FrameOutcome::Failed`] so a connection read loop can stop cleanly
//! without a single bad packet unwinding the process. The amount consumed
//! before a failure is unspecified; treat the source as unusable for further
//! framing and close it. Emitted `tracing` events are diagnostics only - the
//! returned error value is the contract, and logging policy belongs to the
//! caller.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_core::Stream;
use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::ber::Tag;
use crate::ber::length::{read_length, read_length_async};
use crate::error::{Error, Result};
use crate::packet::Packet;
use crate::util::{read_fill, read_fill_async};

/// Result of one framing attempt.
///
/// End-of-stream is the normal "no more packets" condition, distinct from
/// any failure.
#[derive(Debug)]
pub enum FrameOutcome {
    /// A complete packet was framed and parsed.
    Packet(Packet),
    /// The source had no bytes left at a packet boundary.
    EndOfStream,
    /// Framing or parsing failed; the source is no longer usable.
    Failed(Error),
}

impl FrameOutcome {
    /// The packet, if this outcome carries one.
    pub fn into_packet(self) -> Option<Packet> {
        match self {
            Self::Packet(packet) => Some(packet),
            _ => None,
        }
    }

    /// Whether this is the clean end-of-stream outcome.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }

    /// Convert to a `Result`, mapping end-of-stream to `Ok(None)`.
    pub fn into_result(self) -> Result<Option<Packet>> {
        match self {
            Self::Packet(packet) => Ok(Some(packet)),
            Self::EndOfStream => Ok(None),
            Self::Failed(error) => Err(error),
        }
    }
}

impl From<Result<Option<Packet>>> for FrameOutcome {
    fn from(result: Result<Option<Packet>>) -> Self {
        match result {
            Ok(Some(packet)) => Self::Packet(packet),
            Ok(None) => Self::EndOfStream,
            Err(error) => {
                debug!(%error, "failed to frame packet");
                Self::Failed(error)
            }
        }
    }
}

/// Step size for content buffers.
///
/// The declared content length is peer-controlled, so it is never trusted
/// for an upfront allocation: the buffer grows one chunk at a time and only
/// as far as bytes actually arrive. A 6-byte stream declaring 4 GiB of
/// content fails as truncated after one small chunk.
const CONTENT_CHUNK: usize = 64 * 1024;

/// Read one packet from a blocking byte source.
///
/// Zero bytes available at the tag position is [`FrameOutcome::EndOfStream`];
/// anything that goes wrong after that is [`FrameOutcome::Failed`].
pub fn read_packet<R: std::io::Read + ?Sized>(reader: &mut R) -> FrameOutcome {
    try_read_packet(reader).into()
}

fn try_read_packet<R: std::io::Read + ?Sized>(reader: &mut R) -> Result<Option<Packet>> {
    let mut tag_byte = [0u8; 1];
    if read_fill(reader, &mut tag_byte)? == 0 {
        trace!("source empty at packet boundary");
        return Ok(None);
    }

    let (content_len, ber_len) = read_length(reader)?;
    let declared = content_len as usize;
    let mut content = Vec::new();
    while content.len() < declared {
        let step = (declared - content.len()).min(CONTENT_CHUNK);
        let start = content.len();
        content.resize(start + step, 0);
        let filled = read_fill(reader, &mut content[start..])?;
        if filled < step {
            return Err(Error::truncated(declared, start + filled));
        }
    }

    trace!(
        tag = tag_byte[0],
        content_len,
        consumed = 1 + ber_len + content_len as usize,
        "framed packet"
    );
    Packet::from_parts(Tag::parse(tag_byte[0]), Bytes::from(content)).map(Some)
}

/// Read one packet from a suspendable byte source.
///
/// Suspends only while waiting for bytes. The cancellation token is honored
/// at every suspension point: once `cancel` fires, the read stops promptly
/// and the outcome is [`FrameOutcome::Failed`] with [`Error::Cancelled`],
/// with no partial packet visible to the caller. Dropping the returned
/// future cancels the read as usual in tokio.
pub async fn read_packet_async<R>(reader: &mut R, cancel: &CancellationToken) -> FrameOutcome
where
    R: AsyncRead + Unpin + ?Sized,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => FrameOutcome::Failed(Error::Cancelled),
        result = try_read_packet_async(reader) => result.into(),
    }
}

async fn try_read_packet_async<R>(reader: &mut R) -> Result<Option<Packet>>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut tag_byte = [0u8; 1];
    if read_fill_async(reader, &mut tag_byte).await? == 0 {
        trace!("source empty at packet boundary");
        return Ok(None);
    }

    let (content_len, ber_len) = read_length_async(reader).await?;
    let declared = content_len as usize;
    let mut content = Vec::new();
    while content.len() < declared {
        let step = (declared - content.len()).min(CONTENT_CHUNK);
        let start = content.len();
        content.resize(start + step, 0);
        let filled = read_fill_async(reader, &mut content[start..]).await?;
        if filled < step {
            return Err(Error::truncated(declared, start + filled));
        }
    }

    trace!(
        tag = tag_byte[0],
        content_len,
        consumed = 1 + ber_len + content_len as usize,
        "framed packet"
    );
    Packet::from_parts(Tag::parse(tag_byte[0]), Bytes::from(content)).map(Some)
}

/// Async stream of packets framed off an owned reader.
///
/// Yields packets in the exact order their bytes appear on the stream. The
/// stream ends at end-of-stream, or after yielding one `Err` when framing
/// fails (the source is non-resumable at that point). Reads are strictly
/// sequential; the stream owns the reader, so overlapping reads cannot
/// occur.
pub struct PacketStream<R> {
    reader: Option<R>,
    cancel: CancellationToken,
    done: bool,
    pending: Option<Pin<Box<dyn Future<Output = (R, FrameOutcome)> + Send>>>,
}

impl<R> PacketStream<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    /// Create a packet stream over an owned reader.
    pub fn new(reader: R) -> Self {
        Self::with_cancellation(reader, CancellationToken::new())
    }

    /// Create a packet stream whose reads honor an external token.
    pub fn with_cancellation(reader: R, cancel: CancellationToken) -> Self {
        Self {
            reader: Some(reader),
            cancel,
            done: false,
            pending: None,
        }
    }

    /// The token cancelling in-flight reads on this stream.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Give the reader back, once no read is in flight.
    pub fn into_inner(self) -> Option<R> {
        self.reader
    }
}

impl<R> Stream for PacketStream<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    type Item = Result<Packet>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.done {
            return Poll::Ready(None);
        }

        // Start the next framing read if none is in flight
        if self.pending.is_none() {
            let Some(mut reader) = self.reader.take() else {
                self.done = true;
                return Poll::Ready(None);
            };
            let cancel = self.cancel.clone();
            let fut = Box::pin(async move {
                let outcome = read_packet_async(&mut reader, &cancel).await;
                (reader, outcome)
            });
            self.pending = Some(fut);
        }

        let pending = self
            .pending
            .as_mut()
            .expect("pending future set above");
        match pending.as_mut().poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready((reader, outcome)) => {
                self.pending = None;
                self.reader = Some(reader);

                match outcome {
                    FrameOutcome::Packet(packet) => Poll::Ready(Some(Ok(packet))),
                    FrameOutcome::EndOfStream => {
                        self.done = true;
                        Poll::Ready(None)
                    }
                    FrameOutcome::Failed(error) => {
                        self.done = true;
                        Poll::Ready(Some(Err(error)))
                    }
                }
            }
        }
    }
}
