//! BER length field codec.
//!
//! Implements the short/long-form length encoding from X.690 with one
//! deliberate deviation inherited from the wire peers this crate talks to:
//! the encoder always emits long-form lengths as exactly 4 big-endian octets
//! (header `0x84`), never the minimal octet count. The decoder accepts any
//! declared octet count and force-fits the value into 32 bits, zero-padding
//! short values and rejecting declarations whose dropped high-order octets
//! are nonzero.

use smallvec::SmallVec;
use tokio::io::AsyncRead;

use crate::error::{Error, LengthErrorKind, Result};
use crate::util::{read_fill, read_fill_async};

/// High bit of the header byte marks long form.
const LONG_FORM: u8 = 0x80;

/// Octet count the encoder always uses for long-form lengths.
pub const LONG_FORM_OCTETS: usize = 4;

/// Encoded length field: at most 1 header byte plus 4 value octets.
pub type EncodedLength = SmallVec<[u8; 5]>;

/// Encode a length as a BER length field.
///
/// Values 0..=127 use the single-byte short form. Anything larger uses the
/// fixed 4-octet long form: `[0x84, b0, b1, b2, b3]`, most significant octet
/// first.
pub fn encode_length(length: u32) -> EncodedLength {
    let mut out = EncodedLength::new();
    if length <= 127 {
        out.push(length as u8);
    } else {
        out.push(LONG_FORM | LONG_FORM_OCTETS as u8);
        out.extend_from_slice(&length.to_be_bytes());
    }
    out
}

/// Encode a `usize` length, rejecting values that do not fit the wire format.
pub fn encode_length_checked(length: usize) -> Result<EncodedLength> {
    let value =
        u32::try_from(length).map_err(|_| Error::length(LengthErrorKind::TooLarge { length }))?;
    Ok(encode_length(value))
}

/// Decode a BER length field from a buffer at `offset`.
///
/// Returns the decoded length and the number of bytes the field occupies.
pub fn decode_length(buf: &[u8], offset: usize) -> Result<(u32, usize)> {
    let header = *buf.get(offset).ok_or_else(|| Error::truncated(1, 0))?;
    if header & LONG_FORM == 0 {
        return Ok((u32::from(header), 1));
    }

    let count = usize::from(header & 0x7F);
    let start = offset + 1;
    if start + count > buf.len() {
        return Err(Error::truncated(count, buf.len().saturating_sub(start)));
    }

    let length = length_from_octets(&buf[start..start + count])?;
    Ok((length, count + 1))
}

/// Decode a BER length field from a blocking reader.
pub fn read_length<R: std::io::Read + ?Sized>(reader: &mut R) -> Result<(u32, usize)> {
    let mut header = [0u8; 1];
    fill_exact(reader, &mut header)?;
    if header[0] & LONG_FORM == 0 {
        return Ok((u32::from(header[0]), 1));
    }

    let count = usize::from(header[0] & 0x7F);
    let mut octets: SmallVec<[u8; LONG_FORM_OCTETS]> = SmallVec::from_elem(0, count);
    fill_exact(reader, &mut octets)?;

    Ok((length_from_octets(&octets)?, count + 1))
}

/// Decode a BER length field from a suspendable reader.
///
/// Suspends only while waiting for bytes from the source; cancellation is a
/// concern of the caller (the framer races reads against a token, and
/// dropping the future aborts it as usual in tokio).
pub async fn read_length_async<R>(reader: &mut R) -> Result<(u32, usize)>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut header = [0u8; 1];
    fill_exact_async(reader, &mut header).await?;
    if header[0] & LONG_FORM == 0 {
        return Ok((u32::from(header[0]), 1));
    }

    let count = usize::from(header[0] & 0x7F);
    let mut octets: SmallVec<[u8; LONG_FORM_OCTETS]> = SmallVec::from_elem(0, count);
    fill_exact_async(reader, &mut octets).await?;

    Ok((length_from_octets(&octets)?, count + 1))
}

/// Force-fit a big-endian length value into 32 bits.
///
/// Fewer than 4 octets zero-pad from the left; more than 4 keep the low
/// 4 octets, and any dropped high-order octet being nonzero is an error
/// rather than a silent wraparound. Zero octets decode to length 0.
fn length_from_octets(octets: &[u8]) -> Result<u32> {
    let mut fixed = [0u8; LONG_FORM_OCTETS];
    if octets.len() <= LONG_FORM_OCTETS {
        fixed[LONG_FORM_OCTETS - octets.len()..].copy_from_slice(octets);
    } else {
        let dropped = octets.len() - LONG_FORM_OCTETS;
        if octets[..dropped].iter().any(|&b| b != 0) {
            return Err(Error::length(LengthErrorKind::DoesNotFit32Bits {
                octets: octets.len(),
            }));
        }
        fixed.copy_from_slice(&octets[dropped..]);
    }
    Ok(u32::from_be_bytes(fixed))
}

fn fill_exact<R: std::io::Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    let filled = read_fill(reader, buf)?;
    if filled < buf.len() {
        return Err(Error::truncated(buf.len(), filled));
    }
    Ok(())
}

async fn fill_exact_async<R>(reader: &mut R, buf: &mut [u8]) -> Result<()>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let filled = read_fill_async(reader, buf).await?;
    if filled < buf.len() {
        return Err(Error::truncated(buf.len(), filled));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_encode_short_form() {
        assert_eq!(encode_length(0).as_slice(), &[0x00]);
        assert_eq!(encode_length(1).as_slice(), &[0x01]);
        assert_eq!(encode_length(127).as_slice(), &[0x7F]);
    }

    #[test]
    fn test_encode_long_form() {
        assert_eq!(encode_length(128).as_slice(), &[0x84, 0, 0, 0, 0x80]);
        assert_eq!(encode_length(345).as_slice(), &[0x84, 0, 0, 0x01, 0x59]);
        assert_eq!(
            encode_length(u32::MAX).as_slice(),
            &[0x84, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn test_encode_boundary() {
        assert_eq!(encode_length(127).len(), 1);
        let long = encode_length(128);
        assert_eq!(long.len(), 5);
        assert_eq!(long[0], 0x84);
    }

    #[test]
    fn test_encode_checked_rejects_oversized() {
        if usize::BITS > 32 {
            let too_big = u32::MAX as usize + 1;
            assert!(matches!(
                encode_length_checked(too_big),
                Err(Error::MalformedLength {
                    kind: LengthErrorKind::TooLarge { .. }
                })
            ));
        }
        assert_eq!(encode_length_checked(42).unwrap().as_slice(), &[42]);
    }

    #[test]
    fn test_decode_literal_vectors() {
        assert_eq!(
            decode_length(&[0x84, 0x00, 0x00, 0x01, 0x59], 0).unwrap(),
            (345, 5)
        );
        assert_eq!(
            decode_length(&[0x84, 0x00, 0x00, 0x01, 0x4F], 0).unwrap(),
            (335, 5)
        );
        assert_eq!(
            decode_length(&[0x84, 0x00, 0x00, 0x01, 0x2B], 0).unwrap(),
            (299, 5)
        );
    }

    #[test]
    fn test_decode_at_offset() {
        let buf = [0x30, 0x0C, 0x84, 0x00, 0x00, 0x00, 0x80];
        assert_eq!(decode_length(&buf, 2).unwrap(), (128, 5));
        assert_eq!(decode_length(&buf, 1).unwrap(), (12, 1));
    }

    #[test]
    fn test_decode_idempotent() {
        let buf = [0x84, 0x00, 0x00, 0x01, 0x59];
        let first = decode_length(&buf, 0).unwrap();
        for _ in 0..10 {
            assert_eq!(decode_length(&buf, 0).unwrap(), first);
        }
    }

    #[test]
    fn test_decode_zero_octet_long_form() {
        assert_eq!(decode_length(&[0x80], 0).unwrap(), (0, 1));
    }

    #[test]
    fn test_decode_short_count_zero_pads() {
        assert_eq!(decode_length(&[0x82, 0x01, 0x59], 0).unwrap(), (345, 3));
        assert_eq!(decode_length(&[0x81, 0x80], 0).unwrap(), (128, 2));
    }

    #[test]
    fn test_decode_long_count_with_zero_prefix() {
        assert_eq!(
            decode_length(&[0x85, 0x00, 0x00, 0x00, 0x01, 0x59], 0).unwrap(),
            (345, 6)
        );
    }

    #[test]
    fn test_decode_long_count_rejects_significant_high_octets() {
        let err = decode_length(&[0x85, 0x01, 0x00, 0x00, 0x01, 0x59], 0).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedLength {
                kind: LengthErrorKind::DoesNotFit32Bits { octets: 5 }
            }
        ));
    }

    #[test]
    fn test_decode_truncated_buffer() {
        let err = decode_length(&[0x84, 0x00, 0x00], 0).unwrap_err();
        assert!(err.is_truncated());
        let err = decode_length(&[], 0).unwrap_err();
        assert!(err.is_truncated());
    }

    #[test]
    fn test_read_length_matches_buffer_decode() {
        let buf = [0x84, 0x00, 0x00, 0x01, 0x2B];
        let from_buf = decode_length(&buf, 0).unwrap();
        let from_stream = read_length(&mut Cursor::new(&buf[..])).unwrap();
        assert_eq!(from_buf, from_stream);
    }

    #[test]
    fn test_read_length_truncated_stream() {
        let err = read_length(&mut Cursor::new(&[0x84u8, 0x00][..])).unwrap_err();
        assert!(err.is_truncated());
    }

    #[tokio::test]
    async fn test_read_length_async_matches_sync() {
        let buf = [0x84, 0x00, 0x00, 0x01, 0x59];
        let blocking = read_length(&mut Cursor::new(&buf[..])).unwrap();
        let suspendable = read_length_async(&mut Cursor::new(&buf[..])).await.unwrap();
        assert_eq!(blocking, suspendable);
    }

    #[tokio::test]
    async fn test_read_length_async_truncated() {
        let err = read_length_async(&mut Cursor::new(&[0x84u8][..]))
            .await
            .unwrap_err();
        assert!(err.is_truncated());
    }

    #[test]
    fn test_roundtrip_short_form() {
        for length in 0..=127u32 {
            let encoded = encode_length(length);
            assert_eq!(decode_length(&encoded, 0).unwrap(), (length, 1));
        }
    }

    #[test]
    fn test_roundtrip_long_form_samples() {
        for length in [128u32, 255, 256, 299, 335, 345, 65535, 1 << 24, u32::MAX] {
            let encoded = encode_length(length);
            assert_eq!(encoded[0], 0x84);
            assert_eq!(decode_length(&encoded, 0).unwrap(), (length, 5));
        }
    }
}
