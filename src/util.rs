//! Internal utilities.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};

/// Fill `buf` from a blocking reader, stopping early at end of data.
///
/// Returns the number of bytes actually read. A return value of 0 means the
/// source was already at end of data; a value smaller than `buf.len()` means
/// it ran dry partway through. Interrupted reads are retried.
pub(crate) fn read_fill<R: io::Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Async counterpart of [`read_fill`].
pub(crate) async fn read_fill_async<R>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]).await {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
