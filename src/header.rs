//! The 12-byte archive header: a magic number plus the index offset.

use crate::error::ZsrError;
use std::io::{self, Read, Seek, SeekFrom, Write};

pub const MAGIC: &[u8; 4] = b"!ZSR";
pub const HEADER_SIZE: usize = 12;

#[derive(Debug, Clone, Copy)]
pub struct Header {
    pub idx_start: u64,
}

/// Write the 12-byte placeholder header (magic + zeroed `idx_start`).
/// The real `idx_start` is not known until traversal finishes; it is
/// patched in place by [`patch`].
pub fn write_placeholder<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(MAGIC)?;
    w.write_all(&0u64.to_le_bytes())
}

/// Seek back to offset 4 and overwrite the placeholder with the real
/// `idx_start`.
pub fn patch<W: Write + Seek>(w: &mut W, idx_start: u64) -> io::Result<()> {
    w.seek(SeekFrom::Start(4))?;
    w.write_all(&idx_start.to_le_bytes())
}

/// Parse the header from the start of an archive.
pub fn read<R: Read>(r: &mut R) -> Result<Header, ZsrError> {
    let mut buf = [0u8; HEADER_SIZE];
    r.read_exact(&mut buf)
        .map_err(|_| ZsrError::BadZsr("File too small".into()))?;
    if &buf[0..4] != MAGIC {
        return Err(ZsrError::BadZsr("Bad magic number".into()));
    }
    let idx_start = u64::from_le_bytes(buf[4..12].try_into().unwrap());
    Ok(Header { idx_start })
}
