//! On-disk entry records: fixed 34-byte header plus a raw UTF-8 name,
//! concatenated with no separators to form the archive's index.

use crate::error::ZsrError;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

/// fid(8) + parent(8) + start(8) + length(8) + namelen(2)
pub const ENTRY_HEADER_SIZE: usize = 34;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub fid: u64,
    pub parent: u64,
    pub start: u64,
    pub length: u64,
    pub name: String,
}

impl Entry {
    pub fn is_dir(&self) -> bool {
        self.start == 0
    }

    /// Pack the fixed header fields little-endian, then the raw name bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let name_bytes = self.name.as_bytes();
        let mut buf = Vec::with_capacity(ENTRY_HEADER_SIZE + name_bytes.len());
        buf.write_u64::<LittleEndian>(self.fid).unwrap();
        buf.write_u64::<LittleEndian>(self.parent).unwrap();
        buf.write_u64::<LittleEndian>(self.start).unwrap();
        buf.write_u64::<LittleEndian>(self.length).unwrap();
        buf.write_i16::<LittleEndian>(name_bytes.len() as i16).unwrap();
        buf.extend_from_slice(name_bytes);
        buf
    }

    /// Parse one entry from the front of `buf`. Returns the entry and the
    /// number of bytes consumed so the caller can advance to the next one.
    pub fn parse(buf: &[u8]) -> Result<(Self, usize), ZsrError> {
        if buf.len() < ENTRY_HEADER_SIZE {
            return Err(ZsrError::BadZsr("Truncated index".into()));
        }
        let mut cur = Cursor::new(buf);
        let fid = cur.read_u64::<LittleEndian>()?;
        let parent = cur.read_u64::<LittleEndian>()?;
        let start = cur.read_u64::<LittleEndian>()?;
        let length = cur.read_u64::<LittleEndian>()?;
        let namelen = cur.read_i16::<LittleEndian>()?;
        if namelen < 0 {
            return Err(ZsrError::BadZsr("Truncated index".into()));
        }
        let namelen = namelen as usize;
        if buf.len() < ENTRY_HEADER_SIZE + namelen {
            return Err(ZsrError::BadZsr("Truncated index".into()));
        }
        let name_bytes = &buf[ENTRY_HEADER_SIZE..ENTRY_HEADER_SIZE + namelen];
        let name = String::from_utf8(name_bytes.to_vec())
            .map_err(|_| ZsrError::BadZsr("Truncated index".into()))?;
        Ok((
            Entry {
                fid,
                parent,
                start,
                length,
                name,
            },
            ENTRY_HEADER_SIZE + namelen,
        ))
    }
}
