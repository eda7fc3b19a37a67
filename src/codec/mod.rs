//! Compression codec abstraction.
//!
//! ZSR compresses every regular file (and the trailing index) with one
//! frozen codec. Unlike the multi-codec container format this crate's
//! writer/reader is descended from, there is no per-block codec
//! identity stored on disk — the format does not negotiate. [`Codec`]
//! stays a trait so the LZMA implementation remains a replaceable
//! primitive in tests and benches, as the spec requires: the only hard
//! constraint on a substitute is that decompression must not need any
//! external sizing information beyond the stored blob length.

use crate::error::ZsrError;
use std::io::Cursor;

pub trait Codec: Send + Sync {
    /// Compress `data`, producing a self-delimiting stream.
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, ZsrError>;

    /// Decompress a stream produced by `compress`. Any malformed input
    /// is reported as [`ZsrError::CorruptBlob`].
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, ZsrError>;
}

/// The archive format's only codec: LZMA via `lzma-rs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LzmaCodec;

impl Codec for LzmaCodec {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, ZsrError> {
        let mut out = Vec::new();
        lzma_rs::lzma_compress(&mut Cursor::new(data), &mut out)
            .map_err(|_| ZsrError::CorruptBlob)?;
        Ok(out)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, ZsrError> {
        let mut out = Vec::new();
        lzma_rs::lzma_decompress(&mut Cursor::new(data), &mut out)
            .map_err(|_| ZsrError::CorruptBlob)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_arbitrary_bytes() {
        let codec = LzmaCodec;
        let data = b"the quick brown fox jumps over the lazy dog".repeat(37);
        let compressed = codec.compress(&data).unwrap();
        let restored = codec.decompress(&compressed).unwrap();
        assert_eq!(restored, data);
    }

    #[test]
    fn decompress_rejects_garbage() {
        let codec = LzmaCodec;
        let err = codec.decompress(b"not an lzma stream").unwrap_err();
        assert!(matches!(err, ZsrError::CorruptBlob));
    }
}
