//! # zsr — single-file, read-optimized archive format
//!
//! Format guarantees:
//! - All numeric fields are little-endian.
//! - Every regular file is compressed independently; retrieving one file
//!   never requires decompressing another.
//! - The index is a trailing, separately compressed block; the header
//!   (magic + `idx_start`) is the only thing read before it is located.
//! - The archive is append-hostile: once finalized, blobs are immutable.
//!   There is no encryption, no integrity checksum, and no symlink,
//!   device, permission, or timestamp preservation.

pub mod codec;
pub mod entry;
pub mod error;
pub mod header;
pub mod reader;
pub mod tree;
pub mod writer;

// Flat re-exports for the most common types.
pub use codec::{Codec, LzmaCodec};
pub use entry::Entry;
pub use error::ZsrError;
pub use reader::ZsrReader;
pub use tree::{Node, Tree};
pub use writer::create;
