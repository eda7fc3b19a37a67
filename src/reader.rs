//! Random-access reader: validates the header, decompresses the index,
//! rebuilds the in-memory tree, and serves path-based lookups.

use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::codec::{Codec, LzmaCodec};
use crate::entry::Entry;
use crate::error::ZsrError;
use crate::header;
use crate::tree::Tree;

/// A parsed, open archive. Read-only and single-owner; the spec leaves
/// concurrent access up to the caller (clone the file handle, or
/// serialize access to one `ZsrReader`).
pub struct ZsrReader<R: Read + Seek, C: Codec = LzmaCodec> {
    reader: R,
    tree: Tree,
    codec: C,
}

impl ZsrReader<File, LzmaCodec> {
    /// Open an archive at `path` using the default LZMA codec.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ZsrError> {
        Self::open_with_codec(path, LzmaCodec)
    }
}

impl<C: Codec> ZsrReader<File, C> {
    /// Open an archive at `path` with an explicit codec.
    pub fn open_with_codec(path: impl AsRef<Path>, codec: C) -> Result<Self, ZsrError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file, codec)
    }
}

impl<R: Read + Seek, C: Codec> ZsrReader<R, C> {
    /// Parse an archive already open as `reader`.
    pub fn from_reader(mut reader: R, codec: C) -> Result<Self, ZsrError> {
        let hdr = header::read(&mut reader)?;
        reader.seek(SeekFrom::Start(hdr.idx_start))?;
        let mut compressed_index = Vec::new();
        reader.read_to_end(&mut compressed_index)?;
        let plaintext = codec
            .decompress(&compressed_index)
            .map_err(|_| ZsrError::BadZsr("Could not retrieve index".into()))?;

        let mut tree = Tree::with_root();
        let mut offset = 0;
        while offset < plaintext.len() {
            let (entry, consumed) = Entry::parse(&plaintext[offset..])?;
            tree.insert(entry.fid, entry.parent, entry.name, entry.start, entry.length);
            offset += consumed;
        }

        tracing::debug!(idx_start = hdr.idx_start, "archive opened");
        Ok(Self { reader, tree, codec })
    }

    /// True iff `path` resolves to a regular file. A directory — even an
    /// existing one — returns `false`, preserving the source's conflation
    /// of "does not exist" with "is not a file" (see design notes).
    pub fn exists(&self, path: &str) -> bool {
        self.tree
            .resolve(path)
            .and_then(|fid| self.tree.get(fid))
            .map(|node| node.is_file())
            .unwrap_or(false)
    }

    /// Read and decompress the full contents of the file at `path`.
    pub fn get_file(&mut self, path: &str) -> Result<Vec<u8>, ZsrError> {
        let fid = self.tree.resolve(path).ok_or(ZsrError::NotFound)?;
        let node = self.tree.get(fid).ok_or(ZsrError::NotFound)?;
        if !node.is_file() {
            return Err(ZsrError::NotAFile);
        }
        let (start, length) = (node.start, node.length);
        self.read_blob(start, length)
    }

    /// Recreate the subtree rooted at `path` under `dest_dir`. Files whose
    /// blob fails to decompress are logged and skipped; the rest of the
    /// subtree is still extracted (see the error handling design's
    /// "partial success" policy).
    pub fn extract_subtree(&mut self, path: &str, dest_dir: impl AsRef<Path>) -> Result<(), ZsrError> {
        let fid = self.tree.resolve(path).ok_or(ZsrError::NotFound)?;
        let node = self.tree.get(fid).ok_or(ZsrError::NotFound)?;
        if node.is_file() {
            return Err(ZsrError::NotADirectory);
        }
        let dest_dir = dest_dir.as_ref();
        fs::create_dir_all(dest_dir)?;
        self.extract_children(fid, dest_dir)
    }

    /// Equivalent to `extract_subtree(".", dest_dir)`.
    pub fn extract_all(&mut self, dest_dir: impl AsRef<Path>) -> Result<(), ZsrError> {
        self.extract_subtree(".", dest_dir)
    }

    fn extract_children(&mut self, fid: u64, dest_dir: &Path) -> Result<(), ZsrError> {
        let children = self
            .tree
            .get(fid)
            .ok_or(ZsrError::NotFound)?
            .children
            .clone();

        for child_fid in children {
            let (name, is_file, start, length) = {
                let child = self.tree.get(child_fid).ok_or(ZsrError::NotFound)?;
                (child.name.clone(), child.is_file(), child.start, child.length)
            };
            let child_path = dest_dir.join(&name);

            if is_file {
                match self.read_blob(start, length) {
                    Ok(data) => {
                        fs::write(&child_path, data)?;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %child_path.display(),
                            error = %e,
                            "skipping corrupt blob during extraction"
                        );
                    }
                }
            } else {
                fs::create_dir_all(&child_path)?;
                self.extract_children(child_fid, &child_path)?;
            }
        }
        Ok(())
    }

    fn read_blob(&mut self, start: u64, length: u64) -> Result<Vec<u8>, ZsrError> {
        self.reader.seek(SeekFrom::Start(start))?;
        let mut buf = vec![0u8; length as usize];
        self.reader.read_exact(&mut buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                ZsrError::CorruptBlob
            } else {
                ZsrError::Io(e)
            }
        })?;
        self.codec.decompress(&buf)
    }
}
