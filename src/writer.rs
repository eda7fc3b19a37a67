//! Directory-tree writer: traverses a source directory in DFS preorder,
//! compresses every regular file independently, and emits a finalized
//! `.zsr` archive.
//!
//! Traversal uses an explicit stack of per-directory iterators rather
//! than native recursion, per the spec's recommendation to bound stack
//! usage on pathological trees while still producing the exact fid
//! numbering a naive recursive-descent walk would (a directory's
//! subtree is fully numbered before its next sibling is visited).

use std::fs::{self, DirEntry, File};
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
#[cfg(feature = "parallel")]
use std::path::PathBuf;

use crate::codec::{Codec, LzmaCodec};
use crate::entry::Entry;
use crate::error::ZsrError;
use crate::header;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Build an archive of the directory tree rooted at `src_dir` and write
/// it to `out_path`, using the default LZMA codec.
pub fn create(src_dir: impl AsRef<Path>, out_path: impl AsRef<Path>) -> Result<(), ZsrError> {
    create_with_codec(src_dir, out_path, &LzmaCodec)
}

/// Same as [`create`], but with an explicit codec — the primitive the
/// spec treats as replaceable as long as it stays self-delimiting.
pub fn create_with_codec<C: Codec>(
    src_dir: impl AsRef<Path>,
    out_path: impl AsRef<Path>,
    codec: &C,
) -> Result<(), ZsrError> {
    let src_dir = src_dir.as_ref();
    let out_path = out_path.as_ref();

    let file = File::create(out_path).map_err(ZsrError::SinkWriteError)?;
    let mut out = BufWriter::new(file);
    header::write_placeholder(&mut out).map_err(ZsrError::SinkWriteError)?;

    #[cfg(feature = "parallel")]
    let entries = traverse_parallel(src_dir, codec, &mut out)?;
    #[cfg(not(feature = "parallel"))]
    let entries = traverse_sequential(src_dir, codec, &mut out)?;

    let idx_start = out
        .stream_position()
        .map_err(ZsrError::SinkWriteError)?;

    let mut plaintext = Vec::new();
    for entry in &entries {
        plaintext.extend_from_slice(&entry.serialize());
    }
    let compressed_index = codec.compress(&plaintext)?;
    out.write_all(&compressed_index).map_err(ZsrError::SinkWriteError)?;
    out.flush().map_err(ZsrError::SinkWriteError)?;

    let mut file = out
        .into_inner()
        .map_err(|e| ZsrError::SinkWriteError(e.into_error()))?;
    header::patch(&mut file, idx_start).map_err(ZsrError::SinkWriteError)?;

    Ok(())
}

/// One directory's listing, sorted lexicographically for reproducible
/// builds (a deliberate deviation from the source, which does not sort;
/// see the design notes).
fn list_sorted(dir: &Path) -> Result<std::vec::IntoIter<DirEntry>, ZsrError> {
    let mut entries: Vec<DirEntry> = fs::read_dir(dir)
        .map_err(|e| ZsrError::SourceReadError {
            path: dir.to_path_buf(),
            source: e,
        })?
        .collect::<Result<Vec<_>, std::io::Error>>()
        .map_err(|e| ZsrError::SourceReadError {
            path: dir.to_path_buf(),
            source: e,
        })?;
    entries.sort_by_key(|e| e.file_name());
    Ok(entries.into_iter())
}

struct DirFrame {
    entries: std::vec::IntoIter<DirEntry>,
    parent_fid: u64,
}

fn traverse_sequential<C: Codec, W: Write>(
    src_dir: &Path,
    codec: &C,
    out: &mut W,
) -> Result<Vec<Entry>, ZsrError> {
    let mut entries = Vec::new();
    let mut fidcnt: u64 = 0;
    let mut fileloc: u64 = header::HEADER_SIZE as u64;

    let mut stack = vec![DirFrame {
        entries: list_sorted(src_dir)?,
        parent_fid: 0,
    }];

    loop {
        let top = match stack.last_mut() {
            Some(frame) => frame,
            None => break,
        };
        let parent_fid = top.parent_fid;
        let dirent = match top.entries.next() {
            Some(dirent) => dirent,
            None => {
                stack.pop();
                continue;
            }
        };

        let path = dirent.path();
        let name = dirent
            .file_name()
            .to_str()
            .map(str::to_owned)
            .ok_or_else(|| ZsrError::NonUtf8Name(path.clone()))?;
        let file_type = dirent
            .file_type()
            .map_err(|e| ZsrError::SourceReadError {
                path: path.clone(),
                source: e,
            })?;

        if file_type.is_symlink() {
            tracing::warn!(path = %path.display(), "skipping symlink, not followed");
            continue;
        }

        fidcnt += 1;
        let fid = fidcnt;

        if file_type.is_file() {
            let data = fs::read(&path).map_err(|e| ZsrError::SourceReadError {
                path: path.clone(),
                source: e,
            })?;
            let compressed = codec.compress(&data)?;
            out.write_all(&compressed).map_err(ZsrError::SinkWriteError)?;
            let length = compressed.len() as u64;
            entries.push(Entry {
                fid,
                parent: parent_fid,
                start: fileloc,
                length,
                name,
            });
            fileloc += length;
        } else if file_type.is_dir() {
            entries.push(Entry {
                fid,
                parent: parent_fid,
                start: 0,
                length: 0,
                name,
            });
            tracing::debug!(path = %path.display(), "entering directory");
            stack.push(DirFrame {
                entries: list_sorted(&path)?,
                parent_fid: fid,
            });
        } else {
            tracing::warn!(path = %path.display(), "skipping non-regular file");
        }
    }

    Ok(entries)
}

/// Same traversal, but regular files are read and compressed concurrently
/// via Rayon; offsets are assigned only once all compression is done, per
/// the spec's note that the serialization step is the one place ordering
/// has to be sequential.
#[cfg(feature = "parallel")]
fn traverse_parallel<C, W>(src_dir: &Path, codec: &C, out: &mut W) -> Result<Vec<Entry>, ZsrError>
where
    C: Codec + Sync,
    W: Write,
{
    let mut entries = Vec::new();
    let mut file_paths: Vec<(usize, PathBuf)> = Vec::new();
    let mut fidcnt: u64 = 0;

    let mut stack = vec![DirFrame {
        entries: list_sorted(src_dir)?,
        parent_fid: 0,
    }];

    loop {
        let top = match stack.last_mut() {
            Some(frame) => frame,
            None => break,
        };
        let parent_fid = top.parent_fid;
        let dirent = match top.entries.next() {
            Some(dirent) => dirent,
            None => {
                stack.pop();
                continue;
            }
        };

        let path = dirent.path();
        let name = dirent
            .file_name()
            .to_str()
            .map(str::to_owned)
            .ok_or_else(|| ZsrError::NonUtf8Name(path.clone()))?;
        let file_type = dirent
            .file_type()
            .map_err(|e| ZsrError::SourceReadError {
                path: path.clone(),
                source: e,
            })?;

        if file_type.is_symlink() {
            tracing::warn!(path = %path.display(), "skipping symlink, not followed");
            continue;
        }

        fidcnt += 1;
        let fid = fidcnt;

        if file_type.is_file() {
            entries.push(Entry {
                fid,
                parent: parent_fid,
                start: 0,
                length: 0,
                name,
            });
            file_paths.push((entries.len() - 1, path));
        } else if file_type.is_dir() {
            entries.push(Entry {
                fid,
                parent: parent_fid,
                start: 0,
                length: 0,
                name,
            });
            tracing::debug!(path = %path.display(), "entering directory");
            stack.push(DirFrame {
                entries: list_sorted(&path)?,
                parent_fid: fid,
            });
        } else {
            tracing::warn!(path = %path.display(), "skipping non-regular file");
        }
    }

    let compressed: Vec<Result<(usize, Vec<u8>), ZsrError>> = file_paths
        .par_iter()
        .map(|(idx, path)| {
            let data = fs::read(path).map_err(|e| ZsrError::SourceReadError {
                path: path.clone(),
                source: e,
            })?;
            let bytes = codec.compress(&data)?;
            Ok((*idx, bytes))
        })
        .collect();

    let mut blobs: Vec<Option<Vec<u8>>> = vec![None; entries.len()];
    for result in compressed {
        let (idx, bytes) = result?;
        blobs[idx] = Some(bytes);
    }

    let mut fileloc = header::HEADER_SIZE as u64;
    for (idx, blob) in blobs.into_iter().enumerate() {
        if let Some(bytes) = blob {
            out.write_all(&bytes).map_err(ZsrError::SinkWriteError)?;
            entries[idx].start = fileloc;
            entries[idx].length = bytes.len() as u64;
            fileloc += bytes.len() as u64;
        }
    }

    Ok(entries)
}
