//! Crate-wide error taxonomy.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZsrError {
    /// Archive-level structural failure discovered during open or index parse.
    #[error("{0}")]
    BadZsr(String),

    /// A compressed stream failed to decode.
    #[error("corrupt compressed blob")]
    CorruptBlob,

    /// Path resolved to nothing.
    #[error("path not found in archive")]
    NotFound,

    /// Path resolved to a directory where a regular file was required.
    #[error("path is a directory, not a file")]
    NotAFile,

    /// Path resolved to a regular file where a directory was required.
    #[error("path is a regular file, not a directory")]
    NotADirectory,

    /// Reading a source file (or listing a source directory) during `create` failed.
    #[error("failed to read {path}: {source}")]
    SourceReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing to the archive output failed.
    #[error("failed to write archive: {0}")]
    SinkWriteError(#[source] io::Error),

    /// A directory entry's filename is not valid UTF-8, so it cannot be
    /// encoded into the index without loss.
    #[error("file name is not valid UTF-8: {0}")]
    NonUtf8Name(PathBuf),

    /// Any other I/O failure encountered while reading an already-open archive
    /// (seeking, reading the index or a blob, creating extraction output).
    #[error(transparent)]
    Io(#[from] io::Error),
}
