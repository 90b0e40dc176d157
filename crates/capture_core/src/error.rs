//! Error types shared by the RIP and WRL decoders.
//!
//! Every failure is scoped to a single source file: a parse either yields a
//! complete [`Scene`](crate::scene::Scene) or one of these errors, never a
//! partially populated model.

use std::path::PathBuf;

use thiserror::Error;

use crate::reader::ReadError;

/// Errors that can occur while decoding a capture.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("File signature {found:#010X} did not match RIP signature 0xDEC0ADDE")]
    SignatureMismatch { found: u32 },

    #[error(transparent)]
    UnexpectedEndOfData(#[from] ReadError),

    #[error("Malformed vertex attribute: {0}")]
    MalformedAttribute(String),

    #[error("Malformed block at line {line}: {message}")]
    MalformedBlock { line: usize, message: String },

    #[error("Block opened at line {line} is never closed")]
    UnexpectedEndOfContent { line: usize },

    #[error("Invalid number '{token}' at line {line}")]
    InvalidNumber { line: usize, token: String },

    #[error("Face {face} references vertex {index}, but only {vertex_count} vertices exist")]
    FaceIndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors that can occur while loading a capture file from disk.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("No content in {}", .0.display())]
    NoContent(PathBuf),

    #[error("Unsupported capture format: '{0}'")]
    UnsupportedFormat(String),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

impl LoadError {
    /// True when the file was readable but is not a capture this crate understands.
    ///
    /// Batch callers log these and move on to the next file.
    pub fn is_unrecognized(&self) -> bool {
        matches!(
            self,
            LoadError::UnsupportedFormat(_) | LoadError::Parse(ParseError::SignatureMismatch { .. })
        )
    }
}
