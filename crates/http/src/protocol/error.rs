use std::io;
use thiserror::Error;

use crate::protocol::MessageKind;

/// Errors produced while decoding an HTTP/1.x message.
///
/// Format errors (`InvalidStartLine`, `InvalidChunkSize`) and protocol
/// violations (`InvalidChunkedEncoding`, `UnexpectedEndOfContent`) are both
/// fatal: the decoder never resynchronizes or retries, the error propagates
/// to the caller.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid HTTP request line or status line: {line}")]
    InvalidStartLine { line: String },

    #[error("invalid chunk size line: {line}")]
    InvalidChunkSize { line: String },

    #[error("invalid HTTP chunked transfer encoding")]
    InvalidChunkedEncoding,

    #[error("unexpected end of HTTP content")]
    UnexpectedEndOfContent,

    #[error("expected a {expected} message")]
    UnexpectedKind { expected: MessageKind },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn invalid_start_line<S: ToString>(line: S) -> Self {
        Self::InvalidStartLine { line: line.to_string() }
    }

    pub fn invalid_chunk_size<S: ToString>(line: S) -> Self {
        Self::InvalidChunkSize { line: line.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

/// Body reads surface decode failures through `std::io::Error`; the mapping
/// keeps truncation distinguishable (`UnexpectedEof`) from malformed input
/// (`InvalidData`), with the original error retained as the inner source.
impl From<ParseError> for io::Error {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::Io { source } => source,
            e @ ParseError::UnexpectedEndOfContent => io::Error::new(io::ErrorKind::UnexpectedEof, e),
            e => io::Error::new(io::ErrorKind::InvalidData, e),
        }
    }
}
