//! The message body decoder: a pull-based state machine over the raw source.
//!
//! [`BodyReader`] implements [`std::io::Read`] and yields exactly the decoded
//! body bytes of one message, whatever the framing:
//!
//! - fixed-length bodies are copied straight through, byte-for-byte
//! - chunked bodies have their size lines, chunk terminators, extensions and
//!   trailer section stripped transparently, with trailing headers collected
//!   once the terminal zero-length chunk is crossed
//! - bodyless messages report end of input immediately, without touching
//!   the source
//!
//! A single `read` call services the request across as many state
//! transitions as needed, so a caller's buffer spanning a chunk boundary is
//! filled from the next chunk within the same call. The decoder never
//! consumes bytes past the logical end of the message; bytes belonging to a
//! following pipelined message stay in the source. Once end of input is
//! reached the source is dropped and every further read returns zero bytes.
//!
//! Reads are not thread-safe in any interesting sense: the reader assumes a
//! single logical consumer, exactly like any other `Read` value.

use std::io;
use std::io::Read;

use tracing::trace;

use crate::codec::line::read_line;
use crate::codec::prologue::read_fields;
use crate::ensure;
use crate::protocol::{Framing, ParseError, Trailers};

/// Decoder states. The framing policy picks the initial state; every
/// message ends in `Eoi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Copying a `Content-Length`-delimited body.
    CopyFixed,
    /// Copying the data bytes of one chunk.
    CopyChunk,
    /// Positioned before a chunk-size line.
    AwaitChunkSize,
    /// Positioned before the trailer section, after the terminal chunk.
    ReadTrailers,
    /// End of input: the message body is fully consumed.
    Eoi,
}

/// A readable handle over one message body.
///
/// Obtained from [`HttpMessage`](crate::protocol::HttpMessage); owns the underlying
/// source for the rest of the message's life, or for its own if the body
/// has been disowned from the message.
#[derive(Debug)]
pub struct BodyReader<R> {
    /// `None` once `Eoi` has been reached and the source released.
    input: Option<R>,
    state: State,
    /// Bytes left in the current fixed body or chunk.
    remaining: u64,
    /// Scratch buffer reused for every line read.
    line: String,
    trailers: Trailers,
}

impl<R> BodyReader<R> {
    pub(crate) fn new(input: R, framing: Framing) -> Self {
        let (state, remaining, trailers) = match framing {
            Framing::None => (State::Eoi, 0, Trailers::NotApplicable),
            Framing::Length(n) => (State::CopyFixed, n, Trailers::NotApplicable),
            Framing::Chunked => (State::AwaitChunkSize, 0, Trailers::Pending),
        };

        Self { input: Some(input), state, remaining, line: String::new(), trailers }
    }

    /// Trailing headers of a chunked body. [`Trailers::Pending`] until the
    /// terminal chunk has been read; [`Trailers::NotApplicable`] for any
    /// other framing.
    pub fn trailers(&self) -> &Trailers {
        &self.trailers
    }

    /// Whether the body has been decoded through to its logical end.
    pub fn is_finished(&self) -> bool {
        self.state == State::Eoi
    }
}

impl<R: Read> BodyReader<R> {
    fn read_decoded(&mut self, buf: &mut [u8]) -> Result<usize, ParseError> {
        if buf.is_empty() {
            return Ok(0);
        }

        let mut filled = 0;

        loop {
            let Self { input, line, state, remaining, trailers } = self;

            match state {
                State::Eoi => {
                    // releasing the source is idempotent; repeated reads
                    // keep returning zero bytes
                    *input = None;
                    if filled > 0 {
                        trace!(len = filled, "read decoded bytes");
                    }
                    return Ok(filled);
                }

                State::CopyFixed | State::CopyChunk => {
                    let Some(src) = input.as_mut() else { return Ok(filled) };

                    while *remaining > 0 {
                        if filled == buf.len() {
                            trace!(len = filled, "read decoded bytes");
                            return Ok(filled);
                        }

                        let want = u64::min(*remaining, (buf.len() - filled) as u64) as usize;
                        let n = src.read(&mut buf[filled..filled + want])?;
                        ensure!(n > 0, ParseError::UnexpectedEndOfContent);

                        filled += n;
                        *remaining -= n as u64;
                    }

                    if *state == State::CopyChunk {
                        read_line(src, line)?;
                        ensure!(line.is_empty(), ParseError::InvalidChunkedEncoding);
                        *state = State::AwaitChunkSize;
                    } else {
                        *state = State::Eoi;
                    }
                }

                State::AwaitChunkSize => {
                    let Some(src) = input.as_mut() else { return Ok(filled) };

                    read_line(src, line)?;
                    let size = parse_chunk_size(line)?;
                    trace!(size, "read chunk size");

                    *remaining = size;
                    *state = if size == 0 { State::ReadTrailers } else { State::CopyChunk };
                }

                State::ReadTrailers => {
                    let Some(src) = input.as_mut() else { return Ok(filled) };

                    let fields = read_fields(src, line)?;
                    trace!(fields = fields.len(), "read trailing headers");

                    *trailers = Trailers::Fields(fields);
                    *state = State::Eoi;
                }
            }
        }
    }
}

/// Parses the hexadecimal size prefix of a chunk-size line. Everything
/// after the first `;` or space is a chunk extension, which carries no
/// decoded semantics and is discarded.
fn parse_chunk_size(line: &str) -> Result<u64, ParseError> {
    let size = line.split([';', ' ']).next().unwrap_or(line);

    if size.is_empty() || !size.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ParseError::invalid_chunk_size(line));
    }

    u64::from_str_radix(size, 16).map_err(|_| ParseError::invalid_chunk_size(line))
}

impl<R: Read> Read for BodyReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_decoded(buf).map_err(Into::into)
    }
}
