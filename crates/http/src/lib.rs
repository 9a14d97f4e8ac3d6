//! A pull-based HTTP/1.x message parser for captured traffic.
//!
//! This crate decodes a single raw HTTP message, request or response, from
//! any [`std::io::Read`] source: a file, a decompressed archive entry, an
//! in-memory buffer. It parses the start line and the ordered header block
//! eagerly, then exposes the body as a lazily-decoded byte stream that
//! handles both `Content-Length`-delimited and chunked transfer framing,
//! including chunk extensions, trailing headers and the no-body cases.
//!
//! # Features
//!
//! - Request and response start lines, down to version-less HTTP/0.9
//! - Ordered header storage: original case, duplicates and empty values kept
//! - RFC 7230 header folding (`obs-fold`) support
//! - Chunked transfer decoding with trailing headers
//! - Exact message boundaries: pipelined bytes after the message stay
//!   untouched in the source
//! - Typed, fatal decode errors; no silent resynchronization
//!
//! # Example
//!
//! ```
//! use std::io::{Cursor, Read};
//! use trawl_http::codec::read_message;
//!
//! let raw = b"HTTP/1.1 200 OK\r\n\
//!             Content-Type: text/plain\r\n\
//!             Transfer-Encoding: chunked\r\n\
//!             \r\n\
//!             7\r\nMozilla\r\n9\r\nDeveloper\r\n7\r\nNetwork\r\n0\r\n\r\n"
//!     .to_vec();
//!
//! let mut message = read_message(Cursor::new(raw))?;
//! assert_eq!(message.status(), Some(200));
//! assert_eq!(message.header("content-type"), Some("text/plain"));
//!
//! let mut content = String::new();
//! message.body_mut().read_to_string(&mut content)?;
//! assert_eq!(content, "MozillaDeveloperNetwork");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! - [`codec`]: line reading, prologue parsing and the reader entry points
//! - [`protocol`]: the message model, header storage, body decoder and
//!   error types
//!
//! # Scope
//!
//! The parser performs no network I/O, no retries and no reconnection: it
//! is a synchronous, single-pass decoder over an already-available byte
//! sequence, designed for capture archives rather than live sockets. It
//! does not validate bodies against their content types, and it speaks
//! HTTP/1.x only.
//!
//! # Ownership
//!
//! A parsed [`protocol::HttpMessage`] exclusively owns its source; dropping
//! the message releases it. The body (and with it the source) can be
//! disowned with [`protocol::HttpMessage::into_parts`], after which the
//! detached [`protocol::body::BodyReader`] manages the source's lifetime.
//! Disowning is a move, so no use-after-release can compile.

pub mod codec;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
