//! The reader entry point: one call turns a byte source into a parsed
//! message with a lazily-decoded body.
//!
//! This is the only surface the archive and hashing collaborators use. It
//! runs the prologue parser, applies the framing policy to the parsed
//! method and headers, and wires the remainder of the source into a
//! [`BodyReader`] in its initial state.

use std::io::Read;

use tracing::trace;

use crate::codec::prologue::parse_prologue;
use crate::ensure;
use crate::protocol::body::BodyReader;
use crate::protocol::{Framing, HttpMessage, MessageHead, MessageKind, ParseError};

/// Reads one HTTP/1.x message (request or response) from `input`.
///
/// The prologue is consumed eagerly; the body is not. The returned message
/// owns `input` and releases it when dropped, unless the body is disowned
/// with [`HttpMessage::into_parts`] first.
pub fn read_message<R: Read>(mut input: R) -> Result<HttpMessage<R>, ParseError> {
    let (start, headers) = parse_prologue(&mut input)?;

    let content_length = headers.content_length();
    let framing = Framing::of(start.method(), &headers);
    trace!(kind = %start.kind(), ?framing, "parsed message prologue");

    let head = MessageHead { start, headers, content_length };
    Ok(HttpMessage::new(head, BodyReader::new(input, framing)))
}

/// Like [`read_message`], but fails with [`ParseError::UnexpectedKind`]
/// if the source holds a response.
pub fn read_request<R: Read>(input: R) -> Result<HttpMessage<R>, ParseError> {
    let message = read_message(input)?;
    ensure!(
        message.kind() == MessageKind::Request,
        ParseError::UnexpectedKind { expected: MessageKind::Request }
    );
    Ok(message)
}

/// Like [`read_message`], but fails with [`ParseError::UnexpectedKind`]
/// if the source holds a request.
pub fn read_response<R: Read>(input: R) -> Result<HttpMessage<R>, ParseError> {
    let message = read_message(input)?;
    ensure!(
        message.kind() == MessageKind::Response,
        ParseError::UnexpectedKind { expected: MessageKind::Response }
    );
    Ok(message)
}
