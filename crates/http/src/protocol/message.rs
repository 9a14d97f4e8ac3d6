//! The parsed message model: start line, headers, framing and the body
//! handle that ties the underlying byte source to the message's lifetime.

use std::fmt;

use crate::protocol::body::BodyReader;
use crate::protocol::{ContentLength, HeaderList, Trailers, Version};

/// Whether a message is an HTTP request or a response, decided by which
/// start-line pattern matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Request,
    Response,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Request => f.write_str("request"),
            MessageKind::Response => f.write_str("response"),
        }
    }
}

/// The first line of a message.
///
/// Exactly one variant is populated per message; the request fields and the
/// response fields never coexist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartLine {
    Request {
        method: String,
        /// The request target exactly as it appeared, absolute or relative.
        target: String,
        version: Version,
    },
    Response {
        version: Version,
        status: u16,
        reason: String,
    },
}

impl StartLine {
    pub fn kind(&self) -> MessageKind {
        match self {
            StartLine::Request { .. } => MessageKind::Request,
            StartLine::Response { .. } => MessageKind::Response,
        }
    }

    pub fn version(&self) -> Version {
        match self {
            StartLine::Request { version, .. } | StartLine::Response { version, .. } => *version,
        }
    }

    pub fn method(&self) -> Option<&str> {
        match self {
            StartLine::Request { method, .. } => Some(method),
            StartLine::Response { .. } => None,
        }
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            StartLine::Request { target, .. } => Some(target),
            StartLine::Response { .. } => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            StartLine::Request { .. } => None,
            StartLine::Response { status, .. } => Some(*status),
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            StartLine::Request { .. } => None,
            StartLine::Response { reason, .. } => Some(reason),
        }
    }
}

/// Reconstructs the start line in wire order. Requests parsed as HTTP/0.9
/// are rendered with their implied version.
impl fmt::Display for StartLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartLine::Request { method, target, version } => {
                write!(f, "{method} {target} HTTP/{version}")
            }
            StartLine::Response { version, status, reason } => {
                write!(f, "HTTP/{version} {status}")?;
                if !reason.is_empty() {
                    write!(f, " {reason}")?;
                }
                Ok(())
            }
        }
    }
}

/// How the message body is delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// No body is framed; the decoder starts at end of input.
    None,
    /// `Content-Length`-delimited body of exactly this many bytes.
    Length(u64),
    /// Chunked transfer encoding.
    Chunked,
}

impl Framing {
    /// The framing policy of RFC 7230 §3.3.3 as this parser applies it:
    ///
    /// 1. a `Transfer-Encoding` of `chunked` wins over any `Content-Length`;
    /// 2. `GET` and `CONNECT` requests without a positive declared length
    ///    carry no body;
    /// 3. everything else is length-delimited, with an absent or
    ///    unparsable `Content-Length` framed as zero bytes (the malformed
    ///    value itself stays visible as [`ContentLength::Invalid`]).
    pub fn of(method: Option<&str>, headers: &HeaderList) -> Framing {
        if headers.is_chunked() {
            return Framing::Chunked;
        }

        let declared = headers.content_length().value().unwrap_or(0);

        let bodyless_method =
            method.is_some_and(|m| m.eq_ignore_ascii_case("GET") || m.eq_ignore_ascii_case("CONNECT"));

        if bodyless_method && declared == 0 { Framing::None } else { Framing::Length(declared) }
    }

    pub fn is_chunked(&self) -> bool {
        matches!(self, Framing::Chunked)
    }
}

/// Everything known about a message once its prologue has been parsed:
/// the start line, the ordered header list and the derived content length
/// status. The body is deliberately not part of the head so the two can be
/// separated with [`HttpMessage::into_parts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHead {
    pub(crate) start: StartLine,
    pub(crate) headers: HeaderList,
    pub(crate) content_length: ContentLength,
}

impl MessageHead {
    pub fn start_line(&self) -> &StartLine {
        &self.start
    }

    pub fn kind(&self) -> MessageKind {
        self.start.kind()
    }

    pub fn version(&self) -> Version {
        self.start.version()
    }

    pub fn method(&self) -> Option<&str> {
        self.start.method()
    }

    pub fn target(&self) -> Option<&str> {
        self.start.target()
    }

    pub fn status(&self) -> Option<u16> {
        self.start.status()
    }

    pub fn reason(&self) -> Option<&str> {
        self.start.reason()
    }

    pub fn headers(&self) -> &HeaderList {
        &self.headers
    }

    /// Shorthand for [`HeaderList::get`] on the stored list.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn content_length(&self) -> ContentLength {
        self.content_length
    }
}

/// A fully parsed HTTP/1.x message.
///
/// The message exclusively owns the underlying byte source through its
/// [`BodyReader`]; dropping the message releases the source. Handing the
/// body off to another consumer is a move ([`into_parts`] or [`into_body`]),
/// so the message cannot be used, or double-release the source, afterwards.
///
/// [`into_parts`]: HttpMessage::into_parts
/// [`into_body`]: HttpMessage::into_body
#[derive(Debug)]
pub struct HttpMessage<R> {
    head: MessageHead,
    body: BodyReader<R>,
}

impl<R> HttpMessage<R> {
    pub(crate) fn new(head: MessageHead, body: BodyReader<R>) -> Self {
        Self { head, body }
    }

    pub fn head(&self) -> &MessageHead {
        &self.head
    }

    pub fn kind(&self) -> MessageKind {
        self.head.kind()
    }

    pub fn start_line(&self) -> &StartLine {
        &self.head.start
    }

    pub fn version(&self) -> Version {
        self.head.version()
    }

    pub fn method(&self) -> Option<&str> {
        self.head.method()
    }

    pub fn target(&self) -> Option<&str> {
        self.head.target()
    }

    pub fn status(&self) -> Option<u16> {
        self.head.status()
    }

    pub fn reason(&self) -> Option<&str> {
        self.head.reason()
    }

    pub fn headers(&self) -> &HeaderList {
        &self.head.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.header(name)
    }

    pub fn content_length(&self) -> ContentLength {
        self.head.content_length
    }

    /// The body decoder. Reading from it advances the underlying source.
    pub fn body_mut(&mut self) -> &mut BodyReader<R> {
        &mut self.body
    }

    pub fn body(&self) -> &BodyReader<R> {
        &self.body
    }

    /// Trailing headers, populated once a chunked body has been read
    /// through its terminal chunk.
    pub fn trailers(&self) -> &Trailers {
        self.body.trailers()
    }

    /// Splits the message into its head and body, disowning the source:
    /// the returned [`BodyReader`] is now solely responsible for it.
    pub fn into_parts(self) -> (MessageHead, BodyReader<R>) {
        (self.head, self.body)
    }

    /// Disowns the body outright, dropping the head.
    pub fn into_body(self) -> BodyReader<R> {
        self.body
    }
}
