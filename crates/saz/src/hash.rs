//! Content hashing over parsed messages.
//!
//! A hash is computed by streaming an ordered, configurable subset of
//! message parts through an incremental digest. Headers are canonicalized
//! first (names ASCII-lowercased, values trimmed, value groups sorted by
//! name with per-name order kept), so two messages whose headers differ
//! only in field order or name case hash identically, while any difference
//! in actual header content changes the digest. Body bytes are streamed
//! through a fixed buffer, never materialized whole.
//!
//! The functions are generic over the digest algorithm via the
//! [`Digest`] trait; `sha2::Sha256` is the conventional choice.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::io;
use std::io::Read;

use sha2::digest::{Digest, Output};

use trawl_http::protocol::{HeaderList, HttpMessage};

/// One hashable part of a message, in the order it should be folded in.
///
/// `Method` and `Target` apply to requests only, `Status` and `Reason` to
/// responses only; selecting one against the wrong kind is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagePart {
    /// Request method, ASCII-uppercased.
    Method,
    /// Request target exactly as parsed.
    Target,
    /// Protocol version as `major.minor`.
    Version,
    /// Response status code in decimal.
    Status,
    /// Response reason phrase verbatim.
    Reason,
    /// Canonicalized header fields.
    Headers,
    /// Decoded body bytes.
    Content,
    /// Canonicalized trailing headers; contributes nothing while the
    /// trailers are pending or inapplicable.
    Trailers,
}

/// An ordered selection of message parts to hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashConfig {
    parts: Vec<MessagePart>,
}

impl HashConfig {
    pub fn new(parts: Vec<MessagePart>) -> Self {
        Self { parts }
    }

    /// The default request selection: method, target, version, headers,
    /// content, trailers.
    pub fn request() -> Self {
        use MessagePart::*;
        Self::new(vec![Method, Target, Version, Headers, Content, Trailers])
    }

    /// The default response selection: version, status, reason, headers,
    /// content, trailers.
    pub fn response() -> Self {
        use MessagePart::*;
        Self::new(vec![Version, Status, Reason, Headers, Content, Trailers])
    }

    pub fn parts(&self) -> &[MessagePart] {
        &self.parts
    }
}

/// Folds the configured parts of `message` into a digest of type `D`.
///
/// Hashing `Content` consumes the message body; for chunked messages this
/// is also what makes a later `Trailers` part observable.
pub fn hash_message<D, R>(message: &mut HttpMessage<R>, config: &HashConfig) -> io::Result<Output<D>>
where
    D: Digest,
    R: Read,
{
    let mut digest = D::new();

    for part in config.parts() {
        match part {
            MessagePart::Method => {
                digest.update(start_part(message.method(), *part)?.to_ascii_uppercase());
            }
            MessagePart::Target => digest.update(start_part(message.target(), *part)?),
            MessagePart::Version => digest.update(message.version().to_string()),
            MessagePart::Status => {
                let status = message.status().map(|s| s.to_string());
                digest.update(start_part(status.as_deref(), *part)?);
            }
            MessagePart::Reason => digest.update(start_part(message.reason(), *part)?),
            MessagePart::Headers => digest_fields(&mut digest, message.headers()),
            MessagePart::Content => {
                let mut buffer = [0u8; 4096];
                loop {
                    let n = message.body_mut().read(&mut buffer)?;
                    if n == 0 {
                        break;
                    }
                    digest.update(&buffer[..n]);
                }
            }
            MessagePart::Trailers => {
                if let Some(fields) = message.trailers().fields() {
                    digest_fields(&mut digest, fields);
                }
            }
        }
    }

    Ok(digest.finalize())
}

/// [`hash_message`], rendered as a lowercase hexadecimal string.
pub fn hash_message_hex<D, R>(message: &mut HttpMessage<R>, config: &HashConfig) -> io::Result<String>
where
    D: Digest,
    R: Read,
{
    Ok(to_hex(hash_message::<D, R>(message, config)?.as_slice()))
}

fn start_part(value: Option<&str>, part: MessagePart) -> io::Result<&str> {
    value.ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("{part:?} is not applicable to this message kind"))
    })
}

fn digest_fields<D: Digest>(digest: &mut D, fields: &HeaderList) {
    let mut canonical: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for (name, value) in fields.iter() {
        canonical.entry(name.to_ascii_lowercase()).or_default().push(value.trim());
    }

    for (name, values) in &canonical {
        digest.update(name.as_bytes());
        for value in values {
            digest.update(value.as_bytes());
        }
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut hex, byte| {
        let _ = write!(hex, "{byte:02x}");
        hex
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::Sha256;
    use std::io::Cursor;
    use trawl_http::codec::read_message;
    use trawl_http::protocol::HttpMessage;

    fn message(raw: &str) -> HttpMessage<Cursor<Vec<u8>>> {
        read_message(Cursor::new(raw.as_bytes().to_vec())).unwrap()
    }

    fn request_hash(raw: &str) -> String {
        hash_message_hex::<Sha256, _>(&mut message(raw), &HashConfig::request()).unwrap()
    }

    fn response_hash(raw: &str) -> String {
        hash_message_hex::<Sha256, _>(&mut message(raw), &HashConfig::response()).unwrap()
    }

    #[test]
    fn hex_output_shape() {
        let hash = request_hash("GET / HTTP/1.1\r\nHost: h\r\n\r\n");
        assert_eq!(hash.len(), 64);
        assert!(hash.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
    }

    #[test]
    fn header_order_does_not_change_the_hash() {
        let a = response_hash("HTTP/1.1 200 OK\r\nA: 1\r\nB: 2\r\nContent-Length: 2\r\n\r\nhi");
        let b = response_hash("HTTP/1.1 200 OK\r\nB: 2\r\nContent-Length: 2\r\nA: 1\r\n\r\nhi");
        assert_eq!(a, b);
    }

    #[test]
    fn header_name_case_does_not_change_the_hash() {
        let a = response_hash("HTTP/1.1 200 OK\r\nX-Tag: v\r\n\r\n");
        let b = response_hash("HTTP/1.1 200 OK\r\nx-tag: v\r\n\r\n");
        assert_eq!(a, b);
    }

    #[test]
    fn header_content_changes_the_hash() {
        let a = response_hash("HTTP/1.1 200 OK\r\nX-Tag: v1\r\n\r\n");
        let b = response_hash("HTTP/1.1 200 OK\r\nX-Tag: v2\r\n\r\n");
        assert_ne!(a, b);
    }

    #[test]
    fn body_bytes_change_the_hash() {
        let a = response_hash("HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nhi");
        let b = response_hash("HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nho");
        assert_ne!(a, b);
    }

    #[test]
    fn method_is_hashed_case_insensitively() {
        let a = request_hash("get / HTTP/1.1\r\nHost: h\r\n\r\n");
        let b = request_hash("GET / HTTP/1.1\r\nHost: h\r\n\r\n");
        assert_eq!(a, b);
    }

    #[test]
    fn chunked_and_fixed_bodies_with_same_bytes_hash_alike() {
        let fixed = response_hash("HTTP/1.1 200 OK\r\nContent-Length: 7\r\n\r\nMozilla");
        let chunked =
            response_hash("HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n7\r\nMozilla\r\n0\r\n\r\n");
        // headers differ, so hash only the version, status, reason and content
        use MessagePart::*;
        let config = HashConfig::new(vec![Version, Status, Reason, Content]);
        let fixed_only = hash_message_hex::<Sha256, _>(
            &mut message("HTTP/1.1 200 OK\r\nContent-Length: 7\r\n\r\nMozilla"),
            &config,
        )
        .unwrap();
        let chunked_only = hash_message_hex::<Sha256, _>(
            &mut message("HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n7\r\nMozilla\r\n0\r\n\r\n"),
            &config,
        )
        .unwrap();
        assert_eq!(fixed_only, chunked_only);
        assert_ne!(fixed, chunked);
    }

    #[test]
    fn trailing_headers_participate() {
        let a = response_hash(
            "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n2\r\nhi\r\n0\r\nX-Digest: a\r\n\r\n",
        );
        let b = response_hash(
            "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n2\r\nhi\r\n0\r\nX-Digest: b\r\n\r\n",
        );
        assert_ne!(a, b);
    }

    #[test]
    fn inapplicable_part_is_an_error() {
        let err =
            hash_message_hex::<Sha256, _>(&mut message("HTTP/1.1 200 OK\r\n\r\n"), &HashConfig::request())
                .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn part_order_matters() {
        use MessagePart::*;
        let mut a = message("GET / HTTP/1.1\r\nHost: h\r\n\r\n");
        let mut b = message("GET / HTTP/1.1\r\nHost: h\r\n\r\n");
        let ab = hash_message_hex::<Sha256, _>(&mut a, &HashConfig::new(vec![Method, Target])).unwrap();
        let ba = hash_message_hex::<Sha256, _>(&mut b, &HashConfig::new(vec![Target, Method])).unwrap();
        assert_ne!(ab, ba);
    }
}
