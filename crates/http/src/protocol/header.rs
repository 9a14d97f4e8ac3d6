//! Ordered header storage and the derived lookups over it.
//!
//! The parser stores header fields exactly as they appeared on the wire:
//! insertion order preserved, names left in their original case, duplicates
//! retained as separate entries, and empty values kept (a header present with
//! an empty value is distinct from a header that is absent). Merging of
//! repeated fields is never performed by the parser itself; it is offered as
//! derived, on-demand lookups that recompute from the stored list.

/// Headers whose values must never be comma-joined when combined, because a
/// comma inside a single value is meaningful (RFC 6265 cookie dates and
/// auth-param lists). These are joined with a newline instead.
const NEWLINE_JOINED: [&str; 2] = ["set-cookie", "www-authenticate"];

/// An ordered sequence of `(name, value)` header fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList {
    fields: Vec<(String, String)>,
}

impl HeaderList {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, name: String, value: String) {
        self.fields.push((name, value));
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates the fields in insertion order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &str)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Simple lookup: the value of the *last* field whose name matches
    /// case-insensitively, or `None` if the header is absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.iter().rev().find(|(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, v)| v)
    }

    /// Every value recorded under `name` (case-insensitive), in insertion
    /// order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.iter().filter(move |(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, v)| v)
    }

    /// Combined lookup for repeatable headers: all values joined with `", "`,
    /// except cookie-like headers (see [`NEWLINE_JOINED`]) which are joined
    /// with a newline. Returns `None` when the header is absent.
    pub fn get_combined(&self, name: &str) -> Option<String> {
        let mut values = self.get_all(name).peekable();
        values.peek()?;
        let separator = if NEWLINE_JOINED.iter().any(|h| h.eq_ignore_ascii_case(name)) { "\n" } else { ", " };
        Some(values.collect::<Vec<_>>().join(separator))
    }

    /// Derives the content length status from the last `Content-Length`
    /// field carrying a non-empty value.
    ///
    /// The value grammar is an unsigned decimal integer with optional
    /// surrounding ASCII whitespace; anything else yields
    /// [`ContentLength::Invalid`] rather than an error or a silent zero, so
    /// callers can tell `absent`, `malformed` and `declared` apart.
    pub fn content_length(&self) -> ContentLength {
        let value = self
            .iter()
            .rev()
            .find(|(n, v)| n.eq_ignore_ascii_case("Content-Length") && !v.is_empty())
            .map(|(_, v)| v);

        match value {
            None => ContentLength::Missing,
            Some(v) => {
                let v = v.trim();
                if !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()) {
                    match v.parse::<u64>() {
                        Ok(n) => ContentLength::Defined(n),
                        Err(_) => ContentLength::Invalid,
                    }
                } else {
                    ContentLength::Invalid
                }
            }
        }
    }

    /// Whether the message declares chunked transfer encoding: the last
    /// non-empty `Transfer-Encoding` value, trimmed, equals `chunked`
    /// case-insensitively.
    pub fn is_chunked(&self) -> bool {
        self.iter()
            .rev()
            .find(|(n, v)| n.eq_ignore_ascii_case("Transfer-Encoding") && !v.is_empty())
            .is_some_and(|(_, v)| v.trim().eq_ignore_ascii_case("chunked"))
    }
}

/// The declared `Content-Length` of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentLength {
    /// No `Content-Length` field with a non-empty value was present.
    Missing,
    /// A `Content-Length` field was present but its value is not an
    /// unsigned decimal integer.
    Invalid,
    /// The declared length in bytes.
    Defined(u64),
}

impl ContentLength {
    /// The declared length, if one was successfully parsed.
    pub fn value(&self) -> Option<u64> {
        match self {
            ContentLength::Defined(n) => Some(*n),
            _ => None,
        }
    }
}

/// Trailing headers of a message body.
///
/// Only chunked messages can carry trailers, and they become readable only
/// after the terminal zero-length chunk has been consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trailers {
    /// The framing has no trailer section (fixed-length or bodyless).
    NotApplicable,
    /// Chunked body not yet consumed through the terminal chunk.
    Pending,
    /// Trailer fields read after the terminal chunk; may be empty.
    Fields(HeaderList),
}

impl Trailers {
    /// The trailer fields, once read. `None` while pending or when the
    /// framing has none.
    pub fn fields(&self) -> Option<&HeaderList> {
        match self {
            Trailers::Fields(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Trailers::Pending)
    }
}
