//! Parser for the message prologue: the start line and the header block.
//!
//! The prologue grammar is shared between the two message kinds and, through
//! [`read_fields`], with the trailer section of chunked bodies:
//!
//! - the start line is matched against the status-line pattern
//!   (`HTTP/<d>.<d> <3-digit status> [reason]`) and the request-line pattern
//!   (`<method> <target> [HTTP/<d>.<d>]`, version optional; a request
//!   without one is HTTP/0.9); a line matching neither is a format error
//! - header lines are `name ":" value` with surrounding horizontal
//!   whitespace trimmed from both parts
//! - a line starting with whitespace continues the previous field's value
//!   (RFC 7230 obs-fold); the trimmed fragment is appended with no separator
//! - lines without a colon are silently skipped
//! - an empty line terminates the block
//!
//! The parser consumes the source exactly through the terminating empty
//! line, leaving it positioned at the first body byte.

use std::io::Read;

use crate::codec::line::read_line;
use crate::protocol::{HeaderList, ParseError, StartLine, Version};

/// Horizontal whitespace as header-field grammar defines it.
fn trim_hws(s: &str) -> &str {
    s.trim_matches([' ', '\t'])
}

/// Reads the start line and header block from `input`.
pub(crate) fn parse_prologue<R: Read>(input: &mut R) -> Result<(StartLine, HeaderList), ParseError> {
    let mut line = String::new();
    read_line(input, &mut line)?;
    let start = parse_start_line(&line)?;
    let headers = read_fields(input, &mut line)?;
    Ok((start, headers))
}

/// Reads `name ":" value` lines up to and including the terminating empty
/// line. Also used for the trailer section of chunked bodies, which repeats
/// the header grammar.
pub(crate) fn read_fields<R: Read>(input: &mut R, line: &mut String) -> Result<HeaderList, ParseError> {
    let mut fields = HeaderList::new();
    let mut pending: Option<(String, String)> = None;

    loop {
        read_line(input, line)?;

        if line.is_empty() {
            break;
        }

        if line.starts_with([' ', '\t']) {
            // obs-fold continuation; a fold with no preceding field is junk
            if let Some((_, value)) = pending.as_mut() {
                value.push_str(trim_hws(line));
            }
            continue;
        }

        if let Some((name, value)) = pending.take() {
            fields.push(name, value);
        }

        if let Some((name, value)) = line.split_once(':') {
            pending = Some((trim_hws(name).to_owned(), trim_hws(value).to_owned()));
        }
    }

    if let Some((name, value)) = pending {
        fields.push(name, value);
    }

    Ok(fields)
}

fn parse_start_line(raw: &str) -> Result<StartLine, ParseError> {
    let line = raw.trim();

    // A status line always begins "HTTP/"; no request line can, since a
    // method token is alphabetic and must be followed by a space.
    if let Some(rest) = line.strip_prefix("HTTP/") {
        return parse_status_line(rest).ok_or_else(|| ParseError::invalid_start_line(raw));
    }

    parse_request_line(line).ok_or_else(|| ParseError::invalid_start_line(raw))
}

/// `<version> <status> [reason]` after the `HTTP/` prefix. The version is
/// `0.9` or `[1-9].[0-9]`; the status is exactly three digits, the first
/// between 1 and 5; the reason, if present, runs to the end of the line.
fn parse_status_line(rest: &str) -> Option<StartLine> {
    let (version, rest) = parse_version(rest)?;

    let rest = strip_spaces(rest)?;

    let status = rest.get(..3).filter(|s| {
        let b = s.as_bytes();
        (b'1'..=b'5').contains(&b[0]) && b[1].is_ascii_digit() && b[2].is_ascii_digit()
    })?;
    let status: u16 = status.parse().ok()?;

    let rest = &rest[3..];
    let reason = if rest.is_empty() { "" } else { strip_spaces(rest)? };

    Some(StartLine::Response { version, status, reason: reason.to_owned() })
}

/// `<method> <target> [HTTP/<version>]`; the method is one or more ASCII
/// letters, the target any run of non-space bytes. A missing version token
/// means HTTP/0.9, which is why it may only be absent, never `0.x`.
fn parse_request_line(line: &str) -> Option<StartLine> {
    let method_end = line.bytes().position(|b| !b.is_ascii_alphabetic()).unwrap_or(line.len());
    if method_end == 0 {
        return None;
    }
    let method = &line[..method_end];

    let rest = strip_spaces(&line[method_end..])?;

    let target_end = rest.find(' ').unwrap_or(rest.len());
    let target = &rest[..target_end];
    if target.is_empty() {
        return None;
    }

    let tail = &rest[target_end..];
    let version = if tail.is_empty() {
        Version::HTTP_09
    } else {
        let (version, after) = parse_version(strip_spaces(tail)?.strip_prefix("HTTP/")?)?;
        if version.major == 0 || !after.is_empty() {
            return None;
        }
        version
    };

    Some(StartLine::Request { method: method.to_owned(), target: target.to_owned(), version })
}

/// A `<digit>.<digit>` version token, constrained to `0.9` or
/// `[1-9].[0-9]`. Returns the version and the unconsumed remainder.
fn parse_version(s: &str) -> Option<(Version, &str)> {
    let b = s.as_bytes();
    if b.len() < 3 || !b[0].is_ascii_digit() || b[1] != b'.' || !b[2].is_ascii_digit() {
        return None;
    }

    let (major, minor) = (b[0] - b'0', b[2] - b'0');
    if major == 0 && minor != 9 {
        return None;
    }

    Some((Version::new(major, minor), &s[3..]))
}

/// Requires at least one space, then returns the rest with all leading
/// spaces removed.
fn strip_spaces(s: &str) -> Option<&str> {
    s.strip_prefix(' ').map(|s| s.trim_start_matches(' '))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::MessageKind;
    use std::io::Cursor;

    fn prologue(input: &str) -> Result<(StartLine, HeaderList), ParseError> {
        parse_prologue(&mut Cursor::new(input.as_bytes().to_vec()))
    }

    #[test]
    fn request_line() {
        let (start, headers) = prologue("GET /index.html HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(start.kind(), MessageKind::Request);
        assert_eq!(start.method(), Some("GET"));
        assert_eq!(start.target(), Some("/index.html"));
        assert_eq!(start.version(), Version::HTTP_11);
        assert!(headers.is_empty());
    }

    #[test]
    fn request_line_without_version_is_http_09() {
        let (start, _) = prologue("GET /\r\n\r\n").unwrap();
        assert_eq!(start.version(), Version::HTTP_09);
    }

    #[test]
    fn request_line_tolerates_repeated_spaces() {
        let (start, _) = prologue("POST   /submit   HTTP/1.0\r\n\r\n").unwrap();
        assert_eq!(start.method(), Some("POST"));
        assert_eq!(start.target(), Some("/submit"));
        assert_eq!(start.version(), Version::HTTP_10);
    }

    #[test]
    fn request_method_case_is_preserved() {
        let (start, _) = prologue("get / HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(start.method(), Some("get"));
    }

    #[test]
    fn status_line() {
        let (start, _) = prologue("HTTP/1.1 200 OK\r\n\r\n").unwrap();
        assert_eq!(start.kind(), MessageKind::Response);
        assert_eq!(start.status(), Some(200));
        assert_eq!(start.reason(), Some("OK"));
        assert_eq!(start.version(), Version::HTTP_11);
    }

    #[test]
    fn status_line_reason_is_optional() {
        let (start, _) = prologue("HTTP/1.1 204\r\n\r\n").unwrap();
        assert_eq!(start.status(), Some(204));
        assert_eq!(start.reason(), Some(""));
    }

    #[test]
    fn status_line_reason_keeps_inner_spaces() {
        let (start, _) = prologue("HTTP/1.0 404 Not Found at all\r\n\r\n").unwrap();
        assert_eq!(start.reason(), Some("Not Found at all"));
    }

    #[test]
    fn status_line_version_09_is_accepted() {
        let (start, _) = prologue("HTTP/0.9 200 OK\r\n\r\n").unwrap();
        assert_eq!(start.version(), Version::HTTP_09);
    }

    #[test]
    fn invalid_start_lines_are_format_errors() {
        for input in [
            "\r\n\r\n",
            "!!! / HTTP/1.1\r\n\r\n",
            "GET\r\n\r\n",
            "HTTP/1.1\r\n\r\n",
            "HTTP/1.1 99 Too Short\r\n\r\n",
            "HTTP/1.1 600 Out of Range\r\n\r\n",
            "HTTP/1.1 2000 Too Long\r\n\r\n",
            "HTTP/x.y 200 OK\r\n\r\n",
            "GET / HTTP/0.9\r\n\r\n",
            "GET / FTP/1.1\r\n\r\n",
        ] {
            assert!(
                matches!(prologue(input), Err(ParseError::InvalidStartLine { .. })),
                "expected start line error for {input:?}"
            );
        }
    }

    #[test]
    fn header_names_and_values_are_trimmed() {
        let (_, headers) = prologue("HTTP/1.1 200 OK\r\nContent-Type \t:  text/plain \r\n\r\n").unwrap();
        let all: Vec<_> = headers.iter().collect();
        assert_eq!(all, [("Content-Type", "text/plain")]);
    }

    #[test]
    fn header_value_may_be_empty() {
        let (_, headers) = prologue("HTTP/1.1 200 OK\r\nContent-Length:\r\nContent-Length: 0\r\n\r\n").unwrap();
        let all: Vec<_> = headers.iter().collect();
        assert_eq!(all, [("Content-Length", ""), ("Content-Length", "0")]);
    }

    #[test]
    fn duplicate_headers_keep_order_and_count() {
        let (_, headers) =
            prologue("HTTP/1.1 200 OK\r\nSet-Cookie: a=1\r\nX-Other: y\r\nSet-Cookie: b=2\r\n\r\n").unwrap();
        let cookies: Vec<_> = headers.get_all("set-cookie").collect();
        assert_eq!(cookies, ["a=1", "b=2"]);
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn folded_value_concatenates_trimmed_fragments() {
        let (_, headers) = prologue("GET / HTTP/1.1\r\nUser-Agent: A\r\n\tB\r\n C\r\n\r\n").unwrap();
        assert_eq!(headers.get("User-Agent"), Some("ABC"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn folding_ends_at_first_non_indented_line() {
        let (_, headers) = prologue("GET / HTTP/1.1\r\nA: one\r\n two\r\nB: three\r\n\r\n").unwrap();
        assert_eq!(headers.get("A"), Some("onetwo"));
        assert_eq!(headers.get("B"), Some("three"));
    }

    #[test]
    fn lines_without_a_colon_are_skipped() {
        let (_, headers) = prologue("GET / HTTP/1.1\r\nHost: h\r\nJUNK LINE\r\nAccept: */*\r\n\r\n").unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("Host"), Some("h"));
        assert_eq!(headers.get("Accept"), Some("*/*"));
    }

    #[test]
    fn source_stops_exactly_after_the_blank_line() {
        let mut cursor = Cursor::new(&b"GET / HTTP/1.1\r\nHost: h\r\n\r\nBODY"[..]);
        parse_prologue(&mut cursor).unwrap();
        assert_eq!(cursor.position(), (b"GET / HTTP/1.1\r\nHost: h\r\n\r\n".len()) as u64);
    }
}
