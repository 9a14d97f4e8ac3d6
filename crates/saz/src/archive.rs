//! SAZ capture-archive reading.
//!
//! A SAZ file is a plain ZIP archive in which each captured session is a
//! pair of entries sharing a numeric key: `<digits>_c.txt` holds the bytes
//! the client sent (the request) and `<digits>_s.txt` the bytes the server
//! answered with (the response); suffix and extension are matched
//! case-insensitively on the file-name component alone. Entries named any
//! other way are ignored, as are keys missing one of the two sides.
//!
//! [`read_correlated`] pairs the sides and yields one [`MessagePair`] per
//! key, in ascending key order, with both sides parsed through the
//! [`trawl_http`] reader entry points.

use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use thiserror::Error;
use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use trawl_http::codec::{read_request, read_response};
use trawl_http::protocol::{HttpMessage, ParseError};

/// Errors surfaced while reading a capture archive.
#[derive(Debug, Error)]
pub enum SazError {
    #[error("archive error: {source}")]
    Archive {
        #[from]
        source: ZipError,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("invalid HTTP message in {name}: {source}")]
    Message { name: String, source: ParseError },
}

/// A parsed message read out of an archive entry. Entries are decompressed
/// fully before parsing, so the body's source is an in-memory buffer.
pub type ArchiveMessage = HttpMessage<Cursor<Vec<u8>>>;

/// One correlated request/response session.
#[derive(Debug)]
pub struct MessagePair {
    /// The shared numeric filename prefix.
    pub key: u64,
    pub request_name: String,
    pub request: ArchiveMessage,
    pub response_name: String,
    pub response: ArchiveMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Request,
    Response,
}

/// The `<digits>_<c|s>.txt` naming convention, applied to the file-name
/// component of an entry path. Returns `None` for entries to ignore.
fn classify(entry_name: &str) -> Option<(u64, Side)> {
    let file_name = entry_name.rsplit('/').next().unwrap_or(entry_name);

    let ext_at = file_name.len().checked_sub(4).filter(|&i| file_name.is_char_boundary(i))?;
    let (stem, ext) = file_name.split_at(ext_at);
    if !ext.eq_ignore_ascii_case(".txt") {
        return None;
    }

    let (digits, side) = stem.split_once('_')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let key = digits.parse().ok()?;

    let side = if side.eq_ignore_ascii_case("c") {
        Side::Request
    } else if side.eq_ignore_ascii_case("s") {
        Side::Response
    } else {
        return None;
    };

    Some((key, side))
}

#[derive(Debug, Default)]
struct Sides {
    request: Option<(usize, String)>,
    response: Option<(usize, String)>,
}

#[derive(Debug)]
struct PairIndex {
    key: u64,
    request: (usize, String),
    response: (usize, String),
}

/// Iterator over the correlated request/response pairs of one archive,
/// ordered by numeric key.
#[derive(Debug)]
pub struct CorrelatedPairs<R> {
    zip: ZipArchive<R>,
    pairs: std::vec::IntoIter<PairIndex>,
}

/// Opens a capture archive on the filesystem.
pub fn open_archive<P: AsRef<Path>>(path: P) -> Result<CorrelatedPairs<BufReader<File>>, SazError> {
    read_correlated(BufReader::new(File::open(path)?))
}

/// Scans the archive's entry names, pairs request and response sides by
/// key, and returns an iterator that parses each pair on demand.
pub fn read_correlated<R: Read + Seek>(input: R) -> Result<CorrelatedPairs<R>, SazError> {
    let mut zip = ZipArchive::new(input)?;

    let mut sessions: BTreeMap<u64, Sides> = BTreeMap::new();
    for index in 0..zip.len() {
        let name = zip.by_index(index)?.name().to_owned();

        let Some((key, side)) = classify(&name) else {
            debug!(%name, "ignoring entry outside the naming convention");
            continue;
        };

        let sides = sessions.entry(key).or_default();
        let slot = match side {
            Side::Request => &mut sides.request,
            Side::Response => &mut sides.response,
        };
        if slot.is_none() {
            *slot = Some((index, name));
        } else {
            debug!(%name, key, "ignoring duplicate entry for key");
        }
    }

    let pairs: Vec<_> = sessions
        .into_iter()
        .filter_map(|(key, sides)| match (sides.request, sides.response) {
            (Some(request), Some(response)) => Some(PairIndex { key, request, response }),
            _ => {
                debug!(key, "skipping key without both sides");
                None
            }
        })
        .collect();

    Ok(CorrelatedPairs { zip, pairs: pairs.into_iter() })
}

impl<R: Read + Seek> CorrelatedPairs<R> {
    fn slurp(&mut self, index: usize) -> Result<Vec<u8>, SazError> {
        let mut entry = self.zip.by_index(index)?;
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    fn load(&mut self, pair: PairIndex) -> Result<MessagePair, SazError> {
        let (request_index, request_name) = pair.request;
        let (response_index, response_name) = pair.response;

        let request = read_request(Cursor::new(self.slurp(request_index)?))
            .map_err(|source| SazError::Message { name: request_name.clone(), source })?;
        let response = read_response(Cursor::new(self.slurp(response_index)?))
            .map_err(|source| SazError::Message { name: response_name.clone(), source })?;

        Ok(MessagePair { key: pair.key, request_name, request, response_name, response })
    }
}

impl<R: Read + Seek> Iterator for CorrelatedPairs<R> {
    type Item = Result<MessagePair, SazError>;

    fn next(&mut self) -> Option<Self::Item> {
        let pair = self.pairs.next()?;
        Some(self.load(pair))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pairs.size_hint()
    }
}
