//! Capture-archive tooling over the [`trawl_http`] parser.
//!
//! Two collaborators around the core message reader:
//!
//! - [`archive`]: reads SAZ/ZIP capture archives, pairing each session's
//!   request and response entries by their shared numeric key and parsing
//!   both sides
//! - [`hash`]: folds a configurable, ordered selection of message parts
//!   through an incremental digest, with canonicalized headers and
//!   streamed body bytes
//!
//! # Example
//!
//! ```no_run
//! use sha2::Sha256;
//! use trawl_saz::archive::open_archive;
//! use trawl_saz::hash::{hash_message_hex, HashConfig};
//!
//! for pair in open_archive("capture.saz")? {
//!     let mut pair = pair?;
//!     let digest = hash_message_hex::<Sha256, _>(&mut pair.response, &HashConfig::response())?;
//!     println!("{} {} {digest}", pair.key, pair.response_name);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod archive;
pub mod hash;
