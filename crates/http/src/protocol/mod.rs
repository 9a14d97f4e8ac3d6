//! Core protocol types for parsed HTTP/1.x messages.
//!
//! # Architecture
//!
//! - **Message model** ([`message`]): the immutable parsed result
//!   - [`HttpMessage`]: start line, headers and body handle, owning the source
//!   - [`MessageHead`]: everything except the body, separable from it
//!   - [`StartLine`] / [`MessageKind`]: request-or-response, as a closed enum
//!   - [`Framing`]: the body delimitation policy
//!
//! - **Headers** ([`header`]): ordered, duplicate-preserving field storage
//!   - [`HeaderList`]: the stored fields plus derived lookups
//!   - [`ContentLength`]: `Missing` / `Invalid` / `Defined` status
//!   - [`Trailers`]: trailing-header availability marker
//!
//! - **Body streaming** ([`body`]): the content decoder
//!   - [`body::BodyReader`]: pull-based `Read` over the decoded body bytes
//!
//! - **Errors** ([`error`]): [`ParseError`], fatal and typed

mod message;
pub use message::Framing;
pub use message::HttpMessage;
pub use message::MessageHead;
pub use message::MessageKind;
pub use message::StartLine;

mod header;
pub use header::ContentLength;
pub use header::HeaderList;
pub use header::Trailers;

mod version;
pub use version::Version;

mod error;
pub use error::ParseError;

pub mod body;
