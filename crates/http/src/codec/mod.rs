//! Decoding of raw HTTP/1.x message bytes.
//!
//! The codec is a thin, strictly sequential pipeline over a
//! [`Read`](std::io::Read) source:
//!
//! - [`line`]: CRLF-or-LF line reading, one byte at a time
//! - [`prologue`]: start-line and header-block parsing, shared with the
//!   trailer section of chunked bodies
//! - [`reader`]: the entry points composing prologue parsing, the framing
//!   policy and the body decoder into a parsed message
//!
//! All decoding is pull-based and single-pass: bytes are consumed from the
//! source only at the moment a caller asks for them, and never beyond the
//! end of the message being decoded.

pub(crate) mod line;
pub(crate) mod prologue;
mod reader;

pub use reader::read_message;
pub use reader::read_request;
pub use reader::read_response;
