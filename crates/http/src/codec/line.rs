//! Line reading over a raw byte source.
//!
//! HTTP prologue lines, chunk size lines and chunk terminators are all read
//! through [`read_line`]. The source is advanced one byte at a time so the
//! reader never consumes past the line terminator, which is what lets the
//! body decoder resume at exactly the right position afterwards.

use std::io;
use std::io::Read;

/// Reads one line into `line`, clearing it first.
///
/// A line ends at `\n` or at end of input; every `\r` is stripped, so both
/// CRLF and bare LF terminators are accepted. Bytes are widened to chars as
/// Latin-1, mirroring how captured traffic is conventionally decoded.
pub(crate) fn read_line<R: Read>(input: &mut R, line: &mut String) -> io::Result<()> {
    line.clear();

    let mut byte = [0u8; 1];
    loop {
        match input.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => match byte[0] {
                b'\n' => break,
                b'\r' => {}
                b => line.push(char::from(b)),
            },
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
