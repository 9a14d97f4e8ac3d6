//! Dumps the HTTP messages held in a capture file.
//!
//! With a SAZ/ZIP archive (recognized by its `PK` magic bytes), prints
//! every correlated request/response pair in key order. With a raw message
//! file, prints the prologue and trailers to stderr and the decoded body
//! bytes to stdout, so the body can be piped onward.

use std::error::Error;
use std::fs::File;
use std::io;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use trawl_http::codec::read_message;
use trawl_http::protocol::HttpMessage;
use trawl_saz::archive::open_archive;

#[derive(Debug, Parser)]
#[command(about = "Dump HTTP messages from a capture archive or raw message file")]
struct Args {
    /// SAZ/ZIP capture archive, or a file holding one raw HTTP message
    file: PathBuf,
}

fn main() -> ExitCode {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let args = Args::parse();
    match run(&args.file) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(cause = %e, "dump failed");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &Path) -> Result<(), Box<dyn Error>> {
    if is_zip_file(path)? {
        info!(path = %path.display(), "reading capture archive");
        let mut stdout = io::stdout().lock();

        for pair in open_archive(path)? {
            let pair = pair?;
            for (name, message) in [(pair.request_name, pair.request), (pair.response_name, pair.response)] {
                writeln!(stdout, ":{name}")?;
                writeln!(stdout)?;
                dump(message, &mut stdout, None)?;
                writeln!(stdout)?;
            }
        }
    } else {
        let message = read_message(BufReader::new(File::open(path)?))?;
        let mut stdout = io::stdout().lock();
        dump(message, &mut io::stderr().lock(), Some(&mut stdout))?;
    }

    Ok(())
}

/// Writes the start line, headers and (once the body is drained) trailers
/// to `prologue_out`. Body bytes go to `content_out` when given; without
/// it, chunked bodies are still drained so their trailers become readable.
fn dump<R: Read, W: Write>(
    mut message: HttpMessage<R>,
    prologue_out: &mut W,
    content_out: Option<&mut dyn Write>,
) -> io::Result<()> {
    writeln!(prologue_out, "{}", message.start_line())?;
    for (name, value) in message.headers().iter() {
        writeln!(prologue_out, "{name}: {value}")?;
    }

    let chunked = message.headers().is_chunked();
    match content_out {
        Some(out) => {
            io::copy(message.body_mut(), out)?;
        }
        None if chunked => {
            io::copy(message.body_mut(), &mut io::sink())?;
        }
        None => return Ok(()),
    }

    if let Some(fields) = message.trailers().fields() {
        for (name, value) in fields.iter() {
            writeln!(prologue_out, "{name}: {value}")?;
        }
    }

    Ok(())
}

fn is_zip_file(path: &Path) -> io::Result<bool> {
    let mut magic = [0u8; 2];
    let n = File::open(path)?.read(&mut magic)?;
    Ok(n == 2 && &magic == b"PK")
}
