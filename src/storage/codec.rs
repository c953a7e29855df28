//! At-rest compression codec.
//!
//! A symmetric raw-deflate transform at maximum compression ratio. The codec
//! is a pure byte-stream transform with no knowledge of HTTP or the storage
//! layout; blobs on disk hold exactly what `compress` produces.

use std::io::{self, Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    /// The compressed stream is corrupt or truncated. Distinct from plain
    /// I/O failure so callers never serve partial or garbage bytes silently.
    #[error("corrupt deflate stream: {0}")]
    Corrupt(#[source] io::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Compress everything from `src` into `dst`, returning the writer.
pub fn compress_to<R: Read, W: Write>(mut src: R, dst: W) -> io::Result<W> {
    let mut encoder = DeflateEncoder::new(dst, Compression::best());
    io::copy(&mut src, &mut encoder)?;
    encoder.finish()
}

pub fn compress(input: &[u8]) -> io::Result<Vec<u8>> {
    compress_to(input, Vec::new())
}

/// Decompress everything from `src` into `dst`, returning the number of
/// bytes written.
pub fn decompress_to<R: Read, W: Write>(src: R, mut dst: W) -> Result<u64, CodecError> {
    let mut decoder = DeflateDecoder::new(src);
    match io::copy(&mut decoder, &mut dst) {
        Ok(written) => Ok(written),
        Err(err)
            if matches!(
                err.kind(),
                io::ErrorKind::InvalidInput
                    | io::ErrorKind::InvalidData
                    | io::ErrorKind::UnexpectedEof
            ) =>
        {
            Err(CodecError::Corrupt(err))
        }
        Err(err) => Err(CodecError::Io(err)),
    }
}

pub fn decompress(input: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    decompress_to(input, &mut out)?;
    Ok(out)
}
