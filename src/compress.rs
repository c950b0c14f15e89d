use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

/// default zlib level, same as git's core.compression default
pub const DEFAULT_LEVEL: u32 = 6;

/// zlib-compress a buffer
pub fn compress(data: &[u8], level: u32) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level.min(9)));
    encoder.write_all(data)?;
    encoder.finish()
}

/// zlib-compress a buffer into a sink
pub fn compress_to<W: Write>(data: &[u8], level: u32, sink: W) -> std::io::Result<W> {
    let mut encoder = ZlibEncoder::new(sink, Compression::new(level.min(9)));
    encoder.write_all(data)?;
    encoder.finish()
}

/// inflate a whole zlib stream into memory
pub fn decompress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
