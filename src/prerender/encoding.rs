//! gzip translation between what the rendering service sends and what the
//! caller accepts.
//!
//! Upstream requests always advertise `Accept-Encoding: gzip`, so the
//! service may or may not compress. The caller may or may not accept
//! compression. Whenever the two disagree the body is re-encoded.

use std::io::{self, Read, Write};

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

/// What to do with an upstream body before handing it to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transcode {
    /// Caller wants gzip, upstream sent identity.
    Compress,
    /// Caller cannot take gzip, upstream sent it anyway.
    Decompress,
    /// Encodings already agree.
    Passthrough,
}

impl Transcode {
    /// Pick the translation from the caller's `Accept-Encoding` and the
    /// upstream `Content-Encoding`.
    pub fn plan(accept_encoding: &str, content_encoding: &str) -> Self {
        let wants_gzip = mentions_gzip(accept_encoding);
        let is_gzipped = mentions_gzip(content_encoding);

        match (wants_gzip, is_gzipped) {
            (true, false) => Transcode::Compress,
            (false, true) => Transcode::Decompress,
            _ => Transcode::Passthrough,
        }
    }

    /// Like [`Transcode::plan`], but an empty body is never re-encoded.
    /// There is nothing to decode, and compressing it would only add a
    /// gzip frame to a response such as a 204.
    pub fn plan_for_body(accept_encoding: &str, content_encoding: &str, body: &[u8]) -> Self {
        if body.is_empty() {
            return Transcode::Passthrough;
        }
        Self::plan(accept_encoding, content_encoding)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Transcode::Compress => "compress",
            Transcode::Decompress => "decompress",
            Transcode::Passthrough => "passthrough",
        }
    }
}

fn mentions_gzip(value: &str) -> bool {
    value.to_ascii_lowercase().contains("gzip")
}

/// gzip-compress `body`.
pub fn gzip(body: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(body.len() / 2), Compression::default());
    encoder.write_all(body)?;
    encoder.finish()
}

/// Decompress a gzip `body`. Truncated or corrupt input is an error.
pub fn gunzip(body: &[u8]) -> io::Result<Vec<u8>> {
    let mut decoder = MultiGzDecoder::new(body);
    let mut out = Vec::with_capacity(body.len() * 4);
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
