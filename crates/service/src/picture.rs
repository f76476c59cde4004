//! Zlib codec for product pictures.
//!
//! Pictures are compressed before they reach the database and expanded again on
//! every read path, so callers only ever see the raw image bytes.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::errors::ServiceError;

pub fn compress(raw: &[u8]) -> Result<Vec<u8>, ServiceError> {
    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity((raw.len() / 2).max(64)),
        Compression::best(),
    );
    encoder
        .write_all(raw)
        .map_err(|e| ServiceError::Picture(format!("zlib encoding failed: {e}")))?;
    encoder
        .finish()
        .map_err(|e| ServiceError::Picture(format!("zlib encoding failed: {e}")))
}

pub fn decompress(stored: &[u8]) -> Result<Vec<u8>, ServiceError> {
    let mut decoder = ZlibDecoder::new(stored);
    let mut raw = Vec::with_capacity(stored.len().saturating_mul(2).max(64));
    decoder
        .read_to_end(&mut raw)
        .map_err(|e| ServiceError::Picture(format!("zlib decoding failed: {e}")))?;
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::{compress, decompress};

    #[test]
    fn roundtrip_restores_input() {
        let raw = b"\x89PNG\r\n\x1a\n some pretend image payload repeated repeated repeated";
        let stored = compress(raw).expect("compress");
        assert_ne!(stored.as_slice(), raw.as_slice());
        let restored = decompress(&stored).expect("decompress");
        assert_eq!(restored.as_slice(), raw.as_slice());
    }

    #[test]
    fn empty_input_roundtrips() {
        let stored = compress(b"").expect("compress");
        let restored = decompress(&stored).expect("decompress");
        assert!(restored.is_empty());
    }

    #[test]
    fn repetitive_input_shrinks() {
        let raw = vec![0xABu8; 4096];
        let stored = compress(&raw).expect("compress");
        assert!(stored.len() < raw.len());
    }

    #[test]
    fn corrupt_input_is_an_error_not_a_panic() {
        let err = decompress(b"definitely not a zlib stream");
        assert!(err.is_err());
    }
}
