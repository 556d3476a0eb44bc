//! Compression layer and chunk framing
//!
//! Raw zlib compression plus the small versioned frame used to embed a
//! compressed payload inside any stream:
//!
//! ```text
//! {u32 uncompressed size}{u32 compressed size}{u16 version}{u16 reserved}{compressed bytes}
//! ```
//!
//! The explicit version tag future-proofs the on-disk format; callers only
//! ever see "write this buffer, framed and compressed" and the reverse.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::buf::StreamBuf;
use crate::traits::{BaseStream, ReadStream, WriteStream};

/// The only chunk format version currently written or accepted.
pub const CHUNK_VERSION: u16 = 0;

/// Compress a byte payload with zlib.
///
/// Returns an empty vector on empty input, on input too large for the
/// frame's 32-bit size fields, or on a codec error. Callers must guard
/// against empty input if they need to tell these cases apart.
pub fn compress(data: &[u8]) -> Vec<u8> {
    if data.is_empty() || data.len() > u32::MAX as usize {
        return Vec::new();
    }

    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2 + 64), Compression::default());
    if encoder.write_all(data).is_err() {
        return Vec::new();
    }
    match encoder.finish() {
        Ok(compressed) => compressed,
        Err(err) => {
            tracing::warn!("zlib compression failed: {}", err);
            Vec::new()
        }
    }
}

/// Decompress a zlib payload.
///
/// `expected_size` (0 = unknown) pre-sizes the output; the streaming
/// decoder grows it further as needed. Returns an empty vector on empty
/// input or on any codec error.
pub fn decompress(data: &[u8], expected_size: usize) -> Vec<u8> {
    if data.is_empty() {
        return Vec::new();
    }

    let hint = if expected_size > 0 {
        expected_size
    } else {
        data.len().saturating_mul(7)
    };

    let mut decompressed = Vec::with_capacity(hint);
    let mut decoder = ZlibDecoder::new(data);
    match decoder.read_to_end(&mut decompressed) {
        Ok(_) => decompressed,
        Err(err) => {
            tracing::warn!("zlib decompression failed: {}", err);
            Vec::new()
        }
    }
}

/// Compress the unread content of `source` and write it as a framed chunk.
///
/// Returns false if compression produced an empty result or if the output
/// stream reports failure at any point.
pub fn write_framed_chunk<S: WriteStream + ?Sized>(source: &StreamBuf, out: &mut S) -> bool {
    let payload = source.data();
    let compressed = compress(payload);
    if compressed.is_empty() || compressed.len() > u32::MAX as usize {
        return false;
    }

    out.put32(payload.len() as u32);
    out.put32(compressed.len() as u32);
    out.put16(CHUNK_VERSION);
    out.put16(0); // reserved
    out.put_raw(&compressed);
    !out.is_failed()
}

/// Read one framed chunk from `input`, decompress it, and append the
/// payload to `dst`.
///
/// A zero compressed-size field or an unrecognized version tag rejects the
/// frame before any payload byte is interpreted. The decompressed length
/// must exactly equal the declared uncompressed size.
pub fn read_framed_chunk<S: ReadStream + ?Sized>(input: &mut S, dst: &mut StreamBuf) -> bool {
    let uncompressed_size = input.get32() as usize;
    let compressed_size = input.get32() as usize;
    let version = input.get16();
    input.skip(2); // reserved

    if input.is_failed() || compressed_size == 0 || version != CHUNK_VERSION {
        return false;
    }

    let compressed = input.get_raw(compressed_size);
    if input.is_failed() || compressed.len() != compressed_size {
        return false;
    }

    let payload = decompress(&compressed, uncompressed_size);
    if payload.len() != uncompressed_size {
        tracing::warn!(
            "chunk size mismatch: declared {} bytes, got {}",
            uncompressed_size,
            payload.len()
        );
        return false;
    }

    dst.put_raw(&payload);
    !dst.is_failed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_roundtrip() {
        let original = b"Hello, World! This is a test of the compression framing.";

        let compressed = compress(original);
        assert!(!compressed.is_empty());
        let decompressed = decompress(&compressed, original.len());
        assert_eq!(original, &decompressed[..]);
    }

    #[test]
    fn test_compress_empty_is_empty() {
        assert!(compress(&[]).is_empty());
        assert!(decompress(&[], 0).is_empty());
    }

    #[test]
    fn test_compress_shrinks_repetitive_data() {
        let original: Vec<u8> = (0..10_000u32).map(|i| (i % 7) as u8).collect();

        let compressed = compress(&original);
        assert!(!compressed.is_empty());
        assert!(compressed.len() < original.len());

        let decompressed = decompress(&compressed, original.len());
        assert_eq!(decompressed, original);
    }

    #[test]
    fn test_decompress_without_size_hint() {
        let original = vec![0x5Au8; 4096];
        let compressed = compress(&original);
        assert_eq!(decompress(&compressed, 0), original);
    }

    #[test]
    fn test_roundtrip_incompressible_data() {
        // A LCG keeps the payload deterministic but incompressible enough.
        let mut seed = 0x1234_5678u32;
        let original: Vec<u8> = (0..2048)
            .map(|_| {
                seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                (seed >> 24) as u8
            })
            .collect();

        let compressed = compress(&original);
        assert!(!compressed.is_empty());
        assert_eq!(decompress(&compressed, original.len()), original);
    }

    #[test]
    fn test_decompress_garbage_is_empty() {
        assert!(decompress(b"this is not zlib data", 64).is_empty());
    }

    #[test]
    fn test_framed_chunk_roundtrip_in_memory() {
        let mut source = StreamBuf::new();
        source.put_raw(b"framed payload bytes, repeated repeated repeated");

        let mut carrier = StreamBuf::new();
        carrier.set_big_endian(true);
        assert!(write_framed_chunk(&source, &mut carrier));

        let mut restored = StreamBuf::new();
        assert!(read_framed_chunk(&mut carrier, &mut restored));
        assert_eq!(restored.data(), source.data());
        assert!(!carrier.is_failed());
    }

    #[test]
    fn test_frame_rejects_zero_compressed_size() {
        let mut carrier = StreamBuf::new();
        carrier.put32(100);
        carrier.put32(0); // compressed size must be nonzero
        carrier.put16(CHUNK_VERSION);
        carrier.put16(0);
        carrier.put_raw(b"leftover");

        let mut dst = StreamBuf::new();
        assert!(!read_framed_chunk(&mut carrier, &mut dst));
        assert!(dst.is_empty());
        // The payload bytes after the header were not consumed.
        assert_eq!(carrier.get_raw(0), b"leftover");
    }

    #[test]
    fn test_frame_rejects_unknown_version() {
        let mut source = StreamBuf::new();
        source.put_raw(b"payload");

        let mut carrier = StreamBuf::new();
        assert!(write_framed_chunk(&source, &mut carrier));

        // Corrupt the version tag in place by rebuilding the frame.
        let bytes = carrier.get_raw(0);
        let mut tampered = StreamBuf::new();
        tampered.put_raw(&bytes[..8]);
        tampered.put16(0x0101);
        tampered.put_raw(&bytes[10..]);

        let mut dst = StreamBuf::new();
        assert!(!read_framed_chunk(&mut tampered, &mut dst));
        assert!(dst.is_empty());
    }

    #[test]
    fn test_frame_rejects_size_mismatch() {
        let mut source = StreamBuf::new();
        source.put_raw(b"size mismatch payload");

        let mut carrier = StreamBuf::new();
        assert!(write_framed_chunk(&source, &mut carrier));

        let bytes = carrier.get_raw(0);
        let mut tampered = StreamBuf::new();
        tampered.put32(9999); // lie about the uncompressed size
        tampered.put_raw(&bytes[4..]);

        let mut dst = StreamBuf::new();
        assert!(!read_framed_chunk(&mut tampered, &mut dst));
        assert!(dst.is_empty());
    }

    #[test]
    fn test_empty_source_cannot_be_framed() {
        let source = StreamBuf::new();
        let mut carrier = StreamBuf::new();
        assert!(!write_framed_chunk(&source, &mut carrier));
        assert!(carrier.is_empty());
    }

    #[test]
    fn test_framed_chunk_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chunk.bin");

        let mut source = StreamBuf::new();
        source.put_raw(&vec![0xA5u8; 500]);

        let mut out = crate::StreamFile::new();
        out.set_big_endian(true);
        assert!(out.open(&path, "wb"));
        assert!(write_framed_chunk(&source, &mut out));
        assert!(!out.is_failed());
        out.close();

        let mut input = crate::StreamFile::new();
        input.set_big_endian(true);
        assert!(input.open(&path, "rb"));
        let mut restored = StreamBuf::new();
        assert!(read_framed_chunk(&mut input, &mut restored));
        assert_eq!(restored.data(), &vec![0xA5u8; 500][..]);
        assert!(!input.is_failed());
    }
}
