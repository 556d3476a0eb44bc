//! Map file format
//!
//! Layout (big-endian on disk):
//!
//! ```text
//! {6-byte magic word}
//! {MapInfo}{u32 tile count}     - uncompressed base metadata
//! {framed chunk}                - detailed tile/object data
//! ```
//!
//! The base metadata stays uncompressed so map pickers can list scenarios
//! without inflating the tile data.

use std::path::Path;

use realmsave_stream::{
    read_framed_chunk, write_framed_chunk, BaseStream, Decode, Encode, ReadStream, StreamBuf,
    StreamFile, WriteStream,
};

use crate::error::{FormatError, Result};
use crate::savefile::MapInfo;

/// 6-byte map signature.
pub const MAP_MAGIC: [u8; 6] = *b"RSMAP1";

/// Everything recovered from a map file.
#[derive(Debug)]
pub struct LoadedMap<T> {
    pub info: MapInfo,
    pub tile_count: u32,
    pub payload: T,
}

/// Write a map file: magic, metadata, then the framed tile payload.
pub fn save_map<T: Encode>(path: &Path, info: &MapInfo, tile_count: u32, payload: &T) -> Result<()> {
    tracing::debug!("saving map to {}", path.display());

    let mut fs = StreamFile::new();
    fs.set_big_endian(true);
    if !fs.open(path, "wb") {
        return Err(FormatError::NotFound(path.display().to_string()));
    }

    fs.put_raw(&MAP_MAGIC);
    info.encode(&mut fs);
    fs.put32(tile_count);

    let mut body = StreamBuf::new();
    body.set_big_endian(true);
    payload.encode(&mut body);
    if body.is_failed() {
        return Err(FormatError::WriteFailed("map serialization failed".into()));
    }

    if !write_framed_chunk(&body, &mut fs) || fs.is_failed() {
        return Err(FormatError::WriteFailed(path.display().to_string()));
    }
    fs.close();
    Ok(())
}

/// Read a map written by [`save_map`].
pub fn load_map<T: Decode>(path: &Path) -> Result<LoadedMap<T>> {
    tracing::debug!("loading map from {}", path.display());

    let mut fs = StreamFile::new();
    fs.set_big_endian(true);
    if !fs.open(path, "rb") {
        return Err(FormatError::NotFound(path.display().to_string()));
    }

    let magic = fs.get_raw(MAP_MAGIC.len());
    if fs.is_failed() || magic != MAP_MAGIC {
        return Err(FormatError::BadMagic(path.display().to_string()));
    }

    let info = MapInfo::decode(&mut fs);
    let tile_count = fs.get32();
    if fs.is_failed() {
        return Err(FormatError::Corrupted("truncated map metadata".into()));
    }

    let mut body = StreamBuf::new();
    body.set_big_endian(true);
    if !read_framed_chunk(&mut fs, &mut body) {
        return Err(FormatError::Corrupted("broken map chunk".into()));
    }
    fs.close();

    let payload = T::decode(&mut body);
    if body.is_failed() {
        return Err(FormatError::Corrupted("truncated map data".into()));
    }

    Ok(LoadedMap {
        info,
        tile_count,
        payload,
    })
}
