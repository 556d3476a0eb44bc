//! Save file format
//!
//! Layout (all streams big-endian on disk):
//!
//! ```text
//! {u8 magic hi}{u8 magic lo}            - signature, MSB first
//! {string version}                      - decimal rendering of the version
//! {u16 version}
//! {SaveHeader}                          - status flags, map metadata, game type
//! {framed chunk}                        - see realmsave_stream::compression
//!     {u16 version}{payload}{u16 magic} - sentinel closes the data
//! ```
//!
//! The version travels twice (plain header and compressed body) so a save
//! can be listed without decompressing it, and a truncated chunk can still
//! be detected by the missing sentinel.

use std::path::Path;

use realmsave_stream::{
    read_framed_chunk, write_framed_chunk, BaseStream, Decode, Encode, ReadStream, StreamBuf,
    StreamFile, WriteStream,
};

use crate::error::{FormatError, Result};

/// 2-byte save signature, also repeated as the end-of-data sentinel.
pub const SAVE_MAGIC: u16 = 0xFF03;

/// Version written by this build.
pub const CURRENT_VERSION: u16 = 2;

/// Oldest version this build still loads.
pub const MIN_SUPPORTED_VERSION: u16 = 1;

/// Status bit: the body chunk is compressed. Always set by this writer.
pub const STATUS_COMPRESSED: u16 = 0x8000;

/// Game session kind stored in the save header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameType {
    Standard = 0x01,
    Campaign = 0x02,
    Hotseat = 0x04,
    Network = 0x08,
}

impl GameType {
    fn from_i32(value: i32) -> Option<Self> {
        match value {
            0x01 => Some(Self::Standard),
            0x02 => Some(Self::Campaign),
            0x04 => Some(Self::Hotseat),
            0x08 => Some(Self::Network),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Campaign => "campaign",
            Self::Hotseat => "hotseat",
            Self::Network => "network",
        }
    }
}

impl Encode for GameType {
    fn encode<S: WriteStream + ?Sized>(&self, stream: &mut S) {
        (*self as i32).encode(stream);
    }
}

impl Decode for GameType {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Self {
        match Self::from_i32(i32::decode(stream)) {
            Some(game_type) => game_type,
            None => {
                stream.set_failure();
                Self::Standard
            }
        }
    }
}

/// Map metadata carried in the save header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MapInfo {
    /// Map file the session was started from
    pub file: String,
    /// Display name
    pub name: String,
    /// Scenario description
    pub description: String,
    /// Map width in tiles
    pub width: u16,
    /// Map height in tiles
    pub height: u16,
    /// Save timestamp (Unix seconds)
    pub timestamp: u32,
}

impl Encode for MapInfo {
    fn encode<S: WriteStream + ?Sized>(&self, stream: &mut S) {
        self.file.encode(stream);
        self.name.encode(stream);
        self.description.encode(stream);
        self.width.encode(stream);
        self.height.encode(stream);
        self.timestamp.encode(stream);
    }
}

impl Decode for MapInfo {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Self {
        Self {
            file: String::decode(stream),
            name: String::decode(stream),
            description: String::decode(stream),
            width: u16::decode(stream),
            height: u16::decode(stream),
            timestamp: u32::decode(stream),
        }
    }
}

/// Fixed-layout header record written before the compressed body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveHeader {
    pub status: u16,
    pub info: MapInfo,
    pub game_type: GameType,
}

impl SaveHeader {
    pub fn new(info: MapInfo, game_type: GameType) -> Self {
        Self {
            status: STATUS_COMPRESSED,
            info,
            game_type,
        }
    }
}

impl Encode for SaveHeader {
    fn encode<S: WriteStream + ?Sized>(&self, stream: &mut S) {
        self.status.encode(stream);
        self.info.encode(stream);
        self.game_type.encode(stream);
    }
}

impl Decode for SaveHeader {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Self {
        Self {
            status: u16::decode(stream),
            info: MapInfo::decode(stream),
            game_type: GameType::decode(stream),
        }
    }
}

/// Everything recovered from a save file.
#[derive(Debug)]
pub struct LoadedGame<T> {
    pub version: u16,
    pub header: SaveHeader,
    pub payload: T,
}

/// Persist `payload` with its header to `path`.
pub fn save_game<T: Encode>(path: &Path, header: &SaveHeader, payload: &T) -> Result<()> {
    tracing::debug!("saving game to {}", path.display());

    let mut fs = StreamFile::new();
    fs.set_big_endian(true);
    if !fs.open(path, "wb") {
        return Err(FormatError::NotFound(path.display().to_string()));
    }

    fs.put_u8((SAVE_MAGIC >> 8) as u8);
    fs.put_u8(SAVE_MAGIC as u8);
    fs.put_string(&CURRENT_VERSION.to_string());
    fs.put16(CURRENT_VERSION);
    header.encode(&mut fs);

    let mut body = StreamBuf::new();
    body.set_big_endian(true);
    body.put16(CURRENT_VERSION);
    payload.encode(&mut body);
    body.put16(SAVE_MAGIC); // end-of-data sentinel
    if body.is_failed() {
        return Err(FormatError::WriteFailed("state serialization failed".into()));
    }

    if !write_framed_chunk(&body, &mut fs) || fs.is_failed() {
        return Err(FormatError::WriteFailed(path.display().to_string()));
    }
    fs.close();
    Ok(())
}

fn check_version(found: u16) -> Result<u16> {
    if !(MIN_SUPPORTED_VERSION..=CURRENT_VERSION).contains(&found) {
        return Err(FormatError::UnsupportedVersion {
            found,
            min: MIN_SUPPORTED_VERSION,
            max: CURRENT_VERSION,
        });
    }
    Ok(found)
}

/// Read the uncompressed part of a save file: magic, version, header.
/// Leaves `fs` positioned at the start of the framed chunk.
fn read_header(fs: &mut StreamFile, path: &Path) -> Result<(u16, SaveHeader)> {
    let high = fs.get_u8();
    let low = fs.get_u8();
    let magic = (high as u16) << 8 | low as u16;
    if fs.is_failed() || magic != SAVE_MAGIC {
        return Err(FormatError::BadMagic(path.display().to_string()));
    }

    let _version_string = fs.get_string();
    let version = check_version(fs.get16())?;

    let header = SaveHeader::decode(fs);
    if fs.is_failed() {
        return Err(FormatError::Corrupted("truncated save header".into()));
    }
    Ok((version, header))
}

/// Header-only peek, for listing saves without touching the body.
pub fn read_save_header(path: &Path) -> Result<(u16, SaveHeader)> {
    let mut fs = StreamFile::new();
    fs.set_big_endian(true);
    if !fs.open(path, "rb") {
        return Err(FormatError::NotFound(path.display().to_string()));
    }
    read_header(&mut fs, path)
}

/// Restore a save written by [`save_game`].
///
/// Any magic mismatch, out-of-range version, frame-validation failure, or
/// missing end sentinel produces a typed error and no partial state.
pub fn load_game<T: Decode>(path: &Path) -> Result<LoadedGame<T>> {
    tracing::debug!("loading game from {}", path.display());

    let mut fs = StreamFile::new();
    fs.set_big_endian(true);
    if !fs.open(path, "rb") {
        return Err(FormatError::NotFound(path.display().to_string()));
    }

    let (version, header) = read_header(&mut fs, path)?;

    let mut body = StreamBuf::new();
    body.set_big_endian(true);
    if !read_framed_chunk(&mut fs, &mut body) {
        return Err(FormatError::Corrupted("broken save chunk".into()));
    }
    fs.close();

    let body_version = check_version(body.get16())?;
    let payload = T::decode(&mut body);
    let sentinel = body.get16();
    if body.is_failed() || sentinel != SAVE_MAGIC {
        return Err(FormatError::Corrupted("missing end-of-data marker".into()));
    }

    tracing::debug!("loaded save version {} ({})", body_version, header.game_type.as_str());
    Ok(LoadedGame {
        version,
        header,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct WorldState {
        day: u32,
        heroes: Vec<String>,
        gold_by_player: BTreeMap<u8, i32>,
        difficulty: i8,
    }

    impl Encode for WorldState {
        fn encode<S: WriteStream + ?Sized>(&self, stream: &mut S) {
            self.day.encode(stream);
            self.heroes.encode(stream);
            self.gold_by_player.encode(stream);
            self.difficulty.encode(stream);
        }
    }

    impl Decode for WorldState {
        fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Self {
            Self {
                day: u32::decode(stream),
                heroes: Vec::decode(stream),
                gold_by_player: BTreeMap::decode(stream),
                difficulty: i8::decode(stream),
            }
        }
    }

    fn sample_world() -> WorldState {
        let mut gold = BTreeMap::new();
        gold.insert(0u8, 7500);
        gold.insert(1u8, -200);
        WorldState {
            day: 42,
            heroes: vec!["Sandro".into(), "Crag Hack".into()],
            gold_by_player: gold,
            difficulty: 3,
        }
    }

    fn sample_header() -> SaveHeader {
        SaveHeader::new(
            MapInfo {
                file: "lost_continent.map".into(),
                name: "Lost Continent".into(),
                description: "A long war over a drowned realm.".into(),
                width: 72,
                height: 72,
                timestamp: 1_700_000_000,
            },
            GameType::Campaign,
        )
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.sav");

        let world = sample_world();
        let header = sample_header();
        save_game(&path, &header, &world).unwrap();

        let loaded: LoadedGame<WorldState> = load_game(&path).unwrap();
        assert_eq!(loaded.version, CURRENT_VERSION);
        assert_eq!(loaded.header, header);
        assert_eq!(loaded.payload, world);
    }

    #[test]
    fn test_header_peek_matches_full_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("peek.sav");

        save_game(&path, &sample_header(), &sample_world()).unwrap();

        let (version, header) = read_save_header(&path).unwrap();
        let loaded: LoadedGame<WorldState> = load_game(&path).unwrap();
        assert_eq!(version, loaded.version);
        assert_eq!(header, loaded.header);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.sav");

        let result: Result<LoadedGame<WorldState>> = load_game(&path);
        assert!(matches!(result, Err(FormatError::NotFound(_))));
    }

    #[test]
    fn test_wrong_magic_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("magic.sav");
        std::fs::write(&path, b"\x00\x00not a save file at all").unwrap();

        let result: Result<LoadedGame<WorldState>> = load_game(&path);
        assert!(matches!(result, Err(FormatError::BadMagic(_))));
    }

    #[test]
    fn test_truncated_body_is_corrupted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("truncated.sav");

        save_game(&path, &sample_header(), &sample_world()).unwrap();

        // Chop the tail off the framed chunk.
        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 10]).unwrap();

        let result: Result<LoadedGame<WorldState>> = load_game(&path);
        assert!(matches!(result, Err(FormatError::Corrupted(_))));
    }

    #[test]
    fn test_future_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.sav");

        save_game(&path, &sample_header(), &sample_world()).unwrap();

        // Bump the plain-header version field: it sits after the 2-byte
        // magic and the length-prefixed version string.
        let mut bytes = std::fs::read(&path).unwrap();
        let version_pos = 2 + 4 + CURRENT_VERSION.to_string().len();
        bytes[version_pos] = 0xFF;
        bytes[version_pos + 1] = 0xFF;
        std::fs::write(&path, &bytes).unwrap();

        let result: Result<LoadedGame<WorldState>> = load_game(&path);
        assert!(matches!(
            result,
            Err(FormatError::UnsupportedVersion { found: 0xFFFF, .. })
        ));
    }
}
