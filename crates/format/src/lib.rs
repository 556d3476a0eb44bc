//! # RealmSave Format Library
//!
//! On-disk formats built on the stream layer:
//!
//! - **Save files**: 2-byte magic signature, length-prefixed version
//!   string, 16-bit version number, fixed header record, then a single
//!   compressed-and-framed chunk carrying the serialized world state and
//!   a repeated magic as the end-of-data sentinel.
//! - **Map files**: 6-byte magic word, an uncompressed base-metadata
//!   block, then one compressed-and-framed chunk with the detailed
//!   tile/object data.
//!
//! Both formats convert any validation failure - bad magic, unsupported
//! version, broken frame, truncated data - into a typed [`FormatError`]
//! instead of partial state. Streams are always big-endian on disk.

pub mod error;
pub mod mapfile;
pub mod savefile;

pub use error::{FormatError, Result};
pub use mapfile::{load_map, save_map, LoadedMap, MAP_MAGIC};
pub use savefile::{
    load_game, read_save_header, save_game, GameType, LoadedGame, MapInfo, SaveHeader,
    CURRENT_VERSION, MIN_SUPPORTED_VERSION, SAVE_MAGIC, STATUS_COMPRESSED,
};
