//! # RealmSave Stream Library
//!
//! Polymorphic binary streams with symmetric read/write access, explicit
//! endianness control, generic container codecs, and transparent
//! compress-on-write / decompress-on-read framing. This is the layer every
//! persisted artifact (save files, map files, high-score tables) is built on.
//!
//! ## Architecture
//!
//! ### 1. Stream traits ([`traits`])
//! `ReadStream` and `WriteStream` define the complete vocabulary for
//! consuming/producing bytes, integers, and strings against an unspecified
//! backing store. Both extend `BaseStream`, which carries one
//! [`StreamState`](realmsave_core::StreamState) per physical stream:
//! a sticky failure flag and an endianness toggle.
//!
//! ### 2. Codecs ([`codec`])
//! `Encode`/`Decode` for the primitive type set plus strings, pairs,
//! sequences, mappings, and fixed arrays, defined once in terms of the
//! stream primitives and usable with any concrete stream.
//!
//! ### 3. Concrete streams
//! - [`StreamBuf`]: growable in-memory buffer with independent read and
//!   write cursors.
//! - [`RoStreamBuf`]: read-only buffer, either viewing caller-owned bytes
//!   or owning a moved-in vector.
//! - [`StreamFile`]: blocking file-backed stream with per-call byte-order
//!   conversion.
//!
//! ### 4. Compression ([`compression`])
//! zlib compression plus a small versioned chunk frame (uncompressed size,
//! compressed size, format version, reserved) so callers only ever see
//! "write this buffer, framed and compressed" and the reverse.
//!
//! ## Error model
//!
//! Stream primitives never panic and never return `Result`. An exhausted
//! read yields a zero/default value and sets the sticky failure flag; a
//! failed write sets the flag but later operations are still attempted.
//! Callers check `is_failed()` once a sequence of operations concludes.

pub mod codec;
pub mod compression;
pub mod traits;

mod buf;
mod file;
mod robuf;

pub use buf::StreamBuf;
pub use codec::{Decode, Encode};
pub use compression::{compress, decompress, read_framed_chunk, write_framed_chunk, CHUNK_VERSION};
pub use file::StreamFile;
pub use robuf::RoStreamBuf;
pub use traits::{BaseStream, ReadStream, WriteStream};

pub use realmsave_core::{StreamState, HOST_BIG_ENDIAN};
