//! Sticky per-stream flag state
//!
//! Every stream carries exactly one `StreamState`: a sticky failure flag
//! and an endianness toggle. The failure flag is never cleared by the
//! stream itself - a caller that wants to retry discards the stream and
//! builds a new one.

/// Host byte order, resolved once from the build target.
///
/// Used only to pick the default endianness of newly constructed streams;
/// it has no runtime mutability.
pub const HOST_BIG_ENDIAN: bool = cfg!(target_endian = "big");

/// Flag state shared by every stream implementation.
///
/// The endianness flag affects only the "native" get/put calls; explicit
/// big/little-endian calls ignore it. Toggling it does not reinterpret
/// data already written or read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamState {
    failed: bool,
    big_endian: bool,
}

impl StreamState {
    /// New state: no failure, endianness matching the host.
    pub fn new() -> Self {
        Self {
            failed: false,
            big_endian: HOST_BIG_ENDIAN,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    pub fn set_failure(&mut self, failed: bool) {
        self.failed = failed;
    }

    pub fn is_big_endian(&self) -> bool {
        self.big_endian
    }

    pub fn set_big_endian(&mut self, big_endian: bool) {
        self.big_endian = big_endian;
    }
}

impl Default for StreamState {
    fn default() -> Self {
        Self::new()
    }
}
