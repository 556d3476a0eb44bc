//! Read-only buffer stream
//!
//! Either a zero-copy view over caller-owned bytes or the owner of a
//! moved-in vector; both expose the same read-only surface. View mode is
//! the one deliberate exception to the exclusive-ownership rule of the
//! other streams: the caller must keep the source alive and unmodified
//! for the stream's whole lifetime (the borrow checker enforces exactly
//! that here).

use std::borrow::Cow;

use realmsave_core::StreamState;

use crate::traits::{BaseStream, ReadStream};

/// Read-only byte buffer with a single read cursor.
#[derive(Debug)]
pub struct RoStreamBuf<'a> {
    data: Cow<'a, [u8]>,
    read: usize,
    state: StreamState,
}

impl<'a> RoStreamBuf<'a> {
    /// View mode: borrow caller-owned bytes without copying.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data: Cow::Borrowed(data),
            read: 0,
            state: StreamState::new(),
        }
    }

    /// Owning mode: take ownership of a moved-in vector.
    pub fn from_vec(data: Vec<u8>) -> RoStreamBuf<'static> {
        RoStreamBuf {
            data: Cow::Owned(data),
            read: 0,
            state: StreamState::new(),
        }
    }

    /// Number of unread bytes.
    pub fn len(&self) -> usize {
        self.data.len() - self.read
    }

    pub fn is_empty(&self) -> bool {
        self.read == self.data.len()
    }

    pub fn read_pos(&self) -> usize {
        self.read
    }

    /// Zero-copy slice of the stream's own storage; `size == 0` means the
    /// rest of the buffer. Advances the cursor by the returned length.
    /// The slice must not outlive the stream.
    pub fn get_raw_view(&mut self, size: usize) -> &[u8] {
        let count = if size == 0 { self.len() } else { size.min(self.len()) };
        if size > count {
            self.state.set_failure(true);
        }
        let start = self.read;
        self.read += count;
        &self.data[start..start + count]
    }

    /// Fixed-width string field: scan up to `size` bytes (or all remaining)
    /// for the first NUL and return the text before it.
    ///
    /// The cursor always advances by the full requested/available span,
    /// not just past the terminator - fixed-width record fields (such as
    /// 13-byte name fields) rely on the full-width skip.
    pub fn get_string_view(&mut self, size: usize) -> &str {
        let span = if size == 0 { self.len() } else { size.min(self.len()) };
        if size > span {
            self.state.set_failure(true);
        }
        let start = self.read;
        self.read += span;

        let bytes = &self.data[start..start + span];
        let text = &bytes[..bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len())];
        match std::str::from_utf8(text) {
            Ok(s) => s,
            Err(_) => {
                self.state.set_failure(true);
                ""
            }
        }
    }
}

impl BaseStream for RoStreamBuf<'_> {
    fn state(&self) -> &StreamState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut StreamState {
        &mut self.state
    }
}

impl ReadStream for RoStreamBuf<'_> {
    fn get_u8(&mut self) -> u8 {
        if self.read < self.data.len() {
            let value = self.data[self.read];
            self.read += 1;
            value
        } else {
            self.state.set_failure(true);
            0
        }
    }

    fn get_be16(&mut self) -> u16 {
        let high = self.get_u8() as u16;
        (high << 8) | self.get_u8() as u16
    }

    fn get_le16(&mut self) -> u16 {
        let low = self.get_u8() as u16;
        low | (self.get_u8() as u16) << 8
    }

    fn get_be32(&mut self) -> u32 {
        let high = self.get_be16() as u32;
        (high << 16) | self.get_be16() as u32
    }

    fn get_le32(&mut self) -> u32 {
        let low = self.get_le16() as u32;
        low | (self.get_le16() as u32) << 16
    }

    fn skip(&mut self, count: usize) {
        if count > self.len() {
            self.read = self.data.len();
            self.state.set_failure(true);
        } else {
            self.read += count;
        }
    }

    fn get_raw(&mut self, count: usize) -> Vec<u8> {
        let count = if count == 0 { self.len() } else { count };
        let available = count.min(self.len());

        let mut bytes = vec![0u8; count];
        bytes[..available].copy_from_slice(&self.data[self.read..self.read + available]);
        self.read += available;

        if available < count {
            self.state.set_failure(true);
        }
        bytes
    }
}
