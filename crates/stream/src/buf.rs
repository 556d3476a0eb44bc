//! Growable in-memory buffer stream

use realmsave_core::StreamState;

use crate::traits::{BaseStream, ReadStream, WriteStream};

/// Floor applied to every (re)allocation.
const MIN_CAPACITY: usize = 1024;

/// An owned, resizable byte buffer implementing both stream directions.
///
/// The buffer keeps independent read and write cursors (invariant:
/// `read <= write <= capacity`), so a single buffer can be filled and then
/// drained - or interleaved - without copying. Capacity grows geometrically
/// and never shrinks; storage is swapped wholesale on growth, so raw slices
/// obtained before a write must not be cached across it.
#[derive(Debug, Clone)]
pub struct StreamBuf {
    data: Vec<u8>,
    read: usize,
    write: usize,
    state: StreamState,
}

impl StreamBuf {
    /// Empty buffer; the first write allocates at least [`MIN_CAPACITY`].
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            read: 0,
            write: 0,
            state: StreamState::new(),
        }
    }

    /// Buffer with a requested initial capacity (clamped to the floor).
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buf = Self::new();
        if capacity > 0 {
            buf.data = vec![0; capacity.max(MIN_CAPACITY)];
        }
        buf
    }

    /// Unread content: the bytes between the read and write cursors.
    pub fn data(&self) -> &[u8] {
        &self.data[self.read..self.write]
    }

    /// Number of unread bytes.
    pub fn len(&self) -> usize {
        self.write - self.read
    }

    pub fn is_empty(&self) -> bool {
        self.read == self.write
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn read_pos(&self) -> usize {
        self.read
    }

    pub fn write_pos(&self) -> usize {
        self.write
    }

    /// Move the read cursor to an absolute position, clamped to the write
    /// cursor.
    pub fn seek(&mut self, pos: usize) {
        self.read = pos.min(self.write);
    }

    /// Drop all content and rewind both cursors. Capacity is kept.
    pub fn clear(&mut self) {
        self.read = 0;
        self.write = 0;
    }

    /// Free space after the write cursor.
    fn room(&self) -> usize {
        self.data.len() - self.write
    }

    /// Make room for `count` more bytes at the write cursor.
    ///
    /// Growth policy: a small shortfall (less than half the current
    /// capacity) grows by 50%; a large one grows by exactly the shortfall.
    /// Every allocation honors the [`MIN_CAPACITY`] floor. Content in
    /// `[0, write)` is preserved byte-for-byte.
    fn reserve(&mut self, count: usize) -> bool {
        if count <= self.room() {
            return true;
        }

        let capacity = self.data.len();
        let shortfall = count - self.room();
        let new_capacity = if shortfall < capacity / 2 {
            capacity + capacity / 2
        } else {
            capacity + shortfall
        }
        .max(MIN_CAPACITY);

        let mut new_data = vec![0u8; new_capacity];
        new_data[..self.write].copy_from_slice(&self.data[..self.write]);
        self.data = new_data;

        if count > self.room() {
            // Unreachable given the policy above; a failed allocation would
            // have panicked before this point.
            self.state.set_failure(true);
            return false;
        }
        true
    }
}

impl Default for StreamBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseStream for StreamBuf {
    fn state(&self) -> &StreamState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut StreamState {
        &mut self.state
    }
}

impl ReadStream for StreamBuf {
    fn get_u8(&mut self) -> u8 {
        if self.read < self.write {
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
            self.read = self.write;
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

impl WriteStream for StreamBuf {
    fn put_u8(&mut self, value: u8) {
        if self.reserve(1) {
            self.data[self.write] = value;
            self.write += 1;
        }
    }

    fn put_be16(&mut self, value: u16) {
        self.put_u8((value >> 8) as u8);
        self.put_u8(value as u8);
    }

    fn put_le16(&mut self, value: u16) {
        self.put_u8(value as u8);
        self.put_u8((value >> 8) as u8);
    }

    fn put_be32(&mut self, value: u32) {
        self.put_be16((value >> 16) as u16);
        self.put_be16(value as u16);
    }

    fn put_le32(&mut self, value: u32) {
        self.put_le16(value as u16);
        self.put_le16((value >> 16) as u16);
    }

    fn put_raw(&mut self, data: &[u8]) {
        if self.reserve(data.len()) {
            self.data[self.write..self.write + data.len()].copy_from_slice(data);
            self.write += data.len();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty_and_unfailed() {
        let buf = StreamBuf::new();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), 0);
        assert!(!buf.is_failed());
    }

    #[test]
    fn test_first_write_allocates_floor() {
        let mut buf = StreamBuf::new();
        buf.put_u8(0x7F);
        assert_eq!(buf.capacity(), MIN_CAPACITY);
        assert_eq!(buf.get_u8(), 0x7F);
        assert!(!buf.is_failed());
    }

    #[test]
    fn test_with_capacity_honors_floor() {
        let buf = StreamBuf::with_capacity(10);
        assert_eq!(buf.capacity(), MIN_CAPACITY);

        let big = StreamBuf::with_capacity(4096);
        assert_eq!(big.capacity(), 4096);
    }

    #[test]
    fn test_endianness_of_explicit_calls() {
        let mut buf = StreamBuf::new();
        buf.put_be16(0x1234);
        buf.put_le16(0x1234);
        buf.put_be32(0xAABBCCDD);
        buf.put_le32(0xAABBCCDD);
        assert_eq!(
            buf.data(),
            &[0x12, 0x34, 0x34, 0x12, 0xAA, 0xBB, 0xCC, 0xDD, 0xDD, 0xCC, 0xBB, 0xAA]
        );
    }

    #[test]
    fn test_native_calls_follow_flag_only() {
        let mut buf = StreamBuf::new();
        buf.set_big_endian(true);
        buf.put16(0x0102);
        // Toggling the flag must not change explicit calls.
        buf.set_big_endian(false);
        buf.put_be16(0x0304);
        assert_eq!(buf.data(), &[0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_growth_preserves_content() {
        let mut buf = StreamBuf::new();
        let pattern: Vec<u8> = (0..=255u8).cycle().take(100).collect();
        buf.put_raw(&pattern);

        // Force several reallocations past the floor.
        for chunk in 0..64 {
            buf.put_raw(&vec![chunk as u8; 257]);
            assert!(buf.capacity() >= buf.write_pos());
        }

        assert_eq!(&buf.data()[..100], pattern.as_slice());
        assert!(!buf.is_failed());
    }

    #[test]
    fn test_large_write_grows_exact() {
        let mut buf = StreamBuf::new();
        buf.put_u8(1);
        let capacity = buf.capacity();
        // A shortfall well beyond half the capacity grows by exactly that
        // shortfall.
        let huge = vec![0xEEu8; capacity * 3];
        buf.put_raw(&huge);
        assert_eq!(buf.capacity(), capacity + (huge.len() - (capacity - 1)));
        assert!(!buf.is_failed());
    }

    #[test]
    fn test_exhausted_read_sets_failure() {
        let mut buf = StreamBuf::new();
        buf.put_u8(9);
        assert_eq!(buf.get_u8(), 9);
        assert_eq!(buf.get_u8(), 0);
        assert!(buf.is_failed());
    }

    #[test]
    fn test_independent_cursors() {
        let mut buf = StreamBuf::new();
        buf.put_le32(111);
        assert_eq!(buf.get_le32(), 111);
        buf.put_le32(222);
        assert_eq!(buf.get_le32(), 222);
        assert!(!buf.is_failed());
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.write_pos(), 8);
    }

    #[test]
    fn test_seek_clamps_to_write_cursor() {
        let mut buf = StreamBuf::new();
        buf.put_raw(&[1, 2, 3, 4]);
        buf.seek(100);
        assert_eq!(buf.len(), 0);
        buf.seek(1);
        assert_eq!(buf.get_u8(), 2);
    }

    #[test]
    fn test_get_raw_zero_reads_rest() {
        let mut buf = StreamBuf::new();
        buf.put_raw(b"abcdef");
        buf.skip(2);
        assert_eq!(buf.get_raw(0), b"cdef");
        assert!(!buf.is_failed());
    }

    #[test]
    fn test_scenario_write_then_read_in_order() {
        let mut buf = StreamBuf::new();
        buf.set_big_endian(true);
        buf.put_be32(0x12345678);
        buf.put_string("warlords");
        let values: Vec<i16> = vec![-1, 0, 32767];
        crate::codec::Encode::encode(&values, &mut buf);
        assert!(!buf.is_failed());

        buf.seek(0);
        assert_eq!(buf.get_be32(), 0x12345678);
        assert_eq!(buf.get_string(), "warlords");
        let back: Vec<i16> = crate::codec::Decode::decode(&mut buf);
        assert_eq!(back, values);
        assert!(!buf.is_failed());
    }
}
