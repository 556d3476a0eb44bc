//! Stream trait contracts
//!
//! Concrete streams implement the byte-level primitives; everything above
//! them (native-order dispatch, strings, the whole codec layer) is provided
//! once here and inherited by every implementation.

use realmsave_core::StreamState;

/// Common surface of every stream: one [`StreamState`] per physical stream.
pub trait BaseStream {
    fn state(&self) -> &StreamState;
    fn state_mut(&mut self) -> &mut StreamState;

    /// True once any operation on this stream has failed. Sticky: the
    /// stream never clears it on its own.
    fn is_failed(&self) -> bool {
        self.state().is_failed()
    }

    fn set_failure(&mut self) {
        self.state_mut().set_failure(true);
    }

    fn is_big_endian(&self) -> bool {
        self.state().is_big_endian()
    }

    /// Affects only the native `get16`/`get32`/`put16`/`put32` calls.
    /// Explicit BE/LE calls ignore this flag, and already-written data is
    /// not reinterpreted.
    fn set_big_endian(&mut self, big_endian: bool) {
        self.state_mut().set_big_endian(big_endian);
    }
}

/// Contract for extracting typed values from a byte source.
///
/// A read past the end of the source returns zero and sets the sticky
/// failure flag; it never panics and never reads out of bounds.
pub trait ReadStream: BaseStream {
    fn get_u8(&mut self) -> u8;

    fn get_be16(&mut self) -> u16;
    fn get_le16(&mut self) -> u16;
    fn get_be32(&mut self) -> u32;
    fn get_le32(&mut self) -> u32;

    /// Advance the read position by `count` bytes.
    fn skip(&mut self, count: usize);

    /// Read `count` raw bytes; `count == 0` means all remaining data.
    /// A short read sets the failure flag and zero-fills the tail.
    fn get_raw(&mut self, count: usize) -> Vec<u8>;

    /// Native-order 16-bit read, dispatched on the endianness flag.
    fn get16(&mut self) -> u16 {
        if self.is_big_endian() {
            self.get_be16()
        } else {
            self.get_le16()
        }
    }

    /// Native-order 32-bit read, dispatched on the endianness flag.
    fn get32(&mut self) -> u32 {
        if self.is_big_endian() {
            self.get_be32()
        } else {
            self.get_le32()
        }
    }

    /// Length-prefixed string: u32 byte count (native order), then exactly
    /// that many bytes. The length is authoritative - no terminator is
    /// expected and zero is a legal length.
    fn get_string(&mut self) -> String {
        let len = self.get32() as usize;
        if len == 0 {
            return String::new();
        }
        let bytes = self.get_raw(len);
        match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(_) => {
                self.set_failure();
                String::new()
            }
        }
    }
}

/// Contract for producing typed values into a byte sink.
///
/// A write that cannot be satisfied sets the sticky failure flag;
/// subsequent writes are still attempted.
pub trait WriteStream: BaseStream {
    fn put_u8(&mut self, value: u8);

    fn put_be16(&mut self, value: u16);
    fn put_le16(&mut self, value: u16);
    fn put_be32(&mut self, value: u32);
    fn put_le32(&mut self, value: u32);

    fn put_raw(&mut self, data: &[u8]);

    /// Native-order 16-bit write, dispatched on the endianness flag.
    fn put16(&mut self, value: u16) {
        if self.is_big_endian() {
            self.put_be16(value)
        } else {
            self.put_le16(value)
        }
    }

    /// Native-order 32-bit write, dispatched on the endianness flag.
    fn put32(&mut self, value: u32) {
        if self.is_big_endian() {
            self.put_be32(value)
        } else {
            self.put_le32(value)
        }
    }

    /// Length-prefixed string: u32 byte count (not character count), then
    /// the raw bytes verbatim. No terminator is added.
    fn put_string(&mut self, value: &str) {
        self.put32(value.len() as u32);
        self.put_raw(value.as_bytes());
    }
}
