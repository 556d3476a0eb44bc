//! Generic value codecs
//!
//! `Encode`/`Decode` pair every supported type with its wire form, defined
//! once in terms of the stream primitives so they work against any concrete
//! stream. Containers recurse into their element codecs:
//!
//! - sequences and mappings: u32 count prefix, then elements in order
//! - pairs: first, then second
//! - fixed arrays: u32 count prefix that must match the static length
//!
//! Enums are encoded by hand over their underlying integer; see the
//! format crate's game-type tag for the pattern.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::traits::{ReadStream, WriteStream};

/// A value that can be written to any [`WriteStream`].
pub trait Encode {
    fn encode<S: WriteStream + ?Sized>(&self, stream: &mut S);
}

/// A value that can be read back from any [`ReadStream`].
///
/// Decoding never fails loudly: on an exhausted or malformed source the
/// stream's sticky failure flag is set and a zero/default value comes back.
pub trait Decode: Sized {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Self;
}

impl Encode for bool {
    fn encode<S: WriteStream + ?Sized>(&self, stream: &mut S) {
        stream.put_u8(*self as u8);
    }
}

impl Decode for bool {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Self {
        stream.get_u8() != 0
    }
}

impl Encode for u8 {
    fn encode<S: WriteStream + ?Sized>(&self, stream: &mut S) {
        stream.put_u8(*self);
    }
}

impl Decode for u8 {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Self {
        stream.get_u8()
    }
}

impl Encode for i8 {
    fn encode<S: WriteStream + ?Sized>(&self, stream: &mut S) {
        stream.put_u8(*self as u8);
    }
}

impl Decode for i8 {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Self {
        stream.get_u8() as i8
    }
}

impl Encode for u16 {
    fn encode<S: WriteStream + ?Sized>(&self, stream: &mut S) {
        stream.put16(*self);
    }
}

impl Decode for u16 {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Self {
        stream.get16()
    }
}

impl Encode for i16 {
    fn encode<S: WriteStream + ?Sized>(&self, stream: &mut S) {
        stream.put16(*self as u16);
    }
}

impl Decode for i16 {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Self {
        stream.get16() as i16
    }
}

impl Encode for u32 {
    fn encode<S: WriteStream + ?Sized>(&self, stream: &mut S) {
        stream.put32(*self);
    }
}

impl Decode for u32 {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Self {
        stream.get32()
    }
}

impl Encode for i32 {
    fn encode<S: WriteStream + ?Sized>(&self, stream: &mut S) {
        stream.put32(*self as u32);
    }
}

impl Decode for i32 {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Self {
        stream.get32() as i32
    }
}

/// Legacy split float codec: integer part and 1e-8-scaled fractional part,
/// each as i32. Lossy, kept for save-format parity.
impl Encode for f32 {
    fn encode<S: WriteStream + ?Sized>(&self, stream: &mut S) {
        let int_part = *self as i32;
        let frac_part = ((*self - int_part as f32) * 100_000_000.0) as i32;
        int_part.encode(stream);
        frac_part.encode(stream);
    }
}

impl Decode for f32 {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Self {
        let int_part = i32::decode(stream);
        let frac_part = i32::decode(stream);
        int_part as f32 + frac_part as f32 / 100_000_000.0
    }
}

impl Encode for str {
    fn encode<S: WriteStream + ?Sized>(&self, stream: &mut S) {
        stream.put_string(self);
    }
}

impl Encode for String {
    fn encode<S: WriteStream + ?Sized>(&self, stream: &mut S) {
        stream.put_string(self);
    }
}

impl Decode for String {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Self {
        stream.get_string()
    }
}

impl<A: Encode, B: Encode> Encode for (A, B) {
    fn encode<S: WriteStream + ?Sized>(&self, stream: &mut S) {
        self.0.encode(stream);
        self.1.encode(stream);
    }
}

impl<A: Decode, B: Decode> Decode for (A, B) {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Self {
        (A::decode(stream), B::decode(stream))
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode<S: WriteStream + ?Sized>(&self, stream: &mut S) {
        stream.put32(self.len() as u32);
        for item in self {
            item.encode(stream);
        }
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Self {
        let count = stream.get32() as usize;
        let mut items = Vec::with_capacity(count.min(4096));
        for _ in 0..count {
            items.push(T::decode(stream));
        }
        items
    }
}

impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    fn encode<S: WriteStream + ?Sized>(&self, stream: &mut S) {
        stream.put32(self.len() as u32);
        for (key, value) in self {
            key.encode(stream);
            value.encode(stream);
        }
    }
}

impl<K: Decode + Ord, V: Decode> Decode for BTreeMap<K, V> {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Self {
        let count = stream.get32() as usize;
        let mut map = BTreeMap::new();
        for _ in 0..count {
            let key = K::decode(stream);
            let value = V::decode(stream);
            // First occurrence of a key wins.
            map.entry(key).or_insert(value);
        }
        map
    }
}

impl<K: Encode, V: Encode> Encode for HashMap<K, V> {
    fn encode<S: WriteStream + ?Sized>(&self, stream: &mut S) {
        stream.put32(self.len() as u32);
        for (key, value) in self {
            key.encode(stream);
            value.encode(stream);
        }
    }
}

impl<K: Decode + Eq + Hash, V: Decode> Decode for HashMap<K, V> {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Self {
        let count = stream.get32() as usize;
        let mut map = HashMap::with_capacity(count.min(4096));
        for _ in 0..count {
            let key = K::decode(stream);
            let value = V::decode(stream);
            map.entry(key).or_insert(value);
        }
        map
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn encode<S: WriteStream + ?Sized>(&self, stream: &mut S) {
        stream.put32(N as u32);
        for item in self {
            item.encode(stream);
        }
    }
}

impl<T: Decode + Default, const N: usize> Decode for [T; N] {
    fn decode<S: ReadStream + ?Sized>(stream: &mut S) -> Self {
        let count = stream.get32() as usize;
        if count != N {
            // Never partially populate a fixed array.
            stream.set_failure();
            return std::array::from_fn(|_| T::default());
        }
        std::array::from_fn(|_| T::decode(stream))
    }
}
