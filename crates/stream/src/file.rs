//! File-backed stream
//!
//! Implements both stream directions directly against a file handle. There
//! is no in-memory cursor of its own - position is the OS file position -
//! and every multi-byte integer is converted between host and requested
//! byte order on each call. Any OS-level failure sets the sticky failure
//! flag and returns a default; the stream stays open for further attempts
//! until closed.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use realmsave_core::StreamState;

use crate::buf::StreamBuf;
use crate::traits::{BaseStream, ReadStream, WriteStream};

/// Blocking file stream. Move-only: one instance exclusively owns the
/// handle, and the handle is closed on drop.
#[derive(Debug, Default)]
pub struct StreamFile {
    file: Option<File>,
    state: StreamState,
}

impl StreamFile {
    pub fn new() -> Self {
        Self {
            file: None,
            state: StreamState::new(),
        }
    }

    /// Open a file in conventional binary mode: `"rb"` to read, `"wb"` to
    /// write (truncating). Any other mode string is refused. No text-mode
    /// translation is ever applied. Failure to open sets the sticky flag.
    pub fn open<P: AsRef<Path>>(&mut self, path: P, mode: &str) -> bool {
        let path = path.as_ref();
        let result = match mode {
            "rb" => File::open(path),
            "wb" => File::create(path),
            _ => {
                tracing::debug!("invalid file mode {:?} for {}", mode, path.display());
                self.state.set_failure(true);
                return false;
            }
        };

        match result {
            Ok(file) => {
                self.file = Some(file);
                true
            }
            Err(err) => {
                tracing::debug!("failed to open {}: {}", path.display(), err);
                self.state.set_failure(true);
                false
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    pub fn close(&mut self) {
        self.file = None;
    }

    /// Total file size, computed by seeking to the end and restoring the
    /// position. Never cached.
    pub fn size(&mut self) -> u64 {
        let pos = self.tell();
        let end = match self.file.as_mut().map(|f| f.seek(SeekFrom::End(0))) {
            Some(Ok(end)) => end,
            Some(Err(_)) => {
                self.state.set_failure(true);
                return 0;
            }
            None => return 0,
        };
        self.seek(pos);
        end
    }

    /// Current file position.
    pub fn tell(&mut self) -> u64 {
        match self.file.as_mut().map(|f| f.stream_position()) {
            Some(Ok(pos)) => pos,
            Some(Err(_)) => {
                self.state.set_failure(true);
                0
            }
            None => 0,
        }
    }

    /// Seek to an absolute position.
    pub fn seek(&mut self, pos: u64) {
        if let Some(file) = self.file.as_mut() {
            if file.seek(SeekFrom::Start(pos)).is_err() {
                self.state.set_failure(true);
            }
        }
    }

    /// Bytes left between the current position and end of file.
    fn remaining(&mut self) -> u64 {
        let pos = self.tell();
        self.size().saturating_sub(pos)
    }

    /// Drain `count` bytes (0 = rest of file) into a fresh growable buffer.
    pub fn read_to_buf(&mut self, count: usize) -> StreamBuf {
        let bytes = self.get_raw(count);
        let mut buf = StreamBuf::with_capacity(bytes.len());
        buf.set_big_endian(self.is_big_endian());
        buf.put_raw(&bytes);
        buf
    }

    fn get_array<const N: usize>(&mut self) -> [u8; N] {
        let mut bytes = [0u8; N];
        match self.file.as_mut().map(|f| f.read_exact(&mut bytes)) {
            Some(Ok(())) => bytes,
            Some(Err(_)) => {
                self.state.set_failure(true);
                [0u8; N]
            }
            None => {
                self.state.set_failure(true);
                [0u8; N]
            }
        }
    }

    fn put_bytes(&mut self, bytes: &[u8]) {
        match self.file.as_mut().map(|f| f.write_all(bytes)) {
            Some(Ok(())) => {}
            _ => self.state.set_failure(true),
        }
    }
}

impl BaseStream for StreamFile {
    fn state(&self) -> &StreamState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut StreamState {
        &mut self.state
    }
}

impl ReadStream for StreamFile {
    fn get_u8(&mut self) -> u8 {
        self.get_array::<1>()[0]
    }

    fn get_be16(&mut self) -> u16 {
        u16::from_be_bytes(self.get_array())
    }

    fn get_le16(&mut self) -> u16 {
        u16::from_le_bytes(self.get_array())
    }

    fn get_be32(&mut self) -> u32 {
        u32::from_be_bytes(self.get_array())
    }

    fn get_le32(&mut self) -> u32 {
        u32::from_le_bytes(self.get_array())
    }

    fn skip(&mut self, count: usize) {
        if let Some(file) = self.file.as_mut() {
            if file.seek(SeekFrom::Current(count as i64)).is_err() {
                self.state.set_failure(true);
            }
        }
    }

    fn get_raw(&mut self, count: usize) -> Vec<u8> {
        let count = if count == 0 {
            self.remaining() as usize
        } else {
            count
        };
        if count == 0 {
            return Vec::new();
        }

        let mut bytes = vec![0u8; count];
        match self.file.as_mut().map(|f| f.read_exact(&mut bytes)) {
            Some(Ok(())) => bytes,
            _ => {
                self.state.set_failure(true);
                Vec::new()
            }
        }
    }
}

impl WriteStream for StreamFile {
    fn put_u8(&mut self, value: u8) {
        self.put_bytes(&[value]);
    }

    fn put_be16(&mut self, value: u16) {
        self.put_bytes(&value.to_be_bytes());
    }

    fn put_le16(&mut self, value: u16) {
        self.put_bytes(&value.to_le_bytes());
    }

    fn put_be32(&mut self, value: u32) {
        self.put_bytes(&value.to_be_bytes());
    }

    fn put_le32(&mut self, value: u32) {
        self.put_bytes(&value.to_le_bytes());
    }

    fn put_raw(&mut self, data: &[u8]) {
        self.put_bytes(data);
    }
}
