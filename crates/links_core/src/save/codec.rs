//! Fixed-layout binary encoding. Every persisted format is a sequence of
//! little-endian 32-bit fields in declared order; nothing here is
//! self-describing beyond the version byte packed into a reserved header
//! slot.

use super::error::SaveError;

/// Pack a format version into a reserved header field. The upper 24 bits
/// must round-trip as zero.
pub fn pack_version(version: u8) -> i32 {
    version as i32
}

/// Split a reserved header field into (version, reserved-bits).
pub fn unpack_version(raw: i32) -> (u8, i32) {
    ((raw & 0xff) as u8, raw >> 8)
}

#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: Vec::with_capacity(capacity) }
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

#[derive(Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self) -> Result<[u8; 4], SaveError> {
        let end = self.pos + 4;
        if end > self.data.len() {
            // a short read from a correct-size file is corruption
            return Err(SaveError::Corrupted);
        }
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(bytes)
    }

    pub fn read_i32(&mut self) -> Result<i32, SaveError> {
        Ok(i32::from_le_bytes(self.take()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, SaveError> {
        Ok(f32::from_le_bytes(self.take()?))
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}
