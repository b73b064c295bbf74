use anyhow::{anyhow, Result};

/// Appends little-endian 32-bit signed integers to a growable byte buffer.
#[derive(Debug, Default, Clone)]
pub struct Int32Writer {
    buffer: Vec<u8>,
}

impl Int32Writer {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

/// Cursor over a byte slice holding tightly packed little-endian integers.
#[derive(Debug, Clone)]
pub struct Int32Reader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Int32Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Returns `None` without advancing when fewer than 4 bytes remain.
    pub fn next_i32(&mut self) -> Option<i32> {
        let end = self.position.checked_add(4)?;
        let chunk: [u8; 4] = self.bytes.get(self.position..end)?.try_into().ok()?;
        self.position = end;
        Some(i32::from_le_bytes(chunk))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let position = self.position;
        self.next_i32().ok_or_else(|| {
            anyhow!(
                "Unexpected end of stream reading i32 at byte {} (length {})",
                position,
                self.bytes.len()
            )
        })
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .position
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| {
                anyhow!(
                    "Unexpected end of stream reading {} bytes at byte {} (length {})",
                    len,
                    self.position,
                    self.bytes.len()
                )
            })?;
        let bytes = &self.bytes[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position == self.bytes.len()
    }
}
