use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, SaveError};

/// In-memory mirror of a fixed-size save file.
///
/// Every field read and write goes through here. Nothing reaches disk until
/// [`BufferStore::flush`] is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferStore {
    bytes: Vec<u8>,
}

impl BufferStore {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        tracing::debug!(path = %path.display(), len = bytes.len(), "read save buffer");
        Ok(Self::new(bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn read(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let end = self.checked_end(offset, len)?;
        Ok(&self.bytes[offset..end])
    }

    pub fn write(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        let end = self.checked_end(offset, data.len())?;
        self.bytes[offset..end].copy_from_slice(data);
        Ok(())
    }

    pub fn fill(&mut self, offset: usize, len: usize, byte: u8) -> Result<()> {
        let end = self.checked_end(offset, len)?;
        self.bytes[offset..end].fill(byte);
        Ok(())
    }

    /// Swaps in a whole new buffer. The format is fixed-size, so the new
    /// contents must match the current length exactly.
    pub fn replace(&mut self, bytes: Vec<u8>) -> Result<()> {
        if bytes.len() != self.bytes.len() {
            return Err(SaveError::SizeMismatch {
                what: "replacement buffer",
                expected: self.bytes.len(),
                found: bytes.len(),
            });
        }
        self.bytes = bytes;
        Ok(())
    }

    pub fn flush(&self, destination: impl AsRef<Path>) -> Result<()> {
        let destination = destination.as_ref();
        self.flush_to(BufWriter::new(File::create(destination)?))?;
        tracing::debug!(path = %destination.display(), len = self.bytes.len(), "flushed save buffer");
        Ok(())
    }

    pub fn flush_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.bytes)?;
        writer.flush()?;
        Ok(())
    }

    fn checked_end(&self, offset: usize, len: usize) -> Result<usize> {
        match offset.checked_add(len) {
            Some(end) if end <= self.bytes.len() => Ok(end),
            _ => Err(SaveError::OutOfRange {
                offset,
                len,
                store_len: self.bytes.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_and_write_within_bounds() {
        let mut store = BufferStore::new(vec![0u8; 8]);
        store.write(2, &[1, 2, 3]).expect("write in range");
        assert_eq!(store.read(1, 4).expect("read in range"), &[0, 1, 2, 3]);
        assert_eq!(store.len(), 8);
    }

    #[test]
    fn access_past_end_is_rejected() {
        let mut store = BufferStore::new(vec![0u8; 8]);
        assert!(matches!(
            store.read(6, 3),
            Err(SaveError::OutOfRange { offset: 6, len: 3, store_len: 8 })
        ));
        assert!(store.write(8, &[1]).is_err());
        assert!(store.read(usize::MAX, 2).is_err());
        assert_eq!(store.as_bytes(), &[0u8; 8]);
    }

    #[test]
    fn replace_requires_same_length() {
        let mut store = BufferStore::new(vec![0u8; 4]);
        assert!(matches!(
            store.replace(vec![1u8; 5]),
            Err(SaveError::SizeMismatch { expected: 4, found: 5, .. })
        ));
        store.replace(vec![7u8; 4]).expect("same-length replace");
        assert_eq!(store.as_bytes(), &[7u8; 4]);
    }

    #[test]
    fn flush_to_writer_emits_every_byte() {
        let store = BufferStore::new(vec![1, 2, 3]);
        let mut out = Vec::new();
        store.flush_to(&mut out).expect("flush to vec");
        assert_eq!(out, vec![1, 2, 3]);
    }
}
