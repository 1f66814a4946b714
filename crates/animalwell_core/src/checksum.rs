use crate::error::Result;
use crate::field::NumericField;
use crate::layout::ByteRange;
use crate::store::BufferStore;

/// What to do with the checksum byte on the next commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumPolicy {
    /// Recompute and store the correct value.
    #[default]
    Repair,
    /// Store the correct value with every bit inverted.
    Invalid,
    /// Leave the stored byte alone.
    Preserve,
    /// Store exactly this byte.
    Force(u8),
}

/// XOR checksum over `range`, with the byte at `field` counted as zero.
#[derive(Debug, Clone, Copy)]
pub struct ChecksumRegion {
    pub range: ByteRange,
    pub field: NumericField<u8>,
}

impl ChecksumRegion {
    pub fn new(range: ByteRange, field: NumericField<u8>) -> Self {
        Self { range, field }
    }

    pub fn compute(&self, store: &BufferStore) -> Result<u8> {
        let bytes = store.read(self.range.start, self.range.len())?;
        let skip = self.field.info().offset;
        let total = bytes
            .iter()
            .enumerate()
            .filter(|(index, _)| self.range.start + index != skip)
            .fold(0u8, |acc, (_, byte)| acc ^ byte);
        Ok(total)
    }

    pub fn stored(&self, store: &BufferStore) -> Result<u8> {
        self.field.get(store)
    }

    pub fn verify(&self, store: &BufferStore) -> Result<bool> {
        Ok(self.compute(store)? == self.stored(store)?)
    }

    pub fn repair(&self, store: &mut BufferStore) -> Result<u8> {
        let value = self.compute(store)?;
        self.field.set(store, value)?;
        Ok(value)
    }

    /// Applies `policy` and returns the byte now stored.
    pub fn apply(&self, store: &mut BufferStore, policy: ChecksumPolicy) -> Result<u8> {
        let value = match policy {
            ChecksumPolicy::Repair => self.compute(store)?,
            ChecksumPolicy::Invalid => self.compute(store)? ^ 0xFF,
            ChecksumPolicy::Preserve => return self.stored(store),
            ChecksumPolicy::Force(value) => value,
        };
        self.field.set(store, value)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(len: usize) -> ChecksumRegion {
        ChecksumRegion::new(ByteRange { start: 0, end: len }, NumericField::new("Checksum", 2))
    }

    #[test]
    fn repair_makes_whole_buffer_xor_to_zero() {
        let mut store = BufferStore::new(vec![0x11, 0x22, 0xEE, 0x44]);
        let region = region(4);
        assert_eq!(region.compute(&store).expect("compute"), 0x11 ^ 0x22 ^ 0x44);
        assert!(!region.verify(&store).expect("verify"));

        region.repair(&mut store).expect("repair");
        assert!(region.verify(&store).expect("verify"));
        assert_eq!(store.as_bytes().iter().fold(0u8, |acc, b| acc ^ b), 0);

        let before = store.clone();
        region.repair(&mut store).expect("repair twice");
        assert_eq!(store, before);
    }

    #[test]
    fn policies_write_expected_byte() {
        let mut store = BufferStore::new(vec![0x01, 0x02, 0x55, 0x04]);
        let region = region(4);
        let good = region.compute(&store).expect("compute");

        assert_eq!(region.apply(&mut store, ChecksumPolicy::Preserve).expect("preserve"), 0x55);
        assert_eq!(
            region.apply(&mut store, ChecksumPolicy::Invalid).expect("invalid"),
            good ^ 0xFF
        );
        assert_eq!(region.apply(&mut store, ChecksumPolicy::Force(0x7A)).expect("force"), 0x7A);
        assert_eq!(store.as_bytes()[2], 0x7A);
        assert_eq!(region.apply(&mut store, ChecksumPolicy::Repair).expect("repair"), good);
    }
}
