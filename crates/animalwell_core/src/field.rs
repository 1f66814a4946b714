use std::collections::BTreeSet;
use std::marker::PhantomData;

use crate::error::{Result, SaveError};
use crate::label::LabelEnum;
use crate::layout::ByteRange;
use crate::scalar::Scalar;
use crate::store::BufferStore;

/// Where a field lives in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    pub label: &'static str,
    pub offset: usize,
    pub width: usize,
}

impl FieldInfo {
    pub fn range(&self) -> ByteRange {
        ByteRange {
            start: self.offset,
            end: self.offset + self.width,
        }
    }
}

fn read_scalar<T: Scalar>(info: &FieldInfo, store: &BufferStore) -> Result<T> {
    Ok(T::from_le_slice(store.read(info.offset, T::WIDTH)?))
}

fn write_scalar<T: Scalar>(info: &FieldInfo, store: &mut BufferStore, value: T) -> Result<()> {
    let mut buf = [0u8; 8];
    value.write_le(&mut buf);
    store.write(info.offset, &buf[..T::WIDTH])
}

fn checked_scalar<T: Scalar>(label: &'static str, value: i128) -> Result<T> {
    T::try_from(value).map_err(|_| SaveError::Range {
        label,
        value,
        min: T::MIN,
        max: T::MAX,
    })
}

#[derive(Debug)]
pub struct NumericField<T> {
    info: FieldInfo,
    _ty: PhantomData<T>,
}

impl<T> Clone for NumericField<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NumericField<T> {}

impl<T: Scalar> NumericField<T> {
    pub fn new(label: &'static str, offset: usize) -> Self {
        Self {
            info: FieldInfo {
                label,
                offset,
                width: T::WIDTH,
            },
            _ty: PhantomData,
        }
    }

    pub fn info(&self) -> FieldInfo {
        self.info
    }

    pub fn get(&self, store: &BufferStore) -> Result<T> {
        read_scalar(&self.info, store)
    }

    pub fn set(&self, store: &mut BufferStore, value: T) -> Result<()> {
        write_scalar(&self.info, store, value)
    }

    /// Writes `value` if it fits `T`, otherwise fails without touching the
    /// store.
    pub fn set_checked(&self, store: &mut BufferStore, value: i128) -> Result<()> {
        let value = checked_scalar::<T>(self.info.label, value)?;
        self.set(store, value)
    }
}

/// Little-endian IEEE 754 single, used for positions and speeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatField {
    info: FieldInfo,
}

impl FloatField {
    pub const WIDTH: usize = 4;

    pub fn new(label: &'static str, offset: usize) -> Self {
        Self {
            info: FieldInfo {
                label,
                offset,
                width: Self::WIDTH,
            },
        }
    }

    pub fn info(&self) -> FieldInfo {
        self.info
    }

    pub fn get(&self, store: &BufferStore) -> Result<f32> {
        let bytes = store.read(self.info.offset, Self::WIDTH)?;
        Ok(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn set(&self, store: &mut BufferStore, value: f32) -> Result<()> {
        store.write(self.info.offset, &value.to_le_bytes())
    }
}

/// Bit vector whose known bits are the members of `F`.
#[derive(Debug)]
pub struct BitflagSetField<T, F> {
    info: FieldInfo,
    _ty: PhantomData<(T, F)>,
}

impl<T, F> Clone for BitflagSetField<T, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, F> Copy for BitflagSetField<T, F> {}

impl<T: Scalar, F: LabelEnum> BitflagSetField<T, F> {
    pub fn new(label: &'static str, offset: usize) -> Self {
        Self {
            info: FieldInfo {
                label,
                offset,
                width: T::WIDTH,
            },
            _ty: PhantomData,
        }
    }

    pub fn info(&self) -> FieldInfo {
        self.info
    }

    pub fn get(&self, store: &BufferStore) -> Result<T> {
        read_scalar(&self.info, store)
    }

    pub fn set(&self, store: &mut BufferStore, value: T) -> Result<()> {
        write_scalar(&self.info, store, value)
    }

    pub fn is_enabled(&self, store: &BufferStore, flag: F) -> Result<bool> {
        let bits = self.get(store)?.to_bits();
        let mask = flag.raw();
        Ok(mask != 0 && bits & mask == mask)
    }

    pub fn enabled(&self, store: &BufferStore) -> Result<BTreeSet<F>> {
        let bits = self.get(store)?.to_bits();
        Ok(F::ALL
            .iter()
            .copied()
            .filter(|flag| flag.raw() != 0 && bits & flag.raw() == flag.raw())
            .collect())
    }

    pub fn disabled(&self, store: &BufferStore) -> Result<BTreeSet<F>> {
        let enabled = self.enabled(store)?;
        Ok(F::ALL
            .iter()
            .copied()
            .filter(|flag| !enabled.contains(flag))
            .collect())
    }

    pub fn enable(&self, store: &mut BufferStore, flag: F) -> Result<()> {
        self.update(store, |bits| bits | flag.raw())
    }

    pub fn disable(&self, store: &mut BufferStore, flag: F) -> Result<()> {
        self.update(store, |bits| bits & !flag.raw())
    }

    pub fn enable_all(&self, store: &mut BufferStore) -> Result<()> {
        let mask = Self::declared_mask();
        self.update(store, |bits| bits | mask)
    }

    pub fn disable_all(&self, store: &mut BufferStore) -> Result<()> {
        let mask = Self::declared_mask();
        self.update(store, |bits| bits & !mask)
    }

    pub fn enable_named(&self, store: &mut BufferStore, name: &str) -> Result<()> {
        let flag = self.lookup(name)?;
        self.enable(store, flag)
    }

    pub fn disable_named(&self, store: &mut BufferStore, name: &str) -> Result<()> {
        let flag = self.lookup(name)?;
        self.disable(store, flag)
    }

    fn lookup(&self, name: &str) -> Result<F> {
        F::from_name(name).ok_or_else(|| SaveError::UnknownFlag {
            field: self.info.label,
            name: name.to_string(),
        })
    }

    fn declared_mask() -> u64 {
        F::ALL.iter().fold(0, |mask, flag| mask | flag.raw())
    }

    fn update(&self, store: &mut BufferStore, op: impl FnOnce(u64) -> u64) -> Result<()> {
        let bits = self.get(store)?.to_bits();
        self.set(store, T::from_bits(op(bits)))
    }
}

/// Numeric field projected onto a catalog. The raw value is authoritative:
/// values outside `C` read back unchanged and project to `None`.
#[derive(Debug)]
pub struct ChoiceField<T, C> {
    info: FieldInfo,
    _ty: PhantomData<(T, C)>,
}

impl<T, C> Clone for ChoiceField<T, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, C> Copy for ChoiceField<T, C> {}

impl<T: Scalar, C: LabelEnum> ChoiceField<T, C> {
    pub fn new(label: &'static str, offset: usize) -> Self {
        Self {
            info: FieldInfo {
                label,
                offset,
                width: T::WIDTH,
            },
            _ty: PhantomData,
        }
    }

    pub fn info(&self) -> FieldInfo {
        self.info
    }

    pub fn get(&self, store: &BufferStore) -> Result<T> {
        read_scalar(&self.info, store)
    }

    pub fn set(&self, store: &mut BufferStore, value: T) -> Result<()> {
        write_scalar(&self.info, store, value)
    }

    pub fn set_checked(&self, store: &mut BufferStore, value: i128) -> Result<()> {
        let value = checked_scalar::<T>(self.info.label, value)?;
        self.set(store, value)
    }

    pub fn choice(&self, store: &BufferStore) -> Result<Option<C>> {
        let raw: i128 = self.get(store)?.into();
        Ok(u64::try_from(raw).ok().and_then(C::from_raw))
    }

    pub fn set_choice(&self, store: &mut BufferStore, choice: C) -> Result<()> {
        self.set_checked(store, i128::from(choice.raw()))
    }
}

/// Opaque byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBytesField {
    info: FieldInfo,
}

impl RawBytesField {
    pub fn new(label: &'static str, offset: usize, width: usize) -> Self {
        Self {
            info: FieldInfo {
                label,
                offset,
                width,
            },
        }
    }

    pub fn info(&self) -> FieldInfo {
        self.info
    }

    pub fn len(&self) -> usize {
        self.info.width
    }

    pub fn is_empty(&self) -> bool {
        self.info.width == 0
    }

    pub fn read<'s>(&self, store: &'s BufferStore) -> Result<&'s [u8]> {
        store.read(self.info.offset, self.info.width)
    }

    pub fn write(&self, store: &mut BufferStore, data: &[u8]) -> Result<()> {
        if data.len() != self.info.width {
            return Err(SaveError::SizeMismatch {
                what: self.info.label,
                expected: self.info.width,
                found: data.len(),
            });
        }
        store.write(self.info.offset, data)
    }

    pub fn fill(&self, store: &mut BufferStore, byte: u8) -> Result<()> {
        store.fill(self.info.offset, self.info.width, byte)
    }
}

/// Consecutive unsigned segments treated as one group of bits where only the
/// number of set bits matters.
#[derive(Debug)]
pub struct BitCountField<T> {
    info: FieldInfo,
    segments: usize,
    max_bits: u32,
    _ty: PhantomData<T>,
}

impl<T> Clone for BitCountField<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for BitCountField<T> {}

impl<T: Scalar> BitCountField<T> {
    pub fn new(label: &'static str, offset: usize, segments: usize, max_bits: u32) -> Self {
        debug_assert!(!T::SIGNED, "bit-count groups are unsigned");
        Self {
            info: FieldInfo {
                label,
                offset,
                width: T::WIDTH * segments,
            },
            segments,
            max_bits,
            _ty: PhantomData,
        }
    }

    pub fn info(&self) -> FieldInfo {
        self.info
    }

    pub fn max_bits(&self) -> u32 {
        self.max_bits
    }

    pub fn segment(&self, index: usize) -> Option<NumericField<T>> {
        (index < self.segments)
            .then(|| NumericField::new(self.info.label, self.info.offset + index * T::WIDTH))
    }

    /// Set bits across every segment, including bits past `max_bits`.
    pub fn count(&self, store: &BufferStore) -> Result<u32> {
        let mut total = 0;
        for index in 0..self.segments {
            total += self.read_segment(store, index)?.count_ones();
        }
        Ok(total)
    }

    pub fn is_set(&self, store: &BufferStore, bit: u32) -> Result<bool> {
        let (index, mask) = self.locate(bit)?;
        Ok(self.read_segment(store, index)? & mask != 0)
    }

    /// Sets the first `max_bits` bits, leaving any others as they were.
    pub fn fill(&self, store: &mut BufferStore) -> Result<()> {
        let per_segment = T::bit_width();
        let mut remaining = self.max_bits;
        for index in 0..self.segments {
            let this_bits = remaining.min(per_segment);
            let mask = if this_bits >= 64 {
                u64::MAX
            } else {
                (1u64 << this_bits) - 1
            };
            let value = self.read_segment(store, index)? | mask;
            self.write_segment(store, index, value)?;
            remaining -= this_bits;
        }
        Ok(())
    }

    /// Zeroes every segment, unknown bits included.
    pub fn clear(&self, store: &mut BufferStore) -> Result<()> {
        for index in 0..self.segments {
            self.write_segment(store, index, 0)?;
        }
        Ok(())
    }

    pub fn set_bit(&self, store: &mut BufferStore, bit: u32) -> Result<()> {
        self.check_known(bit)?;
        let (index, mask) = self.locate(bit)?;
        let value = self.read_segment(store, index)? | mask;
        self.write_segment(store, index, value)
    }

    fn check_known(&self, bit: u32) -> Result<()> {
        if bit >= self.max_bits {
            return Err(SaveError::Range {
                label: self.info.label,
                value: i128::from(bit),
                min: 0,
                max: i128::from(self.max_bits) - 1,
            });
        }
        Ok(())
    }

    fn locate(&self, bit: u32) -> Result<(usize, u64)> {
        let per_segment = T::bit_width();
        let index = (bit / per_segment) as usize;
        if index >= self.segments {
            return Err(SaveError::Range {
                label: self.info.label,
                value: i128::from(bit),
                min: 0,
                max: (self.segments as i128) * i128::from(per_segment) - 1,
            });
        }
        Ok((index, 1u64 << (bit % per_segment)))
    }

    fn read_segment(&self, store: &BufferStore, index: usize) -> Result<u64> {
        let offset = self.info.offset + index * T::WIDTH;
        Ok(T::from_le_slice(store.read(offset, T::WIDTH)?).to_bits())
    }

    fn write_segment(&self, store: &mut BufferStore, index: usize, bits: u64) -> Result<()> {
        let mut buf = [0u8; 8];
        T::from_bits(bits).write_le(&mut buf);
        store.write(self.info.offset + index * T::WIDTH, &buf[..T::WIDTH])
    }
}
