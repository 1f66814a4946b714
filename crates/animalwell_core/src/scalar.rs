use std::fmt;

/// Fixed-width little-endian integer stored in the save.
///
/// `to_bits`/`from_bits` go through the unsigned twin of the type so that
/// signed fields can still carry bit masks.
pub trait Scalar:
    Copy + Eq + Ord + fmt::Debug + fmt::Display + Into<i128> + TryFrom<i128> + 'static
{
    const WIDTH: usize;
    const MIN: i128;
    const MAX: i128;
    const SIGNED: bool;

    /// `bytes` must hold at least `WIDTH` bytes; extra bytes are ignored.
    fn from_le_slice(bytes: &[u8]) -> Self;
    fn write_le(self, out: &mut [u8]);
    fn to_bits(self) -> u64;
    fn from_bits(bits: u64) -> Self;

    fn bit_width() -> u32 {
        (Self::WIDTH * 8) as u32
    }
}

macro_rules! impl_scalar {
    ($($ty:ty => $unsigned:ty, $signed:expr;)*) => {
        $(
            impl Scalar for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();
                const MIN: i128 = <$ty>::MIN as i128;
                const MAX: i128 = <$ty>::MAX as i128;
                const SIGNED: bool = $signed;

                fn from_le_slice(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$ty>()];
                    buf.copy_from_slice(&bytes[..Self::WIDTH]);
                    <$ty>::from_le_bytes(buf)
                }

                fn write_le(self, out: &mut [u8]) {
                    out[..Self::WIDTH].copy_from_slice(&self.to_le_bytes());
                }

                fn to_bits(self) -> u64 {
                    self as $unsigned as u64
                }

                fn from_bits(bits: u64) -> Self {
                    bits as $unsigned as $ty
                }
            }
        )*
    };
}

impl_scalar! {
    u8 => u8, false;
    u16 => u16, false;
    u32 => u32, false;
    u64 => u64, false;
    i8 => u8, true;
    i16 => u16, true;
    i32 => u32, true;
    i64 => u64, true;
}

#[cfg(test)]
mod tests {
    use super::Scalar;

    #[test]
    fn little_endian_layout() {
        let mut out = [0u8; 4];
        0x1234_5678u32.write_le(&mut out);
        assert_eq!(out, [0x78, 0x56, 0x34, 0x12]);
        assert_eq!(u32::from_le_slice(&out), 0x1234_5678);
        assert_eq!(u16::from_le_slice(&[0xFE, 0xFF, 0x00]), 0xFFFE);
    }

    #[test]
    fn signed_bits_use_unsigned_twin() {
        assert_eq!((-1i16).to_bits(), 0xFFFF);
        assert_eq!(i16::from_bits(0xFFFF), -1);
        assert_eq!(i8::MIN as i128, <i8 as Scalar>::MIN);
        assert_eq!(<u64 as Scalar>::MAX, u64::MAX as i128);
        assert_eq!(<u16 as Scalar>::bit_width(), 16);
    }
}
