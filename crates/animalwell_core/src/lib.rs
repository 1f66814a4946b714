pub mod checksum;
pub mod codec;
pub mod composite;
pub mod error;
pub mod field;
pub mod label;
pub mod layout;
pub mod savegame;
pub mod scalar;
pub mod store;

pub use checksum::{ChecksumPolicy, ChecksumRegion};
pub use error::{ErrorCode, Result, SaveError};
pub use field::{
    BitCountField, BitflagSetField, ChoiceField, FieldInfo, FloatField, NumericField, RawBytesField,
};
pub use label::{LabelEnum, parse_name, resolve_names};
pub use savegame::{Savegame, Slot};
pub use store::BufferStore;
