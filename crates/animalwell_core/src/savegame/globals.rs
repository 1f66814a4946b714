use super::catalog::Unlockable;
use crate::composite::CompositeBuilder;
use crate::error::Result;
use crate::field::{BitflagSetField, NumericField};
use crate::store::BufferStore;

pub const MURAL_VARIANTS: u32 = 50;

/// Header fields shared by all slots.
#[derive(Debug, Clone, Copy)]
pub struct Globals {
    pub version: NumericField<u32>,
    pub frame_seed: NumericField<u32>,
    pub last_used_slot: NumericField<u8>,
    pub checksum: NumericField<u8>,
    pub unlockables: BitflagSetField<u32, Unlockable>,
}

impl Globals {
    pub(crate) fn declare(b: &mut CompositeBuilder<'_>) -> Self {
        let version = b.num("Save Version");
        let frame_seed = b.at(0x08).num("Frame Seed");
        let last_used_slot = b.num("Last Used Slot");
        let checksum = b.num("Checksum");
        let unlockables = b.at(0x10).flags("Globals");
        Self {
            version,
            frame_seed,
            last_used_slot,
            checksum,
            unlockables,
        }
    }

    /// Which of the 50 bunny murals the frame seed selects, 1-based.
    pub fn mural_variant(&self, store: &BufferStore) -> Result<u32> {
        Ok(self.frame_seed.get(store)? % MURAL_VARIANTS + 1)
    }
}
