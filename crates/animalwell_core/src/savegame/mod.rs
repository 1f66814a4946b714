pub mod catalog;
mod globals;
mod minimap;
mod mural;
mod parts;
mod slot;
mod world;

use std::io;
use std::path::{Path, PathBuf};

use crate::checksum::{ChecksumPolicy, ChecksumRegion};
use crate::composite::CompositeBuilder;
use crate::error::{Result, SaveError};
use crate::layout::{ByteRange, Layout};
use crate::store::BufferStore;

pub use globals::{Globals, MURAL_VARIANTS};
pub use minimap::{
    MAP_BYTES, MAP_ROOMS_X, MAP_ROOMS_Y, Minimap, MinimapTarget, PLAYABLE_ROOMS_X,
    PLAYABLE_ROOMS_Y, PLAYABLE_START, ROOM_HEIGHT, ROOM_WIDTH,
};
pub use mural::{MURAL_BYTES, MURAL_DEFAULT, MURAL_HEIGHT, MURAL_SOLVED, MURAL_WIDTH, Mural};
pub use parts::{
    BigStalactites, DateTimeParts, FRAMES_PER_SECOND, Flames, MapCoord, MuralCoord, Reservoirs,
    StampValue, Stamps, Timestamp, format_ticks,
};
pub use slot::Slot;
pub use world::{
    Cranks, ElevatorState, Elevators, INVALID_WALLS, KangarooEncounter, KangarooRoom,
    KangarooState, LOCKED_DOORS, MOVED_WALLS, TileEntry, TileId, TileIds,
};

pub const SAVE_LEN: usize = 479_360;
pub const SAVE_VERSION: u32 = 9;
pub const SLOT_COUNT: usize = 3;
pub const SLOT_LEN: usize = 0x27010;
pub const SLOT_BASES: [usize; SLOT_COUNT] = [0x18, 0x27028, 0x4E038];
/// Bytes after the last slot. Their meaning is unknown; they are carried
/// through untouched and still count towards the checksum.
pub const TRAILING_LEN: usize = SAVE_LEN - (SLOT_BASES[SLOT_COUNT - 1] + SLOT_LEN);

/// An open savegame: the owned bytes plus the typed views declared over them.
///
/// Edits go to the in-memory buffer only. Nothing reaches disk until
/// [`Savegame::commit`] or [`Savegame::save`]; dropping the value discards
/// them.
#[derive(Debug)]
pub struct Savegame {
    pub store: BufferStore,
    pub globals: Globals,
    pub slots: [Slot; SLOT_COUNT],
    layout: Layout,
    checksum: ChecksumRegion,
    checksum_valid_on_load: bool,
    path: Option<PathBuf>,
}

impl Savegame {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut save = Self::from_store(BufferStore::from_file(path)?)?;
        save.path = Some(path.to_path_buf());
        Ok(save)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_store(BufferStore::new(bytes))
    }

    fn from_store(store: BufferStore) -> Result<Self> {
        if store.len() != SAVE_LEN {
            return Err(SaveError::SizeMismatch {
                what: "savegame",
                expected: SAVE_LEN,
                found: store.len(),
            });
        }

        let mut layout = Layout::new();
        let (globals, slots) = {
            let mut root = CompositeBuilder::root(&mut layout, "Savegame");
            let globals = Globals::declare(&mut root);
            let slots = std::array::from_fn(|index| Slot::declare(&mut root, index));
            root.raw("Trailing Data", TRAILING_LEN);
            (globals, slots)
        };

        let version = globals.version.get(&store)?;
        if version != SAVE_VERSION {
            return Err(SaveError::UnsupportedVersion(version));
        }
        layout.validate(store.len())?;
        tracing::debug!(entries = layout.len(), "built savegame layout");

        let checksum = ChecksumRegion::new(
            ByteRange {
                start: 0,
                end: SAVE_LEN,
            },
            globals.checksum,
        );
        let checksum_valid_on_load = checksum.verify(&store)?;
        if !checksum_valid_on_load {
            tracing::warn!(
                stored = checksum.stored(&store)?,
                computed = checksum.compute(&store)?,
                "savegame checksum does not match"
            );
        }

        Ok(Self {
            store,
            globals,
            slots,
            layout,
            checksum,
            checksum_valid_on_load,
            path: None,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn checksum_region(&self) -> &ChecksumRegion {
        &self.checksum
    }

    /// Whether the checksum matched when the file was read. Edits made since
    /// are not reflected.
    pub fn checksum_valid_on_load(&self) -> bool {
        self.checksum_valid_on_load
    }

    pub fn checksum_is_valid(&self) -> Result<bool> {
        self.checksum.verify(&self.store)
    }

    /// Zero-based slot lookup.
    pub fn slot(&self, index: usize) -> Result<&Slot> {
        self.slots.get(index).ok_or(SaveError::InvalidSlot {
            index,
            count: SLOT_COUNT,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.store.as_bytes()
    }

    /// Applies `policy` to the checksum byte, then writes the whole buffer to
    /// `path`. Returns the checksum byte that was written.
    pub fn commit(&mut self, path: impl AsRef<Path>, policy: ChecksumPolicy) -> Result<u8> {
        let path = path.as_ref();
        let checksum = self.checksum.apply(&mut self.store, policy)?;
        self.store.flush(path)?;
        tracing::info!(path = %path.display(), checksum, ?policy, "committed savegame");
        Ok(checksum)
    }

    /// Commits back to the file this savegame was opened from.
    pub fn save(&mut self, policy: ChecksumPolicy) -> Result<u8> {
        let path = self.path.clone().ok_or_else(|| {
            SaveError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "savegame was not opened from a file",
            ))
        })?;
        self.commit(path, policy)
    }
}
