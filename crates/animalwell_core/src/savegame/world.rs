use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::catalog::{
    ElevatorDirection, ElevatorDisabled, KangarooActivityState, KangarooShardState,
};
use crate::composite::CompositeBuilder;
use crate::error::{Result, SaveError};
use crate::field::{BitflagSetField, ChoiceField, FloatField, NumericField};
use crate::store::BufferStore;

const CRANK_LABELS: [&str; Cranks::COUNT] = [
    "Crank 0", "Crank 1", "Crank 2", "Crank 3", "Crank 4", "Crank 5", "Crank 6", "Crank 7",
    "Crank 8", "Crank 9", "Crank 10", "Crank 11", "Crank 12", "Crank 13", "Crank 14", "Crank 15",
    "Crank 16", "Crank 17", "Crank 18", "Crank 19", "Crank 20", "Crank 21", "Crank 22",
];

/// Crank rotations, one per crank in the world.
#[derive(Debug, Clone)]
pub struct Cranks {
    pub cranks: Vec<NumericField<u16>>,
}

impl Cranks {
    pub const COUNT: usize = 23;
    /// One working position per puzzle crank: the reservoirs at (7, 11) and
    /// (4, 15), then the sine wave puzzle. The seahorse crank is not included.
    pub const SOLVED: [(usize, u16); 8] = [
        (7, 464),
        (8, 64624),
        (13, 63840),
        (14, 1584),
        (15, 32),
        (19, 40),
        (20, 168),
        (21, 140),
    ];

    pub(crate) fn declare(b: &mut CompositeBuilder<'_>) -> Self {
        b.nested("Cranks", |b| Self {
            cranks: CRANK_LABELS.iter().map(|&label| b.num(label)).collect(),
        })
    }

    pub fn get(&self, index: usize) -> Option<NumericField<u16>> {
        self.cranks.get(index).copied()
    }

    pub fn solve(&self, store: &mut BufferStore) -> Result<()> {
        for (index, value) in Self::SOLVED {
            self.cranks[index].set(store, value)?;
        }
        Ok(())
    }
}

/// A single tile: room coordinates, then the tile inside the room.
///
/// The top two bits of `tile_x` are a map layer in the file format. Every
/// tile the game records is on layer 0, so they are left as part of `tile_x`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TileId {
    pub room_x: u8,
    pub room_y: u8,
    pub tile_x: u8,
    pub tile_y: u8,
}

impl TileId {
    pub const fn new(room_x: u8, room_y: u8, tile_x: u8, tile_y: u8) -> Self {
        Self {
            room_x,
            room_y,
            tile_x,
            tile_y,
        }
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}): {}, {}",
            self.room_x, self.room_y, self.tile_x, self.tile_y
        )
    }
}

pub const LOCKED_DOORS: [TileId; 6] = [
    TileId::new(7, 4, 9, 5),
    TileId::new(15, 8, 38, 6),
    TileId::new(16, 10, 4, 5),
    TileId::new(14, 13, 6, 16),
    TileId::new(14, 15, 27, 6),
    TileId::new(14, 15, 32, 6),
];

pub const MOVED_WALLS: [TileId; 14] = [
    TileId::new(2, 5, 2, 1),
    TileId::new(15, 5, 6, 3),
    TileId::new(6, 6, 16, 14),
    TileId::new(7, 6, 16, 1),
    TileId::new(7, 6, 5, 14),
    TileId::new(13, 7, 29, 1),
    TileId::new(10, 8, 16, 17),
    TileId::new(2, 9, 1, 6),
    TileId::new(9, 10, 39, 6),
    TileId::new(8, 11, 33, 19),
    TileId::new(13, 11, 39, 17),
    TileId::new(6, 13, 36, 7),
    TileId::new(2, 19, 9, 7),
    TileId::new(2, 19, 31, 7),
];

/// Walls that can only be opened with the Cheater's Ring. The game does not
/// bounds-check the wall list, so recording these can overrun it.
pub const INVALID_WALLS: [TileId; 3] = [
    TileId::new(12, 4, 29, 4),
    TileId::new(3, 7, 5, 3),
    TileId::new(13, 13, 11, 8),
];

#[derive(Debug, Clone, Copy)]
pub struct TileEntry {
    pub room_y: NumericField<u8>,
    pub room_x: NumericField<u8>,
    pub tile_y: NumericField<u8>,
    pub tile_x: NumericField<u8>,
}

impl TileEntry {
    fn read(&self, store: &BufferStore) -> Result<TileId> {
        Ok(TileId {
            room_x: self.room_x.get(store)?,
            room_y: self.room_y.get(store)?,
            tile_x: self.tile_x.get(store)?,
            tile_y: self.tile_y.get(store)?,
        })
    }

    fn write(&self, store: &mut BufferStore, tile: TileId) -> Result<()> {
        self.room_y.set(store, tile.room_y)?;
        self.room_x.set(store, tile.room_x)?;
        self.tile_y.set(store, tile.tile_y)?;
        self.tile_x.set(store, tile.tile_x)
    }
}

/// Fixed array of tile records plus the index of the next free entry.
///
/// The index lives far from the array in the slot, so the two are declared
/// separately and joined with [`TileIds::new`].
#[derive(Debug, Clone)]
pub struct TileIds {
    label: &'static str,
    entries: Vec<TileEntry>,
    next_index: NumericField<u8>,
    known: &'static [TileId],
    invalid: &'static [TileId],
}

impl TileIds {
    pub const CAPACITY: usize = 16;

    pub(crate) fn declare_entries(b: &mut CompositeBuilder<'_>, label: &'static str) -> Vec<TileEntry> {
        b.nested(label, |b| {
            (0..Self::CAPACITY)
                .map(|index| {
                    b.nested(format!("Tile {index}"), |b| TileEntry {
                        room_y: b.num("Room Y"),
                        room_x: b.num("Room X"),
                        tile_y: b.num("Tile Y"),
                        tile_x: b.num("Tile X"),
                    })
                })
                .collect()
        })
    }

    pub(crate) fn new(
        label: &'static str,
        entries: Vec<TileEntry>,
        next_index: NumericField<u8>,
        known: &'static [TileId],
        invalid: &'static [TileId],
    ) -> Self {
        Self {
            label,
            entries,
            next_index,
            known,
            invalid,
        }
    }

    pub fn next_index(&self) -> NumericField<u8> {
        self.next_index
    }

    pub fn known(&self) -> &'static [TileId] {
        self.known
    }

    pub fn invalid(&self) -> &'static [TileId] {
        self.invalid
    }

    /// Recorded tiles, capped at the array size even if the game overran it.
    pub fn len(&self, store: &BufferStore) -> Result<usize> {
        Ok(usize::from(self.next_index.get(store)?).min(Self::CAPACITY))
    }

    pub fn is_empty(&self, store: &BufferStore) -> Result<bool> {
        Ok(self.len(store)? == 0)
    }

    pub fn iter(&self, store: &BufferStore) -> Result<Vec<TileId>> {
        let len = self.len(store)?;
        self.entries[..len]
            .iter()
            .map(|entry| entry.read(store))
            .collect()
    }

    pub fn contains(&self, store: &BufferStore, tile: TileId) -> Result<bool> {
        Ok(self.iter(store)?.contains(&tile))
    }

    pub fn push(&self, store: &mut BufferStore, tile: TileId) -> Result<()> {
        let len = self.len(store)?;
        if len >= Self::CAPACITY {
            return Err(SaveError::TileListFull {
                what: self.label,
                needed: 1,
                capacity: Self::CAPACITY,
            });
        }
        self.entries[len].write(store, tile)?;
        self.next_index.set(store, (len + 1) as u8)
    }

    /// Appends every known tile not already present, in sorted order.
    /// Nothing is written if they would not all fit. Returns how many were
    /// added.
    pub fn fill(&self, store: &mut BufferStore) -> Result<usize> {
        let present: BTreeSet<TileId> = self.iter(store)?.into_iter().collect();
        let missing: BTreeSet<TileId> = self
            .known
            .iter()
            .copied()
            .filter(|tile| !present.contains(tile))
            .collect();
        let len = self.len(store)?;
        if len + missing.len() > Self::CAPACITY {
            return Err(SaveError::TileListFull {
                what: self.label,
                needed: missing.len(),
                capacity: Self::CAPACITY,
            });
        }
        for (offset, tile) in missing.iter().enumerate() {
            self.entries[len + offset].write(store, *tile)?;
        }
        self.next_index.set(store, (len + missing.len()) as u8)?;
        Ok(missing.len())
    }

    /// Zeroes every entry and the index.
    pub fn clear(&self, store: &mut BufferStore) -> Result<()> {
        for entry in &self.entries {
            entry.write(store, TileId::default())?;
        }
        self.next_index.set(store, 0)
    }

    /// Drops entries listed as invalid, filling each hole with the last
    /// entry. Also pulls an overrun index back inside the array. Returns how
    /// many entries were removed.
    pub fn remove_invalid(&self, store: &mut BufferStore) -> Result<usize> {
        let tiles = self.iter(store)?;
        let mut next = tiles.len();
        let doomed: Vec<usize> = tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| self.invalid.contains(tile))
            .map(|(index, _)| index)
            .collect();
        for &index in doomed.iter().rev() {
            next -= 1;
            if index < next {
                let moved = self.entries[next].read(store)?;
                self.entries[index].write(store, moved)?;
            }
            self.entries[next].write(store, TileId::default())?;
        }
        self.next_index.set(store, next as u8)?;
        Ok(doomed.len())
    }
}

/// Where a shard drop is placed when a shard is invented for an encounter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KangarooRoom {
    pub shard_x: f32,
    pub shard_y: f32,
    pub room_x: u8,
    pub room_y: u8,
}

#[derive(Debug, Clone, Copy)]
pub struct KangarooEncounter {
    pub shard_x: FloatField,
    pub shard_y: FloatField,
    pub room_x: NumericField<u8>,
    pub room_y: NumericField<u8>,
    pub state: ChoiceField<u8, KangarooShardState>,
    pub encounter_id: NumericField<u8>,
}

impl KangarooEncounter {
    fn declare(b: &mut CompositeBuilder<'_>, index: usize) -> Self {
        b.nested(format!("Encounter {index}"), |b| Self {
            shard_x: b.float("Shard Position X"),
            shard_y: b.float("Shard Position Y"),
            room_x: b.num("Room X"),
            room_y: b.num("Room Y"),
            state: b.choice("Shard State"),
            encounter_id: b.num("Encounter ID"),
        })
    }

    fn is_empty(&self, store: &BufferStore) -> Result<bool> {
        Ok(self.state.choice(store)? == Some(KangarooShardState::None))
    }

    fn clear(&self, store: &mut BufferStore) -> Result<()> {
        self.shard_x.set(store, 0.0)?;
        self.shard_y.set(store, 0.0)?;
        self.room_x.set(store, 0)?;
        self.room_y.set(store, 0)?;
        self.state.set_choice(store, KangarooShardState::None)?;
        self.encounter_id.set(store, 0)
    }

    fn place(&self, store: &mut BufferStore, id: u8, room: KangarooRoom) -> Result<()> {
        self.shard_x.set(store, room.shard_x)?;
        self.shard_y.set(store, room.shard_y)?;
        self.room_x.set(store, room.room_x)?;
        self.room_y.set(store, room.room_y)?;
        self.encounter_id.set(store, id)
    }
}

/// The three kangaroo encounters, which double as the K. Shard records, and
/// where the kangaroo turns up next.
#[derive(Debug, Clone, Copy)]
pub struct KangarooState {
    pub encounters: [KangarooEncounter; 3],
    pub next_encounter_id: NumericField<u8>,
    pub state: ChoiceField<u8, KangarooActivityState>,
}

impl KangarooState {
    /// Encounter rooms by id. Shard positions are taken from real drops; the
    /// game ignores them once a shard is collected.
    pub const ROOMS: [KangarooRoom; 5] = [
        KangarooRoom { shard_x: 38.0, shard_y: 104.0, room_x: 6, room_y: 6 },
        KangarooRoom { shard_x: 156.0, shard_y: 136.0, room_x: 9, room_y: 11 },
        KangarooRoom { shard_x: 16.0, shard_y: 144.0, room_x: 12, room_y: 11 },
        KangarooRoom { shard_x: 147.0, shard_y: 144.0, room_x: 9, room_y: 13 },
        KangarooRoom { shard_x: 154.0, shard_y: 128.0, room_x: 16, room_y: 16 },
    ];

    pub(crate) fn declare(b: &mut CompositeBuilder<'_>) -> Self {
        b.nested("Kangaroo State", |b| {
            let encounters = std::array::from_fn(|index| KangarooEncounter::declare(b, index));
            Self {
                encounters,
                next_encounter_id: b.num("Next Encounter ID"),
                state: b.choice("Kangaroo State"),
            }
        })
    }

    pub fn num_in_state(&self, store: &BufferStore, state: KangarooShardState) -> Result<usize> {
        let mut count = 0;
        for encounter in &self.encounters {
            if encounter.state.choice(store)? == Some(state) {
                count += 1;
            }
        }
        Ok(count)
    }

    pub fn num_collected(&self, store: &BufferStore) -> Result<usize> {
        self.num_in_state(store, KangarooShardState::Collected)
    }

    pub fn num_inserted(&self, store: &BufferStore) -> Result<usize> {
        self.num_in_state(store, KangarooShardState::Inserted)
    }

    /// Room of the next encounter, if the id is one the game knows.
    pub fn next_room(&self, store: &BufferStore) -> Result<Option<(u8, u8)>> {
        let id = usize::from(self.next_encounter_id.get(store)?);
        Ok(Self::ROOMS.get(id).map(|room| (room.room_x, room.room_y)))
    }

    /// Sends the kangaroo to room `id`, lurking.
    pub fn force_room(&self, store: &mut BufferStore, id: u8) -> Result<()> {
        if usize::from(id) >= Self::ROOMS.len() {
            return Err(SaveError::Range {
                label: "Kangaroo Room",
                value: i128::from(id),
                min: 0,
                max: Self::ROOMS.len() as i128 - 1,
            });
        }
        self.next_encounter_id.set(store, id)?;
        self.state.set_choice(store, KangarooActivityState::Lurking)
    }

    /// Puts the first `count` shards into `state` and clears the rest.
    /// Empty encounters get the lowest unused room id.
    pub fn set_shard_state(
        &self,
        store: &mut BufferStore,
        count: usize,
        state: KangarooShardState,
    ) -> Result<()> {
        if !(1..=self.encounters.len()).contains(&count) {
            return Err(SaveError::Range {
                label: "K. Shards",
                value: count as i128,
                min: 1,
                max: self.encounters.len() as i128,
            });
        }

        let mut available: BTreeSet<u8> = (0..Self::ROOMS.len() as u8).collect();
        for encounter in &self.encounters {
            if !encounter.is_empty(store)? {
                available.remove(&encounter.encounter_id.get(store)?);
            }
        }

        for (index, encounter) in self.encounters.iter().enumerate() {
            if index >= count || state == KangarooShardState::None {
                encounter.clear(store)?;
                continue;
            }
            if encounter.is_empty(store)? {
                if let Some(id) = available.pop_first() {
                    encounter.place(store, id, Self::ROOMS[usize::from(id)])?;
                }
            }
            encounter.state.set_choice(store, state)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ElevatorState {
    pub position: FloatField,
    pub speed: FloatField,
}

/// Wheel-driven elevators and platforms.
#[derive(Debug, Clone, Copy)]
pub struct Elevators {
    pub states: [ElevatorState; 8],
    pub directions: BitflagSetField<u8, ElevatorDirection>,
    pub inactive: BitflagSetField<u8, ElevatorDisabled>,
}

impl Elevators {
    pub(crate) fn declare(b: &mut CompositeBuilder<'_>) -> Self {
        b.nested("Elevators", |b| {
            let states = std::array::from_fn(|index| {
                b.nested(format!("Elevator {index} State"), |b| ElevatorState {
                    position: b.float("Position"),
                    speed: b.float("Speed"),
                })
            });
            Self {
                states,
                directions: b.flags("Directions"),
                inactive: b.flags("Inactive"),
            }
        })
    }
}
