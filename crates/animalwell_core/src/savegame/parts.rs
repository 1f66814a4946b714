use serde::Serialize;

use super::catalog::{BigStalactiteState, FlameState, StampIcon};
use crate::composite::CompositeBuilder;
use crate::error::{Result, SaveError};
use crate::field::{ChoiceField, NumericField};
use crate::label::LabelEnum;
use crate::store::BufferStore;

pub const FRAMES_PER_SECOND: u32 = 60;

/// Formats a tick counter the way the game shows it: `h:mm:ss:ff`.
pub fn format_ticks(ticks: u32) -> String {
    let (seconds, frames) = (ticks / FRAMES_PER_SECOND, ticks % FRAMES_PER_SECOND);
    let (minutes, seconds) = (seconds / 60, seconds % 60);
    let (hours, minutes) = (minutes / 60, minutes % 60);
    format!("{hours}:{minutes:02}:{seconds:02}:{frames:02}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DateTimeParts {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTimeParts {
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl std::fmt::Display for DateTimeParts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Last-saved time shown on the load screen. All zero means the slot is empty.
#[derive(Debug, Clone, Copy)]
pub struct Timestamp {
    pub year: NumericField<u16>,
    pub month: NumericField<u8>,
    pub day: NumericField<u8>,
    pub hour: NumericField<u8>,
    pub minute: NumericField<u8>,
    pub second: NumericField<u8>,
}

impl Timestamp {
    pub(crate) fn declare(b: &mut CompositeBuilder<'_>) -> Self {
        b.nested("Timestamp", |b| Self {
            year: b.num("Year"),
            month: b.num("Month"),
            day: b.num("Day"),
            hour: b.num("Hour"),
            minute: b.num("Minute"),
            second: b.num("Second"),
        })
    }

    pub fn read(&self, store: &BufferStore) -> Result<DateTimeParts> {
        Ok(DateTimeParts {
            year: self.year.get(store)?,
            month: self.month.get(store)?,
            day: self.day.get(store)?,
            hour: self.hour.get(store)?,
            minute: self.minute.get(store)?,
            second: self.second.get(store)?,
        })
    }

    pub fn write(&self, store: &mut BufferStore, parts: &DateTimeParts) -> Result<()> {
        self.year.set(store, parts.year)?;
        self.month.set(store, parts.month)?;
        self.day.set(store, parts.day)?;
        self.hour.set(store, parts.hour)?;
        self.minute.set(store, parts.minute)?;
        self.second.set(store, parts.second)
    }
}

/// Room coordinate on the 20x24 map; the playable area starts at (2, 4).
#[derive(Debug, Clone, Copy)]
pub struct MapCoord {
    pub x: NumericField<u32>,
    pub y: NumericField<u32>,
}

impl MapCoord {
    pub(crate) fn declare(b: &mut CompositeBuilder<'_>, label: &str) -> Self {
        b.nested(label, |b| Self {
            x: b.num("X"),
            y: b.num("Y"),
        })
    }

    pub fn get(&self, store: &BufferStore) -> Result<(u32, u32)> {
        Ok((self.x.get(store)?, self.y.get(store)?))
    }

    pub fn set(&self, store: &mut BufferStore, (x, y): (u32, u32)) -> Result<()> {
        self.x.set(store, x)?;
        self.y.set(store, y)
    }
}

/// Last pixel selected while editing the mural.
#[derive(Debug, Clone, Copy)]
pub struct MuralCoord {
    pub x: NumericField<u8>,
    pub y: NumericField<u8>,
}

impl MuralCoord {
    pub(crate) fn declare(b: &mut CompositeBuilder<'_>) -> Self {
        b.nested("Mural Coordinates", |b| Self {
            x: b.num("X"),
            y: b.num("Y"),
        })
    }

    pub fn get(&self, store: &BufferStore) -> Result<(u8, u8)> {
        Ok((self.x.get(store)?, self.y.get(store)?))
    }
}

/// Water levels for the reservoir puzzles. The structure has room for 16
/// but only the first five are used.
#[derive(Debug, Clone, Copy)]
pub struct Reservoirs {
    pub levels: [NumericField<u8>; NUM_RESERVOIRS],
}

pub const NUM_RESERVOIRS: usize = 5;

impl Reservoirs {
    pub const COUNT: usize = NUM_RESERVOIRS;
    pub const STRUCT_LEN: usize = 16;
    pub const MAX_LEVEL: u8 = 80;

    pub(crate) fn declare(b: &mut CompositeBuilder<'_>) -> Self {
        b.nested("Fill Levels", |b| {
            let levels = [
                b.num("Reservoir 0"),
                b.num("Reservoir 1"),
                b.num("Reservoir 2"),
                b.num("Reservoir 3"),
                b.num("Reservoir 4"),
            ];
            b.skip(Self::STRUCT_LEN - Self::COUNT);
            Self { levels }
        })
    }

    pub fn fill(&self, store: &mut BufferStore) -> Result<()> {
        self.set_all(store, Self::MAX_LEVEL)
    }

    pub fn empty(&self, store: &mut BufferStore) -> Result<()> {
        self.set_all(store, 0)
    }

    pub fn num_filled(&self, store: &BufferStore) -> Result<usize> {
        let mut filled = 0;
        for level in &self.levels {
            if level.get(store)? >= Self::MAX_LEVEL {
                filled += 1;
            }
        }
        Ok(filled)
    }

    fn set_all(&self, store: &mut BufferStore, value: u8) -> Result<()> {
        let value = value.min(Self::MAX_LEVEL);
        for level in &self.levels {
            level.set(store, value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Flames {
    pub b: ChoiceField<u8, FlameState>,
    pub p: ChoiceField<u8, FlameState>,
    pub v: ChoiceField<u8, FlameState>,
    pub g: ChoiceField<u8, FlameState>,
}

impl Flames {
    pub(crate) fn declare(b: &mut CompositeBuilder<'_>) -> Self {
        b.nested("Flames", |b| Self {
            b: b.choice("B. Flame"),
            p: b.choice("P. Flame"),
            v: b.choice("V. Flame"),
            g: b.choice("G. Flame"),
        })
    }

    pub fn all(&self) -> [(char, ChoiceField<u8, FlameState>); 4] {
        [('b', self.b), ('p', self.p), ('v', self.v), ('g', self.g)]
    }

    /// Looks a flame up by its letter (`b`, `p`, `v` or `g`).
    pub fn by_letter(&self, letter: char) -> Option<ChoiceField<u8, FlameState>> {
        let letter = letter.to_ascii_lowercase();
        self.all()
            .into_iter()
            .find(|(candidate, _)| *candidate == letter)
            .map(|(_, field)| field)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StampEntry {
    pub x: NumericField<u16>,
    pub y: NumericField<u16>,
    pub icon: ChoiceField<u16, StampIcon>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StampValue {
    pub x: u16,
    pub y: u16,
    pub icon: u16,
}

impl StampEntry {
    fn read(&self, store: &BufferStore) -> Result<StampValue> {
        Ok(StampValue {
            x: self.x.get(store)?,
            y: self.y.get(store)?,
            icon: self.icon.get(store)?,
        })
    }

    fn write(&self, store: &mut BufferStore, value: StampValue) -> Result<()> {
        self.x.set(store, value.x)?;
        self.y.set(store, value.y)?;
        self.icon.set(store, value.icon)
    }
}

/// Minimap stamps: a count followed by a fixed array of entries.
#[derive(Debug, Clone)]
pub struct Stamps {
    count: NumericField<u8>,
    pub selected_icon: ChoiceField<u16, StampIcon>,
    entries: Vec<StampEntry>,
}

impl Stamps {
    pub const CAPACITY: usize = 64;

    pub(crate) fn declare(b: &mut CompositeBuilder<'_>) -> Self {
        b.nested("Minimap Stamps", |b| {
            let count = b.num("Num Stamps");
            let selected_icon = b.choice("Selected Icon");
            let entries = (0..Self::CAPACITY)
                .map(|index| {
                    b.nested(format!("Stamp {index}"), |b| StampEntry {
                        x: b.num("X Pos"),
                        y: b.num("Y Pos"),
                        icon: b.choice("Icon"),
                    })
                })
                .collect();
            Self {
                count,
                selected_icon,
                entries,
            }
        })
    }

    pub fn len(&self, store: &BufferStore) -> Result<usize> {
        Ok(usize::from(self.count.get(store)?).min(Self::CAPACITY))
    }

    pub fn is_empty(&self, store: &BufferStore) -> Result<bool> {
        Ok(self.len(store)? == 0)
    }

    pub fn get(&self, store: &BufferStore, index: usize) -> Result<StampValue> {
        let len = self.len(store)?;
        if index >= len {
            return Err(SaveError::StampIndex { index, len });
        }
        self.entries[index].read(store)
    }

    pub fn iter(&self, store: &BufferStore) -> Result<Vec<StampValue>> {
        let len = self.len(store)?;
        self.entries[..len]
            .iter()
            .map(|entry| entry.read(store))
            .collect()
    }

    pub fn push(&self, store: &mut BufferStore, x: u16, y: u16, icon: StampIcon) -> Result<()> {
        let len = self.len(store)?;
        if len >= Self::CAPACITY {
            return Err(SaveError::StampsFull(Self::CAPACITY));
        }
        self.entries[len].write(
            store,
            StampValue {
                x,
                y,
                icon: icon.raw() as u16,
            },
        )?;
        self.count.set(store, (len + 1) as u8)
    }

    /// Removes the stamp at `index` the way the game does: the last stamp
    /// moves into the hole and its old slot is zeroed.
    pub fn remove(&self, store: &mut BufferStore, index: usize) -> Result<()> {
        let len = self.len(store)?;
        if index >= len {
            return Err(SaveError::StampIndex { index, len });
        }
        let last = len - 1;
        if index < last {
            let moved = self.entries[last].read(store)?;
            self.entries[index].write(store, moved)?;
        }
        self.entries[last].write(store, StampValue { x: 0, y: 0, icon: 0 })?;
        self.count.set(store, last as u8)
    }

    pub fn clear(&self, store: &mut BufferStore) -> Result<()> {
        let len = self.len(store)?;
        for entry in &self.entries[..len] {
            entry.write(store, StampValue { x: 0, y: 0, icon: 0 })?;
        }
        self.count.set(store, 0)
    }
}

/// Big stalactites, named by where they hang. The structure is 16 bytes but
/// only 14 are used.
#[derive(Debug, Clone)]
pub struct BigStalactites {
    pub stalactites: Vec<(&'static str, ChoiceField<u8, BigStalactiteState>)>,
}

impl BigStalactites {
    pub const LABELS: [&'static str; 14] = [
        "Stalactite #1 at (7,4)",
        "Stalactite #1 at (4,6)",
        "Stalactite #2 at (4,6)",
        "Stalactite #3 at (4,6)",
        "Stalactite #4 at (4,6)",
        "Stalactite #5 at (4,6)",
        "Stalactite #6 at (4,6)",
        "Stalactite #7 at (4,6)",
        "Stalactite #1 at (5,7)",
        "Stalactite #2 at (5,7)",
        "Stalactite #3 at (5,7)",
        "Stalactite #4 at (5,7)",
        "Stalactite #5 at (5,7)",
        "Stalactite #6 at (5,7)",
    ];
    pub const STRUCT_LEN: usize = 16;

    pub(crate) fn declare(b: &mut CompositeBuilder<'_>) -> Self {
        b.nested("Big Stalactites", |b| {
            let stalactites = Self::LABELS
                .iter()
                .map(|&label| (label, b.choice(label)))
                .collect();
            b.skip(Self::STRUCT_LEN - Self::LABELS.len());
            Self { stalactites }
        })
    }

    pub fn set_all(&self, store: &mut BufferStore, state: BigStalactiteState) -> Result<()> {
        for (_, field) in &self.stalactites {
            field.set_choice(store, state)?;
        }
        Ok(())
    }
}
