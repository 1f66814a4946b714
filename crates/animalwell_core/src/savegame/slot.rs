use super::catalog::{
    Bunny, CandleState, CatStatus, Egg, EggDoor, Equipment, Equipped, IllegalBunny, Inventory,
    ManticoreState, PinkButton, PinkButtonInvalid, Progress, QuestState, Teleport,
};
use super::minimap::Minimap;
use super::mural::Mural;
use super::parts::{BigStalactites, Flames, MapCoord, MuralCoord, Reservoirs, Stamps, Timestamp};
use super::world::{
    Cranks, Elevators, INVALID_WALLS, KangarooState, LOCKED_DOORS, MOVED_WALLS, TileIds,
};
use super::{SLOT_BASES, SLOT_LEN};
use crate::composite::CompositeBuilder;
use crate::error::{Result, SaveError};
use crate::field::{BitCountField, BitflagSetField, ChoiceField, NumericField, RawBytesField};
use crate::store::BufferStore;

/// Bit in the picked-fruit group that records a nut stolen from a squirrel.
const STOLEN_NUT_BIT: u32 = 64 + 51;

/// One of the three save slots. Offsets are declared relative to the slot
/// base, so the same schema serves every slot.
#[derive(Debug, Clone)]
pub struct Slot {
    pub index: usize,
    payload: RawBytesField,

    pub timestamp: Timestamp,
    pub cranks: Cranks,
    pub locked_doors: TileIds,
    pub moved_walls: TileIds,
    pub steps: NumericField<u32>,
    pub reservoirs: Reservoirs,

    pub chests_opened: BitCountField<u64>,
    pub button_doors_opened: BitCountField<u64>,
    pub yellow_buttons_pressed: BitCountField<u64>,
    pub purple_buttons_pressed: BitCountField<u64>,
    pub green_buttons_pressed: BitCountField<u64>,
    pub picked_fruit: BitCountField<u64>,
    pub picked_firecrackers: BitCountField<u64>,
    pub eggs: BitflagSetField<u64, Egg>,
    pub walls_blasted: BitCountField<u32>,
    pub detonators_triggered: BitCountField<u32>,
    pub bunnies: BitflagSetField<u32, Bunny>,
    pub illegal_bunnies: BitflagSetField<u32, IllegalBunny>,
    pub squirrels_scared: BitCountField<u16>,
    pub cat_status: BitflagSetField<u16, CatStatus>,

    pub firecrackers_collected: NumericField<u16>,
    pub bubbles_popped: NumericField<u16>,
    pub saves: NumericField<u16>,
    pub pink_buttons_pressed: BitflagSetField<u16, PinkButton>,
    pub invalid_pink_buttons: BitflagSetField<u16, PinkButtonInvalid>,
    pub nuts: NumericField<u8>,
    pub layer1_chests_opened: BitCountField<u8>,
    pub layer2_buttons_pressed: BitCountField<u8>,
    pub keys: NumericField<u8>,
    pub matches: NumericField<u8>,
    pub firecrackers: NumericField<u8>,
    pub health: NumericField<u8>,
    pub gold_hearts: NumericField<u8>,
    pub last_groundhog_year: NumericField<u16>,
    pub egg_doors: BitflagSetField<u8, EggDoor>,

    pub ingame_ticks: NumericField<u32>,
    pub total_ticks: NumericField<u32>,
    pub spawn: MapCoord,

    pub equipment: BitflagSetField<u16, Equipment>,
    pub inventory: BitflagSetField<u8, Inventory>,
    pub candles: BitflagSetField<u16, CandleState>,
    pub hits: NumericField<u16>,
    pub deaths: NumericField<u16>,
    pub ghosts_scared: BitCountField<u16>,
    pub selected_equipment: ChoiceField<u8, Equipped>,
    pub quest_state: BitflagSetField<u32, QuestState>,
    pub blue_manticore: ChoiceField<u8, ManticoreState>,
    pub red_manticore: ChoiceField<u8, ManticoreState>,
    pub kangaroo: KangarooState,

    pub progress: BitflagSetField<u16, Progress>,
    pub flames: Flames,
    pub teleports_seen: BitflagSetField<u8, Teleport>,
    pub teleports_active: BitflagSetField<u8, Teleport>,
    pub stamps: Stamps,
    pub elevators: Elevators,
    pub mural_coords: MuralCoord,
    pub minimap: Minimap,
    pub pencil: Minimap,
    pub destruction: Minimap,
    pub mural: Mural,
    pub big_stalactites: BigStalactites,
    pub small_deposits_broken: BitCountField<u64>,
    pub icicles_broken: BitCountField<u64>,
    pub berries_eaten_while_full: NumericField<u16>,
}

impl Slot {
    pub(crate) fn declare(root: &mut CompositeBuilder<'_>, index: usize) -> Self {
        let base = SLOT_BASES[index];
        root.at(base).nested(format!("Slot {}", index + 1), |b| {
            let timestamp = Timestamp::declare(b);
            let cranks = Cranks::declare(b.at(0x08));
            let locked_door_tiles = TileIds::declare_entries(b.at(0x88), "Locked Doors");
            let moved_wall_tiles = TileIds::declare_entries(b, "Moved Walls");
            let steps = b.at(0x108).num("Num Steps");
            let reservoirs = Reservoirs::declare(b);

            let chests_opened = b.at(0x120).bit_count("Chests Opened", 2, 102);
            let button_doors_opened = b.bit_count("Button Doors Opened", 2, 94);
            let yellow_buttons_pressed = b.bit_count("Yellow Buttons Pressed", 3, 134);
            let purple_buttons_pressed = b.at(0x160).bit_count("Purple Buttons Pressed", 1, 27);
            let green_buttons_pressed = b.bit_count("Green Buttons Pressed", 1, 7);

            let picked_fruit = b.at(0x170).bit_count("Picked Fruit", 2, 115);
            let picked_firecrackers = b.bit_count("Picked Firecrackers", 1, 64);
            let eggs = b.flags("Eggs");
            let walls_blasted = b.bit_count("Walls Blasted", 1, 10);
            let detonators_triggered = b.bit_count("Detonators Triggered", 1, 9);
            let bunnies = b.flags("Bunnies");
            // Same word as the legal bunnies, kept apart so they can only be cleared.
            let illegal_bunnies = b.at(0x198).flags("Illegal Bunnies");
            let squirrels_scared = b.at(0x19C).bit_count("Squirrels Scared", 1, 13);
            let cat_status = b.flags("Cat Status");

            let firecrackers_collected = b.at(0x1A2).num("Firecrackers Collected");
            let bubbles_popped = b.num("Bubbles Popped");
            let saves = b.at(0x1A8).num("Num Saves");
            // The game stores this index as a u16, but it never exceeds 16.
            let locked_doors = TileIds::new(
                "Locked Doors",
                locked_door_tiles,
                b.num("Locked Doors Index"),
                &LOCKED_DOORS,
                &[],
            );
            let pink_buttons_pressed = b.at(0x1AC).flags("Pink Buttons Pressed");
            let invalid_pink_buttons = b.at(0x1AC).flags("Invalid Pink Buttons");
            let nuts = b.num("Num Nuts");
            let layer1_chests_opened = b.bit_count("Layer 1 Chests", 1, 1);
            let layer2_buttons_pressed = b.bit_count("Layer 2 Buttons", 1, 4);
            let keys = b.num("Num Keys");
            let matches = b.num("Num Matches");
            let firecrackers = b.num("Num Firecrackers");
            let health = b.num("Health");
            let gold_hearts = b.num("Gold Hearts");
            let last_groundhog_year = b.num("Last Groundhog Year");
            let moved_walls = TileIds::new(
                "Moved Walls",
                moved_wall_tiles,
                b.num("Moved Walls Index"),
                &MOVED_WALLS,
                &INVALID_WALLS,
            );
            let egg_doors = b.at(0x1B9).flags("Egg Doors");

            let ingame_ticks = b.at(0x1BC).num("Ingame Ticks");
            let total_ticks = b.num("Total Ticks");
            let spawn = MapCoord::declare(b.at(0x1D4), "Spawn");

            let equipment = b.at(0x1DC).flags("Equipment");
            let inventory = b.flags("Inventory");
            let candles = b.at(0x1E0).flags("Candles");
            let hits = b.num("Num Hits");
            let deaths = b.num("Num Deaths");
            let ghosts_scared = b.bit_count("Ghosts Scared", 1, 11);
            let selected_equipment = b.at(0x1EA).choice("Selected Equipment");
            let quest_state = b.at(0x1EC).flags("Quest State");
            let blue_manticore = b.choice("Blue Manticore");
            let red_manticore = b.choice("Red Manticore");
            let kangaroo = KangarooState::declare(b.at(0x1F4));

            let progress = b.at(0x21C).flags("Progress");
            let flames = Flames::declare(b);
            let teleports_seen = b.at(0x223).flags("Teleports Seen");
            let teleports_active = b.flags("Teleports Active");
            let stamps = Stamps::declare(b);
            let elevators = Elevators::declare(b);
            let mural_coords = MuralCoord::declare(b);
            let minimap = Minimap::declare(b, "Minimap Revealed");
            let pencil = Minimap::declare(b.at(0xD22D), "Minimap Pencil Layer");
            let destruction = Minimap::declare(b.at(0x1A06E), "Destroyed Blocks");
            let mural = Mural::declare(b.at(0x26EAF));
            let big_stalactites = BigStalactites::declare(b);
            let small_deposits_broken = b.at(0x26F98).bit_count("Small Deposits Broken", 8, 423);
            let icicles_broken = b.bit_count("Icicles Broken", 4, 159);
            let berries_eaten_while_full = b.at(0x26FFA).num("Berries Eaten While Full");
            b.at(SLOT_LEN);

            Self {
                index,
                payload: RawBytesField::new("Slot Data", base, SLOT_LEN),
                timestamp,
                cranks,
                locked_doors,
                moved_walls,
                steps,
                reservoirs,
                chests_opened,
                button_doors_opened,
                yellow_buttons_pressed,
                purple_buttons_pressed,
                green_buttons_pressed,
                picked_fruit,
                picked_firecrackers,
                eggs,
                walls_blasted,
                detonators_triggered,
                bunnies,
                illegal_bunnies,
                squirrels_scared,
                cat_status,
                firecrackers_collected,
                bubbles_popped,
                saves,
                pink_buttons_pressed,
                invalid_pink_buttons,
                nuts,
                layer1_chests_opened,
                layer2_buttons_pressed,
                keys,
                matches,
                firecrackers,
                health,
                gold_hearts,
                last_groundhog_year,
                egg_doors,
                ingame_ticks,
                total_ticks,
                spawn,
                equipment,
                inventory,
                candles,
                hits,
                deaths,
                ghosts_scared,
                selected_equipment,
                quest_state,
                blue_manticore,
                red_manticore,
                kangaroo,
                progress,
                flames,
                teleports_seen,
                teleports_active,
                stamps,
                elevators,
                mural_coords,
                minimap,
                pencil,
                destruction,
                mural,
                big_stalactites,
                small_deposits_broken,
                icicles_broken,
                berries_eaten_while_full,
            }
        })
    }

    pub fn base(&self) -> usize {
        self.payload.info().offset
    }

    /// A slot is in use once the game has stamped a save time on it.
    pub fn has_data(&self, store: &BufferStore) -> Result<bool> {
        Ok(!self.timestamp.read(store)?.is_zero())
    }

    pub fn export_bytes(&self, store: &BufferStore) -> Result<Vec<u8>> {
        Ok(self.payload.read(store)?.to_vec())
    }

    /// Overwrites the whole slot. The length is checked before anything is
    /// copied.
    pub fn import_bytes(&self, store: &mut BufferStore, data: &[u8]) -> Result<()> {
        if data.len() != SLOT_LEN {
            return Err(SaveError::SizeMismatch {
                what: "slot data",
                expected: SLOT_LEN,
                found: data.len(),
            });
        }
        self.payload.write(store, data)?;
        tracing::info!(slot = self.index + 1, "imported slot data");
        Ok(())
    }

    pub fn has_stolen_nut(&self, store: &BufferStore) -> Result<bool> {
        self.picked_fruit.is_set(store, STOLEN_NUT_BIT)
    }

    /// Fruit picked in the world; a stolen nut shares the bit group but is
    /// not counted.
    pub fn fruit_picked(&self, store: &BufferStore) -> Result<u32> {
        let count = self.picked_fruit.count(store)?;
        Ok(if self.has_stolen_nut(store)? {
            count.saturating_sub(1)
        } else {
            count
        })
    }

    /// Marks every chest opened, the layer-1 chest included.
    pub fn open_chests(&self, store: &mut BufferStore) -> Result<()> {
        self.chests_opened.fill(store)?;
        self.layer1_chests_opened.fill(store)
    }

    pub fn close_chests(&self, store: &mut BufferStore) -> Result<()> {
        self.chests_opened.clear(store)?;
        self.layer1_chests_opened.clear(store)
    }

    /// Presses every yellow, purple, green, pink and layer-2 button. Pink
    /// buttons belonging to illegal bunnies stay untouched.
    pub fn press_buttons(&self, store: &mut BufferStore) -> Result<()> {
        self.yellow_buttons_pressed.fill(store)?;
        self.purple_buttons_pressed.fill(store)?;
        self.green_buttons_pressed.fill(store)?;
        self.pink_buttons_pressed.enable_all(store)?;
        self.layer2_buttons_pressed.fill(store)
    }

    pub fn reset_buttons(&self, store: &mut BufferStore) -> Result<()> {
        self.yellow_buttons_pressed.clear(store)?;
        self.purple_buttons_pressed.clear(store)?;
        self.green_buttons_pressed.clear(store)?;
        self.pink_buttons_pressed.disable_all(store)?;
        self.layer2_buttons_pressed.clear(store)
    }
}
