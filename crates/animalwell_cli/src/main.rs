use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use animalwell_core::codec::{Dither, EncodeOptions, Resample, load_raster};
use animalwell_core::savegame::catalog::{
    BigStalactiteState, Bunny, CandleState, CatStatus, Egg, Equipment, Equipped, FlameState,
    Inventory, KangarooShardState, ManticoreState, Progress, QuestState, Teleport, Unlockable,
};
use animalwell_core::savegame::{MinimapTarget, SLOT_COUNT, Slot};
use animalwell_core::scalar::Scalar;
use animalwell_core::{
    BitflagSetField, BufferStore, ChecksumPolicy, LabelEnum, NumericField, Result, SaveError,
    Savegame, parse_name, resolve_names,
};
use animalwell_render::{InfoOptions, render_info_json, render_info_text};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

const FLAME_LETTERS: [char; 4] = ['b', 'p', 'v', 'g'];
const HOUSE_DOORS: [QuestState; 3] = [
    QuestState::HouseOpen,
    QuestState::OfficeOpen,
    QuestState::ClosetOpen,
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum DitherArg {
    None,
    FloydSteinberg,
    Ordered,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ResampleArg {
    Disabled,
    Nearest,
    Smooth,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(value_name = "AnimalWell.sav")]
    path: PathBuf,
    #[arg(short, long)]
    info: bool,
    #[arg(short, long)]
    verbose: bool,
    #[arg(long)]
    json: bool,
    /// Dump the field layout to stderr and log at debug level.
    #[arg(long)]
    debug: bool,
    /// Overwrite existing files when exporting.
    #[arg(long)]
    force: bool,
    /// Write the edited save here instead of back to the input file.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
    #[arg(long = "fix-checksum")]
    fix_checksum: bool,
    #[arg(long = "invalid-checksum", conflicts_with = "force_checksum")]
    invalid_checksum: bool,
    #[arg(long = "force-checksum", value_name = "BYTE", value_parser = parse_byte)]
    force_checksum: Option<u8>,
    /// Slot to operate on, 1-3, or 0 for all slots.
    #[arg(
        short,
        long,
        default_value_t = 0,
        value_parser = clap::value_parser!(u8).range(0..=3)
    )]
    slot: u8,
    #[arg(long = "import-slot", value_name = "FILE")]
    import_slot: Option<PathBuf>,
    #[arg(long = "export-slot", value_name = "FILE")]
    export_slot: Option<PathBuf>,

    #[arg(long = "frame-seed")]
    frame_seed: Option<u32>,
    #[arg(long = "globals-enable", value_delimiter = ',', value_name = "NAMES")]
    globals_enable: Vec<String>,
    #[arg(long = "globals-disable", value_delimiter = ',', value_name = "NAMES")]
    globals_disable: Vec<String>,

    #[arg(long)]
    health: Option<u8>,
    #[arg(long = "gold-hearts")]
    gold_hearts: Option<u8>,
    #[arg(long, value_name = "X,Y", value_parser = parse_coord)]
    spawn: Option<(u32, u32)>,
    #[arg(long)]
    steps: Option<u32>,
    #[arg(long)]
    deaths: Option<u16>,
    #[arg(long)]
    saves: Option<u16>,
    #[arg(long = "bubbles-popped")]
    bubbles_popped: Option<u16>,
    #[arg(long = "berries-eaten-while-full")]
    berries_eaten_while_full: Option<u16>,
    #[arg(long)]
    ticks: Option<u32>,
    #[arg(long = "ticks-copy-ingame")]
    ticks_copy_ingame: bool,
    #[arg(long)]
    firecrackers: Option<u8>,
    #[arg(long)]
    keys: Option<u8>,
    #[arg(long)]
    matches: Option<u8>,
    #[arg(long)]
    nuts: Option<u8>,

    #[arg(long = "equip-enable", value_delimiter = ',', value_name = "NAMES")]
    equip_enable: Vec<String>,
    #[arg(long = "equip-disable", value_delimiter = ',', value_name = "NAMES")]
    equip_disable: Vec<String>,
    #[arg(long, value_name = "NAME")]
    equipped: Option<String>,
    #[arg(long = "inventory-enable", value_delimiter = ',', value_name = "NAMES")]
    inventory_enable: Vec<String>,
    #[arg(long = "inventory-disable", value_delimiter = ',', value_name = "NAMES")]
    inventory_disable: Vec<String>,
    #[arg(long = "progress-enable", value_delimiter = ',', value_name = "NAMES")]
    progress_enable: Vec<String>,
    #[arg(long = "progress-disable", value_delimiter = ',', value_name = "NAMES")]
    progress_disable: Vec<String>,
    #[arg(long = "quest-state-enable", value_delimiter = ',', value_name = "NAMES")]
    quest_state_enable: Vec<String>,
    #[arg(long = "quest-state-disable", value_delimiter = ',', value_name = "NAMES")]
    quest_state_disable: Vec<String>,
    #[arg(long = "cats-free", value_delimiter = ',', value_name = "NAMES")]
    cats_free: Vec<String>,
    #[arg(long = "cats-cage", value_delimiter = ',', value_name = "NAMES")]
    cats_cage: Vec<String>,
    #[arg(long = "teleport-enable", value_delimiter = ',', value_name = "NAMES")]
    teleport_enable: Vec<String>,
    #[arg(long = "teleport-disable", value_delimiter = ',', value_name = "NAMES")]
    teleport_disable: Vec<String>,
    #[arg(long = "egg-enable", value_delimiter = ',', value_name = "NAMES")]
    egg_enable: Vec<String>,
    #[arg(long = "egg-disable", value_delimiter = ',', value_name = "NAMES")]
    egg_disable: Vec<String>,
    #[arg(long = "bunny-enable", value_delimiter = ',', value_name = "NAMES")]
    bunny_enable: Vec<String>,
    #[arg(long = "bunny-disable", value_delimiter = ',', value_name = "NAMES")]
    bunny_disable: Vec<String>,
    #[arg(long = "illegal-bunny-clear")]
    illegal_bunny_clear: bool,
    #[arg(long = "candles-enable", value_delimiter = ',', value_name = "NAMES")]
    candles_enable: Vec<String>,
    #[arg(long = "candles-disable", value_delimiter = ',', value_name = "NAMES")]
    candles_disable: Vec<String>,
    #[arg(long = "flame-collect", value_delimiter = ',', value_name = "b|p|v|g|all")]
    flame_collect: Vec<String>,
    #[arg(long = "flame-use", value_delimiter = ',', value_name = "b|p|v|g|all")]
    flame_use: Vec<String>,
    #[arg(long = "blue-manticore", value_name = "STATE")]
    blue_manticore: Option<String>,
    #[arg(long = "red-manticore", value_name = "STATE")]
    red_manticore: Option<String>,
    #[arg(long = "big-stalactites-state", value_name = "STATE")]
    big_stalactites_state: Option<String>,
    /// Next kangaroo room: 0 (6,6), 1 (9,11), 2 (12,11), 3 (9,13), 4 (16,16).
    #[arg(long = "kangaroo-room", value_parser = clap::value_parser!(u8).range(0..=4))]
    kangaroo_room: Option<u8>,
    #[arg(
        long = "kshard-collect",
        conflicts_with = "kshard_insert",
        value_parser = clap::value_parser!(u8).range(1..=3)
    )]
    kshard_collect: Option<u8>,
    #[arg(long = "kshard-insert", value_parser = clap::value_parser!(u8).range(1..=3))]
    kshard_insert: Option<u8>,

    #[arg(long = "respawn-consumables")]
    respawn_consumables: bool,
    #[arg(long = "clear-ghosts")]
    clear_ghosts: bool,
    #[arg(long = "respawn-ghosts")]
    respawn_ghosts: bool,
    #[arg(long = "respawn-squirrels")]
    respawn_squirrels: bool,
    #[arg(long = "buttons-press")]
    buttons_press: bool,
    #[arg(long = "buttons-reset")]
    buttons_reset: bool,
    #[arg(long = "doors-open")]
    doors_open: bool,
    #[arg(long = "doors-close")]
    doors_close: bool,
    #[arg(long = "eggdoor-open")]
    eggdoor_open: bool,
    #[arg(long = "eggdoor-close")]
    eggdoor_close: bool,
    #[arg(long = "lockable-unlock", conflicts_with = "lockable_lock")]
    lockable_unlock: bool,
    #[arg(long = "lockable-lock")]
    lockable_lock: bool,
    #[arg(long = "walls-open", conflicts_with = "walls_close")]
    walls_open: bool,
    #[arg(long = "walls-close")]
    walls_close: bool,
    /// Drop wall records only reachable by cheating, plus their pink buttons.
    #[arg(long = "clear-invalid-walls")]
    clear_invalid_walls: bool,
    #[arg(long = "house-open", conflicts_with = "house_close")]
    house_open: bool,
    #[arg(long = "house-close")]
    house_close: bool,
    #[arg(long = "chests-open")]
    chests_open: bool,
    #[arg(long = "chests-close")]
    chests_close: bool,
    #[arg(long = "reservoirs-fill")]
    reservoirs_fill: bool,
    #[arg(long = "reservoirs-empty")]
    reservoirs_empty: bool,
    #[arg(long = "detonators-activate")]
    detonators_activate: bool,
    #[arg(long = "detonators-rearm")]
    detonators_rearm: bool,
    #[arg(long = "respawn-destroyed-tiles")]
    respawn_destroyed_tiles: bool,
    #[arg(long = "small-deposits-break")]
    small_deposits_break: bool,
    #[arg(long = "small-deposits-respawn")]
    small_deposits_respawn: bool,
    /// Set puzzle cranks to a solved position. The seahorse crank is skipped.
    #[arg(long = "solve-cranks")]
    solve_cranks: bool,

    #[arg(long = "reveal-map")]
    reveal_map: bool,
    #[arg(long = "clear-map")]
    clear_map: bool,
    #[arg(long = "clear-pencil")]
    clear_pencil: bool,
    #[arg(long = "clear-stamps")]
    clear_stamps: bool,
    #[arg(long = "pencil-image-export", value_name = "PNG")]
    pencil_image_export: Option<PathBuf>,
    #[arg(long = "pencil-image-import", value_name = "IMAGE")]
    pencil_image_import: Option<PathBuf>,
    #[arg(long = "pencil-image-playable")]
    pencil_image_playable: bool,
    #[arg(long = "pencil-image-invert")]
    pencil_image_invert: bool,

    #[arg(long = "mural-clear")]
    mural_clear: bool,
    #[arg(long = "mural-default")]
    mural_default: bool,
    #[arg(long = "mural-solved")]
    mural_solved: bool,
    #[arg(long = "mural-raw-export", value_name = "FILE")]
    mural_raw_export: Option<PathBuf>,
    #[arg(long = "mural-raw-import", value_name = "FILE")]
    mural_raw_import: Option<PathBuf>,
    #[arg(long = "mural-image-export", value_name = "PNG")]
    mural_image_export: Option<PathBuf>,
    #[arg(long = "mural-image-import", value_name = "IMAGE")]
    mural_image_import: Option<PathBuf>,

    /// Dithering used when importing images to the pencil layer.
    #[arg(long, value_enum, default_value_t = DitherArg::FloydSteinberg)]
    dither: DitherArg,
    /// Resampling used when an imported image is not the native size.
    #[arg(long, value_enum, default_value_t = ResampleArg::Smooth)]
    resample: ResampleArg,
}

impl Cli {
    fn slot_indexes(&self) -> Vec<usize> {
        match self.slot {
            0 => (0..SLOT_COUNT).collect(),
            n => vec![usize::from(n) - 1],
        }
    }

    fn checksum_policy(&self) -> ChecksumPolicy {
        if self.invalid_checksum {
            ChecksumPolicy::Invalid
        } else if let Some(byte) = self.force_checksum {
            ChecksumPolicy::Force(byte)
        } else {
            ChecksumPolicy::Repair
        }
    }

    fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            resample: match self.resample {
                ResampleArg::Disabled => Resample::Disabled,
                ResampleArg::Nearest => Resample::Nearest,
                ResampleArg::Smooth => Resample::Smooth,
            },
            dither: match self.dither {
                DitherArg::None => Dither::None,
                DitherArg::FloydSteinberg => Dither::FloydSteinberg,
                DitherArg::Ordered => Dither::Ordered,
            },
            invert: self.pencil_image_invert,
            ..EncodeOptions::default()
        }
    }

    fn has_single_slot_actions(&self) -> bool {
        self.import_slot.is_some()
            || self.export_slot.is_some()
            || self.mural_raw_export.is_some()
            || self.mural_raw_import.is_some()
            || self.mural_image_export.is_some()
            || self.mural_image_import.is_some()
            || self.pencil_image_export.is_some()
            || self.pencil_image_import.is_some()
    }

    fn has_slot_actions(&self) -> bool {
        self.has_single_slot_actions()
            || self.health.is_some()
            || self.gold_hearts.is_some()
            || self.spawn.is_some()
            || self.steps.is_some()
            || self.deaths.is_some()
            || self.saves.is_some()
            || self.bubbles_popped.is_some()
            || self.berries_eaten_while_full.is_some()
            || self.ticks.is_some()
            || self.ticks_copy_ingame
            || self.firecrackers.is_some()
            || self.keys.is_some()
            || self.matches.is_some()
            || self.nuts.is_some()
            || !self.equip_enable.is_empty()
            || !self.equip_disable.is_empty()
            || self.equipped.is_some()
            || !self.inventory_enable.is_empty()
            || !self.inventory_disable.is_empty()
            || !self.progress_enable.is_empty()
            || !self.progress_disable.is_empty()
            || !self.quest_state_enable.is_empty()
            || !self.quest_state_disable.is_empty()
            || !self.cats_free.is_empty()
            || !self.cats_cage.is_empty()
            || !self.teleport_enable.is_empty()
            || !self.teleport_disable.is_empty()
            || !self.egg_enable.is_empty()
            || !self.egg_disable.is_empty()
            || !self.bunny_enable.is_empty()
            || !self.bunny_disable.is_empty()
            || self.illegal_bunny_clear
            || !self.candles_enable.is_empty()
            || !self.candles_disable.is_empty()
            || !self.flame_collect.is_empty()
            || !self.flame_use.is_empty()
            || self.blue_manticore.is_some()
            || self.red_manticore.is_some()
            || self.big_stalactites_state.is_some()
            || self.kangaroo_room.is_some()
            || self.kshard_collect.is_some()
            || self.kshard_insert.is_some()
            || self.respawn_consumables
            || self.clear_ghosts
            || self.respawn_ghosts
            || self.respawn_squirrels
            || self.buttons_press
            || self.buttons_reset
            || self.doors_open
            || self.doors_close
            || self.eggdoor_open
            || self.eggdoor_close
            || self.lockable_unlock
            || self.lockable_lock
            || self.walls_open
            || self.walls_close
            || self.clear_invalid_walls
            || self.house_open
            || self.house_close
            || self.chests_open
            || self.chests_close
            || self.reservoirs_fill
            || self.reservoirs_empty
            || self.detonators_activate
            || self.detonators_rearm
            || self.respawn_destroyed_tiles
            || self.small_deposits_break
            || self.small_deposits_respawn
            || self.solve_cranks
            || self.reveal_map
            || self.clear_map
            || self.clear_pencil
            || self.clear_stamps
            || self.mural_clear
            || self.mural_default
            || self.mural_solved
    }
}

/// Symbolic command-line names resolved against the catalogs before the
/// save is touched.
#[derive(Debug, Default)]
struct ResolvedNames {
    globals_enable: Vec<Unlockable>,
    globals_disable: Vec<Unlockable>,
    equip_enable: Vec<Equipment>,
    equip_disable: Vec<Equipment>,
    equipped: Option<Equipped>,
    inventory_enable: Vec<Inventory>,
    inventory_disable: Vec<Inventory>,
    progress_enable: Vec<Progress>,
    progress_disable: Vec<Progress>,
    quest_state_enable: Vec<QuestState>,
    quest_state_disable: Vec<QuestState>,
    cats_free: Vec<CatStatus>,
    cats_cage: Vec<CatStatus>,
    teleport_enable: Vec<Teleport>,
    teleport_disable: Vec<Teleport>,
    egg_enable: Vec<Egg>,
    egg_disable: Vec<Egg>,
    bunny_enable: Vec<Bunny>,
    bunny_disable: Vec<Bunny>,
    candles_enable: Vec<CandleState>,
    candles_disable: Vec<CandleState>,
    flame_collect: Vec<char>,
    flame_use: Vec<char>,
    blue_manticore: Option<ManticoreState>,
    red_manticore: Option<ManticoreState>,
    big_stalactites_state: Option<BigStalactiteState>,
}

impl ResolvedNames {
    fn from_cli(cli: &Cli) -> Result<Self> {
        Ok(Self {
            globals_enable: resolve_names("Unlockables", &cli.globals_enable)?,
            globals_disable: resolve_names("Unlockables", &cli.globals_disable)?,
            equip_enable: resolve_names("Equipment", &cli.equip_enable)?,
            equip_disable: resolve_names("Equipment", &cli.equip_disable)?,
            equipped: cli.equipped.as_deref().map(parse_name).transpose()?,
            inventory_enable: resolve_names("Inventory", &cli.inventory_enable)?,
            inventory_disable: resolve_names("Inventory", &cli.inventory_disable)?,
            progress_enable: resolve_names("Progress", &cli.progress_enable)?,
            progress_disable: resolve_names("Progress", &cli.progress_disable)?,
            quest_state_enable: resolve_names("Quest State", &cli.quest_state_enable)?,
            quest_state_disable: resolve_names("Quest State", &cli.quest_state_disable)?,
            cats_free: resolve_names("Cat Status", &cli.cats_free)?,
            cats_cage: resolve_names("Cat Status", &cli.cats_cage)?,
            teleport_enable: resolve_names("Teleports", &cli.teleport_enable)?,
            teleport_disable: resolve_names("Teleports", &cli.teleport_disable)?,
            egg_enable: resolve_names("Eggs", &cli.egg_enable)?,
            egg_disable: resolve_names("Eggs", &cli.egg_disable)?,
            bunny_enable: resolve_names("Bunnies", &cli.bunny_enable)?,
            bunny_disable: resolve_names("Bunnies", &cli.bunny_disable)?,
            candles_enable: resolve_names("Candles", &cli.candles_enable)?,
            candles_disable: resolve_names("Candles", &cli.candles_disable)?,
            flame_collect: resolve_flames(&cli.flame_collect)?,
            flame_use: resolve_flames(&cli.flame_use)?,
            blue_manticore: cli.blue_manticore.as_deref().map(parse_name).transpose()?,
            red_manticore: cli.red_manticore.as_deref().map(parse_name).transpose()?,
            big_stalactites_state: cli
                .big_stalactites_state
                .as_deref()
                .map(parse_name)
                .transpose()?,
        })
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if cli.slot == 0 && cli.has_single_slot_actions() {
        eprintln!("Slot, mural and pencil import/export require a single --slot (1-3)");
        process::exit(2);
    }
    let names = ResolvedNames::from_cli(&cli).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(2);
    });

    let mut save = Savegame::open(&cli.path).unwrap_or_else(|e| {
        eprintln!("Error opening {}: {e}", cli.path.display());
        process::exit(1);
    });
    tracing::debug!(
        path = %cli.path.display(),
        checksum_valid = save.checksum_valid_on_load(),
        "opened savegame"
    );

    if cli.debug {
        eprintln!("Showing data offsets:");
        eprintln!();
        eprint!("{}", save.layout().render());
        eprintln!();
    }

    if cli.info || cli.json {
        let options = InfoOptions {
            verbose: cli.verbose,
            slots: cli.slot_indexes(),
        };
        let rendered = if cli.json {
            render_info_json(&save, &options).and_then(|json| {
                serde_json::to_string_pretty(&json).map_err(|e| {
                    SaveError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
                })
            })
        } else {
            render_info_text(&save, &options)
        };
        match rendered {
            Ok(text) => println!("{}", text.trim_end()),
            Err(e) => {
                eprintln!("Error rendering info: {e}");
                process::exit(1);
            }
        }
    }

    let changed = apply_edits(&cli, &names, &mut save).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });

    if changed || cli.fix_checksum {
        let policy = cli.checksum_policy();
        if policy == ChecksumPolicy::Invalid {
            println!("NOTICE: Intentionally writing an invalid checksum.");
        }
        let destination = cli.output.clone().unwrap_or_else(|| cli.path.clone());
        let checksum = save.commit(&destination, policy).unwrap_or_else(|e| {
            eprintln!("Error writing {}: {e}", destination.display());
            process::exit(1);
        });
        println!("Wrote changes!  New checksum: 0x{checksum:02X}");
    } else if cli.has_slot_actions() {
        println!("No file modifications were necessary!");
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn apply_edits(cli: &Cli, names: &ResolvedNames, save: &mut Savegame) -> Result<bool> {
    let mut changed = false;
    let do_slot_actions = cli.has_slot_actions();

    for index in cli.slot_indexes() {
        let slot = &save.slots[index];
        let label = format!("Slot {}", index + 1);

        if let Some(path) = &cli.import_slot {
            println!("{label}: Importing slot data from: {}", path.display());
            slot.import_bytes(&mut save.store, &fs::read(path)?)?;
            changed = true;
        }

        if slot.has_data(&save.store)? {
            changed |= edit_slot(cli, names, &mut save.store, slot, &label)?;
        } else if do_slot_actions {
            println!("{label}: No data detected, so slot modifications skipped");
        }

        if let Some(path) = &cli.export_slot {
            let data = slot.export_bytes(&save.store)?;
            write_export(path, &data, cli.force, &format!("{label}: Slot data"))?;
        }
    }

    let globals = &save.globals;
    let store = &mut save.store;
    if let Some(seed) = cli.frame_seed {
        println!("Globals: Setting frame seed to: {seed}");
        globals.frame_seed.set(store, seed)?;
        changed = true;
    }
    changed |= toggle_flags(
        store,
        &globals.unlockables,
        &names.globals_enable,
        &names.globals_disable,
        "Globals",
        "global unlockable",
    )?;

    Ok(changed)
}

fn edit_slot(
    cli: &Cli,
    names: &ResolvedNames,
    store: &mut BufferStore,
    slot: &Slot,
    label: &str,
) -> Result<bool> {
    let mut changed = false;

    changed |= update(store, slot.health, cli.health, label, "health")?;
    changed |= update(store, slot.gold_hearts, cli.gold_hearts, label, "gold hearts count")?;
    if let Some(room) = cli.spawn {
        println!("{label}: Setting spawnpoint to ({}, {})", room.0, room.1);
        slot.spawn.set(store, room)?;
        changed = true;
    }
    changed |= update(store, slot.steps, cli.steps, label, "steps taken")?;
    changed |= update(store, slot.deaths, cli.deaths, label, "death count")?;
    changed |= update(store, slot.saves, cli.saves, label, "save count")?;
    changed |= update(store, slot.bubbles_popped, cli.bubbles_popped, label, "bubbles-popped count")?;
    changed |= update(
        store,
        slot.berries_eaten_while_full,
        cli.berries_eaten_while_full,
        label,
        "berries eaten while full count",
    )?;
    if let Some(ticks) = cli.ticks {
        println!("{label}: Updating tick count to: {ticks}");
        slot.ingame_ticks.set(store, ticks)?;
        slot.total_ticks.set(store, ticks)?;
        changed = true;
    }
    if cli.ticks_copy_ingame {
        println!("{label}: Copying ingame tick count to with-paused tick count");
        let ingame = slot.ingame_ticks.get(store)?;
        slot.total_ticks.set(store, ingame)?;
        changed = true;
    }
    changed |= update(store, slot.firecrackers, cli.firecrackers, label, "firecracker count")?;
    changed |= update(store, slot.keys, cli.keys, label, "key count")?;
    changed |= update(store, slot.matches, cli.matches, label, "match count")?;
    changed |= update(store, slot.nuts, cli.nuts, label, "stolen nut count")?;

    changed |= toggle_flags(
        store,
        &slot.equipment,
        &names.equip_enable,
        &names.equip_disable,
        label,
        "equipment",
    )?;
    if let Some(item) = names.equipped {
        println!("{label}: Setting currently-equipped item to: {item}");
        slot.selected_equipment.set_choice(store, item)?;
        changed = true;
    }
    changed |= toggle_flags(
        store,
        &slot.inventory,
        &names.inventory_enable,
        &names.inventory_disable,
        label,
        "inventory item",
    )?;
    changed |= toggle_flags(
        store,
        &slot.progress,
        &names.progress_enable,
        &names.progress_disable,
        label,
        "progress flag",
    )?;
    changed |= toggle_flags(
        store,
        &slot.quest_state,
        &names.quest_state_enable,
        &names.quest_state_disable,
        label,
        "quest state",
    )?;
    changed |= toggle_flags(
        store,
        &slot.cat_status,
        &names.cats_free,
        &names.cats_cage,
        label,
        "cat",
    )?;
    changed |= toggle_flags(
        store,
        &slot.teleports_active,
        &names.teleport_enable,
        &names.teleport_disable,
        label,
        "teleport",
    )?;
    changed |= toggle_flags(
        store,
        &slot.eggs,
        &names.egg_enable,
        &names.egg_disable,
        label,
        "egg",
    )?;
    changed |= toggle_flags(
        store,
        &slot.bunnies,
        &names.bunny_enable,
        &names.bunny_disable,
        label,
        "bunny",
    )?;
    if cli.illegal_bunny_clear && !slot.illegal_bunnies.enabled(store)?.is_empty() {
        println!("{label}: Clearing illegal bunnies");
        slot.illegal_bunnies.disable_all(store)?;
        changed = true;
    }
    changed |= toggle_flags(
        store,
        &slot.candles,
        &names.candles_enable,
        &names.candles_disable,
        label,
        "candle",
    )?;

    for (letters, state) in [
        (&names.flame_collect, FlameState::Collected),
        (&names.flame_use, FlameState::Used),
    ] {
        for &letter in letters {
            if let Some(flame) = slot.flames.by_letter(letter) {
                println!(
                    "{label}: Setting {}. Flame to: {state}",
                    letter.to_ascii_uppercase()
                );
                flame.set_choice(store, state)?;
                changed = true;
            }
        }
    }
    for (name, field, state) in [
        ("Blue Manticore", slot.blue_manticore, names.blue_manticore),
        ("Red Manticore", slot.red_manticore, names.red_manticore),
    ] {
        if let Some(state) = state {
            println!("{label}: Setting {name} to: {state}");
            field.set_choice(store, state)?;
            changed = true;
        }
    }
    if let Some(state) = names.big_stalactites_state {
        println!("{label}: Setting all big stalactites to state: {state}");
        slot.big_stalactites.set_all(store, state)?;
        changed = true;
    }
    if let Some(room) = cli.kangaroo_room {
        println!("{label}: Setting next kangaroo room to: {room}");
        slot.kangaroo.force_room(store, room)?;
        changed = true;
    }
    for (count, state, verb) in [
        (cli.kshard_collect, KangarooShardState::Collected, "collected"),
        (cli.kshard_insert, KangarooShardState::Inserted, "inserted"),
    ] {
        if let Some(count) = count {
            println!("{label}: Setting total number of {verb} K. Shards to: {count}");
            slot.kangaroo.set_shard_state(store, usize::from(count), state)?;
            changed = true;
        }
    }

    if cli.respawn_consumables {
        println!("{label}: Respawning fruit and firecrackers");
        slot.picked_fruit.clear(store)?;
        slot.picked_firecrackers.clear(store)?;
        changed = true;
    }
    if cli.clear_ghosts {
        println!("{label}: Clearing ghosts");
        slot.ghosts_scared.fill(store)?;
        changed = true;
    }
    if cli.respawn_ghosts {
        println!("{label}: Respawning ghosts");
        slot.ghosts_scared.clear(store)?;
        changed = true;
    }
    if cli.respawn_squirrels {
        println!("{label}: Respawning squirrels");
        slot.squirrels_scared.clear(store)?;
        changed = true;
    }
    if cli.buttons_press {
        println!("{label}: Marking all buttons as pressed");
        slot.press_buttons(store)?;
        changed = true;
    }
    if cli.buttons_reset {
        println!("{label}: Marking all buttons as not pressed");
        slot.reset_buttons(store)?;
        changed = true;
    }
    if cli.doors_open {
        println!("{label}: Opening all button-activated doors");
        slot.button_doors_opened.fill(store)?;
        changed = true;
    }
    if cli.doors_close {
        println!("{label}: Closing all button-activated doors");
        slot.button_doors_opened.clear(store)?;
        changed = true;
    }
    if cli.eggdoor_open {
        println!("{label}: Opening all egg doors");
        slot.egg_doors.enable_all(store)?;
        changed = true;
    }
    if cli.eggdoor_close {
        println!("{label}: Closing all egg doors");
        slot.egg_doors.disable_all(store)?;
        changed = true;
    }
    if cli.lockable_unlock {
        println!("{label}: Unlocking all lockable doors");
        slot.locked_doors.fill(store)?;
        changed = true;
    }
    if cli.lockable_lock {
        println!("{label}: Locking all lockable doors");
        slot.locked_doors.clear(store)?;
        changed = true;
    }
    if cli.clear_invalid_walls {
        println!("{label}: Clearing invalid wall-opening records");
        let removed = slot.moved_walls.remove_invalid(store)?;
        tracing::debug!(slot = slot.index + 1, removed, "removed invalid wall records");
        slot.invalid_pink_buttons.disable_all(store)?;
        changed = true;
    }
    if cli.walls_open {
        println!("{label}: Opening all movable walls");
        slot.moved_walls.fill(store)?;
        changed = true;
    }
    if cli.walls_close {
        println!("{label}: Closing all movable walls");
        slot.moved_walls.clear(store)?;
        changed = true;
    }
    if cli.house_open {
        println!("{label}: Marking doors around the house as opened");
        for state in HOUSE_DOORS {
            slot.quest_state.enable(store, state)?;
        }
        changed = true;
    }
    if cli.house_close {
        println!("{label}: Marking doors around the house as closed");
        for state in HOUSE_DOORS {
            slot.quest_state.disable(store, state)?;
        }
        changed = true;
    }
    if cli.chests_open {
        println!("{label}: Opening all chests");
        slot.open_chests(store)?;
        changed = true;
    }
    if cli.chests_close {
        println!("{label}: Closing all chests");
        slot.close_chests(store)?;
        changed = true;
    }
    if cli.reservoirs_fill {
        println!("{label}: Filling all reservoirs");
        slot.reservoirs.fill(store)?;
        changed = true;
    }
    if cli.reservoirs_empty {
        println!("{label}: Emptying all reservoirs");
        slot.reservoirs.empty(store)?;
        changed = true;
    }
    if cli.detonators_activate {
        println!("{label}: Activating all shortcut detonators");
        slot.walls_blasted.fill(store)?;
        slot.detonators_triggered.fill(store)?;
        changed = true;
    }
    if cli.detonators_rearm {
        println!("{label}: Re-arming all shortcut detonators");
        if !cli.respawn_destroyed_tiles {
            println!(
                "NOTICE: In order to fill in destroyed passageways, also specify --respawn-destroyed-tiles"
            );
        }
        slot.walls_blasted.clear(store)?;
        slot.detonators_triggered.clear(store)?;
        changed = true;
    }
    if cli.respawn_destroyed_tiles {
        println!("{label}: Respawning all destroyed tiles");
        slot.destruction.clear_map(store, false)?;
        changed = true;
    }
    if cli.small_deposits_break {
        println!("{label}: Breaking all small stalactites/stalagmites/icicles");
        slot.small_deposits_broken.fill(store)?;
        slot.icicles_broken.fill(store)?;
        changed = true;
    }
    if cli.small_deposits_respawn {
        println!("{label}: Respawning all small stalactites/stalagmites/icicles");
        slot.small_deposits_broken.clear(store)?;
        slot.icicles_broken.clear(store)?;
        changed = true;
    }
    if cli.solve_cranks {
        println!("{label}: Setting crank puzzles to solved states (excluding Seahorse Boss)");
        slot.cranks.solve(store)?;
        changed = true;
    }

    if cli.reveal_map {
        println!("{label}: Revealing entire minimap");
        slot.minimap.fill_map(store, true)?;
        changed = true;
    }
    if cli.clear_map {
        println!("{label}: Clearing entire minimap");
        slot.minimap.clear_map(store, false)?;
        changed = true;
    }
    if cli.clear_pencil {
        println!("{label}: Clearing all minimap pencil drawings");
        slot.pencil.clear_map(store, false)?;
        changed = true;
    }
    if cli.clear_stamps {
        println!("{label}: Clearing all minimap stamps");
        slot.stamps.clear(store)?;
        changed = true;
    }
    if let Some(path) = &cli.pencil_image_import {
        println!(
            "{label}: Importing image \"{}\" to pencil minimap layer",
            path.display()
        );
        let target = if cli.pencil_image_playable {
            MinimapTarget::Playable
        } else {
            MinimapTarget::Full
        };
        let image = load_raster(&fs::read(path)?)?;
        slot.pencil
            .import_image(store, &image, target, &cli.encode_options())?;
        changed = true;
    }
    if let Some(path) = &cli.pencil_image_export {
        let png = slot.pencil.export_png(store)?;
        write_export(path, &png, cli.force, &format!("{label}: Pencil minimap layer"))?;
    }

    if cli.mural_clear {
        println!("{label}: Clearing bunny mural");
        slot.mural.clear(store)?;
        changed = true;
    }
    if cli.mural_default {
        println!("{label}: Restoring bunny mural to its default state");
        slot.mural.to_default(store)?;
        changed = true;
    }
    if cli.mural_solved {
        println!("{label}: Setting bunny mural to its solved state");
        slot.mural.to_solved(store)?;
        changed = true;
    }
    if let Some(path) = &cli.mural_raw_import {
        println!("{label}: Importing raw mural data from: {}", path.display());
        slot.mural.import_raw(store, &fs::read(path)?)?;
        changed = true;
    }
    if let Some(path) = &cli.mural_image_import {
        println!("{label}: Importing mural image from: {}", path.display());
        let image = load_raster(&fs::read(path)?)?;
        let options = EncodeOptions {
            invert: false,
            ..cli.encode_options()
        };
        slot.mural.import_image(store, &image, &options)?;
        changed = true;
    }
    if let Some(path) = &cli.mural_raw_export {
        let data = slot.mural.export_raw(store)?;
        write_export(path, &data, cli.force, &format!("{label}: Raw mural data"))?;
    }
    if let Some(path) = &cli.mural_image_export {
        let png = slot.mural.export_png(store)?;
        write_export(path, &png, cli.force, &format!("{label}: Mural image"))?;
    }

    Ok(changed)
}

fn update<T: Scalar>(
    store: &mut BufferStore,
    field: NumericField<T>,
    value: Option<T>,
    label: &str,
    what: &str,
) -> Result<bool> {
    let Some(value) = value else {
        return Ok(false);
    };
    println!("{label}: Updating {what} to: {value}");
    field.set(store, value)?;
    Ok(true)
}

/// Applies disables before enables, touching only flags whose state differs.
fn toggle_flags<T: Scalar, F: LabelEnum>(
    store: &mut BufferStore,
    field: &BitflagSetField<T, F>,
    enable: &[F],
    disable: &[F],
    label: &str,
    what: &str,
) -> Result<bool> {
    let mut changed = false;
    for &flag in disable {
        if field.is_enabled(store, flag)? {
            println!("{label}: Disabling {what}: {flag}");
            field.disable(store, flag)?;
            changed = true;
        }
    }
    for &flag in enable {
        if !field.is_enabled(store, flag)? {
            println!("{label}: Enabling {what}: {flag}");
            field.enable(store, flag)?;
            changed = true;
        }
    }
    Ok(changed)
}

fn write_export(path: &Path, data: &[u8], force: bool, what: &str) -> Result<()> {
    if path.exists() && !force {
        println!(
            "NOTICE: {what} NOT exported, {} already exists (use --force to overwrite)",
            path.display()
        );
        return Ok(());
    }
    fs::write(path, data)?;
    println!("{what} exported to: {}", path.display());
    Ok(())
}

fn resolve_flames(values: &[String]) -> Result<Vec<char>> {
    let mut letters = Vec::new();
    for value in values {
        let value = value.trim().to_ascii_lowercase();
        let picked: Vec<char> = if value == "all" {
            FLAME_LETTERS.to_vec()
        } else {
            match value.chars().collect::<Vec<_>>().as_slice() {
                [letter] if FLAME_LETTERS.contains(letter) => vec![*letter],
                _ => {
                    return Err(SaveError::UnknownFlag {
                        field: "Flames",
                        name: value,
                    });
                }
            }
        };
        for letter in picked {
            if !letters.contains(&letter) {
                letters.push(letter);
            }
        }
    }
    Ok(letters)
}

fn parse_coord(value: &str) -> std::result::Result<(u32, u32), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{value}'"))?;
    let x = x
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid X '{x}': {e}"))?;
    let y = y
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid Y '{y}': {e}"))?;
    Ok((x, y))
}

fn parse_byte(value: &str) -> std::result::Result<u8, String> {
    let trimmed = value.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => trimmed.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid byte '{value}': {e}"))
}
