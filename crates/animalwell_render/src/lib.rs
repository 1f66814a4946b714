use std::fmt::Write as _;

use animalwell_core::savegame::catalog::{FlameState, ManticoreState};
use animalwell_core::savegame::{SLOT_COUNT, Slot, format_ticks};
use animalwell_core::{BitflagSetField, BufferStore, ChoiceField, LabelEnum, Result, Savegame};
use animalwell_core::scalar::Scalar;
use serde_json::{Map as JsonMap, Value as JsonValue};

const LIST_COLUMNS: usize = 3;
const LIST_COL_WIDTH: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoOptions {
    /// Also list members that are not set (missing eggs, bunnies, ...).
    pub verbose: bool,
    /// Zero-based slot indices to report.
    pub slots: Vec<usize>,
}

impl Default for InfoOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            slots: (0..SLOT_COUNT).collect(),
        }
    }
}

pub fn render_info_text(save: &Savegame, options: &InfoOptions) -> Result<String> {
    let store = &save.store;
    let globals = &save.globals;
    let mut out = String::new();

    let header = format!("Animal Well Savegame v{}", globals.version.get(store)?);
    writeln!(&mut out, "{header}").expect("writing to String cannot fail");
    writeln!(&mut out, "{}", "-".repeat(header.len())).expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");
    writeln!(
        &mut out,
        " - Last-Used Slot: {}",
        u32::from(globals.last_used_slot.get(store)?) + 1
    )
    .expect("writing to String cannot fail");
    let checksum_note = if save.checksum_is_valid()? {
        ""
    } else {
        " (invalid)"
    };
    writeln!(
        &mut out,
        " - Checksum: 0x{:02X}{checksum_note}",
        globals.checksum.get(store)?
    )
    .expect("writing to String cannot fail");
    writeln!(
        &mut out,
        " - Frame Seed: {} (bunny mural: {}/50)",
        globals.frame_seed.get(store)?,
        globals.mural_variant(store)?
    )
    .expect("writing to String cannot fail");
    write_flag_lists(
        &mut out,
        1,
        "Unlockables",
        &globals.unlockables,
        store,
        options.verbose,
    )?;

    for &index in &options.slots {
        let slot = save.slot(index)?;
        if slot.has_data(store)? {
            write_slot_text(&mut out, slot, store, options.verbose)?;
        } else {
            let header = format!("Slot {}: No data!", slot.index + 1);
            writeln!(&mut out).expect("writing to String cannot fail");
            writeln!(&mut out, "{header}").expect("writing to String cannot fail");
            writeln!(&mut out, "{}", "-".repeat(header.len()))
                .expect("writing to String cannot fail");
        }
    }

    Ok(out)
}

pub fn render_info_json(save: &Savegame, options: &InfoOptions) -> Result<JsonValue> {
    let store = &save.store;
    let globals = &save.globals;
    let mut out = JsonMap::new();

    out.insert(
        "version".to_string(),
        JsonValue::from(globals.version.get(store)?),
    );
    out.insert(
        "last_used_slot".to_string(),
        JsonValue::from(u32::from(globals.last_used_slot.get(store)?) + 1),
    );
    out.insert(
        "checksum".to_string(),
        JsonValue::from(globals.checksum.get(store)?),
    );
    out.insert(
        "checksum_valid".to_string(),
        JsonValue::Bool(save.checksum_is_valid()?),
    );
    out.insert(
        "frame_seed".to_string(),
        JsonValue::from(globals.frame_seed.get(store)?),
    );
    out.insert(
        "mural_variant".to_string(),
        JsonValue::from(globals.mural_variant(store)?),
    );
    out.insert(
        "unlockables".to_string(),
        flags_to_json(&globals.unlockables, store)?,
    );
    if options.verbose {
        out.insert(
            "missing_unlockables".to_string(),
            missing_flags_to_json(&globals.unlockables, store)?,
        );
    }

    let mut slots = Vec::with_capacity(options.slots.len());
    for &index in &options.slots {
        slots.push(slot_to_json(save.slot(index)?, store, options.verbose)?);
    }
    out.insert("slots".to_string(), JsonValue::Array(slots));

    Ok(JsonValue::Object(out))
}

fn slot_to_json(slot: &Slot, store: &BufferStore, verbose: bool) -> Result<JsonValue> {
    let mut out = JsonMap::new();
    out.insert("slot".to_string(), JsonValue::from(slot.index + 1));
    let has_data = slot.has_data(store)?;
    out.insert("has_data".to_string(), JsonValue::Bool(has_data));
    if !has_data {
        return Ok(JsonValue::Object(out));
    }

    out.insert(
        "timestamp".to_string(),
        JsonValue::String(slot.timestamp.read(store)?.to_string()),
    );
    out.insert(
        "elapsed_time".to_string(),
        JsonValue::String(format_ticks(slot.total_ticks.get(store)?)),
    );
    out.insert(
        "ingame_time".to_string(),
        JsonValue::String(format_ticks(slot.ingame_ticks.get(store)?)),
    );
    out.insert("progress".to_string(), flags_to_json(&slot.progress, store)?);

    let (x, y) = slot.spawn.get(store)?;
    let mut spawn = JsonMap::new();
    spawn.insert("x".to_string(), JsonValue::from(x));
    spawn.insert("y".to_string(), JsonValue::from(y));
    out.insert("spawn".to_string(), JsonValue::Object(spawn));
    out.insert("health".to_string(), JsonValue::from(slot.health.get(store)?));
    out.insert(
        "gold_hearts".to_string(),
        JsonValue::from(slot.gold_hearts.get(store)?),
    );

    let mut counters = JsonMap::new();
    counters.insert("steps".to_string(), JsonValue::from(slot.steps.get(store)?));
    counters.insert("saves".to_string(), JsonValue::from(slot.saves.get(store)?));
    counters.insert("deaths".to_string(), JsonValue::from(slot.deaths.get(store)?));
    counters.insert("hits".to_string(), JsonValue::from(slot.hits.get(store)?));
    counters.insert(
        "firecrackers_collected".to_string(),
        JsonValue::from(slot.firecrackers_collected.get(store)?),
    );
    counters.insert(
        "bubbles_popped".to_string(),
        JsonValue::from(slot.bubbles_popped.get(store)?),
    );
    counters.insert(
        "berries_eaten_while_full".to_string(),
        JsonValue::from(slot.berries_eaten_while_full.get(store)?),
    );
    out.insert("counters".to_string(), JsonValue::Object(counters));

    let mut consumables = JsonMap::new();
    consumables.insert(
        "firecrackers".to_string(),
        JsonValue::from(slot.firecrackers.get(store)?),
    );
    consumables.insert("keys".to_string(), JsonValue::from(slot.keys.get(store)?));
    consumables.insert(
        "matches".to_string(),
        JsonValue::from(slot.matches.get(store)?),
    );
    consumables.insert("nuts".to_string(), JsonValue::from(slot.nuts.get(store)?));
    out.insert("consumables".to_string(), JsonValue::Object(consumables));

    out.insert(
        "equipment".to_string(),
        flags_to_json(&slot.equipment, store)?,
    );
    out.insert(
        "selected_equipment".to_string(),
        choice_to_json(&slot.selected_equipment, store)?,
    );
    out.insert(
        "inventory".to_string(),
        flags_to_json(&slot.inventory, store)?,
    );
    out.insert(
        "eggs".to_string(),
        JsonValue::from(slot.eggs.enabled(store)?.len()),
    );
    out.insert(
        "bunnies".to_string(),
        JsonValue::from(slot.bunnies.enabled(store)?.len()),
    );
    out.insert(
        "illegal_bunnies".to_string(),
        JsonValue::from(slot.illegal_bunnies.enabled(store)?.len()),
    );
    out.insert(
        "quest_state".to_string(),
        flags_to_json(&slot.quest_state, store)?,
    );

    let mut flames = JsonMap::new();
    for (letter, flame) in slot.flames.all() {
        flames.insert(letter.to_string(), choice_to_json(&flame, store)?);
    }
    out.insert("flames".to_string(), JsonValue::Object(flames));

    let mut kangaroo = JsonMap::new();
    kangaroo.insert(
        "next_room".to_string(),
        match slot.kangaroo.next_room(store)? {
            Some((x, y)) => JsonValue::from(vec![x, y]),
            None => JsonValue::Null,
        },
    );
    kangaroo.insert(
        "state".to_string(),
        choice_to_json(&slot.kangaroo.state, store)?,
    );
    kangaroo.insert(
        "shards_collected".to_string(),
        JsonValue::from(slot.kangaroo.num_collected(store)?),
    );
    kangaroo.insert(
        "shards_inserted".to_string(),
        JsonValue::from(slot.kangaroo.num_inserted(store)?),
    );
    out.insert("kangaroo".to_string(), JsonValue::Object(kangaroo));

    let mut transient = JsonMap::new();
    transient.insert(
        "fruit_picked".to_string(),
        JsonValue::from(slot.fruit_picked(store)?),
    );
    transient.insert(
        "stolen_nut".to_string(),
        JsonValue::Bool(slot.has_stolen_nut(store)?),
    );
    transient.insert(
        "firecrackers_picked".to_string(),
        JsonValue::from(slot.picked_firecrackers.count(store)?),
    );
    transient.insert(
        "ghosts_scared".to_string(),
        JsonValue::from(slot.ghosts_scared.count(store)?),
    );
    transient.insert(
        "small_deposits_broken".to_string(),
        JsonValue::from(slot.small_deposits_broken.count(store)?),
    );
    transient.insert(
        "icicles_broken".to_string(),
        JsonValue::from(slot.icicles_broken.count(store)?),
    );
    transient.insert(
        "stamps".to_string(),
        serde_json::to_value(slot.stamps.iter(store)?).unwrap_or(JsonValue::Null),
    );
    out.insert("transient".to_string(), JsonValue::Object(transient));

    let mut permanent = JsonMap::new();
    permanent.insert(
        "chests_opened".to_string(),
        JsonValue::from(slot.chests_opened.count(store)?),
    );
    permanent.insert(
        "layer1_chests_opened".to_string(),
        JsonValue::from(slot.layer1_chests_opened.count(store)?),
    );
    permanent.insert(
        "squirrels_scared".to_string(),
        JsonValue::from(slot.squirrels_scared.count(store)?),
    );
    permanent.insert(
        "yellow_buttons_pressed".to_string(),
        JsonValue::from(slot.yellow_buttons_pressed.count(store)?),
    );
    permanent.insert(
        "purple_buttons_pressed".to_string(),
        JsonValue::from(slot.purple_buttons_pressed.count(store)?),
    );
    permanent.insert(
        "green_buttons_pressed".to_string(),
        JsonValue::from(slot.green_buttons_pressed.count(store)?),
    );
    permanent.insert(
        "pink_buttons_pressed".to_string(),
        JsonValue::from(slot.pink_buttons_pressed.enabled(store)?.len()),
    );
    permanent.insert(
        "invalid_pink_buttons".to_string(),
        JsonValue::from(slot.invalid_pink_buttons.enabled(store)?.len()),
    );
    permanent.insert(
        "layer2_buttons_pressed".to_string(),
        JsonValue::from(slot.layer2_buttons_pressed.count(store)?),
    );
    permanent.insert(
        "button_doors_opened".to_string(),
        JsonValue::from(slot.button_doors_opened.count(store)?),
    );
    permanent.insert(
        "reservoirs_filled".to_string(),
        JsonValue::from(slot.reservoirs.num_filled(store)?),
    );
    permanent.insert("candles".to_string(), flags_to_json(&slot.candles, store)?);
    permanent.insert(
        "detonators_triggered".to_string(),
        JsonValue::from(slot.detonators_triggered.count(store)?),
    );
    permanent.insert(
        "walls_blasted".to_string(),
        JsonValue::from(slot.walls_blasted.count(store)?),
    );
    permanent.insert(
        "egg_doors".to_string(),
        flags_to_json(&slot.egg_doors, store)?,
    );
    permanent.insert("cats".to_string(), flags_to_json(&slot.cat_status, store)?);
    permanent.insert(
        "locked_doors_opened".to_string(),
        JsonValue::from(slot.locked_doors.len(store)?),
    );
    permanent.insert(
        "walls_moved".to_string(),
        serde_json::to_value(slot.moved_walls.iter(store)?).unwrap_or(JsonValue::Null),
    );
    permanent.insert(
        "blue_manticore".to_string(),
        choice_to_json(&slot.blue_manticore, store)?,
    );
    permanent.insert(
        "red_manticore".to_string(),
        choice_to_json(&slot.red_manticore, store)?,
    );
    out.insert("permanent".to_string(), JsonValue::Object(permanent));

    out.insert(
        "teleports".to_string(),
        flags_to_json(&slot.teleports_active, store)?,
    );

    if verbose {
        out.insert(
            "missing_equipment".to_string(),
            missing_flags_to_json(&slot.equipment, store)?,
        );
        out.insert(
            "missing_inventory".to_string(),
            missing_flags_to_json(&slot.inventory, store)?,
        );
        out.insert(
            "missing_eggs".to_string(),
            missing_flags_to_json(&slot.eggs, store)?,
        );
        out.insert(
            "missing_bunnies".to_string(),
            missing_flags_to_json(&slot.bunnies, store)?,
        );
        out.insert(
            "missing_teleports".to_string(),
            missing_flags_to_json(&slot.teleports_active, store)?,
        );
    }

    Ok(JsonValue::Object(out))
}

fn flags_to_json<T: Scalar, F: LabelEnum>(
    field: &BitflagSetField<T, F>,
    store: &BufferStore,
) -> Result<JsonValue> {
    Ok(JsonValue::Array(
        field
            .enabled(store)?
            .into_iter()
            .map(|flag| JsonValue::String(flag.name().to_string()))
            .collect(),
    ))
}

fn missing_flags_to_json<T: Scalar, F: LabelEnum>(
    field: &BitflagSetField<T, F>,
    store: &BufferStore,
) -> Result<JsonValue> {
    Ok(JsonValue::Array(
        field
            .disabled(store)?
            .into_iter()
            .map(|flag| JsonValue::String(flag.name().to_string()))
            .collect(),
    ))
}

/// The member name, or the raw number when the value is outside the catalog.
fn choice_to_json<T: Scalar, C: LabelEnum>(
    field: &ChoiceField<T, C>,
    store: &BufferStore,
) -> Result<JsonValue> {
    Ok(match field.choice(store)? {
        Some(choice) => JsonValue::String(choice.name().to_string()),
        None => {
            let raw: i128 = field.get(store)?.into();
            JsonValue::from(raw as i64)
        }
    })
}

fn choice_label<T: Scalar, C: LabelEnum>(
    field: &ChoiceField<T, C>,
    store: &BufferStore,
) -> Result<String> {
    Ok(match field.choice(store)? {
        Some(choice) => choice.label().to_string(),
        None => format!("Unknown ({})", field.get(store)?),
    })
}

fn write_slot_text(
    out: &mut String,
    slot: &Slot,
    store: &BufferStore,
    verbose: bool,
) -> Result<()> {
    let header = format!("Slot {}: {}", slot.index + 1, slot.timestamp.read(store)?);
    writeln!(out).expect("writing to String cannot fail");
    writeln!(out, "{header}").expect("writing to String cannot fail");
    writeln!(out, "{}", "-".repeat(header.len())).expect("writing to String cannot fail");
    writeln!(out).expect("writing to String cannot fail");

    let ingame = slot.ingame_ticks.get(store)?;
    let total = slot.total_ticks.get(store)?;
    let elapsed = if ingame == total {
        format_ticks(total)
    } else {
        format!("{} (ingame: {})", format_ticks(total), format_ticks(ingame))
    };
    writeln!(out, " - Elapsed Time: {elapsed}").expect("writing to String cannot fail");

    let progress = slot.progress.enabled(store)?;
    if !progress.is_empty() {
        let labels: Vec<&str> = progress.iter().map(|flag| flag.label()).collect();
        writeln!(out, " - Progress flags: {}", labels.join(", "))
            .expect("writing to String cannot fail");
    }
    let (x, y) = slot.spawn.get(store)?;
    writeln!(out, " - Saved in Room: ({x}, {y})").expect("writing to String cannot fail");

    let health = slot.health.get(store)?;
    let gold = match slot.gold_hearts.get(store)? {
        0 => String::new(),
        1 => " (1 gold heart)".to_string(),
        n => format!(" ({n} gold hearts)"),
    };
    writeln!(out, " - Health: {health}{gold}").expect("writing to String cannot fail");

    writeln!(out, " - Counters:").expect("writing to String cannot fail");
    writeln!(
        out,
        "   - Steps: {}",
        format_number_with_commas(u64::from(slot.steps.get(store)?))
    )
    .expect("writing to String cannot fail");
    writeln!(out, "   - Times Saved: {}", slot.saves.get(store)?)
        .expect("writing to String cannot fail");
    writeln!(
        out,
        "   - Times Died: {} (Times Hit: {})",
        slot.deaths.get(store)?,
        slot.hits.get(store)?
    )
    .expect("writing to String cannot fail");
    write_nonzero(
        out,
        "   - Firecrackers Collected",
        slot.firecrackers_collected.get(store)?,
    );
    write_nonzero(out, "   - Bubbles Popped", slot.bubbles_popped.get(store)?);
    write_nonzero(
        out,
        "   - Berries Eaten While Full",
        slot.berries_eaten_while_full.get(store)?,
    );

    writeln!(out, " - Consumables Inventory:").expect("writing to String cannot fail");
    write_nonzero(out, "   - Firecrackers", slot.firecrackers.get(store)?);
    writeln!(out, "   - Keys: {}", slot.keys.get(store)?).expect("writing to String cannot fail");
    writeln!(out, "   - Matches: {}", slot.matches.get(store)?)
        .expect("writing to String cannot fail");
    write_nonzero(out, "   - Nuts", slot.nuts.get(store)?);

    write_flag_lists(out, 1, "Equipment", &slot.equipment, store, verbose)?;
    if !slot.equipment.enabled(store)?.is_empty() {
        writeln!(
            out,
            " - Selected Equipment: {}",
            choice_label(&slot.selected_equipment, store)?
        )
        .expect("writing to String cannot fail");
    }
    write_flag_lists(out, 1, "Inventory", &slot.inventory, store, verbose)?;

    writeln!(out, " - Eggs Collected: {}", slot.eggs.enabled(store)?.len())
        .expect("writing to String cannot fail");
    if verbose {
        write_name_list(out, 1, "Missing Eggs", slot.eggs.disabled(store)?)?;
    }
    writeln!(
        out,
        " - Bunnies Collected: {}",
        slot.bunnies.enabled(store)?.len()
    )
    .expect("writing to String cannot fail");
    let illegal = slot.illegal_bunnies.enabled(store)?.len();
    if illegal > 0 {
        writeln!(out, " - Illegal Bunnies Collected: {illegal}")
            .expect("writing to String cannot fail");
        writeln!(
            out,
            "   WARNING: illegal bunnies make the BDTP puzzle unsolvable; clear them with --illegal-bunny-clear"
        )
        .expect("writing to String cannot fail");
    }
    if verbose {
        write_name_list(out, 1, "Missing Bunnies", slot.bunnies.disabled(store)?)?;
    }
    write_flag_lists(out, 1, "Quest State Flags", &slot.quest_state, store, verbose)?;

    let flames: Vec<_> = slot.flames.all().into_iter().collect();
    if flames
        .iter()
        .any(|(_, flame)| !matches!(flame.choice(store), Ok(Some(FlameState::Sealed))))
    {
        writeln!(out, " - Flame States:").expect("writing to String cannot fail");
        for (letter, flame) in flames {
            writeln!(
                out,
                "   - {}. Flame: {}",
                letter.to_ascii_uppercase(),
                choice_label(&flame, store)?
            )
            .expect("writing to String cannot fail");
        }
    }

    let collected = slot.kangaroo.num_collected(store)?;
    let inserted = slot.kangaroo.num_inserted(store)?;
    if collected + inserted > 0 {
        writeln!(out, " - K. Shards: {collected} collected, {inserted} inserted")
            .expect("writing to String cannot fail");
    }
    let room = match slot.kangaroo.next_room(store)? {
        Some((x, y)) => format!("({x}, {y})"),
        None => "unknown".to_string(),
    };
    writeln!(
        out,
        " - Next Kangaroo Room: {room}, {}",
        choice_label(&slot.kangaroo.state, store)?
    )
    .expect("writing to String cannot fail");

    writeln!(out, " - Transient Map Data:").expect("writing to String cannot fail");
    writeln!(out, "   - Fruit Picked: {}", slot.fruit_picked(store)?)
        .expect("writing to String cannot fail");
    if slot.has_stolen_nut(store)? {
        writeln!(out, "     - Also has stolen a nut from a squirrel")
            .expect("writing to String cannot fail");
    }
    write_nonzero(
        out,
        "   - Firecrackers Picked",
        slot.picked_firecrackers.count(store)?,
    );
    writeln!(out, "   - Ghosts Scared: {}", slot.ghosts_scared.count(store)?)
        .expect("writing to String cannot fail");
    write_nonzero(
        out,
        "   - Small Stalactites/Stalagmites Broken",
        slot.small_deposits_broken.count(store)?,
    );
    write_nonzero(
        out,
        "   - Icicles Broken",
        slot.icicles_broken.count(store)?,
    );
    write_nonzero(out, "   - Minimap Stamps", slot.stamps.len(store)?);

    writeln!(out, " - Permanent Map Data:").expect("writing to String cannot fail");
    writeln!(
        out,
        "   - Chests Opened: {}",
        slot.chests_opened.count(store)?
    )
    .expect("writing to String cannot fail");
    write_nonzero(
        out,
        "   - CE Temple Chests Opened",
        slot.layer1_chests_opened.count(store)?,
    );
    write_nonzero(
        out,
        "   - Squirrels Scared",
        slot.squirrels_scared.count(store)?,
    );
    write_nonzero(
        out,
        "   - Yellow Buttons Pressed",
        slot.yellow_buttons_pressed.count(store)?,
    );
    write_nonzero(
        out,
        "   - Purple Buttons Pressed",
        slot.purple_buttons_pressed.count(store)?,
    );
    write_nonzero(
        out,
        "   - Green Buttons Pressed",
        slot.green_buttons_pressed.count(store)?,
    );
    write_nonzero(
        out,
        "   - Valid Pink Buttons Pressed",
        slot.pink_buttons_pressed.enabled(store)?.len(),
    );
    let invalid_pink = slot.invalid_pink_buttons.enabled(store)?.len();
    if invalid_pink > 0 {
        writeln!(out, "   - Invalid Pink Buttons Pressed: {invalid_pink}")
            .expect("writing to String cannot fail");
        writeln!(
            out,
            "     WARNING: invalid pink buttons can corrupt the save; clear them with --clear-invalid-walls"
        )
        .expect("writing to String cannot fail");
    }
    write_nonzero(
        out,
        "   - Space / Bunny Island Buttons Pressed",
        slot.layer2_buttons_pressed.count(store)?,
    );
    write_nonzero(
        out,
        "   - Button-Activated Doors Opened",
        slot.button_doors_opened.count(store)?,
    );
    write_nonzero(
        out,
        "   - Reservoirs Filled",
        slot.reservoirs.num_filled(store)?,
    );
    let candles = slot.candles.enabled(store)?.len();
    if candles > 0 {
        writeln!(
            out,
            "   - Candles Lit: {candles}/{}",
            candles + slot.candles.disabled(store)?.len()
        )
        .expect("writing to String cannot fail");
    }
    write_nonzero(
        out,
        "   - Detonators Triggered",
        slot.detonators_triggered.count(store)?,
    );
    write_nonzero(
        out,
        "   - Walls Blasted",
        slot.walls_blasted.count(store)?,
    );
    write_nonzero(
        out,
        "   - Egg Doors Opened",
        slot.egg_doors.enabled(store)?.len(),
    );
    write_nonzero(
        out,
        "   - Cats Rescued",
        slot.cat_status.enabled(store)?.len(),
    );
    write_nonzero(
        out,
        "   - Lockable Doors Opened",
        slot.locked_doors.len(store)?,
    );
    let walls = slot.moved_walls.iter(store)?;
    write_nonzero(out, "   - Movable Walls Moved", walls.len());
    if walls.iter().any(|tile| slot.moved_walls.invalid().contains(tile)) {
        writeln!(
            out,
            "     WARNING: walls opened with the Cheater's Ring can corrupt the save; clear them with --clear-invalid-walls"
        )
        .expect("writing to String cannot fail");
    }
    for (name, manticore) in [
        ("Blue Manticore", &slot.blue_manticore),
        ("Red Manticore", &slot.red_manticore),
    ] {
        if !matches!(manticore.choice(store)?, Some(ManticoreState::Default)) {
            writeln!(out, "   - {name}: {}", choice_label(manticore, store)?)
                .expect("writing to String cannot fail");
        }
    }

    writeln!(
        out,
        " - Teleports Active: {}",
        slot.teleports_active.enabled(store)?.len()
    )
    .expect("writing to String cannot fail");
    if verbose {
        write_name_list(
            out,
            1,
            "Missing Teleports",
            slot.teleports_active.disabled(store)?,
        )?;
    }

    Ok(())
}

fn write_nonzero<N: Copy + Default + PartialOrd + std::fmt::Display>(
    out: &mut String,
    label: &str,
    value: N,
) {
    if value > N::default() {
        writeln!(out, "{label}: {value}").expect("writing to String cannot fail");
    }
}

/// Writes the enabled members of `field`, and the disabled ones too when
/// `verbose` is set.
fn write_flag_lists<T: Scalar, F: LabelEnum>(
    out: &mut String,
    indent: usize,
    title: &str,
    field: &BitflagSetField<T, F>,
    store: &BufferStore,
    verbose: bool,
) -> Result<()> {
    write_name_list(out, indent, title, field.enabled(store)?)?;
    if verbose {
        write_name_list(out, indent, &format!("Missing {title}"), field.disabled(store)?)?;
    }
    Ok(())
}

fn write_name_list<F: LabelEnum>(
    out: &mut String,
    indent: usize,
    title: &str,
    members: impl IntoIterator<Item = F>,
) -> Result<()> {
    let labels: Vec<&str> = members.into_iter().map(|member| member.label()).collect();
    if labels.is_empty() {
        return Ok(());
    }
    let pad = " ".repeat(indent);
    writeln!(out, "{pad}- {title}:").expect("writing to String cannot fail");
    for row in labels.chunks(LIST_COLUMNS) {
        let line: String = row
            .iter()
            .map(|label| fit_column(label, LIST_COL_WIDTH))
            .collect();
        writeln!(out, "{pad}    {}", line.trim_end()).expect("writing to String cannot fail");
    }
    Ok(())
}

fn fit_column(value: &str, width: usize) -> String {
    let mut s = value.chars().take(width).collect::<String>();
    let len = s.chars().count();
    if len < width {
        s.push_str(&" ".repeat(width - len));
    }
    s
}

fn format_number_with_commas(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commas_group_thousands() {
        assert_eq!(format_number_with_commas(0), "0");
        assert_eq!(format_number_with_commas(999), "999");
        assert_eq!(format_number_with_commas(1_000), "1,000");
        assert_eq!(format_number_with_commas(12_345_678), "12,345,678");
    }

    #[test]
    fn columns_pad_and_truncate() {
        assert_eq!(fit_column("abc", 5), "abc  ");
        assert_eq!(fit_column("abcdefgh", 4), "abcd");
    }
}
