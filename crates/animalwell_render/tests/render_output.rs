use animalwell_core::savegame::catalog::{
    Egg, Equipment, Equipped, IllegalBunny, KangarooShardState,
};
use animalwell_core::savegame::{DateTimeParts, INVALID_WALLS, SAVE_LEN, SAVE_VERSION};
use animalwell_core::{ChecksumPolicy, LabelEnum, Savegame};
use animalwell_render::{InfoOptions, render_info_json, render_info_text};

fn sample_save() -> Savegame {
    let mut bytes = vec![0u8; SAVE_LEN];
    bytes[..4].copy_from_slice(&SAVE_VERSION.to_le_bytes());
    let mut save = Savegame::from_bytes(bytes).expect("blank save should open");

    let store = &mut save.store;
    save.globals
        .frame_seed
        .set(store, 123)
        .expect("set frame seed");
    let slot = &save.slots[0];
    slot.timestamp
        .write(
            store,
            &DateTimeParts {
                year: 2024,
                month: 5,
                day: 9,
                hour: 12,
                minute: 30,
                second: 1,
            },
        )
        .expect("timestamp");
    slot.steps.set(store, 1_234_567).expect("steps");
    slot.health.set(store, 8).expect("health");
    slot.gold_hearts.set(store, 2).expect("gold hearts");
    slot.total_ticks.set(store, 60 * 61).expect("ticks");
    slot.ingame_ticks.set(store, 60 * 61).expect("ticks");
    slot.equipment.enable(store, Equipment::Yoyo).expect("yoyo");
    slot.selected_equipment
        .set_choice(store, Equipped::Yoyo)
        .expect("equip yoyo");
    slot.eggs.enable(store, Egg::ALL[0]).expect("egg");
    slot.illegal_bunnies
        .enable(store, IllegalBunny::ALL[0])
        .expect("illegal bunny");
    let region = *save.checksum_region();
    region
        .apply(&mut save.store, ChecksumPolicy::Repair)
        .expect("repair");
    save
}

#[test]
fn text_report_lists_globals_and_used_slots() {
    let save = sample_save();
    let text = render_info_text(&save, &InfoOptions::default()).expect("render");

    assert!(text.starts_with("Animal Well Savegame v9\n-----------------------\n"));
    assert!(text.contains(" - Last-Used Slot: 1\n"));
    assert!(text.contains(" - Frame Seed: 123 (bunny mural: 24/50)\n"));
    assert!(text.contains("Slot 1: 2024-05-09 12:30:01\n"));
    assert!(text.contains(" - Elapsed Time: 0:01:01:00\n"));
    assert!(text.contains(" - Health: 8 (2 gold hearts)\n"));
    assert!(text.contains("   - Steps: 1,234,567\n"));
    assert!(text.contains(" - Selected Equipment: Yoyo\n"));
    assert!(text.contains(" - Eggs Collected: 1\n"));
    assert!(text.contains(" - Illegal Bunnies Collected: 1\n"));
    assert!(text.contains("\nSlot 2: No data!\n"));
    assert!(!text.contains("Missing Eggs"));
}

#[test]
fn verbose_text_report_lists_missing_members() {
    let save = sample_save();
    let options = InfoOptions {
        verbose: true,
        slots: vec![0],
    };
    let text = render_info_text(&save, &options).expect("render");
    assert!(text.contains(" - Missing Eggs:"));
    assert!(text.contains(" - Missing Equipment:"));
}

#[test]
fn json_report_uses_fixed_key_order() {
    let save = sample_save();
    let value = render_info_json(&save, &InfoOptions::default()).expect("render");
    let keys: Vec<&str> = value
        .as_object()
        .expect("json should be an object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        keys,
        vec![
            "version",
            "last_used_slot",
            "checksum",
            "checksum_valid",
            "frame_seed",
            "mural_variant",
            "unlockables",
            "slots",
        ]
    );

    assert_eq!(value["checksum_valid"], true);
    assert_eq!(value["mural_variant"], 24);
    let slots = value["slots"].as_array().expect("slots array");
    assert_eq!(slots.len(), 3);
    assert_eq!(slots[0]["has_data"], true);
    assert_eq!(slots[0]["equipment"], serde_json::json!(["yoyo"]));
    assert_eq!(slots[0]["selected_equipment"], "yoyo");
    assert_eq!(slots[0]["counters"]["steps"], 1_234_567);
    assert_eq!(slots[1], serde_json::json!({"slot": 2, "has_data": false}));
}

#[test]
fn unknown_choice_renders_as_raw_number() {
    let mut save = sample_save();
    save.slots[0]
        .selected_equipment
        .set(&mut save.store, 0x7F)
        .expect("raw write");
    let value = render_info_json(
        &save,
        &InfoOptions {
            verbose: false,
            slots: vec![0],
        },
    )
    .expect("render");
    assert_eq!(value["slots"][0]["selected_equipment"], 0x7F);
    assert_eq!(value["checksum_valid"], false);
}

#[test]
fn out_of_range_slot_is_an_error() {
    let save = sample_save();
    let options = InfoOptions {
        verbose: false,
        slots: vec![3],
    };
    assert!(render_info_text(&save, &options).is_err());
}

#[test]
fn world_state_is_reported() {
    let mut save = sample_save();
    let slot = save.slots[0].clone();
    let store = &mut save.store;
    slot.moved_walls.push(store, INVALID_WALLS[1]).expect("invalid wall");
    slot.locked_doors.fill(store).expect("unlock doors");
    slot.kangaroo.force_room(store, 4).expect("kangaroo room");
    slot.kangaroo
        .set_shard_state(store, 1, KangarooShardState::Inserted)
        .expect("insert shard");

    let options = InfoOptions {
        verbose: false,
        slots: vec![0],
    };
    let text = render_info_text(&save, &options).expect("render");
    assert!(text.contains(" - K. Shards: 0 collected, 1 inserted\n"));
    assert!(text.contains(" - Next Kangaroo Room: (16, 16), Lurking\n"));
    assert!(text.contains("   - Lockable Doors Opened: 6\n"));
    assert!(text.contains("   - Movable Walls Moved: 1\n"));
    assert!(text.contains("--clear-invalid-walls"));

    let json = render_info_json(&save, &options).expect("json");
    let slot = &json["slots"][0];
    assert_eq!(slot["kangaroo"]["next_room"], serde_json::json!([16, 16]));
    assert_eq!(slot["kangaroo"]["state"], "lurking");
    assert_eq!(slot["kangaroo"]["shards_inserted"], 1);
    assert_eq!(slot["permanent"]["locked_doors_opened"], 6);
    assert_eq!(slot["permanent"]["walls_moved"][0]["room_x"], 3);
}
