use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use animalwell_core::codec::{EncodeOptions, Resample, load_raster};
use animalwell_core::savegame::catalog::{
    Bunny, Equipment, Equipped, FlameState, IllegalBunny, PinkButton, StampIcon,
};
use animalwell_core::savegame::{
    DateTimeParts, MAP_BYTES, MAP_ROOMS_X, MURAL_HEIGHT, MURAL_SOLVED, MURAL_WIDTH, MinimapTarget,
    ROOM_HEIGHT, ROOM_WIDTH, SAVE_LEN, SAVE_VERSION, SLOT_BASES, SLOT_LEN, Stamps,
};
use animalwell_core::{ChecksumPolicy, ErrorCode, LabelEnum, SaveError, Savegame, resolve_names};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};

fn blank_bytes() -> Vec<u8> {
    let mut bytes = vec![0u8; SAVE_LEN];
    bytes[..4].copy_from_slice(&SAVE_VERSION.to_le_bytes());
    bytes[0x0D] = bytes.iter().fold(0u8, |acc, byte| acc ^ byte);
    bytes
}

fn blank_save() -> Savegame {
    Savegame::from_bytes(blank_bytes()).expect("blank save should open")
}

fn temp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "animalwell_core_{name}_{}_{nanos}.dat",
        std::process::id()
    ))
}

#[test]
fn numeric_fields_round_trip_and_reject_overflow() {
    let mut save = blank_save();
    let slot = &save.slots[1];

    slot.keys.set(&mut save.store, 7).expect("set keys");
    assert_eq!(slot.keys.get(&save.store).expect("get keys"), 7);
    assert_eq!(save.store.as_bytes()[SLOT_BASES[1] + 0x1B1], 7);

    slot.steps.set(&mut save.store, 0x0102_0304).expect("set steps");
    let at = SLOT_BASES[1] + 0x108;
    assert_eq!(&save.store.as_bytes()[at..at + 4], &[4, 3, 2, 1]);

    let err = slot
        .keys
        .set_checked(&mut save.store, 256)
        .expect_err("256 does not fit in a byte");
    assert_eq!(err.code(), ErrorCode::Range);
    assert_eq!(slot.keys.get(&save.store).expect("get keys"), 7);
}

#[test]
fn flags_are_independent() {
    let mut save = blank_save();
    let slot = &save.slots[0];

    slot.equipment.enable(&mut save.store, Equipment::Yoyo).expect("enable");
    slot.equipment.enable(&mut save.store, Equipment::Disc).expect("enable");
    slot.equipment.disable(&mut save.store, Equipment::Yoyo).expect("disable");

    let enabled = slot.equipment.enabled(&save.store).expect("read flags");
    assert_eq!(enabled.into_iter().collect::<Vec<_>>(), vec![Equipment::Disc]);
    assert_eq!(
        slot.equipment.get(&save.store).expect("raw"),
        Equipment::Disc.raw() as u16
    );

    let err = slot
        .equipment
        .enable_named(&mut save.store, "jetpack")
        .expect_err("unknown flag");
    assert!(matches!(err, SaveError::UnknownFlag { .. }));
}

#[test]
fn all_expands_to_every_declared_bunny() {
    let mut save = blank_save();
    let slot = &save.slots[0];

    let bunnies: Vec<Bunny> = resolve_names("Bunnies", &["all"]).expect("all resolves");
    for bunny in &bunnies {
        slot.bunnies.enable(&mut save.store, *bunny).expect("enable bunny");
    }
    assert_eq!(
        slot.bunnies.enabled(&save.store).expect("read").len(),
        Bunny::ALL.len()
    );
    assert!(
        slot.illegal_bunnies
            .enabled(&save.store)
            .expect("read")
            .is_empty()
    );

    slot.illegal_bunnies
        .enable(&mut save.store, IllegalBunny::ALL[0])
        .expect("enable illegal");
    slot.illegal_bunnies
        .disable_all(&mut save.store)
        .expect("clear illegal");
    assert_eq!(
        slot.bunnies.enabled(&save.store).expect("read").len(),
        Bunny::ALL.len()
    );
}

#[test]
fn unknown_choice_values_round_trip() {
    let mut save = blank_save();
    let slot = &save.slots[2];

    slot.selected_equipment
        .set_choice(&mut save.store, Equipped::Wheel)
        .expect("set choice");
    assert_eq!(
        slot.selected_equipment.choice(&save.store).expect("read"),
        Some(Equipped::Wheel)
    );

    slot.selected_equipment
        .set(&mut save.store, 0xEE)
        .expect("raw write");
    assert_eq!(slot.selected_equipment.choice(&save.store).expect("read"), None);
    assert_eq!(slot.selected_equipment.get(&save.store).expect("raw"), 0xEE);

    slot.flames
        .by_letter('V')
        .expect("violet flame")
        .set_choice(&mut save.store, FlameState::Collected)
        .expect("set flame");
    assert_eq!(
        slot.flames.v.choice(&save.store).expect("read"),
        Some(FlameState::Collected)
    );
}

#[test]
fn repaired_checksum_is_idempotent() {
    let mut save = blank_save();
    save.slots[0]
        .health
        .set(&mut save.store, 12)
        .expect("set health");
    assert!(!save.checksum_is_valid().expect("verify"));

    let region = *save.checksum_region();
    let first = region.repair(&mut save.store).expect("repair");
    let second = region.repair(&mut save.store).expect("repair again");
    assert_eq!(first, second);
    assert!(save.checksum_is_valid().expect("verify"));
}

#[test]
fn checksum_policies_control_the_written_byte() {
    let path = temp_path("policies");
    let mut save = blank_save();
    save.slots[0].nuts.set(&mut save.store, 3).expect("set nuts");
    let computed = save.checksum_region().compute(&save.store).expect("compute");

    let written = save
        .commit(&path, ChecksumPolicy::Invalid)
        .expect("commit invalid");
    assert_eq!(written, computed ^ 0xFF);

    let written = save
        .commit(&path, ChecksumPolicy::Force(0x42))
        .expect("commit forced");
    assert_eq!(written, 0x42);
    assert_eq!(fs::read(&path).expect("read back")[0x0D], 0x42);

    let reopened = Savegame::open(&path).expect("reopen");
    assert!(!reopened.checksum_valid_on_load());
    assert_eq!(reopened.path(), Some(path.as_path()));

    let _ = fs::remove_file(&path);
}

#[test]
fn fixing_the_checksum_changes_only_the_checksum_byte() {
    let path = temp_path("fix");
    let mut bytes = blank_bytes();
    bytes[SLOT_BASES[0] + 0x1B4] = 5;
    fs::write(&path, &bytes).expect("write fixture");

    let mut save = Savegame::open(&path).expect("open fixture");
    assert!(!save.checksum_valid_on_load());
    save.save(ChecksumPolicy::Repair).expect("save");

    let after = fs::read(&path).expect("read back");
    let changed: Vec<usize> = (0..SAVE_LEN).filter(|&i| bytes[i] != after[i]).collect();
    assert_eq!(changed, vec![0x0D]);
    assert!(Savegame::open(&path).expect("reopen").checksum_valid_on_load());

    let _ = fs::remove_file(&path);
}

#[test]
fn slot_import_requires_exact_length() {
    let mut save = blank_save();
    let before = save.store.as_bytes().to_vec();
    let slot = &save.slots[1];

    for len in [SLOT_LEN - 1, SLOT_LEN + 1] {
        let err = slot
            .import_bytes(&mut save.store, &vec![0xAB; len])
            .expect_err("wrong length");
        assert_eq!(err.code(), ErrorCode::SizeMismatch);
        assert_eq!(save.store.as_bytes(), before.as_slice());
    }

    slot.import_bytes(&mut save.store, &vec![0xAB; SLOT_LEN])
        .expect("exact length");
    assert_eq!(
        slot.export_bytes(&save.store).expect("export"),
        vec![0xAB; SLOT_LEN]
    );
    assert_eq!(save.store.as_bytes()[SLOT_BASES[1] - 1], 0);
    assert_eq!(save.store.as_bytes()[SLOT_BASES[2]], 0);
}

#[test]
fn slot_data_follows_the_timestamp() {
    let mut save = blank_save();
    let slot = &save.slots[0];
    assert!(!slot.has_data(&save.store).expect("read"));

    let when = DateTimeParts {
        year: 2024,
        month: 5,
        day: 9,
        hour: 12,
        minute: 30,
        second: 1,
    };
    slot.timestamp.write(&mut save.store, &when).expect("write");
    assert!(slot.has_data(&save.store).expect("read"));
    assert_eq!(slot.timestamp.read(&save.store).expect("read"), when);
    assert!(!save.slots[1].has_data(&save.store).expect("read"));
}

#[test]
fn stolen_nut_is_not_counted_as_fruit() {
    let mut save = blank_save();
    let slot = &save.slots[0];
    slot.picked_fruit.set_bit(&mut save.store, 3).expect("fruit");
    slot.picked_fruit.set_bit(&mut save.store, 64 + 51).expect("nut");

    assert!(slot.has_stolen_nut(&save.store).expect("read"));
    assert_eq!(slot.picked_fruit.count(&save.store).expect("count"), 2);
    assert_eq!(slot.fruit_picked(&save.store).expect("fruit"), 1);
}

#[test]
fn button_groups_fill_declared_bits_only() {
    let mut save = blank_save();
    let slot = &save.slots[0];
    slot.press_buttons(&mut save.store).expect("press");

    assert_eq!(slot.yellow_buttons_pressed.count(&save.store).expect("count"), 134);
    assert_eq!(slot.purple_buttons_pressed.count(&save.store).expect("count"), 27);
    assert_eq!(slot.green_buttons_pressed.count(&save.store).expect("count"), 7);
    assert_eq!(slot.layer2_buttons_pressed.count(&save.store).expect("count"), 4);
    assert_eq!(
        slot.pink_buttons_pressed.enabled(&save.store).expect("read").len(),
        PinkButton::ALL.len()
    );
    assert!(
        slot.invalid_pink_buttons
            .enabled(&save.store)
            .expect("read")
            .is_empty()
    );

    slot.reset_buttons(&mut save.store).expect("reset");
    assert_eq!(slot.yellow_buttons_pressed.count(&save.store).expect("count"), 0);

    slot.open_chests(&mut save.store).expect("open");
    assert_eq!(slot.chests_opened.count(&save.store).expect("count"), 102);
    assert_eq!(slot.layer1_chests_opened.count(&save.store).expect("count"), 1);
}

#[test]
fn mural_png_round_trip_is_lossless() {
    let mut save = blank_save();
    let mural = save.slots[0].mural;
    mural.to_solved(&mut save.store).expect("solve");

    let png = mural.export_png(&save.store).expect("export");
    mural.clear(&mut save.store).expect("clear");
    let image = load_raster(&png).expect("decode png");
    mural
        .import_image(&mut save.store, &image, &EncodeOptions::default())
        .expect("import");

    assert_eq!(
        mural.export_raw(&save.store).expect("raw"),
        MURAL_SOLVED.to_vec()
    );
    let err = mural
        .import_raw(&mut save.store, &[0u8; 199])
        .expect_err("short mural");
    assert_eq!(err.code(), ErrorCode::SizeMismatch);
}

#[test]
fn pencil_png_round_trip_is_lossless() {
    let mut save = blank_save();
    let pencil = save.slots[0].pencil;
    pencil.fill_room(&mut save.store, 4, 6).expect("room");
    pencil.fill_room(&mut save.store, 19, 23).expect("corner room");
    let before = pencil.field().read(&save.store).expect("raw").to_vec();

    let png = pencil.export_png(&save.store).expect("export");
    pencil.clear_map(&mut save.store, false).expect("clear");
    let image = load_raster(&png).expect("decode png");
    pencil
        .import_image(
            &mut save.store,
            &image,
            MinimapTarget::Full,
            &EncodeOptions::default(),
        )
        .expect("import");

    assert_eq!(pencil.field().read(&save.store).expect("raw"), before.as_slice());
}

#[test]
fn wrong_size_image_without_resampling_is_rejected() {
    let mut save = blank_save();
    let pencil = save.slots[0].pencil;
    let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(100, 100, Luma([255])));
    let options = EncodeOptions {
        resample: Resample::Disabled,
        ..EncodeOptions::default()
    };

    let err = pencil
        .import_image(&mut save.store, &image, MinimapTarget::Playable, &options)
        .expect_err("size mismatch");
    assert_eq!(err.code(), ErrorCode::DimensionMismatch);
    assert_eq!(pencil.lit_pixels(&save.store).expect("count"), 0);
}

#[test]
fn playable_import_lands_inside_the_padding() {
    let mut save = blank_save();
    let pencil = save.slots[0].pencil;
    let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(640, 352, Luma([255])));

    pencil
        .import_image(
            &mut save.store,
            &image,
            MinimapTarget::Playable,
            &EncodeOptions::default(),
        )
        .expect("import");
    assert_eq!(pencil.lit_pixels(&save.store).expect("count"), 640 * 352);
    assert_eq!(pencil.field().read(&save.store).expect("raw")[0], 0);
}

#[test]
fn stamp_removal_moves_the_last_entry() {
    let mut save = blank_save();
    let stamps = &save.slots[0].stamps;
    stamps.push(&mut save.store, 1, 1, StampIcon::ALL[0]).expect("push");
    stamps.push(&mut save.store, 2, 2, StampIcon::ALL[1]).expect("push");
    stamps.push(&mut save.store, 3, 3, StampIcon::ALL[2]).expect("push");

    stamps.remove(&mut save.store, 0).expect("remove");
    let left = stamps.iter(&save.store).expect("read");
    assert_eq!(left.len(), 2);
    assert_eq!((left[0].x, left[0].y), (3, 3));
    assert_eq!((left[1].x, left[1].y), (2, 2));

    assert!(matches!(
        stamps.get(&save.store, 2),
        Err(SaveError::StampIndex { index: 2, len: 2 })
    ));
}

#[test]
fn stamps_serialize_for_reports() {
    let mut save = blank_save();
    let stamps = &save.slots[0].stamps;
    stamps.push(&mut save.store, 10, 20, StampIcon::ALL[0]).expect("push");

    let json = serde_json::to_value(stamps.iter(&save.store).expect("read")).expect("json");
    assert_eq!(json[0]["x"], 10);
    assert_eq!(json[0]["y"], 20);
    assert_eq!(
        serde_json::to_value(Equipment::UvLight).expect("json"),
        serde_json::json!("uvlight")
    );
}

#[test]
fn mural_import_snaps_off_palette_colours_to_nearest() {
    let mut save = blank_save();
    let mural = save.slots[0].mural;
    let near = [
        [0x10, 0x10, 0x28],
        [0x50, 0xD0, 0xF0],
        [0xF0, 0x50, 0x70],
        [0xF5, 0xF0, 0xD0],
    ];
    let image = RgbImage::from_fn(MURAL_WIDTH, MURAL_HEIGHT, |x, y| {
        Rgb(near[((x + y) % 4) as usize])
    });

    mural
        .import_image(
            &mut save.store,
            &DynamicImage::ImageRgb8(image),
            &EncodeOptions::default(),
        )
        .expect("import");

    let exported = mural.export_image(&save.store).expect("export");
    for (i, &index) in exported.indices.iter().enumerate() {
        let (x, y) = (i as u32 % MURAL_WIDTH, i as u32 / MURAL_WIDTH);
        assert_eq!(u32::from(index), (x + y) % 4, "pixel ({x}, {y})");
    }
}

#[test]
fn stamps_stop_at_capacity() {
    let mut save = blank_save();
    let stamps = &save.slots[0].stamps;
    for i in 0..Stamps::CAPACITY as u16 {
        stamps
            .push(&mut save.store, i, i, StampIcon::ALL[0])
            .expect("push within capacity");
    }

    let err = stamps
        .push(&mut save.store, 99, 99, StampIcon::ALL[0])
        .expect_err("list is full");
    assert!(matches!(err, SaveError::StampsFull(64)));
    assert_eq!(stamps.len(&save.store).expect("len"), Stamps::CAPACITY);
    let last = stamps.get(&save.store, Stamps::CAPACITY - 1).expect("last");
    assert_eq!((last.x, last.y), (63, 63));
}

#[test]
fn clear_room_touches_only_that_room() {
    let mut save = blank_save();
    let minimap = save.slots[0].minimap;
    minimap.fill_map(&mut save.store, false).expect("fill");
    minimap.clear_room(&mut save.store, 3, 5).expect("clear room");

    let room_pixels = ROOM_WIDTH * ROOM_HEIGHT;
    assert_eq!(
        minimap.lit_pixels(&save.store).expect("count"),
        MAP_BYTES as u32 * 8 - room_pixels
    );

    let bytes = minimap.field().read(&save.store).expect("raw");
    let room_bytes = ROOM_WIDTH as usize / 8;
    let row_bytes = room_bytes * MAP_ROOMS_X as usize;
    let origin = 5 * ROOM_HEIGHT as usize * row_bytes + 3 * room_bytes;
    for row in 0..ROOM_HEIGHT as usize {
        let start = origin + row * row_bytes;
        assert_eq!(&bytes[start..start + room_bytes], &[0u8; 5]);
        assert_eq!(bytes[start - 1], 0xFF);
        assert_eq!(bytes[start + room_bytes], 0xFF);
    }
    assert_eq!(bytes[origin - row_bytes], 0xFF);
    assert_eq!(bytes[origin + ROOM_HEIGHT as usize * row_bytes], 0xFF);
}
