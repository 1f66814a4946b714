use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use animalwell_core::savegame::catalog::{KangarooActivityState, QuestState};
use animalwell_core::savegame::{
    DateTimeParts, INVALID_WALLS, LOCKED_DOORS, MOVED_WALLS, SAVE_LEN, SAVE_VERSION, SLOT_LEN,
};
use animalwell_core::{ChecksumPolicy, Savegame};
use serde_json::Value;

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_animalwell-se"))
        .args(args)
        .output()
        .expect("failed to run animalwell-se CLI")
}

fn temp_output_path(prefix: &str, extension: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "{prefix}_{}_{}.{extension}",
        std::process::id(),
        nanos
    ))
}

/// Writes a save whose first slot is in use and whose checksum is valid.
fn write_sample_save(prefix: &str) -> PathBuf {
    let mut bytes = vec![0u8; SAVE_LEN];
    bytes[..4].copy_from_slice(&SAVE_VERSION.to_le_bytes());
    let mut save = Savegame::from_bytes(bytes).expect("blank save should open");
    let slot = &save.slots[0];
    slot.timestamp
        .write(
            &mut save.store,
            &DateTimeParts {
                year: 2024,
                month: 5,
                day: 9,
                hour: 8,
                minute: 15,
                second: 0,
            },
        )
        .expect("timestamp");
    slot.health.set(&mut save.store, 4).expect("health");

    let path = temp_output_path(prefix, "sav");
    save.commit(&path, ChecksumPolicy::Repair)
        .expect("write sample save");
    path
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

#[test]
fn info_reports_used_and_empty_slots() {
    let path = write_sample_save("aw_cli_info");
    let output = run_cli(&["--info", &path_arg(&path)]);
    let _ = fs::remove_file(&path);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Animal Well Savegame v9"));
    assert!(stdout.contains("Slot 1: 2024-05-09 08:15:00"));
    assert!(stdout.contains(" - Health: 4"));
    assert!(stdout.contains("Slot 3: No data!"));
    assert!(!stdout.contains("Wrote changes!"));
}

#[test]
fn json_output_parses_and_honours_slot_selection() {
    let path = write_sample_save("aw_cli_json");
    let output = run_cli(&["--json", "--slot", "1", &path_arg(&path)]);
    let _ = fs::remove_file(&path);

    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(value["version"], 9);
    assert_eq!(value["checksum_valid"], true);
    let slots = value["slots"].as_array().expect("slots array");
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0]["has_data"], true);
}

#[test]
fn setting_keys_writes_file_and_reports_checksum() {
    let path = write_sample_save("aw_cli_keys");
    let output = run_cli(&["--slot", "1", "--keys", "5", &path_arg(&path)]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Slot 1: Updating key count to: 5"));
    assert!(stdout.contains("Wrote changes!  New checksum: 0x"));

    let save = Savegame::open(&path).expect("reopen edited save");
    let _ = fs::remove_file(&path);
    assert_eq!(save.slots[0].keys.get(&save.store).expect("keys"), 5);
    assert!(save.checksum_valid_on_load());
}

#[test]
fn edits_skip_empty_slots() {
    let path = write_sample_save("aw_cli_skip");
    let output = run_cli(&["--health", "9", &path_arg(&path)]);
    let save = Savegame::open(&path).expect("reopen edited save");
    let _ = fs::remove_file(&path);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Slot 2: No data detected, so slot modifications skipped"));
    assert_eq!(save.slots[0].health.get(&save.store).expect("health"), 9);
    assert_eq!(save.slots[1].health.get(&save.store).expect("health"), 0);
}

#[test]
fn fix_checksum_changes_only_the_checksum_byte() {
    let path = write_sample_save("aw_cli_fix");
    let mut original = fs::read(&path).expect("read sample");
    original[0x0D] ^= 0x5A;
    fs::write(&path, &original).expect("corrupt checksum");

    let output = run_cli(&["--fix-checksum", &path_arg(&path)]);
    let fixed = fs::read(&path).expect("read fixed save");
    let _ = fs::remove_file(&path);

    assert!(output.status.success());
    assert_eq!(fixed.len(), original.len());
    let differing: Vec<usize> = (0..fixed.len())
        .filter(|&i| fixed[i] != original[i])
        .collect();
    assert_eq!(differing, vec![0x0D]);
}

#[test]
fn invalid_checksum_is_written_on_request() {
    let path = write_sample_save("aw_cli_invalid");
    let output = run_cli(&["--invalid-checksum", "--fix-checksum", &path_arg(&path)]);
    let save = Savegame::open(&path).expect("reopen");
    let _ = fs::remove_file(&path);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("NOTICE"));
    assert!(!save.checksum_valid_on_load());
}

#[test]
fn export_slot_writes_full_slot_and_respects_force() {
    let path = write_sample_save("aw_cli_export");
    let export = temp_output_path("aw_cli_export_slot", "bin");

    let output = run_cli(&[
        "--slot",
        "1",
        "--export-slot",
        &path_arg(&export),
        &path_arg(&path),
    ]);
    assert!(output.status.success());
    assert_eq!(fs::metadata(&export).expect("export written").len(), SLOT_LEN as u64);

    let second = run_cli(&[
        "--slot",
        "1",
        "--export-slot",
        &path_arg(&export),
        &path_arg(&path),
    ]);
    let _ = fs::remove_file(&export);
    let _ = fs::remove_file(&path);
    assert!(second.status.success());
    assert!(String::from_utf8_lossy(&second.stdout).contains("already exists"));
}

#[test]
fn import_slot_copies_data_between_slots() {
    let path = write_sample_save("aw_cli_import");
    let export = temp_output_path("aw_cli_import_slot", "bin");

    let exported = run_cli(&[
        "--slot",
        "1",
        "--export-slot",
        &path_arg(&export),
        &path_arg(&path),
    ]);
    assert!(exported.status.success());
    let imported = run_cli(&[
        "--slot",
        "2",
        "--import-slot",
        &path_arg(&export),
        &path_arg(&path),
    ]);
    let save = Savegame::open(&path).expect("reopen");
    let _ = fs::remove_file(&export);
    let _ = fs::remove_file(&path);

    assert!(imported.status.success());
    assert!(save.slots[1].has_data(&save.store).expect("has data"));
    assert_eq!(save.slots[1].health.get(&save.store).expect("health"), 4);
}

#[test]
fn export_slot_requires_a_single_slot() {
    let path = write_sample_save("aw_cli_usage");
    let export = temp_output_path("aw_cli_usage_slot", "bin");
    let output = run_cli(&["--export-slot", &path_arg(&export), &path_arg(&path)]);
    let _ = fs::remove_file(&path);

    assert_eq!(output.status.code(), Some(2));
    assert!(!export.exists());
}

#[test]
fn unknown_flag_name_is_a_usage_error() {
    let path = write_sample_save("aw_cli_unknown");
    let before = fs::read(&path).expect("read sample");
    let output = run_cli(&["--equip-enable", "jetpack", &path_arg(&path)]);
    let after = fs::read(&path).expect("read after");
    let _ = fs::remove_file(&path);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("jetpack"));
    assert_eq!(before, after);
}

#[test]
fn unchanged_save_reports_no_modifications() {
    let path = write_sample_save("aw_cli_noop");
    let output = run_cli(&["--slot", "1", "--equip-disable", "yoyo", &path_arg(&path)]);
    let _ = fs::remove_file(&path);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No file modifications were necessary!"));
}

#[test]
fn truncated_save_fails_to_open() {
    let path = temp_output_path("aw_cli_short", "sav");
    fs::write(&path, [9u8, 0, 0, 0]).expect("write short file");
    let output = run_cli(&["--info", &path_arg(&path)]);
    let _ = fs::remove_file(&path);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error opening"));
}

#[test]
fn clear_invalid_walls_drops_cheated_wall_records() {
    let path = write_sample_save("aw_cli_walls");
    {
        let mut save = Savegame::open(&path).expect("open sample save");
        let walls = save.slots[0].moved_walls.clone();
        let buttons = save.slots[0].invalid_pink_buttons;
        walls.push(&mut save.store, INVALID_WALLS[0]).expect("seed invalid wall");
        walls.push(&mut save.store, MOVED_WALLS[4]).expect("seed legal wall");
        buttons.enable_all(&mut save.store).expect("seed invalid buttons");
        save.commit(&path, ChecksumPolicy::Repair).expect("write seeded save");
    }

    let output = run_cli(&["--slot", "1", "--clear-invalid-walls", &path_arg(&path)]);
    let save = Savegame::open(&path).expect("reopen edited save");
    let _ = fs::remove_file(&path);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Slot 1: Clearing invalid wall-opening records"));
    let slot = &save.slots[0];
    assert_eq!(
        slot.moved_walls.iter(&save.store).expect("walls"),
        vec![MOVED_WALLS[4]]
    );
    let second = slot.base() + 4;
    assert_eq!(&save.store.as_bytes()[second + 0xC8..second + 0xCC], &[0u8; 4]);
    assert!(slot
        .invalid_pink_buttons
        .enabled(&save.store)
        .expect("buttons")
        .is_empty());
}

#[test]
fn world_state_flags_update_the_slot() {
    let path = write_sample_save("aw_cli_world");
    let output = run_cli(&[
        "--slot",
        "1",
        "--lockable-unlock",
        "--walls-open",
        "--house-open",
        "--solve-cranks",
        "--kangaroo-room",
        "2",
        "--kshard-collect",
        "2",
        &path_arg(&path),
    ]);
    let save = Savegame::open(&path).expect("reopen edited save");
    let _ = fs::remove_file(&path);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Slot 1: Unlocking all lockable doors"));
    assert!(stdout.contains("Slot 1: Setting total number of collected K. Shards to: 2"));

    let slot = &save.slots[0];
    let store = &save.store;
    assert_eq!(slot.locked_doors.len(store).expect("doors"), LOCKED_DOORS.len());
    assert_eq!(slot.moved_walls.len(store).expect("walls"), MOVED_WALLS.len());
    for state in [QuestState::HouseOpen, QuestState::OfficeOpen, QuestState::ClosetOpen] {
        assert!(slot.quest_state.is_enabled(store, state).expect("quest state"));
    }
    let crank = slot.cranks.get(13).expect("crank 13");
    assert_eq!(crank.get(store).expect("crank"), 63840);
    assert_eq!(slot.kangaroo.next_room(store).expect("room"), Some((12, 11)));
    assert_eq!(
        slot.kangaroo.state.choice(store).expect("state"),
        Some(KangarooActivityState::Lurking)
    );
    assert_eq!(slot.kangaroo.num_collected(store).expect("shards"), 2);
}

#[test]
fn walls_close_clears_the_list() {
    let path = write_sample_save("aw_cli_walls_close");
    let opened = run_cli(&["--slot", "1", "--walls-open", &path_arg(&path)]);
    assert!(opened.status.success());
    let closed = run_cli(&["--slot", "1", "--walls-close", &path_arg(&path)]);
    let save = Savegame::open(&path).expect("reopen edited save");
    let _ = fs::remove_file(&path);

    assert!(closed.status.success());
    assert!(save.slots[0].moved_walls.is_empty(&save.store).expect("walls"));
}

#[test]
fn kshard_collect_and_insert_conflict() {
    let path = write_sample_save("aw_cli_kshard");
    let output = run_cli(&[
        "--kshard-collect",
        "1",
        "--kshard-insert",
        "2",
        &path_arg(&path),
    ]);
    let out_of_range = run_cli(&["--kangaroo-room", "5", &path_arg(&path)]);
    let _ = fs::remove_file(&path);

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(out_of_range.status.code(), Some(2));
}
