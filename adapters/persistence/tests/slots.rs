use std::fs;

use tempfile::TempDir;
use wildlands_core::{Passability, TileGrid, TileKind, WorldPoint};
use wildlands_persistence::{PersistenceError, SaveGame, SlotStatus, SlotStore, SLOT_COUNT};

fn sample_grid() -> TileGrid {
    let tiles = vec![
        TileKind::Water,
        TileKind::Grass,
        TileKind::Dirt,
        TileKind::Mountain,
        TileKind::TreeObstacle,
        TileKind::RockObstacle,
    ];
    TileGrid::from_tiles(3, 2, 64.0, tiles).expect("valid grid")
}

fn store() -> (TempDir, SlotStore) {
    let directory = tempfile::tempdir().expect("temporary directory");
    let store = SlotStore::new(directory.path().join("saves"));
    (directory, store)
}

#[test]
fn saved_games_load_back_unchanged() {
    let (_directory, store) = store();
    let grid = sample_grid();
    let game = SaveGame::capture("Campfire", &grid, WorldPoint::new(70.5, 12.0));

    let path = store.save(4, &game).expect("saved");
    assert!(path.ends_with("save_slot_4.json"));

    let loaded = store.load(4).expect("loaded");
    assert_eq!(loaded, game);
    assert_eq!(loaded.position(), WorldPoint::new(70.5, 12.0));
    let restored = loaded
        .restore_grid(64.0, Passability::default())
        .expect("valid grid");
    assert_eq!(restored, grid);
}

#[test]
fn documents_use_the_established_field_names() {
    let (_directory, store) = store();
    let game = SaveGame::capture("Fields", &sample_grid(), WorldPoint::new(1.0, 2.0));
    let path = store.save(1, &game).expect("saved");

    let document: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(path).expect("readable")).expect("json");
    assert_eq!(document["save_name"], "Fields");
    assert_eq!(document["player_x"], 1.0);
    assert_eq!(document["player_y"], 2.0);
    assert_eq!(document["rows"], 2);
    assert_eq!(document["columns"], 3);
    assert_eq!(document["map_data"], serde_json::json!([[0, 1, 2], [3, 4, 5]]));
}

#[test]
fn listing_reports_empty_named_and_corrupted_slots() {
    let (_directory, store) = store();
    let game = SaveGame::capture("Lakeside", &sample_grid(), WorldPoint::default());
    let _ = store.save(2, &game).expect("saved");
    let unnamed = SaveGame {
        save_name: String::new(),
        ..game.clone()
    };
    fs::write(
        store.slot_path(3).expect("valid slot"),
        serde_json::to_string(&unnamed).expect("json"),
    )
    .expect("written");
    fs::write(store.slot_path(5).expect("valid slot"), "{ not json").expect("written");

    let slots = store.list().expect("listed");

    assert_eq!(slots.len(), usize::from(SLOT_COUNT));
    assert_eq!(slots[0].status, SlotStatus::Empty);
    assert_eq!(slots[1].status, SlotStatus::Saved("Lakeside".to_owned()));
    assert_eq!(
        slots[2].status,
        SlotStatus::Saved("Unnamed Save 3".to_owned())
    );
    assert_eq!(slots[4].status, SlotStatus::Corrupted);
    assert_eq!(
        slots.iter().map(|summary| summary.slot).collect::<Vec<_>>(),
        (1..=SLOT_COUNT).collect::<Vec<_>>()
    );
}

#[test]
fn listing_a_missing_directory_reports_all_empty() {
    let (_directory, store) = store();
    let slots = store.list().expect("listed");
    assert!(slots
        .iter()
        .all(|summary| summary.status == SlotStatus::Empty));
}

#[test]
fn first_empty_slot_fills_in_order() {
    let (_directory, store) = store();
    let game = SaveGame::capture("Auto", &sample_grid(), WorldPoint::default());

    assert_eq!(store.first_empty().expect("checked"), Some(1));
    let _ = store.save(1, &game).expect("saved");
    let _ = store.save(3, &game).expect("saved");
    assert_eq!(store.save_to_first_empty(&game).expect("saved"), 2);
    assert_eq!(store.first_empty().expect("checked"), Some(4));

    for slot in 4..=SLOT_COUNT {
        let _ = store.save(slot, &game).expect("saved");
    }
    assert_eq!(store.first_empty().expect("checked"), None);
    assert!(matches!(
        store.save_to_first_empty(&game),
        Err(PersistenceError::NoFreeSlot)
    ));
}

#[test]
fn rename_rewrites_only_the_name() {
    let (_directory, store) = store();
    let game = SaveGame::capture("Before", &sample_grid(), WorldPoint::new(5.0, 6.0));
    let _ = store.save(7, &game).expect("saved");

    store.rename(7, "After").expect("renamed");

    let renamed = store.load(7).expect("loaded");
    assert_eq!(renamed.save_name, "After");
    assert_eq!(renamed.map_data, game.map_data);
    assert_eq!(renamed.position(), game.position());
}

#[test]
fn blank_names_are_refused() {
    let (_directory, store) = store();
    let game = SaveGame::capture("   ", &sample_grid(), WorldPoint::default());
    assert!(matches!(store.save(1, &game), Err(PersistenceError::BlankName)));

    let game = SaveGame::capture("Named", &sample_grid(), WorldPoint::default());
    let _ = store.save(1, &game).expect("saved");
    assert!(matches!(store.rename(1, ""), Err(PersistenceError::BlankName)));
}

#[test]
fn missing_and_invalid_slots_are_reported() {
    let (_directory, store) = store();
    assert!(matches!(
        store.load(6),
        Err(PersistenceError::MissingSlot { slot: 6 })
    ));
    assert!(matches!(
        store.rename(6, "Nothing"),
        Err(PersistenceError::MissingSlot { slot: 6 })
    ));
    assert!(matches!(
        store.load(SLOT_COUNT + 1),
        Err(PersistenceError::SlotOutOfRange { .. })
    ));
}

#[test]
fn corrupt_documents_fail_to_load() {
    let (_directory, store) = store();
    fs::create_dir_all(store.directory()).expect("directory");
    fs::write(store.slot_path(8).expect("valid slot"), "[]").expect("written");
    assert!(matches!(store.load(8), Err(PersistenceError::Json { .. })));
}

#[test]
fn ragged_map_data_is_a_corrupt_grid() {
    let game = SaveGame {
        save_name: "Ragged".to_owned(),
        player_x: 0.0,
        player_y: 0.0,
        rows: Some(2),
        columns: Some(2),
        map_data: vec![vec![1, 1], vec![1]],
    };
    assert!(matches!(
        game.restore_grid(64.0, Passability::default()),
        Err(PersistenceError::CorruptGrid(_))
    ));
}
