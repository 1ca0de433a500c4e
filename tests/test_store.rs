use std::fs;

use space_explorer::error::StoreError;
use space_explorer::leaderboard::{LeaderboardEntry, LeaderboardTable};
use space_explorer::store::{LeaderboardStore, LEADERBOARD_FILE};

fn sample() -> LeaderboardTable {
    LeaderboardTable::new()
        .submit("Ann", 42)
        .submit("Bo", 75)
        .submit("Cy", 10)
}

#[test]
fn missing_file_loads_empty_table() {
    let dir = tempfile::tempdir().unwrap();
    let store = LeaderboardStore::in_dir(dir.path());
    assert!(store.load().is_empty());
    assert!(store.try_load().unwrap().is_none());
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = LeaderboardStore::in_dir(dir.path());
    store.save(&sample()).unwrap();

    assert_eq!(store.path(), dir.path().join(LEADERBOARD_FILE));
    assert_eq!(store.load(), sample());
}

#[test]
fn reload_and_resave_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let store = LeaderboardStore::in_dir(dir.path());
    store.save(&sample()).unwrap();
    let first = fs::read_to_string(store.path()).unwrap();

    store.save(&store.load()).unwrap();
    let second = fs::read_to_string(store.path()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn file_is_indented_json_with_player_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = LeaderboardStore::in_dir(dir.path());
    store.save(&LeaderboardTable::new().submit("Ann", 42)).unwrap();

    let text = fs::read_to_string(store.path()).unwrap();
    assert!(text.contains("\n  "));
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["entries"][0]["playerName"], "Ann");
    assert_eq!(json["entries"][0]["score"], 42);
}

#[test]
fn malformed_file_loads_empty_table() {
    let dir = tempfile::tempdir().unwrap();
    let store = LeaderboardStore::in_dir(dir.path());
    fs::write(store.path(), "{ not json").unwrap();

    assert!(store.load().is_empty());
    assert!(matches!(store.try_load(), Err(StoreError::Decode { .. })));
}

#[test]
fn loaded_names_are_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let store = LeaderboardStore::in_dir(dir.path());
    fs::write(
        store.path(),
        r#"{"entries": [
            {"playerName": "   ", "score": 9},
            {"playerName": "ABCDEFGHIJKLMNOPQRSTUVWXYZ", "score": 5},
            {"playerName": "  Ann  ", "score": 3}
        ]}"#,
    )
    .unwrap();

    let table = store.load();
    let names: Vec<&str> = table.entries().iter().map(LeaderboardEntry::name).collect();
    assert_eq!(names, vec!["Anonymous", "ABCDEFGHIJKLMNO", "Ann"]);
    assert_eq!(table.format_rows()[0], "1. Anonymous - 9");
    assert_eq!(table.format_rows()[1], "2. ABCDEFGHIJKLMNO - 5");

    // Saved back in normalized form
    store.save(&table).unwrap();
    let text = fs::read_to_string(store.path()).unwrap();
    assert!(!text.contains("PQRSTUVWXYZ"));
    assert_eq!(store.load(), table);
}

#[test]
fn wrong_shape_loads_empty_table() {
    let dir = tempfile::tempdir().unwrap();
    let store = LeaderboardStore::in_dir(dir.path());
    fs::write(
        store.path(),
        r#"{"entries": [{"playerName": "Neg", "score": -5}]}"#,
    )
    .unwrap();
    assert!(store.load().is_empty());
}

#[test]
fn unranked_file_is_ranked_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = LeaderboardStore::in_dir(dir.path());
    let entries: Vec<serde_json::Value> = [3, 9, 1, 7, 5, 8, 2]
        .iter()
        .map(|s| serde_json::json!({"playerName": format!("p{s}"), "score": s}))
        .collect();
    fs::write(
        store.path(),
        serde_json::json!({ "entries": entries }).to_string(),
    )
    .unwrap();

    let table = store.load();
    let scores: Vec<u32> = table.entries().iter().map(LeaderboardEntry::score).collect();
    assert_eq!(scores, vec![9, 8, 7, 5, 3]);
}

#[test]
fn save_creates_missing_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("deeper").join("data");
    let store = LeaderboardStore::in_dir(&nested);
    store.save(&sample()).unwrap();
    assert!(nested.join(LEADERBOARD_FILE).is_file());
}

#[test]
fn save_reports_unwritable_location() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "").unwrap();

    let store = LeaderboardStore::in_dir(&blocker);
    assert!(matches!(
        store.save(&sample()),
        Err(StoreError::CreateDir { .. })
    ));
    // Reading from the same place degrades to an empty table
    assert!(store.load().is_empty());
}
