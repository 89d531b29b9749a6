use std::fs;

use inventory::{Change, InventoryStore, LoadOutcome, Quantity, Result};
use serde_json::json;
use tempfile::TempDir;

// Adding to an existing item increases its quantity by the added amount
#[test]
fn add_increases_existing_quantity() {
    let mut store = InventoryStore::new();
    for qty in [1, 4, 9] {
        let before = store.get_quantity("bolt");
        store.add("bolt", qty, None);
        assert_eq!(store.get_quantity("bolt"), before + Quantity::Int(qty.into()));
    }
}

#[test]
fn remove_reports_remaining_stock() -> Result<()> {
    let mut store = InventoryStore::new();
    store.try_add("apple", 10, None)?;
    assert_eq!(store.try_remove("apple", 3)?, Change::Updated(Quantity::Int(7)));
    assert_eq!(store.try_remove("apple", 7)?, Change::Removed);
    assert!(store.is_empty());
    Ok(())
}

#[test]
fn non_string_item_is_ignored() {
    let mut store = InventoryStore::new();
    store.add("apple", 1, None);
    let before = store.clone();
    store.add_value(&json!(123), &json!(5), None);
    assert_eq!(store, before);
    assert!(!store.contains("123"));
}

#[test]
fn save_writes_pretty_json_in_insertion_order() -> Result<()> {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    let path = temp_dir.path().join("inventory.json");

    let mut store = InventoryStore::new();
    store.add("zucchini", 3, None);
    store.add("apple", 1.5, None);
    store.try_save(&path)?;

    let saved = fs::read_to_string(&path)?;
    assert_eq!(saved, "{\n    \"zucchini\": 3,\n    \"apple\": 1.5\n}");
    Ok(())
}

#[test]
fn save_overwrites_existing_file() -> Result<()> {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    let path = temp_dir.path().join("inventory.json");
    fs::write(&path, r#"{"old": 1, "stale": 2, "items": 3}"#)?;

    let mut store = InventoryStore::new();
    store.add("new", 1, None);
    store.try_save(&path)?;

    assert_eq!(InventoryStore::open(&path), store);
    Ok(())
}

// Save, drop the store, and load into a fresh instance
#[test]
fn persists_across_instances() -> Result<()> {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    let path = temp_dir.path().join("inventory.json");

    let mut store = InventoryStore::new();
    store.add("a", 2, None);
    store.add("b", 10, None);
    store.add("c", 4, None);
    store.save(&path);
    drop(store);

    let store = InventoryStore::open(&path);
    let low: Vec<&str> = store.list_below(5).collect();
    assert_eq!(low, ["a", "c"]);
    assert_eq!(store.get_quantity("b"), Quantity::Int(10));
    Ok(())
}

#[test]
fn load_replaces_previous_contents() -> Result<()> {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    let path = temp_dir.path().join("inventory.json");
    fs::write(&path, r#"{"pear": 2}"#)?;

    let mut store = InventoryStore::new();
    store.add("apple", 5, None);
    assert_eq!(store.try_load(&path)?, LoadOutcome::Loaded(1));
    assert!(!store.contains("apple"));
    assert_eq!(store.get_quantity("pear"), Quantity::Int(2));
    Ok(())
}

#[test]
fn load_nonexistent_path_is_empty() {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    let store = InventoryStore::open(temp_dir.path().join("missing.json"));
    assert!(store.is_empty());
}

#[test]
fn load_empty_file_is_empty() -> Result<()> {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    let path = temp_dir.path().join("inventory.json");
    fs::write(&path, "")?;

    let mut store = InventoryStore::new();
    store.add("apple", 5, None);
    assert_eq!(store.try_load(&path)?, LoadOutcome::Empty);
    assert!(store.is_empty());
    Ok(())
}

#[test]
fn load_malformed_json_resets_store() -> Result<()> {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    let path = temp_dir.path().join("inventory.json");

    for content in ["{\"apple\": ", "[1, 2, 3]", "42"] {
        fs::write(&path, content)?;
        let mut store = InventoryStore::new();
        store.add("apple", 5, None);
        store.load(&path);
        assert!(store.is_empty(), "store not reset for {content:?}");
    }
    Ok(())
}

#[test]
fn save_to_unwritable_path_is_reported() {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    let path = temp_dir.path().join("no-such-dir").join("inventory.json");

    let mut store = InventoryStore::new();
    store.add("apple", 1, None);
    store.save(&path);
    assert!(store.try_save(&path).is_err());
    assert!(!path.exists());
}
