#![cfg(target_arch = "wasm32")]

use bret_core::{PersistedSnapshot, SessionStore, StorageKey};
use bret_web::{BombTaskHandle, BrowserSessionStore};
use serde_json::Value;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn ok<T>(result: Result<T, wasm_bindgen::JsError>) -> T {
    match result {
        Ok(value) => value,
        Err(_) => panic!("call into the round failed"),
    }
}

fn mount(settings: &str) -> BombTaskHandle {
    ok(BombTaskHandle::mount(settings))
}

fn view(handle: &BombTaskHandle) -> Value {
    serde_json::from_str(&ok(handle.view())).unwrap()
}

#[wasm_bindgen_test]
fn manual_round_round_trips_through_session_storage() {
    let mut store = BrowserSessionStore::new();
    store.remove_item(PersistedSnapshot::KEY).unwrap();

    let handle = mount(r#"{"rows": 2, "cols": 2}"#);
    assert_eq!(view(&handle)["phase"], "Running");
    assert!(ok(handle.toggle(1, 2, true)));
    assert!(store.get_item(PersistedSnapshot::KEY).unwrap().is_some());

    let reloaded = mount(r#"{"rows": 2, "cols": 2}"#);
    assert!(reloaded.is_active(1, 2));
    assert_eq!(view(&reloaded)["collectedCount"], 1);
    assert_eq!(view(&reloaded)["bombRow"], view(&handle)["bombRow"]);

    store.remove_item(PersistedSnapshot::KEY).unwrap();
}

#[wasm_bindgen_test]
fn rejects_bad_settings() {
    assert!(BombTaskHandle::mount(r#"{"rows": 0}"#).is_err());
    assert!(BombTaskHandle::mount("[1, 2]").is_err());
}

#[wasm_bindgen_test]
fn input_mode_selects_by_number() {
    BrowserSessionStore::new()
        .remove_item(PersistedSnapshot::KEY)
        .unwrap();
    let handle = mount(r#"{"rows": 3, "cols": 3, "inputMode": true}"#);

    handle.select("4");
    assert_eq!(view(&handle)["collectedCount"], 4);
    assert!(!ok(handle.toggle(1, 1, false)));

    handle.stop();
    let record: Value = serde_json::from_str(&ok(handle.record())).unwrap();
    assert_eq!(record["boxes_collected"], 4);

    BrowserSessionStore::new()
        .remove_item(PersistedSnapshot::KEY)
        .unwrap();
}
