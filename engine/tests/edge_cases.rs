//! Edge case tests for prefsync-engine
//!
//! These tests cover boundary conditions and unusual inputs.

use prefsync_engine::{
    reconcile, KeySpace, NoLegacyData, PreferenceSnapshot, ReconcileInput, SnapshotSource,
};
use serde_json::json;

fn stamped(raw: &str, marker: &str) -> PreferenceSnapshot {
    PreferenceSnapshot::from_value(json!({ "__modified": raw, "marker": marker })).unwrap()
}

fn pick(server: Option<PreferenceSnapshot>, local: Option<PreferenceSnapshot>) -> SnapshotSource {
    reconcile(ReconcileInput::new(server, local), "42", &NoLegacyData)
        .expect("one side was present")
        .source
}

// ============================================================================
// Timestamp Edge Cases
// ============================================================================

#[test]
fn far_future_timestamps_compare() {
    let source = pick(
        Some(stamped("9999-12-31T23:59:59Z", "server")),
        Some(stamped("2024-06-01T10:00:00Z", "local")),
    );
    assert_eq!(source, SnapshotSource::Server);
}

#[test]
fn offsets_compare_as_instants_not_strings() {
    // Same instant rendered in two zones is a tie, and ties go to the server.
    let source = pick(
        Some(stamped("2024-06-01T12:00:00+02:00", "server")),
        Some(stamped("2024-06-01T10:00:00Z", "local")),
    );
    assert_eq!(source, SnapshotSource::Server);

    // One second apart across zones still resolves by instant.
    let source = pick(
        Some(stamped("2024-06-01T12:00:00+02:00", "server")),
        Some(stamped("2024-06-01T10:00:01Z", "local")),
    );
    assert_eq!(source, SnapshotSource::Local);
}

#[test]
fn exotic_offset_boundaries() {
    // +14:00 exists; crossing the date line must not confuse the comparison.
    let source = pick(
        Some(stamped("2024-06-02T00:00:00+14:00", "server")),
        Some(stamped("2024-06-01T10:00:01Z", "local")),
    );
    assert_eq!(source, SnapshotSource::Local);
}

#[test]
fn leap_day_parses() {
    let snapshot = stamped("2024-02-29T12:00:00Z", "leap");
    assert!(snapshot.modified_epoch_ms() > 0);
}

#[test]
fn millisecond_margins_decide() {
    let source = pick(
        Some(stamped("2024-06-01T10:00:00Z", "server")),
        Some(stamped("2024-06-01T10:00:00.001Z", "local")),
    );
    assert_eq!(source, SnapshotSource::Local);
}

#[test]
fn mixed_valid_and_garbage_timestamps() {
    for garbage in ["", "  ", "soon", "06/01/2024", "1717236000"] {
        let source = pick(
            Some(stamped(garbage, "server")),
            Some(stamped("2024-06-01T10:00:00Z", "local")),
        );
        assert_eq!(source, SnapshotSource::Local, "garbage: {:?}", garbage);
    }
}

#[test]
fn garbage_on_both_sides_is_a_tie() {
    let source = pick(
        Some(stamped("???", "server")),
        Some(stamped("!!!", "local")),
    );
    assert_eq!(source, SnapshotSource::Server);
}

// ============================================================================
// Snapshot Payload Edge Cases
// ============================================================================

#[test]
fn unicode_keys_and_values() {
    let mut snapshot = PreferenceSnapshot::new();
    let entries = vec![
        ("日本語キー", json!("日本語の値")),
        ("клавиша", json!("значение")),
        ("🎛️/panel", json!({"открыт": true})),
        ("tab\tkey", json!("with\nnewline")),
    ];

    for (key, value) in &entries {
        snapshot.insert(*key, value.clone()).unwrap();
    }

    let restored = PreferenceSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
    for (key, value) in &entries {
        assert_eq!(restored.get(key), Some(value), "key: {:?}", key);
    }
}

#[test]
fn empty_string_key_is_a_valid_preference() {
    let mut snapshot = PreferenceSnapshot::new();
    snapshot.insert("", json!("empty")).unwrap();

    let restored = PreferenceSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
    assert_eq!(restored.get(""), Some(&json!("empty")));
}

#[test]
fn null_values_are_preferences_too() {
    let snapshot = PreferenceSnapshot::from_json(r#"{"dismissed":null}"#).unwrap();

    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.get("dismissed"), Some(&json!(null)));
}

#[test]
fn near_reserved_keys_are_ordinary() {
    // Only the exact reserved key is special.
    let mut snapshot = PreferenceSnapshot::new();
    snapshot.insert("__modified ", json!(1)).unwrap();
    snapshot.insert("__MODIFIED", json!(2)).unwrap();
    snapshot.insert("_modified", json!(3)).unwrap();
    snapshot.insert("__modified2", json!(4)).unwrap();

    assert_eq!(snapshot.len(), 4);
    assert_eq!(snapshot.modified_at(), None);
}

#[test]
fn deeply_nested_values_round_trip() {
    let mut nested = json!("leaf");
    for _ in 0..50 {
        nested = json!({ "inner": nested });
    }

    let mut snapshot = PreferenceSnapshot::new();
    snapshot.insert("deep", nested.clone()).unwrap();

    let restored = PreferenceSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
    assert_eq!(restored.get("deep"), Some(&nested));
}

#[test]
fn large_snapshot_round_trips_deterministically() {
    let mut forward = PreferenceSnapshot::new();
    let mut backward = PreferenceSnapshot::new();

    for i in 0..500 {
        forward
            .insert(format!("scope/{}", i), json!({ "n": i }))
            .unwrap();
    }
    for i in (0..500).rev() {
        backward
            .insert(format!("scope/{}", i), json!({ "n": i }))
            .unwrap();
    }

    let json = forward.to_json().unwrap();
    assert_eq!(json, backward.to_json().unwrap());

    let restored = PreferenceSnapshot::from_json(&json).unwrap();
    assert_eq!(restored.len(), 500);
    assert_eq!(restored.get("scope/499"), Some(&json!({ "n": 499 })));
}

// ============================================================================
// Reconcile Edge Cases
// ============================================================================

#[test]
fn server_copy_beats_month_older_local_copy() {
    let server =
        PreferenceSnapshot::from_json(r#"{"__modified":"2024-06-01T10:00:00Z","theme":"dark"}"#)
            .unwrap();
    let local =
        PreferenceSnapshot::from_json(r#"{"__modified":"2024-05-01T09:00:00Z","theme":"light"}"#)
            .unwrap();

    let winner = reconcile(
        ReconcileInput::new(Some(server), Some(local)),
        "42",
        &NoLegacyData,
    )
    .unwrap();

    assert_eq!(winner.source, SnapshotSource::Server);
    assert_eq!(winner.snapshot.get("theme"), Some(&json!("dark")));
}

#[test]
fn identical_snapshots_on_both_sides() {
    let same = stamped("2024-06-01T10:00:00Z", "same");

    let winner = reconcile(
        ReconcileInput::new(Some(same.clone()), Some(same.clone())),
        "42",
        &NoLegacyData,
    )
    .unwrap();

    assert_eq!(winner.source, SnapshotSource::Server);
    assert_eq!(winner.snapshot, same);
}

#[test]
fn stale_server_with_absent_local_does_not_resurrect() {
    // The server copy loses the timestamp comparison only when the local
    // side is newer; with no local copy at all the server copy wins even
    // unstamped.
    let winner = reconcile(
        ReconcileInput::new(Some(stamped("junk", "server")), None),
        "42",
        &NoLegacyData,
    )
    .unwrap();

    assert_eq!(winner.source, SnapshotSource::Server);
}

#[test]
fn empty_local_snapshot_beats_absent_server() {
    let winner = reconcile(
        ReconcileInput::new(None, Some(PreferenceSnapshot::new())),
        "42",
        &NoLegacyData,
    )
    .unwrap();

    assert_eq!(winner.source, SnapshotSource::Local);
    assert!(winner.snapshot.is_empty());
}

// ============================================================================
// Legacy Blob Edge Cases
// ============================================================================

#[test]
fn legacy_envelope_contents_survive_whole() {
    let blob = json!({
        "core/edit-post": {
            "preferences": {
                "panels": {"post-status": {"opened": true}},
                "pinnedItems": ["a", "b"],
            },
            "extra": "ignored",
        },
    });

    let snapshot = prefsync_engine::convert_blob(&blob).unwrap();

    assert_eq!(
        snapshot.get("core/edit-post"),
        Some(&json!({
            "panels": {"post-status": {"opened": true}},
            "pinnedItems": ["a", "b"],
        }))
    );
}

#[test]
fn legacy_scopes_with_array_or_scalar_envelopes_are_skipped() {
    let blob = json!({
        "a": {"preferences": [1, 2, 3]},
        "b": {"preferences": 7},
        "c": {"preferences": {"kept": true}},
        "d": "not even an object",
    });

    let snapshot = prefsync_engine::convert_blob(&blob).unwrap();

    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.get("c"), Some(&json!({"kept": true})));
}

// ============================================================================
// Key Derivation Edge Cases
// ============================================================================

#[test]
fn unusual_user_ids_derive_distinct_keys() {
    let keys = KeySpace::new("app_");

    for user_id in ["0", "00", "user@host", "ユーザー"] {
        assert_eq!(
            keys.cache_key(user_id),
            format!("PREFS_USER_{}", user_id)
        );
        assert_ne!(keys.cache_key(user_id), keys.legacy_cache_key(user_id));
    }
}
