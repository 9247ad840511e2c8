//! # Asset Lifecycle Tests
//!
//! End-to-end invocations against the in-memory world state, submitted the
//! way the platform submits them: function name plus string arguments.

use coldchain_contract::{
    submit, AssetContract, ContractConfig, ContractError, KeyValue, LedgerContext, LedgerError,
    MemoryLedger, Response, StateRange, StatusPolicy,
};
use coldchain_core::{Asset, MAX_SAFE_INTEGER};
use proptest::prelude::*;
use serde_json::Value;

fn run(ledger: &mut MemoryLedger, function: &str, args: &[&str]) -> Response {
    submit(ledger, &AssetContract::default(), function, args)
}

fn ok(ledger: &mut MemoryLedger, function: &str, args: &[&str]) -> String {
    let response = run(ledger, function, args);
    assert!(response.is_success(), "{function} failed: {}", response.message);
    response.payload_text().into_owned()
}

fn read(ledger: &mut MemoryLedger, id: &str) -> Asset {
    Asset::decode(ok(ledger, "ReadAsset", &[id]).as_bytes()).expect("stored asset decodes")
}

fn seeded() -> MemoryLedger {
    let mut ledger = MemoryLedger::new();
    ok(&mut ledger, "InitLedger", &[]);
    ledger
}

// ---------------------------------------------------------------------------
// Scenario 1: seed data
// ---------------------------------------------------------------------------

#[test]
fn test_init_ledger_seeds_six_assets() {
    let mut ledger = MemoryLedger::new();
    let payload = ok(&mut ledger, "InitLedger", &[]);
    let seeded: Vec<Value> = serde_json::from_str(&payload).unwrap();
    assert_eq!(seeded.len(), 6);
    assert_eq!(ledger.len(), 6);

    let asset1 = read(&mut ledger, "asset1");
    assert_eq!(asset1.temperature().value(), 38.0);
    assert_eq!(asset1.owner(), "Catering");
    assert_eq!(asset1.status(), "SOLVED");
    assert_eq!(asset1.timestamp(), "2022");
}

#[test]
fn test_seed_bytes_are_canonical() {
    let mut ledger = seeded();
    assert_eq!(
        ok(&mut ledger, "ReadAsset", &["asset6"]),
        r#"{"ID":"asset6","Owner":"Catering","Status":"open","Temperature":90,"Timestamp":"2022","docType":"asset"}"#
    );
}

#[test]
fn test_init_ledger_is_replayable() {
    let mut first = seeded();
    let mut second = MemoryLedger::new();
    ok(&mut second, "InitLedger", &[]);
    ok(&mut second, "InitLedger", &[]);
    assert_eq!(first, second);
    // And the payloads agree too.
    assert_eq!(ok(&mut first, "ListAll", &[]), ok(&mut second, "ListAll", &[]));
}

// ---------------------------------------------------------------------------
// Scenario 2: creation uniqueness
// ---------------------------------------------------------------------------

#[test]
fn test_create_asset_uniqueness() {
    let mut ledger = seeded();
    assert_eq!(ok(&mut ledger, "Exists", &["asset7"]), "false");

    let created = ok(&mut ledger, "CreateAsset", &["asset7", "65", "open", "Catering", "2023"]);
    assert_eq!(
        created,
        r#"{"ID":"asset7","Owner":"Catering","Status":"open","Temperature":65,"Timestamp":"2023","docType":"asset"}"#
    );
    assert_eq!(ok(&mut ledger, "Exists", &["asset7"]), "true");
    assert_eq!(ok(&mut ledger, "AssetExists", &["asset7"]), "true");

    let again = run(&mut ledger, "CreateAsset", &["asset7", "20", "open", "Other", "2024"]);
    assert!(!again.is_success());
    assert!(again.message.contains("asset7 already exists"), "{}", again.message);
    assert_eq!(read(&mut ledger, "asset7").owner(), "Catering");
}

// ---------------------------------------------------------------------------
// Scenario 3: transfer
// ---------------------------------------------------------------------------

#[test]
fn test_transfer_returns_previous_owner() {
    let mut ledger = seeded();
    let before = read(&mut ledger, "asset1");

    assert_eq!(ok(&mut ledger, "TransferAsset", &["asset1", "Logistics"]), "Catering");

    let after = read(&mut ledger, "asset1");
    assert_eq!(after.owner(), "Logistics");
    assert_eq!(after.id(), before.id());
    assert_eq!(after.temperature().value().to_bits(), before.temperature().value().to_bits());
    assert_eq!(after.status(), before.status());
    assert_eq!(after.timestamp(), before.timestamp());

    assert_eq!(ok(&mut ledger, "TransferAsset", &["asset1", "Hospital"]), "Logistics");
}

#[test]
fn test_transfer_missing_asset() {
    let mut ledger = seeded();
    let response = run(&mut ledger, "TransferAsset", &["nobody", "Logistics"]);
    assert_eq!(response.message, "TransferAsset: the asset nobody does not exist");
}

// ---------------------------------------------------------------------------
// Scenario 4: status update preserves other fields
// ---------------------------------------------------------------------------

#[test]
fn test_update_status_preserves_fields() {
    let mut ledger = seeded();
    let before = read(&mut ledger, "asset2");

    ok(&mut ledger, "UpdateAssetStatus", &["asset2", "in_progress"]);

    let after = read(&mut ledger, "asset2");
    assert_eq!(after.status(), "in_progress");
    assert_eq!(after.temperature().value(), 71.0);
    assert_eq!(after.temperature().value().to_bits(), before.temperature().value().to_bits());
    assert_eq!(after.owner(), before.owner());
    assert_eq!(after.timestamp(), before.timestamp());
    assert_eq!(after.id(), before.id());
}

#[test]
fn test_update_status_missing_asset() {
    let mut ledger = seeded();
    let response = run(&mut ledger, "UpdateAssetStatus", &["asset99", "open"]);
    assert!(response.message.contains("asset99 does not exist"));
}

// ---------------------------------------------------------------------------
// Scenario 5: missing asset
// ---------------------------------------------------------------------------

#[test]
fn test_read_missing_asset() {
    let mut ledger = seeded();
    let response = run(&mut ledger, "ReadAsset", &["doesNotExist"]);
    assert!(!response.is_success());
    assert_eq!(response.message, "ReadAsset: the asset doesNotExist does not exist");
}

// ---------------------------------------------------------------------------
// Scenario 6: temperature check
// ---------------------------------------------------------------------------

#[test]
fn test_check_temperature_creates_then_reports_existing() {
    let mut ledger = seeded();
    let created = ok(&mut ledger, "CheckTemperature", &["asset9", "45", "open", "X", "2024"]);
    let asset = Asset::decode(created.as_bytes()).unwrap();
    assert_eq!(asset.id().as_str(), "asset9");
    assert_eq!(asset.temperature().value(), 45.0);
    assert_eq!(ok(&mut ledger, "Exists", &["asset9"]), "true");

    let before = ledger.clone();
    assert_eq!(ok(&mut ledger, "CheckTemperature", &["asset9", "45", "open", "X", "2024"]), "false");
    assert_eq!(ledger, before);
}

#[test]
fn test_check_temperature_within_window_takes_no_action() {
    let mut ledger = seeded();
    for reading in ["60", "65", "70"] {
        assert_eq!(
            ok(&mut ledger, "CheckTemperature", &["probe", reading, "open", "X", "2024"]),
            "null"
        );
    }
    assert_eq!(ok(&mut ledger, "Exists", &["probe"]), "false");
}

#[test]
fn test_check_temperature_boundaries() {
    let mut ledger = MemoryLedger::new();
    assert_ne!(ok(&mut ledger, "CheckTemperature", &["low", "59.99", "open", "X", "t"]), "null");
    assert_ne!(ok(&mut ledger, "CheckTemperature", &["high", "70.01", "open", "X", "t"]), "null");
    assert_eq!(ledger.len(), 2);
}

#[test]
fn test_check_temperature_on_existing_in_window_asset_returns_false() {
    let mut ledger = seeded();
    // asset5 exists; the existence check wins regardless of the reading.
    assert_eq!(ok(&mut ledger, "CheckTemperature", &["asset5", "65", "open", "X", "t"]), "false");
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[test]
fn test_list_all_contains_every_asset_in_key_order() {
    let mut ledger = seeded();
    ok(&mut ledger, "CreateAsset", &["b-probe", "12.5", "open", "Depot", "2024"]);
    ok(&mut ledger, "CreateAsset", &["a-probe", "80", "open", "Depot", "2024"]);
    ok(&mut ledger, "TransferAsset", &["asset3", "Logistics"]);

    let listed: Vec<Value> = serde_json::from_str(&ok(&mut ledger, "ListAll", &[])).unwrap();
    let ids: Vec<&str> = listed.iter().map(|r| r["ID"].as_str().unwrap()).collect();
    assert_eq!(
        ids,
        ["a-probe", "asset1", "asset2", "asset3", "asset4", "asset5", "asset6", "b-probe"]
    );
    assert_eq!(listed[3]["Owner"], "Logistics");
    assert_eq!(listed[7]["Temperature"], 12.5);
    assert_eq!(ok(&mut ledger, "GetAllAssets", &[]), ok(&mut ledger, "ListAll", &[]));
}

#[test]
fn test_list_all_tolerates_undecodable_values() {
    let mut ledger = MemoryLedger::from_entries([
        ("a".to_string(), b"plain text".to_vec()),
        (
            "b".to_string(),
            br#"{"ID":"b","Owner":"o","Status":"open","Temperature":1,"Timestamp":"t","docType":"asset"}"#.to_vec(),
        ),
    ])
    .unwrap();
    let listed: Vec<Value> = serde_json::from_str(&ok(&mut ledger, "ListAll", &[])).unwrap();
    assert_eq!(listed[0], Value::String("plain text".to_string()));
    assert_eq!(listed[1]["ID"], "b");
}

#[test]
fn test_out_of_range_temperature_is_rejected_and_listing_still_works() {
    let mut ledger = seeded();
    for reading in ["1e19", "-1e19", "9007199254740992"] {
        let response = run(&mut ledger, "CreateAsset", &["big", reading, "open", "o", "t"]);
        assert!(!response.is_success(), "{reading} accepted");
        assert!(response.message.contains("interoperable range"), "{}", response.message);
        let response = run(&mut ledger, "CheckTemperature", &["big", reading, "open", "o", "t"]);
        assert!(!response.is_success(), "{reading} accepted");
    }
    assert_eq!(ok(&mut ledger, "Exists", &["big"]), "false");

    ok(&mut ledger, "CreateAsset", &["edge", "9007199254740991", "open", "o", "t"]);
    ok(&mut ledger, "CreateAsset", &["edge-neg", "-9007199254740991", "open", "o", "t"]);
    let listed: Vec<Value> = serde_json::from_str(&ok(&mut ledger, "ListAll", &[])).unwrap();
    assert_eq!(listed.len(), 8);
    assert_eq!(listed[6]["ID"], "edge");
    assert_eq!(listed[6]["Temperature"], 9_007_199_254_740_991u64);
}

#[test]
fn test_list_all_tolerates_foreign_unsafe_integers() {
    let mut ledger = MemoryLedger::from_entries([
        ("k".to_string(), br#"{"n":9007199254740993}"#.to_vec()),
        (
            "l".to_string(),
            br#"{"ID":"l","Owner":"o","Status":"open","Temperature":1,"Timestamp":"t","docType":"asset"}"#.to_vec(),
        ),
    ])
    .unwrap();
    let listed: Vec<Value> = serde_json::from_str(&ok(&mut ledger, "ListAll", &[])).unwrap();
    assert_eq!(listed[0], Value::String(r#"{"n":9007199254740993}"#.to_string()));
    assert_eq!(listed[1]["ID"], "l");
}

#[test]
fn test_list_all_on_empty_ledger() {
    let mut ledger = MemoryLedger::new();
    assert_eq!(ok(&mut ledger, "ListAll", &[]), "[]");
}

// ---------------------------------------------------------------------------
// Status validation policy
// ---------------------------------------------------------------------------

fn strict() -> AssetContract {
    AssetContract::new(ContractConfig {
        status_policy: StatusPolicy::Strict,
        ..ContractConfig::default()
    })
}

#[test]
fn test_permissive_policy_stores_any_status() {
    let mut ledger = seeded();
    ok(&mut ledger, "CreateAsset", &["x", "65", "whatever", "o", "t"]);
    ok(&mut ledger, "UpdateAssetStatus", &["asset2", "CLOSED"]);
    assert_eq!(read(&mut ledger, "x").status(), "whatever");
    assert_eq!(read(&mut ledger, "asset2").status(), "CLOSED");
    assert_eq!(ok(&mut ledger, "CheckAssetStatus", &["asset2"]), "false");
}

#[test]
fn test_strict_policy_rejects_out_of_set_status() {
    let mut ledger = MemoryLedger::new();
    let contract = strict();

    let response = submit(&mut ledger, &contract, "CreateAsset", &["x", "65", "closed", "o", "t"]);
    assert!(!response.is_success());
    assert!(response.message.contains("\"closed\""), "{}", response.message);
    assert!(ledger.is_empty());

    assert!(submit(&mut ledger, &contract, "CreateAsset", &["x", "65", "open", "o", "t"]).is_success());
    let response = submit(&mut ledger, &contract, "UpdateAssetStatus", &["x", "Open"]);
    assert!(!response.is_success());
    assert!(submit(&mut ledger, &contract, "UpdateAssetStatus", &["x", "rejected"]).is_success());
}

#[test]
fn test_strict_policy_still_seeds_fixture_statuses() {
    let mut ledger = MemoryLedger::new();
    let contract = strict();
    assert!(submit(&mut ledger, &contract, "InitLedger", &[] as &[&str]).is_success());
    let response = submit(&mut ledger, &contract, "CheckAssetStatus", &["asset1"]);
    assert_eq!(response.payload_text(), "false");
    let response = submit(&mut ledger, &contract, "CheckAssetStatus", &["asset2"]);
    assert_eq!(response.payload_text(), "true");
}

#[test]
fn test_strict_policy_reports_missing_before_invalid_status() {
    let mut ledger = MemoryLedger::new();
    let response = submit(&mut ledger, &strict(), "UpdateAssetStatus", &["ghost", "bogus"]);
    assert!(response.message.contains("ghost does not exist"));
}

// ---------------------------------------------------------------------------
// Atomicity
// ---------------------------------------------------------------------------

/// Passes reads through and fails every write once `writes_left` reaches zero.
struct FlakyLedger<'a, L: LedgerContext> {
    inner: &'a mut L,
    writes_left: usize,
}

impl<L: LedgerContext> LedgerContext for FlakyLedger<'_, L> {
    fn get_state(&self, key: &str) -> Result<Vec<u8>, LedgerError> {
        self.inner.get_state(key)
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        if self.writes_left == 0 {
            return Err(LedgerError::Unavailable("invocation aborted".to_string()));
        }
        self.writes_left -= 1;
        self.inner.put_state(key, value)
    }

    fn get_state_by_range(&self, start: &str, end: &str) -> Result<StateRange<'_>, LedgerError> {
        self.inner.get_state_by_range(start, end)
    }
}

#[test]
fn test_store_failure_mid_invocation_leaves_no_partial_write() {
    let mut ledger = MemoryLedger::new();
    let contract = AssetContract::default();
    {
        let mut tx = ledger.begin();
        let mut flaky = FlakyLedger { inner: &mut tx, writes_left: 3 };
        let err = contract.invoke(&mut flaky, "InitLedger", &[] as &[&str]).unwrap_err();
        assert!(matches!(err, ContractError::Ledger(LedgerError::Unavailable(_))));
        // The platform aborts: the transaction is dropped without commit.
    }
    assert!(ledger.is_empty());
}

#[test]
fn test_failed_invocation_leaves_ledger_untouched() {
    let mut ledger = seeded();
    let before = ledger.clone();
    for (function, args) in [
        ("CreateAsset", vec!["asset1", "65", "open", "o", "t"]),
        ("UpdateAssetStatus", vec!["missing", "open"]),
        ("TransferAsset", vec!["missing", "o"]),
        ("CreateAsset", vec!["new", "hot", "open", "o", "t"]),
        ("DeleteAsset", vec!["asset1"]),
    ] {
        assert!(!run(&mut ledger, function, &args).is_success(), "{function} should fail");
        assert_eq!(ledger, before, "{function} must not write");
    }
}

#[test]
fn test_scan_failure_is_fatal() {
    struct BrokenScan;
    impl LedgerContext for BrokenScan {
        fn get_state(&self, _key: &str) -> Result<Vec<u8>, LedgerError> {
            Ok(Vec::new())
        }
        fn put_state(&mut self, _key: &str, _value: &[u8]) -> Result<(), LedgerError> {
            Ok(())
        }
        fn get_state_by_range(&self, _: &str, _: &str) -> Result<StateRange<'_>, LedgerError> {
            let entries = vec![
                Ok(KeyValue { key: "a".to_string(), value: b"{}".to_vec() }),
                Err(LedgerError::Unavailable("iterator closed".to_string())),
            ];
            Ok(Box::new(entries.into_iter()))
        }
    }

    let err = AssetContract::default().list_all(&BrokenScan).unwrap_err();
    assert!(matches!(err, ContractError::Ledger(_)));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn existence_follows_creation(
        id in "[a-zA-Z0-9_-]{1,12}",
        temperature in any::<f64>().prop_filter("finite", |t| t.is_finite()),
    ) {
        let mut ledger = MemoryLedger::new();
        let reading = temperature.to_string();
        prop_assert_eq!(ok(&mut ledger, "Exists", &[&id]), "false");

        let created = run(&mut ledger, "CreateAsset", &[&id, &reading, "open", "o", "t"]);
        let in_range = temperature.abs() <= MAX_SAFE_INTEGER as f64;
        prop_assert_eq!(created.is_success(), in_range);
        prop_assert_eq!(ok(&mut ledger, "Exists", &[&id]), in_range.to_string());
        prop_assert!(run(&mut ledger, "ListAll", &[]).is_success());

        if in_range {
            prop_assert!(!run(&mut ledger, "CreateAsset", &[&id, &reading, "open", "o", "t"]).is_success());
        }
    }

    #[test]
    fn listing_survives_every_accepted_write(
        readings in prop::collection::vec(any::<f64>().prop_filter("finite", |t| t.is_finite()), 1..8),
        status in "\\PC{0,8}",
    ) {
        let mut ledger = seeded();
        for (i, temperature) in readings.iter().enumerate() {
            let id = format!("reading{i}");
            let reading = temperature.to_string();
            run(&mut ledger, "CreateAsset", &[&id, &reading, &status, "o", "t"]);
            run(&mut ledger, "CheckTemperature", &[&format!("check{i}"), &reading, "open", "o", "t"]);
            run(&mut ledger, "UpdateAssetStatus", &[&id, &status]);
            let listed = run(&mut ledger, "ListAll", &[]);
            prop_assert!(listed.is_success(), "{}", listed.message);
        }
    }

    #[test]
    fn replicas_agree_on_bytes(
        ids in prop::collection::btree_set("[a-z]{1,6}", 1..6),
        owner in "[A-Za-z]{1,10}",
    ) {
        let mut a = MemoryLedger::new();
        let mut b = MemoryLedger::new();
        for replica in [&mut a, &mut b] {
            for (i, id) in ids.iter().enumerate() {
                let reading = format!("{}.5", 50 + i);
                ok(replica, "CreateAsset", &[id, &reading, "open", "Catering", "2024"]);
                ok(replica, "TransferAsset", &[id, &owner]);
            }
        }
        prop_assert_eq!(a, b);
    }

    #[test]
    fn transfer_changes_only_owner(new_owner in "\\PC{0,12}") {
        let mut ledger = seeded();
        let before = read(&mut ledger, "asset4");
        prop_assert_eq!(ok(&mut ledger, "TransferAsset", &["asset4", &new_owner]), "Catering");
        let after = read(&mut ledger, "asset4");
        prop_assert_eq!(after.owner(), new_owner.as_str());
        prop_assert_eq!(after.status(), before.status());
        prop_assert_eq!(after.timestamp(), before.timestamp());
        prop_assert_eq!(after.temperature(), before.temperature());
    }
}
