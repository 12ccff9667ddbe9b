//! Integration tests for `ArtifactStore` against a temporary directory.

use cdrplans_core::{PlanDetail, PlanSummary};
use cdrplans_store::{parse_timestamp, ArtifactStore, Freshness, StoreError, WriteOutcome};
use chrono::{DateTime, TimeDelta, Utc};
use serde_json::{json, Value};

fn at(raw: &str) -> DateTime<Utc> {
    parse_timestamp(raw).unwrap()
}

fn plan(id: &str, postcodes: &[&str]) -> PlanSummary {
    serde_json::from_value(json!({
        "planId": id,
        "brandName": "Acme Energy",
        "displayName": format!("Plan {id}"),
        "fuelType": "ELECTRICITY",
        "geography": { "includedPostcodes": postcodes }
    }))
    .unwrap()
}

fn detail(id: &str) -> PlanDetail {
    let payload = json!({
        "data": { "planId": id, "electricityContract": { "pricingModel": "SINGLE_RATE" } },
        "links": { "self": format!("https://api.acme.example/cds-au/v1/energy/plans/{id}") },
        "meta": {}
    });
    PlanDetail {
        plan_id: id.to_owned(),
        payload: payload.as_object().cloned().unwrap(),
    }
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// Catalogs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn write_catalog_produces_enveloped_stamped_document() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let stamp = at("2024-03-01T10:20:30.456Z");

    let outcome = store
        .write_catalog("Acme Energy", &[plan("A1", &["2000"]), plan("A2", &[])], stamp)
        .await
        .unwrap();
    assert_eq!(outcome, WriteOutcome::Written);

    let doc = read_json(&dir.path().join("acme_energy").join("plans.json"));
    assert_eq!(doc["meta"]["lastDownloaded"], json!("2024-03-01T10:20:30.456Z"));
    assert_eq!(doc["data"]["plans"].as_array().unwrap().len(), 2);
    assert_eq!(doc["data"]["plans"][0]["planId"], json!("A1"));

    assert_eq!(
        store.catalog_freshness("Acme Energy").await.unwrap(),
        Freshness::Stamped(stamp)
    );
}

#[tokio::test]
async fn read_catalog_round_trips_plans() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let stamp = at("2024-03-01T00:00:00Z");
    let plans = vec![plan("A1", &["2000"]), plan("A2", &["3000"])];

    store.write_catalog("Acme Energy", &plans, stamp).await.unwrap();
    let catalog = store.read_catalog("Acme Energy").await.unwrap().unwrap();

    assert_eq!(catalog.brand_key, "acme_energy");
    assert_eq!(catalog.last_downloaded, Some(stamp));
    assert_eq!(catalog.plans, plans);
}

#[tokio::test]
async fn legacy_bare_array_catalog_is_readable_but_unstamped() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    std::fs::create_dir_all(dir.path().join("acme_energy")).unwrap();
    std::fs::write(
        dir.path().join("acme_energy").join("plans.json"),
        serde_json::to_vec(&json!([{"planId": "OLD1"}])).unwrap(),
    )
    .unwrap();

    assert_eq!(
        store.catalog_freshness("Acme Energy").await.unwrap(),
        Freshness::Unstamped
    );
    let catalog = store.read_catalog("Acme Energy").await.unwrap().unwrap();
    assert_eq!(catalog.last_downloaded, None);
    assert_eq!(catalog.plans[0].plan_id, "OLD1");
}

#[tokio::test]
async fn missing_catalog_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    assert_eq!(
        store.catalog_freshness("Nobody").await.unwrap(),
        Freshness::Absent
    );
    assert!(store.read_catalog("Nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn remove_catalog_keeps_details() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let stamp = at("2024-03-01T00:00:00Z");

    store.write_catalog("Acme Energy", &[plan("A1", &[])], stamp).await.unwrap();
    store.write_detail("Acme Energy", detail("A1"), stamp).await.unwrap();

    assert!(store.remove_catalog("Acme Energy").await.unwrap());
    assert!(!store.remove_catalog("Acme Energy").await.unwrap());
    assert!(!store.catalog_path("Acme Energy").exists());
    assert!(store.detail_path("Acme Energy", "A1").unwrap().exists());
}

#[tokio::test]
async fn older_catalog_does_not_replace_newer() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let newer = at("2024-06-01T00:00:00Z");

    store.write_catalog("Acme Energy", &[plan("NEW", &[])], newer).await.unwrap();
    let outcome = store
        .write_catalog("Acme Energy", &[plan("OLD", &[])], newer - TimeDelta::days(1))
        .await
        .unwrap();

    assert_eq!(outcome, WriteOutcome::Superseded { existing: newer });
    let catalog = store.read_catalog("Acme Energy").await.unwrap().unwrap();
    assert_eq!(catalog.plans[0].plan_id, "NEW");
}

// ---------------------------------------------------------------------------
// Details
// ---------------------------------------------------------------------------

#[tokio::test]
async fn write_detail_stamps_and_preserves_payload() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let stamp = at("2024-01-03T00:00:00Z");

    store.write_detail("Acme Energy", detail("A1"), stamp).await.unwrap();

    let doc = store.read_detail("Acme Energy", "A1").await.unwrap().unwrap();
    assert_eq!(doc["meta"]["lastDownloaded"], json!("2024-01-03T00:00:00.000Z"));
    assert_eq!(
        doc["data"]["electricityContract"]["pricingModel"],
        json!("SINGLE_RATE")
    );
    assert_eq!(
        store.detail_freshness("Acme Energy", "A1").await.unwrap(),
        Freshness::Stamped(stamp)
    );
}

#[tokio::test]
async fn stale_detail_is_detected_from_embedded_stamp() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    store
        .write_detail("Acme Energy", detail("A1"), at("2024-01-01T00:00:00.000Z"))
        .await
        .unwrap();

    let freshness = store.detail_freshness("Acme Energy", "A1").await.unwrap();
    assert!(freshness.is_stale(TimeDelta::days(1), at("2024-01-03T00:00:00.000Z")));
}

#[tokio::test]
async fn invalid_plan_id_is_rejected_before_touching_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());

    let err = store
        .write_detail("Acme Energy", detail("../escape"), at("2024-01-01T00:00:00Z"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidPlanId { .. }), "{err:?}");
    assert!(!dir.path().join("acme_energy").exists());

    let err = store.detail_freshness("Acme Energy", "plans").await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidPlanId { .. }), "{err:?}");
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_catalogs_skips_corrupt_and_catalogless_brands() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let stamp = at("2024-03-01T00:00:00Z");

    store.write_catalog("Zed Power", &[plan("Z1", &[])], stamp).await.unwrap();
    store.write_catalog("Acme Energy", &[plan("A1", &[])], stamp).await.unwrap();
    std::fs::create_dir_all(dir.path().join("broken")).unwrap();
    std::fs::write(dir.path().join("broken").join("plans.json"), b"{not json").unwrap();
    std::fs::create_dir_all(dir.path().join("details_only")).unwrap();
    std::fs::write(dir.path().join("stray.txt"), b"x").unwrap();

    let keys: Vec<String> = store
        .list_catalogs()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.brand_key)
        .collect();
    assert_eq!(keys, ["acme_energy", "zed_power"]);
}

#[tokio::test]
async fn list_catalogs_skips_directories_that_are_not_brand_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());

    store
        .write_catalog("Acme Energy", &[plan("A1", &[])], at("2024-03-01T00:00:00Z"))
        .await
        .unwrap();
    let legacy = dir.path().join("Acme Energy");
    std::fs::create_dir_all(&legacy).unwrap();
    std::fs::write(legacy.join("plans.json"), br#"[{"planId": "LEGACY1"}]"#).unwrap();

    let catalogs = store.list_catalogs().await.unwrap();
    assert_eq!(catalogs.len(), 1);
    assert_eq!(catalogs[0].brand_key, "acme_energy");
    assert_eq!(catalogs[0].plans[0].plan_id, "A1");
}

#[tokio::test]
async fn list_catalogs_on_missing_root_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path().join("not-created-yet"));
    assert!(store.list_catalogs().await.unwrap().is_empty());
}

#[tokio::test]
async fn find_plan_returns_owning_brand() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let stamp = at("2024-03-01T00:00:00Z");

    store.write_catalog("Acme Energy", &[plan("A1", &[])], stamp).await.unwrap();
    store.write_catalog("Bolt Power", &[plan("B7", &[])], stamp).await.unwrap();

    let (brand, found) = store.find_plan("B7").await.unwrap().unwrap();
    assert_eq!(brand, "bolt_power");
    assert_eq!(found.plan_id, "B7");
    assert!(store.find_plan("NOPE").await.unwrap().is_none());
}

#[tokio::test]
async fn plans_for_postcode_filters_on_included_postcodes() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let stamp = at("2024-03-01T00:00:00Z");

    store
        .write_catalog(
            "Acme Energy",
            &[plan("A1", &["2000", "2010"]), plan("A2", &["3000"])],
            stamp,
        )
        .await
        .unwrap();
    store
        .write_catalog("Bolt Power", &[plan("B1", &["2000"])], stamp)
        .await
        .unwrap();

    let hits: Vec<(String, String)> = store
        .plans_for_postcode("2000")
        .await
        .unwrap()
        .into_iter()
        .map(|(brand, p)| (brand, p.plan_id))
        .collect();
    assert_eq!(
        hits,
        [
            ("acme_energy".to_owned(), "A1".to_owned()),
            ("bolt_power".to_owned(), "B1".to_owned())
        ]
    );
}
