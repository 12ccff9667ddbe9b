use super::*;

#[test]
fn plans_url_appends_cdr_path_to_root_base() {
    let url = plans_url("https://api.acme.example/").unwrap();
    assert_eq!(url.as_str(), "https://api.acme.example/cds-au/v1/energy/plans");
}

#[test]
fn plans_url_keeps_base_path_prefix() {
    let url = plans_url("https://cdr.bolt.example/retail/").unwrap();
    assert_eq!(
        url.as_str(),
        "https://cdr.bolt.example/retail/cds-au/v1/energy/plans"
    );
}

#[test]
fn plans_url_handles_base_without_trailing_slash() {
    let url = plans_url("https://api.acme.example").unwrap();
    assert_eq!(url.as_str(), "https://api.acme.example/cds-au/v1/energy/plans");
}

#[test]
fn plans_url_drops_query_on_base() {
    let url = plans_url("https://api.acme.example/?token=abc").unwrap();
    assert_eq!(url.as_str(), "https://api.acme.example/cds-au/v1/energy/plans");
}

#[test]
fn plans_page_url_carries_fixed_filters() {
    let url = plans_page_url("https://api.acme.example/", 2, 1000).unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.acme.example/cds-au/v1/energy/plans?effective=CURRENT&type=ALL&page=2&page-size=1000&fuelType=ALL"
    );
}

#[test]
fn plan_detail_url_appends_plan_id() {
    let url = plan_detail_url("https://api.acme.example/", "ACME001MR@EME").unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.acme.example/cds-au/v1/energy/plans/ACME001MR@EME"
    );
}

#[test]
fn plan_detail_url_encodes_slash_in_plan_id() {
    let url = plan_detail_url("https://api.acme.example/", "A/B").unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.acme.example/cds-au/v1/energy/plans/A%2FB"
    );
}

#[test]
fn plans_url_rejects_unparseable_base() {
    let err = plans_url("not-a-url").unwrap_err();
    assert!(
        matches!(err, ClientError::InvalidBaseUrl { .. }),
        "expected InvalidBaseUrl, got: {err:?}"
    );
}

#[test]
fn plans_url_rejects_cannot_be_a_base() {
    let err = plans_url("mailto:cdr@acme.example").unwrap_err();
    assert!(matches!(err, ClientError::InvalidBaseUrl { .. }), "{err:?}");
}

#[test]
fn malformed_classification() {
    let e = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
    assert!(ClientError::Deserialize {
        context: "t".to_owned(),
        source: e
    }
    .is_malformed_response());
    assert!(ClientError::MalformedResponse {
        context: "t".to_owned(),
        reason: "r".to_owned()
    }
    .is_malformed_response());
    assert!(!ClientError::UnexpectedStatus {
        status: 503,
        url: "https://api.acme.example/".to_owned()
    }
    .is_malformed_response());
}
