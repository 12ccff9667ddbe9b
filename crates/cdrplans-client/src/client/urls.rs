//! Endpoint URL construction for the CDR plan API.

use reqwest::Url;

use crate::error::ClientError;

const PLANS_PATH: [&str; 4] = ["cds-au", "v1", "energy", "plans"];

/// `{base_url}cds-au/v1/energy/plans`, with any query string on the base
/// dropped.
///
/// # Errors
///
/// Returns [`ClientError::InvalidBaseUrl`] if `base_url` does not parse or
/// cannot carry a path.
pub fn plans_url(base_url: &str) -> Result<Url, ClientError> {
    let invalid = |reason: String| ClientError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason,
    };

    let mut url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|()| invalid("URL cannot be a base".to_owned()))?
        .pop_if_empty()
        .extend(PLANS_PATH);
    Ok(url)
}

/// One page of the plan listing with the fixed CDR filters applied.
///
/// # Errors
///
/// Returns [`ClientError::InvalidBaseUrl`] if `base_url` is unusable.
pub fn plans_page_url(base_url: &str, page: u32, page_size: u32) -> Result<Url, ClientError> {
    let mut url = plans_url(base_url)?;
    url.query_pairs_mut()
        .append_pair("effective", "CURRENT")
        .append_pair("type", "ALL")
        .append_pair("page", &page.to_string())
        .append_pair("page-size", &page_size.to_string())
        .append_pair("fuelType", "ALL");
    Ok(url)
}

/// `{base_url}cds-au/v1/energy/plans/{plan_id}`; `plan_id` is percent-encoded
/// as a single path segment.
///
/// # Errors
///
/// Returns [`ClientError::InvalidBaseUrl`] if `base_url` is unusable.
pub fn plan_detail_url(base_url: &str, plan_id: &str) -> Result<Url, ClientError> {
    let mut url = plans_url(base_url)?;
    url.path_segments_mut()
        .map_err(|()| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: "URL cannot be a base".to_owned(),
        })?
        .push(plan_id);
    Ok(url)
}
