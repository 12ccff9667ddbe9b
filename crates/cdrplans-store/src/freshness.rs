//! Freshness of cached artifacts.
//!
//! An artifact is stale when it is absent, when it carries no readable
//! `meta.lastDownloaded`, or when that timestamp is older than the TTL.

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde_json::{Map, Value};

/// Freshness state read from one artifact path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Nothing at the path yet.
    Absent,
    /// A document exists but has no parseable `meta.lastDownloaded`
    /// (legacy bare-array catalog, interrupted legacy write, corrupt JSON).
    Unstamped,
    Stamped(DateTime<Utc>),
}

impl Freshness {
    /// `true` when the artifact must be (re)fetched: absent, unstamped, or
    /// `now - last_downloaded > ttl`.
    #[must_use]
    pub fn is_stale(&self, ttl: TimeDelta, now: DateTime<Utc>) -> bool {
        match self {
            Freshness::Absent | Freshness::Unstamped => true,
            Freshness::Stamped(at) => now.signed_duration_since(*at) > ttl,
        }
    }

    #[must_use]
    pub fn last_downloaded(&self) -> Option<DateTime<Utc>> {
        match self {
            Freshness::Stamped(at) => Some(*at),
            Freshness::Absent | Freshness::Unstamped => None,
        }
    }

    /// Freshness of a document that exists on disk.
    #[must_use]
    pub fn of_document(doc: &Value) -> Self {
        embedded_timestamp(doc).map_or(Freshness::Unstamped, Freshness::Stamped)
    }
}

/// Renders `at` as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses any RFC 3339 timestamp into UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Reads `meta.lastDownloaded` from a stored document.
#[must_use]
pub fn embedded_timestamp(doc: &Value) -> Option<DateTime<Utc>> {
    doc.pointer("/meta/lastDownloaded")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)
}

/// Sets `meta.lastDownloaded` on a document, keeping any other `meta` keys.
/// A non-object `meta` is replaced.
pub fn stamp_document(doc: &mut Map<String, Value>, at: DateTime<Utc>) {
    let stamp = Value::String(format_timestamp(at));
    match doc.get_mut("meta") {
        Some(Value::Object(meta)) => {
            meta.insert("lastDownloaded".to_owned(), stamp);
        }
        _ => {
            let mut meta = Map::new();
            meta.insert("lastDownloaded".to_owned(), stamp);
            doc.insert("meta".to_owned(), Value::Object(meta));
        }
    }
}
