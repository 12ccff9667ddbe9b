//! On-disk artifact store for CDR plan catalogs and plan details.
//!
//! Layout under the store root:
//!
//! ```text
//! {root}/{brand_key}/plans.json      catalog: {"data": {"plans": [...]}, "meta": {"lastDownloaded": ...}}
//! {root}/{brand_key}/{planId}.json   detail:  the provider's document + meta.lastDownloaded
//! ```
//!
//! Every artifact carries its freshness timestamp in `meta.lastDownloaded`;
//! file modification times are never consulted.

mod atomic;
pub mod catalog;
pub mod detail;
pub mod freshness;
pub mod layout;
pub mod lookup;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use catalog::CachedCatalog;
pub use freshness::{format_timestamp, parse_timestamp, Freshness};
pub use layout::validate_plan_id;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize artifact for {path}: {source}")]
    Serialize {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("artifact {path} is not a valid document: {source}")]
    Deserialize {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid plan id {plan_id:?}: {reason}")]
    InvalidPlanId {
        plan_id: String,
        reason: &'static str,
    },
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Result of persisting a stamped artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// The artifact on disk already carries a newer timestamp; it was left
    /// untouched.
    Superseded {
        existing: chrono::DateTime<chrono::Utc>,
    },
}

/// Directory-per-brand JSON store.
///
/// Cheap to clone; holds only the root path. Each method touches exactly one
/// artifact path, so concurrent callers on disjoint (brand, plan) pairs need
/// no coordination.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the store root if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub async fn ensure_root(&self) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::io(&self.root, e))
    }
}
