//! Incremental refresh of cached CDR plan catalogs and plan details.
//!
//! [`Coordinator`] decides which artifacts are stale, fetches only those with
//! a bounded number of in-flight requests, and persists the results through
//! the artifact store. Progress is reported to an injected
//! [`RefreshObserver`].

mod config;
mod coordinator;
mod error;
mod events;
mod summary;

pub use config::RefreshConfig;
pub use coordinator::{Coordinator, DetailOutcome};
pub use error::RefreshError;
pub use events::{RefreshEvent, RefreshObserver, TracingObserver};
pub use summary::{FailureKind, RefreshFailure, RefreshPlan, RefreshSummary};
