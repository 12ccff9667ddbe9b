use cdrplans_client::ClientError;
use cdrplans_store::StoreError;
use thiserror::Error;

use crate::FailureKind;

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("invalid refresh configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to fetch plan {plan_id} from {brand}: {source}")]
    Fetch {
        brand: String,
        plan_id: String,
        #[source]
        source: ClientError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("refresh cancelled")]
    Cancelled,
}

impl RefreshError {
    /// Failure category for reporting, `None` for configuration and
    /// cancellation.
    #[must_use]
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            RefreshError::Fetch { source, .. } => Some(FailureKind::for_detail(source)),
            RefreshError::Store(_) => Some(FailureKind::Persistence),
            RefreshError::InvalidConfig(_) | RefreshError::Cancelled => None,
        }
    }
}
