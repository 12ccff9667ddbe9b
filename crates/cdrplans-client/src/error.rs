use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed response for {context}: {reason}")]
    MalformedResponse { context: String, reason: String },

    #[error("pagination limit reached for {base_url}: exceeded {max_pages} pages")]
    PaginationLimit { base_url: String, max_pages: u32 },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl ClientError {
    /// `true` when the server answered but the body was not what the CDR
    /// endpoints promise (bad JSON, missing pagination metadata, runaway
    /// page counts). Everything else is a transport or status failure.
    #[must_use]
    pub fn is_malformed_response(&self) -> bool {
        matches!(
            self,
            ClientError::Deserialize { .. }
                | ClientError::MalformedResponse { .. }
                | ClientError::PaginationLimit { .. }
        )
    }
}
