pub mod client;
pub mod error;
pub mod pagination;
pub mod types;

pub use client::CdrClient;
pub use error::ClientError;
pub use types::{PageMeta, PlanListData, PlanListResponse};
