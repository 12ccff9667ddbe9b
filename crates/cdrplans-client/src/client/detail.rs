//! Single-plan detail fetch for `CdrClient`.

use cdrplans_core::{PlanDetail, Provider};
use serde_json::Value;

use crate::error::ClientError;

use super::urls::plan_detail_url;
use super::CdrClient;

impl CdrClient {
    /// Fetches the full detail record for one plan.
    ///
    /// The response document is kept as-is; stamping it with freshness
    /// metadata is the artifact store's job.
    ///
    /// # Errors
    ///
    /// - [`ClientError::UnexpectedStatus`] for any non-2xx status.
    /// - [`ClientError::Http`] on network or TLS failure, including timeouts.
    /// - [`ClientError::Deserialize`] if the body is not JSON.
    /// - [`ClientError::MalformedResponse`] if the body is JSON but not an object.
    /// - [`ClientError::InvalidBaseUrl`] if the provider's base URL is unusable.
    pub async fn fetch_plan_detail(
        &self,
        provider: &Provider,
        plan_id: &str,
    ) -> Result<PlanDetail, ClientError> {
        let url = plan_detail_url(&provider.base_url, plan_id)?;
        let context = format!("plan {plan_id} from {}", provider.brand_name);

        match self.get_json(url, &context).await? {
            Value::Object(payload) => Ok(PlanDetail {
                plan_id: plan_id.to_owned(),
                payload,
            }),
            other => Err(ClientError::MalformedResponse {
                context,
                reason: format!("expected a JSON object, got {}", json_kind(&other)),
            }),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
