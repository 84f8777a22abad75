pub mod root;
pub mod public;
pub mod admin;
pub mod clubs;
pub mod memberships;
pub mod events;
pub mod me;
pub mod users;

use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, Result};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

pub const MAX_LIMIT: i64 = 100;

/// Caller-supplied page sizes are kept within `1..=MAX_LIMIT`.
pub fn clamp_limit(limit: i64) -> i64 {
    limit.clamp(1, MAX_LIMIT)
}

impl SearchParams {
    /// Blank searches are treated as no search.
    pub fn query(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    pub fn limit(&self) -> i64 {
        clamp_limit(self.limit)
    }
}

/// Informational results of idempotent operations, as
/// `{"outcome": ..., "message": ...}` plus any payload the outcome carries.
pub(crate) fn outcome_response<T: Serialize>(outcome: &T, message: &str) -> Result<Json<Value>> {
    let value = serde_json::to_value(outcome).map_err(|e| AppError::Internal(e.to_string()))?;

    let body = match value {
        Value::Object(mut fields) => {
            fields.insert("message".to_string(), json!(message));
            Value::Object(fields)
        }
        other => json!({ "outcome": other, "message": message }),
    };

    Ok(Json(body))
}
