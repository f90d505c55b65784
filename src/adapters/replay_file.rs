use std::collections::HashMap;
use std::fs;

use serde::Deserialize;
use serde_json::Value;

use crate::adapters::meraki_api::{ApiError, DashboardClient};
use crate::domain::models::Organization;

// {
//   "organizations": { "ok": [{ "id": "123", "name": "Acme" }] },
//   "change_history": { "123": { "ok": [ ... ] } }
// }
// Any response may be { "error": "<message>" } instead.
#[derive(Debug, Clone, Deserialize)]
struct ReplayFile {
    organizations: ReplayResponse,
    #[serde(default)]
    change_history: HashMap<String, ReplayResponse>,
}

#[derive(Debug, Clone, Deserialize)]
struct ReplayResponse {
    ok: Option<Value>,
    error: Option<String>,
}

impl ReplayResponse {
    fn payload(&self) -> Result<&Value, ApiError> {
        match (&self.ok, &self.error) {
            (Some(payload), None) => Ok(payload),
            (None, Some(error)) => Err(ApiError::Replay(format!("scripted failure: {error}"))),
            _ => Err(ApiError::Replay(
                "response must contain exactly one of: ok or error".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReplayFileClient {
    replay: ReplayFile,
}

impl ReplayFileClient {
    pub fn from_file(path: &str) -> Result<Self, ApiError> {
        let content = fs::read_to_string(path)
            .map_err(|error| ApiError::Replay(format!("cannot read {path}: {error}")))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ApiError> {
        let replay: ReplayFile = serde_json::from_str(content)?;
        Ok(Self { replay })
    }
}

impl DashboardClient for ReplayFileClient {
    fn list_organizations(&self) -> Result<Vec<Organization>, ApiError> {
        let payload = self.replay.organizations.payload()?;
        serde_json::from_value(payload.clone()).map_err(ApiError::from)
    }

    fn fetch_change_history(&self, org_id: &str) -> Result<Vec<Value>, ApiError> {
        let response = self.replay.change_history.get(org_id).ok_or_else(|| {
            ApiError::Replay(format!("no change history captured for organization {org_id}"))
        })?;
        let payload = response.payload()?;
        serde_json::from_value(payload.clone()).map_err(ApiError::from)
    }
}
