use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde_json::Value;
use thiserror::Error;

use crate::domain::models::Organization;

pub const API_KEY_HEADER: &str = "X-Cisco-Meraki-API-Key";
pub const CHANGE_HISTORY_TIMESPAN_SECONDS: u64 = 2_678_400;
pub const CHANGE_HISTORY_PER_PAGE: u32 = 1000;
pub const CHANGE_HISTORY_STATUSES: &[&str] = &["offline", "online"];

pub trait DashboardClient {
    fn list_organizations(&self) -> Result<Vec<Organization>, ApiError>;
    fn fetch_change_history(&self, org_id: &str) -> Result<Vec<Value>, ApiError>;
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("dashboard api responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("failed to decode dashboard response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("replay file unusable: {0}")]
    Replay(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct MerakiHttpClient {
    client: Client,
    base_url: String,
    api_key: String,
    verbose: bool,
}

impl MerakiHttpClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(settings.timeout).build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            verbose: settings.verbose,
        })
    }

    fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(ApiError::Status { status, body });
        }

        let value: Value = serde_json::from_str(&body)?;
        tracing::info!(path, status = status.as_u16(), "dashboard request succeeded");
        Ok(value)
    }
}

impl DashboardClient for MerakiHttpClient {
    fn list_organizations(&self) -> Result<Vec<Organization>, ApiError> {
        let value = self.get_json("/organizations", &[])?;
        serde_json::from_value(value).map_err(ApiError::from)
    }

    fn fetch_change_history(&self, org_id: &str) -> Result<Vec<Value>, ApiError> {
        let mut query = vec![
            ("timespan", CHANGE_HISTORY_TIMESPAN_SECONDS.to_string()),
            ("perPage", CHANGE_HISTORY_PER_PAGE.to_string()),
        ];
        query.extend(
            CHANGE_HISTORY_STATUSES
                .iter()
                .map(|status| ("statuses[]", status.to_string())),
        );

        let path = format!("/organizations/{org_id}/devices/availabilities/changeHistory");
        let value = self.get_json(&path, &query)?;

        if self.verbose {
            tracing::debug!(
                response = %serde_json::to_string_pretty(&value).unwrap_or_default(),
                "device change history response"
            );
        }

        serde_json::from_value(value).map_err(ApiError::from)
    }
}
