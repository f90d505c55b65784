use std::path::PathBuf;
use std::time::Duration;

use crate::adapters::meraki_api::ApiSettings;
use crate::app::AppError;

pub const DEFAULT_BASE_URL: &str = "https://api.meraki.com/api/v1";
pub const DEFAULT_LOG_PATH: &str = "device_status.log";
pub const DEFAULT_OUTPUT_CSV: &str = "device_offline_durations.csv";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub org_id: Option<String>,
    pub replay_file: Option<String>,
    pub http_timeout_secs: u64,
    pub verbose_logging: bool,
    pub log_path: PathBuf,
    pub output_csv: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = non_empty(&lookup, "MERAKI_API_KEY");
        let replay_file = non_empty(&lookup, "MERAKI_REPLAY_FILE");

        if api_key.is_none() && replay_file.is_none() {
            return Err(AppError::config("MERAKI_API_KEY is required"));
        }

        let http_timeout_secs = parse_or_default(&lookup, "HTTP_TIMEOUT_SECS", 30_u64)?;
        if http_timeout_secs == 0 {
            return Err(AppError::config("HTTP_TIMEOUT_SECS must be greater than zero"));
        }

        Ok(Self {
            api_key,
            base_url: non_empty(&lookup, "MERAKI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            org_id: non_empty(&lookup, "MERAKI_ORG_ID"),
            replay_file,
            http_timeout_secs,
            verbose_logging: parse_flag(&lookup, "VERBOSE_LOGGING")?,
            log_path: non_empty(&lookup, "LOG_PATH")
                .unwrap_or_else(|| DEFAULT_LOG_PATH.to_string())
                .into(),
            output_csv: non_empty(&lookup, "OUTPUT_CSV")
                .unwrap_or_else(|| DEFAULT_OUTPUT_CSV.to_string())
                .into(),
        })
    }

    pub fn api_settings(&self) -> Result<ApiSettings, AppError> {
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| AppError::config("MERAKI_API_KEY is required"))?;

        Ok(ApiSettings {
            base_url: self.base_url.clone(),
            api_key,
            timeout: Duration::from_secs(self.http_timeout_secs),
            verbose: self.verbose_logging,
        })
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or_default<T, F>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr + Copy,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::config(format!("{key} must be a valid number"))),
        None => Ok(default),
    }
}

fn parse_flag<F>(lookup: &F, key: &str) -> Result<bool, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup, key).map(|v| v.to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(AppError::config(format!("{key} must be a boolean"))),
        },
    }
}
