use crate::category::LabelMatching;
use crate::error::{ReportError, ReportResult};
use crate::rollup::Dimension;
use crate::types::{Role, UserId};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_ENV: &str = "SALES_REPORT_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "report_config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub facts_path: String,
    pub members_path: String,
    pub submissions_path: String,
    pub output_path: String,
    pub label_matching: LabelMatching,
    /// Preceding years fetched with each selected year (for year-over-year).
    pub comparison_years: u32,
    /// Reporting timezone, hours east of UTC.
    pub utc_offset_hours: i32,
    pub role: Role,
    pub user_id: Option<UserId>,
    pub dimensions: Vec<Dimension>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            facts_path: "contract_facts.csv".to_string(),
            members_path: "users.csv".to_string(),
            submissions_path: "contract_submissions.csv".to_string(),
            output_path: "sales_report.json".to_string(),
            label_matching: LabelMatching::Trimmed,
            comparison_years: 1,
            utc_offset_hours: 7,
            role: Role::Admin,
            user_id: None,
            dimensions: Dimension::ALL.to_vec(),
        }
    }
}

impl ReportConfig {
    pub fn load(path: &str) -> ReportResult<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| ReportError::Config {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    /// A missing file means defaults; a malformed one is an error.
    pub fn load_or_default(path: &str) -> ReportResult<Self> {
        if !Path::new(path).exists() {
            log::info!("config: {path} not found, using defaults");
            return Ok(ReportConfig::default());
        }
        let config = Self::load(path)?;
        log::info!("config: loaded {path}");
        Ok(config)
    }

    /// Config named by `SALES_REPORT_CONFIG`, else `report_config.json`.
    pub fn from_env() -> ReportResult<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_or_default(&path)
    }
}
