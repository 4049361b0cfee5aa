use crate::category::{FiscalYear, Month, Quarter};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

pub type UserId = u64;

/// One CSV line of the fact export, as read. Everything is optional text;
/// the loader decides what is usable.
#[derive(Debug, Deserialize)]
pub struct RawFactRow {
    pub user_id: Option<String>,
    pub buddhist_year: Option<String>,
    pub month: Option<String>,
    pub quarter: Option<String>,
    pub region: Option<String>,
    pub price_range: Option<String>,
    pub unit: Option<String>,
    pub total_value: Option<String>,
    pub area: Option<String>,
    pub submitted_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawMemberRow {
    pub id: Option<String>,
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawSubmissionRow {
    pub user_id: Option<String>,
    pub buddhist_year: Option<String>,
    pub month_number: Option<String>,
}

/// One (submission, region, price range) contribution.
///
/// Region and price-range labels stay as the source delivered them; they
/// are classified during aggregation so unmapped labels can be counted.
#[derive(Debug, Clone, PartialEq)]
pub struct FactRow {
    pub user_id: Option<UserId>,
    pub fiscal_year: FiscalYear,
    pub month: Month,
    pub region: Option<String>,
    pub price_range: Option<String>,
    pub unit: u64,
    pub value: Decimal,
    pub area: Decimal,
    pub submitted_at: Option<NaiveDateTime>,
}

impl FactRow {
    pub fn quarter(&self) -> Quarter {
        self.month.quarter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
    Master,
}

impl Role {
    /// Admins and masters see every member's submissions.
    pub fn is_elevated(self) -> bool {
        matches!(self, Role::Admin | Role::Master)
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            "master" => Some(Role::Master),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Master => "master",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionRecord {
    pub user_id: UserId,
    pub fiscal_year: FiscalYear,
    pub month: Month,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct PriceRangeRow {
    #[serde(rename = "PriceRange")]
    #[tabled(rename = "PriceRange")]
    pub price_range: String,
    #[serde(rename = "Unit")]
    #[tabled(rename = "Unit")]
    pub unit: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
    #[serde(rename = "Area")]
    #[tabled(rename = "Area")]
    pub area: String,
    #[serde(rename = "ValuePerArea")]
    #[tabled(rename = "ValuePerArea")]
    pub value_per_area: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RegionRow {
    #[serde(rename = "Region")]
    #[tabled(rename = "Region")]
    pub region: String,
    #[serde(rename = "Unit")]
    #[tabled(rename = "Unit")]
    pub unit: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
    #[serde(rename = "Area")]
    #[tabled(rename = "Area")]
    pub area: String,
    #[serde(rename = "ValuePerArea")]
    #[tabled(rename = "ValuePerArea")]
    pub value_per_area: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MembershipRow {
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "Submitted")]
    #[tabled(rename = "Submitted")]
    pub submitted: usize,
    #[serde(rename = "NotSubmitted")]
    #[tabled(rename = "NotSubmitted")]
    pub not_submitted: usize,
    #[serde(rename = "TotalMembers")]
    #[tabled(rename = "TotalMembers")]
    pub total: usize,
    #[serde(rename = "Anomaly")]
    #[tabled(rename = "Anomaly")]
    pub anomaly: String,
}
