use crate::category::{to_fiscal, FiscalYear, Month, Quarter};
use crate::error::{ReportError, ReportResult};
use crate::types::{FactRow, Role, UserId};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

/// Furthest back a report may reach for year-over-year comparison.
pub const MAX_COMPARISON_YEARS: u32 = 10;

/// Filters as a caller sends them.
#[derive(Debug, Clone, Default)]
pub struct ReportRequest {
    pub role: Role,
    pub user_id: Option<UserId>,
    pub years: Vec<FiscalYear>,
    pub months: Vec<u8>,
    /// "Q1", "1" or "ไตรมาสที่ 1".
    pub quarters: Vec<String>,
    /// How many preceding years to fetch alongside each selected year.
    pub comparison_years: u32,
}

/// Validated filters for one report run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportScope {
    pub role: Role,
    pub user_id: Option<UserId>,
    pub years: BTreeSet<FiscalYear>,
    pub fetch_years: BTreeSet<FiscalYear>,
    pub months: BTreeSet<Month>,
    pub quarters: BTreeSet<Quarter>,
}

impl ReportScope {
    /// Validate a request. An empty year list defaults to the fiscal year
    /// containing `today`.
    pub fn resolve(request: &ReportRequest, today: NaiveDate) -> ReportResult<Self> {
        let user_id = if request.role.is_elevated() {
            None
        } else {
            Some(request.user_id.ok_or(ReportError::MissingParameter("user_id"))?)
        };

        let mut years: BTreeSet<FiscalYear> = request.years.iter().copied().collect();
        if years.is_empty() {
            let current = to_fiscal(today.year());
            log::info!("scope: no year given, defaulting to {current}");
            years.insert(current);
        }

        let reach = Some(request.comparison_years)
            .filter(|n| *n <= MAX_COMPARISON_YEARS)
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| ReportError::InvalidParameter {
                name: "comparison_years",
                value: request.comparison_years.to_string(),
            })?;
        let fetch_years = years
            .iter()
            .flat_map(|y| (0..=reach).map(move |back| y - back))
            .collect();

        let months = request
            .months
            .iter()
            .map(|n| {
                Month::new(*n).ok_or_else(|| ReportError::InvalidParameter {
                    name: "months",
                    value: n.to_string(),
                })
            })
            .collect::<ReportResult<BTreeSet<_>>>()?;

        let quarters = request
            .quarters
            .iter()
            .map(|q| {
                Quarter::parse_label(q).ok_or_else(|| ReportError::InvalidParameter {
                    name: "quarters",
                    value: q.clone(),
                })
            })
            .collect::<ReportResult<BTreeSet<_>>>()?;

        Ok(ReportScope {
            role: request.role,
            user_id,
            years,
            fetch_years,
            months,
            quarters,
        })
    }

    pub fn admits(&self, row: &FactRow) -> bool {
        if !self.fetch_years.contains(&row.fiscal_year) {
            return false;
        }
        if !self.months.is_empty() && !self.months.contains(&row.month) {
            return false;
        }
        if !self.quarters.is_empty() && !self.quarters.contains(&row.quarter()) {
            return false;
        }
        match self.user_id {
            Some(uid) => row.user_id == Some(uid),
            None => true,
        }
    }

    /// (year, month) pairs membership is reported for: every selected year,
    /// restricted to the month/quarter filters when given.
    pub fn periods(&self) -> Vec<(FiscalYear, Month)> {
        let mut out = Vec::new();
        for year in &self.years {
            for month in Month::all() {
                let month_ok = self.months.is_empty() || self.months.contains(&month);
                let quarter_ok = self.quarters.is_empty() || self.quarters.contains(&month.quarter());
                if month_ok && quarter_ok {
                    out.push((*year, month));
                }
            }
        }
        out
    }
}
