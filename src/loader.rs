use crate::category::{Month, Quarter};
use crate::error::{ReportError, ReportResult};
use crate::types::{FactRow, Member, RawFactRow, RawMemberRow, RawSubmissionRow, Role, SubmissionRecord};
use crate::util::{non_empty, parse_datetime_safe, parse_decimal_safe, parse_i32_safe, parse_u64_safe};
use chrono::Datelike;
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Read;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
    /// Rows whose quarter column disagreed with their month; the month wins.
    pub quarter_mismatches: usize,
}

fn open(path: &str) -> ReportResult<File> {
    File::open(path).map_err(|e| ReportError::unavailable(path, e))
}

pub fn load_fact_rows(path: &str) -> ReportResult<(Vec<FactRow>, LoadReport)> {
    load_fact_rows_from_reader(open(path)?)
}

pub fn load_fact_rows_from_reader<R: Read>(reader: R) -> ReportResult<(Vec<FactRow>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    // A header that cannot be read means the export itself is broken.
    rdr.headers()
        .map_err(|e| ReportError::unavailable("facts", e))?;

    let mut report = LoadReport::default();
    let mut rows = Vec::new();

    for result in rdr.deserialize::<RawFactRow>() {
        report.total_rows += 1;
        let raw = match result {
            Ok(r) => r,
            Err(e) => {
                log::debug!("loader: skipping fact line {}: {}", report.total_rows, e);
                report.parse_errors += 1;
                continue;
            }
        };
        match clean_fact(raw, &mut report) {
            Some(row) => rows.push(row),
            None => report.parse_errors += 1,
        }
    }

    report.loaded_rows = rows.len();
    if report.quarter_mismatches > 0 {
        log::warn!(
            "loader: {} fact rows had a quarter inconsistent with their month",
            report.quarter_mismatches
        );
    }
    log::info!(
        "loader: {} fact rows loaded, {} skipped",
        report.loaded_rows,
        report.parse_errors
    );
    Ok((rows, report))
}

fn clean_fact(raw: RawFactRow, report: &mut LoadReport) -> Option<FactRow> {
    let fiscal_year = parse_i32_safe(raw.buddhist_year.as_deref())?;
    let submitted_at = parse_datetime_safe(raw.submitted_at.as_deref());

    // Month column first, then the submission timestamp.
    let month_number = match parse_i32_safe(raw.month.as_deref()) {
        Some(n) => u8::try_from(n).ok()?,
        None => u8::try_from(submitted_at?.month()).ok()?,
    };
    let month = Month::new(month_number)?;

    if let Some(q) = raw.quarter.as_deref().and_then(Quarter::parse_label) {
        if q != month.quarter() {
            report.quarter_mismatches += 1;
        }
    }

    let unit = match raw.unit.as_deref().map(str::trim) {
        None | Some("") => 0,
        Some(s) => parse_u64_safe(Some(s))?,
    };
    let value = amount(raw.total_value.as_deref())?;
    let area = amount(raw.area.as_deref())?;

    Some(FactRow {
        user_id: parse_u64_safe(raw.user_id.as_deref()),
        fiscal_year,
        month,
        region: non_empty(raw.region),
        price_range: non_empty(raw.price_range),
        unit,
        value,
        area,
        submitted_at,
    })
}

/// Blank means zero; garbage or a negative amount rejects the row.
fn amount(s: Option<&str>) -> Option<Decimal> {
    match s.map(str::trim) {
        None | Some("") => Some(Decimal::ZERO),
        Some(v) => parse_decimal_safe(Some(v)).filter(|n| !n.is_sign_negative()),
    }
}

pub fn load_members(path: &str) -> ReportResult<(Vec<Member>, LoadReport)> {
    load_members_from_reader(open(path)?)
}

pub fn load_members_from_reader<R: Read>(reader: R) -> ReportResult<(Vec<Member>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    rdr.headers()
        .map_err(|e| ReportError::unavailable("members", e))?;

    let mut report = LoadReport::default();
    let mut members = Vec::new();
    for result in rdr.deserialize::<RawMemberRow>() {
        report.total_rows += 1;
        let Ok(raw) = result else {
            report.parse_errors += 1;
            continue;
        };
        let id = parse_u64_safe(raw.id.as_deref());
        let role = raw.role.as_deref().and_then(Role::parse);
        let (Some(id), Some(role)) = (id, role) else {
            report.parse_errors += 1;
            continue;
        };
        members.push(Member {
            id,
            name: raw.fullname.unwrap_or_default().trim().to_string(),
            email: raw.email.unwrap_or_default().trim().to_string(),
            role,
        });
    }
    report.loaded_rows = members.len();
    log::info!("loader: {} members loaded", report.loaded_rows);
    Ok((members, report))
}

pub fn load_submissions(path: &str) -> ReportResult<(Vec<SubmissionRecord>, LoadReport)> {
    load_submissions_from_reader(open(path)?)
}

pub fn load_submissions_from_reader<R: Read>(
    reader: R,
) -> ReportResult<(Vec<SubmissionRecord>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    rdr.headers()
        .map_err(|e| ReportError::unavailable("submissions", e))?;

    let mut report = LoadReport::default();
    let mut records = Vec::new();
    for result in rdr.deserialize::<RawSubmissionRow>() {
        report.total_rows += 1;
        let record = result.ok().and_then(|raw| {
            let month = parse_i32_safe(raw.month_number.as_deref())
                .and_then(|n| u8::try_from(n).ok())
                .and_then(Month::new)?;
            Some(SubmissionRecord {
                user_id: parse_u64_safe(raw.user_id.as_deref())?,
                fiscal_year: parse_i32_safe(raw.buddhist_year.as_deref())?,
                month,
            })
        });
        match record {
            Some(r) => records.push(r),
            None => report.parse_errors += 1,
        }
    }
    report.loaded_rows = records.len();
    log::info!("loader: {} submission records loaded", report.loaded_rows);
    Ok((records, report))
}
