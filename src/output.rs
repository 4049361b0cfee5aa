use crate::category::{FiscalYear, Month, PriceRange, Region, NATIONWIDE_LABEL, TOTAL_LABEL};
use crate::error::ReportResult;
use crate::reports::SalesReport;
use crate::rollup::Bucket;
use crate::types::{MembershipRow, PriceRangeRow, RegionRow};
use crate::util::{format_int, format_number};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

pub fn write_json<T: Serialize>(path: &str, value: &T) -> ReportResult<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

fn formatted(b: &Bucket) -> (String, String, String, String) {
    (
        format_int(b.unit),
        format_number(b.value, 2),
        format_number(b.area, 2),
        format_number(b.value_per_area, 2),
    )
}

/// One row per price range plus the total, for a year of `yearly_data`.
pub fn price_range_rows(report: &SalesReport, year: FiscalYear) -> Vec<PriceRangeRow> {
    let Some(level) = report.tree.yearly.as_ref().and_then(|y| y.get(&year)) else {
        return Vec::new();
    };
    PriceRange::ALL
        .iter()
        .filter_map(|range| level.child(*range).map(|b| (range.name(), b)))
        .chain(std::iter::once((TOTAL_LABEL, &level.total)))
        .map(|(label, b)| {
            let (unit, value, area, value_per_area) = formatted(b);
            PriceRangeRow {
                price_range: label.to_string(),
                unit,
                value,
                area,
                value_per_area,
            }
        })
        .collect()
}

/// Whole-year figures per region plus the nationwide row.
pub fn region_rows(report: &SalesReport, year: FiscalYear) -> Vec<RegionRow> {
    let Some(months) = report.tree.regional.as_ref().and_then(|r| r.get(&year)) else {
        return Vec::new();
    };
    // The months level's total is the whole year broken down by region.
    let year_regions = &months.total;
    Region::ALL
        .iter()
        .filter_map(|region| year_regions.child(*region).map(|b| (region.name(), &b.total)))
        .chain(std::iter::once((NATIONWIDE_LABEL, &year_regions.total.total)))
        .map(|(label, b)| {
            let (unit, value, area, value_per_area) = formatted(b);
            RegionRow {
                region: label.to_string(),
                unit,
                value,
                area,
                value_per_area,
            }
        })
        .collect()
}

pub fn membership_rows(report: &SalesReport, year: FiscalYear) -> Vec<MembershipRow> {
    let Some(months) = report.monthly_member_summary.get(&year) else {
        return Vec::new();
    };
    months
        .iter()
        .map(|(month, p)| MembershipRow {
            month: Month::new(*month)
                .map(|m| format!("{} {}", m.number(), m.thai_name()))
                .unwrap_or_else(|| month.to_string()),
            submitted: p.submitted_count,
            not_submitted: p.not_submitted_count,
            total: p.total,
            anomaly: if p.anomaly { "Roster changed".to_string() } else { "OK".to_string() },
        })
        .collect()
}
