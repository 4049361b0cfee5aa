use crate::aggregate::{aggregate, Exclusions};
use crate::category::{FiscalYear, Month};
use crate::config::ReportConfig;
use crate::error::ReportResult;
use crate::gap_fill::fill_gaps;
use crate::membership::{member_activity, reconcile, roster_of, submission_set, MemberActivity, PeriodMembership};
use crate::ratios::{compute_ratios, year_over_year};
use crate::rollup::RollupTree;
use crate::scope::{ReportRequest, ReportScope};
use crate::source::{MembershipSource, RowSource};
use crate::totals::{roll_totals, tree_consistent};
use crate::types::FactRow;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything the dashboard receives for one request.
#[derive(Debug, Clone, Serialize)]
pub struct SalesReport {
    #[serde(flatten)]
    pub tree: RollupTree,
    pub year_over_year: BTreeMap<FiscalYear, BTreeMap<String, Option<Decimal>>>,
    pub monthly_member_summary: BTreeMap<FiscalYear, BTreeMap<u8, PeriodMembership>>,
    pub membership_data: Vec<MemberActivity>,
    pub excluded_rows: Exclusions,
}

/// Aggregate → gap-fill → roll totals → derive ratios, on rows already in
/// scope. Every call builds its own tree.
pub fn build_rollup(
    rows: &[FactRow],
    scope: &ReportScope,
    config: &ReportConfig,
) -> (RollupTree, Exclusions) {
    let aggregation = aggregate(rows, &config.dimensions, config.label_matching);
    let mut tree = aggregation.tree;

    let years: Vec<FiscalYear> = scope.fetch_years.iter().copied().collect();
    fill_gaps(&mut tree, &years);
    roll_totals(&mut tree);
    if !tree_consistent(&tree) {
        log::warn!("report: rolled totals do not match their children");
    }
    compute_ratios(&mut tree);

    (tree, aggregation.exclusions)
}

pub fn build_report(
    rows: &dyn RowSource,
    members: &dyn MembershipSource,
    request: &ReportRequest,
    config: &ReportConfig,
    today: NaiveDate,
) -> ReportResult<SalesReport> {
    let scope = ReportScope::resolve(request, today)?;
    let facts = rows.fetch_rows(&scope)?;
    log::info!(
        "report: {} fact rows for years {:?}",
        facts.len(),
        scope.fetch_years
    );

    let (tree, excluded_rows) = build_rollup(&facts, &scope, config);
    let year_over_year = tree.yearly.as_ref().map(year_over_year).unwrap_or_default();

    let roster_members = members.roster()?;
    let submissions = members.submissions()?;
    let periods = reconcile(
        &roster_of(&roster_members),
        &submission_set(&submissions),
        &scope.periods(),
    );
    let monthly_member_summary = nest_periods(periods);
    let membership_data = member_activity(&roster_members, &submissions);

    Ok(SalesReport {
        tree,
        year_over_year,
        monthly_member_summary,
        membership_data,
        excluded_rows,
    })
}

fn nest_periods(
    periods: BTreeMap<(FiscalYear, Month), PeriodMembership>,
) -> BTreeMap<FiscalYear, BTreeMap<u8, PeriodMembership>> {
    let mut out: BTreeMap<FiscalYear, BTreeMap<u8, PeriodMembership>> = BTreeMap::new();
    for ((year, month), summary) in periods {
        out.entry(year).or_default().insert(month.number(), summary);
    }
    out
}
