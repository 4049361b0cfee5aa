use crate::category::{match_label, LabelMatching, PriceRange, Region};
use crate::rollup::{Dimension, RollupTree};
use crate::types::FactRow;
use serde::Serialize;
use std::collections::BTreeMap;

/// Rows left out of every dimension because a label did not resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Exclusions {
    pub rows: usize,
    pub unmapped_regions: BTreeMap<String, usize>,
    pub unmapped_price_ranges: BTreeMap<String, usize>,
}

const MISSING_LABEL: &str = "<missing>";

impl Exclusions {
    fn record(&mut self, row: &FactRow, region_ok: bool, price_ok: bool) {
        self.rows += 1;
        if !region_ok {
            let key = row.region.clone().unwrap_or_else(|| MISSING_LABEL.to_string());
            *self.unmapped_regions.entry(key).or_default() += 1;
        }
        if !price_ok {
            let key = row
                .price_range
                .clone()
                .unwrap_or_else(|| MISSING_LABEL.to_string());
            *self.unmapped_price_ranges.entry(key).or_default() += 1;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

#[derive(Debug, Clone)]
pub struct Aggregation {
    pub tree: RollupTree,
    pub exclusions: Exclusions,
}

/// Fold fact rows into the leaf bucket of every requested dimension.
///
/// Buckets are created on first contribution; zero-filling is left to the
/// gap filler. A row whose region or price range does not resolve is
/// counted in [`Exclusions`] and contributes to no dimension at all.
pub fn aggregate(rows: &[FactRow], dimensions: &[Dimension], matching: LabelMatching) -> Aggregation {
    let mut tree = RollupTree::with_dimensions(dimensions);
    let mut exclusions = Exclusions::default();

    for row in rows {
        let region = row
            .region
            .as_deref()
            .and_then(|s| match_label::<Region>(s, matching));
        let price = row
            .price_range
            .as_deref()
            .and_then(|s| match_label::<PriceRange>(s, matching));
        let (Some(region), Some(price)) = (region, price) else {
            exclusions.record(row, region.is_some(), price.is_some());
            continue;
        };

        let year = row.fiscal_year;
        let month = row.month;
        let quarter = row.quarter();
        let (unit, value, area) = (row.unit, row.value, row.area);

        if let Some(yearly) = tree.yearly.as_mut() {
            yearly
                .entry(year)
                .or_default()
                .child_mut(price)
                .add(unit, value, area);
        }
        if let Some(monthly) = tree.monthly.as_mut() {
            monthly
                .entry(year)
                .or_default()
                .child_mut(month)
                .child_mut(price)
                .add(unit, value, area);
        }
        if let Some(regional) = tree.regional.as_mut() {
            regional
                .entry(year)
                .or_default()
                .child_mut(month)
                .child_mut(region)
                .child_mut(price)
                .add(unit, value, area);
        }
        if let Some(quarterly) = tree.quarterly.as_mut() {
            quarterly
                .entry(year)
                .or_default()
                .child_mut(quarter)
                .child_mut(month)
                .add(unit, value, area);
        }
        if let Some(yq) = tree.yearly_quarterly.as_mut() {
            yq.entry(year)
                .or_default()
                .child_mut(quarter)
                .child_mut(price)
                .add(unit, value, area);
        }
        if let Some(yqr) = tree.yearly_quarterly_region.as_mut() {
            yqr.entry(year)
                .or_default()
                .child_mut(quarter)
                .child_mut(region)
                .child_mut(price)
                .add(unit, value, area);
        }
    }

    if !exclusions.is_empty() {
        log::warn!(
            "aggregate: excluded {} of {} rows with unmapped labels (regions: {:?}, price ranges: {:?})",
            exclusions.rows,
            rows.len(),
            exclusions.unmapped_regions,
            exclusions.unmapped_price_ranges
        );
    }
    log::debug!(
        "aggregate: folded {} rows into {} dimensions",
        rows.len() - exclusions.rows,
        dimensions.len()
    );

    Aggregation { tree, exclusions }
}
