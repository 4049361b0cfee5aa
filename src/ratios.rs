use crate::category::{Axis, FiscalYear, PriceRange, TOTAL_LABEL};
use crate::rollup::{Bucket, Level, RollupTree, YearlyRollup};
use crate::util::round2;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Value per square metre, rounded to 2 places; 0 when there is no area.
pub fn value_per_area(value: Decimal, area: Decimal) -> Decimal {
    if area <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    value.checked_div(area).map_or(Decimal::ZERO, round2)
}

pub trait DeriveRatios {
    fn derive_ratios(&mut self);
}

impl DeriveRatios for Bucket {
    fn derive_ratios(&mut self) {
        self.value_per_area = value_per_area(self.value, self.area);
    }
}

impl<K: Axis, C: DeriveRatios> DeriveRatios for Level<K, C> {
    fn derive_ratios(&mut self) {
        for child in self.children.values_mut() {
            child.derive_ratios();
        }
        self.total.derive_ratios();
    }
}

fn derive_years<C: DeriveRatios>(rollup: &mut BTreeMap<FiscalYear, C>) {
    for node in rollup.values_mut() {
        node.derive_ratios();
    }
}

/// Set `value_per_area` on every bucket, totals included. Must run after
/// totals are rolled: a total's ratio comes from its own sums, never from
/// its children's ratios.
pub fn compute_ratios(tree: &mut RollupTree) {
    if let Some(r) = tree.yearly.as_mut() {
        derive_years(r);
    }
    if let Some(r) = tree.monthly.as_mut() {
        derive_years(r);
    }
    if let Some(r) = tree.regional.as_mut() {
        derive_years(r);
    }
    if let Some(r) = tree.quarterly.as_mut() {
        derive_years(r);
    }
    if let Some(r) = tree.yearly_quarterly.as_mut() {
        derive_years(r);
    }
    if let Some(r) = tree.yearly_quarterly_region.as_mut() {
        derive_years(r);
    }
}

/// Percent change in total value against the previous fiscal year, per
/// price range and for the year's total. `None` when there is nothing to
/// compare against.
pub fn year_over_year(
    yearly: &YearlyRollup,
) -> BTreeMap<FiscalYear, BTreeMap<String, Option<Decimal>>> {
    let change = |current: Decimal, previous: Option<Decimal>| {
        let prev = previous.filter(|p| !p.is_zero())?;
        ((current - prev) * Decimal::ONE_HUNDRED)
            .checked_div(prev)
            .map(round2)
    };

    let mut out = BTreeMap::new();
    for (year, breakdown) in yearly {
        let previous = yearly.get(&(year - 1));
        let mut row = BTreeMap::new();
        for range in PriceRange::ALL {
            let current = breakdown.child(range).map_or(Decimal::ZERO, |b| b.value);
            let prev = previous.map(|p| p.child(range).map_or(Decimal::ZERO, |b| b.value));
            row.insert(range.label(), change(current, prev));
        }
        row.insert(
            TOTAL_LABEL.to_string(),
            change(breakdown.total.value, previous.map(|p| p.total.value)),
        );
        out.insert(*year, row);
    }
    out
}
