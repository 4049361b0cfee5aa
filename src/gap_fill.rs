use crate::category::{Axis, AxisScope, FiscalYear};
use crate::rollup::{Bucket, Level, RollupTree};
use std::collections::BTreeMap;

/// Zero-fill every expected label below a node.
pub trait GapFill {
    fn fill_gaps(&mut self, scope: AxisScope);
}

impl GapFill for Bucket {
    fn fill_gaps(&mut self, _scope: AxisScope) {}
}

impl<K: Axis, C: GapFill + Default> GapFill for Level<K, C> {
    fn fill_gaps(&mut self, scope: AxisScope) {
        for key in K::expected(scope) {
            // `entry` keeps whatever was already accumulated.
            self.children
                .entry(key)
                .or_default()
                .fill_gaps(key.narrow(scope));
        }
    }
}

fn fill_years<C: GapFill + Default>(rollup: &mut BTreeMap<FiscalYear, C>, years: &[FiscalYear]) {
    for year in years {
        rollup.entry(*year).or_default();
    }
    for node in rollup.values_mut() {
        node.fill_gaps(AxisScope::default());
    }
}

/// Make every expected year, month, quarter, region and price range present
/// in each requested dimension. Years already in the tree are kept even if
/// they are not listed.
pub fn fill_gaps(tree: &mut RollupTree, years: &[FiscalYear]) {
    if let Some(r) = tree.yearly.as_mut() {
        fill_years(r, years);
    }
    if let Some(r) = tree.monthly.as_mut() {
        fill_years(r, years);
    }
    if let Some(r) = tree.regional.as_mut() {
        fill_years(r, years);
    }
    if let Some(r) = tree.quarterly.as_mut() {
        fill_years(r, years);
    }
    if let Some(r) = tree.yearly_quarterly.as_mut() {
        fill_years(r, years);
    }
    if let Some(r) = tree.yearly_quarterly_region.as_mut() {
        fill_years(r, years);
    }
}
