use crate::category::{Axis, FiscalYear};
use crate::rollup::{Bucket, Level, RollupTree};
use std::collections::BTreeMap;

pub trait RollTotals {
    /// Recompute every total below and including this node, innermost first.
    fn roll_totals(&mut self);

    /// Add another node of the same shape into this one.
    fn absorb(&mut self, other: &Self);

    /// Every total equals the sum of its children, recursively.
    fn totals_consistent(&self) -> bool;
}

impl RollTotals for Bucket {
    fn roll_totals(&mut self) {}

    fn absorb(&mut self, other: &Self) {
        self.add(other.unit, other.value, other.area);
    }

    fn totals_consistent(&self) -> bool {
        true
    }
}

impl<K: Axis, C: RollTotals + Default + SumsOf> RollTotals for Level<K, C> {
    fn roll_totals(&mut self) {
        for child in self.children.values_mut() {
            child.roll_totals();
        }
        // Start from zero so a stale total is never counted twice.
        let mut total = C::default();
        for child in self.children.values() {
            total.absorb(child);
        }
        self.total = total;
    }

    fn absorb(&mut self, other: &Self) {
        for (key, child) in &other.children {
            self.children.entry(*key).or_default().absorb(child);
        }
        self.total.absorb(&other.total);
    }

    fn totals_consistent(&self) -> bool {
        let mut expected = C::default();
        for child in self.children.values() {
            if !child.totals_consistent() {
                return false;
            }
            expected.absorb(child);
        }
        self.total.totals_consistent() && sums_match(&expected.sums(), &self.total.sums())
    }
}

/// Flat sums of a node: the bucket itself, or a level's total.
pub trait SumsOf {
    fn sums(&self) -> Bucket;
}

impl SumsOf for Bucket {
    fn sums(&self) -> Bucket {
        *self
    }
}

impl<K: Axis, C: SumsOf> SumsOf for Level<K, C> {
    fn sums(&self) -> Bucket {
        self.total.sums()
    }
}

/// Exact: decimal sums carry no rounding error to tolerate.
fn sums_match(a: &Bucket, b: &Bucket) -> bool {
    a.unit == b.unit && a.value == b.value && a.area == b.area
}

fn roll_years<C: RollTotals>(rollup: &mut BTreeMap<FiscalYear, C>) {
    for node in rollup.values_mut() {
        node.roll_totals();
    }
}

fn years_consistent<C: RollTotals>(rollup: &Option<BTreeMap<FiscalYear, C>>) -> bool {
    rollup
        .as_ref()
        .map_or(true, |r| r.values().all(RollTotals::totals_consistent))
}

/// Roll every level's sibling total in every dimension.
pub fn roll_totals(tree: &mut RollupTree) {
    if let Some(r) = tree.yearly.as_mut() {
        roll_years(r);
    }
    if let Some(r) = tree.monthly.as_mut() {
        roll_years(r);
    }
    if let Some(r) = tree.regional.as_mut() {
        roll_years(r);
    }
    if let Some(r) = tree.quarterly.as_mut() {
        roll_years(r);
    }
    if let Some(r) = tree.yearly_quarterly.as_mut() {
        roll_years(r);
    }
    if let Some(r) = tree.yearly_quarterly_region.as_mut() {
        roll_years(r);
    }
}

pub fn tree_consistent(tree: &RollupTree) -> bool {
    years_consistent(&tree.yearly)
        && years_consistent(&tree.monthly)
        && years_consistent(&tree.regional)
        && years_consistent(&tree.quarterly)
        && years_consistent(&tree.yearly_quarterly)
        && years_consistent(&tree.yearly_quarterly_region)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{Month, PriceRange, Region};
    use crate::rollup::{PriceBreakdown, RegionBreakdown};
    use rust_decimal::Decimal;

    fn d(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn rolling_twice_does_not_double_count() {
        let mut level = PriceBreakdown::default();
        level.child_mut(PriceRange::UpTo2_5M).add(2, d(4_000_000), d(200));
        level.child_mut(PriceRange::Over20M).add(1, d(25_000_000), d(500));
        level.roll_totals();
        level.roll_totals();
        assert_eq!(level.total.unit, 3);
        assert_eq!(level.total.value, d(29_000_000));
        assert_eq!(level.total.area, d(700));
        assert!(level.totals_consistent());
    }

    #[test]
    fn nationwide_total_is_a_full_price_breakdown() {
        let mut regions = RegionBreakdown::default();
        regions
            .child_mut(Region::Central)
            .child_mut(PriceRange::UpTo2_5M)
            .add(2, d(4_000_000), d(200));
        regions
            .child_mut(Region::North)
            .child_mut(PriceRange::UpTo2_5M)
            .add(1, d(2_000_000), d(100));
        regions
            .child_mut(Region::North)
            .child_mut(PriceRange::From5MTo10M)
            .add(1, d(6_000_000), d(150));
        regions.roll_totals();

        let nationwide = &regions.total;
        assert_eq!(nationwide.child(PriceRange::UpTo2_5M).unwrap().unit, 3);
        assert_eq!(nationwide.total.unit, 4);
        let regional_sum: u64 = regions.children.values().map(|r| r.total.unit).sum();
        assert_eq!(regional_sum, nationwide.total.unit);
        assert!(regions.totals_consistent());
    }

    #[test]
    fn detects_a_tampered_total() {
        let mut level: Level<Month, Bucket> = Default::default();
        level.child_mut(Month::new(1).unwrap()).add(1, d(10), d(1));
        level.roll_totals();
        level.total.value += d(5);
        assert!(!level.totals_consistent());
    }

    #[test]
    fn fractional_sums_match_exactly() {
        // 0.1 + 0.2 + 0.3 across two months must equal the rolled total
        // with no tolerance at all.
        let mut level: Level<Month, Bucket> = Default::default();
        let jan = Month::new(1).unwrap();
        let feb = Month::new(2).unwrap();
        level.child_mut(jan).add(1, Decimal::new(3, 1), Decimal::new(1, 2));
        level.child_mut(feb).add(1, Decimal::new(2, 1), Decimal::new(2, 2));
        level.child_mut(jan).add(1, Decimal::new(1, 1), Decimal::new(3, 2));
        level.roll_totals();
        assert_eq!(level.total.value, Decimal::new(6, 1));
        assert_eq!(level.total.area, Decimal::new(6, 2));
        assert!(level.totals_consistent());

        level.total.value += Decimal::new(1, 28);
        assert!(!level.totals_consistent());
    }
}
