// Typed report shape.
//
// A `RollupTree` holds one year-keyed map per requested `Dimension`.
// Below the year every level is a `Level` keyed by a closed `Axis`, with
// a `total` of the same shape as each child, down to `Bucket` leaves.
// Money and area are `Decimal` so sums do not depend on row order.
use crate::category::{Axis, FiscalYear, Month, PriceRange, Quarter, Region};
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Running sums for one combination of dimension labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub unit: u64,
    pub value: Decimal,
    pub area: Decimal,
    pub value_per_area: Decimal,
}

impl Bucket {
    pub fn add(&mut self, unit: u64, value: Decimal, area: Decimal) {
        self.unit += unit;
        self.value += value;
        self.area += area;
    }

    pub fn is_zero(&self) -> bool {
        self.unit == 0 && self.value.is_zero() && self.area.is_zero()
    }
}

/// One nesting level: a child per axis label plus the siblings' total.
#[derive(Debug, Clone, PartialEq)]
pub struct Level<K: Axis, C> {
    pub children: BTreeMap<K, C>,
    pub total: C,
}

impl<K: Axis, C: Default> Default for Level<K, C> {
    fn default() -> Self {
        Level {
            children: BTreeMap::new(),
            total: C::default(),
        }
    }
}

impl<K: Axis, C: Default> Level<K, C> {
    /// Child at `key`, created empty on first use.
    pub fn child_mut(&mut self, key: K) -> &mut C {
        self.children.entry(key).or_default()
    }

    pub fn child(&self, key: K) -> Option<&C> {
        self.children.get(&key)
    }
}

impl<K: Axis, C: Serialize> Serialize for Level<K, C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.children.len() + 1))?;
        for (key, child) in &self.children {
            map.serialize_entry(&key.label(), child)?;
        }
        map.serialize_entry(K::TOTAL_LABEL, &self.total)?;
        map.end()
    }
}

pub type PriceBreakdown = Level<PriceRange, Bucket>;
pub type RegionBreakdown = Level<Region, PriceBreakdown>;

pub type YearlyRollup = BTreeMap<FiscalYear, PriceBreakdown>;
pub type MonthlyRollup = BTreeMap<FiscalYear, Level<Month, PriceBreakdown>>;
pub type RegionalRollup = BTreeMap<FiscalYear, Level<Month, RegionBreakdown>>;
pub type QuarterlyRollup = BTreeMap<FiscalYear, Level<Quarter, Level<Month, Bucket>>>;
pub type YearlyQuarterlyRollup = BTreeMap<FiscalYear, Level<Quarter, PriceBreakdown>>;
pub type YearlyQuarterlyRegionRollup = BTreeMap<FiscalYear, Level<Quarter, RegionBreakdown>>;

/// Key paths a report can be rolled up along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// year → price range
    Yearly,
    /// year → month → price range
    Monthly,
    /// year → month → region → price range
    Regional,
    /// year → quarter → month
    Quarterly,
    /// year → quarter → price range
    YearlyQuarterly,
    /// year → quarter → region → price range
    YearlyQuarterlyRegion,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Yearly,
        Dimension::Monthly,
        Dimension::Regional,
        Dimension::Quarterly,
        Dimension::YearlyQuarterly,
        Dimension::YearlyQuarterlyRegion,
    ];
}

/// The per-request output tree. Dimensions that were not requested stay
/// `None` and are left out of the JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RollupTree {
    #[serde(rename = "yearly_data", skip_serializing_if = "Option::is_none")]
    pub yearly: Option<YearlyRollup>,
    #[serde(rename = "monthly_data", skip_serializing_if = "Option::is_none")]
    pub monthly: Option<MonthlyRollup>,
    #[serde(rename = "region_data", skip_serializing_if = "Option::is_none")]
    pub regional: Option<RegionalRollup>,
    #[serde(rename = "quarterly_data", skip_serializing_if = "Option::is_none")]
    pub quarterly: Option<QuarterlyRollup>,
    #[serde(rename = "yearly_data_quarterly", skip_serializing_if = "Option::is_none")]
    pub yearly_quarterly: Option<YearlyQuarterlyRollup>,
    #[serde(
        rename = "yearly_data_quarterly_region",
        skip_serializing_if = "Option::is_none"
    )]
    pub yearly_quarterly_region: Option<YearlyQuarterlyRegionRollup>,
}

impl RollupTree {
    pub fn with_dimensions(dimensions: &[Dimension]) -> Self {
        let mut tree = RollupTree::default();
        for dim in dimensions {
            match dim {
                Dimension::Yearly => tree.yearly = Some(BTreeMap::new()),
                Dimension::Monthly => tree.monthly = Some(BTreeMap::new()),
                Dimension::Regional => tree.regional = Some(BTreeMap::new()),
                Dimension::Quarterly => tree.quarterly = Some(BTreeMap::new()),
                Dimension::YearlyQuarterly => tree.yearly_quarterly = Some(BTreeMap::new()),
                Dimension::YearlyQuarterlyRegion => {
                    tree.yearly_quarterly_region = Some(BTreeMap::new())
                }
            }
        }
        tree
    }

    pub fn dimensions(&self) -> Vec<Dimension> {
        let present = [
            self.yearly.is_some(),
            self.monthly.is_some(),
            self.regional.is_some(),
            self.quarterly.is_some(),
            self.yearly_quarterly.is_some(),
            self.yearly_quarterly_region.is_some(),
        ];
        Dimension::ALL
            .into_iter()
            .zip(present)
            .filter_map(|(dim, on)| on.then_some(dim))
            .collect()
    }
}
