// End-to-end checks of the rollup pipeline:
// 1. The two-row dashboard scenario (month 1, two regions)
// 2. Row order never changes the tree, fractional amounts included
// 3. Every total equals the sum of its children, across dimensions
// 4. Zero-fill reaches every expected label
// 5. Re-running produces byte-identical JSON

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use rust_decimal::Decimal;
use sales_report::category::{Month, PriceRange, Quarter, Region};
use sales_report::config::ReportConfig;
use sales_report::reports::build_rollup;
use sales_report::rollup::RollupTree;
use sales_report::scope::{ReportRequest, ReportScope};
use sales_report::totals::tree_consistent;
use sales_report::types::{FactRow, Role};
use serde_json::Value;

fn scope(years: &[i32]) -> ReportScope {
    let req = ReportRequest {
        role: Role::Admin,
        years: years.to_vec(),
        ..Default::default()
    };
    ReportScope::resolve(&req, chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()).unwrap()
}

fn d(n: i64) -> Decimal {
    Decimal::from(n)
}

fn fact(year: i32, month: u8, region: Region, range: PriceRange, unit: u64, value: Decimal, area: Decimal) -> FactRow {
    FactRow {
        user_id: Some(1),
        fiscal_year: year,
        month: Month::new(month).unwrap(),
        region: Some(region.name().to_string()),
        price_range: Some(range.name().to_string()),
        unit,
        value,
        area,
        submitted_at: None,
    }
}

fn rollup(rows: &[FactRow], years: &[i32]) -> RollupTree {
    build_rollup(rows, &scope(years), &ReportConfig::default()).0
}

/// A spread of rows with satang and fractional square metres.
fn sample_rows() -> Vec<FactRow> {
    let mut rows = Vec::new();
    for (i, month) in [1u8, 2, 4, 7, 7, 10, 12].iter().enumerate() {
        let region = Region::ALL[i % Region::ALL.len()];
        let range = PriceRange::ALL[i % PriceRange::ALL.len()];
        let n = i as i64 + 1;
        // 1,000,000.10, 2,000,000.20, ... and 50.3, 100.6, ...
        let value = Decimal::new(100_000_010 * n, 2);
        let area = Decimal::new(503 * n, 1);
        rows.push(fact(2568, *month, region, range, n as u64, value, area));
        rows.push(fact(2567, *month, Region::BangkokMetro, range, 1, Decimal::new(300_000_033, 2), Decimal::new(1_201, 1)));
    }
    rows.push(fact(2568, 3, Region::South, PriceRange::Over20M, 1, d(25_000_000), Decimal::ZERO));
    for tenths in [1, 2, 3] {
        rows.push(fact(2568, 5, Region::North, PriceRange::UpTo2_5M, 1, Decimal::new(tenths, 1), Decimal::new(tenths, 1)));
    }
    rows
}

#[test]
fn dashboard_example_scenario() {
    let rows = vec![
        fact(2568, 1, Region::Central, PriceRange::UpTo2_5M, 2, d(4_000_000), d(200)),
        fact(2568, 1, Region::North, PriceRange::UpTo2_5M, 1, d(2_000_000), d(100)),
    ];
    let tree = rollup(&rows, &[2568]);
    let jan = Month::new(1).unwrap();

    let monthly = tree.monthly.as_ref().unwrap();
    let jan_ranges = monthly[&2568].child(jan).unwrap();
    assert_eq!(jan_ranges.total.unit, 3);
    assert_eq!(jan_ranges.total.value, d(6_000_000));
    assert_eq!(jan_ranges.total.area, d(300));
    assert_eq!(jan_ranges.total.value_per_area, d(20_000));

    let regional = tree.regional.as_ref().unwrap();
    let jan_regions = regional[&2568].child(jan).unwrap();
    let central = jan_regions
        .child(Region::Central)
        .unwrap()
        .child(PriceRange::UpTo2_5M)
        .unwrap();
    assert_eq!((central.unit, central.value, central.area), (2, d(4_000_000), d(200)));
    assert_eq!(central.value_per_area, d(20_000));

    let south = jan_regions
        .child(Region::South)
        .unwrap()
        .child(PriceRange::UpTo2_5M)
        .unwrap();
    assert!(south.is_zero());
    assert_eq!(south.value_per_area, Decimal::ZERO);

    // Same figures through the JSON the dashboard reads.
    let json = serde_json::to_value(&tree).unwrap();
    let total = &json["monthly_data"]["2568"]["1"]["รวม"];
    assert_eq!(total["unit"], 3);
    assert_eq!(total["value_per_area"], 20_000.0);
    let south = &json["region_data"]["2568"]["1"]["ภาคใต้"]["ไม่เกิน 2.50 ล้านบาท"];
    assert_eq!(south["unit"], 0);
    assert_eq!(south["value"], 0.0);
    assert_eq!(south["value_per_area"], 0.0);
    let nationwide = &json["region_data"]["2568"]["1"]["รวมทั่วประเทศ"]["รวม"];
    assert_eq!(nationwide["unit"], 3);
}

#[test]
fn row_order_does_not_matter() {
    let rows = sample_rows();
    let expected = rollup(&rows, &[2568]);
    let mut rng = Pcg64::seed_from_u64(42);
    for _ in 0..5 {
        let mut shuffled = rows.clone();
        shuffled.shuffle(&mut rng);
        assert_eq!(rollup(&shuffled, &[2568]), expected);
    }
}

#[test]
fn fractional_amounts_do_not_depend_on_order() {
    let forward = vec![
        fact(2568, 1, Region::Central, PriceRange::UpTo2_5M, 1, Decimal::new(3, 1), Decimal::new(1, 1)),
        fact(2568, 2, Region::Central, PriceRange::UpTo2_5M, 1, Decimal::new(2, 1), Decimal::new(2, 1)),
        fact(2568, 1, Region::Central, PriceRange::UpTo2_5M, 1, Decimal::new(1, 1), Decimal::new(3, 1)),
    ];
    let mut backward = forward.clone();
    backward.reverse();

    let a = rollup(&forward, &[2568]);
    let b = rollup(&backward, &[2568]);
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );

    // The yearly bucket equals the monthly and quarterly totals exactly.
    let six_tenths = Decimal::new(6, 1);
    assert_eq!(a.yearly.as_ref().unwrap()[&2568].total.value, six_tenths);
    assert_eq!(a.monthly.as_ref().unwrap()[&2568].total.total.value, six_tenths);
    assert_eq!(a.quarterly.as_ref().unwrap()[&2568].total.total.value, six_tenths);
    assert!(tree_consistent(&a));
}

#[test]
fn totals_agree_across_dimensions() {
    let tree = rollup(&sample_rows(), &[2567, 2568]);
    assert!(tree_consistent(&tree));

    let yearly = tree.yearly.as_ref().unwrap();
    let monthly = tree.monthly.as_ref().unwrap();
    let regional = tree.regional.as_ref().unwrap();
    let quarterly = tree.quarterly.as_ref().unwrap();
    let yq = tree.yearly_quarterly.as_ref().unwrap();
    let yqr = tree.yearly_quarterly_region.as_ref().unwrap();

    for year in [2567, 2568] {
        let year_total = yearly[&year].total;
        // Sum of months is the year, price range by price range.
        assert_eq!(monthly[&year].total, yearly[&year]);
        // Nationwide over the year equals the yearly breakdown too.
        assert_eq!(regional[&year].total.total, yearly[&year]);
        assert_eq!(yq[&year].total, yearly[&year]);
        assert_eq!(yqr[&year].total.total, yearly[&year]);
        assert_eq!(quarterly[&year].total.total, year_total);

        let by_region: u64 = regional[&year]
            .total
            .children
            .values()
            .map(|r| r.total.unit)
            .sum();
        assert_eq!(by_region, year_total.unit);

        for month in Month::all() {
            let ranges = monthly[&year].child(month).unwrap();
            let regions = regional[&year].child(month).unwrap();
            assert_eq!(regions.total.total.unit, ranges.total.unit);
            assert_eq!(regions.total.total.value, ranges.total.value);
            assert_eq!(
                quarterly[&year]
                    .child(month.quarter())
                    .unwrap()
                    .child(month)
                    .unwrap()
                    .unit,
                ranges.total.unit
            );
        }
    }
}

#[test]
fn zero_area_total_keeps_ratio_guarded() {
    let rows = vec![fact(2568, 3, Region::South, PriceRange::Over20M, 1, d(25_000_000), Decimal::ZERO)];
    let tree = rollup(&rows, &[2568]);
    let yearly = tree.yearly.as_ref().unwrap();
    let over = yearly[&2568].child(PriceRange::Over20M).unwrap();
    assert_eq!(over.value, d(25_000_000));
    assert_eq!(over.value_per_area, Decimal::ZERO);
    assert_eq!(yearly[&2568].total.value_per_area, Decimal::ZERO);
}

#[test]
fn every_expected_label_is_present() {
    let tree = rollup(&sample_rows(), &[2568, 2569]);
    let json = serde_json::to_value(&tree).unwrap();

    // 2569 has no rows at all but is still fully seeded.
    for year in ["2568", "2569"] {
        let months = json["monthly_data"][year].as_object().unwrap();
        assert_eq!(months.len(), 13);
        for m in 1..=12 {
            let ranges = months[&m.to_string()].as_object().unwrap();
            assert_eq!(ranges.len(), 6);
            for range in PriceRange::ALL {
                assert!(ranges.contains_key(range.name()));
            }
        }

        let regions = json["region_data"][year]["7"].as_object().unwrap();
        assert_eq!(regions.len(), 8);
        for region in Region::ALL {
            assert_eq!(regions[region.name()].as_object().unwrap().len(), 6);
        }

        let quarters = json["quarterly_data"][year].as_object().unwrap();
        assert_eq!(quarters.len(), 5);
        for q in Quarter::ALL {
            let months = quarters[&format!("Q{}", q.number())].as_object().unwrap();
            assert_eq!(months.len(), 4);
        }

        let yqr = json["yearly_data_quarterly_region"][year]["Q4"].as_object().unwrap();
        assert_eq!(yqr.len(), 8);
    }

    let empty = &json["yearly_data"]["2569"]["รวม"];
    assert_eq!(empty["unit"], 0);
    assert_eq!(empty["value_per_area"], 0.0);
}

#[test]
fn rerunning_is_byte_identical() {
    let rows = sample_rows();
    let first = serde_json::to_string(&rollup(&rows, &[2568])).unwrap();
    let second = serde_json::to_string(&rollup(&rows, &[2568])).unwrap();
    assert_eq!(first, second);
    let parsed: Value = serde_json::from_str(&first).unwrap();
    assert!(parsed.get("yearly_data").is_some());
}
