// Closed category tables used as rollup axes.
//
// Every label a dashboard can see is one of these enums; anything else
// coming from a source is a data-quality problem, not a new category.
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Buddhist-calendar year.
pub type FiscalYear = i32;

pub const BUDDHIST_ERA_OFFSET: i32 = 543;

pub const TOTAL_LABEL: &str = "รวม";
pub const NATIONWIDE_LABEL: &str = "รวมทั่วประเทศ";

pub fn to_gregorian(year: FiscalYear) -> i32 {
    year - BUDDHIST_ERA_OFFSET
}

pub fn to_fiscal(gregorian_year: i32) -> FiscalYear {
    gregorian_year + BUDDHIST_ERA_OFFSET
}

/// How raw source labels are compared to the category tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMatching {
    Exact,
    /// Ignore leading/trailing whitespace and collapse inner runs of spaces.
    #[default]
    Trimmed,
}

impl LabelMatching {
    fn normalize(self, raw: &str) -> String {
        match self {
            LabelMatching::Exact => raw.to_string(),
            LabelMatching::Trimmed => raw.split_whitespace().collect::<Vec<_>>().join(" "),
        }
    }
}

/// Context handed down a rollup path while gap-filling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisScope {
    pub quarter: Option<Quarter>,
}

/// A closed, ordered set of labels that a rollup level is keyed by.
pub trait Axis: Copy + Ord + fmt::Debug + 'static {
    /// Key used for the level's rolled-up sibling total.
    const TOTAL_LABEL: &'static str;

    /// Every label expected at this axis, in display order.
    fn expected(scope: AxisScope) -> Vec<Self>;

    fn label(self) -> String;

    /// Narrow the scope for levels nested below this key.
    fn narrow(self, scope: AxisScope) -> AxisScope {
        scope
    }
}

/// Resolve a raw label against an axis' table.
pub fn match_label<K: Axis>(raw: &str, matching: LabelMatching) -> Option<K> {
    let wanted = matching.normalize(raw);
    if wanted.is_empty() {
        return None;
    }
    K::expected(AxisScope::default())
        .into_iter()
        .find(|k| k.label() == wanted)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    Central,
    North,
    Northeast,
    South,
    East,
    West,
    BangkokMetro,
}

impl Region {
    pub const ALL: [Region; 7] = [
        Region::Central,
        Region::North,
        Region::Northeast,
        Region::South,
        Region::East,
        Region::West,
        Region::BangkokMetro,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Region::Central => "ภาคกลาง",
            Region::North => "ภาคเหนือ",
            Region::Northeast => "ภาคตะวันออกเฉียงเหนือ",
            Region::South => "ภาคใต้",
            Region::East => "ภาคตะวันออก",
            Region::West => "ภาคตะวันตก",
            Region::BangkokMetro => "กรุงเทพปริมณฑล",
        }
    }
}

impl Axis for Region {
    const TOTAL_LABEL: &'static str = NATIONWIDE_LABEL;

    fn expected(_scope: AxisScope) -> Vec<Self> {
        Region::ALL.to_vec()
    }

    fn label(self) -> String {
        self.name().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PriceRange {
    UpTo2_5M,
    From2_5MTo5M,
    From5MTo10M,
    From10MTo20M,
    Over20M,
}

impl PriceRange {
    pub const ALL: [PriceRange; 5] = [
        PriceRange::UpTo2_5M,
        PriceRange::From2_5MTo5M,
        PriceRange::From5MTo10M,
        PriceRange::From10MTo20M,
        PriceRange::Over20M,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PriceRange::UpTo2_5M => "ไม่เกิน 2.50 ล้านบาท",
            PriceRange::From2_5MTo5M => "2.51 - 5 ล้านบาท",
            PriceRange::From5MTo10M => "5.01 - 10 ล้านบาท",
            PriceRange::From10MTo20M => "10.01 - 20 ล้านบาท",
            PriceRange::Over20M => "20.01 ล้านขึ้นไป",
        }
    }

    /// Bracket a single contract value falls into (upper bounds inclusive).
    pub fn for_contract_value(value: Decimal) -> PriceRange {
        if value <= Decimal::from(2_500_000) {
            PriceRange::UpTo2_5M
        } else if value <= Decimal::from(5_000_000) {
            PriceRange::From2_5MTo5M
        } else if value <= Decimal::from(10_000_000) {
            PriceRange::From5MTo10M
        } else if value <= Decimal::from(20_000_000) {
            PriceRange::From10MTo20M
        } else {
            PriceRange::Over20M
        }
    }
}

impl Axis for PriceRange {
    const TOTAL_LABEL: &'static str = TOTAL_LABEL;

    fn expected(_scope: AxisScope) -> Vec<Self> {
        PriceRange::ALL.to_vec()
    }

    fn label(self) -> String {
        self.name().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    pub fn number(self) -> u8 {
        match self {
            Quarter::Q1 => 1,
            Quarter::Q2 => 2,
            Quarter::Q3 => 3,
            Quarter::Q4 => 4,
        }
    }

    pub fn from_number(n: u8) -> Option<Quarter> {
        match n {
            1 => Some(Quarter::Q1),
            2 => Some(Quarter::Q2),
            3 => Some(Quarter::Q3),
            4 => Some(Quarter::Q4),
            _ => None,
        }
    }

    pub fn months(self) -> [Month; 3] {
        let first = (self.number() - 1) * 3 + 1;
        [Month(first), Month(first + 1), Month(first + 2)]
    }

    /// Accepts "Q2", "2" and the dashboard's "ไตรมาสที่ 2".
    pub fn parse_label(raw: &str) -> Option<Quarter> {
        let s = raw.trim();
        let digits = s
            .strip_prefix("ไตรมาสที่")
            .or_else(|| s.strip_prefix('Q'))
            .or_else(|| s.strip_prefix('q'))
            .unwrap_or(s)
            .trim();
        digits.parse::<u8>().ok().and_then(Quarter::from_number)
    }
}

impl Axis for Quarter {
    const TOTAL_LABEL: &'static str = TOTAL_LABEL;

    fn expected(_scope: AxisScope) -> Vec<Self> {
        Quarter::ALL.to_vec()
    }

    fn label(self) -> String {
        format!("Q{}", self.number())
    }

    fn narrow(self, scope: AxisScope) -> AxisScope {
        AxisScope {
            quarter: Some(self),
            ..scope
        }
    }
}

/// Calendar month, always within 1..=12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(u8);

impl Month {
    pub fn new(n: u8) -> Option<Month> {
        (1..=12).contains(&n).then_some(Month(n))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn quarter(self) -> Quarter {
        match self.0 {
            1..=3 => Quarter::Q1,
            4..=6 => Quarter::Q2,
            7..=9 => Quarter::Q3,
            _ => Quarter::Q4,
        }
    }

    pub fn all() -> impl Iterator<Item = Month> {
        (1..=12).map(Month)
    }

    pub fn thai_name(self) -> &'static str {
        const NAMES: [&str; 12] = [
            "มกราคม",
            "กุมภาพันธ์",
            "มีนาคม",
            "เมษายน",
            "พฤษภาคม",
            "มิถุนายน",
            "กรกฎาคม",
            "สิงหาคม",
            "กันยายน",
            "ตุลาคม",
            "พฤศจิกายน",
            "ธันวาคม",
        ];
        NAMES[usize::from(self.0 - 1)]
    }
}

impl Axis for Month {
    const TOTAL_LABEL: &'static str = TOTAL_LABEL;

    fn expected(scope: AxisScope) -> Vec<Self> {
        match scope.quarter {
            Some(q) => q.months().to_vec(),
            None => Month::all().collect(),
        }
    }

    fn label(self) -> String {
        self.0.to_string()
    }
}
