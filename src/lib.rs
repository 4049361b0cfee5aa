// Sales-contract report engine.
//
// Flat per-submission rows go in; zero-filled, multi-axis rollups with
// rolled totals and value-per-area ratios come out, alongside a
// per-period account of which members submitted.

pub mod aggregate;
pub mod category;
pub mod config;
pub mod error;
pub mod gap_fill;
pub mod loader;
pub mod membership;
pub mod output;
pub mod ratios;
pub mod reports;
pub mod rollup;
pub mod scope;
pub mod source;
pub mod totals;
pub mod types;
pub mod util;
