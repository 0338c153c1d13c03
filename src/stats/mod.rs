//! Stats module - Descriptive statistics and group aggregates

mod calculator;

pub use calculator::{
    DashboardSummary, GroupKey, GroupStats, HistogramBin, StatsCalculator, ValueRange,
    SIGNIFICANCE_THRESHOLD,
};
