//! Statistics Calculator Module
//! Descriptive statistics, group aggregates and Welch's t-test over supplier scores.

use crate::data::{Certification, Supplier};
use rayon::prelude::*;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};
use std::collections::BTreeMap;

/// Significance threshold for t-test
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// Statistics for a single group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupStats {
    pub group_name: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    pub p05: f64,
    pub q1: f64,
    pub q3: f64,
    pub p95: f64,
    /// Welch p-value of this group against all other suppliers.
    pub p_value: Option<f64>,
    pub is_significant: bool,
}

impl Default for GroupStats {
    fn default() -> Self {
        Self {
            group_name: String::new(),
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            variance: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
            p05: f64::NAN,
            q1: f64::NAN,
            q3: f64::NAN,
            p95: f64::NAN,
            p_value: None,
            is_significant: false,
        }
    }
}

/// Grouping dimension for trend statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Industry,
    Location,
}

impl GroupKey {
    pub fn of<'a>(&self, supplier: &'a Supplier) -> &'a str {
        match self {
            GroupKey::Industry => &supplier.industry,
            GroupKey::Location => &supplier.location,
        }
    }
}

/// Closed interval spanned by a set of values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Range over the finite values, `None` when there are none.
    pub fn of<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<ValueRange>, v| match acc {
                None => Some(ValueRange { min: v, max: v }),
                Some(r) => Some(ValueRange {
                    min: r.min.min(v),
                    max: r.max.max(v),
                }),
            })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Min-max scale into 0..=1. A zero-width range maps everything to 0.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.span();
        if span <= 0.0 {
            0.0
        } else {
            ((value - self.min) / span).clamp(0.0, 1.0)
        }
    }
}

/// Headline averages for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub supplier_count: usize,
    pub avg_sustainability_score: f64,
    pub avg_carbon_footprint: f64,
    pub avg_recycling_rate: f64,
    pub avg_energy_efficiency: f64,
}

impl DashboardSummary {
    /// `None` for an empty selection.
    pub fn from_suppliers<'a, I>(suppliers: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Supplier>,
    {
        let mut n = 0usize;
        let (mut score, mut carbon, mut recycling, mut energy) = (0.0, 0.0, 0.0, 0.0);

        for s in suppliers {
            n += 1;
            score += s.sustainability_score;
            carbon += s.carbon_footprint;
            recycling += s.recycling_rate;
            energy += s.energy_efficiency;
        }

        if n == 0 {
            return None;
        }

        let n_f = n as f64;
        Some(Self {
            supplier_count: n,
            avg_sustainability_score: score / n_f,
            avg_carbon_footprint: carbon / n_f,
            avg_recycling_rate: recycling / n_f,
            avg_energy_efficiency: energy / n_f,
        })
    }
}

/// One equal-width histogram bucket, `[lower, upper)` except the last.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> GroupStats {
        let n = values.len();
        if n == 0 {
            return GroupStats::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let mean = values.iter().sum::<f64>() / n as f64;
        let median = Self::percentile(&sorted, 50.0);

        let variance = if n > 1 {
            values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };

        GroupStats {
            count: n,
            mean,
            median,
            std: variance.sqrt(),
            variance,
            min: sorted[0],
            max: sorted[n - 1],
            p05: Self::percentile(&sorted, 5.0),
            q1: Self::percentile(&sorted, 25.0),
            q3: Self::percentile(&sorted, 75.0),
            p95: Self::percentile(&sorted, 95.0),
            ..GroupStats::default()
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Perform Welch's t-test (independent samples, unequal variance).
    pub fn perform_ttest(group_values: &[f64], other_values: &[f64]) -> (f64, bool) {
        let n1 = group_values.len() as f64;
        let n2 = other_values.len() as f64;

        if n1 < 2.0 || n2 < 2.0 {
            return (f64::NAN, false);
        }

        let mean1 = group_values.iter().sum::<f64>() / n1;
        let mean2 = other_values.iter().sum::<f64>() / n2;

        let var1 = group_values
            .iter()
            .map(|x| (x - mean1).powi(2))
            .sum::<f64>()
            / (n1 - 1.0);
        let var2 = other_values
            .iter()
            .map(|x| (x - mean2).powi(2))
            .sum::<f64>()
            / (n2 - 1.0);

        let se = (var1 / n1 + var2 / n2).sqrt();
        if se == 0.0 {
            return (1.0, false);
        }

        let t = (mean1 - mean2) / se;

        // Welch-Satterthwaite degrees of freedom
        let df_num = (var1 / n1 + var2 / n2).powi(2);
        let df_denom = (var1 / n1).powi(2) / (n1 - 1.0) + (var2 / n2).powi(2) / (n2 - 1.0);
        let df = df_num / df_denom;

        match StudentsT::new(0.0, 1.0, df) {
            Ok(dist) => {
                let p_value = 2.0 * (1.0 - dist.cdf(t.abs()));
                (p_value, p_value <= SIGNIFICANCE_THRESHOLD)
            }
            Err(_) => (f64::NAN, false),
        }
    }

    /// Score statistics per group, each group tested against the rest.
    /// Groups are returned in name order.
    pub fn group_stats(suppliers: &[Supplier], key: GroupKey) -> Vec<GroupStats> {
        let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for s in suppliers {
            groups
                .entry(key.of(s))
                .or_default()
                .push(s.sustainability_score);
        }

        let groups: Vec<(&str, Vec<f64>)> = groups.into_iter().collect();

        groups
            .par_iter()
            .map(|(name, values)| {
                let rest: Vec<f64> = suppliers
                    .iter()
                    .filter(|s| key.of(s) != *name)
                    .map(|s| s.sustainability_score)
                    .collect();

                let mut gs = Self::compute_descriptive_stats(values);
                gs.group_name = name.to_string();

                let (p_value, is_significant) = Self::perform_ttest(values, &rest);
                if !p_value.is_nan() {
                    gs.p_value = Some(p_value);
                    gs.is_significant = is_significant;
                }
                gs
            })
            .collect()
    }

    /// Mean score of the holders of each certification.
    /// Certifications with no holder are omitted.
    pub fn certification_means(suppliers: &[Supplier]) -> Vec<(Certification, f64)> {
        Certification::ALL
            .iter()
            .filter_map(|cert| {
                let scores: Vec<f64> = suppliers
                    .iter()
                    .filter(|s| s.certifications.contains(*cert))
                    .map(|s| s.sustainability_score)
                    .collect();
                if scores.is_empty() {
                    None
                } else {
                    Some((*cert, scores.iter().sum::<f64>() / scores.len() as f64))
                }
            })
            .collect()
    }

    /// Equal-width histogram. The maximum value lands in the last bin.
    pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
        let Some(range) = ValueRange::of(values.iter().copied()) else {
            return Vec::new();
        };
        let bins = bins.max(1);

        let (lower, width) = if range.span() > 0.0 {
            (range.min, range.span() / bins as f64)
        } else {
            (range.min - 0.5, 1.0 / bins as f64)
        };

        let mut result: Vec<HistogramBin> = (0..bins)
            .map(|i| HistogramBin {
                lower: lower + i as f64 * width,
                upper: lower + (i + 1) as f64 * width,
                count: 0,
            })
            .collect();

        for v in values.iter().filter(|v| v.is_finite()) {
            let idx = (((v - lower) / width).floor() as usize).min(bins - 1);
            result[idx].count += 1;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CertificationSet;

    fn supplier(name: &str, industry: &str, location: &str, score: f64) -> Supplier {
        Supplier {
            supplier_id: name.to_string(),
            name: name.to_string(),
            industry: industry.to_string(),
            location: location.to_string(),
            carbon_footprint: 100.0,
            recycling_rate: 50.0,
            energy_efficiency: 70.0,
            water_usage: 1000.0,
            waste_production: 100.0,
            certifications: CertificationSet::empty(),
            lead_time_days: 10.0,
            onboarding_cost_usd: 1000.0,
            switching_cost_usd: 500.0,
            sustainability_score: score,
        }
    }

    #[test]
    fn test_descriptive_stats() {
        let stats = StatsCalculator::compute_descriptive_stats(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(stats.count, 4);
        assert!((stats.mean - 2.5).abs() < 1e-12);
        assert!((stats.median - 2.5).abs() < 1e-12);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert!((stats.q1 - 1.75).abs() < 1e-12);
        assert!((stats.q3 - 3.25).abs() < 1e-12);
        assert!((stats.variance - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_descriptive_stats_empty() {
        let stats = StatsCalculator::compute_descriptive_stats(&[]);
        assert_eq!(stats.count, 0);
        assert!(stats.mean.is_nan());
    }

    #[test]
    fn test_percentile_matches_numpy_linear() {
        let sorted = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(StatsCalculator::percentile(&sorted, 50.0), 30.0);
        assert!((StatsCalculator::percentile(&sorted, 95.0) - 48.0).abs() < 1e-12);
        assert!((StatsCalculator::percentile(&sorted, 5.0) - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_ttest_detects_separated_groups() {
        let a = [80.0, 82.0, 81.0, 79.0, 83.0];
        let b = [40.0, 42.0, 41.0, 39.0, 43.0];
        let (p, sig) = StatsCalculator::perform_ttest(&a, &b);
        assert!(p < 0.001);
        assert!(sig);

        let (p, sig) = StatsCalculator::perform_ttest(&a, &a);
        assert!(p > 0.99);
        assert!(!sig);
    }

    #[test]
    fn test_ttest_needs_two_samples() {
        let (p, sig) = StatsCalculator::perform_ttest(&[1.0], &[1.0, 2.0]);
        assert!(p.is_nan());
        assert!(!sig);
    }

    #[test]
    fn test_group_stats_by_industry() {
        let suppliers = vec![
            supplier("a", "Food", "Asia", 60.0),
            supplier("b", "Food", "Europe", 70.0),
            supplier("c", "Textiles", "Asia", 40.0),
            supplier("d", "Chemicals", "Asia", 50.0),
        ];

        let stats = StatsCalculator::group_stats(&suppliers, GroupKey::Industry);
        let names: Vec<&str> = stats.iter().map(|g| g.group_name.as_str()).collect();
        assert_eq!(names, vec!["Chemicals", "Food", "Textiles"]);

        let food = &stats[1];
        assert_eq!(food.count, 2);
        assert!((food.mean - 65.0).abs() < 1e-12);

        let by_location = StatsCalculator::group_stats(&suppliers, GroupKey::Location);
        assert_eq!(by_location.len(), 2);
        assert_eq!(by_location[0].group_name, "Asia");
        assert_eq!(by_location[0].count, 3);
    }

    #[test]
    fn test_certification_means_skip_unheld() {
        let mut a = supplier("a", "Food", "Asia", 60.0);
        a.certifications.insert(Certification::Organic);
        let mut b = supplier("b", "Food", "Asia", 80.0);
        b.certifications.insert(Certification::Organic);
        b.certifications.insert(Certification::BCorp);

        let means = StatsCalculator::certification_means(&[a, b]);
        assert_eq!(
            means,
            vec![(Certification::Organic, 70.0), (Certification::BCorp, 80.0)]
        );
    }

    #[test]
    fn test_histogram_counts_all_values() {
        let values: Vec<f64> = (0..=100).map(|v| v as f64).collect();
        let bins = StatsCalculator::histogram(&values, 20);

        assert_eq!(bins.len(), 20);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(bins[0].lower, 0.0);
        assert!((bins[19].upper - 100.0).abs() < 1e-9);
        assert_eq!(bins[19].count, 6);
    }

    #[test]
    fn test_histogram_degenerate_range() {
        let bins = StatsCalculator::histogram(&[5.0, 5.0, 5.0], 4);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
        assert!(StatsCalculator::histogram(&[], 10).is_empty());
    }

    #[test]
    fn test_value_range_normalize() {
        let range = ValueRange::of([10.0, 30.0, 20.0]).unwrap();
        assert_eq!(range.min, 10.0);
        assert_eq!(range.max, 30.0);
        assert_eq!(range.normalize(20.0), 0.5);

        let flat = ValueRange::of([7.0, 7.0]).unwrap();
        assert_eq!(flat.normalize(7.0), 0.0);
        assert!(ValueRange::of(Vec::<f64>::new()).is_none());
    }

    #[test]
    fn test_dashboard_summary() {
        let suppliers = vec![
            supplier("a", "Food", "Asia", 60.0),
            supplier("b", "Food", "Asia", 80.0),
        ];
        let summary = DashboardSummary::from_suppliers(&suppliers).unwrap();
        assert_eq!(summary.supplier_count, 2);
        assert_eq!(summary.avg_sustainability_score, 70.0);
        assert_eq!(summary.avg_energy_efficiency, 70.0);
        assert!(DashboardSummary::from_suppliers(&Vec::<Supplier>::new()).is_none());
    }
}
