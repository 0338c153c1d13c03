//! Analysis Module
//! Derives everything the dashboard shows from a scored data set and the
//! current sidebar settings.

use crate::data::{Certification, Supplier, SupplierDataset, SupplierFilter};
use crate::scoring::{buyer_profiles, BuyerWeights, RankingCriterion, ScoredSupplier};
use crate::stats::{DashboardSummary, GroupKey, GroupStats, HistogramBin, StatsCalculator};
use serde::Serialize;
use tracing::debug;

/// Bins used for the score distribution.
pub const HISTOGRAM_BINS: usize = 20;

/// Sidebar state that drives a recomputation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisSettings {
    pub filter: SupplierFilter,
    pub buyer_weights: BuyerWeights,
    pub criterion: RankingCriterion,
}

impl AnalysisSettings {
    pub fn for_dataset(dataset: &SupplierDataset, buyer_weights: BuyerWeights) -> Self {
        Self {
            filter: SupplierFilter::permissive(dataset),
            buyer_weights,
            criterion: RankingCriterion::default(),
        }
    }
}

/// Snapshot of the filtered selection.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    /// Filtered suppliers in ranking order.
    pub ranked: Vec<ScoredSupplier>,
    pub summary: Option<DashboardSummary>,
    pub histogram: Vec<HistogramBin>,
    pub by_industry: Vec<GroupStats>,
    pub by_location: Vec<GroupStats>,
    pub certification_means: Vec<(Certification, f64)>,
}

impl Analysis {
    pub fn compute(dataset: &SupplierDataset, settings: &AnalysisSettings) -> Self {
        let selected = settings.filter.apply(&dataset.suppliers);
        let weights = settings.buyer_weights.normalized();

        let mut ranked: Vec<ScoredSupplier> = buyer_profiles(&selected)
            .into_iter()
            .zip(selected.iter().cloned())
            .map(|(profile, supplier)| ScoredSupplier {
                weighted_score: profile.score(&weights),
                supplier,
                profile,
            })
            .collect();
        settings.criterion.sort(&mut ranked);

        let scores: Vec<f64> = selected.iter().map(|s| s.sustainability_score).collect();

        debug!(
            selected = selected.len(),
            total = dataset.len(),
            criterion = settings.criterion.label(),
            "Analysis recomputed"
        );

        Self {
            summary: DashboardSummary::from_suppliers(&selected),
            histogram: StatsCalculator::histogram(&scores, HISTOGRAM_BINS),
            by_industry: StatsCalculator::group_stats(&selected, GroupKey::Industry),
            by_location: StatsCalculator::group_stats(&selected, GroupKey::Location),
            certification_means: StatsCalculator::certification_means(&selected),
            ranked,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    /// Suppliers of the selection in ranking order.
    pub fn suppliers(&self) -> impl Iterator<Item = &Supplier> + '_ {
        self.ranked.iter().map(|r| &r.supplier)
    }

    pub fn top(&self, n: usize) -> &[ScoredSupplier] {
        &self.ranked[..n.min(self.ranked.len())]
    }

    /// Best suppliers by buyer-weighted score, whatever the table ordering.
    pub fn top_by_weighted_score(&self, n: usize) -> Vec<&ScoredSupplier> {
        let mut rows: Vec<&ScoredSupplier> = self.ranked.iter().collect();
        rows.sort_by(|a, b| b.weighted_score.total_cmp(&a.weighted_score));
        rows.truncate(n);
        rows
    }

    pub fn find(&self, supplier_id: &str) -> Option<&ScoredSupplier> {
        self.ranked
            .iter()
            .find(|r| r.supplier.supplier_id == supplier_id)
    }
}
