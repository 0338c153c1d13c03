//! Ranking Module
//! Orders the filtered selection by a user-chosen criterion.

use crate::data::Supplier;
use crate::scoring::BuyerProfile;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A supplier in the current selection with its buyer-weighted score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSupplier {
    #[serde(flatten)]
    pub supplier: Supplier,
    pub profile: BuyerProfile,
    pub weighted_score: f64,
}

/// Sort key for the rankings table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingCriterion {
    #[default]
    WeightedScore,
    SustainabilityScore,
    CarbonFootprint,
    RecyclingRate,
    EnergyEfficiency,
    WaterUsage,
    WasteProduction,
    LeadTime,
    OnboardingCost,
    SwitchingCost,
}

impl RankingCriterion {
    pub const ALL: [RankingCriterion; 10] = [
        RankingCriterion::WeightedScore,
        RankingCriterion::SustainabilityScore,
        RankingCriterion::CarbonFootprint,
        RankingCriterion::RecyclingRate,
        RankingCriterion::EnergyEfficiency,
        RankingCriterion::WaterUsage,
        RankingCriterion::WasteProduction,
        RankingCriterion::LeadTime,
        RankingCriterion::OnboardingCost,
        RankingCriterion::SwitchingCost,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RankingCriterion::WeightedScore => "Weighted Score",
            RankingCriterion::SustainabilityScore => "Sustainability Score",
            RankingCriterion::CarbonFootprint => "Carbon Footprint",
            RankingCriterion::RecyclingRate => "Recycling Rate",
            RankingCriterion::EnergyEfficiency => "Energy Efficiency",
            RankingCriterion::WaterUsage => "Water Usage",
            RankingCriterion::WasteProduction => "Waste Production",
            RankingCriterion::LeadTime => "Lead Time",
            RankingCriterion::OnboardingCost => "Onboarding Cost",
            RankingCriterion::SwitchingCost => "Switching Cost",
        }
    }

    /// Higher values rank first.
    pub fn descending(&self) -> bool {
        matches!(
            self,
            RankingCriterion::WeightedScore
                | RankingCriterion::SustainabilityScore
                | RankingCriterion::RecyclingRate
                | RankingCriterion::EnergyEfficiency
        )
    }

    pub fn value(&self, scored: &ScoredSupplier) -> f64 {
        let s = &scored.supplier;
        match self {
            RankingCriterion::WeightedScore => scored.weighted_score,
            RankingCriterion::SustainabilityScore => s.sustainability_score,
            RankingCriterion::CarbonFootprint => s.carbon_footprint,
            RankingCriterion::RecyclingRate => s.recycling_rate,
            RankingCriterion::EnergyEfficiency => s.energy_efficiency,
            RankingCriterion::WaterUsage => s.water_usage,
            RankingCriterion::WasteProduction => s.waste_production,
            RankingCriterion::LeadTime => s.lead_time_days,
            RankingCriterion::OnboardingCost => s.onboarding_cost_usd,
            RankingCriterion::SwitchingCost => s.switching_cost_usd,
        }
    }

    /// Stable sort; ties keep their current order.
    pub fn sort(&self, suppliers: &mut [ScoredSupplier]) {
        if self.descending() {
            suppliers.sort_by(|a, b| self.value(b).total_cmp(&self.value(a)));
        } else {
            suppliers.sort_by(|a, b| self.value(a).total_cmp(&self.value(b)));
        }
    }
}

impl fmt::Display for RankingCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CertificationSet;

    fn scored(id: &str, weighted: f64, carbon: f64) -> ScoredSupplier {
        ScoredSupplier {
            supplier: Supplier {
                supplier_id: id.to_string(),
                name: format!("Supplier {id}"),
                industry: "Food".to_string(),
                location: "Asia".to_string(),
                carbon_footprint: carbon,
                recycling_rate: 50.0,
                energy_efficiency: 50.0,
                water_usage: 100.0,
                waste_production: 10.0,
                certifications: CertificationSet::empty(),
                lead_time_days: 10.0,
                onboarding_cost_usd: 1000.0,
                switching_cost_usd: 500.0,
                sustainability_score: 50.0,
            },
            profile: BuyerProfile {
                sustainability: 0.5,
                lead_time: 1.0,
                onboarding_cost: 1.0,
                switching_cost: 1.0,
            },
            weighted_score: weighted,
        }
    }

    fn ids(rows: &[ScoredSupplier]) -> Vec<&str> {
        rows.iter().map(|r| r.supplier.supplier_id.as_str()).collect()
    }

    #[test]
    fn test_weighted_score_sorts_descending() {
        let mut rows = vec![scored("a", 0.2, 300.0), scored("b", 0.9, 100.0), scored("c", 0.5, 200.0)];
        RankingCriterion::WeightedScore.sort(&mut rows);
        assert_eq!(ids(&rows), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_carbon_sorts_ascending() {
        let mut rows = vec![scored("a", 0.2, 300.0), scored("b", 0.9, 100.0), scored("c", 0.5, 200.0)];
        RankingCriterion::CarbonFootprint.sort(&mut rows);
        assert_eq!(ids(&rows), vec!["b", "c", "a"]);
        assert!(!RankingCriterion::CarbonFootprint.descending());
    }

    #[test]
    fn test_sort_is_stable() {
        let mut rows = vec![scored("x", 0.5, 1.0), scored("y", 0.5, 1.0), scored("z", 0.7, 1.0)];
        RankingCriterion::WeightedScore.sort(&mut rows);
        assert_eq!(ids(&rows), vec!["z", "x", "y"]);

        RankingCriterion::SustainabilityScore.sort(&mut rows);
        assert_eq!(ids(&rows), vec!["z", "x", "y"]);
    }

    #[test]
    fn test_labels_unique() {
        let labels: std::collections::HashSet<_> =
            RankingCriterion::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels.len(), RankingCriterion::ALL.len());
    }
}
