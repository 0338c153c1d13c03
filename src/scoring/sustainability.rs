//! Sustainability Scoring Module
//! Sub-scores and the two scoring models applied to supplier rows.

use crate::data::{Certification, Supplier};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Points awarded per held certification in the balanced model.
pub const POINTS_PER_CERTIFICATION: f64 = 5.0;

/// Per-metric scores on a 0..100 "higher is better" scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubScores {
    pub carbon: f64,
    pub recycling: f64,
    pub energy: f64,
    pub water: f64,
    pub waste: f64,
    pub certifications: f64,
}

impl SubScores {
    pub fn of(supplier: &Supplier) -> Self {
        Self {
            carbon: (100.0 - supplier.carbon_footprint / 10.0).max(0.0),
            recycling: supplier.recycling_rate,
            energy: supplier.energy_efficiency,
            water: (100.0 - supplier.water_usage / 100.0).max(0.0),
            waste: (100.0 - supplier.waste_production / 5.0).max(0.0),
            certifications: supplier.certifications.len() as f64 * POINTS_PER_CERTIFICATION,
        }
    }

    /// Environmental axes for radar charts, in display order.
    pub fn environmental(&self) -> [(&'static str, f64); 5] {
        [
            ("Carbon Footprint", self.carbon),
            ("Recycling Rate", self.recycling),
            ("Energy Efficiency", self.energy),
            ("Water Usage", self.water),
            ("Waste Production", self.waste),
        ]
    }
}

/// Factor weights for the weighted model. Expected to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SustainabilityWeights {
    pub carbon: f64,
    pub recycling: f64,
    pub energy: f64,
    pub water: f64,
    pub waste: f64,
    pub certifications: f64,
}

impl Default for SustainabilityWeights {
    fn default() -> Self {
        Self {
            carbon: 0.25,
            recycling: 0.15,
            energy: 0.15,
            water: 0.15,
            waste: 0.15,
            certifications: 0.15,
        }
    }
}

/// How the sustainability score is derived from a supplier row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringModel {
    /// Mean of the six sub-scores.
    #[default]
    Balanced,
    /// Weighted sum of linearly normalized factors, 0..100, two decimals.
    Weighted {
        #[serde(default)]
        weights: SustainabilityWeights,
    },
}

impl ScoringModel {
    pub fn label(&self) -> &'static str {
        match self {
            ScoringModel::Balanced => "Balanced",
            ScoringModel::Weighted { .. } => "Weighted",
        }
    }

    pub fn score(&self, supplier: &Supplier) -> f64 {
        match self {
            ScoringModel::Balanced => {
                let s = SubScores::of(supplier);
                (s.carbon + s.recycling + s.energy + s.water + s.waste + s.certifications) / 6.0
            }
            ScoringModel::Weighted { weights: w } => {
                let carbon = 1.0 - supplier.carbon_footprint / 1000.0;
                let recycling = supplier.recycling_rate / 100.0;
                let energy = supplier.energy_efficiency / 100.0;
                let water = 1.0 - supplier.water_usage / 10000.0;
                let waste = 1.0 - supplier.waste_production / 500.0;
                let certs =
                    supplier.certifications.len() as f64 / Certification::ALL.len() as f64;

                let score = w.carbon * carbon
                    + w.recycling * recycling
                    + w.energy * energy
                    + w.water * water
                    + w.waste * waste
                    + w.certifications * certs;

                (score * 100.0 * 100.0).round() / 100.0
            }
        }
    }
}

/// Score every supplier in place, then order by score, best first.
pub fn score_suppliers(suppliers: &mut [Supplier], model: &ScoringModel) {
    suppliers
        .par_iter_mut()
        .for_each(|s| s.sustainability_score = model.score(s));

    suppliers.sort_by(|a, b| b.sustainability_score.total_cmp(&a.sustainability_score));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CertificationSet;

    fn reference_supplier() -> Supplier {
        Supplier {
            supplier_id: "1".to_string(),
            name: "Reference".to_string(),
            industry: "Food".to_string(),
            location: "Asia".to_string(),
            carbon_footprint: 500.0,
            recycling_rate: 40.0,
            energy_efficiency: 60.0,
            water_usage: 2000.0,
            waste_production: 100.0,
            certifications: [Certification::Organic, Certification::BCorp]
                .into_iter()
                .collect(),
            lead_time_days: 10.0,
            onboarding_cost_usd: 1000.0,
            switching_cost_usd: 500.0,
            sustainability_score: 0.0,
        }
    }

    #[test]
    fn test_balanced_score() {
        let score = ScoringModel::Balanced.score(&reference_supplier());
        assert!((score - 320.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_score_default_weights() {
        let model = ScoringModel::Weighted {
            weights: SustainabilityWeights::default(),
        };
        let score = model.score(&reference_supplier());
        assert!((score - 57.5).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_score_rounds_to_two_decimals() {
        let mut s = reference_supplier();
        s.carbon_footprint = 333.0;
        s.recycling_rate = 33.333;
        s.energy_efficiency = 0.0;
        s.water_usage = 10_000.0;
        s.waste_production = 500.0;
        s.certifications = CertificationSet::empty();

        // 100 * (0.25 * 0.667 + 0.15 * 0.33333) = 21.67495
        let model = ScoringModel::Weighted {
            weights: SustainabilityWeights::default(),
        };
        assert!((model.score(&s) - 21.67).abs() < 1e-9);
    }

    #[test]
    fn test_default_model_is_balanced() {
        assert_eq!(ScoringModel::default(), ScoringModel::Balanced);
    }

    #[test]
    fn test_sub_scores_clamp_at_zero() {
        let mut s = reference_supplier();
        s.carbon_footprint = 2500.0;
        s.water_usage = 50_000.0;
        s.waste_production = 900.0;
        s.certifications = CertificationSet::empty();

        let sub = SubScores::of(&s);
        assert_eq!(sub.carbon, 0.0);
        assert_eq!(sub.water, 0.0);
        assert_eq!(sub.waste, 0.0);
        assert_eq!(sub.certifications, 0.0);
    }

    #[test]
    fn test_score_suppliers_orders_best_first() {
        let mut worse = reference_supplier();
        worse.supplier_id = "2".to_string();
        worse.carbon_footprint = 900.0;
        let mut suppliers = vec![worse, reference_supplier()];

        score_suppliers(&mut suppliers, &ScoringModel::Balanced);

        assert_eq!(suppliers[0].supplier_id, "1");
        assert!(suppliers[0].sustainability_score > suppliers[1].sustainability_score);
    }

    #[test]
    fn test_scoring_model_from_json() {
        let model: ScoringModel =
            serde_json::from_str(r#"{"kind": "weighted", "weights": {"carbon": 0.5}}"#).unwrap();
        match model {
            ScoringModel::Weighted { weights } => {
                assert_eq!(weights.carbon, 0.5);
                assert_eq!(weights.water, 0.15);
            }
            ScoringModel::Balanced => panic!("expected weighted model"),
        }
    }
}
