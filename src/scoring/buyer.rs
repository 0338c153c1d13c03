//! Buyer Requirements Module
//! Weights a supplier's sustainability against lead time and cost, relative
//! to the suppliers currently in view.

use crate::data::Supplier;
use crate::stats::ValueRange;
use serde::{Deserialize, Serialize};

/// Importance sliders, each 0..=100 percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuyerWeights {
    pub sustainability: f64,
    pub lead_time: f64,
    pub onboarding_cost: f64,
    pub switching_cost: f64,
}

impl Default for BuyerWeights {
    fn default() -> Self {
        Self {
            sustainability: 50.0,
            lead_time: 25.0,
            onboarding_cost: 15.0,
            switching_cost: 10.0,
        }
    }
}

impl BuyerWeights {
    /// Scale to fractions summing to 1. All-zero importances become equal weights.
    pub fn normalized(&self) -> BuyerWeights {
        let parts = [
            self.sustainability.max(0.0),
            self.lead_time.max(0.0),
            self.onboarding_cost.max(0.0),
            self.switching_cost.max(0.0),
        ];
        let total: f64 = parts.iter().sum();

        if total <= 0.0 {
            return BuyerWeights {
                sustainability: 0.25,
                lead_time: 0.25,
                onboarding_cost: 0.25,
                switching_cost: 0.25,
            };
        }

        BuyerWeights {
            sustainability: parts[0] / total,
            lead_time: parts[1] / total,
            onboarding_cost: parts[2] / total,
            switching_cost: parts[3] / total,
        }
    }
}

/// A supplier's buyer-facing factors on a 0..1 "higher is better" scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BuyerProfile {
    pub sustainability: f64,
    pub lead_time: f64,
    pub onboarding_cost: f64,
    pub switching_cost: f64,
}

impl BuyerProfile {
    /// Weighted score; `weights` should already be normalized.
    pub fn score(&self, weights: &BuyerWeights) -> f64 {
        weights.sustainability * self.sustainability
            + weights.lead_time * self.lead_time
            + weights.onboarding_cost * self.onboarding_cost
            + weights.switching_cost * self.switching_cost
    }

    pub fn axes(&self) -> [(&'static str, f64); 4] {
        [
            ("Sustainability", self.sustainability),
            ("Lead Time", self.lead_time),
            ("Onboarding Cost", self.onboarding_cost),
            ("Switching Cost", self.switching_cost),
        ]
    }
}

/// Profiles for `suppliers`, normalized against that same set.
///
/// Lower lead time and cost is better, so those factors are `1 - minmax`.
/// When every supplier shares the same value the factor is 1 for all.
pub fn buyer_profiles(suppliers: &[Supplier]) -> Vec<BuyerProfile> {
    let lead = ValueRange::of(suppliers.iter().map(|s| s.lead_time_days));
    let onboarding = ValueRange::of(suppliers.iter().map(|s| s.onboarding_cost_usd));
    let switching = ValueRange::of(suppliers.iter().map(|s| s.switching_cost_usd));

    let inverted = |range: Option<ValueRange>, value: f64| {
        range.map_or(1.0, |r| 1.0 - r.normalize(value))
    };

    suppliers
        .iter()
        .map(|s| BuyerProfile {
            sustainability: s.sustainability_score / 100.0,
            lead_time: inverted(lead, s.lead_time_days),
            onboarding_cost: inverted(onboarding, s.onboarding_cost_usd),
            switching_cost: inverted(switching, s.switching_cost_usd),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CertificationSet;

    fn supplier(id: &str, score: f64, lead: f64, onboarding: f64, switching: f64) -> Supplier {
        Supplier {
            supplier_id: id.to_string(),
            name: format!("Supplier {id}"),
            industry: "Food".to_string(),
            location: "Asia".to_string(),
            carbon_footprint: 100.0,
            recycling_rate: 50.0,
            energy_efficiency: 50.0,
            water_usage: 100.0,
            waste_production: 10.0,
            certifications: CertificationSet::empty(),
            lead_time_days: lead,
            onboarding_cost_usd: onboarding,
            switching_cost_usd: switching,
            sustainability_score: score,
        }
    }

    #[test]
    fn test_normalized_weights_sum_to_one() {
        let w = BuyerWeights::default().normalized();
        let total = w.sustainability + w.lead_time + w.onboarding_cost + w.switching_cost;
        assert!((total - 1.0).abs() < 1e-12);
        assert!((w.sustainability - 0.5).abs() < 1e-12);

        let skewed = BuyerWeights {
            sustainability: 100.0,
            lead_time: 100.0,
            onboarding_cost: 0.0,
            switching_cost: 0.0,
        }
        .normalized();
        assert_eq!(skewed.sustainability, 0.5);
        assert_eq!(skewed.onboarding_cost, 0.0);
    }

    #[test]
    fn test_all_zero_weights_fall_back_to_equal() {
        let w = BuyerWeights {
            sustainability: 0.0,
            lead_time: 0.0,
            onboarding_cost: 0.0,
            switching_cost: 0.0,
        }
        .normalized();
        assert_eq!(w.lead_time, 0.25);
        assert_eq!(w.switching_cost, 0.25);
    }

    #[test]
    fn test_profiles_invert_cost_factors() {
        let suppliers = vec![
            supplier("cheap", 60.0, 10.0, 1000.0, 500.0),
            supplier("pricey", 80.0, 30.0, 3000.0, 1500.0),
        ];
        let profiles = buyer_profiles(&suppliers);

        assert_eq!(profiles[0].lead_time, 1.0);
        assert_eq!(profiles[0].onboarding_cost, 1.0);
        assert_eq!(profiles[1].lead_time, 0.0);
        assert_eq!(profiles[1].switching_cost, 0.0);
        assert!((profiles[1].sustainability - 0.8).abs() < 1e-12);

        let w = BuyerWeights::default().normalized();
        // cheap: 0.5*0.6 + 0.25 + 0.15 + 0.10 = 0.8; pricey: 0.5*0.8 = 0.4
        assert!((profiles[0].score(&w) - 0.8).abs() < 1e-12);
        assert!((profiles[1].score(&w) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_profiles_identical_costs() {
        let suppliers = vec![supplier("a", 50.0, 10.0, 100.0, 100.0)];
        let profiles = buyer_profiles(&suppliers);
        assert_eq!(profiles[0].lead_time, 1.0);
        assert_eq!(profiles[0].onboarding_cost, 1.0);
    }
}
