//! Scenario Simulation Module
//! What happens to environmental metrics when one supplier replaces another.

use crate::data::Supplier;
use crate::stats::DashboardSummary;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ScenarioError {
    #[error("Unknown supplier: {0}")]
    UnknownSupplier(String),
    #[error("No suppliers to simulate against")]
    EmptyPool,
}

/// Environmental metrics compared between two suppliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImpactMetric {
    CarbonFootprint,
    WaterUsage,
    WasteProduction,
    RecyclingRate,
    EnergyEfficiency,
}

impl ImpactMetric {
    pub const ALL: [ImpactMetric; 5] = [
        ImpactMetric::CarbonFootprint,
        ImpactMetric::WaterUsage,
        ImpactMetric::WasteProduction,
        ImpactMetric::RecyclingRate,
        ImpactMetric::EnergyEfficiency,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ImpactMetric::CarbonFootprint => "Carbon Footprint",
            ImpactMetric::WaterUsage => "Water Usage",
            ImpactMetric::WasteProduction => "Waste Production",
            ImpactMetric::RecyclingRate => "Recycling Rate",
            ImpactMetric::EnergyEfficiency => "Energy Efficiency",
        }
    }

    pub fn lower_is_better(&self) -> bool {
        matches!(
            self,
            ImpactMetric::CarbonFootprint | ImpactMetric::WaterUsage | ImpactMetric::WasteProduction
        )
    }

    pub fn value(&self, supplier: &Supplier) -> f64 {
        match self {
            ImpactMetric::CarbonFootprint => supplier.carbon_footprint,
            ImpactMetric::WaterUsage => supplier.water_usage,
            ImpactMetric::WasteProduction => supplier.waste_production,
            ImpactMetric::RecyclingRate => supplier.recycling_rate,
            ImpactMetric::EnergyEfficiency => supplier.energy_efficiency,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Improvement,
    Decline,
    Unchanged,
}

/// Change of one metric when switching to the alternative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricImpact {
    pub metric: ImpactMetric,
    pub current: f64,
    pub alternative: f64,
    /// `alternative - current`
    pub delta: f64,
    pub outcome: Outcome,
}

impl MetricImpact {
    pub fn new(metric: ImpactMetric, current: &Supplier, alternative: &Supplier) -> Self {
        let (current, alternative) = (metric.value(current), metric.value(alternative));
        let delta = alternative - current;

        let outcome = if delta == 0.0 {
            Outcome::Unchanged
        } else if (delta < 0.0) == metric.lower_is_better() {
            Outcome::Improvement
        } else {
            Outcome::Decline
        };

        Self {
            metric,
            current,
            alternative,
            delta,
            outcome,
        }
    }
}

impl fmt::Display for MetricImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match (self.outcome, self.metric.lower_is_better()) {
            (Outcome::Unchanged, _) => return write!(f, "{}: no change", self.metric.label()),
            (_, true) if self.delta < 0.0 => "reduction",
            (_, _) if self.delta < 0.0 => "decrease",
            _ => "increase",
        };
        write!(f, "{}: {:.2} {}", self.metric.label(), self.delta.abs(), direction)
    }
}

/// Side-by-side comparison of two suppliers.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioComparison {
    pub current: Supplier,
    pub alternative: Supplier,
    pub impacts: Vec<MetricImpact>,
    pub score_delta: f64,
}

impl ScenarioComparison {
    pub fn compare(current: &Supplier, alternative: &Supplier) -> Self {
        Self {
            current: current.clone(),
            alternative: alternative.clone(),
            impacts: ImpactMetric::ALL
                .iter()
                .map(|m| MetricImpact::new(*m, current, alternative))
                .collect(),
            score_delta: alternative.sustainability_score - current.sustainability_score,
        }
    }

    pub fn improvements(&self) -> impl Iterator<Item = &MetricImpact> + '_ {
        self.impacts
            .iter()
            .filter(|i| i.outcome == Outcome::Improvement)
    }

    pub fn declines(&self) -> impl Iterator<Item = &MetricImpact> + '_ {
        self.impacts
            .iter()
            .filter(|i| i.outcome == Outcome::Decline)
    }
}

/// Portfolio averages before and after a substitution.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioImpact {
    pub comparison: ScenarioComparison,
    pub before: DashboardSummary,
    pub after: DashboardSummary,
}

impl PortfolioImpact {
    pub fn score_change(&self) -> f64 {
        self.after.avg_sustainability_score - self.before.avg_sustainability_score
    }
}

/// Replace `current_id` in `pool` with `alternative_id` and recompute the
/// portfolio summary. The alternative may come from outside the pool.
pub fn substitute(
    pool: &[Supplier],
    candidates: &[Supplier],
    current_id: &str,
    alternative_id: &str,
) -> Result<PortfolioImpact, ScenarioError> {
    let find = |set: &[Supplier], id: &str| -> Result<Supplier, ScenarioError> {
        set.iter()
            .find(|s| s.supplier_id == id)
            .cloned()
            .ok_or_else(|| ScenarioError::UnknownSupplier(id.to_string()))
    };

    let before = DashboardSummary::from_suppliers(pool).ok_or(ScenarioError::EmptyPool)?;
    let current = find(pool, current_id)?;
    let alternative = find(candidates, alternative_id)?;

    let swapped: Vec<&Supplier> = pool
        .iter()
        .map(|s| {
            if s.supplier_id == current_id {
                &alternative
            } else {
                s
            }
        })
        .collect();
    let after =
        DashboardSummary::from_suppliers(swapped.iter().copied()).ok_or(ScenarioError::EmptyPool)?;

    Ok(PortfolioImpact {
        comparison: ScenarioComparison::compare(&current, &alternative),
        before,
        after,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CertificationSet;

    fn supplier(id: &str, carbon: f64, recycling: f64, score: f64) -> Supplier {
        Supplier {
            supplier_id: id.to_string(),
            name: format!("Supplier {id}"),
            industry: "Food".to_string(),
            location: "Asia".to_string(),
            carbon_footprint: carbon,
            recycling_rate: recycling,
            energy_efficiency: 50.0,
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
    fn test_classification_follows_metric_direction() {
        let current = supplier("1", 500.0, 40.0, 50.0);
        let alternative = supplier("2", 487.66, 36.9, 48.0);
        let cmp = ScenarioComparison::compare(&current, &alternative);

        let carbon = cmp.impacts[0];
        assert_eq!(carbon.metric, ImpactMetric::CarbonFootprint);
        assert_eq!(carbon.outcome, Outcome::Improvement);
        assert_eq!(carbon.to_string(), "Carbon Footprint: 12.34 reduction");

        let recycling = cmp
            .impacts
            .iter()
            .find(|i| i.metric == ImpactMetric::RecyclingRate)
            .unwrap();
        assert_eq!(recycling.outcome, Outcome::Decline);
        assert_eq!(recycling.to_string(), "Recycling Rate: 3.10 decrease");

        assert!((cmp.score_delta + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_higher_carbon_is_decline() {
        let current = supplier("1", 100.0, 40.0, 50.0);
        let alternative = supplier("2", 150.0, 45.0, 50.0);
        let cmp = ScenarioComparison::compare(&current, &alternative);

        assert_eq!(cmp.impacts[0].outcome, Outcome::Decline);
        assert_eq!(cmp.impacts[0].to_string(), "Carbon Footprint: 50.00 increase");
        assert_eq!(cmp.improvements().count(), 1);
        assert_eq!(cmp.declines().count(), 1);
    }

    #[test]
    fn test_same_supplier_is_unchanged() {
        let s = supplier("1", 100.0, 40.0, 50.0);
        let cmp = ScenarioComparison::compare(&s, &s);
        assert!(cmp.impacts.iter().all(|i| i.outcome == Outcome::Unchanged));
        assert_eq!(cmp.impacts[0].to_string(), "Carbon Footprint: no change");
        assert_eq!(cmp.score_delta, 0.0);
    }

    #[test]
    fn test_substitute_recomputes_portfolio() {
        let pool = vec![supplier("1", 100.0, 40.0, 40.0), supplier("2", 300.0, 60.0, 60.0)];
        let candidates = vec![pool[0].clone(), pool[1].clone(), supplier("3", 200.0, 80.0, 80.0)];

        let impact = substitute(&pool, &candidates, "1", "3").unwrap();
        assert_eq!(impact.before.supplier_count, 2);
        assert_eq!(impact.after.supplier_count, 2);
        assert!((impact.before.avg_sustainability_score - 50.0).abs() < 1e-12);
        assert!((impact.after.avg_sustainability_score - 70.0).abs() < 1e-12);
        assert!((impact.score_change() - 20.0).abs() < 1e-12);
        assert!((impact.after.avg_carbon_footprint - 250.0).abs() < 1e-12);
    }

    #[test]
    fn test_substitute_unknown_supplier() {
        let pool = vec![supplier("1", 100.0, 40.0, 40.0)];
        assert_eq!(
            substitute(&pool, &pool, "9", "1").unwrap_err(),
            ScenarioError::UnknownSupplier("9".to_string())
        );
        assert_eq!(
            substitute(&pool, &pool, "1", "7").unwrap_err(),
            ScenarioError::UnknownSupplier("7".to_string())
        );
    }

    #[test]
    fn test_substitute_empty_pool() {
        let candidates = vec![supplier("1", 100.0, 40.0, 40.0)];
        assert_eq!(
            substitute(&[], &candidates, "1", "1").unwrap_err(),
            ScenarioError::EmptyPool
        );
        assert_eq!(
            substitute(&[], &[], "1", "1").unwrap_err(),
            ScenarioError::EmptyPool
        );
    }
}
