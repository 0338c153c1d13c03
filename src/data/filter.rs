//! Supplier Filter Module
//! Sidebar filter state and row selection.

use crate::data::{CertificationSet, Supplier, SupplierDataset};
use serde::Serialize;
use std::collections::BTreeSet;

/// Filters applied to the loaded data set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SupplierFilter {
    pub industries: BTreeSet<String>,
    pub locations: BTreeSet<String>,
    /// Checked certifications. A supplier must hold at least one of them;
    /// an empty set disables the check.
    pub certifications: CertificationSet,
    pub max_lead_time: Option<f64>,
    pub max_onboarding_cost: Option<f64>,
    pub max_switching_cost: Option<f64>,
}

impl SupplierFilter {
    /// Everything selected, all certifications checked, no caps.
    pub fn permissive(dataset: &SupplierDataset) -> Self {
        Self {
            industries: dataset.industries().into_iter().collect(),
            locations: dataset.locations().into_iter().collect(),
            certifications: CertificationSet::all(),
            max_lead_time: None,
            max_onboarding_cost: None,
            max_switching_cost: None,
        }
    }

    pub fn matches(&self, supplier: &Supplier) -> bool {
        let within = |cap: Option<f64>, value: f64| cap.map_or(true, |max| value <= max);

        self.industries.contains(&supplier.industry)
            && self.locations.contains(&supplier.location)
            && within(self.max_lead_time, supplier.lead_time_days)
            && within(self.max_onboarding_cost, supplier.onboarding_cost_usd)
            && within(self.max_switching_cost, supplier.switching_cost_usd)
            && (self.certifications.is_empty()
                || supplier.certifications.intersects(&self.certifications))
    }

    /// Matching suppliers in data set order.
    pub fn apply(&self, suppliers: &[Supplier]) -> Vec<Supplier> {
        suppliers
            .iter()
            .filter(|s| self.matches(s))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Certification, SupplierLoader};

    fn sample() -> SupplierDataset {
        SupplierLoader::default().load_default().unwrap()
    }

    #[test]
    fn test_permissive_filter_hides_uncertified() {
        let dataset = sample();
        let filter = SupplierFilter::permissive(&dataset);

        let selected = filter.apply(&dataset.suppliers);
        assert_eq!(selected.len(), 44);
        assert!(selected.iter().all(|s| !s.certifications.is_empty()));
    }

    #[test]
    fn test_unchecking_all_certifications_disables_check() {
        let dataset = sample();
        let mut filter = SupplierFilter::permissive(&dataset);
        filter.certifications = CertificationSet::empty();

        assert_eq!(filter.apply(&dataset.suppliers).len(), 50);
    }

    #[test]
    fn test_single_certification() {
        let dataset = sample();
        let mut filter = SupplierFilter::permissive(&dataset);
        filter.certifications = [Certification::Iso14001].into_iter().collect();

        let selected = filter.apply(&dataset.suppliers);
        assert_eq!(selected.len(), 20);
        assert!(selected
            .iter()
            .all(|s| s.certifications.contains(Certification::Iso14001)));
    }

    #[test]
    fn test_industry_location_and_caps() {
        let dataset = sample();
        let mut filter = SupplierFilter::permissive(&dataset);
        filter.certifications = CertificationSet::empty();
        filter.industries = ["Food".to_string()].into_iter().collect();
        filter.locations.remove("Africa");
        filter.max_lead_time = Some(20.0);

        let selected = filter.apply(&dataset.suppliers);
        assert!(!selected.is_empty());
        assert!(selected.iter().all(|s| s.industry == "Food"
            && s.location != "Africa"
            && s.lead_time_days <= 20.0));
    }

    #[test]
    fn test_empty_selection() {
        let dataset = sample();
        let mut filter = SupplierFilter::permissive(&dataset);
        filter.industries.clear();
        assert!(filter.apply(&dataset.suppliers).is_empty());
    }
}
