//! Supplier Record Module
//! Typed supplier rows and the certification set they carry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sustainability certifications tracked per supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Certification {
    Iso14001,
    FairTrade,
    Organic,
    BCorp,
    RainforestAlliance,
}

impl Certification {
    pub const ALL: [Certification; 5] = [
        Certification::Iso14001,
        Certification::FairTrade,
        Certification::Organic,
        Certification::BCorp,
        Certification::RainforestAlliance,
    ];

    /// Normalized CSV column name.
    pub fn column(&self) -> &'static str {
        match self {
            Certification::Iso14001 => "iso_14001",
            Certification::FairTrade => "fair_trade",
            Certification::Organic => "organic",
            Certification::BCorp => "b_corp",
            Certification::RainforestAlliance => "rainforest_alliance",
        }
    }

    /// Human-readable name for display
    pub fn label(&self) -> &'static str {
        match self {
            Certification::Iso14001 => "ISO 14001",
            Certification::FairTrade => "Fair Trade",
            Certification::Organic => "Organic",
            Certification::BCorp => "B Corp",
            Certification::RainforestAlliance => "Rainforest Alliance",
        }
    }

    fn bit(&self) -> u8 {
        1 << (*self as u8)
    }
}

impl fmt::Display for Certification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Compact set of certifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertificationSet(u8);

impl CertificationSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Certification::ALL.iter().copied().collect()
    }

    pub fn insert(&mut self, cert: Certification) {
        self.0 |= cert.bit();
    }

    pub fn remove(&mut self, cert: Certification) {
        self.0 &= !cert.bit();
    }

    /// Set or clear a certification depending on `held`.
    pub fn set(&mut self, cert: Certification, held: bool) {
        if held {
            self.insert(cert);
        } else {
            self.remove(cert);
        }
    }

    pub fn contains(&self, cert: Certification) -> bool {
        self.0 & cert.bit() != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True when at least one certification is shared.
    pub fn intersects(&self, other: &CertificationSet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Certification> + '_ {
        Certification::ALL
            .iter()
            .copied()
            .filter(move |c| self.contains(*c))
    }
}

impl FromIterator<Certification> for CertificationSet {
    fn from_iter<I: IntoIterator<Item = Certification>>(iter: I) -> Self {
        let mut set = CertificationSet::empty();
        for cert in iter {
            set.insert(cert);
        }
        set
    }
}

/// A single supplier row after column normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub supplier_id: String,
    pub name: String,
    pub industry: String,
    pub location: String,
    pub carbon_footprint: f64,
    pub recycling_rate: f64,
    pub energy_efficiency: f64,
    pub water_usage: f64,
    pub waste_production: f64,
    pub certifications: CertificationSet,
    pub lead_time_days: f64,
    pub onboarding_cost_usd: f64,
    pub switching_cost_usd: f64,
    /// Derived by the scoring model; 0 until scored.
    pub sustainability_score: f64,
}

impl Supplier {
    /// Label used in pickers where names may repeat.
    pub fn display_name(&self) -> String {
        format!("{} (#{})", self.name, self.supplier_id)
    }
}
