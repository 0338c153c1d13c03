//! Scoring module - Sustainability models, buyer weighting and ranking

mod buyer;
mod ranking;
mod sustainability;

pub use buyer::{buyer_profiles, BuyerProfile, BuyerWeights};
pub use ranking::{RankingCriterion, ScoredSupplier};
pub use sustainability::{score_suppliers, ScoringModel, SubScores, SustainabilityWeights};
