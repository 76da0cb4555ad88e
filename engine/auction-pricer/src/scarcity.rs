//! Positional scarcity
//!
//! The engine treats scarcity as an opaque multiplier supplied by a
//! [`ScarcityAnalyzer`]. A needs-based analyzer is provided for callers that do
//! not compute their own.

use crate::envelope::TeamCapSituation;
use crate::models::RankedPlayer;
use crate::positions::{Position, PositionTable};
use serde::{Deserialize, Serialize};

/// Scarcity score and the price multiplier it implies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScarcityAssessment {
    /// Demand relative to supply; 1.0 is balanced
    pub score: f64,
    pub multiplier: f64,
}

impl ScarcityAssessment {
    pub fn neutral() -> Self {
        Self { score: 1.0, multiplier: 1.0 }
    }
}

/// Supplies the per-position scarcity multiplier
pub trait ScarcityAnalyzer {
    /// `pool` holds the ranked candidates at `position` only
    fn assess(
        &self,
        position: Position,
        pool: &[&RankedPlayer<'_>],
        teams: &[TeamCapSituation],
    ) -> ScarcityAssessment;
}

/// No scarcity adjustment
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralScarcity;

impl ScarcityAnalyzer for NeutralScarcity {
    fn assess(
        &self,
        _position: Position,
        _pool: &[&RankedPlayer<'_>],
        _teams: &[TeamCapSituation],
    ) -> ScarcityAssessment {
        ScarcityAssessment::neutral()
    }
}

/// Multipliers computed elsewhere
#[derive(Debug, Clone)]
pub struct FixedScarcity {
    multipliers: PositionTable<f64>,
}

impl FixedScarcity {
    pub fn new(multipliers: PositionTable<f64>) -> Self {
        Self { multipliers }
    }
}

impl ScarcityAnalyzer for FixedScarcity {
    fn assess(
        &self,
        position: Position,
        _pool: &[&RankedPlayer<'_>],
        _teams: &[TeamCapSituation],
    ) -> ScarcityAssessment {
        let multiplier = *self.multipliers.get(position);
        ScarcityAssessment { score: multiplier, multiplier }
    }
}

/// Compares league-wide starter needs against the quality supply at a position
#[derive(Debug, Clone)]
pub struct NeedsBasedScarcity {
    /// Worst weighted rank counted as quality supply
    pub quality_rank_cutoff: f64,

    /// Multiplier change per unit of score above or below balance
    pub sensitivity: f64,

    pub min_multiplier: f64,
    pub max_multiplier: f64,
}

impl Default for NeedsBasedScarcity {
    fn default() -> Self {
        Self {
            quality_rank_cutoff: 200.0,
            sensitivity: 0.10,
            min_multiplier: 0.85,
            max_multiplier: 1.25,
        }
    }
}

impl ScarcityAnalyzer for NeedsBasedScarcity {
    fn assess(
        &self,
        position: Position,
        pool: &[&RankedPlayer<'_>],
        teams: &[TeamCapSituation],
    ) -> ScarcityAssessment {
        let demand: u32 = teams.iter().map(|t| t.need(position)).sum();
        if demand == 0 {
            return ScarcityAssessment::neutral();
        }

        let supply = pool
            .iter()
            .filter(|p| !p.unranked && p.weighted_rank <= self.quality_rank_cutoff)
            .count();

        let score = demand as f64 / supply.max(1) as f64;
        let multiplier = (1.0 + self.sensitivity * (score - 1.0))
            .clamp(self.min_multiplier, self.max_multiplier);

        ScarcityAssessment { score, multiplier }
    }
}
