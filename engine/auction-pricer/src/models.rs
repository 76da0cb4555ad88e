use crate::allocator::AllocationOutcome;
use crate::contracts::ContractOption;
use crate::curves::{CurveSnapshot, CurveVariant};
use crate::envelope::{CapEnvelope, TeamCapSituation};
use crate::positions::{Position, PositionTable};
use crate::tiers::Tier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// League player id (MFL ids are numeric strings)
pub type PlayerId = String;

/// A free agent up for auction. Never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCandidate {
    pub id: PlayerId,

    #[serde(default)]
    pub name: Option<String>,

    pub position: Position,

    pub age: u32,

    #[serde(default)]
    pub dynasty_rank: Option<u32>,

    #[serde(default)]
    pub redraft_rank: Option<u32>,

    /// Composite fantasy points from recent seasons
    #[serde(default)]
    pub fantasy_points: Option<f64>,

    #[serde(default)]
    pub current_salary: Option<f64>,
}

impl PlayerCandidate {
    pub fn new(id: impl Into<PlayerId>, position: Position, age: u32) -> Self {
        Self {
            id: id.into(),
            name: None,
            position,
            age,
            dynasty_rank: None,
            redraft_rank: None,
            fantasy_points: None,
            current_salary: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_ranks(mut self, dynasty: Option<u32>, redraft: Option<u32>) -> Self {
        self.dynasty_rank = dynasty;
        self.redraft_rank = redraft;
        self
    }

    pub fn with_points(mut self, points: f64) -> Self {
        self.fantasy_points = Some(points);
        self
    }

    /// Name for display, falling back to the id
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Price breakdown for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceFactors {
    /// Intrinsic value before market adjustment
    pub base_price: f64,

    pub age_multiplier: f64,

    pub scarcity_multiplier: f64,

    /// Three-year equilibrium price; never below the league minimum
    pub final_price: f64,

    /// 0..=1
    pub confidence: f64,
}

/// A candidate with its ranks resolved
#[derive(Debug, Clone, Copy)]
pub struct RankedPlayer<'a> {
    pub candidate: &'a PlayerCandidate,

    /// Weighted overall rank, or the replacement rank when unranked
    pub weighted_rank: f64,

    /// True when neither dynasty nor redraft rank was supplied
    pub unranked: bool,

    /// Dense 1..N rank within the candidate's position
    pub position_rank: u32,

    /// Inside the league's top scorers by fantasy points
    pub top_scorer: bool,
}

/// A ranked player with a tier
#[derive(Debug, Clone, Copy)]
pub struct TieredPlayer<'a> {
    pub ranked: RankedPlayer<'a>,
    pub tier: Tier,
}

/// A tiered player with its provisional market price
#[derive(Debug, Clone)]
pub struct PricedPlayer<'a> {
    pub tiered: TieredPlayer<'a>,
    pub factors: PriceFactors,

    /// Lowest price the tier policy allows
    pub floor_price: f64,

    /// Curve used, `None` for defenses and curve fallbacks
    pub curve: Option<CurveVariant>,
}

impl PricedPlayer<'_> {
    pub fn candidate(&self) -> &PlayerCandidate {
        self.tiered.ranked.candidate
    }

    pub fn position(&self) -> Position {
        self.tiered.ranked.candidate.position
    }

    pub fn weighted_rank(&self) -> f64 {
        self.tiered.ranked.weighted_rank
    }
}

/// Final per-player engine output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerValuation {
    pub player_id: PlayerId,
    pub name: Option<String>,
    pub position: Position,
    pub age: u32,
    pub tier: Tier,
    pub weighted_rank: f64,
    pub position_rank: u32,
    pub curve: Option<CurveVariant>,
    pub floor_price: f64,

    /// Inside the projected rostered set
    pub in_slot: bool,

    pub factors: PriceFactors,
    pub contracts: Vec<ContractOption>,
}

impl PlayerValuation {
    /// The recommended contract, if any
    pub fn recommended_contract(&self) -> Option<&ContractOption> {
        self.contracts.iter().find(|c| c.recommended)
    }
}

/// Result of one pricing run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRun {
    pub envelope: CapEnvelope,
    pub allocation: AllocationOutcome,

    /// Curve variant chosen for each position, `None` when the position has no curve
    pub curve_selection: PositionTable<Option<CurveVariant>>,

    pub valuations: BTreeMap<PlayerId, PlayerValuation>,
}

impl PricingRun {
    /// Valuations ordered by final price, most expensive first
    pub fn ranked_by_price(&self) -> Vec<&PlayerValuation> {
        let mut valuations: Vec<&PlayerValuation> = self.valuations.values().collect();
        valuations.sort_by(|a, b| {
            b.factors
                .final_price
                .total_cmp(&a.factors.final_price)
                .then_with(|| a.weighted_rank.total_cmp(&b.weighted_rank))
        });
        valuations
    }
}

/// Fully materialized inputs for a pricing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingInput {
    pub players: Vec<PlayerCandidate>,
    pub curves: CurveSnapshot,

    #[serde(default)]
    pub teams: Vec<TeamCapSituation>,
}

impl PricingInput {
    pub fn from_json_str(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
