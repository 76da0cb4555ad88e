use crate::error::{PricingError, Result};
use crate::positions::{Position, PositionTable};
use crate::tiers::{Tier, TierTable};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Prefix for environment overrides, e.g. `AUCTION_PRICER_ALLOCATION__TARGET_SPEND_FRACTION`
pub const ENV_PREFIX: &str = "AUCTION_PRICER";

/// Configuration for a pricing run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Rank blending and replacement level
    pub ranking: RankingConfig,

    /// League-wide salary rules
    pub league: LeagueConfig,

    /// Tier thresholds, floors and multipliers
    pub tiers: TierPolicy,

    /// Curve decay and blend tuning
    pub curves: CurveModelConfig,

    /// Market adjustment parameters
    pub market: MarketConfig,

    /// Defense pricing band
    pub defense: DefenseConfig,

    /// Budget reconciliation parameters
    pub allocation: AllocationConfig,

    /// Contract schedule parameters
    pub contracts: ContractConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Weight of the dynasty rank in 0..=100; the redraft rank gets the rest
    pub dynasty_weight: f64,

    /// Rank assigned to players with no ranking data
    pub replacement_rank: f64,

    /// Players within this many of the top scorers count as proven producers
    pub flyer_points_cutoff: usize,

    /// Worst overall rank eligible for a flyer promotion
    pub flyer_rank_cutoff: f64,

    /// Oldest age that qualifies for a flyer promotion without points
    pub flyer_max_age: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueConfig {
    /// League minimum salary in dollars
    pub league_minimum: f64,

    /// Premium of a one-year ask over the three-year equilibrium price (0.20 = +20%)
    pub one_year_premium: f64,

    /// Per-year raise applied inside multi-year schedules
    pub salary_escalation: f64,

    /// Players ranked at or better than this overall never fall below `rank_floor_price`
    pub rank_floor_cutoff: f64,

    /// Floor for players inside `rank_floor_cutoff`
    pub rank_floor_price: f64,
}

/// Floor policy for one tier at one position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierRule {
    /// Dollar floor
    pub absolute_floor: f64,

    /// Fraction of the position's historical minimum salary used as a floor
    pub historical_floor_pct: f64,

    /// Multiplier applied to the curve price before flooring
    pub multiplier: f64,
}

impl TierRule {
    fn new(absolute_floor: f64) -> Self {
        Self { absolute_floor, historical_floor_pct: 0.0, multiplier: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub elite_max_rank: f64,
    pub star_max_rank: f64,
    pub starter_max_rank: f64,

    /// Position-rank-1 players at or better than this overall rank are elite
    pub position_leader_max_rank: f64,

    /// Kicker thresholds, applied to position rank
    pub kicker_elite_max: u32,
    pub kicker_star_max: u32,
    pub kicker_starter_max: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierPolicy {
    pub thresholds: TierThresholds,

    /// Floor rules per position and tier
    pub rules: PositionTable<TierTable<TierRule>>,
}

impl TierPolicy {
    pub fn rule(&self, position: Position, tier: Tier) -> &TierRule {
        self.rules.get(position).get(tier)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveModelConfig {
    /// QB decay is multiplied by this (0.04 = 4% of nominal)
    pub qb_decay_dampening: f64,

    /// Decay multiplier for non-QB players inside `amplification_max_rank`
    pub decay_amplification: f64,
    pub amplification_max_rank: f64,

    /// RB/WR players ranked inside this window blend the max and avg curves
    pub blend_window: f64,

    /// Weight of the max curve at rank 1
    pub blend_max_weight: f64,

    /// Linear fallback when a position has no curve data
    pub fallback_top_price: f64,
    pub fallback_step: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeDiscountPoint {
    pub age: u32,
    pub discount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Discount by effective age, ascending by age
    pub age_curve: Vec<AgeDiscountPoint>,

    /// Years added to a player's age before the discount lookup
    pub age_offsets: PositionTable<i32>,

    /// Youth premium slides from `youth_premium_max` at `youth_premium_full_age`
    /// down to zero at `youth_premium_end_age`
    pub youth_premium_max: f64,
    pub youth_premium_full_age: u32,
    pub youth_premium_end_age: u32,

    /// League-wide inflation (0.05 = +5%)
    pub inflation: f64,

    /// Flat per-position adjustment (0.10 = +10%)
    pub position_premium: PositionTable<f64>,

    /// WR count inside `wr_depth_rank_cutoff` above which the WR depth premium kicks in
    pub wr_depth_threshold: usize,
    pub wr_depth_step: f64,
    pub wr_depth_rank_cutoff: f64,

    /// Prices below the breakpoint round to `small_increment`, the rest to `large_increment`
    pub rounding_breakpoint: f64,
    pub small_increment: f64,
    pub large_increment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenseConfig {
    pub max_price: f64,
    pub min_price: f64,

    /// Explicit decay rate; derived from the pool size when absent
    pub decay_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationConfig {
    /// Share of league discretionary cap expected to be spent
    pub target_spend_fraction: f64,

    /// Active roster size each team is expected to fill
    pub target_active_roster: usize,

    /// Cap on upper-bound doublings before bisection
    pub max_doublings: u32,

    /// Bisection iterations for the scale solve
    pub bisection_iterations: u32,

    /// Keep defenses out of the scale solve
    pub exclude_defense: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Two-year premium over the three-year base
    pub two_year_premium: f64,

    pub four_year_base_discount: f64,
    pub four_year_risk_slope: f64,
    pub five_year_base_discount: f64,
    pub five_year_risk_slope: f64,

    /// Ceiling for any long-deal discount
    pub max_discount: f64,

    /// Share of a one-year ask above the position cap that is kept
    pub cap_overage_retention: f64,

    /// Minimum base price for the longest recommendations
    pub long_deal_min_value: f64,

    /// Position caps; when absent the historical maximum salary is used
    pub position_caps: PositionTable<Option<f64>>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            ranking: RankingConfig::default(),
            league: LeagueConfig::default(),
            tiers: TierPolicy::default(),
            curves: CurveModelConfig::default(),
            market: MarketConfig::default(),
            defense: DefenseConfig::default(),
            allocation: AllocationConfig::default(),
            contracts: ContractConfig::default(),
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            dynasty_weight: 50.0,
            replacement_rank: 999.0,
            flyer_points_cutoff: 300,
            flyer_rank_cutoff: 300.0,
            flyer_max_age: 27,
        }
    }
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            league_minimum: 425_000.0,
            one_year_premium: 0.20,
            salary_escalation: 0.0,
            rank_floor_cutoff: 300.0,
            rank_floor_price: 750_000.0,
        }
    }
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            elite_max_rank: 30.0,
            star_max_rank: 105.0,
            starter_max_rank: 199.0,
            position_leader_max_rank: 50.0,
            kicker_elite_max: 310,
            kicker_star_max: 500,
            kicker_starter_max: 700,
        }
    }
}

impl Default for TierPolicy {
    fn default() -> Self {
        let skill = TierTable {
            elite: TierRule::new(3_000_000.0),
            star: TierRule::new(1_500_000.0),
            starter: TierRule::new(750_000.0),
            flyer: TierRule::new(500_000.0),
            depth: TierRule::new(425_000.0),
        };

        let mut qb = skill.clone();
        qb.elite.multiplier = 1.25;
        qb.elite.historical_floor_pct = 0.50;
        qb.star.multiplier = 1.20;
        qb.star.historical_floor_pct = 0.25;
        qb.starter.multiplier = 1.15;

        let pk = TierTable {
            elite: TierRule::new(600_000.0),
            star: TierRule::new(500_000.0),
            starter: TierRule::new(450_000.0),
            flyer: TierRule::new(425_000.0),
            depth: TierRule::new(425_000.0),
        };

        let def = TierTable {
            elite: TierRule::new(750_000.0),
            star: TierRule::new(750_000.0),
            starter: TierRule::new(750_000.0),
            flyer: TierRule::new(750_000.0),
            depth: TierRule::new(750_000.0),
        };

        Self {
            thresholds: TierThresholds::default(),
            rules: PositionTable { qb, rb: skill.clone(), wr: skill.clone(), te: skill, pk, def },
        }
    }
}

impl Default for CurveModelConfig {
    fn default() -> Self {
        Self {
            qb_decay_dampening: 0.04,
            decay_amplification: 1.6,
            amplification_max_rank: 100.0,
            blend_window: 15.0,
            blend_max_weight: 0.5,
            fallback_top_price: 1_000_000.0,
            fallback_step: 25_000.0,
        }
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        let age_curve = [
            (21, 0.0),
            (25, 0.0),
            (26, 0.01),
            (27, 0.03),
            (28, 0.06),
            (29, 0.10),
            (30, 0.15),
            (31, 0.21),
            (32, 0.28),
            (33, 0.35),
            (34, 0.42),
            (35, 0.48),
            (36, 0.55),
        ]
        .into_iter()
        .map(|(age, discount)| AgeDiscountPoint { age, discount })
        .collect();

        Self {
            age_curve,
            age_offsets: PositionTable { qb: -5, rb: 2, wr: 0, te: 0, pk: 0, def: 0 },
            youth_premium_max: 0.08,
            youth_premium_full_age: 21,
            youth_premium_end_age: 27,
            inflation: 0.0,
            position_premium: PositionTable {
                qb: 0.10,
                rb: 0.0,
                wr: 0.0,
                te: 0.0,
                pk: -0.10,
                def: -0.10,
            },
            wr_depth_threshold: 12,
            wr_depth_step: 0.01,
            wr_depth_rank_cutoff: 100.0,
            rounding_breakpoint: 2_000_000.0,
            small_increment: 25_000.0,
            large_increment: 50_000.0,
        }
    }
}

impl Default for DefenseConfig {
    fn default() -> Self {
        Self { max_price: 1_500_000.0, min_price: 750_000.0, decay_rate: None }
    }
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            target_spend_fraction: 0.85,
            target_active_roster: 22,
            max_doublings: 20,
            bisection_iterations: 30,
            exclude_defense: true,
        }
    }
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            two_year_premium: 0.10,
            four_year_base_discount: 0.10,
            four_year_risk_slope: 0.30,
            five_year_base_discount: 0.20,
            five_year_risk_slope: 0.50,
            max_discount: 0.60,
            cap_overage_retention: 0.40,
            long_deal_min_value: 2_000_000.0,
            position_caps: PositionTable::default(),
        }
    }
}

impl PricingConfig {
    /// Layer defaults, an optional config file, then `AUCTION_PRICER_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            debug!("Loading pricing configuration from: {:?}", path);
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Override the dynasty weight, keeping it in range
    pub fn with_dynasty_weight(mut self, weight: f64) -> Result<Self> {
        self.ranking.dynasty_weight = weight;
        self.validate()?;
        Ok(self)
    }

    /// Check ranges that the pricing math relies on
    pub fn validate(&self) -> Result<()> {
        let weight = self.ranking.dynasty_weight;
        if !(0.0..=100.0).contains(&weight) {
            return Err(PricingError::config(format!(
                "dynasty_weight must be within 0..=100, got {weight}"
            )));
        }

        if self.league.league_minimum <= 0.0 {
            return Err(PricingError::config("league_minimum must be positive"));
        }

        if self.league.one_year_premium < 0.0 {
            return Err(PricingError::config("one_year_premium cannot be negative"));
        }

        let fraction = self.allocation.target_spend_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(PricingError::config(format!(
                "target_spend_fraction must be within (0, 1], got {fraction}"
            )));
        }

        if self.allocation.bisection_iterations == 0 {
            return Err(PricingError::config("bisection_iterations must be at least 1"));
        }

        if self.defense.min_price <= 0.0 || self.defense.min_price > self.defense.max_price {
            return Err(PricingError::config("defense price band must satisfy 0 < min <= max"));
        }

        if self.market.age_curve.is_empty() {
            return Err(PricingError::config("age_curve needs at least one point"));
        }

        if self.market.age_curve.windows(2).any(|w| w[0].age >= w[1].age) {
            return Err(PricingError::config("age_curve must be strictly ascending by age"));
        }

        if !(0.0..=1.0).contains(&self.curves.blend_max_weight) {
            return Err(PricingError::config("blend_max_weight must be within 0..=1"));
        }

        if !(0.0..=1.0).contains(&self.contracts.cap_overage_retention) {
            return Err(PricingError::config("cap_overage_retention must be within 0..=1"));
        }

        Ok(())
    }
}
