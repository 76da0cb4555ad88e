//! Intrinsic value
//!
//! Prices a player purely from the historical curves and their rank, then applies
//! the tier floor policy. Market conditions are layered on afterwards.

use crate::config::{CurveModelConfig, DefenseConfig, PricingConfig, TierPolicy};
use crate::curves::{CurveStore, CurveVariant, PositionCurve};
use crate::models::TieredPlayer;
use crate::positions::Position;
use crate::tiers::Tier;
use tracing::debug;

/// Curve variant for a position given the tier of its best-ranked player.
///
/// A strong top of the position pulls every price at it upward. WR elite pricing
/// runs on the avg curve; at star level only QB and TE keep the max curve.
pub fn select_curve(position: Position, leader_tier: Option<Tier>) -> CurveVariant {
    match leader_tier {
        Some(Tier::Elite) if position == Position::WR => CurveVariant::Avg,
        Some(Tier::Elite) => CurveVariant::Max,
        Some(Tier::Star) if matches!(position, Position::QB | Position::TE) => CurveVariant::Max,
        Some(Tier::Star) => CurveVariant::Avg,
        _ => CurveVariant::Min,
    }
}

/// Intrinsic price and the floor it was held to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntrinsicValue {
    pub price: f64,
    pub floor_price: f64,

    /// `None` for defenses and positions without curve data
    pub curve: Option<CurveVariant>,

    /// Curve evidence behind the price, for confidence scoring
    pub sample_count: Option<u32>,
}

/// Curve-based valuation for one run
#[derive(Debug, Clone, Copy)]
pub struct IntrinsicCalculator<'a> {
    store: &'a CurveStore,
    curves: &'a CurveModelConfig,
    tiers: &'a TierPolicy,
    defense: &'a DefenseConfig,
    league_minimum: f64,
}

impl<'a> IntrinsicCalculator<'a> {
    pub fn new(store: &'a CurveStore, config: &'a PricingConfig) -> Self {
        Self {
            store,
            curves: &config.curves,
            tiers: &config.tiers,
            defense: &config.defense,
            league_minimum: config.league.league_minimum,
        }
    }

    /// Value a player. `defense_pool` is the number of defenses in the run.
    pub fn value(
        &self,
        player: &TieredPlayer<'_>,
        variant: CurveVariant,
        defense_pool: usize,
    ) -> IntrinsicValue {
        let ranked = &player.ranked;
        let position = ranked.candidate.position;

        if position == Position::DEF {
            let price = self.defense_price(ranked.position_rank, defense_pool);
            return IntrinsicValue {
                price,
                floor_price: self.defense.min_price.max(self.league_minimum),
                curve: None,
                sample_count: None,
            };
        }

        let (raw, curve, sample_count) = match self.store.curve(position) {
            Some(curve) => (
                self.curve_price(curve, variant, position, ranked.weighted_rank),
                Some(variant),
                curve.sample_count(),
            ),
            None => {
                debug!(
                    "No {} curve, using linear fallback for {} (position rank {})",
                    position,
                    ranked.candidate.id,
                    ranked.position_rank
                );
                (self.fallback_price(ranked.position_rank), None, None)
            }
        };

        let multiplier = self.tiers.rule(position, player.tier).multiplier;
        let floor_price = self.tier_floor(position, player.tier);

        IntrinsicValue {
            price: (raw * multiplier).max(floor_price),
            floor_price,
            curve,
            sample_count,
        }
    }

    /// Largest of the tier's absolute floor, its share of the historical minimum
    /// salary, and the league minimum
    pub fn tier_floor(&self, position: Position, tier: Tier) -> f64 {
        let rule = self.tiers.rule(position, tier);
        let historical = self
            .store
            .historical_min_salary(position)
            .map(|min| min * rule.historical_floor_pct)
            .unwrap_or(0.0);

        rule.absolute_floor.max(historical).max(self.league_minimum)
    }

    /// Hold a price to the tier floor
    pub fn apply_tier_floor(&self, price: f64, position: Position, tier: Tier) -> f64 {
        price.max(self.tier_floor(position, tier))
    }

    /// Decayed price on a curve, blending max and avg at the top of RB and WR.
    ///
    /// Past the blend window RB and WR prices are capped at the price the blend
    /// ends on, so a worse rank never prices above a better one.
    pub fn curve_price(
        &self,
        curve: &PositionCurve,
        variant: CurveVariant,
        position: Position,
        rank: f64,
    ) -> f64 {
        let steps = self.effective_steps(position, rank);
        let price_on = |v: CurveVariant| curve.variant(v).price_at(1.0 + steps, 1.0);

        let window = self.curves.blend_window;
        if !matches!(position, Position::RB | Position::WR) || window <= 1.0 {
            return price_on(variant);
        }

        if rank <= window {
            let weight = (self.curves.blend_max_weight * (window - rank) / (window - 1.0))
                .clamp(0.0, self.curves.blend_max_weight);
            return weight * price_on(CurveVariant::Max)
                + (1.0 - weight) * price_on(CurveVariant::Avg);
        }

        let blend_end = curve
            .variant(CurveVariant::Avg)
            .price_at(1.0 + self.effective_steps(position, window), 1.0);
        price_on(variant).min(blend_end)
    }

    /// Rank steps scaled by the position's decay adjustment.
    ///
    /// QB decay is dampened everywhere. Elsewhere the first steps up to the
    /// amplification cutoff decay faster and later steps decay at the nominal
    /// rate, which keeps price non-increasing across the cutoff.
    fn effective_steps(&self, position: Position, rank: f64) -> f64 {
        let steps = (rank - 1.0).max(0.0);
        if position == Position::QB {
            return steps * self.curves.qb_decay_dampening;
        }

        let amplified_span = (self.curves.amplification_max_rank - 1.0).max(0.0);
        let amplified = steps.min(amplified_span);
        let nominal = (steps - amplified_span).max(0.0);
        amplified * self.curves.decay_amplification + nominal
    }

    /// Linear price used when a position has no reference curve
    pub fn fallback_price(&self, position_rank: u32) -> f64 {
        let steps = position_rank.saturating_sub(1) as f64;
        (self.curves.fallback_top_price - self.curves.fallback_step * steps)
            .max(self.league_minimum)
    }

    /// Exponential decay from the defense max to min across the defense pool
    pub fn defense_price(&self, position_rank: u32, pool_size: usize) -> f64 {
        let max = self.defense.max_price;
        let min = self.defense.min_price;
        let decay = match self.defense.decay_rate {
            Some(rate) => -rate.abs(),
            None => -(max / min).ln() / pool_size.saturating_sub(1).max(1) as f64,
        };

        let steps = position_rank.saturating_sub(1) as f64;
        (max * (decay * steps).exp()).clamp(min, max).max(self.league_minimum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::models::{PlayerCandidate, RankedPlayer};

    fn tiered(
        candidate: &PlayerCandidate,
        rank: f64,
        position_rank: u32,
        tier: Tier,
    ) -> TieredPlayer<'_> {
        TieredPlayer {
            ranked: RankedPlayer {
                candidate,
                weighted_rank: rank,
                unranked: false,
                position_rank,
                top_scorer: false,
            },
            tier,
        }
    }

    #[test]
    fn test_curve_selection_rules() {
        assert_eq!(select_curve(Position::WR, Some(Tier::Elite)), CurveVariant::Avg);
        assert_eq!(select_curve(Position::RB, Some(Tier::Elite)), CurveVariant::Max);
        assert_eq!(select_curve(Position::QB, Some(Tier::Star)), CurveVariant::Max);
        assert_eq!(select_curve(Position::TE, Some(Tier::Star)), CurveVariant::Max);
        assert_eq!(select_curve(Position::RB, Some(Tier::Star)), CurveVariant::Avg);
        assert_eq!(select_curve(Position::WR, Some(Tier::Starter)), CurveVariant::Min);
        assert_eq!(select_curve(Position::TE, None), CurveVariant::Min);
    }

    #[test]
    fn test_rank_one_blend_is_half_max_half_avg() {
        let store = fixtures::curve_store();
        let config = PricingConfig::default();
        let calc = IntrinsicCalculator::new(&store, &config);
        let curve = store.curve(Position::WR).unwrap();

        let price = calc.curve_price(curve, CurveVariant::Min, Position::WR, 1.0);
        let expected = 0.5 * curve.max.base_price + 0.5 * curve.avg.base_price;
        assert!((price - expected).abs() < 1e-6);

        // end of the window is pure avg
        let price = calc.curve_price(curve, CurveVariant::Min, Position::WR, 15.0);
        let avg = curve.avg.price_at(1.0 + 14.0 * 1.6, 1.0);
        assert!((price - avg).abs() < 1e-6);
    }

    #[test]
    fn test_max_curve_capped_past_blend_window() {
        let store = fixtures::curve_store();
        let config = PricingConfig::default();
        let calc = IntrinsicCalculator::new(&store, &config);
        let curve = store.curve(Position::RB).unwrap();

        let edge = calc.curve_price(curve, CurveVariant::Max, Position::RB, 15.0);
        let past = calc.curve_price(curve, CurveVariant::Max, Position::RB, 16.0);
        assert!(past <= edge);
        assert!((past - edge).abs() < 1e-6);

        // once the max curve decays under the cap it takes over again
        let deep = calc.curve_price(curve, CurveVariant::Max, Position::RB, 40.0);
        let max_only = curve.max.price_at(1.0 + 39.0 * 1.6, 1.0);
        assert!((deep - max_only).abs() < 1e-6);

        // positions without the blend keep the selected variant
        let te = store.curve(Position::TE).unwrap();
        let te_price = calc.curve_price(te, CurveVariant::Max, Position::TE, 16.0);
        assert!((te_price - te.max.price_at(1.0 + 15.0 * 1.6, 1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_qb_decay_dampened() {
        let store = fixtures::curve_store();
        let config = PricingConfig::default();
        let calc = IntrinsicCalculator::new(&store, &config);
        let curve = store.curve(Position::QB).unwrap();

        let price = calc.curve_price(curve, CurveVariant::Avg, Position::QB, 101.0);
        let expected = curve.avg.base_price * (curve.avg.decay_rate * 100.0 * 0.04).exp();
        assert!((price - expected).abs() < 1e-6);
    }

    #[test]
    fn test_curve_price_continuous_across_amplification_cutoff() {
        let store = fixtures::curve_store();
        let config = PricingConfig::default();
        let calc = IntrinsicCalculator::new(&store, &config);
        let curve = store.curve(Position::TE).unwrap();

        let at_cutoff = calc.curve_price(curve, CurveVariant::Avg, Position::TE, 100.0);
        let past_cutoff = calc.curve_price(curve, CurveVariant::Avg, Position::TE, 101.0);
        assert!(past_cutoff <= at_cutoff);
    }

    #[test]
    fn test_tier_floor_and_multiplier() {
        let store = fixtures::curve_store();
        let config = PricingConfig::default();
        let calc = IntrinsicCalculator::new(&store, &config);

        let qb = PlayerCandidate::new("qb", Position::QB, 28);
        let value = calc.value(&tiered(&qb, 1.0, 1, Tier::Elite), CurveVariant::Max, 0);
        let base = store.curve(Position::QB).unwrap().max.base_price;
        assert!((value.price - base * 1.25).abs() < 1e-6);

        // deep unranked player lands on the floor
        let te = PlayerCandidate::new("te", Position::TE, 28);
        let value = calc.value(&tiered(&te, 999.0, 60, Tier::Depth), CurveVariant::Min, 0);
        assert_eq!(value.price, 425_000.0);
        assert_eq!(value.floor_price, 425_000.0);

        let value = calc.value(&tiered(&te, 999.0, 60, Tier::Starter), CurveVariant::Min, 0);
        assert_eq!(value.price, 750_000.0);
    }

    #[test]
    fn test_historical_floor_percentage() {
        let store =
            fixtures::curve_store().with_salary_range(Position::QB, 8_000_000.0, 40_000_000.0);
        let config = PricingConfig::default();
        let calc = IntrinsicCalculator::new(&store, &config);

        // 50% of the QB historical minimum beats the $3M elite floor
        assert_eq!(calc.tier_floor(Position::QB, Tier::Elite), 4_000_000.0);
        assert_eq!(calc.tier_floor(Position::QB, Tier::Star), 2_000_000.0);
        assert_eq!(calc.tier_floor(Position::QB, Tier::Starter), 750_000.0);
    }

    #[test]
    fn test_missing_curve_uses_linear_fallback() {
        let store = CurveStore::empty();
        let config = PricingConfig::default();
        let calc = IntrinsicCalculator::new(&store, &config);

        assert_eq!(calc.fallback_price(1), 1_000_000.0);
        assert_eq!(calc.fallback_price(5), 900_000.0);
        assert_eq!(calc.fallback_price(400), 425_000.0);

        let rb = PlayerCandidate::new("rb", Position::RB, 24);
        let value = calc.value(&tiered(&rb, 150.0, 3, Tier::Starter), CurveVariant::Avg, 0);
        assert_eq!(value.price, 950_000.0);
        assert_eq!(value.curve, None);
    }

    #[test]
    fn test_defense_band() {
        let store = CurveStore::empty();
        let config = PricingConfig::default();
        let calc = IntrinsicCalculator::new(&store, &config);

        assert_eq!(calc.defense_price(1, 32), 1_500_000.0);
        assert!((calc.defense_price(32, 32) - 750_000.0).abs() < 1e-6);
        let mid = calc.defense_price(16, 32);
        assert!(mid > 750_000.0 && mid < 1_500_000.0);
        // single defense and ranks past the pool stay inside the band
        assert_eq!(calc.defense_price(1, 1), 1_500_000.0);
        assert_eq!(calc.defense_price(80, 32), 750_000.0);
    }

    #[test]
    fn test_defense_explicit_decay() {
        let store = CurveStore::empty();
        let mut config = PricingConfig::default();
        config.defense.decay_rate = Some(0.1);
        let calc = IntrinsicCalculator::new(&store, &config);

        let expected = 1_500_000.0 * (-0.1f64).exp();
        assert!((calc.defense_price(2, 32) - expected).abs() < 1e-6);
    }
}
