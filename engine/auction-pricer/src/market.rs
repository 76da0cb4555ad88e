//! Market adjustments applied on top of intrinsic value

use crate::config::{AgeDiscountPoint, LeagueConfig, MarketConfig};
use crate::models::RankedPlayer;
use crate::positions::Position;

/// Price after market adjustment, with the multipliers that produced it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketPrice {
    pub price: f64,
    pub age_multiplier: f64,
    pub scarcity_multiplier: f64,
}

/// Age, scarcity, inflation and positional adjustments
#[derive(Debug, Clone, Copy)]
pub struct MarketAdjuster<'a> {
    market: &'a MarketConfig,
    league: &'a LeagueConfig,
}

impl<'a> MarketAdjuster<'a> {
    pub fn new(market: &'a MarketConfig, league: &'a LeagueConfig) -> Self {
        Self { market, league }
    }

    /// Adjust an intrinsic price.
    ///
    /// `wr_depth` is the number of WRs inside the top of the overall rankings.
    /// Defenses only get their positional premium, rounding and the league minimum.
    pub fn adjust(
        &self,
        player: &RankedPlayer<'_>,
        intrinsic: f64,
        scarcity_multiplier: f64,
        wr_depth: usize,
    ) -> MarketPrice {
        let position = player.candidate.position;

        if position == Position::DEF {
            let price = intrinsic * (1.0 + self.market.position_premium.get(position));
            return MarketPrice {
                price: self.round_price(price).max(self.league.league_minimum),
                age_multiplier: 1.0,
                scarcity_multiplier: 1.0,
            };
        }

        let age_multiplier = self.age_multiplier(position, player.candidate.age);

        let mut price = intrinsic * age_multiplier * scarcity_multiplier;
        price *= 1.0 + self.market.inflation;
        price *= 1.0 + self.market.position_premium.get(position);
        if position == Position::WR {
            price *= 1.0 + self.wr_depth_premium(wr_depth);
        }

        price = self.round_price(price);

        if !player.unranked && player.weighted_rank <= self.league.rank_floor_cutoff {
            price = price.max(self.league.rank_floor_price);
        }

        MarketPrice {
            price: price.max(self.league.league_minimum),
            age_multiplier,
            scarcity_multiplier,
        }
    }

    /// `1 − discount(effective age) + youth premium(age)`
    pub fn age_multiplier(&self, position: Position, age: u32) -> f64 {
        let effective_age = age as f64 + *self.market.age_offsets.get(position) as f64;
        let discount = age_discount(&self.market.age_curve, effective_age);
        (1.0 - discount + self.youth_premium(age)).max(0.0)
    }

    /// Sliding bonus for young players
    pub fn youth_premium(&self, age: u32) -> f64 {
        let full = self.market.youth_premium_full_age;
        let end = self.market.youth_premium_end_age;
        if age >= end {
            0.0
        } else if age <= full {
            self.market.youth_premium_max
        } else {
            self.market.youth_premium_max * (end - age) as f64 / (end - full) as f64
        }
    }

    /// Extra WR premium when the top of the rankings is WR-heavy
    pub fn wr_depth_premium(&self, wr_depth: usize) -> f64 {
        wr_depth.saturating_sub(self.market.wr_depth_threshold) as f64 * self.market.wr_depth_step
    }

    /// Nearest $25k below the breakpoint, nearest $50k above
    pub fn round_price(&self, price: f64) -> f64 {
        let increment = self.increment(price);
        (price / increment).round() * increment
    }

    /// Same increments as [`round_price`](Self::round_price), always rounding down
    pub fn round_down(&self, price: f64) -> f64 {
        let increment = self.increment(price);
        (price / increment).floor() * increment
    }

    fn increment(&self, price: f64) -> f64 {
        if price < self.market.rounding_breakpoint {
            self.market.small_increment
        } else {
            self.market.large_increment
        }
    }
}

/// Discount at an age, linearly interpolated and clamped to the curve's range
fn age_discount(curve: &[AgeDiscountPoint], age: f64) -> f64 {
    let (first, last) = match (curve.first(), curve.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return 0.0,
    };

    if age <= first.age as f64 {
        return first.discount;
    }
    if age >= last.age as f64 {
        return last.discount;
    }

    for window in curve.windows(2) {
        let (lo, hi) = (&window[0], &window[1]);
        if age <= hi.age as f64 {
            let t = (age - lo.age as f64) / (hi.age - lo.age) as f64;
            return lo.discount + t * (hi.discount - lo.discount);
        }
    }
    last.discount
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayerCandidate;

    fn ranked(candidate: &PlayerCandidate, rank: f64) -> RankedPlayer<'_> {
        RankedPlayer {
            candidate,
            weighted_rank: rank,
            unranked: false,
            position_rank: 1,
            top_scorer: false,
        }
    }

    fn adjuster_with<'a>(market: &'a MarketConfig, league: &'a LeagueConfig) -> MarketAdjuster<'a> {
        MarketAdjuster::new(market, league)
    }

    #[test]
    fn test_age_discount_interpolates_and_clamps() {
        let market = MarketConfig::default();
        let curve = &market.age_curve;

        assert_eq!(age_discount(curve, 18.0), 0.0);
        assert!((age_discount(curve, 29.0) - 0.10).abs() < 1e-9);
        assert!((age_discount(curve, 29.5) - 0.125).abs() < 1e-9);
        assert_eq!(age_discount(curve, 45.0), 0.55);
    }

    #[test]
    fn test_age_offsets_by_position() {
        let (market, league) = (MarketConfig::default(), LeagueConfig::default());
        let adjuster = adjuster_with(&market, &league);

        // QB at 32 ages like a 27-year-old
        assert!((adjuster.age_multiplier(Position::QB, 32) - 0.97).abs() < 1e-9);
        // RB at 27 ages like a 29-year-old, no youth premium at 27
        assert!((adjuster.age_multiplier(Position::RB, 27) - 0.90).abs() < 1e-9);
        // young WR gets the full premium
        assert!((adjuster.age_multiplier(Position::WR, 21) - 1.08).abs() < 1e-9);
    }

    #[test]
    fn test_youth_premium_slides_to_zero() {
        let (market, league) = (MarketConfig::default(), LeagueConfig::default());
        let adjuster = adjuster_with(&market, &league);

        assert_eq!(adjuster.youth_premium(20), 0.08);
        assert!((adjuster.youth_premium(24) - 0.04).abs() < 1e-9);
        assert_eq!(adjuster.youth_premium(27), 0.0);
        assert_eq!(adjuster.youth_premium(33), 0.0);
    }

    #[test]
    fn test_rounding_increments() {
        let (market, league) = (MarketConfig::default(), LeagueConfig::default());
        let adjuster = adjuster_with(&market, &league);

        assert_eq!(adjuster.round_price(1_212_000.0), 1_200_000.0);
        assert_eq!(adjuster.round_price(1_213_000.0), 1_225_000.0);
        assert_eq!(adjuster.round_price(2_430_000.0), 2_450_000.0);
        assert_eq!(adjuster.round_price(2_420_000.0), 2_400_000.0);
    }

    #[test]
    fn test_round_down_never_raises() {
        let (market, league) = (MarketConfig::default(), LeagueConfig::default());
        let adjuster = adjuster_with(&market, &league);

        assert_eq!(adjuster.round_down(1_224_999.0), 1_200_000.0);
        assert_eq!(adjuster.round_down(1_225_000.0), 1_225_000.0);
        assert_eq!(adjuster.round_down(2_449_000.0), 2_400_000.0);
        assert_eq!(adjuster.round_down(1_999_999.0), 1_975_000.0);
    }

    #[test]
    fn test_wr_depth_premium() {
        let (market, league) = (MarketConfig::default(), LeagueConfig::default());
        let adjuster = adjuster_with(&market, &league);

        assert_eq!(adjuster.wr_depth_premium(10), 0.0);
        assert_eq!(adjuster.wr_depth_premium(12), 0.0);
        assert!((adjuster.wr_depth_premium(15) - 0.03).abs() < 1e-12);
    }

    #[test]
    fn test_full_adjustment_order() {
        let (market, league) = (MarketConfig::default(), LeagueConfig::default());
        let adjuster = adjuster_with(&market, &league);
        let qb = PlayerCandidate::new("qb", Position::QB, 30);

        // age 25 effective: no discount, no premium; +10% QB premium
        let adjusted = adjuster.adjust(&ranked(&qb, 40.0), 5_000_000.0, 1.1, 0);
        assert_eq!(adjusted.age_multiplier, 1.0);
        assert_eq!(adjusted.scarcity_multiplier, 1.1);
        assert_eq!(adjusted.price, 6_050_000.0);
    }

    #[test]
    fn test_rank_floor_and_league_minimum() {
        let (market, league) = (MarketConfig::default(), LeagueConfig::default());
        let adjuster = adjuster_with(&market, &league);
        let pk = PlayerCandidate::new("pk", Position::PK, 30);

        let inside = adjuster.adjust(&ranked(&pk, 250.0), 425_000.0, 1.0, 0);
        assert_eq!(inside.price, 750_000.0);

        let outside = adjuster.adjust(&ranked(&pk, 320.0), 425_000.0, 1.0, 0);
        assert_eq!(outside.price, 425_000.0);

        let unranked = RankedPlayer { unranked: true, ..ranked(&pk, 999.0) };
        assert_eq!(adjuster.adjust(&unranked, 300_000.0, 0.9, 0).price, 425_000.0);
    }

    #[test]
    fn test_defense_gets_positional_premium_only() {
        let (market, league) = (MarketConfig::default(), LeagueConfig::default());
        let adjuster = adjuster_with(&market, &league);
        let def = PlayerCandidate::new("def", Position::DEF, 0);

        // -10% DEF premium, no age, scarcity or WR depth: 911,110.5 rounds to 900k
        let adjusted = adjuster.adjust(&ranked(&def, 999.0), 1_012_345.0, 1.3, 20);
        assert_eq!(adjusted.price, 900_000.0);
        assert_eq!(adjusted.age_multiplier, 1.0);
        assert_eq!(adjusted.scarcity_multiplier, 1.0);
    }
}
