//! Tier classification
//!
//! Tiers drive floor and multiplier policy. Special cases are evaluated before the
//! generic overall-rank thresholds: kickers first, then position leaders, then the
//! base mapping, and finally the flyer promotion for players who land in depth.

use crate::config::TierThresholds;
use crate::positions::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value tier, declared from least to most valuable so that `Ord` follows value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Depth,
    Flyer,
    Starter,
    Star,
    Elite,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Elite => "elite",
            Tier::Star => "star",
            Tier::Starter => "starter",
            Tier::Flyer => "flyer",
            Tier::Depth => "depth",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One value per tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierTable<T> {
    pub elite: T,
    pub star: T,
    pub starter: T,
    pub flyer: T,
    pub depth: T,
}

impl<T> TierTable<T> {
    pub fn get(&self, tier: Tier) -> &T {
        match tier {
            Tier::Elite => &self.elite,
            Tier::Star => &self.star,
            Tier::Starter => &self.starter,
            Tier::Flyer => &self.flyer,
            Tier::Depth => &self.depth,
        }
    }
}

/// Everything the classifier needs to know about one player
#[derive(Debug, Clone, Copy)]
pub struct TierInput {
    pub overall_rank: f64,
    pub position: Position,
    pub position_rank: u32,
    pub age: u32,

    /// Player is among the league's top scorers
    pub top_scorer: bool,
}

/// Maps ranks to tiers
#[derive(Debug, Clone)]
pub struct TierClassifier {
    thresholds: TierThresholds,
    flyer_rank_cutoff: f64,
    flyer_max_age: u32,
}

impl TierClassifier {
    pub fn new(thresholds: TierThresholds, flyer_rank_cutoff: f64, flyer_max_age: u32) -> Self {
        Self { thresholds, flyer_rank_cutoff, flyer_max_age }
    }

    pub fn classify(&self, input: &TierInput) -> Tier {
        let t = &self.thresholds;

        // Overall rank means nothing for kickers
        if input.position == Position::PK {
            return match input.position_rank {
                r if r <= t.kicker_elite_max => Tier::Elite,
                r if r <= t.kicker_star_max => Tier::Star,
                r if r <= t.kicker_starter_max => Tier::Starter,
                _ => Tier::Depth,
            };
        }

        if input.position_rank == 1 && input.overall_rank <= t.position_leader_max_rank {
            return Tier::Elite;
        }

        let base = self.base_tier(input.overall_rank);
        if base == Tier::Depth && self.qualifies_as_flyer(input) {
            return Tier::Flyer;
        }
        base
    }

    fn base_tier(&self, overall_rank: f64) -> Tier {
        let t = &self.thresholds;
        if overall_rank <= t.elite_max_rank {
            Tier::Elite
        } else if overall_rank <= t.star_max_rank {
            Tier::Star
        } else if overall_rank <= t.starter_max_rank {
            Tier::Starter
        } else {
            Tier::Depth
        }
    }

    fn qualifies_as_flyer(&self, input: &TierInput) -> bool {
        input.position.is_skill()
            && input.overall_rank <= self.flyer_rank_cutoff
            && (input.age <= self.flyer_max_age || input.top_scorer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> TierClassifier {
        TierClassifier::new(TierThresholds::default(), 300.0, 27)
    }

    fn input(position: Position, overall_rank: f64, position_rank: u32) -> TierInput {
        TierInput { overall_rank, position, position_rank, age: 30, top_scorer: false }
    }

    #[test]
    fn test_base_thresholds() {
        let c = classifier();
        assert_eq!(c.classify(&input(Position::RB, 30.0, 5)), Tier::Elite);
        assert_eq!(c.classify(&input(Position::RB, 31.0, 5)), Tier::Star);
        assert_eq!(c.classify(&input(Position::RB, 105.0, 20)), Tier::Star);
        assert_eq!(c.classify(&input(Position::RB, 199.0, 40)), Tier::Starter);
        assert_eq!(c.classify(&input(Position::RB, 200.0, 41)), Tier::Depth);
    }

    #[test]
    fn test_kicker_uses_position_rank_only() {
        let c = classifier();
        assert_eq!(c.classify(&input(Position::PK, 999.0, 3)), Tier::Elite);
        assert_eq!(c.classify(&input(Position::PK, 5.0, 400)), Tier::Star);
        assert_eq!(c.classify(&input(Position::PK, 999.0, 650)), Tier::Starter);
        assert_eq!(c.classify(&input(Position::PK, 999.0, 701)), Tier::Depth);
    }

    #[test]
    fn test_position_leader_forced_elite() {
        let c = classifier();
        assert_eq!(c.classify(&input(Position::TE, 48.0, 1)), Tier::Elite);
        // leader outside the cutoff falls back to the base mapping
        assert_eq!(c.classify(&input(Position::TE, 60.0, 1)), Tier::Star);
        assert_eq!(c.classify(&input(Position::TE, 48.0, 2)), Tier::Star);
    }

    #[test]
    fn test_flyer_promotion() {
        let c = classifier();
        let young = TierInput { age: 23, ..input(Position::WR, 250.0, 70) };
        assert_eq!(c.classify(&young), Tier::Flyer);

        let producer = TierInput { top_scorer: true, ..input(Position::RB, 280.0, 60) };
        assert_eq!(c.classify(&producer), Tier::Flyer);

        // neither young nor productive
        assert_eq!(c.classify(&input(Position::WR, 250.0, 70)), Tier::Depth);

        // outside the promotion window
        let deep = TierInput { age: 22, ..input(Position::WR, 301.0, 90) };
        assert_eq!(c.classify(&deep), Tier::Depth);

        // QBs are never promoted
        let qb = TierInput { age: 22, ..input(Position::QB, 250.0, 30) };
        assert_eq!(c.classify(&qb), Tier::Depth);
    }

    #[test]
    fn test_tier_ordering_follows_value() {
        assert!(Tier::Elite > Tier::Star);
        assert!(Tier::Star > Tier::Starter);
        assert!(Tier::Starter > Tier::Flyer);
        assert!(Tier::Flyer > Tier::Depth);
    }
}
