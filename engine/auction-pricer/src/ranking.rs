//! Rank resolution
//!
//! Blends dynasty and redraft ranks into one overall rank and assigns dense
//! per-position ranks across the candidate pool.

use crate::config::RankingConfig;
use crate::models::{PlayerCandidate, RankedPlayer};
use crate::positions::Position;
use std::cmp::Ordering;

/// Computes weighted and positional ranks
#[derive(Debug, Clone)]
pub struct RankResolver {
    /// 0..=100
    dynasty_weight: f64,
    replacement_rank: f64,
    points_cutoff: usize,
}

impl RankResolver {
    pub fn new(config: &RankingConfig) -> Self {
        Self {
            dynasty_weight: config.dynasty_weight.clamp(0.0, 100.0),
            replacement_rank: config.replacement_rank,
            points_cutoff: config.flyer_points_cutoff,
        }
    }

    /// Weighted overall rank, `None` when the player has no ranking data
    pub fn weighted_rank(&self, player: &PlayerCandidate) -> Option<f64> {
        match (player.dynasty_rank, player.redraft_rank) {
            (Some(dynasty), Some(redraft)) => {
                let w = self.dynasty_weight / 100.0;
                Some(dynasty as f64 * w + redraft as f64 * (1.0 - w))
            }
            (Some(rank), None) | (None, Some(rank)) => Some(rank as f64),
            (None, None) => None,
        }
    }

    /// Rank every candidate in the pool. Output order matches input order.
    pub fn resolve<'a>(&self, pool: &'a [PlayerCandidate]) -> RankContext<'a> {
        let weighted: Vec<Option<f64>> = pool.iter().map(|p| self.weighted_rank(p)).collect();
        let overall: Vec<f64> =
            weighted.iter().map(|r| r.unwrap_or(self.replacement_rank)).collect();

        let mut position_ranks = vec![0u32; pool.len()];
        for position in Position::ALL {
            let mut indices: Vec<usize> =
                (0..pool.len()).filter(|&i| pool[i].position == position).collect();

            // stable sorts keep input order for ties
            if position == Position::DEF {
                indices.sort_by(|&a, &b| by_points_desc(&pool[a], &pool[b]));
            } else {
                indices.sort_by(|&a, &b| overall[a].total_cmp(&overall[b]));
            }

            for (rank, &i) in indices.iter().enumerate() {
                position_ranks[i] = rank as u32 + 1;
            }
        }

        let mut scorers: Vec<usize> =
            (0..pool.len()).filter(|&i| pool[i].fantasy_points.is_some()).collect();
        scorers.sort_by(|&a, &b| by_points_desc(&pool[a], &pool[b]));
        let mut top_scorer = vec![false; pool.len()];
        for &i in scorers.iter().take(self.points_cutoff) {
            top_scorer[i] = true;
        }

        let players = pool
            .iter()
            .enumerate()
            .map(|(i, candidate)| RankedPlayer {
                candidate,
                weighted_rank: overall[i],
                unranked: weighted[i].is_none(),
                position_rank: position_ranks[i],
                top_scorer: top_scorer[i],
            })
            .collect();

        RankContext { players }
    }
}

fn by_points_desc(a: &PlayerCandidate, b: &PlayerCandidate) -> Ordering {
    let a = a.fantasy_points.unwrap_or(f64::NEG_INFINITY);
    let b = b.fantasy_points.unwrap_or(f64::NEG_INFINITY);
    b.total_cmp(&a)
}

/// Ranks for one pricing run
#[derive(Debug, Clone)]
pub struct RankContext<'a> {
    players: Vec<RankedPlayer<'a>>,
}

impl<'a> RankContext<'a> {
    pub fn players(&self) -> &[RankedPlayer<'a>] {
        &self.players
    }

    /// Players at a position ordered by position rank
    pub fn at_position(&self, position: Position) -> Vec<&RankedPlayer<'a>> {
        let mut players: Vec<&RankedPlayer<'a>> =
            self.players.iter().filter(|p| p.candidate.position == position).collect();
        players.sort_by_key(|p| p.position_rank);
        players
    }

    /// Best-ranked player at a position
    pub fn position_leader(&self, position: Position) -> Option<&RankedPlayer<'a>> {
        self.players.iter().find(|p| p.candidate.position == position && p.position_rank == 1)
    }

    /// Count of ranked players at a position with weighted rank inside `cutoff`
    pub fn count_within(&self, position: Position, cutoff: f64) -> usize {
        self.players
            .iter()
            .filter(|p| p.candidate.position == position && !p.unranked)
            .filter(|p| p.weighted_rank <= cutoff)
            .count()
    }

    pub fn position_size(&self, position: Position) -> usize {
        self.players.iter().filter(|p| p.candidate.position == position).count()
    }
}
