//! Budget allocation
//!
//! Second pass over the fully priced pool. Players outside the projected rostered
//! set drop to the league minimum, and a single scale factor is solved so that the
//! one-year-equivalent spend of everyone inside it fits the league's target spend.

use crate::config::AllocationConfig;
use crate::envelope::CapEnvelope;
use crate::intrinsic::IntrinsicCalculator;
use crate::market::MarketAdjuster;
use crate::models::PricedPlayer;
use crate::positions::Position;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// How the allocation pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStatus {
    /// Prices were scaled to the target spend
    Scaled,
    /// Floors alone exceed the target; prices left at their market value
    Overcommitted,
    /// No in-slot players to scale
    NoCandidates,
}

/// Summary of the allocation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub status: AllocationStatus,
    pub target_spend: f64,

    /// Defense spend taken off the top before solving
    pub defense_total: f64,

    /// Target spend left for the scaled players
    pub remaining_spend: f64,

    /// One-year-equivalent spend with every scaled player at their floor
    pub floor_total: f64,

    /// One-year-equivalent spend after allocation, defenses included
    pub projected_spend: f64,

    /// Solved scale factor, `None` when no scaling was applied
    pub scale: Option<f64>,

    pub in_slot: usize,
    pub beyond_slots: usize,
}

impl AllocationOutcome {
    /// Projected spend above the target, zero when within budget
    pub fn overage(&self) -> f64 {
        (self.projected_spend - self.target_spend).max(0.0)
    }
}

/// Floor and unscaled price of one player in the solve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleInput {
    pub floor: f64,
    pub base: f64,
}

/// Result of the scale search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleSolution {
    pub scale: f64,

    /// One-year-equivalent total at `scale`
    pub total: f64,

    /// Upper bound the bisection started from
    pub upper: f64,

    /// Bisection iterations run
    pub iterations: u32,
}

/// One-year-equivalent total at scale `s`
pub fn scaled_total(inputs: &[ScaleInput], scale: f64, one_year_multiplier: f64) -> f64 {
    inputs.iter().map(|p| p.floor.max(p.base * scale)).sum::<f64>() * one_year_multiplier
}

/// Largest scale whose one-year-equivalent total stays within `target`.
///
/// Returns `None` when the floors alone reach the target. The upper bound doubles
/// from 1.0 until the total meets the target, at most `max_doublings` times. When the
/// search budget runs out the last lower bound is returned, which always satisfies
/// the target.
pub fn solve_scale(
    inputs: &[ScaleInput],
    target: f64,
    one_year_multiplier: f64,
    max_doublings: u32,
    iterations: u32,
) -> Option<ScaleSolution> {
    let floor_total = scaled_total(inputs, 0.0, one_year_multiplier);
    if floor_total >= target {
        return None;
    }

    let mut upper = 1.0;
    let mut doublings = 0;
    while scaled_total(inputs, upper, one_year_multiplier) < target && doublings < max_doublings {
        upper *= 2.0;
        doublings += 1;
    }

    let upper_total = scaled_total(inputs, upper, one_year_multiplier);
    if upper_total <= target {
        warn!(
            "Scale search hit the doubling cap at {upper}; total {upper_total:.0} under target"
        );
        return Some(ScaleSolution { scale: upper, total: upper_total, upper, iterations: 0 });
    }

    let (mut lo, mut hi) = (0.0, upper);
    for _ in 0..iterations {
        let mid = (lo + hi) / 2.0;
        if scaled_total(inputs, mid, one_year_multiplier) <= target {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    Some(ScaleSolution {
        scale: lo,
        total: scaled_total(inputs, lo, one_year_multiplier),
        upper,
        iterations,
    })
}

/// Reconciles per-player prices with the league envelope
#[derive(Debug, Clone, Copy)]
pub struct BudgetAllocator<'a> {
    config: &'a AllocationConfig,
    market: MarketAdjuster<'a>,
    one_year_multiplier: f64,
    league_minimum: f64,
}

impl<'a> BudgetAllocator<'a> {
    /// Scaled prices are rounded down onto `market`'s price increments
    pub fn new(
        config: &'a AllocationConfig,
        market: MarketAdjuster<'a>,
        one_year_premium: f64,
        league_minimum: f64,
    ) -> Self {
        Self { config, market, one_year_multiplier: 1.0 + one_year_premium, league_minimum }
    }

    /// Run the allocation pass. Returns the outcome and, per player, whether it is in slot.
    ///
    /// Requires every player to be priced; prices are updated in place. A league
    /// with no teams has no open slots, so every scaled player drops to the minimum.
    pub fn allocate(
        &self,
        players: &mut [PricedPlayer<'_>],
        envelope: &CapEnvelope,
        floors: &IntrinsicCalculator<'_>,
    ) -> (AllocationOutcome, Vec<bool>) {
        let mut in_slot = vec![false; players.len()];

        let is_scaled = |p: &PricedPlayer<'_>| {
            !(self.config.exclude_defense && p.position() == Position::DEF)
        };

        // stable sort keeps input order for tied ranks
        let mut order: Vec<usize> =
            (0..players.len()).filter(|&i| is_scaled(&players[i])).collect();
        order.sort_by(|&a, &b| players[a].weighted_rank().total_cmp(&players[b].weighted_rank()));

        let slots = envelope.open_slots.min(order.len());
        let (inside, beyond) = order.split_at(slots);
        for &i in inside {
            in_slot[i] = true;
        }
        for &i in beyond {
            players[i].factors.final_price = self.league_minimum;
        }

        let defense_total: f64 = players
            .iter()
            .filter(|p| !is_scaled(*p))
            .map(|p| p.factors.final_price)
            .sum();
        let remaining_spend = envelope.target_spend - defense_total;

        let inputs: Vec<ScaleInput> = inside
            .iter()
            .map(|&i| ScaleInput {
                floor: players[i].floor_price,
                base: players[i].factors.final_price,
            })
            .collect();
        let floor_total = scaled_total(&inputs, 0.0, self.one_year_multiplier);

        let mut outcome = AllocationOutcome {
            status: AllocationStatus::NoCandidates,
            target_spend: envelope.target_spend,
            defense_total,
            remaining_spend,
            floor_total,
            projected_spend: defense_total,
            scale: None,
            in_slot: inside.len(),
            beyond_slots: beyond.len(),
        };

        if inputs.is_empty() {
            info!("No players in slot; {} priced at the league minimum", beyond.len());
            return (outcome, in_slot);
        }

        let solution = solve_scale(
            &inputs,
            remaining_spend,
            self.one_year_multiplier,
            self.config.max_doublings,
            self.config.bisection_iterations,
        );

        match solution {
            None => {
                outcome.status = AllocationStatus::Overcommitted;
                outcome.projected_spend +=
                    inputs.iter().map(|p| p.base).sum::<f64>() * self.one_year_multiplier;
                warn!(
                    "Floors alone ({:.0}) exceed remaining target spend ({:.0}); \
                     prices left unscaled",
                    floor_total, remaining_spend
                );
            }
            Some(solution) => {
                // rounding down keeps the scaled total inside the solved bound
                let mut scaled_spend = 0.0;
                for &i in inside {
                    let player = &mut players[i];
                    let scaled = self
                        .market
                        .round_down(player.factors.final_price * solution.scale)
                        .max(player.floor_price);
                    let tiered = player.tiered;
                    let clamped = floors.apply_tier_floor(
                        scaled,
                        tiered.ranked.candidate.position,
                        tiered.tier,
                    );
                    player.factors.final_price = clamped.max(self.league_minimum);
                    scaled_spend += player.factors.final_price;
                }
                let scaled_spend = scaled_spend * self.one_year_multiplier;

                outcome.status = AllocationStatus::Scaled;
                outcome.scale = Some(solution.scale);
                outcome.projected_spend += scaled_spend;
                info!(
                    "Solved scale {:.4} for {} players: spend {:.0} of {:.0} remaining",
                    solution.scale,
                    inputs.len(),
                    scaled_spend,
                    remaining_spend
                );
            }
        }

        (outcome, in_slot)
    }
}
