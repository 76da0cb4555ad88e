use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

use crate::{
    allocator::BudgetAllocator,
    config::PricingConfig,
    contracts::ContractScheduler,
    curves::{CurveStore, CurveVariant},
    envelope::{CapEnvelope, TeamCapSituation},
    error::{PricingError, Result},
    intrinsic::{select_curve, IntrinsicCalculator, IntrinsicValue},
    market::MarketAdjuster,
    models::{
        PlayerCandidate, PlayerValuation, PriceFactors, PricedPlayer, PricingRun, RankedPlayer,
        TieredPlayer,
    },
    positions::{Position, PositionTable},
    ranking::RankResolver,
    scarcity::{NeutralScarcity, ScarcityAnalyzer},
    tiers::{TierClassifier, TierInput},
};

/// Confidence for defenses, which are priced from production alone
const DEFENSE_CONFIDENCE: f64 = 0.7;

/// Sample count at which curve evidence counts fully
const FULL_EVIDENCE_SAMPLES: f64 = 25.0;

/// Runs the full pricing pipeline: rank, tier, intrinsic value, market
/// adjustment, then one budget allocation pass and contract schedules.
pub struct PricingEngine<S = NeutralScarcity> {
    config: PricingConfig,
    curves: CurveStore,
    scarcity: S,
}

impl PricingEngine<NeutralScarcity> {
    pub fn new(config: PricingConfig, curves: CurveStore) -> Self {
        Self { config, curves, scarcity: NeutralScarcity }
    }
}

impl<S: ScarcityAnalyzer> PricingEngine<S> {
    /// Swap in a scarcity analyzer
    pub fn with_scarcity<T: ScarcityAnalyzer>(self, scarcity: T) -> PricingEngine<T> {
        PricingEngine { config: self.config, curves: self.curves, scarcity }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn curves(&self) -> &CurveStore {
        &self.curves
    }

    /// Price every candidate against the league's cap situations
    pub fn price(
        &self,
        players: &[PlayerCandidate],
        teams: &[TeamCapSituation],
    ) -> Result<PricingRun> {
        let mut seen = HashSet::new();
        for player in players {
            if !seen.insert(player.id.as_str()) {
                return Err(PricingError::DuplicatePlayer(player.id.clone()));
            }
        }

        info!("Pricing {} candidates across {} teams", players.len(), teams.len());

        let config = &self.config;
        let ranks = RankResolver::new(&config.ranking).resolve(players);

        let classifier = TierClassifier::new(
            config.tiers.thresholds.clone(),
            config.ranking.flyer_rank_cutoff,
            config.ranking.flyer_max_age,
        );
        let tiered: Vec<TieredPlayer<'_>> = ranks
            .players()
            .iter()
            .map(|ranked| TieredPlayer {
                ranked: *ranked,
                tier: classifier.classify(&TierInput {
                    overall_rank: ranked.weighted_rank,
                    position: ranked.candidate.position,
                    position_rank: ranked.position_rank,
                    age: ranked.candidate.age,
                    top_scorer: ranked.top_scorer,
                }),
            })
            .collect();

        let curve_selection = PositionTable::from_fn(|position| {
            self.curves.curve(position)?;
            let leader_tier = tiered
                .iter()
                .find(|p| p.ranked.candidate.position == position && p.ranked.position_rank == 1)
                .map(|p| p.tier);
            Some(select_curve(position, leader_tier))
        });

        for position in Position::ALL {
            let size = ranks.position_size(position);
            if position != Position::DEF && size > 0 && curve_selection.get(position).is_none() {
                warn!("No {} curve; {} players priced with the linear fallback", position, size);
            }
        }

        let scarcity = PositionTable::from_fn(|position| {
            self.scarcity.assess(position, &ranks.at_position(position), teams)
        });

        let wr_depth = ranks.count_within(Position::WR, config.market.wr_depth_rank_cutoff);
        let defense_pool = ranks.position_size(Position::DEF);

        let intrinsic = IntrinsicCalculator::new(&self.curves, config);
        let market = MarketAdjuster::new(&config.market, &config.league);

        let mut priced: Vec<PricedPlayer<'_>> = tiered
            .iter()
            .map(|player| {
                let position = player.ranked.candidate.position;
                let variant = (*curve_selection.get(position)).unwrap_or(CurveVariant::Min);
                let value = intrinsic.value(player, variant, defense_pool);
                let adjusted = market.adjust(
                    &player.ranked,
                    value.price,
                    scarcity.get(position).multiplier,
                    wr_depth,
                );
                // age and positional discounts never take a player under its floor
                let market_price = adjusted.price.max(value.floor_price);

                debug!(
                    "{} ({} {}): rank {:.1}, tier {}, intrinsic {:.0}, market {:.0}",
                    player.ranked.candidate.display_name(),
                    position,
                    player.ranked.position_rank,
                    player.ranked.weighted_rank,
                    player.tier,
                    value.price,
                    market_price
                );

                PricedPlayer {
                    tiered: *player,
                    factors: PriceFactors {
                        base_price: value.price,
                        age_multiplier: adjusted.age_multiplier,
                        scarcity_multiplier: adjusted.scarcity_multiplier,
                        final_price: market_price,
                        confidence: confidence(&player.ranked, &value),
                    },
                    floor_price: value.floor_price,
                    curve: value.curve,
                }
            })
            .collect();

        // every price is known; the allocation pass can run
        let envelope = CapEnvelope::from_teams(teams, &config.allocation);
        info!(
            "Envelope: {:.0} discretionary, target {:.0}, {} open slots",
            envelope.total_discretionary, envelope.target_spend, envelope.open_slots
        );

        let allocator = BudgetAllocator::new(
            &config.allocation,
            market,
            config.league.one_year_premium,
            config.league.league_minimum,
        );
        let (allocation, in_slot) = allocator.allocate(&mut priced, &envelope, &intrinsic);

        let scheduler = ContractScheduler::new(&config.contracts, &config.league, market);
        let valuations = priced
            .iter()
            .zip(in_slot)
            .map(|(player, in_slot)| {
                let candidate = player.candidate();
                let position = candidate.position;
                let contracts = scheduler.schedule(
                    player.factors.final_price,
                    candidate.age,
                    player.factors.age_multiplier,
                    position,
                    self.position_cap(position),
                );

                let valuation = PlayerValuation {
                    player_id: candidate.id.clone(),
                    name: candidate.name.clone(),
                    position,
                    age: candidate.age,
                    tier: player.tiered.tier,
                    weighted_rank: player.weighted_rank(),
                    position_rank: player.tiered.ranked.position_rank,
                    curve: player.curve,
                    floor_price: player.floor_price,
                    in_slot,
                    factors: player.factors.clone(),
                    contracts,
                };
                (candidate.id.clone(), valuation)
            })
            .collect::<BTreeMap<_, _>>();

        info!(
            "Pricing complete: {} valuations, allocation {:?}",
            valuations.len(),
            allocation.status
        );

        Ok(PricingRun { envelope, allocation, curve_selection, valuations })
    }

    /// Configured cap for a position, else the highest salary on record
    fn position_cap(&self, position: Position) -> Option<f64> {
        (*self.config.contracts.position_caps.get(position))
            .or_else(|| self.curves.historical_max_salary(position))
    }
}

/// Confidence from rank coverage and curve evidence, in 0..=1
fn confidence(ranked: &RankedPlayer<'_>, value: &IntrinsicValue) -> f64 {
    let candidate = ranked.candidate;
    if candidate.position == Position::DEF {
        return DEFENSE_CONFIDENCE;
    }

    let rank_coverage = match (candidate.dynasty_rank, candidate.redraft_rank) {
        (Some(_), Some(_)) => 0.3,
        (Some(_), None) | (None, Some(_)) => 0.15,
        (None, None) => 0.0,
    };

    let curve_evidence = match (value.curve, value.sample_count) {
        (Some(_), Some(samples)) => 0.3 * (samples as f64 / FULL_EVIDENCE_SAMPLES).min(1.0),
        (Some(_), None) => 0.15,
        (None, _) => 0.0,
    };

    (0.4 + rank_coverage + curve_evidence).clamp(0.0, 1.0)
}
