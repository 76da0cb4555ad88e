//! League spending envelope derived from team cap situations

use crate::config::AllocationConfig;
use crate::positions::Position;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One team's cap position going into the auction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamCapSituation {
    pub team_id: String,

    /// Cap space available for free agents; negative values count as zero
    pub discretionary_cap: f64,

    /// Starters the team still needs at each position
    #[serde(default)]
    pub positional_needs: BTreeMap<Position, u32>,
}

impl TeamCapSituation {
    pub fn new(team_id: impl Into<String>, discretionary_cap: f64) -> Self {
        Self { team_id: team_id.into(), discretionary_cap, positional_needs: BTreeMap::new() }
    }

    pub fn with_need(mut self, position: Position, count: u32) -> Self {
        self.positional_needs.insert(position, count);
        self
    }

    pub fn need(&self, position: Position) -> u32 {
        self.positional_needs.get(&position).copied().unwrap_or(0)
    }
}

/// League aggregate for one pricing run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapEnvelope {
    pub total_discretionary: f64,
    pub total_teams: usize,

    /// Amount the league is expected to spend
    pub target_spend: f64,

    /// Roster slots free agents are expected to fill
    pub open_slots: usize,
}

impl CapEnvelope {
    pub fn from_teams(teams: &[TeamCapSituation], config: &AllocationConfig) -> Self {
        let total_discretionary: f64 = teams.iter().map(|t| t.discretionary_cap.max(0.0)).sum();
        let total_teams = teams.len();

        Self {
            total_discretionary,
            total_teams,
            target_spend: total_discretionary * config.target_spend_fraction,
            open_slots: total_teams * config.target_active_roster,
        }
    }

    /// Mean discretionary cap per team
    pub fn average_discretionary(&self) -> f64 {
        self.total_discretionary / self.total_teams.max(1) as f64
    }
}
