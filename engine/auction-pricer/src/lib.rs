//! Auction Pricer
//!
//! Predicts free-agent auction salaries for a salary-capped fantasy football league
//! and fits the total of those predictions to the league's spending envelope.
//!
//! A pricing run is staged: ranks are resolved across the pool, each player is
//! tiered, valued from the historical curves and adjusted for market conditions.
//! Once every player is priced, one budget allocation pass scales the rostered
//! set to the target spend, and each final price is expanded into contract options.

pub mod allocator;
pub mod cli;
pub mod config;
pub mod contracts;
pub mod curves;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod intrinsic;
pub mod logging;
pub mod market;
pub mod models;
pub mod positions;
pub mod ranking;
pub mod scarcity;
pub mod tiers;

pub use config::PricingConfig;
pub use curves::{CurveSnapshot, CurveStore, CurveVariant};
pub use engine::PricingEngine;
pub use envelope::{CapEnvelope, TeamCapSituation};
pub use error::{PricingError, Result};
pub use models::*;
pub use positions::{Position, PositionTable};
pub use scarcity::{FixedScarcity, NeedsBasedScarcity, NeutralScarcity, ScarcityAnalyzer};
pub use tiers::Tier;

#[cfg(test)]
mod fixtures;
