//! Historical curve store
//!
//! Reference curves describe what players at a given rank have earned in past
//! auctions. The store is built once per run from an injected snapshot and is
//! read-only afterwards.

use crate::error::{PricingError, Result};
use crate::positions::{Position, PositionTable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the three reference curves to price against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveVariant {
    Max,
    Avg,
    Min,
}

impl fmt::Display for CurveVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveVariant::Max => f.write_str("max"),
            CurveVariant::Avg => f.write_str("avg"),
            CurveVariant::Min => f.write_str("min"),
        }
    }
}

/// Exponential salary-vs-rank curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveParams {
    /// Price at rank 1
    pub base_price: f64,

    /// Non-positive decay per rank
    pub decay_rate: f64,

    /// Number of historical contracts the fit came from
    #[serde(default)]
    pub sample_count: Option<u32>,
}

impl CurveParams {
    pub fn new(base_price: f64, decay_rate: f64) -> Self {
        Self { base_price, decay_rate, sample_count: None }
    }

    /// `base × e^(decay × multiplier × (rank − 1))`
    pub fn price_at(&self, rank: f64, decay_multiplier: f64) -> f64 {
        let steps = (rank - 1.0).max(0.0);
        self.base_price * (self.decay_rate * decay_multiplier * steps).exp()
    }

    fn validate(&self, position: Position, variant: CurveVariant) -> Result<()> {
        if !self.base_price.is_finite() || self.base_price <= 0.0 {
            return Err(PricingError::invalid_curve(
                position,
                format!("{variant} base price must be positive, got {}", self.base_price),
            ));
        }
        if !self.decay_rate.is_finite() || self.decay_rate > 0.0 {
            return Err(PricingError::invalid_curve(
                position,
                format!("{variant} decay rate must be non-positive, got {}", self.decay_rate),
            ));
        }
        Ok(())
    }
}

/// The three curve variants for one position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionCurve {
    pub max: CurveParams,
    pub avg: CurveParams,
    pub min: CurveParams,
}

impl PositionCurve {
    pub fn variant(&self, variant: CurveVariant) -> &CurveParams {
        match variant {
            CurveVariant::Max => &self.max,
            CurveVariant::Avg => &self.avg,
            CurveVariant::Min => &self.min,
        }
    }

    /// Smallest sample count across the variants that report one
    pub fn sample_count(&self) -> Option<u32> {
        [self.max.sample_count, self.avg.sample_count, self.min.sample_count]
            .into_iter()
            .flatten()
            .min()
    }
}

/// Serialized form of one position's reference data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionCurveRecord {
    pub position: Position,

    #[serde(default)]
    pub max: Option<CurveParams>,
    #[serde(default)]
    pub avg: Option<CurveParams>,
    #[serde(default)]
    pub min: Option<CurveParams>,

    /// Lowest salary observed at the position
    #[serde(default)]
    pub historical_min_salary: Option<f64>,

    /// Highest salary observed at the position
    #[serde(default)]
    pub historical_max_salary: Option<f64>,
}

/// Reference data as supplied by the historical curve source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveSnapshot {
    pub positions: Vec<PositionCurveRecord>,
}

/// Reference data for one position
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionReference {
    pub curve: Option<PositionCurve>,
    pub historical_min_salary: Option<f64>,
    pub historical_max_salary: Option<f64>,
}

/// Immutable per-run lookup of reference curves
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveStore {
    positions: PositionTable<PositionReference>,
}

impl CurveStore {
    /// Store with no curves; every position uses the fallback formula
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate and index a snapshot
    pub fn from_snapshot(snapshot: &CurveSnapshot) -> Result<Self> {
        let mut store = Self::empty();
        let mut seen = PositionTable::uniform(false);

        for record in &snapshot.positions {
            let position = record.position;
            if std::mem::replace(seen.get_mut(position), true) {
                return Err(PricingError::invalid_curve(position, "duplicate record"));
            }

            let curve = match (record.max, record.avg, record.min) {
                (Some(max), Some(avg), Some(min)) => Some(PositionCurve { max, avg, min }),
                (None, None, None) => None,
                _ => {
                    return Err(PricingError::invalid_curve(
                        position,
                        "max, avg and min curves must be supplied together",
                    ))
                }
            };

            if let Some(curve) = curve {
                store = store.with_curve(position, curve)?;
            }

            let reference = store.positions.get_mut(position);
            reference.historical_min_salary = record.historical_min_salary;
            reference.historical_max_salary = record.historical_max_salary;
        }

        Ok(store)
    }

    /// Add or replace a position's curve
    pub fn with_curve(mut self, position: Position, curve: PositionCurve) -> Result<Self> {
        curve.max.validate(position, CurveVariant::Max)?;
        curve.avg.validate(position, CurveVariant::Avg)?;
        curve.min.validate(position, CurveVariant::Min)?;
        self.positions.get_mut(position).curve = Some(curve);
        Ok(self)
    }

    /// Set the observed salary range for a position
    pub fn with_salary_range(mut self, position: Position, min: f64, max: f64) -> Self {
        let reference = self.positions.get_mut(position);
        reference.historical_min_salary = Some(min);
        reference.historical_max_salary = Some(max);
        self
    }

    pub fn curve(&self, position: Position) -> Option<&PositionCurve> {
        self.positions.get(position).curve.as_ref()
    }

    pub fn historical_min_salary(&self, position: Position) -> Option<f64> {
        self.positions.get(position).historical_min_salary
    }

    pub fn historical_max_salary(&self, position: Position) -> Option<f64> {
        self.positions.get(position).historical_max_salary
    }
}
