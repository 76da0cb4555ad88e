//! Roster positions and per-position lookup tables

use crate::error::PricingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fantasy roster position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    PK,
    DEF,
}

impl Position {
    /// Every position, in display order
    pub const ALL: [Position; 6] =
        [Position::QB, Position::RB, Position::WR, Position::TE, Position::PK, Position::DEF];

    /// Short code used in rankings and league exports
    pub fn code(&self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::PK => "PK",
            Position::DEF => "DEF",
        }
    }

    /// RB, WR and TE
    pub fn is_skill(&self) -> bool {
        matches!(self, Position::RB | Position::WR | Position::TE)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Position {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "QB" => Ok(Position::QB),
            "RB" => Ok(Position::RB),
            "WR" => Ok(Position::WR),
            "TE" => Ok(Position::TE),
            "PK" | "K" => Ok(Position::PK),
            "DEF" | "DST" | "D/ST" => Ok(Position::DEF),
            _ => Err(PricingError::UnknownPosition(s.to_string())),
        }
    }
}

/// One value per position.
///
/// Lookups go through an exhaustive `match`, so a new [`Position`] variant
/// will not compile until every table in the crate has an entry for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionTable<T> {
    pub qb: T,
    pub rb: T,
    pub wr: T,
    pub te: T,
    pub pk: T,
    pub def: T,
}

impl<T> PositionTable<T> {
    pub fn get(&self, position: Position) -> &T {
        match position {
            Position::QB => &self.qb,
            Position::RB => &self.rb,
            Position::WR => &self.wr,
            Position::TE => &self.te,
            Position::PK => &self.pk,
            Position::DEF => &self.def,
        }
    }

    pub fn get_mut(&mut self, position: Position) -> &mut T {
        match position {
            Position::QB => &mut self.qb,
            Position::RB => &mut self.rb,
            Position::WR => &mut self.wr,
            Position::TE => &mut self.te,
            Position::PK => &mut self.pk,
            Position::DEF => &mut self.def,
        }
    }

    /// Build a table by evaluating `f` for every position
    pub fn from_fn(mut f: impl FnMut(Position) -> T) -> Self {
        Self {
            qb: f(Position::QB),
            rb: f(Position::RB),
            wr: f(Position::WR),
            te: f(Position::TE),
            pk: f(Position::PK),
            def: f(Position::DEF),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> {
        Position::ALL.into_iter().map(move |p| (p, self.get(p)))
    }
}

impl<T: Clone> PositionTable<T> {
    /// Same value at every position
    pub fn uniform(value: T) -> Self {
        Self::from_fn(|_| value.clone())
    }
}

impl<T: Default> Default for PositionTable<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}
