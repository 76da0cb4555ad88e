//! Shared test data

use crate::curves::{CurveParams, CurveStore, PositionCurve};
use crate::envelope::TeamCapSituation;
use crate::models::PlayerCandidate;
use crate::positions::Position;

pub(crate) fn curve(max: f64, avg: f64, min: f64, decay: f64, samples: u32) -> PositionCurve {
    let params =
        |base| CurveParams { base_price: base, decay_rate: decay, sample_count: Some(samples) };
    PositionCurve { max: params(max), avg: params(avg), min: params(min) }
}

/// Curves for the skill positions; kickers and defenses have none
pub(crate) fn curve_store() -> CurveStore {
    CurveStore::empty()
        .with_curve(Position::QB, curve(9_000_000.0, 7_000_000.0, 5_000_000.0, -0.03, 20))
        .unwrap()
        .with_curve(Position::RB, curve(10_000_000.0, 8_000_000.0, 6_000_000.0, -0.025, 22))
        .unwrap()
        .with_curve(Position::WR, curve(11_000_000.0, 9_000_000.0, 6_500_000.0, -0.02, 30))
        .unwrap()
        .with_curve(Position::TE, curve(7_000_000.0, 5_000_000.0, 3_500_000.0, -0.03, 18))
        .unwrap()
}

pub(crate) fn ranked(
    id: &str,
    position: Position,
    age: u32,
    dynasty: u32,
    redraft: u32,
) -> PlayerCandidate {
    PlayerCandidate::new(id, position, age).with_ranks(Some(dynasty), Some(redraft))
}

/// Small free-agent pool covering every position
pub(crate) fn pool() -> Vec<PlayerCandidate> {
    vec![
        ranked("wr1", Position::WR, 24, 1, 1).with_name("Ja'Marr Chase").with_points(320.0),
        ranked("wr2", Position::WR, 26, 8, 12).with_points(260.0),
        ranked("wr3", Position::WR, 29, 40, 35).with_points(190.0),
        ranked("wr4", Position::WR, 23, 180, 240),
        PlayerCandidate::new("wr5", Position::WR, 25),
        ranked("rb1", Position::RB, 23, 3, 2).with_points(300.0),
        ranked("rb2", Position::RB, 27, 25, 20).with_points(210.0),
        ranked("rb3", Position::RB, 30, 90, 110).with_points(150.0),
        ranked("qb1", Position::QB, 27, 12, 30).with_points(380.0),
        ranked("qb2", Position::QB, 34, 120, 60).with_points(290.0),
        ranked("te1", Position::TE, 26, 40, 45).with_points(180.0),
        ranked("te2", Position::TE, 31, 150, 170).with_points(110.0),
        PlayerCandidate::new("pk1", Position::PK, 30),
        PlayerCandidate::new("pk2", Position::PK, 28).with_points(140.0),
        PlayerCandidate::new("def1", Position::DEF, 0).with_points(150.0),
        PlayerCandidate::new("def2", Position::DEF, 0).with_points(120.0),
        PlayerCandidate::new("def3", Position::DEF, 0).with_points(90.0),
    ]
}

pub(crate) fn teams() -> Vec<TeamCapSituation> {
    vec![
        TeamCapSituation::new("0001", 30_000_000.0).with_need(Position::RB, 1),
        TeamCapSituation::new("0002", 25_000_000.0).with_need(Position::WR, 2),
        TeamCapSituation::new("0003", 18_000_000.0).with_need(Position::QB, 1),
    ]
}
