//! Contract schedules
//!
//! Expands a three-year equilibrium price into one- to five-year offers. Short deals
//! carry a premium, long deals a discount that grows with age risk.

use crate::config::{ContractConfig, LeagueConfig};
use crate::market::MarketAdjuster;
use crate::positions::Position;
use serde::{Deserialize, Serialize};

pub const MAX_CONTRACT_YEARS: u8 = 5;

/// One contract length on offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractOption {
    pub years: u8,

    /// First-year salary
    pub annual_salary: f64,

    /// Salary for each contract year, escalated
    pub yearly_salaries: Vec<f64>,

    pub total_value: f64,
    pub average_value: f64,

    pub recommended: bool,

    /// Why this length is recommended; only set on the recommended option
    pub justification: Option<String>,
}

/// Recommended length with its reason
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recommendation {
    pub years: u8,
    pub justification: &'static str,
}

/// Builds contract schedules from final prices
#[derive(Debug, Clone, Copy)]
pub struct ContractScheduler<'a> {
    contracts: &'a ContractConfig,
    league: &'a LeagueConfig,
    rounding: MarketAdjuster<'a>,
}

impl<'a> ContractScheduler<'a> {
    pub fn new(
        contracts: &'a ContractConfig,
        league: &'a LeagueConfig,
        rounding: MarketAdjuster<'a>,
    ) -> Self {
        Self { contracts, league, rounding }
    }

    /// All contract lengths for one player.
    ///
    /// `price` is the three-year equilibrium price; `cap` is the position's salary cap.
    pub fn schedule(
        &self,
        price: f64,
        age: u32,
        age_multiplier: f64,
        position: Position,
        cap: Option<f64>,
    ) -> Vec<ContractOption> {
        if position == Position::DEF {
            return self.flat_schedule(price);
        }

        let premium = 1.0 + self.league.one_year_premium;
        let mut base = price;
        if let Some(cap) = cap {
            let one_year = base * premium;
            if one_year > cap {
                let softened = cap + self.contracts.cap_overage_retention * (one_year - cap);
                base = softened / premium;
            }
        }

        let age_risk = (1.0 - age_multiplier).clamp(0.0, 1.0);
        let c = self.contracts;
        let four_year_discount =
            (c.four_year_base_discount + c.four_year_risk_slope * age_risk).min(c.max_discount);
        let five_year_discount =
            (c.five_year_base_discount + c.five_year_risk_slope * age_risk).min(c.max_discount);

        let recommendation = self.recommend(age, base);

        (1..=MAX_CONTRACT_YEARS)
            .map(|years| {
                let factor = match years {
                    1 => premium,
                    2 => 1.0 + c.two_year_premium,
                    3 => 1.0,
                    4 => 1.0 - four_year_discount,
                    _ => 1.0 - five_year_discount,
                };
                let annual = self.clamp_salary(self.rounding.round_price(base * factor), cap);
                let yearly_salaries: Vec<f64> = (0..years)
                    .map(|year| {
                        let raised =
                            annual * (1.0 + self.league.salary_escalation).powi(year as i32);
                        self.clamp_salary(raised, cap)
                    })
                    .collect();
                self.option(years, yearly_salaries, &recommendation)
            })
            .collect()
    }

    /// Ordered rule table keyed on age band and value
    pub fn recommend(&self, age: u32, base_price: f64) -> Recommendation {
        let valuable = base_price >= self.contracts.long_deal_min_value;
        let (years, justification) = match age {
            0..=25 if valuable => {
                (5, "Young core player: five years locks in prime production at a discount")
            }
            0..=25 => {
                (3, "Young and unproven: three years keeps the upside without a long commitment")
            }
            26 if valuable => (4, "Entering prime: four years covers the peak seasons"),
            26 => (3, "Prime-age depth: three years balances cost and flexibility"),
            27..=29 if valuable => {
                (3, "Prime years: three years captures peak value before decline")
            }
            27..=29 => (2, "Prime-age role player: two years limits the commitment"),
            30..=31 => (2, "Approaching decline: two years limits age risk"),
            _ => (1, "Aging veteran: one-year prove-it deal"),
        };
        Recommendation { years, justification }
    }

    fn flat_schedule(&self, price: f64) -> Vec<ContractOption> {
        let recommendation = Recommendation {
            years: 1,
            justification: "Defense: production turns over yearly, flat one-year value",
        };
        let annual = price.max(self.league.league_minimum);
        (1..=MAX_CONTRACT_YEARS)
            .map(|years| self.option(years, vec![annual; years as usize], &recommendation))
            .collect()
    }

    fn option(
        &self,
        years: u8,
        yearly_salaries: Vec<f64>,
        recommendation: &Recommendation,
    ) -> ContractOption {
        let total_value: f64 = yearly_salaries.iter().sum();
        let recommended = years == recommendation.years;
        ContractOption {
            years,
            annual_salary: yearly_salaries.first().copied().unwrap_or(0.0),
            average_value: total_value / years.max(1) as f64,
            total_value,
            yearly_salaries,
            recommended,
            justification: recommended.then(|| recommendation.justification.to_string()),
        }
    }

    fn clamp_salary(&self, salary: f64, cap: Option<f64>) -> f64 {
        let capped = match cap {
            Some(cap) => salary.min(cap),
            None => salary,
        };
        capped.max(self.league.league_minimum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarketConfig;

    struct Setup {
        contracts: ContractConfig,
        league: LeagueConfig,
        market: MarketConfig,
    }

    impl Setup {
        fn new() -> Self {
            Self {
                contracts: ContractConfig::default(),
                league: LeagueConfig::default(),
                market: MarketConfig::default(),
            }
        }

        fn scheduler(&self) -> ContractScheduler<'_> {
            ContractScheduler::new(
                &self.contracts,
                &self.league,
                MarketAdjuster::new(&self.market, &self.league),
            )
        }
    }

    fn salaries(options: &[ContractOption]) -> Vec<f64> {
        options.iter().map(|o| o.annual_salary).collect()
    }

    #[test]
    fn test_schedule_premiums_and_discounts() {
        let setup = Setup::new();
        let options = setup.scheduler().schedule(5_000_000.0, 24, 1.0, Position::WR, None);

        assert_eq!(options.len(), 5);
        assert_eq!(
            salaries(&options),
            vec![6_000_000.0, 5_500_000.0, 5_000_000.0, 4_500_000.0, 4_000_000.0]
        );
        assert_eq!(options[4].total_value, 20_000_000.0);
        assert_eq!(options[4].average_value, 4_000_000.0);
        assert_eq!(options[2].yearly_salaries, vec![5_000_000.0; 3]);
    }

    #[test]
    fn test_age_risk_deepens_long_discounts() {
        let setup = Setup::new();
        // age multiplier 0.8 -> 20% age risk
        let options = setup.scheduler().schedule(5_000_000.0, 31, 0.8, Position::RB, None);

        assert_eq!(options[3].annual_salary, 4_200_000.0);
        assert_eq!(options[4].annual_salary, 3_500_000.0);
    }

    #[test]
    fn test_cap_blends_overage_and_clamps() {
        let setup = Setup::new();
        // one-year ask 12M over an 8M cap keeps 40% of the 4M overage
        let options =
            setup.scheduler().schedule(10_000_000.0, 28, 1.0, Position::QB, Some(8_000_000.0));

        assert!(options.iter().all(|o| o.annual_salary <= 8_000_000.0));
        assert_eq!(options[0].annual_salary, 8_000_000.0);
        // 9.6M one-year -> 8M base
        assert_eq!(options[2].annual_salary, 8_000_000.0);
        assert_eq!(options[4].annual_salary, 6_400_000.0);
    }

    #[test]
    fn test_escalation_applies_per_year() {
        let mut setup = Setup::new();
        setup.league.salary_escalation = 0.15;
        let options =
            setup.scheduler().schedule(1_000_000.0, 28, 1.0, Position::TE, Some(1_250_000.0));

        let three_year = &options[2].yearly_salaries;
        assert_eq!(three_year[0], 1_000_000.0);
        assert!((three_year[1] - 1_150_000.0).abs() < 1e-6);
        // third year hits the cap
        assert_eq!(three_year[2], 1_250_000.0);
    }

    #[test]
    fn test_recommendation_table() {
        let setup = Setup::new();
        let scheduler = setup.scheduler();

        assert_eq!(scheduler.recommend(23, 6_000_000.0).years, 5);
        assert_eq!(scheduler.recommend(23, 900_000.0).years, 3);
        assert_eq!(scheduler.recommend(26, 6_000_000.0).years, 4);
        assert_eq!(scheduler.recommend(28, 6_000_000.0).years, 3);
        assert_eq!(scheduler.recommend(28, 900_000.0).years, 2);
        assert_eq!(scheduler.recommend(31, 6_000_000.0).years, 2);
        assert_eq!(scheduler.recommend(34, 6_000_000.0).years, 1);
    }

    #[test]
    fn test_only_recommended_option_is_justified() {
        let setup = Setup::new();
        let options = setup.scheduler().schedule(4_000_000.0, 33, 0.7, Position::WR, None);

        let recommended: Vec<&ContractOption> = options.iter().filter(|o| o.recommended).collect();
        assert_eq!(recommended.len(), 1);
        assert_eq!(recommended[0].years, 1);
        assert!(recommended[0].justification.as_deref().unwrap().contains("prove-it"));
        assert!(options.iter().filter(|o| !o.recommended).all(|o| o.justification.is_none()));
    }

    #[test]
    fn test_defense_schedule_is_flat() {
        let setup = Setup::new();
        let options = setup.scheduler().schedule(1_200_000.0, 0, 1.0, Position::DEF, None);

        assert!(options.iter().all(|o| o.annual_salary == 1_200_000.0));
        assert_eq!(options[4].total_value, 6_000_000.0);
        assert!(options[0].recommended);
    }

    #[test]
    fn test_salaries_never_below_league_minimum() {
        let setup = Setup::new();
        let options = setup.scheduler().schedule(425_000.0, 35, 0.4, Position::PK, None);
        assert!(options.iter().all(|o| o.annual_salary >= 425_000.0));
    }
}
