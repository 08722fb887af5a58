//! Predefined decision plans and helpers to play them through an engine.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sim_core::{Decisions, Parameters};

use crate::engine::Engine;
use crate::ledger::{LedgerError, Summary};

/// A named sequence of quarterly decisions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Label shown in reports.
    pub name: String,
    /// One decision tuple per quarter, played in order.
    #[serde(default)]
    pub quarters: Vec<Decisions>,
}

impl Scenario {
    /// `quarters` rounds of default decisions.
    pub fn defaults(quarters: usize) -> Self {
        Self {
            name: "Default".to_string(),
            quarters: vec![Decisions::default(); quarters],
        }
    }

    /// Play every quarter on a fresh engine.
    pub fn play(&self, params: Parameters) -> Engine {
        let mut engine = Engine::new(params);
        for d in &self.quarters {
            engine.simulate_quarter(d);
        }
        engine
    }
}

/// Built-in strategies from the classroom demo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preset {
    Balanced,
    AggressivePricing,
    MarketingFocus,
    CostLeadership,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Balanced,
        Preset::AggressivePricing,
        Preset::MarketingFocus,
        Preset::CostLeadership,
    ];

    /// Four quarters of (price, marketing, production lots).
    fn plan(self) -> [(i64, i64, u32); 4] {
        // Prices and budgets in tenths.
        match self {
            Preset::Balanced => [(130, 10, 2), (135, 10, 2), (130, 15, 2), (135, 5, 2)],
            Preset::AggressivePricing => [(150, 0, 2), (145, 0, 2), (140, 5, 2), (140, 0, 2)],
            Preset::MarketingFocus => [(130, 20, 3), (130, 25, 3), (130, 20, 3), (135, 10, 2)],
            Preset::CostLeadership => [(110, 5, 3), (115, 5, 3), (120, 0, 2), (120, 0, 2)],
        }
    }

    /// The preset's four quarters as a playable scenario.
    pub fn scenario(self) -> Scenario {
        Scenario {
            name: self.to_string(),
            quarters: self
                .plan()
                .iter()
                .map(|&(price, marketing, lots)| {
                    Decisions::default()
                        .with_price(Decimal::new(price, 1))
                        .with_marketing(Decimal::new(marketing, 1))
                        .with_production(lots)
                })
                .collect(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Preset::Balanced => "balanced",
            Preset::AggressivePricing => "aggressive-pricing",
            Preset::MarketingFocus => "marketing-focus",
            Preset::CostLeadership => "cost-leadership",
        };
        f.write_str(name)
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown scenario preset: {s}"))
    }
}

/// Play every preset under `params` and collect the summaries.
pub fn compare_presets(params: &Parameters) -> Result<Vec<(Preset, Summary)>, LedgerError> {
    Preset::ALL
        .into_iter()
        .map(|p| -> Result<(Preset, Summary), LedgerError> {
            let summary = p.scenario().play(params.clone()).summary()?;
            Ok((p, summary))
        })
        .collect()
}
