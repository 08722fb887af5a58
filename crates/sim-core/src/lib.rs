#![deny(warnings)]

//! Core domain models and invariants for the factory simulation.
//!
//! This crate defines the serializable types shared by the engine and its
//! collaborators: the immutable parameter set, the firm state, the decision
//! tuple for one quarter and the per-quarter result snapshot. Validation
//! helpers live here too; the engine itself never calls them.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How started production moves through work-in-progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WipPolicy {
    /// Existing WIP finishes first, new lots wait one quarter in WIP.
    #[default]
    Pipeline,
    /// New lots pass through WIP and become finished goods in the same quarter.
    Immediate,
}

/// Immutable simulation parameters, fixed at engine construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// Reference selling price per lot.
    pub base_sales_price: Decimal,
    /// Raw material price per lot.
    pub base_material_price: Decimal,
    /// Production (first stage) cost per lot.
    pub base_production_cost: Decimal,
    /// Assembly (second stage) cost per finished lot.
    pub base_assembly_cost: Decimal,
    /// Overhead per quarter before the overhead factor.
    pub base_overhead_cost: Decimal,
    /// Non-cash depreciation charged every quarter.
    pub depreciation_per_quarter: Decimal,
    /// Interest paid every quarter.
    pub interest_per_quarter: Decimal,
    /// Tax rate as a fraction in [0, 1).
    pub tax_rate: Decimal,
    /// Demand change per unit of relative price deviation.
    pub price_elasticity: Decimal,
    /// Demand increase per unit of marketing spend.
    pub marketing_effectiveness: Decimal,
    /// Base demand in lots per quarter.
    pub market_demand_base: u32,
    /// Price charged by the competitor.
    pub competitor_price: Decimal,
    /// Production cost multiplier (1.0 = normal, 0.9 = 10% cheaper).
    pub production_efficiency: Decimal,
    /// Production cost multiplier for quality.
    pub quality_factor: Decimal,
    /// Work-in-progress flow model.
    pub wip_policy: WipPolicy,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            base_sales_price: dec!(13.0),
            base_material_price: dec!(3.0),
            base_production_cost: dec!(3.0),
            base_assembly_cost: dec!(1.0),
            base_overhead_cost: dec!(6.0),
            depreciation_per_quarter: dec!(1.0),
            interest_per_quarter: dec!(1.0),
            tax_rate: dec!(0.3333),
            price_elasticity: dec!(0.15),
            marketing_effectiveness: dec!(0.08),
            market_demand_base: 2,
            competitor_price: dec!(12.5),
            production_efficiency: dec!(1.0),
            quality_factor: dec!(1.0),
            wip_policy: WipPolicy::Pipeline,
        }
    }
}

/// Mutable state of the firm between quarters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmState {
    /// Cash on hand; may go negative.
    pub cash: Decimal,
    /// Revenue of the previous quarter, collected next quarter.
    pub accounts_receivable: Decimal,
    /// Raw material lots in stock.
    pub raw_material_inventory: u32,
    /// Lots in production.
    pub work_in_progress: u32,
    /// Sellable lots in stock.
    pub finished_goods_inventory: u32,
    /// Number of quarters simulated so far.
    pub current_quarter: u32,
}

impl FirmState {
    /// Opening position of every new game.
    pub fn initial() -> Self {
        Self {
            cash: dec!(28.0),
            accounts_receivable: dec!(26.0),
            raw_material_inventory: 2,
            work_in_progress: 2,
            finished_goods_inventory: 2,
            current_quarter: 0,
        }
    }
}

impl Default for FirmState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Decisions for a single quarter. Every field has a default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Decisions {
    /// Selling price; `None` means the parameter set's base price.
    pub sales_price: Option<Decimal>,
    /// Marketing spend for the quarter.
    pub marketing_budget: Decimal,
    /// Lots to start in production (clamped to available raw material).
    pub production_lots: u32,
    /// Raw material lots bought this quarter.
    pub material_purchase_lots: u32,
    /// Material price multiplier, e.g. 1.1 for a 10% price hike.
    pub material_market_factor: Decimal,
    /// Overhead multiplier.
    pub overhead_factor: Decimal,
}

impl Default for Decisions {
    fn default() -> Self {
        Self {
            sales_price: None,
            marketing_budget: Decimal::ZERO,
            production_lots: 2,
            material_purchase_lots: 2,
            material_market_factor: Decimal::ONE,
            overhead_factor: Decimal::ONE,
        }
    }
}

impl Decisions {
    /// Effective selling price under `params`.
    pub fn effective_price(&self, params: &Parameters) -> Decimal {
        self.sales_price.unwrap_or(params.base_sales_price)
    }

    /// Builder-style helper used by scenarios and tests.
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.sales_price = Some(price);
        self
    }

    /// Builder-style helper used by scenarios and tests.
    pub fn with_marketing(mut self, budget: Decimal) -> Self {
        self.marketing_budget = budget;
        self
    }

    /// Builder-style helper used by scenarios and tests.
    pub fn with_production(mut self, lots: u32) -> Self {
        self.production_lots = lots;
        self
    }
}

/// Immutable snapshot of one simulated quarter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuarterResult {
    /// Quarter number, starting at 1.
    pub quarter: u32,

    /// Raw material lots bought.
    pub material_purchase_lots: u32,
    /// Lots actually started after clamping.
    pub production_lots: u32,
    /// Selling price applied.
    pub sales_price: Decimal,

    /// Lots moved from WIP into finished goods this quarter.
    pub lots_finished: u32,
    /// Unclamped model demand.
    pub demand: u32,
    /// Lots sold.
    pub sales_volume: u32,
    /// Revenue recognized this quarter.
    pub sales_revenue: Decimal,

    /// Purchased raw material, rounded to cents.
    pub material_cost: Decimal,
    /// First-stage cost of the lots started, rounded to cents.
    pub production_cost: Decimal,
    /// Second-stage cost of the lots finished.
    pub assembly_cost: Decimal,
    /// Cost of goods manufactured: material + production + assembly.
    pub herstellungskosten: Decimal,
    /// Overhead after the overhead factor.
    pub overhead_cost: Decimal,
    /// Marketing spend, expensed in full.
    pub marketing_cost: Decimal,
    /// Non-cash depreciation charge.
    pub depreciation: Decimal,
    /// Interest paid.
    pub interest: Decimal,

    /// Revenue minus herstellungskosten.
    pub gross_profit: Decimal,
    /// Gross profit minus overhead and depreciation. Marketing is not deducted.
    pub ebit: Decimal,
    /// EBIT minus interest.
    pub profit_before_tax: Decimal,
    /// Tax on a positive profit before tax; zero on a loss.
    pub tax: Decimal,
    /// Profit before tax minus tax.
    pub net_profit: Decimal,

    /// Raw material lots left at quarter end.
    pub raw_material_inventory: u32,
    /// Lots in production at quarter end.
    pub work_in_progress: u32,
    /// Unsold finished lots at quarter end.
    pub finished_goods_inventory: u32,

    /// Cash before the quarter's settlement.
    pub cash_beginning: Decimal,
    /// Receivables of the previous quarter collected this quarter.
    pub cash_collected: Decimal,
    /// All cash outflows; excludes depreciation.
    pub total_cash_costs: Decimal,
    /// Cash after the quarter's settlement; may be negative.
    pub cash_ending: Decimal,
    /// New receivables (this quarter's revenue).
    pub accounts_receivable: Decimal,
}

/// Validation errors for parameters and decisions at the boundary.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A field that must be non-negative was negative.
    #[error("{field} must be non-negative, got {value}")]
    Negative {
        /// Offending field name.
        field: &'static str,
        /// Offending value.
        value: Decimal,
    },
    /// Tax rate must be within [0, 1).
    #[error("tax rate {0} is outside [0, 1)")]
    TaxRateOutOfRange(Decimal),
    /// The base sales price is a divisor and must be strictly positive.
    #[error("base sales price must be > 0")]
    NonPositiveBasePrice,
    /// A field exceeded the largest magnitude the engine accepts.
    #[error("{field} must be at most {max}, got {value}")]
    TooLarge {
        /// Offending field name.
        field: &'static str,
        /// Offending value.
        value: Decimal,
        /// Upper bound for the field.
        max: Decimal,
    },
}

/// Upper bound for prices, budgets and other monetary inputs.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);
/// Upper bound for multipliers, elasticities and effectiveness rates.
pub const MAX_FACTOR: Decimal = Decimal::from_parts(100, 0, 0, false, 0);
/// Upper bound for lot counts in decisions and for base demand.
pub const MAX_LOTS: u32 = 1_000_000;

fn non_negative(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value < Decimal::ZERO {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(())
}

fn bounded(field: &'static str, value: Decimal, max: Decimal) -> Result<(), ValidationError> {
    non_negative(field, value)?;
    if value > max {
        return Err(ValidationError::TooLarge { field, value, max });
    }
    Ok(())
}

fn bounded_lots(field: &'static str, lots: u32) -> Result<(), ValidationError> {
    if lots > MAX_LOTS {
        return Err(ValidationError::TooLarge {
            field,
            value: Decimal::from(lots),
            max: Decimal::from(MAX_LOTS),
        });
    }
    Ok(())
}

/// Validate a parameter set.
pub fn validate_parameters(p: &Parameters) -> Result<(), ValidationError> {
    if p.base_sales_price <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveBasePrice);
    }
    for (field, value) in [
        ("base_sales_price", p.base_sales_price),
        ("base_material_price", p.base_material_price),
        ("base_production_cost", p.base_production_cost),
        ("base_assembly_cost", p.base_assembly_cost),
        ("base_overhead_cost", p.base_overhead_cost),
        ("depreciation_per_quarter", p.depreciation_per_quarter),
        ("interest_per_quarter", p.interest_per_quarter),
        ("competitor_price", p.competitor_price),
    ] {
        bounded(field, value, MAX_AMOUNT)?;
    }
    for (field, value) in [
        ("price_elasticity", p.price_elasticity),
        ("marketing_effectiveness", p.marketing_effectiveness),
        ("production_efficiency", p.production_efficiency),
        ("quality_factor", p.quality_factor),
    ] {
        bounded(field, value, MAX_FACTOR)?;
    }
    bounded_lots("market_demand_base", p.market_demand_base)?;
    if p.tax_rate < Decimal::ZERO || p.tax_rate >= Decimal::ONE {
        return Err(ValidationError::TaxRateOutOfRange(p.tax_rate));
    }
    Ok(())
}

/// Validate a decision tuple: amounts non-negative, all magnitudes bounded.
pub fn validate_decisions(d: &Decisions) -> Result<(), ValidationError> {
    if let Some(price) = d.sales_price {
        bounded("sales_price", price, MAX_AMOUNT)?;
    }
    bounded("marketing_budget", d.marketing_budget, MAX_AMOUNT)?;
    bounded("material_market_factor", d.material_market_factor, MAX_FACTOR)?;
    bounded("overhead_factor", d.overhead_factor, MAX_FACTOR)?;
    bounded_lots("production_lots", d.production_lots)?;
    bounded_lots("material_purchase_lots", d.material_purchase_lots)?;
    Ok(())
}

/// Round a monetary amount to cents, ties to even.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn initial_state_matches_opening_position() {
        let s = FirmState::initial();
        assert_eq!(s.cash, dec!(28));
        assert_eq!(s.accounts_receivable, dec!(26));
        assert_eq!(
            (s.raw_material_inventory, s.work_in_progress, s.finished_goods_inventory),
            (2, 2, 2)
        );
        assert_eq!(s.current_quarter, 0);
    }

    #[test]
    fn default_parameters_are_valid() {
        validate_parameters(&Parameters::default()).unwrap();
    }

    #[test]
    fn tax_rate_bounds() {
        let mut p = Parameters::default();
        p.tax_rate = Decimal::ONE;
        assert_eq!(
            validate_parameters(&p),
            Err(ValidationError::TaxRateOutOfRange(Decimal::ONE))
        );
        p.tax_rate = Decimal::ZERO;
        assert!(validate_parameters(&p).is_ok());
    }

    #[test]
    fn zero_base_price_rejected() {
        let p = Parameters {
            base_sales_price: Decimal::ZERO,
            ..Parameters::default()
        };
        assert_eq!(
            validate_parameters(&p),
            Err(ValidationError::NonPositiveBasePrice)
        );
    }

    #[test]
    fn negative_marketing_rejected() {
        let d = Decisions::default().with_marketing(dec!(-1));
        assert!(matches!(
            validate_decisions(&d),
            Err(ValidationError::Negative {
                field: "marketing_budget",
                ..
            })
        ));
    }

    #[test]
    fn oversized_decisions_rejected() {
        let d = Decisions::default().with_price(Decimal::MAX / dec!(2));
        assert!(matches!(
            validate_decisions(&d),
            Err(ValidationError::TooLarge {
                field: "sales_price",
                ..
            })
        ));
        let d = Decisions::default().with_production(MAX_LOTS + 1);
        assert!(matches!(
            validate_decisions(&d),
            Err(ValidationError::TooLarge {
                field: "production_lots",
                ..
            })
        ));
        let at_limit = Decisions {
            sales_price: Some(MAX_AMOUNT),
            marketing_budget: MAX_AMOUNT,
            production_lots: MAX_LOTS,
            material_purchase_lots: MAX_LOTS,
            material_market_factor: MAX_FACTOR,
            overhead_factor: MAX_FACTOR,
        };
        assert!(validate_decisions(&at_limit).is_ok());
    }

    #[test]
    fn oversized_parameters_rejected() {
        let p = Parameters {
            quality_factor: dec!(1000),
            ..Parameters::default()
        };
        assert_eq!(
            validate_parameters(&p),
            Err(ValidationError::TooLarge {
                field: "quality_factor",
                value: dec!(1000),
                max: MAX_FACTOR,
            })
        );
    }

    #[test]
    fn partial_decisions_fill_defaults() {
        let d: Decisions = serde_json::from_str(r#"{"production_lots": 3}"#).unwrap();
        assert_eq!(d.production_lots, 3);
        assert_eq!(d.material_purchase_lots, 2);
        assert_eq!(d.effective_price(&Parameters::default()), dec!(13.0));
    }

    #[test]
    fn parameters_roundtrip() {
        let p = Parameters {
            wip_policy: WipPolicy::Immediate,
            ..Parameters::default()
        };
        let s = serde_json::to_string(&p).unwrap();
        assert!(s.contains("\"immediate\""));
        let back: Parameters = serde_json::from_str(&s).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn money_rounds_half_to_even() {
        assert_eq!(round_money(dec!(1.005)), dec!(1.00));
        assert_eq!(round_money(dec!(1.015)), dec!(1.02));
        assert_eq!(round_money(dec!(2.6668)), dec!(2.67));
    }

    proptest! {
        #[test]
        fn non_negative_decisions_validate(price in 0i64..100_000,
                                           marketing in 0i64..100_000,
                                           factor in 0i64..500) {
            let d = Decisions {
                sales_price: Some(Decimal::new(price, 2)),
                marketing_budget: Decimal::new(marketing, 2),
                material_market_factor: Decimal::new(factor, 2),
                ..Decisions::default()
            };
            prop_assert!(validate_decisions(&d).is_ok());
        }

        #[test]
        fn tax_rates_below_one_validate(bp in 0i64..10_000) {
            let p = Parameters { tax_rate: Decimal::new(bp, 4), ..Parameters::default() };
            prop_assert!(validate_parameters(&p).is_ok());
        }
    }
}
