#![deny(warnings)]

//! Economic models: demand and cost helpers for the factory simulation.
//!
//! This module provides pure functions over a [`Parameters`] set for:
//! - Quarterly demand as a function of price and marketing spend
//! - Material, production and assembly costs per lot count
//!
//! Rounding is half-to-even everywhere: demand rounds to whole lots,
//! material and production costs round to cents.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use sim_core::{round_money, Parameters};

const PENALTY_ABOVE_COMPETITOR: Decimal = Decimal::from_parts(85, 0, 0, false, 2);
const BONUS_BELOW_COMPETITOR: Decimal = Decimal::from_parts(115, 0, 0, false, 2);

/// Multiplier applied to demand depending on the price relative to the competitor.
pub fn competitive_factor(price: Decimal, competitor_price: Decimal) -> Decimal {
    match price.cmp(&competitor_price) {
        std::cmp::Ordering::Greater => PENALTY_ABOVE_COMPETITOR,
        std::cmp::Ordering::Less => BONUS_BELOW_COMPETITOR,
        std::cmp::Ordering::Equal => Decimal::ONE,
    }
}

/// Unrounded demand in lots.
///
/// raw = base * (1 - (price/base_price - 1) * elasticity)
///            * (1 + marketing * effectiveness)
///            * competitive_factor
///
/// Intermediate products saturate instead of overflowing, so extreme inputs
/// yield an extreme but finite demand.
pub fn raw_demand(params: &Parameters, price: Decimal, marketing_spend: Decimal) -> Decimal {
    // A zero base price would divide by zero; treat it as a neutral price effect.
    let price_ratio = if params.base_sales_price.is_zero() {
        Decimal::ONE
    } else {
        price
            .checked_div(params.base_sales_price)
            .unwrap_or(Decimal::MAX)
    };
    let price_effect = Decimal::ONE.saturating_sub(
        price_ratio
            .saturating_sub(Decimal::ONE)
            .saturating_mul(params.price_elasticity),
    );
    let marketing_effect =
        Decimal::ONE.saturating_add(marketing_spend.saturating_mul(params.marketing_effectiveness));
    let competitive = competitive_factor(price, params.competitor_price);
    Decimal::from(params.market_demand_base)
        .saturating_mul(price_effect)
        .saturating_mul(marketing_effect)
        .saturating_mul(competitive)
}

/// Quarterly demand in whole lots, never below 1.
///
/// Example:
/// let q = calculate_demand(&Parameters::default(), dec!(13), Decimal::ZERO);
/// assert_eq!(q, 2); // 2 * 0.85 = 1.7 rounds to 2
pub fn calculate_demand(params: &Parameters, price: Decimal, marketing_spend: Decimal) -> u32 {
    let rounded = raw_demand(params, price, marketing_spend)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    if rounded < Decimal::ONE {
        return 1;
    }
    rounded.to_u32().unwrap_or(u32::MAX)
}

/// Material cost for `lots` at a market price multiplier, rounded to cents.
pub fn material_cost(params: &Parameters, lots: u32, market_factor: Decimal) -> Decimal {
    round_money(Decimal::from(lots) * params.base_material_price * market_factor)
}

/// Production cost for `lots` with efficiency and quality multipliers, rounded to cents.
pub fn production_cost(params: &Parameters, lots: u32) -> Decimal {
    round_money(
        Decimal::from(lots)
            * params.base_production_cost
            * params.production_efficiency
            * params.quality_factor,
    )
}

/// Assembly cost for `lots` finished goods. Not rounded.
pub fn assembly_cost(params: &Parameters, lots: u32) -> Decimal {
    Decimal::from(lots) * params.base_assembly_cost
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn demand_at_base_price_above_competitor() {
        let p = Parameters::default();
        assert_eq!(raw_demand(&p, dec!(13), Decimal::ZERO), dec!(1.7));
        assert_eq!(calculate_demand(&p, dec!(13), Decimal::ZERO), 2);
    }

    #[test]
    fn demand_at_competitor_price() {
        let p = Parameters::default();
        // price_effect = 1 - (12.5/13 - 1) * 0.15 > 1, no competitive adjustment
        let raw = raw_demand(&p, dec!(12.5), Decimal::ZERO);
        assert!(raw > dec!(2));
        assert_eq!(calculate_demand(&p, dec!(12.5), Decimal::ZERO), 2);
    }

    #[test]
    fn marketing_raises_demand() {
        let p = Parameters::default();
        // 2 * 1.0 * (1 + 10 * 0.08) * 0.85 = 3.06
        assert_eq!(raw_demand(&p, dec!(13), dec!(10)), dec!(3.06));
        assert_eq!(calculate_demand(&p, dec!(13), dec!(10)), 3);
    }

    #[test]
    fn demand_ties_round_to_even() {
        let p = Parameters {
            market_demand_base: 5,
            competitor_price: dec!(13),
            ..Parameters::default()
        };
        // 5 * 1 * (1 + 0.5 * 0.2) = 5.5 -> 6; 2.5 -> 2
        let p = Parameters { marketing_effectiveness: dec!(0.2), ..p };
        assert_eq!(raw_demand(&p, dec!(13), dec!(0.5)), dec!(5.5));
        assert_eq!(calculate_demand(&p, dec!(13), dec!(0.5)), 6);
        let p = Parameters { market_demand_base: 1, marketing_effectiveness: dec!(1.5), ..p };
        assert_eq!(raw_demand(&p, dec!(13), dec!(1)), dec!(2.5));
        assert_eq!(calculate_demand(&p, dec!(13), dec!(1)), 2);
    }

    #[test]
    fn demand_floor_for_absurd_price() {
        let p = Parameters::default();
        assert_eq!(calculate_demand(&p, dec!(10000), Decimal::ZERO), 1);
    }

    #[test]
    fn zero_base_price_does_not_panic() {
        let p = Parameters {
            base_sales_price: Decimal::ZERO,
            ..Parameters::default()
        };
        assert_eq!(calculate_demand(&p, dec!(13), Decimal::ZERO), 2);
    }

    #[test]
    fn extreme_inputs_saturate() {
        use sim_core::{MAX_AMOUNT, MAX_FACTOR, MAX_LOTS};
        let p = Parameters {
            base_sales_price: dec!(0.0000000001),
            price_elasticity: MAX_FACTOR,
            marketing_effectiveness: MAX_FACTOR,
            market_demand_base: MAX_LOTS,
            ..Parameters::default()
        };
        assert_eq!(calculate_demand(&p, MAX_AMOUNT, MAX_AMOUNT), 1);
        assert_eq!(calculate_demand(&p, Decimal::ZERO, MAX_AMOUNT), u32::MAX);
    }

    #[test]
    fn default_costs() {
        let p = Parameters::default();
        assert_eq!(material_cost(&p, 2, Decimal::ONE), dec!(6.00));
        assert_eq!(production_cost(&p, 2), dec!(6.00));
        assert_eq!(assembly_cost(&p, 2), dec!(2));
    }

    #[test]
    fn material_cost_rounds_to_cents() {
        let p = Parameters {
            base_material_price: dec!(3.333),
            ..Parameters::default()
        };
        // 3 * 3.333 * 1.1 = 10.9989
        assert_eq!(material_cost(&p, 3, dec!(1.1)), dec!(11.00));
    }

    #[test]
    fn production_cost_applies_multipliers() {
        let p = Parameters {
            production_efficiency: dec!(0.9),
            quality_factor: dec!(1.05),
            ..Parameters::default()
        };
        // 2 * 3 * 0.9 * 1.05 = 5.67
        assert_eq!(production_cost(&p, 2), dec!(5.67));
    }

    proptest! {
        #[test]
        fn demand_never_below_one(price in 0i64..1_000_000, marketing in 0i64..100_000) {
            let p = Parameters::default();
            let q = calculate_demand(&p, Decimal::new(price, 2), Decimal::new(marketing, 2));
            prop_assert!(q >= 1);
        }

        #[test]
        fn demand_monotonic_in_marketing(m in 0i64..10_000) {
            let p = Parameters::default();
            let lo = raw_demand(&p, dec!(13), Decimal::new(m, 2));
            let hi = raw_demand(&p, dec!(13), Decimal::new(m + 100, 2));
            prop_assert!(hi >= lo);
        }

        #[test]
        fn costs_non_negative(lots in 0u32..10_000, factor in 0i64..500) {
            let p = Parameters::default();
            prop_assert!(material_cost(&p, lots, Decimal::new(factor, 2)) >= Decimal::ZERO);
            prop_assert!(production_cost(&p, lots) >= Decimal::ZERO);
            prop_assert!(assembly_cost(&p, lots) >= Decimal::ZERO);
        }
    }
}
