//! Result ledger: the append-only list of quarter snapshots and its aggregates.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sim_core::{round_money, Parameters, QuarterResult};
use thiserror::Error;

/// Errors produced when aggregating the ledger.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// No quarter has been simulated yet, so there is nothing to average.
    #[error("ledger is empty; simulate at least one quarter first")]
    Empty,
}

/// Ordered quarter snapshots. Entry `i` is quarter `i + 1`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    entries: Vec<QuarterResult>,
}

impl Ledger {
    /// Append the next quarter. Earlier entries are never touched.
    pub fn append(&mut self, result: QuarterResult) {
        debug_assert_eq!(result.quarter as usize, self.entries.len() + 1);
        self.entries.push(result);
    }

    pub fn entries(&self) -> &[QuarterResult] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Aggregate all entries. `final_cash` is the owning engine's cash.
    ///
    /// Monetary figures are rounded to cents; return on sales is computed
    /// from the unrounded totals and is 0 when there was no revenue.
    pub fn summary(&self, final_cash: Decimal) -> Result<Summary, LedgerError> {
        if self.is_empty() {
            return Err(LedgerError::Empty);
        }
        let total = |f: fn(&QuarterResult) -> Decimal| -> Decimal {
            self.entries.iter().map(f).sum()
        };
        let total_revenue = total(|r| r.sales_revenue);
        let total_net_profit = total(|r| r.net_profit);
        let quarters = Decimal::from(self.entries.len());
        let return_on_sales = if total_revenue.is_zero() {
            Decimal::ZERO
        } else {
            total_net_profit / total_revenue * dec!(100)
        };

        Ok(Summary {
            quarters_played: self.entries.len(),
            total_revenue: round_money(total_revenue),
            total_herstellungskosten: round_money(total(|r| r.herstellungskosten)),
            total_gross_profit: round_money(total(|r| r.gross_profit)),
            total_overhead: round_money(total(|r| r.overhead_cost)),
            total_marketing: round_money(total(|r| r.marketing_cost)),
            total_depreciation: round_money(total(|r| r.depreciation)),
            total_ebit: round_money(total(|r| r.ebit)),
            total_interest: round_money(total(|r| r.interest)),
            total_tax: round_money(total(|r| r.tax)),
            total_net_profit: round_money(total_net_profit),
            average_net_profit: round_money(total_net_profit / quarters),
            final_cash: round_money(final_cash),
            return_on_sales: round_money(return_on_sales),
        })
    }
}

/// Year-end style aggregates over the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of ledger entries aggregated.
    pub quarters_played: usize,
    /// Sum of sales revenue.
    pub total_revenue: Decimal,
    /// Sum of material, production and assembly costs.
    pub total_herstellungskosten: Decimal,
    /// Sum of gross profit.
    pub total_gross_profit: Decimal,
    /// Sum of overhead.
    pub total_overhead: Decimal,
    /// Sum of marketing spend.
    pub total_marketing: Decimal,
    /// Sum of depreciation.
    pub total_depreciation: Decimal,
    /// Sum of EBIT.
    pub total_ebit: Decimal,
    /// Sum of interest.
    pub total_interest: Decimal,
    /// Sum of tax.
    pub total_tax: Decimal,
    /// Sum of net profit.
    pub total_net_profit: Decimal,
    /// Total net profit divided by quarters played.
    pub average_net_profit: Decimal,
    /// Cash of the engine when the summary was taken.
    pub final_cash: Decimal,
    /// Net profit as a percentage of revenue.
    pub return_on_sales: Decimal,
}

/// Coarse grade used by the teaching material to rate a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    /// Net profit above 30 and return on sales above 20 %.
    Excellent,
    /// Net profit above 15 and return on sales above 10 %.
    Good,
    /// Net profit above 5 and return on sales above 5 %.
    Satisfactory,
    /// Anything below the satisfactory thresholds.
    NeedsImprovement,
}

impl Summary {
    /// Grade by total net profit and return on sales.
    pub fn rating(&self) -> Rating {
        let profit = self.total_net_profit;
        let ros = self.return_on_sales;
        if profit > dec!(30) && ros > dec!(20) {
            Rating::Excellent
        } else if profit > dec!(15) && ros > dec!(10) {
            Rating::Good
        } else if profit > dec!(5) && ros > dec!(5) {
            Rating::Satisfactory
        } else {
            Rating::NeedsImprovement
        }
    }
}

/// Everything a persistence or report collaborator needs from one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Export {
    /// Parameters the game was played with.
    pub parameters: Parameters,
    /// Ledger entries in quarter order.
    pub quarters: Vec<QuarterResult>,
    /// Absent when no quarter has been played.
    pub summary: Option<Summary>,
}
