//! Quarter engine: one deterministic state transition per call.
//!
//! [`advance_quarter`] is the pure transition: it takes the firm state by
//! value and hands back the next state with the quarter's snapshot. [`Engine`]
//! owns a state, the parameters and the ledger, and is what collaborators use.

use rust_decimal::Decimal;
use sim_core::{Decisions, FirmState, Parameters, QuarterResult, WipPolicy};
use sim_econ::{assembly_cost, calculate_demand, material_cost, production_cost};
use tracing::{debug, warn};

use crate::ledger::{Export, Ledger, LedgerError, Summary};

/// Outcome of a single transition.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// Firm state after the quarter.
    pub state: FirmState,
    /// Snapshot of the quarter.
    pub result: QuarterResult,
}

/// Advance `state` by one quarter under `params` and `decisions`.
///
/// Shortfalls never fail: production is clamped to raw material on hand and
/// sales are clamped to finished goods.
pub fn advance_quarter(
    mut state: FirmState,
    params: &Parameters,
    decisions: &Decisions,
) -> Transition {
    state.current_quarter = state.current_quarter.saturating_add(1);
    let quarter = state.current_quarter;
    let cash_beginning = state.cash;
    let sales_price = decisions.effective_price(params);

    // Material intake
    let material_purchase_lots = decisions.material_purchase_lots;
    state.raw_material_inventory = state
        .raw_material_inventory
        .saturating_add(material_purchase_lots);
    let material_cost = material_cost(
        params,
        material_purchase_lots,
        decisions.material_market_factor,
    );

    let mut production_lots = decisions.production_lots;
    if production_lots > state.raw_material_inventory {
        warn!(
            quarter,
            requested = production_lots,
            available = state.raw_material_inventory,
            "production clamped to raw material on hand"
        );
        production_lots = state.raw_material_inventory;
    }
    state.raw_material_inventory -= production_lots;

    let lots_finished = match params.wip_policy {
        WipPolicy::Pipeline => {
            let finished = state.work_in_progress;
            state.work_in_progress = production_lots;
            finished
        }
        WipPolicy::Immediate => {
            let finished = state.work_in_progress.saturating_add(production_lots);
            state.work_in_progress = 0;
            finished
        }
    };
    state.finished_goods_inventory = state.finished_goods_inventory.saturating_add(lots_finished);

    let production_cost = production_cost(params, production_lots);
    let assembly_cost = assembly_cost(params, lots_finished);

    // Sale
    let demand = calculate_demand(params, sales_price, decisions.marketing_budget);
    let sales_volume = demand.min(state.finished_goods_inventory);
    if sales_volume < demand {
        warn!(
            quarter,
            demand,
            stock = state.finished_goods_inventory,
            "sales clamped to finished goods"
        );
    }
    state.finished_goods_inventory -= sales_volume;
    let sales_revenue = Decimal::from(sales_volume) * sales_price;

    // Profit and loss
    let herstellungskosten = material_cost + production_cost + assembly_cost;
    let gross_profit = sales_revenue - herstellungskosten;
    let overhead_cost = params.base_overhead_cost * decisions.overhead_factor;
    let depreciation = params.depreciation_per_quarter;
    let ebit = gross_profit - overhead_cost - depreciation;
    let interest = params.interest_per_quarter;
    let profit_before_tax = ebit - interest;
    let tax = (profit_before_tax * params.tax_rate).max(Decimal::ZERO);
    let net_profit = profit_before_tax - tax;

    // Cash settlement; depreciation is non-cash
    let marketing_cost = decisions.marketing_budget;
    let total_cash_costs = material_cost
        + production_cost
        + assembly_cost
        + overhead_cost
        + marketing_cost
        + interest
        + tax;
    let cash_collected = state.accounts_receivable;
    state.cash = state.cash + cash_collected - total_cash_costs;
    state.accounts_receivable = sales_revenue;

    debug!(
        quarter,
        sales_volume,
        %sales_revenue,
        %net_profit,
        cash = %state.cash,
        "quarter simulated"
    );

    let result = QuarterResult {
        quarter,
        material_purchase_lots,
        production_lots,
        sales_price,
        lots_finished,
        demand,
        sales_volume,
        sales_revenue,
        material_cost,
        production_cost,
        assembly_cost,
        herstellungskosten,
        overhead_cost,
        marketing_cost,
        depreciation,
        interest,
        gross_profit,
        ebit,
        profit_before_tax,
        tax,
        net_profit,
        raw_material_inventory: state.raw_material_inventory,
        work_in_progress: state.work_in_progress,
        finished_goods_inventory: state.finished_goods_inventory,
        cash_beginning,
        cash_collected,
        total_cash_costs,
        cash_ending: state.cash,
        accounts_receivable: state.accounts_receivable,
    };
    Transition { state, result }
}

/// A single game: parameters, firm state and the ledger of past quarters.
///
/// Calls must be serialized by the owner; the engine does no locking.
#[derive(Clone, Debug)]
pub struct Engine {
    params: Parameters,
    state: FirmState,
    ledger: Ledger,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Parameters::default())
    }
}

impl Engine {
    /// New game with the standard opening position.
    pub fn new(params: Parameters) -> Self {
        Self {
            params,
            state: FirmState::initial(),
            ledger: Ledger::default(),
        }
    }

    /// Parameters fixed at construction.
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Current firm state.
    pub fn state(&self) -> &FirmState {
        &self.state
    }

    /// Every quarter simulated so far, in order.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Simulate the next quarter and record it in the ledger.
    pub fn simulate_quarter(&mut self, decisions: &Decisions) -> QuarterResult {
        let Transition { state, result } =
            advance_quarter(self.state.clone(), &self.params, decisions);
        self.state = state;
        self.ledger.append(result.clone());
        result
    }

    /// Aggregate figures over all simulated quarters.
    pub fn summary(&self) -> Result<Summary, LedgerError> {
        self.ledger.summary(self.state.cash)
    }

    /// Serializable record for persistence and reporting collaborators.
    pub fn export(&self) -> Export {
        Export {
            parameters: self.params.clone(),
            quarters: self.ledger.entries().to_vec(),
            summary: self.summary().ok(),
        }
    }
}
