//! Plain-text reports for the terminal.

use std::fmt::Write;

use rust_decimal::Decimal;
use sim_core::{round_money, FirmState, QuarterResult};
use sim_runtime::{Preset, Rating, Summary};

pub const RULE: &str = "============================================================";

fn m(amount: Decimal) -> Decimal {
    round_money(amount)
}

pub fn opening_position(state: &FirmState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Opening position:");
    let _ = writeln!(out, "  Cash:                 {:>8.2} M", m(state.cash));
    let _ = writeln!(out, "  Receivables:          {:>8.2} M", m(state.accounts_receivable));
    let _ = writeln!(
        out,
        "  Inventory:            {} RM, {} WIP, {} FG",
        state.raw_material_inventory, state.work_in_progress, state.finished_goods_inventory
    );
    out
}

pub fn quarter_report(r: &QuarterResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{RULE}");
    let _ = writeln!(out, "QUARTER {} - RESULTS", r.quarter);
    let _ = writeln!(out, "{RULE}");

    let _ = writeln!(out, "\nSALES:");
    let _ = writeln!(out, "  Price:                {:>8.2} M/lot", m(r.sales_price));
    let _ = writeln!(out, "  Demand:               {:>8} lot(s)", r.demand);
    let _ = writeln!(out, "  Volume:               {:>8} lot(s)", r.sales_volume);
    let _ = writeln!(out, "  Revenue:              {:>8.2} M", m(r.sales_revenue));

    let _ = writeln!(out, "\nCOSTS:");
    let _ = writeln!(out, "  Material:             {:>8.2} M", m(r.material_cost));
    let _ = writeln!(out, "  Production:           {:>8.2} M", m(r.production_cost));
    let _ = writeln!(out, "  Assembly:             {:>8.2} M", m(r.assembly_cost));
    let _ = writeln!(out, "  Herstellungskosten:   {:>8.2} M", m(r.herstellungskosten));
    let _ = writeln!(out, "  Overhead:             {:>8.2} M", m(r.overhead_cost));
    let _ = writeln!(out, "  Marketing:            {:>8.2} M", m(r.marketing_cost));
    let _ = writeln!(out, "  Depreciation:         {:>8.2} M", m(r.depreciation));

    let _ = writeln!(out, "\nPROFIT AND LOSS:");
    let _ = writeln!(out, "  Gross profit:         {:>8.2} M", m(r.gross_profit));
    let _ = writeln!(out, "  EBIT:                 {:>8.2} M", m(r.ebit));
    let _ = writeln!(out, "  Interest:             {:>8.2} M", m(r.interest));
    let _ = writeln!(out, "  Profit before tax:    {:>8.2} M", m(r.profit_before_tax));
    let _ = writeln!(out, "  Tax:                  {:>8.2} M", m(r.tax));
    let _ = writeln!(out, "  Net profit:           {:>8.2} M", m(r.net_profit));

    let _ = writeln!(out, "\nINVENTORY:");
    let _ = writeln!(out, "  Raw material:         {:>8} lot(s)", r.raw_material_inventory);
    let _ = writeln!(out, "  Work in progress:     {:>8} lot(s)", r.work_in_progress);
    let _ = writeln!(out, "  Finished goods:       {:>8} lot(s)", r.finished_goods_inventory);

    let _ = writeln!(out, "\nLIQUIDITY:");
    let _ = writeln!(out, "  Cash at start:        {:>8.2} M", m(r.cash_beginning));
    let _ = writeln!(out, "  Collected:            {:>8.2} M", m(r.cash_collected));
    let _ = writeln!(out, "  Cash costs:           {:>8.2} M", m(r.total_cash_costs));
    let _ = writeln!(out, "  Cash at end:          {:>8.2} M", m(r.cash_ending));
    let _ = writeln!(out, "  Receivables:          {:>8.2} M", m(r.accounts_receivable));
    let _ = writeln!(out, "{RULE}");
    out
}

fn rating_label(rating: Rating) -> &'static str {
    match rating {
        Rating::Excellent => "EXCELLENT - outstanding strategic decisions",
        Rating::Good => "GOOD - solid performance with room to improve",
        Rating::Satisfactory => "SATISFACTORY - acceptable, clear potential left",
        Rating::NeedsImprovement => "NEEDS IMPROVEMENT - rethink the strategy",
    }
}

pub fn year_end(summary: &Summary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{RULE}");
    let _ = writeln!(out, "YEAR-END SUMMARY ({} quarters)", summary.quarters_played);
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "  Total revenue:        {:>8.2} M", m(summary.total_revenue));
    let _ = writeln!(out, "  Herstellungskosten:   {:>8.2} M", m(summary.total_herstellungskosten));
    let _ = writeln!(out, "  Gross profit:         {:>8.2} M", m(summary.total_gross_profit));
    let _ = writeln!(out, "  Overhead:             {:>8.2} M", m(summary.total_overhead));
    let _ = writeln!(out, "  Marketing:            {:>8.2} M", m(summary.total_marketing));
    let _ = writeln!(out, "  Depreciation:         {:>8.2} M", m(summary.total_depreciation));
    let _ = writeln!(out, "  EBIT:                 {:>8.2} M", m(summary.total_ebit));
    let _ = writeln!(out, "  Interest:             {:>8.2} M", m(summary.total_interest));
    let _ = writeln!(out, "  Tax:                  {:>8.2} M", m(summary.total_tax));
    let _ = writeln!(out, "  Net profit:           {:>8.2} M", m(summary.total_net_profit));
    let _ = writeln!(out, "  Avg profit/quarter:   {:>8.2} M", m(summary.average_net_profit));
    let _ = writeln!(out, "  Return on sales:      {:>8.2} %", m(summary.return_on_sales));
    let _ = writeln!(out, "  Final cash:           {:>8.2} M", m(summary.final_cash));
    let _ = writeln!(out, "\n  Rating: {}", rating_label(summary.rating()));
    out
}

pub fn comparison(rows: &[(Preset, Summary)]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<20} {:>10} {:>10} {:>8} {:>10}",
        "Scenario", "Revenue", "Profit", "RoS %", "Cash"
    );
    for (preset, s) in rows {
        let _ = writeln!(
            out,
            "{:<20} {:>10.2} {:>10.2} {:>8.2} {:>10.2}",
            preset.to_string(),
            m(s.total_revenue),
            m(s.total_net_profit),
            m(s.return_on_sales),
            m(s.final_cash)
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::Decisions;
    use sim_runtime::Engine;

    fn line_with<'a>(text: &'a str, label: &str) -> &'a str {
        text.lines().find(|l| l.contains(label)).unwrap_or_default()
    }

    #[test]
    fn quarter_report_shows_waterfall() {
        let mut engine = Engine::default();
        let r = engine.simulate_quarter(&Decisions::default());
        let text = quarter_report(&r);
        assert!(text.contains("QUARTER 1 - RESULTS"));
        assert!(line_with(&text, "Net profit:").ends_with(" 2.67 M"));
        assert!(line_with(&text, "Cash at end:").ends_with(" 31.67 M"));
    }

    #[test]
    fn year_end_includes_rating() {
        let engine = sim_runtime::Scenario::defaults(4).play(Default::default());
        let text = year_end(&engine.summary().unwrap());
        assert!(line_with(&text, "Final cash:").ends_with(" 42.67 M"));
        assert!(text.contains("SATISFACTORY"));
    }
}
