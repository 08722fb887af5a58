//! Interactive play: prompts for each quarter's decisions on stdin.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use sim_core::{validate_decisions, Decisions, Parameters};
use tracing::warn;

use crate::report::RULE;

fn answer<T>(raw: &str, what: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let value = raw
        .parse::<T>()
        .with_context(|| format!("bad {what}: {raw}"))?;
    Ok(Some(value))
}

/// Build one quarter's decisions from the three answers.
///
/// Blank answers keep the default; the result is validated.
pub fn parse_decisions(price: &str, marketing: &str, production: &str) -> Result<Decisions> {
    let mut d = Decisions::default();
    if let Some(price) = answer::<Decimal>(price, "sales price")? {
        d = d.with_price(price);
    }
    if let Some(budget) = answer::<Decimal>(marketing, "marketing budget")? {
        d = d.with_marketing(budget);
    }
    if let Some(lots) = answer::<u32>(production, "production lots")? {
        d = d.with_production(lots);
    }
    validate_decisions(&d)?;
    Ok(d)
}

fn ask(input: &mut impl BufRead, out: &mut impl Write, prompt: &str) -> io::Result<String> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line)
}

/// Prompt for the decisions of `quarter`.
///
/// Invalid answers fall back to the default decisions. End of input counts
/// as blank answers.
pub fn read_decisions(
    input: &mut impl BufRead,
    out: &mut impl Write,
    params: &Parameters,
    quarter: u32,
) -> io::Result<Decisions> {
    writeln!(out, "\n{RULE}")?;
    writeln!(out, "QUARTER {quarter} - DECISIONS")?;
    writeln!(out, "{RULE}")?;
    let price = ask(
        input,
        out,
        &format!("Sales price (default {} M): ", params.base_sales_price),
    )?;
    let marketing = ask(input, out, "Marketing budget (default 0 M): ")?;
    let production = ask(input, out, "Production lots (default 2): ")?;

    match parse_decisions(&price, &marketing, &production) {
        Ok(d) => Ok(d),
        Err(e) => {
            warn!(quarter, error = %e, "invalid decisions, using defaults");
            writeln!(out, "Invalid input ({e:#}). Using default decisions.")?;
            Ok(Decisions::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Cursor;

    fn read(input: &str) -> (Decisions, String) {
        let mut out = Vec::new();
        let d = read_decisions(
            &mut Cursor::new(input.as_bytes()),
            &mut out,
            &Parameters::default(),
            1,
        )
        .unwrap();
        (d, String::from_utf8(out).unwrap())
    }

    #[test]
    fn blank_answers_keep_defaults() {
        assert_eq!(parse_decisions("", " ", "\n").unwrap(), Decisions::default());
    }

    #[test]
    fn price_answer_is_applied() {
        let d = parse_decisions("14.5\n", "", "").unwrap();
        assert_eq!(d.sales_price, Some(dec!(14.5)));
        assert_eq!(d.production_lots, 2);
    }

    #[test]
    fn garbage_and_negative_answers_are_rejected() {
        assert!(parse_decisions("cheap", "", "").is_err());
        assert!(parse_decisions("", "-3", "").is_err());
        assert!(parse_decisions("", "", "2.5").is_err());
    }

    #[test]
    fn reads_three_answers_per_quarter() {
        let (d, out) = read("14.5\n3\n1\n");
        assert_eq!(d.sales_price, Some(dec!(14.5)));
        assert_eq!(d.marketing_budget, dec!(3));
        assert_eq!(d.production_lots, 1);
        assert!(out.contains("QUARTER 1 - DECISIONS"));
        assert!(out.contains("Sales price (default 13.0 M)"));
    }

    #[test]
    fn invalid_input_falls_back_to_defaults() {
        let (d, out) = read("abc\n\n\n");
        assert_eq!(d, Decisions::default());
        assert!(out.contains("Using default decisions."));
    }

    #[test]
    fn end_of_input_means_defaults() {
        let (d, _) = read("");
        assert_eq!(d, Decisions::default());
    }
}
