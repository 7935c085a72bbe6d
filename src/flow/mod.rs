//! Simulated remittance journey.
//!
//! Holds the static data model of the quick-action simulation: the ordered
//! step table, the supported destination currencies with their exchange
//! rates, lenient amount parsing, and the run summary.

pub mod chart;
pub mod sequencer;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub use sequencer::{
    Phase, RunHandle, RunSnapshot, SequencerEvent, SimulationParams, StepSequencer,
};

/// Flat processing fee charged per remittance, in USD.
///
/// Not derived from the amount.
pub const FLAT_FEE_USD: f64 = 0.50;

/// Destination currencies supported by the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Ngn,
    Ghs,
    Brl,
    Kes,
}

#[derive(Error, Debug, PartialEq)]
#[error("unsupported currency '{0}' (expected one of NGN, GHS, BRL, KES)")]
pub struct UnknownCurrency(pub String);

impl Currency {
    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Ngn => "NGN",
            Currency::Ghs => "GHS",
            Currency::Brl => "BRL",
            Currency::Kes => "KES",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Currency::Ngn => "Nigerian Naira",
            Currency::Ghs => "Ghanaian Cedi",
            Currency::Brl => "Brazilian Real",
            Currency::Kes => "Kenyan Shilling",
        }
    }

    /// Corridor label used for display and filtering (e.g. `USA-NGN`)
    pub fn corridor(&self) -> String {
        format!("USA-{}", self.code())
    }

    /// All supported currencies in selector order
    pub fn all() -> &'static [Currency] {
        &[Currency::Ngn, Currency::Ghs, Currency::Brl, Currency::Kes]
    }

    pub fn next(&self) -> Currency {
        match self {
            Currency::Ngn => Currency::Ghs,
            Currency::Ghs => Currency::Brl,
            Currency::Brl => Currency::Kes,
            Currency::Kes => Currency::Ngn,
        }
    }

    pub fn prev(&self) -> Currency {
        match self {
            Currency::Ngn => Currency::Kes,
            Currency::Ghs => Currency::Ngn,
            Currency::Brl => Currency::Ghs,
            Currency::Kes => Currency::Brl,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NGN" => Ok(Currency::Ngn),
            "GHS" => Ok(Currency::Ghs),
            "BRL" => Ok(Currency::Brl),
            "KES" => Ok(Currency::Kes),
            _ => Err(UnknownCurrency(s.to_string())),
        }
    }
}

/// Fixed USD exchange rates, one field per supported currency.
///
/// Kept as named fields rather than a map so layered config sources
/// (env vars in particular) can override a single rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRates {
    #[serde(default = "default_ngn_rate")]
    pub ngn: f64,
    #[serde(default = "default_ghs_rate")]
    pub ghs: f64,
    #[serde(default = "default_brl_rate")]
    pub brl: f64,
    #[serde(default = "default_kes_rate")]
    pub kes: f64,
}

fn default_ngn_rate() -> f64 {
    1650.0
}

fn default_ghs_rate() -> f64 {
    15.5
}

fn default_brl_rate() -> f64 {
    5.2
}

fn default_kes_rate() -> f64 {
    158.0
}

impl ExchangeRates {
    /// Units of `currency` per 1 USD
    pub fn rate(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Ngn => self.ngn,
            Currency::Ghs => self.ghs,
            Currency::Brl => self.brl,
            Currency::Kes => self.kes,
        }
    }

    pub fn convert(&self, amount_usd: f64, currency: Currency) -> f64 {
        amount_usd * self.rate(currency)
    }
}

impl Default for ExchangeRates {
    fn default() -> Self {
        Self {
            ngn: default_ngn_rate(),
            ghs: default_ghs_rate(),
            brl: default_brl_rate(),
            kes: default_kes_rate(),
        }
    }
}

/// One named, fixed-duration stage of the simulated journey
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub label: String,
    pub duration: Duration,
}

impl Step {
    pub fn new(label: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            label: label.into(),
            duration: Duration::from_millis(duration_ms),
        }
    }
}

/// Build the ordered journey for a destination currency.
///
/// Only the off-ramp label depends on the currency.
pub fn journey_steps(currency: Currency) -> Vec<Step> {
    vec![
        Step::new("Fiat Input (Circle ACH)", 100),
        Step::new("Rust Router Validation", 200),
        Step::new("Polygon USDC Transfer", 2300),
        Step::new("x402 Micropay Split", 300),
        Step::new(format!("{} Off-ramp", currency.code()), 1800),
        Step::new("Bank/Wallet Payout", 3500),
        Step::new("$HYPE Rewards Trigger", 100),
    ]
}

/// Sum of all step durations
pub fn planned_duration(steps: &[Step]) -> Duration {
    steps.iter().map(|s| s.duration).sum()
}

/// Status tag shared by the simulator progress list and the flow chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepStatus {
    /// Stage finished
    Completed,
    /// Stage currently processing
    Pending,
    /// Stage not reached yet
    Waiting,
}

impl StepStatus {
    /// Status of step `index` given how many steps have completed
    pub fn for_index(index: usize, current_index: usize) -> Self {
        if index < current_index {
            StepStatus::Completed
        } else if index == current_index {
            StepStatus::Pending
        } else {
            StepStatus::Waiting
        }
    }
}

/// Parse a user-entered USD amount.
///
/// Lenient: the longest leading numeric prefix is used (`"12abc"` is 12),
/// and anything without one, negative, or non-finite becomes 0.
pub fn parse_amount(input: &str) -> f64 {
    match numeric_prefix(input.trim()).parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return "";
    }

    // Exponent only counts when digits follow it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    &s[..end]
}

/// Result of a completed simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub amount_usd: f64,
    pub currency: Currency,
    pub rate: f64,
    pub converted_amount: f64,
    pub fee_usd: f64,
    /// Sum of the declared step durations
    pub planned_elapsed: Duration,
    /// Wall-clock time from `run()` to the last step firing
    pub actual_elapsed: Duration,
}

impl Summary {
    pub fn new(
        amount_usd: f64,
        currency: Currency,
        rates: &ExchangeRates,
        planned_elapsed: Duration,
        actual_elapsed: Duration,
    ) -> Self {
        let rate = rates.rate(currency);
        Self {
            amount_usd,
            currency,
            rate,
            converted_amount: amount_usd * rate,
            fee_usd: FLAT_FEE_USD,
            planned_elapsed,
            actual_elapsed,
        }
    }

    /// One-line description, e.g. `$100 USD → 165,000 NGN in 8.3s`
    pub fn headline(&self) -> String {
        format!(
            "${} USD → {} {} in {:.1}s",
            format_amount(self.amount_usd),
            format_amount(self.converted_amount),
            self.currency,
            self.planned_elapsed.as_secs_f64()
        )
    }
}

/// Format a non-negative amount with thousands separators and at most
/// three fraction digits (`165000` → `165,000`, `77.5` → `77.5`).
pub fn format_amount(value: f64) -> String {
    let rounded = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((&rounded, ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && rounded.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        "-"
    } else {
        ""
    };

    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_from_str_case_insensitive() {
        assert_eq!("ngn".parse::<Currency>().unwrap(), Currency::Ngn);
        assert_eq!(" KES ".parse::<Currency>().unwrap(), Currency::Kes);
        assert!("USD".parse::<Currency>().is_err());
    }

    #[test]
    fn test_currency_cycle_covers_all() {
        let mut c = Currency::Ngn;
        for expected in Currency::all().iter().skip(1) {
            c = c.next();
            assert_eq!(c, *expected);
        }
        assert_eq!(c.next(), Currency::Ngn);
        assert_eq!(Currency::Ngn.prev(), Currency::Kes);
    }

    #[test]
    fn test_currency_serializes_as_code() {
        let json = serde_json::to_string(&Currency::Brl).unwrap();
        assert_eq!(json, "\"BRL\"");
        assert_eq!(Currency::Ghs.corridor(), "USA-GHS");
    }

    #[test]
    fn test_default_rates() {
        let rates = ExchangeRates::default();
        assert_eq!(rates.rate(Currency::Ngn), 1650.0);
        assert_eq!(rates.rate(Currency::Ghs), 15.5);
        assert_eq!(rates.rate(Currency::Brl), 5.2);
        assert_eq!(rates.rate(Currency::Kes), 158.0);
    }

    #[test]
    fn test_convert_is_exact_product() {
        let rates = ExchangeRates::default();
        for &currency in Currency::all() {
            for amount in [0.0, 1.0, 12.5, 100.0, 999.99] {
                assert_eq!(
                    rates.convert(amount, currency),
                    amount * rates.rate(currency)
                );
            }
        }
    }

    #[test]
    fn test_journey_steps_table() {
        let steps = journey_steps(Currency::Ghs);
        let durations: Vec<u128> = steps.iter().map(|s| s.duration.as_millis()).collect();
        assert_eq!(durations, vec![100, 200, 2300, 300, 1800, 3500, 100]);
        assert_eq!(steps[4].label, "GHS Off-ramp");
        assert_eq!(planned_duration(&steps), Duration::from_millis(8300));
    }

    #[test]
    fn test_step_status_for_index() {
        assert_eq!(StepStatus::for_index(0, 2), StepStatus::Completed);
        assert_eq!(StepStatus::for_index(2, 2), StepStatus::Pending);
        assert_eq!(StepStatus::for_index(3, 2), StepStatus::Waiting);
        assert_eq!(StepStatus::for_index(6, 7), StepStatus::Completed);
    }

    #[test]
    fn test_parse_amount_valid() {
        assert_eq!(parse_amount("100"), 100.0);
        assert_eq!(parse_amount(" 12.75 "), 12.75);
        assert_eq!(parse_amount(".5"), 0.5);
        assert_eq!(parse_amount("1e3"), 1000.0);
    }

    #[test]
    fn test_parse_amount_lenient() {
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("12abc"), 12.0);
        assert_eq!(parse_amount("3.5.1"), 3.5);
        assert_eq!(parse_amount("7e"), 7.0);
        assert_eq!(parse_amount("-5"), 0.0);
        assert_eq!(parse_amount("-0"), 0.0);
        assert_eq!(parse_amount("."), 0.0);
    }

    #[test]
    fn test_summary_new() {
        let rates = ExchangeRates::default();
        let summary = Summary::new(
            100.0,
            Currency::Ngn,
            &rates,
            Duration::from_millis(8300),
            Duration::from_millis(8300),
        );
        assert_eq!(summary.converted_amount, 165_000.0);
        assert_eq!(summary.fee_usd, 0.50);
        assert_eq!(summary.headline(), "$100 USD → 165,000 NGN in 8.3s");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(165_000.0), "165,000");
        assert_eq!(format_amount(1_234_567.891), "1,234,567.891");
        assert_eq!(format_amount(77.5), "77.5");
        assert_eq!(format_amount(999.0), "999");
    }
}
