//! Fixed currency list, symbol lookup and optional conversion rates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Currency {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
}

pub const CURRENCIES: &[Currency] = &[
    Currency { code: "PKR", name: "Pakistani Rupee", symbol: "₨" },
    Currency { code: "USD", name: "US Dollar", symbol: "$" },
    Currency { code: "EUR", name: "Euro", symbol: "€" },
    Currency { code: "GBP", name: "British Pound", symbol: "£" },
    Currency { code: "CAD", name: "Canadian Dollar", symbol: "C$" },
    Currency { code: "AUD", name: "Australian Dollar", symbol: "A$" },
    Currency { code: "JPY", name: "Japanese Yen", symbol: "¥" },
];

/// Used when a code is not in [`CURRENCIES`].
pub const DEFAULT_SYMBOL: &str = "$";

pub fn find(code: &str) -> Option<&'static Currency> {
    CURRENCIES.iter().find(|c| c.code.eq_ignore_ascii_case(code.trim()))
}

pub fn symbol_for(code: &str) -> &'static str {
    match find(code) {
        Some(currency) => currency.symbol,
        None => {
            tracing::warn!(code, fallback = DEFAULT_SYMBOL, "unknown currency code");
            DEFAULT_SYMBOL
        }
    }
}

/// `rates[from][to]` multipliers.
pub type CurrencyRates = BTreeMap<String, BTreeMap<String, f64>>;

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: CurrencyRates,
}

/// Converts `amount` with the rate table. Same currency, or a missing or
/// unusable rate, returns the amount unchanged.
pub fn convert(amount: f64, from: &str, to: &str, rates: &CurrencyRates) -> f64 {
    if from == to {
        return amount;
    }

    match rates.get(from).and_then(|row| row.get(to)) {
        Some(rate) if rate.is_finite() && *rate != 0.0 => amount * rate,
        _ => {
            tracing::warn!(from, to, "no conversion rate found, keeping original amount");
            amount
        }
    }
}

/// Blocking GET of `{ "rates": { "USD": { "EUR": 0.92, ... }, ... } }`.
pub fn fetch_rates(url: &str) -> Result<CurrencyRates> {
    tracing::debug!(url, "fetching currency rates");
    let response: RatesResponse = reqwest::blocking::get(url)?.error_for_status()?.json()?;
    Ok(response.rates)
}
