//! Supported currencies and amount formatting

use crate::error::{DomainError, DomainResult};

/// A currency known to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    /// ISO 4217 code.
    pub code: &'static str,
    /// Display symbol.
    pub symbol: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Number of minor-unit digits.
    pub decimals: u32,
}

const CURRENCIES: [Currency; 5] = [
    Currency {
        code: "USD",
        symbol: "$",
        name: "US Dollar",
        decimals: 2,
    },
    Currency {
        code: "EUR",
        symbol: "€",
        name: "Euro",
        decimals: 2,
    },
    Currency {
        code: "GBP",
        symbol: "£",
        name: "British Pound",
        decimals: 2,
    },
    Currency {
        code: "UZS",
        symbol: "so'm",
        name: "Uzbek Sum",
        decimals: 2,
    },
    Currency {
        code: "JPY",
        symbol: "¥",
        name: "Japanese Yen",
        decimals: 0,
    },
];

/// Decimals assumed for codes missing from the table.
const DEFAULT_DECIMALS: u32 = 2;

impl Currency {
    /// Returns every supported currency.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &CURRENCIES
    }

    /// Looks up a currency by code (case-insensitive).
    #[must_use]
    pub fn lookup(code: &str) -> Option<&'static Self> {
        CURRENCIES
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code.trim()))
    }

    /// Number of minor units in one major unit.
    #[must_use]
    pub const fn minor_per_major(&self) -> u64 {
        10u64.pow(self.decimals)
    }
}

fn symbol_and_decimals(code: &str) -> (String, u32) {
    match Currency::lookup(code) {
        Some(currency) => (currency.symbol.to_string(), currency.decimals),
        None if code.trim().is_empty() => ("$".to_string(), DEFAULT_DECIMALS),
        None => (code.trim().to_string(), DEFAULT_DECIMALS),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

/// Formats an amount in minor units for display.
///
/// The integer part is grouped by thousands with a space. A negative amount
/// puts the sign before the symbol (`-$12.50`, never `$-12.50`).
///
/// ```
/// use purse_domain::money::format_minor_units;
///
/// assert_eq!(format_minor_units(123_456, "USD"), "$1 234.56");
/// assert_eq!(format_minor_units(1_500, "JPY"), "¥1 500");
/// assert_eq!(format_minor_units(-1_250, "USD"), "-$12.50");
/// ```
#[must_use]
pub fn format_minor_units(minor_units: i64, code: &str) -> String {
    let (symbol, decimals) = symbol_and_decimals(code);
    let sign = if minor_units < 0 { "-" } else { "" };
    let abs = minor_units.unsigned_abs();
    let divisor = 10u64.pow(decimals);
    let whole = group_thousands(abs / divisor);

    if decimals == 0 {
        format!("{sign}{symbol}{whole}")
    } else {
        let width = decimals as usize;
        format!("{sign}{symbol}{whole}.{:0width$}", abs % divisor)
    }
}

/// Formats an integer with space-separated thousands.
#[must_use]
pub fn format_number(value: i64) -> String {
    let grouped = group_thousands(value.unsigned_abs());
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Parses a user-entered amount in major units into minor units.
///
/// `"12.5"` in USD becomes `1250`. Parsing is done on the decimal text, so
/// there is no floating point rounding.
///
/// # Errors
///
/// Returns `DomainError::InvalidAmount` if the text is empty, not a plain
/// positive decimal, has more fractional digits than the currency allows,
/// is zero, or overflows.
pub fn parse_major_units(text: &str, code: &str) -> DomainResult<i64> {
    let (_, decimals) = symbol_and_decimals(code);
    let text = text.trim();
    let invalid = |reason: &str| DomainError::InvalidAmount(format!("{text:?}: {reason}"));

    if text.is_empty() {
        return Err(invalid("amount is empty"));
    }

    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("not a number"));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid("not a positive decimal number"));
    }
    if fraction.len() > decimals as usize {
        return Err(invalid(&format!(
            "at most {decimals} decimal places are allowed"
        )));
    }

    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid("amount is too large"))?
    };
    let fraction_value: i64 = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{fraction:0<width$}", width = decimals as usize);
        padded.parse().map_err(|_| invalid("not a number"))?
    };

    let minor = whole
        .checked_mul(10i64.pow(decimals))
        .and_then(|v| v.checked_add(fraction_value))
        .ok_or_else(|| invalid("amount is too large"))?;

    if minor == 0 {
        return Err(invalid("amount must be greater than zero"));
    }
    Ok(minor)
}
