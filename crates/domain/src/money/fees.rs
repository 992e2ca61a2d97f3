//! Client-side card fee estimate for deposits and withdrawals.
//!
//! The estimate is shown before the user confirms an operation. The backend
//! charges the authoritative amount.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Card network used to fund or receive an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardProvider {
    /// Visa
    Visa,
    /// Mastercard
    Mastercard,
    /// UzCard
    Uzcard,
    /// Humo
    Humo,
    /// Any other card network.
    #[default]
    Standard,
}

impl CardProvider {
    /// Fee rate in basis points (1/100 of a percent).
    #[must_use]
    pub const fn rate_bps(self) -> u32 {
        match self {
            Self::Visa | Self::Mastercard => 250,
            Self::Uzcard | Self::Humo => 150,
            Self::Standard => 200,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Visa => "Visa",
            Self::Mastercard => "Mastercard",
            Self::Uzcard => "UzCard",
            Self::Humo => "Humo",
            Self::Standard => "Standard",
        }
    }
}

impl fmt::Display for CardProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CardProvider {
    type Err = DomainError;

    /// Unknown provider names map to `Standard`; only blank input fails.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::InvalidIdentifier(
                "card provider is empty".to_string(),
            ));
        }
        Ok(match s.to_uppercase().as_str() {
            "VISA" => Self::Visa,
            "MASTERCARD" => Self::Mastercard,
            "UZCARD" => Self::Uzcard,
            "HUMO" => Self::Humo,
            _ => Self::Standard,
        })
    }
}

/// Result of a fee estimate, all in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeEstimate {
    /// Amount the user entered.
    pub amount: i64,
    /// Estimated fee, rounded up.
    pub fee: i64,
    /// `amount + fee`.
    pub total: i64,
    /// Rate applied, in basis points.
    pub rate_bps: u32,
}

impl FeeEstimate {
    /// Rate as a percentage (250 bps is 2.5).
    #[must_use]
    pub fn rate_percent(&self) -> f64 {
        f64::from(self.rate_bps) / 100.0
    }
}

/// Estimates the card fee for an amount in minor units.
///
/// `fee = ceil(amount * rate)`, computed in integers so the rounding is exact.
#[must_use]
pub fn estimate_card_fee(amount: i64, provider: CardProvider) -> FeeEstimate {
    let rate_bps = provider.rate_bps();
    let numerator = i128::from(amount) * i128::from(rate_bps);
    let mut fee = numerator / 10_000;
    if numerator % 10_000 > 0 {
        fee += 1;
    }
    let fee = i64::try_from(fee).unwrap_or(i64::MAX);

    FeeEstimate {
        amount,
        fee,
        total: amount.saturating_add(fee),
        rate_bps,
    }
}
