//! Money handling: minor-unit formatting and card fee estimates.
//!
//! All amounts are integers in the currency's minor units (cents for USD,
//! whole yen for JPY) so no floating point is involved anywhere.

mod currency;
mod fees;

pub use currency::{Currency, format_minor_units, format_number, parse_major_units};
pub use fees::{CardProvider, FeeEstimate, estimate_card_fee};
