//! # Domain Models
//!
//! Rate rows flowing through the pipeline and the fixed currency catalog.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`RateRecord`] | Extracted row with optional cash/spot buy and sell quotes |
//! | [`QuotePair`] | Buy/sell view of one quote category |
//! | [`CalculatedRate`] | Repaired row plus derived mid rates |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! ## Invariants
//!
//! - No rate field is ever NaN or infinite.
//! - `cash_mid` is present iff both `cash_buy` and `cash_sell` are, and
//!   equals their mean; the same holds for `spot_mid`.

pub mod currency;
mod models;
mod timestamp;

pub use models::{CalculatedRate, QuotePair, RateRecord};
pub use timestamp::UtcDateTime;
