//! Invoice document model and line aggregation.
//!
//! The [`Invoice`] value is the single owned document under construction.
//! Setters replace whole subtrees; [`Invoice::add_lines`] fills lines and
//! every derived total in one step.

mod aggregate;
mod builder;
mod error;
mod types;

pub use aggregate::*;
pub use error::*;
pub use types::*;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Currency used when none is set (ISO 4217).
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Rate applied to every line's tax unless overridden with `set_standard_rate`.
pub const DEFAULT_STANDARD_RATE: Decimal = dec!(21);

/// Unit of measure used when a line does not name one ("mutually defined").
pub const DEFAULT_UNIT_CODE: &str = "ZZ";

/// Days between issue date and due date.
pub const PAYMENT_TERMS_DAYS: u64 = 30;

/// UNTDID 1001: commercial invoice.
pub const COMMERCIAL_INVOICE: &str = "380";

/// UNTDID 4461 code used for payment means.
pub const CREDIT_TRANSFER: &str = "1";

/// UNTDID 5305: standard rate.
pub const STANDARD_RATE_CODE: &str = "S";

/// Category name carried alongside the standard-rate code.
pub const STANDARD_RATE_NAME: &str = "03";

/// Tax scheme identifier for parties and categories.
pub const VAT_SCHEME: &str = "VAT";
