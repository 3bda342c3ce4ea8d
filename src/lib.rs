//! # ubl-invoice
//!
//! Builds Peppol BIS Billing 3.0 / UBL 2.1 invoices from parties, payment
//! details and a flat list of line items.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Every line amount, line tax and the grand total is rounded to cents
//! (half away from zero); rollups are exact sums of the rounded line figures.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use ubl_invoice::core::*;
//! use rust_decimal_macros::dec;
//!
//! let mut invoice = Invoice::with_issue_date("INV-12345", NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
//! invoice.set_supplier("ABC Supplies Ltd", "BE0123456789");
//! invoice.supplier.postal_address = PostalAddress::new("123 Supplier Street", "Supplier City", "12345", "BE");
//! invoice.set_customer("XYZ Corp", "BE9876543210");
//! invoice.set_payment_means("9999999999", "GEBABEBB");
//! invoice.set_payment_terms("You get a free sticker when you pay fast");
//! invoice.add_lines(&[LineInput::new(dec!(10), dec!(100), dec!(21), "Product A", "High-quality item")]);
//!
//! assert_eq!(invoice.tax_total.tax_amount.value, dec!(210.00));
//! assert_eq!(invoice.monetary_total.payable_amount.value, dec!(1210.00));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Document model, line aggregation |
//! | `ubl` (default) | UBL 2.1 XML output and parsing, attachment embedding |
//! | `validate` | Schema validator boundary (structural check, xmllint) |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "ubl")]
pub mod ubl;

#[cfg(feature = "validate")]
pub mod validate;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
