//! UBL 2.1 / Peppol BIS Billing 3.0 emission and parsing.
//!
//! # Example
//!
//! ```
//! use ubl_invoice::core::*;
//! use ubl_invoice::ubl;
//! use rust_decimal_macros::dec;
//!
//! let mut invoice = Invoice::new("INV-001");
//! invoice.set_supplier("ABC Supplies Ltd", "BE0123456789");
//! invoice.set_customer("XYZ Corp", "BE9876543210");
//! invoice.add_lines(&[LineInput::new(dec!(2), dec!(50), dec!(21), "Widget", "")]);
//!
//! let xml = ubl::to_ubl_xml(&invoice).unwrap();
//! let parsed = ubl::from_ubl_xml(&xml).unwrap();
//! assert_eq!(parsed.monetary_total.payable_amount.value, dec!(121));
//! ```

mod attachment;
mod reader;
mod writer;
pub(crate) mod xml_utils;

pub use attachment::detect_mime;
pub use reader::from_ubl_xml;
pub use writer::to_ubl_xml;

/// Specification identifier (BT-24).
pub const CUSTOMIZATION_ID: &str = "urn:cen.eu:en16931:2017";

/// Peppol BIS Billing 3.0 profile identifier (BT-23).
pub const PROFILE_ID: &str = "urn:fdc:peppol.eu:2017:poacc:billing:01:1.0";

/// UBL 2.1 namespace URIs.
pub mod ns {
    pub const INVOICE: &str = "urn:oasis:names:specification:ubl:schema:xsd:Invoice-2";
    pub const CAC: &str =
        "urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2";
    pub const CBC: &str = "urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2";
}
