//! Property-based tests for line aggregation and the UBL round trip.
//!
//! Run with: `cargo test --test proptest_tests`

#![cfg(feature = "ubl")]

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use ubl_invoice::core::*;
use ubl_invoice::ubl::{from_ubl_xml, to_ubl_xml};

fn build(lines: &[LineInput], rate: Decimal) -> Invoice {
    let mut inv = Invoice::with_issue_date("PROP-1", NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
    inv.set_supplier("ACME BV", "NL123456789B01");
    inv.set_customer("Kunde AG", "DE987654321");
    inv.set_payment_means("NL91ABNA0417164300", "ABNANL2A");
    inv.set_standard_rate(rate);
    inv.add_lines(lines);
    inv
}

// ── Proptest Strategies ─────────────────────────────────────────────────────

/// Generate a price with cents (0.01 to 99999.99).
fn arb_price() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Generate a quantity with up to three decimals (0.001 to 1000.000).
fn arb_quantity() -> impl Strategy<Value = Decimal> {
    (1i64..=1_000_000i64).prop_map(|milli| Decimal::new(milli, 3))
}

fn arb_percentage() -> impl Strategy<Value = Decimal> {
    prop_oneof![Just(dec!(0)), Just(dec!(6)), Just(dec!(12)), Just(dec!(21))]
}

fn arb_rate() -> impl Strategy<Value = Decimal> {
    prop_oneof![Just(dec!(21)), Just(dec!(19)), Just(dec!(7.7)), Just(dec!(0))]
}

/// Printable text with spaces, markup characters and newlines anywhere.
fn arb_text() -> impl Strategy<Value = String> {
    "[ -~\näöü€]{0,24}"
}

fn arb_line() -> impl Strategy<Value = LineInput> {
    (arb_quantity(), arb_price(), arb_percentage(), arb_text(), arb_text()).prop_map(
        |(qty, price, pct, name, description)| LineInput::new(qty, price, pct, name, description),
    )
}

/// Generate 0-8 lines.
fn arb_lines() -> impl Strategy<Value = Vec<LineInput>> {
    prop::collection::vec(arb_line(), 0..=8)
}

// ── Property Tests ──────────────────────────────────────────────────────────

proptest! {
    /// Inclusive total is exclusive plus tax, and payable equals inclusive.
    #[test]
    fn totals_are_consistent(lines in arb_lines(), rate in arb_rate()) {
        let inv = build(&lines, rate);
        let mt = &inv.monetary_total;
        prop_assert_eq!(
            mt.tax_inclusive_amount.value,
            mt.tax_exclusive_amount.value + inv.tax_total.tax_amount.value
        );
        prop_assert_eq!(mt.payable_amount.value, mt.tax_inclusive_amount.value);
        prop_assert_eq!(mt.line_extension_amount.value, mt.tax_exclusive_amount.value);
        prop_assert!(inv.check_totals().is_empty(), "{:?}", inv.check_totals());
    }

    /// Exclusive total is the sum of individually rounded line amounts.
    #[test]
    fn exclusive_is_sum_of_rounded_lines(lines in arb_lines()) {
        let inv = build(&lines, dec!(21));
        let expected: Decimal = lines.iter().map(|l| round2(l.quantity * l.unit_price)).sum();
        prop_assert_eq!(inv.monetary_total.tax_exclusive_amount.value, expected);

        let expected_tax: Decimal = lines
            .iter()
            .map(|l| round2(round2(l.quantity * l.unit_price) * dec!(21) / dec!(100)))
            .sum();
        prop_assert_eq!(inv.tax_total.tax_amount.value, expected_tax);
    }

    /// Line ids run 1..n in input order and keep the input names.
    #[test]
    fn line_ids_are_contiguous(lines in arb_lines()) {
        let inv = build(&lines, dec!(21));
        prop_assert_eq!(inv.lines.len(), lines.len());
        for (i, (line, input)) in inv.lines.iter().zip(&lines).enumerate() {
            prop_assert_eq!(&line.id, &(i + 1).to_string());
            prop_assert_eq!(&line.item.name, &input.name);
            prop_assert!(line.tax_total.subtotals.is_empty());
        }
        prop_assert_eq!(inv.tax_total.subtotals.len(), 1);
    }

    /// round2 is idempotent and moves a value by at most half a cent.
    #[test]
    fn round2_is_stable(mantissa in -1_000_000_000i64..1_000_000_000i64, scale in 0u32..6) {
        let value = Decimal::new(mantissa, scale);
        let once = round2(value);
        prop_assert_eq!(round2(once), once);
        prop_assert!((once - value).abs() <= dec!(0.005));
    }

    /// to_ubl_xml() → from_ubl_xml() preserves every field of a default-rate invoice.
    #[test]
    fn ubl_roundtrip_preserves_invoice(
        lines in arb_lines(),
        supplier in arb_text(),
        note in arb_text(),
    ) {
        let mut inv = build(&lines, DEFAULT_STANDARD_RATE);
        inv.set_supplier(supplier, "NL123456789B01");
        inv.set_payment_terms(note);
        let xml = to_ubl_xml(&inv).unwrap();
        let parsed = from_ubl_xml(&xml).unwrap();
        prop_assert_eq!(parsed, inv);
    }

    /// Totals read back from a document with a custom rate still add up.
    #[test]
    fn ubl_roundtrip_keeps_totals(lines in arb_lines(), rate in arb_rate()) {
        let inv = build(&lines, rate);
        let parsed = from_ubl_xml(&to_ubl_xml(&inv).unwrap()).unwrap();
        prop_assert_eq!(&parsed.monetary_total, &inv.monetary_total);
        prop_assert_eq!(&parsed.tax_total, &inv.tax_total);
        prop_assert!(parsed.check_totals().is_empty());
    }
}
