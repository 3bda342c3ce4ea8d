use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use ubl_invoice::core::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn reference_invoice() -> Invoice {
    let mut inv = Invoice::with_issue_date("INV-12345", date(2024, 6, 15));
    inv.set_supplier("ABC Supplies Ltd", "BE0123456789");
    inv.supplier.postal_address =
        PostalAddress::new("123 Supplier Street", "Supplier City", "12345", "BE");
    inv.set_customer("XYZ Corp", "BE9876543210");
    inv.customer.postal_address =
        PostalAddress::new("789 Customer Avenue", "Customer Town", "67890", "BE");
    inv.set_payment_means("9999999999", "GEBABEBB");
    inv.set_payment_terms("You get a free sticker when you pay fast");
    inv.add_lines(&[LineInput::new(
        dec!(10),
        dec!(100),
        dec!(21),
        "Product A",
        "High-quality item",
    )]);
    inv
}

// --- Reference invoice ---

#[test]
fn reference_invoice_figures() {
    let inv = reference_invoice();

    assert_eq!(inv.lines.len(), 1);
    assert_eq!(inv.lines[0].id, "1");
    assert_eq!(inv.lines[0].line_extension_amount.value, dec!(1000.00));
    assert_eq!(inv.lines[0].tax_total.tax_amount.value, dec!(210.00));

    assert_eq!(inv.monetary_total.line_extension_amount.value, dec!(1000.00));
    assert_eq!(inv.monetary_total.tax_exclusive_amount.value, dec!(1000.00));
    assert_eq!(inv.tax_total.tax_amount.value, dec!(210.00));
    assert_eq!(inv.monetary_total.tax_inclusive_amount.value, dec!(1210.00));
    assert_eq!(inv.monetary_total.payable_amount.value, dec!(1210.00));

    assert_eq!(inv.tax_total.subtotals.len(), 1);
    let sub = &inv.tax_total.subtotals[0];
    assert_eq!(sub.tax_category.percent, dec!(21));
    assert_eq!(sub.tax_category.id, "S");
    assert_eq!(sub.tax_category.name, "03");
    assert_eq!(sub.tax_category.tax_scheme.id, "VAT");
    assert_eq!(sub.taxable_amount.value, dec!(1000.00));
}

#[test]
fn reference_invoice_parties() {
    let inv = reference_invoice();
    assert_eq!(inv.supplier.name, "ABC Supplies Ltd");
    assert_eq!(inv.supplier.postal_address.city_name, "Supplier City");
    assert_eq!(inv.customer.tax_scheme.company_id, "BE9876543210");
    assert_eq!(inv.customer.postal_address.postal_zone, "67890");
}

// --- Line numbering ---

#[test]
fn line_ids_follow_input_order() {
    let mut inv = Invoice::with_issue_date("INV-2", date(2024, 1, 1));
    let inputs: Vec<LineInput> = ["Zeta", "Alpha", "Mu", "Alpha"]
        .iter()
        .map(|n| LineInput::new(dec!(1), dec!(1), dec!(21), *n, ""))
        .collect();
    inv.add_lines(&inputs);

    let ids: Vec<&str> = inv.lines.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3", "4"]);
    let names: Vec<&str> = inv.lines.iter().map(|l| l.item.name.as_str()).collect();
    assert_eq!(names, ["Zeta", "Alpha", "Mu", "Alpha"]);
}

// --- Mixed percentages ---

#[test]
fn mixed_percentages_keep_line_labels() {
    let mut inv = Invoice::with_issue_date("INV-3", date(2024, 1, 1));
    inv.add_lines(&[
        LineInput::new(dec!(2), dec!(50), dec!(6), "Book", ""),
        LineInput::new(dec!(1), dec!(200), dec!(12), "Meal", ""),
        LineInput::new(dec!(1), dec!(10), dec!(21), "Pen", ""),
    ]);

    let labels: Vec<Decimal> = inv
        .lines
        .iter()
        .map(|l| l.item.classified_tax_category.percent)
        .collect();
    assert_eq!(labels, [dec!(6), dec!(12), dec!(21)]);

    // Tax is computed at the invoice-wide rate for every line.
    let taxes: Vec<Decimal> = inv.lines.iter().map(|l| l.tax_total.tax_amount.value).collect();
    assert_eq!(taxes, [dec!(21.00), dec!(42.00), dec!(2.10)]);
    assert_eq!(inv.tax_total.tax_amount.value, dec!(65.10));
    assert_eq!(inv.tax_total.subtotals[0].tax_category.percent, dec!(21));
    assert_eq!(inv.monetary_total.payable_amount.value, dec!(375.10));
}

// --- Rounding ---

#[test]
fn half_cent_rounds_away_from_zero() {
    let mut inv = Invoice::with_issue_date("INV-4", date(2024, 1, 1));
    // 3 × 0.335 = 1.005 → 1.01; tax 1.01 × 21 % = 0.2121 → 0.21
    inv.add_lines(&[LineInput::new(dec!(3), dec!(0.335), dec!(21), "Screw", "")]);
    assert_eq!(inv.lines[0].line_extension_amount.value, dec!(1.01));
    assert_eq!(inv.lines[0].tax_total.tax_amount.value, dec!(0.21));
    assert_eq!(inv.monetary_total.payable_amount.value, dec!(1.22));
}

#[test]
fn tax_rounding_per_line_differs_from_rounding_the_sum() {
    let mut inv = Invoice::with_issue_date("INV-5", date(2024, 1, 1));
    // Each line: 0.10 × 21 % = 0.021 → 0.02. Rounding the sum would give 0.21.
    let lines: Vec<LineInput> = (0..10)
        .map(|i| LineInput::new(dec!(1), dec!(0.10), dec!(21), format!("Item {i}"), ""))
        .collect();
    inv.add_lines(&lines);
    assert_eq!(inv.monetary_total.line_extension_amount.value, dec!(1.00));
    assert_eq!(inv.tax_total.tax_amount.value, dec!(0.20));
    assert_eq!(inv.monetary_total.tax_inclusive_amount.value, dec!(1.20));
}

// --- Permissive inputs ---

#[test]
fn empty_line_list() {
    let mut inv = Invoice::with_issue_date("INV-6", date(2024, 1, 1));
    inv.add_lines(&[]);
    assert!(inv.lines.is_empty());
    assert!(inv.monetary_total.line_extension_amount.value.is_zero());
    assert!(inv.monetary_total.tax_exclusive_amount.value.is_zero());
    assert!(inv.monetary_total.tax_inclusive_amount.value.is_zero());
    assert!(inv.monetary_total.payable_amount.value.is_zero());
    assert!(inv.tax_total.tax_amount.value.is_zero());
}

#[test]
fn zero_quantity_line() {
    let mut inv = Invoice::with_issue_date("INV-7", date(2024, 1, 1));
    inv.add_lines(&[LineInput::new(dec!(0), dec!(99.99), dec!(21), "Free", "")]);
    assert_eq!(inv.lines.len(), 1);
    assert!(inv.monetary_total.payable_amount.value.is_zero());
}

// --- Setters replace ---

#[test]
fn setters_replace_previous_values() {
    let mut inv = reference_invoice();
    inv.set_customer("Other BV", "NL123456789B01");
    inv.set_payment_means("BE68539007547034", "BBRUBEBB");
    assert_eq!(inv.customer.name, "Other BV");
    assert_eq!(inv.customer.postal_address, PostalAddress::default());
    assert_eq!(
        inv.payment_means.as_ref().unwrap().payee_financial_account.id,
        "BE68539007547034"
    );
    // Totals are untouched by party/payment changes.
    assert_eq!(inv.monetary_total.payable_amount.value, dec!(1210.00));
}

#[test]
fn order_reference_defaults_to_id() {
    let mut inv = Invoice::with_issue_date("INV-8", date(2024, 12, 15));
    assert_eq!(inv.order_reference, "INV-8");
    assert_eq!(inv.due_date, date(2025, 1, 14));
    inv.set_order_reference("PO-1");
    inv.set_due_date(date(2025, 2, 1));
    assert_eq!(inv.order_reference, "PO-1");
    assert_eq!(inv.due_date, date(2025, 2, 1));
}

#[test]
fn model_serializes_with_serde() {
    fn assert_serde<T: serde::Serialize + serde::de::DeserializeOwned>() {}
    assert_serde::<Invoice>();
}
