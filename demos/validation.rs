use chrono::NaiveDate;
use rust_decimal_macros::dec;
use ubl_invoice::core::*;
use ubl_invoice::ubl;
use ubl_invoice::validate::{SchemaValidator, StructuralValidator, XmllintValidator};

fn report(name: &str, result: Result<(), Vec<ubl_invoice::validate::SchemaViolation>>) {
    match result {
        Ok(()) => println!("{name}: valid"),
        Err(violations) => {
            println!("{name}: {} violation(s)", violations.len());
            for v in &violations {
                println!("  {v}");
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut invoice = Invoice::with_issue_date(
        "INV-2024-001",
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
    );
    invoice.set_supplier("ABC Supplies Ltd", "BE0123456789");
    invoice.set_customer("XYZ Corp", "BE9876543210");
    invoice.add_lines(&[LineInput::new(dec!(10), dec!(150), dec!(21), "Consulting", "")]);

    // Arithmetic consistency of the model
    let mismatches = invoice.check_totals();
    println!("Totals check: {} mismatch(es)", mismatches.len());

    let xml = ubl::to_ubl_xml(&invoice)?;
    report("Structural", StructuralValidator::new().validate(&xml));

    // An invoice without lines is structurally incomplete
    let mut empty = invoice.clone();
    empty.add_lines(&[]);
    report("Structural (no lines)", StructuralValidator::new().validate(&ubl::to_ubl_xml(&empty)?));

    // Full XSD validation: pass the path of UBL-Invoice-2.1.xsd as first argument.
    if let Some(schema) = std::env::args().nth(1) {
        report("xmllint", XmllintValidator::new(schema).validate(&xml));
    }
    Ok(())
}
