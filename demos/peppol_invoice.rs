use chrono::NaiveDate;
use rust_decimal_macros::dec;
use ubl_invoice::core::*;
use ubl_invoice::ubl;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut invoice = Invoice::with_issue_date(
        "INV-12345",
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
    );
    invoice.set_supplier("ABC Supplies Ltd", "BE0123456789");
    invoice.set_supplier_address(PostalAddress::new(
        "123 Supplier Street",
        "Supplier City",
        "12345",
        "BE",
    ));
    invoice.set_customer("XYZ Corp", "BE9876543210");
    invoice.set_customer_address(PostalAddress::new(
        "789 Customer Avenue",
        "Customer Town",
        "67890",
        "BE",
    ));
    invoice.set_payment_means("9999999999", "GEBABEBB");
    invoice.set_payment_terms("You get a free sticker when you pay fast");

    // Optional attachment: first command-line argument is a file path.
    if let Some(path) = std::env::args().nth(1) {
        invoice.add_attachment(&path, "Invoice")?;
        let doc = &invoice.attachments[0].embedded_document;
        eprintln!("Attached {} ({})", doc.filename, doc.mime_code);
    }

    invoice.add_lines(&[
        LineInput::new(dec!(10), dec!(100), dec!(21), "Product A", "High-quality item"),
        LineInput::new(dec!(3), dec!(12.50), dec!(21), "Product B", "").unit("C62"),
    ]);

    let mt = &invoice.monetary_total;
    eprintln!("Invoice: {}", invoice.id);
    eprintln!("Net:     {} {}", mt.tax_exclusive_amount.value, invoice.currency_code);
    eprintln!("VAT:     {} {}", invoice.tax_total.tax_amount.value, invoice.currency_code);
    eprintln!("Due:     {} {}", mt.payable_amount.value, invoice.currency_code);

    let xml = ubl::to_ubl_xml(&invoice)?;
    println!("{}", String::from_utf8(xml)?);
    Ok(())
}
