use quick_xml::Reader;
use quick_xml::events::Event;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::{SchemaValidator, SchemaViolation};
use crate::ubl::ns;

/// Top-level Invoice children in UBL 2.1 order: (local name, required, repeatable).
const TOP_LEVEL: &[(&str, bool, bool)] = &[
    ("UBLExtensions", false, false),
    ("UBLVersionID", false, false),
    ("CustomizationID", false, false),
    ("ProfileID", false, false),
    ("ID", true, false),
    ("IssueDate", true, false),
    ("DueDate", false, false),
    ("InvoiceTypeCode", false, false),
    ("Note", false, true),
    ("TaxPointDate", false, false),
    ("DocumentCurrencyCode", false, false),
    ("TaxCurrencyCode", false, false),
    ("AccountingCost", false, false),
    ("BuyerReference", false, false),
    ("InvoicePeriod", false, true),
    ("OrderReference", false, false),
    ("BillingReference", false, true),
    ("DespatchDocumentReference", false, true),
    ("ReceiptDocumentReference", false, true),
    ("OriginatorDocumentReference", false, true),
    ("ContractDocumentReference", false, true),
    ("AdditionalDocumentReference", false, true),
    ("ProjectReference", false, true),
    ("AccountingSupplierParty", true, false),
    ("AccountingCustomerParty", true, false),
    ("PayeeParty", false, false),
    ("TaxRepresentativeParty", false, false),
    ("Delivery", false, true),
    ("PaymentMeans", false, true),
    ("PaymentTerms", false, true),
    ("AllowanceCharge", false, true),
    ("TaxTotal", false, true),
    ("LegalMonetaryTotal", true, false),
    ("InvoiceLine", true, true),
];

/// In-process structural check of a UBL Invoice.
///
/// Catches malformed XML, a wrong root element or namespace, top-level
/// elements out of order, duplicated or missing, and amounts that are not
/// decimals. It does not replace a full XSD validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator;

impl StructuralValidator {
    pub fn new() -> Self {
        Self
    }
}

fn local_name(name: &[u8]) -> String {
    let name = String::from_utf8_lossy(name);
    match name.rsplit_once(':') {
        Some((_, local)) => local.to_string(),
        None => name.into_owned(),
    }
}

fn line_at(xml: &[u8], pos: u64) -> usize {
    let end = (pos as usize).min(xml.len());
    xml[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

impl SchemaValidator for StructuralValidator {
    fn validate(&self, xml: &[u8]) -> Result<(), Vec<SchemaViolation>> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut errors = Vec::new();
        let mut buf = Vec::new();
        let mut depth = 0usize;
        let mut seen_root = false;
        let mut last_index: Option<usize> = None;
        let mut present = vec![false; TOP_LEVEL.len()];
        let mut current_amount: Option<String> = None;
        let mut root_end_line = None;

        loop {
            let event = reader.read_event_into(&mut buf);
            let line = line_at(xml, reader.buffer_position());
            match event {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    let is_empty = matches!(event, Ok(Event::Empty(_)));
                    let local = local_name(e.name().as_ref());
                    current_amount = None;

                    if depth == 0 {
                        if seen_root {
                            errors.push(SchemaViolation::new(
                                Some(line),
                                "content after the root element",
                            ));
                        }
                        seen_root = true;
                        if local != "Invoice" {
                            errors.push(SchemaViolation::new(
                                Some(line),
                                format!("root element is '{local}', expected 'Invoice'"),
                            ));
                        }
                        let declares_ns = e.attributes().flatten().any(|a| {
                            let key = a.key.as_ref();
                            (key == b"xmlns" || key.starts_with(b"xmlns:"))
                                && a.value.as_ref() == ns::INVOICE.as_bytes()
                        });
                        if !declares_ns {
                            errors.push(SchemaViolation::new(
                                Some(line),
                                format!("root element is not in namespace {}", ns::INVOICE),
                            ));
                        }
                    } else if depth == 1 {
                        match TOP_LEVEL.iter().position(|(n, _, _)| *n == local) {
                            None => errors.push(SchemaViolation::new(
                                Some(line),
                                format!("element '{local}' is not expected here"),
                            )),
                            Some(idx) => {
                                let (_, _, repeatable) = TOP_LEVEL[idx];
                                match last_index {
                                    Some(last) if idx < last => {
                                        errors.push(SchemaViolation::new(
                                            Some(line),
                                            format!(
                                                "element '{local}' must come before '{}'",
                                                TOP_LEVEL[last].0
                                            ),
                                        ));
                                    }
                                    Some(last) if idx == last && !repeatable => {
                                        errors.push(SchemaViolation::new(
                                            Some(line),
                                            format!("element '{local}' may occur only once"),
                                        ));
                                    }
                                    _ => last_index = Some(idx),
                                }
                                present[idx] = true;
                            }
                        }
                    }

                    if local.ends_with("Amount") {
                        current_amount = Some(local);
                    }
                    if !is_empty {
                        depth += 1;
                    }
                }
                Ok(Event::Text(ref e)) => {
                    if let Some(name) = current_amount.take() {
                        let text = e.unescape().map(|t| t.into_owned()).unwrap_or_default();
                        if Decimal::from_str(text.trim()).is_err() {
                            errors.push(SchemaViolation::new(
                                Some(line),
                                format!("'{name}' value '{text}' is not a decimal"),
                            ));
                        }
                    }
                }
                Ok(Event::End(_)) => {
                    current_amount = None;
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        root_end_line = Some(line);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    errors.push(SchemaViolation::new(Some(line), format!("malformed XML: {e}")));
                    return Err(errors);
                }
                _ => {}
            }
            buf.clear();
        }

        if !seen_root {
            errors.push(SchemaViolation::new(None, "document has no root element"));
        } else {
            for (idx, (name, required, _)) in TOP_LEVEL.iter().enumerate() {
                if *required && !present[idx] {
                    errors.push(SchemaViolation::new(
                        root_end_line,
                        format!("missing required element '{name}'"),
                    ));
                }
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
