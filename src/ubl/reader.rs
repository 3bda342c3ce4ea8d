use chrono::{Days, NaiveDate};
use quick_xml::Reader;
use quick_xml::events::Event;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::core::*;

/// Parse a UBL Invoice document produced by [`to_ubl_xml`](super::to_ubl_xml).
///
/// Elements are matched by their `cac:`/`cbc:` qualified names. Leaf text
/// is taken verbatim, surrounding whitespace included. The invoice-wide
/// standard rate is not part of the document and comes back as the default.
pub fn from_ubl_xml(xml: &[u8]) -> Result<Invoice, UblError> {
    let mut reader = Reader::from_reader(xml);

    let mut parsed = ParsedInvoice::default();
    let mut path: Vec<String> = Vec::new();
    let mut attrs: Vec<(String, String)> = Vec::new();
    // Text of the innermost open element; only used if it closes with no child.
    let mut text = String::new();
    let mut in_leaf = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                attrs.clear();
                for attr in e.attributes().flatten() {
                    let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                    let value = attr
                        .unescape_value()
                        .map_err(|e| UblError::Xml(format!("bad attribute {key}: {e}")))?
                        .into_owned();
                    attrs.push((key, value));
                }
                parsed.open(&name, &attrs);
                path.push(name);
                text.clear();
                in_leaf = true;
            }
            Ok(Event::Text(ref e)) => {
                if in_leaf {
                    let chunk = e
                        .unescape()
                        .map_err(|e| UblError::Xml(format!("bad text content: {e}")))?;
                    text.push_str(&chunk);
                }
            }
            Ok(Event::CData(ref e)) => {
                if in_leaf {
                    text.push_str(&String::from_utf8_lossy(&e[..]));
                }
            }
            Ok(Event::End(_)) => {
                if in_leaf {
                    parsed.handle_text(&path, &text, &attrs);
                    in_leaf = false;
                }
                let ended = path.pop().unwrap_or_default();
                parsed.close(&ended);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(UblError::Xml(format!(
                    "parse error at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    parsed.into_invoice()
}

/// Text content plus the currencyID/unitCode attribute it was written with.
#[derive(Default, Clone)]
struct RawValue {
    text: String,
    unit: Option<String>,
}

#[derive(Default)]
struct ParsedParty {
    name: Option<String>,
    street: Option<String>,
    city: Option<String>,
    postal: Option<String>,
    country: Option<String>,
    company_id: Option<String>,
    scheme_id: Option<String>,
}

#[derive(Default)]
struct ParsedCategory {
    id: Option<String>,
    name: Option<String>,
    percent: Option<String>,
    scheme_id: Option<String>,
}

#[derive(Default)]
struct ParsedSubtotal {
    taxable_amount: Option<RawValue>,
    tax_amount: Option<RawValue>,
    category: ParsedCategory,
}

#[derive(Default)]
struct ParsedLine {
    id: Option<String>,
    quantity: Option<RawValue>,
    line_amount: Option<RawValue>,
    tax_amount: Option<RawValue>,
    description: Option<String>,
    name: Option<String>,
    category: ParsedCategory,
    price: Option<RawValue>,
}

#[derive(Default)]
struct ParsedAttachment {
    id: Option<String>,
    description: Option<String>,
    content: Option<String>,
    mime_code: Option<String>,
    filename: Option<String>,
}

#[derive(Default)]
struct ParsedInvoice {
    id: Option<String>,
    issue_date: Option<String>,
    due_date: Option<String>,
    type_code: Option<String>,
    currency_code: Option<String>,
    buyer_reference: Option<String>,
    order_reference: Option<String>,
    attachments: Vec<ParsedAttachment>,
    current_attachment: Option<ParsedAttachment>,
    supplier: ParsedParty,
    customer: ParsedParty,
    payment_means_code: Option<String>,
    iban: Option<String>,
    bic: Option<String>,
    payment_note: Option<String>,
    tax_amount: Option<RawValue>,
    subtotals: Vec<ParsedSubtotal>,
    current_subtotal: Option<ParsedSubtotal>,
    line_extension_amount: Option<RawValue>,
    tax_exclusive_amount: Option<RawValue>,
    tax_inclusive_amount: Option<RawValue>,
    payable_amount: Option<RawValue>,
    lines: Vec<ParsedLine>,
    current_line: Option<ParsedLine>,
}

fn ancestor(path: &[String], up: usize) -> &str {
    if path.len() > up {
        path[path.len() - 1 - up].as_str()
    } else {
        ""
    }
}

fn attr<'a>(attrs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn raw(text: &str, attrs: &[(String, String)], key: &str) -> Option<RawValue> {
    Some(RawValue {
        text: text.to_string(),
        unit: attr(attrs, key).map(str::to_string),
    })
}

impl ParsedInvoice {
    fn open(&mut self, name: &str, attrs: &[(String, String)]) {
        match name {
            "cac:InvoiceLine" => self.current_line = Some(ParsedLine::default()),
            "cac:TaxSubtotal" if self.current_line.is_none() => {
                self.current_subtotal = Some(ParsedSubtotal::default())
            }
            "cac:AdditionalDocumentReference" => {
                self.current_attachment = Some(ParsedAttachment::default())
            }
            "cbc:EmbeddedDocumentBinaryObject" => {
                if let Some(att) = self.current_attachment.as_mut() {
                    att.mime_code = attr(attrs, "mimeCode").map(str::to_string);
                    att.filename = attr(attrs, "filename").map(str::to_string);
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &str) {
        match name {
            "cac:InvoiceLine" => {
                if let Some(line) = self.current_line.take() {
                    self.lines.push(line);
                }
            }
            "cac:TaxSubtotal" => {
                if let Some(sub) = self.current_subtotal.take() {
                    self.subtotals.push(sub);
                }
            }
            "cac:AdditionalDocumentReference" => {
                if let Some(att) = self.current_attachment.take() {
                    self.attachments.push(att);
                }
            }
            _ => {}
        }
    }

    fn handle_text(&mut self, path: &[String], text: &str, attrs: &[(String, String)]) {
        let leaf = ancestor(path, 0);
        let parent = ancestor(path, 1);
        let grandparent = ancestor(path, 2);

        if let Some(line) = self.current_line.as_mut() {
            match (parent, leaf) {
                ("cac:InvoiceLine", "cbc:ID") => line.id = Some(text.to_string()),
                ("cac:InvoiceLine", "cbc:InvoicedQuantity") => {
                    line.quantity = raw(text, attrs, "unitCode")
                }
                ("cac:InvoiceLine", "cbc:LineExtensionAmount") => {
                    line.line_amount = raw(text, attrs, "currencyID")
                }
                ("cac:TaxTotal", "cbc:TaxAmount") => line.tax_amount = raw(text, attrs, "currencyID"),
                ("cac:Item", "cbc:Description") => line.description = Some(text.to_string()),
                ("cac:Item", "cbc:Name") => line.name = Some(text.to_string()),
                ("cac:Price", "cbc:PriceAmount") => line.price = raw(text, attrs, "currencyID"),
                _ => category_text(&mut line.category, parent, grandparent, leaf, text),
            }
            return;
        }

        if let Some(sub) = self.current_subtotal.as_mut() {
            match (parent, leaf) {
                ("cac:TaxSubtotal", "cbc:TaxableAmount") => {
                    sub.taxable_amount = raw(text, attrs, "currencyID")
                }
                ("cac:TaxSubtotal", "cbc:TaxAmount") => sub.tax_amount = raw(text, attrs, "currencyID"),
                _ => category_text(&mut sub.category, parent, grandparent, leaf, text),
            }
            return;
        }

        if let Some(att) = self.current_attachment.as_mut() {
            match (parent, leaf) {
                ("cac:AdditionalDocumentReference", "cbc:ID") => att.id = Some(text.to_string()),
                (_, "cbc:DocumentDescription") => att.description = Some(text.to_string()),
                (_, "cbc:EmbeddedDocumentBinaryObject") => att.content = Some(text.to_string()),
                _ => {}
            }
            return;
        }

        if path.iter().any(|p| p == "cac:AccountingSupplierParty") {
            party_text(&mut self.supplier, parent, leaf, text);
            return;
        }
        if path.iter().any(|p| p == "cac:AccountingCustomerParty") {
            party_text(&mut self.customer, parent, leaf, text);
            return;
        }

        match (parent, leaf) {
            ("Invoice", "cbc:ID") => self.id = Some(text.to_string()),
            ("Invoice", "cbc:IssueDate") => self.issue_date = Some(text.to_string()),
            ("Invoice", "cbc:DueDate") => self.due_date = Some(text.to_string()),
            ("Invoice", "cbc:InvoiceTypeCode") => self.type_code = Some(text.to_string()),
            ("Invoice", "cbc:DocumentCurrencyCode") => self.currency_code = Some(text.to_string()),
            ("Invoice", "cbc:BuyerReference") => self.buyer_reference = Some(text.to_string()),
            ("cac:OrderReference", "cbc:ID") => self.order_reference = Some(text.to_string()),
            ("cac:PaymentMeans", "cbc:PaymentMeansCode") => {
                self.payment_means_code = Some(text.to_string())
            }
            ("cac:PayeeFinancialAccount", "cbc:ID") => self.iban = Some(text.to_string()),
            ("cac:FinancialInstitutionBranch", "cbc:ID") => self.bic = Some(text.to_string()),
            ("cac:PaymentTerms", "cbc:Note") => self.payment_note = Some(text.to_string()),
            ("cac:TaxTotal", "cbc:TaxAmount") => self.tax_amount = raw(text, attrs, "currencyID"),
            ("cac:LegalMonetaryTotal", "cbc:LineExtensionAmount") => {
                self.line_extension_amount = raw(text, attrs, "currencyID")
            }
            ("cac:LegalMonetaryTotal", "cbc:TaxExclusiveAmount") => {
                self.tax_exclusive_amount = raw(text, attrs, "currencyID")
            }
            ("cac:LegalMonetaryTotal", "cbc:TaxInclusiveAmount") => {
                self.tax_inclusive_amount = raw(text, attrs, "currencyID")
            }
            ("cac:LegalMonetaryTotal", "cbc:PayableAmount") => {
                self.payable_amount = raw(text, attrs, "currencyID")
            }
            _ => {}
        }
    }

    fn into_invoice(self) -> Result<Invoice, UblError> {
        let id = self
            .id
            .ok_or_else(|| UblError::Parse("missing invoice ID".into()))?;
        let issue_date = parse_date(
            self.issue_date
                .as_deref()
                .ok_or_else(|| UblError::Parse("missing IssueDate".into()))?,
        )?;
        let due_date = match self.due_date.as_deref() {
            Some(d) => parse_date(d)?,
            None => issue_date
                .checked_add_days(Days::new(PAYMENT_TERMS_DAYS))
                .unwrap_or(NaiveDate::MAX),
        };
        let currency = self
            .currency_code
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        let amount = |v: Option<RawValue>| -> Result<Amount, UblError> {
            match v {
                Some(v) => Ok(Amount {
                    value: parse_decimal_or_zero(&v.text)?,
                    currency_id: v.unit.unwrap_or_else(|| currency.clone()),
                }),
                None => Ok(Amount::zero(&currency)),
            }
        };

        let mut lines = Vec::with_capacity(self.lines.len());
        for pl in self.lines {
            let quantity = pl.quantity.unwrap_or_default();
            lines.push(InvoiceLine {
                id: pl.id.unwrap_or_default(),
                invoiced_quantity: Quantity {
                    value: parse_decimal_or_zero(&quantity.text)?,
                    unit_code: quantity
                        .unit
                        .unwrap_or_else(|| DEFAULT_UNIT_CODE.to_string()),
                },
                line_extension_amount: amount(pl.line_amount)?,
                tax_total: TaxTotal {
                    tax_amount: amount(pl.tax_amount)?,
                    subtotals: Vec::new(),
                },
                item: Item {
                    description: pl.description.unwrap_or_default(),
                    name: pl.name.unwrap_or_default(),
                    classified_tax_category: pl.category.into_category()?,
                },
                price: Price {
                    price_amount: amount(pl.price)?,
                },
            });
        }

        let mut subtotals = Vec::with_capacity(self.subtotals.len());
        for ps in self.subtotals {
            subtotals.push(TaxSubtotal {
                taxable_amount: amount(ps.taxable_amount)?,
                tax_amount: amount(ps.tax_amount)?,
                tax_category: ps.category.into_category()?,
            });
        }

        let attachments = self
            .attachments
            .into_iter()
            .map(|a| DocumentReference {
                id: a.id.unwrap_or_default(),
                document_description: a.description.unwrap_or_default(),
                embedded_document: EmbeddedDocument {
                    content: a.content.unwrap_or_default(),
                    mime_code: a.mime_code.unwrap_or_default(),
                    filename: a.filename.unwrap_or_default(),
                },
            })
            .collect();

        let payment_means = if self.payment_means_code.is_some() || self.iban.is_some() {
            Some(PaymentMeans {
                code: self
                    .payment_means_code
                    .unwrap_or_else(|| CREDIT_TRANSFER.to_string()),
                payee_financial_account: FinancialAccount {
                    id: self.iban.unwrap_or_default(),
                    branch_id: self.bic.unwrap_or_default(),
                },
            })
        } else {
            None
        };

        Ok(Invoice {
            order_reference: self.order_reference.unwrap_or_else(|| id.clone()),
            id,
            issue_date,
            due_date,
            type_code: self
                .type_code
                .unwrap_or_else(|| COMMERCIAL_INVOICE.to_string()),
            buyer_reference: self.buyer_reference,
            standard_rate: DEFAULT_STANDARD_RATE,
            attachments,
            supplier: self.supplier.into_party(),
            customer: self.customer.into_party(),
            payment_means,
            payment_terms: self.payment_note.map(|note| PaymentTerms { note }),
            tax_total: TaxTotal {
                tax_amount: amount(self.tax_amount)?,
                subtotals,
            },
            monetary_total: MonetaryTotal {
                line_extension_amount: amount(self.line_extension_amount)?,
                tax_exclusive_amount: amount(self.tax_exclusive_amount)?,
                tax_inclusive_amount: amount(self.tax_inclusive_amount)?,
                payable_amount: amount(self.payable_amount)?,
            },
            lines,
            currency_code: currency,
        })
    }
}

fn party_text(party: &mut ParsedParty, parent: &str, leaf: &str, text: &str) {
    let slot = match (parent, leaf) {
        ("cac:PartyName", "cbc:Name") => &mut party.name,
        ("cac:PostalAddress", "cbc:StreetName") => &mut party.street,
        ("cac:PostalAddress", "cbc:CityName") => &mut party.city,
        ("cac:PostalAddress", "cbc:PostalZone") => &mut party.postal,
        ("cac:Country", "cbc:IdentificationCode") => &mut party.country,
        ("cac:PartyTaxScheme", "cbc:CompanyID") => &mut party.company_id,
        ("cac:TaxScheme", "cbc:ID") => &mut party.scheme_id,
        _ => return,
    };
    *slot = Some(text.to_string());
}

fn category_text(cat: &mut ParsedCategory, parent: &str, grandparent: &str, leaf: &str, text: &str) {
    let in_category = matches!(parent, "cac:TaxCategory" | "cac:ClassifiedTaxCategory");
    let slot = match leaf {
        "cbc:ID" if in_category => &mut cat.id,
        "cbc:Name" if in_category => &mut cat.name,
        "cbc:Percent" if in_category => &mut cat.percent,
        "cbc:ID"
            if parent == "cac:TaxScheme"
                && matches!(grandparent, "cac:TaxCategory" | "cac:ClassifiedTaxCategory") =>
        {
            &mut cat.scheme_id
        }
        _ => return,
    };
    *slot = Some(text.to_string());
}

impl ParsedParty {
    fn into_party(self) -> Party {
        Party {
            name: self.name.unwrap_or_default(),
            postal_address: PostalAddress {
                street_name: self.street.unwrap_or_default(),
                city_name: self.city.unwrap_or_default(),
                postal_zone: self.postal.unwrap_or_default(),
                country_code: self.country.unwrap_or_default(),
            },
            tax_scheme: PartyTaxScheme {
                company_id: self.company_id.unwrap_or_default(),
                tax_scheme: TaxScheme {
                    id: self.scheme_id.unwrap_or_else(|| VAT_SCHEME.to_string()),
                },
            },
        }
    }
}

impl ParsedCategory {
    fn into_category(self) -> Result<TaxCategory, UblError> {
        Ok(TaxCategory {
            id: self.id.unwrap_or_else(|| STANDARD_RATE_CODE.to_string()),
            name: self.name.unwrap_or_default(),
            percent: parse_decimal_or_zero(self.percent.as_deref().unwrap_or(""))?,
            tax_scheme: TaxScheme {
                id: self.scheme_id.unwrap_or_else(|| VAT_SCHEME.to_string()),
            },
        })
    }
}

fn parse_decimal(s: &str) -> Result<Decimal, UblError> {
    Decimal::from_str(s.trim()).map_err(|e| UblError::Parse(format!("invalid decimal '{s}': {e}")))
}

fn parse_decimal_or_zero(s: &str) -> Result<Decimal, UblError> {
    if s.trim().is_empty() {
        Ok(Decimal::ZERO)
    } else {
        parse_decimal(s)
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, UblError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| UblError::Parse(format!("invalid date '{s}': {e}")))
}
