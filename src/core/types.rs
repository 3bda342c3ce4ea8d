use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Root of a UBL 2.1 invoice document.
///
/// Field order mirrors the element order of the emitted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// BT-1: Invoice number.
    pub id: String,
    /// BT-2: Issue date.
    pub issue_date: NaiveDate,
    /// BT-9: Payment due date.
    pub due_date: NaiveDate,
    /// BT-3: Invoice type code (UNTDID 1001).
    pub type_code: String,
    /// BT-5: Document currency code (ISO 4217).
    pub currency_code: String,
    /// BT-10: Buyer reference.
    pub buyer_reference: Option<String>,
    /// BT-13: Purchase order reference.
    pub order_reference: String,
    /// Rate applied to every line when computing tax (see `add_lines`).
    pub standard_rate: Decimal,
    /// BG-24: Additional supporting documents.
    pub attachments: Vec<DocumentReference>,
    /// BG-4: Seller.
    pub supplier: Party,
    /// BG-7: Buyer.
    pub customer: Party,
    /// BG-16: Payment instructions.
    pub payment_means: Option<PaymentMeans>,
    /// BT-20: Payment terms.
    pub payment_terms: Option<PaymentTerms>,
    /// BG-23: Document tax total with its breakdown.
    pub tax_total: TaxTotal,
    /// BG-22: Document totals.
    pub monetary_total: MonetaryTotal,
    /// BG-25: Invoice lines.
    pub lines: Vec<InvoiceLine>,
}

/// BG-4 / BG-7: Party (supplier or customer).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// BT-27 / BT-44: Name.
    pub name: String,
    /// BG-5 / BG-8: Postal address.
    pub postal_address: PostalAddress,
    /// BT-31 / BT-48: VAT registration.
    pub tax_scheme: PartyTaxScheme,
}

/// BG-5 / BG-8: Postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    pub street_name: String,
    pub city_name: String,
    pub postal_zone: String,
    /// ISO 3166-1 alpha-2.
    pub country_code: String,
}

impl PostalAddress {
    pub fn new(
        street_name: impl Into<String>,
        city_name: impl Into<String>,
        postal_zone: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            street_name: street_name.into(),
            city_name: city_name.into(),
            postal_zone: postal_zone.into(),
            country_code: country_code.into(),
        }
    }
}

/// Company tax identifier within a tax scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyTaxScheme {
    pub company_id: String,
    pub tax_scheme: TaxScheme,
}

/// Tax scheme identifier. Always "VAT" for documents built here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxScheme {
    pub id: String,
}

impl TaxScheme {
    pub fn vat() -> Self {
        Self {
            id: super::VAT_SCHEME.to_string(),
        }
    }
}

impl Default for TaxScheme {
    fn default() -> Self {
        Self::vat()
    }
}

/// A decimal value with its currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub value: Decimal,
    pub currency_id: String,
}

impl Amount {
    pub fn new(value: Decimal, currency_id: impl Into<String>) -> Self {
        Self {
            value,
            currency_id: currency_id.into(),
        }
    }

    pub fn zero(currency_id: impl Into<String>) -> Self {
        Self::new(Decimal::ZERO, currency_id)
    }
}

/// A decimal value with a UNECE Rec 20 unit code. The code is passed through unchecked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: Decimal,
    pub unit_code: String,
}

/// BG-16: Payment instructions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMeans {
    /// BT-81: UNTDID 4461 code.
    pub code: String,
    /// BG-17: Payee account.
    pub payee_financial_account: FinancialAccount,
}

/// BG-17: Bank account receiving the payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialAccount {
    /// BT-84: IBAN.
    pub id: String,
    /// BT-86: BIC.
    pub branch_id: String,
}

/// BT-20: Payment terms note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTerms {
    pub note: String,
}

/// Tax classification (UNTDID 5305 category + rate + scheme).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCategory {
    /// Category code, "S" for standard rate.
    pub id: String,
    pub name: String,
    pub percent: Decimal,
    pub tax_scheme: TaxScheme,
}

impl TaxCategory {
    /// Standard-rated VAT category with the given percentage.
    pub fn standard(percent: Decimal) -> Self {
        Self {
            id: super::STANDARD_RATE_CODE.to_string(),
            name: super::STANDARD_RATE_NAME.to_string(),
            percent,
            tax_scheme: TaxScheme::vat(),
        }
    }
}

/// Tax total at document or line level.
///
/// Line-level totals carry no subtotals; the document-level total carries
/// exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTotal {
    pub tax_amount: Amount,
    pub subtotals: Vec<TaxSubtotal>,
}

impl TaxTotal {
    pub fn zero(currency_id: &str) -> Self {
        Self {
            tax_amount: Amount::zero(currency_id),
            subtotals: Vec::new(),
        }
    }
}

/// BG-23: One tax breakdown group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSubtotal {
    /// BT-116.
    pub taxable_amount: Amount,
    /// BT-117.
    pub tax_amount: Amount,
    pub tax_category: TaxCategory,
}

/// BG-22: Document totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonetaryTotal {
    /// BT-106: Sum of line net amounts.
    pub line_extension_amount: Amount,
    /// BT-109: Total without VAT.
    pub tax_exclusive_amount: Amount,
    /// BT-112: Total with VAT.
    pub tax_inclusive_amount: Amount,
    /// BT-115: Amount due.
    pub payable_amount: Amount,
}

impl MonetaryTotal {
    pub fn zero(currency_id: &str) -> Self {
        Self {
            line_extension_amount: Amount::zero(currency_id),
            tax_exclusive_amount: Amount::zero(currency_id),
            tax_inclusive_amount: Amount::zero(currency_id),
            payable_amount: Amount::zero(currency_id),
        }
    }
}

/// BG-25: Invoice line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// BT-126: 1-based position within the invoice.
    pub id: String,
    /// BT-129 / BT-130.
    pub invoiced_quantity: Quantity,
    /// BT-131: quantity × unit price, rounded.
    pub line_extension_amount: Amount,
    pub tax_total: TaxTotal,
    pub item: Item,
    pub price: Price,
}

/// Item being invoiced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// BT-154.
    pub description: String,
    /// BT-153.
    pub name: String,
    /// BT-151 / BT-152.
    pub classified_tax_category: TaxCategory,
}

/// BT-146: Net unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub price_amount: Amount,
}

/// BG-24: Supporting document reference with embedded content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReference {
    /// BT-122.
    pub id: String,
    /// BT-123.
    pub document_description: String,
    pub embedded_document: EmbeddedDocument,
}

/// BT-125: Base64 payload with its MIME type and original file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedDocument {
    pub content: String,
    pub mime_code: String,
    pub filename: String,
}
