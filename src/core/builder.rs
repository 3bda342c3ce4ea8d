use chrono::{Days, Local, NaiveDate};
use rust_decimal::Decimal;

use super::types::*;
use super::{
    COMMERCIAL_INVOICE, CREDIT_TRANSFER, DEFAULT_CURRENCY, DEFAULT_STANDARD_RATE,
    PAYMENT_TERMS_DAYS,
};

/// Constructors and setters.
///
/// ```
/// use ubl_invoice::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let mut invoice = Invoice::with_issue_date("INV-001", NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
/// invoice.set_supplier("ABC Supplies Ltd", "BE0123456789");
/// invoice.supplier.postal_address = PostalAddress::new("123 Supplier Street", "Supplier City", "12345", "BE");
/// invoice.set_customer("XYZ Corp", "BE9876543210");
/// invoice.set_payment_means("9999999999", "GEBABEBB");
/// invoice.add_lines(&[LineInput::new(dec!(10), dec!(100), dec!(21), "Product A", "High-quality item")]);
///
/// assert_eq!(invoice.monetary_total.payable_amount.value, dec!(1210.00));
/// ```
impl Invoice {
    /// Start a new invoice issued today, due in 30 days.
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_issue_date(id, Local::now().date_naive())
    }

    /// Start a new invoice with an explicit issue date, due 30 days later.
    pub fn with_issue_date(id: impl Into<String>, issue_date: NaiveDate) -> Self {
        let id = id.into();
        let due_date = issue_date
            .checked_add_days(Days::new(PAYMENT_TERMS_DAYS))
            .unwrap_or(NaiveDate::MAX);
        Self {
            order_reference: id.clone(),
            id,
            issue_date,
            due_date,
            type_code: COMMERCIAL_INVOICE.to_string(),
            currency_code: DEFAULT_CURRENCY.to_string(),
            buyer_reference: None,
            standard_rate: DEFAULT_STANDARD_RATE,
            attachments: Vec::new(),
            supplier: Party::default(),
            customer: Party::default(),
            payment_means: None,
            payment_terms: None,
            tax_total: TaxTotal::zero(DEFAULT_CURRENCY),
            monetary_total: MonetaryTotal::zero(DEFAULT_CURRENCY),
            lines: Vec::new(),
        }
    }

    /// Replace the supplier with a party carrying only name and VAT id.
    ///
    /// The postal address is filled separately, either through
    /// [`set_supplier_address`](Self::set_supplier_address) or directly on
    /// `invoice.supplier.postal_address`.
    pub fn set_supplier(&mut self, name: impl Into<String>, tax_id: impl Into<String>) {
        self.supplier = vat_party(name.into(), tax_id.into());
    }

    /// Replace the customer with a party carrying only name and VAT id.
    pub fn set_customer(&mut self, name: impl Into<String>, tax_id: impl Into<String>) {
        self.customer = vat_party(name.into(), tax_id.into());
    }

    pub fn set_supplier_address(&mut self, address: PostalAddress) {
        self.supplier.postal_address = address;
    }

    pub fn set_customer_address(&mut self, address: PostalAddress) {
        self.customer.postal_address = address;
    }

    /// Credit transfer to the given IBAN, with the BIC as institution branch.
    pub fn set_payment_means(&mut self, iban: impl Into<String>, bic: impl Into<String>) {
        self.payment_means = Some(PaymentMeans {
            code: CREDIT_TRANSFER.to_string(),
            payee_financial_account: FinancialAccount {
                id: iban.into(),
                branch_id: bic.into(),
            },
        });
    }

    /// Free-text payment terms. An empty note removes the terms entirely.
    pub fn set_payment_terms(&mut self, note: impl Into<String>) {
        let note = note.into();
        self.payment_terms = if note.is_empty() {
            None
        } else {
            Some(PaymentTerms { note })
        };
    }

    /// Document currency. Amounts already on the invoice are re-labelled
    /// with the new code; their values are not converted.
    pub fn set_currency(&mut self, code: impl Into<String>) {
        let code = code.into();
        for line in &mut self.lines {
            line.line_extension_amount.currency_id.clone_from(&code);
            line.tax_total.tax_amount.currency_id.clone_from(&code);
            line.price.price_amount.currency_id.clone_from(&code);
        }
        self.tax_total.tax_amount.currency_id.clone_from(&code);
        for sub in &mut self.tax_total.subtotals {
            sub.taxable_amount.currency_id.clone_from(&code);
            sub.tax_amount.currency_id.clone_from(&code);
        }
        let mt = &mut self.monetary_total;
        for amount in [
            &mut mt.line_extension_amount,
            &mut mt.tax_exclusive_amount,
            &mut mt.tax_inclusive_amount,
            &mut mt.payable_amount,
        ] {
            amount.currency_id.clone_from(&code);
        }
        self.currency_code = code;
    }

    /// Rate used for every line's tax amount by [`add_lines`](Self::add_lines).
    pub fn set_standard_rate(&mut self, rate: Decimal) {
        self.standard_rate = rate;
    }

    pub fn set_buyer_reference(&mut self, reference: impl Into<String>) {
        self.buyer_reference = Some(reference.into());
    }

    pub fn set_order_reference(&mut self, reference: impl Into<String>) {
        self.order_reference = reference.into();
    }

    pub fn set_due_date(&mut self, date: NaiveDate) {
        self.due_date = date;
    }
}

fn vat_party(name: String, company_id: String) -> Party {
    Party {
        name,
        postal_address: PostalAddress::default(),
        tax_scheme: PartyTaxScheme {
            company_id,
            tax_scheme: TaxScheme::vat(),
        },
    }
}
