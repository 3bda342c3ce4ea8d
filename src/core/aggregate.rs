use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::TotalsMismatch;
use super::types::*;
use super::DEFAULT_UNIT_CODE;

/// Caller-supplied line before aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineInput {
    pub quantity: Decimal,
    pub unit_price: Decimal,
    /// Percentage shown in the line's tax category. Not used for the tax amount.
    pub tax_percentage: Decimal,
    pub name: String,
    pub description: String,
    /// UNECE Rec 20 unit code; `"ZZ"` when absent.
    pub unit_code: Option<String>,
}

impl LineInput {
    pub fn new(
        quantity: Decimal,
        unit_price: Decimal,
        tax_percentage: Decimal,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            quantity,
            unit_price,
            tax_percentage,
            name: name.into(),
            description: description.into(),
            unit_code: None,
        }
    }

    pub fn unit(mut self, code: impl Into<String>) -> Self {
        self.unit_code = Some(code.into());
        self
    }
}

/// Lines and totals derived from a list of [`LineInput`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub lines: Vec<InvoiceLine>,
    pub tax_total: TaxTotal,
    pub monetary_total: MonetaryTotal,
}

/// Round to cents, half away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

// Overflow clamps to Decimal::MAX / Decimal::MIN instead of panicking.
fn mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or_else(|| {
        tracing::warn!(%a, %b, "decimal multiplication overflowed; saturating");
        a.saturating_mul(b)
    })
}

fn add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or_else(|| {
        tracing::warn!(%a, %b, "decimal addition overflowed; saturating");
        a.saturating_add(b)
    })
}

/// Turn line inputs into invoice lines plus the document tax and monetary totals.
///
/// Every line's tax is `round2(line amount × standard_rate / 100)`; the
/// percentage stated on the line only labels its tax category. The single
/// tax subtotal is labelled with the percentage of the last line, or with
/// `standard_rate` when there are no lines.
pub fn aggregate_lines(lines: &[LineInput], standard_rate: Decimal, currency: &str) -> Aggregation {
    let mut sum = Decimal::ZERO;
    let mut sum_tax = Decimal::ZERO;
    let mut last_percentage = standard_rate;
    let mut invoice_lines = Vec::with_capacity(lines.len());

    for (i, line) in lines.iter().enumerate() {
        last_percentage = line.tax_percentage;
        let line_amount = round2(mul(line.quantity, line.unit_price));
        let tax = round2(mul(line_amount, standard_rate) / dec!(100));
        sum = add(sum, line_amount);
        sum_tax = add(sum_tax, tax);

        invoice_lines.push(InvoiceLine {
            id: (i + 1).to_string(),
            invoiced_quantity: Quantity {
                value: line.quantity,
                unit_code: line
                    .unit_code
                    .clone()
                    .unwrap_or_else(|| DEFAULT_UNIT_CODE.to_string()),
            },
            line_extension_amount: Amount::new(line_amount, currency),
            tax_total: TaxTotal {
                tax_amount: Amount::new(tax, currency),
                subtotals: Vec::new(),
            },
            item: Item {
                description: line.description.clone(),
                name: line.name.clone(),
                classified_tax_category: TaxCategory::standard(line.tax_percentage),
            },
            price: Price {
                price_amount: Amount::new(line.unit_price, currency),
            },
        });
    }

    if lines
        .iter()
        .any(|l| l.tax_percentage != last_percentage)
    {
        tracing::warn!(
            label = %last_percentage,
            "lines carry differing tax percentages; the single tax subtotal uses the last one"
        );
    }

    let total = round2(add(sum, sum_tax));
    tracing::debug!(lines = lines.len(), %sum, %sum_tax, %total, "aggregated invoice lines");

    Aggregation {
        lines: invoice_lines,
        tax_total: TaxTotal {
            tax_amount: Amount::new(sum_tax, currency),
            subtotals: vec![TaxSubtotal {
                taxable_amount: Amount::new(sum, currency),
                tax_amount: Amount::new(sum_tax, currency),
                tax_category: TaxCategory::standard(last_percentage),
            }],
        },
        monetary_total: MonetaryTotal {
            line_extension_amount: Amount::new(sum, currency),
            tax_exclusive_amount: Amount::new(sum, currency),
            tax_inclusive_amount: Amount::new(total, currency),
            payable_amount: Amount::new(total, currency),
        },
    }
}

impl Invoice {
    /// Fill the invoice lines and every derived total from `lines`.
    ///
    /// Lines are numbered 1..n in input order. Calling this again replaces
    /// the lines and totals from the previous call.
    pub fn add_lines(&mut self, lines: &[LineInput]) {
        let Aggregation {
            lines,
            tax_total,
            monetary_total,
        } = aggregate_lines(lines, self.standard_rate, &self.currency_code);
        self.lines = lines;
        self.tax_total = tax_total;
        self.monetary_total = monetary_total;
    }

    /// Report rollup figures that disagree with each other or with the lines.
    ///
    /// Always empty for an invoice filled by [`add_lines`](Self::add_lines);
    /// useful after editing fields by hand or reading a foreign document.
    pub fn check_totals(&self) -> Vec<TotalsMismatch> {
        let mut errors = Vec::new();
        let mt = &self.monetary_total;
        let tax = self.tax_total.tax_amount.value;

        let line_sum = self
            .lines
            .iter()
            .fold(Decimal::ZERO, |acc, l| acc.saturating_add(l.line_extension_amount.value));
        if mt.line_extension_amount.value != line_sum {
            errors.push(mismatch(
                "LineExtensionAmount",
                mt.line_extension_amount.value,
                line_sum,
                "sum of line amounts",
            ));
        }

        if mt.tax_exclusive_amount.value != mt.line_extension_amount.value {
            errors.push(mismatch(
                "TaxExclusiveAmount",
                mt.tax_exclusive_amount.value,
                mt.line_extension_amount.value,
                "LineExtensionAmount",
            ));
        }

        let line_tax = self
            .lines
            .iter()
            .fold(Decimal::ZERO, |acc, l| acc.saturating_add(l.tax_total.tax_amount.value));
        if tax != line_tax {
            errors.push(mismatch("TaxAmount", tax, line_tax, "sum of line tax"));
        }

        let expected = mt.tax_exclusive_amount.value.saturating_add(tax);
        if mt.tax_inclusive_amount.value != expected {
            errors.push(mismatch(
                "TaxInclusiveAmount",
                mt.tax_inclusive_amount.value,
                expected,
                "TaxExclusiveAmount + TaxAmount",
            ));
        }

        if mt.payable_amount.value != mt.tax_inclusive_amount.value {
            errors.push(mismatch(
                "PayableAmount",
                mt.payable_amount.value,
                mt.tax_inclusive_amount.value,
                "TaxInclusiveAmount",
            ));
        }

        errors
    }
}

fn mismatch(field: &'static str, actual: Decimal, expected: Decimal, what: &str) -> TotalsMismatch {
    TotalsMismatch {
        field,
        message: format!("{actual} does not match {what} ({expected})"),
    }
}
