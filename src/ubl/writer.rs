use super::xml_utils::{XmlWriter, format_decimal};
use super::{CUSTOMIZATION_ID, PROFILE_ID, ns};
use crate::core::*;

/// Render the invoice as an indented UBL 2.1 Invoice document.
///
/// Element order follows the UBL 2.1 Invoice schema. Empty descriptions,
/// an unset buyer reference, absent payment means and absent payment terms
/// are left out rather than emitted as empty elements.
pub fn to_ubl_xml(invoice: &Invoice) -> Result<Vec<u8>, UblError> {
    let mut w = XmlWriter::new()?;

    w.start_element_with_attrs(
        "Invoice",
        &[
            ("xmlns", ns::INVOICE),
            ("xmlns:cac", ns::CAC),
            ("xmlns:cbc", ns::CBC),
        ],
    )?;

    w.text_element("cbc:CustomizationID", CUSTOMIZATION_ID)?;
    w.text_element("cbc:ProfileID", PROFILE_ID)?;
    w.text_element("cbc:ID", &invoice.id)?;
    w.text_element("cbc:IssueDate", &invoice.issue_date.to_string())?;
    w.text_element("cbc:DueDate", &invoice.due_date.to_string())?;
    w.text_element("cbc:InvoiceTypeCode", &invoice.type_code)?;
    w.text_element("cbc:DocumentCurrencyCode", &invoice.currency_code)?;
    if let Some(br) = &invoice.buyer_reference {
        w.text_element("cbc:BuyerReference", br)?;
    }

    w.start_element("cac:OrderReference")?;
    w.text_element("cbc:ID", &invoice.order_reference)?;
    w.end_element("cac:OrderReference")?;

    for doc in &invoice.attachments {
        write_document_reference(&mut w, doc)?;
    }

    write_party(&mut w, &invoice.supplier, "cac:AccountingSupplierParty")?;
    write_party(&mut w, &invoice.customer, "cac:AccountingCustomerParty")?;

    if let Some(pm) = &invoice.payment_means {
        w.start_element("cac:PaymentMeans")?;
        w.text_element("cbc:PaymentMeansCode", &pm.code)?;
        w.start_element("cac:PayeeFinancialAccount")?;
        w.text_element("cbc:ID", &pm.payee_financial_account.id)?;
        w.start_element("cac:FinancialInstitutionBranch")?;
        w.text_element("cbc:ID", &pm.payee_financial_account.branch_id)?;
        w.end_element("cac:FinancialInstitutionBranch")?;
        w.end_element("cac:PayeeFinancialAccount")?;
        w.end_element("cac:PaymentMeans")?;
    }

    if let Some(terms) = invoice.payment_terms.as_ref().filter(|t| !t.note.is_empty()) {
        w.start_element("cac:PaymentTerms")?;
        w.text_element("cbc:Note", &terms.note)?;
        w.end_element("cac:PaymentTerms")?;
    }

    write_tax_total(&mut w, &invoice.tax_total)?;

    let mt = &invoice.monetary_total;
    w.start_element("cac:LegalMonetaryTotal")?;
    w.amount_element("cbc:LineExtensionAmount", &mt.line_extension_amount)?;
    w.amount_element("cbc:TaxExclusiveAmount", &mt.tax_exclusive_amount)?;
    w.amount_element("cbc:TaxInclusiveAmount", &mt.tax_inclusive_amount)?;
    w.amount_element("cbc:PayableAmount", &mt.payable_amount)?;
    w.end_element("cac:LegalMonetaryTotal")?;

    for line in &invoice.lines {
        write_line(&mut w, line)?;
    }

    w.end_element("Invoice")?;

    let bytes = w.into_bytes();
    tracing::debug!(id = %invoice.id, bytes = bytes.len(), "serialized UBL invoice");
    Ok(bytes)
}

fn write_document_reference(w: &mut XmlWriter, doc: &DocumentReference) -> Result<(), UblError> {
    let emb = &doc.embedded_document;
    w.start_element("cac:AdditionalDocumentReference")?;
    w.text_element("cbc:ID", &doc.id)?;
    w.text_element("cbc:DocumentDescription", &doc.document_description)?;
    w.start_element("cac:Attachment")?;
    w.text_element_with_attrs(
        "cbc:EmbeddedDocumentBinaryObject",
        &emb.content,
        &[("mimeCode", &emb.mime_code), ("filename", &emb.filename)],
    )?;
    w.end_element("cac:Attachment")?;
    w.end_element("cac:AdditionalDocumentReference")?;
    Ok(())
}

fn write_party(w: &mut XmlWriter, party: &Party, wrapper: &str) -> Result<(), UblError> {
    w.start_element(wrapper)?;
    w.start_element("cac:Party")?;

    w.start_element("cac:PartyName")?;
    w.text_element("cbc:Name", &party.name)?;
    w.end_element("cac:PartyName")?;

    let addr = &party.postal_address;
    w.start_element("cac:PostalAddress")?;
    w.text_element("cbc:StreetName", &addr.street_name)?;
    w.text_element("cbc:CityName", &addr.city_name)?;
    w.text_element("cbc:PostalZone", &addr.postal_zone)?;
    w.start_element("cac:Country")?;
    w.text_element("cbc:IdentificationCode", &addr.country_code)?;
    w.end_element("cac:Country")?;
    w.end_element("cac:PostalAddress")?;

    w.start_element("cac:PartyTaxScheme")?;
    w.text_element("cbc:CompanyID", &party.tax_scheme.company_id)?;
    write_tax_scheme(w, &party.tax_scheme.tax_scheme)?;
    w.end_element("cac:PartyTaxScheme")?;

    w.end_element("cac:Party")?;
    w.end_element(wrapper)?;
    Ok(())
}

fn write_tax_scheme(w: &mut XmlWriter, scheme: &TaxScheme) -> Result<(), UblError> {
    w.start_element("cac:TaxScheme")?;
    w.text_element("cbc:ID", &scheme.id)?;
    w.end_element("cac:TaxScheme")?;
    Ok(())
}

fn write_tax_category(w: &mut XmlWriter, cat: &TaxCategory, tag: &str) -> Result<(), UblError> {
    w.start_element(tag)?;
    w.text_element("cbc:ID", &cat.id)?;
    w.text_element("cbc:Name", &cat.name)?;
    w.text_element("cbc:Percent", &format_decimal(cat.percent))?;
    write_tax_scheme(w, &cat.tax_scheme)?;
    w.end_element(tag)?;
    Ok(())
}

fn write_tax_total(w: &mut XmlWriter, total: &TaxTotal) -> Result<(), UblError> {
    w.start_element("cac:TaxTotal")?;
    w.amount_element("cbc:TaxAmount", &total.tax_amount)?;
    for sub in &total.subtotals {
        w.start_element("cac:TaxSubtotal")?;
        w.amount_element("cbc:TaxableAmount", &sub.taxable_amount)?;
        w.amount_element("cbc:TaxAmount", &sub.tax_amount)?;
        write_tax_category(w, &sub.tax_category, "cac:TaxCategory")?;
        w.end_element("cac:TaxSubtotal")?;
    }
    w.end_element("cac:TaxTotal")?;
    Ok(())
}

fn write_line(w: &mut XmlWriter, line: &InvoiceLine) -> Result<(), UblError> {
    w.start_element("cac:InvoiceLine")?;
    w.text_element("cbc:ID", &line.id)?;
    w.quantity_element("cbc:InvoicedQuantity", &line.invoiced_quantity)?;
    w.amount_element("cbc:LineExtensionAmount", &line.line_extension_amount)?;
    write_tax_total(w, &line.tax_total)?;

    w.start_element("cac:Item")?;
    if !line.item.description.is_empty() {
        w.text_element("cbc:Description", &line.item.description)?;
    }
    w.text_element("cbc:Name", &line.item.name)?;
    write_tax_category(w, &line.item.classified_tax_category, "cac:ClassifiedTaxCategory")?;
    w.end_element("cac:Item")?;

    w.start_element("cac:Price")?;
    w.amount_element("cbc:PriceAmount", &line.price.price_amount)?;
    w.end_element("cac:Price")?;

    w.end_element("cac:InvoiceLine")?;
    Ok(())
}
