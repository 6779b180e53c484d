//! Arithmetic checks over an extracted invoice.
//!
//! Errors (invoice is not `valid`):
//! - a line item's stated total differs from quantity × unit_price
//! - the stated grand total differs from Σ line amounts + tax
//!
//! Warnings (advisory):
//! - missing invoice_number / vendor / customer / total
//! - stated subtotal differs from Σ line amounts
//! - subtotal × tax_rate differs from the stated tax
//!
//! Mismatches are reported, never corrected.

use super::models::{InvoiceRecord, ValidationReport};

/// Amounts closer than this are considered equal (one cent).
pub const AMOUNT_TOLERANCE: f64 = 0.01;

pub fn validate_invoice(invoice: &InvoiceRecord) -> ValidationReport {
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    check_required_fields(invoice, &mut warnings);

    let mut line_sum = 0.0_f64;
    for (index, item) in invoice.line_items.iter().enumerate() {
        let label = line_label(index, item.description.as_deref());

        if let (Some(expected), Some(stated)) = (item.computed_total(), item.total) {
            if mismatch(expected, stated) {
                errors.push(format!(
                    "{label}: total {stated:.2} does not match quantity × unit_price = {expected:.2}"
                ));
            }
        }

        match item.amount() {
            Some(amount) => line_sum += amount,
            None => warnings.push(format!("{label} has no quantity, unit price or total")),
        }
    }

    let has_items = !invoice.line_items.is_empty();

    if let (true, Some(subtotal)) = (has_items, invoice.subtotal) {
        if mismatch(line_sum, subtotal) {
            warnings.push(format!(
                "Subtotal mismatch: calculated {line_sum:.2}, reported {subtotal:.2}"
            ));
        }
    }

    if let (Some(subtotal), Some(rate), Some(tax)) =
        (invoice.subtotal, invoice.tax_rate, invoice.tax)
    {
        let expected_tax = subtotal * rate / 100.0;
        if mismatch(expected_tax, tax) {
            warnings.push(format!(
                "Tax calculation mismatch: calculated {expected_tax:.2}, reported {tax:.2}"
            ));
        }
    }

    let base = if has_items {
        Some(line_sum)
    } else {
        invoice.subtotal
    };
    if let (Some(base), Some(total)) = (base, invoice.total) {
        let expected_total = base + invoice.tax.unwrap_or(0.0);
        if mismatch(expected_total, total) {
            errors.push(format!(
                "Total mismatch: calculated {expected_total:.2}, reported {total:.2}"
            ));
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        warnings,
        errors,
    }
}

fn check_required_fields(invoice: &InvoiceRecord, warnings: &mut Vec<String>) {
    if invoice
        .invoice_number
        .as_deref()
        .map_or(true, |n| n.trim().is_empty())
    {
        warnings.push(missing("invoice_number"));
    }
    if invoice.vendor.as_ref().map_or(true, |p| p.is_empty()) {
        warnings.push(missing("vendor"));
    }
    if invoice.customer.as_ref().map_or(true, |p| p.is_empty()) {
        warnings.push(missing("customer"));
    }
    if invoice.total.is_none() {
        warnings.push(missing("total"));
    }
}

fn missing(field: &str) -> String {
    format!("Missing required field: {field}")
}

fn line_label(index: usize, description: Option<&str>) -> String {
    match description.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => format!("Line item {} ({d})", index + 1),
        None => format!("Line item {}", index + 1),
    }
}

fn mismatch(calculated: f64, reported: f64) -> bool {
    (calculated - reported).abs() > AMOUNT_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::models::{LineItem, Party};

    fn item(qty: f64, price: f64, total: Option<f64>) -> LineItem {
        LineItem {
            description: Some("Widget".to_string()),
            quantity: Some(qty),
            unit_price: Some(price),
            total,
        }
    }

    fn party(name: &str) -> Option<Party> {
        Some(Party {
            name: Some(name.to_string()),
            ..Party::default()
        })
    }

    fn complete_invoice() -> InvoiceRecord {
        InvoiceRecord {
            invoice_number: Some("INV-001".to_string()),
            vendor: party("Acme"),
            customer: party("Globex"),
            line_items: vec![item(2.0, 50.0, None)],
            tax: Some(10.0),
            total: Some(110.0),
            ..InvoiceRecord::default()
        }
    }

    #[test]
    fn test_matching_total_is_valid() {
        let report = validate_invoice(&complete_invoice());
        assert!(report.valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    }

    #[test]
    fn test_total_mismatch_is_error() {
        let mut invoice = complete_invoice();
        invoice.total = Some(100.0);

        let report = validate_invoice(&invoice);

        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("Total mismatch"));
        assert!(report.errors[0].contains("110.00"));
        assert!(report.errors[0].contains("100.00"));
    }

    #[test]
    fn test_line_total_mismatch_is_error() {
        let mut invoice = complete_invoice();
        invoice.line_items = vec![item(3.0, 20.0, Some(50.0))];
        invoice.total = Some(70.0);

        let report = validate_invoice(&invoice);

        assert!(!report.valid);
        assert!(report.errors[0].starts_with("Line item 1 (Widget)"));
        assert!(report.errors[0].contains("60.00"));
    }

    #[test]
    fn test_rounding_within_tolerance_is_accepted() {
        let mut invoice = complete_invoice();
        invoice.line_items = vec![item(3.0, 33.333, Some(100.0))];
        invoice.total = Some(110.0);

        let report = validate_invoice(&invoice);
        assert!(report.valid, "{:?}", report.errors);
    }

    #[test]
    fn test_missing_identity_fields_are_warnings_only() {
        let invoice = InvoiceRecord {
            line_items: vec![item(2.0, 50.0, None)],
            tax: Some(10.0),
            total: Some(110.0),
            ..InvoiceRecord::default()
        };

        let report = validate_invoice(&invoice);

        assert!(report.valid);
        assert!(report.errors.is_empty());
        assert!(report
            .warnings
            .contains(&"Missing required field: invoice_number".to_string()));
        assert!(report
            .warnings
            .contains(&"Missing required field: vendor".to_string()));
    }

    #[test]
    fn test_subtotal_and_tax_without_items() {
        let invoice = InvoiceRecord {
            invoice_number: Some("INV-001".to_string()),
            vendor: party("Test Vendor"),
            customer: party("Test Customer"),
            subtotal: Some(1000.0),
            tax: Some(100.0),
            tax_rate: Some(10.0),
            total: Some(1100.0),
            ..InvoiceRecord::default()
        };

        let report = validate_invoice(&invoice);
        assert!(report.valid);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_subtotal_and_tax_rate_mismatches_are_warnings() {
        let mut invoice = complete_invoice();
        invoice.subtotal = Some(90.0);
        invoice.tax_rate = Some(20.0);

        let report = validate_invoice(&invoice);

        assert!(report.valid);
        assert!(report.warnings.iter().any(|w| w.starts_with("Subtotal mismatch")));
        assert!(report
            .warnings
            .iter()
            .any(|w| w.starts_with("Tax calculation mismatch")));
    }

    #[test]
    fn test_item_without_amounts_is_warned() {
        let mut invoice = complete_invoice();
        invoice.line_items.push(LineItem {
            description: Some("Mystery".to_string()),
            ..LineItem::default()
        });

        let report = validate_invoice(&invoice);
        assert!(report.valid);
        assert!(report.warnings[0].contains("Line item 2 (Mystery)"));
    }

    #[test]
    fn test_missing_total_skips_grand_total_check() {
        let mut invoice = complete_invoice();
        invoice.total = None;

        let report = validate_invoice(&invoice);
        assert!(report.valid);
        assert_eq!(report.warnings, vec!["Missing required field: total".to_string()]);
    }
}
