use std::path::Path;

use crate::types::DocumentType;

/// Guess a document's category from its path.
///
/// Rules are checked in order against the lowercased path: `invoice`, then
/// `purchase` or a standalone `po` token, then `shipping` or a standalone
/// `bol` token. Tokens are runs of ASCII alphanumerics, so `po_17.pdf`
/// matches but `report.pdf` does not.
pub fn classify_path(path: &Path) -> Option<DocumentType> {
    let lower = path.to_string_lossy().to_lowercase();
    let has_token = |token: &str| lower.split(|c: char| !c.is_ascii_alphanumeric()).any(|t| t == token);
    if lower.contains("invoice") {
        Some(DocumentType::Invoice)
    } else if lower.contains("purchase") || has_token("po") {
        Some(DocumentType::PurchaseOrder)
    } else if lower.contains("shipping") || has_token("bol") {
        Some(DocumentType::ShippingOrder)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_directory_or_name() {
        assert_eq!(classify_path(Path::new("data/raw/invoices/acme-0001.pdf")), Some(DocumentType::Invoice));
        assert_eq!(classify_path(Path::new("data/raw/purchase_orders/x.pdf")), Some(DocumentType::PurchaseOrder));
        assert_eq!(classify_path(Path::new("inbox/PO-2291.pdf")), Some(DocumentType::PurchaseOrder));
        assert_eq!(classify_path(Path::new("data/raw/shipping_orders/a.pdf")), Some(DocumentType::ShippingOrder));
        assert_eq!(classify_path(Path::new("scans/BOL_77.PDF")), Some(DocumentType::ShippingOrder));
    }

    #[test]
    fn invoice_rule_wins_over_later_rules() {
        assert_eq!(classify_path(Path::new("shipping/invoice_3.pdf")), Some(DocumentType::Invoice));
    }

    #[test]
    fn po_inside_a_word_is_not_a_token() {
        assert_eq!(classify_path(Path::new("misc/report.pdf")), None);
        assert_eq!(classify_path(Path::new("misc/export.pdf")), None);
    }
}
