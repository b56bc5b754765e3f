use std::collections::BTreeMap;

use tradedoc_core::types::DocumentType;

/// Words whose frequency hints at how a document type is laid out.
pub fn keywords(doc_type: DocumentType) -> &'static [&'static str] {
    match doc_type {
        DocumentType::Invoice => &["invoice", "bill", "amount", "total", "tax", "due", "payment"],
        DocumentType::PurchaseOrder => &["purchase order", "po", "order", "supplier", "delivery"],
        DocumentType::ShippingOrder => &["shipping", "shipment", "consignee", "shipper", "cargo", "vessel", "container"],
    }
}

/// Checklist of fields worth extracting, written into the analysis report.
pub fn suggested_fields(doc_type: DocumentType) -> &'static [&'static str] {
    match doc_type {
        DocumentType::Invoice => &[
            "Invoice number",
            "Invoice date",
            "Seller/vendor name",
            "Seller address",
            "Buyer name",
            "Buyer address",
            "Line items (description, quantity, price)",
            "Subtotal",
            "Tax",
            "Total amount",
            "Currency",
            "Payment terms",
            "Due date",
        ],
        DocumentType::PurchaseOrder => &[
            "PO number",
            "PO date",
            "Buyer name",
            "Buyer address",
            "Supplier name",
            "Supplier address",
            "Line items",
            "Total amount",
            "Delivery date",
            "Shipping address",
            "Payment terms",
        ],
        DocumentType::ShippingOrder => &[
            "Order/BOL number",
            "Ship date",
            "Shipper name",
            "Shipper address",
            "Consignee name",
            "Consignee address",
            "Cargo items",
            "Total weight",
            "Origin",
            "Destination",
            "Carrier",
            "Tracking number",
        ],
    }
}

/// Case-insensitive, non-overlapping substring counts; zero counts are left out.
pub fn count_keywords(text: &str, doc_type: DocumentType) -> BTreeMap<String, usize> {
    let lower = text.to_lowercase();
    keywords(doc_type)
        .iter()
        .filter_map(|kw| {
            let n = lower.matches(kw).count();
            (n > 0).then(|| (kw.to_string(), n))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_substrings_case_insensitively() {
        let counts = count_keywords("INVOICE #12\nTotal: 40\nSubtotal 30, Tax 10\nPayment due", DocumentType::Invoice);
        assert_eq!(counts.get("invoice"), Some(&1));
        assert_eq!(counts.get("total"), Some(&2), "subtotal contains total");
        assert_eq!(counts.get("tax"), Some(&1));
        assert_eq!(counts.get("bill"), None);
    }

    #[test]
    fn short_keywords_match_inside_words() {
        let counts = count_keywords("Purchase Order PO-7 for export", DocumentType::PurchaseOrder);
        assert_eq!(counts.get("purchase order"), Some(&1));
        assert_eq!(counts.get("po"), Some(&2));
        assert_eq!(counts.get("order"), Some(&1));
    }
}
