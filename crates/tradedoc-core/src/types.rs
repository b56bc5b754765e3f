//! Typed ground-truth records for trade documents.
//!
//! A [`Record`] is the persisted form of one annotated source document. Its
//! `entities` payload is discriminated by `document_type`, so a record built
//! through [`Record::new`] can never disagree with its own nested tag.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

pub type DocumentId = String;
pub type Metadata = Map<String, Value>;

/// The closed set of document categories the dataset covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Invoice,
    PurchaseOrder,
    ShippingOrder,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [Self::Invoice, Self::PurchaseOrder, Self::ShippingOrder];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::PurchaseOrder => "purchase_order",
            Self::ShippingOrder => "shipping_order",
        }
    }

    /// Directory name used for this type under raw and ground-truth roots.
    pub fn subdir(self) -> &'static str {
        match self {
            Self::Invoice => "invoices",
            Self::PurchaseOrder => "purchase_orders",
            Self::ShippingOrder => "shipping_orders",
        }
    }

    /// The scalar field every record of this type must carry in `entities`.
    pub fn identifier_field(self) -> &'static str {
        match self {
            Self::Invoice => "invoice_number",
            Self::PurchaseOrder => "po_number",
            Self::ShippingOrder => "order_number",
        }
    }

    /// Human label used in issue messages and report headings.
    pub fn label(self) -> &'static str {
        match self {
            Self::Invoice => "Invoice",
            Self::PurchaseOrder => "Purchase order",
            Self::ShippingOrder => "Shipping order",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for DocumentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::InvalidConfig(format!("unknown document type '{}'", s)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Fallback for addresses that were not broken into parts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
}

/// One priced line on an invoice or purchase order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
    /// Harmonized System tariff code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hs_code: Option<String>,
}

/// One physical consignment line on a shipping order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CargoItem {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceEntities {
    pub invoice_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<Company>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer: Option<Company>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_terms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrderEntities {
    pub po_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub po_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer: Option<Company>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<Company>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_terms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Shipping order or bill of lading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShippingOrderEntities {
    pub order_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipper: Option<Company>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consignee: Option<Company>,
    #[serde(default)]
    pub cargo_items: Vec<CargoItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vessel_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Category-specific business fields, tagged by `document_type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "document_type", rename_all = "snake_case")]
pub enum Entities {
    Invoice(InvoiceEntities),
    PurchaseOrder(PurchaseOrderEntities),
    ShippingOrder(ShippingOrderEntities),
}

impl Entities {
    pub fn document_type(&self) -> DocumentType {
        match self {
            Self::Invoice(_) => DocumentType::Invoice,
            Self::PurchaseOrder(_) => DocumentType::PurchaseOrder,
            Self::ShippingOrder(_) => DocumentType::ShippingOrder,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub document_id: DocumentId,
    pub filename: String,
    pub document_type: DocumentType,
    pub entities: Entities,
    #[serde(default)]
    pub annotation_metadata: Metadata,
}

impl Record {
    pub fn new(document_id: impl Into<String>, filename: impl Into<String>, entities: Entities, annotation_metadata: Metadata) -> Self {
        Self {
            document_id: document_id.into(),
            filename: filename.into(),
            document_type: entities.document_type(),
            entities,
            annotation_metadata,
        }
    }
}
