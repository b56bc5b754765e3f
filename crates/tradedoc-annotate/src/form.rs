//! Declarative annotation forms.
//!
//! Each document type is described by an ordered list of [`FieldDescriptor`]s.
//! [`fill_form`] walks that list against any [`FormFiller`] and returns the
//! answers as a JSON object shaped like the type's entities.

use serde_json::{json, Map, Value};

use tradedoc_core::traits::FormFiller;
use tradedoc_core::types::DocumentType;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    Number,
    /// Name, optional address; phone and email when `contact` is set.
    Company { contact: bool },
    Address,
    /// Repeated group, always written as an array.
    Items(&'static [FieldDescriptor]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Presence {
    Required,
    Optional,
    /// Asked only if the yes/no question is answered yes.
    Gated { question: &'static str, default: bool },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
    pub default: Option<&'static str>,
}

const fn field(name: &'static str, label: &'static str, kind: FieldKind, presence: Presence) -> FieldDescriptor {
    FieldDescriptor { name, label, kind, presence, default: None }
}

const fn text(name: &'static str, label: &'static str) -> FieldDescriptor { field(name, label, FieldKind::Text, Presence::Optional) }

const fn number(name: &'static str, label: &'static str) -> FieldDescriptor { field(name, label, FieldKind::Number, Presence::Optional) }

const fn required(name: &'static str, label: &'static str) -> FieldDescriptor { field(name, label, FieldKind::Text, Presence::Required) }

const fn with_default(name: &'static str, label: &'static str, default: &'static str) -> FieldDescriptor {
    FieldDescriptor { name, label, kind: FieldKind::Text, presence: Presence::Optional, default: Some(default) }
}

const fn gated(name: &'static str, label: &'static str, kind: FieldKind, question: &'static str, default: bool) -> FieldDescriptor {
    field(name, label, kind, Presence::Gated { question, default })
}

const INVOICE_LINE: &[FieldDescriptor] = &[
    required("description", "Description"),
    number("quantity", "Quantity"),
    text("unit", "Unit (pcs/kg/etc)"),
    number("unit_price", "Unit Price"),
    number("total_price", "Total Price"),
];

const PO_LINE: &[FieldDescriptor] = &[required("description", "Description"), number("quantity", "Quantity"), text("unit", "Unit"), number("unit_price", "Unit Price")];

const CARGO_LINE: &[FieldDescriptor] = &[
    required("description", "Description"),
    number("quantity", "Quantity"),
    number("weight", "Weight"),
    with_default("weight_unit", "Weight Unit", "kg"),
    text("dimensions", "Dimensions"),
    text("package_type", "Package Type (carton/pallet/etc)"),
];

pub const INVOICE_FORM: &[FieldDescriptor] = &[
    required("invoice_number", "📄 Invoice Number"),
    text("invoice_date", "📅 Invoice Date (YYYY-MM-DD)"),
    with_default("currency", "💱 Currency", "USD"),
    gated("seller", "Seller/Vendor", FieldKind::Company { contact: true }, "➕ Add seller information?", true),
    gated("buyer", "Buyer", FieldKind::Company { contact: true }, "➕ Add buyer information?", true),
    gated("line_items", "Line Items", FieldKind::Items(INVOICE_LINE), "➕ Add line items?", true),
    number("subtotal", "💰 Subtotal"),
    number("tax", "💰 Tax"),
    number("total", "💰 Total Amount"),
    text("payment_terms", "📋 Payment Terms"),
    text("due_date", "📅 Due Date (YYYY-MM-DD)"),
    text("notes", "📝 Notes"),
];

pub const PURCHASE_ORDER_FORM: &[FieldDescriptor] = &[
    required("po_number", "📄 PO Number"),
    text("po_date", "📅 PO Date (YYYY-MM-DD)"),
    with_default("currency", "💱 Currency", "USD"),
    gated("buyer", "Buyer", FieldKind::Company { contact: false }, "➕ Add buyer information?", true),
    gated("supplier", "Supplier", FieldKind::Company { contact: false }, "➕ Add supplier information?", true),
    gated("line_items", "Line Items", FieldKind::Items(PO_LINE), "➕ Add line items?", true),
    number("total", "💰 Total Amount"),
    text("delivery_date", "📅 Delivery Date (YYYY-MM-DD)"),
    gated("delivery_address", "Delivery Address", FieldKind::Address, "Add delivery address?", false),
    text("payment_terms", "📋 Payment Terms"),
    text("notes", "📝 Notes"),
];

pub const SHIPPING_ORDER_FORM: &[FieldDescriptor] = &[
    required("order_number", "📄 Order/BOL Number"),
    text("ship_date", "📅 Ship Date (YYYY-MM-DD)"),
    gated("shipper", "Shipper", FieldKind::Company { contact: false }, "➕ Add shipper information?", true),
    gated("consignee", "Consignee", FieldKind::Company { contact: false }, "➕ Add consignee information?", true),
    gated("cargo_items", "Cargo Items", FieldKind::Items(CARGO_LINE), "➕ Add cargo items?", true),
    number("total_weight", "⚖️  Total Weight"),
    with_default("weight_unit", "Weight Unit", "kg"),
    text("origin", "📍 Origin Port/Location"),
    text("destination", "📍 Destination Port/Location"),
    text("carrier", "🚢 Carrier Name"),
    text("tracking_number", "🔢 Tracking Number"),
    text("vessel_name", "🚢 Vessel Name"),
    text("container_number", "📦 Container Number"),
    text("notes", "📝 Notes"),
];

pub fn form_for(doc_type: DocumentType) -> &'static [FieldDescriptor] {
    match doc_type {
        DocumentType::Invoice => INVOICE_FORM,
        DocumentType::PurchaseOrder => PURCHASE_ORDER_FORM,
        DocumentType::ShippingOrder => SHIPPING_ORDER_FORM,
    }
}

/// Ask until a non-blank answer comes back.
fn ask_required(filler: &mut dyn FormFiller, prompt: &str, default: Option<&str>) -> anyhow::Result<String> {
    loop {
        if let Some(answer) = filler.ask(prompt, default)? {
            let answer = answer.trim();
            if !answer.is_empty() {
                return Ok(answer.to_string());
            }
        }
    }
}

fn ask_optional(filler: &mut dyn FormFiller, prompt: &str, default: Option<&str>) -> anyhow::Result<Option<String>> {
    Ok(filler.ask(prompt, default)?.map(|a| a.trim().to_string()).filter(|a| !a.is_empty()))
}

fn ask_number(filler: &mut dyn FormFiller, prompt: &str, default: Option<&str>, required: bool) -> anyhow::Result<Option<f64>> {
    loop {
        let answer = if required { Some(ask_required(filler, prompt, default)?) } else { ask_optional(filler, prompt, default)? };
        let Some(answer) = answer else { return Ok(None) };
        match answer.replace(',', "").parse::<f64>() {
            Ok(n) if n.is_finite() => return Ok(Some(n)),
            _ if required => tracing::warn!("'{}' is not a number, try again", answer),
            _ => {
                tracing::warn!("'{}' is not a number, field left empty", answer);
                return Ok(None);
            }
        }
    }
}

fn fill_company(filler: &mut dyn FormFiller, contact: bool) -> anyhow::Result<Value> {
    let mut company = Map::new();
    company.insert("name".into(), Value::String(ask_required(filler, "  Company Name", None)?));
    if filler.confirm("  Add address?", false)? {
        company.insert("address".into(), json!({ "full_address": ask_required(filler, "  Full Address", None)? }));
    }
    if contact {
        for (key, prompt) in [("phone", "  Phone"), ("email", "  Email")] {
            if let Some(v) = ask_optional(filler, prompt, None)? {
                company.insert(key.into(), Value::String(v));
            }
        }
    }
    Ok(Value::Object(company))
}

fn fill_items(filler: &mut dyn FormFiller, fields: &'static [FieldDescriptor]) -> anyhow::Result<Value> {
    let mut items = Vec::new();
    loop {
        let prefix = format!("  📦 Item {} ", items.len() + 1);
        items.push(Value::Object(fill_fields(fields, filler, &prefix)?));
        if !filler.confirm("  ➕ Add another item?", false)? {
            break;
        }
    }
    Ok(Value::Array(items))
}

fn fill_fields(fields: &[FieldDescriptor], filler: &mut dyn FormFiller, prefix: &str) -> anyhow::Result<Map<String, Value>> {
    let mut out = Map::new();
    for desc in fields {
        if let Presence::Gated { question, default } = desc.presence {
            if !filler.confirm(question, default)? {
                if let FieldKind::Items(_) = desc.kind {
                    out.insert(desc.name.into(), Value::Array(Vec::new()));
                }
                continue;
            }
        }
        let prompt = format!("{}{}", prefix, desc.label);
        let required = desc.presence != Presence::Optional;
        let value = match desc.kind {
            FieldKind::Text if required => Some(Value::String(ask_required(filler, &prompt, desc.default)?)),
            FieldKind::Text => ask_optional(filler, &prompt, desc.default)?.map(Value::String),
            FieldKind::Number => ask_number(filler, &prompt, desc.default, required)?.map(|n| json!(n)),
            FieldKind::Company { contact } => Some(fill_company(filler, contact)?),
            FieldKind::Address => Some(json!({ "full_address": ask_required(filler, &prompt, None)? })),
            FieldKind::Items(item_fields) => Some(fill_items(filler, item_fields)?),
        };
        if let Some(value) = value {
            out.insert(desc.name.into(), value);
        }
    }
    Ok(out)
}

/// Collect answers for `fields`; blank optional answers are omitted.
pub fn fill_form(fields: &[FieldDescriptor], filler: &mut dyn FormFiller) -> anyhow::Result<Map<String, Value>> { fill_fields(fields, filler, "") }
