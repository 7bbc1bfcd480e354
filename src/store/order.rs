use chrono::Utc;
use serde::Serialize;
use std::fmt;

/// Display-only order reference: `ORD-<last 4 digits of the timestamp in ms>-<3 random digits>`.
///
/// Nothing checks these for collisions against the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis().unsigned_abs();
        Self::from_parts(millis, rand::random_range(0..1000))
    }

    pub fn from_parts(timestamp_millis: u64, random: u32) -> Self {
        Self(format!(
            "ORD-{:04}-{:03}",
            timestamp_millis % 10_000,
            random % 1000
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reads a quantity the way a browser number field coerces it: the leading
/// integer of the trimmed input, 0 when there is none. Negative values count as 0
/// and values too large for `u64` saturate.
pub fn parse_quantity(input: &str) -> u64 {
    let trimmed = input.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    if negative {
        return 0;
    }
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return 0;
    }
    digits[..end].parse::<u64>().unwrap_or(u64::MAX)
}

pub fn line_total(quantity: u64, unit_price: f64) -> f64 {
    quantity as f64 * unit_price
}

/// Two-decimal rendering used by the total field.
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Human-readable recap shown once an order is confirmed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    pub customer_name: String,
    pub phone: String,
    pub product: String,
    pub quantity: String,
    pub total: String,
    pub note: Option<String>,
}

impl OrderSummary {
    pub fn lines(&self) -> Vec<(&'static str, String)> {
        let mut lines = vec![
            ("Nombre", self.customer_name.clone()),
            ("Teléfono", self.phone.clone()),
            ("Producto", self.product.clone()),
            ("Cantidad", self.quantity.clone()),
            ("Total", format!("Q{}", self.total)),
        ];
        if let Some(note) = &self.note {
            lines.push(("Instrucciones", note.clone()));
        }
        lines
    }
}

impl fmt::Display for OrderSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in self.lines() {
            writeln!(f, "{label}: {value}")?;
        }
        Ok(())
    }
}

/// What the visitor sees after submitting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Confirmation {
    pub order_number: OrderNumber,
    pub summary: OrderSummary,
}

/// Body of the `submitOrder` call. Values travel as the form strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRequest {
    pub action: &'static str,
    #[serde(rename = "nombre")]
    pub customer_name: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "producto_id")]
    pub product_id: String,
    #[serde(rename = "producto_nombre")]
    pub product_name: String,
    #[serde(rename = "cantidad")]
    pub quantity: String,
    pub total: String,
    #[serde(rename = "mensaje")]
    pub note: String,
    #[serde(rename = "orderNumber")]
    pub order_number: OrderNumber,
}

pub const SUBMIT_ORDER_ACTION: &str = "submitOrder";

impl OrderRequest {
    pub fn from_confirmation(product_id: u32, confirmation: &Confirmation) -> Self {
        let summary = &confirmation.summary;
        Self {
            action: SUBMIT_ORDER_ACTION,
            customer_name: summary.customer_name.clone(),
            phone: summary.phone.clone(),
            product_id: product_id.to_string(),
            product_name: summary.product.clone(),
            quantity: summary.quantity.clone(),
            total: summary.total.clone(),
            note: summary.note.clone().unwrap_or_default(),
            order_number: confirmation.order_number.clone(),
        }
    }
}
