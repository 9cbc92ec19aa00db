use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One sold line item joined to its buyer. A product bought in N sales
/// yields N rows; the duplication is what demographic counting is based on.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct TransactionProductRow {
    pub product_id: i32,
    pub product_name: String,
    pub gender: String,
    pub age: i32,
}

/// A pair of products sold together, canonically ordered by product id
/// (a < b) at query level, already filtered to count > 3.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct FrequencyPair {
    pub product_a: String,
    pub product_b: String,
    pub count: i64,
}

/// One order with its customer fields embedded. Every non-key column is
/// optional; defaults are applied at transform time, never here.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct OrderRow {
    pub id: i32,
    pub order_date: Option<NaiveDate>,
    pub order_total: Option<BigDecimal>,
    pub customer_id: Option<i32>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_gender: Option<String>,
    pub customer_age: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct OrderItemRow {
    pub order_id: i32,
    pub product_id: Option<i32>,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<i32>,
    pub unit_price: Option<BigDecimal>,
}

/// An order with its item rows attached. `items` may be empty; an order
/// without items is still emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderWithItems {
    pub order: OrderRow,
    pub items: Vec<OrderItemRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileEntry {
    #[serde(rename = "Product")]
    pub product: String,
    #[serde(rename = "Predominant_Gender")]
    pub predominant_gender: String,
    #[serde(rename = "Predominant_Age_Range")]
    pub predominant_age_range: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileReport {
    pub processing_date: String,
    pub data: Vec<ProfileEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairEntry {
    #[serde(rename = "Product_1")]
    pub product_1: String,
    #[serde(rename = "Product_2")]
    pub product_2: String,
    #[serde(rename = "Count")]
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairsReport {
    pub processing_date: String,
    pub data: Vec<PairEntry>,
}

/// Denormalized order export. Money fields stay `BigDecimal` until the load
/// boundary converts them for the document encoding, so this report is not
/// serialized directly.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdersReport {
    pub processing_date: String,
    pub generated_at: String,
    pub data: Vec<DwOrder>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DwOrder {
    pub order_id: i32,
    pub order_date: String,
    pub order_total: Option<BigDecimal>,
    pub categories: Vec<String>,
    pub customer: DwCustomer,
    pub items: Vec<DwOrderItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DwCustomer {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub gender: String,
    pub age: i32,
    pub age_group: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DwOrderItem {
    pub product_id: i32,
    pub product_name: String,
    pub category: String,
    pub quantity: i32,
    pub unit_price: Option<BigDecimal>,
    pub total_price: Option<BigDecimal>,
}

/// Per-flow stage timings and outcome, keyed by flow name in the run report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowMetrics {
    pub extract_duration: f64,
    pub transform_duration: f64,
    pub load_duration: f64,
    pub records_extracted: usize,
    pub success: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Success,
    PartialSuccess,
    Failed,
}

/// The consolidated result of one pipeline run, the sole contract surfaced
/// to the CLI wrapper. Everything in here is plain JSON-serializable data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub status: RunStatus,
    pub start_time: String,
    pub end_time: String,
    pub total_duration_seconds: f64,
    pub metrics: BTreeMap<String, FlowMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}
