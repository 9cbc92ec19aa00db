use crate::domain::model::{OrdersReport, PairsReport, ProfileReport};
use crate::domain::ports::DocumentSink;
use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::Utc;
use serde_json::{json, Value};

pub const PROFILE_COLLECTION: &str = "ETL-predominant_profile";
pub const PAIRS_COLLECTION: &str = "ETL-most_common_products";
pub const ORDERS_COLLECTION: &str = "ETL-orders";

pub const ETL_VERSION: &str = "1.0.0";

/// Write side of the pipeline. Every operation inserts exactly one document
/// into its per-flow collection and reports the outcome as a bool: sink and
/// serialization errors are absorbed here so the controller can record a
/// partial failure without aborting sibling flows.
pub struct Loader<S: DocumentSink> {
    sink: S,
    database: String,
}

impl<S: DocumentSink> Loader<S> {
    pub fn new(sink: S, database: impl Into<String>) -> Self {
        Self {
            sink,
            database: database.into(),
        }
    }

    pub async fn load_predominant_profile(&self, report: &ProfileReport) -> bool {
        let document = match serde_json::to_value(report) {
            Ok(document) => document,
            Err(e) => {
                tracing::error!("❌ Error serializing predominant profile report: {}", e);
                return false;
            }
        };
        self.insert(PROFILE_COLLECTION, document, "predominant profile")
            .await
    }

    pub async fn load_most_common_products(&self, report: &PairsReport) -> bool {
        let document = match serde_json::to_value(report) {
            Ok(document) => document,
            Err(e) => {
                tracing::error!("❌ Error serializing most common products report: {}", e);
                return false;
            }
        };
        self.insert(PAIRS_COLLECTION, document, "most common products")
            .await
    }

    pub async fn load_orders(&self, report: &OrdersReport) -> bool {
        let document = orders_document(report);
        self.insert(ORDERS_COLLECTION, document, "orders").await
    }

    async fn insert(&self, collection: &str, mut document: Value, label: &str) -> bool {
        stamp_metadata(&mut document);
        match self
            .sink
            .insert_document(&self.database, collection, &document)
            .await
        {
            Ok(id) => {
                tracing::info!("💾 Loaded {} data into {}. ID: {}", label, collection, id);
                true
            }
            Err(e) => {
                tracing::error!("❌ Error loading {} data: {}", label, e);
                false
            }
        }
    }
}

fn stamp_metadata(document: &mut Value) {
    if let Value::Object(map) = document {
        map.insert(
            "loaded_at".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        map.insert(
            "etl_version".to_string(),
            Value::String(ETL_VERSION.to_string()),
        );
    }
}

/// The document encoding has no arbitrary-precision numeric type, so money
/// values are converted to floats here. Anything that does not survive the
/// conversion becomes null instead of failing the load.
pub fn decimal_to_json(value: &BigDecimal) -> Value {
    value
        .to_f64()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn optional_decimal(value: &Option<BigDecimal>) -> Value {
    value.as_ref().map(decimal_to_json).unwrap_or(Value::Null)
}

fn orders_document(report: &OrdersReport) -> Value {
    let data: Vec<Value> = report
        .data
        .iter()
        .map(|order| {
            let items: Vec<Value> = order
                .items
                .iter()
                .map(|item| {
                    json!({
                        "product_id": item.product_id,
                        "product_name": item.product_name,
                        "category": item.category,
                        "quantity": item.quantity,
                        "unit_price": optional_decimal(&item.unit_price),
                        "total_price": optional_decimal(&item.total_price),
                    })
                })
                .collect();

            json!({
                "order_id": order.order_id,
                "order_date": order.order_date,
                "order_total": optional_decimal(&order.order_total),
                "categories": order.categories,
                "customer": {
                    "id": order.customer.id,
                    "name": order.customer.name,
                    "email": order.customer.email,
                    "gender": order.customer.gender,
                    "age": order.customer.age,
                    "age_group": order.customer.age_group,
                },
                "items": items,
            })
        })
        .collect();

    json!({
        "processing_date": report.processing_date,
        "generated_at": report.generated_at,
        "data": data,
    })
}
