use crate::domain::model::{FrequencyPair, OrderWithItems, TransactionProductRow};
use crate::domain::ports::SalesDatabase;
use crate::utils::error::Result;
use std::collections::HashMap;

/// Read side of the pipeline. Each operation is independent and read-only;
/// query errors are logged and propagated to the caller, never retried.
pub struct Extractor<D: SalesDatabase> {
    db: D,
}

impl<D: SalesDatabase> Extractor<D> {
    pub fn new(db: D) -> Self {
        Self { db }
    }

    /// One row per sold line item joined to its buyer, unfiltered.
    pub async fn fetch_transaction_products(&self) -> Result<Vec<TransactionProductRow>> {
        let rows = self.db.transaction_products().await.map_err(|e| {
            tracing::error!("❌ Error fetching transaction products: {}", e);
            e
        })?;
        tracing::info!("📥 Fetched {} transaction products", rows.len());
        Ok(rows)
    }

    /// Product pairs sold together more than 3 times, descending by count.
    pub async fn fetch_frequency_itemsets(&self) -> Result<Vec<FrequencyPair>> {
        let pairs = self.db.frequency_pairs().await.map_err(|e| {
            tracing::error!("❌ Error fetching frequency itemsets: {}", e);
            e
        })?;
        tracing::info!("📥 Fetched {} frequency itemsets", pairs.len());
        Ok(pairs)
    }

    /// Two-phase fetch: all orders (newest first), then one batched item
    /// lookup grouped by order id. When there are no orders the second
    /// query is skipped entirely.
    pub async fn fetch_orders_with_items(&self) -> Result<Vec<OrderWithItems>> {
        let orders = self.db.orders_with_customers().await.map_err(|e| {
            tracing::error!("❌ Error fetching orders: {}", e);
            e
        })?;

        if orders.is_empty() {
            tracing::info!("📥 No orders found, skipping item lookup");
            return Ok(Vec::new());
        }

        let order_ids: Vec<i32> = orders.iter().map(|order| order.id).collect();
        let items = self.db.items_for_orders(&order_ids).await.map_err(|e| {
            tracing::error!("❌ Error fetching order items: {}", e);
            e
        })?;

        let mut items_by_order: HashMap<i32, Vec<_>> = HashMap::new();
        for item in items {
            items_by_order.entry(item.order_id).or_default().push(item);
        }

        let assembled: Vec<OrderWithItems> = orders
            .into_iter()
            .map(|order| {
                let items = items_by_order.remove(&order.id).unwrap_or_default();
                OrderWithItems { order, items }
            })
            .collect();

        tracing::info!("📥 Fetched {} orders with their items", assembled.len());
        Ok(assembled)
    }
}
