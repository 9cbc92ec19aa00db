use crate::domain::model::{FrequencyPair, OrderItemRow, OrderRow, TransactionProductRow};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Read capability over the relational sales store. The extractor receives
/// an implementation at construction; core code never touches a connection
/// or pool directly.
#[async_trait]
pub trait SalesDatabase: Send + Sync {
    /// Flat transaction-product rows, one per (product, sale) occurrence.
    async fn transaction_products(&self) -> Result<Vec<TransactionProductRow>>;

    /// Co-purchase pairs with canonical id ordering, count > 3, descending.
    async fn frequency_pairs(&self) -> Result<Vec<FrequencyPair>>;

    /// All orders with embedded customer fields, newest first.
    async fn orders_with_customers(&self) -> Result<Vec<OrderRow>>;

    /// Item rows for the given order ids in one batched lookup.
    async fn items_for_orders(&self, order_ids: &[i32]) -> Result<Vec<OrderItemRow>>;
}

/// Insert capability over the document warehouse. Returns the inserted
/// document id.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    async fn insert_document(
        &self,
        database: &str,
        collection: &str,
        document: &serde_json::Value,
    ) -> Result<String>;
}
