use crate::domain::ports::DocumentSink;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// Document-warehouse sink speaking an insertOne-style HTTP action API.
/// Connection pooling lives inside the reqwest client; the pipeline only
/// sees the `DocumentSink` capability.
pub struct HttpDocumentSink {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpDocumentSink {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

#[async_trait]
impl DocumentSink for HttpDocumentSink {
    async fn insert_document(
        &self,
        database: &str,
        collection: &str,
        document: &Value,
    ) -> Result<String> {
        let url = format!("{}/action/insertOne", self.endpoint.trim_end_matches('/'));
        let body = serde_json::json!({
            "database": database,
            "collection": collection,
            "document": document,
        });

        let mut request = self.client.post(&url).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.header("api-key", api_key);
        }

        tracing::debug!("📡 Inserting document into {}.{}", database, collection);
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(EtlError::WarehouseError {
                message: format!(
                    "insert into {}.{} failed with status {}",
                    database,
                    collection,
                    response.status()
                ),
            });
        }

        let reply: Value = response.json().await?;
        let inserted_id = reply
            .get("insertedId")
            .and_then(|value| value.as_str())
            .unwrap_or_default()
            .to_string();
        Ok(inserted_id)
    }
}
