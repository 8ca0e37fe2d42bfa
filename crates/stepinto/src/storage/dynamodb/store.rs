//! DynamoDB `ItemStore` implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, PutRequest, WriteRequest};
use aws_sdk_dynamodb::Client;
use stepinto_core::namespace::{PK_ATTRIBUTE, SK_ATTRIBUTE};
use stepinto_core::store::StoreResult;
use stepinto_core::{ContinuationToken, Item, ItemKey, ItemStore, QueryPage, QueryRequest};

use super::client::{create_client, AwsConfig};
use super::conversions::{dynamo_to_item, item_to_dynamo};
use super::error::{map_conversion_error, map_sdk_error, ConversionError};

/// Partition query: exact `pk`, `sk` starting with the namespace prefix.
pub const KEY_CONDITION_EXPRESSION: &str = "pk = :pk AND begins_with(sk, :sk)";

/// DynamoDB-based item store.
///
/// The SDK client is cheap to clone and safe to share across tasks.
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: Client,
}

impl DynamoDbStore {
    /// Creates a new store with the given DynamoDB client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a new store, building the client from `config`.
    pub async fn from_config(config: &AwsConfig) -> Self {
        Self::new(create_client(config).await)
    }

    /// Get the underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Key attributes of a point request.
fn key_attributes(key: &ItemKey) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (PK_ATTRIBUTE.to_string(), AttributeValue::S(key.pk.clone())),
        (SK_ATTRIBUTE.to_string(), AttributeValue::S(key.sk.clone())),
    ])
}

/// Expression values bound to [`KEY_CONDITION_EXPRESSION`].
fn query_values(request: &QueryRequest) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            ":pk".to_string(),
            AttributeValue::S(request.partition_key.clone()),
        ),
        (
            ":sk".to_string(),
            AttributeValue::S(request.sort_key_prefix.clone()),
        ),
    ])
}

/// One `PutRequest` per item, in input order.
fn write_requests(items: &[Item]) -> Result<Vec<WriteRequest>, ConversionError> {
    items
        .iter()
        .map(|item| {
            let put = PutRequest::builder()
                .set_item(Some(item_to_dynamo(item)?))
                .build()
                .map_err(|e| ConversionError::Build(e.to_string()))?;
            Ok(WriteRequest::builder().put_request(put).build())
        })
        .collect()
}

#[async_trait]
impl ItemStore for DynamoDbStore {
    async fn get_item(&self, table_name: &str, key: &ItemKey) -> StoreResult<Option<Item>> {
        let result = self
            .client
            .get_item()
            .table_name(table_name)
            .set_key(Some(key_attributes(key)))
            .send()
            .await
            .map_err(|e| map_sdk_error("GetItem", e))?;

        result
            .item
            .map(|item| dynamo_to_item(&item))
            .transpose()
            .map_err(map_conversion_error)
    }

    async fn query(&self, request: &QueryRequest) -> StoreResult<QueryPage> {
        let start_key = request
            .exclusive_start_key
            .as_ref()
            .map(|token| item_to_dynamo(&token.0))
            .transpose()
            .map_err(map_conversion_error)?;

        let result = self
            .client
            .query()
            .table_name(&request.table_name)
            .key_condition_expression(KEY_CONDITION_EXPRESSION)
            .set_expression_attribute_values(Some(query_values(request)))
            .set_exclusive_start_key(start_key)
            .send()
            .await
            .map_err(|e| map_sdk_error("Query", e))?;

        let items = result
            .items
            .unwrap_or_default()
            .iter()
            .map(dynamo_to_item)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_conversion_error)?;

        let continuation = result
            .last_evaluated_key
            .map(|key| dynamo_to_item(&key).map(ContinuationToken))
            .transpose()
            .map_err(map_conversion_error)?;

        Ok(QueryPage {
            items,
            continuation,
        })
    }

    async fn put_item(&self, table_name: &str, item: Item) -> StoreResult<()> {
        let item = item_to_dynamo(&item).map_err(map_conversion_error)?;

        self.client
            .put_item()
            .table_name(table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| map_sdk_error("PutItem", e))?;

        Ok(())
    }

    /// Writes one batch.
    ///
    /// Items DynamoDB returns in `UnprocessedItems` (throttling, capacity) are
    /// logged and not retried. The call still succeeds, so those items are
    /// not written.
    async fn batch_put(&self, table_name: &str, items: Vec<Item>) -> StoreResult<()> {
        let requests = write_requests(&items).map_err(map_conversion_error)?;

        let result = self
            .client
            .batch_write_item()
            .request_items(table_name, requests)
            .send()
            .await
            .map_err(|e| map_sdk_error("BatchWriteItem", e))?;

        let unprocessed = result
            .unprocessed_items
            .as_ref()
            .and_then(|tables| tables.get(table_name))
            .map_or(0, Vec::len);
        if unprocessed > 0 {
            tracing::warn!(
                table = table_name,
                unprocessed,
                "BatchWriteItem left items unprocessed"
            );
        }

        Ok(())
    }

    async fn delete_item(&self, table_name: &str, key: &ItemKey) -> StoreResult<()> {
        self.client
            .delete_item()
            .table_name(table_name)
            .set_key(Some(key_attributes(key)))
            .send()
            .await
            .map_err(|e| map_sdk_error("DeleteItem", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(pk: &str, sk: &str) -> Item {
        let mut item = Item::new();
        item.insert("pk".to_string(), json!(pk));
        item.insert("sk".to_string(), json!(sk));
        item
    }

    #[test]
    fn test_key_condition_expression() {
        assert_eq!(
            KEY_CONDITION_EXPRESSION,
            "pk = :pk AND begins_with(sk, :sk)"
        );
    }

    #[test]
    fn test_key_attributes() {
        let key = key_attributes(&ItemKey::new("primary#id", "sort#value"));
        assert_eq!(key["pk"], AttributeValue::S("primary#id".to_string()));
        assert_eq!(key["sk"], AttributeValue::S("sort#value".to_string()));
    }

    #[test]
    fn test_query_values() {
        let values = query_values(&QueryRequest::new("Table", "primary#id", "sort#"));
        assert_eq!(values.len(), 2);
        assert_eq!(values[":pk"], AttributeValue::S("primary#id".to_string()));
        assert_eq!(values[":sk"], AttributeValue::S("sort#".to_string()));
    }

    #[test]
    fn test_write_requests_preserve_order() {
        let items = vec![item("primary#id", "sort#a"), item("primary#id", "sort#b")];

        let requests = write_requests(&items).unwrap();

        let sort_keys: Vec<_> = requests
            .iter()
            .map(|r| r.put_request().unwrap().item()["sk"].clone())
            .collect();
        assert_eq!(
            sort_keys,
            vec![
                AttributeValue::S("sort#a".to_string()),
                AttributeValue::S("sort#b".to_string()),
            ]
        );
    }
}
