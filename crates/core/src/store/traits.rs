use async_trait::async_trait;

use crate::namespace::ItemKey;

use super::{Item, QueryPage, QueryRequest, StoreResult};

/// Request/response contract of the single-table key/value store.
///
/// Implementations hold no per-call state, so one instance is shared by
/// every concurrent DAO call.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Point read. `None` when the store has no item under `key`.
    async fn get_item(&self, table_name: &str, key: &ItemKey) -> StoreResult<Option<Item>>;

    /// Fetch one page of a partition query.
    async fn query(&self, request: &QueryRequest) -> StoreResult<QueryPage>;

    /// Point write of a full item.
    async fn put_item(&self, table_name: &str, item: Item) -> StoreResult<()>;

    /// Write up to 25 items in one request.
    async fn batch_put(&self, table_name: &str, items: Vec<Item>) -> StoreResult<()>;

    /// Delete an item. Deleting a missing key is not an error.
    async fn delete_item(&self, table_name: &str, key: &ItemKey) -> StoreResult<()>;
}

#[async_trait]
impl<S: ItemStore + ?Sized> ItemStore for std::sync::Arc<S> {
    async fn get_item(&self, table_name: &str, key: &ItemKey) -> StoreResult<Option<Item>> {
        (**self).get_item(table_name, key).await
    }

    async fn query(&self, request: &QueryRequest) -> StoreResult<QueryPage> {
        (**self).query(request).await
    }

    async fn put_item(&self, table_name: &str, item: Item) -> StoreResult<()> {
        (**self).put_item(table_name, item).await
    }

    async fn batch_put(&self, table_name: &str, items: Vec<Item>) -> StoreResult<()> {
        (**self).batch_put(table_name, items).await
    }

    async fn delete_item(&self, table_name: &str, key: &ItemKey) -> StoreResult<()> {
        (**self).delete_item(table_name, key).await
    }
}
