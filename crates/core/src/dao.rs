//! Item data-access object.
//!
//! [`ItemDao`] pairs an [`ItemStore`] with a [`KeyMapper`] and exposes the
//! four item operations. Pagination and batch chunking stay private.

use std::marker::PhantomData;

use futures_util::future::join_all;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::mapper::KeyMapper;
use crate::namespace::{PK_ATTRIBUTE, SK_ATTRIBUTE};
use crate::store::{Item, ItemStore, QueryRequest, StoreResult};

/// Per-request item limit of a batch write.
pub const MAX_BATCH_WRITE_ITEMS: usize = 25;

/// Typed access to the items of one namespace in one table.
///
/// `T` is the caller's DTO type. It must serialize to a JSON object.
pub struct ItemDao<T, S, M> {
    store: S,
    table_name: String,
    mapper: M,
    _dto: PhantomData<fn() -> T>,
}

impl<T, S, M> ItemDao<T, S, M>
where
    T: Serialize + DeserializeOwned,
    S: ItemStore,
    M: KeyMapper,
{
    /// Creates a DAO over an already-built store client.
    pub fn new(store: S, table_name: impl Into<String>, mapper: M) -> Self {
        Self {
            store,
            table_name: table_name.into(),
            mapper,
            _dto: PhantomData,
        }
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    /// Fetches one item. `None` when the store has no such item.
    pub async fn get(&self, pk: &str, sk: &str) -> Result<Option<T>> {
        let key = self.mapper.item_key(pk, sk)?;
        tracing::debug!(table = %self.table_name, pk = %key.pk, sk = %key.sk, "get item");

        let item = self
            .store
            .get_item(&self.table_name, &key)
            .await
            .inspect_err(|e| tracing::debug!(error = %e, "GetItem failed"))?;

        item.map(|item| self.decode(&item)).transpose()
    }

    /// Fetches every item of a partition within this namespace, in sort key order.
    pub async fn get_all(&self, pk: &str) -> Result<Vec<T>> {
        let partition_key = self.mapper.partition_key(pk)?;
        self.query_all(partition_key).await
    }

    /// Writes one item.
    pub async fn put(&self, dto: &T) -> Result<()> {
        let item = self.encode(dto)?;
        tracing::debug!(
            table = %self.table_name,
            pk = ?item.get(PK_ATTRIBUTE),
            sk = ?item.get(SK_ATTRIBUTE),
            "put item"
        );

        self.store
            .put_item(&self.table_name, item)
            .await
            .inspect_err(|e| tracing::debug!(error = %e, "PutItem failed"))?;

        Ok(())
    }

    /// Writes many items with batch requests of at most 25 items each.
    ///
    /// Every DTO is validated before the first request goes out. Batches are
    /// sent concurrently and are not atomic as a group: when one fails, the
    /// others may already be persisted.
    pub async fn put_all(&self, dtos: &[T]) -> Result<()> {
        let items = dtos
            .iter()
            .map(|dto| self.encode(dto))
            .collect::<Result<Vec<_>>>()?;

        if items.is_empty() {
            return Ok(());
        }

        self.batch_put(items).await
    }

    /// Deletes one item. Succeeds when the item does not exist.
    pub async fn delete(&self, pk: &str, sk: &str) -> Result<()> {
        let key = self.mapper.item_key(pk, sk)?;
        tracing::debug!(table = %self.table_name, pk = %key.pk, sk = %key.sk, "delete item");

        self.store
            .delete_item(&self.table_name, &key)
            .await
            .inspect_err(|e| tracing::debug!(error = %e, "DeleteItem failed"))?;

        Ok(())
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    /// Follows continuation tokens until the store reports the last page.
    async fn query_all(&self, partition_key: String) -> Result<Vec<T>> {
        let mut request = QueryRequest::new(
            &self.table_name,
            partition_key,
            self.mapper.sort_key_prefix(),
        );
        let mut results = Vec::new();
        let mut pages = 0usize;

        loop {
            let page = self
                .store
                .query(&request)
                .await
                .inspect_err(|e| tracing::debug!(error = %e, page = pages, "Query failed"))?;
            pages += 1;

            for item in &page.items {
                results.push(self.decode(item)?);
            }

            match page.continuation {
                Some(token) => request.exclusive_start_key = Some(token),
                None => break,
            }
        }

        tracing::debug!(
            table = %self.table_name,
            pk = %request.partition_key,
            pages,
            items = results.len(),
            "query complete"
        );

        Ok(results)
    }

    async fn batch_put(&self, items: Vec<Item>) -> Result<()> {
        let chunks = chunk_items(items, MAX_BATCH_WRITE_ITEMS);
        tracing::debug!(table = %self.table_name, chunks = chunks.len(), "batch put");

        let results = join_all(
            chunks
                .into_iter()
                .map(|chunk| self.store.batch_put(&self.table_name, chunk)),
        )
        .await;

        results
            .into_iter()
            .collect::<StoreResult<Vec<()>>>()
            .inspect_err(|e| tracing::debug!(error = %e, "BatchWriteItem failed"))?;

        Ok(())
    }

    fn encode(&self, dto: &T) -> Result<Item> {
        match serde_json::to_value(dto) {
            Ok(Value::Object(map)) => self.mapper.to_item(&map),
            Ok(other) => Err(Error::InvalidArgument(format!(
                "DTO must serialize to an object, got {other}"
            ))),
            Err(e) => Err(Error::Serialization(e.to_string())),
        }
    }

    fn decode(&self, item: &Item) -> Result<T> {
        let dto = self.mapper.to_dto(item);
        serde_json::from_value(Value::Object(dto))
            .map_err(|e| Error::Serialization(e.to_string()))
    }
}

/// Split items into consecutive groups of at most `size`, keeping input order.
fn chunk_items(items: Vec<Item>, size: usize) -> Vec<Vec<Item>> {
    let mut chunks = Vec::with_capacity(items.len().div_ceil(size));
    let mut iter = items.into_iter().peekable();
    while iter.peek().is_some() {
        chunks.push(iter.by_ref().take(size).collect());
    }
    chunks
}
