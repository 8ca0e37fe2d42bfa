//! In-memory store implementation.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use stepinto_core::dao::MAX_BATCH_WRITE_ITEMS;
use stepinto_core::namespace::{PK_ATTRIBUTE, SK_ATTRIBUTE};
use stepinto_core::store::StoreResult;
use stepinto_core::{
    ContinuationToken, Item, ItemKey, ItemStore, QueryPage, QueryRequest, StoreError,
};
use tokio::sync::RwLock;

/// Default number of items per query page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

type Table = BTreeMap<ItemKey, Item>;

/// In-memory item store for testing.
///
/// Tables are `BTreeMap`s keyed by `(pk, sk)` wrapped in `Arc<RwLock<_>>`,
/// so queries come back in sort key order like DynamoDB. Data is not
/// persisted and will be lost when the last clone is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<HashMap<String, Table>>>,
    page_size: usize,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Creates a new empty store that splits query results into pages.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            tables: Arc::new(RwLock::new(HashMap::new())),
            page_size: page_size.max(1),
        }
    }

    /// Number of items stored in `table_name`.
    pub async fn len(&self, table_name: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table_name)
            .map_or(0, BTreeMap::len)
    }

    pub async fn is_empty(&self, table_name: &str) -> bool {
        self.len(table_name).await == 0
    }
}

fn string_attribute<'a>(item: &'a Item, name: &str) -> StoreResult<&'a str> {
    item.get(name).and_then(Value::as_str).ok_or_else(|| {
        StoreError::new(format!(
            "One of the required keys was not given a value: '{name}'"
        ))
    })
}

fn item_key(item: &Item) -> StoreResult<ItemKey> {
    Ok(ItemKey::new(
        string_attribute(item, PK_ATTRIBUTE)?,
        string_attribute(item, SK_ATTRIBUTE)?,
    ))
}

fn key_item(key: &ItemKey) -> Item {
    let mut item = Item::new();
    item.insert(PK_ATTRIBUTE.to_string(), Value::String(key.pk.clone()));
    item.insert(SK_ATTRIBUTE.to_string(), Value::String(key.sk.clone()));
    item
}

#[async_trait]
impl ItemStore for InMemoryStore {
    async fn get_item(&self, table_name: &str, key: &ItemKey) -> StoreResult<Option<Item>> {
        let tables = self.tables.read().await;
        Ok(tables.get(table_name).and_then(|t| t.get(key)).cloned())
    }

    async fn query(&self, request: &QueryRequest) -> StoreResult<QueryPage> {
        let tables = self.tables.read().await;
        let Some(table) = tables.get(&request.table_name) else {
            return Ok(QueryPage::default());
        };

        let lower = match &request.exclusive_start_key {
            Some(ContinuationToken(token)) => Bound::Excluded(item_key(token)?),
            None => Bound::Included(ItemKey::new(request.partition_key.clone(), "")),
        };

        let mut matching = table
            .range((lower, Bound::Unbounded))
            .take_while(|(key, _)| key.pk == request.partition_key)
            .filter(|(key, _)| key.sk.starts_with(&request.sort_key_prefix));

        let items: Vec<(ItemKey, Item)> = matching
            .by_ref()
            .take(self.page_size)
            .map(|(key, item)| (key.clone(), item.clone()))
            .collect();
        let has_more = matching.next().is_some();

        let continuation = match items.last() {
            Some((last_key, _)) if has_more => Some(ContinuationToken(key_item(last_key))),
            _ => None,
        };

        Ok(QueryPage {
            items: items.into_iter().map(|(_, item)| item).collect(),
            continuation,
        })
    }

    async fn put_item(&self, table_name: &str, item: Item) -> StoreResult<()> {
        let key = item_key(&item)?;
        let mut tables = self.tables.write().await;
        tables
            .entry(table_name.to_string())
            .or_default()
            .insert(key, item);
        Ok(())
    }

    async fn batch_put(&self, table_name: &str, items: Vec<Item>) -> StoreResult<()> {
        if items.len() > MAX_BATCH_WRITE_ITEMS {
            return Err(StoreError::new(format!(
                "Too many items requested for the BatchWriteItem call: {}",
                items.len()
            )));
        }

        // Validate the whole batch before writing any of it.
        let keyed = items
            .into_iter()
            .map(|item| item_key(&item).map(|key| (key, item)))
            .collect::<StoreResult<Vec<_>>>()?;

        let mut tables = self.tables.write().await;
        let table = tables.entry(table_name.to_string()).or_default();
        table.extend(keyed);
        Ok(())
    }

    async fn delete_item(&self, table_name: &str, key: &ItemKey) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(table) = tables.get_mut(table_name) {
            table.remove(key);
        }
        Ok(())
    }
}
