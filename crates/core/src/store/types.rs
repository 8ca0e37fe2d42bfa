use serde::{Deserialize, Serialize};

/// Untyped attribute map.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Store-native item: always carries `pk` and `sk` plus domain attributes.
pub type Item = Attributes;

/// Caller-facing shape of an item.
pub type Dto = Attributes;

/// Opaque marker returned by a range query when more results exist.
///
/// Holds the key of the last evaluated item exactly as the store returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuationToken(pub Item);

/// Range query: every item of one partition whose sort key starts with a prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub table_name: String,
    pub partition_key: String,
    pub sort_key_prefix: String,
    pub exclusive_start_key: Option<ContinuationToken>,
}

impl QueryRequest {
    pub fn new(
        table_name: impl Into<String>,
        partition_key: impl Into<String>,
        sort_key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            partition_key: partition_key.into(),
            sort_key_prefix: sort_key_prefix.into(),
            exclusive_start_key: None,
        }
    }

    /// Continue after the given token.
    pub fn starting_after(mut self, token: Option<ContinuationToken>) -> Self {
        self.exclusive_start_key = token;
        self
    }
}

/// One page of range query results, in sort key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPage {
    pub items: Vec<Item>,
    pub continuation: Option<ContinuationToken>,
}

impl QueryPage {
    pub fn last(items: Vec<Item>) -> Self {
        Self {
            items,
            continuation: None,
        }
    }

    pub fn with_continuation(items: Vec<Item>, token: ContinuationToken) -> Self {
        Self {
            items,
            continuation: Some(token),
        }
    }
}
