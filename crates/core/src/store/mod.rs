mod error;
mod traits;
mod types;

pub use error::{StoreError, StoreResult};
pub use traits::ItemStore;
pub use types::{Attributes, ContinuationToken, Dto, Item, QueryPage, QueryRequest};
