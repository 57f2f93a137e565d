use crate::{QueryOptions, SearchError, SearchResponse};
use async_trait::async_trait;

#[async_trait]
pub trait LogSearch {
    async fn search(&self, options: &QueryOptions) -> Result<SearchResponse, SearchError>;
}
