pub mod error;
pub mod highlight;
pub mod models;
pub mod query;
pub mod stores;
pub mod traits;

pub use error::SearchError;
pub use highlight::{render_fragment, MarkerStyle, HIGHLIGHT_POST_TAG, HIGHLIGHT_PRE_TAG};
pub use models::{Hit, Hits, QueryOptions, SearchResponse};
pub use query::{build_query, SearchBody};
pub use stores::{echo_query, ClientConfig, EsClient, DEFAULT_CONNECT_TIMEOUT, DEFAULT_ENDPOINT};
pub use traits::LogSearch;
