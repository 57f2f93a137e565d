pub mod elasticsearch;

pub use elasticsearch::{echo_query, ClientConfig, EsClient, DEFAULT_CONNECT_TIMEOUT, DEFAULT_ENDPOINT};
