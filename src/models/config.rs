//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::state::filter::DEFAULT_LIST_LIMIT;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// Upper bound on items loaded per collection.
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
}

fn default_list_limit() -> usize {
    DEFAULT_LIST_LIMIT
}
