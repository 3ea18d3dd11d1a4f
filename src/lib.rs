pub mod assistant;
pub mod classify;
pub mod config;
pub mod context;
pub mod facets;
pub mod generation;
pub mod http_client;
pub mod offline;
pub mod pipeline;
pub mod player_table;
pub mod prompt;
pub mod server;
pub mod shortlist_export;
