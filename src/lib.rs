pub mod cards;
pub mod config;
pub mod feed_parse;
pub mod feed_source;
pub mod http_client;
pub mod loader;
pub mod logging;
pub mod page;
pub mod page_build;
pub mod render;
