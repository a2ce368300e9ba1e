pub mod config;
pub mod editor;
pub mod http_client;
pub mod logging;
pub mod output;
