pub mod config;
pub mod logging;
pub mod range;
pub mod respond;
pub mod server;
pub mod source;
