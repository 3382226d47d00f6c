mod gateway;
mod setup;
mod sink;

pub use gateway::VideoGateway;
pub use setup::{build_pingora_server, run};
pub use sink::SessionSink;
