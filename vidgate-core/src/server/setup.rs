use std::sync::Arc;

use anyhow::{Error, Result};
use pingora::prelude::*;
use pingora::server::Server;
use pingora::server::configuration::ServerConf;

use crate::config::VidgateConfig;
use crate::server::gateway::VideoGateway;
use crate::source::{ObjectStoreSource, build_store};

/// Run the gateway with the given configuration. Blocks the main thread.
pub fn run(config: VidgateConfig) -> Result<()> {
    let server = build_pingora_server(config)?;

    server.run_forever();
}

/// Build the Pingora server hosting the video gateway.
pub fn build_pingora_server(config: VidgateConfig) -> Result<Server, Error> {
    let mut server = if let Some(threads) = config.server.threads {
        tracing::debug!(threads, "overriding Pingora worker thread count");
        let mut conf = ServerConf::new().expect("Could not construct pingora server configuration");
        conf.threads = threads;
        Server::new_with_opt_and_conf(None, conf)
    } else {
        // "None" tells Pingora to use its default settings.
        Server::new(None)?
    };

    server.bootstrap();

    // Build the byte source over the configured store backend.
    let store = build_store(&config.store)?;
    let source = Arc::new(ObjectStoreSource::new(store));

    tracing::info!(
        key = %config.video.key,
        route = %config.video.route,
        "serving video object"
    );

    // Build gateway
    let gateway = VideoGateway::new(source, &config.video);

    // Build HTTP proxy service from Pingora.
    let mut svc = http_proxy_service(&server.configuration, gateway);
    svc.add_tcp(&config.server.listen);

    // Register service.
    server.add_service(svc);

    Ok(server)
}
