use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use function_host::{api, config, handler, host, telemetry};

use api::AppState;
use config::Config;
use handler::{registry, HandlerDescriptor};
use host::RuntimeHost;
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load()?;

    // Resolution failure is fatal; the host must not start without a handler.
    let descriptor = HandlerDescriptor::new(cfg.handler.name.clone());
    let handler = registry::resolve(&descriptor, &cfg.handler)?;
    let host = Arc::new(RuntimeHost::new(
        descriptor,
        handler,
        cfg.handler.invoke_timeout(),
    ));

    let app: Router = api::router(AppState { host: host.clone() }, &cfg);

    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!(
            "WARNING: Server binding to 0.0.0.0 - service will be accessible from network! \
            For production, bind to 127.0.0.1 unless behind a firewall/reverse proxy."
        );
    }

    info!(%addr, handler = %cfg.handler.name, "starting function host");

    // Serve while the handler loads: invocations arriving during the cold
    // start are answered with 503 NotReady instead of being dropped.
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(telemetry::shutdown_signal())
            .await
    });

    // A failed load aborts the process entirely; no partial serving.
    host.load().await?;
    info!("cold start complete, serving invocations");

    server.await??;

    warn!("shutdown complete");
    Ok(())
}
