use anyhow::Result;
use function_host::{client::LoadGenerator, config::Config, telemetry};
use tokio_util::sync::CancellationToken;
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let cfg = Config::load()?;

    if cfg.client.caller_id.is_empty() {
        anyhow::bail!("client.caller_id must be set to identify this load generator");
    }
    if cfg.client.targets.is_empty() {
        anyhow::bail!("client.targets must name at least one endpoint to drive");
    }

    let generator = LoadGenerator::new(cfg.client)?;

    // Streams run until externally stopped; ctrl-c / SIGTERM cancels them
    // promptly instead of leaving them to be killed mid-request.
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        telemetry::shutdown_signal().await;
        signal_cancel.cancel();
    });

    generator.run(cancel).await;

    warn!("all streams stopped");
    Ok(())
}
