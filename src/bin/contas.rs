use anyhow::Result;
use contas::cli::{start, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    let action = start()?;

    let result = action.execute().await;

    telemetry::shutdown_tracer();

    result
}
