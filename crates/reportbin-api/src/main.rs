use reportbin_api::{setup, telemetry};
use reportbin_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration (.env first, then the process environment)
    let config = Config::from_env()?;

    telemetry::init_telemetry(config.is_production())?;

    let (_state, router) = setup::initialize_app(config.clone())?;

    setup::server::start_server(&config, router).await?;

    Ok(())
}
