use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use nearest_flight::{
    api::{FlightProvider, SessionToken},
    config::Config,
    locator::NearestFlightLocator,
    logging,
    metadata::MetadataResolver,
    server::{self, AppState},
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = logging::initialize_logging();
    color_eyre::install()?;

    let config = Config::load();

    // Reference tables from openflights.org
    let metadata = MetadataResolver::load(&config.data).wrap_err("loading reference tables")?;

    let client = FlightProvider::build_client(&config.feed)?;
    let session = SessionToken::acquire(&client, &config.feed.session_url)
        .await
        .wrap_err("couldn't fetch session cookie")?;

    let provider = Arc::new(FlightProvider::new(client, &config.feed));
    let locator = NearestFlightLocator::new(provider, session, config.locator_settings());

    let state = Arc::new(AppState { locator, metadata });
    info!("Observer angles interpreted as {:?}", config.observer.angle_unit);
    server::serve(state, &config.bind_address()).await?;
    Ok(())
}
