use anyhow::Result;
use axum::Router;
use tracing::info;
mod health;
mod infra;
mod visits;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    infra::telemetry::init()?;
    let config = infra::config::Config::from_env();

    let store = infra::store::connect(&config).await?;

    info!("connected to store");

    let router = Router::new()
        .merge(visits::router(&store))
        .nest(health::PATH, health::router())
        .layer(infra::telemetry::tracing_middleware());

    info!("initialized router");

    axum::Server::bind(&config.listen_address()?)
        .serve(router.into_make_service())
        .with_graceful_shutdown(infra::os::shutdown_signal())
        .await?;

    Ok(())
}
