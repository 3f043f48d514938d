use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use vf_api::{create_app, telemetry, ApiConfig, SharedVerifier};
use vf_core::{EmailChannel, MobileChannel, Verifier};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = ApiConfig::load().context("Failed to load API configuration")?;
    telemetry::init_tracing(&config.logging)?;

    tracing::info!(
        environment = %config.environment,
        "Starting verifier API server"
    );

    let infra_config =
        vf_infra::load_config().context("Failed to load infrastructure configuration")?;
    for backend in config.production_warnings(&infra_config) {
        tracing::warn!(
            event = "development_backend_in_production",
            backend,
            "Development backend configured in production"
        );
    }
    let store = vf_infra::create_store(&infra_config)
        .await
        .context("Failed to initialise verification store")?;
    let email_channel = vf_infra::create_email_channel(&infra_config.email)
        .await
        .context("Failed to initialise email channel")?;
    let mobile_channel = vf_infra::create_mobile_channel(&infra_config.sms)
        .await
        .context("Failed to initialise mobile channel")?;

    tracing::info!(
        store = %infra_config.store,
        email_provider = email_channel.provider_name(),
        mobile_provider = mobile_channel.provider_name(),
        "Backends ready"
    );

    let verifier: Arc<SharedVerifier> = Arc::new(Verifier::new(
        store,
        email_channel,
        mobile_channel,
        config.verifier.clone(),
    ));
    let verifier = web::Data::from(verifier);

    let bind_address = config.server.bind_address();
    tracing::info!(address = %bind_address, "Server will bind");

    let mut server = HttpServer::new(move || {
        create_app(verifier.clone()).wrap(TracingLogger::default())
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;
    Ok(())
}
