//! Gateway entry-point: wires REST endpoints, persistence, storage, the
//! external auth provider and the processing webhook.

mod server;

use actix_web::{App, HttpServer, web};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use posterforge::ApiDoc;
use posterforge::Trace;
use posterforge::inbound::http::generations::{get_profile, list_generations};
use posterforge::inbound::http::health::{HealthState, live, ready};
use posterforge::inbound::http::upload::{multipart_form_config, upload_image};

use server::config::AppConfig;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;
    let state = web::Data::new(server::build_state(&config).await?);

    let health_state = web::Data::new(HealthState::new());
    // Clone for server factory so readiness probe remains accessible.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        let api = web::scope("/api/v1")
            .service(upload_image)
            .service(get_profile)
            .service(list_generations);

        #[cfg_attr(not(debug_assertions), expect(unused_mut))]
        let mut app = App::new()
            .app_data(state.clone())
            .app_data(server_health_state.clone())
            .app_data(multipart_form_config())
            .wrap(Trace)
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        {
            app = app
                .service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
        }

        app
    })
    .bind(config.bind_addr)?;

    health_state.mark_ready();
    server.run().await
}
