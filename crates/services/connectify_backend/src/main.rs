// File: services/connectify_backend/src/main.rs
use axum::{routing::get, Router};
#[cfg(feature = "calendly")]
use connectify_calendly::routes as calendly_routes;
use connectify_common::logging;
use connectify_config::load_config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // The subscriber may not be up yet when the config itself failed.
        eprintln!("connectify-backend failed: {}", e);
        error!("connectify-backend failed: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Arc::new(load_config()?);
    let _log_guard = logging::init_from_config(config.logging.as_ref());

    #[allow(unused_mut)] // for the features it needs to be mutable
    let mut api_router = Router::new().route("/", get(|| async { "Welcome to Connectify-Rs API!" }));

    #[cfg(feature = "calendly")]
    {
        match calendly_routes(config.clone()) {
            Ok(calendly_router) => {
                info!("Calendly routes mounted (enabled: {})", config.use_calendly);
                api_router = api_router.merge(calendly_router);
            }
            Err(e) if config.use_calendly => return Err(e.into()),
            Err(e) => info!("Calendly routes not mounted: {}", e),
        }
    }

    let mut app = Router::new().nest("/api", api_router);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        #[cfg(feature = "calendly")]
        use connectify_calendly::doc::CalendlyApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Connectify API",
                version = "0.1.0",
                description = "Connectify Calendly bridge",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            tags( (name = "Connectify", description = "Core service endpoints")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        #[allow(unused_mut)] // for the features it needs to be mutable
        let mut openapi_doc = ApiDoc::openapi();
        #[cfg(feature = "calendly")]
        openapi_doc.merge(CalendlyApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui = SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
