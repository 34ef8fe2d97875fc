//! Backend entry-point: configuration, migrations, pool, and HTTP server.

use std::env;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use countries_backend::ApiDoc;
use countries_backend::inbound::http::{self, state::HttpState};
use countries_backend::outbound::persistence::{
    DbPool, DieselCountryRepository, PoolConfig, run_migrations,
};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    // try_init fails only when a subscriber is already installed; the
    // existing one stays in place.
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init();

    let database_url =
        env::var("DATABASE_URL").map_err(|_| io::Error::other("DATABASE_URL must be set"))?;
    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".into())
        .parse()
        .map_err(|e| io::Error::other(format!("invalid BIND_ADDR: {e}")))?;
    let pool_size = match env::var("DB_POOL_MAX_SIZE") {
        Ok(raw) => raw
            .parse::<u32>()
            .map_err(|e| io::Error::other(format!("invalid DB_POOL_MAX_SIZE: {e}")))?,
        Err(_) => 10,
    };

    run_migrations(&database_url).map_err(io::Error::other)?;

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(pool_size))
        .await
        .map_err(io::Error::other)?;
    let state = web::Data::new(HttpState::new(Arc::new(DieselCountryRepository::new(pool))));

    info!(%bind_addr, "starting countries backend");
    HttpServer::new(move || {
        let app = App::new().app_data(state.clone()).configure(http::configure);
        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));
        app
    })
    .bind(bind_addr)?
    .run()
    .await
}
