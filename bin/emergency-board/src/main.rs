//! # Emergency Board Binary
//!
//! The entry point that assembles the application based on compile-time features.

mod config;

use actix_web::{web, App, HttpServer};
use eb_api::{configure_routes, middleware, AppState};
use eb_auth_simple::DailyIdProvider;
use eb_core::traits::GeoLocator;
use eb_db_sqlite::SqlitePostRepo;

use crate::config::ServerConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();

    // 1. Initialize Database Implementation
    let repo = SqlitePostRepo::new(&config.database_url).await?;

    // 2. Initialize Geolocation Implementation
    let geo = build_geo(&config)?;

    // 3. Initialize Identity Implementation
    let ids = DailyIdProvider::new(&config.id_salt);

    // 4. Wrap in AppState (Using dynamic dispatch for maximum flexibility)
    let state = web::Data::new(AppState::new(
        Box::new(repo),
        geo,
        Box::new(ids),
        config.board.clone(),
    ));

    log::info!(
        "🚨 emergency-board starting on http://{}:{}",
        config.host,
        config.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::security_headers())
            .wrap(middleware::standard_middleware())
            .configure(configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}

#[cfg(feature = "geo-ipapi")]
fn build_geo(config: &ServerConfig) -> anyhow::Result<Box<dyn GeoLocator>> {
    let geo = eb_geo_ipapi::IpApiLocator::new(&config.geo_api_url, config.geo_timeout)?;
    Ok(Box::new(geo))
}

#[cfg(not(feature = "geo-ipapi"))]
fn build_geo(_config: &ServerConfig) -> anyhow::Result<Box<dyn GeoLocator>> {
    log::warn!("built without geo-ipapi; every post is recorded with country ??");
    Ok(Box::new(OfflineLocator))
}

/// Stand-in used when no lookup backend is compiled in.
#[cfg(not(feature = "geo-ipapi"))]
struct OfflineLocator;

#[cfg(not(feature = "geo-ipapi"))]
#[async_trait::async_trait]
impl GeoLocator for OfflineLocator {
    async fn lookup_country(&self, _ip: &str) -> anyhow::Result<String> {
        anyhow::bail!("geolocation disabled")
    }
}
