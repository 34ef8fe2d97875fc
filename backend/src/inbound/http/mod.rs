//! HTTP adapter: handlers, DTOs, the response envelope, and route wiring.

pub mod countries;
pub mod envelope;
pub mod health;
pub mod state;

use actix_web::web;

/// Register the countries API under `/api/countries` plus the health probe.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/countries")
            .service(countries::list_countries)
            .service(countries::create_country)
            .service(countries::get_country)
            .service(countries::update_country)
            .service(countries::delete_country),
    )
    .service(health::healthz);
}
