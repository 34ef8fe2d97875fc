//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data`, so they depend only on
//! the repository port and stay testable without a database.

use std::sync::Arc;

use crate::domain::ports::CountryRepository;

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use countries_backend::domain::ports::InMemoryCountryRepository;
/// use countries_backend::inbound::http::state::HttpState;
///
/// let state = HttpState::new(Arc::new(InMemoryCountryRepository::new()));
/// let _countries = state.countries.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub countries: Arc<dyn CountryRepository>,
}

impl HttpState {
    /// Construct state around a repository implementation.
    pub fn new(countries: Arc<dyn CountryRepository>) -> Self {
        Self { countries }
    }
}
