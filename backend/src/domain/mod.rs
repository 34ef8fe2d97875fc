//! Domain types for the countries service.
//!
//! Everything here is transport and storage agnostic: the entity, the
//! write-side validation, the repository error taxonomy, and the port the
//! adapters implement.

mod country;
mod error;
pub mod ports;

pub use country::{CODE_MAX_LEN, Country, CountryDraft, CountryValidationError, NAME_MAX_LEN};
pub use error::RepositoryError;
