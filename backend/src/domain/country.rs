//! Country entity and write-side validation.

use chrono::{DateTime, Utc};

/// Maximum length of a country name.
pub const NAME_MAX_LEN: usize = 100;

/// Maximum length of a country code.
pub const CODE_MAX_LEN: usize = 5;

/// A persisted country record.
///
/// `id` and `created_date` are assigned by the store on creation and never
/// change. `is_deleted` only transitions `false -> true`, via the delete
/// operation; deleted rows stay in the store but are invisible to reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub created_date: DateTime<Utc>,
    pub is_deleted: bool,
}

/// Validation failures for country write payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CountryValidationError {
    #[error("Country name is required")]
    NameRequired,
    #[error("Country name cannot exceed {NAME_MAX_LEN} characters")]
    NameTooLong,
    #[error("Country code is required")]
    CodeRequired,
    #[error("Country code cannot exceed {CODE_MAX_LEN} characters")]
    CodeTooLong,
}

/// A normalised, validated name/code pair ready for persistence.
///
/// Names are trimmed; codes are trimmed and upper-cased. Normalisation runs
/// before validation and before any uniqueness check, so `"wl"` and `" WL "`
/// collide as the API contract requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryDraft {
    name: String,
    code: String,
}

impl CountryDraft {
    /// Normalise and validate a write payload, collecting every violation.
    ///
    /// # Examples
    /// ```
    /// use countries_backend::domain::CountryDraft;
    ///
    /// let draft = CountryDraft::new(" Wonderland ", "wl").expect("valid draft");
    /// assert_eq!(draft.name(), "Wonderland");
    /// assert_eq!(draft.code(), "WL");
    /// ```
    pub fn new(name: &str, code: &str) -> Result<Self, Vec<CountryValidationError>> {
        let name = name.trim();
        let code = code.trim().to_uppercase();

        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push(CountryValidationError::NameRequired);
        } else if name.chars().count() > NAME_MAX_LEN {
            errors.push(CountryValidationError::NameTooLong);
        }
        if code.is_empty() {
            errors.push(CountryValidationError::CodeRequired);
        } else if code.chars().count() > CODE_MAX_LEN {
            errors.push(CountryValidationError::CodeTooLong);
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            name: name.to_owned(),
            code,
        })
    }

    /// The trimmed name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The trimmed, upper-cased code.
    pub fn code(&self) -> &str {
        &self.code
    }
}
