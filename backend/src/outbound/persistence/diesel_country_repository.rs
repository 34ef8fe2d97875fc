//! PostgreSQL-backed `CountryRepository` adapter using Diesel.
//!
//! Uniqueness of live names and codes is ultimately guaranteed by the
//! partial unique indexes; constraint violations map to the same duplicate
//! errors as the controller pre-checks, so a lost race surfaces as a
//! duplicate rather than a 500.

use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{PageRequest, PagedResult};
use tracing::debug;

use crate::domain::ports::CountryRepository;
use crate::domain::{Country, CountryDraft, RepositoryError};

use super::models::{CountryChanges, CountryRow, NewCountryRow};
use super::pool::{DbPool, PoolError};
use super::schema::countries;

/// Partial unique index guarding live names (`WHERE NOT is_deleted`).
const NAME_UNIQUE_INDEX: &str = "countries_name_live_key";
/// Partial unique index guarding live codes.
const CODE_UNIQUE_INDEX: &str = "countries_code_live_key";

/// Diesel-backed implementation of the `CountryRepository` port.
#[derive(Clone)]
pub struct DieselCountryRepository {
    pool: DbPool,
}

impl DieselCountryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            RepositoryError::connection(message)
        }
    }
}

/// Map read-path Diesel errors. The original detail is logged at `debug`
/// and replaced with a stable message for callers.
fn map_diesel_error(error: diesel::result::Error) -> RepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            RepositoryError::connection("database connection error")
        }
        _ => RepositoryError::query("database error"),
    }
}

/// Map write-path errors, translating unique violations on the live-row
/// indexes into the duplicate category. The store is the authority when a
/// pre-check raced another writer.
fn map_write_error(error: diesel::result::Error) -> RepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        return match info.constraint_name() {
            Some(NAME_UNIQUE_INDEX) => RepositoryError::DuplicateName,
            Some(CODE_UNIQUE_INDEX) => RepositoryError::DuplicateCode,
            _ => RepositoryError::query("unique constraint violation"),
        };
    }
    map_diesel_error(error)
}

/// Escape LIKE wildcards so a search term matches literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Non-deleted rows, optionally narrowed to a case-insensitive substring
/// match over name or code.
fn live_rows(search: Option<&str>) -> countries::BoxedQuery<'static, Pg> {
    let mut query = countries::table
        .filter(countries::is_deleted.eq(false))
        .into_boxed();
    if let Some(term) = search {
        let pattern = format!("%{}%", escape_like(term));
        query = query.filter(
            countries::name
                .ilike(pattern.clone())
                .or(countries::code.ilike(pattern)),
        );
    }
    query
}

#[async_trait]
impl CountryRepository for DieselCountryRepository {
    async fn get_all(
        &self,
        page: PageRequest,
        search: Option<&str>,
    ) -> Result<PagedResult<Country>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Count the filtered set before applying offset and limit.
        let total: i64 = live_rows(search)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let rows: Vec<CountryRow> = live_rows(search)
            .order(countries::name.asc())
            .offset(page.offset())
            .limit(page.limit())
            .select(CountryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let data = rows.into_iter().map(Country::from).collect();
        Ok(PagedResult::new(data, u64::try_from(total).unwrap_or(0), page))
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Country>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CountryRow> = countries::table
            .filter(countries::id.eq(id))
            .filter(countries::is_deleted.eq(false))
            .select(CountryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(Country::from))
    }

    async fn add(&self, draft: &CountryDraft) -> Result<Country, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewCountryRow {
            name: draft.name(),
            code: draft.code(),
            created_date: Utc::now(),
            is_deleted: false,
        };

        let row: CountryRow = diesel::insert_into(countries::table)
            .values(&new_row)
            .returning(CountryRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_write_error)?;

        Ok(Country::from(row))
    }

    async fn update(&self, id: i32, draft: &CountryDraft) -> Result<Country, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let existing: Option<i32> = countries::table
            .filter(countries::id.eq(id))
            .filter(countries::is_deleted.eq(false))
            .select(countries::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        if existing.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let changes = CountryChanges {
            name: draft.name(),
            code: draft.code(),
        };

        let row: Option<CountryRow> = diesel::update(
            countries::table
                .filter(countries::id.eq(id))
                .filter(countries::is_deleted.eq(false)),
        )
        .set(&changes)
        .returning(CountryRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_write_error)?;

        // The row was present a moment ago, so a zero-row write is an
        // anomaly, not a missing record.
        row.map(Country::from).ok_or(RepositoryError::NoRowsAffected)
    }

    async fn soft_delete(&self, id: i32) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Load regardless of the flag so an already-deleted row is
        // distinguishable from an absent one.
        let row: Option<CountryRow> = countries::table
            .find(id)
            .select(CountryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Err(RepositoryError::NotFound);
        };
        if row.is_deleted {
            return Err(RepositoryError::AlreadyDeleted);
        }

        let affected = diesel::update(
            countries::table
                .find(id)
                .filter(countries::is_deleted.eq(false)),
        )
        .set(countries::is_deleted.eq(true))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if affected == 0 {
            return Err(RepositoryError::NoRowsAffected);
        }
        Ok(())
    }

    async fn exists_by_name(
        &self,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = countries::table
            .filter(countries::is_deleted.eq(false))
            .filter(countries::name.eq(name))
            .into_boxed();
        if let Some(excluded) = exclude_id {
            query = query.filter(countries::id.ne(excluded));
        }

        let matches: i64 = query
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(matches > 0)
    }

    async fn exists_by_code(
        &self,
        code: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = countries::table
            .filter(countries::is_deleted.eq(false))
            .filter(countries::code.eq(code))
            .into_boxed();
        if let Some(excluded) = exclude_id {
            query = query.filter(countries::id.ne(excluded));
        }

        let matches: i64 = query
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(matches > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Error-mapping coverage; behaviour against a live store is exercised
    //! through the port's in-memory twin in the handler tests.
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    use super::*;

    struct ConstraintViolation {
        constraint: &'static str,
    }

    impl DatabaseErrorInformation for ConstraintViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn details(&self) -> Option<&str> {
            None
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            Some("countries")
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            Some(self.constraint)
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn unique_violation(constraint: &'static str) -> DieselError {
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(ConstraintViolation { constraint }),
        )
    }

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let mapped = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(mapped, RepositoryError::Connection { .. }));
        assert!(mapped.to_string().contains("connection refused"));
    }

    #[rstest]
    #[case(NAME_UNIQUE_INDEX, RepositoryError::DuplicateName)]
    #[case(CODE_UNIQUE_INDEX, RepositoryError::DuplicateCode)]
    fn unique_violations_map_to_duplicate_errors(
        #[case] constraint: &'static str,
        #[case] expected: RepositoryError,
    ) {
        assert_eq!(map_write_error(unique_violation(constraint)), expected);
    }

    #[rstest]
    fn unknown_unique_violation_maps_to_query_error() {
        let mapped = map_write_error(unique_violation("some_other_index"));
        assert!(matches!(mapped, RepositoryError::Query { .. }));
    }

    #[rstest]
    fn non_violation_write_errors_fall_through_to_read_mapping() {
        let mapped = map_write_error(DieselError::NotFound);
        assert_eq!(mapped, RepositoryError::query("database error"));
    }

    #[rstest]
    #[case("50%", "50\\%")]
    #[case("a_b", "a\\_b")]
    #[case("back\\slash", "back\\\\slash")]
    #[case("plain", "plain")]
    fn like_wildcards_are_escaped(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_like(input), expected);
    }
}
