//! Row types mapping the `countries` table to the domain entity.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::countries;
use crate::domain::Country;

/// A `countries` row as read from the database.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = countries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CountryRow {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub created_date: DateTime<Utc>,
    pub is_deleted: bool,
}

impl From<CountryRow> for Country {
    fn from(row: CountryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            code: row.code,
            created_date: row.created_date,
            is_deleted: row.is_deleted,
        }
    }
}

/// Insertable row for new countries. The id comes from the sequence;
/// `created_date` and `is_deleted` are set server-side here, never by the
/// caller.
#[derive(Debug, Insertable)]
#[diesel(table_name = countries)]
pub struct NewCountryRow<'a> {
    pub name: &'a str,
    pub code: &'a str,
    pub created_date: DateTime<Utc>,
    pub is_deleted: bool,
}

/// Changeset for updates; only name and code are writable after creation.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = countries)]
pub struct CountryChanges<'a> {
    pub name: &'a str,
    pub code: &'a str,
}
