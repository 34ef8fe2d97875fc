//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly; regenerate
//! with `diesel print-schema` when the migrations change.

diesel::table! {
    /// Country records. Rows are soft-deleted, never removed; partial
    /// unique indexes keep `name` and `code` unique among live rows.
    countries (id) {
        /// Auto-increment primary key.
        id -> Int4,
        #[max_length = 100]
        name -> Varchar,
        #[max_length = 5]
        code -> Varchar,
        /// Set once at insert, server-side.
        created_date -> Timestamptz,
        is_deleted -> Bool,
    }
}
