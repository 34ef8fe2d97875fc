//! Outbound adapters for external collaborators (the PostgreSQL store).

pub mod persistence;
