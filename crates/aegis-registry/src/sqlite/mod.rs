//! SQLite persistence backend

mod journal;
mod schema;

pub use journal::SqliteJournal;
pub use schema::{SCHEMA_VERSION, check_version, init_schema};
