//! In-memory journal for tests and ephemeral hosts

mod journal;

pub use journal::InMemoryJournal;
