//! Stampbook database layer.
//!
//! Provides SQLite connection management, schema migrations and the
//! key/value local storage used for the persisted session.
//!
//! # Usage
//!
//! ```no_run
//! use stampbook::database::{Database, LocalStorage};
//!
//! let db = Database::open("stampbook.db").expect("failed to open database");
//! let storage = LocalStorage::new(db);
//! storage.set_item("accessToken", "token").expect("write failed");
//! ```

pub mod connection;
pub mod local_storage;
pub mod migrations;

pub use connection::Database;
pub use local_storage::LocalStorage;
