//! Stampbook: client core for a place-bookmarking app.
//!
//! Users save places as bookmarks, group them into coloured stamp boards,
//! mark them visited and get a one-time celebration when a board is
//! complete. This library crate exposes all modules for use by the demo
//! binary and the integration tests.

pub mod api;
pub mod app;
pub mod database;
pub mod managers;
pub mod map;
pub mod platform;
pub mod services;
pub mod types;
