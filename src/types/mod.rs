// Stampbook shared type definitions
// Each submodule defines types used across the client.

pub mod bookmark;
pub mod errors;
pub mod ids;
pub mod post;
pub mod settings;
pub mod stamp_board;
pub mod user;
