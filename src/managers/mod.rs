// Stampbook state managers
// Managers hold client-side state: the persisted session, stamp boards and bookmarks, posts, the account.

pub mod account;
pub mod post_store;
pub mod session_manager;
pub mod stamp_store;
