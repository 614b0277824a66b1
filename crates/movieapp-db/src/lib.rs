//! Local storage for movieapp.
//!
//! Uses `rusqlite` (bundled `SQLite`) to persist small named
//! preference values such as the favorite movie ID list.

mod connection;
/// Config and data directory layout.
pub mod dirs;
mod migrations;
/// Named preference values.
pub mod preferences;

#[allow(clippy::module_name_repetitions)]
pub use connection::open_db;
pub use dirs::AppDirs;
pub use preferences::{
    MemoryPreferenceStore, PreferenceStore, SqlitePreferenceStore, load_preference,
    save_preference,
};
