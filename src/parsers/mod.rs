pub mod browser;
pub mod sqlite_db;
