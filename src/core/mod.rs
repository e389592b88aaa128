pub mod types;
pub mod config;
pub mod error;
pub mod document;
pub mod collection;
pub mod database;
