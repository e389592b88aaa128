pub mod layout;
pub mod cache;
pub mod collection_file;

pub use layout::StorageLayout;
