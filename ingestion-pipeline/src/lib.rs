#![allow(clippy::missing_docs_in_private_items, clippy::result_large_err)]

pub mod chunking;
pub mod loader;
pub mod utils;

pub use loader::{load_document, DocumentSource};
