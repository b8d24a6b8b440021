pub mod document;
pub mod types;
