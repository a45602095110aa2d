pub mod catalog;
pub mod portrait;
pub mod select;
pub mod types;
