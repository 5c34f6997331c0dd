#![forbid(unsafe_code)]

//! Core: revision records and ordering as supplied by the history loader.

pub mod order;
pub mod revision;

pub use order::SortOrder;
pub use revision::Revision;
