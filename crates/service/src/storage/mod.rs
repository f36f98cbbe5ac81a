//! Storage abstractions for service layer
//!
//! File-backed stores that keep a whole collection in a single JSON document.

pub mod json_list_store;
