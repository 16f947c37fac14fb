//! Concrete implementations of the port traits.

pub mod file_config_adapter;
pub mod iex_quote;
pub mod sqlite_store;
pub mod web;
