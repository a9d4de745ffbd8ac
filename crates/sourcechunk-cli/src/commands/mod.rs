//! CLI command handlers

pub mod chunk;
pub mod inspect;
pub mod languages;
