//! Command handler implementations.

pub mod config;
