//! Core library for NewsBee: config, credential store, session, news client,
//! and share-link building.

pub mod auth;
pub mod config;
pub mod news;
pub mod share;
pub mod store;
