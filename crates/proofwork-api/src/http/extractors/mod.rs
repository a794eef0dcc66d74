//! Request extractors: caller resolution and list query parameters.

pub mod auth;
pub mod query;
