//! HTTP request handlers for the REST API.

pub mod kudos;
pub mod skill;
pub mod submission;
pub mod vacancy;
