//! Infrastructure layer for Proofwork.
//!
//! Contains implementations of the repository traits defined in
//! `proofwork-core`: SQLite storage for the skill catalog, accounts, the kudos
//! ledger, vacancies and submissions, plus configuration loading and API key
//! hashing.

pub mod config;
pub mod crypto;
pub mod sqlite;
