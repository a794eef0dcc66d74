//! Shared domain types for Proofwork.
//!
//! This crate contains the domain types used across the platform: skills,
//! proofs, sponsors, the kudos ledger records, vacancies, submissions, and
//! their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

mod id;

pub mod config;
pub mod error;
pub mod kudos;
pub mod page;
pub mod principal;
pub mod proof;
pub mod skill;
pub mod sponsor;
pub mod submission;
pub mod talent;
pub mod vacancy;
