//! Business logic and repository trait definitions for Proofwork.
//!
//! This crate defines the "ports" (repository traits) that the infrastructure
//! layer implements, the vacancy transition table, and the services for the
//! kudos ledger, endorsement read models, vacancy lifecycle, and submissions.
//! It depends only on `proofwork-types` -- never on `proofwork-infra` or any
//! database/IO crate.

pub mod lifecycle;
pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
