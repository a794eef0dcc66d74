//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (proofwork-infra) implements. The core crate never depends on any
//! specific storage technology.

pub mod kudos;
pub mod proof;
pub mod skill;
pub mod sponsor;
pub mod submission;
pub mod talent;
pub mod vacancy;
