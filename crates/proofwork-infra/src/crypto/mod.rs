//! Cryptographic helpers for Proofwork.
//!
//! - `hash`: API key generation and SHA-256 digests

pub mod hash;
