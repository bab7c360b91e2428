//! Claim-parameter resolution for drop contracts, and the workflows built on it.
//!
//! The [`resolver::ClaimResolver`] composes three collaborators:
//! - a [`chain::ClaimConditionReader`] for the active claim phase,
//! - a [`metadata::ContractMetadataReader`] for the merkle-root to snapshot mapping,
//! - an [`allowlist::AllowlistProofFetcher`] for the claimer's proof and overrides.

pub mod allowlist;
pub mod chain;
pub mod commands;
pub mod common;
pub mod error;
pub mod metadata;
pub mod resolver;
pub mod snapshot;
pub mod storage;
pub mod transaction;

#[cfg(test)]
mod testing;
