//! Public data formats: claim inputs and outputs, allowlist snapshots and contract metadata.

pub mod claim;
pub mod metadata;
pub mod snapshot;
pub mod token;
