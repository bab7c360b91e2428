//! Shared data model, sentinels and off-chain document formats for dropclaim.

pub mod base;
pub mod leaf;
pub mod schema;
