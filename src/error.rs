//! Error types for config unification.

use crate::config::KeyPath;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UnifyError {
    #[error("Invalid override format: '{0}' (expected exactly one ':' as in 'k1/k2/.../kn:v')")]
    MalformedOverride(String),

    #[error("You should provide both --nnodes and --gpus-per-node, or neither")]
    InconsistentWorldSize,

    #[error("World size {nnodes}*{gpus_per_node} does not fit in a 64-bit integer")]
    WorldSizeOverflow { nnodes: u64, gpus_per_node: u64 },

    #[error("World size {world_size} is not divisible by pp*tp = {pp}*{tp}")]
    NonDivisibleWorldSize { world_size: u64, pp: u64, tp: u64 },

    #[error(
        "global_batch_size {global_batch_size} is not divisible by dp*micro_batch_size = {dp}*{micro_batch_size}"
    )]
    NonDivisibleBatchSize { global_batch_size: u64, dp: u64, micro_batch_size: u64 },

    #[error("Missing required key: {0}")]
    MissingKey(KeyPath),

    #[error("Expected a positive integer at {path}, found {value}")]
    InvalidCount { path: KeyPath, value: String },

    #[error("Type conflict: expected mapping at key {0}")]
    TypeConflict(KeyPath),

    #[error("Override key path is empty")]
    EmptyKeyPath,

    #[error("Config file does not contain a mapping at its root: {}", .0.display())]
    NotAMapping(PathBuf),
}
