//! unify-config: merge layered YAML run configurations
//!
//! A base config is deep-merged with overlay configs, the data-parallel size
//! is inferred from the world size, manual `k1/.../kn:v` overrides are
//! applied, and the global batch size is turned into per-replica gradient
//! accumulation steps before the result is written.

pub mod cli;
pub mod config;
pub mod derived;
pub mod error;
pub mod overrides;
pub mod pipeline;

pub use error::UnifyError;
