//! Derived parallelism and batch fields
//!
//! `parallelism.dp` follows from the world size (`nnodes * gpus_per_node`)
//! and the model-parallel degrees, so that `dp * pp * tp == world_size`.
//! `tokens.global_batch_size` is replaced by the number of gradient
//! accumulation steps each data-parallel replica needs to reach it.

use crate::config::{lookup, render_value, Document, KeyPath};
use crate::error::UnifyError;
use serde_yaml::Value;

const PARALLELISM: &str = "parallelism";
const TOKENS: &str = "tokens";

/// Cluster shape given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldSize {
    pub nnodes: u64,
    pub gpus_per_node: u64,
}

impl WorldSize {
    /// Both values or neither; exactly one is an error.
    pub fn from_args(
        nnodes: Option<u64>,
        gpus_per_node: Option<u64>,
    ) -> Result<Option<Self>, UnifyError> {
        match (nnodes, gpus_per_node) {
            (Some(nnodes), Some(gpus_per_node)) => Ok(Some(Self { nnodes, gpus_per_node })),
            (None, None) => Ok(None),
            _ => Err(UnifyError::InconsistentWorldSize),
        }
    }

    /// `None` when the device count does not fit in a `u64`.
    pub fn total_devices(&self) -> Option<u64> {
        self.nnodes.checked_mul(self.gpus_per_node)
    }
}

/// Set `parallelism.dp = world_size / (pp * tp)`; returns the new `dp`.
pub fn infer_data_parallel(doc: &mut Document, world: WorldSize) -> Result<u64, UnifyError> {
    let pp = read_count(doc, &[PARALLELISM, "pp"])?;
    let tp = read_count(doc, &[PARALLELISM, "tp"])?;
    let world_size = world.total_devices().ok_or(UnifyError::WorldSizeOverflow {
        nnodes: world.nnodes,
        gpus_per_node: world.gpus_per_node,
    })?;

    // A product past u64::MAX is larger than any world size, so it cannot divide it.
    let dp = pp
        .checked_mul(tp)
        .filter(|model_parallel| world_size % model_parallel == 0)
        .map(|model_parallel| world_size / model_parallel)
        .ok_or(UnifyError::NonDivisibleWorldSize { world_size, pp, tp })?;

    // pp and tp were just read from it, so the section is a mapping.
    if let Some(parallelism) = doc.get_mut(PARALLELISM).and_then(Value::as_mapping_mut) {
        parallelism.insert(Value::String("dp".into()), Value::Number(dp.into()));
    }

    tracing::info!(world_size, pp, tp, dp, "Inferred data parallel size");
    Ok(dp)
}

/// Replace `tokens.global_batch_size` by `tokens.batch_accumulation_per_replica`.
///
/// Returns the accumulation steps, or `None` when no global batch size is set.
pub fn convert_global_batch_size(doc: &mut Document) -> Result<Option<u64>, UnifyError> {
    let has_global_batch = doc
        .get(TOKENS)
        .and_then(Value::as_mapping)
        .is_some_and(|tokens| tokens.contains_key("global_batch_size"));
    if !has_global_batch {
        return Ok(None);
    }

    let global_batch_size = read_count(doc, &[TOKENS, "global_batch_size"])?;
    let micro_batch_size = read_count(doc, &[TOKENS, "micro_batch_size"])?;
    let dp = read_count(doc, &[PARALLELISM, "dp"])?;

    let accumulation = dp
        .checked_mul(micro_batch_size)
        .filter(|per_step| global_batch_size % per_step == 0)
        .map(|per_step| global_batch_size / per_step)
        .ok_or(UnifyError::NonDivisibleBatchSize { global_batch_size, dp, micro_batch_size })?;

    if let Some(tokens) = doc.get_mut(TOKENS).and_then(Value::as_mapping_mut) {
        tokens.remove("global_batch_size");
        tokens.insert(
            Value::String("batch_accumulation_per_replica".into()),
            Value::Number(accumulation.into()),
        );
    }

    tracing::info!(
        global_batch_size,
        micro_batch_size,
        dp,
        accumulation,
        "Converted global batch size to accumulation steps"
    );
    Ok(Some(accumulation))
}

fn read_count(doc: &Document, segments: &[&str]) -> Result<u64, UnifyError> {
    let path = KeyPath::new(segments);
    let value = lookup(doc, &path).ok_or_else(|| UnifyError::MissingKey(path.clone()))?;

    match value.as_u64() {
        Some(count) if count > 0 => Ok(count),
        _ => Err(UnifyError::InvalidCount { path, value: render_value(value) }),
    }
}
