//! Unification pipeline
//!
//! load base -> merge overlays -> infer dp -> manual overrides -> convert
//! global batch size -> write. The output file is only written once every
//! step has succeeded.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::config::{deep_merge, load_document, write_document, Document};
use crate::derived::{convert_global_batch_size, infer_data_parallel, WorldSize};
use crate::overrides::OverrideDirective;

/// Everything one run needs.
#[derive(Debug, Clone, Default)]
pub struct UnifyRequest {
    pub base_config_path: PathBuf,
    pub new_config_paths: Vec<PathBuf>,
    pub out_path: PathBuf,
    pub nnodes: Option<u64>,
    pub gpus_per_node: Option<u64>,
    pub overrides: Vec<String>,
}

/// Build the unified document without writing it.
pub fn unify(request: &UnifyRequest) -> Result<Document> {
    let mut doc = load_document(&request.base_config_path)?;
    tracing::debug!("Loaded base config {}", request.base_config_path.display());

    for path in &request.new_config_paths {
        let overlay = load_document(path)?;
        deep_merge(&mut doc, &overlay)
            .with_context(|| format!("Failed merging {}", path.display()))?;
        tracing::debug!("Merged {}", path.display());
    }

    if let Some(world) = WorldSize::from_args(request.nnodes, request.gpus_per_node)? {
        infer_data_parallel(&mut doc, world)?;
    }

    for line in &request.overrides {
        let directive: OverrideDirective = line.parse()?;
        directive.apply(&mut doc).with_context(|| format!("Failed applying override '{line}'"))?;
        tracing::debug!("Applied override {}", line);
    }

    convert_global_batch_size(&mut doc)?;

    Ok(doc)
}

/// Unify and write the result to `request.out_path`.
pub fn run(request: &UnifyRequest) -> Result<()> {
    let doc = unify(request)?;
    write_document(&request.out_path, &doc)
}
