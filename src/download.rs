//! Model artifact resolution via the HuggingFace Hub.
//!
//! `hf-hub` keeps a local cache, so a repo that has been resolved before is
//! served from disk without any network traffic.

use crate::config::{load_config, ModelConfig};
use anyhow::{Context, Result};
use hf_hub::api::sync::Api;
use hf_hub::Repo;
use log::debug;
use std::path::PathBuf;

/// Local paths of everything a model needs at inference time.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    /// HuggingFace repo the artifacts came from.
    pub repo_id: String,
    /// Path to the cached ONNX graph.
    pub model_path: PathBuf,
    /// Path to the cached voices archive.
    pub voices_path: PathBuf,
    /// Parsed repo config.
    pub config: ModelConfig,
}

/// Resolve a model by repo id, downloading any artifacts missing from the
/// local cache.
pub fn fetch_model(repo_id: &str) -> Result<ModelArtifacts> {
    let api = Api::new()?;
    let repo = api.repo(Repo::model(repo_id.to_string()));

    let config_path = repo
        .get("config.json")
        .with_context(|| format!("failed to fetch config.json from {repo_id}"))?;
    let config = load_config(&config_path)?;
    debug!(
        "resolved {repo_id}: model={} voices={}",
        config.model_file, config.voices
    );

    let model_path = repo
        .get(&config.model_file)
        .with_context(|| format!("failed to fetch {} from {repo_id}", config.model_file))?;
    let voices_path = repo
        .get(&config.voices)
        .with_context(|| format!("failed to fetch {} from {repo_id}", config.voices))?;

    Ok(ModelArtifacts {
        repo_id: repo_id.to_string(),
        model_path,
        voices_path,
        config,
    })
}
