//! Model repository configuration.
//!
//! Every KittenTTS model repo ships a `config.json` naming the ONNX graph and
//! the voice bank archive. Configurations are loaded with [`load_config`].

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path};

/// Parsed `config.json` from a model repository.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Model container type; only ONNX variants are supported.
    #[serde(rename = "type")]
    pub model_type: String,
    /// File name of the ONNX graph within the repo.
    pub model_file: String,
    /// File name of the voices archive within the repo.
    pub voices: String,
}

/// Load and validate a model config from a JSON file.
pub fn load_config(path: impl AsRef<Path>) -> Result<ModelConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read model config {}", path.display()))?;
    let config: ModelConfig = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse model config {}", path.display()))?;

    if !config.model_type.starts_with("ONNX") {
        bail!(
            "unsupported model type '{}': expected an ONNX model",
            config.model_type
        );
    }
    check_file_name(&config.model_file)?;
    check_file_name(&config.voices)?;
    Ok(config)
}

/// Repo-provided file names must be plain names, never nested paths.
fn check_file_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => bail!("unsafe file name in model config: '{name}'"),
    }
}
