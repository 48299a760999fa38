use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::context::BuildPolicy;
use crate::layout::ForceParams;

/// Viewer settings read from `--config`. Every section is optional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    pub entity_layout: ForceParams,
    pub topology_layout: ForceParams,
    pub policy: BuildPolicy,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            entity_layout: ForceParams::entity(),
            topology_layout: ForceParams::topology(),
            policy: BuildPolicy::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<ViewerConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: ViewerConfig = serde_json::from_str(&raw)
        .with_context(|| format!("invalid config {}", path.display()))?;
    config
        .entity_layout
        .validate()
        .context("entityLayout")
        .and_then(|()| config.topology_layout.validate().context("topologyLayout"))
        .with_context(|| format!("invalid layout parameters in {}", path.display()))?;

    tracing::debug!(path = %path.display(), ?config, "loaded viewer config");
    Ok(config)
}
