// SPDX-License-Identifier: Apache-2.0
//!
//! Load the runtime [`crate::Config`] from a YAML file on disk, falling back
//! to defaults when no path is given or the file doesn't exist.

use std::path::Path;

use anyhow::{Context, Result};

use crate::schema::Config;

pub fn load(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    if !path.exists() {
        return Ok(Config::default());
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let cfg: Config = serde_yaml::from_str(&raw)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    Ok(cfg)
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
