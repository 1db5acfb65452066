// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SDK config file persistence.

use std::path::Path;

use mast_core::SdkConfig;
use mast_core::error::Result;

/// Load the config at `path`, falling back to defaults when the file is
/// absent or unreadable.
pub fn load_config(path: Option<&Path>) -> SdkConfig {
    let Some(path) = path else {
        return SdkConfig::default();
    };
    match SdkConfig::load(path) {
        Ok(config) => {
            tracing::info!(path = %path.display(), "config loaded");
            config
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "config unreadable, using defaults");
            SdkConfig::default()
        }
    }
}

pub fn persist_config(path: &Path, config: &SdkConfig) -> Result<()> {
    config.save(path)?;
    tracing::info!(path = %path.display(), "config written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(Some(&dir.path().join("nope.json")));
        assert_eq!(cfg, SdkConfig::default());
        assert_eq!(load_config(None), SdkConfig::default());
    }

    #[test]
    fn invalid_json_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mast.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_config(Some(&path)), SdkConfig::default());
    }

    #[test]
    fn persisted_config_is_loaded_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mast.json");
        let cfg = SdkConfig {
            show_close_button: true,
            close_button_delay_secs: 3,
            ..Default::default()
        };
        persist_config(&path, &cfg).unwrap();
        assert_eq!(load_config(Some(&path)), cfg);
    }
}
