// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SDK configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Feature;

/// Per-feature capability overrides.  `None` keeps the platform default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureOverrides {
    pub sms: Option<bool>,
    pub tel: Option<bool>,
    pub calendar: Option<bool>,
    pub store_picture: Option<bool>,
    pub inline_video: Option<bool>,
}

impl FeatureOverrides {
    pub fn get(&self, feature: Feature) -> Option<bool> {
        match feature {
            Feature::Sms => self.sms,
            Feature::Tel => self.tel,
            Feature::Calendar => self.calendar,
            Feature::StorePicture => self.store_picture,
            Feature::InlineVideo => self.inline_video,
        }
    }
}

/// Ad-view settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    /// Draw an SDK close button on inline and interstitial ads.
    pub show_close_button: bool,
    /// Seconds to wait before drawing the close button (0 = immediately).
    pub close_button_delay_secs: u32,
    /// Seconds an interstitial stays up before it dismisses itself (0 = never).
    pub interstitial_duration_secs: u32,
    /// Side length of the inline close button.
    pub inline_close_button_size: f64,
    /// Open URLs in the SDK's internal browser instead of the system browser.
    pub use_internal_browser: bool,
    pub features: FeatureOverrides,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            show_close_button: false,
            close_button_delay_secs: 0,
            interstitial_duration_secs: 0,
            inline_close_button_size: 28.0,
            use_internal_browser: false,
            features: FeatureOverrides::default(),
        }
    }
}

impl SdkConfig {
    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg: SdkConfig =
            serde_json::from_str(r#"{"show_close_button":true,"features":{"calendar":true}}"#)
                .unwrap();
        assert!(cfg.show_close_button);
        assert_eq!(cfg.close_button_delay_secs, 0);
        assert_eq!(cfg.features.get(Feature::Calendar), Some(true));
        assert_eq!(cfg.features.get(Feature::Sms), None);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mast.json");
        let cfg = SdkConfig {
            close_button_delay_secs: 5,
            interstitial_duration_secs: 10,
            ..Default::default()
        };
        cfg.save(&path).unwrap();
        assert_eq!(SdkConfig::load(&path).unwrap(), cfg);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SdkConfig::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, crate::MastError::Io(_)));
    }
}
