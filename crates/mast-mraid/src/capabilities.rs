// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Device feature registry.  Built once per session before `ready` is sent,
// read-only afterwards.

use bitflags::bitflags;

use mast_core::Feature;
use mast_core::config::FeatureOverrides;

bitflags! {
    /// Set of device features a session exposes to its creative.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Features: u8 {
        const SMS           = 1 << 0;
        const TEL           = 1 << 1;
        const CALENDAR      = 1 << 2;
        const STORE_PICTURE = 1 << 3;
        const INLINE_VIDEO  = 1 << 4;
    }
}

impl Features {
    /// What a phone host offers out of the box.  Calendar access is off.
    pub fn platform_default() -> Self {
        Self::SMS | Self::TEL | Self::STORE_PICTURE | Self::INLINE_VIDEO
    }

    pub fn from_feature(feature: Feature) -> Self {
        match feature {
            Feature::Sms => Self::SMS,
            Feature::Tel => Self::TEL,
            Feature::Calendar => Self::CALENDAR,
            Feature::StorePicture => Self::STORE_PICTURE,
            Feature::InlineVideo => Self::INLINE_VIDEO,
        }
    }
}

/// Immutable capability table for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityRegistry {
    features: Features,
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl CapabilityRegistry {
    /// Builder seeded with the platform defaults.
    pub fn builder() -> CapabilityRegistryBuilder {
        CapabilityRegistryBuilder {
            features: Features::platform_default(),
        }
    }

    pub fn supports(&self, feature: Feature) -> bool {
        self.features.contains(Features::from_feature(feature))
    }

    /// Answer a creative `supports` query.  Unknown names are unsupported.
    pub fn supports_name(&self, name: &str) -> bool {
        Feature::from_name(name).is_some_and(|f| self.supports(f))
    }

    /// Full table in reporting order.
    pub fn table(&self) -> Vec<(Feature, bool)> {
        Feature::ALL
            .into_iter()
            .map(|f| (f, self.supports(f)))
            .collect()
    }
}

/// Collects overrides before the registry is frozen.
#[derive(Debug, Clone)]
pub struct CapabilityRegistryBuilder {
    features: Features,
}

impl CapabilityRegistryBuilder {
    pub fn set(mut self, feature: Feature, enabled: bool) -> Self {
        self.features.set(Features::from_feature(feature), enabled);
        self
    }

    /// Apply configured overrides; unset entries keep their current value.
    pub fn with_overrides(mut self, overrides: &FeatureOverrides) -> Self {
        for feature in Feature::ALL {
            if let Some(enabled) = overrides.get(feature) {
                self = self.set(feature, enabled);
            }
        }
        self
    }

    pub fn build(self) -> CapabilityRegistry {
        CapabilityRegistry {
            features: self.features,
        }
    }
}
