// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for rich-media ad sessions.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a rich-media session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle states of a rich-media session as seen by the creative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    /// Content is loading; the bridge has not been initialized yet.
    Loading,
    /// Rendered at the position the developer placed it.
    Default,
    /// Occupying the full-screen overlay.
    Expanded,
    /// Occupying a creative-requested rectangle inside the page.
    Resized,
    /// Not shown.
    Hidden,
}

impl State {
    /// Name reported to the creative in `stateChange` events.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Default => "default",
            Self::Expanded => "expanded",
            Self::Resized => "resized",
            Self::Hidden => "hidden",
        }
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the ad lives in the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementType {
    /// Embedded in normal content flow.
    Inline,
    /// Full-screen, outside normal content flow.
    Interstitial,
}

impl PlacementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Interstitial => "interstitial",
        }
    }
}

/// Properties consulted when the creative expands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpandProperties {
    pub width: f64,
    pub height: f64,
    /// The creative draws its own close control; the SDK only keeps the tap region.
    pub use_custom_close: bool,
    pub is_modal: bool,
    pub lock_orientation: bool,
    pub use_background: bool,
    pub background_color: Option<String>,
    pub background_opacity: f64,
}

impl Default for ExpandProperties {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            use_custom_close: false,
            is_modal: true,
            lock_orientation: false,
            use_background: false,
            background_color: None,
            background_opacity: 1.0,
        }
    }
}

/// Where the close area sits inside a resized surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CustomClosePosition {
    TopLeft,
    TopCenter,
    #[default]
    TopRight,
    Center,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl CustomClosePosition {
    /// Wire keyword (e.g. `"bottom-right"`).
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::Center => "center",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
        }
    }

    /// Parse a wire keyword, case-insensitively.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "top-left" => Some(Self::TopLeft),
            "top-center" => Some(Self::TopCenter),
            "top-right" => Some(Self::TopRight),
            "center" => Some(Self::Center),
            "bottom-left" => Some(Self::BottomLeft),
            "bottom-center" => Some(Self::BottomCenter),
            "bottom-right" => Some(Self::BottomRight),
            _ => None,
        }
    }
}

/// Rectangle requested by the creative for `resize`, relative to the default position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResizeProperties {
    pub width: f64,
    pub height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub custom_close_position: CustomClosePosition,
    /// When false the surface is shifted back on-screen before it opens.
    pub allow_offscreen: bool,
}

impl Default for ResizeProperties {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            custom_close_position: CustomClosePosition::TopRight,
            allow_offscreen: true,
        }
    }
}

/// Orientation requested while expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForceOrientation {
    #[default]
    None,
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrientationProperties {
    pub allow_orientation_change: bool,
    pub force_orientation: ForceOrientation,
}

impl Default for OrientationProperties {
    fn default() -> Self {
        Self {
            allow_orientation_change: true,
            force_orientation: ForceOrientation::None,
        }
    }
}

/// Device rotation as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    PortraitUp,
    PortraitDown,
    LandscapeLeft,
    LandscapeRight,
}

impl Rotation {
    pub fn is_landscape(&self) -> bool {
        matches!(self, Self::LandscapeLeft | Self::LandscapeRight)
    }
}

impl ForceOrientation {
    /// Rotation the host should apply to the overlay, if any.
    pub fn rotation(&self) -> Option<Rotation> {
        match self {
            Self::None => None,
            Self::Portrait => Some(Rotation::PortraitUp),
            Self::Landscape => Some(Rotation::LandscapeLeft),
        }
    }
}

/// Device features a creative may query through `supports`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Sms,
    Tel,
    Calendar,
    StorePicture,
    InlineVideo,
}

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::Sms,
        Feature::Tel,
        Feature::Calendar,
        Feature::StorePicture,
        Feature::InlineVideo,
    ];

    /// Name used on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sms => "sms",
            Self::Tel => "tel",
            Self::Calendar => "calendar",
            Self::StorePicture => "storePicture",
            Self::InlineVideo => "inlineVideo",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// Which SDK-controlled surface a host request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Surface {
    /// The developer-placed container.
    Inline,
    /// The full-screen overlay used for expand and interstitials.
    Overlay,
    /// The variable-sized surface used for resize.
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Video,
    Audio,
}

/// Player options sent with `playVideo`/`playAudio`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaProperties {
    pub autoplay: bool,
    pub controls: bool,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub muted: bool,
    /// `normal` or `fullscreen`.
    pub start_style: String,
    /// `normal` or `exit`.
    pub stop_style: String,
}

impl Default for MediaProperties {
    fn default() -> Self {
        Self {
            autoplay: true,
            controls: true,
            looping: false,
            muted: false,
            start_style: "normal".into(),
            stop_style: "normal".into(),
        }
    }
}

/// Calendar entry payload sent with `createCalendarEvent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    #[serde(default)]
    pub id: Option<String>,
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    pub start: DateTime<FixedOffset>,
    #[serde(default)]
    pub end: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub reminder: Option<String>,
}
