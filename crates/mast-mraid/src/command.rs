// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Notification decoding.
//
// The creative's script talks to the SDK only through `|`-separated strings
// such as `resize|0|0|300|250`.  Decoding is pure: a string with an unknown
// name, the wrong arity, or an unparsable argument is dropped and never
// reaches the state machine.

use serde::Deserialize;
use tracing::debug;

use mast_core::{CalendarEvent, ExpandProperties, MediaKind, MediaProperties, OrientationProperties};

/// Field separator between command name and arguments.
pub const FIELD_SEPARATOR: char = '|';

/// Arguments accepted by `resize`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeArgs {
    /// Use the stored resize properties as they are.
    Stored,
    /// Replace width and height, keep the stored offset.
    Size { width: f64, height: f64 },
    /// Replace offset and size.
    Frame {
        offset_x: f64,
        offset_y: f64,
        width: f64,
        height: f64,
    },
}

/// `setResizeProperties` payload as it arrives on the wire.  The close
/// position stays a string here so that an unknown keyword can be reported
/// back to the creative instead of being silently dropped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResizePropertiesPayload {
    pub width: f64,
    pub height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub custom_close_position: Option<String>,
    pub allow_offscreen: bool,
}

impl Default for ResizePropertiesPayload {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            custom_close_position: None,
            allow_offscreen: true,
        }
    }
}

/// A decoded creative command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Close,
    Hide,
    Show,
    Expand {
        properties: Option<ExpandProperties>,
        url: Option<String>,
    },
    Resize(ResizeArgs),
    Open(String),
    PlayMedia {
        kind: MediaKind,
        url: String,
        properties: Option<MediaProperties>,
    },
    CreateCalendarEvent(CalendarEvent),
    StorePicture(String),
    MakeCall(String),
    UseCustomClose(bool),
    Request {
        url: String,
        display: String,
    },
    SendSms {
        recipient: String,
        body: String,
    },
    SendMail {
        recipient: String,
        subject: String,
        body: String,
    },
    OpenMap {
        poi: String,
        fullscreen: bool,
    },
    SetExpandProperties(ExpandProperties),
    SetResizeProperties(ResizePropertiesPayload),
    SetOrientationProperties(OrientationProperties),
    Supports(String),
}

impl Command {
    /// Canonical wire name, used to tag error events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Close => "close",
            Self::Hide => "hide",
            Self::Show => "show",
            Self::Expand { .. } => "expand",
            Self::Resize(_) => "resize",
            Self::Open(_) => "open",
            Self::PlayMedia {
                kind: MediaKind::Video,
                ..
            } => "playVideo",
            Self::PlayMedia {
                kind: MediaKind::Audio,
                ..
            } => "playAudio",
            Self::CreateCalendarEvent(_) => "createCalendarEvent",
            Self::StorePicture(_) => "storePicture",
            Self::MakeCall(_) => "makeCall",
            Self::UseCustomClose(_) => "useCustomClose",
            Self::Request { .. } => "request",
            Self::SendSms { .. } => "sendSms",
            Self::SendMail { .. } => "sendMail",
            Self::OpenMap { .. } => "openMap",
            Self::SetExpandProperties(_) => "setExpandProperties",
            Self::SetResizeProperties(_) => "setResizeProperties",
            Self::SetOrientationProperties(_) => "setOrientationProperties",
            Self::Supports(_) => "supports",
        }
    }

    /// Decode a raw notification.  Returns `None` for anything malformed.
    pub fn parse(raw: &str) -> Option<Command> {
        let tokens: Vec<&str> = raw.split(FIELD_SEPARATOR).collect();
        let command = decode(&tokens);
        if command.is_none() {
            debug!(raw, "dropping malformed notification");
        }
        command
    }
}

fn decode(tokens: &[&str]) -> Option<Command> {
    let (name, args) = tokens.split_first()?;
    let command = match (*name, args) {
        ("close", []) => Command::Close,
        ("hide", []) => Command::Hide,
        ("show", []) => Command::Show,

        ("expand", []) => Command::Expand {
            properties: None,
            url: None,
        },
        ("expand", [url]) => Command::Expand {
            properties: None,
            url: optional_url(url),
        },
        ("expand", [json, url]) => Command::Expand {
            properties: Some(json_arg(json)?),
            url: optional_url(url),
        },

        ("resize", []) => Command::Resize(ResizeArgs::Stored),
        ("resize", [w, h]) => Command::Resize(ResizeArgs::Size {
            width: number(w)?,
            height: number(h)?,
        }),
        ("resize", [ox, oy, w, h]) => Command::Resize(ResizeArgs::Frame {
            offset_x: number(ox)?,
            offset_y: number(oy)?,
            width: number(w)?,
            height: number(h)?,
        }),

        ("open", [url]) => Command::Open((*url).to_owned()),
        ("storePicture", [url]) => Command::StorePicture((*url).to_owned()),
        ("makeCall", [number]) => Command::MakeCall((*number).to_owned()),
        ("useCustomClose", [flag]) => Command::UseCustomClose(boolean(flag)),

        ("playVideo" | "playAudio", [url, rest @ ..]) if rest.len() <= 1 => {
            let kind = if *name == "playVideo" {
                MediaKind::Video
            } else {
                MediaKind::Audio
            };
            let properties = match rest {
                [json] => Some(json_arg(json)?),
                _ => None,
            };
            Command::PlayMedia {
                kind,
                url: (*url).to_owned(),
                properties,
            }
        }

        ("createCalendarEvent", [json]) => Command::CreateCalendarEvent(json_arg(json)?),
        ("request", [url, display]) => Command::Request {
            url: (*url).to_owned(),
            display: (*display).to_owned(),
        },
        ("sendSms" | "sendSMS", [recipient, body]) => Command::SendSms {
            recipient: (*recipient).to_owned(),
            body: (*body).to_owned(),
        },
        ("sendMail", [recipient, subject, body]) => Command::SendMail {
            recipient: (*recipient).to_owned(),
            subject: (*subject).to_owned(),
            body: (*body).to_owned(),
        },
        ("openMap", [poi, fullscreen]) => Command::OpenMap {
            poi: (*poi).to_owned(),
            fullscreen: boolean(fullscreen),
        },

        ("setExpandProperties", [json]) => Command::SetExpandProperties(json_arg(json)?),
        ("setResizeProperties", [json]) => Command::SetResizeProperties(json_arg(json)?),
        ("setOrientationProperties", [json]) => {
            Command::SetOrientationProperties(json_arg(json)?)
        }
        ("supports", [feature]) => Command::Supports((*feature).to_owned()),

        _ => return None,
    };
    Some(command)
}

/// An empty or literal `null` URL means "no URL".
fn optional_url(token: &str) -> Option<String> {
    let token = token.trim();
    if token.is_empty() || token.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(token.to_owned())
    }
}

fn number(token: &str) -> Option<f64> {
    token.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Lenient boolean: anything other than `true` (any case) is `false`.
fn boolean(token: &str) -> bool {
    token.trim().eq_ignore_ascii_case("true")
}

fn json_arg<T: serde::de::DeserializeOwned>(token: &str) -> Option<T> {
    match serde_json::from_str(token) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(error = %e, "argument payload did not deserialize");
            None
        }
    }
}
