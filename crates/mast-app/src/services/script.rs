// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Replay scripts.  One step per line; `#` starts a comment.
//
//   load <html>          start a new rich-media session
//   loaded               the page finished loading
//   notify <raw>         a notification from the web surface
//   second <raw>         a notification from a two-part expand's second surface
//   tap                  the user tapped a close affordance
//   container x,y,w,h    the container moved or changed size
//   rotate <rotation>    the device rotated (portrait-up, landscape-left, ...)
//   show                 show the interstitial
//   hide                 close the interstitial
//   wait <secs>          let timers run, then apply their results
//   dispose              tear the session down

use std::time::Duration;

use kurbo::{Rect, Size};

use mast_core::Rotation;
use mast_core::error::{MastError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Load(String),
    PageLoaded,
    Notify(String),
    SecondSurface(String),
    Tap,
    Container(Rect),
    Rotate(Rotation),
    ShowInterstitial,
    CloseInterstitial,
    Wait(Duration),
    Dispose,
}

/// Parse a whole script.  Errors name the offending line.
pub fn parse_script(text: &str) -> Result<Vec<Step>> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                None
            } else {
                Some(parse_step(line).map_err(|e| MastError::Config(format!("line {}: {e}", i + 1))))
            }
        })
        .collect()
}

fn parse_step(line: &str) -> std::result::Result<Step, String> {
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    let step = match word {
        "load" => Step::Load(rest.to_owned()),
        "loaded" => Step::PageLoaded,
        "notify" if !rest.is_empty() => Step::Notify(rest.to_owned()),
        "second" if !rest.is_empty() => Step::SecondSurface(rest.to_owned()),
        "tap" => Step::Tap,
        "container" => Step::Container(parse_rect(rest)?),
        "rotate" => Step::Rotate(parse_rotation(rest)?),
        "show" => Step::ShowInterstitial,
        "hide" => Step::CloseInterstitial,
        "wait" => {
            let secs: f64 = rest
                .parse()
                .map_err(|_| format!("invalid wait duration {rest:?}"))?;
            if !secs.is_finite() || secs < 0.0 {
                return Err(format!("invalid wait duration {rest:?}"));
            }
            Step::Wait(Duration::from_secs_f64(secs))
        }
        "dispose" => Step::Dispose,
        other => return Err(format!("unknown step {other:?}")),
    };
    Ok(step)
}

/// `WIDTHxHEIGHT`, e.g. `480x800`.
pub fn parse_size(s: &str) -> std::result::Result<Size, String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    Ok(Size::new(number(w)?, number(h)?))
}

/// `x,y,width,height`, e.g. `0,100,320,50`.
pub fn parse_rect(s: &str) -> std::result::Result<Rect, String> {
    let parts = s
        .split(',')
        .map(number)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [x, y, w, h] => Ok(Rect::new(*x, *y, x + w, y + h)),
        _ => Err(format!("expected x,y,width,height, got {s:?}")),
    }
}

fn parse_rotation(s: &str) -> std::result::Result<Rotation, String> {
    match s {
        "portrait-up" => Ok(Rotation::PortraitUp),
        "portrait-down" => Ok(Rotation::PortraitDown),
        "landscape-left" => Ok(Rotation::LandscapeLeft),
        "landscape-right" => Ok(Rotation::LandscapeRight),
        other => Err(format!("unknown rotation {other:?}")),
    }
}

fn number(s: &str) -> std::result::Result<f64, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("invalid number {s:?}"))
}
