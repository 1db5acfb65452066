// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// MAST: Core types, geometry model, and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod events;
pub mod geometry;
pub mod types;

pub use config::SdkConfig;
pub use error::MastError;
pub use events::{CreativeEvent, HostRequest};
pub use geometry::{CLOSE_AREA_SIZE, GeometrySnapshot, HostLayout};
pub use types::*;
