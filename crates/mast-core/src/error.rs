// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for host, I/O, and configuration failures.
//
// Protocol violations raised by the creative never use this type; they are
// reported back into the web surface as `error` events instead.

use thiserror::Error;

/// Top-level error type for SDK operations outside the bridge protocol.
#[derive(Debug, Error)]
pub enum MastError {
    // -- Host / platform --
    #[error("host adapter error: {0}")]
    Host(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,

    #[error("network request failed: {0}")]
    Network(String),

    // -- Session lifecycle --
    #[error("no rich-media session is active")]
    NoSession,

    #[error("UI dispatcher queue is closed")]
    DispatcherClosed,

    // -- Configuration / persistence --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, MastError>;
