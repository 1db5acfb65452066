// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Protocol errors.  These are returned to the creative as `error` events and
// never raised to the host application.

use thiserror::Error;

use mast_core::CreativeEvent;

/// A command the bridge refused.  Every variant names the command's canonical
/// wire name so the creative can tell which call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// The command is not allowed in the current state or placement.
    #[error("{action}: {message}")]
    IllegalTransition {
        action: &'static str,
        message: String,
    },

    /// Geometry or argument outside policy.
    #[error("{action}: {message}")]
    ConstraintViolation {
        action: &'static str,
        message: String,
    },

    /// The device feature is not in the capability registry.
    #[error("{action}: {message}")]
    Unsupported {
        action: &'static str,
        message: String,
    },
}

impl BridgeError {
    pub fn illegal(action: &'static str, message: impl Into<String>) -> Self {
        Self::IllegalTransition {
            action,
            message: message.into(),
        }
    }

    pub fn constraint(action: &'static str, message: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            action,
            message: message.into(),
        }
    }

    pub fn unsupported(action: &'static str) -> Self {
        Self::Unsupported {
            action,
            message: "Not supported by platform.".into(),
        }
    }

    /// Canonical name of the offending command.
    pub fn action(&self) -> &'static str {
        match self {
            Self::IllegalTransition { action, .. }
            | Self::ConstraintViolation { action, .. }
            | Self::Unsupported { action, .. } => action,
        }
    }

    /// Message shown to the creative, without the action prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::IllegalTransition { message, .. }
            | Self::ConstraintViolation { message, .. }
            | Self::Unsupported { message, .. } => message,
        }
    }

    /// The outbound `error` event for this failure.
    pub fn to_event(&self) -> CreativeEvent {
        CreativeEvent::Error {
            message: self.message().to_owned(),
            action: self.action().to_owned(),
        }
    }
}
