// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Harness services: console host, config file, and replay scripts.

pub mod config_file;
pub mod console_host;
pub mod script;
