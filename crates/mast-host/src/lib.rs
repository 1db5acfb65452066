// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// MAST host adapter contracts.  The bridge never touches a UI; the host swaps
// containers, opens overlays, and performs device actions on its behalf.

pub mod stub;
pub mod traits;

pub use stub::StubHost;
pub use traits::PlatformHost;
