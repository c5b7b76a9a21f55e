// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Change detection and atomic logic swaps.
//!
//! The supervisor polls one file's modification time per frame. A changed
//! timestamp triggers a full load through the configured
//! [`LogicLoader`](crate::traits::LogicLoader); only a successful load
//! replaces the active unit.
//!
//! ```text
//! Watching --change--> Reloading --ok--> Watching
//!                                 \--err--> Degraded --change--> Reloading
//! ```

mod supervisor;

pub use supervisor::{LogicModule, ReloadOutcome, ReloadSupervisor, SupervisorState};
