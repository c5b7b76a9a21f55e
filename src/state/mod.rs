// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Host-owned values that survive logic reloads.

mod persistent;

pub use persistent::PersistentState;
