// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Default fuel level for WASM logic per frame (100 million instructions)
pub const DEFAULT_FUEL_LEVEL: u64 = 100_000_000;
/// Minimum allowed fuel level (1 million instructions)
pub const MIN_FUEL_LEVEL: u64 = 1_000_000;
/// Maximum allowed fuel level (500 million instructions) - hard limit
pub const MAX_FUEL_LEVEL: u64 = 500_000_000;

/// Default per-frame statement budget for UI scripts
pub const DEFAULT_SCRIPT_STEPS: u64 = 1_000_000;

/// Logic file used when neither the config nor the environment names one
pub const DEFAULT_LOGIC_PATH: &str = "ui/app.ui";
/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "ouroboros.yaml";
/// Environment variable naming an alternative config file
pub const CONFIG_ENV_VAR: &str = "OUROBOROS_CONFIG";
/// Environment variable overriding the logic path
pub const LOGIC_ENV_VAR: &str = "OUROBOROS_LOGIC";

pub const DEFAULT_WINDOW_WIDTH: u32 = 1280;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 800;
pub const DEFAULT_WINDOW_TITLE: &str = "Ouroboros: Live Hot Reload";

/// ~60 frames per second
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;
/// Frames between two summary log lines
pub const DEFAULT_LOG_EVERY: u64 = 60;
