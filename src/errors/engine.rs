// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Engine failures. `Init` and `FrameState` are fatal and leave the frame
/// loop; snapshot failures are logged by the headless engine and the frame
/// goes on.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine could not create its surface.
    #[error("engine initialization failed: {0}")]
    Init(String),

    /// Frame bracketing was violated (begin twice, end without begin).
    #[error("engine frame state corrupted: {0}")]
    FrameState(String),

    /// The draw-list snapshot could not be written.
    #[error("failed to write frame snapshot '{path}': {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The draw list could not be serialized for the snapshot.
    #[error("failed to serialize frame snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}
