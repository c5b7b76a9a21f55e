// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::draw::{flatten, DrawCommand};
use crate::config::Config;
use crate::errors::EngineError;
use crate::observability::messages::engine::{EngineStarted, SnapshotFailed, SnapshotWritten};
use crate::observability::messages::StructuredLog;
use crate::traits::EngineContext;
use crate::tree::UiTree;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Serialize)]
struct Snapshot<'a> {
    frame: u64,
    width: f32,
    height: f32,
    commands: &'a [DrawCommand],
}

/// Engine without a window: each frame's tree is flattened into a draw list
/// that can be inspected or written to disk as JSON.
#[derive(Debug)]
pub struct HeadlessEngine {
    title: String,
    width: f32,
    height: f32,
    frame_count: u64,
    in_frame: bool,
    max_frames: Option<u64>,
    stop: Option<Arc<AtomicBool>>,
    snapshot: Option<PathBuf>,
    last_draw: Vec<DrawCommand>,
}

impl HeadlessEngine {
    pub fn init(width: u32, height: u32, title: &str) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::Init(format!(
                "surface must not be empty, got {}x{}",
                width, height
            )));
        }
        EngineStarted {
            title,
            width,
            height,
        }
        .log();
        Ok(Self {
            title: title.to_string(),
            width: width as f32,
            height: height as f32,
            frame_count: 0,
            in_frame: false,
            max_frames: None,
            stop: None,
            snapshot: None,
            last_draw: Vec::new(),
        })
    }

    /// Engine sized and limited as `config` describes.
    pub fn from_config(config: &Config) -> Result<Self, EngineError> {
        let mut engine = Self::init(config.window.width, config.window.height, &config.window.title)?;
        engine.max_frames = config.max_frames;
        engine.snapshot = config.snapshot.clone();
        Ok(engine)
    }

    /// The loop stops once `stop` is set.
    pub fn with_stop_signal(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Writes the draw list of every frame to `path`, replacing the previous
    /// one. A failed write is logged and does not end the frame loop.
    pub fn with_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot = Some(path.into());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Draw list of the most recently ended frame.
    pub fn last_draw(&self) -> &[DrawCommand] {
        &self.last_draw
    }

    /// Why [`EngineContext::should_continue`] returned false, if it did.
    pub fn stop_reason(&self) -> Option<&'static str> {
        if self
            .stop
            .as_ref()
            .is_some_and(|stop| stop.load(Ordering::SeqCst))
        {
            Some("stop requested")
        } else if self.max_frames.is_some_and(|max| self.frame_count >= max) {
            Some("frame limit reached")
        } else {
            None
        }
    }

    fn write_snapshot(&self, path: &Path) -> Result<(), EngineError> {
        let snapshot = Snapshot {
            frame: self.frame_count,
            width: self.width,
            height: self.height,
            commands: &self.last_draw,
        };
        let json = serde_json::to_vec_pretty(&snapshot)?;
        std::fs::write(path, json).map_err(|source| EngineError::Snapshot {
            path: path.to_path_buf(),
            source,
        })?;
        SnapshotWritten {
            path: &path.display().to_string(),
            frame: self.frame_count,
            commands: self.last_draw.len(),
        }
        .log();
        Ok(())
    }
}

impl EngineContext for HeadlessEngine {
    fn should_continue(&mut self) -> bool {
        self.stop_reason().is_none()
    }

    fn begin_frame(&mut self) -> Result<(), EngineError> {
        if self.in_frame {
            return Err(EngineError::FrameState(
                "begin_frame called while a frame is open".to_string(),
            ));
        }
        self.in_frame = true;
        Ok(())
    }

    fn end_frame(&mut self, tree: &UiTree) -> Result<usize, EngineError> {
        if !self.in_frame {
            return Err(EngineError::FrameState(
                "end_frame called without begin_frame".to_string(),
            ));
        }
        self.in_frame = false;
        self.frame_count += 1;
        self.last_draw = flatten(tree);
        if let Some(path) = &self.snapshot {
            if let Err(error) = self.write_snapshot(path) {
                SnapshotFailed {
                    path: &path.display().to_string(),
                    frame: self.frame_count,
                    error: &error,
                }
                .log();
            }
        }
        Ok(self.last_draw.len())
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Attrs, NodeKind, Styled};

    fn tree() -> UiTree {
        let mut tree = UiTree::with_root(NodeKind::Column, Attrs::new());
        let root = tree.root_id();
        tree.push_child(root, NodeKind::Text, Attrs::new().text("frame"));
        tree
    }

    #[test]
    fn test_rejects_empty_surface() {
        assert!(matches!(
            HeadlessEngine::init(0, 600, "t"),
            Err(EngineError::Init(_))
        ));
    }

    #[test]
    fn test_frame_bracketing_is_enforced() {
        let mut engine = HeadlessEngine::init(100, 100, "t").unwrap();
        assert!(matches!(
            engine.end_frame(&tree()),
            Err(EngineError::FrameState(_))
        ));

        engine.begin_frame().unwrap();
        assert!(matches!(engine.begin_frame(), Err(EngineError::FrameState(_))));
        assert_eq!(engine.end_frame(&tree()).unwrap(), 1);
        assert_eq!(engine.frame_count(), 1);
    }

    #[test]
    fn test_max_frames_and_stop_signal() {
        let stop = Arc::new(AtomicBool::new(false));
        let mut engine = HeadlessEngine::init(100, 100, "t")
            .unwrap()
            .with_max_frames(2)
            .with_stop_signal(stop.clone());

        assert!(engine.should_continue());
        stop.store(true, Ordering::SeqCst);
        assert!(!engine.should_continue());
        assert_eq!(engine.stop_reason(), Some("stop requested"));

        stop.store(false, Ordering::SeqCst);
        for _ in 0..2 {
            engine.begin_frame().unwrap();
            engine.end_frame(&tree()).unwrap();
        }
        assert!(!engine.should_continue());
        assert_eq!(engine.stop_reason(), Some("frame limit reached"));
    }

    #[test]
    fn test_snapshot_is_written_each_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.json");
        let mut engine = HeadlessEngine::init(320, 200, "t")
            .unwrap()
            .with_snapshot(&path);

        engine.begin_frame().unwrap();
        engine.end_frame(&tree()).unwrap();

        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(json["frame"], 1);
        assert_eq!(json["width"], 320.0);
        assert_eq!(json["commands"][0]["text"], "frame");
    }

    #[test]
    fn test_snapshot_to_missing_directory_keeps_running() {
        let mut engine = HeadlessEngine::init(10, 10, "t")
            .unwrap()
            .with_snapshot("/definitely/not/here/frame.json");

        for frame in 1..=2 {
            engine.begin_frame().unwrap();
            assert_eq!(engine.end_frame(&tree()).unwrap(), 1);
            assert_eq!(engine.frame_count(), frame);
        }
        assert_eq!(engine.last_draw().len(), 1);
        assert!(engine.should_continue());
    }
}
