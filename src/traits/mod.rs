// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod engine;
pub mod logic;

pub use engine::EngineContext;
pub use logic::{FnLogic, FrameContext, LogicLoader, RenderLogic, Viewport};
