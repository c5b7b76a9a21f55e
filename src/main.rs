// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use the_ouroboros::config::Config;
use the_ouroboros::engine::HeadlessEngine;
use the_ouroboros::harness::Harness;
use the_ouroboros::observability::messages::engine::EngineStopped;
use the_ouroboros::observability::messages::frame::FrameSummary;
use the_ouroboros::observability::messages::StructuredLog;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// `RUST_LOG` if set and valid, `info` otherwise.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{:#}", error);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let config = Config::discover().context("failed to load configuration")?;

    let stop = Arc::new(AtomicBool::new(false));
    let engine = HeadlessEngine::from_config(&config)
        .context("failed to initialize engine")?
        .with_stop_signal(stop.clone());

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping after the current frame");
            stop.store(true, Ordering::SeqCst);
        }
    });

    // The frame loop is synchronous and blocks between frames.
    tokio::task::spawn_blocking(move || -> Result<()> {
        let mut harness = Harness::from_config(engine, &config);
        let stats = harness.run().context("engine failed during the frame loop")?;

        let engine = harness.into_engine();
        FrameSummary {
            frame: stats.frames,
            draw_count: engine.last_draw().len(),
            reloads: stats.reloads,
            failures: stats.failures(),
        }
        .log();
        EngineStopped {
            frames: stats.frames,
            reason: engine.stop_reason().unwrap_or("engine closed"),
        }
        .log();
        Ok(())
    })
    .await
    .context("frame loop task panicked")?
}
