//! Virtual PTZ replay.

use std::path::Path;

use anyhow::{Context, Result};
use ptzkit_config::PtzkitConfig;
use ptzkit_virtual_ptz::{Detection, JoystickEvent, OverviewGrid, PtzEngine};
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::commands::PtzCommands;
use crate::error::CliError;
use crate::output;

/// One recorded frame: input events are applied before the detections.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReplayFrame {
    #[serde(default)]
    detections: Vec<Detection>,
    #[serde(default)]
    events: Vec<JoystickEvent>,
    /// Pin this id before the events, as an external selector would.
    #[serde(default)]
    target: Option<u32>,
}

/// Execute PTZ command.
pub async fn execute(cmd: &PtzCommands, config: &PtzkitConfig, json: bool) -> Result<()> {
    match cmd {
        PtzCommands::Replay { file, overview } => replay(file, config, *overview, json).await,
    }
}

async fn replay(path: &Path, config: &PtzkitConfig, overview: bool, json: bool) -> Result<()> {
    let engine_config = config.engine_config().map_err(CliError::from)?;
    let mut engine = PtzEngine::new(engine_config).map_err(|e| CliError::Config(e.into()))?;

    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("failed to open replay file {}", path.display()))?;
    let mut lines = BufReader::new(file).lines();

    let mut line_no = 0usize;
    let mut frames = 0usize;
    while let Some(line) = lines.next_line().await.map_err(CliError::from)? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let frame: ReplayFrame = serde_json::from_str(line)
            .map_err(|e| CliError::InvalidInput(format!("{}:{line_no}: {e}", path.display())))?;
        debug!(line_no, detections = frame.detections.len(), events = frame.events.len(), "replay frame");

        if let Some(id) = frame.target {
            engine.set_target(id);
        }
        for event in frame.events {
            engine.handle_input(event);
        }
        let crop = engine.update(&frame.detections);
        frames += 1;

        let grid = overview.then(|| {
            OverviewGrid::from_detections(engine_config.frame, &engine.state().last_detections, crop.target_id)
        });
        output::print_crop(frames, &crop, grid.as_ref(), json)?;
    }

    info!(frames, "replay finished");
    if !json {
        output::print_replay_summary(frames, &engine);
    }
    Ok(())
}
