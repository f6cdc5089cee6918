//! Gimbal control commands.
//!
//! The link is blocking, so every exchange runs on the blocking pool.

use std::time::Duration;

use anyhow::{Context, Result};
use ptzkit_config::PtzkitConfig;
use ptzkit_gimbal_link::{Attitude, GimbalLink, LinkError, SharedGimbalLink};
use tracing::{debug, info};

use crate::commands::GimbalCommands;
use crate::error::CliError;
use crate::output;

/// Execute gimbal command.
pub async fn execute(cmd: &GimbalCommands, config: &PtzkitConfig, json: bool) -> Result<()> {
    let link_config = config.link_config().map_err(CliError::from)?;
    let endpoint = link_config.endpoint;
    let link = SharedGimbalLink::new(GimbalLink::new(link_config));

    let result = match cmd {
        GimbalCommands::Attitude { count, interval_ms } => {
            attitude(&link, *count, *interval_ms, json).await
        }
        GimbalCommands::Set { yaw, pitch } => set(&link, *yaw, *pitch, json).await,
        GimbalCommands::Center => set(&link, 0.0, 0.0, json).await,
    };

    let closed = run_blocking(&link, |l| l.disconnect()).await;
    result.map_err(|e| match e.downcast::<LinkError>() {
        Ok(link_error) => CliError::from_link(link_error, endpoint).into(),
        Err(other) => other,
    })?;
    closed.context("failed to close gimbal socket")?;
    Ok(())
}

async fn attitude(link: &SharedGimbalLink, count: u32, interval_ms: u64, json: bool) -> Result<()> {
    let mut answered = 0u32;

    for reading in 1..=count {
        let attitude: Option<Attitude> = run_blocking(link, |l| l.request_attitude()).await?;
        if attitude.is_some() {
            answered += 1;
        }
        output::print_attitude(reading, attitude.as_ref(), json);

        if reading < count {
            tokio::time::sleep(Duration::from_millis(interval_ms)).await;
        }
    }

    info!(answered, count, "attitude polling finished");
    if answered == 0 {
        return Err(CliError::GimbalUnreachable(format!(
            "no attitude reply to {count} request(s)"
        ))
        .into());
    }
    Ok(())
}

async fn set(link: &SharedGimbalLink, yaw: f32, pitch: f32, json: bool) -> Result<()> {
    let limits = link.with_link(|l| *l.limits());
    run_blocking(link, move |l| l.set_pan_tilt(yaw, pitch)).await?;
    let (sent_yaw, sent_pitch) = limits.clamp(yaw, pitch);
    debug!(sent_yaw, sent_pitch, "angle command sent");
    output::print_angles_sent((yaw, pitch), (sent_yaw, sent_pitch), json);
    Ok(())
}

async fn run_blocking<T, F>(link: &SharedGimbalLink, op: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&SharedGimbalLink) -> Result<T, LinkError> + Send + 'static,
{
    let link = link.clone();
    let outcome = tokio::task::spawn_blocking(move || op(&link))
        .await
        .context("gimbal worker panicked")?;
    Ok(outcome?)
}
