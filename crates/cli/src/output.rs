//! Output formatting for CLI responses

use anyhow::{Error, Result};
use colored::Colorize;
use ptzkit_config::{PtzkitConfig, to_yaml_string};
use ptzkit_gimbal_link::Attitude;
use ptzkit_virtual_ptz::{CropResult, OverviewGrid, PtzEngine};
use serde_json::json;

use crate::error::CliError;

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "type": error_type_name(error)
        }
    });
    match serde_json::to_string_pretty(&error_json) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format error as JSON: {e}"),
    }
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

fn error_type_name(error: &Error) -> &'static str {
    error.downcast_ref::<CliError>().map_or("other", CliError::type_name)
}

pub fn print_attitude(reading: u32, attitude: Option<&Attitude>, json: bool) {
    if json {
        let line = match attitude {
            Some(a) => json!({
                "reading": reading,
                "yaw_deg": a.yaw_deg,
                "pitch_deg": a.pitch_deg,
                "roll_deg": a.roll_deg,
            }),
            None => json!({ "reading": reading, "response": null }),
        };
        println!("{line}");
        return;
    }

    match attitude {
        Some(a) => println!(
            "{} yaw {:>7.1}°  pitch {:>6.1}°  roll {:>6.1}°",
            format!("#{reading}").dimmed(),
            a.yaw_deg,
            a.pitch_deg,
            a.roll_deg
        ),
        None => println!("{} {}", format!("#{reading}").dimmed(), "no response".yellow()),
    }
}

pub fn print_angles_sent(requested: (f32, f32), sent: (f32, f32), json: bool) {
    let clamped = (requested.0 - sent.0).abs() > f32::EPSILON || (requested.1 - sent.1).abs() > f32::EPSILON;
    if json {
        println!(
            "{}",
            json!({
                "success": true,
                "yaw_deg": sent.0,
                "pitch_deg": sent.1,
                "clamped": clamped,
            })
        );
        return;
    }

    print!("{} yaw {:.1}°, pitch {:.1}°", "Sent".green(), sent.0, sent.1);
    if clamped {
        print!(
            " {}",
            format!("(clamped from {:.1}°, {:.1}°)", requested.0, requested.1).yellow()
        );
    }
    println!();
}

/// Print one replayed frame. JSON output is one object per line.
pub fn print_crop(frame: usize, crop: &CropResult, grid: Option<&OverviewGrid>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(crop).map_err(CliError::from)?);
        return Ok(());
    }

    let target = crop
        .target_id
        .map_or_else(|| "-".dimmed().to_string(), |id| id.to_string().bold().to_string());
    let r = crop.rect;
    println!(
        "{:>5}  crop {:>4},{:<4} {:>4}x{:<4}  zoom {:.2}  target {}",
        frame, r.x, r.y, r.width, r.height, crop.zoom, target
    );
    if let Some(grid) = grid {
        for row in grid.to_string().lines() {
            println!("       {row}");
        }
    }
    Ok(())
}

pub fn print_replay_summary(frames: usize, engine: &PtzEngine) {
    let state = engine.state();
    let pinned = state
        .target_id
        .map_or_else(|| "none".to_string(), |id| id.to_string());
    let zoom_mode = if state.manual_zoom_active { "manual" } else { "auto" };
    println!(
        "{} {} frame(s); pinned target {}, {} zoom",
        "Replayed".green(),
        frames,
        pinned,
        zoom_mode
    );
}

pub fn print_config(config: &PtzkitConfig, json: bool) -> Result<()> {
    if json {
        let output = json!({ "success": true, "config": config });
        println!("{}", serde_json::to_string_pretty(&output).map_err(CliError::from)?);
    } else {
        print!("{}", to_yaml_string(config).map_err(CliError::from)?);
    }
    Ok(())
}

pub fn print_config_valid(source: &str, json: bool) {
    if json {
        println!("{}", json!({ "success": true, "source": source }));
    } else {
        println!("{} {}", "✓".green(), format!("Configuration valid ({source})").bold());
    }
}
