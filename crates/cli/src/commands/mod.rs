//! Command implementations for ptzctl

pub mod config;
pub mod gimbal;
pub mod ptz;

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum GimbalCommands {
    /// Query the gimbal attitude
    Attitude {
        /// Number of readings to take
        #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        count: u32,
        /// Delay between readings in milliseconds
        #[arg(short, long, default_value = "200")]
        interval_ms: u64,
    },

    /// Point the gimbal (angles are clamped to the configured limits)
    #[command(allow_negative_numbers = true)]
    Set {
        /// Yaw in degrees, positive to the right
        yaw: f32,
        /// Pitch in degrees, negative looks down
        pitch: f32,
    },

    /// Return the gimbal to yaw 0°, pitch 0°
    Center,
}

#[derive(Subcommand, Debug)]
pub enum PtzCommands {
    /// Run recorded detections and input events through the PTZ engine
    Replay {
        /// JSON lines file, one frame per line
        file: PathBuf,
        /// Print an 8x8 overview of subject positions after each frame
        #[arg(long)]
        overview: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Check the configuration and report the first problem
    Validate,
}
