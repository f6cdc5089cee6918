//! Virtual pan/tilt/zoom for a fixed wide camera.
//!
//! The engine crops a portrait window out of the full frame instead of moving
//! optics. Each inference cycle it picks a target from the detections (the
//! lowest tracker id, or a pinned id), derives a zoom that makes the target
//! fill a fixed share of the output height, and returns a crop rectangle that
//! always lies inside the frame. Joystick events override the zoom and cycle
//! the pinned target.
//!
//! ```
//! use ptzkit_virtual_ptz::{BoundingBox, Detection, PtzConfig, PtzEngine};
//!
//! let mut engine = PtzEngine::new(PtzConfig::default())?;
//! let crop = engine.update(&[Detection::with_id(BoundingBox::new(900.0, 360.0, 1000.0, 720.0), 4)]);
//! assert_eq!(crop.target_id, Some(4));
//! assert!(crop.rect.fits_within(engine.config().frame));
//! # Ok::<(), ptzkit_virtual_ptz::PtzError>(())
//! ```

#![deny(static_mut_refs)]

pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod overview;
pub mod types;

pub use config::{
    AspectRatio, DEFAULT_FRAME, DEFAULT_MAX_ZOOM, DEFAULT_TARGET_FILL, DEFAULT_ZOOM_STEP,
    PtzConfig,
};
pub use engine::{PtzEngine, PtzState};
pub use error::{PtzError, PtzResult};
pub use input::{Action, Direction, JoystickEvent};
pub use overview::{Cell, GRID_SIZE, OverviewGrid};
pub use types::{BoundingBox, CropRect, CropResult, Detection, FrameSize};
