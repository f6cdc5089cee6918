//! Target selection and crop computation.

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::PtzConfig;
use crate::error::PtzResult;
use crate::input::{Direction, JoystickEvent};
use crate::types::{BoundingBox, CropRect, CropResult, Detection, FrameSize};

/// Mutable engine state, exposed read-only through [`PtzEngine::state`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PtzState {
    /// Pinned target. `None` means the lowest id is acquired automatically.
    pub target_id: Option<u32>,
    pub manual_zoom_active: bool,
    /// Manual zoom; only used while `manual_zoom_active`.
    pub current_zoom: f64,
    /// Automatic zoom from the latest update, kept even in manual mode.
    pub last_auto_zoom: f64,
    /// Valid detections from the latest update.
    pub last_detections: Vec<Detection>,
}

impl Default for PtzState {
    fn default() -> Self {
        Self {
            target_id: None,
            manual_zoom_active: false,
            current_zoom: 1.0,
            last_auto_zoom: 1.0,
            last_detections: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cycle {
    Next,
    Previous,
}

/// Virtual pan/tilt/zoom controller.
///
/// Feed it one detection list per inference cycle with [`update`](Self::update)
/// and manual input with [`handle_input`](Self::handle_input). The engine does
/// no I/O; callers sharing it across threads must wrap it in a mutex.
#[derive(Debug, Clone)]
pub struct PtzEngine {
    config: PtzConfig,
    state: PtzState,
}

impl PtzEngine {
    /// # Errors
    ///
    /// Returns the first constraint `config` violates, see
    /// [`PtzConfig::validate`].
    pub fn new(config: PtzConfig) -> PtzResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: PtzState::default(),
        })
    }

    pub fn config(&self) -> &PtzConfig {
        &self.config
    }

    pub fn state(&self) -> &PtzState {
        &self.state
    }

    pub fn pinned_target(&self) -> Option<u32> {
        self.state.target_id
    }

    pub fn is_manual_zoom(&self) -> bool {
        self.state.manual_zoom_active
    }

    /// Crop size `zoom` would produce, clamped to `[1, max_zoom]`, for
    /// previewing framing without touching the state.
    pub fn crop_size(&self, zoom: f64) -> FrameSize {
        let zoom = zoom.clamp(1.0, self.config.max_zoom);
        let rect = self.crop_rect(self.config.frame.center(), zoom);
        FrameSize::new(rect.width, rect.height)
    }

    /// Compute the crop for one frame of detections.
    ///
    /// Invalid boxes are dropped before anything else. A pinned target that is
    /// missing from `detections` leaves the crop unresolved for this cycle;
    /// the pin itself is kept.
    pub fn update(&mut self, detections: &[Detection]) -> CropResult {
        self.state.last_detections = detections
            .iter()
            .filter(|d| d.bbox.is_valid())
            .copied()
            .collect();

        let target = self.resolve_target();
        let auto_zoom = target.map_or(1.0, |t| self.auto_zoom(&t.bbox));
        self.state.last_auto_zoom = auto_zoom;

        let zoom = if self.state.manual_zoom_active {
            self.state.current_zoom
        } else {
            auto_zoom
        };
        let center = target.map_or_else(|| self.config.frame.center(), |t| t.bbox.center());
        let rect = self.crop_rect(center, zoom);
        let target_id = target.and_then(|t| t.id);

        trace!(
            detections = self.state.last_detections.len(),
            pinned = ?self.state.target_id,
            resolved = ?target_id,
            auto_zoom,
            zoom,
            ?rect,
            "ptz update"
        );

        CropResult {
            rect,
            zoom,
            target_id,
        }
    }

    /// Apply one joystick event. Released events are ignored.
    pub fn handle_input(&mut self, event: JoystickEvent) {
        if !event.action.is_actionable() {
            return;
        }
        match event.direction {
            Direction::Up => self.step_zoom(self.config.zoom_step),
            Direction::Down => self.step_zoom(-self.config.zoom_step),
            Direction::Middle => self.reset(),
            Direction::Left => self.cycle_target(Cycle::Previous),
            Direction::Right => self.cycle_target(Cycle::Next),
        }
    }

    /// Pin `id` regardless of whether it is currently detected.
    pub fn set_target(&mut self, id: u32) {
        debug!(id, "target pinned");
        self.state.target_id = Some(id);
    }

    /// Return to automatic acquisition.
    pub fn clear_target(&mut self) {
        debug!("target unpinned");
        self.state.target_id = None;
    }

    /// Zoom back to 1.0, leave manual mode and unpin the target.
    pub fn reset(&mut self) {
        debug!("ptz reset");
        self.state.current_zoom = 1.0;
        self.state.manual_zoom_active = false;
        self.state.target_id = None;
    }

    fn resolve_target(&self) -> Option<Detection> {
        let detections = &self.state.last_detections;
        match self.state.target_id {
            None => detections
                .iter()
                .filter(|d| d.id.is_some())
                .min_by_key(|d| d.id)
                .copied(),
            Some(pin) => detections.iter().find(|d| d.id == Some(pin)).copied(),
        }
    }

    fn auto_zoom(&self, bbox: &BoundingBox) -> f64 {
        let wanted_crop_height = bbox.height() / self.config.target_fill;
        let zoom = f64::from(self.config.output.height) / wanted_crop_height;
        zoom.clamp(1.0, self.config.max_zoom)
    }

    fn step_zoom(&mut self, delta: f64) {
        if !self.state.manual_zoom_active {
            self.state.current_zoom = self.state.last_auto_zoom;
            self.state.manual_zoom_active = true;
        }
        self.state.current_zoom = (self.state.current_zoom + delta).clamp(1.0, self.config.max_zoom);
        debug!(zoom = self.state.current_zoom, "manual zoom");
    }

    fn cycle_target(&mut self, direction: Cycle) {
        let mut ids: Vec<u32> = self
            .state
            .last_detections
            .iter()
            .filter_map(|d| d.id)
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let Some(&first) = ids.first() else {
            self.state.target_id = None;
            debug!("no ids to cycle through, target unpinned");
            return;
        };

        let current = self
            .state
            .target_id
            .and_then(|pin| ids.iter().position(|&id| id == pin));
        let next = match current {
            // Nothing pinned, or the pin vanished: restart at the head.
            None => first,
            Some(index) => {
                let index = match direction {
                    Cycle::Next => (index + 1) % ids.len(),
                    Cycle::Previous => index.checked_sub(1).unwrap_or(ids.len() - 1),
                };
                ids.get(index).copied().unwrap_or(first)
            }
        };

        debug!(?direction, from = ?self.state.target_id, to = next, "target cycled");
        self.state.target_id = Some(next);
    }

    fn crop_rect(&self, (center_x, center_y): (f64, f64), zoom: f64) -> CropRect {
        let frame = self.config.frame;
        let frame_w = f64::from(frame.width);
        let frame_h = f64::from(frame.height);
        let output_h = f64::from(self.config.output.height);
        let aspect = self.config.aspect.ratio();

        let mut crop_h = (output_h / zoom).min(output_h).min(frame_h);
        let mut crop_w = crop_h * aspect;
        if crop_w > frame_w {
            crop_w = frame_w;
            crop_h = (frame_w / aspect).min(frame_h);
        }

        let width = (crop_w.floor() as u32).min(frame.width);
        let height = (crop_h.floor() as u32).min(frame.height);
        CropRect {
            x: place(center_x, width, frame.width),
            y: place(center_y, height, frame.height),
            width,
            height,
        }
    }
}

/// Origin of a span of `extent` centred on `center`, shifted to fit in
/// `[0, limit]`.
fn place(center: f64, extent: u32, limit: u32) -> u32 {
    let max_origin = f64::from(limit.saturating_sub(extent));
    let origin = center - f64::from(extent) / 2.0;
    origin.clamp(0.0, max_origin).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Action, JoystickEvent};

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn engine() -> Result<PtzEngine, crate::PtzError> {
        PtzEngine::new(PtzConfig::default())
    }

    fn det(id: u32, x1: f64, y1: f64, x2: f64, y2: f64) -> Detection {
        Detection::with_id(BoundingBox::new(x1, y1, x2, y2), id)
    }

    fn people(ids: &[u32]) -> Vec<Detection> {
        ids.iter()
            .enumerate()
            .map(|(i, &id)| {
                let x = 100.0 + 300.0 * i as f64;
                det(id, x, 300.0, x + 100.0, 700.0)
            })
            .collect()
    }

    fn press(engine: &mut PtzEngine, direction: Direction) {
        engine.handle_input(JoystickEvent::pressed(direction));
    }

    #[test]
    fn test_initial_state() -> TestResult {
        let engine = engine()?;
        assert_eq!(engine.state(), &PtzState::default());
        assert_eq!(engine.pinned_target(), None);
        assert!(!engine.is_manual_zoom());
        Ok(())
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = PtzConfig::default().with_max_zoom(0.0);
        assert!(matches!(PtzEngine::new(config), Err(crate::PtzError::InvalidMaxZoom(_))));
    }

    #[test]
    fn test_no_detections_is_full_height_centered() -> TestResult {
        let mut engine = engine()?;
        let result = engine.update(&[]);
        assert_eq!(result.rect, CropRect::new(656, 0, 607, 1080));
        assert!((result.zoom - 1.0).abs() < f64::EPSILON);
        assert_eq!(result.target_id, None);
        Ok(())
    }

    #[test]
    fn test_auto_acquires_lowest_id() -> TestResult {
        let mut engine = engine()?;
        let result = engine.update(&people(&[5, 2, 9]));
        assert_eq!(result.target_id, Some(2));
        // Acquisition does not pin.
        assert_eq!(engine.pinned_target(), None);
        Ok(())
    }

    #[test]
    fn test_anonymous_detections_are_not_acquired() -> TestResult {
        let mut engine = engine()?;
        let anonymous = Detection::anonymous(BoundingBox::new(0.0, 0.0, 100.0, 100.0));
        let result = engine.update(&[anonymous]);
        assert_eq!(result.target_id, None);
        assert!((result.zoom - 1.0).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn test_auto_zoom_fills_eighty_percent() -> TestResult {
        let mut engine = engine()?;
        // 1080 / (360 * 1.25) = 2.4
        let result = engine.update(&[det(1, 900.0, 360.0, 1000.0, 720.0)]);
        assert!((result.zoom - 2.4).abs() < 1e-9);
        assert_eq!(result.rect.height, 450);
        assert_eq!(result.rect.width, 253);
        Ok(())
    }

    #[test]
    fn test_auto_zoom_clamps_to_max() -> TestResult {
        let mut engine = engine()?;
        // 1080 / (43.2 * 1.25) = 20
        let result = engine.update(&[det(1, 900.0, 500.0, 920.0, 543.2)]);
        assert!((result.zoom - 6.0).abs() < f64::EPSILON);
        assert!((engine.state().last_auto_zoom - 6.0).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn test_auto_zoom_never_below_one() -> TestResult {
        let mut engine = engine()?;
        let result = engine.update(&[det(1, 0.0, 0.0, 1920.0, 1080.0)]);
        assert!((result.zoom - 1.0).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn test_invalid_boxes_are_ignored() -> TestResult {
        let mut engine = engine()?;
        let result = engine.update(&[
            det(1, 50.0, 50.0, 50.0, 80.0),
            det(2, 10.0, 90.0, 20.0, 30.0),
            det(3, f64::NAN, 0.0, 10.0, 10.0),
            det(4, 100.0, 100.0, 200.0, 500.0),
        ]);
        assert_eq!(result.target_id, Some(4));
        assert_eq!(engine.state().last_detections.len(), 1);
        Ok(())
    }

    #[test]
    fn test_pinned_target_absent_keeps_pin() -> TestResult {
        let mut engine = engine()?;
        engine.set_target(42);
        let result = engine.update(&people(&[1, 2]));
        assert_eq!(result.target_id, None);
        assert!((result.zoom - 1.0).abs() < f64::EPSILON);
        assert_eq!(engine.pinned_target(), Some(42));

        let result = engine.update(&people(&[1, 42]));
        assert_eq!(result.target_id, Some(42));
        Ok(())
    }

    #[test]
    fn test_clear_target_returns_to_auto() -> TestResult {
        let mut engine = engine()?;
        engine.set_target(9);
        engine.clear_target();
        assert_eq!(engine.update(&people(&[9, 3])).target_id, Some(3));
        Ok(())
    }

    #[test]
    fn test_crop_centres_on_target_and_stays_inside() -> TestResult {
        let mut engine = engine()?;
        let result = engine.update(&[det(1, 1800.0, 0.0, 1900.0, 540.0)]);
        // 1080 / (540 * 1.25) = 1.6
        assert_eq!(result.rect.height, 675);
        assert_eq!(result.rect.width, 379);
        assert_eq!(result.rect.x, 1920 - 379);
        assert_eq!(result.rect.y, 0);
        assert!(result.rect.fits_within(engine.config().frame));
        Ok(())
    }

    #[test]
    fn test_manual_zoom_seeds_from_auto() -> TestResult {
        let mut engine = engine()?;
        // 1080 / (345.6 * 1.25) = 2.5
        engine.update(&[det(1, 900.0, 300.0, 1000.0, 645.6)]);
        assert!((engine.state().last_auto_zoom - 2.5).abs() < 1e-9);

        press(&mut engine, Direction::Up);
        assert!(engine.is_manual_zoom());
        assert!((engine.state().current_zoom - 2.7).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_manual_zoom_overrides_auto_but_auto_is_cached() -> TestResult {
        let mut engine = engine()?;
        press(&mut engine, Direction::Up);
        press(&mut engine, Direction::Up);
        let result = engine.update(&[det(1, 900.0, 300.0, 1000.0, 645.6)]);
        assert!((result.zoom - 1.4).abs() < 1e-9);
        assert!((engine.state().last_auto_zoom - 2.5).abs() < 1e-9);

        // Already manual: no reseed from the new auto value.
        press(&mut engine, Direction::Down);
        assert!((engine.state().current_zoom - 1.2).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_manual_zoom_clamps() -> TestResult {
        let mut engine = engine()?;
        press(&mut engine, Direction::Down);
        assert!((engine.state().current_zoom - 1.0).abs() < f64::EPSILON);
        for _ in 0..40 {
            engine.handle_input(JoystickEvent::held(Direction::Up));
        }
        assert!((engine.state().current_zoom - 6.0).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn test_released_events_are_ignored() -> TestResult {
        let mut engine = engine()?;
        engine.update(&people(&[1, 2]));
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Middle,
            Direction::Left,
            Direction::Right,
        ] {
            engine.handle_input(JoystickEvent::new(direction, Action::Released));
        }
        assert_eq!(engine.pinned_target(), None);
        assert!(!engine.is_manual_zoom());
        Ok(())
    }

    #[test]
    fn test_middle_resets_everything() -> TestResult {
        let mut engine = engine()?;
        engine.update(&people(&[4, 8]));
        press(&mut engine, Direction::Right);
        press(&mut engine, Direction::Up);
        press(&mut engine, Direction::Middle);

        let state = engine.state();
        assert_eq!(state.target_id, None);
        assert!(!state.manual_zoom_active);
        assert!((state.current_zoom - 1.0).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn test_cycling_wraps_both_ways() -> TestResult {
        let mut engine = engine()?;
        engine.update(&people(&[9, 2, 5]));

        engine.set_target(9);
        press(&mut engine, Direction::Right);
        assert_eq!(engine.pinned_target(), Some(2));

        engine.set_target(9);
        press(&mut engine, Direction::Left);
        assert_eq!(engine.pinned_target(), Some(5));

        engine.set_target(2);
        press(&mut engine, Direction::Left);
        assert_eq!(engine.pinned_target(), Some(9));
        Ok(())
    }

    #[test]
    fn test_cycling_from_unpinned_starts_at_lowest() -> TestResult {
        let mut engine = engine()?;
        engine.update(&people(&[7, 3]));
        press(&mut engine, Direction::Left);
        assert_eq!(engine.pinned_target(), Some(3));
        Ok(())
    }

    #[test]
    fn test_cycling_restarts_when_pin_vanished() -> TestResult {
        let mut engine = engine()?;
        engine.set_target(6);
        engine.update(&people(&[8, 4, 5]));
        press(&mut engine, Direction::Right);
        assert_eq!(engine.pinned_target(), Some(4));
        Ok(())
    }

    #[test]
    fn test_cycling_deduplicates_ids() -> TestResult {
        let mut engine = engine()?;
        engine.update(&people(&[3, 3, 1]));
        engine.set_target(1);
        press(&mut engine, Direction::Right);
        assert_eq!(engine.pinned_target(), Some(3));
        press(&mut engine, Direction::Right);
        assert_eq!(engine.pinned_target(), Some(1));
        Ok(())
    }

    #[test]
    fn test_cycling_without_ids_unpins() -> TestResult {
        let mut engine = engine()?;
        engine.set_target(3);
        engine.update(&[Detection::anonymous(BoundingBox::new(0.0, 0.0, 10.0, 10.0))]);
        press(&mut engine, Direction::Right);
        assert_eq!(engine.pinned_target(), None);

        engine.set_target(3);
        engine.update(&[]);
        press(&mut engine, Direction::Left);
        assert_eq!(engine.pinned_target(), None);
        Ok(())
    }

    #[test]
    fn test_output_size_drives_zoom() -> TestResult {
        let config = PtzConfig::for_frame(FrameSize::new(3840, 2160)).with_output(FrameSize::new(1280, 720));
        let mut engine = PtzEngine::new(config)?;
        // 720 / (360 * 1.25) = 1.6
        let result = engine.update(&[det(1, 1000.0, 1000.0, 1100.0, 1360.0)]);
        assert!((result.zoom - 1.6).abs() < 1e-9);
        assert_eq!(result.rect.height, 450);

        let result = engine.update(&[]);
        assert_eq!(result.rect.height, 720);
        Ok(())
    }

    #[test]
    fn test_wide_aspect_is_limited_by_frame_width() -> TestResult {
        let config = PtzConfig::for_frame(FrameSize::new(400, 1000))
            .with_aspect(crate::AspectRatio::new(16, 9));
        let mut engine = PtzEngine::new(config)?;
        let result = engine.update(&[]);
        assert_eq!(result.rect.width, 400);
        assert_eq!(result.rect.height, 225);
        assert!(result.rect.fits_within(config.frame));
        Ok(())
    }

    #[test]
    fn test_crop_size_preview() -> TestResult {
        let engine = engine()?;
        assert_eq!(engine.crop_size(2.0), FrameSize::new(303, 540));
        assert_eq!(engine.crop_size(100.0), FrameSize::new(101, 180));
        assert_eq!(engine.crop_size(0.1), FrameSize::new(607, 1080));
        assert_eq!(engine.state(), &PtzState::default());
        Ok(())
    }

    #[test]
    fn test_crop_size_needs_valid_config() {
        let config = PtzConfig::default().with_max_zoom(0.5);
        assert!(matches!(
            PtzEngine::new(config),
            Err(crate::PtzError::InvalidMaxZoom(_))
        ));
    }
}
