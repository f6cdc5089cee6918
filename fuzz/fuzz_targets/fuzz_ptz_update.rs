//! Fuzzes the virtual PTZ engine with arbitrary detections and input.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_ptz_update
#![no_main]
use libfuzzer_sys::fuzz_target;
use ptzkit_virtual_ptz::{
    Action, BoundingBox, Detection, Direction, JoystickEvent, PtzConfig, PtzEngine,
};

const DIRECTIONS: [Direction; 5] = [
    Direction::Up,
    Direction::Down,
    Direction::Middle,
    Direction::Left,
    Direction::Right,
];
const ACTIONS: [Action; 3] = [Action::Pressed, Action::Held, Action::Released];

fn coord(chunk: &[u8]) -> f64 {
    let raw = chunk.iter().fold(0u16, |acc, &b| (acc << 8) | u16::from(b));
    f64::from(raw) - 4096.0
}

fuzz_target!(|data: &[u8]| {
    let Ok(mut engine) = PtzEngine::new(PtzConfig::default()) else {
        return;
    };
    let frame = engine.config().frame;

    // Each 10-byte record is either a joystick event or one detection frame.
    for record in data.chunks_exact(10) {
        if record[0] & 1 == 0 {
            let direction = DIRECTIONS[usize::from(record[1]) % DIRECTIONS.len()];
            let action = ACTIONS[usize::from(record[2]) % ACTIONS.len()];
            engine.handle_input(JoystickEvent::new(direction, action));
            continue;
        }

        let bbox = BoundingBox::new(
            coord(&record[2..4]),
            coord(&record[4..6]),
            coord(&record[6..8]),
            coord(&record[8..10]),
        );
        let detection = match record[1] % 4 {
            0 => Detection::anonymous(bbox),
            id => Detection::with_id(bbox, u32::from(id)),
        };
        let crop = engine.update(&[detection]);

        // Must never panic, and the crop always stays inside the frame.
        assert!(crop.rect.fits_within(frame));
        assert!(crop.zoom >= 1.0);
    }
});
