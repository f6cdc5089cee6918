//! Snapshot of a scripted tracking session.
//!
//! Each line is one cycle's crop as JSON, the same shape `ptzctl ptz replay`
//! prints.

use ptzkit_virtual_ptz::{BoundingBox, Detection, Direction, JoystickEvent, PtzConfig, PtzEngine};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn person(id: u32, x: f64, height: f64) -> Detection {
    Detection::with_id(BoundingBox::new(x, 1000.0 - height, x + height / 3.0, 1000.0), id)
}

#[test]
fn tracking_session() -> TestResult {
    let mut engine = PtzEngine::new(PtzConfig::default())?;
    let crowd = [person(5, 200.0, 540.0), person(2, 1500.0, 360.0), person(9, 900.0, 864.0)];

    let script: [(&[Direction], &[Detection]); 6] = [
        (&[], &crowd),
        (&[Direction::Right], &crowd),
        (&[Direction::Right], &crowd),
        (&[Direction::Up, Direction::Up], &crowd),
        (&[], &crowd[..2]),
        (&[Direction::Middle], &crowd),
    ];

    let mut lines = Vec::new();
    for (events, detections) in script {
        for &direction in events {
            engine.handle_input(JoystickEvent::pressed(direction));
        }
        lines.push(serde_json::to_string(&engine.update(detections))?);
    }

    insta::assert_snapshot!(lines.join("\n"), @r#"
    {"x":1433,"y":595,"width":253,"height":450,"zoom":2.4,"target_id":2}
    {"x":1433,"y":595,"width":253,"height":450,"zoom":2.4,"target_id":2}
    {"x":100,"y":392,"width":379,"height":675,"zoom":1.6,"target_id":5}
    {"x":138,"y":460,"width":303,"height":540,"zoom":2.0,"target_id":5}
    {"x":138,"y":460,"width":303,"height":540,"zoom":2.0,"target_id":5}
    {"x":1433,"y":595,"width":253,"height":450,"zoom":2.4,"target_id":2}
    "#);
    Ok(())
}
