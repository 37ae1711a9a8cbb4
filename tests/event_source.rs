//! Event source behavior over the virtual hardware backend.

use std::time::Duration;

use openstick::hal::{VirtualButton, VirtualChannel};
use openstick::{Direction, DeviceCalibration, HardwareError, Joystick, JoystickSettings};

const CENTER: u16 = 32_767;

fn settings() -> JoystickSettings {
    JoystickSettings {
        samples: 1,
        ..JoystickSettings::default()
    }
}

fn rig() -> (
    Joystick<VirtualChannel, VirtualChannel, VirtualButton>,
    VirtualChannel,
    VirtualChannel,
    VirtualButton,
) {
    let ch_x = VirtualChannel::new(0, CENTER);
    let ch_y = VirtualChannel::new(1, CENTER);
    let button = VirtualButton::new(false);
    let (hx, hy, hb) = (ch_x.clone(), ch_y.clone(), button.clone());
    let joystick = Joystick::new(
        ch_x,
        ch_y,
        button,
        DeviceCalibration::identity(),
        Some(settings()),
    );
    (joystick, hx, hy, hb)
}

#[test]
fn get_reports_direction_changes_once() {
    let (mut joystick, hx, hy, _hb) = rig();

    // Centered and unpressed from the start: nothing to report.
    assert!(joystick.get().unwrap().is_none());
    assert!(joystick.get().unwrap().is_none());

    // ~0.6 deflection on both axes with 3% deadzone/activation.
    hx.set_level(52_000);
    hy.set_level(52_000);
    let event = joystick.get().unwrap().expect("direction change");
    assert_eq!(event.direction, Direction::UpRight);
    assert!(!event.button.pressed);

    // Steady signal, no duplicate spam.
    assert!(joystick.get().unwrap().is_none());

    // Returning to rest is a change too.
    hx.set_level(CENTER);
    hy.set_level(CENTER);
    let event = joystick.get().unwrap().expect("back to center");
    assert_eq!(event.direction, Direction::Center);
}

#[test]
fn get_reports_button_press_edges_only() {
    let (mut joystick, _hx, _hy, hb) = rig();
    assert!(joystick.get().unwrap().is_none());

    hb.set_pressed(true);
    let event = joystick.get().unwrap().expect("press edge");
    assert_eq!(event.direction, Direction::Center);
    assert!(event.button.pressed);
    assert!(event.button.changed);

    // Held: no repeat while nothing else changes.
    assert!(joystick.get().unwrap().is_none());

    // Release edge alone does not produce an event.
    hb.set_pressed(false);
    assert!(joystick.get().unwrap().is_none());

    // The next press is a fresh edge.
    hb.set_pressed(true);
    assert!(joystick.get().unwrap().is_some());
}

#[test]
fn get_propagates_hardware_failures() {
    let (mut joystick, hx, _hy, _hb) = rig();
    hx.fail();
    assert!(matches!(
        joystick.get(),
        Err(HardwareError::ChannelRead { channel: 0, .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn wait_times_out_on_a_static_input() {
    let (mut joystick, _hx, _hy, _hb) = rig();
    let started = tokio::time::Instant::now();
    let result = joystick.wait(Some(Duration::from_millis(100))).await.unwrap();
    let elapsed = started.elapsed();
    assert!(result.is_none());
    assert!(
        elapsed >= Duration::from_millis(100) && elapsed < Duration::from_millis(150),
        "timed out after {:?}",
        elapsed
    );
}

#[tokio::test(start_paused = true)]
async fn wait_returns_as_soon_as_the_direction_changes() {
    let (mut joystick, hx, _hy, _hb) = rig();
    // A few centered polls before the stick moves.
    hx.push_many(&[CENTER; 5]);
    hx.set_level(60_000);

    let event = joystick
        .wait(Some(Duration::from_secs(5)))
        .await
        .unwrap()
        .expect("event before timeout");
    assert_eq!(event.direction, Direction::Right);
}

#[tokio::test(start_paused = true)]
async fn wait_button_release_suspends_until_released() {
    let (mut joystick, _hx, _hy, hb) = rig();
    hb.set_pressed(true);
    hb.push(true);
    hb.push(true);

    let started = tokio::time::Instant::now();
    hb.set_pressed(false);
    joystick.wait_button_release().await.unwrap();
    // Two held polls before the release was visible.
    assert!(started.elapsed() >= Duration::from_millis(20));
}
