//! End-to-end calibration runs over scripted virtual channels.
//!
//! A steering UI stands in for the user: every confirmation prompt
//! advances a scripted plan that deflects the virtual stick the way a
//! cooperating human would.

use chrono::Local;
use openstick::hal::{VirtualButton, VirtualChannel};
use openstick::{
    classify, normalize, CalibrationError, CalibrationUi, Calibrator, CalibratorSettings,
    Direction, RawSample, Sampler,
};

/// Runs one scripted action per confirmation prompt, in order:
/// 0 = center window, 1 = sweep, 2 = forward probe, 3 = right probe.
struct SteeringUi {
    actions: Vec<Box<dyn FnMut()>>,
    step: usize,
}

impl SteeringUi {
    fn new(actions: Vec<Box<dyn FnMut()>>) -> Self {
        Self { actions, step: 0 }
    }
}

impl CalibrationUi for SteeringUi {
    fn instruct(&mut self, _text: &str) {}

    fn confirm(&mut self, _text: &str) {
        if let Some(action) = self.actions.get_mut(self.step) {
            action();
        }
        self.step += 1;
    }
}

fn fast_settings() -> CalibratorSettings {
    CalibratorSettings {
        center_samples: 2,
        sample_interval_ms: 1,
        sweep_duration_ms: 5,
        probe_samples: 2,
        tie_tolerance_percent: 5.0,
        max_attempts: 3,
    }
}

fn rig(
    level1: u16,
    level2: u16,
) -> (
    Sampler<VirtualChannel, VirtualChannel, VirtualButton>,
    VirtualChannel,
    VirtualChannel,
) {
    let ch1 = VirtualChannel::new(0, level1);
    let ch2 = VirtualChannel::new(1, level2);
    let (h1, h2) = (ch1.clone(), ch2.clone());
    (Sampler::new(ch1, ch2, VirtualButton::new(false), 1), h1, h2)
}

#[tokio::test(start_paused = true)]
async fn straight_mount_keeps_channel_order_and_detects_inversion() {
    let (mut sampler, h1, h2) = rig(32_000, 33_000);
    let sweep1 = h1.clone();
    let sweep2 = h2.clone();
    let fwd = h2.clone();
    let right1 = h1.clone();
    let right2 = h2.clone();

    let mut ui = SteeringUi::new(vec![
        Box::new(|| {}),
        Box::new(move || {
            sweep1.push_many(&[1_000, 64_000]);
            sweep2.push_many(&[2_000, 63_000]);
        }),
        // Forward deflects the second channel upward: no swap needed.
        Box::new(move || fwd.set_level(60_000)),
        // Right pulls the first channel *down*: X is inverted.
        Box::new(move || {
            right2.set_level(33_000);
            right1.set_level(5_000);
        }),
    ]);

    let mut calibrator = Calibrator::new(&mut sampler, Some(fast_settings()));
    let calibration = calibrator.run(&mut ui).await.unwrap();

    assert!(!calibration.swapped);
    assert_eq!(calibration.axis_x.center, 32_000);
    assert_eq!((calibration.axis_x.min, calibration.axis_x.max), (1_000, 64_000));
    assert!(calibration.axis_x.inverted);
    assert_eq!(calibration.axis_y.center, 33_000);
    assert_eq!((calibration.axis_y.min, calibration.axis_y.max), (2_000, 63_000));
    assert!(!calibration.axis_y.inverted);
}

#[tokio::test(start_paused = true)]
async fn rotated_mount_is_detected_and_compensated() {
    // Physically rotated stick: pushing forward moves the *first*
    // channel, pushing right moves the second.
    let (mut sampler, h1, h2) = rig(32_000, 33_000);
    let sweep1 = h1.clone();
    let sweep2 = h2.clone();
    let fwd = h1.clone();
    let right1 = h1.clone();
    let right2 = h2.clone();

    let mut ui = SteeringUi::new(vec![
        Box::new(|| {}),
        Box::new(move || {
            sweep1.push_many(&[1_000, 64_000]);
            sweep2.push_many(&[2_000, 63_000]);
        }),
        Box::new(move || fwd.set_level(60_000)),
        Box::new(move || {
            right1.set_level(32_000);
            right2.set_level(60_000);
        }),
    ]);

    let mut calibrator = Calibrator::new(&mut sampler, Some(fast_settings()));
    let calibration = calibrator.run(&mut ui).await.unwrap();

    assert!(calibration.swapped);
    // X takes the second channel's statistics, Y the first's.
    assert_eq!(calibration.axis_x.center, 33_000);
    assert_eq!(calibration.axis_y.center, 32_000);
    assert!(!calibration.axis_x.inverted);
    assert!(!calibration.axis_y.inverted);

    // A physical forward push (first channel high) now classifies as Up.
    let raw = RawSample {
        x: 60_000,
        y: 33_000,
        button: false,
        timestamp: Local::now(),
    };
    let direction = classify(normalize(&raw, &calibration, 0.03), 0.03);
    assert_eq!(direction, Direction::Up);
}

#[tokio::test(start_paused = true)]
async fn near_equal_probe_deviations_default_to_no_swap() {
    let (mut sampler, h1, h2) = rig(32_000, 33_000);
    let sweep1 = h1.clone();
    let sweep2 = h2.clone();
    let fwd1 = h1.clone();
    let fwd2 = h2.clone();
    let right1 = h1.clone();
    let right2 = h2.clone();

    let mut ui = SteeringUi::new(vec![
        Box::new(|| {}),
        Box::new(move || {
            sweep1.push_many(&[1_000, 64_000]);
            sweep2.push_many(&[2_000, 63_000]);
        }),
        // A diagonal forward push: both channels deflect the same amount.
        Box::new(move || {
            fwd1.set_level(60_000);
            fwd2.set_level(61_000);
        }),
        Box::new(move || {
            right1.set_level(60_000);
            right2.set_level(33_000);
        }),
    ]);

    let mut calibrator = Calibrator::new(&mut sampler, Some(fast_settings()));
    let calibration = calibrator.run(&mut ui).await.unwrap();

    // Ambiguity is downgraded to a warning, never an error.
    assert!(!calibration.swapped);
    assert!(!calibration.axis_y.inverted);
    assert!(!calibration.axis_x.inverted);
}

#[tokio::test(start_paused = true)]
async fn a_stick_that_never_moves_exhausts_the_attempt_limit() {
    let (mut sampler, _h1, _h2) = rig(32_000, 33_000);
    let mut ui = SteeringUi::new(Vec::new());

    let mut calibrator = Calibrator::new(&mut sampler, Some(fast_settings()));
    match calibrator.run(&mut ui).await {
        Err(CalibrationError::Aborted(attempts)) => assert_eq!(attempts, 3),
        other => panic!("expected aborted calibration, got {:?}", other),
    }
}
