//! Nine-state direction classifier.
//!
//! An axis counts as "pushed" when its normalized magnitude reaches the
//! activation threshold. Classification is a pure function of the
//! current position — there is no hysteresis, so a stick held exactly on
//! a threshold boundary may oscillate between neighboring states from
//! read to read. That is accepted; callers needing stability should
//! raise the activation threshold instead.

use crate::calibration::normalize::NormalizedPosition;

/// Discrete stick direction. +y is forward/up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Center,
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

/// Classifies a normalized position. `activation` is a fraction of full
/// deflection and should be at least as large as the deadzone used for
/// normalization.
pub fn classify(pos: NormalizedPosition, activation: f32) -> Direction {
    let x_active = pos.x.abs() >= activation;
    let y_active = pos.y.abs() >= activation;
    match (x_active, y_active) {
        (false, false) => Direction::Center,
        (true, false) => {
            if pos.x > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        }
        (false, true) => {
            if pos.y > 0.0 {
                Direction::Up
            } else {
                Direction::Down
            }
        }
        (true, true) => match (pos.x > 0.0, pos.y > 0.0) {
            (true, true) => Direction::UpRight,
            (true, false) => Direction::DownRight,
            (false, true) => Direction::UpLeft,
            (false, false) => Direction::DownLeft,
        },
    }
}
