#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Held-key bookkeeping that turns movement keys into a steering vector.

use edge_runner_core::Command;
use glam::DVec2;

/// Movement keys understood by the runner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKey {
    /// Steers toward positive y.
    Up,
    /// Steers toward negative y.
    Down,
    /// Steers toward negative x.
    Left,
    /// Steers toward positive x.
    Right,
}

impl MoveKey {
    const fn slot(self) -> usize {
        match self {
            MoveKey::Up => 0,
            MoveKey::Down => 1,
            MoveKey::Left => 2,
            MoveKey::Right => 3,
        }
    }
}

/// Pure system tracking which movement keys are currently held.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SteeringInput {
    held: [bool; 4],
}

impl SteeringInput {
    /// Creates an input tracker with no keys held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the polled state of a single key.
    pub fn set_held(&mut self, key: MoveKey, held: bool) {
        self.held[key.slot()] = held;
    }

    /// Reports whether the key is currently held.
    #[must_use]
    pub fn is_held(&self, key: MoveKey) -> bool {
        self.held[key.slot()]
    }

    /// Steering vector `(right - left, up - down)` for the held keys.
    #[must_use]
    pub fn direction(&self) -> DVec2 {
        let axis = |positive: MoveKey, negative: MoveKey| {
            f64::from(u8::from(self.is_held(positive))) - f64::from(u8::from(self.is_held(negative)))
        };
        DVec2::new(
            axis(MoveKey::Right, MoveKey::Left),
            axis(MoveKey::Up, MoveKey::Down),
        )
    }

    /// Emits the steering command reflecting the held keys.
    pub fn handle(&self, out: &mut Vec<Command>) {
        out.push(Command::SteerRunner {
            direction: self.direction(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_input_has_no_direction() {
        assert_eq!(SteeringInput::new().direction(), DVec2::ZERO);
    }

    #[test]
    fn held_keys_sum_into_a_direction() {
        let mut input = SteeringInput::new();
        input.set_held(MoveKey::Right, true);
        input.set_held(MoveKey::Up, true);

        assert_eq!(input.direction(), DVec2::new(1.0, 1.0));

        input.set_held(MoveKey::Up, false);
        input.set_held(MoveKey::Down, true);

        assert_eq!(input.direction(), DVec2::new(1.0, -1.0));
    }

    #[test]
    fn opposing_keys_cancel_out() {
        let mut input = SteeringInput::new();
        let keys = [MoveKey::Up, MoveKey::Down, MoveKey::Left, MoveKey::Right];
        for key in keys {
            input.set_held(key, true);
        }

        assert_eq!(input.direction(), DVec2::ZERO);
        assert!(keys.iter().all(|&key| input.is_held(key)));
    }

    #[test]
    fn repeated_polls_are_idempotent() {
        let mut input = SteeringInput::new();
        input.set_held(MoveKey::Left, true);
        input.set_held(MoveKey::Left, true);
        input.set_held(MoveKey::Left, false);

        assert!(!input.is_held(MoveKey::Left));
        assert_eq!(input.direction(), DVec2::ZERO);
    }

    #[test]
    fn handle_emits_a_steering_command() {
        let mut input = SteeringInput::new();
        input.set_held(MoveKey::Left, true);
        let mut commands = Vec::new();

        input.handle(&mut commands);

        assert_eq!(
            commands,
            vec![Command::SteerRunner {
                direction: DVec2::new(-1.0, 0.0),
            }]
        );
    }
}
