//! Per-spot timed state machine.
//!
//! A spot is either vacant or occupied. While occupied its countdown runs
//! down from [`ALLOTMENT_SECS`]; once it reaches zero the spot starts
//! blinking and stays that way until the car leaves (or a renewal pushes the
//! countdown back above zero, which the next tick picks up).
//!
//! Expiry detection compares against the stored `blinking` flag instead of
//! re-deriving it from time, so a single `tick` is idempotent under any
//! frame delta and emits the audit event at most once per expiry.

use rand::Rng;

use crate::identity;

/// Occupancy budget granted by every park and renew.
pub const ALLOTMENT_SECS: f32 = 20.0;

/// Half period of the expired-indicator flash.
pub const BLINK_PERIOD_SECS: f32 = 0.5;

const BLINK_COLOR_START: [f32; 3] = [1.0, 0.0, 1.0];

#[derive(Debug, Clone, PartialEq)]
pub struct ParkingSpot {
    pub occupied: bool,
    pub blinking: bool,
    pub blink_color: [f32; 3],
    pub blink_timer: f32,
    pub remaining_time: f32,
    pub elapsed_fraction: f32,
    pub car_color: [f32; 4],
    pub driver_name: String,
    pub license_plate: String,
    pub show_info: bool,
}

/// What a single tick observed. `expired` is true only on the tick that
/// first drove the countdown to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub expired: bool,
}

impl ParkingSpot {
    pub fn vacant() -> Self {
        Self {
            occupied: false,
            blinking: false,
            blink_color: BLINK_COLOR_START,
            blink_timer: 0.0,
            remaining_time: 0.0,
            elapsed_fraction: 0.0,
            car_color: [1.0, 1.0, 1.0, 1.0],
            driver_name: String::new(),
            license_plate: String::new(),
            show_info: false,
        }
    }

    pub fn is_vacant(&self) -> bool {
        !self.occupied
    }

    /// Park a new car. Returns false (and changes nothing) if the spot is
    /// already taken.
    pub fn park(&mut self, rng: &mut impl Rng) -> bool {
        if self.occupied {
            return false;
        }
        self.occupied = true;
        self.remaining_time = ALLOTMENT_SECS;
        self.blinking = false;
        self.elapsed_fraction = 0.0;
        self.license_plate = identity::license_plate(rng);
        self.driver_name = identity::driver_name(rng);
        self.car_color = identity::car_color(rng);
        true
    }

    /// Reset the countdown. The blinking flag is left for the next tick.
    pub fn renew(&mut self) -> bool {
        if !self.occupied {
            return false;
        }
        self.remaining_time = ALLOTMENT_SECS;
        self.elapsed_fraction = 0.0;
        true
    }

    pub fn leave(&mut self) -> bool {
        if !self.occupied {
            return false;
        }
        *self = Self::vacant();
        true
    }

    /// Leave triggered by clicking the flashing indicator; only legal while
    /// the spot is blinking.
    pub fn leave_expired(&mut self) -> bool {
        if !self.blinking {
            return false;
        }
        self.leave()
    }

    pub fn toggle_info(&mut self) -> bool {
        if !self.occupied {
            return false;
        }
        self.show_info = !self.show_info;
        true
    }

    pub fn tick(&mut self, dt: f32) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if self.occupied {
            self.remaining_time -= dt;
            if self.remaining_time <= 0.0 {
                self.remaining_time = 0.0;
                outcome.expired = !self.blinking;
            }
            self.blinking = self.remaining_time <= 0.0;
            self.elapsed_fraction = (1.0 - self.remaining_time / ALLOTMENT_SECS).clamp(0.0, 1.0);
        } else {
            self.elapsed_fraction = 0.0;
            self.blinking = false;
        }

        if self.blinking {
            self.blink_timer += dt;
            if self.blink_timer >= BLINK_PERIOD_SECS {
                self.blink_color[2] = if self.blink_color[2] == 1.0 { 0.0 } else { 1.0 };
                // Overshoot is dropped, not carried into the next period.
                self.blink_timer = 0.0;
            }
        }

        outcome
    }
}

impl Default for ParkingSpot {
    fn default() -> Self {
        Self::vacant()
    }
}
