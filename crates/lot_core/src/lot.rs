//! The simulation context: a fixed grid of spots plus the transitions the
//! input dispatcher can apply to them.

use std::fmt;

use chrono::{NaiveTime, Timelike};
use rand::Rng;

use crate::spot::ParkingSpot;

pub const ROWS: usize = 2;
pub const COLUMNS: usize = 3;
pub const SPOT_COUNT: usize = ROWS * COLUMNS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpotId {
    pub row: usize,
    pub column: usize,
}

impl SpotId {
    pub fn new(row: usize, column: usize) -> Option<Self> {
        (row < ROWS && column < COLUMNS).then_some(Self { row, column })
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::new(index / COLUMNS, index % COLUMNS)
    }

    pub fn index(self) -> usize {
        self.row * COLUMNS + self.column
    }

    /// All spots in row-major order.
    pub fn all() -> impl Iterator<Item = SpotId> {
        (0..SPOT_COUNT).map(|index| SpotId {
            row: index / COLUMNS,
            column: index % COLUMNS,
        })
    }
}

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row = if self.row == 0 { 'A' } else { 'B' };
        write!(f, "{}{}", row, self.column + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotEventKind {
    Parked,
    Renewed,
    Left,
    InfoToggled,
}

/// An applied transition. Rejected transitions produce no event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpotEvent {
    pub spot: SpotId,
    pub kind: SpotEventKind,
}

/// One-shot audit event emitted the first time an occupancy runs out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryRecord {
    pub spot: SpotId,
    pub at: NaiveTime,
    pub license_plate: String,
}

impl fmt::Display for ExpiryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parking spot {} expired at {}:{}:{} with vehicle: {}",
            self.spot,
            self.at.hour(),
            self.at.minute(),
            self.at.second(),
            self.license_plate
        )
    }
}

#[derive(Debug, Clone)]
pub struct ParkingLot {
    spots: [ParkingSpot; SPOT_COUNT],
}

impl ParkingLot {
    pub fn new() -> Self {
        Self {
            spots: std::array::from_fn(|_| ParkingSpot::vacant()),
        }
    }

    pub fn spot(&self, id: SpotId) -> &ParkingSpot {
        &self.spots[id.index()]
    }

    pub fn spots(&self) -> impl Iterator<Item = (SpotId, &ParkingSpot)> {
        SpotId::all().zip(self.spots.iter())
    }

    pub fn occupied_count(&self) -> usize {
        self.spots.iter().filter(|s| s.occupied).count()
    }

    pub fn blinking_count(&self) -> usize {
        self.spots.iter().filter(|s| s.blinking).count()
    }

    pub fn park(&mut self, id: SpotId, rng: &mut impl Rng) -> Option<SpotEvent> {
        self.spots[id.index()].park(rng).then_some(SpotEvent {
            spot: id,
            kind: SpotEventKind::Parked,
        })
    }

    pub fn renew(&mut self, id: SpotId) -> Option<SpotEvent> {
        self.spots[id.index()].renew().then_some(SpotEvent {
            spot: id,
            kind: SpotEventKind::Renewed,
        })
    }

    pub fn leave(&mut self, id: SpotId) -> Option<SpotEvent> {
        self.spots[id.index()].leave().then_some(SpotEvent {
            spot: id,
            kind: SpotEventKind::Left,
        })
    }

    pub fn leave_expired(&mut self, id: SpotId) -> Option<SpotEvent> {
        self.spots[id.index()].leave_expired().then_some(SpotEvent {
            spot: id,
            kind: SpotEventKind::Left,
        })
    }

    pub fn toggle_info(&mut self, id: SpotId) -> Option<SpotEvent> {
        self.spots[id.index()].toggle_info().then_some(SpotEvent {
            spot: id,
            kind: SpotEventKind::InfoToggled,
        })
    }

    /// Advance every spot by `dt` seconds. `now` is the local wall-clock time
    /// stamped onto any expiry records produced by this tick.
    pub fn tick(&mut self, dt: f32, now: NaiveTime) -> Vec<ExpiryRecord> {
        let mut expired = Vec::new();
        for (index, spot) in self.spots.iter_mut().enumerate() {
            if spot.tick(dt).expired {
                expired.push(ExpiryRecord {
                    spot: SpotId {
                        row: index / COLUMNS,
                        column: index % COLUMNS,
                    },
                    at: now,
                    license_plate: spot.license_plate.clone(),
                });
            }
        }
        expired
    }
}

impl Default for ParkingLot {
    fn default() -> Self {
        Self::new()
    }
}
