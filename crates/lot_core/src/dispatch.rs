//! Maps keyboard chords and pointer clicks onto spot transitions.

use rand::Rng;

use crate::input::{InputState, Modifiers};
use crate::layout::LotLayout;
use crate::lot::{ParkingLot, SpotEvent, SpotId};

/// Which transition a spot-selector chord asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordAction {
    Park,
    Renew,
    Leave,
}

impl ChordAction {
    pub fn from_modifiers(mods: Modifiers) -> Option<Self> {
        match (mods.shift, mods.control) {
            (false, false) => Some(Self::Park),
            (true, false) => Some(Self::Renew),
            (false, true) => Some(Self::Leave),
            (true, true) => None,
        }
    }
}

/// Spot addressed by the currently held row and column keys.
pub fn selected_spot(input: &InputState) -> Option<SpotId> {
    SpotId::new(input.selected_row()?, input.selected_column()?)
}

/// Called on every fresh key press. When a row and a column key are both
/// held, applies the transition picked by the held modifiers.
pub fn dispatch_keys(
    lot: &mut ParkingLot,
    input: &InputState,
    rng: &mut impl Rng,
) -> Option<SpotEvent> {
    let spot = selected_spot(input)?;
    match ChordAction::from_modifiers(input.modifiers())? {
        ChordAction::Park => lot.park(spot, rng),
        ChordAction::Renew => lot.renew(spot),
        ChordAction::Leave => lot.leave(spot),
    }
}

/// Left click at `cursor` (window coordinates, origin top-left). Spots are
/// tested in row-major order and the first one that reacts wins.
pub fn dispatch_click(
    lot: &mut ParkingLot,
    layout: &LotLayout,
    cursor: (f64, f64),
) -> Option<SpotEvent> {
    let point = layout.to_render_space(cursor);
    for id in SpotId::all() {
        let spot = lot.spot(id);
        if spot.blinking && layout.indicator(id).contains(point) {
            return lot.leave_expired(id);
        }
        if spot.occupied && layout.car_rect(id).contains(point) {
            return lot.toggle_info(id);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::is_valid_plate;
    use crate::input::Key;
    use crate::lot::SpotEventKind;
    use crate::spot::ALLOTMENT_SECS;
    use chrono::NaiveTime;
    use glam::Vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn id(row: usize, column: usize) -> SpotId {
        SpotId::new(row, column).expect("spot in grid")
    }

    fn chord(keys: &[Key]) -> InputState {
        let mut input = InputState::new();
        for &key in keys {
            input.key_down(key);
        }
        input
    }

    /// Inverse of `to_render_space`.
    fn cursor_at(layout: &LotLayout, point: Vec2) -> (f64, f64) {
        (point.x as f64, layout.viewport.1 as f64 - point.y as f64)
    }

    fn midnight() -> NaiveTime {
        NaiveTime::from_hms_opt(0, 0, 0).expect("valid time")
    }

    #[test]
    fn modifiers_select_action() {
        assert_eq!(ChordAction::from_modifiers(Modifiers::NONE), Some(ChordAction::Park));
        assert_eq!(ChordAction::from_modifiers(Modifiers::SHIFT), Some(ChordAction::Renew));
        assert_eq!(ChordAction::from_modifiers(Modifiers::CONTROL), Some(ChordAction::Leave));
        let both = Modifiers {
            shift: true,
            control: true,
        };
        assert_eq!(ChordAction::from_modifiers(both), None);
    }

    #[test]
    fn incomplete_chord_does_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut lot = ParkingLot::new();
        assert!(dispatch_keys(&mut lot, &chord(&[Key::A]), &mut rng).is_none());
        assert!(dispatch_keys(&mut lot, &chord(&[Key::Digit2]), &mut rng).is_none());
        assert_eq!(lot.occupied_count(), 0);
    }

    #[test]
    fn park_leave_repark_end_to_end() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut lot = ParkingLot::new();

        let event = dispatch_keys(&mut lot, &chord(&[Key::A, Key::Digit1]), &mut rng)
            .expect("park applies");
        assert_eq!(event.spot, id(0, 0));
        assert_eq!(event.kind, SpotEventKind::Parked);
        assert!(lot.spot(id(0, 0)).occupied);
        assert_eq!(lot.spot(id(0, 0)).remaining_time, ALLOTMENT_SECS);

        let event = dispatch_keys(
            &mut lot,
            &chord(&[Key::A, Key::Digit1, Key::Control]),
            &mut rng,
        )
        .expect("leave applies");
        assert_eq!(event.kind, SpotEventKind::Left);
        let spot = lot.spot(id(0, 0));
        assert!(!spot.occupied);
        assert_eq!(spot.remaining_time, 0.0);
        assert!(spot.license_plate.is_empty());

        dispatch_keys(&mut lot, &chord(&[Key::A, Key::Digit1]), &mut rng).expect("re-park");
        assert!(is_valid_plate(&lot.spot(id(0, 0)).license_plate));
    }

    #[test]
    fn shift_chord_renews() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut lot = ParkingLot::new();
        dispatch_keys(&mut lot, &chord(&[Key::B, Key::Digit3]), &mut rng);
        lot.tick(12.0, midnight());

        let event = dispatch_keys(&mut lot, &chord(&[Key::B, Key::Digit3, Key::Shift]), &mut rng)
            .expect("renew applies");
        assert_eq!(event.spot, id(1, 2));
        assert_eq!(event.kind, SpotEventKind::Renewed);
        assert_eq!(lot.spot(id(1, 2)).remaining_time, ALLOTMENT_SECS);
    }

    #[test]
    fn park_chord_on_occupied_spot_is_noop() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut lot = ParkingLot::new();
        let keys = chord(&[Key::A, Key::Digit2]);
        dispatch_keys(&mut lot, &keys, &mut rng).expect("first park");
        let plate = lot.spot(id(0, 1)).license_plate.clone();
        assert!(dispatch_keys(&mut lot, &keys, &mut rng).is_none());
        assert_eq!(lot.spot(id(0, 1)).license_plate, plate);
    }

    #[test]
    fn click_on_car_toggles_info() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut lot = ParkingLot::new();
        let layout = LotLayout::new(1400, 800);
        lot.park(id(1, 1), &mut rng);

        let cursor = cursor_at(&layout, layout.car_rect(id(1, 1)).center());
        let event = dispatch_click(&mut lot, &layout, cursor).expect("toggle applies");
        assert_eq!(event.kind, SpotEventKind::InfoToggled);
        assert!(lot.spot(id(1, 1)).show_info);

        dispatch_click(&mut lot, &layout, cursor);
        assert!(!lot.spot(id(1, 1)).show_info);
    }

    #[test]
    fn click_on_vacant_car_area_does_nothing() {
        let mut lot = ParkingLot::new();
        let layout = LotLayout::new(1400, 800);
        let cursor = cursor_at(&layout, layout.car_rect(id(0, 0)).center());
        assert!(dispatch_click(&mut lot, &layout, cursor).is_none());
    }

    #[test]
    fn indicator_click_only_releases_blinking_spot() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut lot = ParkingLot::new();
        let layout = LotLayout::new(1400, 800);
        lot.park(id(0, 2), &mut rng);
        let cursor = cursor_at(&layout, layout.indicator(id(0, 2)).center);

        assert!(dispatch_click(&mut lot, &layout, cursor).is_none());
        assert!(lot.spot(id(0, 2)).occupied);

        lot.tick(ALLOTMENT_SECS, midnight());
        let event = dispatch_click(&mut lot, &layout, cursor).expect("indicator leave");
        assert_eq!(event.kind, SpotEventKind::Left);
        assert!(!lot.spot(id(0, 2)).occupied);
        assert!(!lot.spot(id(0, 2)).blinking);
    }

    #[test]
    fn click_outside_indicator_radius_misses() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut lot = ParkingLot::new();
        let layout = LotLayout::new(1400, 800);
        lot.park(id(0, 0), &mut rng);
        lot.tick(ALLOTMENT_SECS, midnight());

        let circle = layout.indicator(id(0, 0));
        let outside = circle.center - Vec2::new(circle.radius + 1.0, 0.0);
        assert!(dispatch_click(&mut lot, &layout, cursor_at(&layout, outside)).is_none());
        assert!(lot.spot(id(0, 0)).blinking);
    }

    #[test]
    fn one_transition_per_click() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut lot = ParkingLot::new();
        let layout = LotLayout::new(1400, 800);
        for spot in SpotId::all() {
            lot.park(spot, &mut rng);
        }
        let cursor = cursor_at(&layout, layout.car_rect(id(0, 1)).center());
        dispatch_click(&mut lot, &layout, cursor);
        let shown: Vec<_> = lot.spots().filter(|(_, s)| s.show_info).map(|(i, _)| i).collect();
        assert_eq!(shown, vec![id(0, 1)]);
    }
}
