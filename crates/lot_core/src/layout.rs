//! Grid geometry shared by drawing and hit testing.
//!
//! Everything is in rendering coordinates: pixels, origin bottom-left. The
//! layout is rebuilt whenever the viewport changes size; cell dimensions
//! follow the viewport width.

use glam::Vec2;

use crate::lot::{SpotId, COLUMNS, ROWS};

pub const SPOT_MARGIN: f32 = 60.0;
pub const COLUMN_GAP: f32 = 100.0;
pub const INDICATOR_RADIUS: f32 = 37.0;
pub const INDICATOR_INNER_RADIUS: f32 = 35.0;
const CELL_WIDTH_DIVISOR: f32 = 5.5;
const CELL_ASPECT: f32 = 1.4;
const CAR_INSET: f32 = 20.0;
const INDICATOR_DROP: f32 = 35.0;
const INDICATOR_NUDGE: f32 = 10.0;
const SHORT_VIEWPORT_HEIGHT: u32 = 750;
const SHORT_VIEWPORT_BASE: i32 = 745;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LotLayout {
    pub viewport: (u32, u32),
    pub cell_width: f32,
    pub cell_height: f32,
    pub h_offset: f32,
    pub v_offset: f32,
    short_viewport_shift: f32,
}

impl LotLayout {
    pub fn new(width: u32, height: u32) -> Self {
        let cell_width = width as f32 / CELL_WIDTH_DIVISOR;
        let cell_height = cell_width * CELL_ASPECT;
        let total_width = COLUMNS as f32 * (cell_width + COLUMN_GAP) - COLUMN_GAP;
        let total_height = ROWS as f32 * cell_height;
        // Integer halving matches the pixel snapping of the drawn grid.
        let short_viewport_shift = if height < SHORT_VIEWPORT_HEIGHT {
            ((SHORT_VIEWPORT_BASE - height as i32) / 2) as f32
        } else {
            0.0
        };

        Self {
            viewport: (width, height),
            cell_width,
            cell_height,
            h_offset: (width as f32 - total_width) / 2.0,
            v_offset: (height as f32 - total_height) / 2.0,
            short_viewport_shift,
        }
    }

    pub fn width(&self) -> f32 {
        self.viewport.0 as f32
    }

    pub fn height(&self) -> f32 {
        self.viewport.1 as f32
    }

    /// Bottom-left corner of the spot's parking-bay image.
    pub fn spot_origin(&self, id: SpotId) -> Vec2 {
        let x = id.column as f32 * (self.cell_width + COLUMN_GAP) + self.h_offset + SPOT_MARGIN / 2.0;
        let y = (ROWS - 1 - id.row) as f32 * self.cell_height + self.v_offset
            - self.short_viewport_shift;
        Vec2::new(x, y)
    }

    pub fn spot_rect(&self, id: SpotId) -> Rect {
        let origin = self.spot_origin(id);
        Rect {
            x: origin.x,
            y: origin.y,
            width: self.cell_width - SPOT_MARGIN,
            height: self.cell_height - SPOT_MARGIN,
        }
    }

    pub fn car_rect(&self, id: SpotId) -> Rect {
        let bay = self.spot_rect(id);
        Rect {
            x: bay.x + CAR_INSET,
            y: bay.y + CAR_INSET,
            width: bay.width - 2.0 * CAR_INSET,
            height: bay.height - 2.0 * CAR_INSET,
        }
    }

    pub fn indicator(&self, id: SpotId) -> Circle {
        let origin = self.spot_origin(id);
        Circle {
            center: Vec2::new(
                origin.x - SPOT_MARGIN + INDICATOR_NUDGE,
                origin.y + self.cell_height / 2.0 - INDICATOR_DROP,
            ),
            radius: INDICATOR_RADIUS,
        }
    }

    /// The bottom row faces the other way.
    pub fn spot_rotation_deg(id: SpotId) -> f32 {
        if id.row == 1 {
            180.0
        } else {
            0.0
        }
    }

    /// Window cursor position (origin top-left) to rendering coordinates.
    pub fn to_render_space(&self, cursor: (f64, f64)) -> Vec2 {
        Vec2::new(cursor.0 as f32, (self.viewport.1 as f64 - cursor.1) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(row: usize, column: usize) -> SpotId {
        SpotId::new(row, column).expect("spot in grid")
    }

    #[test]
    fn cells_follow_viewport_width() {
        let layout = LotLayout::new(1100, 800);
        assert!((layout.cell_width - 200.0).abs() < 1e-4);
        assert!((layout.cell_height - 280.0).abs() < 1e-4);

        let wider = LotLayout::new(2200, 800);
        assert!((wider.cell_width - 400.0).abs() < 1e-4);
    }

    #[test]
    fn grid_is_horizontally_centered() {
        let layout = LotLayout::new(1100, 800);
        let first = layout.spot_origin(id(0, 0));
        let last = layout.spot_rect(id(0, COLUMNS - 1));
        let left_space = first.x - SPOT_MARGIN / 2.0;
        let right_space = layout.width() - (last.x - SPOT_MARGIN / 2.0 + layout.cell_width);
        assert!((left_space - right_space).abs() < 1e-3);
    }

    #[test]
    fn top_row_sits_above_bottom_row() {
        let layout = LotLayout::new(1400, 800);
        let top = layout.spot_origin(id(0, 1));
        let bottom = layout.spot_origin(id(1, 1));
        assert!((top.y - bottom.y - layout.cell_height).abs() < 1e-3);
        assert_eq!(top.x, bottom.x);
    }

    #[test]
    fn short_viewport_shifts_rows_down() {
        let layout = LotLayout::new(1100, 700);
        let expected = layout.cell_height + layout.v_offset - 22.0;
        assert!((layout.spot_origin(id(0, 0)).y - expected).abs() < 1e-3);

        let tall = LotLayout::new(1100, 750);
        let expected = tall.cell_height + tall.v_offset;
        assert!((tall.spot_origin(id(0, 0)).y - expected).abs() < 1e-3);
    }

    #[test]
    fn indicator_hit_test_boundaries() {
        let layout = LotLayout::new(1400, 800);
        let circle = layout.indicator(id(1, 2));
        assert_eq!(circle.radius, INDICATOR_RADIUS);
        assert!(circle.contains(circle.center));
        let r = circle.radius;
        for offset in [
            Vec2::new(r + 1.0, 0.0),
            Vec2::new(-(r + 1.0), 0.0),
            Vec2::new(0.0, r + 1.0),
            Vec2::new(0.0, -(r + 1.0)),
        ] {
            assert!(!circle.contains(circle.center + offset));
        }
        assert!(circle.contains(circle.center + Vec2::new(r, 0.0)));
    }

    #[test]
    fn indicator_sits_left_of_spot() {
        let layout = LotLayout::new(1400, 800);
        let origin = layout.spot_origin(id(0, 0));
        let circle = layout.indicator(id(0, 0));
        assert!((circle.center.x - (origin.x - 50.0)).abs() < 1e-4);
        assert!((circle.center.y - (origin.y + layout.cell_height / 2.0 - 35.0)).abs() < 1e-4);
    }

    #[test]
    fn car_rect_is_inset_inside_bay() {
        let layout = LotLayout::new(1400, 800);
        let bay = layout.spot_rect(id(0, 0));
        let car = layout.car_rect(id(0, 0));
        assert_eq!(car.x, bay.x + 20.0);
        assert_eq!(car.y, bay.y + 20.0);
        assert!((car.width - (bay.width - 40.0)).abs() < 1e-4);
        assert!(bay.contains(car.center()));
    }

    #[test]
    fn cursor_y_axis_is_flipped() {
        let layout = LotLayout::new(1400, 800);
        let p = layout.to_render_space((10.0, 0.0));
        assert_eq!(p, Vec2::new(10.0, 800.0));
        let p = layout.to_render_space((10.0, 800.0));
        assert_eq!(p, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn bottom_row_is_rotated() {
        assert_eq!(LotLayout::spot_rotation_deg(id(0, 2)), 0.0);
        assert_eq!(LotLayout::spot_rotation_deg(id(1, 0)), 180.0);
    }
}
