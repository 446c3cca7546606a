//! Frame composition: turns the lot, the banner and the layout into canvas
//! calls. Pure with respect to its inputs; calling it twice on the same
//! state issues the same calls.

use crate::banner::{BannerText, TitleBanner};
use crate::canvas::{Canvas, ImageQuad, LotTextures};
use crate::layout::{LotLayout, INDICATOR_INNER_RADIUS, INDICATOR_RADIUS};
use crate::lot::{ParkingLot, SpotId};
use crate::spot::ParkingSpot;

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const SHADE: [f32; 4] = [0.0, 0.0, 0.0, 0.4];
const SMALL_TEXT: f32 = 0.5;
const INFO_CAR_ALPHA: f32 = 0.6;
const INFO_BOX_HEIGHT: f32 = 52.0;
const INFO_PADDING: f32 = 5.0;
const LABEL_DROP: f32 = 23.0;
const BANNER_BOX_HEIGHT: f32 = 48.0;
const BANNER_BOX_TOP: f32 = 65.0;
const BANNER_BASELINE_TOP: f32 = 58.0;
const CREDIT_BASELINE_TOP: f32 = 25.0;

/// Everything a frame is drawn from, borrowed for the duration of the call.
pub struct LotScene<'a> {
    pub lot: &'a ParkingLot,
    pub banner: &'a TitleBanner,
    pub layout: &'a LotLayout,
    pub textures: LotTextures,
    pub credit: &'a str,
}

pub fn draw_frame(canvas: &mut impl Canvas, scene: &LotScene<'_>) {
    let layout = scene.layout;
    canvas.render_image(
        scene.textures.background,
        ImageQuad::plain(0.0, 0.0, layout.width(), layout.height()),
    );

    for (id, spot) in scene.lot.spots() {
        draw_spot(canvas, layout, &scene.textures, id, spot);
    }

    draw_banner(canvas, layout, scene.banner);
    draw_credit(canvas, layout, scene.credit);
}

fn draw_spot(
    canvas: &mut impl Canvas,
    layout: &LotLayout,
    textures: &LotTextures,
    id: SpotId,
    spot: &ParkingSpot,
) {
    let bay = layout.spot_rect(id);
    let rotation_deg = LotLayout::spot_rotation_deg(id);
    canvas.render_image(
        textures.spot,
        ImageQuad {
            rotation_deg,
            ..ImageQuad::plain(bay.x, bay.y, bay.width, bay.height)
        },
    );

    if spot.occupied {
        let car = layout.car_rect(id);
        let [r, g, b, _] = spot.car_color;
        let alpha = if spot.show_info { INFO_CAR_ALPHA } else { 1.0 };
        canvas.render_image(
            textures.car,
            ImageQuad {
                x: car.x,
                y: car.y,
                width: car.width,
                height: car.height,
                rotation_deg,
                alpha,
                blend_color: [r, g, b],
            },
        );

        if spot.show_info {
            let plate_width = canvas.measure_text_width(&spot.license_plate, SMALL_TEXT);
            let name_width = canvas.measure_text_width(&spot.driver_name, SMALL_TEXT);
            let box_width = plate_width.max(name_width) + 2.0 * INFO_PADDING;
            let box_x = car.x + car.width / 2.0 - box_width / 2.0;
            canvas.draw_rectangle(box_x, bay.y + 30.0, box_width, INFO_BOX_HEIGHT, SHADE);
            canvas.draw_text(
                &spot.license_plate,
                box_x + INFO_PADDING,
                bay.y + 35.0,
                SMALL_TEXT,
                WHITE,
            );
            canvas.draw_text(
                &spot.driver_name,
                box_x + INFO_PADDING,
                bay.y + 60.0,
                SMALL_TEXT,
                WHITE,
            );
        }
    }

    let indicator = layout.indicator(id);
    let (cx, cy) = (indicator.center.x, indicator.center.y);
    canvas.draw_circle(cx, cy, INDICATOR_RADIUS, [1.0, 1.0, 1.0]);
    if spot.blinking {
        canvas.draw_circle(cx, cy, INDICATOR_INNER_RADIUS, spot.blink_color);
    } else {
        canvas.draw_parking_spot_timer(cx, cy, INDICATOR_INNER_RADIUS, spot.elapsed_fraction);
    }

    let label = id.to_string();
    let label_width = canvas.measure_text_width(&label, SMALL_TEXT);
    canvas.draw_text(
        &label,
        bay.x + bay.width - label_width,
        bay.y - LABEL_DROP,
        SMALL_TEXT,
        WHITE,
    );
}

fn draw_banner(canvas: &mut impl Canvas, layout: &LotLayout, banner: &TitleBanner) {
    // The box is always sized to the wider text.
    let title_width = canvas.measure_text_width(BannerText::Primary.label(), 1.0);
    let left = layout.width() / 2.0 - title_width / 2.0;
    canvas.draw_rectangle(
        left - INFO_PADDING,
        layout.height() - BANNER_BOX_TOP,
        title_width + 2.0 * INFO_PADDING,
        BANNER_BOX_HEIGHT,
        SHADE,
    );

    let text = banner.current_text.label();
    let offset = match banner.current_text {
        BannerText::Primary => 0.0,
        BannerText::Secondary => (title_width - canvas.measure_text_width(text, 1.0)) / 2.0,
    };
    canvas.draw_text(
        text,
        left + offset,
        layout.height() - BANNER_BASELINE_TOP,
        1.0,
        banner.displayed_color(),
    );
}

fn draw_credit(canvas: &mut impl Canvas, layout: &LotLayout, credit: &str) {
    if credit.is_empty() {
        return;
    }
    let width = canvas.measure_text_width(credit, SMALL_TEXT);
    canvas.draw_text(
        credit,
        layout.width() - width - INFO_PADDING,
        layout.height() - CREDIT_BASELINE_TOP,
        SMALL_TEXT,
        WHITE,
    );
}
