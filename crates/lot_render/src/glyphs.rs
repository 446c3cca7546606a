//! Glyph metrics and the single-channel glyph atlas.
//!
//! Codes 0..128 are rasterized once at startup with rusttype and
//! shelf-packed into one `R8Unorm` bitmap. After that the table is read-only:
//! text measurement and layout are pure lookups.

use std::path::Path;

use rusttype::{point, Font, Scale};

pub const GLYPH_COUNT: usize = 128;
pub const ATLAS_WIDTH: u32 = 1024;
const PADDING: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphRecord {
    /// Bitmap width and height in pixels.
    pub size: [u32; 2],
    /// Pen-to-left-edge and baseline-to-top offsets, y up.
    pub bearing: [i32; 2],
    pub advance: f32,
    /// `u0, v0, u1, v1` inside the atlas.
    pub uv: [f32; 4],
}

impl GlyphRecord {
    pub fn is_empty(&self) -> bool {
        self.size[0] == 0 || self.size[1] == 0
    }
}

/// A positioned glyph ready to be emitted as a textured quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphQuad {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub uv: [f32; 4],
}

#[derive(Debug, Clone)]
pub struct GlyphTable {
    pub pixel_size: f32,
    records: Vec<Option<GlyphRecord>>,
}

impl GlyphTable {
    pub fn from_records(
        pixel_size: f32,
        records: impl IntoIterator<Item = (char, GlyphRecord)>,
    ) -> Self {
        let mut table = Self {
            pixel_size,
            records: vec![None; GLYPH_COUNT],
        };
        for (ch, record) in records {
            if let Some(slot) = table.records.get_mut(ch as usize) {
                *slot = Some(record);
            }
        }
        table
    }

    /// `None` for characters outside the loaded alphabet.
    pub fn get(&self, ch: char) -> Option<&GlyphRecord> {
        self.records.get(ch as usize).and_then(Option::as_ref)
    }

    pub fn loaded_count(&self) -> usize {
        self.records.iter().flatten().count()
    }

    pub fn measure(&self, text: &str, scale: f32) -> f32 {
        text.chars()
            .filter_map(|ch| self.get(ch))
            .map(|glyph| glyph.advance * scale)
            .sum()
    }

    /// Quads for `text` with its baseline at `y`. Empty glyphs advance the
    /// pen without a quad; unknown characters do neither.
    pub fn layout(&self, text: &str, x: f32, y: f32, scale: f32) -> Vec<GlyphQuad> {
        let mut pen = x;
        let mut quads = Vec::with_capacity(text.len());
        for glyph in text.chars().filter_map(|ch| self.get(ch)) {
            if !glyph.is_empty() {
                let [w, h] = glyph.size;
                quads.push(GlyphQuad {
                    x: pen + glyph.bearing[0] as f32 * scale,
                    y: y - (h as f32 - glyph.bearing[1] as f32) * scale,
                    width: w as f32 * scale,
                    height: h as f32 * scale,
                    uv: glyph.uv,
                });
            }
            pen += glyph.advance * scale;
        }
        quads
    }
}

/// Alpha-only atlas bitmap, row-major, one byte per pixel.
#[derive(Debug, Clone)]
pub struct GlyphAtlas {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Shelf packing: left to right with `PADDING` after each bitmap, starting a
/// new row when the next one would cross `width`. Returns each bitmap's
/// top-left corner and the total height used.
pub fn pack_shelves(sizes: &[[u32; 2]], width: u32) -> Result<(Vec<[u32; 2]>, u32), String> {
    let mut x = 0u32;
    let mut y = 0u32;
    let mut row_height = 0u32;
    let mut placements = Vec::with_capacity(sizes.len());

    for (index, &[w, h]) in sizes.iter().enumerate() {
        if w + PADDING * 2 > width {
            return Err(format!(
                "Glyph {} ({}x{}) does not fit in atlas width {}",
                index, w, h, width
            ));
        }
        if x + w + PADDING > width {
            x = 0;
            y += row_height;
            row_height = 0;
        }
        placements.push([x, y]);
        x += w + PADDING;
        row_height = row_height.max(h + PADDING);
    }

    Ok((placements, (y + row_height).max(1)))
}

struct RasterGlyph {
    code: u8,
    size: [u32; 2],
    bearing: [i32; 2],
    advance: f32,
    bitmap: Vec<u8>,
}

pub fn load_font(path: &Path, pixel_size: f32) -> Result<(GlyphTable, GlyphAtlas), String> {
    let bytes = std::fs::read(path)
        .map_err(|e| format!("Failed to read font '{}': {e}", path.display()))?;
    let (table, atlas) = rasterize_font(bytes, pixel_size)
        .map_err(|e| format!("Font '{}': {e}", path.display()))?;
    log::info!(
        "Loaded font '{}' at {}px: {} glyphs, atlas {}x{}",
        path.display(),
        pixel_size,
        table.loaded_count(),
        atlas.width,
        atlas.height
    );
    Ok((table, atlas))
}

pub fn rasterize_font(bytes: Vec<u8>, pixel_size: f32) -> Result<(GlyphTable, GlyphAtlas), String> {
    let font = Font::try_from_vec(bytes).ok_or_else(|| "unparsable font data".to_string())?;
    let scale = Scale::uniform(pixel_size);

    let mut glyphs = Vec::with_capacity(GLYPH_COUNT);
    let mut missing = String::new();
    for code in 0..GLYPH_COUNT as u8 {
        let ch = code as char;
        let glyph = font.glyph(ch);
        if glyph.id().0 == 0 {
            if ch.is_ascii_graphic() || ch == ' ' {
                missing.push(ch);
            }
            continue;
        }
        let scaled = glyph.scaled(scale);
        let advance = scaled.h_metrics().advance_width.round();
        let positioned = scaled.positioned(point(0.0, 0.0));

        let raster = match positioned.pixel_bounding_box() {
            Some(bb) => {
                let w = bb.width() as u32;
                let h = bb.height() as u32;
                let mut bitmap = vec![0u8; (w * h) as usize];
                positioned.draw(|gx, gy, coverage| {
                    if let Some(px) = bitmap.get_mut((gy * w + gx) as usize) {
                        *px = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                    }
                });
                RasterGlyph {
                    code,
                    size: [w, h],
                    bearing: [bb.min.x, -bb.min.y],
                    advance,
                    bitmap,
                }
            }
            None => RasterGlyph {
                code,
                size: [0, 0],
                bearing: [0, 0],
                advance,
                bitmap: Vec::new(),
            },
        };
        glyphs.push(raster);
    }

    if !missing.is_empty() {
        log::warn!("Font is missing glyphs for: {:?}", missing);
    }

    let sizes: Vec<[u32; 2]> = glyphs.iter().map(|g| g.size).collect();
    let (placements, height) = pack_shelves(&sizes, ATLAS_WIDTH)?;

    let mut pixels = vec![0u8; (ATLAS_WIDTH * height) as usize];
    let mut records = Vec::with_capacity(glyphs.len());
    for (glyph, [ox, oy]) in glyphs.iter().zip(placements) {
        let [w, h] = glyph.size;
        for row in 0..h {
            let src = (row * w) as usize;
            let dst = ((oy + row) * ATLAS_WIDTH + ox) as usize;
            pixels[dst..dst + w as usize].copy_from_slice(&glyph.bitmap[src..src + w as usize]);
        }
        let uv = [
            ox as f32 / ATLAS_WIDTH as f32,
            oy as f32 / height as f32,
            (ox + w) as f32 / ATLAS_WIDTH as f32,
            (oy + h) as f32 / height as f32,
        ];
        records.push((
            glyph.code as char,
            GlyphRecord {
                size: glyph.size,
                bearing: glyph.bearing,
                advance: glyph.advance,
                uv,
            },
        ));
    }

    Ok((
        GlyphTable::from_records(pixel_size, records),
        GlyphAtlas {
            width: ATLAS_WIDTH,
            height,
            pixels,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 'A' is 20x30 sitting on the baseline, 'g' has a descender, ' ' is empty.
    fn table() -> GlyphTable {
        let glyph = |size: [u32; 2], bearing: [i32; 2], advance: f32| GlyphRecord {
            size,
            bearing,
            advance,
            uv: [0.0, 0.0, 0.1, 0.1],
        };
        GlyphTable::from_records(
            48.0,
            [
                ('A', glyph([20, 30], [1, 30], 24.0)),
                ('g', glyph([16, 28], [2, 20], 18.0)),
                (' ', glyph([0, 0], [0, 0], 12.0)),
            ],
        )
    }

    #[test]
    fn test_measure_sums_scaled_advances() {
        let t = table();
        assert_eq!(t.measure("", 1.0), 0.0);
        assert_eq!(t.measure("Ag A", 1.0), 24.0 + 18.0 + 12.0 + 24.0);
        assert_eq!(t.measure("AA", 0.5), 24.0);
    }

    #[test]
    fn test_unsupported_chars_are_zero_width() {
        let t = table();
        assert_eq!(t.measure("A\u{e9}A", 1.0), 48.0);
        assert_eq!(t.measure("AzA", 1.0), 48.0);
        assert!(t.get('\u{e9}').is_none());
        assert_eq!(t.layout("\u{e9}A", 0.0, 0.0, 1.0)[0].x, 1.0);
    }

    #[test]
    fn test_layout_places_quads_against_baseline() {
        let t = table();
        let quads = t.layout("Ag", 100.0, 50.0, 1.0);
        assert_eq!(quads.len(), 2);
        assert_eq!(quads[0].x, 101.0);
        assert_eq!(quads[0].y, 50.0);
        assert_eq!((quads[0].width, quads[0].height), (20.0, 30.0));
        // descender: 8 px below the baseline
        assert_eq!(quads[1].x, 100.0 + 24.0 + 2.0);
        assert_eq!(quads[1].y, 42.0);
    }

    #[test]
    fn test_layout_scales_offsets() {
        let t = table();
        let quads = t.layout("g", 0.0, 100.0, 0.5);
        assert_eq!(quads[0].x, 1.0);
        assert_eq!(quads[0].y, 96.0);
        assert_eq!((quads[0].width, quads[0].height), (8.0, 14.0));
    }

    #[test]
    fn test_empty_glyphs_advance_without_quads() {
        let t = table();
        let quads = t.layout("A A", 0.0, 0.0, 1.0);
        assert_eq!(quads.len(), 2);
        assert_eq!(quads[1].x, 24.0 + 12.0 + 1.0);
    }

    #[test]
    fn test_pack_shelves_wraps_rows() {
        let sizes = [[10, 5], [10, 8], [10, 3]];
        let (placements, height) = pack_shelves(&sizes, 24).expect("fits");
        assert_eq!(placements, vec![[0, 0], [11, 0], [0, 9]]);
        assert_eq!(height, 9 + 4);
    }

    #[test]
    fn test_pack_shelves_keeps_padding_between_glyphs() {
        let sizes = vec![[7, 7]; 40];
        let (placements, _) = pack_shelves(&sizes, ATLAS_WIDTH).expect("fits");
        for pair in placements.windows(2) {
            if pair[0][1] == pair[1][1] {
                assert!(pair[1][0] >= pair[0][0] + 7 + PADDING);
            }
        }
    }

    #[test]
    fn test_pack_shelves_rejects_oversized_glyph() {
        assert!(pack_shelves(&[[ATLAS_WIDTH, 4]], ATLAS_WIDTH).is_err());
    }

    #[test]
    fn test_pack_shelves_empty_input_has_unit_height() {
        let (placements, height) = pack_shelves(&[], ATLAS_WIDTH).expect("trivially fits");
        assert!(placements.is_empty());
        assert_eq!(height, 1);
    }

    #[test]
    fn test_rasterize_rejects_garbage() {
        assert!(rasterize_font(vec![0, 1, 2, 3], 48.0).is_err());
    }
}
