//! Text rendered into small generated textures (axis letters).

use font8x8::legacy::BASIC_LEGACY;
use image::{Rgba, RgbaImage};

/// Edge length of a label texture in pixels.
pub const LABEL_TEXTURE_SIZE: u32 = 50;
/// Pen origin: left edge and baseline of the first glyph.
const ORIGIN: (u32, u32) = (5, 40);
/// Each font8x8 pixel becomes a `GLYPH_SCALE`² block (32 px glyphs).
const GLYPH_SCALE: u32 = 4;
const GLYPH_CELL: u32 = 8;

/// Draw `text` in bold `color` onto a transparent square texture.
///
/// Characters outside ASCII render as `?`. Text that runs past the right
/// edge is clipped.
#[must_use]
pub fn render_label(text: &str, color: [u8; 3]) -> RgbaImage {
    let mut image = RgbaImage::from_pixel(
        LABEL_TEXTURE_SIZE,
        LABEL_TEXTURE_SIZE,
        Rgba([0, 0, 0, 0]),
    );
    let ink = Rgba([color[0], color[1], color[2], 255]);
    let top = ORIGIN.1.saturating_sub(GLYPH_CELL * GLYPH_SCALE);
    let advance = GLYPH_CELL * GLYPH_SCALE;

    for (i, ch) in text.chars().enumerate() {
        let left = ORIGIN.0 + i as u32 * advance;
        if left >= LABEL_TEXTURE_SIZE {
            break;
        }
        for (row, bits) in glyph_for_char(ch).iter().enumerate() {
            for col in 0..GLYPH_CELL {
                if (bits >> col) & 0x01 == 0 {
                    continue;
                }
                let x0 = left + col * GLYPH_SCALE;
                let y0 = top + row as u32 * GLYPH_SCALE;
                // One extra column per block thickens the strokes.
                fill_block(&mut image, x0, y0, GLYPH_SCALE + 1, GLYPH_SCALE, ink);
            }
        }
    }
    image
}

fn fill_block(
    image: &mut RgbaImage,
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
    ink: Rgba<u8>,
) {
    for y in y0..(y0 + height).min(image.height()) {
        for x in x0..(x0 + width).min(image.width()) {
            image.put_pixel(x, y, ink);
        }
    }
}

fn glyph_for_char(ch: char) -> [u8; 8] {
    let index = ch as usize;
    if index < BASIC_LEGACY.len() {
        BASIC_LEGACY[index]
    } else {
        BASIC_LEGACY[b'?' as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inked(image: &RgbaImage) -> Vec<(u32, u32)> {
        image
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[3] == 255)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn label_has_transparent_background_and_colored_ink() {
        let image = render_label("X", [255, 0, 0]);
        assert_eq!(image.dimensions(), (LABEL_TEXTURE_SIZE, LABEL_TEXTURE_SIZE));
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 0]);

        let ink = inked(&image);
        assert!(!ink.is_empty());
        for &(x, y) in &ink {
            assert_eq!(image.get_pixel(x, y).0, [255, 0, 0, 255]);
        }
    }

    #[test]
    fn glyph_stays_between_origin_and_baseline() {
        let image = render_label("Z", [0, 0, 255]);
        for (x, y) in inked(&image) {
            assert!(x >= 5, "ink left of origin at x={x}");
            assert!(y >= 8 && y < 40, "ink outside glyph rows at y={y}");
        }
    }

    #[test]
    fn empty_text_leaves_texture_blank() {
        assert!(inked(&render_label("", [0, 128, 0])).is_empty());
    }

    #[test]
    fn non_ascii_falls_back_to_question_mark() {
        assert_eq!(
            render_label("é", [1, 2, 3]),
            render_label("?", [1, 2, 3])
        );
    }
}
