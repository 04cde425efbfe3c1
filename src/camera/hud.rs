//! Burned-in overlay text for camera frames. Glyphs are compact polyline strokes
//! (the same approach as the Hershey fonts bundled with classic computer-vision
//! toolkits) so the renderer needs no font asset; everything is drawn through
//! `imageproc` line segments. The face covers uppercase letters, digits, and the
//! handful of punctuation the overlays use; lowercase input is folded to uppercase
//! and anything else renders as blank advance.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

/// Glyph cell height in stroke units; `y = 6` is the baseline, `y = 0` the cap line.
const CELL_HEIGHT: f32 = 6.0;
/// Horizontal advance per glyph in stroke units (4-unit glyph plus 2 of tracking).
const ADVANCE: f32 = 6.0;

type Strokes = &'static [&'static [(f32, f32)]];

/// Draw `text` with its left baseline at `origin`, `height` pixels tall. A
/// `thickness` of n draws each stroke as an n-pixel brush. Pixels falling outside
/// the image are clipped by the line drawer.
pub fn draw_text(
    image: &mut RgbImage,
    text: &str,
    origin: (f32, f32),
    height: f32,
    thickness: u32,
    color: Rgb<u8>,
) {
    let scale = height / CELL_HEIGHT;
    let mut pen = origin.0;
    for ch in text.chars() {
        for polyline in strokes(ch.to_ascii_uppercase()) {
            for pair in polyline.windows(2) {
                let (x0, y0) = pair[0];
                let (x1, y1) = pair[1];
                for dx in 0..thickness {
                    for dy in 0..thickness {
                        draw_line_segment_mut(
                            image,
                            (
                                pen + x0 * scale + dx as f32,
                                origin.1 - (CELL_HEIGHT - y0) * scale + dy as f32,
                            ),
                            (
                                pen + x1 * scale + dx as f32,
                                origin.1 - (CELL_HEIGHT - y1) * scale + dy as f32,
                            ),
                            color,
                        );
                    }
                }
            }
        }
        pen += ADVANCE * scale;
    }
}

#[rustfmt::skip]
fn strokes(ch: char) -> Strokes {
    match ch {
        'A' => &[&[(0.0, 6.0), (0.0, 2.0), (2.0, 0.0), (4.0, 2.0), (4.0, 6.0)], &[(0.0, 4.0), (4.0, 4.0)]],
        'B' => &[&[(0.0, 0.0), (0.0, 6.0)], &[(0.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 2.0), (3.0, 3.0), (0.0, 3.0)], &[(3.0, 3.0), (4.0, 4.0), (4.0, 5.0), (3.0, 6.0), (0.0, 6.0)]],
        'C' => &[&[(4.0, 1.0), (3.0, 0.0), (1.0, 0.0), (0.0, 1.0), (0.0, 5.0), (1.0, 6.0), (3.0, 6.0), (4.0, 5.0)]],
        'D' => &[&[(0.0, 0.0), (0.0, 6.0)], &[(0.0, 0.0), (2.0, 0.0), (4.0, 2.0), (4.0, 4.0), (2.0, 6.0), (0.0, 6.0)]],
        'E' => &[&[(4.0, 0.0), (0.0, 0.0), (0.0, 6.0), (4.0, 6.0)], &[(0.0, 3.0), (3.0, 3.0)]],
        'F' => &[&[(4.0, 0.0), (0.0, 0.0), (0.0, 6.0)], &[(0.0, 3.0), (3.0, 3.0)]],
        'G' => &[&[(4.0, 1.0), (3.0, 0.0), (1.0, 0.0), (0.0, 1.0), (0.0, 5.0), (1.0, 6.0), (3.0, 6.0), (4.0, 5.0), (4.0, 3.0), (2.0, 3.0)]],
        'H' => &[&[(0.0, 0.0), (0.0, 6.0)], &[(4.0, 0.0), (4.0, 6.0)], &[(0.0, 3.0), (4.0, 3.0)]],
        'I' => &[&[(1.0, 0.0), (3.0, 0.0)], &[(2.0, 0.0), (2.0, 6.0)], &[(1.0, 6.0), (3.0, 6.0)]],
        'J' => &[&[(4.0, 0.0), (4.0, 5.0), (3.0, 6.0), (1.0, 6.0), (0.0, 5.0)]],
        'K' => &[&[(0.0, 0.0), (0.0, 6.0)], &[(4.0, 0.0), (0.0, 3.0), (4.0, 6.0)]],
        'L' => &[&[(0.0, 0.0), (0.0, 6.0), (4.0, 6.0)]],
        'M' => &[&[(0.0, 6.0), (0.0, 0.0), (2.0, 3.0), (4.0, 0.0), (4.0, 6.0)]],
        'N' => &[&[(0.0, 6.0), (0.0, 0.0), (4.0, 6.0), (4.0, 0.0)]],
        'O' => &[&[(1.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 5.0), (3.0, 6.0), (1.0, 6.0), (0.0, 5.0), (0.0, 1.0), (1.0, 0.0)]],
        'P' => &[&[(0.0, 6.0), (0.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 2.0), (3.0, 3.0), (0.0, 3.0)]],
        'Q' => &[&[(1.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 5.0), (3.0, 6.0), (1.0, 6.0), (0.0, 5.0), (0.0, 1.0), (1.0, 0.0)], &[(2.0, 4.0), (4.0, 6.0)]],
        'R' => &[&[(0.0, 6.0), (0.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 2.0), (3.0, 3.0), (0.0, 3.0)], &[(2.0, 3.0), (4.0, 6.0)]],
        'S' => &[&[(4.0, 1.0), (3.0, 0.0), (1.0, 0.0), (0.0, 1.0), (0.0, 2.0), (1.0, 3.0), (3.0, 3.0), (4.0, 4.0), (4.0, 5.0), (3.0, 6.0), (1.0, 6.0), (0.0, 5.0)]],
        'T' => &[&[(0.0, 0.0), (4.0, 0.0)], &[(2.0, 0.0), (2.0, 6.0)]],
        'U' => &[&[(0.0, 0.0), (0.0, 5.0), (1.0, 6.0), (3.0, 6.0), (4.0, 5.0), (4.0, 0.0)]],
        'V' => &[&[(0.0, 0.0), (2.0, 6.0), (4.0, 0.0)]],
        'W' => &[&[(0.0, 0.0), (1.0, 6.0), (2.0, 2.0), (3.0, 6.0), (4.0, 0.0)]],
        'X' => &[&[(0.0, 0.0), (4.0, 6.0)], &[(4.0, 0.0), (0.0, 6.0)]],
        'Y' => &[&[(0.0, 0.0), (2.0, 3.0), (4.0, 0.0)], &[(2.0, 3.0), (2.0, 6.0)]],
        'Z' => &[&[(0.0, 0.0), (4.0, 0.0), (0.0, 6.0), (4.0, 6.0)]],
        '0' => &[&[(1.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 5.0), (3.0, 6.0), (1.0, 6.0), (0.0, 5.0), (0.0, 1.0), (1.0, 0.0)], &[(0.0, 5.0), (4.0, 1.0)]],
        '1' => &[&[(1.0, 1.0), (2.0, 0.0), (2.0, 6.0)], &[(1.0, 6.0), (3.0, 6.0)]],
        '2' => &[&[(0.0, 1.0), (1.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 2.0), (0.0, 6.0), (4.0, 6.0)]],
        '3' => &[&[(0.0, 1.0), (1.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 2.0), (3.0, 3.0), (1.0, 3.0)], &[(3.0, 3.0), (4.0, 4.0), (4.0, 5.0), (3.0, 6.0), (1.0, 6.0), (0.0, 5.0)]],
        '4' => &[&[(3.0, 6.0), (3.0, 0.0), (0.0, 4.0), (4.0, 4.0)]],
        '5' => &[&[(4.0, 0.0), (0.0, 0.0), (0.0, 3.0), (3.0, 3.0), (4.0, 4.0), (4.0, 5.0), (3.0, 6.0), (1.0, 6.0), (0.0, 5.0)]],
        '6' => &[&[(4.0, 1.0), (3.0, 0.0), (1.0, 0.0), (0.0, 1.0), (0.0, 5.0), (1.0, 6.0), (3.0, 6.0), (4.0, 5.0), (4.0, 4.0), (3.0, 3.0), (0.0, 3.0)]],
        '7' => &[&[(0.0, 0.0), (4.0, 0.0), (1.0, 6.0)]],
        '8' => &[&[(1.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 2.0), (3.0, 3.0), (1.0, 3.0), (0.0, 2.0), (0.0, 1.0), (1.0, 0.0)], &[(1.0, 3.0), (0.0, 4.0), (0.0, 5.0), (1.0, 6.0), (3.0, 6.0), (4.0, 5.0), (4.0, 4.0), (3.0, 3.0)]],
        '9' => &[&[(4.0, 3.0), (1.0, 3.0), (0.0, 2.0), (0.0, 1.0), (1.0, 0.0), (3.0, 0.0), (4.0, 1.0), (4.0, 5.0), (3.0, 6.0), (1.0, 6.0)]],
        '-' => &[&[(1.0, 3.0), (3.0, 3.0)]],
        '.' => &[&[(2.0, 5.0), (2.0, 6.0)]],
        ':' => &[&[(2.0, 1.0), (2.0, 2.0)], &[(2.0, 4.0), (2.0, 5.0)]],
        '|' => &[&[(2.0, 0.0), (2.0, 6.0)]],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_marks_pixels_and_respects_the_baseline() {
        let mut image = RgbImage::new(200, 60);
        draw_text(&mut image, "HAUL 42", (10.0, 40.0), 18.0, 2, Rgb([255, 255, 255]));

        let lit = image.pixels().filter(|p| p.0 != [0, 0, 0]).count();
        assert!(lit > 0);

        // Nothing below the baseline row (plus the brush width).
        for y in 43..60 {
            for x in 0..200 {
                assert_eq!(image.get_pixel(x, y).0, [0, 0, 0]);
            }
        }
    }

    #[test]
    fn unknown_characters_render_as_blank_advance() {
        let mut plain = RgbImage::new(120, 40);
        let mut with_gap = RgbImage::new(120, 40);
        draw_text(&mut plain, "A B", (5.0, 30.0), 12.0, 1, Rgb([0, 255, 0]));
        draw_text(&mut with_gap, "A?B", (5.0, 30.0), 12.0, 1, Rgb([0, 255, 0]));

        // '?' has no strokes, so it contributes exactly the advance a space does.
        assert_eq!(plain.as_raw(), with_gap.as_raw());
    }
}
