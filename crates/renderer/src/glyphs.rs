//! Seven-segment digit glyphs for icon labels.
//!
//! Icons are tiny (25px by default), so labels are drawn as stroked
//! segments instead of font outlines.
//!
//! ```text
//!  aaa
//! f   b
//!  ggg
//! e   c
//!  ddd
//! ```

use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

const A: u8 = 1 << 0;
const B: u8 = 1 << 1;
const C: u8 = 1 << 2;
const D: u8 = 1 << 3;
const E: u8 = 1 << 4;
const F: u8 = 1 << 5;
const G: u8 = 1 << 6;

/// Lit segments for '0'..='9'.
const DIGITS: [u8; 10] = [
    A | B | C | D | E | F,
    B | C,
    A | B | G | E | D,
    A | B | G | C | D,
    F | G | B | C,
    A | F | G | C | D,
    A | F | G | E | D | C,
    A | B | C,
    A | B | C | D | E | F | G,
    A | B | C | D | F | G,
];

/// Glyph width as a fraction of its height.
const ASPECT: f32 = 0.55;
/// Gap between glyphs as a fraction of glyph height.
const SPACING: f32 = 0.25;
/// Stroke width as a fraction of glyph height.
const STROKE: f32 = 0.16;

/// Lit segment mask for `ch`, or `None` for characters without a glyph.
pub fn segments(ch: char) -> Option<u8> {
    ch.to_digit(10).map(|d| DIGITS[d as usize])
}

/// Width of `text` drawn at `height`.
pub fn text_width(text: &str, height: f32) -> f32 {
    let n = text.chars().count() as f32;
    if n == 0.0 {
        return 0.0;
    }
    n * height * ASPECT + (n - 1.0) * height * SPACING
}

/// Draw `text` centered on `(cx, cy)`, shrinking it to fit `max_width`.
///
/// Characters other than ASCII digits are skipped but still take up room.
pub fn draw_text(
    pixmap: &mut Pixmap,
    text: &str,
    cx: f32,
    cy: f32,
    height: f32,
    max_width: f32,
    paint: &Paint,
) {
    let width = text_width(text, height);
    let height = if width > max_width && width > 0.0 {
        height * max_width / width
    } else {
        height
    };

    let glyph_w = height * ASPECT;
    let advance = glyph_w + height * SPACING;
    let mut x = cx - text_width(text, height) / 2.0 + glyph_w / 2.0;

    for ch in text.chars() {
        if let Some(mask) = segments(ch) {
            draw_glyph(pixmap, mask, x, cy, glyph_w, height, paint);
        }
        x += advance;
    }
}

fn draw_glyph(pixmap: &mut Pixmap, mask: u8, cx: f32, cy: f32, width: f32, height: f32, paint: &Paint) {
    let stroke = Stroke {
        width: (height * STROKE).max(1.0),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    let (l, r) = (cx - width / 2.0, cx + width / 2.0);
    let (t, m, b) = (cy - height / 2.0, cy, cy + height / 2.0);

    let lines: [(u8, (f32, f32), (f32, f32)); 7] = [
        (A, (l, t), (r, t)),
        (B, (r, t), (r, m)),
        (C, (r, m), (r, b)),
        (D, (l, b), (r, b)),
        (E, (l, m), (l, b)),
        (F, (l, t), (l, m)),
        (G, (l, m), (r, m)),
    ];

    let mut pb = PathBuilder::new();
    for (bit, (x1, y1), (x2, y2)) in lines {
        if mask & bit != 0 {
            pb.move_to(x1, y1);
            pb.line_to(x2, y2);
        }
    }
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, paint, &stroke, Transform::identity(), None);
    }
}
