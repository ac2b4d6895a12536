//! Station icon rendering.
//!
//! Three shapes cover every request kind:
//! - unavailable: warning-colored disc, white outline, white horizontal bar
//! - bikes_available: doughnut of [mechanical, ebike, docks] with a dark label
//! - single metric: flat disc in the metric's color with a light label

use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use station_common::IconRequest;

use crate::glyphs;
use crate::pie::{pie_slices, wedge_path};
use crate::png::{encode_png, PngError};
use crate::style::{IconStyle, Rgba};

/// Rendered icon pixels, straight (non-premultiplied) RGBA, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconBitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl IconBitmap {
    fn from_pixmap(pixmap: &Pixmap) -> Self {
        let pixels = pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        Self {
            width: pixmap.width(),
            height: pixmap.height(),
            pixels,
        }
    }

    /// RGBA of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.chunks_exact(4).all(|p| p[3] == 0)
    }

    pub fn to_png(&self) -> Result<Vec<u8>, PngError> {
        encode_png(&self.pixels, self.width as usize, self.height as usize)
    }
}

fn paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn fill_circle(pixmap: &mut Pixmap, cx: f32, cy: f32, radius: f32, color: Rgba) {
    if let Some(circle) = PathBuilder::from_circle(cx, cy, radius) {
        pixmap.fill_path(&circle, &paint(color), FillRule::Winding, Transform::identity(), None);
    }
}

/// Geometry shared by every shape of one canvas size.
struct Canvas {
    pixmap: Pixmap,
    center: f32,
    radius: f32,
}

impl Canvas {
    fn new(size: u32) -> Option<Self> {
        let pixmap = Pixmap::new(size, size)?;
        let center = size as f32 / 2.0;
        Some(Self {
            pixmap,
            center,
            // half a pixel of room for anti-aliasing
            radius: center - 0.5,
        })
    }

    fn label(&mut self, value: u32, color: Rgba, max_width: f32) {
        let height = self.radius * 0.8;
        glyphs::draw_text(
            &mut self.pixmap,
            &value.to_string(),
            self.center,
            self.center,
            height,
            max_width,
            &paint(color),
        );
    }
}

/// Render `request` with `style`. Equal inputs always give equal pixels.
///
/// Returns `None` only if the style's canvas size cannot be allocated.
pub fn render_icon(request: &IconRequest, style: &IconStyle) -> Option<IconBitmap> {
    let mut canvas = Canvas::new(style.size)?;

    match *request {
        IconRequest::Unavailable => draw_unavailable(&mut canvas, style),
        IconRequest::BikesAvailable {
            mechanical,
            ebike,
            docks,
        } => draw_doughnut(&mut canvas, style, [mechanical, ebike, docks]),
        IconRequest::BikesAvailableMechanical { label } => {
            draw_disc(&mut canvas, style.mechanical, label, style)
        }
        IconRequest::BikesAvailableEbike { label } => draw_disc(&mut canvas, style.ebike, label, style),
        IconRequest::DocksAvailable { label } => draw_disc(&mut canvas, style.dock, label, style),
    }

    Some(IconBitmap::from_pixmap(&canvas.pixmap))
}

fn draw_unavailable(canvas: &mut Canvas, style: &IconStyle) {
    let c = canvas.center;
    let stroke_width = (canvas.radius * 0.16).max(1.0);
    let radius = canvas.radius - stroke_width / 2.0;

    fill_circle(&mut canvas.pixmap, c, c, radius, style.unavailable);

    if let Some(circle) = PathBuilder::from_circle(c, c, radius) {
        let stroke = Stroke {
            width: stroke_width,
            ..Stroke::default()
        };
        canvas.pixmap.stroke_path(
            &circle,
            &paint(style.outline),
            &stroke,
            Transform::identity(),
            None,
        );
    }

    let half_len = radius * 0.55;
    let half_thick = (radius * 0.14).max(1.0);
    if let Some(bar) = Rect::from_ltrb(c - half_len, c - half_thick, c + half_len, c + half_thick) {
        canvas
            .pixmap
            .fill_rect(bar, &paint(style.outline), Transform::identity(), None);
    }
}

fn draw_doughnut(canvas: &mut Canvas, style: &IconStyle, values: [u32; 3]) {
    let c = canvas.center;
    let slices = pie_slices(&values);
    let colors = style.slot_colors();

    for slice in &slices {
        if let Some(wedge) = wedge_path(c, c, canvas.radius, slice.start, slice.end) {
            canvas.pixmap.fill_path(
                &wedge,
                &paint(colors[slice.slot]),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    let hole_radius = canvas.radius * style.hole_ratio;
    if !slices.is_empty() && hole_radius > 0.0 {
        fill_circle(&mut canvas.pixmap, c, c, hole_radius, style.hole);
    }

    let [mechanical, ebike, _] = values;
    canvas.label(mechanical.saturating_add(ebike), style.label_dark, hole_radius * 1.6);
}

fn draw_disc(canvas: &mut Canvas, color: Rgba, label: Option<u32>, style: &IconStyle) {
    let c = canvas.center;
    fill_circle(&mut canvas.pixmap, c, c, canvas.radius, color);
    if let Some(value) = label {
        canvas.label(value, style.label_light, canvas.radius * 1.6);
    }
}
