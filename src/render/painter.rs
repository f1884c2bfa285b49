use crate::assets::decode::RasterImage;
use crate::foundation::core::{BezPath, Circle, Point, Rect, RoundedRect, Shape};
use crate::foundation::core::Rgba8;
use crate::foundation::error::{ReelError, ReelResult};
use crate::text::font::ShapedLine;

const PATH_TOLERANCE: f64 = 0.1;

/// Vector painter over a transparent canvas, backed by `vello_cpu`.
///
/// Rectangle coordinates follow the inclusive pixel convention: `[x0, y0, x1, y1]` covers columns
/// `x0..=x1` and rows `y0..=y1`. Outlines grow inwards from those bounds.
pub struct Painter {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
}

impl Painter {
    pub fn new(width: u32, height: u32) -> ReelResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| ReelError::evaluation("painter width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| ReelError::evaluation("painter height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(ReelError::validation("painter width/height must be non-zero"));
        }
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(w, h),
            width: w,
            height: h,
        })
    }

    pub fn fill_shape(&mut self, shape: &impl Shape, color: Rgba8) {
        let path = bezpath_to_cpu(&shape.to_path(PATH_TOLERANCE));
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(paint(color));
        self.ctx.fill_path(&path);
    }

    /// Stroke centred on the shape outline, with flat caps.
    pub fn stroke_shape(&mut self, shape: &impl Shape, width: f64, color: Rgba8) {
        let path = bezpath_to_cpu(&shape.to_path(PATH_TOLERANCE));
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(paint(color));
        self.ctx.set_stroke(
            vello_cpu::kurbo::Stroke::new(width)
                .with_caps(vello_cpu::kurbo::Cap::Butt)
                .with_join(vello_cpu::kurbo::Join::Round),
        );
        self.ctx.stroke_path(&path);
    }

    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba8) {
        if x1 < x0 || y1 < y0 {
            return;
        }
        self.fill_shape(&inclusive_rect(x0, y0, x1, y1), color);
    }

    /// Rectangle outline of `width` pixels drawn inside `[x0, y0, x1, y1]`.
    pub fn outline_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, width: i32, color: Rgba8) {
        if width <= 0 || x1 < x0 || y1 < y0 {
            return;
        }
        // Bands do not overlap, so translucent outlines blend once per pixel.
        let top_end = y0 + width.min(y1 - y0 + 1) - 1;
        let bottom_start = (y1 - width + 1).max(top_end + 1);
        self.fill_rect(x0, y0, x1, top_end, color);
        self.fill_rect(x0, bottom_start, x1, y1, color);

        let left_end = x0 + width.min(x1 - x0 + 1) - 1;
        let right_start = (x1 - width + 1).max(left_end + 1);
        self.fill_rect(x0, top_end + 1, left_end, bottom_start - 1, color);
        self.fill_rect(right_start, top_end + 1, x1, bottom_start - 1, color);
    }

    pub fn fill_rounded_rect(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        radius: f64,
        color: Rgba8,
    ) {
        if x1 < x0 || y1 < y0 {
            return;
        }
        let r = inclusive_rect(x0, y0, x1, y1);
        let radius = radius.min(r.width() / 2.0).min(r.height() / 2.0).max(0.0);
        self.fill_shape(&RoundedRect::from_rect(r, radius), color);
    }

    /// Filled disc covering the bounding box `[cx - r, cy - r, cx + r, cy + r]`.
    pub fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: Rgba8) {
        let (center, radius) = circle_box(cx, cy, r);
        self.fill_shape(&Circle::new(center, radius), color);
    }

    /// Ring of `width` pixels inside the circle's bounding box.
    pub fn outline_circle(&mut self, cx: i32, cy: i32, r: i32, width: i32, color: Rgba8) {
        let (center, radius) = circle_box(cx, cy, r);
        let w = f64::from(width.max(0)).min(radius);
        if w <= 0.0 {
            return;
        }
        self.stroke_shape(&Circle::new(center, radius - w / 2.0), w, color);
    }

    /// Connected line segments of the given width.
    pub fn polyline(&mut self, points: &[(i32, i32)], width: i32, color: Rgba8) {
        let Some((&first, rest)) = points.split_first() else {
            return;
        };
        let mut path = BezPath::new();
        path.move_to(pixel_center(first));
        for &p in rest {
            path.line_to(pixel_center(p));
        }
        self.stroke_shape(&path, f64::from(width.max(1)), color);
    }

    /// Draw a shaped line with its box's top-left at `(x, y)`.
    ///
    /// With a stroke, glyphs are outlined first and filled on top; the glyph origin is inset by
    /// the stroke width so the outline stays inside the stroke-inclusive box.
    pub fn draw_text(
        &mut self,
        font: &vello_cpu::peniko::FontData,
        line: &ShapedLine,
        x: f64,
        y: f64,
        fill: Rgba8,
        stroke: Option<(u32, Rgba8)>,
    ) {
        let inset = stroke.map_or(0.0, |(w, _)| f64::from(w));
        self.ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            x + inset,
            y + inset,
        )));
        let glyphs = || {
            line.glyphs.iter().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            })
        };

        if let Some((w, color)) = stroke
            && w > 0
        {
            self.ctx.set_paint(paint(color));
            self.ctx.set_stroke(
                vello_cpu::kurbo::Stroke::new(2.0 * f64::from(w))
                    .with_join(vello_cpu::kurbo::Join::Round),
            );
            self.ctx
                .glyph_run(font)
                .font_size(line.font_size)
                .stroke_glyphs(glyphs());
        }

        self.ctx.set_paint(paint(fill));
        self.ctx
            .glyph_run(font)
            .font_size(line.font_size)
            .fill_glyphs(glyphs());
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }

    /// Rasterize everything drawn so far into premultiplied RGBA8.
    pub fn finish(mut self) -> RasterImage {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        RasterImage {
            width: u32::from(self.width),
            height: u32::from(self.height),
            rgba8_premul: pixmap.data_as_u8_slice().to_vec(),
        }
    }
}

fn paint(color: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn inclusive_rect(x0: i32, y0: i32, x1: i32, y1: i32) -> Rect {
    Rect::new(
        f64::from(x0),
        f64::from(y0),
        f64::from(x1) + 1.0,
        f64::from(y1) + 1.0,
    )
}

fn circle_box(cx: i32, cy: i32, r: i32) -> (Point, f64) {
    let r = f64::from(r.max(0));
    (
        Point::new(f64::from(cx) + 0.5, f64::from(cy) + 0.5),
        r + 0.5,
    )
}

fn pixel_center((x, y): (i32, i32)) -> Point {
    Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
