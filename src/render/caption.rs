use crate::assets::decode::RasterImage;
use crate::caption::layout::{CaptionConfig, CaptionLayout};
use crate::foundation::core::Rgba8;
use crate::foundation::error::ReelResult;
use crate::render::painter::Painter;
use crate::text::font::LoadedFont;

/// Offset of the drop shadow, in pixels along both axes.
pub const SHADOW_OFFSET: i32 = 5;
pub const SHADOW_COLOR: Rgba8 = Rgba8::rgba(0, 0, 0, 128);

/// Colours of a rendered caption.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptionStyle {
    pub text_color: Rgba8,
    pub bg_color: Rgba8,
    pub stroke_color: Rgba8,
    pub shadow: bool,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            text_color: Rgba8::rgb(255, 255, 102),
            bg_color: Rgba8::rgba(0, 51, 102, 128),
            stroke_color: Rgba8::BLACK,
            shadow: false,
        }
    }
}

/// Rasterize a laid-out caption onto a transparent canvas of `cfg.canvas` size.
///
/// A caption whose lines are all empty renders nothing, not even its background box.
pub fn render_caption(
    layout: &CaptionLayout,
    font: &LoadedFont,
    cfg: &CaptionConfig,
    style: &CaptionStyle,
) -> ReelResult<RasterImage> {
    let mut painter = Painter::new(cfg.canvas.width, cfg.canvas.height)?;
    if layout.lines.iter().all(|l| l.is_empty()) {
        return Ok(painter.finish());
    }

    let bg = layout.background;
    painter.fill_rounded_rect(
        bg.x1,
        bg.y1,
        bg.x2,
        bg.y2,
        f64::from(cfg.corner_radius),
        style.bg_color,
    );

    let stroke = Some((cfg.stroke_width, style.stroke_color));
    for (line, &(x, y)) in layout.lines.iter().zip(&layout.line_positions) {
        if line.is_empty() {
            continue;
        }
        let shaped = font.shape_line(&line.text())?;
        if style.shadow {
            painter.draw_text(
                font.font_data(),
                &shaped,
                f64::from(x + SHADOW_OFFSET),
                f64::from(y + SHADOW_OFFSET),
                SHADOW_COLOR,
                stroke,
            );
        }
        painter.draw_text(
            font.font_data(),
            &shaped,
            f64::from(x),
            f64::from(y),
            style.text_color,
            stroke,
        );
    }

    tracing::debug!(lines = layout.lines.len(), shadow = style.shadow, "rendered caption");
    Ok(painter.finish())
}
