use crate::caption::measure::{BlockMetrics, DEFAULT_LINE_GAP, measure};
use crate::caption::metrics::GlyphMetrics;
use crate::caption::wrap::{Line, wrap};
use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::floor_div2;

/// Horizontal placement of a caption block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAlign {
    /// Centre the block, and each line within it, on the canvas.
    Center,
    /// Left edge of the block at this x coordinate.
    At(i32),
}

/// Corner coordinates of an axis-aligned box, `(x1, y1)` top-left and `(x2, y2)` bottom-right.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BoxRect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoxRect {
    pub fn as_tuple(self) -> (i32, i32, i32, i32) {
        (self.x1, self.y1, self.x2, self.y2)
    }
}

/// Grow a measured block by `padding` on every side. Not clamped to any canvas.
pub fn pad_box(
    origin_x: i32,
    origin_y: i32,
    block_width: i32,
    block_height: i32,
    padding: i32,
) -> BoxRect {
    BoxRect {
        x1: origin_x - padding,
        y1: origin_y - padding,
        x2: origin_x + block_width + padding,
        y2: origin_y + block_height + padding,
    }
}

/// Left edge of a block of `block_width` pixels on a canvas `canvas_width` wide.
pub fn resolve_origin_x(align: HorizontalAlign, canvas_width: i32, block_width: i32) -> i32 {
    match align {
        HorizontalAlign::Center => floor_div2(canvas_width - block_width),
        HorizontalAlign::At(x) => x,
    }
}

/// Caption geometry settings.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CaptionConfig {
    pub canvas: Canvas,
    /// Maximum line width used for wrapping.
    pub max_width: i32,
    /// Space between the text block and the background box edge.
    pub padding: i32,
    pub line_gap: i32,
    pub stroke_width: u32,
    pub align: HorizontalAlign,
    /// Top of the text block.
    pub origin_y: i32,
    pub corner_radius: u32,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self::for_canvas(Canvas::VERTICAL_HD)
    }
}

impl CaptionConfig {
    /// Side margin between the wrap width and the canvas edges, split evenly.
    pub const SIDE_MARGIN: i32 = 200;

    pub fn for_canvas(canvas: Canvas) -> Self {
        Self {
            canvas,
            max_width: canvas.width as i32 - Self::SIDE_MARGIN,
            padding: 20,
            line_gap: DEFAULT_LINE_GAP,
            stroke_width: 2,
            align: HorizontalAlign::Center,
            origin_y: 1500,
            corner_radius: 20,
        }
    }

    pub fn validate(&self) -> ReelResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ReelError::invalid_argument(
                "caption canvas width/height must be non-zero",
            ));
        }
        if self.max_width < 0 {
            return Err(ReelError::invalid_argument(format!(
                "caption max_width must be >= 0, got {}",
                self.max_width
            )));
        }
        if self.padding < 0 {
            return Err(ReelError::invalid_argument("caption padding must be >= 0"));
        }
        if self.line_gap < 0 {
            return Err(ReelError::invalid_argument("caption line_gap must be >= 0"));
        }
        Ok(())
    }
}

/// A fully positioned caption ready for rasterization.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct CaptionLayout {
    pub lines: Vec<Line>,
    pub block: BlockMetrics,
    pub origin_x: i32,
    pub origin_y: i32,
    /// Top-left of each line's stroke-inclusive box.
    pub line_positions: Vec<(i32, i32)>,
    pub background: BoxRect,
}

/// Wrap, measure and place `text` according to `cfg`.
pub fn layout_caption<M: GlyphMetrics + ?Sized>(
    text: &str,
    metrics: &M,
    cfg: &CaptionConfig,
) -> ReelResult<CaptionLayout> {
    cfg.validate()?;

    let lines = wrap(text, metrics, cfg.max_width, cfg.stroke_width)?;
    let block = measure(&lines, metrics, cfg.stroke_width, cfg.line_gap)?;

    let canvas_width = cfg.canvas.width as i32;
    let origin_x = resolve_origin_x(cfg.align, canvas_width, block.width);
    let origin_y = cfg.origin_y;

    let mut line_positions = Vec::with_capacity(lines.len());
    let mut y = origin_y;
    for (w, h) in block.line_widths.iter().zip(&block.line_heights) {
        let x = match cfg.align {
            HorizontalAlign::Center => floor_div2(canvas_width - w),
            HorizontalAlign::At(_) => origin_x,
        };
        line_positions.push((x, y));
        y += h + cfg.line_gap;
    }

    let background = pad_box(origin_x, origin_y, block.width, block.height, cfg.padding);
    tracing::debug!(
        width = block.width,
        height = block.height,
        ?background,
        "laid out caption"
    );

    Ok(CaptionLayout {
        lines,
        block,
        origin_x,
        origin_y,
        line_positions,
        background,
    })
}
