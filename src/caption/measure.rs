use crate::caption::metrics::GlyphMetrics;
use crate::caption::wrap::Line;
use crate::foundation::error::ReelResult;

/// Vertical gap between stacked caption lines, in pixels.
pub const DEFAULT_LINE_GAP: i32 = 10;

/// Measured extent of a stack of lines.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BlockMetrics {
    pub width: i32,
    pub height: i32,
    pub line_widths: Vec<i32>,
    pub line_heights: Vec<i32>,
}

/// Measure wrapped lines stacked vertically with `line_gap` between them.
///
/// Line extents come straight from the provider's stroke-inclusive boxes. An empty line measures
/// zero without consulting the provider; zero lines measure `(0, 0)`.
pub fn measure<M: GlyphMetrics + ?Sized>(
    lines: &[Line],
    metrics: &M,
    stroke_width: u32,
    line_gap: i32,
) -> ReelResult<BlockMetrics> {
    if lines.is_empty() {
        return Ok(BlockMetrics::default());
    }

    let mut line_widths = Vec::with_capacity(lines.len());
    let mut line_heights = Vec::with_capacity(lines.len());
    for line in lines {
        if line.is_empty() {
            line_widths.push(0);
            line_heights.push(0);
            continue;
        }
        let b = metrics.text_box(&line.text(), stroke_width)?;
        line_widths.push(b.width());
        line_heights.push(b.height());
    }

    let width = line_widths.iter().copied().max().unwrap_or(0);
    let gaps = (lines.len() as i32 - 1) * line_gap;
    let height = line_heights.iter().sum::<i32>() + gaps;

    Ok(BlockMetrics {
        width,
        height,
        line_widths,
        line_heights,
    })
}
