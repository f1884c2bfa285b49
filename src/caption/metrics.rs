use crate::foundation::error::ReelResult;

/// Tight pixel box a string occupies when rendered, relative to the draw origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TextBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl TextBox {
    pub fn width(self) -> i32 {
        self.right - self.left
    }

    pub fn height(self) -> i32 {
        self.bottom - self.top
    }
}

/// Source of glyph geometry for layout.
///
/// Boxes are stroke-inclusive: a provider widens the box by `stroke_width` on every side, so the
/// outline of the outer glyphs is part of the returned extent. Layout code never adds stroke on
/// top of what the provider reports.
pub trait GlyphMetrics {
    fn text_box(&self, text: &str, stroke_width: u32) -> ReelResult<TextBox>;

    fn text_width(&self, text: &str, stroke_width: u32) -> ReelResult<i32> {
        Ok(self.text_box(text, stroke_width)?.width())
    }
}

impl<M: GlyphMetrics + ?Sized> GlyphMetrics for &M {
    fn text_box(&self, text: &str, stroke_width: u32) -> ReelResult<TextBox> {
        (**self).text_box(text, stroke_width)
    }
}

/// Monospace metrics: every `char` advances by the same amount.
///
/// Deterministic on every platform; useful for previews without a font file and for tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedAdvanceMetrics {
    pub advance: i32,
    pub line_height: i32,
}

impl FixedAdvanceMetrics {
    pub fn new(advance: i32, line_height: i32) -> Self {
        Self {
            advance,
            line_height,
        }
    }
}

impl GlyphMetrics for FixedAdvanceMetrics {
    fn text_box(&self, text: &str, stroke_width: u32) -> ReelResult<TextBox> {
        let s = stroke_width as i32;
        let n = text.chars().count() as i32;
        Ok(TextBox {
            left: 0,
            top: 0,
            right: n * self.advance + 2 * s,
            bottom: self.line_height + 2 * s,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_advance_counts_chars_and_stroke() {
        let m = FixedAdvanceMetrics::new(10, 20);
        let b = m.text_box("héllo", 2).unwrap();
        assert_eq!(b.width(), 54);
        assert_eq!(b.height(), 24);
        assert_eq!(m.text_width("ab", 0).unwrap(), 20);
    }

    #[test]
    fn reference_impl_forwards() {
        let m = FixedAdvanceMetrics::new(3, 5);
        fn width_of<M: GlyphMetrics>(m: M, text: &str) -> i32 {
            m.text_width(text, 1).unwrap()
        }
        let r: &dyn GlyphMetrics = &m;
        assert_eq!(width_of(r, "abcd"), 14);
        assert_eq!(width_of(&m, "abcd"), 14);
    }
}
