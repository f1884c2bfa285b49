use crate::caption::metrics::GlyphMetrics;
use crate::foundation::error::{ReelError, ReelResult};

/// One renderable row of caption text.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Line {
    pub words: Vec<String>,
}

impl Line {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    /// Words joined with single spaces.
    pub fn text(&self) -> String {
        self.words.join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Greedily break `text` into lines no wider than `max_width`.
///
/// Words are never split: a word wider than `max_width` gets a line of its own and overflows.
/// Empty or whitespace-only text yields a single empty line.
pub fn wrap<M: GlyphMetrics + ?Sized>(
    text: &str,
    metrics: &M,
    max_width: i32,
    stroke_width: u32,
) -> ReelResult<Vec<Line>> {
    if max_width < 0 {
        return Err(ReelError::invalid_argument(format!(
            "wrap max_width must be >= 0, got {max_width}"
        )));
    }

    let mut words = text.split_whitespace().peekable();
    if words.peek().is_none() {
        return Ok(vec![Line::default()]);
    }

    let space_width = metrics.text_width(" ", stroke_width)?;

    let mut lines = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_width = 0i32;

    for word in words {
        let word_width = metrics.text_width(word, stroke_width)?;

        if current.is_empty() {
            current.push(word.to_owned());
            current_width = word_width;
        } else if current_width + space_width + word_width <= max_width {
            current.push(word.to_owned());
            current_width += space_width + word_width;
        } else {
            lines.push(Line::new(std::mem::take(&mut current)));
            current.push(word.to_owned());
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        lines.push(Line::new(current));
    }

    tracing::debug!(lines = lines.len(), max_width, "wrapped caption");
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caption::metrics::{FixedAdvanceMetrics, TextBox};

    fn texts(lines: &[Line]) -> Vec<String> {
        lines.iter().map(Line::text).collect()
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        let m = FixedAdvanceMetrics::new(10, 20);
        let lines = wrap("", &m, 100, 0).unwrap();
        assert_eq!(lines, vec![Line::default()]);
        assert_eq!(lines[0].text(), "");

        let lines = wrap(" \t\n ", &m, 100, 0).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].is_empty());
    }

    #[test]
    fn short_text_stays_on_one_line() {
        let m = FixedAdvanceMetrics::new(10, 20);
        let lines = wrap("hello", &m, 1000, 2).unwrap();
        assert_eq!(texts(&lines), vec!["hello"]);
    }

    #[test]
    fn overlong_word_is_kept_whole() {
        let m = FixedAdvanceMetrics::new(10, 20);
        let lines = wrap("aaaaaaaaaa", &m, 30, 0).unwrap();
        assert_eq!(texts(&lines), vec!["aaaaaaaaaa"]);

        let lines = wrap("ab aaaaaaaaaa cd", &m, 50, 0).unwrap();
        assert_eq!(texts(&lines), vec!["ab", "aaaaaaaaaa", "cd"]);
    }

    #[test]
    fn breaks_when_next_word_does_not_fit() {
        // "aa bb" is 50 px wide; adding " cc" makes 80 px.
        let m = FixedAdvanceMetrics::new(10, 20);
        let lines = wrap("aa bb cc dd", &m, 50, 0).unwrap();
        assert_eq!(texts(&lines), vec!["aa bb", "cc dd"]);
    }

    #[test]
    fn exact_fit_is_accepted() {
        let m = FixedAdvanceMetrics::new(10, 20);
        let lines = wrap("aa bb", &m, 50, 0).unwrap();
        assert_eq!(texts(&lines), vec!["aa bb"]);
        let lines = wrap("aa bb", &m, 49, 0).unwrap();
        assert_eq!(texts(&lines), vec!["aa", "bb"]);
    }

    #[test]
    fn stroke_widens_every_measurement() {
        // Each measured piece gains 2*stroke, so the 50 px budget no longer fits two words.
        let m = FixedAdvanceMetrics::new(10, 20);
        let lines = wrap("aa bb", &m, 50, 1).unwrap();
        assert_eq!(texts(&lines), vec!["aa", "bb"]);
    }

    #[test]
    fn words_are_preserved_in_order() {
        let m = FixedAdvanceMetrics::new(7, 20);
        let text = "the quick brown fox jumps over the lazy dog again and again";
        for max in [0, 10, 40, 90, 200, 10_000] {
            let lines = wrap(text, &m, max, 2).unwrap();
            let rejoined: Vec<String> = lines.iter().flat_map(|l| l.words.clone()).collect();
            let original: Vec<String> = text.split_whitespace().map(str::to_owned).collect();
            assert_eq!(rejoined, original, "max_width {max}");
            for line in &lines {
                let w = m.text_width(&line.text(), 2).unwrap();
                assert!(w <= max || line.words.len() == 1, "line '{}'", line.text());
            }
        }
    }

    #[test]
    fn negative_max_width_is_rejected() {
        let m = FixedAdvanceMetrics::new(10, 20);
        let err = wrap("a", &m, -1, 0).unwrap_err();
        assert!(matches!(err, ReelError::InvalidArgument(_)));
    }

    struct Failing;

    impl GlyphMetrics for Failing {
        fn text_box(&self, _text: &str, _stroke_width: u32) -> ReelResult<TextBox> {
            Err(ReelError::font("no glyphs"))
        }
    }

    #[test]
    fn provider_errors_propagate() {
        let err = wrap("hello world", &Failing, 100, 0).unwrap_err();
        assert!(matches!(err, ReelError::Font(_)));
        // Empty text never consults the provider.
        assert!(wrap("", &Failing, 100, 0).is_ok());
    }
}
