use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::caption::metrics::{GlyphMetrics, TextBox};
use crate::foundation::error::{ReelError, ReelResult};

/// Font weight/slant variant, selected through the font file name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[derive(clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    #[serde(alias = "bolditalic")]
    #[value(name = "bolditalic", alias = "bold-italic")]
    BoldItalic,
}

impl FontStyle {
    fn suffix(self) -> &'static str {
        match self {
            Self::Regular => "",
            Self::Bold => "b",
            Self::Italic => "i",
            Self::BoldItalic => "z",
        }
    }

    /// Derive the file name of this style's face from a base font file name.
    ///
    /// A trailing `b`, `i` or `z` on the base name is taken as a style letter and replaced, so
    /// `arialb.ttf` in italic becomes `ariali.ttf`. Names whose last letter is part of the family
    /// (`segoeui.ttf` becomes `segoeub.ttf`) are covered by [`FontStyle::file_name_candidates`].
    pub fn apply_to_file_name(self, file_name: &str) -> String {
        let base = file_name.replace(".ttf", "");
        if self == Self::Regular {
            return format!("{base}.ttf");
        }
        let base = match base.strip_suffix(|c| matches!(c, 'b' | 'i' | 'z')) {
            Some(stripped) => stripped,
            None => base.as_str(),
        };
        format!("{base}{}.ttf", self.suffix())
    }

    /// File names to try for this style, most specific first: the suffix appended to the full
    /// base name (`segoeuib.ttf`), then [`FontStyle::apply_to_file_name`].
    pub fn file_name_candidates(self, file_name: &str) -> Vec<String> {
        let replaced = self.apply_to_file_name(file_name);
        if self == Self::Regular {
            return vec![replaced];
        }
        let appended = format!("{}{}.ttf", file_name.replace(".ttf", ""), self.suffix());
        if appended == replaced {
            vec![replaced]
        } else {
            vec![appended, replaced]
        }
    }
}

/// Directories searched for fonts given by bare file name.
pub fn platform_font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if cfg!(windows) {
        let root = std::env::var_os("WINDIR").unwrap_or_else(|| "C:\\Windows".into());
        dirs.push(PathBuf::from(root).join("Fonts"));
    } else if cfg!(target_os = "macos") {
        dirs.push(PathBuf::from("/Library/Fonts"));
        dirs.push(PathBuf::from("/System/Library/Fonts"));
        dirs.push(PathBuf::from("/System/Library/Fonts/Supplemental"));
    } else {
        dirs.push(PathBuf::from("/usr/share/fonts/truetype/dejavu"));
        dirs.push(PathBuf::from("/usr/share/fonts/truetype/liberation"));
        dirs.push(PathBuf::from("/usr/share/fonts/TTF"));
        dirs.push(PathBuf::from("/usr/share/fonts"));
    }
    dirs
}

const FALLBACK_FONTS: &[&str] = &[
    "DejaVuSans.ttf",
    "LiberationSans-Regular.ttf",
    "arial.ttf",
    "Arial.ttf",
    "segoeui.ttf",
];

/// Outcome of [`resolve_font_path`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedFont {
    pub path: PathBuf,
    /// The requested font was not found and a fallback face was picked instead.
    pub is_fallback: bool,
}

/// Locate a font file for `requested` in `style`.
///
/// Tries the style-adjusted names, then the name as given, each as a direct path and inside
/// `search_dirs` followed by the platform font directories. Falls back to a fixed list of common
/// sans-serif faces.
pub fn resolve_font_path(
    requested: &str,
    style: FontStyle,
    search_dirs: &[PathBuf],
) -> ReelResult<ResolvedFont> {
    let mut dirs: Vec<PathBuf> = search_dirs.to_vec();
    dirs.extend(platform_font_dirs());

    let mut names = style.file_name_candidates(requested);
    if !names.iter().any(|n| n == requested) {
        names.push(requested.to_owned());
    }

    for name in &names {
        if let Some(path) = find_in(name, &dirs) {
            return Ok(ResolvedFont {
                path,
                is_fallback: false,
            });
        }
    }

    for name in FALLBACK_FONTS {
        if let Some(path) = find_in(name, &dirs) {
            tracing::warn!(
                requested,
                fallback = %path.display(),
                "font not found, using fallback"
            );
            return Ok(ResolvedFont {
                path,
                is_fallback: true,
            });
        }
    }

    Err(ReelError::font(format!(
        "font '{requested}' not found and no fallback font is installed"
    )))
}

fn find_in(name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    let direct = Path::new(name);
    if direct.is_file() {
        return Some(direct.to_path_buf());
    }
    dirs.iter().map(|d| d.join(name)).find(|p| p.is_file())
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct PlainBrush;

struct ShapingContexts {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<PlainBrush>,
}

/// A glyph in a shaped line: pen position on the baseline, relative to the line's top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedGlyph {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

/// A single line of text shaped into glyphs.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapedLine {
    pub glyphs: Vec<PlacedGlyph>,
    pub font_size: f32,
    pub width: f32,
    pub height: f32,
}

/// A font file loaded at a fixed pixel size.
///
/// Implements [`GlyphMetrics`] through parley shaping. Not `Sync`: shaping reuses interior
/// contexts.
pub struct LoadedFont {
    path: PathBuf,
    bytes: Vec<u8>,
    family_name: String,
    size_px: f32,
    font_data: vello_cpu::peniko::FontData,
    ctx: RefCell<ShapingContexts>,
}

impl std::fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedFont")
            .field("path", &self.path)
            .field("family_name", &self.family_name)
            .field("size_px", &self.size_px)
            .finish()
    }
}

impl LoadedFont {
    pub fn load(path: &Path, size_px: f32) -> ReelResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            ReelError::font(format!("failed to read font '{}': {e}", path.display()))
        })?;
        Self::from_bytes(path.to_path_buf(), bytes, size_px)
    }

    pub fn from_bytes(path: PathBuf, bytes: Vec<u8>, size_px: f32) -> ReelResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ReelError::invalid_argument(
                "font size_px must be finite and > 0",
            ));
        }

        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ReelError::font(format!("no font families in '{}'", path.display())))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ReelError::font("registered font family has no name"))?
            .to_string();

        tracing::debug!(path = %path.display(), family = %family_name, size_px, "loaded font");
        let font_data =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes.clone()), 0);
        Ok(Self {
            path,
            bytes,
            family_name,
            size_px,
            font_data,
            ctx: RefCell::new(ShapingContexts {
                font_ctx,
                layout_ctx: parley::LayoutContext::new(),
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    /// Font handle for glyph rasterization.
    pub fn font_data(&self) -> &vello_cpu::peniko::FontData {
        &self.font_data
    }

    /// Shape `text` as one unbroken line.
    pub fn shape_line(&self, text: &str) -> ReelResult<ShapedLine> {
        let mut guard = self.ctx.borrow_mut();
        let ShapingContexts {
            font_ctx,
            layout_ctx,
        } = &mut *guard;

        let mut builder = layout_ctx.ranged_builder(font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(PlainBrush));

        let mut layout: parley::Layout<PlainBrush> = builder.build(text);
        layout.break_all_lines(None);

        let mut glyphs = Vec::new();
        let mut font_size = self.size_px;
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                font_size = run.run().font_size();
                glyphs.extend(run.positioned_glyphs().map(|g| PlacedGlyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }));
            }
        }

        Ok(ShapedLine {
            glyphs,
            font_size,
            // Trailing whitespace counts: a lone space must measure its advance.
            width: layout.full_width(),
            height: layout.height(),
        })
    }
}

impl GlyphMetrics for LoadedFont {
    fn text_box(&self, text: &str, stroke_width: u32) -> ReelResult<TextBox> {
        let shaped = self.shape_line(text)?;
        let s = stroke_width as i32;
        Ok(TextBox {
            left: 0,
            top: 0,
            right: shaped.width.ceil() as i32 + 2 * s,
            bottom: shaped.height.ceil() as i32 + 2 * s,
        })
    }
}
