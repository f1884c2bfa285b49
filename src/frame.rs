//! Reusable logo frames: a transparent overlay with a decorative border in the logo's colours.

use std::path::{Path, PathBuf};

use crate::assets::decode::{RasterImage, is_png, load_image};
use crate::assets::export::save_png;
use crate::assets::palette::dominant_colors;
use crate::foundation::core::{Canvas, Rgba8, Rng64};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::composite::blit_over;
use crate::render::painter::Painter;

const BORDER_ALPHA: u8 = 200;
const ACCENT_ALPHA: u8 = 150;
const PALETTE_SIZE: usize = 3;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum FrameStyle {
    /// Thick border, a zig-zag accent under the logo and a few dots top-right.
    #[default]
    #[serde(alias = "moderno")]
    #[value(alias = "moderno")]
    Modern,
    /// Double border, a rule under a centred logo.
    #[serde(alias = "clásico", alias = "clasico")]
    #[value(alias = "clásico", alias = "clasico")]
    Classic,
    /// Heavy border, rings near the bottom, logo bottom-right.
    #[serde(alias = "futurista")]
    #[value(alias = "futurista")]
    Futuristic,
    /// Thin border, small logo top-left.
    #[serde(alias = "minimalista")]
    #[value(alias = "minimalista")]
    Minimal,
}

impl FrameStyle {
    pub fn default_logo_width(self) -> u32 {
        match self {
            Self::Modern | Self::Futuristic => 350,
            Self::Classic => 400,
            Self::Minimal => 250,
        }
    }
}

/// Border and accent colours derived from a logo palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameColors {
    pub border: Rgba8,
    pub accent: Rgba8,
}

impl FrameColors {
    /// First palette colour for the border, second for accents; a single colour serves both.
    pub fn from_palette(palette: &[Rgba8]) -> ReelResult<Self> {
        let first = palette
            .first()
            .copied()
            .ok_or_else(|| ReelError::validation("frame palette is empty"))?;
        let second = palette.get(1).copied().unwrap_or(first);
        Ok(Self {
            border: first.with_alpha(BORDER_ALPHA),
            accent: second.with_alpha(ACCENT_ALPHA),
        })
    }
}

/// Options for [`generate_frame`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameOpts {
    pub canvas: Canvas,
    pub logo: PathBuf,
    pub style: FrameStyle,
    /// Logo width in pixels; `None` uses the style's default.
    pub logo_width: Option<u32>,
    /// Seed for accent scatter; `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl FrameOpts {
    pub fn new(logo: impl Into<PathBuf>) -> Self {
        Self {
            canvas: Canvas::VERTICAL_HD,
            logo: logo.into(),
            style: FrameStyle::default(),
            logo_width: None,
            seed: None,
        }
    }
}

/// Check that `path` names an existing PNG logo.
pub fn validate_logo_path(path: &Path) -> ReelResult<()> {
    if !is_png(path) {
        return Err(ReelError::validation(format!(
            "logo must be a PNG file, got '{}'",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(ReelError::validation(format!(
            "logo not found at '{}'",
            path.display()
        )));
    }
    Ok(())
}

/// Scale `logo` to `width` pixels wide, keeping its aspect ratio.
pub fn scale_logo(logo: &image::DynamicImage, width: u32) -> ReelResult<RasterImage> {
    if width == 0 {
        return Err(ReelError::invalid_argument("logo width must be > 0"));
    }
    if logo.width() == 0 {
        return Err(ReelError::validation("logo image is empty"));
    }
    let height = (f64::from(logo.height()) * (f64::from(width) / f64::from(logo.width()))) as u32;
    let resized = logo.resize_exact(width, height.max(1), image::imageops::FilterType::Lanczos3);
    Ok(RasterImage::from_dynamic(&resized, true))
}

/// Draw the border and accents of `style` and place the already scaled `logo`.
pub fn compose_frame(
    canvas: Canvas,
    style: FrameStyle,
    colors: FrameColors,
    logo: &RasterImage,
    rng: &mut Rng64,
) -> ReelResult<RasterImage> {
    let w = canvas.width as i32;
    let h = canvas.height as i32;
    let lw = logo.width as i32;
    let lh = logo.height as i32;
    let FrameColors { border, accent } = colors;

    let mut painter = Painter::new(canvas.width, canvas.height)?;
    let logo_at = match style {
        FrameStyle::Modern => {
            painter.outline_rect(20, 20, w - 20, h - 20, 8, border);
            painter.polyline(
                &[(50, 150 + lh), (150, 250 + lh), (100, 300 + lh)],
                5,
                accent,
            );
            for _ in 0..10 {
                let x = rng.range_i64(i64::from(w - 150), i64::from(w - 50)) as i32;
                let y = rng.range_i64(50, 300) as i32;
                let r = rng.range_i64(3, 10) as i32;
                painter.fill_circle(x, y, r, accent);
            }
            (50, 50)
        }
        FrameStyle::Classic => {
            painter.outline_rect(15, 15, w - 15, h - 15, 5, border);
            painter.outline_rect(30, 30, w - 30, h - 30, 3, border);
            painter.polyline(&[(50, 100 + lh), (w - 50, 100 + lh)], 4, accent);
            ((w - lw).div_euclid(2), 50)
        }
        FrameStyle::Futuristic => {
            painter.outline_rect(25, 25, w - 25, h - 25, 12, border);
            for _ in 0..5 {
                let x = rng.range_i64(50, i64::from(w - 50)) as i32;
                let y = rng.range_i64(i64::from(h - 300), i64::from(h - 50)) as i32;
                painter.outline_circle(x, y, 15, 3, accent);
            }
            (w - lw - 50, h - lh - 50)
        }
        FrameStyle::Minimal => {
            painter.outline_rect(10, 10, w - 10, h - 10, 4, border);
            (30, 30)
        }
    };

    let mut out = painter.finish();
    blit_over(&mut out, logo, i64::from(logo_at.0), i64::from(logo_at.1), 1.0);
    Ok(out)
}

/// Build a frame overlay from a logo file.
#[tracing::instrument(skip(opts), fields(logo = %opts.logo.display(), style = ?opts.style))]
pub fn generate_frame(opts: &FrameOpts) -> ReelResult<RasterImage> {
    validate_logo_path(&opts.logo)?;
    opts.canvas.validate()?;

    let logo = load_image(&opts.logo)?;
    let palette = dominant_colors(&logo.to_rgba8(), PALETTE_SIZE);
    let colors = FrameColors::from_palette(&palette)?;
    tracing::debug!(?palette, "logo palette");

    let logo_width = opts
        .logo_width
        .unwrap_or_else(|| opts.style.default_logo_width());
    let scaled = scale_logo(&logo, logo_width)?;

    let mut rng = match opts.seed {
        Some(seed) => Rng64::new(seed),
        None => Rng64::from_time(),
    };
    compose_frame(opts.canvas, opts.style, colors, &scaled, &mut rng)
}

/// Build a frame overlay and save it as PNG.
pub fn write_frame(opts: &FrameOpts, path: &Path) -> ReelResult<()> {
    let img = generate_frame(opts)?;
    save_png(&img, path)?;
    tracing::info!(path = %path.display(), "frame written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(img: &RasterImage, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * img.width + x) * 4) as usize;
        img.rgba8_premul[i..i + 4].try_into().unwrap()
    }

    fn red_logo(w: u32, h: u32) -> image::DynamicImage {
        image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            w,
            h,
            image::Rgba([255, 0, 0, 255]),
        ))
    }

    #[test]
    fn default_logo_widths() {
        assert_eq!(FrameStyle::Modern.default_logo_width(), 350);
        assert_eq!(FrameStyle::Futuristic.default_logo_width(), 350);
        assert_eq!(FrameStyle::Classic.default_logo_width(), 400);
        assert_eq!(FrameStyle::Minimal.default_logo_width(), 250);
    }

    #[test]
    fn style_aliases_parse() {
        use clap::ValueEnum;
        assert_eq!(
            FrameStyle::from_str("clásico", false).unwrap(),
            FrameStyle::Classic
        );
        assert_eq!(
            FrameStyle::from_str("minimalista", false).unwrap(),
            FrameStyle::Minimal
        );
        let s: FrameStyle = serde_json::from_str("\"futurista\"").unwrap();
        assert_eq!(s, FrameStyle::Futuristic);
    }

    #[test]
    fn colors_from_palette() {
        let c = FrameColors::from_palette(&[Rgba8::rgb(1, 2, 3), Rgba8::rgb(4, 5, 6)]).unwrap();
        assert_eq!(c.border, Rgba8::rgba(1, 2, 3, 200));
        assert_eq!(c.accent, Rgba8::rgba(4, 5, 6, 150));

        let single = FrameColors::from_palette(&[Rgba8::rgb(9, 9, 9)]).unwrap();
        assert_eq!(single.accent, Rgba8::rgba(9, 9, 9, 150));
        assert!(FrameColors::from_palette(&[]).is_err());
    }

    #[test]
    fn logo_path_checks() {
        assert!(matches!(
            validate_logo_path(Path::new("logo.jpg")),
            Err(ReelError::Validation(_))
        ));
        assert!(validate_logo_path(Path::new("/definitely/not/here/logo.png")).is_err());
    }

    #[test]
    fn logo_scaling_keeps_aspect() {
        let scaled = scale_logo(&red_logo(200, 100), 350).unwrap();
        assert_eq!((scaled.width, scaled.height), (350, 175));
        assert!(scale_logo(&red_logo(2, 2), 0).is_err());
    }

    #[test]
    fn minimal_frame_layout() {
        let canvas = Canvas {
            width: 200,
            height: 300,
        };
        let colors = FrameColors::from_palette(&[Rgba8::rgb(0, 0, 255)]).unwrap();
        let logo = scale_logo(&red_logo(4, 2), 20).unwrap();
        let img =
            compose_frame(canvas, FrameStyle::Minimal, colors, &logo, &mut Rng64::new(0)).unwrap();

        // Border band spans 10..=13 from each edge.
        assert!((199..=201).contains(&px(&img, 100, 11)[3]));
        assert_eq!(px(&img, 100, 15), [0, 0, 0, 0]);
        // Logo pasted at (30, 30).
        assert_eq!(px(&img, 35, 35), [255, 0, 0, 255]);
        assert_eq!(px(&img, 100, 100), [0, 0, 0, 0]);
    }

    #[test]
    fn futuristic_logo_sits_bottom_right() {
        let canvas = Canvas {
            width: 400,
            height: 600,
        };
        let colors = FrameColors::from_palette(&[Rgba8::rgb(0, 255, 0)]).unwrap();
        let logo = scale_logo(&red_logo(10, 10), 40).unwrap();
        let img = compose_frame(
            canvas,
            FrameStyle::Futuristic,
            colors,
            &logo,
            &mut Rng64::new(3),
        )
        .unwrap();
        // Logo covers x 310..350, y 510..550.
        assert_eq!(px(&img, 330, 530), [255, 0, 0, 255]);
        assert_eq!(px(&img, 355, 530)[0], 0);
    }
}
