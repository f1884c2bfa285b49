//! Abstract gradient backgrounds for reels.
//!
//! A background is a vertical three-stop gradient with optional decorative shapes painted over it
//! with translucent colours.

use std::path::Path;

use crate::assets::color::parse_hex;
use crate::assets::decode::RasterImage;
use crate::assets::export::save_jpeg;
use crate::foundation::core::{Canvas, Rgba8, Rng64};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::composite::blit_over;
use crate::render::painter::Painter;

pub const DEFAULT_COLORS: [&str; 3] = ["#1E3A8A", "#10B981", "#F3F4F6"];
pub const JPEG_QUALITY: u8 = 95;

const WAVE_COLOR: Rgba8 = Rgba8::rgba(255, 255, 255, 100);
const PARTICLE_COLOR: Rgba8 = Rgba8::rgba(96, 165, 250, 80);
const LINE_COLOR: Rgba8 = Rgba8::rgba(16, 185, 129, 120);

/// Decorative shape set drawn over the gradient.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Variation {
    /// Translucent white bands across the bottom.
    #[serde(alias = "ondas")]
    #[value(alias = "ondas")]
    Waves,
    /// Light-blue dots scattered over the upper half.
    #[serde(alias = "partículas", alias = "particulas")]
    #[value(alias = "partículas", alias = "particulas")]
    Particles,
    /// Slanted mint-green strokes on the left.
    #[serde(alias = "líneas", alias = "lineas")]
    #[value(alias = "líneas", alias = "lineas")]
    Lines,
    /// All of the above.
    #[default]
    #[serde(alias = "mixto")]
    #[value(alias = "mixto")]
    Mixed,
}

impl Variation {
    fn waves(self) -> bool {
        matches!(self, Self::Waves | Self::Mixed)
    }

    fn particles(self) -> bool {
        matches!(self, Self::Particles | Self::Mixed)
    }

    fn lines(self) -> bool {
        matches!(self, Self::Lines | Self::Mixed)
    }
}

/// Expand 1 to 3 hex colours into exactly three gradient stops.
///
/// Colours past the third are ignored and missing ones repeat the last given colour. Alpha is
/// dropped.
pub fn gradient_stops<S: AsRef<str>>(colors: &[S]) -> ReelResult<[Rgba8; 3]> {
    let parsed = colors
        .iter()
        .take(3)
        .map(|c| parse_hex(c.as_ref()).map(|c| c.with_alpha(255)))
        .collect::<ReelResult<Vec<_>>>()?;
    let Some(&last) = parsed.last() else {
        return Err(ReelError::validation(
            "at least one background colour is required",
        ));
    };
    let stop = |i: usize| parsed.get(i).copied().unwrap_or(last);
    Ok([stop(0), stop(1), stop(2)])
}

/// Gradient colour of row `y` on a canvas `height` rows tall.
pub fn gradient_row(stops: &[Rgba8; 3], y: u32, height: u32) -> Rgba8 {
    let t = f64::from(y) / f64::from(height.max(1));
    let (from, to, f) = if t < 0.5 {
        (stops[0], stops[1], t * 2.0)
    } else {
        (stops[1], stops[2], (t - 0.5) * 2.0)
    };
    let lerp = |a: u8, b: u8| -> u8 {
        let v = f64::from(a) + (f64::from(b) - f64::from(a)) * f;
        v.trunc().clamp(0.0, 255.0) as u8
    };
    Rgba8::rgb(lerp(from.r, to.r), lerp(from.g, to.g), lerp(from.b, to.b))
}

/// Opaque gradient filling `canvas`.
pub fn render_gradient(canvas: Canvas, stops: &[Rgba8; 3]) -> RasterImage {
    let mut img = RasterImage::transparent(canvas.width, canvas.height);
    let row_len = canvas.width as usize * 4;
    if row_len == 0 {
        return img;
    }
    for (y, row) in img.rgba8_premul.chunks_exact_mut(row_len).enumerate() {
        let c = gradient_row(stops, y as u32, canvas.height).to_array();
        for px in row.chunks_exact_mut(4) {
            px.copy_from_slice(&c);
        }
    }
    img
}

/// Paint the shapes of `variation` for a canvas of the painter's size.
pub fn paint_shapes(painter: &mut Painter, canvas: Canvas, variation: Variation, rng: &mut Rng64) {
    let w = canvas.width as i32;
    let h = canvas.height as i32;

    if variation.waves() {
        let mut y = h - 400;
        while y < h {
            painter.fill_rect(50, y, w - 50, y + 40, WAVE_COLOR);
            y += 60;
        }
    }

    if variation.particles() {
        for _ in 0..30 {
            let x = rng.range_i64(100, i64::from(w - 100)) as i32;
            let y = rng.range_i64(100, i64::from(h / 2)) as i32;
            let r = rng.range_i64(5, 20) as i32;
            painter.fill_circle(x, y, r, PARTICLE_COLOR);
        }
    }

    if variation.lines() {
        for x in (50..150).step_by(30) {
            painter.polyline(&[(x, h / 2), (x + 50, h - 200)], 10, LINE_COLOR);
        }
    }
}

/// Options for [`generate_background`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackgroundOpts {
    pub canvas: Canvas,
    pub colors: Vec<String>,
    pub variation: Variation,
    /// Seed for particle placement; `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl Default for BackgroundOpts {
    fn default() -> Self {
        Self {
            canvas: Canvas::VERTICAL_HD,
            colors: DEFAULT_COLORS.iter().map(|c| (*c).to_owned()).collect(),
            variation: Variation::Mixed,
            seed: None,
        }
    }
}

/// Render a background image.
#[tracing::instrument(skip(opts), fields(variation = ?opts.variation))]
pub fn generate_background(opts: &BackgroundOpts) -> ReelResult<RasterImage> {
    opts.canvas.validate()?;
    let stops = gradient_stops(&opts.colors)?;
    let mut img = render_gradient(opts.canvas, &stops);

    let mut rng = match opts.seed {
        Some(seed) => Rng64::new(seed),
        None => Rng64::from_time(),
    };
    let mut painter = Painter::new(opts.canvas.width, opts.canvas.height)?;
    paint_shapes(&mut painter, opts.canvas, opts.variation, &mut rng);
    blit_over(&mut img, &painter.finish(), 0, 0, 1.0);
    Ok(img)
}

/// Render a background and save it as JPEG.
pub fn write_background(opts: &BackgroundOpts, path: &Path) -> ReelResult<()> {
    let img = generate_background(opts)?;
    save_jpeg(&img, path, JPEG_QUALITY)?;
    tracing::info!(path = %path.display(), "background written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(img: &RasterImage, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * img.width + x) * 4) as usize;
        img.rgba8_premul[i..i + 4].try_into().unwrap()
    }

    #[test]
    fn stops_repeat_last_and_ignore_extra() {
        let one = gradient_stops(&["#102030"]).unwrap();
        assert_eq!(one, [Rgba8::rgb(16, 32, 48); 3]);

        let four = gradient_stops(&["000000", "#FFFFFF", "#FF0000", "#00FF00"]).unwrap();
        assert_eq!(four[2], Rgba8::rgb(255, 0, 0));

        assert!(gradient_stops::<&str>(&[]).is_err());
        assert!(matches!(
            gradient_stops(&["#12"]),
            Err(ReelError::Validation(_))
        ));
    }

    #[test]
    fn gradient_endpoints_and_midpoint() {
        let stops = [
            Rgba8::rgb(0, 0, 0),
            Rgba8::rgb(200, 100, 50),
            Rgba8::rgb(255, 255, 255),
        ];
        assert_eq!(gradient_row(&stops, 0, 100), Rgba8::rgb(0, 0, 0));
        assert_eq!(gradient_row(&stops, 50, 100), Rgba8::rgb(200, 100, 50));
        assert_eq!(gradient_row(&stops, 25, 100), Rgba8::rgb(100, 50, 25));
        // The last row approaches but never reaches the third stop.
        let last = gradient_row(&stops, 99, 100);
        assert!(last.r >= 253 && last.r < 255);
    }

    #[test]
    fn descending_gradient_truncates_towards_zero() {
        let stops = [Rgba8::rgb(255, 255, 255), Rgba8::rgb(0, 0, 0), Rgba8::rgb(0, 0, 0)];
        // 255 - 255 * (2 * 1/3) = 85.0
        assert_eq!(gradient_row(&stops, 1, 3).r, 85);
    }

    #[test]
    fn variation_aliases_parse() {
        use clap::ValueEnum;
        assert_eq!(Variation::from_str("ondas", false).unwrap(), Variation::Waves);
        assert_eq!(
            Variation::from_str("partículas", false).unwrap(),
            Variation::Particles
        );
        assert_eq!(Variation::from_str("líneas", false).unwrap(), Variation::Lines);
        assert_eq!(Variation::from_str("mixto", false).unwrap(), Variation::Mixed);
        let v: Variation = serde_json::from_str("\"ondas\"").unwrap();
        assert_eq!(v, Variation::Waves);
    }

    #[test]
    fn waves_brighten_bottom_band() {
        let opts = BackgroundOpts {
            canvas: Canvas {
                width: 200,
                height: 500,
            },
            colors: vec!["#000000".into()],
            variation: Variation::Waves,
            seed: Some(1),
        };
        let img = generate_background(&opts).unwrap();
        // First band spans rows 100..=140 between columns 50 and 150.
        let band = px(&img, 100, 120);
        assert!((99..=101).contains(&band[0]), "{band:?}");
        assert_eq!(band[3], 255);
        assert_eq!(px(&img, 10, 120), [0, 0, 0, 255]);
        assert_eq!(px(&img, 100, 150), [0, 0, 0, 255]);
    }

    #[test]
    fn seeded_backgrounds_are_reproducible() {
        let opts = BackgroundOpts {
            canvas: Canvas {
                width: 300,
                height: 600,
            },
            seed: Some(7),
            ..BackgroundOpts::default()
        };
        let a = generate_background(&opts).unwrap();
        let b = generate_background(&opts).unwrap();
        assert_eq!(a, b);
        assert!(a.rgba8_premul.chunks_exact(4).all(|p| p[3] == 255));
    }
}
