use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{ReelError, ReelResult};

/// Decoded raster in premultiplied RGBA8, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Vec<u8>,
}

impl RasterImage {
    /// Fully transparent image.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba8_premul: vec![0u8; (width as usize) * (height as usize) * 4],
        }
    }

    /// Image filled with one premultiplied colour.
    pub fn filled(width: u32, height: u32, premul: [u8; 4]) -> Self {
        let mut out = Self::transparent(width, height);
        for px in out.rgba8_premul.chunks_exact_mut(4) {
            px.copy_from_slice(&premul);
        }
        out
    }

    /// Convert a straight-alpha image into premultiplied form.
    ///
    /// With `keep_alpha == false` the source is treated as opaque (JPEG-like sources).
    pub fn from_dynamic(img: &image::DynamicImage, keep_alpha: bool) -> Self {
        let rgba = if keep_alpha {
            img.to_rgba8()
        } else {
            image::DynamicImage::ImageRgb8(img.to_rgb8()).to_rgba8()
        };
        let (width, height) = rgba.dimensions();
        let mut rgba8_premul = rgba.into_raw();
        premultiply_rgba8_in_place(&mut rgba8_premul);
        Self {
            width,
            height,
            rgba8_premul,
        }
    }

    /// Straight-alpha copy, suitable for PNG output.
    pub fn to_rgba_image(&self) -> ReelResult<image::RgbaImage> {
        let mut straight = self.rgba8_premul.clone();
        unpremultiply_rgba8_in_place(&mut straight);
        image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| ReelError::evaluation("raster byte len mismatch"))
    }

    /// Opaque RGB copy; alpha is dropped after flattening over black.
    pub fn to_rgb_image(&self) -> ReelResult<image::RgbImage> {
        let expected = (self.width as usize) * (self.height as usize) * 4;
        if self.rgba8_premul.len() != expected {
            return Err(ReelError::evaluation("raster byte len mismatch"));
        }
        let rgb: Vec<u8> = self
            .rgba8_premul
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        image::RgbImage::from_raw(self.width, self.height, rgb)
            .ok_or_else(|| ReelError::evaluation("raster byte len mismatch"))
    }
}

/// Open and decode an image file.
pub fn load_image(path: &Path) -> ReelResult<image::DynamicImage> {
    let img = image::open(path).with_context(|| format!("decode image '{}'", path.display()))?;
    Ok(img)
}

/// Whether a path names a PNG file (case-insensitive extension check).
pub fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

/// Largest size with the same aspect ratio that fits in `max_width x max_height`.
///
/// The image is scaled up as well as down; the constrained side hits its bound exactly.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (max_width.max(1), max_height.max(1));
    }
    let aspect = f64::from(width) / f64::from(height);
    let (w, h) = if f64::from(width) / f64::from(max_width) > f64::from(height) / f64::from(max_height)
    {
        (max_width, (f64::from(max_width) / aspect) as u32)
    } else {
        ((f64::from(max_height) * aspect) as u32, max_height)
    };
    (w.max(1), h.max(1))
}

/// Resize with Lanczos filtering so the image fits in `max_width x max_height`.
pub fn resize_to_fit(
    img: &image::DynamicImage,
    max_width: u32,
    max_height: u32,
) -> image::DynamicImage {
    let (w, h) = fit_within(img.width(), img.height(), max_width, max_height);
    img.resize_exact(w, h, image::imageops::FilterType::Lanczos3)
}

pub fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}
