use std::path::Path;

use crate::assets::decode::{RasterImage, load_image, resize_to_fit};
use crate::foundation::core::{Canvas, Rgba8};
use crate::reel::config::MaxSize;
use crate::reel::timeline::Timeline;
use crate::render::composite::{blit_over, centered_offset};

/// Pre-rendered layers of a reel, bottom to top.
#[derive(Clone, Debug)]
pub struct ReelLayers {
    /// Opaque, canvas sized.
    pub background: RasterImage,
    /// One per timeline slide.
    pub slides: Vec<RasterImage>,
    /// Logo frame overlay shown for the whole reel.
    pub frame: Option<RasterImage>,
    /// One canvas-sized caption image per timeline caption.
    pub captions: Vec<RasterImage>,
}

/// Background image stretched to the canvas, or a solid colour when it is missing or unreadable.
pub fn load_background(path: &Path, canvas: Canvas, fallback: Rgba8) -> RasterImage {
    let solid = || {
        RasterImage::filled(
            canvas.width,
            canvas.height,
            fallback.with_alpha(255).to_premul(),
        )
    };
    if !path.exists() {
        tracing::info!(path = %path.display(), "background not found, using solid colour");
        return solid();
    }
    match load_image(path) {
        Ok(img) => {
            let resized =
                img.resize_exact(canvas.width, canvas.height, image::imageops::FilterType::Lanczos3);
            RasterImage::from_dynamic(&resized, false)
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "failed to load background, using solid colour");
            solid()
        }
    }
}

/// Logo frame overlay scaled to fit `max`, if present and readable.
pub fn load_frame_overlay(path: &Path, max: MaxSize) -> Option<RasterImage> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "logo frame not found, skipping");
        return None;
    }
    match load_image(path) {
        Ok(img) => {
            let scaled = resize_to_fit(&img, max.width, max.height);
            Some(RasterImage::from_dynamic(&scaled, true))
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "failed to load logo frame, skipping");
            None
        }
    }
}

/// Compose the reel at time `t`.
pub fn compose_at(t: f64, timeline: &Timeline, layers: &ReelLayers) -> RasterImage {
    let mut out = layers.background.clone();
    let canvas = (out.width, out.height);

    for (clip, slide) in timeline.slides.iter().zip(&layers.slides) {
        let opacity = clip.opacity(t);
        if opacity > 0.0 {
            let (x, y) = centered_offset(canvas, (slide.width, slide.height));
            blit_over(&mut out, slide, x, y, opacity);
        }
    }

    if let Some(frame) = &layers.frame {
        let (x, y) = centered_offset(canvas, (frame.width, frame.height));
        blit_over(&mut out, frame, x, y, 1.0);
    }

    for (caption, img) in timeline.captions.iter().zip(&layers.captions) {
        let opacity = caption.clip.opacity(t);
        if opacity > 0.0 {
            blit_over(&mut out, img, 0, 0, opacity);
        }
    }
    out
}
