use std::path::{Path, PathBuf};

use crate::assets::decode::{RasterImage, is_png, load_image, resize_to_fit};
use crate::foundation::error::{ReelError, ReelResult};
use crate::reel::config::MaxSize;

/// Captions from a script file: one per non-blank line, trimmed.
pub fn read_script(path: &Path) -> ReelResult<Vec<String>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        ReelError::validation(format!("read script '{}': {e}", path.display()))
    })?;
    Ok(parse_script(&text))
}

pub fn parse_script(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_owned)
        .collect()
}

fn is_slide_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("png"))
}

/// `.jpg` and `.png` files directly inside `dir`, sorted by file name.
pub fn discover_images(dir: &Path) -> ReelResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        ReelError::validation(format!("read images directory '{}': {e}", dir.display()))
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| ReelError::validation(format!("list '{}': {e}", dir.display())))?
            .path();
        if path.is_file() && is_slide_image(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Decode and scale every slide image, skipping the ones that fail.
///
/// PNG images keep their alpha channel, anything else is treated as opaque.
pub fn load_slides(paths: &[PathBuf], max: MaxSize) -> ReelResult<Vec<RasterImage>> {
    let mut slides = Vec::with_capacity(paths.len());
    for path in paths {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "image not found, skipping");
            continue;
        }
        match load_image(path) {
            Ok(img) => {
                let scaled = resize_to_fit(&img, max.width, max.height);
                slides.push(RasterImage::from_dynamic(&scaled, is_png(path)));
                tracing::debug!(path = %path.display(), w = scaled.width(), h = scaled.height(), "loaded image");
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "failed to load image, skipping");
            }
        }
    }

    if slides.is_empty() {
        return Err(ReelError::validation("no images could be loaded"));
    }
    Ok(slides)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("reelkit_script_{tag}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn script_lines_are_trimmed_and_blank_lines_dropped() {
        let lines = parse_script("  first caption \n\n\t\nsecond\r\n  ");
        assert_eq!(lines, vec!["first caption", "second"]);
    }

    #[test]
    fn missing_script_is_an_error() {
        assert!(read_script(Path::new("/definitely/not/here/script.txt")).is_err());
    }

    #[test]
    fn discovery_filters_and_sorts() {
        let dir = temp_dir("discover");
        for name in ["b.png", "a.jpg", "c.txt", "d.JPG"] {
            std::fs::write(dir.join(name), b"x").unwrap();
        }
        std::fs::create_dir_all(dir.join("nested.png")).unwrap();

        let found: Vec<String> = discover_images(&dir)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(found, vec!["a.jpg", "b.png", "d.JPG"]);
        assert!(discover_images(&dir.join("missing")).is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn broken_images_are_skipped() {
        let dir = temp_dir("slides");
        let good = dir.join("good.png");
        image::RgbaImage::from_pixel(40, 20, image::Rgba([0, 255, 0, 128]))
            .save(&good)
            .unwrap();
        let broken = dir.join("broken.jpg");
        std::fs::write(&broken, b"not an image").unwrap();
        let missing = dir.join("missing.png");

        let max = MaxSize {
            width: 80,
            height: 80,
        };
        let slides = load_slides(&[broken.clone(), good, missing.clone()], max).unwrap();
        assert_eq!(slides.len(), 1);
        assert_eq!((slides[0].width, slides[0].height), (80, 40));
        assert_eq!(slides[0].rgba8_premul[3], 128);

        assert!(load_slides(&[broken, missing], max).is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
