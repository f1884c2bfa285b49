use std::io::BufWriter;
use std::path::Path;

use anyhow::Context;

use crate::assets::decode::RasterImage;
use crate::encode::ffmpeg::ensure_parent_dir;
use crate::foundation::error::ReelResult;

/// Write `img` as a straight-alpha PNG.
pub fn save_png(img: &RasterImage, path: &Path) -> ReelResult<()> {
    ensure_parent_dir(path)?;
    img.to_rgba_image()?
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Write `img` as a baseline JPEG; alpha is flattened over black.
pub fn save_jpeg(img: &RasterImage, path: &Path, quality: u8) -> ReelResult<()> {
    ensure_parent_dir(path)?;
    let rgb = img.to_rgb_image()?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("create jpeg '{}'", path.display()))?;
    let mut encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(BufWriter::new(file), quality);
    encoder
        .encode_image(&rgb)
        .with_context(|| format!("encode jpeg '{}'", path.display()))?;
    Ok(())
}
