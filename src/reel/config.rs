use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::caption::layout::{CaptionConfig, HorizontalAlign};
use crate::foundation::core::{Canvas, Fps, Rgba8};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::caption::CaptionStyle;
use crate::text::font::FontStyle;

/// Bounding box an image is scaled to fit in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MaxSize {
    pub width: u32,
    pub height: u32,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum TextEffect {
    #[default]
    None,
    /// Fade in and out over [`ReelConfig::fade_secs`].
    Fade,
    /// Offset translucent black copy behind the text.
    Shadow,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ImageEffect {
    #[default]
    None,
    Fade,
}

/// Everything a reel render needs. Every field has a default, so a JSON file only has to name
/// what it changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReelConfig {
    pub canvas: Canvas,
    pub fps: u32,
    /// Seconds each image stays on screen.
    pub image_duration: f64,
    /// Seconds each caption stays on screen, from the start of its image.
    pub text_duration: f64,
    pub image_max: MaxSize,
    pub frame_max: MaxSize,
    /// Solid colour used when no background image is available.
    pub fallback_background: Rgba8,

    pub font: String,
    pub font_style: FontStyle,
    pub font_size: f32,
    /// Extra directories searched for `font` before the platform font directories.
    pub font_dirs: Vec<PathBuf>,

    pub text_color: Rgba8,
    pub text_bg_color: Rgba8,
    pub stroke_color: Rgba8,
    pub stroke_width: u32,
    /// Top of the caption block.
    pub caption_y: i32,
    pub text_effect: TextEffect,
    pub image_effect: ImageEffect,
    pub fade_secs: f64,

    pub script: PathBuf,
    /// Images in display order; when empty, `images_dir` is scanned.
    pub images: Vec<PathBuf>,
    pub images_dir: PathBuf,
    pub background: PathBuf,
    pub frame: PathBuf,
    pub music: PathBuf,
    pub output: PathBuf,
}

impl Default for ReelConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::VERTICAL_HD,
            fps: 24,
            image_duration: 4.0,
            text_duration: 3.5,
            image_max: MaxSize {
                width: 800,
                height: 800,
            },
            frame_max: MaxSize {
                width: 1000,
                height: 1800,
            },
            fallback_background: Rgba8::rgb(53, 94, 59),
            font: "segoeui.ttf".to_owned(),
            font_style: FontStyle::Regular,
            font_size: 50.0,
            font_dirs: Vec::new(),
            text_color: Rgba8::rgb(255, 255, 102),
            text_bg_color: Rgba8::rgba(0, 51, 102, 128),
            stroke_color: Rgba8::BLACK,
            stroke_width: 2,
            caption_y: 1500,
            text_effect: TextEffect::None,
            image_effect: ImageEffect::None,
            fade_secs: 0.5,
            script: PathBuf::from("script.txt"),
            images: Vec::new(),
            images_dir: PathBuf::from("images"),
            background: PathBuf::from("background.jpg"),
            frame: PathBuf::from("frame_logo.png"),
            music: PathBuf::from("background_music.mp3"),
            output: PathBuf::from("reel.mp4"),
        }
    }
}

impl ReelConfig {
    pub fn from_reader<R: std::io::Read>(r: R) -> ReelResult<Self> {
        serde_json::from_reader(r).map_err(|e| ReelError::serde(format!("parse reel config: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ReelError::validation(format!("open reel config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> ReelResult<()> {
        self.canvas.validate()?;
        if !self.canvas.width.is_multiple_of(2) || !self.canvas.height.is_multiple_of(2) {
            return Err(ReelError::validation(format!(
                "canvas {}x{} must have even dimensions for yuv420p output",
                self.canvas.width, self.canvas.height
            )));
        }
        self.fps()?;
        positive_secs("image_duration", self.image_duration)?;
        positive_secs("text_duration", self.text_duration)?;
        if !self.fade_secs.is_finite() || self.fade_secs < 0.0 {
            return Err(ReelError::validation("fade_secs must be finite and >= 0"));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(ReelError::validation("font_size must be finite and > 0"));
        }
        for (name, size) in [("image_max", self.image_max), ("frame_max", self.frame_max)] {
            if size.width == 0 || size.height == 0 {
                return Err(ReelError::validation(format!(
                    "{name} width/height must be non-zero"
                )));
            }
        }
        Ok(())
    }

    pub fn fps(&self) -> ReelResult<Fps> {
        Fps::new(self.fps, 1)
    }

    /// Caption geometry for this reel's canvas.
    pub fn caption_config(&self) -> CaptionConfig {
        CaptionConfig {
            stroke_width: self.stroke_width,
            align: HorizontalAlign::Center,
            origin_y: self.caption_y,
            ..CaptionConfig::for_canvas(self.canvas)
        }
    }

    pub fn caption_style(&self) -> CaptionStyle {
        CaptionStyle {
            text_color: self.text_color,
            bg_color: self.text_bg_color,
            stroke_color: self.stroke_color,
            shadow: self.text_effect == TextEffect::Shadow,
        }
    }
}

fn positive_secs(name: &str, v: f64) -> ReelResult<()> {
    if !v.is_finite() || v <= 0.0 {
        return Err(ReelError::validation(format!(
            "{name} must be finite and > 0, got {v}"
        )));
    }
    Ok(())
}
