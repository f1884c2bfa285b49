//! reelkit builds short vertical video reels for social media.
//!
//! - [`background`] paints gradient backgrounds with decorative shapes
//! - [`frame`] builds a transparent logo frame coloured after the logo's dominant colours
//! - [`reel`] assembles slides, captions, the frame and music into an MP4 through `ffmpeg`
//!
//! Captions are laid out by a small stateless engine ([`wrap`], [`measure`], [`pad_box`],
//! [`layout_caption`]) that takes its glyph geometry from any [`GlyphMetrics`] provider.
#![forbid(unsafe_code)]

mod assets;
mod foundation;
mod text;

pub(crate) mod caption;
/// Gradient background generator.
pub mod background;
/// Encoding sinks.
pub mod encode;
/// Logo frame generator.
pub mod frame;
/// Reel assembly.
pub mod reel;
/// CPU rasterization and compositing.
pub mod render;

pub use crate::assets::color::{parse_color, parse_hex, parse_rgb, parse_rgba};
pub use crate::assets::decode::{RasterImage, fit_within};
pub use crate::assets::export::{save_jpeg, save_png};
pub use crate::assets::palette::dominant_colors;
pub use crate::caption::layout::{
    BoxRect, CaptionConfig, CaptionLayout, HorizontalAlign, layout_caption, pad_box,
    resolve_origin_x,
};
pub use crate::caption::measure::{BlockMetrics, DEFAULT_LINE_GAP, measure};
pub use crate::caption::metrics::{FixedAdvanceMetrics, GlyphMetrics, TextBox};
pub use crate::caption::wrap::{Line, wrap};
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Rgba8, Rng64};
pub use crate::foundation::error::{ReelError, ReelResult};
pub use crate::text::font::{
    FontStyle, LoadedFont, PlacedGlyph, ResolvedFont, ShapedLine, resolve_font_path,
};

pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::reel::config::{ImageEffect, MaxSize, ReelConfig, TextEffect};
pub use crate::reel::pipeline::{ReelStats, render_reel};
pub use crate::render::caption::{CaptionStyle, render_caption};
