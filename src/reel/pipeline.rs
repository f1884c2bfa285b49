use crate::assets::decode::RasterImage;
use crate::caption::layout::layout_caption;
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::ReelResult;
use crate::reel::compose::{ReelLayers, compose_at, load_background, load_frame_overlay};
use crate::reel::config::ReelConfig;
use crate::reel::script::{discover_images, load_slides, read_script};
use crate::reel::timeline::Timeline;
use crate::render::caption::render_caption;
use crate::text::font::{LoadedFont, resolve_font_path};

/// Summary of a finished reel render.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReelStats {
    pub frames: u64,
    pub duration_secs: f64,
    pub slides: usize,
    pub captions: usize,
    pub with_music: bool,
}

/// Resolve and load the caption font named by `cfg`.
pub fn load_caption_font(cfg: &ReelConfig) -> ReelResult<LoadedFont> {
    let resolved = resolve_font_path(&cfg.font, cfg.font_style, &cfg.font_dirs)?;
    LoadedFont::load(&resolved.path, cfg.font_size)
}

/// Lay out and rasterize one caption on a transparent canvas.
pub fn render_caption_image(
    text: &str,
    font: &LoadedFont,
    cfg: &ReelConfig,
) -> ReelResult<RasterImage> {
    let caption_cfg = cfg.caption_config();
    let layout = layout_caption(text, font, &caption_cfg)?;
    tracing::debug!(
        text,
        width = layout.block.width,
        height = layout.block.height,
        background = ?layout.background.as_tuple(),
        "caption layout"
    );
    render_caption(&layout, font, &caption_cfg, &cfg.caption_style())
}

/// Timeline and pre-rendered layers of a reel, ready for frame composition.
#[derive(Clone, Debug)]
pub struct PreparedReel {
    pub timeline: Timeline,
    pub layers: ReelLayers,
}

/// Load every input named by `cfg` and pre-render the static layers.
///
/// Captions that fail to render are dropped with a warning.
pub fn prepare_reel(cfg: &ReelConfig) -> ReelResult<PreparedReel> {
    cfg.validate()?;

    let script = read_script(&cfg.script)?;
    let paths = if cfg.images.is_empty() {
        discover_images(&cfg.images_dir)?
    } else {
        cfg.images.clone()
    };
    let slides = load_slides(&paths, cfg.image_max)?;
    let mut timeline = Timeline::build(slides.len(), &script, cfg)?;
    tracing::info!(
        slides = slides.len(),
        captions = timeline.captions.len(),
        duration = timeline.duration,
        "timeline built"
    );

    let mut captions = Vec::with_capacity(timeline.captions.len());
    if !timeline.captions.is_empty() {
        let font = load_caption_font(cfg)?;
        timeline.captions.retain(|caption| {
            match render_caption_image(&caption.text, &font, cfg) {
                Ok(img) => {
                    captions.push(img);
                    true
                }
                Err(err) => {
                    tracing::warn!(index = caption.index, %err, "failed to render caption, dropping");
                    false
                }
            }
        });
    }

    let layers = ReelLayers {
        background: load_background(&cfg.background, cfg.canvas, cfg.fallback_background),
        slides,
        frame: load_frame_overlay(&cfg.frame, cfg.frame_max),
        captions,
    };
    Ok(PreparedReel { timeline, layers })
}

/// Compose every frame of `reel` and stream it into `sink`.
///
/// Music from `cfg.music` is attached when the file exists.
pub fn encode_reel(
    reel: &PreparedReel,
    cfg: &ReelConfig,
    sink: &mut dyn FrameSink,
) -> ReelResult<ReelStats> {
    let fps = cfg.fps()?;
    let duration = reel.timeline.duration;

    let audio = if cfg.music.is_file() {
        Some(AudioInputConfig {
            path: cfg.music.clone(),
            duration_secs: duration,
        })
    } else {
        tracing::info!(path = %cfg.music.display(), "music not found, reel will be silent");
        None
    };
    let with_music = audio.is_some();

    sink.begin(SinkConfig {
        width: cfg.canvas.width,
        height: cfg.canvas.height,
        fps,
        audio,
    })?;

    let frames = fps.secs_to_frames_round(duration);
    for i in 0..frames {
        let t = fps.frames_to_secs(i);
        let frame = compose_at(t, &reel.timeline, &reel.layers);
        sink.push_frame(FrameIndex(i), &frame)?;
    }
    sink.end()?;

    Ok(ReelStats {
        frames,
        duration_secs: duration,
        slides: reel.layers.slides.len(),
        captions: reel.layers.captions.len(),
        with_music,
    })
}

/// Build the reel described by `cfg` into `sink`.
#[tracing::instrument(skip_all, fields(output = %cfg.output.display()))]
pub fn render_reel(cfg: &ReelConfig, sink: &mut dyn FrameSink) -> ReelResult<ReelStats> {
    let reel = prepare_reel(cfg)?;
    let stats = encode_reel(&reel, cfg, sink)?;
    tracing::info!(
        frames = stats.frames,
        duration = stats.duration_secs,
        music = stats.with_music,
        "reel rendered"
    );
    Ok(stats)
}
