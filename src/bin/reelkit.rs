use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use reelkit::background::{BackgroundOpts, Variation, write_background};
use reelkit::frame::{FrameOpts, FrameStyle, write_frame};
use reelkit::reel::pipeline::{load_caption_font, render_caption_image};
use reelkit::{
    Canvas, FfmpegSink, FfmpegSinkOpts, FontStyle, ImageEffect, ReelConfig, Rgba8, TextEffect,
    parse_rgb, parse_rgba, render_reel, save_png,
};

#[derive(Parser, Debug)]
#[command(name = "reelkit", version, about = "Vertical video reel generator")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Paint a gradient background as JPEG.
    Background(BackgroundArgs),
    /// Build a transparent logo frame as PNG.
    Frame(FrameArgs),
    /// Assemble images, captions and music into an MP4 (requires `ffmpeg` on PATH).
    Reel(ReelArgs),
    /// Render a single caption onto a transparent PNG.
    Caption(CaptionArgs),
}

#[derive(Args, Debug)]
struct CanvasArgs {
    #[arg(long, default_value_t = Canvas::VERTICAL_HD.width)]
    width: u32,
    #[arg(long, default_value_t = Canvas::VERTICAL_HD.height)]
    height: u32,
}

impl CanvasArgs {
    fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Args, Debug)]
struct BackgroundArgs {
    /// One to three hex colours, top to bottom (e.g. #1E3A8A).
    #[arg(long, num_args = 1.., default_values = reelkit::background::DEFAULT_COLORS)]
    colors: Vec<String>,

    #[arg(long, value_enum, default_value_t = Variation::Mixed)]
    variation: Variation,

    /// Seed for shape placement; omit for a different layout every run.
    #[arg(long)]
    seed: Option<u64>,

    #[command(flatten)]
    canvas: CanvasArgs,

    #[arg(long, default_value = "background.jpg")]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Logo in PNG format.
    #[arg(long)]
    logo: PathBuf,

    #[arg(long, value_enum, default_value_t = FrameStyle::Modern)]
    style: FrameStyle,

    /// Logo width in pixels (default: 350 modern/futuristic, 400 classic, 250 minimal).
    #[arg(long)]
    logo_width: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,

    #[command(flatten)]
    canvas: CanvasArgs,

    #[arg(long, default_value = "frame_logo.png")]
    output: PathBuf,
}

/// Caption font and colour overrides shared by `reel` and `caption`.
#[derive(Args, Debug)]
struct TextArgs {
    /// JSON file with reel settings; flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Font file name (e.g. segoeui.ttf) or path.
    #[arg(long)]
    text_font: Option<String>,

    #[arg(long, value_enum)]
    text_style: Option<FontStyle>,

    /// Font size in pixels.
    #[arg(long)]
    text_size: Option<f32>,

    /// Text colour as r,g,b.
    #[arg(long, value_parser = parse_rgb)]
    text_color: Option<Rgba8>,

    /// Caption box colour as r,g,b,a.
    #[arg(long, value_parser = parse_rgba)]
    text_bg_color: Option<Rgba8>,

    #[arg(long, value_enum)]
    text_effect: Option<TextEffect>,

    /// Extra directory searched for fonts.
    #[arg(long)]
    font_dir: Vec<PathBuf>,
}

impl TextArgs {
    fn load_config(&self) -> anyhow::Result<ReelConfig> {
        let mut cfg = match &self.config {
            Some(path) => ReelConfig::from_path(path)
                .with_context(|| format!("load config '{}'", path.display()))?,
            None => ReelConfig::default(),
        };
        if let Some(font) = &self.text_font {
            cfg.font = font.clone();
        }
        if let Some(style) = self.text_style {
            cfg.font_style = style;
        }
        if let Some(size) = self.text_size {
            cfg.font_size = size;
        }
        if let Some(c) = self.text_color {
            cfg.text_color = c;
        }
        if let Some(c) = self.text_bg_color {
            cfg.text_bg_color = c;
        }
        if let Some(effect) = self.text_effect {
            cfg.text_effect = effect;
        }
        cfg.font_dirs.extend(self.font_dir.iter().cloned());
        Ok(cfg)
    }
}

#[derive(Args, Debug)]
struct ReelArgs {
    /// Images in display order (default: every .jpg/.png in the images directory).
    images: Vec<PathBuf>,

    #[command(flatten)]
    text: TextArgs,

    #[arg(long, value_enum)]
    image_effect: Option<ImageEffect>,

    /// Seconds per image.
    #[arg(long)]
    image_duration: Option<f64>,

    /// Seconds per caption.
    #[arg(long)]
    text_duration: Option<f64>,

    #[arg(long)]
    fps: Option<u32>,

    /// Caption script, one caption per line.
    #[arg(long)]
    script: Option<PathBuf>,

    #[arg(long)]
    images_dir: Option<PathBuf>,

    #[arg(long)]
    background: Option<PathBuf>,

    /// Logo frame overlay.
    #[arg(long)]
    frame: Option<PathBuf>,

    #[arg(long)]
    music: Option<PathBuf>,

    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CaptionArgs {
    text: String,

    #[command(flatten)]
    style: TextArgs,

    #[arg(long, default_value = "caption.png")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Background(args) => cmd_background(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Reel(args) => cmd_reel(args),
        Command::Caption(args) => cmd_caption(args),
    }
}

fn cmd_background(args: BackgroundArgs) -> anyhow::Result<()> {
    let opts = BackgroundOpts {
        canvas: args.canvas.canvas(),
        colors: args.colors,
        variation: args.variation,
        seed: args.seed,
    };
    write_background(&opts, &args.output)
        .with_context(|| format!("generate background '{}'", args.output.display()))?;
    eprintln!("wrote {}", args.output.display());
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let opts = FrameOpts {
        canvas: args.canvas.canvas(),
        logo: args.logo,
        style: args.style,
        logo_width: args.logo_width,
        seed: args.seed,
    };
    write_frame(&opts, &args.output)
        .with_context(|| format!("generate frame '{}'", args.output.display()))?;
    eprintln!("wrote {}", args.output.display());
    Ok(())
}

fn cmd_reel(args: ReelArgs) -> anyhow::Result<()> {
    let mut cfg = args.text.load_config()?;
    if !args.images.is_empty() {
        cfg.images = args.images;
    }
    if let Some(effect) = args.image_effect {
        cfg.image_effect = effect;
    }
    if let Some(d) = args.image_duration {
        cfg.image_duration = d;
    }
    if let Some(d) = args.text_duration {
        cfg.text_duration = d;
    }
    if let Some(fps) = args.fps {
        cfg.fps = fps;
    }
    let paths = [
        (args.script, &mut cfg.script),
        (args.images_dir, &mut cfg.images_dir),
        (args.background, &mut cfg.background),
        (args.frame, &mut cfg.frame),
        (args.music, &mut cfg.music),
        (args.output, &mut cfg.output),
    ];
    for (arg, field) in paths {
        if let Some(path) = arg {
            *field = path;
        }
    }

    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&cfg.output));
    let stats = render_reel(&cfg, &mut sink)
        .with_context(|| format!("render reel '{}'", cfg.output.display()))?;
    eprintln!(
        "wrote {} ({} frames, {:.1}s)",
        cfg.output.display(),
        stats.frames,
        stats.duration_secs
    );
    Ok(())
}

fn cmd_caption(args: CaptionArgs) -> anyhow::Result<()> {
    let cfg = args.style.load_config()?;
    cfg.validate()?;
    let font = load_caption_font(&cfg).context("load caption font")?;
    let img = render_caption_image(&args.text, &font, &cfg)?;
    save_png(&img, &args.output)
        .with_context(|| format!("write caption '{}'", args.output.display()))?;
    eprintln!("wrote {}", args.output.display());
    Ok(())
}
