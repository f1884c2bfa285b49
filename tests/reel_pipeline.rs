use std::path::{Path, PathBuf};

use reelkit::{
    Canvas, FfmpegSink, FfmpegSinkOpts, FontStyle, FrameIndex, ImageEffect, InMemorySink,
    MaxSize, RasterImage, ReelConfig, ReelError, is_ffmpeg_on_path, render_reel,
    resolve_font_path,
};

fn work_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("reel_pipeline").join(tag);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(dir.join("images")).unwrap();
    dir
}

fn solid_png(path: &Path, rgb: [u8; 3]) {
    image::RgbaImage::from_pixel(20, 10, image::Rgba([rgb[0], rgb[1], rgb[2], 255]))
        .save(path)
        .unwrap();
}

/// Two slides, no captions, nothing optional on disk.
fn small_config(dir: &Path) -> ReelConfig {
    solid_png(&dir.join("images").join("01.png"), [255, 0, 0]);
    solid_png(&dir.join("images").join("02.png"), [0, 255, 0]);
    std::fs::write(dir.join("script.txt"), "\n  \n").unwrap();

    ReelConfig {
        canvas: Canvas {
            width: 64,
            height: 64,
        },
        fps: 4,
        image_duration: 1.0,
        image_max: MaxSize {
            width: 32,
            height: 32,
        },
        script: dir.join("script.txt"),
        images_dir: dir.join("images"),
        background: dir.join("background.jpg"),
        frame: dir.join("frame_logo.png"),
        music: dir.join("background_music.mp3"),
        output: dir.join("reel.mp4"),
        ..ReelConfig::default()
    }
}

fn px(img: &RasterImage, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * img.width + x) * 4) as usize;
    img.rgba8_premul[i..i + 4].try_into().unwrap()
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= 1)
}

#[test]
fn renders_one_frame_per_tick() {
    let dir = work_dir("frames");
    let cfg = small_config(&dir);
    let mut sink = InMemorySink::new();

    let stats = render_reel(&cfg, &mut sink).unwrap();
    assert_eq!(stats.frames, 8);
    assert_eq!(stats.slides, 2);
    assert_eq!(stats.captions, 0);
    assert!(!stats.with_music);
    assert!((stats.duration_secs - 2.0).abs() < 1e-9);

    let sink_cfg = sink.config().unwrap();
    assert_eq!((sink_cfg.width, sink_cfg.height), (64, 64));
    assert!(sink_cfg.audio.is_none());
    assert!(sink.is_finished());

    let frames = sink.frames();
    assert_eq!(frames.len(), 8);
    for (i, (idx, img)) in frames.iter().enumerate() {
        assert_eq!(*idx, FrameIndex(i as u64));
        assert_eq!((img.width, img.height), (64, 64));
    }

    // Slides are centred over the solid fallback background.
    assert!(close(px(&frames[0].1, 32, 32), [255, 0, 0, 255]));
    assert!(close(px(&frames[5].1, 32, 32), [0, 255, 0, 255]));
    assert_eq!(px(&frames[0].1, 0, 0), [53, 94, 59, 255]);
}

#[test]
fn explicit_image_list_overrides_directory() {
    let dir = work_dir("explicit");
    let mut cfg = small_config(&dir);
    cfg.images = vec![
        dir.join("images").join("02.png"),
        dir.join("images").join("missing.png"),
    ];
    let mut sink = InMemorySink::new();

    let stats = render_reel(&cfg, &mut sink).unwrap();
    assert_eq!(stats.slides, 1);
    assert_eq!(stats.frames, 4);
    assert!(close(px(&sink.frames()[0].1, 32, 32), [0, 255, 0, 255]));
}

#[test]
fn faded_slides_start_from_the_background() {
    let dir = work_dir("fade");
    let cfg = ReelConfig {
        image_effect: ImageEffect::Fade,
        fade_secs: 0.5,
        ..small_config(&dir)
    };
    let mut sink = InMemorySink::new();
    render_reel(&cfg, &mut sink).unwrap();

    let frames = sink.frames();
    assert_eq!(px(&frames[0].1, 32, 32), [53, 94, 59, 255]);
    // Half way through the fade in.
    let mid = px(&frames[1].1, 32, 32);
    assert!(mid[0] > 53 && mid[0] < 255, "{mid:?}");
    assert!(close(px(&frames[2].1, 32, 32), [255, 0, 0, 255]));
}

#[test]
fn empty_image_directory_is_an_error() {
    let dir = work_dir("empty");
    let mut cfg = small_config(&dir);
    cfg.images_dir = dir.join("nothing_here");
    std::fs::create_dir_all(&cfg.images_dir).unwrap();

    let err = render_reel(&cfg, &mut InMemorySink::new()).unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
}

#[test]
fn missing_script_is_an_error() {
    let dir = work_dir("no_script");
    let mut cfg = small_config(&dir);
    cfg.script = dir.join("absent.txt");

    assert!(render_reel(&cfg, &mut InMemorySink::new()).is_err());
}

#[test]
fn encodes_mp4_with_ffmpeg() {
    if !is_ffmpeg_on_path() {
        eprintln!("ffmpeg not on PATH, skipping");
        return;
    }
    let dir = work_dir("ffmpeg");
    let cfg = small_config(&dir);
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&cfg.output));

    let stats = render_reel(&cfg, &mut sink).unwrap();
    assert_eq!(stats.frames, 8);
    let meta = std::fs::metadata(&cfg.output).unwrap();
    assert!(meta.len() > 0);
}

#[test]
fn captions_are_drawn_over_the_slides() {
    let Ok(font) = resolve_font_path("DejaVuSans.ttf", FontStyle::Regular, &[]) else {
        eprintln!("no system font installed, skipping");
        return;
    };
    let dir = work_dir("captions");
    let mut cfg = small_config(&dir);
    std::fs::write(&cfg.script, "Hi\nsecond caption\nthird is dropped\n").unwrap();
    cfg.canvas = Canvas {
        width: 320,
        height: 240,
    };
    cfg.font = font.path.to_string_lossy().to_string();
    cfg.font_size = 30.0;
    cfg.caption_y = 40;
    cfg.text_duration = 0.5;
    let mut sink = InMemorySink::new();

    let stats = render_reel(&cfg, &mut sink).unwrap();
    assert_eq!(stats.captions, 2);

    let is_text = |p: [u8; 4]| p[3] == 255 && p[0] > 240 && p[1] > 240 && p[2] < 130;
    let count = |img: &RasterImage| {
        (0..img.height)
            .flat_map(|y| (0..img.width).map(move |x| (x, y)))
            .filter(|&(x, y)| is_text(px(img, x, y)))
            .count()
    };
    let frames = sink.frames();
    assert!(count(&frames[0].1) > 20);
    // The first caption ends half way through its slide.
    assert_eq!(count(&frames[2].1), 0);
    assert!(count(&frames[4].1) > 20);
}
