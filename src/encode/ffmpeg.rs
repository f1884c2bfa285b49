use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::assets::decode::RasterImage;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, Rgba8};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::mul_div255_u16;

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    pub out_path: PathBuf,
    pub overwrite: bool,
    /// Colour that transparent frame regions are flattened onto.
    pub matte: Rgba8,
}

impl FfmpegSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            matte: Rgba8::BLACK,
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams opaque RGBA frames into its stdin.
///
/// Output is H.264 in `yuv420p` with `+faststart`. A soundtrack from [`SinkConfig::audio`] is
/// encoded as AAC and cut to the configured duration.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
        }
    }
}

/// Validate `cfg` and build the `ffmpeg` argument list for it.
pub fn ffmpeg_args(cfg: &SinkConfig, opts: &FfmpegSinkOpts) -> ReelResult<Vec<OsString>> {
    if cfg.fps.num == 0 || cfg.fps.den == 0 {
        return Err(ReelError::validation("fps must be non-zero"));
    }
    if cfg.width == 0 || cfg.height == 0 {
        return Err(ReelError::validation(
            "ffmpeg sink width/height must be non-zero",
        ));
    }
    if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
        return Err(ReelError::validation(
            "ffmpeg sink width/height must be even (required for yuv420p mp4 output)",
        ));
    }

    let mut args: Vec<OsString> = Vec::new();
    push_strs(&mut args, &[if opts.overwrite { "-y" } else { "-n" }]);
    push_strs(
        &mut args,
        &[
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &format!("{}/{}", cfg.fps.num, cfg.fps.den),
            "-i",
            "pipe:0",
        ],
    );

    match cfg.audio.as_ref() {
        Some(audio) => {
            if !audio.duration_secs.is_finite() || audio.duration_secs <= 0.0 {
                return Err(ReelError::validation(
                    "audio duration must be finite and > 0",
                ));
            }
            args.push("-i".into());
            args.push(audio.path.clone().into_os_string());
            push_strs(
                &mut args,
                &[
                    "-map",
                    "0:v:0",
                    "-map",
                    "1:a:0",
                    "-c:v",
                    "libx264",
                    "-pix_fmt",
                    "yuv420p",
                    "-c:a",
                    "aac",
                    "-t",
                    &format!("{:.3}", audio.duration_secs),
                    "-movflags",
                    "+faststart",
                ],
            );
        }
        None => {
            push_strs(
                &mut args,
                &[
                    "-an",
                    "-c:v",
                    "libx264",
                    "-pix_fmt",
                    "yuv420p",
                    "-movflags",
                    "+faststart",
                ],
            );
        }
    }
    args.push(opts.out_path.clone().into_os_string());
    Ok(args)
}

fn push_strs(args: &mut Vec<OsString>, items: &[&str]) {
    args.extend(items.iter().map(OsString::from));
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        let args = ffmpeg_args(&cfg, &self.opts)?;

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(ReelError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(ReelError::evaluation(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        tracing::debug!(?args, "spawning ffmpeg");
        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ReelError::evaluation(format!("failed to spawn ffmpeg: {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ReelError::evaluation("failed to open ffmpeg stdin"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ReelError::evaluation("failed to open ffmpeg stderr"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &RasterImage) -> ReelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| ReelError::evaluation("ffmpeg sink not started"))?;
        if self.last_idx.is_some_and(|last| idx <= last) {
            return Err(ReelError::evaluation(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(ReelError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        flatten_to_opaque(&mut self.scratch, &frame.rgba8_premul, self.opts.matte)?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ReelError::evaluation("ffmpeg sink is already finalized"));
        };
        use std::io::Write as _;
        stdin.write_all(&self.scratch).map_err(|e| {
            ReelError::evaluation(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| ReelError::evaluation("ffmpeg sink not started"))?;

        let status = child
            .wait()
            .map_err(|e| ReelError::evaluation(format!("failed to wait for ffmpeg: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ReelError::evaluation("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| ReelError::evaluation(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(ReelError::evaluation(format!(
                "ffmpeg exited with status {status}: {}",
                stderr.trim()
            )));
        }
        self.cfg = None;
        Ok(())
    }
}

fn flatten_to_opaque(dst: &mut [u8], src_premul: &[u8], matte: Rgba8) -> ReelResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(ReelError::validation(
            "frame byte length does not match width*height*4",
        ));
    }
    let bg = [u16::from(matte.r), u16::from(matte.g), u16::from(matte.b)];

    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let inv = 255u16 - u16::from(s[3]);
        for i in 0..3 {
            d[i] = (u16::from(s[i]) + mul_div255_u16(bg[i], inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}
