use std::path::PathBuf;

use crate::assets::decode::RasterImage;
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::ReelResult;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    /// Optional soundtrack muxed under the frames.
    pub audio: Option<AudioInputConfig>,
}

/// Compressed audio file used as a soundtrack.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioInputConfig {
    pub path: PathBuf,
    /// Audio is cut to this many seconds so it never outlasts the video.
    pub duration_secs: f64,
}

/// Consumer of rendered frames in timeline order.
///
/// `push_frame` is called with strictly increasing indices between `begin` and `end`.
pub trait FrameSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &RasterImage) -> ReelResult<()>;
    fn end(&mut self) -> ReelResult<()>;
}

/// Sink that keeps every frame in memory, for tests and previews.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, RasterImage)>,
    finished: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    pub fn frames(&self) -> &[(FrameIndex, RasterImage)] {
        &self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &RasterImage) -> ReelResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        self.finished = true;
        Ok(())
    }
}
