//! Encoding sinks.
//!
//! Sinks consume composed frames in timeline order.

/// MP4 output through the system `ffmpeg`.
pub mod ffmpeg;
/// Frame sink trait and the in-memory sink.
pub mod sink;
