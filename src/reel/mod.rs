//! Reel assembly: slides, captions, logo frame and music into one video.
//!
//! A reel is prepared once ([`pipeline::prepare_reel`]) into static layers and a timeline, then
//! every frame is composed on the CPU and streamed into a [`crate::encode::sink::FrameSink`].

pub mod compose;
pub mod config;
pub mod pipeline;
pub mod script;
pub mod timeline;
