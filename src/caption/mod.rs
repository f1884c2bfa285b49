//! Caption layout: greedy word wrapping, block measurement and background box placement.
//!
//! The engine is stateless. All glyph geometry comes from a [`crate::GlyphMetrics`] provider, so
//! the same code lays out captions for a real font ([`crate::LoadedFont`]) or for fixed test
//! metrics.

pub(crate) mod layout;
pub(crate) mod measure;
pub(crate) mod metrics;
pub(crate) mod wrap;
