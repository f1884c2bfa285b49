//! Font discovery and shaping.

pub(crate) mod font;
