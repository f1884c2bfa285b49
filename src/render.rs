/// Caption rasterization on top of a laid-out [`crate::CaptionLayout`].
pub mod caption;
/// Premultiplied RGBA8 compositing.
pub mod composite;
/// `vello_cpu` vector painter.
pub mod painter;
