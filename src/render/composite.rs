use crate::assets::decode::RasterImage;
use crate::foundation::math::{mul_div255_u8, opacity_to_u8};

pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied pixels, with `src` scaled by `opacity`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let op = u16::from(opacity_to_u8(opacity));
    if op == 0 || src[3] == 0 {
        return dst;
    }

    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Composite `src` over `dst` with its top-left corner at `(x, y)`.
///
/// Parts of `src` outside `dst` are clipped.
pub fn blit_over(dst: &mut RasterImage, src: &RasterImage, x: i64, y: i64, opacity: f32) {
    if opacity <= 0.0 {
        return;
    }
    let dw = i64::from(dst.width);
    let dh = i64::from(dst.height);
    let sw = i64::from(src.width);
    let sh = i64::from(src.height);

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + sw).min(dw);
    let y1 = (y + sh).min(dh);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let row_px = (x1 - x0) as usize;
    for dy in y0..y1 {
        let sy = dy - y;
        let src_start = ((sy * sw + (x0 - x)) * 4) as usize;
        let dst_start = ((dy * dw + x0) * 4) as usize;
        let src_row = &src.rgba8_premul[src_start..src_start + row_px * 4];
        let dst_row = &mut dst.rgba8_premul[dst_start..dst_start + row_px * 4];
        for (d, s) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
            d.copy_from_slice(&out);
        }
    }
}

/// Top-left offset that centres an `inner` box in an `outer` box (floor division).
pub fn centered_offset(outer: (u32, u32), inner: (u32, u32)) -> (i64, i64) {
    (
        (i64::from(outer.0) - i64::from(inner.0)).div_euclid(2),
        (i64::from(outer.1) - i64::from(inner.1)).div_euclid(2),
    )
}
