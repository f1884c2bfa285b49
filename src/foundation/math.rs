pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Convert an opacity in `[0, 1]` to an 8-bit coverage value.
pub(crate) fn opacity_to_u8(opacity: f32) -> u8 {
    ((opacity.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u8
}

/// Integer division rounding towards negative infinity.
pub(crate) fn floor_div2(v: i32) -> i32 {
    v.div_euclid(2)
}
