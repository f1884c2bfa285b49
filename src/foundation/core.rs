use crate::foundation::error::{ReelError, ReelResult};

pub use kurbo::{BezPath, Circle, Point, Rect, RoundedRect, Shape};

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> ReelResult<Self> {
        if den == 0 {
            return Err(ReelError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ReelError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Convert frame count to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Convert seconds to a frame count, rounding to the nearest frame.
    pub fn secs_to_frames_round(self, secs: f64) -> u64 {
        (secs * self.as_f64()).round().max(0.0) as u64
    }
}

/// Zero-based index of a frame in the output timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameIndex(pub u64);

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// The 9:16 vertical format used by reels.
    pub const VERTICAL_HD: Self = Self {
        width: 1080,
        height: 1920,
    };

    pub fn validate(self) -> ReelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::validation("canvas width/height must be non-zero"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(ReelError::validation("canvas width/height must fit in u16"));
        }
        Ok(())
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::VERTICAL_HD
    }
}

/// Straight-alpha RGBA8 colour.
///
/// Deserializes from `"#RRGGBB[AA]"`, `"r,g,b[,a]"`, `[r, g, b(, a)]` or `{ r, g, b, a }`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Premultiplied RGBA8 bytes.
    pub fn to_premul(self) -> [u8; 4] {
        let a = u16::from(self.a);
        let premul = |c: u8| -> u8 { crate::foundation::math::mul_div255_u8(u16::from(c), a) };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }
}

/// Deterministic SplitMix64 generator used for decorative scatter.
#[derive(Clone, Copy, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed from the wall clock; used when the caller does not ask for reproducible output.
    pub fn from_time() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::new(nanos)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    pub fn next_f64_01(&mut self) -> f64 {
        // 53 bits of precision.
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }

    /// Uniform integer in `[lo, hi)`. Empty ranges return `lo`.
    pub fn range_i64(&mut self, lo: i64, hi: i64) -> i64 {
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo) as u64;
        lo + (self.next_u64() % span) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_rejects_zero_parts() {
        assert!(Fps::new(0, 1).is_err());
        assert!(Fps::new(24, 0).is_err());
        let fps = Fps::new(24, 1).unwrap();
        assert_eq!(fps.secs_to_frames_round(4.0), 96);
        assert!((fps.frames_to_secs(12) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn canvas_validation() {
        assert!(Canvas::VERTICAL_HD.validate().is_ok());
        assert!(
            Canvas {
                width: 0,
                height: 10
            }
            .validate()
            .is_err()
        );
        assert!(
            Canvas {
                width: 70_000,
                height: 10
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn premul_scales_channels() {
        assert_eq!(Rgba8::rgba(255, 0, 0, 128).to_premul(), [128, 0, 0, 128]);
        assert_eq!(Rgba8::WHITE.to_premul(), [255, 255, 255, 255]);
    }

    #[test]
    fn rng_is_seeded_and_bounded() {
        let mut a = Rng64::new(7);
        let mut b = Rng64::new(7);
        for _ in 0..100 {
            let v = a.range_i64(5, 20);
            assert_eq!(v, b.range_i64(5, 20));
            assert!((5..20).contains(&v));
        }
        assert_eq!(a.range_i64(3, 3), 3);
    }
}
