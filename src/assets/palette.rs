use crate::foundation::core::{Rgba8, Rng64};

/// Palette used when an image has no visible pixels.
pub const DEFAULT_PALETTE: [Rgba8; 3] = [
    Rgba8::rgb(0, 0, 255),
    Rgba8::rgb(0, 255, 0),
    Rgba8::rgb(255, 255, 255),
];

const KMEANS_SEED: u64 = 0;
const KMEANS_MAX_ITER: usize = 100;

/// Dominant colours of the visible (alpha > 0) pixels of `img`, by k-means clustering.
///
/// Returns at most `num_colors` cluster centres, truncated to integers. Clustering is seeded with a
/// fixed seed so a given image always yields the same palette.
pub fn dominant_colors(img: &image::RgbaImage, num_colors: usize) -> Vec<Rgba8> {
    let points: Vec<[f64; 3]> = img
        .pixels()
        .filter(|p| p.0[3] > 0)
        .map(|p| [f64::from(p.0[0]), f64::from(p.0[1]), f64::from(p.0[2])])
        .collect();

    if points.is_empty() || num_colors == 0 {
        return DEFAULT_PALETTE.to_vec();
    }

    let k = num_colors.min(points.len());
    let centres = kmeans(&points, k, KMEANS_SEED, KMEANS_MAX_ITER);
    tracing::debug!(pixels = points.len(), k, "extracted dominant colours");

    centres
        .into_iter()
        .map(|c| {
            let ch = |v: f64| v.clamp(0.0, 255.0) as u8;
            Rgba8::rgb(ch(c[0]), ch(c[1]), ch(c[2]))
        })
        .collect()
}

/// Lloyd's k-means with k-means++ seeding.
pub fn kmeans(points: &[[f64; 3]], k: usize, seed: u64, max_iter: usize) -> Vec<[f64; 3]> {
    if points.is_empty() || k == 0 {
        return Vec::new();
    }
    let k = k.min(points.len());
    let mut rng = Rng64::new(seed);
    let mut centres = seed_plus_plus(points, k, &mut rng);

    let mut assignment = vec![usize::MAX; points.len()];
    for _ in 0..max_iter {
        let mut changed = false;
        for (slot, p) in assignment.iter_mut().zip(points) {
            let nearest = nearest_centre(p, &centres).0;
            if *slot != nearest {
                *slot = nearest;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        let mut sums = vec![[0.0f64; 3]; k];
        let mut counts = vec![0usize; k];
        for (&c, p) in assignment.iter().zip(points) {
            counts[c] += 1;
            for i in 0..3 {
                sums[c][i] += p[i];
            }
        }
        for (centre, (sum, &n)) in centres.iter_mut().zip(sums.iter().zip(&counts)) {
            // Empty clusters keep their previous centre.
            if n > 0 {
                for i in 0..3 {
                    centre[i] = sum[i] / n as f64;
                }
            }
        }
    }
    centres
}

fn seed_plus_plus(points: &[[f64; 3]], k: usize, rng: &mut Rng64) -> Vec<[f64; 3]> {
    let first = rng.range_i64(0, points.len() as i64) as usize;
    let mut centres = vec![points[first]];
    let mut d2: Vec<f64> = points.iter().map(|p| dist2(p, &points[first])).collect();

    while centres.len() < k {
        let total: f64 = d2.iter().sum();
        let pick = if total <= 0.0 {
            rng.range_i64(0, points.len() as i64) as usize
        } else {
            let mut target = rng.next_f64_01() * total;
            let mut chosen = points.len() - 1;
            for (i, &d) in d2.iter().enumerate() {
                if target < d {
                    chosen = i;
                    break;
                }
                target -= d;
            }
            chosen
        };
        let c = points[pick];
        for (d, p) in d2.iter_mut().zip(points) {
            *d = d.min(dist2(p, &c));
        }
        centres.push(c);
    }
    centres
}

fn nearest_centre(p: &[f64; 3], centres: &[[f64; 3]]) -> (usize, f64) {
    let mut best = (0usize, f64::INFINITY);
    for (i, c) in centres.iter().enumerate() {
        let d = dist2(p, c);
        if d < best.1 {
            best = (i, d);
        }
    }
    best
}

fn dist2(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_of(pixels: &[[u8; 4]], width: u32) -> image::RgbaImage {
        let height = pixels.len() as u32 / width;
        let raw: Vec<u8> = pixels.iter().flatten().copied().collect();
        image::RgbaImage::from_raw(width, height, raw).unwrap()
    }

    #[test]
    fn transparent_image_uses_default_palette() {
        let img = image_of(&[[10, 10, 10, 0]; 4], 2);
        assert_eq!(dominant_colors(&img, 3), DEFAULT_PALETTE.to_vec());
    }

    #[test]
    fn single_pixel_yields_one_colour() {
        let img = image_of(&[[12, 34, 56, 255]], 1);
        assert_eq!(dominant_colors(&img, 3), vec![Rgba8::rgb(12, 34, 56)]);
    }

    #[test]
    fn two_flat_regions_are_separated() {
        let mut px: Vec<[u8; 4]> = vec![[200, 10, 10, 255]; 6];
        px.extend(vec![[10, 10, 200, 255]; 6]);
        let img = image_of(&px, 4);
        let mut colours = dominant_colors(&img, 2);
        colours.sort_by_key(|c| c.r);
        assert_eq!(
            colours,
            vec![Rgba8::rgb(10, 10, 200), Rgba8::rgb(200, 10, 10)]
        );
    }

    #[test]
    fn transparent_pixels_are_ignored() {
        let px: [[u8; 4]; 3] = [[255, 0, 0, 0], [0, 255, 0, 255], [0, 255, 0, 128]];
        let img = image_of(&px, 3);
        assert_eq!(dominant_colors(&img, 1), vec![Rgba8::rgb(0, 255, 0)]);
    }

    #[test]
    fn kmeans_is_deterministic() {
        let points: Vec<[f64; 3]> = (0..50)
            .map(|i| [f64::from(i * 5 % 255), f64::from(i * 3 % 255), 7.0])
            .collect();
        assert_eq!(kmeans(&points, 3, 1, 50), kmeans(&points, 3, 1, 50));
        assert_eq!(kmeans(&points, 3, 1, 50).len(), 3);
        assert!(kmeans(&[], 3, 1, 50).is_empty());
    }
}
