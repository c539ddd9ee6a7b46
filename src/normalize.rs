// Shape normalizer: turns a stroke region (white-on-black) into the 28×28
// dark-on-light sample format the classifier was trained on.
//
// Crop to ink → invert → letterbox into a padded square → area-average
// down to 28×28 → flatten row-major.

use image::{GrayImage, Luma};

use crate::canvas::bounding_box;

pub const SAMPLE_SIDE: u32 = 28;
pub const SAMPLE_LEN: usize = (SAMPLE_SIDE * SAMPLE_SIDE) as usize;

/// Pixels above this count as ink when binarizing the region.
const INK_THRESHOLD: u8 = 127;

/// Fixed 28×28 sample, row-major, values in 0.0..=255.0.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedSample {
    values: [f32; SAMPLE_LEN],
}

impl NormalizedSample {
    pub fn values(&self) -> &[f32; SAMPLE_LEN] {
        &self.values
    }

    /// Back to an 8-bit image, for the debug preview.
    pub fn to_image(&self) -> GrayImage {
        GrayImage::from_fn(SAMPLE_SIDE, SAMPLE_SIDE, |x, y| {
            let v = self.values[(y * SAMPLE_SIDE + x) as usize];
            Luma([v.clamp(0.0, 255.0) as u8])
        })
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ShapeNormalizer {
    margin_fraction: f32,
}

impl ShapeNormalizer {
    pub fn new(margin_fraction: f32) -> Self {
        Self { margin_fraction }
    }

    /// `None` when the region holds no ink.
    pub fn normalize(&self, region: &GrayImage) -> Option<NormalizedSample> {
        let binary = binarize(region);
        let bb = bounding_box(&binary)?;

        let (crop_w, crop_h) = (bb.width, bb.height);
        let max_side = crop_w.max(crop_h);
        let padding = (max_side as f32 * self.margin_fraction).round() as u32;
        let side = max_side + 2 * padding;

        // Light square, inverted crop pasted in the middle.
        let mut square = GrayImage::from_pixel(side, side, Luma([255]));
        let x_off = (side - crop_w) / 2;
        let y_off = (side - crop_h) / 2;
        for y in 0..crop_h {
            for x in 0..crop_w {
                let ink = binary.get_pixel(bb.x + x, bb.y + y).0[0];
                square.put_pixel(x_off + x, y_off + y, Luma([255 - ink]));
            }
        }

        let small = resize_area(&square, SAMPLE_SIDE, SAMPLE_SIDE);
        let mut values = [0.0f32; SAMPLE_LEN];
        for (v, px) in values.iter_mut().zip(small.pixels()) {
            *v = px.0[0] as f32;
        }
        Some(NormalizedSample { values })
    }
}

fn binarize(img: &GrayImage) -> GrayImage {
    let mut out = img.clone();
    for px in out.pixels_mut() {
        px.0[0] = if px.0[0] > INK_THRESHOLD { 255 } else { 0 };
    }
    out
}

/// Source taps for one destination index along an axis: each covers the
/// overlap of the destination cell with a source pixel, weights sum to 1.
fn area_taps(src_len: u32, dst_len: u32) -> Vec<Vec<(u32, f64)>> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|d| {
            let start = d as f64 * scale;
            let end = (start + scale).min(src_len as f64);
            let first = start.floor() as u32;
            let last = (end.ceil() as u32).min(src_len);
            (first..last)
                .filter_map(|s| {
                    let overlap = end.min(s as f64 + 1.0) - start.max(s as f64);
                    (overlap > 1e-12).then_some((s, overlap / scale))
                })
                .collect()
        })
        .collect()
}

/// Area-averaging resize (each output pixel is the mean of the source area
/// it covers). Decimation-safe; no nearest-neighbour aliasing.
pub fn resize_area(src: &GrayImage, dst_w: u32, dst_h: u32) -> GrayImage {
    let xs = area_taps(src.width(), dst_w);
    let ys = area_taps(src.height(), dst_h);
    GrayImage::from_fn(dst_w, dst_h, |dx, dy| {
        let mut acc = 0.0f64;
        for &(sy, wy) in &ys[dy as usize] {
            for &(sx, wx) in &xs[dx as usize] {
                acc += wy * wx * src.get_pixel(sx, sy).0[0] as f64;
            }
        }
        Luma([acc.round().clamp(0.0, 255.0) as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::StrokeCanvas;
    use crate::types::StrokePoint;

    fn normalizer() -> ShapeNormalizer {
        ShapeNormalizer::new(0.2)
    }

    #[test]
    fn blank_region_is_empty() {
        let region = GrayImage::new(50, 40);
        assert!(normalizer().normalize(&region).is_none());
    }

    #[test]
    fn faint_pixels_below_threshold_do_not_count_as_ink() {
        let region = GrayImage::from_pixel(20, 20, Luma([100]));
        assert!(normalizer().normalize(&region).is_none());
    }

    #[test]
    fn output_is_28x28_for_any_aspect_ratio() {
        for (w, h) in [(300, 20), (20, 300), (1, 1), (640, 480), (5, 200)] {
            let region = GrayImage::from_pixel(w, h, Luma([255]));
            let sample = normalizer().normalize(&region).expect("has ink");
            assert_eq!(sample.values().len(), SAMPLE_LEN);
            assert_eq!(sample.to_image().dimensions(), (SAMPLE_SIDE, SAMPLE_SIDE));
        }
    }

    #[test]
    fn single_pixel_stroke_is_valid() {
        let mut region = GrayImage::new(50, 50);
        region.put_pixel(10, 40, Luma([255]));
        let sample = normalizer().normalize(&region).expect("one pixel of ink");
        // 1px crop, padding rounds to 0: the whole square is the inverted ink.
        assert!(sample.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn stroke_becomes_dark_on_light_with_margin() {
        let mut canvas = StrokeCanvas::new(200, 200);
        canvas.rasterize_segment(StrokePoint::new(100, 20), StrokePoint::new(100, 180), 9);
        let sample = normalizer().normalize(canvas.raster()).expect("ink");
        let img = sample.to_image();
        // Corners are margin: light background.
        assert_eq!(img.get_pixel(0, 0).0[0], 255);
        assert_eq!(img.get_pixel(27, 27).0[0], 255);
        // The vertical bar runs through the middle column as dark ink.
        assert!(img.get_pixel(13, 14).0[0] < 128 || img.get_pixel(14, 14).0[0] < 128);
    }

    #[test]
    fn area_resize_of_uniform_image_is_uniform() {
        let src = GrayImage::from_pixel(97, 97, Luma([200]));
        let out = resize_area(&src, 28, 28);
        assert!(out.pixels().all(|p| p.0[0] == 200));
    }

    #[test]
    fn area_resize_averages_blocks() {
        // 56 → 28: each output pixel is the mean of a 2×2 block.
        let src = GrayImage::from_fn(56, 56, |x, _| Luma([if x % 2 == 0 { 0 } else { 200 }]));
        let out = resize_area(&src, 28, 28);
        assert!(out.pixels().all(|p| p.0[0] == 100));
    }

    #[test]
    fn normalization_is_deterministic() {
        let mut canvas = StrokeCanvas::new(120, 90);
        canvas.rasterize_segment(StrokePoint::new(10, 10), StrokePoint::new(100, 70), 7);
        let a = normalizer().normalize(canvas.raster());
        let b = normalizer().normalize(canvas.raster());
        assert_eq!(a, b);
    }
}
