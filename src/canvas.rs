// The in-progress drawing: a grayscale raster the size of the camera frame,
// plus the ordered fingertip points that produced it.
// Pixels are binary: 0 = background, 255 = stroke.

use image::{GrayImage, Luma};

use crate::types::{Rect, StrokePoint};

pub const BACKGROUND: u8 = 0;
pub const STROKE: u8 = 255;

/// Filled round stamp used to give segments their thickness.
/// Offsets are relative to the stamp center.
#[derive(Clone, Debug)]
struct Brush {
    offsets: Vec<(i32, i32)>,
}

impl Brush {
    fn new(thickness: u32) -> Self {
        let r = (thickness.max(1) / 2) as i32;
        let r2 = r * r;
        let mut offsets = Vec::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);
        for y in -r..=r {
            for x in -r..=r {
                if x * x + y * y <= r2 {
                    offsets.push((x, y));
                }
            }
        }
        Self { offsets }
    }
}

pub struct StrokeCanvas {
    raster: GrayImage,
    points: Vec<StrokePoint>,
}

impl StrokeCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            raster: GrayImage::new(width, height),
            points: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    pub fn raster(&self) -> &GrayImage {
        &self.raster
    }

    pub fn points(&self) -> &[StrokePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_point(&self) -> Option<StrokePoint> {
        self.points.last().copied()
    }

    pub fn append_point(&mut self, p: StrokePoint) {
        self.points.push(p);
    }

    /// Draw a `thickness`-wide line from `p0` to `p1` (Bresenham walk with a
    /// round stamp at every step). Parts outside the raster are clipped.
    pub fn rasterize_segment(&mut self, p0: StrokePoint, p1: StrokePoint, thickness: u32) {
        let brush = Brush::new(thickness);
        let (mut x0, mut y0) = (p0.x, p0.y);
        let (x1, y1) = (p1.x, p1.y);
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.stamp(&brush, x0, y0);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn stamp(&mut self, brush: &Brush, cx: i32, cy: i32) {
        let (w, h) = (self.raster.width() as i32, self.raster.height() as i32);
        for &(ox, oy) in &brush.offsets {
            let (x, y) = (cx + ox, cy + oy);
            if x < 0 || y < 0 || x >= w || y >= h {
                continue;
            }
            self.raster.put_pixel(x as u32, y as u32, Luma([STROKE]));
        }
    }

    /// Smallest rectangle holding every nonzero pixel, or `None` if the
    /// canvas is blank.
    pub fn bounding_box(&self) -> Option<Rect> {
        bounding_box(&self.raster)
    }

    /// Sub-raster around the recorded points: their bounding rectangle grown
    /// by `padding` on each side and clipped to the canvas.
    /// `None` when there are no points or the rectangle lies fully outside.
    pub fn stroke_region(&self, padding: u32) -> Option<GrayImage> {
        let first = self.points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        let pad = padding as i64;
        let x1 = (min_x as i64 - pad).max(0);
        let y1 = (min_y as i64 - pad).max(0);
        let x2 = (max_x as i64 + 1 + pad).min(self.width() as i64);
        let y2 = (max_y as i64 + 1 + pad).min(self.height() as i64);
        if x2 <= x1 || y2 <= y1 {
            return None;
        }

        let view = image::imageops::crop_imm(
            &self.raster,
            x1 as u32,
            y1 as u32,
            (x2 - x1) as u32,
            (y2 - y1) as u32,
        );
        Some(view.to_image())
    }

    /// Wipe both the raster and the point list. They are only ever reset
    /// together.
    pub fn clear(&mut self) {
        self.points.clear();
        for px in self.raster.pixels_mut() {
            px.0[0] = BACKGROUND;
        }
    }
}

/// Bounding box of all nonzero pixels in `img`.
pub fn bounding_box(img: &GrayImage) -> Option<Rect> {
    let (mut min_x, mut min_y) = (u32::MAX, u32::MAX);
    let (mut max_x, mut max_y) = (0u32, 0u32);
    let mut any = false;
    for (x, y, px) in img.enumerate_pixels() {
        if px.0[0] == 0 {
            continue;
        }
        any = true;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    if !any {
        return None;
    }
    // A single row or column still yields width/height 1.
    Some(Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}
