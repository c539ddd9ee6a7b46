// Software drawing for the preview frame.
// Visual effects provided here:
// 1) The stroke canvas painted over the camera image as a neon trail.
// 2) The detected hand: bones as thin lines, joints as small dots.
// 3) A crosshair on the drawing fingertip.

use image::{GrayImage, Rgb, RgbImage};

use crate::canvas::StrokeCanvas;
use crate::types::{HandObservation, joints};

pub const TRAIL_COLOR: Rgb<u8> = Rgb([0, 255, 150]);
pub const BONE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const JOINT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const CROSSHAIR_COLOR: Rgb<u8> = Rgb([255, 204, 51]);

/// Put a pixel on the frame if (x,y) is inside bounds.
#[inline]
fn put_pixel(frame: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x >= frame.width() || y >= frame.height() {
        return;
    }
    frame.put_pixel(x, y, color);
}

/// Draw a thin line between (x0,y0) and (x1,y1) using Bresenham.
pub fn draw_line(frame: &mut RgbImage, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb<u8>) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(frame, x0, y0, color);
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

/// Filled square dot, `radius` pixels from center to edge.
pub fn draw_dot(frame: &mut RgbImage, cx: i32, cy: i32, radius: i32, color: Rgb<u8>) {
    for y in cy - radius..=cy + radius {
        for x in cx - radius..=cx + radius {
            put_pixel(frame, x, y, color);
        }
    }
}

/// A “+” with a small gap at the center.
pub fn draw_crosshair(frame: &mut RgbImage, cx: i32, cy: i32, size: i32, color: Rgb<u8>) {
    draw_line(frame, cx - size, cy, cx - 2, cy, color);
    draw_line(frame, cx + 2, cy, cx + size, cy, color);
    draw_line(frame, cx, cy - size, cx, cy - 2, color);
    draw_line(frame, cx, cy + 2, cx, cy + size, color);
    put_pixel(frame, cx, cy, color);
}

/// Paint every nonzero mask pixel with `color`. Sizes must match; a
/// mismatched mask is ignored.
pub fn overlay_mask(frame: &mut RgbImage, mask: &GrayImage, color: Rgb<u8>) {
    if frame.dimensions() != mask.dimensions() {
        return;
    }
    for (dst, m) in frame.pixels_mut().zip(mask.pixels()) {
        if m.0[0] > 0 {
            *dst = color;
        }
    }
}

/// Skeleton and joints of one hand.
pub fn draw_hand(frame: &mut RgbImage, hand: &HandObservation) {
    let (w, h) = frame.dimensions();
    // Only plausible landmarks are drawn; the rest would be far off-frame.
    let joint = |i: usize| hand.joint(i).filter(|lm| lm.is_plausible());
    for &(a, b) in joints::SKELETON.iter() {
        if let (Some(pa), Some(pb)) = (joint(a), joint(b)) {
            let (pa, pb) = (pa.to_pixel(w, h), pb.to_pixel(w, h));
            draw_line(frame, pa.x, pa.y, pb.x, pb.y, BONE_COLOR);
        }
    }
    for lm in hand.landmarks.iter().filter(|lm| lm.is_plausible()) {
        let p = lm.to_pixel(w, h);
        draw_dot(frame, p.x, p.y, 2, JOINT_COLOR);
    }
}

/// The frame shown to the user: camera image, stroke trail, hand, and a
/// crosshair on the drawing fingertip.
pub fn compose_preview(
    mut frame: RgbImage,
    canvas: &StrokeCanvas,
    hand: Option<&HandObservation>,
    pointer_joint: usize,
) -> RgbImage {
    overlay_mask(&mut frame, canvas.raster(), TRAIL_COLOR);
    if let Some(hand) = hand {
        draw_hand(&mut frame, hand);
        if let Some(tip) = hand.joint(pointer_joint).filter(|lm| lm.is_plausible()) {
            let p = tip.to_pixel(frame.width(), frame.height());
            draw_crosshair(&mut frame, p.x, p.y, 12, CROSSHAIR_COLOR);
        }
    }
    frame
}
