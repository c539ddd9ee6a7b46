// Core value types shared by the detector, the stroke canvas and the engine.

use std::fmt;

/// MediaPipe-style joint indices for the fingertips the engine reads.
pub mod joints {
    pub const WRIST: usize = 0;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_TIP: usize = 16;
    pub const PINKY_TIP: usize = 20;

    /// Number of joints a full hand observation carries.
    pub const COUNT: usize = 21;

    /// Bones drawn on the preview frame.
    pub const SKELETON: [(usize, usize); 21] = [
        (0, 1), (1, 2), (2, 3), (3, 4),
        (0, 5), (5, 6), (6, 7), (7, 8),
        (0, 9), (9, 10), (10, 11), (11, 12),
        (0, 13), (13, 14), (14, 15), (15, 16),
        (0, 17), (17, 18), (18, 19), (19, 20),
        (5, 9),
    ];
}

/// Normalized coordinates a detector may report for a joint. Slightly
/// off-frame is normal; anything further out is garbage.
pub const PLAUSIBLE_RANGE: std::ops::RangeInclusive<f32> = -1.0..=2.0;

/// A tracked keypoint in normalized image coordinates (0..1 on each axis).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Finite and inside [`PLAUSIBLE_RANGE`] on both axes. Only plausible
    /// landmarks may be turned into pixels.
    pub fn is_plausible(self) -> bool {
        PLAUSIBLE_RANGE.contains(&self.x) && PLAUSIBLE_RANGE.contains(&self.y)
    }

    /// Denormalize against the frame size, truncating like an `int()` cast.
    pub fn to_pixel(self, width: u32, height: u32) -> StrokePoint {
        StrokePoint {
            x: (self.x * width as f32) as i32,
            y: (self.y * height as f32) as i32,
        }
    }
}

/// One detected hand. The joint index is the position in `landmarks`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HandObservation {
    pub landmarks: Vec<Landmark>,
}

impl HandObservation {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    pub fn joint(&self, index: usize) -> Option<Landmark> {
        self.landmarks.get(index).copied()
    }

    /// Index of the first landmark outside [`PLAUSIBLE_RANGE`] (or NaN).
    pub fn first_implausible(&self) -> Option<usize> {
        self.landmarks.iter().position(|lm| !lm.is_plausible())
    }
}

/// Integer pixel coordinate in frame space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StrokePoint {
    pub x: i32,
    pub y: i32,
}

impl StrokePoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: StrokePoint) -> f32 {
        let dx = (self.x as i64 - other.x as i64) as f32;
        let dy = (self.y as i64 - other.y as i64) as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

impl fmt::Display for StrokePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Inclusive-exclusive pixel rectangle: `x..x+width`, `y..y+height`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landmark_denormalizes_by_truncation() {
        let p = Landmark::new(0.5, 0.999).to_pixel(640, 480);
        assert_eq!(p, StrokePoint::new(320, 479));
    }

    #[test]
    fn missing_joint_is_none() {
        let hand = HandObservation::new(vec![Landmark::default(); 5]);
        assert!(hand.joint(joints::INDEX_TIP).is_none());
        assert!(hand.joint(joints::THUMB_TIP).is_some());
    }

    #[test]
    fn point_distance_is_euclidean() {
        assert_eq!(StrokePoint::new(0, 0).distance(StrokePoint::new(3, 4)), 5.0);
    }

    #[test]
    fn wild_landmarks_are_implausible() {
        assert!(Landmark::new(1.3, -0.2).is_plausible());
        assert!(!Landmark::new(-1.0e10, 0.5).is_plausible());
        assert!(!Landmark::new(0.5, f32::NAN).is_plausible());
        assert!(!Landmark::new(f32::INFINITY, 0.5).is_plausible());

        let mut lms = vec![Landmark::new(0.5, 0.5); joints::COUNT];
        assert_eq!(HandObservation::new(lms.clone()).first_implausible(), None);
        lms[joints::PINKY_TIP] = Landmark::new(0.5, 1.0e10);
        assert_eq!(HandObservation::new(lms).first_implausible(), Some(joints::PINKY_TIP));
    }

    #[test]
    fn distance_between_extreme_points_does_not_overflow() {
        let d = StrokePoint::new(i32::MIN, 0).distance(StrokePoint::new(i32::MAX, 0));
        assert!(d.is_finite() && d > 4.0e9);
    }
}
