// Hand detector seam.
//
// The real landmark model lives outside this crate; the engine talks to it
// through `HandDetector`. `PointerDetector` stands in for it by turning a
// shared pointer (mouse) position into a synthetic hand:
// button held = fingers apart (drawing), button released = pinch (commit),
// pointer off-frame = no hand.

use std::sync::Arc;

use image::RgbImage;
use parking_lot::Mutex;

use crate::error::Result;
use crate::types::{HandObservation, Landmark, joints};

pub trait HandDetector: Send {
    /// Every hand found in `frame`. The engine only reads the first one.
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<HandObservation>>;
}

impl<D: HandDetector + ?Sized> HandDetector for Box<D> {
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<HandObservation>> {
        (**self).detect(frame)
    }
}

/// Latest pointer state, written by the UI thread.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    /// Normalized position, `None` when the pointer is outside the frame.
    pub position: Option<(f32, f32)>,
    pub pressed: bool,
}

pub type SharedPointer = Arc<Mutex<PointerState>>;

pub struct PointerDetector {
    pointer: SharedPointer,
    pointer_joint: usize,
    pinch_joint: usize,
    /// Normalized offset of the pinch joint while "drawing".
    spread: f32,
}

impl PointerDetector {
    pub fn new(pointer: SharedPointer, pointer_joint: usize, pinch_joint: usize) -> Self {
        Self {
            pointer,
            pointer_joint,
            pinch_joint,
            spread: 0.2,
        }
    }

    pub fn shared() -> SharedPointer {
        Arc::new(Mutex::new(PointerState::default()))
    }
}

impl HandDetector for PointerDetector {
    fn detect(&mut self, _frame: &RgbImage) -> Result<Vec<HandObservation>> {
        let state = *self.pointer.lock();
        let Some((x, y)) = state.position else {
            return Ok(Vec::new());
        };

        let len = joints::COUNT.max(self.pointer_joint + 1).max(self.pinch_joint + 1);
        let mut landmarks = vec![Landmark::new(x, y); len];
        if state.pressed {
            // Fingers apart: park the pinch joint below the pointer.
            landmarks[self.pinch_joint] = Landmark::new(x, y + self.spread);
        }
        Ok(vec![HandObservation::new(landmarks)])
    }
}
