// Pinch gesture state machine.
//
// One call per processed frame:
//
// | hand | fingers | phase before | effect |
// |---|---|---|---|
// | none | – | any | nothing |
// | yes | apart | any | → `Drawing`, append point, join to the last point unless it jumped |
// | yes | pinched | `Drawing` | commit: snapshot the stroke region, clear canvas + points, → `Idle` |
// | yes | pinched | `Idle` | nothing (pinch held) |

use image::GrayImage;

use crate::canvas::StrokeCanvas;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::types::{HandObservation, StrokePoint};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PinchPhase {
    #[default]
    Idle,
    Drawing,
}

/// What a commit left behind for recognition.
#[derive(Debug)]
pub enum Commit {
    /// Canvas region around the stroke, ready for the normalizer.
    Stroke(GrayImage),
    /// Fewer points than the minimum; not classified.
    TooFewPoints(usize),
    /// Every point fell outside the frame.
    OffCanvas,
}

#[derive(Debug)]
pub enum PinchStep {
    NoHand,
    Extended {
        point: StrokePoint,
        segment_drawn: bool,
    },
    PinchHeld,
    Committed(Commit),
}

#[derive(Clone, Debug)]
pub struct PinchTracker {
    pinch_threshold: f32,
    max_jump: f32,
    thickness: u32,
    min_points: usize,
    roi_padding: u32,
    pointer_joint: usize,
    pinch_joint: usize,
}

impl PinchTracker {
    pub fn new(cfg: &EngineConfig) -> Self {
        Self {
            pinch_threshold: cfg.pinch_threshold_px,
            max_jump: cfg.max_jump_px,
            thickness: cfg.stroke_thickness_px,
            min_points: cfg.min_stroke_points,
            roi_padding: cfg.roi_padding_px,
            pointer_joint: cfg.pointer_joint,
            pinch_joint: cfg.pinch_joint,
        }
    }

    /// Advance by one frame. A hand missing either tracked joint, or with
    /// one far outside the frame, is a malformed detection and leaves
    /// everything untouched.
    pub fn observe(
        &self,
        phase: &mut PinchPhase,
        canvas: &mut StrokeCanvas,
        hand: Option<&HandObservation>,
    ) -> Result<PinchStep> {
        let Some(hand) = hand else {
            return Ok(PinchStep::NoHand);
        };
        let (w, h) = (canvas.width(), canvas.height());
        let joint = |idx: usize| {
            let lm = hand.joint(idx).ok_or_else(|| {
                Error::MalformedDetection(format!(
                    "hand has {} joints, joint {idx} missing",
                    hand.landmarks.len()
                ))
            })?;
            if !lm.is_plausible() {
                return Err(Error::MalformedDetection(format!(
                    "joint {idx} at ({}, {}) is outside the frame range",
                    lm.x, lm.y
                )));
            }
            Ok(lm.to_pixel(w, h))
        };
        let tip = joint(self.pointer_joint)?;
        let other = joint(self.pinch_joint)?;

        if tip.distance(other) < self.pinch_threshold {
            if *phase == PinchPhase::Idle {
                return Ok(PinchStep::PinchHeld);
            }
            let commit = self.take_stroke(canvas);
            canvas.clear();
            *phase = PinchPhase::Idle;
            return Ok(PinchStep::Committed(commit));
        }

        *phase = PinchPhase::Drawing;
        let mut segment_drawn = false;
        if let Some(last) = canvas.last_point() {
            // Longer jumps are tracking glitches: keep the point as the new
            // anchor but don't draw the segment.
            if last.distance(tip) < self.max_jump {
                canvas.rasterize_segment(last, tip, self.thickness);
                segment_drawn = true;
            }
        }
        canvas.append_point(tip);
        Ok(PinchStep::Extended { point: tip, segment_drawn })
    }

    fn take_stroke(&self, canvas: &StrokeCanvas) -> Commit {
        if canvas.len() < self.min_points {
            return Commit::TooFewPoints(canvas.len());
        }
        match canvas.stroke_region(self.roi_padding) {
            Some(region) => Commit::Stroke(region),
            None => Commit::OffCanvas,
        }
    }
}
