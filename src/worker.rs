// Capture/detection loop.
//
// Each iteration: pull a frame, mirror it, run the hand detector, feed the
// first hand to the pinch state machine under the shared lock, refresh the
// preview frame, and on a commit run recognition and publish the token.
// Every iteration ends in a typed `IterationOutcome`; nothing a
// collaborator does in one iteration can end the loop.

use std::thread;
use std::time::Duration;

use image::GrayImage;

use crate::config::EngineConfig;
use crate::detector::HandDetector;
use crate::draw::compose_preview;
use crate::error::Error;
use crate::handoff::Handoff;
use crate::pinch::{Commit, PinchStep, PinchTracker};
use crate::pipeline::Recognizer;
use crate::source::FrameSource;
use crate::symbols::GestureToken;
use crate::types::HandObservation;

/// Why a commit produced no token. None of these are errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NoResultReason {
    TooFewPoints(usize),
    EmptyCanvas,
    UnknownLabel(i64),
    /// `clear()` ran while the stroke was being recognized.
    Superseded,
}

#[derive(Debug)]
pub enum IterationOutcome {
    NoFrame,
    NoHand,
    Drawing { segment_drawn: bool },
    PinchHeld,
    Recognized(GestureToken),
    NoResult(NoResultReason),
    TransientFailure(Error),
}

pub struct Worker {
    source: Box<dyn FrameSource>,
    detector: Box<dyn HandDetector>,
    recognizer: Recognizer,
    tracker: PinchTracker,
    handoff: Handoff,
    mirror: bool,
    pointer_joint: usize,
    idle_sleep: Duration,
}

impl Worker {
    pub fn new(
        source: impl FrameSource + 'static,
        detector: impl HandDetector + 'static,
        recognizer: Recognizer,
        cfg: &EngineConfig,
        handoff: Handoff,
    ) -> Self {
        Self {
            source: Box::new(source),
            detector: Box::new(detector),
            recognizer,
            tracker: PinchTracker::new(cfg),
            handoff,
            mirror: cfg.mirror_frames,
            pointer_joint: cfg.pointer_joint,
            idle_sleep: Duration::from_millis(cfg.idle_sleep_ms),
        }
    }

    pub fn handoff(&self) -> &Handoff {
        &self.handoff
    }

    pub fn run_once(&mut self) -> IterationOutcome {
        let mut frame = match self.source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return IterationOutcome::NoFrame,
            Err(e) => return IterationOutcome::TransientFailure(e),
        };
        if self.mirror {
            image::imageops::flip_horizontal_in_place(&mut frame);
        }

        let hand = match self.detector.detect(&frame) {
            Ok(hands) => hands.into_iter().next(),
            Err(e) => return IterationOutcome::TransientFailure(e),
        };
        if let Some(idx) = hand.as_ref().and_then(HandObservation::first_implausible) {
            return IterationOutcome::TransientFailure(Error::MalformedDetection(format!(
                "landmark {idx} is outside the frame range"
            )));
        }

        let tracker = &self.tracker;
        let pointer_joint = self.pointer_joint;
        let (step, epoch) = self.handoff.with_state(|st| {
            let step = tracker.observe(&mut st.phase, &mut st.canvas, hand.as_ref());
            st.latest_frame = Some(compose_preview(frame, &st.canvas, hand.as_ref(), pointer_joint));
            (step, st.epoch)
        });

        match step {
            Err(e) => IterationOutcome::TransientFailure(e),
            Ok(PinchStep::NoHand) => IterationOutcome::NoHand,
            Ok(PinchStep::PinchHeld) => IterationOutcome::PinchHeld,
            Ok(PinchStep::Extended { segment_drawn, .. }) => IterationOutcome::Drawing { segment_drawn },
            Ok(PinchStep::Committed(Commit::TooFewPoints(n))) => {
                IterationOutcome::NoResult(NoResultReason::TooFewPoints(n))
            }
            Ok(PinchStep::Committed(Commit::OffCanvas)) => {
                IterationOutcome::NoResult(NoResultReason::EmptyCanvas)
            }
            Ok(PinchStep::Committed(Commit::Stroke(region))) => self.recognize(&region, epoch),
        }
    }

    fn recognize(&mut self, region: &GrayImage, epoch: u64) -> IterationOutcome {
        let rec = match self.recognizer.recognize(region) {
            Ok(rec) => rec,
            Err(e) => return IterationOutcome::TransientFailure(e),
        };
        if let Some(sample) = rec.sample.clone() {
            self.handoff.store_sample(sample, epoch);
        }
        match rec.token {
            Some(token) if self.handoff.publish(token, epoch) => IterationOutcome::Recognized(token),
            Some(_) => IterationOutcome::NoResult(NoResultReason::Superseded),
            None if rec.sample.is_none() => IterationOutcome::NoResult(NoResultReason::EmptyCanvas),
            None => IterationOutcome::NoResult(NoResultReason::UnknownLabel(rec.label)),
        }
    }

    /// Loop until the running flag drops. The frame source and detector are
    /// released when this returns or unwinds.
    pub fn run(mut self) {
        let _exit = ExitGuard(self.handoff.clone());
        log::info!("capture loop started");
        while self.handoff.is_running() {
            match self.run_once() {
                IterationOutcome::Recognized(token) => {
                    log::info!("spell detected: {token} ({})", token.spell_name());
                }
                IterationOutcome::NoResult(reason) => {
                    log::debug!("stroke committed without a spell: {reason:?}");
                }
                IterationOutcome::TransientFailure(e) => {
                    log::warn!("skipping frame: {e}");
                    thread::sleep(self.idle_sleep);
                }
                IterationOutcome::NoFrame => thread::sleep(self.idle_sleep),
                IterationOutcome::NoHand
                | IterationOutcome::PinchHeld
                | IterationOutcome::Drawing { .. } => {}
            }
        }
        drop(self);
        log::info!("camera and detector released");
    }
}

/// Clears the running flag however the loop ends.
struct ExitGuard(Handoff);

impl Drop for ExitGuard {
    fn drop(&mut self) {
        self.0.set_running(false);
        if thread::panicking() {
            log::error!("capture loop panicked");
        } else {
            log::info!("capture loop stopped");
        }
    }
}
