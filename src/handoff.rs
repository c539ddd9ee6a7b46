// Thread-safe handoff between the capture worker and the consumer.
//
// Everything both sides touch lives in one `EngineState` behind one lock.
// The pending gesture slot holds at most one token: a new recognition
// overwrites an unread one, and `Handoff::get_gesture` empties it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use image::RgbImage;
use parking_lot::Mutex;

use crate::canvas::StrokeCanvas;
use crate::normalize::NormalizedSample;
use crate::pinch::PinchPhase;
use crate::symbols::GestureToken;

pub struct EngineState {
    pub(crate) canvas: StrokeCanvas,
    pub(crate) phase: PinchPhase,
    pub(crate) pending: Option<GestureToken>,
    pub(crate) latest_frame: Option<RgbImage>,
    pub(crate) last_sample: Option<NormalizedSample>,
    /// Bumped by every `clear()`; recognitions from an older epoch are stale.
    pub(crate) epoch: u64,
}

#[derive(Clone)]
pub struct Handoff {
    state: Arc<Mutex<EngineState>>,
    running: Arc<AtomicBool>,
}

impl Handoff {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(EngineState {
                canvas: StrokeCanvas::new(width, height),
                phase: PinchPhase::Idle,
                pending: None,
                latest_frame: None,
                last_sample: None,
                epoch: 0,
            })),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Take the pending gesture, leaving the slot empty.
    pub fn get_gesture(&self) -> Option<GestureToken> {
        self.state.lock().pending.take()
    }

    /// Drop the in-progress stroke and any unread gesture. The worker keeps
    /// running.
    pub fn clear(&self) {
        let mut st = self.state.lock();
        st.pending = None;
        st.phase = PinchPhase::Idle;
        st.canvas.clear();
        st.epoch = st.epoch.wrapping_add(1);
        log::info!("gesture buffer cleared");
    }

    /// Store `token` unless a `clear()` happened after `epoch` was read.
    pub(crate) fn publish(&self, token: GestureToken, epoch: u64) -> bool {
        let mut st = self.state.lock();
        if st.epoch != epoch {
            return false;
        }
        if let Some(old) = st.pending.replace(token) {
            log::debug!("unread gesture {old} replaced by {token}");
        }
        true
    }

    /// Keep `sample` for display unless a `clear()` happened after `epoch`
    /// was read.
    pub(crate) fn store_sample(&self, sample: NormalizedSample, epoch: u64) -> bool {
        let mut st = self.state.lock();
        if st.epoch != epoch {
            return false;
        }
        st.last_sample = Some(sample);
        true
    }

    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&mut EngineState) -> R) -> R {
        f(&mut self.state.lock())
    }

    pub fn latest_frame(&self) -> Option<RgbImage> {
        self.state.lock().latest_frame.clone()
    }

    pub fn last_sample(&self) -> Option<NormalizedSample> {
        self.state.lock().last_sample.clone()
    }

    pub fn is_drawing(&self) -> bool {
        self.state.lock().phase == PinchPhase::Drawing
    }

    pub fn stroke_len(&self) -> usize {
        self.state.lock().canvas.len()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub(crate) fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Release);
    }
}
