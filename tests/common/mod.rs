// Scripted collaborators shared by the integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use image::RgbImage;
use parking_lot::Mutex;
use spellcaster::types::joints;
use spellcaster::{
    Classifier, EngineConfig, Error, FeatureVector, FrameSource, HandDetector, HandObservation,
    Handoff, Landmark, ProjectionArtifacts, Recognizer, Result, SAMPLE_LEN, Worker,
};

pub const W: u32 = 640;
pub const H: u32 = 480;

// ============================================================================
// Hands
// ============================================================================

/// Hand with the index tip at pixel (x, y), fingers 60px apart (drawing).
pub fn open_hand(x: i32, y: i32) -> HandObservation {
    hand_with_spread(x, y, 60)
}

/// Hand with index and middle tips on the same pixel (pinch).
pub fn pinched_hand(x: i32, y: i32) -> HandObservation {
    hand_with_spread(x, y, 0)
}

fn hand_with_spread(x: i32, y: i32, spread: i32) -> HandObservation {
    // +0.5 keeps the truncating pixel cast on (x, y).
    let at = |px: i32, py: i32| Landmark::new((px as f32 + 0.5) / W as f32, (py as f32 + 0.5) / H as f32);
    let mut lms = vec![at(x, y); joints::COUNT];
    lms[joints::MIDDLE_TIP] = at(x, y + spread);
    HandObservation::new(lms)
}

/// Closed loop of `n` points on a circle, first point repeated at the end.
pub fn circle_points(cx: i32, cy: i32, radius: f32, n: usize) -> Vec<(i32, i32)> {
    let mut pts: Vec<(i32, i32)> = (0..n)
        .map(|i| {
            let t = i as f32 / n as f32 * std::f32::consts::TAU;
            (cx + (radius * t.cos()) as i32, cy + (radius * t.sin()) as i32)
        })
        .collect();
    pts.push(pts[0]);
    pts
}

// ============================================================================
// Frame sources
// ============================================================================

/// Plays back a script of frame results, then blank frames forever.
pub struct ScriptedSource {
    script: VecDeque<Result<Option<RgbImage>>>,
    width: u32,
    height: u32,
}

impl ScriptedSource {
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(width, height, Vec::new())
    }

    pub fn new(width: u32, height: u32, script: Vec<Result<Option<RgbImage>>>) -> Self {
        Self {
            script: script.into(),
            width,
            height,
        }
    }
}

impl FrameSource for ScriptedSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        match self.script.pop_front() {
            Some(step) => step,
            None => Ok(Some(RgbImage::new(self.width, self.height))),
        }
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

// ============================================================================
// Detectors
// ============================================================================

/// One scripted result per frame; no hands once the script runs out.
/// Sets `released` when dropped.
pub struct ScriptedDetector {
    script: Arc<Mutex<VecDeque<Result<Vec<HandObservation>>>>>,
    released: Arc<AtomicBool>,
}

impl ScriptedDetector {
    pub fn new(script: Vec<Result<Vec<HandObservation>>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Drawing through `points`, then one pinch at the last point.
    pub fn stroke(points: &[(i32, i32)]) -> Self {
        Self::new(stroke_script(points))
    }

    pub fn released_flag(&self) -> Arc<AtomicBool> {
        self.released.clone()
    }

    /// Handle for appending more steps while the detector is owned elsewhere.
    pub fn script_handle(&self) -> Arc<Mutex<VecDeque<Result<Vec<HandObservation>>>>> {
        self.script.clone()
    }
}

pub fn stroke_script(points: &[(i32, i32)]) -> Vec<Result<Vec<HandObservation>>> {
    let mut script: Vec<Result<Vec<HandObservation>>> =
        points.iter().map(|&(x, y)| Ok(vec![open_hand(x, y)])).collect();
    if let Some(&(x, y)) = points.last() {
        script.push(Ok(vec![pinched_hand(x, y)]));
    }
    script
}

impl HandDetector for ScriptedDetector {
    fn detect(&mut self, _frame: &RgbImage) -> Result<Vec<HandObservation>> {
        self.script.lock().pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

impl Drop for ScriptedDetector {
    fn drop(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

pub struct PanickingDetector;

impl HandDetector for PanickingDetector {
    fn detect(&mut self, _frame: &RgbImage) -> Result<Vec<HandObservation>> {
        panic!("detector crashed");
    }
}

// ============================================================================
// Classifiers
// ============================================================================

/// Returns scripted labels in order; counts every call.
pub struct ScriptedClassifier {
    labels: VecDeque<Result<i64>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedClassifier {
    pub fn new(labels: Vec<Result<i64>>) -> Self {
        Self {
            labels: labels.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn always(label: i64) -> Self {
        Self::new((0..64).map(|_| Ok(label)).collect())
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

impl Classifier for ScriptedClassifier {
    fn predict(&mut self, features: &FeatureVector) -> Result<i64> {
        assert!(!features.is_empty());
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.labels
            .pop_front()
            .unwrap_or_else(|| Err(Error::Classifier("script exhausted".into())))
    }
}

/// Calls `clear()` on the attached handoff while "classifying", the way a
/// consumer racing the worker would.
pub struct ClearingClassifier {
    label: i64,
    handoff: Arc<Mutex<Option<Handoff>>>,
}

impl ClearingClassifier {
    pub fn new(label: i64) -> Self {
        Self {
            label,
            handoff: Arc::new(Mutex::new(None)),
        }
    }

    pub fn handoff_slot(&self) -> Arc<Mutex<Option<Handoff>>> {
        self.handoff.clone()
    }
}

impl Classifier for ClearingClassifier {
    fn predict(&mut self, _features: &FeatureVector) -> Result<i64> {
        if let Some(handoff) = self.handoff.lock().as_ref() {
            handoff.clear();
        }
        Ok(self.label)
    }
}

// ============================================================================
// Artifacts and wiring
// ============================================================================

/// Identity-ish artifacts: zero mean, unit std, `k` columns.
pub fn artifacts(k: usize) -> ProjectionArtifacts {
    let mut components = vec![vec![0.0; k]; SAMPLE_LEN];
    for (i, row) in components.iter_mut().enumerate() {
        row[i % k] = 1.0;
    }
    ProjectionArtifacts {
        mean: vec![0.0; SAMPLE_LEN],
        std: vec![1.0; SAMPLE_LEN],
        components,
        centroids: Vec::new(),
    }
}

/// A worker on blank frames, ready for `run_once`.
pub fn worker(detector: ScriptedDetector, classifier: impl Classifier + 'static) -> Worker {
    worker_with_source(ScriptedSource::blank(W, H), detector, classifier)
}

pub fn worker_with_source(
    source: ScriptedSource,
    detector: ScriptedDetector,
    classifier: impl Classifier + 'static,
) -> Worker {
    let cfg = EngineConfig::default();
    let (w, h) = source.resolution();
    let recognizer = Recognizer::new(&cfg, &artifacts(4), classifier).expect("recognizer");
    Worker::new(source, detector, recognizer, &cfg, Handoff::new(w, h))
}
