// Engine lifecycle: `Ready → Running → Stopped`.
//
// Construction does every fallible step up front (config, artifacts, frame
// source resolution) so a caller that gets an `Err` can pick another input
// path and nothing is left half-running. After that, the consumer-facing
// calls never fail.

use std::mem;
use std::thread::{self, JoinHandle};

use image::RgbImage;

use crate::artifacts::ProjectionArtifacts;
use crate::classifier::Classifier;
use crate::config::EngineConfig;
use crate::detector::HandDetector;
use crate::error::{Error, Result};
use crate::handoff::Handoff;
use crate::normalize::NormalizedSample;
use crate::pipeline::Recognizer;
use crate::source::FrameSource;
use crate::symbols::GestureToken;
use crate::worker::Worker;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineStatus {
    Ready,
    Running,
    Stopped,
}

enum Lifecycle {
    Ready(Box<Worker>),
    Running(JoinHandle<()>),
    Stopped,
}

pub struct SpellEngine {
    handoff: Handoff,
    lifecycle: Lifecycle,
    resolution: (u32, u32),
}

impl SpellEngine {
    pub fn new(
        config: &EngineConfig,
        source: impl FrameSource + 'static,
        detector: impl HandDetector + 'static,
        classifier: impl Classifier + 'static,
        artifacts: &ProjectionArtifacts,
    ) -> Result<Self> {
        config.validate()?;
        let (w, h) = source.resolution();
        if w == 0 || h == 0 {
            return Err(Error::CameraInit(format!("frame source reports {w}x{h}")));
        }
        let cfg = config.scaled_for(w, h);
        let recognizer = Recognizer::new(&cfg, artifacts, classifier)?;
        let handoff = Handoff::new(w, h);
        let worker = Worker::new(source, detector, recognizer, &cfg, handoff.clone());
        log::info!("spell engine ready at {w}x{h}");
        Ok(Self {
            handoff,
            lifecycle: Lifecycle::Ready(Box::new(worker)),
            resolution: (w, h),
        })
    }

    /// `new` followed by `start`.
    pub fn spawn(
        config: &EngineConfig,
        source: impl FrameSource + 'static,
        detector: impl HandDetector + 'static,
        classifier: impl Classifier + 'static,
        artifacts: &ProjectionArtifacts,
    ) -> Result<Self> {
        let mut engine = Self::new(config, source, detector, classifier, artifacts)?;
        engine.start()?;
        Ok(engine)
    }

    /// Spawn the capture worker. Only valid once, from `Ready`.
    pub fn start(&mut self) -> Result<()> {
        let worker = match mem::replace(&mut self.lifecycle, Lifecycle::Stopped) {
            Lifecycle::Ready(worker) => worker,
            running @ Lifecycle::Running(_) => {
                self.lifecycle = running;
                return Err(Error::Lifecycle("engine is already running".into()));
            }
            Lifecycle::Stopped => {
                return Err(Error::Lifecycle("engine was stopped; build a new one".into()));
            }
        };

        self.handoff.set_running(true);
        let spawned = thread::Builder::new()
            .name("spellcaster-capture".into())
            .spawn(move || worker.run());
        match spawned {
            Ok(handle) => {
                self.lifecycle = Lifecycle::Running(handle);
                Ok(())
            }
            Err(e) => {
                self.handoff.set_running(false);
                Err(Error::Lifecycle(format!("spawn capture thread: {e}")))
            }
        }
    }

    /// Stop the worker and release the frame source and detector. Safe to
    /// call any number of times, in any state.
    pub fn stop(&mut self) {
        self.handoff.set_running(false);
        match mem::replace(&mut self.lifecycle, Lifecycle::Stopped) {
            Lifecycle::Running(handle) => {
                if handle.join().is_err() {
                    log::error!("capture thread ended with a panic");
                }
                log::info!("spell engine stopped");
            }
            Lifecycle::Ready(worker) => {
                drop(worker);
                log::info!("spell engine stopped before it started");
            }
            Lifecycle::Stopped => {}
        }
    }

    pub fn status(&self) -> EngineStatus {
        match self.lifecycle {
            Lifecycle::Ready(_) => EngineStatus::Ready,
            Lifecycle::Running(_) => EngineStatus::Running,
            Lifecycle::Stopped => EngineStatus::Stopped,
        }
    }

    /// False before `start`, after `stop`, and after the worker died.
    pub fn is_running(&self) -> bool {
        self.handoff.is_running()
    }

    pub fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    pub fn get_gesture(&self) -> Option<GestureToken> {
        self.handoff.get_gesture()
    }

    pub fn clear(&self) {
        self.handoff.clear();
    }

    pub fn is_drawing(&self) -> bool {
        self.handoff.is_drawing()
    }

    /// Mirrored camera frame with the stroke trail and hand drawn on it.
    pub fn latest_frame(&self) -> Option<RgbImage> {
        self.handoff.latest_frame()
    }

    /// The last 28×28 sample handed to the classifier.
    pub fn last_sample(&self) -> Option<NormalizedSample> {
        self.handoff.last_sample()
    }
}

impl Drop for SpellEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
