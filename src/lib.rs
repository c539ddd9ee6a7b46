// spellcaster
//
// Turns a live stream of hand observations into spell tokens.
//
// The user draws with one fingertip and pinches two fingertips together to
// commit. The committed stroke is normalized to a 28×28 sample, projected
// with fixed mean/std/PCA artifacts, classified by an external model, and
// mapped to one of four spells: `O`, `/`, `|`, `\`.
//
// ```text
// FrameSource ─► HandDetector ─► PinchTracker ─► StrokeCanvas
//                                     │ commit
//                                     ▼
//          ShapeNormalizer ─► FeatureProjector ─► Classifier ─► SymbolMapper
//                                                                   │
//                        consumer ◄── get_gesture() ◄── Handoff ◄───┘
// ```
//
// A background worker runs the capture loop; the consumer polls
// `SpellEngine::get_gesture` from its own tick. Only construction can
// fail; per-frame problems are logged and skipped.
//
// Feature flags:
//
// * (default): core only. Bring your own frame source and detector.
// * `live`: webcam capture (`nokhwa`) and a preview window (`minifb`).

pub mod artifacts;
pub mod canvas;
pub mod classifier;
pub mod config;
pub mod detector;
pub mod draw;
pub mod engine;
pub mod error;
pub mod handoff;
pub mod normalize;
pub mod pinch;
pub mod pipeline;
pub mod projector;
pub mod source;
pub mod symbols;
pub mod types;
pub mod worker;

#[cfg(feature = "live")]
pub mod camera;
#[cfg(feature = "live")]
pub mod window;

pub use artifacts::{LabeledCentroid, ProjectionArtifacts};
pub use canvas::StrokeCanvas;
pub use classifier::{CentroidClassifier, Classifier};
pub use config::EngineConfig;
pub use detector::{HandDetector, PointerDetector, PointerState, SharedPointer};
pub use engine::{EngineStatus, SpellEngine};
pub use error::{Error, Result};
pub use handoff::Handoff;
pub use normalize::{NormalizedSample, SAMPLE_LEN, SAMPLE_SIDE, ShapeNormalizer};
pub use pinch::{PinchPhase, PinchTracker};
pub use pipeline::{Recognition, Recognizer};
pub use projector::{FeatureProjector, FeatureVector};
pub use source::{BlankSource, FrameSource};
pub use symbols::{GestureToken, NO_RESULT_LABEL, SymbolMapper};
pub use types::{HandObservation, Landmark, StrokePoint};
pub use worker::{IterationOutcome, NoResultReason, Worker};
