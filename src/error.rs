// One error type for the whole crate.
// Every variant states *where* things went wrong, so a failed construction
// tells the caller which input path (camera, artifacts, config) to replace.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("window init error: {0}")]
    WindowInit(String), // Creating the preview window failed
    #[error("window update error: {0}")]
    WindowUpdate(String), // Pushing a frame to the preview window failed
    #[error("camera init error: {0}")]
    CameraInit(String), // Opening/starting the camera failed
    #[error("camera frame error: {0}")]
    CameraFrame(String), // Grabbing/decoding a frame failed
    #[error("artifact error: {0}")]
    Artifact(String), // mean/std/projection shapes don't line up
    #[error("config error: {0}")]
    Config(String), // A threshold or fraction is out of range
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("hand detector error: {0}")]
    Detector(String), // The external detector raised for this frame
    #[error("malformed detection: {0}")]
    MalformedDetection(String), // Detector answered, but with too few joints
    #[error("classifier error: {0}")]
    Classifier(String), // The external classifier raised for this sample
    #[error("engine lifecycle error: {0}")]
    Lifecycle(String), // start() from the wrong state, worker failed to spawn
}

pub type Result<T> = std::result::Result<T, Error>;
