// Precomputed normalization artifacts, loaded once at startup.
// File format: one JSON object
//   { "mean": [784], "std": [784], "components": [[k] x 784],
//     "centroids": [{ "label": 1, "features": [k] }, ...] }   (centroids optional)

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::normalize::SAMPLE_LEN;

/// Mean feature vector of one class, for the bundled nearest-centroid classifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabeledCentroid {
    pub label: i64,
    pub features: Vec<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectionArtifacts {
    pub mean: Vec<f32>,
    pub std: Vec<f32>,
    /// 784 rows × k columns.
    pub components: Vec<Vec<f32>>,
    #[serde(default)]
    pub centroids: Vec<LabeledCentroid>,
}

impl ProjectionArtifacts {
    /// Read and shape-check the artifact file. Any problem here is fatal for
    /// engine construction.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifacts: Self = serde_json::from_str(&text).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        artifacts.validate()?;
        log::info!(
            "loaded projection artifacts from {} ({} components, {} centroids)",
            path.display(),
            artifacts.output_dim(),
            artifacts.centroids.len()
        );
        Ok(artifacts)
    }

    /// k, the projected feature length.
    pub fn output_dim(&self) -> usize {
        self.components.first().map_or(0, Vec::len)
    }

    pub fn validate(&self) -> Result<()> {
        if self.mean.len() != SAMPLE_LEN {
            return Err(Error::Artifact(format!(
                "mean has {} entries, expected {SAMPLE_LEN}",
                self.mean.len()
            )));
        }
        if self.std.len() != SAMPLE_LEN {
            return Err(Error::Artifact(format!(
                "std has {} entries, expected {SAMPLE_LEN}",
                self.std.len()
            )));
        }
        if self.components.len() != SAMPLE_LEN {
            return Err(Error::Artifact(format!(
                "projection matrix has {} rows, expected {SAMPLE_LEN}",
                self.components.len()
            )));
        }
        let k = self.output_dim();
        if k == 0 {
            return Err(Error::Artifact("projection matrix has no columns".into()));
        }
        if let Some(row) = self.components.iter().position(|r| r.len() != k) {
            return Err(Error::Artifact(format!(
                "projection matrix row {row} has {} columns, expected {k}",
                self.components[row].len()
            )));
        }
        if let Some(c) = self.centroids.iter().find(|c| c.features.len() != k) {
            return Err(Error::Artifact(format!(
                "centroid for label {} has {} features, expected {k}",
                c.label,
                c.features.len()
            )));
        }
        Ok(())
    }
}
