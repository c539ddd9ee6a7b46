// Classifier seam: projected features in, integer label out.
// The trained model is external; CentroidClassifier is a small stand-in
// built from the centroids shipped in the artifact file.

use crate::artifacts::{LabeledCentroid, ProjectionArtifacts};
use crate::error::{Error, Result};
use crate::projector::FeatureVector;

pub trait Classifier: Send {
    fn predict(&mut self, features: &FeatureVector) -> Result<i64>;
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn predict(&mut self, features: &FeatureVector) -> Result<i64> {
        (**self).predict(features)
    }
}

/// Nearest class mean in feature space (squared Euclidean).
#[derive(Clone, Debug)]
pub struct CentroidClassifier {
    centroids: Vec<LabeledCentroid>,
}

impl CentroidClassifier {
    pub fn new(centroids: Vec<LabeledCentroid>) -> Result<Self> {
        let Some(first) = centroids.first() else {
            return Err(Error::Artifact("no class centroids to classify against".into()));
        };
        let k = first.features.len();
        if centroids.iter().any(|c| c.features.len() != k) {
            return Err(Error::Artifact("centroids disagree on feature length".into()));
        }
        Ok(Self { centroids })
    }

    pub fn from_artifacts(artifacts: &ProjectionArtifacts) -> Result<Self> {
        Self::new(artifacts.centroids.clone())
    }
}

impl Classifier for CentroidClassifier {
    fn predict(&mut self, features: &FeatureVector) -> Result<i64> {
        let mut best: Option<(f32, i64)> = None;
        for c in &self.centroids {
            if c.features.len() != features.len() {
                return Err(Error::Classifier(format!(
                    "expected {} features, got {}",
                    c.features.len(),
                    features.len()
                )));
            }
            let d: f32 = c
                .features
                .iter()
                .zip(features.as_slice())
                .map(|(a, b)| (a - b) * (a - b))
                .sum();
            if best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, c.label));
            }
        }
        best.map(|(_, label)| label)
            .ok_or_else(|| Error::Classifier("no centroids".into()))
    }
}
