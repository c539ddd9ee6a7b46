// Feature projector: scale → standardize → project.
// Pure linear algebra over three fixed artifacts; same input, same output bits.

use crate::artifacts::ProjectionArtifacts;
use crate::error::Result;
use crate::normalize::{NormalizedSample, SAMPLE_LEN};

/// Standard deviations below this are clamped to it.
pub const STD_EPSILON: f32 = 1e-6;

/// Projected features handed to the classifier.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureVector(pub Vec<f32>);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub struct FeatureProjector {
    mean: Vec<f32>,
    inv_std: Vec<f32>,
    /// Row-major, SAMPLE_LEN rows × k columns.
    matrix: Vec<f32>,
    k: usize,
}

impl FeatureProjector {
    pub fn new(artifacts: &ProjectionArtifacts) -> Result<Self> {
        artifacts.validate()?;
        let k = artifacts.output_dim();

        let zero_std = artifacts.std.iter().filter(|s| s.abs() < STD_EPSILON).count();
        if zero_std > 0 {
            log::debug!("clamping {zero_std} near-zero std entries to {STD_EPSILON}");
        }
        let inv_std = artifacts
            .std
            .iter()
            .map(|&s| 1.0 / if s.abs() < STD_EPSILON { STD_EPSILON } else { s })
            .collect();

        let mut matrix = Vec::with_capacity(SAMPLE_LEN * k);
        for row in &artifacts.components {
            matrix.extend_from_slice(row);
        }

        Ok(Self {
            mean: artifacts.mean.clone(),
            inv_std,
            matrix,
            k,
        })
    }

    pub fn output_dim(&self) -> usize {
        self.k
    }

    pub fn project(&self, sample: &NormalizedSample) -> FeatureVector {
        let mut out = vec![0.0f32; self.k];
        for (i, &v) in sample.values().iter().enumerate() {
            let z = (v / 255.0 - self.mean[i]) * self.inv_std[i];
            if z == 0.0 {
                continue;
            }
            let row = &self.matrix[i * self.k..(i + 1) * self.k];
            for (o, &w) in out.iter_mut().zip(row) {
                *o += z * w;
            }
        }
        FeatureVector(out)
    }
}
