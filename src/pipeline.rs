// normalize → project → classify → map, for one committed stroke region.

use image::GrayImage;

use crate::artifacts::ProjectionArtifacts;
use crate::classifier::Classifier;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::normalize::{NormalizedSample, ShapeNormalizer};
use crate::projector::FeatureProjector;
use crate::symbols::{GestureToken, NO_RESULT_LABEL, SymbolMapper};

/// Result of one recognition attempt that didn't hit a collaborator error.
#[derive(Clone, Debug, PartialEq)]
pub struct Recognition {
    /// Classifier label, or [`NO_RESULT_LABEL`] when the region was blank.
    pub label: i64,
    pub token: Option<GestureToken>,
    /// The 28×28 sample that was classified (`None` for a blank region).
    pub sample: Option<NormalizedSample>,
}

pub struct Recognizer {
    normalizer: ShapeNormalizer,
    projector: FeatureProjector,
    classifier: Box<dyn Classifier>,
    mapper: SymbolMapper,
}

impl Recognizer {
    pub fn new(
        cfg: &EngineConfig,
        artifacts: &ProjectionArtifacts,
        classifier: impl Classifier + 'static,
    ) -> Result<Self> {
        Ok(Self {
            normalizer: ShapeNormalizer::new(cfg.margin_fraction),
            projector: FeatureProjector::new(artifacts)?,
            classifier: Box::new(classifier),
            mapper: SymbolMapper::default(),
        })
    }

    pub fn with_mapper(mut self, mapper: SymbolMapper) -> Self {
        self.mapper = mapper;
        self
    }

    /// Errors only come from the classifier; a blank region is a normal
    /// `NO_RESULT_LABEL` outcome.
    pub fn recognize(&mut self, region: &GrayImage) -> Result<Recognition> {
        let Some(sample) = self.normalizer.normalize(region) else {
            return Ok(Recognition {
                label: NO_RESULT_LABEL,
                token: None,
                sample: None,
            });
        };
        let features = self.projector.project(&sample);
        let label = self.classifier.predict(&features)?;
        Ok(Recognition {
            label,
            token: self.mapper.map(label),
            sample: Some(sample),
        })
    }
}
