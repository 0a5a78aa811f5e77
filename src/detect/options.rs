//! Parameter types configuring the detection stages.
//!
//! Knobs are grouped per concern (feature layout, the multi-scale sweep,
//! the heatmap merge) and validated once up front so a bad
//! configuration fails before any per-window work starts. Defaults target
//! a 1280×720 road scene with the horizon near y=400.
use crate::features::FeatureParams;
use crate::types::{BoundingBox, DetectError};
use serde::Deserialize;

/// Search-region bounds in frame coordinates. `None` stops extend to the
/// frame edge, mirroring "no bound given".
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchRegion {
    pub x_start: usize,
    pub x_stop: Option<usize>,
    pub y_start: usize,
    pub y_stop: Option<usize>,
}

impl SearchRegion {
    /// The whole frame.
    pub fn full() -> Self {
        Self::default()
    }

    /// Vertical band across the full frame width.
    pub fn y_band(y_start: usize, y_stop: usize) -> Self {
        Self {
            y_start,
            y_stop: Some(y_stop),
            ..Self::default()
        }
    }

    /// Resolve against a frame extent.
    ///
    /// An empty region is a configuration error; explicit stops outside
    /// the frame are a geometry error (the caller pointed the search at
    /// pixels that do not exist).
    pub fn resolve(&self, frame_w: usize, frame_h: usize) -> Result<BoundingBox, DetectError> {
        let x_stop = self.x_stop.unwrap_or(frame_w);
        let y_stop = self.y_stop.unwrap_or(frame_h);
        if x_stop > frame_w || y_stop > frame_h {
            return Err(DetectError::Geometry(format!(
                "search region ({}, {}) exceeds frame extent {}x{}",
                x_stop, y_stop, frame_w, frame_h
            )));
        }
        if self.x_start >= x_stop || self.y_start >= y_stop {
            return Err(DetectError::Config(format!(
                "search region [{}, {}) x [{}, {}) is empty",
                self.x_start, x_stop, self.y_start, y_stop
            )));
        }
        Ok(BoundingBox::new(self.x_start, self.y_start, x_stop, y_stop))
    }
}

/// One entry of the multi-scale sweep: a relative window scale and the
/// frame band it searches.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct ScaleBand {
    pub scale: f32,
    #[serde(default)]
    pub region: SearchRegion,
}

/// Detector-wide parameters for the sweep-and-merge pipeline.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    /// Feature layout; must equal the training-time configuration.
    pub features: FeatureParams,
    /// Scale sweep for the HOG sub-sampling search.
    pub scales: Vec<ScaleBand>,
    /// Window step of the sub-sampling search, in HOG cells.
    pub cells_per_step: usize,
    /// Votes `<=` this are zeroed before labeling.
    pub heat_threshold: u32,
    /// Frames of heatmap history summed before thresholding; 0 disables
    /// temporal smoothing.
    pub history_depth: usize,
    /// Retain the combined heatmap in the report for diagnostics.
    pub keep_heatmap: bool,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            features: FeatureParams::default(),
            scales: vec![
                ScaleBand {
                    scale: 1.0,
                    region: SearchRegion::y_band(400, 528),
                },
                ScaleBand {
                    scale: 1.5,
                    region: SearchRegion::y_band(400, 592),
                },
                ScaleBand {
                    scale: 2.0,
                    region: SearchRegion::y_band(400, 656),
                },
            ],
            cells_per_step: 2,
            heat_threshold: 1,
            history_depth: 0,
            keep_heatmap: false,
        }
    }
}

impl DetectorParams {
    pub fn validate(&self) -> Result<(), DetectError> {
        self.features.validate()?;
        if self.scales.is_empty() {
            return Err(DetectError::Config("scale sweep must be non-empty".into()));
        }
        if self.scales.iter().any(|s| !(s.scale > 0.0)) {
            return Err(DetectError::Config(
                "scale factors must be positive and finite".into(),
            ));
        }
        if self.cells_per_step == 0 {
            return Err(DetectError::Config("cells_per_step must be positive".into()));
        }
        Ok(())
    }
}
