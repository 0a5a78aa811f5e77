//! Detection session orchestrating sweep → heatmap → threshold → label.
//!
//! One `VehicleDetector` drives one image or video stream: the only
//! cross-frame state is the heatmap history, so concurrent streams each
//! need their own instance. The model and scaler are read-only after
//! construction and shared freely by the parallel sweep underneath.
use super::options::DetectorParams;
use super::subsample::sweep_scales;
use crate::classifier::{FeatureScaler, LinearModel};
use crate::diagnostics::{DetectionReport, TimingBreakdown};
use crate::heatmap::{label_regions, Heatmap, HeatmapHistory};
use crate::image::RgbImageU8;
use crate::types::DetectError;
use log::{debug, warn};
use std::time::Instant;

pub struct VehicleDetector {
    params: DetectorParams,
    model: LinearModel,
    scaler: FeatureScaler,
    history: HeatmapHistory,
}

impl VehicleDetector {
    /// Build a session, validating the configuration and the artifact
    /// dimensions before any frame is accepted.
    pub fn new(
        params: DetectorParams,
        model: LinearModel,
        scaler: FeatureScaler,
    ) -> Result<Self, DetectError> {
        params.validate()?;
        let expected = params.features.feature_length();
        if model.weights.len() != expected {
            return Err(DetectError::Config(format!(
                "model dimension {} does not match feature length {expected}",
                model.weights.len()
            )));
        }
        if scaler.dimension() != expected {
            return Err(DetectError::Config(format!(
                "scaler dimension {} does not match feature length {expected}",
                scaler.dimension()
            )));
        }
        let history = HeatmapHistory::new(params.history_depth);
        Ok(Self {
            params,
            model,
            scaler,
            history,
        })
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// Drop accumulated heatmap history, e.g. between streams.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Process one frame: multi-scale sweep, vote accumulation over the
    /// frame history, thresholding and labeling.
    pub fn process(&mut self, frame: &RgbImageU8) -> DetectionReport {
        let total_start = Instant::now();
        let mut timing = TimingBreakdown::default();

        let sweep_start = Instant::now();
        let raw = match sweep_scales(frame, &self.params, &self.model, &self.scaler) {
            Ok(boxes) => boxes,
            Err(err) => {
                // Construction validated the config, so this is unreachable
                // in practice; degrade to an empty frame rather than abort.
                warn!("sweep failed: {err}");
                Vec::new()
            }
        };
        timing.push("sweep", elapsed_ms(sweep_start));
        debug!("sweep produced {} raw detections", raw.len());

        let heat_start = Instant::now();
        let mut frame_heat = Heatmap::new(frame.w, frame.h);
        frame_heat.add_detections(&raw);
        self.history.push(frame_heat);
        let mut combined = self
            .history
            .combined()
            .unwrap_or_else(|| Heatmap::new(frame.w, frame.h));
        let heatmap_max = combined.max_vote();
        timing.push("heatmap", elapsed_ms(heat_start));

        let label_start = Instant::now();
        combined.threshold(self.params.heat_threshold);
        let regions = label_regions(&combined);
        let boxes = regions.iter().map(|r| r.bbox).collect();
        timing.push("label", elapsed_ms(label_start));

        timing.total_ms = elapsed_ms(total_start);
        DetectionReport {
            boxes,
            regions,
            raw_detections: raw.len(),
            heatmap_max,
            timing,
            heatmap: self.params.keep_heatmap.then_some(combined),
        }
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::VehicleDetector;
    use crate::classifier::{FeatureScaler, LinearModel};
    use crate::detect::options::DetectorParams;

    #[test]
    fn construction_rejects_mismatched_artifacts() {
        let params = DetectorParams::default();
        let dim = params.features.feature_length();
        let model = LinearModel::new(vec![0.0; dim + 1], 0.0);
        let scaler = FeatureScaler::identity(dim);
        assert!(VehicleDetector::new(params, model, scaler).is_err());
    }

    #[test]
    fn construction_accepts_matching_artifacts() {
        let params = DetectorParams::default();
        let dim = params.features.feature_length();
        let model = LinearModel::new(vec![0.0; dim], -1.0);
        let scaler = FeatureScaler::identity(dim);
        assert!(VehicleDetector::new(params, model, scaler).is_ok());
    }
}
