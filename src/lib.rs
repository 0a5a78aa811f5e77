#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod classifier;
pub mod color;
pub mod config;
pub mod detect;
pub mod diagnostics;
pub mod heatmap;
pub mod image;
pub mod types;

// Feature internals – public for tools and experiments, but the layout
// contract lives behind `FeatureParams`, not in the individual blocks.
pub mod features;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detection session + results.
pub use crate::detect::{DetectorParams, ScaleBand, SearchRegion, VehicleDetector};
pub use crate::diagnostics::DetectionReport;
pub use crate::types::{BoundingBox, DetectError, LabeledRegion};

// Frequently used leaf types.
pub use crate::color::ColorSpace;
pub use crate::features::{FeatureParams, HogChannel};
pub use crate::heatmap::{Heatmap, HeatmapHistory};

/// Small prelude for quick experiments.
///
/// ```no_run
/// use vehicle_detector::prelude::*;
/// use vehicle_detector::classifier::{FeatureScaler, LinearModel};
///
/// # fn main() {
/// let params = DetectorParams::default();
/// let dim = params.features.feature_length();
/// let model = LinearModel::new(vec![0.0; dim], -1.0);
/// let scaler = FeatureScaler::identity(dim);
///
/// let mut det = VehicleDetector::new(params, model, scaler).expect("valid config");
/// let frame = RgbImageU8::new(1280, 720);
/// let report = det.process(&frame);
/// println!("boxes={} total_ms={:.3}", report.boxes.len(), report.timing.total_ms);
/// # }
/// ```
pub mod prelude {
    pub use crate::image::RgbImageU8;
    pub use crate::{BoundingBox, DetectionReport, DetectorParams, VehicleDetector};
}
