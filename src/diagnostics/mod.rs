//! Structured run reports: per-stage timings and detection output.
use crate::heatmap::Heatmap;
use crate::types::{BoundingBox, LabeledRegion};
use serde::Serialize;

/// Timing entry for one pipeline stage.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Aggregated timing trace for one processed frame.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }
}

/// Result of running the pipeline on one frame.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    /// Final merged boxes, one per labeled heatmap region.
    pub boxes: Vec<BoundingBox>,
    /// Labeled regions backing the boxes.
    pub regions: Vec<LabeledRegion>,
    /// Raw positive windows before the heatmap merge.
    pub raw_detections: usize,
    /// Peak vote of the combined heatmap before thresholding.
    pub heatmap_max: u32,
    pub timing: TimingBreakdown,
    /// Combined vote map, retained when `keep_heatmap` is set.
    #[serde(skip)]
    pub heatmap: Option<Heatmap>,
}
