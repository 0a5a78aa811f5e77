//! Feature extraction: spatial bins, color histograms and HOG, concatenated
//! in a fixed block order.
//!
//! The concatenation order of enabled blocks (spatial, then histogram,
//! then HOG) together with every block's internal layout is an invariant
//! shared by training extraction and inference extraction. Both search
//! paths (per-window and HOG sub-sampling) assemble vectors through
//! [`assemble_blocks`], so the layout cannot drift between them.
//!
//! HOG runs on the configured channel(s) of the working colorspace for
//! training and inference alike; there is no separate grayscale path.

pub mod gradient;
pub mod histogram;
pub mod hog;
pub mod spatial;

pub use histogram::color_histogram;
pub use hog::{hog_block_grid, hog_features, hog_visualization, HogBlockGrid};
pub use spatial::bin_spatial;

use crate::color::{to_color_space, ColorSpace};
use crate::image::RgbImageU8;
use crate::types::DetectError;
use serde::{Deserialize, Serialize};

/// Channel selection for the HOG block, in working-colorspace order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HogChannel {
    /// All three channels, concatenated ch0 ‖ ch1 ‖ ch2.
    All,
    /// One channel by index.
    Single(usize),
}

impl HogChannel {
    /// Selected channel indices in concatenation order.
    pub fn indices(&self) -> Vec<usize> {
        match self {
            HogChannel::All => vec![0, 1, 2],
            HogChannel::Single(c) => vec![*c],
        }
    }
}

/// Feature-extraction parameters shared by training and inference.
///
/// Constructed once per run and validated up front; a mismatch between the
/// training-time and inference-time values silently breaks classification,
/// so both sides must be fed the same instance (or compared equal).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureParams {
    /// Working colorspace for all feature blocks.
    pub color_space: ColorSpace,
    /// Side of the square spatial-binning resample.
    pub spatial_size: usize,
    /// Histogram bins per channel over [0, 256).
    pub hist_bins: usize,
    /// HOG orientation bins over [0°, 180°).
    pub orientations: usize,
    /// HOG cell side in pixels.
    pub pix_per_cell: usize,
    /// HOG block side in cells.
    pub cell_per_block: usize,
    /// HOG channel selection.
    pub hog_channel: HogChannel,
    /// Square-root contrast transform before HOG gradients.
    pub transform_sqrt: bool,
    /// Canonical window side: the size the classifier was trained on.
    pub window: usize,
    /// Enable the spatial-binning block.
    pub spatial_feat: bool,
    /// Enable the color-histogram block.
    pub hist_feat: bool,
    /// Enable the HOG block.
    pub hog_feat: bool,
}

impl Default for FeatureParams {
    fn default() -> Self {
        Self {
            color_space: ColorSpace::YCrCb,
            spatial_size: 16,
            hist_bins: 32,
            orientations: 9,
            pix_per_cell: 8,
            cell_per_block: 2,
            hog_channel: HogChannel::All,
            transform_sqrt: true,
            window: 64,
            spatial_feat: true,
            hist_feat: true,
            hog_feat: true,
        }
    }
}

impl FeatureParams {
    /// Check the parameter set for systemic misconfiguration.
    pub fn validate(&self) -> Result<(), DetectError> {
        if !self.spatial_feat && !self.hist_feat && !self.hog_feat {
            return Err(DetectError::Config(
                "at least one feature block must be enabled".into(),
            ));
        }
        if self.spatial_feat && self.spatial_size == 0 {
            return Err(DetectError::Config("spatial_size must be positive".into()));
        }
        if self.hist_feat && self.hist_bins == 0 {
            return Err(DetectError::Config("hist_bins must be positive".into()));
        }
        if self.window == 0 {
            return Err(DetectError::Config("window must be positive".into()));
        }
        // Cell geometry also drives the sub-sampling window step, so it is
        // checked even when the HOG block is disabled.
        if self.pix_per_cell == 0 || self.cell_per_block == 0 {
            return Err(DetectError::Config(
                "pix_per_cell and cell_per_block must be positive".into(),
            ));
        }
        if self.hog_feat {
            if self.orientations == 0 {
                return Err(DetectError::Config("orientations must be positive".into()));
            }
            if let HogChannel::Single(c) = self.hog_channel {
                if c >= 3 {
                    return Err(DetectError::Config(format!(
                        "hog channel index {c} out of range"
                    )));
                }
            }
            if self.blocks_per_window() == 0 {
                return Err(DetectError::Config(format!(
                    "window {} too small for {}px cells in {}-cell blocks",
                    self.window, self.pix_per_cell, self.cell_per_block
                )));
            }
        }
        Ok(())
    }

    /// Block positions per canonical-window axis.
    pub fn blocks_per_window(&self) -> usize {
        (self.window / self.pix_per_cell).saturating_sub(self.cell_per_block - 1)
    }

    /// Total feature-vector length: a pure function of the parameters,
    /// independent of image content.
    pub fn feature_length(&self) -> usize {
        let mut len = 0;
        if self.spatial_feat {
            len += self.spatial_size * self.spatial_size * 3;
        }
        if self.hist_feat {
            len += self.hist_bins * 3;
        }
        if self.hog_feat {
            let nb = self.blocks_per_window();
            len += nb
                * nb
                * self.cell_per_block
                * self.cell_per_block
                * self.orientations
                * self.hog_channel.indices().len();
        }
        len
    }
}

/// Concatenate pre-computed blocks in the fixed layout order.
///
/// Both search paths go through here, so the spatial → histogram → HOG
/// order is enforced in exactly one place.
pub fn assemble_blocks(
    spatial: Option<Vec<f32>>,
    hist: Option<Vec<f32>>,
    hog: Option<Vec<f32>>,
) -> Vec<f32> {
    let mut out = Vec::new();
    if let Some(block) = spatial {
        out.extend(block);
    }
    if let Some(block) = hist {
        out.extend(block);
    }
    if let Some(block) = hog {
        out.extend(block);
    }
    out
}

/// Extract all enabled blocks from a patch already converted to the
/// working colorspace and already at canonical size.
pub fn combined_features(feature_image: &RgbImageU8, params: &FeatureParams) -> Vec<f32> {
    let spatial = params
        .spatial_feat
        .then(|| bin_spatial(feature_image, params.spatial_size));
    let hist = params
        .hist_feat
        .then(|| color_histogram(feature_image, params.hist_bins));
    let hog = params.hog_feat.then(|| {
        let mut out = Vec::new();
        for c in params.hog_channel.indices() {
            out.extend(hog_features(
                &feature_image.channel_plane(c),
                params.orientations,
                params.pix_per_cell,
                params.cell_per_block,
                params.transform_sqrt,
            ));
        }
        out
    });
    assemble_blocks(spatial, hist, hog)
}

/// Extract features from a canonical-size RGB patch: colorspace
/// conversion followed by [`combined_features`].
pub fn window_features(patch: &RgbImageU8, params: &FeatureParams) -> Vec<f32> {
    let feature_image = to_color_space(patch, params.color_space);
    combined_features(&feature_image, params)
}

/// Dataset-building variant with left-right mirror augmentation: one
/// vector for the image as-is and one for its horizontal flip. The flip
/// is applied after colorspace conversion, doubling the training set
/// without new acquisition.
pub fn extract_with_mirror(
    image: &RgbImageU8,
    params: &FeatureParams,
) -> (Vec<f32>, Vec<f32>) {
    let feature_image = to_color_space(image, params.color_space);
    let as_is = combined_features(&feature_image, params);
    let mirrored = combined_features(&feature_image.flip_horizontal(), params);
    (as_is, mirrored)
}
