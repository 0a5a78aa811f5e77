//! HOG sub-sampling search: one HOG pass per scale, shared by every
//! window.
//!
//! Recomputing HOG per window dominates the naive search cost. Here the
//! block grid is computed once over the rescaled search region for each
//! selected channel, and a window's HOG descriptor is a slice of that
//! grid: pure indexing, no recomputation. Windows step in whole cells
//! rather than arbitrary overlap fractions, and positives are mapped back
//! through the scale transform into original-frame pixel coordinates.
use super::options::{DetectorParams, ScaleBand};
use super::windows::check_dimensions;
use crate::classifier::{Classifier, FeatureScaler};
use crate::color::to_color_space;
use crate::features::{
    assemble_blocks, bin_spatial, color_histogram, hog_block_grid, FeatureParams, HogBlockGrid,
};
use crate::image::{resize_bilinear, RgbImageU8};
use crate::types::{BoundingBox, DetectError};
use log::debug;
use rayon::prelude::*;

/// Run the sub-sampling search for one scale band.
///
/// Returns positive boxes in original-frame coordinates. A region that is
/// too small for a single window at this scale is a valid empty result.
pub fn find_at_scale(
    frame: &RgbImageU8,
    band: &ScaleBand,
    classifier: &dyn Classifier,
    scaler: &FeatureScaler,
    params: &FeatureParams,
    cells_per_step: usize,
) -> Result<Vec<BoundingBox>, DetectError> {
    params.validate()?;
    if cells_per_step == 0 {
        return Err(DetectError::Config("cells_per_step must be positive".into()));
    }
    let bounds = band.region.resolve(frame.w, frame.h)?;
    let scale = band.scale;

    let crop = frame.crop(bounds);
    let converted = to_color_space(&crop, params.color_space);
    let search = if (scale - 1.0).abs() < f32::EPSILON {
        converted
    } else {
        let sw = (crop.w as f32 / scale) as usize;
        let sh = (crop.h as f32 / scale) as usize;
        if sw < params.window || sh < params.window {
            return Ok(Vec::new());
        }
        resize_bilinear(&converted, sw, sh)
    };
    if search.w < params.window || search.h < params.window {
        return Ok(Vec::new());
    }

    let pix = params.pix_per_cell;
    let nblocks_x = (search.w / pix).saturating_sub(params.cell_per_block - 1);
    let nblocks_y = (search.h / pix).saturating_sub(params.cell_per_block - 1);
    let blocks_per_window = params.blocks_per_window();
    if nblocks_x < blocks_per_window || nblocks_y < blocks_per_window {
        return Ok(Vec::new());
    }
    let nxsteps = (nblocks_x - blocks_per_window) / cells_per_step;
    let nysteps = (nblocks_y - blocks_per_window) / cells_per_step;

    let grids: Vec<HogBlockGrid> = if params.hog_feat {
        params
            .hog_channel
            .indices()
            .iter()
            .map(|&c| {
                hog_block_grid(
                    &search.channel_plane(c),
                    params.orientations,
                    params.pix_per_cell,
                    params.cell_per_block,
                    params.transform_sqrt,
                )
            })
            .collect()
    } else {
        Vec::new()
    };

    let mut positives = Vec::new();
    for xb in 0..nxsteps {
        for yb in 0..nysteps {
            let xpos = xb * cells_per_step;
            let ypos = yb * cells_per_step;
            let xleft = xpos * pix;
            let ytop = ypos * pix;

            let hog = params.hog_feat.then(|| {
                let mut out = Vec::new();
                for grid in &grids {
                    out.extend(grid.window_slice(xpos, ypos, blocks_per_window));
                }
                out
            });

            let (spatial, hist) = if params.spatial_feat || params.hist_feat {
                let patch_rect = BoundingBox::new(
                    xleft,
                    ytop,
                    (xleft + params.window).min(search.w),
                    (ytop + params.window).min(search.h),
                );
                let patch =
                    resize_bilinear(&search.crop(patch_rect), params.window, params.window);
                (
                    params
                        .spatial_feat
                        .then(|| bin_spatial(&patch, params.spatial_size)),
                    params
                        .hist_feat
                        .then(|| color_histogram(&patch, params.hist_bins)),
                )
            } else {
                (None, None)
            };

            let features = assemble_blocks(spatial, hist, hog);
            let scaled = match scaler.transform(&features) {
                Ok(v) => v,
                Err(err) => {
                    debug!("skipping window at ({xleft}, {ytop}) scale {scale}: {err}");
                    continue;
                }
            };
            if classifier.predict(&scaled) {
                let x0 = (xleft as f32 * scale) as usize + bounds.x0;
                let y0 = (ytop as f32 * scale) as usize + bounds.y0;
                let side = (params.window as f32 * scale) as usize;
                positives.push(BoundingBox::new(x0, y0, x0 + side, y0 + side));
            }
        }
    }
    Ok(positives)
}

/// Run the sweep over every configured scale band and concatenate the
/// positive boxes.
///
/// Dimension mismatches fail here, before any per-window work. Scale
/// bands run in parallel (per-scale work is independent and the heatmap
/// reduction downstream is order-insensitive), and a band that fails is
/// skipped so one bad band cannot drop detections elsewhere.
pub fn sweep_scales(
    frame: &RgbImageU8,
    params: &DetectorParams,
    classifier: &(dyn Classifier + Sync),
    scaler: &FeatureScaler,
) -> Result<Vec<BoundingBox>, DetectError> {
    params.validate()?;
    check_dimensions(&params.features, classifier, scaler)?;

    let per_band: Vec<Vec<BoundingBox>> = params
        .scales
        .par_iter()
        .map(|band| {
            match find_at_scale(
                frame,
                band,
                classifier,
                scaler,
                &params.features,
                params.cells_per_step,
            ) {
                Ok(boxes) => boxes,
                Err(err) => {
                    debug!("skipping scale {} band: {err}", band.scale);
                    Vec::new()
                }
            }
        })
        .collect();
    Ok(per_band.into_iter().flatten().collect())
}
