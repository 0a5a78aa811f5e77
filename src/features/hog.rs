//! Histogram-of-Oriented-Gradients on a single channel plane.
//!
//! The descriptor is produced in block-grid form: orientation histograms
//! per `pix_per_cell²` cell, L2-Hys-normalized over sliding blocks of
//! `cell_per_block²` cells. The flattened feature vector is the row-major
//! traversal of that grid, so a window's descriptor can equivalently be
//! obtained by slicing a sub-rectangle of blocks out of a grid computed
//! once over a larger region, which is the layout contract the sub-sampling
//! search depends on.
use super::gradient::sobel_gradient_field;
use crate::image::ImageF32;

/// Block-level HOG over a plane, sliceable per window.
#[derive(Clone, Debug)]
pub struct HogBlockGrid {
    /// Number of block positions along x
    pub nblocks_x: usize,
    /// Number of block positions along y
    pub nblocks_y: usize,
    /// Length of one normalized block: `cell_per_block² * orientations`
    pub block_dim: usize,
    data: Vec<f32>,
}

impl HogBlockGrid {
    /// One normalized block at block coordinates (bx, by).
    #[inline]
    pub fn block(&self, bx: usize, by: usize) -> &[f32] {
        let start = (by * self.nblocks_x + bx) * self.block_dim;
        &self.data[start..start + self.block_dim]
    }

    /// Flatten the `nblocks × nblocks` sub-rectangle whose top-left block
    /// is (bx, by), row-major. Identical layout to `feature_vector` of a
    /// standalone HOG over that sub-window.
    pub fn window_slice(&self, bx: usize, by: usize, nblocks: usize) -> Vec<f32> {
        let mut out = Vec::with_capacity(nblocks * nblocks * self.block_dim);
        for dy in 0..nblocks {
            for dx in 0..nblocks {
                out.extend_from_slice(self.block(bx + dx, by + dy));
            }
        }
        out
    }

    /// The whole grid flattened row-major.
    pub fn feature_vector(&self) -> Vec<f32> {
        self.data.clone()
    }
}

/// Compute the HOG block grid for one plane.
///
/// `transform_sqrt` applies a square-root contrast transform before
/// gradient computation; plane samples are expected in [0, 1].
pub fn hog_block_grid(
    plane: &ImageF32,
    orientations: usize,
    pix_per_cell: usize,
    cell_per_block: usize,
    transform_sqrt: bool,
) -> HogBlockGrid {
    let cells = cell_histograms(plane, orientations, pix_per_cell, transform_sqrt);
    normalize_blocks(&cells, orientations, cell_per_block)
}

/// Flattened HOG feature vector for one plane.
pub fn hog_features(
    plane: &ImageF32,
    orientations: usize,
    pix_per_cell: usize,
    cell_per_block: usize,
    transform_sqrt: bool,
) -> Vec<f32> {
    hog_block_grid(plane, orientations, pix_per_cell, cell_per_block, transform_sqrt)
        .feature_vector()
}

/// Per-cell orientation histograms, magnitude-weighted, hard-assigned.
struct CellGrid {
    ncells_x: usize,
    ncells_y: usize,
    hist: Vec<f32>, // ncells_x * ncells_y * orientations
}

fn cell_histograms(
    plane: &ImageF32,
    orientations: usize,
    pix_per_cell: usize,
    transform_sqrt: bool,
) -> CellGrid {
    let transformed;
    let src = if transform_sqrt {
        let mut copy = plane.clone();
        copy.map_in_place(|v| v.max(0.0).sqrt());
        transformed = copy;
        &transformed
    } else {
        plane
    };

    let field = sobel_gradient_field(src);
    let ncells_x = plane.w / pix_per_cell;
    let ncells_y = plane.h / pix_per_cell;
    let mut hist = vec![0.0f32; ncells_x * ncells_y * orientations];
    let bin_width = 180.0 / orientations as f32;

    for cy in 0..ncells_y {
        for cx in 0..ncells_x {
            let base = (cy * ncells_x + cx) * orientations;
            for dy in 0..pix_per_cell {
                let y = cy * pix_per_cell + dy;
                let mag_row = field.mag.row(y);
                let ori_row = &field.ori_deg[y * plane.w..(y + 1) * plane.w];
                for dx in 0..pix_per_cell {
                    let x = cx * pix_per_cell + dx;
                    let bin = ((ori_row[x] / bin_width) as usize).min(orientations - 1);
                    hist[base + bin] += mag_row[x];
                }
            }
        }
    }

    CellGrid {
        ncells_x,
        ncells_y,
        hist,
    }
}

/// L2-Hys normalization over sliding `cell_per_block²` blocks.
fn normalize_blocks(cells: &CellGrid, orientations: usize, cell_per_block: usize) -> HogBlockGrid {
    let block_dim = cell_per_block * cell_per_block * orientations;
    if cells.ncells_x < cell_per_block || cells.ncells_y < cell_per_block {
        return HogBlockGrid {
            nblocks_x: 0,
            nblocks_y: 0,
            block_dim,
            data: Vec::new(),
        };
    }
    let nblocks_x = cells.ncells_x - cell_per_block + 1;
    let nblocks_y = cells.ncells_y - cell_per_block + 1;
    let mut data = vec![0.0f32; nblocks_x * nblocks_y * block_dim];

    for by in 0..nblocks_y {
        for bx in 0..nblocks_x {
            let out = &mut data[(by * nblocks_x + bx) * block_dim..][..block_dim];
            let mut norm_sq = 0.0f32;
            for cy in 0..cell_per_block {
                for cx in 0..cell_per_block {
                    let cell_base =
                        ((by + cy) * cells.ncells_x + (bx + cx)) * orientations;
                    let dst_base = (cy * cell_per_block + cx) * orientations;
                    for b in 0..orientations {
                        let v = cells.hist[cell_base + b];
                        out[dst_base + b] = v;
                        norm_sq += v * v;
                    }
                }
            }
            // L2 normalize, clip at 0.2, renormalize.
            let norm = (norm_sq + 1e-6).sqrt();
            for v in out.iter_mut() {
                *v = (*v / norm).min(0.2);
            }
            let clipped_sq: f32 = out.iter().map(|&v| v * v).sum();
            let final_norm = (clipped_sq + 1e-6).sqrt();
            for v in out.iter_mut() {
                *v /= final_norm;
            }
        }
    }

    HogBlockGrid {
        nblocks_x,
        nblocks_y,
        block_dim,
        data,
    }
}

/// Render the per-cell orientation energy as oriented strokes.
///
/// Each cell draws one stroke per orientation bin, along the implied edge
/// direction (perpendicular to the gradient), with intensity proportional
/// to the bin weight. Useful for eyeballing what the descriptor sees.
pub fn hog_visualization(plane: &ImageF32, orientations: usize, pix_per_cell: usize) -> ImageF32 {
    let cells = cell_histograms(plane, orientations, pix_per_cell, false);
    let mut out = ImageF32::new(plane.w, plane.h);
    let peak = cells.hist.iter().fold(0.0f32, |acc, &v| acc.max(v));
    if peak <= 0.0 {
        return out;
    }
    let half = pix_per_cell as f32 / 2.0;
    let bin_width = 180.0 / orientations as f32;

    for cy in 0..cells.ncells_y {
        for cx in 0..cells.ncells_x {
            let centre_x = cx as f32 * pix_per_cell as f32 + half;
            let centre_y = cy as f32 * pix_per_cell as f32 + half;
            let base = (cy * cells.ncells_x + cx) * orientations;
            for bin in 0..orientations {
                let weight = cells.hist[base + bin] / peak;
                if weight <= 0.0 {
                    continue;
                }
                // Edge direction is the gradient orientation rotated 90°.
                let angle = ((bin as f32 + 0.5) * bin_width + 90.0).to_radians();
                let dx = angle.cos() * (half - 1.0);
                let dy = angle.sin() * (half - 1.0);
                draw_stroke(
                    &mut out,
                    centre_x - dx,
                    centre_y - dy,
                    centre_x + dx,
                    centre_y + dy,
                    weight,
                );
            }
        }
    }
    out
}

fn draw_stroke(img: &mut ImageF32, x0: f32, y0: f32, x1: f32, y1: f32, intensity: f32) {
    let steps = ((x1 - x0).abs().max((y1 - y0).abs()).ceil() as usize).max(1);
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let x = (x0 + (x1 - x0) * t).round();
        let y = (y0 + (y1 - y0) * t).round();
        if x < 0.0 || y < 0.0 {
            continue;
        }
        let (xi, yi) = (x as usize, y as usize);
        if xi < img.w && yi < img.h {
            let v = img.get(xi, yi).max(intensity);
            img.set(xi, yi, v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{hog_block_grid, hog_features, hog_visualization};
    use crate::image::ImageF32;

    fn striped_plane(w: usize, h: usize) -> ImageF32 {
        let mut img = ImageF32::new(w, h);
        for y in 0..h {
            for x in 0..w {
                if (x / 4) % 2 == 0 {
                    img.set(x, y, 1.0);
                }
            }
        }
        img
    }

    #[test]
    fn grid_dimensions_follow_geometry() {
        let plane = striped_plane(64, 64);
        let grid = hog_block_grid(&plane, 9, 8, 2, true);
        assert_eq!(grid.nblocks_x, 7);
        assert_eq!(grid.nblocks_y, 7);
        assert_eq!(grid.block_dim, 2 * 2 * 9);
        assert_eq!(grid.feature_vector().len(), 7 * 7 * 36);
    }

    #[test]
    fn feature_vector_equals_full_window_slice() {
        let plane = striped_plane(64, 64);
        let grid = hog_block_grid(&plane, 9, 8, 2, true);
        let sliced = grid.window_slice(0, 0, grid.nblocks_x);
        assert_eq!(sliced, grid.feature_vector());
    }

    #[test]
    fn blocks_are_l2_hys_bounded() {
        let plane = striped_plane(32, 32);
        let grid = hog_block_grid(&plane, 9, 8, 2, false);
        for by in 0..grid.nblocks_y {
            for bx in 0..grid.nblocks_x {
                let block = grid.block(bx, by);
                let norm: f32 = block.iter().map(|&v| v * v).sum::<f32>().sqrt();
                assert!(norm <= 1.0 + 1e-3, "block norm {norm} exceeds 1");
                assert!(block.iter().all(|&v| v >= 0.0));
            }
        }
    }

    #[test]
    fn descriptor_length_is_content_independent() {
        let a = striped_plane(64, 64);
        let mut b = ImageF32::new(64, 64);
        b.set(10, 10, 0.7);
        let fa = hog_features(&a, 9, 8, 2, true);
        let fb = hog_features(&b, 9, 8, 2, true);
        assert_eq!(fa.len(), fb.len());
    }

    #[test]
    fn undersized_plane_yields_empty_descriptor() {
        let plane = striped_plane(8, 8);
        let feats = hog_features(&plane, 9, 8, 2, true);
        assert!(feats.is_empty());
    }

    #[test]
    fn visualization_marks_striped_cells() {
        let plane = striped_plane(32, 32);
        let vis = hog_visualization(&plane, 9, 8);
        assert_eq!(vis.w, 32);
        assert!(vis.max_value() > 0.0);
    }
}
