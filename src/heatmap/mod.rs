//! Vote-map aggregation turning raw overlapping detections into stable
//! boxes.
//!
//! Every positive window votes for all pixels it covers; true detections
//! pile up overlapping votes across nearby scales and positions while
//! isolated false positives stay shallow. Thresholding removes the
//! shallow votes and connected-component labeling turns the surviving
//! consensus regions into one box each. For video, a bounded ring of
//! recent per-frame maps can be summed before thresholding, trading a
//! little latency for stability against single-frame noise.
use crate::types::{BoundingBox, LabeledRegion};
use std::collections::VecDeque;

/// Per-pixel vote grid with the spatial extent of the source frame.
#[derive(Clone, Debug)]
pub struct Heatmap {
    pub w: usize,
    pub h: usize,
    votes: Vec<u32>,
}

impl Heatmap {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            votes: vec![0; w * h],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.votes[y * self.w + x]
    }

    /// Increment every pixel inside each box by one vote. Boxes are
    /// clamped to the grid; overlapping boxes accumulate.
    pub fn add_detections(&mut self, boxes: &[BoundingBox]) {
        for b in boxes {
            let x1 = b.x1.min(self.w);
            let y1 = b.y1.min(self.h);
            for y in b.y0.min(y1)..y1 {
                let row = &mut self.votes[y * self.w..(y + 1) * self.w];
                for v in &mut row[b.x0.min(x1)..x1] {
                    *v += 1;
                }
            }
        }
    }

    /// Zero out every pixel with vote count `<= min_votes`. Idempotent.
    pub fn threshold(&mut self, min_votes: u32) {
        for v in &mut self.votes {
            if *v <= min_votes {
                *v = 0;
            }
        }
    }

    /// Element-wise sum of another map of the same extent.
    pub fn accumulate(&mut self, other: &Heatmap) {
        assert!(
            self.w == other.w && self.h == other.h,
            "heatmap extents must match"
        );
        for (dst, src) in self.votes.iter_mut().zip(&other.votes) {
            *dst += src;
        }
    }

    pub fn max_vote(&self) -> u32 {
        self.votes.iter().copied().max().unwrap_or(0)
    }

    pub fn is_zero(&self) -> bool {
        self.votes.iter().all(|&v| v == 0)
    }
}

const NEIGH_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// 8-connectivity connected-component labeling over the non-zero pixels.
///
/// Components are grown with an explicit stack and reported in scan
/// order; each yields the axis-aligned bounds of its member pixels
/// (half-open, like every box in the pipeline).
pub fn label_regions(heatmap: &Heatmap) -> Vec<LabeledRegion> {
    let (w, h) = (heatmap.w, heatmap.h);
    let mut visited = vec![false; w * h];
    let mut stack: Vec<usize> = Vec::new();
    let mut regions = Vec::new();

    for start in 0..w * h {
        if visited[start] || heatmap.votes[start] == 0 {
            continue;
        }
        let mut min_x = usize::MAX;
        let mut min_y = usize::MAX;
        let mut max_x = 0usize;
        let mut max_y = 0usize;
        let mut pixel_count = 0usize;

        visited[start] = true;
        stack.push(start);
        while let Some(idx) = stack.pop() {
            let x = idx % w;
            let y = idx / w;
            pixel_count += 1;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);

            for (dx, dy) in NEIGH_OFFSETS {
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                    continue;
                }
                let nidx = ny as usize * w + nx as usize;
                if !visited[nidx] && heatmap.votes[nidx] > 0 {
                    visited[nidx] = true;
                    stack.push(nidx);
                }
            }
        }

        regions.push(LabeledRegion {
            id: regions.len() as u32 + 1,
            pixel_count,
            bbox: BoundingBox::new(min_x, min_y, max_x + 1, max_y + 1),
        });
    }
    regions
}

/// Bounded ring of recent per-frame heatmaps for temporal smoothing.
///
/// Owned by the session driving one video stream; concurrent streams
/// need one history each.
#[derive(Clone, Debug)]
pub struct HeatmapHistory {
    depth: usize,
    frames: VecDeque<Heatmap>,
}

impl HeatmapHistory {
    /// `depth` 0 disables smoothing: `combined` then returns the pushed
    /// frame unchanged.
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            frames: VecDeque::with_capacity(depth),
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Record one frame's heatmap, evicting the oldest past `depth`.
    pub fn push(&mut self, frame: Heatmap) -> &mut Self {
        if self.depth == 0 {
            self.frames.clear();
            self.frames.push_back(frame);
            return self;
        }
        if self.frames.len() == self.depth {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
        self
    }

    /// Sum of the retained frames.
    pub fn combined(&self) -> Option<Heatmap> {
        let mut iter = self.frames.iter();
        let first = iter.next()?;
        let mut out = first.clone();
        for frame in iter {
            out.accumulate(frame);
        }
        Some(out)
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}
