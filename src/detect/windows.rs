//! Naive sliding-window search: enumerate candidate rectangles, classify
//! each one independently.
//!
//! Every window is resampled to the canonical classifier size and runs
//! the full feature transform, so the cost grows with the window count;
//! the HOG sub-sampling path exists to avoid exactly that. This path is
//! kept for its simplicity and as the reference the optimized search is
//! checked against.
use super::options::SearchRegion;
use crate::classifier::{Classifier, FeatureScaler};
use crate::features::{window_features, FeatureParams};
use crate::image::{resize_area, RgbImageU8};
use crate::types::{BoundingBox, DetectError};
use log::debug;

/// Enumerate candidate windows over a search region.
///
/// Windows are generated row-major (y outer, x inner) from the region
/// origin. The per-axis step is `window * (1 - overlap)` truncated to an
/// integer, and the per-axis count is `(span - window * overlap) / step`
/// with truncating division. The truncation can leave a strip at the
/// far edge uncovered; that is the intended policy, keeping every window
/// fully inside the region.
pub fn enumerate_windows(
    frame_w: usize,
    frame_h: usize,
    region: &SearchRegion,
    window: usize,
    overlap: f32,
) -> Result<Vec<BoundingBox>, DetectError> {
    if window == 0 {
        return Err(DetectError::Config("window size must be positive".into()));
    }
    if !(0.0..1.0).contains(&overlap) {
        return Err(DetectError::Config(format!(
            "overlap {overlap} outside [0, 1)"
        )));
    }
    let bounds = region.resolve(frame_w, frame_h)?;

    let step = (window as f32 * (1.0 - overlap)) as usize;
    if step == 0 {
        return Err(DetectError::Config(format!(
            "window {window} with overlap {overlap} gives a zero step"
        )));
    }
    let buffer = (window as f32 * overlap) as usize;
    let span_x = bounds.width();
    let span_y = bounds.height();
    let nx = span_x.saturating_sub(buffer) / step;
    let ny = span_y.saturating_sub(buffer) / step;

    let mut windows = Vec::with_capacity(nx * ny);
    for ys in 0..ny {
        let y0 = bounds.y0 + ys * step;
        for xs in 0..nx {
            let x0 = bounds.x0 + xs * step;
            windows.push(BoundingBox::new(x0, y0, x0 + window, y0 + window));
        }
    }
    Ok(windows)
}

/// Classify each candidate window, keeping positives in enumeration order.
///
/// Raises a configuration error up front when the feature layout does not
/// match the scaler or classifier dimension. Individual windows that fail
/// are skipped so one bad window cannot drop detections elsewhere.
pub fn search_windows(
    frame: &RgbImageU8,
    windows: &[BoundingBox],
    classifier: &dyn Classifier,
    scaler: &FeatureScaler,
    params: &FeatureParams,
) -> Result<Vec<BoundingBox>, DetectError> {
    params.validate()?;
    check_dimensions(params, classifier, scaler)?;

    let mut positives = Vec::new();
    for &window in windows {
        // Clamp to the frame like the enumeration contract expects;
        // windows generated by `enumerate_windows` are already inside.
        let clamped = BoundingBox::new(
            window.x0.min(frame.w),
            window.y0.min(frame.h),
            window.x1.min(frame.w),
            window.y1.min(frame.h),
        );
        if clamped.is_empty() {
            debug!("skipping degenerate window {window:?}");
            continue;
        }
        let patch = resize_area(&frame.crop(clamped), params.window, params.window);
        let features = window_features(&patch, params);
        let scaled = match scaler.transform(&features) {
            Ok(v) => v,
            Err(err) => {
                debug!("skipping window {window:?}: {err}");
                continue;
            }
        };
        if classifier.predict(&scaled) {
            positives.push(window);
        }
    }
    Ok(positives)
}

pub(super) fn check_dimensions(
    params: &FeatureParams,
    classifier: &dyn Classifier,
    scaler: &FeatureScaler,
) -> Result<(), DetectError> {
    let expected = params.feature_length();
    if scaler.dimension() != expected {
        return Err(DetectError::Config(format!(
            "scaler dimension {} does not match feature length {expected}",
            scaler.dimension()
        )));
    }
    if classifier.dimension() != expected {
        return Err(DetectError::Config(format!(
            "classifier dimension {} does not match feature length {expected}",
            classifier.dimension()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{enumerate_windows, search_windows};
    use crate::classifier::{Classifier, FeatureScaler};
    use crate::detect::options::SearchRegion;
    use crate::features::FeatureParams;
    use crate::image::RgbImageU8;
    use crate::types::BoundingBox;

    struct Always(bool, usize);

    impl Classifier for Always {
        fn dimension(&self) -> usize {
            self.1
        }
        fn predict(&self, _features: &[f32]) -> bool {
            self.0
        }
    }

    #[test]
    fn enumeration_matches_closed_form_count() {
        let region = SearchRegion {
            x_start: 0,
            x_stop: Some(256),
            y_start: 0,
            y_stop: Some(128),
        };
        let windows = enumerate_windows(1280, 720, &region, 64, 0.75).expect("enumerate");
        // step 16, buffer 48: nx = (256-48)/16 = 13, ny = (128-48)/16 = 5.
        assert_eq!(windows.len(), 13 * 5);
        // Row-major: y advances only after a full x sweep.
        assert_eq!(windows[0], BoundingBox::new(0, 0, 64, 64));
        assert_eq!(windows[1], BoundingBox::new(16, 0, 80, 64));
        assert_eq!(windows[13], BoundingBox::new(0, 16, 64, 80));
        // Every window stays inside the region.
        assert!(windows.iter().all(|w| w.x1 <= 256 && w.y1 <= 128));
    }

    #[test]
    fn enumeration_is_deterministic() {
        let region = SearchRegion::y_band(200, 400);
        let a = enumerate_windows(800, 600, &region, 96, 0.5).expect("enumerate");
        let b = enumerate_windows(800, 600, &region, 96, 0.5).expect("enumerate");
        assert_eq!(a, b);
    }

    #[test]
    fn undersized_region_yields_no_windows() {
        let region = SearchRegion {
            x_start: 0,
            x_stop: Some(40),
            y_start: 0,
            y_stop: Some(40),
        };
        let windows = enumerate_windows(100, 100, &region, 64, 0.5).expect("enumerate");
        assert!(windows.is_empty());
    }

    #[test]
    fn bad_overlap_is_rejected() {
        let region = SearchRegion::full();
        assert!(enumerate_windows(100, 100, &region, 64, 1.0).is_err());
        assert!(enumerate_windows(100, 100, &region, 0, 0.5).is_err());
    }

    #[test]
    fn search_preserves_enumeration_order() {
        let frame = RgbImageU8::new(256, 128);
        let params = FeatureParams::default();
        let windows =
            enumerate_windows(256, 128, &SearchRegion::full(), 64, 0.5).expect("enumerate");
        let scaler = FeatureScaler::identity(params.feature_length());
        let yes = Always(true, params.feature_length());
        let hits = search_windows(&frame, &windows, &yes, &scaler, &params).expect("search");
        assert_eq!(hits, windows);

        let no = Always(false, params.feature_length());
        let none = search_windows(&frame, &windows, &no, &scaler, &params).expect("search");
        assert!(none.is_empty());
    }

    #[test]
    fn dimension_mismatch_fails_before_any_window() {
        let frame = RgbImageU8::new(128, 128);
        let params = FeatureParams::default();
        let windows =
            enumerate_windows(128, 128, &SearchRegion::full(), 64, 0.5).expect("enumerate");
        let scaler = FeatureScaler::identity(3);
        let clf = Always(true, params.feature_length());
        assert!(search_windows(&frame, &windows, &clf, &scaler, &params).is_err());
    }
}
