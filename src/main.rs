use vehicle_detector::classifier::{FeatureScaler, LinearModel};
use vehicle_detector::prelude::*;

fn main() {
    // Demo stub: runs the detection session over a synthetic black frame
    // with a model that never fires.
    env_logger::init();

    let params = DetectorParams::default();
    let dim = params.features.feature_length();
    let model = LinearModel::new(vec![0.0; dim], -1.0);
    let scaler = FeatureScaler::identity(dim);

    let mut detector = match VehicleDetector::new(params, model, scaler) {
        Ok(d) => d,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    let frame = RgbImageU8::new(1280, 720);
    let report = detector.process(&frame);
    println!(
        "boxes={} raw={} total_ms={:.3}",
        report.boxes.len(),
        report.raw_detections,
        report.timing.total_ms
    );
}
