use vehicle_detector::classifier::{FeatureScaler, LinearModel};
use vehicle_detector::config;
use vehicle_detector::image::draw::draw_boxes;
use vehicle_detector::image::io::{
    load_rgb_image, save_heatmap_image, save_rgb_image, write_json_file,
};
use vehicle_detector::VehicleDetector;

const BOX_COLOR: [u8; 3] = [0, 0, 255];
const BOX_THICKNESS: usize = 6;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "detect_image".to_string());
    let mut config = config::parse_cli(&program)?;
    if config.output.heatmap_out.is_some() {
        config.detector.keep_heatmap = true;
    }

    let frame = load_rgb_image(&config.input_path)?;
    let model = LinearModel::load(&config.model_path)?;
    let scaler = FeatureScaler::load(&config.scaler_path)?;

    let mut detector = VehicleDetector::new(config.detector.clone(), model, scaler)
        .map_err(|e| e.to_string())?;
    let report = detector.process(&frame);

    println!("Detection summary");
    println!("  input: {}", config.input_path.display());
    println!("  raw detections: {}", report.raw_detections);
    println!("  heatmap peak: {}", report.heatmap_max);
    println!("  final boxes: {}", report.boxes.len());
    for b in &report.boxes {
        println!("    [{}, {}) x [{}, {})", b.x0, b.x1, b.y0, b.y1);
    }
    println!(
        "  timings (ms): total={:.3}{}",
        report.timing.total_ms,
        report
            .timing
            .stages
            .iter()
            .map(|s| format!(" {}={:.3}", s.label, s.elapsed_ms))
            .collect::<String>()
    );

    if let Some(path) = &config.output.annotated_out {
        let annotated = draw_boxes(&frame, &report.boxes, BOX_COLOR, BOX_THICKNESS);
        save_rgb_image(&annotated, path)?;
        println!("Annotated frame written to {}", path.display());
    }
    if let Some(path) = &config.output.report_json {
        write_json_file(path, &report)?;
        println!("JSON report written to {}", path.display());
    }
    if let Some(path) = &config.output.heatmap_out {
        if let Some(heatmap) = &report.heatmap {
            save_heatmap_image(heatmap, path)?;
            println!("Heatmap written to {}", path.display());
        }
    }

    Ok(())
}
