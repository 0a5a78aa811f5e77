//! Runtime configuration for the CLI tools.
//!
//! Tool configuration lives in a JSON file: artifact paths, output
//! destinations and the full [`DetectorParams`] tree. Parameter structs
//! deserialize with their defaults, so a minimal config only names the
//! inputs. CLI parsing is deliberately small: a config path plus a couple
//! of overrides.
use crate::detect::DetectorParams;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Annotated copy of the input frame with final boxes drawn.
    pub annotated_out: Option<PathBuf>,
    /// JSON detection report.
    pub report_json: Option<PathBuf>,
    /// Combined vote heatmap rendered as a gray PNG.
    pub heatmap_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    pub input_path: PathBuf,
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub detector: DetectorParams,
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: RuntimeConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    Ok(config)
}

/// Parse CLI arguments: `<config.json> [--input PATH] [--annotated PATH]`.
pub fn parse_cli(program: &str) -> Result<RuntimeConfig, String> {
    let mut args = env::args().skip(1);
    let config_path = match args.next() {
        Some(p) if p != "-h" && p != "--help" => PathBuf::from(p),
        _ => return Err(usage(program)),
    };
    let mut config = load_config(&config_path)?;
    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--input" => {
                let value = args.next().ok_or_else(|| usage(program))?;
                config.input_path = PathBuf::from(value);
            }
            "--annotated" => {
                let value = args.next().ok_or_else(|| usage(program))?;
                config.output.annotated_out = Some(PathBuf::from(value));
            }
            other => return Err(format!("Unknown argument '{other}'\n{}", usage(program))),
        }
    }
    Ok(config)
}

fn usage(program: &str) -> String {
    format!("Usage: {program} <config.json> [--input PATH] [--annotated PATH]")
}

#[cfg(test)]
mod tests {
    use super::RuntimeConfig;

    #[test]
    fn minimal_config_uses_defaults() {
        let json = r#"{
            "input_path": "frame.png",
            "model_path": "model.json",
            "scaler_path": "scaler.json"
        }"#;
        let config: RuntimeConfig = serde_json::from_str(json).expect("parse");
        assert_eq!(config.detector.cells_per_step, 2);
        assert_eq!(config.detector.heat_threshold, 1);
        assert!(config.output.annotated_out.is_none());
    }

    #[test]
    fn detector_overrides_deserialize() {
        let json = r#"{
            "input_path": "frame.png",
            "model_path": "model.json",
            "scaler_path": "scaler.json",
            "detector": {
                "heat_threshold": 3,
                "history_depth": 8,
                "features": { "color_space": "hsv", "hog_channel": "all" },
                "scales": [ { "scale": 1.5, "region": { "y_start": 380, "y_stop": 600 } } ]
            }
        }"#;
        let config: RuntimeConfig = serde_json::from_str(json).expect("parse");
        assert_eq!(config.detector.heat_threshold, 3);
        assert_eq!(config.detector.history_depth, 8);
        assert_eq!(config.detector.scales.len(), 1);
        assert!(config.detector.validate().is_ok());
    }

    #[test]
    fn unsupported_colorspace_fails_at_load() {
        let json = r#"{
            "input_path": "frame.png",
            "model_path": "model.json",
            "scaler_path": "scaler.json",
            "detector": { "features": { "color_space": "cmyk" } }
        }"#;
        assert!(serde_json::from_str::<RuntimeConfig>(json).is_err());
    }
}
