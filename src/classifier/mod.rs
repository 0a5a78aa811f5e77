//! Linear-classifier and feature-scaler contracts.
//!
//! Training itself is an external concern: any binary linear trainer can
//! produce the weight vector. This module fixes the artifact formats
//! (JSON via serde) and the inference-side contracts: a decision
//! function over a standardized feature vector. Both artifacts are
//! read-only after loading and can be shared across detection workers.
use crate::types::DetectError;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Binary decision over an extracted feature vector.
///
/// Implementations must be pure: the same features always yield the same
/// label, with no interior mutability, so a model can be shared across
/// rayon workers.
pub trait Classifier {
    /// Number of feature dimensions the model expects.
    fn dimension(&self) -> usize;
    /// `true` for the positive (vehicle) class.
    fn predict(&self, features: &[f32]) -> bool;
}

/// Linear decision function `w · x + b > 0`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LinearModel {
    pub weights: DVector<f32>,
    pub intercept: f32,
}

impl LinearModel {
    pub fn new(weights: Vec<f32>, intercept: f32) -> Self {
        Self {
            weights: DVector::from_vec(weights),
            intercept,
        }
    }

    /// Signed distance from the separating hyperplane.
    pub fn decision(&self, features: &[f32]) -> f32 {
        let x = DVector::from_column_slice(features);
        self.weights.dot(&x) + self.intercept
    }

    /// Load a model artifact from JSON.
    pub fn load(path: &Path) -> Result<Self, String> {
        let data = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read model {}: {e}", path.display()))?;
        serde_json::from_str(&data)
            .map_err(|e| format!("Failed to parse model {}: {e}", path.display()))
    }

    /// Save the model artifact as JSON.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        crate::image::io::write_json_file(path, self)
    }
}

impl Classifier for LinearModel {
    fn dimension(&self) -> usize {
        self.weights.len()
    }

    fn predict(&self, features: &[f32]) -> bool {
        self.decision(features) > 0.0
    }
}

/// Fitted per-dimension standardization: `(x - mean) / scale`.
///
/// Fit once on the training matrix and reused unchanged at inference;
/// feeding it a vector of a different length is a contract violation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeatureScaler {
    pub mean: DVector<f32>,
    pub scale: DVector<f32>,
}

impl FeatureScaler {
    /// Fit mean and standard deviation per dimension over training rows.
    ///
    /// Zero-variance dimensions get unit scale so they pass through
    /// centred instead of dividing by zero.
    pub fn fit(rows: &[Vec<f32>]) -> Result<Self, DetectError> {
        let n = rows.len();
        if n == 0 {
            return Err(DetectError::Config(
                "scaler fit requires at least one sample".into(),
            ));
        }
        let dim = rows[0].len();
        if rows.iter().any(|r| r.len() != dim) {
            return Err(DetectError::Config(
                "scaler fit rows have inconsistent dimensions".into(),
            ));
        }

        let mut mean = DVector::zeros(dim);
        for row in rows {
            mean += DVector::from_column_slice(row);
        }
        mean /= n as f32;

        let mut var = DVector::zeros(dim);
        for row in rows {
            let d = DVector::from_column_slice(row) - &mean;
            var += d.component_mul(&d);
        }
        var /= n as f32;
        let scale = var.map(|v| {
            let s = v.sqrt();
            if s > 0.0 {
                s
            } else {
                1.0
            }
        });

        Ok(Self { mean, scale })
    }

    /// Identity transform of the given dimension.
    pub fn identity(dim: usize) -> Self {
        Self {
            mean: DVector::zeros(dim),
            scale: DVector::from_element(dim, 1.0),
        }
    }

    pub fn dimension(&self) -> usize {
        self.mean.len()
    }

    /// Standardize one feature vector.
    pub fn transform(&self, features: &[f32]) -> Result<Vec<f32>, DetectError> {
        if features.len() != self.mean.len() {
            return Err(DetectError::Config(format!(
                "feature vector length {} does not match scaler dimension {}",
                features.len(),
                self.mean.len()
            )));
        }
        let x = DVector::from_column_slice(features);
        let scaled = (x - &self.mean).component_div(&self.scale);
        Ok(scaled.as_slice().to_vec())
    }

    /// Load a scaler artifact from JSON.
    pub fn load(path: &Path) -> Result<Self, String> {
        let data = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read scaler {}: {e}", path.display()))?;
        serde_json::from_str(&data)
            .map_err(|e| format!("Failed to parse scaler {}: {e}", path.display()))
    }

    /// Save the scaler artifact as JSON.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        crate::image::io::write_json_file(path, self)
    }
}

#[cfg(test)]
mod tests {
    use super::{Classifier, FeatureScaler, LinearModel};

    #[test]
    fn linear_decision_is_signed_dot_product() {
        let model = LinearModel::new(vec![1.0, -2.0], 0.5);
        assert!(model.predict(&[1.0, 0.0]));
        assert!(!model.predict(&[0.0, 1.0]));
        assert_eq!(model.dimension(), 2);
        assert!((model.decision(&[2.0, 1.0]) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn scaler_standardizes_columns() {
        let rows = vec![vec![0.0, 10.0], vec![2.0, 10.0], vec![4.0, 10.0]];
        let scaler = FeatureScaler::fit(&rows).expect("fit");
        let t = scaler.transform(&[2.0, 10.0]).expect("transform");
        assert!(t[0].abs() < 1e-6);
        // Zero-variance column passes through centred.
        assert!(t[1].abs() < 1e-6);
        let hi = scaler.transform(&[4.0, 10.0]).expect("transform");
        assert!((hi[0] - 1.224_744_9).abs() < 1e-4);
    }

    #[test]
    fn transform_rejects_length_mismatch() {
        let scaler = FeatureScaler::identity(3);
        assert!(scaler.transform(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn artifacts_round_trip_through_json() {
        let model = LinearModel::new(vec![0.25, -0.75, 1.5], -0.125);
        let json = serde_json::to_string(&model).expect("serialize");
        let back: LinearModel = serde_json::from_str(&json).expect("parse");
        assert_eq!(back.weights, model.weights);
        assert_eq!(back.intercept, model.intercept);

        let scaler = FeatureScaler::identity(3);
        let json = serde_json::to_string(&scaler).expect("serialize");
        let back: FeatureScaler = serde_json::from_str(&json).expect("parse");
        assert_eq!(back.mean, scaler.mean);
    }
}
