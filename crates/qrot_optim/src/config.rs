//! Optimization configuration
//!
//! Gantree: L5_Optim → OptimizationConfig
//!
//! Step count, step size, reporting interval, and starting point.

use qrot_core::{format_values, rotation, ParamVec, QrotError, QrotResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Optimization configuration
/// Gantree: OptimizationConfig // 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationConfig {
    /// Number of gradient-descent steps
    /// Gantree: steps: usize // 스텝 수 (100)
    pub steps: usize,

    /// Gradient-descent step size
    /// Gantree: stepsize: f64 // 스텝 크기 (0.4)
    pub stepsize: f64,

    /// Report progress every this many steps (0 = never)
    /// Gantree: report_every: usize // 보고 간격 (5)
    pub report_every: usize,

    /// Starting parameters
    /// Gantree: init_params: ParamVec // 초기값
    pub init_params: ParamVec,
}

impl OptimizationConfig {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Qubit rotation tutorial settings
    pub fn tutorial() -> Self {
        Self {
            steps: rotation::STEPS,
            stepsize: rotation::STEPSIZE,
            report_every: rotation::REPORT_EVERY,
            init_params: rotation::INIT_PARAMS.to_vec(),
        }
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> QrotResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| QrotError::FileError(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// Parse from JSON; missing fields take tutorial values
    pub fn from_json(json: &str) -> QrotResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set number of steps
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    /// Set step size
    pub fn with_stepsize(mut self, stepsize: f64) -> Self {
        self.stepsize = stepsize;
        self
    }

    /// Set reporting interval
    pub fn with_report_every(mut self, every: usize) -> Self {
        self.report_every = every;
        self
    }

    /// Set starting parameters
    pub fn with_init_params(mut self, params: impl Into<ParamVec>) -> Self {
        self.init_params = params.into();
        self
    }

    // ========================================================================
    // Derived Values
    // ========================================================================

    /// Number of progress reports a full run produces
    pub fn report_count(&self) -> usize {
        rotation::report_count(self.steps, self.report_every)
    }

    // ========================================================================
    // Validation / IO
    // ========================================================================

    /// Validate configuration
    /// Gantree: validate(&self) -> Result // 검증
    pub fn validate(&self) -> Result<(), String> {
        if !(self.stepsize.is_finite() && self.stepsize > 0.0) {
            return Err(format!("stepsize must be finite and > 0, got {}", self.stepsize));
        }

        if self.init_params.is_empty() {
            return Err("init_params must not be empty".to_string());
        }

        if let Some(x) = self.init_params.iter().find(|x| !x.is_finite()) {
            return Err(format!("init_params must be finite, got {}", x));
        }

        Ok(())
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> QrotResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> QrotResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)
            .map_err(|e| QrotError::FileError(format!("{}: {}", path.display(), e)))
    }
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self::tutorial()
    }
}

impl fmt::Display for OptimizationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OptimizationConfig(steps={}, stepsize={}, report_every={}, init={})",
            self.steps,
            self.stepsize,
            self.report_every,
            format_values(&self.init_params, 3)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tutorial_defaults() {
        let config = OptimizationConfig::default();

        assert_eq!(config.steps, 100);
        assert_eq!(config.stepsize, 0.4);
        assert_eq!(config.init_params, vec![0.011, 0.012]);
        assert_eq!(config.report_count(), 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = OptimizationConfig::tutorial()
            .with_steps(10)
            .with_stepsize(0.1)
            .with_report_every(0)
            .with_init_params(vec![0.5, 0.5]);

        assert_eq!(config.steps, 10);
        assert_eq!(config.report_count(), 0);
        assert_eq!(config.init_params, vec![0.5, 0.5]);
    }

    #[test]
    fn test_validation() {
        assert!(OptimizationConfig::tutorial().with_stepsize(0.0).validate().is_err());
        assert!(OptimizationConfig::tutorial()
            .with_init_params(Vec::<f64>::new())
            .validate()
            .is_err());
        assert!(OptimizationConfig::tutorial()
            .with_init_params(vec![f64::INFINITY, 0.0])
            .validate()
            .is_err());
    }

    #[test]
    fn test_partial_json() {
        let config = OptimizationConfig::from_json(r#"{"steps": 20}"#).unwrap();

        assert_eq!(config.steps, 20);
        assert_eq!(config.stepsize, rotation::STEPSIZE);
        assert!(OptimizationConfig::from_json("{not json").is_err());
    }

    #[test]
    fn test_save_load() {
        let path = std::env::temp_dir().join("qrot_optim_config_test.json");
        let config = OptimizationConfig::tutorial().with_steps(42);

        config.save(&path).unwrap();
        let loaded = OptimizationConfig::load(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let result = OptimizationConfig::load("/nonexistent/qrot.json");
        assert!(matches!(result, Err(QrotError::FileError(_))));
    }
}
