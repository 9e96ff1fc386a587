//! # QROT Demo
//!
//! The qubit rotation program: evaluate an RX·RY circuit, differentiate it,
//! and drive ⟨PauliZ⟩ from +1 to -1 by gradient descent.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qrot_demo // L6: Application
//!     DemoConfig // 디바이스 + 최적화 설정
//!     Circuits // circuit(params), circuit2(phi1, phi2)
//!     run // 튜토리얼 실행 + 출력
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use qrot_demo::{run, DemoConfig};
//!
//! let mut out = Vec::new();
//! let report = run(&DemoConfig::default(), &mut out).unwrap();
//!
//! assert!(report.result.final_cost < report.initial_cost);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

use anyhow::{bail, Context, Result};
use qrot_core::{
    format_array, format_signed, rotation, Args, Observable, ParamVec, QrotError, QrotResult,
};
use qrot_device::{expval, DiffMethod, QNode, SimulatorDevice, Tape};
use qrot_optim::{
    grad, ArgNum, CostFn, Gradient, Objective, OptimizationConfig, OptimizationEngine,
    OptimizationResult, StepRecord,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Parameters read by the rotation circuits
const CIRCUIT_PARAMS: usize = 2;

// ============================================================================
// Configuration
// ============================================================================

/// Demo configuration
/// Gantree: DemoConfig // 데모 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Device name (`default.qubit` or `lightning.qubit`)
    pub device: String,

    /// Number of wires
    pub wires: usize,

    /// Shots per execution (None = analytic)
    pub shots: Option<u64>,

    /// Sampling seed
    pub seed: Option<u64>,

    /// Differentiation method
    pub diff_method: DiffMethod,

    /// Point at which the circuit and its gradients are printed
    pub probe_params: ParamVec,

    /// Optimization settings
    pub optimization: OptimizationConfig,
}

impl DemoConfig {
    /// Load from a JSON file; missing fields take tutorial values
    pub fn load(path: impl AsRef<Path>) -> QrotResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| QrotError::FileError(format!("{}: {}", path.display(), e)))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Set device name
    pub fn with_device(mut self, name: impl Into<String>) -> Self {
        self.device = name.into();
        self
    }

    /// Estimate expectations from `shots` samples
    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = Some(shots);
        self
    }

    /// Set sampling seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set differentiation method
    pub fn with_diff_method(mut self, method: DiffMethod) -> Self {
        self.diff_method = method;
        self
    }

    /// Set optimization settings
    pub fn with_optimization(mut self, optimization: OptimizationConfig) -> Self {
        self.optimization = optimization;
        self
    }

    /// Validate configuration
    /// Gantree: validate(&self) -> Result // 검증
    pub fn validate(&self) -> Result<(), String> {
        if self.probe_params.len() != CIRCUIT_PARAMS {
            return Err(format!(
                "probe_params must have {} values, got {}",
                CIRCUIT_PARAMS,
                self.probe_params.len()
            ));
        }

        if self.optimization.init_params.len() != CIRCUIT_PARAMS {
            return Err(format!(
                "optimization.init_params must have {} values, got {}",
                CIRCUIT_PARAMS,
                self.optimization.init_params.len()
            ));
        }

        self.optimization.validate()
    }

    /// Build the configured device
    pub fn device(&self) -> QrotResult<SimulatorDevice> {
        let mut dev = SimulatorDevice::from_name(&self.device, self.wires)?;
        if let Some(shots) = self.shots {
            dev = dev.with_shots(shots);
        }
        if let Some(seed) = self.seed {
            dev = dev.with_seed(seed);
        }
        Ok(dev)
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            device: qrot_core::device::DEFAULT_DEVICE.to_string(),
            wires: 1,
            shots: None,
            seed: None,
            diff_method: DiffMethod::ParameterShift,
            probe_params: rotation::PROBE_PARAMS.to_vec(),
            optimization: OptimizationConfig::tutorial(),
        }
    }
}

impl fmt::Display for DemoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shots = match self.shots {
            Some(n) => n.to_string(),
            None => "analytic".to_string(),
        };
        write!(
            f,
            "DemoConfig({}, wires={}, shots={}, diff={}, {})",
            self.device, self.wires, shots, self.diff_method, self.optimization
        )
    }
}

// ============================================================================
// Circuits
// ============================================================================

/// RX(params[0]) RY(params[1]) on wire 0, measuring ⟨PauliZ(0)⟩
/// Gantree: circuit(dev) -> QNode // 배열 인자 회로
pub fn circuit(dev: SimulatorDevice) -> QNode<SimulatorDevice> {
    QNode::new(dev, |tape: &mut Tape, args: &Args| {
        tape.rx(0, args.element(0, 0)?)?;
        tape.ry(0, args.element(0, 1)?)?;
        Ok(expval(Observable::PauliZ(0)))
    })
}

/// Same circuit taking the two angles as separate scalar arguments
pub fn circuit2(dev: SimulatorDevice) -> QNode<SimulatorDevice> {
    QNode::new(dev, |tape: &mut Tape, args: &Args| {
        tape.rx(0, args.scalar(0)?)?;
        tape.ry(0, args.scalar(1)?)?;
        Ok(expval(Observable::PauliZ(0)))
    })
}

// ============================================================================
// Run
// ============================================================================

/// Everything the demo printed
#[derive(Debug, Clone)]
pub struct DemoReport {
    /// Circuit value at the probe point
    pub circuit_value: f64,

    /// Gradient of `circuit` w.r.t. its array argument
    pub gradient: Gradient,

    /// Gradient of `circuit2` w.r.t. both scalar arguments
    pub gradient2: Gradient,

    /// Cost at the starting point
    pub initial_cost: f64,

    /// Optimization outcome
    pub result: OptimizationResult,
}

/// Progress line for one reported step
pub fn format_progress(record: &StepRecord) -> String {
    format!(
        "Cost after step {:5}: {}",
        record.step,
        format_signed(record.cost, rotation::COST_PRECISION)
    )
}

/// Run the qubit rotation program, writing its output to `out`
/// Gantree: run(config, out) -> Result<DemoReport> // 실행
pub fn run(config: &DemoConfig, out: &mut dyn Write) -> Result<DemoReport> {
    if let Err(e) = config.validate() {
        bail!("invalid demo configuration: {}", e);
    }
    log::info!("{}", config);

    let dev = config.device().context("failed to create device")?;
    let node = circuit(dev.clone()).with_diff_method(config.diff_method);
    let node2 = circuit2(dev).with_diff_method(config.diff_method);

    let probe = &config.probe_params;
    let circuit_value = node
        .call(probe.as_slice())
        .context("failed to evaluate circuit")?;
    writeln!(out, "{}", circuit_value)?;

    let gradient = grad(&node, ArgNum::One(0), probe.as_slice())
        .context("failed to differentiate circuit")?;
    writeln!(out, "{}", gradient)?;

    let gradient2 = grad(&node2, ArgNum::Many(vec![0, 1]), Args::scalars(probe))
        .context("failed to differentiate circuit2")?;
    writeln!(out, "{}", gradient2)?;

    let cost = CostFn::identity(node);
    let init = &config.optimization.init_params;
    let initial_cost = cost.cost(init).context("failed to evaluate initial cost")?;
    writeln!(out, "{}", initial_cost)?;

    let engine = OptimizationEngine::new(config.optimization.clone())
        .context("failed to create optimizer")?;

    let mut write_error = None;
    let result = engine
        .run(&cost, init, |record| {
            if write_error.is_none() {
                if let Err(e) = writeln!(out, "{}", format_progress(record)) {
                    write_error = Some(e);
                }
            }
        })
        .context("optimization failed")?;
    if let Some(e) = write_error {
        return Err(e.into());
    }

    writeln!(
        out,
        "Optimized rotation angles: {}",
        format_array(&result.final_params, rotation::VALUE_PRECISION)
    )?;

    log::info!(
        "{} circuit executions, final |grad| {:.3e}",
        cost.qnode().executions(),
        result.final_gradient_norm
    );

    Ok(DemoReport {
        circuit_value,
        gradient,
        gradient2,
        initial_cost,
        result,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_config() {
        let config = DemoConfig::default();

        assert_eq!(config.device, "lightning.qubit");
        assert_eq!(config.probe_params, vec![0.54, 0.12]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_config() {
        let config: DemoConfig =
            serde_json::from_str(r#"{"device": "default.qubit", "shots": 1000, "seed": 3}"#)
                .unwrap();

        assert_eq!(config.device, "default.qubit");
        assert_eq!(config.shots, Some(1000));
        assert_eq!(config.optimization, OptimizationConfig::tutorial());
    }

    #[test]
    fn test_invalid_probe() {
        let mut config = DemoConfig::default();
        config.probe_params = vec![0.54];
        assert!(config.validate().is_err());
        assert!(run(&config, &mut Vec::new()).is_err());
    }

    #[test]
    fn test_unknown_device() {
        let config = DemoConfig::default().with_device("qiskit.aer");
        let err = run(&config, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("device"));
    }

    #[test]
    fn test_format_progress() {
        let record = StepRecord {
            step: 5,
            cost: 0.99617781,
            params: vec![],
            gradient_norm: 0.0,
        };
        assert_eq!(format_progress(&record), "Cost after step     5:  0.9961778");

        let record = StepRecord {
            step: 100,
            cost: -1.0,
            ..record
        };
        assert_eq!(format_progress(&record), "Cost after step   100: -1.0000000");
    }

    #[test]
    fn test_report_values() {
        let report = run(&DemoConfig::default(), &mut Vec::new()).unwrap();

        assert_abs_diff_eq!(report.circuit_value, 0.8515405859, epsilon = 1e-9);
        assert_eq!(report.gradient.flatten(), report.gradient2.flatten());
        assert_abs_diff_eq!(report.initial_cost, 0.9998675058, epsilon = 1e-9);
    }

    #[test]
    fn test_finite_diff_demo() {
        let config = DemoConfig::default().with_diff_method(DiffMethod::finite_diff());
        let report = run(&config, &mut Vec::new()).unwrap();
        assert_abs_diff_eq!(report.result.final_cost, -1.0, epsilon = 1e-6);
    }
}
