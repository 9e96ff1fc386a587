//! # QROT Optim
//!
//! Differentiation and gradient-descent optimization of quantum nodes.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qrot_optim // L4+L5: Diff + Optim
//!     L4_Diff // 미분 계층
//!         ArgNum // 인자 선택
//!         Gradient // 기울기 (배열/튜플)
//!         ParameterShift // ±π/2 시프트 규칙
//!         FiniteDiff // 중앙 차분
//!     L5_Optim // 최적화 계층
//!         Objective // 목적 함수
//!         GradientDescentOptimizer // 경사 하강
//!         OptimizationEngine // 고정 스텝 루프
//!         OptimizationConfig // 설정
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qrot_device::prelude::*;
//! use qrot_optim::prelude::*;
//!
//! let dev = SimulatorDevice::new(1).unwrap();
//! let circuit = QNode::new(dev, |tape: &mut Tape, args: &Args| {
//!     tape.rx(0, args.element(0, 0)?)?;
//!     tape.ry(0, args.element(0, 1)?)?;
//!     Ok(expval(Observable::PauliZ(0)))
//! });
//!
//! let engine = OptimizationEngine::new(OptimizationConfig::tutorial()).unwrap();
//! let result = engine
//!     .run_default(&circuit, |r| println!("Cost after step {:5}: {:.7}", r.step, r.cost))
//!     .unwrap();
//!
//! assert!(result.final_cost < result.initial_cost);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Gradients (Gantree: L4_Diff → Gradient)
pub mod gradient;

/// Gradient-descent optimizer (Gantree: L5_Optim → GradientDescentOptimizer)
pub mod optimizer;

/// Optimization configuration (Gantree: L5_Optim → OptimizationConfig)
pub mod config;

/// Optimization engine (Gantree: L5_Optim → OptimizationEngine)
pub mod engine;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::OptimizationConfig;
pub use engine::{OptimizationEngine, OptimizationResult, StepRecord};
pub use gradient::{finite_difference, flat_gradient, grad, parameter_shift, ArgNum, Grad, Gradient};
pub use optimizer::{CostFn, GradientDescentOptimizer, Objective};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use qrot_optim::prelude::*;
    //! ```

    pub use crate::config::OptimizationConfig;
    pub use crate::engine::{OptimizationEngine, OptimizationResult, StepRecord};
    pub use crate::gradient::{grad, ArgNum, Grad, Gradient};
    pub use crate::optimizer::{CostFn, GradientDescentOptimizer, Objective};
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use approx::assert_abs_diff_eq;
    use qrot_device::prelude::*;

    fn circuit(dev: SimulatorDevice) -> QNode<SimulatorDevice> {
        QNode::new(dev, |tape: &mut Tape, args: &Args| {
            tape.rx(0, args.element(0, 0)?)?;
            tape.ry(0, args.element(0, 1)?)?;
            Ok(expval(Observable::PauliZ(0)))
        })
    }

    #[test]
    fn test_gradient_methods_agree() {
        let shift = circuit(SimulatorDevice::new(1).unwrap());
        let fd = circuit(SimulatorDevice::new(1).unwrap()).with_diff_method(DiffMethod::finite_diff());

        let g_shift = grad(&shift, ArgNum::One(0), vec![0.54, 0.12]).unwrap().flatten();
        let g_fd = grad(&fd, ArgNum::One(0), vec![0.54, 0.12]).unwrap().flatten();

        assert_abs_diff_eq!(g_shift[0], -0.54_f64.sin() * 0.12_f64.cos(), epsilon = 1e-6);
        assert_abs_diff_eq!(g_shift[1], -0.54_f64.cos() * 0.12_f64.sin(), epsilon = 1e-6);
        assert_abs_diff_eq!(g_shift[0], g_fd[0], epsilon = 1e-6);
        assert_abs_diff_eq!(g_shift[1], g_fd[1], epsilon = 1e-6);
    }

    #[test]
    fn test_cost_fn_optimization() {
        let cost = CostFn::identity(circuit(SimulatorDevice::new(1).unwrap()));
        let engine = OptimizationEngine::new(OptimizationConfig::tutorial()).unwrap();

        let mut reports = 0;
        let result = engine.run_default(&cost, |_| reports += 1).unwrap();

        assert_eq!(reports, OptimizationConfig::tutorial().report_count());
        assert!(result.final_cost < result.initial_cost);
        assert!(result.final_gradient_norm < 1e-6);
    }

    #[test]
    fn test_sampled_device_descends() {
        let shots = 4000;
        let engine = OptimizationEngine::new(
            OptimizationConfig::tutorial().with_init_params(vec![0.5, 0.1]).with_steps(40),
        )
        .unwrap();

        let exact = engine
            .run_default(&circuit(SimulatorDevice::new(1).unwrap()), |_| {})
            .unwrap();
        assert_abs_diff_eq!(exact.final_cost, -1.0, epsilon = 1e-6);

        for seed in [3, 11, 2024] {
            let dev = SimulatorDevice::new(1).unwrap().with_shots(shots).with_seed(seed);
            let sampled = engine.run_default(&circuit(dev), |_| {}).unwrap();

            let tolerance = 5.0 / (shots as f64).sqrt();
            assert!(sampled.improved());
            assert!(
                (sampled.final_cost - exact.final_cost).abs() < tolerance,
                "seed {}: sampled {} vs exact {}",
                seed,
                sampled.final_cost,
                exact.final_cost
            );
        }
    }

    #[test]
    fn test_equal_angles_stay_on_diagonal() {
        // cos(x)cos(x) has its minimum at x = pi/2, never reaching -1
        let engine = OptimizationEngine::new(
            OptimizationConfig::tutorial().with_init_params(vec![0.5, 0.5]).with_steps(40),
        )
        .unwrap();

        let result = engine
            .run_default(&circuit(SimulatorDevice::new(1).unwrap()), |_| {})
            .unwrap();
        assert_abs_diff_eq!(result.final_params[0], result.final_params[1], epsilon = 1e-12);
        assert_abs_diff_eq!(result.final_cost, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_result_json() {
        let engine = OptimizationEngine::new(OptimizationConfig::tutorial().with_steps(10)).unwrap();
        let result = engine
            .run_default(&circuit(SimulatorDevice::new(1).unwrap()), |_| {})
            .unwrap();

        let json = serde_json::to_string(&result).unwrap();
        let back: OptimizationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.steps, 10);
        assert_eq!(back.history.len(), result.history.len());
        assert_abs_diff_eq!(back.final_cost, result.final_cost, epsilon = 1e-12);
    }
}
