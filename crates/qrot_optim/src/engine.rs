//! Optimization engine
//!
//! Gantree: L5_Optim → OptimizationEngine
//!
//! Runs a fixed number of gradient-descent steps, recording each step and
//! reporting progress at a fixed interval. No early stopping.

use crate::config::OptimizationConfig;
use crate::optimizer::{GradientDescentOptimizer, Objective};
use qrot_core::{format_values, ParamVec, QrotError, QrotResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Record of a single step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Step number (1-based)
    pub step: usize,

    /// Cost after the update
    pub cost: f64,

    /// Parameters after the update
    pub params: ParamVec,

    /// Norm of the gradient used for the update
    pub gradient_norm: f64,
}

/// Optimization result
/// Gantree: OptimizationResult // 최적화 결과
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Starting parameters
    pub initial_params: ParamVec,

    /// Cost at the starting parameters
    pub initial_cost: f64,

    /// Final parameters
    pub final_params: ParamVec,

    /// Cost at the final parameters
    pub final_cost: f64,

    /// Gradient norm at the final parameters
    pub final_gradient_norm: f64,

    /// Number of updates performed
    pub steps: usize,

    /// Step history
    pub history: Vec<StepRecord>,
}

impl OptimizationResult {
    /// Cost decrease (initial - final)
    pub fn improvement(&self) -> f64 {
        self.initial_cost - self.final_cost
    }

    /// Check if the cost went down
    pub fn improved(&self) -> bool {
        self.final_cost < self.initial_cost
    }

    /// Records at every `every`-th step
    pub fn reports(&self, every: usize) -> impl Iterator<Item = &StepRecord> {
        self.history
            .iter()
            .filter(move |r| every > 0 && r.step % every == 0)
    }
}

impl fmt::Display for OptimizationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "OptimizationResult ({} steps)", self.steps)?;
        writeln!(
            f,
            "  Cost: {:.7} -> {:.7}",
            self.initial_cost, self.final_cost
        )?;
        writeln!(f, "  Params: {}", format_values(&self.final_params, 8))?;
        write!(f, "  |grad|: {:.3e}", self.final_gradient_norm)
    }
}

/// Optimization engine
/// Gantree: OptimizationEngine // 최적화 루프
#[derive(Debug, Clone)]
pub struct OptimizationEngine {
    /// Configuration
    config: OptimizationConfig,

    /// Update rule
    optimizer: GradientDescentOptimizer,
}

impl OptimizationEngine {
    /// Create engine from a validated configuration
    pub fn new(config: OptimizationConfig) -> QrotResult<Self> {
        config.validate().map_err(QrotError::ConfigError)?;
        let optimizer = GradientDescentOptimizer::new(config.stepsize)?;
        Ok(Self { config, optimizer })
    }

    /// Get configuration
    pub fn config(&self) -> &OptimizationConfig {
        &self.config
    }

    /// Get optimizer
    pub fn optimizer(&self) -> &GradientDescentOptimizer {
        &self.optimizer
    }

    /// Run from the configured starting point
    pub fn run_default<O, F>(&self, objective: &O, progress: F) -> QrotResult<OptimizationResult>
    where
        O: Objective + ?Sized,
        F: FnMut(&StepRecord),
    {
        let init = self.config.init_params.clone();
        self.run(objective, &init, progress)
    }

    /// Run `steps` updates from `init`, calling `progress` every
    /// `report_every` steps with the record of that step
    /// Gantree: run(objective, init, progress) -> Result<OptimizationResult> // 실행
    pub fn run<O, F>(
        &self,
        objective: &O,
        init: &[f64],
        mut progress: F,
    ) -> QrotResult<OptimizationResult>
    where
        O: Objective + ?Sized,
        F: FnMut(&StepRecord),
    {
        let initial_cost = objective.cost(init)?;
        let every = self.config.report_every;

        log::info!(
            "optimizing from {} (cost {:.7}) with {}",
            format_values(init, 8),
            initial_cost,
            self.optimizer
        );

        let mut params = init.to_vec();
        let mut history = Vec::with_capacity(self.config.steps);

        for i in 0..self.config.steps {
            let grad = objective.gradient(&params)?;
            params = self.optimizer.apply_grad(&grad, &params)?;
            let cost = objective.cost(&params)?;

            let record = StepRecord {
                step: i + 1,
                cost,
                params: params.clone(),
                gradient_norm: norm(&grad),
            };
            log::debug!(
                "step {}: cost={:.10} |grad|={:.3e}",
                record.step,
                record.cost,
                record.gradient_norm
            );

            if every > 0 && record.step % every == 0 {
                progress(&record);
            }
            history.push(record);
        }

        let final_cost = history.last().map(|r| r.cost).unwrap_or(initial_cost);
        let final_gradient_norm = norm(&objective.gradient(&params)?);

        log::info!(
            "finished {} steps: cost {:.7}, |grad| {:.3e}",
            history.len(),
            final_cost,
            final_gradient_norm
        );

        Ok(OptimizationResult {
            initial_params: init.to_vec(),
            initial_cost,
            final_params: params,
            final_cost,
            final_gradient_norm,
            steps: history.len(),
            history,
        })
    }
}

fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use qrot_core::{Args, Observable};
    use qrot_device::{expval, QNode, SimulatorDevice, Tape};

    fn circuit() -> QNode<SimulatorDevice> {
        QNode::new(SimulatorDevice::new(1).unwrap(), |tape: &mut Tape, args: &Args| {
            tape.rx(0, args.element(0, 0)?)?;
            tape.ry(0, args.element(0, 1)?)?;
            Ok(expval(Observable::PauliZ(0)))
        })
    }

    #[test]
    fn test_tutorial_run() {
        let engine = OptimizationEngine::new(OptimizationConfig::tutorial()).unwrap();
        let mut reported = Vec::new();

        let result = engine
            .run_default(&circuit(), |r| reported.push((r.step, r.cost)))
            .unwrap();

        assert_eq!(result.steps, 100);
        assert_eq!(result.history.len(), 100);
        assert_eq!(reported.len(), 20);
        assert_eq!(reported[0].0, 5);
        assert_eq!(reported[19].0, 100);

        assert!(result.improved());
        assert_abs_diff_eq!(result.final_cost, -1.0, epsilon = 1e-9);
        assert!(result.final_gradient_norm < 1e-6);
        assert_abs_diff_eq!(result.final_params[0], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.final_params[1], std::f64::consts::PI, epsilon = 1e-9);
    }

    #[test]
    fn test_known_progress_values() {
        let engine = OptimizationEngine::new(OptimizationConfig::tutorial()).unwrap();
        let result = engine.run_default(&circuit(), |_| {}).unwrap();

        let reports: Vec<f64> = result.reports(5).map(|r| r.cost).collect();
        assert_abs_diff_eq!(reports[0], 0.9961778, epsilon = 1e-7);
        assert_abs_diff_eq!(reports[2], 0.1440490, epsilon = 1e-7);
        assert_abs_diff_eq!(reports[4], -0.9152496, epsilon = 1e-7);
    }

    #[test]
    fn test_deterministic() {
        let engine = OptimizationEngine::new(OptimizationConfig::tutorial().with_steps(30)).unwrap();
        let a = engine.run_default(&circuit(), |_| {}).unwrap();
        let b = engine.run_default(&circuit(), |_| {}).unwrap();

        assert_eq!(a.history, b.history);
    }

    #[test]
    fn test_zero_steps() {
        let engine = OptimizationEngine::new(OptimizationConfig::tutorial().with_steps(0)).unwrap();
        let result = engine.run_default(&circuit(), |_| panic!("no reports")).unwrap();

        assert_eq!(result.steps, 0);
        assert_eq!(result.final_cost, result.initial_cost);
        assert_eq!(result.final_params, result.initial_params);
    }

    #[test]
    fn test_invalid_config() {
        let config = OptimizationConfig::tutorial().with_stepsize(-1.0);
        assert!(matches!(
            OptimizationEngine::new(config),
            Err(QrotError::ConfigError(_))
        ));
    }

    #[test]
    fn test_wrong_dimension_propagates() {
        let engine = OptimizationEngine::new(OptimizationConfig::tutorial()).unwrap();
        let result = engine.run(&circuit(), &[0.1, 0.2, 0.3], |_| {});
        assert_eq!(
            result.unwrap_err(),
            QrotError::ParamCountMismatch { expected: 2, got: 3 }
        );
    }
}
