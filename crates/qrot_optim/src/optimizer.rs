//! Gradient-descent optimizer
//!
//! Gantree: L5_Optim → GradientDescentOptimizer
//!
//! Plain gradient descent `x ← x - η ∇f(x)` over a flat parameter vector.

use crate::gradient::flat_gradient;
use qrot_core::{Args, ParamVec, QrotError, QrotResult};
use qrot_device::{Device, QNode};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Objective
// ============================================================================

/// Differentiable scalar function of a flat parameter vector
/// Gantree: Objective // 목적 함수
pub trait Objective {
    /// Cost at `params`
    fn cost(&self, params: &[f64]) -> QrotResult<f64>;

    /// Gradient at `params`
    fn gradient(&self, params: &[f64]) -> QrotResult<ParamVec>;
}

/// A QNode taking a single array argument is its own objective
impl<D: Device> Objective for QNode<D> {
    fn cost(&self, params: &[f64]) -> QrotResult<f64> {
        self.call(params)
    }

    fn gradient(&self, params: &[f64]) -> QrotResult<ParamVec> {
        flat_gradient(self, &Args::array(params))
    }
}

/// Classical post-processing of a QNode's output
type PostFn = dyn Fn(f64) -> f64 + Send + Sync;

/// QNode composed with a differentiable classical function
/// Gantree: CostFn // 비용 함수
pub struct CostFn<D: Device> {
    qnode: QNode<D>,
    post: Box<PostFn>,
    derivative: Box<PostFn>,
}

impl<D: Device> CostFn<D> {
    /// `cost(x) = post(qnode(x))` with `derivative = post'`
    pub fn new<F, G>(qnode: QNode<D>, post: F, derivative: G) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
        G: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self {
            qnode,
            post: Box::new(post),
            derivative: Box::new(derivative),
        }
    }

    /// `cost(x) = qnode(x)`
    pub fn identity(qnode: QNode<D>) -> Self {
        Self::new(qnode, |y| y, |_| 1.0)
    }

    /// Underlying QNode
    pub fn qnode(&self) -> &QNode<D> {
        &self.qnode
    }
}

impl<D: Device> Objective for CostFn<D> {
    fn cost(&self, params: &[f64]) -> QrotResult<f64> {
        Ok((self.post)(self.qnode.cost(params)?))
    }

    fn gradient(&self, params: &[f64]) -> QrotResult<ParamVec> {
        let scale = (self.derivative)(self.qnode.cost(params)?);
        let grad = self.qnode.gradient(params)?;
        Ok(grad.into_iter().map(|g| scale * g).collect())
    }
}

// ============================================================================
// Optimizer
// ============================================================================

/// Gradient-descent optimizer
/// Gantree: GradientDescentOptimizer // 경사 하강
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientDescentOptimizer {
    stepsize: f64,
}

impl GradientDescentOptimizer {
    /// Create optimizer with step size `stepsize`
    pub fn new(stepsize: f64) -> QrotResult<Self> {
        if !(stepsize.is_finite() && stepsize > 0.0) {
            return Err(QrotError::InvalidStepSize(stepsize));
        }
        Ok(Self { stepsize })
    }

    /// Step size
    pub fn stepsize(&self) -> f64 {
        self.stepsize
    }

    /// `params - stepsize * grad`
    /// Gantree: apply_grad(grad, params) -> Result<ParamVec> // 갱신
    pub fn apply_grad(&self, grad: &[f64], params: &[f64]) -> QrotResult<ParamVec> {
        if grad.len() != params.len() {
            return Err(QrotError::ParamCountMismatch {
                expected: params.len(),
                got: grad.len(),
            });
        }

        Ok(params
            .iter()
            .zip(grad)
            .map(|(x, g)| x - self.stepsize * g)
            .collect())
    }

    /// One update step
    /// Gantree: step(objective, params) -> Result<ParamVec> // 한 스텝
    pub fn step<O: Objective + ?Sized>(&self, objective: &O, params: &[f64]) -> QrotResult<ParamVec> {
        let grad = objective.gradient(params)?;
        self.apply_grad(&grad, params)
    }

    /// One update step, also returning the cost before the step
    pub fn step_and_cost<O: Objective + ?Sized>(
        &self,
        objective: &O,
        params: &[f64],
    ) -> QrotResult<(ParamVec, f64)> {
        let cost = objective.cost(params)?;
        let next = self.step(objective, params)?;
        Ok((next, cost))
    }
}

impl fmt::Display for GradientDescentOptimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GradientDescent(stepsize={})", self.stepsize)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use qrot_core::Observable;
    use qrot_device::{expval, SimulatorDevice, Tape};

    fn circuit() -> QNode<SimulatorDevice> {
        QNode::new(SimulatorDevice::new(1).unwrap(), |tape: &mut Tape, args: &Args| {
            tape.rx(0, args.element(0, 0)?)?;
            tape.ry(0, args.element(0, 1)?)?;
            Ok(expval(Observable::PauliZ(0)))
        })
    }

    /// f(x) = (x0 - 1)² + (x1 + 2)²
    struct Quadratic;

    impl Objective for Quadratic {
        fn cost(&self, p: &[f64]) -> QrotResult<f64> {
            Ok((p[0] - 1.0).powi(2) + (p[1] + 2.0).powi(2))
        }

        fn gradient(&self, p: &[f64]) -> QrotResult<ParamVec> {
            Ok(vec![2.0 * (p[0] - 1.0), 2.0 * (p[1] + 2.0)])
        }
    }

    #[test]
    fn test_invalid_stepsize() {
        assert_eq!(
            GradientDescentOptimizer::new(0.0),
            Err(QrotError::InvalidStepSize(0.0))
        );
        assert!(GradientDescentOptimizer::new(-0.4).is_err());
        assert!(GradientDescentOptimizer::new(f64::NAN).is_err());
    }

    #[test]
    fn test_apply_grad() {
        let opt = GradientDescentOptimizer::new(0.4).unwrap();
        let next = opt.apply_grad(&[1.0, -0.5], &[0.0, 0.0]).unwrap();

        assert_abs_diff_eq!(next[0], -0.4);
        assert_abs_diff_eq!(next[1], 0.2);
        assert!(opt.apply_grad(&[1.0], &[0.0, 0.0]).is_err());
    }

    #[test]
    fn test_quadratic_converges() {
        let opt = GradientDescentOptimizer::new(0.25).unwrap();
        let mut params = vec![0.0, 0.0];
        for _ in 0..50 {
            params = opt.step(&Quadratic, &params).unwrap();
        }

        assert_abs_diff_eq!(params[0], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(params[1], -2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_step_and_cost_returns_prior_cost() {
        let opt = GradientDescentOptimizer::new(0.4).unwrap();
        let node = circuit();

        let (next, cost) = opt.step_and_cost(&node, &[0.011, 0.012]).unwrap();
        assert_abs_diff_eq!(cost, 0.011_f64.cos() * 0.012_f64.cos(), epsilon = 1e-12);
        assert!(node.cost(&next).unwrap() < cost);
    }

    #[test]
    fn test_qnode_step() {
        let opt = GradientDescentOptimizer::new(0.4).unwrap();
        let next = opt.step(&circuit(), &[0.54, 0.12]).unwrap();

        // x - 0.4 * (-sin p0 cos p1, -cos p0 sin p1)
        assert_abs_diff_eq!(next[0], 0.54 + 0.4 * 0.54_f64.sin() * 0.12_f64.cos(), epsilon = 1e-12);
        assert_abs_diff_eq!(next[1], 0.12 + 0.4 * 0.54_f64.cos() * 0.12_f64.sin(), epsilon = 1e-12);
    }

    #[test]
    fn test_cost_fn_chain_rule() {
        // cost = 3 * circuit(x)
        let cost = CostFn::new(circuit(), |y| 3.0 * y, |_| 3.0);
        let direct = circuit();

        let g = cost.gradient(&[0.54, 0.12]).unwrap();
        let g_direct = direct.gradient(&[0.54, 0.12]).unwrap();
        assert_abs_diff_eq!(g[0], 3.0 * g_direct[0], epsilon = 1e-12);
        assert_abs_diff_eq!(g[1], 3.0 * g_direct[1], epsilon = 1e-12);
    }

    #[test]
    fn test_identity_cost_matches_qnode() {
        let cost = CostFn::identity(circuit());
        assert_eq!(
            cost.cost(&[0.011, 0.012]).unwrap(),
            cost.qnode().call(vec![0.011, 0.012]).unwrap()
        );
    }
}
