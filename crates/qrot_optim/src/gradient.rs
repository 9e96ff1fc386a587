//! Gradients of quantum nodes
//!
//! Gantree: L4_Diff → Gradient
//!
//! Parameter-shift and finite-difference differentiation over the flat
//! argument index space, reshaped back onto the selected arguments.

use qrot_core::{diff, Arg, Args, ParamVec, QrotError, QrotResult};
use qrot_device::{Device, DiffMethod, QNode};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Argument Selection
// ============================================================================

/// Which arguments to differentiate with respect to
/// Gantree: ArgNum // 미분 대상 인자
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgNum {
    /// A single argument; gradient has that argument's shape
    One(usize),
    /// Several arguments; gradient is a tuple
    Many(Vec<usize>),
}

impl ArgNum {
    /// Selected argument indices
    pub fn indices(&self) -> &[usize] {
        match self {
            ArgNum::One(i) => std::slice::from_ref(i),
            ArgNum::Many(v) => v,
        }
    }

    /// Check every index refers to a supplied argument
    pub fn validate(&self, args: &Args) -> QrotResult<()> {
        match self.indices().iter().find(|&&i| i >= args.len()) {
            Some(&argnum) => Err(QrotError::InvalidArgNum {
                argnum,
                len: args.len(),
            }),
            None => Ok(()),
        }
    }
}

impl Default for ArgNum {
    fn default() -> Self {
        ArgNum::One(0)
    }
}

impl From<usize> for ArgNum {
    fn from(i: usize) -> Self {
        ArgNum::One(i)
    }
}

impl From<Vec<usize>> for ArgNum {
    fn from(v: Vec<usize>) -> Self {
        ArgNum::Many(v)
    }
}

impl<const N: usize> From<[usize; N]> for ArgNum {
    fn from(v: [usize; N]) -> Self {
        ArgNum::Many(v.to_vec())
    }
}

// ============================================================================
// Gradient
// ============================================================================

/// Gradient shaped like the selected arguments
/// Gantree: Gradient // 기울기
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gradient {
    /// Gradient w.r.t. one argument
    One(Arg),
    /// Gradient w.r.t. several arguments, in selection order
    Many(Vec<Arg>),
}

impl Gradient {
    /// Components in selection order
    pub fn flatten(&self) -> ParamVec {
        match self {
            Gradient::One(arg) => arg.values().to_vec(),
            Gradient::Many(args) => args.iter().flat_map(|a| a.values().to_vec()).collect(),
        }
    }

    /// Euclidean norm
    pub fn norm(&self) -> f64 {
        self.flatten().iter().map(|g| g * g).sum::<f64>().sqrt()
    }
}

impl fmt::Display for Gradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gradient::One(arg) => write!(f, "{}", arg),
            Gradient::Many(args) => {
                let items: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                write!(f, "({})", items.join(", "))
            }
        }
    }
}

// ============================================================================
// Differentiation
// ============================================================================

/// Parameter-shift gradient over all flat argument components
/// Gantree: parameter_shift(qnode, args) -> Result<ParamVec> // 시프트 규칙
pub fn parameter_shift<D: Device>(qnode: &QNode<D>, args: &Args) -> QrotResult<ParamVec> {
    let tape = qnode.construct(args)?;
    let measurement = *tape
        .measurement()
        .ok_or_else(|| QrotError::InternalError("tape has no measurement".into()))?;

    let shift = diff::PARAMETER_SHIFT;
    let coefficient = diff::shift_coefficient(shift);
    let mut grad = vec![0.0; args.flat_len()];

    // A component bound to several gates accumulates one term per gate
    for (i, binding) in tape.bindings().iter().enumerate() {
        let plus = qnode.execute_circuit(&tape.shifted(i, shift)?, &measurement)?;
        let minus = qnode.execute_circuit(&tape.shifted(i, -shift)?, &measurement)?;
        grad[binding.flat] += coefficient * (plus.value - minus.value);
    }

    Ok(grad)
}

/// Central finite-difference gradient over all flat argument components
pub fn finite_difference<D: Device>(qnode: &QNode<D>, args: &Args, h: f64) -> QrotResult<ParamVec> {
    if !(h.is_finite() && h > 0.0) {
        return Err(QrotError::ConfigError(format!(
            "finite-difference step must be finite and > 0, got {}",
            h
        )));
    }

    // Validates the parameter count before any shifted evaluation
    qnode.construct(args)?;

    let x = args.flatten();
    let mut grad = Vec::with_capacity(x.len());

    for k in 0..x.len() {
        let mut plus = x.clone();
        let mut minus = x.clone();
        plus[k] += h;
        minus[k] -= h;

        let f_plus = qnode.call(args.with_flat(&plus)?)?;
        let f_minus = qnode.call(args.with_flat(&minus)?)?;
        grad.push((f_plus - f_minus) / (2.0 * h));
    }

    Ok(grad)
}

/// Flat gradient using the node's differentiation method
pub fn flat_gradient<D: Device>(qnode: &QNode<D>, args: &Args) -> QrotResult<ParamVec> {
    match qnode.diff_method() {
        DiffMethod::ParameterShift => parameter_shift(qnode, args),
        DiffMethod::FiniteDiff { h } => finite_difference(qnode, args, h),
    }
}

/// Gradient of `qnode` at `args` w.r.t. the arguments in `argnum`
/// Gantree: grad(qnode, argnum, args) -> Result<Gradient> // 기울기 계산
pub fn grad<D: Device>(
    qnode: &QNode<D>,
    argnum: impl Into<ArgNum>,
    args: impl Into<Args>,
) -> QrotResult<Gradient> {
    Grad::new(qnode, argnum).call(args)
}

/// Gradient function of a QNode
///
/// ```rust
/// use qrot_device::prelude::*;
/// use qrot_optim::{ArgNum, Grad};
///
/// let dev = SimulatorDevice::new(1).unwrap();
/// let circuit = QNode::new(dev, |tape: &mut Tape, args: &Args| {
///     tape.rx(0, args.element(0, 0)?)?;
///     tape.ry(0, args.element(0, 1)?)?;
///     Ok(expval(Observable::PauliZ(0)))
/// });
///
/// let dcircuit = Grad::new(&circuit, ArgNum::One(0));
/// let g = dcircuit.call(vec![0.54, 0.12]).unwrap();
/// assert_eq!(g.flatten().len(), 2);
/// ```
pub struct Grad<'a, D: Device> {
    qnode: &'a QNode<D>,
    argnum: ArgNum,
}

impl<'a, D: Device> Grad<'a, D> {
    /// Differentiate `qnode` w.r.t. `argnum`
    pub fn new(qnode: &'a QNode<D>, argnum: impl Into<ArgNum>) -> Self {
        Self {
            qnode,
            argnum: argnum.into(),
        }
    }

    /// Selected arguments
    pub fn argnum(&self) -> &ArgNum {
        &self.argnum
    }

    /// Evaluate the gradient at `args`
    pub fn call(&self, args: impl Into<Args>) -> QrotResult<Gradient> {
        let args = args.into();
        self.argnum.validate(&args)?;

        let flat = flat_gradient(self.qnode, &args)?;
        let mut per_arg = args.unflatten(&flat)?;

        let gradient = match &self.argnum {
            ArgNum::One(i) => Gradient::One(per_arg.swap_remove(*i)),
            ArgNum::Many(indices) => {
                Gradient::Many(indices.iter().map(|&i| per_arg[i].clone()).collect())
            }
        };

        log::debug!("grad{} w.r.t. {:?} = {}", args, self.argnum, gradient);
        Ok(gradient)
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

    fn circuit2() -> QNode<SimulatorDevice> {
        QNode::new(SimulatorDevice::new(1).unwrap(), |tape: &mut Tape, args: &Args| {
            tape.rx(0, args.scalar(0)?)?;
            tape.ry(0, args.scalar(1)?)?;
            Ok(expval(Observable::PauliZ(0)))
        })
    }

    fn analytic(p0: f64, p1: f64) -> [f64; 2] {
        [-p0.sin() * p1.cos(), -p0.cos() * p1.sin()]
    }

    #[test]
    fn test_parameter_shift_exact() {
        let g = parameter_shift(&circuit(), &Args::array(&[0.54, 0.12])).unwrap();
        let expected = analytic(0.54, 0.12);

        assert_abs_diff_eq!(g[0], expected[0], epsilon = 1e-12);
        assert_abs_diff_eq!(g[1], expected[1], epsilon = 1e-12);
    }

    #[test]
    fn test_finite_difference_close() {
        let node = circuit().with_diff_method(DiffMethod::finite_diff());
        let g = flat_gradient(&node, &Args::array(&[0.54, 0.12])).unwrap();
        let expected = analytic(0.54, 0.12);

        assert_abs_diff_eq!(g[0], expected[0], epsilon = 1e-6);
        assert_abs_diff_eq!(g[1], expected[1], epsilon = 1e-6);
    }

    #[test]
    fn test_grad_array_shape() {
        let g = grad(&circuit(), ArgNum::One(0), vec![0.54, 0.12]).unwrap();

        match &g {
            Gradient::One(Arg::Array(v)) => assert_eq!(v.len(), 2),
            other => panic!("expected array gradient, got {:?}", other),
        }
        assert_eq!(g.to_string(), "[-0.51043865, -0.10267820]");
    }

    #[test]
    fn test_grad_tuple_shape() {
        let g = grad(&circuit2(), ArgNum::Many(vec![0, 1]), (0.54, 0.12)).unwrap();

        match &g {
            Gradient::Many(args) => {
                assert_eq!(args.len(), 2);
                assert!(matches!(args[0], Arg::Scalar(_)));
            }
            other => panic!("expected tuple gradient, got {:?}", other),
        }
        assert_eq!(g.to_string(), "(-0.51043865, -0.10267820)");
    }

    #[test]
    fn test_grad_single_scalar() {
        let g = grad(&circuit2(), ArgNum::One(1), (0.54, 0.12)).unwrap();
        assert_abs_diff_eq!(g.flatten()[0], analytic(0.54, 0.12)[1], epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_argnum() {
        assert_eq!(
            grad(&circuit2(), ArgNum::Many(vec![0, 2]), (0.54, 0.12)),
            Err(QrotError::InvalidArgNum { argnum: 2, len: 2 })
        );
    }

    #[test]
    fn test_shared_parameter_accumulates() {
        // RX(x) RX(x) = RX(2x): d/dx cos(2x) = -2 sin(2x)
        let node = QNode::new(SimulatorDevice::new(1).unwrap(), |tape: &mut Tape, args: &Args| {
            let x = args.scalar(0)?;
            tape.rx(0, x)?;
            tape.rx(0, x)?;
            Ok(expval(Observable::PauliZ(0)))
        });

        let g = parameter_shift(&node, &Args::scalars(&[0.3])).unwrap();
        assert_abs_diff_eq!(g[0], -2.0 * 0.6_f64.sin(), epsilon = 1e-12);
    }

    #[test]
    fn test_wrong_param_count() {
        assert!(parameter_shift(&circuit(), &Args::array(&[0.54])).is_err());
        assert!(finite_difference(&circuit(), &Args::array(&[0.5, 0.1, 0.2]), 1e-7).is_err());
    }

    #[test]
    fn test_shift_evaluation_count() {
        let node = circuit();
        parameter_shift(&node, &Args::array(&[0.54, 0.12])).unwrap();
        assert_eq!(node.executions(), 4);
    }
}
