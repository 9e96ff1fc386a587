//! Quantum function arguments
//!
//! Gantree: L0_Foundation → Args
//!
//! A quantum function takes an ordered list of arguments, each a scalar
//! or an array of angles. All components share one flat index space so
//! gradients can be computed per component and reshaped per argument.

use crate::error::{QrotError, QrotResult};
use crate::types::{format_values, Angle, ParamVec};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimal places used when displaying argument values
const DISPLAY_PRECISION: usize = 8;

// ============================================================================
// Arg
// ============================================================================

/// One argument of a quantum function
/// Gantree: Arg // 스칼라/배열 인자
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Arg {
    /// Single angle
    Scalar(f64),
    /// Array of angles
    Array(Vec<f64>),
}

impl Arg {
    /// Number of flat components
    pub fn len(&self) -> usize {
        match self {
            Arg::Scalar(_) => 1,
            Arg::Array(v) => v.len(),
        }
    }

    /// Check if the argument has no components
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Components as a slice
    pub fn values(&self) -> &[f64] {
        match self {
            Arg::Scalar(x) => std::slice::from_ref(x),
            Arg::Array(v) => v,
        }
    }

    /// Same shape with components taken from `values`
    fn reshaped(&self, values: &[f64]) -> Arg {
        match self {
            Arg::Scalar(_) => Arg::Scalar(values[0]),
            Arg::Array(_) => Arg::Array(values.to_vec()),
        }
    }

    /// Euclidean norm of the components
    pub fn norm(&self) -> f64 {
        self.values().iter().map(|x| x * x).sum::<f64>().sqrt()
    }
}

impl From<f64> for Arg {
    fn from(x: f64) -> Self {
        Arg::Scalar(x)
    }
}

impl From<Vec<f64>> for Arg {
    fn from(v: Vec<f64>) -> Self {
        Arg::Array(v)
    }
}

impl From<&[f64]> for Arg {
    fn from(v: &[f64]) -> Self {
        Arg::Array(v.to_vec())
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Scalar(x) => write!(f, "{:.*}", DISPLAY_PRECISION, x),
            Arg::Array(v) => write!(f, "{}", format_values(v, DISPLAY_PRECISION)),
        }
    }
}

// ============================================================================
// Param
// ============================================================================

/// Angle handed to a tape, remembering which flat argument it came from
/// Gantree: Param // 바인딩 파라미터
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Param {
    /// Angle value
    pub value: Angle,

    /// Flat argument index, `None` for constants
    pub source: Option<usize>,
}

impl Param {
    /// Constant (non-trainable) angle
    pub fn constant(value: Angle) -> Self {
        Self {
            value,
            source: None,
        }
    }

    /// Check if the angle is bound to an argument
    pub fn is_trainable(&self) -> bool {
        self.source.is_some()
    }
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Self::constant(value)
    }
}

// ============================================================================
// Args
// ============================================================================

/// Ordered argument list of a quantum function
/// Gantree: Args // 인자 목록
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Args {
    args: Vec<Arg>,
}

impl Args {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create from a list of arguments
    pub fn new(args: Vec<Arg>) -> Self {
        Self { args }
    }

    /// Single array argument (the `circuit(params)` calling convention)
    pub fn array(values: &[f64]) -> Self {
        Self::new(vec![Arg::Array(values.to_vec())])
    }

    /// Scalar arguments (the `circuit(phi1, phi2)` calling convention)
    pub fn scalars(values: &[f64]) -> Self {
        Self::new(values.iter().copied().map(Arg::Scalar).collect())
    }

    // ========================================================================
    // Shape
    // ========================================================================

    /// Number of arguments
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Check if no arguments were supplied
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Total number of flat components
    /// Gantree: flat_len(&self) -> usize // 평탄 길이
    pub fn flat_len(&self) -> usize {
        self.args.iter().map(Arg::len).sum()
    }

    /// Flat offset of argument `index`
    pub fn offset(&self, index: usize) -> QrotResult<usize> {
        if index >= self.args.len() {
            return Err(QrotError::ArgOutOfRange {
                index,
                len: self.args.len(),
            });
        }
        Ok(self.args[..index].iter().map(Arg::len).sum())
    }

    /// Argument by index
    pub fn get(&self, index: usize) -> QrotResult<&Arg> {
        self.args.get(index).ok_or(QrotError::ArgOutOfRange {
            index,
            len: self.args.len(),
        })
    }

    /// Iterate over arguments
    pub fn iter(&self) -> impl Iterator<Item = &Arg> {
        self.args.iter()
    }

    // ========================================================================
    // Flattening
    // ========================================================================

    /// All components in argument order
    /// Gantree: flatten(&self) -> ParamVec // 평탄화
    pub fn flatten(&self) -> ParamVec {
        self.args
            .iter()
            .flat_map(|a| a.values().iter().copied())
            .collect()
    }

    /// Same shape with components replaced from a flat vector
    pub fn with_flat(&self, flat: &[f64]) -> QrotResult<Args> {
        if flat.len() != self.flat_len() {
            return Err(QrotError::ParamCountMismatch {
                expected: self.flat_len(),
                got: flat.len(),
            });
        }

        let mut offset = 0;
        let args = self
            .args
            .iter()
            .map(|a| {
                let arg = a.reshaped(&flat[offset..offset + a.len()]);
                offset += a.len();
                arg
            })
            .collect();
        Ok(Args { args })
    }

    /// Split a flat vector back into per-argument values
    pub fn unflatten(&self, flat: &[f64]) -> QrotResult<Vec<Arg>> {
        Ok(self.with_flat(flat)?.args)
    }

    // ========================================================================
    // Bound Parameters
    // ========================================================================

    /// Scalar argument as a trainable parameter
    /// Gantree: scalar(&self, i) -> Result<Param> // 스칼라 바인딩
    pub fn scalar(&self, index: usize) -> QrotResult<Param> {
        match self.get(index)? {
            Arg::Scalar(value) => Ok(Param {
                value: *value,
                source: Some(self.offset(index)?),
            }),
            Arg::Array(_) => Err(QrotError::ArgKindMismatch {
                index,
                expected: "a scalar",
            }),
        }
    }

    /// Element of an array argument as a trainable parameter
    /// Gantree: element(&self, i, j) -> Result<Param> // 원소 바인딩
    pub fn element(&self, arg: usize, index: usize) -> QrotResult<Param> {
        match self.get(arg)? {
            Arg::Array(values) => {
                let value = values.get(index).ok_or(QrotError::ElementOutOfRange {
                    arg,
                    index,
                    len: values.len(),
                })?;
                Ok(Param {
                    value: *value,
                    source: Some(self.offset(arg)? + index),
                })
            }
            Arg::Scalar(_) => Err(QrotError::ArgKindMismatch {
                index: arg,
                expected: "an array",
            }),
        }
    }
}

impl From<Vec<Arg>> for Args {
    fn from(args: Vec<Arg>) -> Self {
        Self::new(args)
    }
}

impl From<Arg> for Args {
    fn from(arg: Arg) -> Self {
        Self::new(vec![arg])
    }
}

impl From<&[f64]> for Args {
    fn from(values: &[f64]) -> Self {
        Self::array(values)
    }
}

impl From<Vec<f64>> for Args {
    fn from(values: Vec<f64>) -> Self {
        Self::new(vec![Arg::Array(values)])
    }
}

impl From<(f64, f64)> for Args {
    fn from((a, b): (f64, f64)) -> Self {
        Self::scalars(&[a, b])
    }
}

impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
        write!(f, "({})", items.join(", "))
    }
}

// ============================================================================
// Tests
// ============================================================================
