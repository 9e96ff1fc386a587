//! Quantum nodes and tapes
//!
//! Gantree: L3_QNode → QNode
//!
//! A QNode binds a quantum function to a device. Calling it records the
//! function's gates onto a [`Tape`], remembering which argument component
//! each rotation angle came from, then evaluates the measurement on the
//! device.

use crate::execution::{Device, ExpectationResult};
use qrot_core::{
    diff, Args, Circuit, Gate, Observable, Param, QrotError, QrotResult, QubitId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

// ============================================================================
// Measurement
// ============================================================================

/// Measurement returned by a quantum function
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Measurement {
    /// Expectation value of an observable
    Expval(Observable),
}

impl Measurement {
    /// Observable being measured
    pub fn observable(&self) -> &Observable {
        match self {
            Measurement::Expval(obs) => obs,
        }
    }
}

/// Expectation value measurement
pub fn expval(observable: Observable) -> Measurement {
    Measurement::Expval(observable)
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measurement::Expval(obs) => write!(f, "expval({})", obs),
        }
    }
}

// ============================================================================
// Differentiation Method
// ============================================================================

/// How a QNode is differentiated
/// Gantree: DiffMethod // 미분 방식
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum DiffMethod {
    /// Exact two-term shift rule on each trainable rotation
    #[default]
    ParameterShift,
    /// Central finite difference on each argument component
    FiniteDiff {
        /// Step size
        h: f64,
    },
}

impl DiffMethod {
    /// Finite difference with the default step
    pub fn finite_diff() -> Self {
        DiffMethod::FiniteDiff {
            h: diff::FINITE_DIFF_STEP,
        }
    }
}

impl fmt::Display for DiffMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffMethod::ParameterShift => write!(f, "parameter-shift"),
            DiffMethod::FiniteDiff { h } => write!(f, "finite-diff(h={:e})", h),
        }
    }
}

// ============================================================================
// Tape
// ============================================================================

/// Link between a recorded gate and the argument component it reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    /// Index of the gate in the tape's circuit
    pub gate_index: usize,

    /// Flat argument index
    pub flat: usize,
}

/// Recorded circuit, trainable bindings, and measurement
/// Gantree: Tape // 게이트 기록
#[derive(Debug, Clone)]
pub struct Tape {
    circuit: Circuit,
    bindings: Vec<Binding>,
    measurement: Option<Measurement>,
}

impl Tape {
    /// Empty tape on `num_wires` wires
    pub fn new(num_wires: usize) -> Self {
        Self {
            circuit: Circuit::new(num_wires),
            bindings: Vec::new(),
            measurement: None,
        }
    }

    /// Record a gate, binding it to `param` if trainable
    /// Gantree: record(gate, param) -> Result<()> // 게이트 기록
    fn record(&mut self, gate: Gate, param: Option<Param>) -> QrotResult<()> {
        let wires = self.circuit.num_qubits();
        if let Some(&wire) = gate.qubits().iter().find(|&&q| q >= wires) {
            return Err(QrotError::WireOutOfRange { wire, wires });
        }

        let gate_index = self.circuit.gate_count();
        self.circuit.add_gate(gate)?;

        if let Some(flat) = param.and_then(|p| p.source) {
            self.bindings.push(Binding { gate_index, flat });
        }
        Ok(())
    }

    // ========================================================================
    // Gates
    // ========================================================================

    /// Record RX(param) on `wire`
    pub fn rx(&mut self, wire: QubitId, param: impl Into<Param>) -> QrotResult<()> {
        let p = param.into();
        self.record(Gate::Rx(wire, p.value), Some(p))
    }

    /// Record RY(param) on `wire`
    pub fn ry(&mut self, wire: QubitId, param: impl Into<Param>) -> QrotResult<()> {
        let p = param.into();
        self.record(Gate::Ry(wire, p.value), Some(p))
    }

    /// Record RZ(param) on `wire`
    pub fn rz(&mut self, wire: QubitId, param: impl Into<Param>) -> QrotResult<()> {
        let p = param.into();
        self.record(Gate::Rz(wire, p.value), Some(p))
    }

    /// Record a fixed (non-trainable) gate
    pub fn apply(&mut self, gate: Gate) -> QrotResult<()> {
        self.record(gate, None)
    }

    /// Record Hadamard on `wire`
    pub fn h(&mut self, wire: QubitId) -> QrotResult<()> {
        self.apply(Gate::H(wire))
    }

    /// Record Pauli-X on `wire`
    pub fn x(&mut self, wire: QubitId) -> QrotResult<()> {
        self.apply(Gate::X(wire))
    }

    /// Record CNOT
    pub fn cnot(&mut self, control: QubitId, target: QubitId) -> QrotResult<()> {
        self.apply(Gate::Cnot(control, target))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Recorded circuit
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Trainable bindings in gate order
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Measurement, once the quantum function has returned
    pub fn measurement(&self) -> Option<&Measurement> {
        self.measurement.as_ref()
    }

    /// Distinct argument components read by the tape
    pub fn trainable_params(&self) -> BTreeSet<usize> {
        self.bindings.iter().map(|b| b.flat).collect()
    }

    /// Circuit with the angle of binding `index` shifted by `shift`
    /// Gantree: shifted(binding, shift) -> Result<Circuit> // 시프트 회로
    pub fn shifted(&self, index: usize, shift: f64) -> QrotResult<Circuit> {
        let binding = self.bindings.get(index).ok_or(QrotError::GateIndexOutOfRange {
            index,
            len: self.bindings.len(),
        })?;

        let gate_index = binding.gate_index;
        let angle = self.circuit.gates()[gate_index]
            .angle()
            .ok_or(QrotError::NotParameterized(gate_index))?;

        self.circuit.with_gate_angle(gate_index, angle + shift)
    }
}

// ============================================================================
// QNode
// ============================================================================

/// Quantum function: records gates and returns a measurement
pub type QuantumFn = dyn Fn(&mut Tape, &Args) -> QrotResult<Measurement> + Send + Sync;

/// Quantum function bound to a device
/// Gantree: QNode<D: Device> // 양자 노드
pub struct QNode<D: Device> {
    /// Device the function runs on
    device: D,

    /// Quantum function
    func: Box<QuantumFn>,

    /// Differentiation method
    diff_method: DiffMethod,

    /// Device executions so far
    executions: AtomicUsize,
}

impl<D: Device> QNode<D> {
    /// Bind `func` to `device`
    /// Gantree: new(device, func) -> Self // 생성자
    pub fn new<F>(device: D, func: F) -> Self
    where
        F: Fn(&mut Tape, &Args) -> QrotResult<Measurement> + Send + Sync + 'static,
    {
        Self {
            device,
            func: Box::new(func),
            diff_method: DiffMethod::default(),
            executions: AtomicUsize::new(0),
        }
    }

    /// Set differentiation method
    pub fn with_diff_method(mut self, method: DiffMethod) -> Self {
        self.diff_method = method;
        self
    }

    /// Get device
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Get differentiation method
    pub fn diff_method(&self) -> DiffMethod {
        self.diff_method
    }

    /// Number of device executions so far
    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::Relaxed)
    }

    /// Run the quantum function on a fresh tape
    /// Gantree: construct(args) -> Result<Tape> // 테이프 구성
    pub fn construct(&self, args: &Args) -> QrotResult<Tape> {
        let mut tape = Tape::new(self.device.num_wires());
        let measurement = (self.func)(&mut tape, args)?;
        tape.measurement = Some(measurement);

        let consumed = tape.trainable_params().len();
        if consumed != args.flat_len() {
            return Err(QrotError::ParamCountMismatch {
                expected: consumed,
                got: args.flat_len(),
            });
        }

        Ok(tape)
    }

    /// Evaluate a circuit against a measurement on the device
    pub fn execute_circuit(
        &self,
        circuit: &Circuit,
        measurement: &Measurement,
    ) -> QrotResult<ExpectationResult> {
        self.executions.fetch_add(1, Ordering::Relaxed);
        log::trace!("{} -> {}", circuit, measurement.observable());
        self.device.execute(circuit, measurement.observable())
    }

    /// Evaluate a recorded tape
    pub fn execute_tape(&self, tape: &Tape) -> QrotResult<f64> {
        let measurement = tape
            .measurement()
            .ok_or_else(|| QrotError::InternalError("tape has no measurement".into()))?;
        Ok(self.execute_circuit(tape.circuit(), measurement)?.value)
    }

    /// Full execution result for `args`
    pub fn evaluate(&self, args: &Args) -> QrotResult<ExpectationResult> {
        let tape = self.construct(args)?;
        let measurement = tape
            .measurement()
            .ok_or_else(|| QrotError::InternalError("tape has no measurement".into()))?;
        self.execute_circuit(tape.circuit(), measurement)
    }

    /// Call the node with arguments
    /// Gantree: call(args) -> Result<f64> // 실행
    pub fn call(&self, args: impl Into<Args>) -> QrotResult<f64> {
        let args = args.into();
        let value = self.evaluate(&args)?.value;
        log::trace!("qnode{} = {}", args, value);
        Ok(value)
    }
}

impl<D: Device> fmt::Debug for QNode<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QNode")
            .field("device", &self.device.name())
            .field("wires", &self.device.num_wires())
            .field("diff_method", &self.diff_method)
            .field("executions", &self.executions())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
