//! Quantum circuit structure for QROT
//!
//! Gantree: L1_Circuit → Circuit
//!
//! Ordered gate list over a fixed number of qubits.

use crate::error::{QrotError, QrotResult};
use crate::gate::Gate;
use crate::types::Angle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quantum circuit
/// Gantree: Circuit // 회로 구조체
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Number of qubits
    /// Gantree: num_qubits: usize // 큐비트 수
    num_qubits: usize,

    /// Gate sequence
    /// Gantree: gates: Vec<Gate> // 게이트 목록
    gates: Vec<Gate>,
}

impl Circuit {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a new empty circuit
    /// Gantree: new(n) -> Self // 생성자
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
        }
    }

    /// Create from a vector of gates
    pub fn from_gates(num_qubits: usize, gates: Vec<Gate>) -> QrotResult<Self> {
        let mut circuit = Self::new(num_qubits);
        circuit.add_gates(gates)?;
        Ok(circuit)
    }

    // ========================================================================
    // Basic Operations
    // ========================================================================

    /// Add a gate to the circuit
    /// Gantree: add_gate(&mut, Gate) -> Result // 게이트 추가
    pub fn add_gate(&mut self, gate: Gate) -> QrotResult<()> {
        for qubit in gate.qubits() {
            if qubit >= self.num_qubits {
                return Err(QrotError::GateQubitMismatch {
                    qubit,
                    num_qubits: self.num_qubits,
                });
            }
        }
        if let Some(angle) = gate.angle() {
            crate::types::check_angle(angle)?;
        }
        self.gates.push(gate);
        Ok(())
    }

    /// Add multiple gates
    pub fn add_gates(&mut self, gates: impl IntoIterator<Item = Gate>) -> QrotResult<()> {
        for gate in gates {
            self.add_gate(gate)?;
        }
        Ok(())
    }

    /// Copy of the circuit with the angle of one rotation replaced
    /// Gantree: with_gate_angle(&self, idx, a) -> Result<Circuit> // 시프트 회로
    pub fn with_gate_angle(&self, index: usize, angle: Angle) -> QrotResult<Circuit> {
        let gate = self
            .gates
            .get(index)
            .ok_or(QrotError::GateIndexOutOfRange {
                index,
                len: self.gates.len(),
            })?;
        let shifted = gate
            .with_angle(crate::types::check_angle(angle)?)
            .ok_or(QrotError::NotParameterized(index))?;

        let mut circuit = self.clone();
        circuit.gates[index] = shifted;
        Ok(circuit)
    }

    /// Get number of qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get gates
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Number of gates recorded
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Check if circuit is empty
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Circuit[{} wires]:", self.num_qubits)?;
        for gate in &self.gates {
            write!(f, " {}", gate)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circuit_new() {
        let circuit = Circuit::new(1);
        assert_eq!(circuit.num_qubits(), 1);
        assert!(circuit.is_empty());
        assert_eq!(circuit.gate_count(), 0);
    }

    #[test]
    fn test_add_gate_out_of_range() {
        let mut circuit = Circuit::new(1);
        assert!(circuit.add_gate(Gate::Rx(0, 0.54)).is_ok());
        assert_eq!(
            circuit.add_gate(Gate::Cnot(0, 1)),
            Err(QrotError::GateQubitMismatch {
                qubit: 1,
                num_qubits: 1
            })
        );
    }

    #[test]
    fn test_add_gate_rejects_nan() {
        let mut circuit = Circuit::new(1);
        assert!(circuit.add_gate(Gate::Ry(0, f64::NAN)).is_err());
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_with_gate_angle() {
        let circuit = Circuit::from_gates(1, vec![Gate::Rx(0, 0.54), Gate::Ry(0, 0.12)]).unwrap();

        let shifted = circuit.with_gate_angle(1, 1.0).unwrap();
        assert_eq!(shifted.gates()[1], Gate::Ry(0, 1.0));
        // Original untouched
        assert_eq!(circuit.gates()[1], Gate::Ry(0, 0.12));

        assert!(circuit.with_gate_angle(5, 1.0).is_err());
    }

    #[test]
    fn test_with_gate_angle_not_parameterized() {
        let circuit = Circuit::from_gates(1, vec![Gate::H(0)]).unwrap();
        assert_eq!(
            circuit.with_gate_angle(0, 1.0),
            Err(QrotError::NotParameterized(0))
        );
    }

    #[test]
    fn test_from_gates_stops_at_bad_gate() {
        let result = Circuit::from_gates(2, vec![Gate::H(0), Gate::Cnot(0, 2), Gate::Ry(1, 0.2)]);
        assert_eq!(
            result,
            Err(QrotError::GateQubitMismatch {
                qubit: 2,
                num_qubits: 2
            })
        );
    }

    #[test]
    fn test_display() {
        let circuit = Circuit::from_gates(1, vec![Gate::Rx(0, 0.54), Gate::Ry(0, 0.12)]).unwrap();
        assert_eq!(circuit.to_string(), "Circuit[1 wires]: RX(0.54, wires=[0]) RY(0.12, wires=[0])");
    }
}
