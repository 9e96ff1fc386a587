//! Quantum gate definitions for QROT
//!
//! Gantree: L1_Circuit → Gate
//!
//! Gate set understood by the state-vector simulator. Rotations are the
//! only parameterized gates, so every trainable angle obeys the
//! parameter-shift rule.

use crate::types::{Angle, Basis, QubitId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quantum gate enumeration
/// Gantree: Gate // 게이트 enum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    // ========================================================================
    // Single-Qubit Gates (Non-Parameterized)
    // ========================================================================
    /// Hadamard gate
    /// Gantree: H(QubitId) // 하다마드
    H(QubitId),

    /// Pauli-X gate (NOT)
    X(QubitId),

    /// Pauli-Y gate
    Y(QubitId),

    /// Pauli-Z gate
    Z(QubitId),

    /// S gate (sqrt(Z))
    S(QubitId),

    /// S-dagger gate (inverse of S)
    Sdg(QubitId),

    /// T gate (fourth root of Z)
    T(QubitId),

    /// T-dagger gate (inverse of T)
    Tdg(QubitId),

    // ========================================================================
    // Single-Qubit Parameterized Rotation Gates
    // ========================================================================
    /// Rotation around X-axis
    /// Gantree: Rx(QubitId, Angle) // X 회전
    Rx(QubitId, Angle),

    /// Rotation around Y-axis
    /// Gantree: Ry(QubitId, Angle) // Y 회전
    Ry(QubitId, Angle),

    /// Rotation around Z-axis
    /// Gantree: Rz(QubitId, Angle) // Z 회전
    Rz(QubitId, Angle),

    // ========================================================================
    // Two-Qubit Gates
    // ========================================================================
    /// Controlled-NOT (CX)
    Cnot(QubitId, QubitId),

    /// Controlled-Z
    Cz(QubitId, QubitId),

    /// SWAP gate
    Swap(QubitId, QubitId),
}

impl Gate {
    // ========================================================================
    // Gate Properties
    // ========================================================================

    /// Get qubits involved in this gate
    /// Gantree: qubits(&self) -> Vec<QubitId> // 관련 큐비트
    pub fn qubits(&self) -> Vec<QubitId> {
        match self {
            Gate::H(q)
            | Gate::X(q)
            | Gate::Y(q)
            | Gate::Z(q)
            | Gate::S(q)
            | Gate::Sdg(q)
            | Gate::T(q)
            | Gate::Tdg(q)
            | Gate::Rx(q, _)
            | Gate::Ry(q, _)
            | Gate::Rz(q, _) => vec![*q],

            Gate::Cnot(a, b) | Gate::Cz(a, b) | Gate::Swap(a, b) => vec![*a, *b],
        }
    }

    /// Rotation angle, if parameterized
    /// Gantree: angle(&self) -> Option<Angle> // 회전 각도
    pub fn angle(&self) -> Option<Angle> {
        match self {
            Gate::Rx(_, a) | Gate::Ry(_, a) | Gate::Rz(_, a) => Some(*a),
            _ => None,
        }
    }

    /// Same gate with its rotation angle replaced
    /// Gantree: with_angle(&self, a) -> Option<Gate> // 각도 교체
    pub fn with_angle(&self, angle: Angle) -> Option<Gate> {
        match self {
            Gate::Rx(q, _) => Some(Gate::Rx(*q, angle)),
            Gate::Ry(q, _) => Some(Gate::Ry(*q, angle)),
            Gate::Rz(q, _) => Some(Gate::Rz(*q, angle)),
            _ => None,
        }
    }

    /// Operation name as printed in circuit listings
    pub fn name(&self) -> &'static str {
        match self {
            Gate::H(_) => "Hadamard",
            Gate::X(_) => "PauliX",
            Gate::Y(_) => "PauliY",
            Gate::Z(_) => "PauliZ",
            Gate::S(_) => "S",
            Gate::Sdg(_) => "Adjoint(S)",
            Gate::T(_) => "T",
            Gate::Tdg(_) => "Adjoint(T)",
            Gate::Rx(_, _) => "RX",
            Gate::Ry(_, _) => "RY",
            Gate::Rz(_, _) => "RZ",
            Gate::Cnot(_, _) => "CNOT",
            Gate::Cz(_, _) => "CZ",
            Gate::Swap(_, _) => "SWAP",
        }
    }

    // ========================================================================
    // Basis Transformation Helpers
    // ========================================================================

    /// Get basis transformation gates for measuring in given basis
    /// X basis: H
    /// Y basis: Sdg, H
    /// Z basis: (none)
    pub fn basis_transform(qubit: QubitId, basis: Basis) -> Vec<Gate> {
        match basis {
            Basis::X => vec![Gate::H(qubit)],
            Basis::Y => vec![Gate::Sdg(qubit), Gate::H(qubit)],
            Basis::Z => vec![],
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wires: Vec<String> = self.qubits().iter().map(|q| q.to_string()).collect();
        match self.angle() {
            Some(theta) => write!(f, "{}({}, wires=[{}])", self.name(), theta, wires.join(", ")),
            None => write!(f, "{}(wires=[{}])", self.name(), wires.join(", ")),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
