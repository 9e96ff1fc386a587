//! Observables for expectation values
//!
//! Gantree: L1_Circuit → Observable
//!
//! Single-wire Pauli observables. Measuring one reduces to a basis
//! rotation followed by a computational-basis readout of its wire.

use crate::gate::Gate;
use crate::types::{Basis, QubitId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Observable measured at the end of a circuit
/// Gantree: Observable // 관측량
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Observable {
    /// Identity (expectation is always 1)
    Identity,
    /// Pauli-X on a wire
    PauliX(QubitId),
    /// Pauli-Y on a wire
    PauliY(QubitId),
    /// Pauli-Z on a wire
    /// Gantree: PauliZ(QubitId) // Z 관측
    PauliZ(QubitId),
}

impl Observable {
    /// Wire the observable acts on
    pub fn wire(&self) -> Option<QubitId> {
        match self {
            Observable::Identity => None,
            Observable::PauliX(q) | Observable::PauliY(q) | Observable::PauliZ(q) => Some(*q),
        }
    }

    /// Measurement basis of the observable
    pub fn basis(&self) -> Option<Basis> {
        match self {
            Observable::Identity => None,
            Observable::PauliX(_) => Some(Basis::X),
            Observable::PauliY(_) => Some(Basis::Y),
            Observable::PauliZ(_) => Some(Basis::Z),
        }
    }

    /// Gates rotating the observable's eigenbasis onto the Z basis
    /// Gantree: diagonalizing_gates(&self) -> Vec<Gate> // 대각화
    pub fn diagonalizing_gates(&self) -> Vec<Gate> {
        match (self.wire(), self.basis()) {
            (Some(q), Some(b)) => Gate::basis_transform(q, b),
            _ => Vec::new(),
        }
    }

    /// Eigenvalue for a computational basis index after diagonalization
    ///
    /// Bit 0 of the index is wire 0.
    pub fn eigenvalue(&self, basis_index: usize) -> f64 {
        match self.wire() {
            None => 1.0,
            Some(q) => {
                if (basis_index >> q) & 1 == 0 {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }

    /// Observable name
    pub fn name(&self) -> &'static str {
        match self {
            Observable::Identity => "Identity",
            Observable::PauliX(_) => "PauliX",
            Observable::PauliY(_) => "PauliY",
            Observable::PauliZ(_) => "PauliZ",
        }
    }
}

impl fmt::Display for Observable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.wire() {
            Some(q) => write!(f, "{}({})", self.name(), q),
            None => write!(f, "{}", self.name()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
