//! Error types for QROT
//!
//! Gantree: L0_Foundation → Errors
//!
//! Single error enum shared by the core, device, and optimizer crates.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use thiserror::Error;

/// Main error type for QROT
/// Gantree: QrotError // enum
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QrotError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// Angle is NaN or infinite
    #[error("Invalid angle {0}: must be finite")]
    InvalidAngle(f64),

    /// Optimizer step size is not a positive finite number
    /// Gantree: InvalidStepSize(f64) // 스텝 크기
    #[error("Invalid step size {0}: must be finite and > 0")]
    InvalidStepSize(f64),

    // ========================================================================
    // Argument Errors
    // ========================================================================
    /// Quantum function read an argument that was not supplied
    #[error("Argument {index} out of range: {len} arguments supplied")]
    ArgOutOfRange { index: usize, len: usize },

    /// Quantum function read past the end of an array argument
    #[error("Element {index} of argument {arg} out of range: length is {len}")]
    ElementOutOfRange { arg: usize, index: usize, len: usize },

    /// Argument has the wrong kind (scalar vs array)
    #[error("Argument {index} must be {expected}")]
    ArgKindMismatch {
        index: usize,
        expected: &'static str,
    },

    /// Differentiation requested for a non-existent argument
    #[error("Invalid argnum {argnum}: function takes {len} arguments")]
    InvalidArgNum { argnum: usize, len: usize },

    /// Supplied parameter count differs from what the circuit consumes
    /// Gantree: ParamCountMismatch{{expected,got}} // 파라미터 수
    #[error("Parameter count mismatch: circuit consumes {expected}, got {got}")]
    ParamCountMismatch { expected: usize, got: usize },

    // ========================================================================
    // Circuit Errors
    // ========================================================================
    /// Gate on non-existent qubit
    /// Gantree: GateQubitMismatch{{q,n}} // 큐비트 범위
    #[error("Gate references qubit {qubit} but circuit has only {num_qubits} qubits")]
    GateQubitMismatch { qubit: usize, num_qubits: usize },

    /// Gate index does not refer to a parameterized gate
    #[error("Gate {0} is not parameterized")]
    NotParameterized(usize),

    /// Gate index out of range
    #[error("Gate index {index} out of range: circuit has {len} gates")]
    GateIndexOutOfRange { index: usize, len: usize },

    // ========================================================================
    // Device Errors
    // ========================================================================
    /// Observable or circuit addresses a wire the device lacks
    #[error("Wire {wire} out of range: device has {wires} wires")]
    WireOutOfRange { wire: usize, wires: usize },

    /// Device name not recognised
    #[error("Unknown device '{0}'")]
    UnknownDevice(String),

    /// Device wire count invalid
    #[error("Invalid wire count {0}")]
    InvalidWireCount(usize),

    /// Shots out of range
    #[error("Shots {0} out of range [{1}, {2}]")]
    ShotsOutOfRange(u64, u64, u64),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration failed validation
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),

    /// File I/O error
    #[error("File error: {0}")]
    FileError(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result type alias for QROT operations
/// Gantree: QrotResult<T> // type alias
pub type QrotResult<T> = Result<T, QrotError>;

// ============================================================================
// Error Conversion Helpers
// ============================================================================

impl From<serde_json::Error> for QrotError {
    fn from(err: serde_json::Error) -> Self {
        QrotError::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for QrotError {
    fn from(err: std::io::Error) -> Self {
        QrotError::FileError(err.to_string())
    }
}

// ============================================================================
// Error Helpers
// ============================================================================

impl QrotError {
    /// Check if error is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            QrotError::InvalidAngle(_)
                | QrotError::InvalidStepSize(_)
                | QrotError::ShotsOutOfRange(..)
                | QrotError::InvalidWireCount(_)
                | QrotError::ConfigError(_)
        )
    }

    /// Check if error comes from malformed arguments
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            QrotError::ArgOutOfRange { .. }
                | QrotError::ElementOutOfRange { .. }
                | QrotError::ArgKindMismatch { .. }
                | QrotError::InvalidArgNum { .. }
                | QrotError::ParamCountMismatch { .. }
        )
    }

    /// Check if error is a circuit error
    pub fn is_circuit_error(&self) -> bool {
        matches!(
            self,
            QrotError::GateQubitMismatch { .. }
                | QrotError::NotParameterized(_)
                | QrotError::GateIndexOutOfRange { .. }
                | QrotError::WireOutOfRange { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
