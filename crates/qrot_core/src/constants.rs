//! Constants for QROT
//!
//! Gantree: L0_Foundation → Constants
//!
//! Device limits, differentiation parameters, and the defaults of the
//! qubit rotation program.

// ============================================================================
// Device Constants
// Gantree: device // 디바이스 상수
// ============================================================================

pub mod device {
    //! Simulator device limits and names

    /// Default device name
    /// Gantree: DEFAULT_DEVICE: &str = "lightning.qubit"
    pub const DEFAULT_DEVICE: &str = "lightning.qubit";

    /// Device names resolved to the built-in state-vector simulator
    pub const SUPPORTED_DEVICES: [&str; 2] = ["default.qubit", "lightning.qubit"];

    /// Maximum number of wires the dense simulator accepts
    pub const MAX_WIRES: usize = 20;

    /// Minimum shots for a sampling device
    pub const MIN_SHOTS: u64 = 1;

    /// Maximum shots for a sampling device
    pub const MAX_SHOTS: u64 = 10_000_000;

    /// Check whether a device name is supported
    pub fn is_supported(name: &str) -> bool {
        SUPPORTED_DEVICES.contains(&name)
    }
}

// ============================================================================
// Differentiation Constants
// Gantree: diff // 미분 상수
// ============================================================================

pub mod diff {
    //! Gradient rule parameters

    /// Parameter-shift offset for Pauli rotations (π/2)
    /// Gantree: PARAMETER_SHIFT: f64 = π/2
    pub const PARAMETER_SHIFT: f64 = std::f64::consts::FRAC_PI_2;

    /// Default central finite-difference step
    pub const FINITE_DIFF_STEP: f64 = 1e-7;

    /// Parameter-shift recombination coefficient
    ///
    /// ∂f/∂θ = c · [f(θ + s) - f(θ - s)], c = 1 / (2 sin s)
    pub fn shift_coefficient(shift: f64) -> f64 {
        1.0 / (2.0 * shift.sin())
    }
}

// ============================================================================
// Qubit Rotation Defaults
// Gantree: rotation // 튜토리얼 기본값
// ============================================================================

pub mod rotation {
    //! Defaults of the qubit rotation program

    /// Parameters at which the circuit and its gradients are probed
    pub const PROBE_PARAMS: [f64; 2] = [0.54, 0.12];

    /// Initial parameters for optimization
    pub const INIT_PARAMS: [f64; 2] = [0.011, 0.012];

    /// Number of gradient-descent steps
    /// Gantree: STEPS: usize = 100
    pub const STEPS: usize = 100;

    /// Gradient-descent step size
    /// Gantree: STEPSIZE: f64 = 0.4
    pub const STEPSIZE: f64 = 0.4;

    /// Progress is reported every this many steps
    pub const REPORT_EVERY: usize = 5;

    /// Decimal places for progress costs
    pub const COST_PRECISION: usize = 7;

    /// Decimal places for gradients and angles
    pub const VALUE_PRECISION: usize = 8;

    /// Number of progress reports for a run
    pub const fn report_count(steps: usize, every: usize) -> usize {
        if every == 0 {
            0
        } else {
            steps / every
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
