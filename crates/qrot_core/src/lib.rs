//! # QROT Core
//!
//! Core types, gates, circuits, and observables for the QROT qubit
//! rotation optimizer.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qrot_core // L0+L1: Foundation + Circuit
//!     L0_Foundation // 기반 타입/상수/에러
//!         CoreTypes // 핵심 타입
//!         Constants // 디바이스/미분/튜토리얼 상수
//!         Errors // 에러 타입
//!         Args // 인자 + 바인딩 파라미터
//!     L1_Circuit // 회로 구조
//!         Gate // 게이트 enum
//!         Circuit // 회로 구조체
//!         Observable // 관측량
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qrot_core::prelude::*;
//!
//! let circuit = Circuit::from_gates(1, vec![Gate::Rx(0, 0.54), Gate::Ry(0, 0.12)]).unwrap();
//!
//! assert_eq!(circuit.gate_count(), 2);
//! println!("{}", circuit);
//! ```
//!
//! ## Arguments
//!
//! ```rust
//! use qrot_core::prelude::*;
//!
//! // circuit(params) with params = [0.54, 0.12]
//! let args = Args::array(&[0.54, 0.12]);
//! let phi1 = args.element(0, 0).unwrap();
//! assert_eq!(phi1.source, Some(0));
//!
//! // circuit2(phi1, phi2)
//! let args = Args::scalars(&[0.54, 0.12]);
//! assert_eq!(args.scalar(1).unwrap().source, Some(1));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core types (Gantree: L0_Foundation → CoreTypes)
pub mod types;

/// Constants (Gantree: L0_Foundation → Constants)
pub mod constants;

/// Error types (Gantree: L0_Foundation → Errors)
pub mod error;

/// Quantum function arguments (Gantree: L0_Foundation → Args)
pub mod args;

/// Quantum gates (Gantree: L1_Circuit → Gate)
pub mod gate;

/// Circuit structure (Gantree: L1_Circuit → Circuit)
pub mod circuit;

/// Observables (Gantree: L1_Circuit → Observable)
pub mod observable;

// ============================================================================
// Re-exports
// ============================================================================

pub use args::{Arg, Args, Param};
pub use circuit::Circuit;
pub use constants::{device, diff, rotation};
pub use error::{QrotError, QrotResult};
pub use gate::Gate;
pub use observable::Observable;
pub use types::{
    format_array, format_scientific, format_signed, format_values, Angle, Basis, Counts, ParamVec,
    QubitId,
};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use qrot_core::prelude::*;
    //! ```

    pub use crate::args::{Arg, Args, Param};
    pub use crate::circuit::Circuit;
    pub use crate::constants::{device, diff, rotation};
    pub use crate::error::{QrotError, QrotResult};
    pub use crate::gate::Gate;
    pub use crate::observable::Observable;
    pub use crate::types::{Angle, Basis, Counts, ParamVec, QubitId};
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================
