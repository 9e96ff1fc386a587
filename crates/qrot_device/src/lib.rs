//! # QROT Device
//!
//! Simulated quantum devices and quantum nodes for QROT.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qrot_device // L2+L3: Device + QNode
//!     L2_Device // 디바이스 계층
//!         DeviceTrait // 디바이스 인터페이스
//!         ExpectationResult // 실행 결과
//!         SimulatorDevice // 상태 벡터 시뮬레이터
//!     L3_QNode // 양자 노드
//!         Tape // 게이트 + 바인딩 기록
//!         QNode // 디바이스에 묶인 양자 함수
//!         DiffMethod // 미분 방식
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qrot_device::prelude::*;
//!
//! let dev = SimulatorDevice::new(1).unwrap();
//! let circuit = QNode::new(dev, |tape: &mut Tape, args: &Args| {
//!     tape.rx(0, args.element(0, 0)?)?;
//!     tape.ry(0, args.element(0, 1)?)?;
//!     Ok(expval(Observable::PauliZ(0)))
//! });
//!
//! let value = circuit.call(vec![0.54, 0.12]).unwrap();
//! assert!((value - 0.54_f64.cos() * 0.12_f64.cos()).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Device trait and execution results (Gantree: L2_Device → DeviceTrait)
pub mod execution;

/// State-vector simulator (Gantree: L2_Device → SimulatorDevice)
pub mod simulator;

/// Quantum nodes and tapes (Gantree: L3_QNode → QNode)
pub mod qnode;

// ============================================================================
// Re-exports
// ============================================================================

pub use execution::{Device, ExecutionMetadata, ExpectationResult};
pub use qnode::{expval, Binding, DiffMethod, Measurement, QNode, QuantumFn, Tape};
pub use simulator::SimulatorDevice;

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use qrot_device::prelude::*;
    //! ```

    pub use crate::execution::{Device, ExpectationResult};
    pub use crate::qnode::{expval, DiffMethod, Measurement, QNode, Tape};
    pub use crate::simulator::SimulatorDevice;
    pub use qrot_core::prelude::*;
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
