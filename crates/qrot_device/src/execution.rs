//! Device execution types and traits
//!
//! Gantree: L2_Device → DeviceTrait
//!
//! Defines the interface for evaluating an observable on a circuit.

use qrot_core::{Circuit, Counts, Observable, QrotResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of an expectation-value execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectationResult {
    /// Expectation value of the observable
    pub value: f64,

    /// Shots used (None for analytic evaluation)
    pub shots: Option<u64>,

    /// Sampled counts (only for shot-based evaluation)
    pub counts: Option<Counts>,

    /// Execution metadata
    pub metadata: ExecutionMetadata,
}

/// Execution metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionMetadata {
    /// Device name
    pub device: String,

    /// Observable measured
    pub observable: String,

    /// Whether simulation was used
    pub simulated: bool,

    /// Seed used (if any)
    pub seed: Option<u64>,
}

impl ExpectationResult {
    /// Create an analytic result
    pub fn analytic(value: f64, device: &str, observable: &Observable) -> Self {
        Self {
            value,
            shots: None,
            counts: None,
            metadata: ExecutionMetadata {
                device: device.to_string(),
                observable: observable.to_string(),
                simulated: true,
                ..Default::default()
            },
        }
    }

    /// Check if the value came from sampling
    pub fn is_sampled(&self) -> bool {
        self.shots.is_some()
    }

    /// Get total count (should equal shots)
    pub fn total_counts(&self) -> u64 {
        self.counts
            .as_ref()
            .map(|c| c.values().sum())
            .unwrap_or(0)
    }

    /// Standard error of the estimate (zero when analytic)
    ///
    /// For a ±1-valued observable, Var = 1 - ⟨O⟩².
    pub fn standard_error(&self) -> f64 {
        match self.shots {
            Some(n) if n > 0 => ((1.0 - self.value * self.value).max(0.0) / n as f64).sqrt(),
            _ => 0.0,
        }
    }
}

impl fmt::Display for ExpectationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shots {
            Some(shots) => write!(
                f,
                "⟨{}⟩ = {:.6} ± {:.6} (shots={})",
                self.metadata.observable,
                self.value,
                self.standard_error(),
                shots
            ),
            None => write!(f, "⟨{}⟩ = {:.6}", self.metadata.observable, self.value),
        }
    }
}

/// Quantum device trait
/// Gantree: DeviceTrait // 디바이스 인터페이스
pub trait Device: Send + Sync {
    /// Get device name
    fn name(&self) -> &str;

    /// Get number of wires
    fn num_wires(&self) -> usize;

    /// Shots per execution (None = analytic)
    fn shots(&self) -> Option<u64> {
        None
    }

    /// Evaluate the expectation value of `observable` after `circuit`
    /// Gantree: execute(circuit, observable) -> Result<ExpectationResult>
    fn execute(&self, circuit: &Circuit, observable: &Observable)
        -> QrotResult<ExpectationResult>;

    /// Execute multiple circuits against the same observable
    fn execute_batch(
        &self,
        circuits: &[Circuit],
        observable: &Observable,
    ) -> QrotResult<Vec<ExpectationResult>> {
        circuits
            .iter()
            .map(|c| self.execute(c, observable))
            .collect()
    }

    /// Check if device is simulator
    fn is_simulator(&self) -> bool {
        true
    }
}

// ============================================================================
// Tests
// ============================================================================
