//! State-vector simulator device for QROT
//!
//! Gantree: L2_Device → SimulatorDevice
//!
//! Dense state-vector simulation with exact (analytic) expectation values,
//! or shot-based estimates from a seeded sampler.

use crate::execution::{Device, ExecutionMetadata, ExpectationResult};
use num_complex::Complex64;
use qrot_core::{device, Circuit, Counts, Gate, Observable, QrotError, QrotResult};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::FRAC_PI_4;

/// State-vector simulator device
/// Gantree: SimulatorDevice // 시뮬레이터 구현
#[derive(Debug, Clone)]
pub struct SimulatorDevice {
    /// Device name
    name: String,

    /// Number of wires
    num_wires: usize,

    /// Shots per execution (None = analytic)
    shots: Option<u64>,

    /// Random seed for sampling
    seed: Option<u64>,
}

impl SimulatorDevice {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create an analytic simulator with the default device name
    /// Gantree: new(wires) -> Result<Self> // 생성자
    pub fn new(num_wires: usize) -> QrotResult<Self> {
        Self::from_name(device::DEFAULT_DEVICE, num_wires)
    }

    /// Create a simulator from a device name
    ///
    /// `"default.qubit"` and `"lightning.qubit"` both resolve to this
    /// simulator.
    pub fn from_name(name: &str, num_wires: usize) -> QrotResult<Self> {
        if !device::is_supported(name) {
            return Err(QrotError::UnknownDevice(name.to_string()));
        }
        if num_wires == 0 || num_wires > device::MAX_WIRES {
            return Err(QrotError::InvalidWireCount(num_wires));
        }

        log::debug!("created device {} with {} wire(s)", name, num_wires);

        Ok(Self {
            name: name.to_string(),
            num_wires,
            shots: None,
            seed: None,
        })
    }

    /// Create a `default.qubit` simulator
    pub fn default_qubit(num_wires: usize) -> QrotResult<Self> {
        Self::from_name("default.qubit", num_wires)
    }

    /// Create a `lightning.qubit` simulator
    pub fn lightning_qubit(num_wires: usize) -> QrotResult<Self> {
        Self::from_name("lightning.qubit", num_wires)
    }

    /// Estimate expectations from `shots` samples
    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = Some(shots);
        self
    }

    /// Switch back to analytic expectations
    pub fn analytic(mut self) -> Self {
        self.shots = None;
        self
    }

    /// Set seed for reproducible sampling
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Seed in use, if any
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    // ========================================================================
    // Simulation
    // ========================================================================

    /// Final state vector after running `circuit` from |0...0⟩
    /// Gantree: state(&self, circuit) -> Result<Vec<Complex64>> // 상태 벡터
    pub fn state(&self, circuit: &Circuit) -> QrotResult<Vec<Complex64>> {
        self.check_circuit(circuit)?;

        let n = self.num_wires;
        let mut state = vec![Complex64::new(0.0, 0.0); 1 << n];
        state[0] = Complex64::new(1.0, 0.0);

        for gate in circuit.gates() {
            apply_gate(&mut state, gate, n);
        }

        Ok(state)
    }

    /// Computational-basis probabilities after measuring in the
    /// observable's eigenbasis
    pub fn probabilities(
        &self,
        circuit: &Circuit,
        observable: &Observable,
    ) -> QrotResult<Vec<f64>> {
        self.check_observable(observable)?;

        let mut state = self.state(circuit)?;
        for gate in observable.diagonalizing_gates() {
            apply_gate(&mut state, &gate, self.num_wires);
        }

        Ok(state.iter().map(|a| a.norm_sqr()).collect())
    }

    /// Exact expectation value from probabilities
    fn expectation_exact(probs: &[f64], observable: &Observable) -> f64 {
        probs
            .iter()
            .enumerate()
            .map(|(i, p)| observable.eigenvalue(i) * p)
            .sum()
    }

    /// Estimate expectation value from `shots` samples
    fn expectation_sampled(
        &self,
        probs: &[f64],
        observable: &Observable,
        shots: u64,
        rng: &mut ChaCha8Rng,
    ) -> (f64, Counts) {
        let mut tally = vec![0u64; probs.len()];
        for _ in 0..shots {
            tally[sample_index(probs, rng)] += 1;
        }

        let total: f64 = tally
            .iter()
            .enumerate()
            .map(|(i, &n)| observable.eigenvalue(i) * n as f64)
            .sum();

        let counts: Counts = tally
            .iter()
            .enumerate()
            .filter(|&(_, &n)| n > 0)
            .map(|(i, &n)| (format!("{:0width$b}", i, width = self.num_wires), n))
            .collect();

        (total / shots as f64, counts)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    fn check_circuit(&self, circuit: &Circuit) -> QrotResult<()> {
        if circuit.num_qubits() > self.num_wires {
            return Err(QrotError::WireOutOfRange {
                wire: circuit.num_qubits() - 1,
                wires: self.num_wires,
            });
        }
        Ok(())
    }

    fn check_observable(&self, observable: &Observable) -> QrotResult<()> {
        match observable.wire() {
            Some(wire) if wire >= self.num_wires => Err(QrotError::WireOutOfRange {
                wire,
                wires: self.num_wires,
            }),
            _ => Ok(()),
        }
    }

    fn check_shots(shots: u64) -> QrotResult<()> {
        if !(device::MIN_SHOTS..=device::MAX_SHOTS).contains(&shots) {
            return Err(QrotError::ShotsOutOfRange(
                shots,
                device::MIN_SHOTS,
                device::MAX_SHOTS,
            ));
        }
        Ok(())
    }
}

impl Device for SimulatorDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn num_wires(&self) -> usize {
        self.num_wires
    }

    fn shots(&self) -> Option<u64> {
        self.shots
    }

    fn execute(
        &self,
        circuit: &Circuit,
        observable: &Observable,
    ) -> QrotResult<ExpectationResult> {
        let probs = self.probabilities(circuit, observable)?;

        let Some(shots) = self.shots else {
            let value = Self::expectation_exact(&probs, observable);
            return Ok(ExpectationResult::analytic(value, &self.name, observable));
        };

        Self::check_shots(shots)?;

        let mut rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let (value, counts) = self.expectation_sampled(&probs, observable, shots, &mut rng);

        Ok(ExpectationResult {
            value,
            shots: Some(shots),
            counts: Some(counts),
            metadata: ExecutionMetadata {
                device: self.name.clone(),
                observable: observable.to_string(),
                simulated: true,
                seed: self.seed,
            },
        })
    }
}

// ============================================================================
// Sampling
// ============================================================================

/// Draw a basis index from a probability vector
fn sample_index(probs: &[f64], rng: &mut ChaCha8Rng) -> usize {
    let r: f64 = rng.gen();
    let mut cumsum = 0.0;

    for (i, &p) in probs.iter().enumerate() {
        cumsum += p;
        if r < cumsum {
            return i;
        }
    }

    // Rounding left the cumulative sum just below 1
    probs.len() - 1
}

// ============================================================================
// Gate Kernels
// ============================================================================

/// Apply a gate to the state
fn apply_gate(state: &mut [Complex64], gate: &Gate, n: usize) {
    let i = Complex64::i();

    match *gate {
        Gate::H(q) => {
            let sqrt2_inv = std::f64::consts::FRAC_1_SQRT_2;
            apply_single_qubit_gate(state, q, n, |a, b| {
                ((a + b) * sqrt2_inv, (a - b) * sqrt2_inv)
            });
        }
        Gate::X(q) => apply_single_qubit_gate(state, q, n, |a, b| (b, a)),
        Gate::Y(q) => apply_single_qubit_gate(state, q, n, |a, b| (-i * b, i * a)),
        Gate::Z(q) => apply_single_qubit_gate(state, q, n, |a, b| (a, -b)),
        Gate::S(q) => apply_single_qubit_gate(state, q, n, |a, b| (a, i * b)),
        Gate::Sdg(q) => apply_single_qubit_gate(state, q, n, |a, b| (a, -i * b)),
        Gate::T(q) => {
            let phase = Complex64::from_polar(1.0, FRAC_PI_4);
            apply_single_qubit_gate(state, q, n, |a, b| (a, b * phase));
        }
        Gate::Tdg(q) => {
            let phase = Complex64::from_polar(1.0, -FRAC_PI_4);
            apply_single_qubit_gate(state, q, n, |a, b| (a, b * phase));
        }
        Gate::Rx(q, angle) => {
            let c = (angle / 2.0).cos();
            let s = Complex64::new(0.0, -(angle / 2.0).sin());
            apply_single_qubit_gate(state, q, n, |a, b| (a * c + b * s, a * s + b * c));
        }
        Gate::Ry(q, angle) => {
            let c = (angle / 2.0).cos();
            let s = (angle / 2.0).sin();
            apply_single_qubit_gate(state, q, n, |a, b| (a * c - b * s, a * s + b * c));
        }
        Gate::Rz(q, angle) => {
            let phase_neg = Complex64::from_polar(1.0, -angle / 2.0);
            let phase_pos = Complex64::from_polar(1.0, angle / 2.0);
            apply_single_qubit_gate(state, q, n, |a, b| (a * phase_neg, b * phase_pos));
        }
        Gate::Cnot(c, t) => apply_cnot(state, c, t, n),
        Gate::Cz(q1, q2) => apply_cz(state, q1, q2, n),
        Gate::Swap(q1, q2) => apply_swap(state, q1, q2, n),
    }
}

fn apply_single_qubit_gate<F>(state: &mut [Complex64], q: usize, n: usize, f: F)
where
    F: Fn(Complex64, Complex64) -> (Complex64, Complex64),
{
    let mask = 1 << q;
    for i in 0..(1 << n) {
        if i & mask == 0 {
            let j = i | mask;
            let (new_i, new_j) = f(state[i], state[j]);
            state[i] = new_i;
            state[j] = new_j;
        }
    }
}

fn apply_cnot(state: &mut [Complex64], control: usize, target: usize, n: usize) {
    let control_mask = 1 << control;
    let target_mask = 1 << target;

    for i in 0..(1 << n) {
        if (i & control_mask) != 0 && (i & target_mask) == 0 {
            state.swap(i, i | target_mask);
        }
    }
}

fn apply_cz(state: &mut [Complex64], q1: usize, q2: usize, n: usize) {
    let mask = (1 << q1) | (1 << q2);

    for (i, amp) in state.iter_mut().enumerate().take(1 << n) {
        if i & mask == mask {
            *amp = -*amp;
        }
    }
}

fn apply_swap(state: &mut [Complex64], q1: usize, q2: usize, n: usize) {
    let mask1 = 1 << q1;
    let mask2 = 1 << q2;

    for i in 0..(1 << n) {
        if (i & mask1 != 0) != (i & mask2 != 0) {
            let j = i ^ mask1 ^ mask2;
            if i < j {
                state.swap(i, j);
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
